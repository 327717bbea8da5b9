// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Map header builder
//!
//! The header is document-critical: in standard mode any problem here fails
//! the parse. In flexible mode each field recovers on its own so one bad
//! field does not cost the rest of the header.

use super::position::position_field;
use crate::context::{expect_object, ParseContext};
use crate::error::{Error, Result};
use crate::model::{version_major, MapHeader};
use crate::model_bounds::Bounds;
use crate::resolver::field_path;
use crate::schema::{header, FieldSpec, DEFAULT_RESOLUTION};
use serde_json::{Map, Value};

const PATH: &str = "header";

/// Header fields read before the map bounds are known
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HeaderDraft {
    pub map_type: String,
    pub name: String,
    pub resolution: f64,
    pub version: String,
    pub declared_bounds: Option<Bounds>,
}

impl Default for HeaderDraft {
    fn default() -> Self {
        Self {
            map_type: String::new(),
            name: String::new(),
            resolution: DEFAULT_RESOLUTION,
            version: String::new(),
            declared_bounds: None,
        }
    }
}

impl HeaderDraft {
    /// Complete the header; declared bounds win over derived ones
    pub fn finish(self, derived: Bounds) -> MapHeader {
        MapHeader {
            map_type: self.map_type,
            name: self.name,
            resolution: self.resolution,
            bounds: self.declared_bounds.unwrap_or(derived),
            version: self.version,
        }
    }
}

pub(crate) fn build_header(ctx: &mut ParseContext, raw: &Value) -> Result<HeaderDraft> {
    let obj = expect_object(raw, "header", PATH)?;
    let mut draft = HeaderDraft::default();

    draft.name = required_text(ctx, obj, &header::NAME)?;
    draft.map_type = ctx.text(obj, &header::MAP_TYPE, PATH)?;
    draft.version = ctx.text(obj, &header::VERSION, PATH)?;

    match ctx.number(obj, &header::RESOLUTION, PATH) {
        Ok(resolution) if resolution > 0.0 => draft.resolution = resolution,
        Ok(resolution) => ctx.recover(
            Error::structure(
                field_path(PATH, header::RESOLUTION.name),
                format!("resolution must be positive, found {resolution}"),
            ),
            "using default resolution",
        )?,
        Err(err) => ctx.recover(err, "using default resolution")?,
    }

    let min = position_field(ctx, obj, &header::MIN_POS, PATH)?;
    let max = position_field(ctx, obj, &header::MAX_POS, PATH)?;
    draft.declared_bounds = match (min, max) {
        (Some(min), Some(max)) => match Bounds::new(min, max) {
            Some(bounds) => Some(bounds),
            None => {
                ctx.recover(
                    Error::structure(PATH, format!("minPos {min} exceeds maxPos {max}")),
                    "using derived bounds",
                )?;
                None
            }
        },
        _ => None,
    };

    tracing::trace!(
        name = %draft.name,
        version = %draft.version,
        version_major = ?version_major(&draft.version),
        "Parsed header"
    );
    Ok(draft)
}

/// Required string field that flexible mode replaces with an empty string
fn required_text(
    ctx: &mut ParseContext,
    obj: &Map<String, Value>,
    field: &FieldSpec,
) -> Result<String> {
    match ctx.text(obj, field, PATH) {
        Ok(s) => Ok(s),
        Err(err) => ctx.recover(err, "using empty value").map(|_| String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::mode::ParseMode;
    use crate::model::Position;
    use serde_json::json;

    #[test]
    fn test_header_alias_equivalence() {
        let canonical = json!({"mapName": "floor1", "resolution": 0.05, "mapType": "2D-Map"});
        let aliased = json!({"name": "floor1", "Resolution": "0.05", "type": "2D-Map"});

        let mut ctx = ParseContext::new(ParseMode::Flexible);
        let a = build_header(&mut ctx, &canonical).unwrap();
        let b = build_header(&mut ctx, &aliased).unwrap();
        assert_eq!(a, b);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_missing_name_fails_standard() {
        let mut ctx = ParseContext::new(ParseMode::Standard);
        let err = build_header(&mut ctx, &json!({"resolution": 0.05})).unwrap_err();
        assert_eq!(err, Error::missing("mapName", "header"));
    }

    #[test]
    fn test_flexible_recovers_fields_individually() {
        let mut ctx = ParseContext::new(ParseMode::Flexible);
        let draft = build_header(&mut ctx, &json!({"resolution": -1, "mapType": "2D-Map"})).unwrap();
        assert_eq!(draft.name, "");
        assert_eq!(draft.map_type, "2D-Map");
        assert_eq!(draft.resolution, DEFAULT_RESOLUTION);
        assert_eq!(ctx.diagnostics().count(Severity::Warning), 2);
    }

    #[test]
    fn test_zero_resolution_rejected_in_standard() {
        let mut ctx = ParseContext::new(ParseMode::Standard);
        let err = build_header(&mut ctx, &json!({"mapName": "m", "resolution": 0})).unwrap_err();
        assert!(matches!(err, Error::MalformedStructure { .. }));
    }

    #[test]
    fn test_declared_bounds() {
        let raw = json!({
            "mapName": "m",
            "resolution": 0.02,
            "minPos": {"x": -1, "y": -2},
            "maxPos": {"x": 10, "y": 20}
        });
        let mut ctx = ParseContext::new(ParseMode::Standard);
        let header = build_header(&mut ctx, &raw).unwrap().finish(Bounds::empty());
        assert_eq!(header.bounds.min, Position::new(-1.0, -2.0));
        assert_eq!(header.bounds.max, Position::new(10.0, 20.0));
    }

    #[test]
    fn test_inverted_bounds_replaced_in_flexible() {
        let raw = json!({
            "mapName": "m",
            "resolution": 0.02,
            "minPos": {"x": 10, "y": 0},
            "maxPos": {"x": 0, "y": 5}
        });
        let derived = Bounds::new(Position::new(0.0, 0.0), Position::new(1.0, 1.0)).unwrap();
        let mut ctx = ParseContext::new(ParseMode::Flexible);
        let header = build_header(&mut ctx, &raw).unwrap().finish(derived);
        assert_eq!(header.bounds, derived);
        assert_eq!(ctx.diagnostics().count(Severity::Warning), 1);

        let mut ctx = ParseContext::new(ParseMode::Standard);
        assert!(build_header(&mut ctx, &raw).is_err());
    }
}
