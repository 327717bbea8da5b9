// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Position and reflector point builders

use crate::coerce::{self, json_kind};
use crate::context::ParseContext;
use crate::error::{Error, Result};
use crate::model::{Position, ReflectorPoint};
use crate::resolver::field_path;
use crate::schema::{position, reflector, FieldSpec};
use serde_json::{Map, Value};

/// Build a position from `{x, y}`, `{pos: {x, y}}` or (flexible only) `[x, y]`
///
/// Omitted coordinates are zero, as protobuf JSON drops zero values.
pub(crate) fn build_position(ctx: &mut ParseContext, raw: &Value, path: &str) -> Result<Position> {
    match raw {
        Value::Object(obj) => position_from_object(ctx, obj, path),
        Value::Array(items) if ctx.mode().is_flexible() => position_from_array(items, path),
        other => Err(Error::mismatch("position", path, "object", json_kind(other))),
    }
}

fn has_coordinate_key(ctx: &ParseContext, obj: &Map<String, Value>) -> bool {
    [position::X, position::Y]
        .iter()
        .flat_map(|field| field.accepted(ctx.mode()))
        .any(|key| obj.contains_key(*key))
}

fn position_from_object(
    ctx: &mut ParseContext,
    obj: &Map<String, Value>,
    path: &str,
) -> Result<Position> {
    if !has_coordinate_key(ctx, obj) {
        if let Some(nested) = ctx.lookup(obj, &position::NESTED, path)? {
            return build_position(ctx, nested, &field_path(path, position::NESTED.name));
        }
    }

    let x = ctx.number(obj, &position::X, path)?;
    let y = ctx.number(obj, &position::Y, path)?;
    Ok(Position::new(x, y))
}

fn position_from_array(items: &[Value], path: &str) -> Result<Position> {
    let [x, y, ..] = items else {
        return Err(Error::structure(
            path,
            format!("coordinate array needs 2 elements, found {}", items.len()),
        ));
    };
    let x = coerce::number(x).map_err(|m| Error::mismatch("x", path, m.expected, m.actual))?;
    let y = coerce::number(y).map_err(|m| Error::mismatch("y", path, m.expected, m.actual))?;
    Ok(Position::new(x, y))
}

/// Resolve `field` in `obj` and build it as a position
///
/// A required field that fails fails the caller. Otherwise a bad value is
/// fatal in standard mode and `None` (with a warning) in flexible mode.
pub(crate) fn position_field(
    ctx: &mut ParseContext,
    obj: &Map<String, Value>,
    field: &FieldSpec,
    path: &str,
) -> Result<Option<Position>> {
    let Some(raw) = ctx.lookup(obj, field, path)? else {
        return Ok(None);
    };
    match build_position(ctx, raw, &field_path(path, field.name)) {
        Ok(p) => Ok(Some(p)),
        Err(err) if field.is_required() => Err(err),
        Err(err) => ctx.recover(err, "field ignored").map(|_| None),
    }
}

/// Build a reflector point: a position plus an optional name
pub(crate) fn build_reflector(
    ctx: &mut ParseContext,
    raw: &Value,
    path: &str,
) -> Result<ReflectorPoint> {
    let position = build_position(ctx, raw, path)?;
    let name = match raw {
        Value::Object(obj) => ctx.opt_text(obj, &reflector::NAME, path)?,
        _ => None,
    };
    Ok(ReflectorPoint { position, name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ParseMode;
    use serde_json::json;

    fn flexible() -> ParseContext {
        ParseContext::new(ParseMode::Flexible)
    }

    #[test]
    fn test_position_shapes() {
        let mut ctx = flexible();
        let p = build_position(&mut ctx, &json!({"x": 1.5, "y": -2}), "p").unwrap();
        assert_eq!(p, Position::new(1.5, -2.0));

        let p = build_position(&mut ctx, &json!({"pos": {"x": 3, "y": 4}}), "p").unwrap();
        assert_eq!(p, Position::new(3.0, 4.0));

        let p = build_position(&mut ctx, &json!([5, "6"]), "p").unwrap();
        assert_eq!(p, Position::new(5.0, 6.0));

        let p = build_position(&mut ctx, &json!({"X": 7}), "p").unwrap();
        assert_eq!(p, Position::new(7.0, 0.0));
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_omitted_coordinates_are_zero() {
        let mut ctx = ParseContext::new(ParseMode::Standard);
        let p = build_position(&mut ctx, &json!({"y": 2.0}), "p").unwrap();
        assert_eq!(p, Position::new(0.0, 2.0));
    }

    #[test]
    fn test_array_positions_rejected_in_standard() {
        let mut ctx = ParseContext::new(ParseMode::Standard);
        let err = build_position(&mut ctx, &json!([1, 2]), "normalPosList[0]").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_short_array_is_structural_error() {
        let mut ctx = flexible();
        let err = build_position(&mut ctx, &json!([1]), "normalPosList[0]").unwrap_err();
        assert!(matches!(err, Error::MalformedStructure { .. }));
    }

    #[test]
    fn test_reflector_with_name() {
        let mut ctx = flexible();
        let r = build_reflector(&mut ctx, &json!({"x": 1, "y": 2, "name": "R1"}), "r").unwrap();
        assert_eq!(r.position, Position::new(1.0, 2.0));
        assert_eq!(r.name.as_deref(), Some("R1"));

        let r = build_reflector(&mut ctx, &json!([3, 4]), "r").unwrap();
        assert!(r.name.is_none());
    }
}
