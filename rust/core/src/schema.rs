// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SMAP Schema - alias table
//!
//! Every logical field is described once, as data: the keys producers have
//! used for it (canonical key first) and what happens when none is present.
//! Supporting a new producer version means adding an alias here.

use crate::mode::ParseMode;

/// Value substituted when a field is absent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    /// No value; the field stays `None` (or an empty collection)
    Absent,
    Number(f64),
    Text(&'static str),
}

/// Default policy for a logical field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Policy {
    /// Missing is an error
    Required,
    /// Missing substitutes the fallback and is reported as a diagnostic
    Optional(Fallback),
    /// Missing substitutes the fallback silently (protobuf-style omission)
    Implicit(Fallback),
}

/// Logical field: its name, accepted keys and default policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Accepted keys in lookup order; the first one is canonical
    pub aliases: &'static [&'static str],
    /// How many leading aliases standard mode accepts
    pub canonical_count: usize,
    pub policy: Policy,
}

impl FieldSpec {
    pub const fn required(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            canonical_count: 1,
            policy: Policy::Required,
        }
    }

    pub const fn optional(
        name: &'static str,
        aliases: &'static [&'static str],
        fallback: Fallback,
    ) -> Self {
        Self {
            name,
            aliases,
            canonical_count: 1,
            policy: Policy::Optional(fallback),
        }
    }

    pub const fn implicit(
        name: &'static str,
        aliases: &'static [&'static str],
        fallback: Fallback,
    ) -> Self {
        Self {
            name,
            aliases,
            canonical_count: 1,
            policy: Policy::Implicit(fallback),
        }
    }

    /// Treat every alias as canonical
    pub const fn all_canonical(mut self) -> Self {
        self.canonical_count = self.aliases.len();
        self
    }

    /// The canonical key (used in standard mode and for rendering)
    #[inline]
    pub const fn canonical(&self) -> &'static str {
        self.aliases[0]
    }

    /// Keys consulted under the given mode, in lookup order
    #[inline]
    pub fn accepted(&self, mode: ParseMode) -> &'static [&'static str] {
        match mode {
            ParseMode::Standard => &self.aliases[..self.canonical_count.min(self.aliases.len())],
            ParseMode::Flexible => self.aliases,
        }
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        matches!(self.policy, Policy::Required)
    }
}

/// Resolution used when a document has none or an invalid one (meters/cell)
pub const DEFAULT_RESOLUTION: f64 = 0.05;

/// Top-level document sections
pub mod document {
    use super::{Fallback, FieldSpec};

    pub const HEADER: FieldSpec = FieldSpec::required("header", &["header", "mapHeader"]);
    pub const MAP_DIRECTORY: FieldSpec =
        FieldSpec::implicit("mapDirectory", &["mapDirectory", "directory"], Fallback::Absent);
    pub const NORMAL_POINTS: FieldSpec = FieldSpec::implicit(
        "normalPosList",
        &["normalPosList", "normalPoints", "points"],
        Fallback::Absent,
    );
    pub const REFLECTOR_POINTS: FieldSpec = FieldSpec::implicit(
        "rssiPosList",
        &["rssiPosList", "reflectorPosList", "reflectors"],
        Fallback::Absent,
    );
    pub const NORMAL_LINES: FieldSpec = FieldSpec::implicit(
        "normalLineList",
        &["normalLineList", "lines"],
        Fallback::Absent,
    );
    pub const ADVANCED_POINTS: FieldSpec = FieldSpec::implicit(
        "advancedPointList",
        &["advancedPointList", "advancedPoints"],
        Fallback::Absent,
    );
    pub const ADVANCED_LINES: FieldSpec = FieldSpec::implicit(
        "advancedLineList",
        &["advancedLineList", "advancedLines"],
        Fallback::Absent,
    );
    pub const ADVANCED_CURVES: FieldSpec = FieldSpec::implicit(
        "advancedCurveList",
        &["advancedCurveList", "advancedCurves"],
        Fallback::Absent,
    );
    pub const ADVANCED_AREAS: FieldSpec = FieldSpec::implicit(
        "advancedAreaList",
        &["advancedAreaList", "advancedAreas"],
        Fallback::Absent,
    );
}

pub mod header {
    use super::{Fallback, FieldSpec};

    pub const NAME: FieldSpec = FieldSpec::required("mapName", &["mapName", "name", "Name"]);
    pub const RESOLUTION: FieldSpec =
        FieldSpec::required("resolution", &["resolution", "Resolution", "res"]);
    pub const MAP_TYPE: FieldSpec =
        FieldSpec::implicit("mapType", &["mapType", "type", "Type"], Fallback::Text(""));
    pub const VERSION: FieldSpec = FieldSpec::implicit(
        "version",
        &["version", "Version", "mapVersion"],
        Fallback::Text(""),
    );
    pub const MIN_POS: FieldSpec = FieldSpec::implicit("minPos", &["minPos", "min"], Fallback::Absent);
    pub const MAX_POS: FieldSpec = FieldSpec::implicit("maxPos", &["maxPos", "max"], Fallback::Absent);
}

pub mod position {
    use super::{Fallback, FieldSpec};

    pub const X: FieldSpec = FieldSpec::implicit("x", &["x", "X"], Fallback::Number(0.0));
    pub const Y: FieldSpec = FieldSpec::implicit("y", &["y", "Y"], Fallback::Number(0.0));
    /// Wrapper used by point-like objects (`{"pos": {"x": .., "y": ..}}`)
    pub const NESTED: FieldSpec = FieldSpec::implicit("pos", &["pos", "position"], Fallback::Absent);
}

pub mod reflector {
    use super::{Fallback, FieldSpec};

    pub const NAME: FieldSpec =
        FieldSpec::implicit("name", &["name", "instanceName", "id"], Fallback::Absent);
}

pub mod line {
    use super::FieldSpec;

    pub const START: FieldSpec = FieldSpec::required("startPos", &["startPos", "start", "p1"]);
    pub const END: FieldSpec = FieldSpec::required("endPos", &["endPos", "end", "p2"]);
}

/// Fields shared by every advanced entity
pub mod advanced {
    use super::{Fallback, FieldSpec};

    pub const CLASS: FieldSpec = FieldSpec::required("className", &["className", "class", "type"]);
    pub const INSTANCE: FieldSpec = FieldSpec::required("instanceName", &["instanceName", "name"]);
    pub const PROPERTIES: FieldSpec =
        FieldSpec::implicit("property", &["property", "properties"], Fallback::Absent);

    pub const POINT_POS: FieldSpec = FieldSpec::required("pos", &["pos", "position"]);
    pub const POINT_DIR: FieldSpec =
        FieldSpec::implicit("dir", &["dir", "direction", "angle"], Fallback::Absent);

    pub const LINE: FieldSpec = FieldSpec::required("line", &["line", "segment"]);

    pub const CURVE_INSTANCE: FieldSpec =
        FieldSpec::optional("instanceName", &["instanceName", "name"], Fallback::Text(""));
    pub const CURVE_POINTS: FieldSpec = FieldSpec::implicit(
        "controlPoints",
        &["controlPoints", "controlPosList"],
        Fallback::Absent,
    );
    /// Bézier keys, in geometric order
    pub const CURVE_BEZIER: [FieldSpec; 4] = [
        FieldSpec::implicit("startPos", &["startPos"], Fallback::Absent),
        FieldSpec::implicit("controlPos1", &["controlPos1"], Fallback::Absent),
        FieldSpec::implicit("controlPos2", &["controlPos2"], Fallback::Absent),
        FieldSpec::implicit("endPos", &["endPos"], Fallback::Absent),
    ];

    pub const AREA_VERTICES: FieldSpec =
        FieldSpec::required("posGroup", &["posGroup", "vertices", "points"]);
}

pub mod property {
    use super::{Fallback, FieldSpec};

    pub const KEY: FieldSpec = FieldSpec::required("key", &["key", "name"]);
    pub const TYPE: FieldSpec = FieldSpec::implicit("type", &["type", "valueType"], Fallback::Absent);
    /// Typed value fields are preferred over the generic `value`, which some
    /// producers fill with an encoded copy
    pub const VALUE: FieldSpec = FieldSpec::required(
        "value",
        &[
            "boolValue",
            "int32Value",
            "uint32Value",
            "int64Value",
            "doubleValue",
            "floatValue",
            "stringValue",
            "value",
        ],
    )
    .all_canonical();

    /// Generic field holding an encoded copy of the value
    pub const ENCODED_VALUE: &str = "value";

    /// Typed value key written for each property type
    pub const BOOL_VALUE: &str = "boolValue";
    pub const INT_VALUE: &str = "int32Value";
    pub const FLOAT_VALUE: &str = "doubleValue";
    pub const STRING_VALUE: &str = "stringValue";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_is_first_alias() {
        assert_eq!(header::NAME.canonical(), "mapName");
        assert_eq!(document::NORMAL_POINTS.canonical(), "normalPosList");
        assert!(header::NAME.is_required());
        assert!(!header::VERSION.is_required());
    }

    #[test]
    fn test_standard_mode_accepts_canonical_keys_only() {
        assert_eq!(header::NAME.accepted(ParseMode::Standard), ["mapName"]);
        assert_eq!(header::NAME.accepted(ParseMode::Flexible).len(), 3);
        assert_eq!(
            property::VALUE.accepted(ParseMode::Standard),
            property::VALUE.aliases
        );
    }

    #[test]
    fn test_aliases_are_unique_per_field() {
        let fields = [
            document::HEADER,
            document::NORMAL_POINTS,
            header::NAME,
            header::RESOLUTION,
            advanced::CLASS,
            advanced::AREA_VERTICES,
            property::VALUE,
        ];
        for field in fields {
            let mut seen = rustc_hash::FxHashSet::default();
            for alias in field.aliases {
                assert!(seen.insert(*alias), "duplicate alias {alias} in {}", field.name);
            }
        }
    }
}
