// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serializable map summaries for status responses.

use serde::{Deserialize, Serialize};
use smap_lite_core::{MapCounts, ParseOutcome, Severity};

/// Per-kind entity counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCounts {
    pub normal_points: usize,
    pub reflector_points: usize,
    pub normal_lines: usize,
    pub advanced_points: usize,
    pub advanced_lines: usize,
    pub advanced_curves: usize,
    pub advanced_areas: usize,
}

impl From<MapCounts> for EntityCounts {
    fn from(c: MapCounts) -> Self {
        Self {
            normal_points: c.normal_points,
            reflector_points: c.reflector_points,
            normal_lines: c.normal_lines,
            advanced_points: c.advanced_points,
            advanced_lines: c.advanced_lines,
            advanced_curves: c.advanced_curves,
            advanced_areas: c.advanced_areas,
        }
    }
}

/// Summary of one parsed map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    /// Map name from the header.
    pub name: String,
    pub map_type: String,
    /// Meters per grid cell.
    pub resolution: f64,
    pub version: String,
    /// Lower-left corner of the derived bounds.
    pub min: [f64; 2],
    /// Upper-right corner of the derived bounds.
    pub max: [f64; 2],
    pub counts: EntityCounts,
    /// Number of warning diagnostics (dropped or replaced data).
    pub warning_count: usize,
    /// Number of info diagnostics (defaults substituted).
    pub info_count: usize,
}

impl MapSummary {
    pub fn from_outcome(outcome: &ParseOutcome) -> Self {
        let data = &outcome.data;
        let header = data.header();
        let bounds = data.bounds();
        let count = |severity: Severity| {
            outcome
                .diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };

        Self {
            name: header.name.clone(),
            map_type: header.map_type.clone(),
            resolution: header.resolution,
            version: header.version.clone(),
            min: [bounds.min.x, bounds.min.y],
            max: [bounds.max.x, bounds.max.y],
            counts: data.counts().into(),
            warning_count: count(Severity::Warning),
            info_count: count(Severity::Info),
        }
    }

    /// Total number of entities.
    pub fn entity_count(&self) -> usize {
        let c = &self.counts;
        c.normal_points
            + c.reflector_points
            + c.normal_lines
            + c.advanced_points
            + c.advanced_lines
            + c.advanced_curves
            + c.advanced_areas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;
    use smap_lite_core::{parse, ParseMode};

    #[test]
    fn test_summary_from_outcome() {
        let doc = json!({
            "header": {"mapName": "floor1", "resolution": 0.05, "mapType": "2D-Map"},
            "normalPosList": [{"x": 0, "y": 0}, {"x": 10, "y": 5}],
            "advancedPointList": [{"className": "LandMark", "pos": {"x": 1, "y": 1}}]
        });
        let outcome = parse(&doc, ParseMode::Flexible).unwrap();
        let summary = MapSummary::from_outcome(&outcome);

        assert_eq!(summary.name, "floor1");
        assert_relative_eq!(summary.resolution, 0.05);
        assert_eq!(summary.max, [10.0, 5.0]);
        assert_eq!(summary.counts.normal_points, 2);
        assert_eq!(summary.entity_count(), 2);
        assert_eq!(summary.warning_count, 1);
        assert_eq!(summary.info_count, 0);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = MapSummary {
            name: "m".into(),
            map_type: "2D-Map".into(),
            resolution: 0.05,
            version: String::new(),
            min: [0.0, 0.0],
            max: [1.0, 1.0],
            counts: EntityCounts::default(),
            warning_count: 0,
            info_count: 0,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["mapType"], json!("2D-Map"));
        assert_eq!(value["counts"]["normalPoints"], json!(0));

        let back: MapSummary = serde_json::from_value(value).unwrap();
        assert_eq!(back, summary);
    }
}
