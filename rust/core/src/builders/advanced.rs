// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Advanced entity builders
//!
//! Points, lines, curves and areas that carry a class, an instance name and
//! typed properties. Every builder reads the identity fields first so a
//! missing class or name is reported before any geometry problem.

use super::line::build_line;
use super::position::build_position;
use super::property::build_properties;
use crate::coerce::json_kind;
use crate::context::{expect_object, ParseContext};
use crate::error::{Error, Result};
use crate::model::{AdvancedArea, AdvancedCurve, AdvancedLine, AdvancedPoint, Position};
use crate::resolver::{field_path, index_path};
use crate::schema::{advanced, FieldSpec};
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Cross-product magnitude under which three vertices count as collinear
const COLLINEAR_EPSILON: f64 = 1e-9;

/// Minimum control points of a curve
const MIN_CURVE_POINTS: usize = 2;

/// Minimum vertices of an area
const MIN_AREA_VERTICES: usize = 3;

struct Identity {
    class_name: String,
    instance_name: String,
}

fn identity(
    ctx: &mut ParseContext,
    obj: &Map<String, Value>,
    instance: &FieldSpec,
    path: &str,
) -> Result<Identity> {
    Ok(Identity {
        class_name: ctx.text(obj, &advanced::CLASS, path)?,
        instance_name: ctx.text(obj, instance, path)?,
    })
}

pub(crate) fn build_advanced_point(
    ctx: &mut ParseContext,
    raw: &Value,
    path: &str,
) -> Result<AdvancedPoint> {
    let obj = expect_object(raw, "advancedPoint", path)?;
    let id = identity(ctx, obj, &advanced::INSTANCE, path)?;

    let pos = ctx.required(obj, &advanced::POINT_POS, path)?;
    let position = build_position(ctx, pos, &field_path(path, advanced::POINT_POS.name))?;
    let direction = ctx.opt_number(obj, &advanced::POINT_DIR, path)?;
    let properties = build_properties(ctx, obj, path)?;

    Ok(AdvancedPoint {
        position,
        class_name: id.class_name,
        instance_name: id.instance_name,
        direction,
        properties,
    })
}

pub(crate) fn build_advanced_line(
    ctx: &mut ParseContext,
    raw: &Value,
    path: &str,
) -> Result<AdvancedLine> {
    let obj = expect_object(raw, "advancedLine", path)?;
    let id = identity(ctx, obj, &advanced::INSTANCE, path)?;

    let segment = ctx.required(obj, &advanced::LINE, path)?;
    let line = build_line(ctx, segment, &field_path(path, advanced::LINE.name))?;
    let properties = build_properties(ctx, obj, path)?;

    Ok(AdvancedLine {
        start: line.start,
        end: line.end,
        class_name: id.class_name,
        instance_name: id.instance_name,
        properties,
    })
}

/// Build a curve from `controlPoints`, or from the Bézier keys in order
pub(crate) fn build_advanced_curve(
    ctx: &mut ParseContext,
    raw: &Value,
    path: &str,
) -> Result<AdvancedCurve> {
    let obj = expect_object(raw, "advancedCurve", path)?;
    let id = identity(ctx, obj, &advanced::CURVE_INSTANCE, path)?;

    let mut control_points: SmallVec<[Position; 4]> = SmallVec::new();
    let listed = ctx.array(obj, &advanced::CURVE_POINTS, path)?;
    if listed.is_empty() {
        for field in &advanced::CURVE_BEZIER {
            if let Some(raw) = ctx.lookup(obj, field, path)? {
                control_points.push(build_position(ctx, raw, &field_path(path, field.name))?);
            }
        }
    } else {
        let list_path = field_path(path, advanced::CURVE_POINTS.name);
        for (i, item) in listed.iter().enumerate() {
            control_points.push(build_position(ctx, item, &index_path(&list_path, i))?);
        }
    }

    if control_points.len() < MIN_CURVE_POINTS {
        return Err(Error::structure(
            path,
            format!(
                "curve needs at least {MIN_CURVE_POINTS} control points, found {}",
                control_points.len()
            ),
        ));
    }
    let properties = build_properties(ctx, obj, path)?;

    Ok(AdvancedCurve {
        control_points,
        class_name: id.class_name,
        instance_name: id.instance_name,
        properties,
    })
}

/// Build an area; degenerate polygons are kept and flagged
pub(crate) fn build_advanced_area(
    ctx: &mut ParseContext,
    raw: &Value,
    path: &str,
) -> Result<AdvancedArea> {
    let obj = expect_object(raw, "advancedArea", path)?;
    let id = identity(ctx, obj, &advanced::INSTANCE, path)?;

    let group = ctx.required(obj, &advanced::AREA_VERTICES, path)?;
    let Value::Array(items) = group else {
        return Err(Error::mismatch(
            advanced::AREA_VERTICES.name,
            path,
            "array",
            json_kind(group),
        ));
    };
    let group_path = field_path(path, advanced::AREA_VERTICES.name);
    let vertices = items
        .iter()
        .enumerate()
        .map(|(i, item)| build_position(ctx, item, &index_path(&group_path, i)))
        .collect::<Result<Vec<_>>>()?;

    if vertices.len() < MIN_AREA_VERTICES {
        return Err(Error::structure(
            path,
            format!(
                "area needs at least {MIN_AREA_VERTICES} vertices, found {}",
                vertices.len()
            ),
        ));
    }
    if let Some(reason) = degeneracy(&vertices) {
        ctx.warn(path, format!("degenerate area `{}`: {reason}", id.instance_name));
    }
    let properties = build_properties(ctx, obj, path)?;

    Ok(AdvancedArea {
        vertices,
        class_name: id.class_name,
        instance_name: id.instance_name,
        properties,
    })
}

/// Why a polygon has no area, if it has none
fn degeneracy(vertices: &[Position]) -> Option<&'static str> {
    // +0.0 folds -0.0 into 0.0 before hashing bits
    let distinct: FxHashSet<(u64, u64)> = vertices
        .iter()
        .map(|p| ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()))
        .collect();
    if distinct.len() < MIN_AREA_VERTICES {
        return Some("fewer than 3 distinct vertices");
    }

    let origin = vertices[0];
    let axis = vertices.iter().find(|p| **p != origin)?;
    let (ax, ay) = (axis.x - origin.x, axis.y - origin.y);
    let axis_len = ax.hypot(ay);
    // Tolerance scales with both edge lengths
    let collinear = vertices.iter().all(|p| {
        let (px, py) = (p.x - origin.x, p.y - origin.y);
        let cross = ax * py - ay * px;
        cross.abs() <= COLLINEAR_EPSILON * axis_len * px.hypot(py)
    });
    collinear.then_some("all vertices are collinear")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::mode::ParseMode;
    use crate::model::{AdvancedEntity, PropertyValue};
    use serde_json::json;

    fn flexible() -> ParseContext {
        ParseContext::new(ParseMode::Flexible)
    }

    #[test]
    fn test_advanced_point() {
        let raw = json!({
            "className": "LandMark",
            "instanceName": "LM1",
            "pos": {"x": 2.5, "y": 1},
            "dir": 0.75,
            "property": [{"key": "spin", "type": "bool", "boolValue": true}]
        });
        let mut ctx = ParseContext::new(ParseMode::Standard);
        let point = build_advanced_point(&mut ctx, &raw, "advancedPointList[0]").unwrap();
        assert_eq!(point.position, Position::new(2.5, 1.0));
        assert_eq!(point.direction, Some(0.75));
        assert_eq!(point.class_name(), "LandMark");
        assert_eq!(
            point.property("spin").map(|p| p.value()),
            Some(&PropertyValue::Bool(true))
        );
    }

    #[test]
    fn test_missing_instance_name_names_entity_path() {
        let raw = json!({"className": "LandMark", "pos": {"x": 0, "y": 0}});
        let mut ctx = ParseContext::new(ParseMode::Standard);
        let err = build_advanced_point(&mut ctx, &raw, "advancedPointList[3]").unwrap_err();
        assert_eq!(err.to_string(), "missing required field `instanceName` at advancedPointList[3]");
    }

    #[test]
    fn test_advanced_line_wraps_segment() {
        let raw = json!({
            "className": "ForbiddenLine",
            "instanceName": "FL1",
            "line": {"startPos": {"x": 0, "y": 1}, "endPos": {"x": 4, "y": 1}}
        });
        let mut ctx = flexible();
        let line = build_advanced_line(&mut ctx, &raw, "advancedLineList[0]").unwrap();
        assert_eq!(line.start, Position::new(0.0, 1.0));
        assert_eq!(line.end, Position::new(4.0, 1.0));
        assert!(line.properties.is_empty());
    }

    #[test]
    fn test_bezier_curve_keys() {
        let raw = json!({
            "className": "DegenerateBezier",
            "instanceName": "LM1-LM2",
            "startPos": {"instanceName": "LM1", "pos": {"x": 0, "y": 0}},
            "controlPos1": {"x": 1, "y": 2},
            "controlPos2": {"x": 3, "y": 2},
            "endPos": {"instanceName": "LM2", "pos": {"x": 4}}
        });
        let mut ctx = ParseContext::new(ParseMode::Standard);
        let curve = build_advanced_curve(&mut ctx, &raw, "advancedCurveList[0]").unwrap();
        assert_eq!(curve.control_points.len(), 4);
        assert_eq!(curve.end(), Some(Position::new(4.0, 0.0)));
    }

    #[test]
    fn test_curve_control_point_minimum() {
        let one = json!({"className": "C", "instanceName": "c", "controlPoints": [{"x": 1, "y": 1}]});
        let two = json!({
            "className": "C",
            "instanceName": "c",
            "controlPoints": [{"x": 1, "y": 1}, {"x": 2, "y": 2}]
        });
        for mode in [ParseMode::Standard, ParseMode::Flexible] {
            let mut ctx = ParseContext::new(mode);
            let err = build_advanced_curve(&mut ctx, &one, "advancedCurveList[0]").unwrap_err();
            assert!(matches!(err, Error::MalformedStructure { .. }));
            assert!(build_advanced_curve(&mut ctx, &two, "advancedCurveList[1]").is_ok());
        }
    }

    #[test]
    fn test_curve_without_instance_name_is_info() {
        let raw = json!({"className": "C", "controlPoints": [[0, 0], [1, 1]]});
        let mut ctx = flexible();
        let curve = build_advanced_curve(&mut ctx, &raw, "advancedCurveList[0]").unwrap();
        assert_eq!(curve.instance_name, "");
        assert_eq!(ctx.diagnostics().count(Severity::Info), 1);
        assert_eq!(ctx.diagnostics().count(Severity::Warning), 0);
    }

    #[test]
    fn test_area_vertex_minimum() {
        let raw = json!({"className": "Zone", "instanceName": "z", "posGroup": [{"x": 0}, {"x": 1}]});
        let mut ctx = flexible();
        let err = build_advanced_area(&mut ctx, &raw, "advancedAreaList[0]").unwrap_err();
        assert!(matches!(err, Error::MalformedStructure { .. }));
    }

    #[test]
    fn test_degenerate_area_is_kept_and_flagged() {
        let collinear = json!({
            "className": "Zone",
            "instanceName": "z",
            "posGroup": [{"x": 0, "y": 0}, {"x": 1, "y": 1}, {"x": 2, "y": 2}]
        });
        let mut ctx = flexible();
        let area = build_advanced_area(&mut ctx, &collinear, "advancedAreaList[0]").unwrap();
        assert_eq!(area.vertices.len(), 3);
        let diag = ctx.diagnostics().iter().next().unwrap();
        assert_eq!(diag.severity, Severity::Warning);
        assert!(diag.message.contains("collinear"));

        let mut ctx = ParseContext::new(ParseMode::Standard);
        assert!(build_advanced_area(&mut ctx, &collinear, "advancedAreaList[0]").is_ok());
    }

    #[test]
    fn test_millimetre_triangle_is_not_collinear() {
        let tiny = [
            Position::new(5.0, 5.0),
            Position::new(5.00001, 5.0),
            Position::new(5.0, 5.00001),
        ];
        assert_eq!(degeneracy(&tiny), None);

        let sliver = [
            Position::new(0.0, 0.0),
            Position::new(1e-5, 1e-5),
            Position::new(3e-5, 3e-5),
        ];
        assert_eq!(degeneracy(&sliver), Some("all vertices are collinear"));
    }

    #[test]
    fn test_degeneracy_checks() {
        let square = [
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(1.0, 1.0),
            Position::new(0.0, 1.0),
        ];
        assert_eq!(degeneracy(&square), None);

        let repeated = [
            Position::new(0.0, 0.0),
            Position::new(-0.0, 0.0),
            Position::new(1.0, 1.0),
        ];
        assert_eq!(degeneracy(&repeated), Some("fewer than 3 distinct vertices"));
    }

    #[test]
    fn test_bad_property_keeps_entity() {
        let raw = json!({
            "className": "LandMark",
            "instanceName": "LM1",
            "pos": {"x": 0, "y": 0},
            "property": [{"key": "zones", "value": {"a": 1}}, {"key": "ok", "int32Value": 3}]
        });
        let mut ctx = flexible();
        let point = build_advanced_point(&mut ctx, &raw, "advancedPointList[0]").unwrap();
        assert_eq!(point.properties.len(), 1);
        assert_eq!(point.properties[0].value(), &PropertyValue::Integer(3));
    }
}
