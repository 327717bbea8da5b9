// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical JSON rendering
//!
//! Writes a [`SmapData`] back out using canonical key names only, so the
//! result parses in standard mode to an equal map.

use crate::model::{
    AdvancedArea, AdvancedCurve, AdvancedLine, AdvancedPoint, MapHeader, MapLine, Position,
    Property, PropertyValue, ReflectorPoint, SmapData,
};
use crate::schema::{advanced, document, header, line, position, property, reflector};
use serde_json::{json, Map, Value};

impl SmapData {
    /// Render the map as a canonical SMAP document
    pub fn to_canonical_json(&self) -> Value {
        let mut doc = Map::new();
        doc.insert(document::HEADER.canonical().into(), render_header(&self.header));
        if let Some(dir) = &self.map_directory {
            doc.insert(document::MAP_DIRECTORY.canonical().into(), json!(dir));
        }

        let d = &mut doc;
        section(d, document::NORMAL_POINTS.canonical(), &self.normal_points, |p| {
            render_position(*p)
        });
        section(d, document::REFLECTOR_POINTS.canonical(), &self.reflector_points, render_reflector);
        section(d, document::NORMAL_LINES.canonical(), &self.normal_lines, |l| render_line(*l));
        section(d, document::ADVANCED_POINTS.canonical(), &self.advanced_points, render_point);
        section(d, document::ADVANCED_LINES.canonical(), &self.advanced_lines, render_advanced_line);
        section(d, document::ADVANCED_CURVES.canonical(), &self.advanced_curves, render_curve);
        section(d, document::ADVANCED_AREAS.canonical(), &self.advanced_areas, render_area);

        Value::Object(doc)
    }
}

/// Empty sections are omitted, as protobuf JSON does
fn section<T>(doc: &mut Map<String, Value>, key: &str, items: &[T], render: impl Fn(&T) -> Value) {
    if !items.is_empty() {
        doc.insert(key.into(), Value::Array(items.iter().map(render).collect()));
    }
}

fn render_position(p: Position) -> Value {
    let mut obj = Map::new();
    obj.insert(position::X.canonical().into(), json!(p.x));
    obj.insert(position::Y.canonical().into(), json!(p.y));
    Value::Object(obj)
}

fn render_header(h: &MapHeader) -> Value {
    let mut obj = Map::new();
    obj.insert(header::MAP_TYPE.canonical().into(), json!(h.map_type));
    obj.insert(header::NAME.canonical().into(), json!(h.name));
    obj.insert(header::MIN_POS.canonical().into(), render_position(h.bounds.min));
    obj.insert(header::MAX_POS.canonical().into(), render_position(h.bounds.max));
    obj.insert(header::RESOLUTION.canonical().into(), json!(h.resolution));
    obj.insert(header::VERSION.canonical().into(), json!(h.version));
    Value::Object(obj)
}

fn render_reflector(r: &ReflectorPoint) -> Value {
    let mut value = render_position(r.position);
    if let (Some(name), Value::Object(obj)) = (&r.name, &mut value) {
        obj.insert(reflector::NAME.canonical().into(), json!(name));
    }
    value
}

fn render_line(l: MapLine) -> Value {
    let mut obj = Map::new();
    obj.insert(line::START.canonical().into(), render_position(l.start));
    obj.insert(line::END.canonical().into(), render_position(l.end));
    Value::Object(obj)
}

fn entity(class_name: &str, instance_name: &str) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert(advanced::CLASS.canonical().into(), json!(class_name));
    obj.insert(advanced::INSTANCE.canonical().into(), json!(instance_name));
    obj
}

fn with_properties(mut obj: Map<String, Value>, properties: &[Property]) -> Value {
    if !properties.is_empty() {
        let list = properties.iter().map(render_property).collect();
        obj.insert(advanced::PROPERTIES.canonical().into(), Value::Array(list));
    }
    Value::Object(obj)
}

fn render_point(p: &AdvancedPoint) -> Value {
    let mut obj = entity(&p.class_name, &p.instance_name);
    obj.insert(advanced::POINT_POS.canonical().into(), render_position(p.position));
    if let Some(dir) = p.direction {
        obj.insert(advanced::POINT_DIR.canonical().into(), json!(dir));
    }
    with_properties(obj, &p.properties)
}

fn render_advanced_line(l: &AdvancedLine) -> Value {
    let mut obj = entity(&l.class_name, &l.instance_name);
    let segment = MapLine {
        start: l.start,
        end: l.end,
    };
    obj.insert(advanced::LINE.canonical().into(), render_line(segment));
    with_properties(obj, &l.properties)
}

/// Two- and four-point curves use the Bézier keys, others a point list
fn render_curve(c: &AdvancedCurve) -> Value {
    let mut obj = entity(&c.class_name, &c.instance_name);
    let [start, c1, c2, end] = &advanced::CURVE_BEZIER;
    match c.control_points.as_slice() {
        [p0, p1] => {
            obj.insert(start.canonical().into(), render_position(*p0));
            obj.insert(end.canonical().into(), render_position(*p1));
        }
        [p0, p1, p2, p3] => {
            obj.insert(start.canonical().into(), render_position(*p0));
            obj.insert(c1.canonical().into(), render_position(*p1));
            obj.insert(c2.canonical().into(), render_position(*p2));
            obj.insert(end.canonical().into(), render_position(*p3));
        }
        points => {
            let list = points.iter().copied().map(render_position).collect();
            obj.insert(advanced::CURVE_POINTS.canonical().into(), Value::Array(list));
        }
    }
    with_properties(obj, &c.properties)
}

fn render_area(a: &AdvancedArea) -> Value {
    let mut obj = entity(&a.class_name, &a.instance_name);
    let vertices = a.vertices.iter().copied().map(render_position).collect();
    obj.insert(advanced::AREA_VERTICES.canonical().into(), Value::Array(vertices));
    with_properties(obj, &a.properties)
}

/// Typed value field plus the producer's tag when one was honored
fn render_property(p: &Property) -> Value {
    let mut obj = Map::new();
    obj.insert(property::KEY.canonical().into(), json!(p.key()));
    if let Some(tag) = p.source_tag() {
        obj.insert(property::TYPE.canonical().into(), json!(tag));
    }
    let (key, value) = match p.value() {
        PropertyValue::Bool(b) => (property::BOOL_VALUE, json!(b)),
        PropertyValue::Integer(i) => (property::INT_VALUE, json!(i)),
        PropertyValue::Float(f) => (property::FLOAT_VALUE, json!(f)),
        PropertyValue::String(s) => (property::STRING_VALUE, json!(s)),
    };
    obj.insert(key.into(), value);
    Value::Object(obj)
}
