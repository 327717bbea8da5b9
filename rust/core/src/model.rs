// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical SMAP map model
//!
//! Everything here is produced by the normalizer and handed out read-only.
//! A [`SmapData`] is never mutated after construction; re-parse instead.

use crate::model_bounds::Bounds;
use smallvec::SmallVec;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// 2D position in map coordinates (meters)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Type tag of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PropertyType {
    Bool,
    Integer,
    Float,
    String,
}

impl PropertyType {
    /// Recognize a producer type tag (`"int32"`, `"double"`, ...)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Some(PropertyType::Bool),
            "int" | "int32" | "int64" | "uint32" | "uint64" | "integer" | "long" => {
                Some(PropertyType::Integer)
            }
            "float" | "double" | "number" | "real" => Some(PropertyType::Float),
            "string" | "str" | "text" => Some(PropertyType::String),
            _ => None,
        }
    }

    /// Protobuf default for the type, written as an omitted field
    pub fn zero_value(self) -> PropertyValue {
        match self {
            PropertyType::Bool => PropertyValue::Bool(false),
            PropertyType::Integer => PropertyValue::Integer(0),
            PropertyType::Float => PropertyValue::Float(0.0),
            PropertyType::String => PropertyValue::String(String::new()),
        }
    }

    /// Canonical tag written when rendering
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Bool => "bool",
            PropertyType::Integer => "int",
            PropertyType::Float => "double",
            PropertyType::String => "string",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of property value kinds
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl PropertyValue {
    /// The type this value is stored as
    #[inline]
    pub fn kind(&self) -> PropertyType {
        match self {
            PropertyValue::Bool(_) => PropertyType::Bool,
            PropertyValue::Integer(_) => PropertyType::Integer,
            PropertyValue::Float(_) => PropertyType::Float,
            PropertyValue::String(_) => PropertyType::String,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float (integers widen)
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Integer(i) => write!(f, "{i}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

/// Typed key/value property attached to an advanced entity
///
/// `declared_type` is kept separately from the value and always agrees with
/// it; [`Property::new`] refuses inconsistent pairs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Property {
    key: String,
    value: PropertyValue,
    declared_type: PropertyType,
    /// Producer's type tag as written, kept only when it was recognized and
    /// honored
    source_tag: Option<String>,
}

impl Property {
    pub fn new(
        key: impl Into<String>,
        value: PropertyValue,
        declared_type: PropertyType,
    ) -> Option<Self> {
        if value.kind() != declared_type {
            return None;
        }
        Some(Self {
            key: key.into(),
            value,
            declared_type,
            source_tag: None,
        })
    }

    /// Property whose type is taken from the value itself
    pub fn inferred(key: impl Into<String>, value: PropertyValue) -> Self {
        let declared_type = value.kind();
        Self {
            key: key.into(),
            value,
            declared_type,
            source_tag: None,
        }
    }

    pub fn with_source_tag(mut self, tag: Option<String>) -> Self {
        self.source_tag = tag;
        self
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    #[inline]
    pub fn declared_type(&self) -> PropertyType {
        self.declared_type
    }

    #[inline]
    pub fn source_tag(&self) -> Option<&str> {
        self.source_tag.as_deref()
    }
}

/// Map header
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MapHeader {
    pub map_type: String,
    pub name: String,
    /// Meters per grid cell, always > 0
    pub resolution: f64,
    /// Declared `minPos`/`maxPos`, or the derived map bounds when absent
    pub bounds: Bounds,
    /// Opaque producer version, empty when absent
    pub version: String,
}

impl MapHeader {
    /// Leading numeric component of `version` (`"1.2.3"` -> 1)
    #[inline]
    pub fn version_major(&self) -> Option<u32> {
        version_major(&self.version)
    }
}

pub(crate) fn version_major(version: &str) -> Option<u32> {
    let digits: String = version
        .trim()
        .trim_start_matches(['v', 'V'])
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Reflector (RSSI) point used for localization
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ReflectorPoint {
    pub position: Position,
    pub name: Option<String>,
}

/// Plain navigation/obstacle segment
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MapLine {
    pub start: Position,
    pub end: Position,
}

impl MapLine {
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// Common accessors of advanced entities
pub trait AdvancedEntity {
    fn class_name(&self) -> &str;
    fn instance_name(&self) -> &str;
    fn properties(&self) -> &[Property];

    /// First property with the given key
    fn property(&self, key: &str) -> Option<&Property> {
        self.properties().iter().find(|p| p.key() == key)
    }
}

macro_rules! impl_advanced_entity {
    ($($ty:ty),*) => {
        $(impl AdvancedEntity for $ty {
            #[inline]
            fn class_name(&self) -> &str {
                &self.class_name
            }

            #[inline]
            fn instance_name(&self) -> &str {
                &self.instance_name
            }

            #[inline]
            fn properties(&self) -> &[Property] {
                &self.properties
            }
        })*
    };
}

/// Semantic point (waypoint, charge point, landmark, ...)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AdvancedPoint {
    pub position: Position,
    pub class_name: String,
    pub instance_name: String,
    /// Heading in radians
    pub direction: Option<f64>,
    pub properties: Vec<Property>,
}

/// Priority route segment
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AdvancedLine {
    pub start: Position,
    pub end: Position,
    pub class_name: String,
    pub instance_name: String,
    pub properties: Vec<Property>,
}

/// Curved path through ordered control points (at least 2)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AdvancedCurve {
    pub control_points: SmallVec<[Position; 4]>,
    pub class_name: String,
    pub instance_name: String,
    pub properties: Vec<Property>,
}

impl AdvancedCurve {
    #[inline]
    pub fn start(&self) -> Option<Position> {
        self.control_points.first().copied()
    }

    #[inline]
    pub fn end(&self) -> Option<Position> {
        self.control_points.last().copied()
    }

    /// Cubic Bézier evaluation; only meaningful for 4 control points
    pub fn bezier_point(&self, t: f64) -> Option<Position> {
        let [p0, p1, p2, p3] = self.control_points.as_slice() else {
            return None;
        };
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Some(Position::new(
            a * p0.x + b * p1.x + c * p2.x + d * p3.x,
            a * p0.y + b * p1.y + c * p2.y + d * p3.y,
        ))
    }
}

/// Polygonal zone, vertices in source order (at least 3)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AdvancedArea {
    pub vertices: Vec<Position>,
    pub class_name: String,
    pub instance_name: String,
    pub properties: Vec<Property>,
}

impl_advanced_entity!(AdvancedPoint, AdvancedLine, AdvancedCurve, AdvancedArea);

/// Size of each entity collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MapCounts {
    pub normal_points: usize,
    pub reflector_points: usize,
    pub normal_lines: usize,
    pub advanced_points: usize,
    pub advanced_lines: usize,
    pub advanced_curves: usize,
    pub advanced_areas: usize,
}

impl MapCounts {
    pub fn total(&self) -> usize {
        self.normal_points
            + self.reflector_points
            + self.normal_lines
            + self.advanced_points
            + self.advanced_lines
            + self.advanced_curves
            + self.advanced_areas
    }
}

/// A fully normalized SMAP document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SmapData {
    pub(crate) header: MapHeader,
    pub(crate) map_directory: Option<String>,
    pub(crate) normal_points: Vec<Position>,
    pub(crate) reflector_points: Vec<ReflectorPoint>,
    pub(crate) normal_lines: Vec<MapLine>,
    pub(crate) advanced_points: Vec<AdvancedPoint>,
    pub(crate) advanced_lines: Vec<AdvancedLine>,
    pub(crate) advanced_curves: Vec<AdvancedCurve>,
    pub(crate) advanced_areas: Vec<AdvancedArea>,
    pub(crate) bounds: Bounds,
    pub(crate) counts: MapCounts,
}

impl SmapData {
    #[inline]
    pub fn header(&self) -> &MapHeader {
        &self.header
    }

    #[inline]
    pub fn map_directory(&self) -> Option<&str> {
        self.map_directory.as_deref()
    }

    #[inline]
    pub fn normal_points(&self) -> &[Position] {
        &self.normal_points
    }

    #[inline]
    pub fn reflector_points(&self) -> &[ReflectorPoint] {
        &self.reflector_points
    }

    #[inline]
    pub fn normal_lines(&self) -> &[MapLine] {
        &self.normal_lines
    }

    #[inline]
    pub fn advanced_points(&self) -> &[AdvancedPoint] {
        &self.advanced_points
    }

    #[inline]
    pub fn advanced_lines(&self) -> &[AdvancedLine] {
        &self.advanced_lines
    }

    #[inline]
    pub fn advanced_curves(&self) -> &[AdvancedCurve] {
        &self.advanced_curves
    }

    #[inline]
    pub fn advanced_areas(&self) -> &[AdvancedArea] {
        &self.advanced_areas
    }

    /// Bounds over every entity position
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn counts(&self) -> MapCounts {
        self.counts
    }
}

impl fmt::Display for SmapData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== SMAP Summary ===")?;
        if let Some(dir) = &self.map_directory {
            writeln!(f, "Map Directory: {dir}")?;
        }
        let h = &self.header;
        writeln!(f, "Map: {} ({})", h.name, h.map_type)?;
        writeln!(f, "  Resolution: {}", h.resolution)?;
        writeln!(f, "  Bounds: {} - {}", self.bounds.min, self.bounds.max)?;
        if !h.version.is_empty() {
            writeln!(f, "  Version: {}", h.version)?;
        }

        let c = &self.counts;
        writeln!(f, "Normal Points: {}", c.normal_points)?;
        if let (Some(first), Some(last)) = (self.normal_points.first(), self.normal_points.last()) {
            writeln!(f, "  First point: {first}")?;
            writeln!(f, "  Last point: {last}")?;
        }
        writeln!(f, "RSSI Points: {}", c.reflector_points)?;
        writeln!(f, "Normal Lines: {}", c.normal_lines)?;
        writeln!(f, "Advanced Points: {}", c.advanced_points)?;
        for point in &self.advanced_points {
            writeln!(
                f,
                "  {} '{}' at {}",
                point.class_name, point.instance_name, point.position
            )?;
        }
        writeln!(f, "Advanced Lines: {}", c.advanced_lines)?;
        writeln!(f, "Advanced Curves: {}", c.advanced_curves)?;
        for curve in &self.advanced_curves {
            writeln!(f, "  {} '{}'", curve.class_name, curve.instance_name)?;
        }
        write!(f, "Advanced Areas: {}", c.advanced_areas)
    }
}
