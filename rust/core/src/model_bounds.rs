// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Map bounds calculation
//!
//! Component-wise min/max over every position of a parsed map, in f64
//! precision.

use crate::model::{Position, SmapData};

/// Axis-aligned bounding box; `min <= max` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    /// Bounds from two corners, `None` if inverted on either axis
    pub fn new(min: Position, max: Position) -> Option<Self> {
        (min.x <= max.x && min.y <= max.y).then_some(Self { min, max })
    }

    /// The degenerate (0,0)-(0,0) box used for maps without positions
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center of the box
    #[inline]
    pub fn centroid(&self) -> Position {
        Position::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    #[inline]
    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Running min/max accumulator
#[derive(Debug, Clone)]
pub struct BoundsAccumulator {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    /// Number of points sampled
    sample_count: usize,
}

impl BoundsAccumulator {
    /// Create new accumulator initialized to invalid state
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            min_y: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
            sample_count: 0,
        }
    }

    /// Check if at least one point was added
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, p: Position) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
        self.sample_count += 1;
    }

    pub fn extend<I: IntoIterator<Item = Position>>(&mut self, points: I) {
        for p in points {
            self.expand(p);
        }
    }

    /// Finished bounds, `None` if no point was sampled
    pub fn finish(&self) -> Option<Bounds> {
        if !self.is_valid() {
            return None;
        }
        Some(Bounds {
            min: Position::new(self.min_x, self.min_y),
            max: Position::new(self.max_x, self.max_y),
        })
    }
}

impl Default for BoundsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulate every position of every entity kind
///
/// Header `minPos`/`maxPos` are declarations, not entity positions, and are
/// not sampled.
pub fn scan_map_bounds(data: &SmapData) -> BoundsAccumulator {
    let mut acc = BoundsAccumulator::new();
    acc.extend(data.normal_points().iter().copied());
    acc.extend(data.reflector_points().iter().map(|r| r.position));
    for line in data.normal_lines() {
        acc.expand(line.start);
        acc.expand(line.end);
    }
    acc.extend(data.advanced_points().iter().map(|p| p.position));
    for line in data.advanced_lines() {
        acc.expand(line.start);
        acc.expand(line.end);
    }
    for curve in data.advanced_curves() {
        acc.extend(curve.control_points.iter().copied());
    }
    for area in data.advanced_areas() {
        acc.extend(area.vertices.iter().copied());
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_creation() {
        let acc = BoundsAccumulator::new();
        assert!(!acc.is_valid());
        assert!(acc.finish().is_none());
    }

    #[test]
    fn test_accumulator_expand() {
        let mut acc = BoundsAccumulator::new();
        acc.expand(Position::new(0.0, 0.0));
        acc.expand(Position::new(10.0, 5.0));
        acc.expand(Position::new(-2.0, 3.0));

        let bounds = acc.finish().unwrap();
        assert_eq!(bounds.min, Position::new(-2.0, 0.0));
        assert_eq!(bounds.max, Position::new(10.0, 5.0));
        assert_eq!(acc.sample_count(), 3);
        assert_eq!(bounds.width(), 12.0);
        assert_eq!(bounds.centroid(), Position::new(4.0, 2.5));
    }

    #[test]
    fn test_single_point_is_degenerate_box() {
        let mut acc = BoundsAccumulator::new();
        acc.expand(Position::new(3.0, 4.0));
        let bounds = acc.finish().unwrap();
        assert_eq!(bounds.min, bounds.max);
        assert!(bounds.contains(Position::new(3.0, 4.0)));
    }

    #[test]
    fn test_inverted_corners_rejected() {
        assert!(Bounds::new(Position::new(1.0, 0.0), Position::new(0.0, 1.0)).is_none());
        assert!(Bounds::new(Position::new(0.0, 0.0), Position::new(0.0, 1.0)).is_some());
        assert_eq!(Bounds::empty().width(), 0.0);
    }
}
