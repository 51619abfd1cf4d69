// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Locations in the plane

use super::Vector2D;
use std::ops::{Add, Sub};

/// Immutable two-dimensional position
///
/// Points form an affine space over [`Vector2D`]: offsetting a point by a
/// vector gives a point, and the difference of two points is a vector.
///
/// # Examples
///
/// ```
/// use projectile::math::{Point2D, Vector2D};
///
/// let p = Point2D::new(1.0, 1.0) + Vector2D::new(2.0, 0.0);
/// assert_eq!(p - Point2D::ORIGIN, Vector2D::new(3.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point2D {
    /// The origin (0, 0)
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }

    /// Check if both coordinates are finite (not NaN or infinite)
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add<Vector2D> for Point2D {
    type Output = Point2D;

    fn add(self, v: Vector2D) -> Point2D {
        Point2D::new(self.x + v.x, self.y + v.y)
    }
}

impl Sub<Vector2D> for Point2D {
    type Output = Point2D;

    fn sub(self, v: Vector2D) -> Point2D {
        Point2D::new(self.x - v.x, self.y - v.y)
    }
}

impl Sub for Point2D {
    type Output = Vector2D;

    fn sub(self, other: Point2D) -> Vector2D {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }
}

impl std::fmt::Display for Point2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        super::write_pair(f, self.x, self.y)
    }
}
