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
//! Displacement vectors in the plane

use std::ops::{Add, Mul, Neg, Sub};

/// Immutable two-component vector with double-precision components
///
/// Supports the usual vector-space operations plus the dot product,
/// length, normalization and reflection about a unit normal.
///
/// # Examples
///
/// ```
/// use projectile::math::Vector2D;
///
/// let v = Vector2D::new(3.0, 4.0);
/// assert_eq!(v.length(), 5.0);
/// assert_eq!(2.0 * v, Vector2D::new(6.0, 8.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2D {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vector2D {
    /// Lengths below this are treated as zero by [`Vector2D::normalized`]
    pub const EPSILON: f64 = 1e-12;

    /// The zero vector
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    /// Create a new vector
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    /// Euclidean length
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Squared length, avoids the square root
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Dot product
    pub fn dot(self, other: Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction
    ///
    /// Returns [`Vector2D::ZERO`] when the length is below
    /// [`Vector2D::EPSILON`] instead of dividing by a near-zero length.
    pub fn normalized(self) -> Vector2D {
        let len = self.length();
        if len < Self::EPSILON {
            return Vector2D::ZERO;
        }
        (1.0 / len) * self
    }

    /// Reflect this vector about the unit normal `normal`
    ///
    /// Computes `v - 2 (v·n) n`. The normal must already have unit length;
    /// a non-unit normal gives a result of the wrong magnitude.
    pub fn reflect(self, normal: Vector2D) -> Vector2D {
        let vn = self.dot(normal);
        self - (2.0 * vn) * normal
    }

    /// Check if both components are finite (not NaN or infinite)
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2D {
    type Output = Vector2D;

    fn neg(self) -> Vector2D {
        Vector2D::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;

    fn mul(self, s: f64) -> Vector2D {
        Vector2D::new(self.x * s, self.y * s)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;

    fn mul(self, v: Vector2D) -> Vector2D {
        v * self
    }
}

impl std::fmt::Display for Vector2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        super::write_pair(f, self.x, self.y)
    }
}
