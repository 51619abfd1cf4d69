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
//! Static surfaces and contact resolution
//!
//! A [`Surface`] is a half-plane `n·p >= offset` with a unit outward normal
//! `n`. A body of radius `r` touches it when the signed distance from its
//! center to the boundary is at most `r`. Contacts are resolved by
//! bouncing (only when the body is moving into the surface) followed by
//! depenetration.

use crate::body::{BodyError, ProjectileBody};
use crate::diagnostics::DiagnosticSink;
use crate::math::{Point2D, Vector2D};

/// An infinite static boundary such as the ground or a wall
///
/// # Examples
///
/// ```
/// use projectile::contact::Surface;
/// use projectile::math::Point2D;
///
/// let ground = Surface::ground(0.0);
/// let contact = ground.contact(Point2D::new(3.0, 0.25), 0.5).unwrap();
/// assert_eq!(contact.penetration(), 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Surface {
    normal: Vector2D,
    offset: f64,
}

impl Surface {
    /// Create a surface from an outward normal and an offset along it
    ///
    /// The normal is normalized here, so callers may pass any non-zero
    /// direction.
    ///
    /// # Panics
    ///
    /// Panics if the normal is zero or not finite, or the offset is not
    /// finite. For fallible construction, use `try_new`.
    pub fn new(normal: Vector2D, offset: f64) -> Self {
        match Surface::try_new(normal, offset) {
            Some(surface) => surface,
            None => panic!("Surface normal must be non-zero and finite"),
        }
    }

    /// Try to create a surface
    ///
    /// Returns `None` if the normal is degenerate or anything is non-finite.
    pub fn try_new(normal: Vector2D, offset: f64) -> Option<Self> {
        if !normal.is_finite() || !offset.is_finite() {
            return None;
        }
        let normal = normal.normalized();
        if normal == Vector2D::ZERO {
            return None;
        }
        Some(Surface { normal, offset })
    }

    /// Horizontal ground at height `y`, open upwards
    pub fn ground(y: f64) -> Self {
        Surface::new(Vector2D::new(0.0, 1.0), y)
    }

    /// Vertical wall at `x`, open towards +x
    pub fn left_wall(x: f64) -> Self {
        Surface::new(Vector2D::new(1.0, 0.0), x)
    }

    /// Vertical wall at `x`, open towards -x
    pub fn right_wall(x: f64) -> Self {
        Surface::new(Vector2D::new(-1.0, 0.0), -x)
    }

    /// Unit outward normal
    pub fn normal(&self) -> Vector2D {
        self.normal
    }

    /// Offset of the boundary along the normal
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Signed distance from `point` to the boundary, positive on the open side
    pub fn signed_distance(&self, point: Point2D) -> f64 {
        self.normal.dot(point - Point2D::ORIGIN) - self.offset
    }

    /// Contact for a disc of `radius` centered at `center`, if it touches
    pub fn contact(&self, center: Point2D, radius: f64) -> Option<Contact> {
        let distance = self.signed_distance(center);
        if distance - radius <= 0.0 {
            Some(Contact {
                normal: self.normal,
                penetration: radius - distance,
            })
        } else {
            None
        }
    }

    /// Contact for `body`, if it touches
    pub fn contact_with<S>(&self, body: &ProjectileBody<S>) -> Option<Contact>
    where
        S: DiagnosticSink,
    {
        self.contact(body.position(), body.radius())
    }
}

// Deserialized surfaces are normalized and checked by `try_new`
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Surface {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            normal: Vector2D,
            offset: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Surface::try_new(raw.normal, raw.offset).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "surface normal must be non-zero and finite, got {} with offset {}",
                raw.normal, raw.offset
            ))
        })
    }
}

/// A detected overlap between a body and a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    normal: Vector2D,
    penetration: f64,
}

impl Contact {
    /// Unit normal pointing out of the surface
    pub fn normal(&self) -> Vector2D {
        self.normal
    }

    /// Overlap depth; zero when exactly touching
    pub fn penetration(&self) -> f64 {
        self.penetration
    }

    /// Check if `velocity` moves further into the surface
    pub fn is_approaching(&self, velocity: Vector2D) -> bool {
        velocity.dot(self.normal) < 0.0
    }

    /// Bounce `body` if it is approaching, then push it out
    ///
    /// Returns whether a bounce was applied.
    ///
    /// # Errors
    ///
    /// Propagates [`BodyError`] from the body.
    pub fn resolve<S>(&self, body: &mut ProjectileBody<S>) -> Result<bool, BodyError>
    where
        S: DiagnosticSink,
    {
        let bounced = self.is_approaching(body.velocity());
        if bounced {
            body.bounce(self.normal)?;
        }
        body.depenetrate(self.normal, self.penetration)?;
        Ok(bounced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;

    fn body_at(position: Point2D, velocity: Vector2D) -> ProjectileBody<NullSink> {
        ProjectileBody::with_sink(position, velocity, 0.5, NullSink).unwrap()
    }

    #[test]
    fn test_ground_distance() {
        let ground = Surface::ground(-1.0);
        assert_eq!(ground.signed_distance(Point2D::new(7.0, 2.0)), 3.0);
        assert_eq!(ground.signed_distance(Point2D::new(0.0, -3.0)), -2.0);
    }

    #[test]
    fn test_walls() {
        let left = Surface::left_wall(-10.0);
        let right = Surface::right_wall(10.0);
        let p = Point2D::new(9.75, 0.0);

        assert_eq!(left.signed_distance(p), 19.75);
        assert_eq!(right.signed_distance(p), 0.25);
        assert!(left.contact(p, 0.5).is_none());

        let contact = right.contact(p, 0.5).unwrap();
        assert_eq!(contact.normal(), Vector2D::new(-1.0, 0.0));
        assert_eq!(contact.penetration(), 0.25);
    }

    #[test]
    fn test_no_contact_above_ground() {
        assert!(Surface::ground(0.0).contact(Point2D::new(0.0, 0.51), 0.5).is_none());
    }

    #[test]
    fn test_touching_is_contact_with_zero_penetration() {
        let contact = Surface::ground(0.0).contact(Point2D::new(0.0, 0.5), 0.5).unwrap();
        assert_eq!(contact.penetration(), 0.0);
    }

    #[test]
    fn test_new_normalizes() {
        let surface = Surface::new(Vector2D::new(0.0, 4.0), 2.0);
        assert_eq!(surface.normal(), Vector2D::new(0.0, 1.0));
    }

    #[test]
    fn test_try_new_rejects_degenerate() {
        assert!(Surface::try_new(Vector2D::ZERO, 0.0).is_none());
        assert!(Surface::try_new(Vector2D::new(f64::NAN, 1.0), 0.0).is_none());
        assert!(Surface::try_new(Vector2D::new(0.0, 1.0), f64::INFINITY).is_none());
    }

    #[test]
    #[should_panic(expected = "Surface normal must be non-zero and finite")]
    fn test_new_zero_normal_panics() {
        Surface::new(Vector2D::ZERO, 0.0);
    }

    #[test]
    fn test_resolve_approaching_bounces_and_lifts() {
        let mut body = body_at(Point2D::new(1.0, 0.25), Vector2D::new(2.0, -4.0));
        let contact = Surface::ground(0.0).contact_with(&body).unwrap();

        assert!(contact.resolve(&mut body).unwrap());
        assert_eq!(body.velocity(), Vector2D::new(2.0, 4.0));
        assert_eq!(body.position().x, 1.0);
        assert!((body.position().y - (0.5 + 1e-6)).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_separating_only_lifts() {
        let mut body = body_at(Point2D::new(0.0, 0.25), Vector2D::new(0.0, 3.0));
        let contact = Surface::ground(0.0).contact_with(&body).unwrap();

        assert!(!contact.resolve(&mut body).unwrap());
        assert_eq!(body.velocity(), Vector2D::new(0.0, 3.0));
        assert!(body.position().y > 0.5);
    }
}
