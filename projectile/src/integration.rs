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
//! Numerical integration for constant-acceleration motion
//!
//! Bodies are advanced with semi-implicit (symplectic) Euler:
//!
//! ```text
//! v(t + dt) = v(t) + a*dt
//! x(t + dt) = x(t) + v(t + dt)*dt
//! ```
//!
//! Updating velocity before position keeps the energy error bounded under
//! constant acceleration, where explicit Euler drifts steadily upward.
//! The scheme is first-order accurate; large frame spikes are bounded by
//! clamping the timestep (see [`clamp_timestep`]).

use crate::math::{Point2D, Vector2D};

/// Largest timestep a single step may consume, in seconds (20 Hz)
pub const MAX_TIMESTEP: f64 = 0.05;

/// Apply the step guards to a driver-supplied `dt`
///
/// Returns `None` for `dt <= 0` (stalled or non-monotonic clocks) and
/// otherwise `dt` limited to `max_dt`. A NaN `dt` passes through unchanged
/// so that the finite-state check downstream rejects it.
///
/// # Examples
///
/// ```
/// use projectile::integration::{clamp_timestep, MAX_TIMESTEP};
///
/// assert_eq!(clamp_timestep(1.0, MAX_TIMESTEP), Some(0.05));
/// assert_eq!(clamp_timestep(0.016, MAX_TIMESTEP), Some(0.016));
/// assert_eq!(clamp_timestep(-1.0, MAX_TIMESTEP), None);
/// ```
pub fn clamp_timestep(dt: f64, max_dt: f64) -> Option<f64> {
    if dt <= 0.0 {
        return None;
    }
    if dt > max_dt {
        Some(max_dt)
    } else {
        Some(dt)
    }
}

/// One semi-implicit Euler step
///
/// Returns the new `(position, velocity)`. The position update uses the
/// already-updated velocity.
pub fn semi_implicit_euler(
    position: Point2D,
    velocity: Vector2D,
    acceleration: Vector2D,
    dt: f64,
) -> (Point2D, Vector2D) {
    let velocity = velocity + acceleration * dt;
    let position = position + velocity * dt;
    (position, velocity)
}

/// Kinetic energy per unit mass
///
/// KE/m = 0.5 * v²
pub fn specific_kinetic_energy(velocity: Vector2D) -> f64 {
    0.5 * velocity.length_squared()
}

/// Mechanical energy per unit mass in a uniform acceleration field
///
/// The potential is measured from the origin, so for `a = (0, -g)` this is
/// `0.5 * v² + g * y`.
pub fn specific_mechanical_energy(
    position: Point2D,
    velocity: Vector2D,
    acceleration: Vector2D,
) -> f64 {
    specific_kinetic_energy(velocity) - acceleration.dot(position - Point2D::ORIGIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_timestep() {
        assert_eq!(clamp_timestep(0.0, MAX_TIMESTEP), None);
        assert_eq!(clamp_timestep(-1.0, MAX_TIMESTEP), None);
        assert_eq!(clamp_timestep(0.05, MAX_TIMESTEP), Some(0.05));
        assert_eq!(clamp_timestep(f64::INFINITY, MAX_TIMESTEP), Some(0.05));
        assert!(clamp_timestep(f64::NAN, MAX_TIMESTEP).unwrap().is_nan());
    }

    #[test]
    fn test_velocity_updated_before_position() {
        let dt = 0.1;
        let (p, v) = semi_implicit_euler(
            Point2D::ORIGIN,
            Vector2D::ZERO,
            Vector2D::new(0.0, -10.0),
            dt,
        );
        assert_eq!(v, Vector2D::new(0.0, -10.0 * dt));
        // Explicit Euler would leave the position at the origin here
        assert_eq!(p, Point2D::new(0.0, -10.0 * dt * dt));
    }

    #[test]
    fn test_zero_acceleration_is_uniform_motion() {
        let (p, v) = semi_implicit_euler(
            Point2D::new(1.0, 1.0),
            Vector2D::new(2.0, -1.0),
            Vector2D::ZERO,
            0.5,
        );
        assert_eq!(v, Vector2D::new(2.0, -1.0));
        assert_eq!(p, Point2D::new(2.0, 0.5));
    }

    #[test]
    fn test_specific_energy() {
        let g = Vector2D::new(0.0, -9.81);
        let e = specific_mechanical_energy(Point2D::new(0.0, 2.0), Vector2D::new(3.0, 4.0), g);
        assert!((e - (12.5 + 9.81 * 2.0)).abs() < 1e-12);
        assert_eq!(specific_kinetic_energy(Vector2D::new(3.0, 4.0)), 12.5);
    }
}
