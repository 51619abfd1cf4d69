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
//! Turning an aim gesture into a launched body
//!
//! The driver lets the user drag an aim vector from the launch origin. The
//! launch speed is proportional to the drag length and the direction is the
//! drag direction.

use crate::body::{BodyError, ProjectileBody};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::math::{Point2D, Vector2D};
use thiserror::Error;

/// Standard gravity, m/s², pointing down the y axis
pub const STANDARD_GRAVITY: f64 = -9.81;

/// Errors returned when launching
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaunchError {
    /// The aim vector is too short to give a direction
    #[error("aim vector too short: |aim|={length:.3}, need at least {min}")]
    AimTooShort {
        /// Length of the aim vector
        length: f64,
        /// Configured minimum
        min: f64,
    },

    /// The resulting body is invalid
    #[error(transparent)]
    Body(#[from] BodyError),
}

/// Parameters applied to every launched body
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaunchParams {
    /// Vertical acceleration
    pub gravity: f64,
    /// Restitution of the launched body
    pub restitution: f64,
    /// Radius of the launched body
    pub radius: f64,
    /// Launch speed per unit of aim length
    pub speed_scale: f64,
    /// Shortest aim vector accepted
    pub min_aim_length: f64,
}

impl Default for LaunchParams {
    fn default() -> Self {
        LaunchParams {
            gravity: STANDARD_GRAVITY,
            restitution: 0.95,
            radius: 0.5,
            speed_scale: 3.0,
            min_aim_length: 0.1,
        }
    }
}

/// Launch velocity for an aim vector from `origin` to `aim_head`
///
/// # Errors
///
/// [`LaunchError::AimTooShort`] if the aim is shorter than
/// `params.min_aim_length`.
pub fn aim_velocity(
    origin: Point2D,
    aim_head: Point2D,
    params: &LaunchParams,
) -> Result<Vector2D, LaunchError> {
    let aim = aim_head - origin;
    let length = aim.length();
    if length < params.min_aim_length {
        return Err(LaunchError::AimTooShort {
            length,
            min: params.min_aim_length,
        });
    }
    Ok(aim.normalized() * (length * params.speed_scale))
}

/// Launch a body that logs diagnostics through `tracing`
///
/// # Examples
///
/// ```
/// use projectile::launch::{launch_from_aim, LaunchParams};
/// use projectile::math::{Point2D, Vector2D};
///
/// let ball = launch_from_aim(Point2D::ORIGIN, Point2D::new(2.0, 0.0), &LaunchParams::default())?;
/// assert_eq!(ball.velocity(), Vector2D::new(6.0, 0.0));
/// assert_eq!(ball.acceleration(), Vector2D::new(0.0, -9.81));
/// # Ok::<(), projectile::launch::LaunchError>(())
/// ```
pub fn launch_from_aim(
    origin: Point2D,
    aim_head: Point2D,
    params: &LaunchParams,
) -> Result<ProjectileBody, LaunchError> {
    launch_from_aim_with_sink(origin, aim_head, params, TracingSink)
}

/// Launch a body that reports diagnostics to `sink`
///
/// # Errors
///
/// [`LaunchError::AimTooShort`] for a short aim, [`LaunchError::Body`] if
/// the parameters give an invalid body.
pub fn launch_from_aim_with_sink<S: DiagnosticSink>(
    origin: Point2D,
    aim_head: Point2D,
    params: &LaunchParams,
    sink: S,
) -> Result<ProjectileBody<S>, LaunchError> {
    let velocity = aim_velocity(origin, aim_head, params)?;
    let mut body = ProjectileBody::with_sink(origin, velocity, params.radius, sink)?;
    body.set_acceleration(Vector2D::new(0.0, params.gravity))?;
    body.set_restitution(params.restitution);
    Ok(body)
}
