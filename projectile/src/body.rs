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
//! Single projectile body
//!
//! A [`ProjectileBody`] is a point mass with a radius. It is advanced by
//! [`ProjectileBody::step`] and reacts to contacts found by its driver
//! through [`ProjectileBody::bounce`] and [`ProjectileBody::depenetrate`].
//! The body does no collision detection of its own.
//!
//! # Finite-state invariant
//!
//! Position, velocity and acceleration always have finite components.
//! Every mutating operation builds the candidate state first and only
//! commits it if the invariant holds; otherwise it returns
//! [`BodyError::InvalidState`] and the body keeps its previous state. A
//! non-finite state means a defect in the caller (a NaN timestep, a
//! degenerate normal), so drivers should treat this error as fatal for the
//! flight rather than retry.

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::integration::{clamp_timestep, semi_implicit_euler, MAX_TIMESTEP};
use crate::math::{Point2D, Vector2D};
use thiserror::Error;

/// Default push-out bias added to every depenetration, in world units
pub const DEPENETRATION_BIAS: f64 = 1e-6;

/// Default allowed deviation of a bounce normal from unit length
pub const NORMAL_TOLERANCE: f64 = 1e-3;

/// Errors returned by body operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyError {
    /// An operation would leave a non-finite component in the state
    #[error("body state invalid: pos={position} vel={velocity} acc={acceleration}")]
    InvalidState {
        /// Candidate position
        position: Point2D,
        /// Candidate velocity
        velocity: Vector2D,
        /// Candidate acceleration
        acceleration: Vector2D,
    },

    /// The radius was zero, negative or not finite
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// A bounce normal was rejected under [`NormalPolicy::Reject`]
    #[error("normal not unit: |n|={length:.3}")]
    NonUnitNormal {
        /// Measured length of the normal
        length: f64,
    },
}

/// Errors returned when a [`BodyConfig`] is built from raw values
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// The max timestep was non-positive, NaN, or infinite
    #[error("max timestep must be positive and finite, got {0}")]
    InvalidMaxTimestep(f64),

    /// The depenetration bias was negative or not finite
    #[error("depenetration bias must be non-negative and finite, got {0}")]
    InvalidDepenetrationBias(f64),

    /// The normal tolerance was negative or not finite
    #[error("normal tolerance must be non-negative and finite, got {0}")]
    InvalidNormalTolerance(f64),
}

/// What `bounce` does with a normal that is not unit length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NormalPolicy {
    /// Report a diagnostic and reflect anyway
    #[default]
    Warn,
    /// Return [`BodyError::NonUnitNormal`] and leave the velocity unchanged
    Reject,
}

/// Tunable constants for a body
///
/// # Examples
///
/// ```
/// use projectile::body::{BodyConfig, NormalPolicy};
///
/// let config = BodyConfig::new(1.0 / 30.0).with_normal_policy(NormalPolicy::Reject);
/// assert_eq!(config.max_timestep(), 1.0 / 30.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BodyConfig {
    max_timestep: f64,
    depenetration_bias: f64,
    normal_tolerance: f64,
    normal_policy: NormalPolicy,
}

impl BodyConfig {
    /// Create a config with the given step clamp and default everything else
    ///
    /// # Panics
    ///
    /// Panics if `max_timestep` is non-positive, NaN, or infinite. For
    /// fallible construction, use `try_new`.
    pub fn new(max_timestep: f64) -> Self {
        assert!(
            max_timestep > 0.0 && max_timestep.is_finite(),
            "Max timestep must be positive and finite"
        );
        BodyConfig {
            max_timestep,
            ..BodyConfig::default()
        }
    }

    /// Try to create a config with the given step clamp
    ///
    /// Returns `None` if `max_timestep` is non-positive, NaN, or infinite.
    pub fn try_new(max_timestep: f64) -> Option<Self> {
        if max_timestep > 0.0 && max_timestep.is_finite() {
            Some(BodyConfig::new(max_timestep))
        } else {
            None
        }
    }

    /// Build a config from every field, rejecting values the builders
    /// would otherwise clamp
    ///
    /// # Errors
    ///
    /// [`ConfigError`] naming the first invalid field.
    pub fn from_parts(
        max_timestep: f64,
        depenetration_bias: f64,
        normal_tolerance: f64,
        normal_policy: NormalPolicy,
    ) -> Result<Self, ConfigError> {
        if !(max_timestep > 0.0 && max_timestep.is_finite()) {
            return Err(ConfigError::InvalidMaxTimestep(max_timestep));
        }
        if !(depenetration_bias >= 0.0 && depenetration_bias.is_finite()) {
            return Err(ConfigError::InvalidDepenetrationBias(depenetration_bias));
        }
        if !(normal_tolerance >= 0.0 && normal_tolerance.is_finite()) {
            return Err(ConfigError::InvalidNormalTolerance(normal_tolerance));
        }
        Ok(BodyConfig {
            max_timestep,
            depenetration_bias,
            normal_tolerance,
            normal_policy,
        })
    }

    /// Set the non-unit normal policy
    pub fn with_normal_policy(mut self, policy: NormalPolicy) -> Self {
        self.normal_policy = policy;
        self
    }

    /// Set the tolerance on bounce normal length
    pub fn with_normal_tolerance(mut self, tolerance: f64) -> Self {
        self.normal_tolerance = tolerance.abs();
        self
    }

    /// Set the depenetration bias
    pub fn with_depenetration_bias(mut self, bias: f64) -> Self {
        self.depenetration_bias = bias.max(0.0);
        self
    }

    /// Largest timestep consumed by one step
    pub fn max_timestep(&self) -> f64 {
        self.max_timestep
    }

    /// Extra distance added to every depenetration
    pub fn depenetration_bias(&self) -> f64 {
        self.depenetration_bias
    }

    /// Allowed deviation of a bounce normal from unit length
    pub fn normal_tolerance(&self) -> f64 {
        self.normal_tolerance
    }

    /// Non-unit normal policy
    pub fn normal_policy(&self) -> NormalPolicy {
        self.normal_policy
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        BodyConfig {
            max_timestep: MAX_TIMESTEP,
            depenetration_bias: DEPENETRATION_BIAS,
            normal_tolerance: NORMAL_TOLERANCE,
            normal_policy: NormalPolicy::Warn,
        }
    }
}

// Deserialized configs go through `from_parts` like hand-built ones
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BodyConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            max_timestep: f64,
            depenetration_bias: f64,
            normal_tolerance: f64,
            normal_policy: NormalPolicy,
        }

        let raw = Raw::deserialize(deserializer)?;
        BodyConfig::from_parts(
            raw.max_timestep,
            raw.depenetration_bias,
            raw.normal_tolerance,
            raw.normal_policy,
        )
        .map_err(serde::de::Error::custom)
    }
}

/// One simulated ball: kinematic state plus radius and restitution
///
/// The body is exclusively owned by the loop that drives it. It is created
/// for a flight, mutated in place, and dropped when the flight is reset.
///
/// # Examples
///
/// ```
/// use projectile::body::ProjectileBody;
/// use projectile::math::{Point2D, Vector2D};
///
/// let mut ball = ProjectileBody::new(Point2D::ORIGIN, Vector2D::new(10.0, 10.0), 0.5)?;
/// ball.set_acceleration(Vector2D::new(0.0, -9.81))?;
/// ball.set_restitution(0.95);
///
/// ball.step(1.0 / 60.0)?;
/// assert!(ball.position().y > 0.0);
/// # Ok::<(), projectile::body::BodyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProjectileBody<S = TracingSink> {
    position: Point2D,
    velocity: Vector2D,
    acceleration: Vector2D,
    radius: f64,
    restitution: f64,
    config: BodyConfig,
    sink: S,
}

impl ProjectileBody<TracingSink> {
    /// Create a body that reports diagnostics through `tracing`
    ///
    /// Acceleration starts at zero and restitution at 1.0.
    ///
    /// # Errors
    ///
    /// [`BodyError::InvalidRadius`] for a radius that is not positive and
    /// finite, [`BodyError::InvalidState`] for a non-finite position or
    /// velocity.
    pub fn new(position: Point2D, velocity: Vector2D, radius: f64) -> Result<Self, BodyError> {
        ProjectileBody::with_sink(position, velocity, radius, TracingSink)
    }
}

impl<S: DiagnosticSink> ProjectileBody<S> {
    /// Create a body that reports diagnostics to `sink`
    ///
    /// # Errors
    ///
    /// Same as [`ProjectileBody::new`].
    pub fn with_sink(
        position: Point2D,
        velocity: Vector2D,
        radius: f64,
        sink: S,
    ) -> Result<Self, BodyError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(BodyError::InvalidRadius(radius));
        }
        let acceleration = Vector2D::ZERO;
        check_finite(position, velocity, acceleration)?;

        Ok(ProjectileBody {
            position,
            velocity,
            acceleration,
            radius,
            restitution: 1.0,
            config: BodyConfig::default(),
            sink,
        })
    }

    /// Replace the body's config
    pub fn with_config(mut self, config: BodyConfig) -> Self {
        self.config = config;
        self
    }

    /// Current position
    pub fn position(&self) -> Point2D {
        self.position
    }

    /// Current velocity
    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    /// Constant acceleration applied every step
    pub fn acceleration(&self) -> Vector2D {
        self.acceleration
    }

    /// Radius, used by drivers for contact detection
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Fraction of velocity kept by a bounce
    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    /// Magnitude of the velocity
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Body config
    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    /// Diagnostic sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable diagnostic sink, e.g. to drain a [`RecordingSink`]
    ///
    /// [`RecordingSink`]: crate::diagnostics::RecordingSink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Set the constant acceleration (e.g. gravity)
    ///
    /// # Errors
    ///
    /// [`BodyError::InvalidState`] if `acceleration` is not finite.
    pub fn set_acceleration(&mut self, acceleration: Vector2D) -> Result<(), BodyError> {
        self.commit(self.position, self.velocity, acceleration)
    }

    /// Set the restitution coefficient
    ///
    /// Values outside `[0, 1]` are accepted; values above 1 add energy on
    /// every bounce.
    pub fn set_restitution(&mut self, restitution: f64) {
        self.restitution = restitution;
    }

    /// Override position and velocity, e.g. when a driver resets a flight
    ///
    /// # Errors
    ///
    /// [`BodyError::InvalidState`] if either value is not finite.
    pub fn set_state(&mut self, position: Point2D, velocity: Vector2D) -> Result<(), BodyError> {
        self.commit(position, velocity, self.acceleration)
    }

    /// Advance the body by `dt` seconds with semi-implicit Euler
    ///
    /// `dt <= 0` is a no-op. `dt` above the configured max timestep
    /// (0.05 s by default) is clamped to it.
    ///
    /// # Errors
    ///
    /// [`BodyError::InvalidState`] if the step produces a non-finite state,
    /// e.g. for a NaN `dt`.
    pub fn step(&mut self, dt: f64) -> Result<(), BodyError> {
        let dt = match clamp_timestep(dt, self.config.max_timestep) {
            Some(dt) => dt,
            None => return Ok(()),
        };

        let (position, velocity) =
            semi_implicit_euler(self.position, self.velocity, self.acceleration, dt);
        self.commit(position, velocity, self.acceleration)
    }

    /// Reflect the velocity about the surface normal and scale it by the
    /// restitution
    ///
    /// `normal` is the outward unit normal of the contacted surface. A
    /// normal whose length differs from 1 by more than the configured
    /// tolerance is reported to the sink, or rejected under
    /// [`NormalPolicy::Reject`].
    ///
    /// # Errors
    ///
    /// [`BodyError::NonUnitNormal`] under [`NormalPolicy::Reject`],
    /// [`BodyError::InvalidState`] if the result is not finite.
    pub fn bounce(&mut self, normal: Vector2D) -> Result<(), BodyError> {
        let length = normal.length();
        if !((length - 1.0).abs() <= self.config.normal_tolerance) {
            match self.config.normal_policy {
                NormalPolicy::Warn => self.sink.report(Diagnostic::NonUnitNormal { length }),
                NormalPolicy::Reject => return Err(BodyError::NonUnitNormal { length }),
            }
        }

        let velocity = self.velocity.reflect(normal) * self.restitution;
        self.commit(self.position, velocity, self.acceleration)
    }

    /// Push the body out of a surface along its normal
    ///
    /// Moves the position by `normal * (penetration + bias)`. A
    /// non-positive `penetration` is a no-op.
    ///
    /// # Errors
    ///
    /// [`BodyError::InvalidState`] if the result is not finite.
    pub fn depenetrate(&mut self, normal: Vector2D, penetration: f64) -> Result<(), BodyError> {
        if penetration <= 0.0 {
            return Ok(());
        }
        let position = self.position + normal * (penetration + self.config.depenetration_bias);
        self.commit(position, self.velocity, self.acceleration)
    }

    fn commit(
        &mut self,
        position: Point2D,
        velocity: Vector2D,
        acceleration: Vector2D,
    ) -> Result<(), BodyError> {
        check_finite(position, velocity, acceleration)?;
        self.position = position;
        self.velocity = velocity;
        self.acceleration = acceleration;
        Ok(())
    }
}

fn check_finite(
    position: Point2D,
    velocity: Vector2D,
    acceleration: Vector2D,
) -> Result<(), BodyError> {
    if position.is_finite() && velocity.is_finite() && acceleration.is_finite() {
        Ok(())
    } else {
        Err(BodyError::InvalidState {
            position,
            velocity,
            acceleration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;

    fn recording_body(position: Point2D, velocity: Vector2D) -> ProjectileBody<RecordingSink> {
        ProjectileBody::with_sink(position, velocity, 0.5, RecordingSink::new()).unwrap()
    }

    #[test]
    fn test_creation_defaults() {
        let body = ProjectileBody::new(Point2D::new(1.0, 2.0), Vector2D::new(3.0, 4.0), 0.5).unwrap();
        assert_eq!(body.position(), Point2D::new(1.0, 2.0));
        assert_eq!(body.velocity(), Vector2D::new(3.0, 4.0));
        assert_eq!(body.acceleration(), Vector2D::ZERO);
        assert_eq!(body.radius(), 0.5);
        assert_eq!(body.restitution(), 1.0);
        assert_eq!(body.speed(), 5.0);
        assert_eq!(body.config(), &BodyConfig::default());
    }

    #[test]
    fn test_creation_rejects_bad_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = ProjectileBody::new(Point2D::ORIGIN, Vector2D::ZERO, radius);
            assert!(matches!(result, Err(BodyError::InvalidRadius(_))), "radius {radius}");
        }
    }

    #[test]
    fn test_creation_rejects_non_finite_state() {
        let result = ProjectileBody::new(Point2D::new(f64::NAN, 0.0), Vector2D::ZERO, 0.5);
        assert!(matches!(result, Err(BodyError::InvalidState { .. })));

        let result = ProjectileBody::new(Point2D::ORIGIN, Vector2D::new(0.0, f64::INFINITY), 0.5);
        assert!(matches!(result, Err(BodyError::InvalidState { .. })));
    }

    #[test]
    fn test_invalid_state_message_names_values() {
        let err = ProjectileBody::new(Point2D::new(f64::NAN, 1.0), Vector2D::new(2.0, 3.0), 0.5)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "body state invalid: pos=(NaN, 1) vel=(2, 3) acc=(0, 0)"
        );
    }

    #[test]
    fn test_step_non_positive_is_noop() {
        let mut body = recording_body(Point2D::new(1.0, 1.0), Vector2D::new(1.0, 0.0));
        body.set_acceleration(Vector2D::new(0.0, -9.81)).unwrap();

        body.step(0.0).unwrap();
        body.step(-1.0).unwrap();

        assert_eq!(body.position(), Point2D::new(1.0, 1.0));
        assert_eq!(body.velocity(), Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn test_step_nan_dt_fails_and_keeps_state() {
        let mut body = recording_body(Point2D::ORIGIN, Vector2D::new(1.0, 0.0));
        let result = body.step(f64::NAN);
        assert!(matches!(result, Err(BodyError::InvalidState { .. })));
        assert_eq!(body.position(), Point2D::ORIGIN);
        assert_eq!(body.velocity(), Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn test_step_respects_configured_clamp() {
        let config = BodyConfig::new(0.01);
        let mut body = recording_body(Point2D::ORIGIN, Vector2D::new(1.0, 0.0)).with_config(config);
        body.step(1.0).unwrap();
        assert_eq!(body.position(), Point2D::new(0.01, 0.0));
    }

    #[test]
    fn test_set_acceleration_rejects_non_finite() {
        let mut body = recording_body(Point2D::ORIGIN, Vector2D::ZERO);
        let result = body.set_acceleration(Vector2D::new(f64::NAN, 0.0));
        assert!(matches!(result, Err(BodyError::InvalidState { .. })));
        assert_eq!(body.acceleration(), Vector2D::ZERO);
    }

    #[test]
    fn test_set_state() {
        let mut body = recording_body(Point2D::ORIGIN, Vector2D::ZERO);
        body.set_state(Point2D::new(5.0, 5.0), Vector2D::new(-1.0, 2.0)).unwrap();
        assert_eq!(body.position(), Point2D::new(5.0, 5.0));
        assert_eq!(body.velocity(), Vector2D::new(-1.0, 2.0));

        let result = body.set_state(Point2D::ORIGIN, Vector2D::new(f64::NEG_INFINITY, 0.0));
        assert!(result.is_err());
        assert_eq!(body.position(), Point2D::new(5.0, 5.0));
    }

    #[test]
    fn test_bounce_with_restitution() {
        let mut body = recording_body(Point2D::ORIGIN, Vector2D::new(0.0, -10.0));
        body.set_restitution(0.5);
        body.bounce(Vector2D::new(0.0, 1.0)).unwrap();
        assert_eq!(body.velocity(), Vector2D::new(0.0, 5.0));
        assert!(body.sink().diagnostics().is_empty());
    }

    #[test]
    fn test_bounce_non_unit_normal_warns() {
        let mut body = recording_body(Point2D::ORIGIN, Vector2D::new(0.0, -1.0));
        body.bounce(Vector2D::new(0.0, 2.0)).unwrap();

        assert_eq!(
            body.sink().diagnostics(),
            &[Diagnostic::NonUnitNormal { length: 2.0 }]
        );
        // Reflection is still applied, with the wrong magnitude
        assert_eq!(body.velocity(), Vector2D::new(0.0, 7.0));
    }

    #[test]
    fn test_bounce_within_tolerance_is_silent() {
        let mut body = recording_body(Point2D::ORIGIN, Vector2D::new(0.0, -1.0));
        body.bounce(Vector2D::new(0.0, 1.0005)).unwrap();
        assert!(body.sink().diagnostics().is_empty());
    }

    #[test]
    fn test_bounce_reject_policy() {
        let config = BodyConfig::default().with_normal_policy(NormalPolicy::Reject);
        let mut body = recording_body(Point2D::ORIGIN, Vector2D::new(0.0, -1.0)).with_config(config);

        let result = body.bounce(Vector2D::new(0.0, 2.0));
        assert_eq!(result, Err(BodyError::NonUnitNormal { length: 2.0 }));
        assert_eq!(body.velocity(), Vector2D::new(0.0, -1.0));
        assert!(body.sink().diagnostics().is_empty());
    }

    #[test]
    fn test_bounce_nan_normal_fails() {
        let mut body = recording_body(Point2D::ORIGIN, Vector2D::new(0.0, -1.0));
        let result = body.bounce(Vector2D::new(f64::NAN, 1.0));
        assert!(matches!(result, Err(BodyError::InvalidState { .. })));
        assert_eq!(body.sink().diagnostics().len(), 1);
    }

    #[test]
    fn test_depenetrate() {
        let mut body = recording_body(Point2D::ORIGIN, Vector2D::ZERO);
        body.depenetrate(Vector2D::new(0.0, 1.0), 0.0).unwrap();
        body.depenetrate(Vector2D::new(0.0, 1.0), -5.0).unwrap();
        assert_eq!(body.position(), Point2D::ORIGIN);

        body.depenetrate(Vector2D::new(0.0, 1.0), 2.0).unwrap();
        assert_eq!(body.position(), Point2D::new(0.0, 2.0 + 1e-6));
    }

    #[test]
    fn test_depenetrate_keeps_velocity() {
        let mut body = recording_body(Point2D::new(0.0, -0.1), Vector2D::new(3.0, 4.0));
        body.depenetrate(Vector2D::new(0.0, 1.0), 0.1).unwrap();
        assert_eq!(body.velocity(), Vector2D::new(3.0, 4.0));
    }

    #[test]
    #[should_panic(expected = "Max timestep must be positive and finite")]
    fn test_config_zero_timestep_panics() {
        BodyConfig::new(0.0);
    }

    #[test]
    fn test_config_try_new() {
        assert!(BodyConfig::try_new(0.02).is_some());
        assert!(BodyConfig::try_new(-0.02).is_none());
        assert!(BodyConfig::try_new(f64::NAN).is_none());
        assert!(BodyConfig::try_new(f64::INFINITY).is_none());
    }

    #[test]
    fn test_config_from_parts() {
        let config = BodyConfig::from_parts(0.02, 0.0, 0.01, NormalPolicy::Reject).unwrap();
        assert_eq!(config.max_timestep(), 0.02);
        assert_eq!(config.normal_policy(), NormalPolicy::Reject);

        assert_eq!(
            BodyConfig::from_parts(-0.05, 1e-6, 1e-3, NormalPolicy::Warn),
            Err(ConfigError::InvalidMaxTimestep(-0.05))
        );
        assert_eq!(
            BodyConfig::from_parts(0.05, -1.0, 1e-3, NormalPolicy::Warn),
            Err(ConfigError::InvalidDepenetrationBias(-1.0))
        );
        assert_eq!(
            BodyConfig::from_parts(0.05, 1e-6, -1e-3, NormalPolicy::Warn),
            Err(ConfigError::InvalidNormalTolerance(-1e-3))
        );
        assert!(BodyConfig::from_parts(f64::INFINITY, 1e-6, 1e-3, NormalPolicy::Warn).is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = BodyConfig::default();
        assert_eq!(config.max_timestep(), 0.05);
        assert_eq!(config.depenetration_bias(), 1e-6);
        assert_eq!(config.normal_tolerance(), 1e-3);
        assert_eq!(config.normal_policy(), NormalPolicy::Warn);
    }
}
