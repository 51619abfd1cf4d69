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
//! # Projectile
//!
//! Two-dimensional projectile motion for a single ball with a radius:
//! semi-implicit Euler integration under constant acceleration, velocity
//! reflection on contact, and positional depenetration.
//!
//! ## Features
//!
//! - **Value types**: affine [`Point2D`](math::Point2D) and linear
//!   [`Vector2D`](math::Vector2D) with operator arithmetic
//! - **Stable stepping**: timestep clamping and a finite-state check after
//!   every mutation
//! - **Contacts**: static ground and wall surfaces with bounce and
//!   depenetration
//! - **Driver**: a headless launch-to-landing flight loop
//! - **Parallelization**: optional Rayon stepping of independent bodies
//!
//! ## Example
//!
//! ```rust
//! use projectile::body::ProjectileBody;
//! use projectile::contact::Surface;
//! use projectile::math::{Point2D, Vector2D};
//!
//! let mut ball = ProjectileBody::new(Point2D::new(0.0, 1.0), Vector2D::new(2.0, 0.0), 0.5)?;
//! ball.set_acceleration(Vector2D::new(0.0, -9.81))?;
//!
//! let ground = Surface::ground(0.0);
//! for _ in 0..60 {
//!     ball.step(1.0 / 60.0)?;
//!     if let Some(contact) = ground.contact_with(&ball) {
//!         contact.resolve(&mut ball)?;
//!     }
//! }
//! assert!(ball.position().y >= 0.5);
//! # Ok::<(), projectile::body::BodyError>(())
//! ```

#![warn(missing_docs)]

/// Point and vector value types
pub mod math;

/// The simulated body
pub mod body;

/// Timestep guards and the integration kernel
pub mod integration;

/// Injectable diagnostic sinks
pub mod diagnostics;

/// Static surfaces and contact resolution
pub mod contact;

/// Aim-to-launch conversion
pub mod launch;

/// Headless flight driver
pub mod simulation;

/// Batch stepping of independent bodies
pub mod batch;

pub use body::{BodyConfig, BodyError, ConfigError, NormalPolicy, ProjectileBody};
pub use math::{Point2D, Vector2D};
