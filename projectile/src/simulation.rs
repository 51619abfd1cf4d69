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
//! Headless single-flight driver
//!
//! [`Simulation`] plays the part of the game loop around one
//! [`ProjectileBody`]: it launches the body from an aim point, feeds it
//! frame deltas, resolves contacts against the ground and any walls, and
//! decides when the flight has landed. Rendering and input stay with the
//! caller, who reads back a [`Frame`] after every advance.
//!
//! ```text
//! Idle --launch--> InFlight --slow ground bounce--> Landed
//!   ^                  |                               |
//!   +------reset-------+---------------reset-----------+
//! ```

use crate::body::{BodyConfig, BodyError, ProjectileBody};
use crate::contact::Surface;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::integration::clamp_timestep;
use crate::launch::{launch_from_aim_with_sink, LaunchError, LaunchParams};
use crate::math::{Point2D, Vector2D};
use tracing::{debug, info};

/// Flight phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No body; waiting for a launch
    #[default]
    Idle,
    /// A body is being simulated
    InFlight,
    /// The body came to rest; it is kept but no longer stepped
    Landed,
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    /// Where bodies are launched from
    pub origin: Point2D,
    /// Parameters for launched bodies
    pub launch: LaunchParams,
    /// Config applied to launched bodies
    pub body: BodyConfig,
    /// Height of the ground surface
    pub ground_y: f64,
    /// A ground bounce slower than this (along the normal) ends the flight
    pub rest_speed: f64,
    /// Total bounces after which the flight ends regardless of speed
    pub max_bounces: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let launch = LaunchParams::default();
        SimulationConfig {
            origin: Point2D::ORIGIN,
            // Body starts resting on the ground
            ground_y: -launch.radius,
            launch,
            body: BodyConfig::default(),
            rest_speed: 1.0,
            max_bounces: 64,
        }
    }
}

/// Snapshot returned by [`Simulation::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Body position after the frame
    pub position: Point2D,
    /// Body velocity after the frame
    pub velocity: Vector2D,
    /// Simulated flight time so far, in seconds
    pub elapsed: f64,
    /// Surfaces touched this frame
    pub contacts: usize,
    /// Whether any bounce happened this frame
    pub bounced: bool,
    /// Phase after the frame
    pub phase: Phase,
}

/// Single-body flight driver
#[derive(Debug)]
pub struct Simulation<S = TracingSink> {
    config: SimulationConfig,
    ground: Surface,
    walls: Vec<Surface>,
    body: Option<ProjectileBody<S>>,
    phase: Phase,
    elapsed: f64,
    bounces: u32,
}

impl Simulation<TracingSink> {
    /// Create a driver whose bodies log diagnostics through `tracing`
    ///
    /// # Panics
    ///
    /// Panics if `config.ground_y` is not finite.
    pub fn new(config: SimulationConfig) -> Self {
        Simulation::with_config(config)
    }

    /// Try to create a driver whose bodies log diagnostics through `tracing`
    ///
    /// Returns `None` under the same conditions as [`Simulation::try_with_config`].
    pub fn try_new(config: SimulationConfig) -> Option<Self> {
        Simulation::try_with_config(config)
    }
}

impl<S: DiagnosticSink + Default> Simulation<S> {
    /// Create a driver whose bodies use a default-constructed `S` sink
    ///
    /// # Panics
    ///
    /// Panics if `config.ground_y` is not finite.
    pub fn with_config(config: SimulationConfig) -> Self {
        assert!(config.ground_y.is_finite(), "Ground height must be finite");
        Simulation::from_ground(Surface::ground(config.ground_y), config)
    }

    /// Try to create a driver whose bodies use a default-constructed `S` sink
    ///
    /// Returns `None` if `config.ground_y` is not finite or
    /// `config.rest_speed` is negative or not finite.
    pub fn try_with_config(config: SimulationConfig) -> Option<Self> {
        if !(config.rest_speed >= 0.0 && config.rest_speed.is_finite()) {
            return None;
        }
        let ground = Surface::try_new(Vector2D::new(0.0, 1.0), config.ground_y)?;
        Some(Simulation::from_ground(ground, config))
    }

    fn from_ground(ground: Surface, config: SimulationConfig) -> Self {
        Simulation {
            ground,
            walls: Vec::new(),
            body: None,
            phase: Phase::Idle,
            elapsed: 0.0,
            bounces: 0,
            config,
        }
    }

    /// Add a wall; walls are resolved after the ground, in insertion order
    pub fn add_wall(&mut self, wall: Surface) {
        self.walls.push(wall);
    }

    /// Driver config
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The body of the current flight, if any
    pub fn body(&self) -> Option<&ProjectileBody<S>> {
        self.body.as_ref()
    }

    /// Mutable body of the current flight, e.g. to drain its sink
    pub fn body_mut(&mut self) -> Option<&mut ProjectileBody<S>> {
        self.body.as_mut()
    }

    /// Simulated time since launch, in seconds
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Bounces since launch
    pub fn bounces(&self) -> u32 {
        self.bounces
    }

    /// Launch a new body towards `aim_head`, replacing any current flight
    ///
    /// # Errors
    ///
    /// [`LaunchError`] if the aim is too short or the body is invalid; the
    /// previous flight is kept in that case.
    pub fn launch(&mut self, aim_head: Point2D) -> Result<(), LaunchError> {
        let body = launch_from_aim_with_sink(
            self.config.origin,
            aim_head,
            &self.config.launch,
            S::default(),
        )?
        .with_config(self.config.body);

        info!(
            velocity = %body.velocity(),
            speed = body.speed(),
            "launching from {}",
            self.config.origin
        );
        self.body = Some(body);
        self.phase = Phase::InFlight;
        self.elapsed = 0.0;
        self.bounces = 0;
        Ok(())
    }

    /// Advance the current flight by `dt` seconds
    ///
    /// Returns `None` unless a flight is in progress. Non-positive `dt` is
    /// ignored by the body but still produces a frame.
    ///
    /// # Errors
    ///
    /// [`BodyError`] from the body. The flight should be reset.
    pub fn advance(&mut self, dt: f64) -> Result<Option<Frame>, BodyError> {
        if self.phase != Phase::InFlight {
            return Ok(None);
        }
        let body = match self.body.as_mut() {
            Some(body) => body,
            None => return Ok(None),
        };

        body.step(dt)?;
        if let Some(dt) = clamp_timestep(dt, body.config().max_timestep()) {
            self.elapsed += dt;
        }

        let mut contacts = 0;
        let mut bounced = false;

        if let Some(contact) = self.ground.contact_with(body) {
            contacts += 1;
            let incoming = -body.velocity().dot(contact.normal());
            if contact.resolve(body)? {
                bounced = true;
                self.bounces += 1;
                debug!(
                    incoming,
                    bounces = self.bounces,
                    "ground bounce at {}",
                    body.position()
                );
                if incoming < self.config.rest_speed || self.bounces >= self.config.max_bounces {
                    info!(
                        elapsed = self.elapsed,
                        bounces = self.bounces,
                        "landed at {}",
                        body.position()
                    );
                    self.phase = Phase::Landed;
                }
            }
        }

        for wall in &self.walls {
            if let Some(contact) = wall.contact_with(body) {
                contacts += 1;
                if contact.resolve(body)? {
                    bounced = true;
                    self.bounces += 1;
                    debug!(bounces = self.bounces, "wall bounce at {}", body.position());
                }
            }
        }

        if self.phase == Phase::InFlight && self.bounces >= self.config.max_bounces {
            info!(bounces = self.bounces, "bounce limit reached");
            self.phase = Phase::Landed;
        }

        Ok(Some(Frame {
            position: body.position(),
            velocity: body.velocity(),
            elapsed: self.elapsed,
            contacts,
            bounced,
            phase: self.phase,
        }))
    }

    /// Drop the current flight and return to [`Phase::Idle`]
    pub fn reset(&mut self) {
        if self.phase != Phase::Idle {
            info!("resetting simulation state");
        }
        self.body = None;
        self.phase = Phase::Idle;
        self.elapsed = 0.0;
        self.bounces = 0;
    }
}
