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
//! Stepping many independent bodies
//!
//! Bodies never interact, so a batch step is just a step of each body.
//! With the `parallel` feature the slice is split across the Rayon thread
//! pool; without it the bodies are stepped in order.

use crate::body::{BodyError, ProjectileBody};
use crate::diagnostics::DiagnosticSink;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Step every body by `dt`
///
/// # Errors
///
/// Returns a [`BodyError`] if any body fails its step. Bodies that failed
/// keep their previous state; with the `parallel` feature other bodies may
/// or may not have been stepped when the error is returned.
pub fn step_all<S>(bodies: &mut [ProjectileBody<S>], dt: f64) -> Result<(), BodyError>
where
    S: DiagnosticSink + Send,
{
    #[cfg(feature = "parallel")]
    {
        bodies.par_iter_mut().try_for_each(|body| body.step(dt))
    }

    #[cfg(not(feature = "parallel"))]
    {
        bodies.iter_mut().try_for_each(|body| body.step(dt))
    }
}

/// Total kinetic energy per unit mass across `bodies`
pub fn total_kinetic_energy<S>(bodies: &[ProjectileBody<S>]) -> f64
where
    S: DiagnosticSink,
{
    bodies
        .iter()
        .map(|body| crate::integration::specific_kinetic_energy(body.velocity()))
        .sum()
}
