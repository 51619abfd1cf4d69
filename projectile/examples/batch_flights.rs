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
//! Batch Flights Example
//!
//! Steps many independent balls in a box with `step_all`, resolving ground
//! and wall contacts per ball after every batch step. Shows:
//!
//! - Deterministic random launches
//! - Kinetic energy decay from inelastic bounces
//! - Parallel stepping with Rayon
//!
//! # Running
//!
//! ```bash
//! cargo run --example batch_flights --release
//! cargo run --example batch_flights --release -- --balls 100000
//! ```

use projectile::batch::{step_all, total_kinetic_energy};
use projectile::contact::Surface;
use projectile::diagnostics::NullSink;
use projectile::math::{Point2D, Vector2D};
use projectile::ProjectileBody;
use std::time::Instant;

/// Linear congruential generator, enough for reproducible launches
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 11) as f64 / 9007199254740992.0
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn main() {
    println!("Batch Flights");
    println!("=============\n");

    let args: Vec<String> = std::env::args().collect();
    let count = match args.iter().position(|a| a == "--balls") {
        Some(i) => match args.get(i + 1).map(|s| s.parse::<usize>()) {
            Some(Ok(value)) => value,
            _ => {
                eprintln!("Warning: Invalid --balls, using default 1000");
                1000
            }
        },
        None => 1000,
    };

    let surfaces = [
        Surface::ground(0.0),
        Surface::left_wall(-20.0),
        Surface::right_wall(20.0),
    ];

    let mut rng = SimpleRng::new(42);
    let mut bodies: Vec<ProjectileBody<NullSink>> = (0..count)
        .map(|_| {
            let position = Point2D::new(rng.range(-19.0, 19.0), rng.range(0.5, 10.0));
            let velocity = Vector2D::new(rng.range(-10.0, 10.0), rng.range(0.0, 15.0));
            let mut ball = ProjectileBody::with_sink(position, velocity, 0.5, NullSink)
                .expect("random launch is finite");
            ball.set_acceleration(Vector2D::new(0.0, -9.81))
                .expect("gravity is finite");
            ball.set_restitution(rng.range(0.6, 0.95));
            ball
        })
        .collect();

    #[cfg(feature = "parallel")]
    println!("Stepping {} balls in parallel", count);
    #[cfg(not(feature = "parallel"))]
    println!("Stepping {} balls sequentially", count);

    let dt = 0.016;
    let frames = 600;
    let start = Instant::now();
    println!("\n{:>6}  {:>16}", "frame", "kinetic energy");

    for frame in 0..frames {
        if let Err(err) = step_all(&mut bodies, dt) {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
        for ball in &mut bodies {
            for surface in &surfaces {
                if let Some(contact) = surface.contact_with(ball) {
                    if let Err(err) = contact.resolve(ball) {
                        eprintln!("Error: {}", err);
                        std::process::exit(1);
                    }
                }
            }
        }
        if frame % 100 == 0 {
            println!("{:>6}  {:>16.3}", frame, total_kinetic_energy(&bodies));
        }
    }

    let elapsed = start.elapsed();
    println!(
        "\n{} frames in {:.2?} ({:.1} ns per ball-step)",
        frames,
        elapsed,
        elapsed.as_nanos() as f64 / (frames as f64 * count.max(1) as f64)
    );
    println!("\nExample completed successfully!");
}
