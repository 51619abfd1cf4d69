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
//! Angry Parabola Example
//!
//! Headless version of the aim-and-launch toy: a ball is launched from the
//! origin towards an aim point, flies under gravity, bounces on the ground
//! (and optionally between two walls) until it comes to rest.
//!
//! # Running
//!
//! ```bash
//! # Default aim
//! cargo run --example angry_parabola
//!
//! # Custom aim point, walls at x = +/-8 and debug logging
//! RUST_LOG=projectile=debug cargo run --example angry_parabola -- --aim 4 2 --walls 8
//!
//! # Irregular frame times (exercises the timestep clamp)
//! cargo run --example angry_parabola -- --jitter
//! ```

use projectile::contact::Surface;
use projectile::math::Point2D;
use projectile::simulation::{Phase, Simulation, SimulationConfig};
use tracing_subscriber::EnvFilter;

struct Options {
    aim: Point2D,
    walls: Option<f64>,
    dt: f64,
    jitter: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            aim: Point2D::new(3.0, 3.0),
            walls: None,
            dt: 0.016,
            jitter: false,
        }
    }
}

fn parse_f64(args: &[String], i: usize, flag: &str) -> f64 {
    match args.get(i).map(|s| s.parse::<f64>()) {
        Some(Ok(value)) => value,
        _ => {
            eprintln!("Error: {} requires a number", flag);
            std::process::exit(1);
        }
    }
}

fn parse_options() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--aim" => {
                let x = parse_f64(&args, i + 1, "--aim");
                let y = parse_f64(&args, i + 2, "--aim");
                options.aim = Point2D::new(x, y);
                i += 3;
            }
            "--walls" => {
                options.walls = Some(parse_f64(&args, i + 1, "--walls").abs());
                i += 2;
            }
            "--dt" => {
                options.dt = parse_f64(&args, i + 1, "--dt");
                i += 2;
            }
            "--jitter" => {
                options.jitter = true;
                i += 1;
            }
            other => {
                eprintln!("Warning: Unknown argument '{}'", other);
                i += 1;
            }
        }
    }
    options
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Angry Parabola - Headless Flight");
    println!("================================\n");

    let options = parse_options();
    let mut sim = Simulation::new(SimulationConfig::default());
    if let Some(x) = options.walls {
        sim.add_wall(Surface::left_wall(-x));
        sim.add_wall(Surface::right_wall(x));
        println!("Walls at x = +/-{}", x);
    }

    if let Err(err) = sim.launch(options.aim) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
    if let Some(body) = sim.body() {
        println!("Aim point:     {}", options.aim);
        println!("Launch speed:  {:.2} m/s", body.speed());
        println!("Launch vector: {}\n", body.velocity());
    }

    // Stalls and spikes a real render loop would produce
    let jitter = [1.0, 1.0, 0.0, 3.0, 1.0, 40.0, 1.0, -0.5];

    println!("{:>6}  {:>8}  {:>18}  {:>18}  {:>7}", "frame", "t (s)", "position", "velocity", "bounces");
    let mut frame_index = 0usize;
    while sim.phase() == Phase::InFlight {
        let dt = if options.jitter {
            options.dt * jitter[frame_index % jitter.len()]
        } else {
            options.dt
        };

        let frame = match sim.advance(dt) {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(err) => {
                eprintln!("Error: {}", err);
                std::process::exit(1);
            }
        };

        if frame_index % 25 == 0 || frame.bounced {
            println!(
                "{:>6}  {:>8.3}  {:>18}  {:>18}  {:>7}",
                frame_index,
                frame.elapsed,
                frame.position.to_string(),
                frame.velocity.to_string(),
                sim.bounces()
            );
        }
        frame_index += 1;
    }

    println!();
    if let Some(body) = sim.body() {
        println!("Landed after {:.2} s and {} bounces", sim.elapsed(), sim.bounces());
        println!("Final position: {}", body.position());
    }

    sim.reset();
    println!("\nExample completed successfully!");
}
