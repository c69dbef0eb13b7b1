//! Headless demo driver
//!
//! Runs the swarm in real time against the wall clock and logs what happens,
//! so the simulation can be watched without wiring up a renderer:
//!
//! ```sh
//! RUST_LOG=debug cargo run -- [seed]
//! ```

use std::time::{Duration, Instant};

use logo_swarm::{SimConfig, World, step};

/// Target frame cadence (~60 Hz)
const FRAME: Duration = Duration::from_millis(16);
/// Frames between summary lines
const SUMMARY_EVERY: u64 = 120;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x5EED);

    let mut world = match World::new(SimConfig::default(), seed) {
        Ok(world) => world,
        Err(err) => {
            log::error!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    log::info!(
        "seed {seed}: arena {}x{}, obstacle {}x{}, cap {}",
        world.config.arena_width,
        world.config.arena_height,
        world.config.obstacle_width,
        world.config.obstacle_height,
        world.config.max_logos,
    );

    let start = Instant::now();
    let mut last = start;
    let mut frame: u64 = 0;

    loop {
        std::thread::sleep(FRAME);
        let tick = Instant::now();
        let now_ms = tick.duration_since(start).as_secs_f64() * 1000.0;
        let elapsed_ms = tick.duration_since(last).as_secs_f64() * 1000.0;
        last = tick;

        step(&mut world, now_ms, elapsed_ms);

        frame += 1;
        if frame % SUMMARY_EVERY == 0 {
            let poses = world.poses();
            let top = poses.first();
            log::info!(
                "t={:>6.1}s population={:>2} invincible={} top_scale={:.2}",
                now_ms / 1000.0,
                poses.len(),
                world.invincible_count(),
                top.map(|p| p.scale).unwrap_or(1.0),
            );
        }
    }
}
