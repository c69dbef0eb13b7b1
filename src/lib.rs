//! Logo Swarm - bouncing-logo simulation for stream-starting overlays
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, spawns, kills)
//! - `config`: Tunable simulation parameters with fail-fast validation
//!
//! The simulation is step-driven: an external clock calls [`sim::step`] with a
//! monotonic timestamp and elapsed time, then reads [`sim::World::poses`] to
//! hand entity poses to whatever renderer hosts the overlay. The core never
//! draws, schedules, or loads assets itself.

pub mod config;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use sim::{Logo, Pose, Rect, SpriteId, World, step};

/// Default tuning values (the classic 1080p overlay setup)
pub mod consts {
    /// Arena dimensions in pixels
    pub const ARENA_WIDTH: f32 = 1920.0;
    pub const ARENA_HEIGHT: f32 = 1080.0;

    /// Logo hitbox edge length (logos are square)
    pub const LOGO_SIZE: f32 = 100.0;
    /// Movement speed: px/frame in fixed-frame mode, px/ms in elapsed mode
    pub const SPEED: f32 = 1.0;

    /// Minimum ms between successful spawns, swarm-wide
    pub const GLOBAL_COOLDOWN_MS: f64 = 800.0;
    /// Hard population cap, checked at spawn time
    pub const MAX_LOGOS: usize = 30;
    /// Minimum ms between one logo's spawn-eligible wall bounces
    pub const WALL_BOUNCE_COOLDOWN_MS: f64 = 100.0;
    /// Steps a logo waits after parenting a spawn before it may parent again
    pub const PER_LOGO_BOUNCE_FRAMES: u32 = 30;
    /// Distance from the parent at which offspring appear
    pub const SPAWN_OFFSET: f32 = 10.0;
    /// Newly created logos ignore pairwise contact for this long
    pub const SPAWN_GRACE_MS: f64 = 500.0;

    /// Population required before invincibility can trigger
    pub const INVINCIBLE_MIN_LOGOS: usize = 20;
    /// Maximum simultaneously invincible logos
    pub const MAX_INVINCIBLE_COUNT: usize = 2;
    /// How long invincibility lasts once granted
    pub const INVINCIBLE_DURATION_MS: f64 = 30_000.0;

    /// Obstacle (the overlay's centered text box) dimensions
    pub const OBSTACLE_WIDTH: f32 = 810.0;
    pub const OBSTACLE_HEIGHT: f32 = 105.0;

    /// Direction-flip anomaly valve: this many reversals inside the window
    /// marks a logo as glitched and scatters it
    pub const FLIP_WINDOW_MS: f64 = 1000.0;
    pub const FLIP_THRESHOLD: usize = 8;

    /// How far a wall or obstacle correction pushes a logo back inside
    pub const WALL_PUSHBACK: f32 = 1.0;

    /// Number of variant sprite sets offspring draw from (ids 1..=N; id 0 is
    /// the base sprite reserved for the seed logo)
    pub const SPRITE_VARIANTS: u32 = 8;

    /// Kill reward: the killer's render scale grows by this factor, capped
    pub const KILL_SCALE_STEP: f32 = 1.2;
    pub const KILL_SCALE_MAX: f32 = 5.0;
}
