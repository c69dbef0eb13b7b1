//! Simulation configuration
//!
//! Every tunable the overlay exposes lives here. A config is validated once,
//! when the world is built; the per-step code assumes a valid config and never
//! re-checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// How positions are advanced each step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Integration {
    /// Advance by one frame's worth per step; speed is px/frame
    #[default]
    FixedFrame,
    /// Advance by the externally supplied elapsed time; speed is px/ms
    Elapsed,
}

/// Probability that a wall bounce grants invincibility
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InvincibleChance {
    /// Constant probability per eligible bounce
    Fixed(f64),
    /// `min(population, 100) / 100` - crowded arenas breed monsters
    PopulationScaled,
}

/// Optional gates on invincibility grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvincibleGates {
    /// Minimum live population before any grant is possible
    pub min_population: usize,
    /// Maximum simultaneously invincible logos
    pub max_concurrent: usize,
}

/// Invincibility tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvincibleConfig {
    /// How long a grant lasts, ms; the deadline is fixed at grant time and a
    /// later bounce never extends it
    pub duration_ms: f64,
    pub chance: InvincibleChance,
    /// `None` runs the ungated variant where any bounce may roll
    pub gates: Option<InvincibleGates>,
}

impl Default for InvincibleConfig {
    fn default() -> Self {
        Self {
            duration_ms: INVINCIBLE_DURATION_MS,
            chance: InvincibleChance::PopulationScaled,
            gates: Some(InvincibleGates {
                min_population: INVINCIBLE_MIN_LOGOS,
                max_concurrent: MAX_INVINCIBLE_COUNT,
            }),
        }
    }
}

/// Per-logo spawn gate, optional on top of the global cooldown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerLogoSpawnGate {
    /// Minimum ms between one logo's spawn-eligible wall bounces
    pub wall_bounce_cooldown_ms: f64,
    /// Steps the parent sits out after a successful spawn
    pub refractory_frames: u32,
}

impl Default for PerLogoSpawnGate {
    fn default() -> Self {
        Self {
            wall_bounce_cooldown_ms: WALL_BOUNCE_COOLDOWN_MS,
            refractory_frames: PER_LOGO_BOUNCE_FRAMES,
        }
    }
}

/// Complete simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Obstacle (centered text box) dimensions
    pub obstacle_width: f32,
    pub obstacle_height: f32,

    // === Motion ===
    /// Logo hitbox edge length
    pub logo_size: f32,
    /// Fixed speed magnitude; every logo moves at exactly this speed forever
    pub speed: f32,
    pub integration: Integration,
    /// Steps with less elapsed time than this are cheap no-ops (frame cap);
    /// 0 disables the cap
    pub min_step_ms: f64,

    // === Spawning ===
    pub max_logos: usize,
    pub global_spawn_cooldown_ms: f64,
    /// `None` disables per-logo spawn throttling entirely
    pub per_logo_gate: Option<PerLogoSpawnGate>,
    pub spawn_offset: f32,
    /// Pairwise contact is ignored while either logo is younger than this
    pub spawn_grace_ms: f64,
    /// Offspring draw a sprite id uniformly from `1..=sprite_variants`
    pub sprite_variants: u32,

    // === Invincibility ===
    pub invincible: InvincibleConfig,

    // === Anomaly valve ===
    /// Trailing window over direction reversals, ms
    pub flip_window_ms: f64,
    /// Reversal count within the window that marks a logo as glitched
    pub flip_threshold: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            logo_size: LOGO_SIZE,
            speed: SPEED,
            integration: Integration::FixedFrame,
            min_step_ms: 0.0,
            max_logos: MAX_LOGOS,
            global_spawn_cooldown_ms: GLOBAL_COOLDOWN_MS,
            per_logo_gate: Some(PerLogoSpawnGate::default()),
            spawn_offset: SPAWN_OFFSET,
            spawn_grace_ms: SPAWN_GRACE_MS,
            sprite_variants: SPRITE_VARIANTS,
            invincible: InvincibleConfig::default(),
            flip_window_ms: FLIP_WINDOW_MS,
            flip_threshold: FLIP_THRESHOLD,
        }
    }
}

/// Rejected configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("arena dimensions must be positive and finite, got {width}x{height}")]
    BadArena { width: f32, height: f32 },
    #[error("logo size must be positive and fit the arena, got {0}")]
    BadLogoSize(f32),
    #[error("speed must be positive and finite, got {0}")]
    BadSpeed(f32),
    #[error("obstacle {width}x{height} does not fit the arena")]
    BadObstacle { width: f32, height: f32 },
    #[error("max_logos must be at least 1")]
    BadPopulationCap,
    #[error("cooldown/grace durations must be non-negative and finite")]
    BadDuration,
    #[error("spawn offset must be non-negative and finite, got {0}")]
    BadSpawnOffset(f32),
    #[error("invincibility duration must be positive, got {0}")]
    BadInvincibleDuration(f64),
    #[error("fixed invincibility chance must be within [0, 1], got {0}")]
    BadChance(f64),
    #[error("flip threshold must be at least 2, got {0}")]
    BadFlipThreshold(usize),
    #[error("flip window must be positive, got {0}")]
    BadFlipWindow(f64),
    #[error("sprite_variants must be at least 1")]
    BadSpriteVariants,
}

impl SimConfig {
    /// Validate the whole config, reporting the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite_pos = |v: f32| v.is_finite() && v > 0.0;

        if !finite_pos(self.arena_width) || !finite_pos(self.arena_height) {
            return Err(ConfigError::BadArena {
                width: self.arena_width,
                height: self.arena_height,
            });
        }
        if !finite_pos(self.logo_size)
            || self.logo_size >= self.arena_width
            || self.logo_size >= self.arena_height
        {
            return Err(ConfigError::BadLogoSize(self.logo_size));
        }
        if !finite_pos(self.speed) {
            return Err(ConfigError::BadSpeed(self.speed));
        }
        if !finite_pos(self.obstacle_width)
            || !finite_pos(self.obstacle_height)
            || self.obstacle_width > self.arena_width
            || self.obstacle_height > self.arena_height
        {
            return Err(ConfigError::BadObstacle {
                width: self.obstacle_width,
                height: self.obstacle_height,
            });
        }
        if self.max_logos < 1 {
            return Err(ConfigError::BadPopulationCap);
        }

        let finite_nonneg = |v: f64| v.is_finite() && v >= 0.0;
        let mut durations = vec![
            self.global_spawn_cooldown_ms,
            self.spawn_grace_ms,
            self.min_step_ms,
        ];
        if let Some(gate) = &self.per_logo_gate {
            durations.push(gate.wall_bounce_cooldown_ms);
        }
        if durations.into_iter().any(|d| !finite_nonneg(d)) {
            return Err(ConfigError::BadDuration);
        }
        if !(self.spawn_offset.is_finite() && self.spawn_offset >= 0.0) {
            return Err(ConfigError::BadSpawnOffset(self.spawn_offset));
        }

        if !(self.invincible.duration_ms.is_finite() && self.invincible.duration_ms > 0.0) {
            return Err(ConfigError::BadInvincibleDuration(self.invincible.duration_ms));
        }
        if let InvincibleChance::Fixed(p) = self.invincible.chance {
            if !(0.0..=1.0).contains(&p) || !p.is_finite() {
                return Err(ConfigError::BadChance(p));
            }
        }

        if self.flip_threshold < 2 {
            return Err(ConfigError::BadFlipThreshold(self.flip_threshold));
        }
        if !(self.flip_window_ms.is_finite() && self.flip_window_ms > 0.0) {
            return Err(ConfigError::BadFlipWindow(self.flip_window_ms));
        }
        if self.sprite_variants < 1 {
            return Err(ConfigError::BadSpriteVariants);
        }

        Ok(())
    }
}
