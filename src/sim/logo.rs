//! The simulated logo entity
//!
//! A logo is a square hitbox moving at constant speed with a handful of timed
//! states hanging off it: a direction-flip history for the anomaly valve, an
//! invincibility deadline, and the per-logo spawn gate.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::rect::{Rect, same_signs};
use crate::consts::{KILL_SCALE_MAX, KILL_SCALE_STEP};

/// Opaque appearance handle. The simulation never interprets it; the renderer
/// maps it to a sprite set. Id 0 is the base sprite of the seed logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpriteId(pub u32);

impl SpriteId {
    pub const BASE: SpriteId = SpriteId(0);
}

/// One bouncing logo
#[derive(Debug, Clone)]
pub struct Logo {
    pub id: u32,
    /// Current hitbox; width/height never change after creation
    pub rect: Rect,
    pub vel: Vec2,
    /// Velocity snapshot taken at the last direction change
    pub prev_vel: Vec2,
    /// Set at creation and on every scatter (anomaly reset, teleport)
    pub spawn_time: f64,
    /// Timestamps of recent sign reversals, pruned to a trailing window
    pub direction_flips: Vec<f64>,
    /// Invincibility deadline; `Some` means currently invincible. Cleared
    /// lazily by the first step that observes `now >= deadline`.
    pub invincible_until: Option<f64>,
    /// Render scale, grown multiplicatively per kill. Never shrinks.
    pub kill_scale: f32,
    pub sprite: SpriteId,
    /// `None` until claimed through the naming command
    pub display_name: Option<String>,
    /// Last spawn-eligible wall bounce (per-logo spawn gate)
    pub last_wall_bounce: Option<f64>,
    /// Steps remaining before this logo may parent another spawn
    pub spawn_refractory: u32,
}

impl Logo {
    pub fn new(id: u32, rect: Rect, vel: Vec2, sprite: SpriteId, spawn_time: f64) -> Self {
        Self {
            id,
            rect,
            vel,
            prev_vel: vel,
            spawn_time,
            direction_flips: Vec::new(),
            invincible_until: None,
            kill_scale: 1.0,
            sprite,
            display_name: None,
            last_wall_bounce: None,
            spawn_refractory: 0,
        }
    }

    /// Heading angle in radians (`atan2(vy, vx)`)
    #[inline]
    pub fn heading(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }

    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.spawn_time
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    /// Clear invincibility once its deadline has passed. Called at the top of
    /// every step so expiry needs no timer.
    pub fn expire_invincibility(&mut self, now: f64) {
        if let Some(deadline) = self.invincible_until
            && now >= deadline
        {
            self.invincible_until = None;
        }
    }

    /// Grant invincibility until `now + duration_ms`. A grant while already
    /// invincible is ignored: the running deadline is never extended.
    pub fn grant_invincibility(&mut self, now: f64, duration_ms: f64) {
        if self.invincible_until.is_none() {
            self.invincible_until = Some(now + duration_ms);
        }
    }

    /// Grow the render scale for a kill, capped.
    pub fn reward_kill(&mut self) {
        self.kill_scale = (self.kill_scale * KILL_SCALE_STEP).min(KILL_SCALE_MAX);
    }

    /// Record a sign reversal against the last snapshot, then drop history
    /// older than the trailing window. Returns the surviving flip count.
    pub fn track_direction_flips(&mut self, now: f64, window_ms: f64) -> usize {
        if !same_signs(self.vel, self.prev_vel) {
            self.direction_flips.push(now);
            self.prev_vel = self.vel;
        }
        self.direction_flips.retain(|&t| now - t < window_ms);
        self.direction_flips.len()
    }

    /// Throw the logo to a uniformly random in-bounds position with a fresh
    /// random heading, clearing its flip history. Used by the anomaly valve
    /// and the teleport command; invincibility and kill scale are untouched.
    pub fn scatter(&mut self, rng: &mut Pcg32, bounds: &Rect, speed: f32, now: f64) {
        self.rect.x = bounds.x + rng.random_range(0.0..bounds.width - self.rect.width);
        self.rect.y = bounds.y + rng.random_range(0.0..bounds.height - self.rect.height);
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        self.vel = Vec2::from_angle(angle) * speed;
        self.prev_vel = self.vel;
        self.direction_flips.clear();
        self.spawn_time = now;
    }
}
