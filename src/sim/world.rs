//! Arena state and external command interface
//!
//! The world owns the live logo collection, the fixed arena/obstacle geometry,
//! the seeded RNG, and the spawn clock. Everything that must survive between
//! steps lives here; the step algorithm itself is in [`super::step`].

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::logo::{Logo, SpriteId};
use super::rect::Rect;
use crate::config::{ConfigError, SimConfig};

/// Renderer-facing snapshot of one logo, emitted once per frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pose {
    pub center: Vec2,
    /// Heading angle in radians; renderers rotate the sprite to match
    pub heading: f32,
    /// Render scale (grows with kills)
    pub scale: f32,
    pub invincible: bool,
    pub sprite: SpriteId,
    pub name: Option<String>,
}

/// The complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub config: SimConfig,
    /// Fixed arena bounds, origin at (0, 0)
    pub bounds: Rect,
    /// Fixed obstacle box, centered in the arena
    pub obstacle: Rect,
    /// Live logos; order is insertion order, identity is `Logo::id`
    pub logos: Vec<Logo>,
    pub(crate) rng: Pcg32,
    /// Time of the last successful spawn; gates the global cooldown
    pub(crate) last_spawn: Option<f64>,
    /// Names waiting for a logo to claim them, oldest first
    pub(crate) pending_names: VecDeque<String>,
    next_id: u32,
}

impl World {
    /// Build a world from a validated config, seeding one logo at the classic
    /// start position with the classic start heading.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let bounds = Rect::new(0.0, 0.0, config.arena_width, config.arena_height);
        let obstacle = Rect::new(
            (config.arena_width - config.obstacle_width) / 2.0,
            (config.arena_height - config.obstacle_height) / 2.0,
            config.obstacle_width,
            config.obstacle_height,
        );

        let mut world = Self {
            config,
            bounds,
            obstacle,
            logos: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            last_spawn: None,
            pending_names: VecDeque::new(),
            next_id: 1,
        };

        let rect = Rect::new(
            world.config.arena_width / 4.0,
            world.config.arena_height / 3.0,
            world.config.logo_size,
            world.config.logo_size,
        );
        let vel = Vec2::new(1.0, 0.7).normalize() * world.config.speed;
        let id = world.next_logo_id();
        world
            .logos
            .push(Logo::new(id, rect, vel, SpriteId::BASE, 0.0));

        Ok(world)
    }

    /// Allocate a stable logo id
    pub(crate) fn next_logo_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Random variant sprite for offspring (never the base sprite)
    pub(crate) fn random_variant_sprite(&mut self) -> SpriteId {
        SpriteId(self.rng.random_range(1..=self.config.sprite_variants))
    }

    pub fn population(&self) -> usize {
        self.logos.len()
    }

    pub fn invincible_count(&self) -> usize {
        self.logos.iter().filter(|l| l.is_invincible()).count()
    }

    fn name_exists(&self, name: &str) -> bool {
        self.logos
            .iter()
            .any(|l| l.display_name.as_deref() == Some(name))
    }

    /// Pop the oldest pending name whose holder is not already live.
    pub(crate) fn claim_pending_name(&mut self) -> Option<String> {
        while let Some(name) = self.pending_names.pop_front() {
            if !self.name_exists(&name) {
                return Some(name);
            }
        }
        None
    }

    /// Naming command: claim the first unnamed logo for `name`, or queue the
    /// name for the next spawn. A name already borne by a live logo is a
    /// no-op. Must not be called while a step is in progress.
    pub fn name_logo(&mut self, name: &str) {
        if self.name_exists(name) {
            return;
        }
        if let Some(logo) = self.logos.iter_mut().find(|l| l.display_name.is_none()) {
            log::info!("logo {} claimed by \"{}\"", logo.id, name);
            logo.display_name = Some(name.to_owned());
        } else {
            log::debug!("no unclaimed logo, queueing \"{}\"", name);
            self.pending_names.push_back(name.to_owned());
        }
    }

    /// Teleport command: scatter the named logo to a fresh random position
    /// and heading, exactly like the anomaly valve, leaving invincibility and
    /// kill scale alone. Unknown names are a no-op.
    pub fn teleport_logo(&mut self, name: &str, now: f64) {
        let Some(idx) = self
            .logos
            .iter()
            .position(|l| l.display_name.as_deref() == Some(name))
        else {
            return;
        };
        log::info!("teleporting \"{}\"", name);
        let speed = self.config.speed;
        self.logos[idx].scatter(&mut self.rng, &self.bounds, speed, now);
    }

    /// Per-frame output for the renderer: one pose per live logo, stably
    /// sorted by descending kill scale so big killers draw on top.
    pub fn poses(&self) -> Vec<Pose> {
        let mut poses: Vec<Pose> = self
            .logos
            .iter()
            .map(|l| Pose {
                center: l.rect.center(),
                heading: l.heading(),
                scale: l.kill_scale,
                invincible: l.is_invincible(),
                sprite: l.sprite,
                name: l.display_name.clone(),
            })
            .collect();
        poses.sort_by(|a, b| {
            b.scale
                .partial_cmp(&a.scale)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        poses
    }
}
