//! Per-step simulation algorithm
//!
//! One call advances the whole swarm: expiry, motion, the anomaly valve, wall
//! and obstacle collision, pairwise contact, then a single commit that applies
//! kills and inserts offspring. Kills and spawns are collected as intents
//! during the scan so the pass never splices the collection it is iterating.

use glam::Vec2;
use rand::Rng;

use super::logo::Logo;
use super::rect::Rect;
use super::world::World;
use crate::config::{Integration, InvincibleChance};
use crate::consts::WALL_PUSHBACK;

/// Which arena axis a wall bounce happened on. When both axes bounce in the
/// same step the y axis wins (walls are checked x then y).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Advance the world by one step.
///
/// `now_ms` is a monotonic timestamp, `elapsed_ms` the time since the previous
/// step. Safe to call every tick: when a frame cap is configured, under-length
/// steps return without touching any state.
pub fn step(world: &mut World, now_ms: f64, elapsed_ms: f64) {
    if elapsed_ms < world.config.min_step_ms {
        return;
    }

    let dt = match world.config.integration {
        Integration::FixedFrame => 1.0,
        Integration::Elapsed => elapsed_ms as f32,
    };

    // Invincibility expiry is a lazy deadline check, not a timer: clear it
    // before anything this step observes the flag.
    for logo in &mut world.logos {
        logo.expire_invincibility(now_ms);
    }

    let count = world.logos.len();
    // Logos scattered by the anomaly valve sit out the rest of this step
    let mut scattered = vec![false; count];
    let mut killed = vec![false; count];
    let mut spawned: Vec<Logo> = Vec::new();

    // --- MOTION, WALLS, OBSTACLE, SPAWN DECISIONS ---
    for i in 0..count {
        let glitched = {
            let logo = &mut world.logos[i];
            logo.rect.x += logo.vel.x * dt;
            logo.rect.y += logo.vel.y * dt;
            if logo.spawn_refractory > 0 {
                logo.spawn_refractory -= 1;
            }
            logo.track_direction_flips(now_ms, world.config.flip_window_ms)
                >= world.config.flip_threshold
        };

        if glitched {
            // Oscillating in a corner or against the obstacle; throw it
            // somewhere fresh instead of letting it buzz forever.
            log::debug!("logo {} glitched, scattering", world.logos[i].id);
            let speed = world.config.speed;
            world.logos[i].scatter(&mut world.rng, &world.bounds, speed, now_ms);
            scattered[i] = true;
            continue;
        }

        let bounce = wall_collision(&mut world.logos[i], &world.bounds);

        // Invincible logos plow straight through the text box
        if !world.logos[i].is_invincible() {
            obstacle_collision(&mut world.logos[i], &world.obstacle);
        }

        if let Some(axis) = bounce {
            maybe_grant_invincibility(world, i, now_ms);

            if spawn_allowed(world, i, now_ms, spawned.len()) {
                let offspring = make_offspring(world, i, axis, now_ms);
                log::debug!(
                    "logo {} spawned logo {} off the {:?} wall",
                    world.logos[i].id,
                    offspring.id,
                    axis
                );
                world.last_spawn = Some(now_ms);
                let refractory = world
                    .config
                    .per_logo_gate
                    .map(|g| g.refractory_frames)
                    .unwrap_or(0);
                let parent = &mut world.logos[i];
                parent.last_wall_bounce = Some(now_ms);
                parent.spawn_refractory = refractory;
                spawned.push(offspring);
            }
        }
    }

    // --- PAIRWISE CONTACT: KILLS AND ELASTIC BOUNCES ---
    // i < j visits each unordered pair exactly once per step.
    for i in 0..count {
        if scattered[i] || killed[i] {
            continue;
        }
        for j in (i + 1)..count {
            if scattered[j] || killed[j] {
                continue;
            }
            // Fresh logos get a grace window before any contact applies
            let grace = world.config.spawn_grace_ms;
            if world.logos[i].age(now_ms) < grace || world.logos[j].age(now_ms) < grace {
                continue;
            }

            let (delta, dist) = world.logos[i].rect.center_delta(&world.logos[j].rect);
            let contact = (world.logos[i].rect.width + world.logos[j].rect.width) / 2.0;
            if dist <= 0.0 || dist >= contact {
                continue;
            }

            let i_invincible = world.logos[i].is_invincible();
            let j_invincible = world.logos[j].is_invincible();

            if i_invincible != j_invincible {
                // Exactly one invincible: the ordinary logo dies
                let (killer, victim) = if i_invincible { (i, j) } else { (j, i) };
                killed[victim] = true;
                world.logos[killer].reward_kill();
                log::debug!(
                    "logo {} killed logo {}",
                    world.logos[killer].id,
                    world.logos[victim].id
                );
                if killed[i] {
                    break;
                }
                continue;
            }

            // Symmetric push-apart, then mirror both velocities about the
            // connecting normal; magnitudes are untouched.
            let normal = delta / dist;
            let push = normal * ((contact - dist) / 2.0);
            let (head, tail) = world.logos.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];
            a.rect.x -= push.x;
            a.rect.y -= push.y;
            b.rect.x += push.x;
            b.rect.y += push.y;
            a.vel = reflect(a.vel, normal);
            b.vel = reflect(b.vel, normal);
        }
    }

    // --- COMMIT ---
    if killed.iter().any(|&k| k) {
        let mut idx = 0;
        world.logos.retain(|_| {
            let keep = !killed[idx];
            idx += 1;
            keep
        });
    }
    if !spawned.is_empty() {
        world.logos.extend(spawned);
        log::debug!("population now {}", world.logos.len());
    }
}

/// Mirror reflection: `v' = v - 2(v·n)n`
#[inline]
fn reflect(vel: Vec2, normal: Vec2) -> Vec2 {
    vel - 2.0 * vel.dot(normal) * normal
}

/// Clamp the logo back inside the arena and reflect the crossed axis.
/// Checked x then y, so a corner hit reports `Axis::Y`.
fn wall_collision(logo: &mut Logo, bounds: &Rect) -> Option<Axis> {
    let mut axis = None;

    if logo.rect.left() <= bounds.left() {
        logo.rect.x = bounds.left() + WALL_PUSHBACK;
        logo.vel.x = -logo.vel.x;
        axis = Some(Axis::X);
    } else if logo.rect.right() >= bounds.right() {
        logo.rect.x = bounds.right() - logo.rect.width - WALL_PUSHBACK;
        logo.vel.x = -logo.vel.x;
        axis = Some(Axis::X);
    }

    if logo.rect.top() <= bounds.top() {
        logo.rect.y = bounds.top() + WALL_PUSHBACK;
        logo.vel.y = -logo.vel.y;
        axis = Some(Axis::Y);
    } else if logo.rect.bottom() >= bounds.bottom() {
        logo.rect.y = bounds.bottom() - logo.rect.height - WALL_PUSHBACK;
        logo.vel.y = -logo.vel.y;
        axis = Some(Axis::Y);
    }

    axis
}

/// Push an overlapping logo out of the obstacle along the axis with the
/// smaller penetration, forcing that velocity component to point away.
fn obstacle_collision(logo: &mut Logo, obstacle: &Rect) {
    if !logo.rect.intersects(obstacle) {
        return;
    }

    let overlap_left = logo.rect.right() - obstacle.left();
    let overlap_right = obstacle.right() - logo.rect.left();
    let overlap_top = logo.rect.bottom() - obstacle.top();
    let overlap_bottom = obstacle.bottom() - logo.rect.top();

    let min_overlap_x = overlap_left.min(overlap_right);
    let min_overlap_y = overlap_top.min(overlap_bottom);

    if min_overlap_x < min_overlap_y {
        if overlap_left < overlap_right {
            logo.rect.x = obstacle.left() - logo.rect.width - WALL_PUSHBACK;
            logo.vel.x = -logo.vel.x.abs();
        } else {
            logo.rect.x = obstacle.right() + WALL_PUSHBACK;
            logo.vel.x = logo.vel.x.abs();
        }
    } else if overlap_top < overlap_bottom {
        logo.rect.y = obstacle.top() - logo.rect.height - WALL_PUSHBACK;
        logo.vel.y = -logo.vel.y.abs();
    } else {
        logo.rect.y = obstacle.bottom() + WALL_PUSHBACK;
        logo.vel.y = logo.vel.y.abs();
    }
}

/// Roll for invincibility after a wall bounce. Already-invincible logos never
/// re-roll (the running deadline must not be extended), and the optional
/// population/concurrency gates apply first.
fn maybe_grant_invincibility(world: &mut World, i: usize, now: f64) {
    if world.logos[i].is_invincible() {
        return;
    }

    let invincible = world.config.invincible;
    let population = world.logos.len();

    if let Some(gates) = invincible.gates {
        if population < gates.min_population {
            return;
        }
        if world.invincible_count() >= gates.max_concurrent {
            return;
        }
    }

    let chance = match invincible.chance {
        InvincibleChance::Fixed(p) => p,
        InvincibleChance::PopulationScaled => population.min(100) as f64 / 100.0,
    };

    if world.rng.random_bool(chance) {
        log::info!("logo {} went invincible", world.logos[i].id);
        world.logos[i].grant_invincibility(now, invincible.duration_ms);
    }
}

/// Spawn gate: population cap (counting spawns already decided this step),
/// global cooldown, and the optional per-logo cooldown/refractory.
fn spawn_allowed(world: &World, i: usize, now: f64, decided_this_step: usize) -> bool {
    if world.logos.len() + decided_this_step >= world.config.max_logos {
        return false;
    }
    if let Some(last) = world.last_spawn
        && now - last < world.config.global_spawn_cooldown_ms
    {
        return false;
    }
    if let Some(gate) = world.config.per_logo_gate {
        let logo = &world.logos[i];
        if logo.spawn_refractory > 0 {
            return false;
        }
        if let Some(last) = logo.last_wall_bounce
            && now - last <= gate.wall_bounce_cooldown_ms
        {
            return false;
        }
    }
    true
}

/// Build the offspring for a successful spawn: heading fanned away from the
/// struck wall, placed a fixed offset from the parent and clamped fully
/// inside, with a random variant sprite and the oldest waiting name.
fn make_offspring(world: &mut World, i: usize, axis: Axis, now: f64) -> Logo {
    use std::f32::consts::{FRAC_PI_2, PI};

    let parent_center = world.logos[i].rect.center();
    let arena_center = world.bounds.center();

    // Inward normal of the wall the parent just hit. Side of arena center
    // tells left from right (or top from bottom); y grows downward.
    let inward = match axis {
        Axis::X if parent_center.x < arena_center.x => 0.0,
        Axis::X => PI,
        Axis::Y if parent_center.y < arena_center.y => FRAC_PI_2,
        Axis::Y => -FRAC_PI_2,
    };
    // Uniform over the inward half-plane, keeping clear of grazing angles
    let fan = world.rng.random_range(0.2..PI - 0.2);
    let angle = inward - FRAC_PI_2 + fan;
    let heading = Vec2::from_angle(angle);

    let size = world.config.logo_size;
    let mut rect = Rect::square_at(parent_center + heading * world.config.spawn_offset, size);
    rect.x = rect.x.clamp(world.bounds.left(), world.bounds.right() - size);
    rect.y = rect.y.clamp(world.bounds.top(), world.bounds.bottom() - size);

    let sprite = world.random_variant_sprite();
    let id = world.next_logo_id();
    let mut logo = Logo::new(id, rect, heading * world.config.speed, sprite, now);
    logo.display_name = world.claim_pending_name();
    logo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InvincibleConfig, SimConfig};
    use crate::sim::logo::SpriteId;
    use proptest::prelude::*;

    /// Config with spawning and invincibility quiet so motion tests see pure
    /// bouncing: one logo allowed, tiny obstacle parked in the center.
    fn motion_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.max_logos = 1;
        config.obstacle_width = 10.0;
        config.obstacle_height = 10.0;
        config
    }

    fn world_with(config: SimConfig) -> World {
        World::new(config, 42).unwrap()
    }

    /// Replace the seed logo with logos at the given positions/velocities,
    /// aged far past the pairwise grace window.
    fn place_logos(world: &mut World, placements: &[(f32, f32, Vec2)]) {
        world.logos.clear();
        for &(x, y, vel) in placements {
            let id = world.next_logo_id();
            let size = world.config.logo_size;
            let mut logo = Logo::new(
                id,
                Rect::new(x, y, size, size),
                vel,
                SpriteId::BASE,
                -100_000.0,
            );
            logo.prev_vel = vel;
            world.logos.push(logo);
        }
    }

    #[test]
    fn test_left_wall_clamps_and_reflects() {
        // Classic setup: 1920x1080, size 100, heading (1, 0.7) normalized.
        // Run until the logo crosses x <= 0; it must come back clamped to 1
        // with the x velocity flipped positive.
        let mut world = world_with(motion_config());
        let mut now = 0.0;
        let mut found = false;
        for _ in 0..10_000 {
            now += 16.0;
            let was_left = world.logos[0].vel.x < 0.0;
            step(&mut world, now, 16.0);
            let logo = &world.logos[0];
            if was_left && logo.vel.x > 0.0 {
                assert_eq!(logo.rect.x, 1.0);
                found = true;
                break;
            }
        }
        assert!(found, "logo never reached the left wall");
    }

    #[test]
    fn test_corner_bounce_clamps_both_axes() {
        let mut world = world_with(motion_config());
        place_logos(&mut world, &[(0.5, 0.5, Vec2::new(-1.0, -1.0))]);
        // Crossed both edges: both components reflect, both clamps apply
        step(&mut world, 16.0, 16.0);
        let logo = &world.logos[0];
        assert_eq!(logo.rect.x, 1.0);
        assert_eq!(logo.rect.y, 1.0);
        assert!(logo.vel.x > 0.0 && logo.vel.y > 0.0);
    }

    #[test]
    fn test_speed_survives_wall_bounce() {
        let mut world = world_with(motion_config());
        let speed = world.config.speed;
        let mut now = 0.0;
        for _ in 0..5_000 {
            now += 16.0;
            step(&mut world, now, 16.0);
            let v = world.logos[0].vel.length();
            assert!((v - speed).abs() < 1e-3, "speed drifted to {v}");
        }
    }

    #[test]
    fn test_obstacle_pushes_out_along_smaller_overlap() {
        let mut world = world_with(SimConfig::default());
        // Overlap the obstacle's left edge by a few pixels, centered
        // vertically: x is the smaller overlap, so the push is leftward.
        let ob = world.obstacle;
        place_logos(
            &mut world,
            &[(ob.left() - 95.0, ob.center_y() - 50.0, Vec2::new(1.0, 0.0))],
        );
        step(&mut world, 16.0, 16.0);

        let logo = &world.logos[0];
        assert_eq!(logo.rect.x, ob.left() - logo.rect.width - 1.0);
        assert!(logo.vel.x < 0.0);
        assert!((logo.vel.length() - world.config.speed).abs() < 1e-4);
    }

    #[test]
    fn test_invincible_logo_ignores_obstacle() {
        let mut world = world_with(SimConfig::default());
        let ob = world.obstacle;
        place_logos(
            &mut world,
            &[(ob.left() - 95.0, ob.center_y() - 50.0, Vec2::new(1.0, 0.0))],
        );
        world.logos[0].invincible_until = Some(f64::MAX);

        step(&mut world, 16.0, 16.0);

        // Just kept moving; no push-out, no sign flip
        let logo = &world.logos[0];
        assert_eq!(logo.rect.x, ob.left() - 94.0);
        assert!(logo.vel.x > 0.0);
    }

    #[test]
    fn test_overlapping_pair_pushed_apart_and_reflected() {
        // Centers 50 apart, well under the 100 contact radius
        let mut world = world_with(SimConfig::default());
        place_logos(
            &mut world,
            &[
                (200.0, 200.0, Vec2::new(1.0, 0.0)),
                (250.0, 200.0, Vec2::new(-1.0, 0.0)),
            ],
        );

        step(&mut world, 16.0, 16.0);

        let (_, dist) = world.logos[0].rect.center_delta(&world.logos[1].rect);
        assert!(dist >= 99.9, "pair not separated, distance {dist}");
        // Head-on along x: both velocities mirror
        assert!(world.logos[0].vel.x < 0.0);
        assert!(world.logos[1].vel.x > 0.0);
    }

    #[test]
    fn test_fresh_pair_is_in_grace_window() {
        let mut world = world_with(SimConfig::default());
        place_logos(
            &mut world,
            &[
                (200.0, 200.0, Vec2::new(1.0, 0.0)),
                (250.0, 200.0, Vec2::new(-1.0, 0.0)),
            ],
        );
        // Recreate them as newborns
        for logo in &mut world.logos {
            logo.spawn_time = 0.0;
        }

        step(&mut world, 100.0, 16.0);

        // Inside the grace window: they drift through each other untouched
        assert!(world.logos[0].vel.x > 0.0);
        assert!(world.logos[1].vel.x < 0.0);
    }

    #[test]
    fn test_invincible_kills_ordinary_on_contact() {
        let mut world = world_with(SimConfig::default());
        place_logos(
            &mut world,
            &[
                (200.0, 200.0, Vec2::new(1.0, 0.0)),
                (250.0, 200.0, Vec2::new(-1.0, 0.0)),
            ],
        );
        let killer_id = world.logos[0].id;
        world.logos[0].invincible_until = Some(f64::MAX);

        step(&mut world, 16.0, 16.0);

        assert_eq!(world.population(), 1);
        let survivor = &world.logos[0];
        assert_eq!(survivor.id, killer_id);
        assert!((survivor.kill_scale - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_invincible_pair_bounces_instead_of_killing() {
        let mut world = world_with(SimConfig::default());
        place_logos(
            &mut world,
            &[
                (200.0, 200.0, Vec2::new(1.0, 0.0)),
                (250.0, 200.0, Vec2::new(-1.0, 0.0)),
            ],
        );
        world.logos[0].invincible_until = Some(f64::MAX);
        world.logos[1].invincible_until = Some(f64::MAX);

        step(&mut world, 16.0, 16.0);

        assert_eq!(world.population(), 2);
        assert_eq!(world.logos[0].kill_scale, 1.0);
        assert_eq!(world.logos[1].kill_scale, 1.0);
    }

    #[test]
    fn test_anomaly_valve_scatters_after_eight_flips() {
        let mut world = world_with(motion_config());
        place_logos(&mut world, &[(800.0, 800.0, Vec2::new(1.0, 0.0))]);
        let logo = &mut world.logos[0];
        // Seven recent reversals on record, and the eighth arrives this step
        logo.direction_flips = (0..7).map(|k| 400.0 + k as f64 * 10.0).collect();
        logo.prev_vel = Vec2::new(-1.0, 0.0);

        step(&mut world, 500.0, 16.0);

        let logo = &world.logos[0];
        assert!(logo.direction_flips.is_empty());
        assert_eq!(logo.spawn_time, 500.0);
        assert!(world.bounds.contains(&logo.rect));
        assert!((logo.vel.length() - world.config.speed).abs() < 1e-4);
    }

    #[test]
    fn test_slow_flips_do_not_trip_the_valve() {
        let mut world = world_with(motion_config());
        place_logos(&mut world, &[(800.0, 800.0, Vec2::new(1.0, 0.0))]);
        // Seven reversals, but all older than the trailing window
        world.logos[0].direction_flips = (0..7).map(|k| k as f64 * 10.0).collect();
        world.logos[0].prev_vel = Vec2::new(-1.0, 0.0);

        step(&mut world, 5_000.0, 16.0);

        let logo = &world.logos[0];
        // The stale entries were pruned; only this step's reversal remains
        assert_eq!(logo.direction_flips.len(), 1);
        assert_eq!(logo.rect.center_y(), 850.0);
    }

    #[test]
    fn test_invincibility_expires_at_deadline() {
        let mut world = world_with(motion_config());
        place_logos(&mut world, &[(800.0, 800.0, Vec2::new(1.0, 0.0))]);
        world.logos[0].invincible_until = Some(1_000.0);

        step(&mut world, 999.0, 16.0);
        assert!(world.logos[0].is_invincible());

        step(&mut world, 1_000.0, 16.0);
        assert!(!world.logos[0].is_invincible());
    }

    /// Spawning unthrottled: no global cooldown, no per-logo gate.
    fn eager_spawn_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.global_spawn_cooldown_ms = 0.0;
        config.per_logo_gate = None;
        config.obstacle_width = 10.0;
        config.obstacle_height = 10.0;
        config
    }

    #[test]
    fn test_wall_bounce_spawns_offspring() {
        let mut world = world_with(eager_spawn_config());
        place_logos(&mut world, &[(0.5, 500.0, Vec2::new(-1.0, 0.0))]);

        step(&mut world, 1_000.0, 16.0);

        assert_eq!(world.population(), 2);
        let child = &world.logos[1];
        // Fanned off the left wall: always into the arena
        assert!(child.vel.x > 0.0);
        assert!((child.vel.length() - world.config.speed).abs() < 1e-4);
        assert!(world.bounds.contains(&child.rect));
        assert!((1..=world.config.sprite_variants).contains(&child.sprite.0));
        assert_eq!(child.spawn_time, 1_000.0);
        assert_eq!(world.last_spawn, Some(1_000.0));
    }

    #[test]
    fn test_global_cooldown_blocks_spawn() {
        let mut config = eager_spawn_config();
        config.global_spawn_cooldown_ms = 800.0;
        let mut world = world_with(config);
        place_logos(&mut world, &[(0.5, 500.0, Vec2::new(-1.0, 0.0))]);
        world.last_spawn = Some(900.0);

        step(&mut world, 1_000.0, 16.0);

        assert_eq!(world.population(), 1);
        // The cooldown clock only moves on success
        assert_eq!(world.last_spawn, Some(900.0));
    }

    #[test]
    fn test_population_cap_blocks_spawn() {
        let mut config = eager_spawn_config();
        config.max_logos = 1;
        let mut world = world_with(config);
        place_logos(&mut world, &[(0.5, 500.0, Vec2::new(-1.0, 0.0))]);

        step(&mut world, 1_000.0, 16.0);

        assert_eq!(world.population(), 1);
        assert_eq!(world.last_spawn, None);
    }

    #[test]
    fn test_per_logo_refractory_blocks_spawn() {
        let mut config = eager_spawn_config();
        config.per_logo_gate = Some(crate::config::PerLogoSpawnGate {
            wall_bounce_cooldown_ms: 0.0,
            refractory_frames: 30,
        });
        let mut world = world_with(config);
        place_logos(&mut world, &[(0.5, 500.0, Vec2::new(-1.0, 0.0))]);
        world.logos[0].spawn_refractory = 5;

        step(&mut world, 1_000.0, 16.0);

        assert_eq!(world.population(), 1);
    }

    #[test]
    fn test_queued_name_claimed_by_next_spawn() {
        let mut world = world_with(eager_spawn_config());
        place_logos(&mut world, &[(0.5, 500.0, Vec2::new(-1.0, 0.0))]);
        world.name_logo("alice");
        world.name_logo("bob"); // all logos named, so bob waits

        step(&mut world, 1_000.0, 16.0);

        assert_eq!(world.population(), 2);
        assert_eq!(world.logos[1].display_name.as_deref(), Some("bob"));
        assert!(world.pending_names.is_empty());
    }

    #[test]
    fn test_second_bounce_does_not_extend_invincibility() {
        let mut config = eager_spawn_config();
        config.max_logos = 1;
        config.invincible = InvincibleConfig {
            duration_ms: 10_000.0,
            chance: crate::config::InvincibleChance::Fixed(1.0),
            gates: None,
        };
        let mut world = world_with(config);
        place_logos(&mut world, &[(0.5, 500.0, Vec2::new(-1.0, 0.0))]);

        step(&mut world, 1_000.0, 16.0);
        assert_eq!(world.logos[0].invincible_until, Some(11_000.0));

        // Force another immediate bounce mid-window
        world.logos[0].rect.x = 0.5;
        world.logos[0].vel = Vec2::new(-1.0, 0.0);
        world.logos[0].prev_vel = world.logos[0].vel;
        step(&mut world, 5_000.0, 16.0);

        assert_eq!(world.logos[0].invincible_until, Some(11_000.0));
    }

    #[test]
    fn test_gates_block_grant_below_min_population() {
        let mut config = eager_spawn_config();
        config.max_logos = 1;
        config.invincible = InvincibleConfig {
            duration_ms: 10_000.0,
            chance: crate::config::InvincibleChance::Fixed(1.0),
            gates: Some(crate::config::InvincibleGates {
                min_population: 20,
                max_concurrent: 2,
            }),
        };
        let mut world = world_with(config);
        place_logos(&mut world, &[(0.5, 500.0, Vec2::new(-1.0, 0.0))]);

        step(&mut world, 1_000.0, 16.0);

        assert!(!world.logos[0].is_invincible());
    }

    #[test]
    fn test_short_step_is_a_noop_under_frame_cap() {
        let mut config = motion_config();
        config.min_step_ms = 10.0;
        let mut world = world_with(config);
        let before = world.logos[0].rect;

        step(&mut world, 1_000.0, 5.0);
        assert_eq!(world.logos[0].rect, before);

        step(&mut world, 1_016.0, 16.0);
        assert_ne!(world.logos[0].rect, before);
    }

    #[test]
    fn test_elapsed_integration_scales_displacement() {
        let mut config = motion_config();
        config.integration = crate::config::Integration::Elapsed;
        config.speed = 0.1; // px/ms
        let mut world = world_with(config);
        place_logos(&mut world, &[(800.0, 800.0, Vec2::new(0.1, 0.0))]);

        step(&mut world, 16.0, 16.0);

        assert!((world.logos[0].rect.x - 801.6).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        let config = SimConfig::default();
        let mut a = World::new(config.clone(), 99_999).unwrap();
        let mut b = World::new(config, 99_999).unwrap();

        for k in 1..=20_000u32 {
            let now = k as f64 * 16.0;
            step(&mut a, now, 16.0);
            step(&mut b, now, 16.0);
            assert!(a.population() <= a.config.max_logos);
        }

        assert_eq!(a.population(), b.population());
        for (x, y) in a.logos.iter().zip(b.logos.iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.rect, y.rect);
            assert_eq!(x.vel, y.vel);
        }
        // The default setup breeds a swarm over 20k frames
        assert!(a.population() > 1);
        assert!(a.population() <= a.config.max_logos);
    }

    proptest! {
        #[test]
        fn prop_speed_is_conserved(seed in any::<u64>(), steps in 1usize..300) {
            let mut world = world_with(SimConfig::default());
            world.rng = rand::SeedableRng::seed_from_u64(seed);
            for k in 1..=steps {
                step(&mut world, k as f64 * 16.0, 16.0);
                for logo in &world.logos {
                    let v = logo.vel.length();
                    prop_assert!((v - world.config.speed).abs() < 1e-3);
                }
            }
        }

        #[test]
        fn prop_single_logo_stays_in_bounds(seed in any::<u64>(), steps in 1usize..300) {
            let mut world = world_with(motion_config());
            world.rng = rand::SeedableRng::seed_from_u64(seed);
            for k in 1..=steps {
                step(&mut world, k as f64 * 16.0, 16.0);
                prop_assert!(world.bounds.contains(&world.logos[0].rect));
            }
        }

        #[test]
        fn prop_population_never_exceeds_cap(seed in any::<u64>(), steps in 1usize..400) {
            let mut world = world_with(SimConfig::default());
            world.rng = rand::SeedableRng::seed_from_u64(seed);
            for k in 1..=steps {
                step(&mut world, k as f64 * 16.0, 16.0);
                prop_assert!(world.population() <= world.config.max_logos);
            }
        }
    }
}
