//! Per-frame simulation step
//!
//! One call per animation frame: run due deferred actions, advance both
//! players, resolve firing, projectiles, area effects, bombs and
//! particles, then check for a round end. The frame delta is clamped so a
//! hitch can't explode the physics; this is deliberately not a
//! fixed-timestep accumulator, so constants are tuned for ~60 Hz.

use glam::Vec2;

use crate::angle_to_vec;
use crate::consts::*;

use rand::Rng;

use super::combat;
use super::projectile::{spawn_particles, Bomb, Projectile};
use super::round;
use super::scheduler::Action;
use super::state::{GamePhase, MatchState, PlayerId};

/// Fallback bullet spread when multishot cards didn't set one
const DEFAULT_SPREAD: f32 = 0.28;
const LAVA_PARTICLE_COLOR: [u8; 3] = [255, 106, 60];

/// One player's input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Edge-triggered: true for exactly one tick per press
    pub shoot: bool,
    /// Reserved; unused by the current card set
    pub block: bool,
    /// Aim position driving remote-steered bullets
    pub pointer: Option<Vec2>,
}

/// Advance the match by one frame
pub fn tick(world: &mut MatchState, inputs: &[PlayerInput; 2], dt_ms: f32) {
    let dt = dt_ms.clamp(0.0, MAX_FRAME_MS);
    world.time_ms += dt as f64;

    run_due_actions(world);

    match world.phase {
        GamePhase::Drafting => {
            // Physics and statuses keep running while a pick is open;
            // nobody gets steering input.
            update_players(world, [None, None], dt);
        }
        GamePhase::InRound => {
            update_players(world, [Some(&inputs[0]), Some(&inputs[1])], dt);
            for id in 0..2 {
                if inputs[id].shoot {
                    try_fire(world, id);
                }
            }
            let pointers = [inputs[0].pointer, inputs[1].pointer];
            combat::update_projectiles(world, pointers, dt);
            combat::update_aoes(world, dt);
            combat::update_bombs(world, dt);
            combat::update_particles(world);
            check_round_end(world);
        }
        GamePhase::Splash | GamePhase::RoundEnd | GamePhase::MatchReset => {}
    }
}

fn run_due_actions(world: &mut MatchState) {
    for due in world.scheduler.take_due(world.time_ms) {
        match due.action {
            Action::ExplodeAt { pos, damage, owner } => {
                if world.is_current(owner) {
                    combat::create_explosion(
                        world,
                        pos,
                        damage,
                        combat::EXPLOSION_BASE_RADIUS,
                        Some(owner),
                    );
                } else {
                    log::debug!("dropped stale explosion for player {}", owner.id);
                }
            }
            Action::FireBurstShot { shooter } => {
                if world.is_current(shooter) && world.phase == GamePhase::InRound {
                    fire_single(world, shooter.id, 0.0);
                }
            }
            Action::AdvanceDraft => round::advance_draft(world),
            Action::ResetMatch => round::reset_match(world),
        }
    }
}

fn update_players(world: &mut MatchState, inputs: [Option<&PlayerInput>; 2], dt: f32) {
    for id in 0..2 {
        let opponent_center = Some(world.players[1 - id].center());
        let events = world.players[id].update(inputs[id], dt, opponent_center, &world.arena);

        if let Some((source, heal)) = events.parasite_heal {
            if source < world.players.len() && world.players[source].alive {
                let src = &mut world.players[source];
                src.health = (src.health + heal).min(src.max_health);
            }
        }
        if let Some(pos) = events.lava_contact {
            spawn_particles(&mut world.particles, &mut world.rng, pos, 12, LAVA_PARTICLE_COLOR);
        }
    }
}

/// Attempt a shot for `shooter`. Safe to call once per input edge: the
/// reload timer, attack-speed throttle and ammo floor make it a no-op
/// when a shot isn't available.
pub fn try_fire(world: &mut MatchState, shooter: PlayerId) {
    if shooter >= world.players.len() {
        return;
    }
    let now = world.time_ms;
    {
        let p = &world.players[shooter];
        if !p.alive || p.reload_ms > 0.0 || p.status.stunned() {
            return;
        }
        if now < p.next_fire_ms {
            return;
        }
    }
    let fire_delay = FIRE_BASE_DELAY_MS / world.players[shooter].attack_speed.max(0.01);
    world.players[shooter].next_fire_ms = now + fire_delay as f64;

    let (multishot, burst) = {
        let p = &world.players[shooter];
        (
            p.multishot && p.bullets_per_shot > 1,
            p.burst && p.burst_count > 1,
        )
    };
    let mut needed: u32 = if multishot {
        world.players[shooter].bullets_per_shot
    } else if burst {
        world.players[shooter].burst_count
    } else {
        1
    };
    // Not enough ammo for the volley: fall back to a single round
    if world.players[shooter].ammo < needed {
        if world.players[shooter].ammo >= 1 {
            needed = 1;
        } else {
            return;
        }
    }
    world.players[shooter].ammo -= needed;

    if multishot && needed > 1 {
        let spread = if world.players[shooter].spread > 0.0 {
            world.players[shooter].spread
        } else {
            DEFAULT_SPREAD
        };
        let n = needed as f32;
        for i in 0..needed {
            let offset = ((i as f32 - (n - 1.0) / 2.0) / (n - 1.0).max(1.0)) * spread;
            fire_single(world, shooter, offset);
        }
    } else if burst && needed > 1 {
        let shooter_ref = world.owner_ref(shooter);
        let delay = world.players[shooter].burst_delay_ms as f64;
        for i in 0..needed {
            world.scheduler.schedule(
                now + i as f64 * delay,
                Action::FireBurstShot {
                    shooter: shooter_ref,
                },
            );
        }
    } else {
        fire_single(world, shooter, 0.0);
    }

    if world.players[shooter].ammo == 0 {
        let p = &mut world.players[shooter];
        p.reload_ms = p.reload_time_ms.max(1.0);
    }
}

fn fire_single(world: &mut MatchState, shooter: PlayerId, angle_offset: f32) {
    if !world.players[shooter].alive {
        return;
    }
    let angle = world.players[shooter].gun_angle + angle_offset;
    let center = world.players[shooter].center();
    let speed =
        world.players[shooter].bullet_speed * world.players[shooter].bullet_speed_mul;
    let damage = (world.players[shooter].base_damage * world.players[shooter].grow_damage_mul)
        .round()
        .max(1.0);

    let dir = angle_to_vec(angle);
    let muzzle = center + dir * GUN_LENGTH;
    let vel = dir * speed * world.rng.random_range(0.96..1.04);
    let spawn_pos = muzzle
        + Vec2::new(
            world.rng.random_range(-3.0..3.0),
            world.rng.random_range(-3.0..3.0),
        );

    if world.players[shooter].timed_detonation {
        let owner = world.owner_ref(shooter);
        world.bombs.push(Bomb::new(muzzle, damage, owner));
    }
    let bullet = Projectile::spawn(&world.players[shooter], spawn_pos, vel, damage);
    world.projectiles.push(bullet);
}

/// The round ends the instant either player's health reaches zero. The
/// winner holds strictly greater remaining health; an exact tie goes to
/// player 0 as the documented deterministic rule.
fn check_round_end(world: &mut MatchState) {
    if world.phase != GamePhase::InRound {
        return;
    }
    let h0 = world.players[0].health;
    let h1 = world.players[1].health;
    if h0 <= 0.0 || h1 <= 0.0 {
        let winner = if h1 > h0 { 1 } else { 0 };
        round::end_round(world, winner);
    }
}
