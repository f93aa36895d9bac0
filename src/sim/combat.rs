//! Combat resolver
//!
//! Projectile-vs-platform and projectile-vs-player collision, damage
//! routing, and the secondary effects riding on hits: explosions, toxic
//! clouds, bombs, stuns and knockback. Everything here mutates the world
//! through clamped arithmetic; nothing on this path can fail.

use glam::Vec2;

use crate::consts::*;

use super::cards::CardId;
use super::projectile::{spawn_particles, AoeKind, AreaEffect, Bomb, Projectile};
use super::scheduler::{Action, OwnerRef};
use super::state::MatchState;

pub const EXPLOSION_BASE_RADIUS: f32 = 60.0;
const EXPLOSION_MIN_RADIUS: f32 = 20.0;
const TOXIC_BASE_RADIUS: f32 = 70.0;
const TOXIC_MIN_RADIUS: f32 = 30.0;
const TOXIC_TTL_MS: f32 = 5000.0;

/// Stun per Dazzle card held by the shooter
const DAZZLE_STUN_MS: f32 = 500.0;
const THRUSTER_KNOCK: Vec2 = Vec2::new(2.2, 1.6);

/// Bounce response: vertical reflect is damped, horizontal drags
const BOUNCE_DAMP_Y: f32 = -0.45;
const BOUNCE_DAMP_X: f32 = 0.8;
const TRICKSTER_BOUNCE_FACTOR: f32 = 1.8;

/// Fraction of the body radius that counts as hittable
const HIT_RADIUS_FRAC: f32 = 0.48;

const EMP_SLOW_MS: f32 = 800.0;
const SAW_DAMAGE_PER_TICK: f32 = 0.6;
const RADIANCE_DAMAGE_PER_TICK: f32 = 0.8;
const SUPERNOVA_PULL: Vec2 = Vec2::new(0.8, 0.7);

const EXPLOSION_COLOR: [u8; 3] = [255, 176, 122];
const DAZZLE_COLOR: [u8; 3] = [180, 0, 255];

/// Advance all projectiles and resolve their collisions for this tick.
/// `pointers` are the per-player aim positions driving remote bullets.
pub fn update_projectiles(world: &mut MatchState, pointers: [Option<Vec2>; 2], dt_ms: f32) {
    let mut bullets = std::mem::take(&mut world.projectiles);
    bullets.retain_mut(|b| {
        b.update(
            dt_ms,
            &world.players,
            pointers[b.owner],
            &world.arena,
            world.view_w,
            world.view_h,
        );
        !resolve_projectile(world, b)
    });
    bullets.append(&mut world.projectiles);
    world.projectiles = bullets;
}

/// Resolve one projectile against platforms, players and its lifetime.
/// Returns true when the projectile is consumed.
fn resolve_projectile(world: &mut MatchState, b: &mut Projectile) -> bool {
    if b.pos.y > world.view_h + BULLET_BOUNDS_MARGIN {
        return true;
    }

    for i in 0..world.arena.platforms.len() {
        let plat = world.arena.platforms[i];
        if !plat.contains(b.pos, LANDING_TOLERANCE) {
            continue;
        }
        if b.bounces < b.max_bounces {
            b.vel.y *= BOUNCE_DAMP_Y;
            b.vel.x *= BOUNCE_DAMP_X;
            b.bounces += 1;
            if b.timed_detonation {
                let owner = world.owner_ref(b.owner);
                world.bombs.push(Bomb::new(b.pos.round(), b.damage, owner));
            }
            if b.trickster {
                b.damage = (b.damage * TRICKSTER_BOUNCE_FACTOR).round();
            }
            return false;
        }
        // Out of bounces: the surface consumes the projectile
        let owner = world.owner_ref(b.owner);
        if b.explosive > 0 {
            create_explosion(world, b.pos, b.damage, EXPLOSION_BASE_RADIUS, Some(owner));
        }
        if b.timed_detonation {
            world.scheduler.schedule(
                world.time_ms + TIMED_DET_DELAY_MS,
                Action::ExplodeAt {
                    pos: b.pos,
                    damage: b.damage,
                    owner,
                },
            );
        }
        if world.players[b.owner].toxic_cloud {
            create_toxic_cloud(world, b.pos, b.damage, owner);
        }
        return true;
    }

    for target_id in 0..2 {
        if target_id == b.owner || !world.players[target_id].alive {
            continue;
        }
        let center = world.players[target_id].center();
        let d = b.pos.distance(center);
        if d >= b.radius + world.players[target_id].body_radius() * HIT_RADIUS_FRAC {
            continue;
        }

        let dmg = b.damage.round();
        let owner_ref = world.owner_ref(b.owner);
        {
            let (target, owner) = world.pair_mut(target_id);
            if owner.poison_stacks > 0 {
                target.status.apply_poison(owner.poison_stacks, Some(owner.id));
            }
            if owner.parasite_stacks > 0 {
                target.status.apply_parasite(owner.parasite_stacks, Some(owner.id));
            }
            target.take_damage(dmg, Some(owner.id));
            owner.on_deal_damage(dmg);

            if owner.dazzle {
                let copies = owner
                    .cards
                    .iter()
                    .filter(|c| **c == CardId::Dazzle)
                    .count()
                    .max(1);
                let stun = copies as f32 * DAZZLE_STUN_MS;
                target.status.stun.time_ms = target.status.stun.time_ms.max(stun);
            }
            if b.thruster {
                let dir = (center - b.pos) / d.max(1.0);
                target.vel += dir * THRUSTER_KNOCK;
            }
        }

        if b.timed_detonation {
            world.bombs.push(Bomb::new(b.pos.round(), b.damage, owner_ref));
        }
        if world.players[b.owner].dazzle {
            let pos = b.pos;
            spawn_particles(&mut world.particles, &mut world.rng, pos, 10, DAZZLE_COLOR);
            spawn_particles(&mut world.particles, &mut world.rng, pos, 6, [255, 255, 255]);
        }
        if b.explosive > 0 {
            create_explosion(world, b.pos, b.damage, EXPLOSION_BASE_RADIUS, Some(owner_ref));
        }
        if world.players[b.owner].toxic_cloud {
            create_toxic_cloud(world, b.pos, b.damage, owner_ref);
        }

        if b.pierces > 0 {
            b.pierces -= 1;
        } else {
            return true;
        }
    }

    if b.life <= 0 {
        if b.timed_detonation {
            let owner = world.owner_ref(b.owner);
            world.bombs.push(Bomb::new(b.pos.round(), b.damage, owner));
        }
        return true;
    }
    false
}

/// One-shot blast: spawns a short-lived AOE marker, applies falloff
/// damage and radial knockback to every player in range (owner included).
///
/// Blast damage lands directly on health: shields and decay don't apply.
pub fn create_explosion(
    world: &mut MatchState,
    pos: Vec2,
    damage: f32,
    base_radius: f32,
    owner: Option<OwnerRef>,
) {
    let radius = (base_radius * (1.0 + damage / 100.0))
        .round()
        .max(EXPLOSION_MIN_RADIUS);
    let ttl_ms = (0.25 + damage / 300.0) * 1000.0;
    world
        .aoes
        .push(AreaEffect::new(pos, radius, ttl_ms, AoeKind::Explosion, damage, owner));
    let burst = ((radius / 2.0).round() as usize).min(160);
    spawn_particles(&mut world.particles, &mut world.rng, pos, burst, EXPLOSION_COLOR);

    for i in 0..2 {
        let p = &mut world.players[i];
        let center = p.center();
        let d = center.distance(pos);
        if d <= radius + p.w * 0.5 {
            let dmg = (damage * (1.0 - d / radius.max(1.0))).round().max(1.0);
            p.health -= dmg;
            let dir = (center - pos) / d.max(1.0);
            p.vel.x += dir.x * radius * 0.06;
            p.vel.y += dir.y * radius * 0.04;
        }
    }
}

/// Lingering poison field; re-applies the owner's poison stacks to every
/// overlapping player each tick while it lives.
pub fn create_toxic_cloud(world: &mut MatchState, pos: Vec2, damage: f32, owner: OwnerRef) {
    let radius = (TOXIC_BASE_RADIUS * (1.0 + damage / 100.0))
        .round()
        .max(TOXIC_MIN_RADIUS);
    world
        .aoes
        .push(AreaEffect::new(pos, radius, TOXIC_TTL_MS, AoeKind::Toxic, damage, Some(owner)));
}

/// Advance area effects and apply their periodic influence
pub fn update_aoes(world: &mut MatchState, dt_ms: f32) {
    let mut aoes = std::mem::take(&mut world.aoes);
    aoes.retain_mut(|a| {
        if !a.advance(dt_ms) {
            return false;
        }
        match a.kind {
            AoeKind::Explosion => {} // damage applied once at creation
            AoeKind::Toxic => {
                let Some(owner) = a.owner else { return true };
                if !world.is_current(owner) {
                    return true;
                }
                let stacks = world.players[owner.id].poison_stacks;
                if stacks == 0 {
                    return true;
                }
                for i in 0..2 {
                    if a.contains(world.players[i].center()) {
                        world.players[i].status.apply_poison(stacks, Some(owner.id));
                    }
                }
            }
            AoeKind::Emp => {
                for p in &mut world.players {
                    if a.contains(p.center()) {
                        p.status.slow.stacks = p.status.slow.stacks.max(1);
                        p.status.slow.time_ms = EMP_SLOW_MS;
                    }
                }
            }
            AoeKind::Saw => {
                for p in &mut world.players {
                    if a.contains(p.center()) {
                        p.health -= SAW_DAMAGE_PER_TICK;
                    }
                }
            }
            AoeKind::Radiance => {
                for p in &mut world.players {
                    if a.contains(p.center()) {
                        p.health -= RADIANCE_DAMAGE_PER_TICK;
                    }
                }
            }
            AoeKind::Supernova => {
                for p in &mut world.players {
                    let center = p.center();
                    let d = center.distance(a.pos);
                    if d <= a.radius {
                        let dir = (a.pos - center) / d.max(1.0);
                        p.vel += dir * SUPERNOVA_PULL;
                    }
                }
            }
        }
        true
    });
    aoes.append(&mut world.aoes);
    world.aoes = aoes;
}

/// Tick bomb fuses; expired bombs convert into explosions
pub fn update_bombs(world: &mut MatchState, dt_ms: f32) {
    let mut bombs = std::mem::take(&mut world.bombs);
    bombs.retain_mut(|bomb| {
        bomb.fuse_ms -= dt_ms;
        if bomb.fuse_ms <= 0.0 {
            create_explosion(
                world,
                bomb.pos,
                bomb.damage,
                EXPLOSION_BASE_RADIUS,
                Some(bomb.owner),
            );
            false
        } else {
            true
        }
    });
    bombs.append(&mut world.bombs);
    world.bombs = bombs;
}

/// Cosmetic particle physics
pub fn update_particles(world: &mut MatchState) {
    for pt in &mut world.particles {
        pt.pos += pt.vel;
        pt.vel.y += 0.18;
        pt.life -= 1.0;
    }
    world.particles.retain(|p| p.life > 0.0);
}
