//! Projectiles, area effects, bombs and cosmetic particles
//!
//! Behavior flags are copied from the owner at spawn time; a projectile
//! never reaches back into a player except through the combat resolver.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

use super::map::Arena;
use super::player::Player;
use super::scheduler::OwnerRef;
use super::state::PlayerId;

/// Exponential blend factor for homing steering
const HOMING_STEER: f32 = 0.08;
/// Grow scaling per whole second of flight
const GROW_DAMAGE_BASE: f32 = 1.10;
const GROW_SIZE_BASE: f32 = 1.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub base_radius: f32,
    pub owner: PlayerId,
    pub damage: f32,
    /// Damage at spawn; grow scales from this, not the running value
    pub base_damage: f32,
    /// Remaining lifetime in frames
    pub life: i32,
    pub bounces: u32,
    pub max_bounces: u32,
    pub pierces: u32,
    pub explosive: u32,
    pub timed_detonation: bool,
    pub homing: bool,
    pub remote: bool,
    pub trickster: bool,
    pub thruster: bool,
    pub sneaky: bool,
    pub grow: bool,
    pub age_ms: f32,
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Projectile {
    /// Spawn with behavior flags copied from the owner
    pub fn spawn(owner: &Player, pos: Vec2, vel: Vec2, damage: f32) -> Self {
        Self {
            pos,
            vel,
            radius: BULLET_RADIUS,
            base_radius: BULLET_RADIUS,
            owner: owner.id,
            damage,
            base_damage: damage,
            life: BULLET_LIFE_FRAMES,
            bounces: 0,
            max_bounces: owner.bounce,
            pierces: owner.pierce,
            explosive: owner.explosive,
            timed_detonation: owner.timed_detonation,
            homing: owner.homing,
            remote: owner.remote,
            trickster: owner.trickster,
            thruster: owner.thruster,
            sneaky: owner.sneaky,
            grow: owner.has_grow,
            age_ms: 0.0,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    fn record_trail(&mut self) {
        self.trail.push(self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }

    /// Advance one frame: grow scaling, steering, gravity, integration,
    /// trail and world-bounds lifetime.
    pub fn update(
        &mut self,
        dt_ms: f32,
        players: &[Player; 2],
        pointer: Option<Vec2>,
        arena: &Arena,
        view_w: f32,
        view_h: f32,
    ) {
        self.life -= 1;
        self.age_ms += dt_ms;

        if self.grow {
            let ticks = (self.age_ms / 1000.0).floor() as i32;
            self.damage = (self.base_damage * GROW_DAMAGE_BASE.powi(ticks))
                .round()
                .max(1.0);
            self.radius = (self.base_radius * GROW_SIZE_BASE.powi(ticks)).max(2.0);
        } else {
            self.radius = self.base_radius;
        }

        if self.remote {
            // Remote bullets chase the pointer, overriding homing
            if let Some(target) = pointer {
                let to_target = target - self.pos;
                if to_target.length_squared() > 1.0 {
                    let speed = self.vel.length().max(0.001);
                    self.vel = to_target.normalize() * speed;
                }
            }
        } else if self.homing {
            let target = players
                .iter()
                .filter(|p| p.alive && p.id != self.owner)
                .map(|p| p.center())
                .min_by(|a, b| {
                    a.distance_squared(self.pos)
                        .total_cmp(&b.distance_squared(self.pos))
                });
            if let Some(target) = target {
                let to_target = target - self.pos;
                let speed = self.vel.length().max(0.001);
                let desired = to_target.normalize_or_zero() * speed;
                // Smooth steer, never an instant snap
                self.vel += (desired - self.vel) * HOMING_STEER;
            }
        }

        if !self.sneaky && !self.remote {
            self.vel.y += arena.gravity * BULLET_GRAVITY_FRAC;
        }

        self.pos += self.vel;
        self.record_trail();

        if self.pos.x < -BULLET_BOUNDS_MARGIN
            || self.pos.x > view_w + BULLET_BOUNDS_MARGIN
            || self.pos.y > view_h + BULLET_BOUNDS_MARGIN + 200.0
        {
            self.life = 0;
        }
    }
}

/// Area-effect flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AoeKind {
    Toxic,
    Explosion,
    Emp,
    Saw,
    Radiance,
    Supernova,
}

/// A time-limited area influence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaEffect {
    pub pos: Vec2,
    pub radius: f32,
    pub ttl_ms: f32,
    pub age_ms: f32,
    pub kind: AoeKind,
    pub damage: f32,
    pub owner: Option<OwnerRef>,
}

impl AreaEffect {
    pub fn new(pos: Vec2, radius: f32, ttl_ms: f32, kind: AoeKind, damage: f32, owner: Option<OwnerRef>) -> Self {
        Self {
            pos,
            radius,
            ttl_ms,
            age_ms: 0.0,
            kind,
            damage,
            owner,
        }
    }

    /// Advance; returns false once the effect has aged out
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        self.age_ms += dt_ms;
        self.age_ms < self.ttl_ms
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.radius
    }
}

/// A fused charge that converts into an explosion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: Vec2,
    pub damage: f32,
    pub owner: OwnerRef,
    pub fuse_ms: f32,
}

impl Bomb {
    pub fn new(pos: Vec2, damage: f32, owner: OwnerRef) -> Self {
        Self {
            pos,
            damage,
            owner,
            fuse_ms: BOMB_FUSE_MS,
        }
    }
}

/// Cosmetic particle; never affects gameplay
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in frames
    pub life: f32,
    pub color: [u8; 3],
}

/// Burst of particles at a point. Oldest particles are evicted first
/// when the cap is hit.
pub fn spawn_particles(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    pos: Vec2,
    n: usize,
    color: [u8; 3],
) {
    for _ in 0..n {
        if particles.len() >= MAX_PARTICLES {
            particles.remove(0);
        }
        particles.push(Particle {
            pos,
            vel: Vec2::new(rng.random_range(-3.0..3.0), rng.random_range(-6.0..-1.0)),
            life: rng.random_range(18.0..40.0),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::MAP_TEMPLATES;
    use crate::tuning::Tuning;
    use rand::SeedableRng;

    fn players() -> [Player; 2] {
        let t = Tuning::default();
        [
            Player::new(0, Vec2::new(100.0, 100.0), &t),
            Player::new(1, Vec2::new(900.0, 100.0), &t),
        ]
    }

    fn arena() -> Arena {
        MAP_TEMPLATES[0].build(1280.0, 720.0, 0.45)
    }

    #[test]
    fn test_grow_scales_on_whole_seconds() {
        let players = players();
        let mut owner = players[0].clone();
        owner.has_grow = true;
        let mut b = Projectile::spawn(&owner, Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 10.0);
        let a = arena();

        b.update(999.0, &players, None, &a, 1280.0, 720.0);
        assert_eq!(b.damage, 10.0); // under one second: unscaled

        b.update(2.0, &players, None, &a, 1280.0, 720.0);
        assert_eq!(b.damage, 11.0); // 10 * 1.10^1
        assert!((b.radius - BULLET_RADIUS * 1.05).abs() < 0.001);

        b.update(1000.0, &players, None, &a, 1280.0, 720.0);
        assert_eq!(b.damage, 12.0); // round(10 * 1.21)
    }

    #[test]
    fn test_homing_steers_toward_living_opponent() {
        let players = players();
        let mut owner = players[0].clone();
        owner.homing = true;
        // Fired straight up from between the players; target is to the right
        let mut b = Projectile::spawn(&owner, Vec2::new(500.0, 128.0), Vec2::new(0.0, -8.0), 10.0);
        b.sneaky = true; // isolate steering from gravity
        let a = arena();
        for _ in 0..30 {
            b.update(16.7, &players, None, &a, 1280.0, 720.0);
        }
        assert!(b.vel.x > 0.0);
    }

    #[test]
    fn test_homing_ignores_owner_and_dead() {
        let mut players = players();
        players[1].alive = false;
        let mut owner = players[0].clone();
        owner.homing = true;
        let mut b = Projectile::spawn(&owner, Vec2::new(500.0, 128.0), Vec2::new(0.0, -8.0), 10.0);
        b.sneaky = true;
        let a = arena();
        let before = b.vel;
        b.update(16.7, &players, None, &a, 1280.0, 720.0);
        // No living target: velocity unchanged
        assert_eq!(b.vel, before);
    }

    #[test]
    fn test_remote_overrides_homing_and_gravity() {
        let players = players();
        let mut owner = players[0].clone();
        owner.remote = true;
        owner.homing = true;
        let mut b = Projectile::spawn(&owner, Vec2::new(100.0, 100.0), Vec2::new(8.0, 0.0), 10.0);
        let a = arena();
        b.update(16.7, &players, Some(Vec2::new(100.0, 500.0)), &a, 1280.0, 720.0);
        // Steered straight at the pointer, speed preserved, no gravity
        assert!(b.vel.y > 7.9);
        assert!(b.vel.x.abs() < 0.1);
    }

    #[test]
    fn test_sneaky_skips_gravity() {
        let players = players();
        let mut owner = players[0].clone();
        owner.sneaky = true;
        let mut b = Projectile::spawn(&owner, Vec2::new(100.0, 100.0), Vec2::new(8.0, 0.0), 10.0);
        let a = arena();
        b.update(16.7, &players, None, &a, 1280.0, 720.0);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_out_of_bounds_kills() {
        let players = players();
        let mut b = Projectile::spawn(&players[0], Vec2::new(-500.0, 100.0), Vec2::ZERO, 10.0);
        let a = arena();
        b.update(16.7, &players, None, &a, 1280.0, 720.0);
        assert!(b.life <= 0);
    }

    #[test]
    fn test_trail_is_bounded() {
        let players = players();
        let mut b = Projectile::spawn(&players[0], Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 10.0);
        let a = arena();
        for _ in 0..50 {
            b.update(16.7, &players, None, &a, 1280.0, 720.0);
        }
        assert_eq!(b.trail.len(), TRAIL_LENGTH);
    }

    #[test]
    fn test_aoe_expires() {
        let mut aoe = AreaEffect::new(Vec2::ZERO, 50.0, 100.0, AoeKind::Toxic, 10.0, None);
        assert!(aoe.advance(50.0));
        assert!(!aoe.advance(60.0));
    }

    #[test]
    fn test_particle_cap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        spawn_particles(&mut particles, &mut rng, Vec2::ZERO, 1000, [255, 0, 0]);
        assert_eq!(particles.len(), MAX_PARTICLES);
    }
}
