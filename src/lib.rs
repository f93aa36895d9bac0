//! Card Clash - a two-player platform duel with card-draft rounds
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, round flow)
//! - `tuning`: Data-driven match balance
//!
//! Rendering, input devices and operator tooling live outside this crate.
//! The embedder samples input once per frame, calls [`sim::tick`], and reads
//! the resulting state (players, projectiles, area effects, particles)
//! read-only.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Maximum simulated frame delta (ms). Frame hitches clamp to this.
    pub const MAX_FRAME_MS: f32 = 40.0;
    /// Nominal frame delta of the tuned 60 Hz cadence (ms)
    pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;

    /// Default viewport when the embedder supplies none
    pub const DEFAULT_VIEW_W: f32 = 1280.0;
    pub const DEFAULT_VIEW_H: f32 = 720.0;

    /// Player body size
    pub const PLAYER_W: f32 = 56.0;
    pub const PLAYER_H: f32 = 56.0;
    /// Jump impulse (negative y is up)
    pub const JUMP_IMPULSE: f32 = -13.0;
    /// Horizontal damping when input is sampled but no direction is held
    pub const IDLE_DAMPING: f32 = 0.84;
    /// Horizontal damping when no input is sampled at all (draft, stun)
    pub const NO_INPUT_DAMPING: f32 = 0.90;
    /// How far past a platform top the feet may land and still snap (px)
    pub const LANDING_TOLERANCE: f32 = 12.0;
    /// Aim interpolation rate per nominal frame
    pub const AIM_LERP_RATE: f32 = 0.08;

    /// Muzzle offset from player center
    pub const GUN_LENGTH: f32 = 50.0;
    /// Delay between shots before attack-speed scaling (ms)
    pub const FIRE_BASE_DELAY_MS: f32 = 220.0;

    /// Projectile defaults
    pub const BULLET_RADIUS: f32 = 6.0;
    pub const BULLET_LIFE_FRAMES: i32 = 240;
    /// Fraction of arena gravity felt by projectiles
    pub const BULLET_GRAVITY_FRAC: f32 = 0.05;
    /// Maximum trail points per projectile
    pub const TRAIL_LENGTH: usize = 12;
    /// Projectiles die this far outside the viewport (px)
    pub const BULLET_BOUNDS_MARGIN: f32 = 400.0;

    /// Bomb fuse (ms)
    pub const BOMB_FUSE_MS: f32 = 500.0;
    /// Delay before a timed-detonation explosion on a terminal surface hit (ms)
    pub const TIMED_DET_DELAY_MS: f64 = 420.0;

    /// Lava contact damage, applied at most once per cooldown window
    pub const LAVA_DAMAGE: f32 = 10.0;
    pub const LAVA_COOLDOWN_MS: f32 = 300.0;
    /// Upward impulse when touching lava
    pub const LAVA_KNOCKBACK: f32 = -18.0;

    /// Maximum live cosmetic particles
    pub const MAX_PARTICLES: usize = 256;
}

/// Normalize angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Shortest signed angular difference from `from` to `to`
#[inline]
pub fn shortest_angle_diff(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Unit vector for an angle
#[inline]
pub fn angle_to_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
