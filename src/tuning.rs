//! Data-driven match balance
//!
//! The knobs a host may override without recompiling. Defaults match the
//! shipped balance sheet; embedders can hand in a JSON document instead.

use serde::{Deserialize, Serialize};

/// Match balance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Rounds needed to win the match
    pub target_score: u32,
    /// Downward acceleration per nominal frame (px/frame²)
    pub gravity: f32,
    /// Starting/maximum health
    pub max_health: f32,
    /// Damage per bullet before card modifiers
    pub base_damage: f32,
    /// Bullet muzzle speed (px/frame)
    pub bullet_speed: f32,
    /// Horizontal move speed (px/frame)
    pub move_speed: f32,
    /// Magazine size
    pub max_ammo: u32,
    /// Reload duration (ms)
    pub reload_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_score: 5,
            gravity: 0.45,
            max_health: 100.0,
            base_damage: 10.0,
            bullet_speed: 8.0,
            move_speed: 4.0,
            max_ammo: 4,
            reload_ms: 70.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning document, falling back to defaults for absent fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
