//! Status engine: timed stacking effects on a player
//!
//! Poison, parasite and burn deal damage over time and stack additively;
//! reapplying refreshes the duration to the longer of current and new
//! (never shortens). Slow, stun and shield are countdown-only; they are
//! consumed by movement, firing and damage logic elsewhere.

use serde::{Deserialize, Serialize};

use super::state::PlayerId;

pub const POISON_DURATION_MS: f32 = 2000.0;
pub const PARASITE_DURATION_MS: f32 = 2000.0;
pub const BURN_DURATION_MS: f32 = 3000.0;

pub const POISON_DPS_PER_STACK: f32 = 5.0;
pub const PARASITE_DPS_PER_STACK: f32 = 5.0;
pub const BURN_DPS_PER_STACK: f32 = 4.0;
/// Fraction of parasite damage returned to its source as healing
pub const PARASITE_HEAL_FRAC: f32 = 0.5;

/// Per-stack move-speed factor while slowed
pub const SLOW_FACTOR_PER_STACK: f32 = 0.65;

/// A stacking damage-over-time effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedStacks {
    pub stacks: u32,
    pub time_ms: f32,
    /// Player that applied the effect (heal target for parasite)
    pub source: Option<PlayerId>,
}

impl TimedStacks {
    fn raise(&mut self, stacks: u32, duration_ms: f32, source: Option<PlayerId>) {
        self.stacks += stacks;
        self.time_ms = self.time_ms.max(duration_ms);
        self.source = source;
    }

    #[inline]
    pub fn active(&self) -> bool {
        self.time_ms > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Slow {
    pub stacks: u32,
    pub time_ms: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stun {
    pub time_ms: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub value: f32,
    pub time_ms: f32,
}

/// All timed effects on one player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSet {
    pub poison: TimedStacks,
    pub parasite: TimedStacks,
    pub burn: TimedStacks,
    pub slow: Slow,
    pub stun: Stun,
    pub shield: Shield,
}

/// Result of one status tick: damage to the carrier, plus any heal owed
/// to a parasite source (applied by the caller only if the source lives).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusTick {
    pub damage: f32,
    pub heal_source: Option<(PlayerId, f32)>,
}

impl StatusSet {
    pub fn apply_poison(&mut self, stacks: u32, source: Option<PlayerId>) {
        self.poison.raise(stacks, POISON_DURATION_MS, source);
    }

    pub fn apply_parasite(&mut self, stacks: u32, source: Option<PlayerId>) {
        self.parasite.raise(stacks, PARASITE_DURATION_MS, source);
    }

    pub fn apply_burn(&mut self, stacks: u32, source: Option<PlayerId>) {
        self.burn.raise(stacks, BURN_DURATION_MS, source);
    }

    #[inline]
    pub fn stunned(&self) -> bool {
        self.stun.time_ms > 0.0
    }

    /// Move-speed multiplier from slow stacks (1.0 when not slowed)
    pub fn slow_multiplier(&self) -> f32 {
        if self.slow.time_ms > 0.0 && self.slow.stacks > 0 {
            SLOW_FACTOR_PER_STACK.powi(self.slow.stacks.min(8) as i32)
        } else {
            1.0
        }
    }

    /// Advance all effects by `dt_ms`, returning damage dealt to the
    /// carrier and the parasite heal owed to its source.
    pub fn advance(&mut self, dt_ms: f32) -> StatusTick {
        let dt_sec = dt_ms / 1000.0;
        let mut out = StatusTick::default();

        if self.poison.active() {
            self.poison.time_ms -= dt_ms;
            out.damage += POISON_DPS_PER_STACK * self.poison.stacks as f32 * dt_sec;
            if !self.poison.active() {
                self.poison = TimedStacks::default();
            }
        }

        if self.parasite.active() {
            self.parasite.time_ms -= dt_ms;
            let dmg = PARASITE_DPS_PER_STACK * self.parasite.stacks as f32 * dt_sec;
            out.damage += dmg;
            if let Some(src) = self.parasite.source {
                out.heal_source = Some((src, dmg * PARASITE_HEAL_FRAC));
            }
            if !self.parasite.active() {
                self.parasite = TimedStacks::default();
            }
        }

        if self.burn.active() {
            self.burn.time_ms -= dt_ms;
            out.damage += BURN_DPS_PER_STACK * self.burn.stacks as f32 * dt_sec;
            if !self.burn.active() {
                self.burn = TimedStacks::default();
            }
        }

        if self.slow.time_ms > 0.0 {
            self.slow.time_ms -= dt_ms;
            if self.slow.time_ms <= 0.0 {
                self.slow = Slow::default();
            }
        }

        if self.stun.time_ms > 0.0 {
            self.stun.time_ms = (self.stun.time_ms - dt_ms).max(0.0);
        }

        if self.shield.time_ms > 0.0 {
            self.shield.time_ms -= dt_ms;
            if self.shield.time_ms <= 0.0 {
                self.shield = Shield::default();
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stacking_adds_and_refreshes_to_max() {
        let mut s = StatusSet::default();
        s.apply_poison(2, Some(1));
        s.poison.time_ms = 500.0; // partially elapsed
        s.apply_poison(3, Some(1));
        assert_eq!(s.poison.stacks, 5);
        // max(current, fixed), never the sum
        assert_eq!(s.poison.time_ms, POISON_DURATION_MS);
    }

    #[test]
    fn test_refresh_never_shortens() {
        let mut s = StatusSet::default();
        s.apply_burn(1, None);
        s.burn.time_ms = 5000.0; // externally extended
        s.apply_burn(1, None);
        assert_eq!(s.burn.time_ms, 5000.0);
    }

    #[test]
    fn test_expiry_resets_stacks_and_source() {
        let mut s = StatusSet::default();
        s.apply_poison(4, Some(0));
        s.advance(POISON_DURATION_MS + 1.0);
        assert_eq!(s.poison.stacks, 0);
        assert_eq!(s.poison.source, None);
    }

    #[test]
    fn test_poison_damage_rate() {
        let mut s = StatusSet::default();
        s.apply_poison(2, Some(1));
        // 5 dps/stack * 2 stacks over one second
        let mut total = 0.0;
        for _ in 0..10 {
            total += s.advance(100.0).damage;
        }
        assert!((total - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_parasite_heals_source_at_half_rate() {
        let mut s = StatusSet::default();
        s.apply_parasite(2, Some(0));
        let tick = s.advance(1000.0);
        let (src, heal) = tick.heal_source.unwrap();
        assert_eq!(src, 0);
        assert!((heal - tick.damage * 0.5).abs() < 0.001);
    }

    #[test]
    fn test_slow_multiplier_compounds() {
        let mut s = StatusSet::default();
        assert_eq!(s.slow_multiplier(), 1.0);
        s.slow.stacks = 2;
        s.slow.time_ms = 800.0;
        let expected = SLOW_FACTOR_PER_STACK * SLOW_FACTOR_PER_STACK;
        assert!((s.slow_multiplier() - expected).abs() < 0.001);
    }

    proptest! {
        /// Whatever the application order, stacks accumulate additively and
        /// the remaining duration is never above the fixed refresh window.
        #[test]
        fn prop_stack_accumulation(applications in proptest::collection::vec(1u32..5, 1..10)) {
            let mut s = StatusSet::default();
            let mut expected = 0u32;
            for n in &applications {
                s.apply_poison(*n, Some(1));
                expected += n;
            }
            prop_assert_eq!(s.poison.stacks, expected);
            prop_assert!(s.poison.time_ms <= POISON_DURATION_MS);
        }
    }
}
