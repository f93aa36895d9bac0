//! Card catalog and mutation engine
//!
//! Every card is an enum variant with an explicit stat mutation, so each
//! effect is independently testable and nothing in the catalog can be
//! malformed. Applying the same card twice compounds its effect on
//! purpose: stacking perks (Poison, Bouncy, ...) rely on re-invocation
//! semantics.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardId {
    Barrage,
    Buckshot,
    Burst,
    Spray,
    Scavenger,
    BigBullets,
    BombsAway,
    Bouncy,
    Brawler,
    CarefulPlanning,
    Chase,
    ChillingPresence,
    ColdBullets,
    Combine,
    Dazzle,
    Decay,
    Defender,
    DemonicPact,
    DrillAmmo,
    GlassCannon,
    Grow,
    Homing,
    Huge,
    Leech,
    Lifestealer,
    Mayhem,
    Parasite,
    Phoenix,
    Poison,
    PristinePerseverance,
    QuickReload,
    QuickShot,
    SteadyShot,
    Tank,
    TargetBounce,
    TasteOfBlood,
    Thruster,
    TimedDetonation,
    ToxicCloud,
    Trickster,
    WindUp,
}

/// The draftable pool. Dazzle appears twice on purpose: duplicate slots
/// double the draw probability of stacking-friendly picks.
pub const CATALOG: &[CardId] = &[
    CardId::Barrage,
    CardId::Buckshot,
    CardId::Burst,
    CardId::Spray,
    CardId::Scavenger,
    CardId::BigBullets,
    CardId::BombsAway,
    CardId::Bouncy,
    CardId::Brawler,
    CardId::CarefulPlanning,
    CardId::Chase,
    CardId::ChillingPresence,
    CardId::ColdBullets,
    CardId::Combine,
    CardId::Dazzle,
    CardId::Decay,
    CardId::Defender,
    CardId::DemonicPact,
    CardId::DrillAmmo,
    CardId::Dazzle,
    CardId::GlassCannon,
    CardId::Grow,
    CardId::Homing,
    CardId::Huge,
    CardId::Leech,
    CardId::Lifestealer,
    CardId::Mayhem,
    CardId::Parasite,
    CardId::Phoenix,
    CardId::Poison,
    CardId::PristinePerseverance,
    CardId::QuickReload,
    CardId::QuickShot,
    CardId::SteadyShot,
    CardId::Tank,
    CardId::TargetBounce,
    CardId::TasteOfBlood,
    CardId::Thruster,
    CardId::TimedDetonation,
    CardId::ToxicCloud,
    CardId::Trickster,
    CardId::WindUp,
];

/// Draw `n` options without replacement from a fresh copy of the catalog.
/// The shared catalog is never mutated; repeated calls see the full pool.
pub fn draw_options(rng: &mut Pcg32, n: usize) -> Vec<CardId> {
    let mut pool: Vec<CardId> = CATALOG.to_vec();
    let mut picks = Vec::with_capacity(n);
    while picks.len() < n && !pool.is_empty() {
        let idx = rng.random_range(0..pool.len());
        picks.push(pool.swap_remove(idx));
    }
    picks
}

impl CardId {
    pub fn name(self) -> &'static str {
        match self {
            CardId::Barrage => "Barrage",
            CardId::Buckshot => "Buckshot",
            CardId::Burst => "Burst",
            CardId::Spray => "Spray",
            CardId::Scavenger => "Scavenger",
            CardId::BigBullets => "Big Bullets",
            CardId::BombsAway => "Bombs Away",
            CardId::Bouncy => "Bouncy",
            CardId::Brawler => "Brawler",
            CardId::CarefulPlanning => "Careful Planning",
            CardId::Chase => "Chase",
            CardId::ChillingPresence => "Chilling Presence",
            CardId::ColdBullets => "Cold Bullets",
            CardId::Combine => "Combine",
            CardId::Dazzle => "Dazzle",
            CardId::Decay => "Decay",
            CardId::Defender => "Defender",
            CardId::DemonicPact => "Demonic Pact",
            CardId::DrillAmmo => "Drill Ammo",
            CardId::GlassCannon => "Glass Cannon",
            CardId::Grow => "Grow",
            CardId::Homing => "Homing",
            CardId::Huge => "Huge",
            CardId::Leech => "Leech",
            CardId::Lifestealer => "Lifestealer",
            CardId::Mayhem => "Mayhem",
            CardId::Parasite => "Parasite",
            CardId::Phoenix => "Phoenix",
            CardId::Poison => "Poison",
            CardId::PristinePerseverance => "Pristine Perseverance",
            CardId::QuickReload => "Quick Reload",
            CardId::QuickShot => "Quick Shot",
            CardId::SteadyShot => "Steady Shot",
            CardId::Tank => "Tank",
            CardId::TargetBounce => "Target Bounce",
            CardId::TasteOfBlood => "Taste of Blood",
            CardId::Thruster => "Thruster",
            CardId::TimedDetonation => "Timed Detonation",
            CardId::ToxicCloud => "Toxic Cloud",
            CardId::Trickster => "Trickster",
            CardId::WindUp => "Wind Up",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CardId::Barrage => "Fire many bullets at once (+5 bullets/shot, -70% damage)",
            CardId::Buckshot => "Shotgun-style shot (+6 pellets, -60% damage)",
            CardId::Burst => "3-round burst (-60% damage)",
            CardId::Spray => "High fire rate (+12 ammo, -75% damage)",
            CardId::Scavenger => "Dealing damage restores ammo",
            CardId::BigBullets => "Bigger bullets, slight damage up",
            CardId::BombsAway => "Carry bombs; +15% max health",
            CardId::Bouncy => "+2 bounces, +25% damage",
            CardId::Brawler => "+200% max health for 3s after hitting",
            CardId::CarefulPlanning => "+100% damage, much slower attacks",
            CardId::Chase => "Keep momentum toward the opponent; +30% health",
            CardId::ChillingPresence => "Slow nearby enemies; +25% health",
            CardId::ColdBullets => "Bullets slow on hit",
            CardId::Combine => "+100% damage, -2 ammo",
            CardId::Dazzle => "Bullets stun on hit (stacks per copy)",
            CardId::Decay => "Incoming damage burns over time instead; +50% health",
            CardId::Defender => "+30% max health",
            CardId::DemonicPact => "A darker magazine (+9 ammo)",
            CardId::DrillAmmo => "Bullets pierce up to 7 targets",
            CardId::GlassCannon => "+100% damage, nearly no health",
            CardId::Grow => "Bullets gain damage and size over travel",
            CardId::Homing => "Bullets home toward targets (-25% damage)",
            CardId::Huge => "+80% max health",
            CardId::Leech => "75% lifesteal; +30% health",
            CardId::Lifestealer => "Feed on proximity; +25% health",
            CardId::Mayhem => "+5 bounces, -15% damage",
            CardId::Parasite => "Shots infest the target, healing you for half the drain",
            CardId::Phoenix => "Revive once on death at reduced health",
            CardId::Poison => "Poison shots (stacking)",
            CardId::PristinePerseverance => "+400% max health while above 90% health",
            CardId::QuickReload => "-70% reload time",
            CardId::QuickShot => "+150% bullet speed, longer reload",
            CardId::SteadyShot => "+40% health, +100% bullet speed",
            CardId::Tank => "+100% health, -25% attack speed",
            CardId::TargetBounce => "+1 bounce that seeks targets (-20% damage)",
            CardId::TasteOfBlood => "+50% move speed for 3s after dealing damage; 30% lifesteal",
            CardId::Thruster => "Bullets shove targets on hit",
            CardId::TimedDetonation => "Bullets leave bombs behind (-15% damage)",
            CardId::ToxicCloud => "Bullets burst into a poison cloud on impact",
            CardId::Trickster => "+2 bounces, damage grows per bounce",
            CardId::WindUp => "+100% bullet speed, +60% damage, slow attacks",
        }
    }

    /// Mutate the player's live stat block. Calling twice compounds.
    pub fn apply(self, p: &mut Player) {
        match self {
            CardId::Barrage => {
                p.multishot = true;
                p.bullets_per_shot += 5;
                p.base_damage = (p.base_damage * 0.30).round();
                p.max_ammo += 5;
                p.ammo = p.max_ammo;
            }
            CardId::Buckshot => {
                p.multishot = true;
                p.bullets_per_shot += 6;
                p.base_damage = (p.base_damage * 0.4).round();
                p.spread += 0.25;
            }
            CardId::Burst => {
                p.burst = true;
                p.burst_count = 3;
                p.burst_delay_ms = 60.0;
                p.base_damage = (p.base_damage * 0.4).round();
            }
            CardId::Spray => {
                p.rapid_fire = true;
                p.attack_speed *= 10.0;
                p.max_ammo += 12;
                p.ammo = p.max_ammo;
                p.base_damage = (p.base_damage * 0.25).round();
            }
            CardId::Scavenger => {
                p.reload_on_hit = true;
                p.scavenger = 1;
            }
            CardId::BigBullets => {
                p.base_damage = (p.base_damage * 1.12).round();
            }
            CardId::BombsAway => {
                p.bombs_away = true;
                p.max_health = (p.max_health * 1.15).round();
                p.ammo = p.max_ammo;
            }
            CardId::Bouncy => {
                p.bounce += 2;
                p.base_damage = (p.base_damage * 1.25).round();
            }
            CardId::Brawler => {
                p.brawler = true;
            }
            CardId::CarefulPlanning => {
                p.base_damage = (p.base_damage * 2.0).round();
                p.attack_speed *= 0.4;
            }
            CardId::Chase => {
                p.move_speed_mul = p.move_speed_mul.max(1.0);
                p.max_health = (p.max_health * 1.3).round();
                p.health = p.health.min(p.max_health);
                p.chase = true;
            }
            CardId::ChillingPresence => {
                p.max_health = (p.max_health * 1.25).round();
                p.health = p.health.min(p.max_health);
                p.chill_presence = true;
            }
            CardId::ColdBullets => {
                p.cold_bullets = true;
            }
            CardId::Combine => {
                p.base_damage = (p.base_damage * 2.0).round();
                p.max_ammo = p.max_ammo.saturating_sub(2).max(1);
                p.ammo = p.ammo.min(p.max_ammo);
            }
            CardId::Dazzle => {
                p.dazzle = true;
            }
            CardId::Decay => {
                p.decay = true;
                p.max_health = (p.max_health * 1.5).round();
                p.health = p.health.min(p.max_health);
            }
            CardId::Defender => {
                p.max_health = (p.max_health * 1.3).round();
                p.health = p.health.min(p.max_health);
            }
            CardId::DemonicPact => {
                p.demonic_pact = true;
                p.max_ammo += 9;
                p.ammo = p.max_ammo;
            }
            CardId::DrillAmmo => {
                p.pierce += 7;
            }
            CardId::GlassCannon => {
                p.base_damage = (p.base_damage * 2.0).round();
                p.max_health = (p.max_health * 0.01).round().max(6.0);
                p.health = p.health.min(p.max_health);
            }
            CardId::Grow => {
                p.has_grow = true;
            }
            CardId::Homing => {
                p.homing = true;
                p.base_damage = (p.base_damage * 0.75).round();
            }
            CardId::Huge => {
                p.max_health = (p.max_health * 1.8).round();
                p.health = p.health.min(p.max_health);
            }
            CardId::Leech => {
                p.lifesteal = p.lifesteal.max(0.75);
                p.max_health = (p.max_health * 1.3).round();
                p.health = p.health.min(p.max_health);
            }
            CardId::Lifestealer => {
                p.lifestealer = true;
                p.max_health = (p.max_health * 1.25).round();
                p.health = p.health.min(p.max_health);
            }
            CardId::Mayhem => {
                p.bounce += 5;
                p.base_damage = (p.base_damage * 0.85).round();
            }
            CardId::Parasite => {
                p.parasite_stacks += 1;
            }
            CardId::Phoenix => {
                p.can_revive = true;
                p.max_health = (p.max_health * 0.65).round();
                p.health = p.health.min(p.max_health);
            }
            CardId::Poison => {
                p.poison_stacks += 1;
            }
            CardId::PristinePerseverance => {
                p.pristine = true;
            }
            CardId::QuickReload => {
                p.reload_time_ms = (p.reload_time_ms * 0.30).round().max(8.0);
            }
            CardId::QuickShot => {
                p.bullet_speed *= 2.5;
                p.reload_time_ms += 250.0;
            }
            CardId::SteadyShot => {
                p.max_health = (p.max_health * 1.4).round();
                p.health = p.health.min(p.max_health);
                p.bullet_speed *= 2.0;
            }
            CardId::Tank => {
                p.max_health = (p.max_health * 2.0).round();
                p.health = p.health.min(p.max_health);
                p.attack_speed *= 0.75;
            }
            CardId::TargetBounce => {
                p.target_bounce = true;
                p.bounce += 1;
                p.base_damage = (p.base_damage * 0.8).round();
            }
            CardId::TasteOfBlood => {
                p.taste_of_blood = true;
                p.lifesteal = p.lifesteal.max(0.30);
            }
            CardId::Thruster => {
                p.thruster = true;
            }
            CardId::TimedDetonation => {
                p.timed_detonation = true;
                p.base_damage = (p.base_damage * 0.85).round();
            }
            CardId::ToxicCloud => {
                p.toxic_cloud = true;
                p.attack_speed *= 0.8;
            }
            CardId::Trickster => {
                p.trickster = true;
                p.bounce += 2;
                p.base_damage = (p.base_damage * 0.8).round();
            }
            CardId::WindUp => {
                p.bullet_speed *= 2.0;
                p.base_damage = (p.base_damage * 1.6).round();
                p.attack_speed *= 0.5;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn test_player() -> Player {
        Player::new(0, Vec2::new(100.0, 100.0), &Tuning::default())
    }

    #[test]
    fn test_draw_without_replacement() {
        let mut rng = Pcg32::seed_from_u64(7);
        let picks = draw_options(&mut rng, 5);
        assert_eq!(picks.len(), 5);
        // Distinct catalog slots: at most one value may repeat, and only
        // because Dazzle legitimately occupies two slots.
        let dazzles = picks.iter().filter(|c| **c == CardId::Dazzle).count();
        assert!(dazzles <= 2);
        for card in &picks {
            let drawn = picks.iter().filter(|c| *c == card).count();
            let slots = CATALOG.iter().filter(|c| *c == card).count();
            assert!(drawn <= slots);
        }

        // The shared catalog is untouched by repeated draws
        let before = CATALOG.len();
        for _ in 0..20 {
            draw_options(&mut rng, 5);
        }
        assert_eq!(CATALOG.len(), before);
    }

    #[test]
    fn test_apply_appends_card_name() {
        let mut p = test_player();
        p.apply_card(CardId::Bouncy);
        assert_eq!(p.cards, vec![CardId::Bouncy]);
        assert_eq!(p.bounce, 2);
    }

    #[test]
    fn test_reapplication_compounds() {
        let mut p = test_player();
        p.apply_card(CardId::Poison);
        p.apply_card(CardId::Poison);
        assert_eq!(p.poison_stacks, 2);
        assert_eq!(p.cards.len(), 2);

        let mut q = test_player();
        let once = {
            q.apply_card(CardId::BigBullets);
            q.base_damage
        };
        q.apply_card(CardId::BigBullets);
        assert!(q.base_damage > once);
    }

    #[test]
    fn test_glass_cannon_health_floor() {
        let mut p = test_player();
        p.apply_card(CardId::GlassCannon);
        assert_eq!(p.max_health, 6.0);
        assert!(p.health <= p.max_health);
        assert_eq!(p.base_damage, 20.0);
    }

    #[test]
    fn test_combine_keeps_at_least_one_round() {
        let mut p = test_player();
        for _ in 0..5 {
            p.apply_card(CardId::Combine);
        }
        assert!(p.max_ammo >= 1);
        assert!(p.ammo <= p.max_ammo);
    }

    #[test]
    fn test_catalog_has_duplicate_dazzle_slot() {
        let dazzle_slots = CATALOG.iter().filter(|c| **c == CardId::Dazzle).count();
        assert_eq!(dazzle_slots, 2);
        assert_eq!(CATALOG.len(), 42);
    }

    proptest! {
        /// Any draw of 5 from the full pool yields 5 picks, and no single
        /// catalog slot is drawn twice (Dazzle may appear at most twice
        /// because it holds two slots).
        #[test]
        fn prop_draws_are_replacement_free(seed in 0u64..10_000) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let picks = draw_options(&mut rng, 5);
            prop_assert_eq!(picks.len(), 5);
            for card in CATALOG {
                let in_catalog = CATALOG.iter().filter(|c| *c == card).count();
                let drawn = picks.iter().filter(|c| *c == card).count();
                prop_assert!(drawn <= in_catalog);
            }
        }
    }
}
