//! Player entity: platformer physics, statuses, perks and damage
//!
//! A player is mutated every tick by physics, status ticks and card
//! effects; respawned (stats preserved) at round start; and fully rebuilt
//! at match reset. Admin tooling may poke fields directly between frames,
//! so every derived quantity is clamped on use rather than trusted.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;
use crate::{normalize_angle, shortest_angle_diff};

use super::cards::CardId;
use super::map::Arena;
use super::state::PlayerId;
use super::status::StatusSet;
use super::tick::PlayerInput;

/// Grow compounds the damage multiplier once per this interval
const GROW_INTERVAL_MS: f32 = 10.0;
const GROW_FACTOR: f32 = 1.01;

const TASTE_OF_BLOOD_MS: f32 = 3000.0;
const TASTE_OF_BLOOD_SPEED: f32 = 1.5;

const BRAWLER_MS: f32 = 3000.0;
const BRAWLER_FACTOR: f32 = 3.0;

const PRISTINE_FACTOR: f32 = 5.0;
const PRISTINE_THRESHOLD: f32 = 0.9;

const REVIVE_MAX_FRAC: f32 = 0.65;
const REVIVE_MIN_MAX: f32 = 8.0;
const REVIVE_HEALTH_FRAC: f32 = 0.45;
const REVIVE_FLASH_MS: f32 = 900.0;
const LAVA_FLASH_MS: f32 = 450.0;

const POISON_TINT: [f32; 4] = [0.0, 200.0, 50.0, 0.32];
const PARASITE_TINT: [f32; 4] = [160.0, 0.0, 200.0, 0.42];
const BURN_TINT: [f32; 4] = [220.0, 80.0, 0.0, 0.32];
const LAVA_TINT: [f32; 4] = [255.0, 120.0, 60.0, 0.45];
const REVIVE_TINT: [f32; 4] = [255.0, 240.0, 120.0, 0.6];

/// Result of routing damage at a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Killed,
    Revived,
    Survived,
}

/// Short-lived cosmetic overlay (lava contact, revive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    pub color: [f32; 4],
    pub time_ms: f32,
}

/// Side effects of one player update the caller must route
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerEvents {
    /// Heal owed to a parasite source, if that player is still alive
    pub parasite_heal: Option<(PlayerId, f32)>,
    /// Lava burned the player this tick; particle burst goes here
    pub lava_contact: Option<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Bumped on full rebuild so stale deferred actions can be detected
    pub generation: u32,

    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub vel: Vec2,
    pub w: f32,
    pub h: f32,
    pub grounded: bool,

    pub alive: bool,
    pub health: f32,
    pub max_health: f32,

    pub ammo: u32,
    pub max_ammo: u32,
    /// Remaining reload time; ammo refills when it hits zero
    pub reload_ms: f32,
    pub reload_time_ms: f32,

    pub base_damage: f32,
    pub bullet_speed: f32,
    pub move_speed: f32,

    pub attack_speed: f32,
    pub move_speed_mul: f32,
    pub bullet_speed_mul: f32,
    pub lifesteal: f32,
    /// Ammo restored per point of damage dealt
    pub scavenger: u32,
    pub spread: f32,

    // Shot-carried effects
    pub poison_stacks: u32,
    pub parasite_stacks: u32,
    pub toxic_cloud: bool,
    pub explosive: u32,
    pub bounce: u32,
    pub pierce: u32,
    pub timed_detonation: bool,
    pub homing: bool,
    pub remote: bool,
    pub trickster: bool,
    pub thruster: bool,
    pub sneaky: bool,
    pub dazzle: bool,

    // Defensive perks
    pub decay: bool,
    pub can_revive: bool,
    pub pristine: bool,
    pub pristine_base_max: Option<f32>,
    pub pristine_boost: bool,

    // Triggered perks
    pub brawler: bool,
    pub brawler_base_max: Option<f32>,
    pub brawler_ms: f32,
    pub taste_of_blood: bool,
    pub taste_of_blood_ms: f32,
    pub has_grow: bool,
    pub grow_damage_mul: f32,
    pub grow_timer_ms: f32,

    // Flags with no simulation behavior of their own (stat changes on
    // their cards still apply); surfaced for external tooling.
    pub chase: bool,
    pub chill_presence: bool,
    pub cold_bullets: bool,
    pub lifestealer: bool,
    pub bombs_away: bool,
    pub target_bounce: bool,
    pub demonic_pact: bool,
    pub reload_on_hit: bool,

    // Firing modes
    pub multishot: bool,
    pub bullets_per_shot: u32,
    pub burst: bool,
    pub burst_count: u32,
    pub burst_delay_ms: f32,
    pub rapid_fire: bool,
    /// Earliest simulation time the next shot may fire
    pub next_fire_ms: f64,

    pub status: StatusSet,
    pub cards: Vec<CardId>,

    /// +1 facing right, -1 facing left
    pub facing: f32,
    pub gun_angle: f32,

    pub lava_cooldown_ms: f32,
    #[serde(skip)]
    pub flash: Option<Flash>,
}

impl Player {
    pub fn new(id: PlayerId, spawn: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            generation: 0,
            pos: spawn,
            vel: Vec2::ZERO,
            w: PLAYER_W,
            h: PLAYER_H,
            grounded: false,
            alive: true,
            health: tuning.max_health,
            max_health: tuning.max_health,
            ammo: tuning.max_ammo,
            max_ammo: tuning.max_ammo,
            reload_ms: 0.0,
            reload_time_ms: tuning.reload_ms,
            base_damage: tuning.base_damage,
            bullet_speed: tuning.bullet_speed,
            move_speed: tuning.move_speed,
            attack_speed: 1.0,
            move_speed_mul: 1.0,
            bullet_speed_mul: 1.0,
            lifesteal: 0.0,
            scavenger: 0,
            spread: 0.0,
            poison_stacks: 0,
            parasite_stacks: 0,
            toxic_cloud: false,
            explosive: 0,
            bounce: 0,
            pierce: 0,
            timed_detonation: false,
            homing: false,
            remote: false,
            trickster: false,
            thruster: false,
            sneaky: false,
            dazzle: false,
            decay: false,
            can_revive: false,
            pristine: false,
            pristine_base_max: None,
            pristine_boost: false,
            brawler: false,
            brawler_base_max: None,
            brawler_ms: 0.0,
            taste_of_blood: false,
            taste_of_blood_ms: 0.0,
            has_grow: false,
            grow_damage_mul: 1.0,
            grow_timer_ms: 0.0,
            chase: false,
            chill_presence: false,
            cold_bullets: false,
            lifestealer: false,
            bombs_away: false,
            target_bounce: false,
            demonic_pact: false,
            reload_on_hit: false,
            multishot: false,
            bullets_per_shot: 1,
            burst: false,
            burst_count: 1,
            burst_delay_ms: 0.0,
            rapid_fire: false,
            next_fire_ms: 0.0,
            status: StatusSet::default(),
            cards: Vec::new(),
            facing: 1.0,
            gun_angle: 0.0,
            lava_cooldown_ms: 0.0,
            flash: None,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.w, self.h) / 2.0
    }

    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y + self.h
    }

    /// Half the larger body dimension, used as the hit radius
    #[inline]
    pub fn body_radius(&self) -> f32 {
        self.w.max(self.h) / 2.0
    }

    /// Apply a card's mutation and record it
    pub fn apply_card(&mut self, card: CardId) {
        card.apply(self);
        self.cards.push(card);
        log::debug!("player {} drafted {}", self.id, card.name());
    }

    /// Reset for a new round at a spawn point; stats and cards survive.
    pub fn respawn_at(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.health = self.max_health;
        self.ammo = self.max_ammo;
        self.reload_ms = 0.0;
        self.alive = true;
        self.grounded = false;
        self.status = StatusSet::default();
        self.flash = None;
        self.lava_cooldown_ms = 0.0;
    }

    /// Route damage through shield and decay; floors at 1.
    pub fn take_damage(&mut self, amount: f32, source: Option<PlayerId>) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Survived;
        }
        if self.decay {
            // Damage is converted into a burn stack instead of health loss
            self.status.apply_burn(1, source);
            return DamageOutcome::Survived;
        }
        let dmg = (amount - self.status.shield.value).round().max(1.0);
        self.health -= dmg;
        self.settle_death()
    }

    /// Resolve health <= 0 into death or the one-shot revive.
    pub fn settle_death(&mut self) -> DamageOutcome {
        if self.health > 0.0 {
            return DamageOutcome::Survived;
        }
        if self.can_revive {
            self.can_revive = false;
            self.max_health = (self.max_health * REVIVE_MAX_FRAC).round().max(REVIVE_MIN_MAX);
            self.health = (self.max_health * REVIVE_HEALTH_FRAC).round();
            self.flash = Some(Flash {
                color: REVIVE_TINT,
                time_ms: REVIVE_FLASH_MS,
            });
            DamageOutcome::Revived
        } else {
            self.alive = false;
            DamageOutcome::Killed
        }
    }

    /// Attacker-side hooks after dealing `amount` damage.
    ///
    /// Baselines for the temporary boosts are stored on first trigger
    /// only, so stacked triggers can't corrupt the reverted value.
    pub fn on_deal_damage(&mut self, amount: f32) {
        if self.lifesteal > 0.0 {
            self.health = (self.health + amount * self.lifesteal).min(self.max_health);
        }
        if self.scavenger > 0 {
            self.ammo = (self.ammo + self.scavenger).min(self.max_ammo);
        }
        if self.taste_of_blood {
            self.taste_of_blood_ms = self.taste_of_blood_ms.max(TASTE_OF_BLOOD_MS);
            self.move_speed_mul = self.move_speed_mul.max(TASTE_OF_BLOOD_SPEED);
        }
        if self.brawler {
            let base = *self.brawler_base_max.get_or_insert(self.max_health);
            self.max_health = (base * BRAWLER_FACTOR).round();
            self.health = (self.health + 1.0).min(self.max_health);
            self.brawler_ms = BRAWLER_MS;
        }
    }

    /// Cosmetic tint: a pure function of active effects and flashes.
    pub fn tint(&self) -> Option<[f32; 4]> {
        let mut t: Option<[f32; 4]> = None;
        if self.status.poison.active() {
            t = Some(blend_tint(t, POISON_TINT));
        }
        if self.status.parasite.active() {
            t = Some(blend_tint(t, PARASITE_TINT));
        }
        if self.status.burn.active() {
            t = Some(blend_tint(t, BURN_TINT));
        }
        if let Some(flash) = self.flash {
            t = Some(blend_tint(t, flash.color));
        }
        t
    }

    /// Advance one frame: movement, platforming, lava, aim, statuses,
    /// timers, perks, death. `opponent_center` drives aim.
    pub fn update(
        &mut self,
        input: Option<&PlayerInput>,
        dt_ms: f32,
        opponent_center: Option<Vec2>,
        arena: &Arena,
    ) -> PlayerEvents {
        let dt_sec = dt_ms / 1000.0;
        let mut events = PlayerEvents::default();

        // A stunned player gets no say in their movement
        let input = if self.status.stunned() { None } else { input };

        let effective_speed =
            self.move_speed * self.move_speed_mul * self.status.slow_multiplier();
        match input {
            Some(input) => {
                if input.left {
                    self.vel.x = -effective_speed;
                } else if input.right {
                    self.vel.x = effective_speed;
                } else {
                    self.vel.x *= IDLE_DAMPING;
                }
                if input.jump && self.grounded {
                    self.vel.y = JUMP_IMPULSE;
                    self.grounded = false;
                }
            }
            None => {
                self.vel.x *= NO_INPUT_DAMPING;
            }
        }

        self.vel.y += arena.gravity;
        self.pos += self.vel;

        // Land on a platform only when last frame's feet were above it
        self.grounded = false;
        for plat in &arena.platforms {
            if plat.overlaps_x(self.pos.x, self.w) {
                let feet = self.feet();
                if feet >= plat.y && feet - self.vel.y <= plat.y + LANDING_TOLERANCE {
                    self.pos.y = plat.y - self.h;
                    self.vel.y = 0.0;
                    self.grounded = true;
                }
            }
        }

        if self.lava_cooldown_ms > 0.0 {
            self.lava_cooldown_ms = (self.lava_cooldown_ms - dt_ms).max(0.0);
        }
        if let Some(lava_y) = arena.lava_y {
            if self.feet() > lava_y {
                if self.lava_cooldown_ms <= 0.0 {
                    self.lava_cooldown_ms = LAVA_COOLDOWN_MS;
                    self.health -= LAVA_DAMAGE;
                    self.vel.y = LAVA_KNOCKBACK;
                    self.flash = Some(Flash {
                        color: LAVA_TINT,
                        time_ms: LAVA_FLASH_MS,
                    });
                    events.lava_contact = Some(self.center());
                }
                self.pos.y = self.pos.y.min(lava_y - self.h - 1.0);
            }
        }

        if let Some(target) = opponent_center {
            let to_target = target - self.center();
            let want = to_target.y.atan2(to_target.x);
            let diff = shortest_angle_diff(self.gun_angle, want);
            let rate = (AIM_LERP_RATE * dt_sec * 60.0).clamp(0.0, 1.0);
            self.gun_angle = normalize_angle(self.gun_angle + diff * rate);
            self.facing = if self.gun_angle.cos() >= 0.0 { 1.0 } else { -1.0 };
        }

        let status_tick = self.status.advance(dt_ms);
        self.health -= status_tick.damage;
        events.parasite_heal = status_tick.heal_source;

        if self.taste_of_blood_ms > 0.0 {
            self.taste_of_blood_ms = (self.taste_of_blood_ms - dt_ms).max(0.0);
            if self.taste_of_blood_ms <= 0.0 {
                self.move_speed_mul = 1.0;
            }
        }

        if self.reload_ms > 0.0 {
            self.reload_ms -= dt_ms;
            if self.reload_ms <= 0.0 {
                self.reload_ms = 0.0;
                self.ammo = self.max_ammo;
            }
        }

        if self.has_grow {
            // Accumulator: exactly floor(acc / interval) applications, no
            // drift across uneven frame deltas.
            self.grow_timer_ms += dt_ms;
            let steps = (self.grow_timer_ms / GROW_INTERVAL_MS).floor();
            if steps >= 1.0 {
                self.grow_damage_mul *= GROW_FACTOR.powi(steps as i32);
                self.grow_timer_ms -= steps * GROW_INTERVAL_MS;
            }
        }

        if self.pristine {
            // Remember the unboosted maximum once; reversal always scales
            // against it, never against an already boosted value.
            let base = *self.pristine_base_max.get_or_insert(self.max_health);
            let above = self.health >= base * PRISTINE_THRESHOLD;
            if above && !self.pristine_boost {
                self.pristine_boost = true;
                self.max_health = (base * PRISTINE_FACTOR).round();
                self.health = (self.health * PRISTINE_FACTOR).round().min(self.max_health);
            } else if !above && self.pristine_boost {
                let ratio = self.health / self.max_health.max(1.0);
                self.max_health = base;
                self.health = (self.max_health * ratio).round().min(self.max_health);
                self.pristine_boost = false;
            }
        }

        if self.brawler_ms > 0.0 {
            self.brawler_ms -= dt_ms;
            if self.brawler_ms <= 0.0 {
                self.brawler_ms = 0.0;
                if let Some(base) = self.brawler_base_max.take() {
                    self.max_health = base;
                    self.health = self.health.min(self.max_health);
                }
            }
        }

        if let Some(flash) = &mut self.flash {
            flash.time_ms -= dt_ms;
            if flash.time_ms <= 0.0 {
                self.flash = None;
            }
        }

        if self.alive && self.health <= 0.0 {
            self.settle_death();
        }

        events
    }
}

/// Alpha-weighted tint blend
fn blend_tint(a: Option<[f32; 4]>, b: [f32; 4]) -> [f32; 4] {
    match a {
        None => b,
        Some(a) => {
            let (oa, ob) = (a[3], b[3]);
            let w = (oa + ob).max(f32::EPSILON);
            [
                (a[0] * oa + b[0] * ob) / w,
                (a[1] * oa + b[1] * ob) / w,
                (a[2] * oa + b[2] * ob) / w,
                (oa + ob).min(0.9),
            ]
        }
    }
}
