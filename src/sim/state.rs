//! Match state and core simulation types
//!
//! The whole world lives in [`MatchState`]: no module-level mutable state
//! anywhere. Everything needed to snapshot or replay a match serializes;
//! cosmetic-only fields are skipped.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VIEW_H, DEFAULT_VIEW_W};
use crate::tuning::Tuning;

use super::cards::CardId;
use super::map::{Arena, MAP_TEMPLATES};
use super::player::Player;
use super::projectile::{AreaEffect, Bomb, Particle, Projectile};
use super::scheduler::{OwnerRef, Scheduler};

/// Index into [`MatchState::players`]
pub type PlayerId = usize;

/// Current phase of the match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, awaiting the first start interaction
    Splash,
    /// Sequential single-player card picks
    Drafting,
    /// Live combat
    InRound,
    /// Scored; waiting to re-enter the draft
    RoundEnd,
    /// Match decided; waiting for the reset delay
    MatchReset,
}

/// What the draft UI renders and answers to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickState {
    pub active: bool,
    pub current_picker: Option<PlayerId>,
    pub options: Vec<CardId>,
    /// Last applied pick, for UI feedback
    pub chosen: Option<CardId>,
}

/// Complete simulation state for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,

    pub view_w: f32,
    pub view_h: f32,
    /// Index of the template the current arena was built from
    pub map_index: usize,
    pub arena: Arena,

    pub players: [Player; 2],
    pub projectiles: Vec<Projectile>,
    pub aoes: Vec<AreaEffect>,
    pub bombs: Vec<Bomb>,
    /// Visual only
    #[serde(skip)]
    pub particles: Vec<Particle>,

    pub phase: GamePhase,
    pub scores: [u32; 2],
    pub round_number: u32,
    /// Players still owed a card pick this draft, in pick order
    pub draft_queue: VecDeque<PlayerId>,
    pub pick_state: PickState,

    pub scheduler: Scheduler,
    /// Simulation clock (ms since match construction)
    pub time_ms: f64,
}

impl MatchState {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), DEFAULT_VIEW_W, DEFAULT_VIEW_H)
    }

    pub fn with_config(seed: u64, tuning: Tuning, view_w: f32, view_h: f32) -> Self {
        let arena = MAP_TEMPLATES[0].build(view_w, view_h, tuning.gravity);
        let players = [
            Player::new(0, arena.spawn_a, &tuning),
            Player::new(1, arena.spawn_b, &tuning),
        ];
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            view_w,
            view_h,
            map_index: 0,
            arena,
            players,
            projectiles: Vec::new(),
            aoes: Vec::new(),
            bombs: Vec::new(),
            particles: Vec::new(),
            phase: GamePhase::Splash,
            scores: [0, 0],
            round_number: 1,
            draft_queue: VecDeque::new(),
            pick_state: PickState::default(),
            scheduler: Scheduler::default(),
            time_ms: 0.0,
        }
    }

    /// Rebuild the current arena against a new viewport
    pub fn resize(&mut self, view_w: f32, view_h: f32) {
        self.view_w = view_w;
        self.view_h = view_h;
        self.arena = MAP_TEMPLATES[self.map_index].build(view_w, view_h, self.tuning.gravity);
    }

    #[inline]
    pub fn opponent_of(id: PlayerId) -> PlayerId {
        1 - id
    }

    /// A generation-stamped reference to a player's current incarnation
    pub fn owner_ref(&self, id: PlayerId) -> OwnerRef {
        OwnerRef {
            id,
            generation: self.players[id].generation,
        }
    }

    /// Does this reference still name the live incarnation?
    pub fn is_current(&self, owner: OwnerRef) -> bool {
        owner.id < 2 && self.players[owner.id].generation == owner.generation
    }

    /// Mutable access to a player and their opponent at once
    pub fn pair_mut(&mut self, id: PlayerId) -> (&mut Player, &mut Player) {
        let (a, b) = self.players.split_at_mut(1);
        if id == 0 {
            (&mut a[0], &mut b[0])
        } else {
            (&mut b[0], &mut a[0])
        }
    }

    /// Debug snapshot for external tooling; cosmetic state is omitted.
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::warn!("snapshot failed: {e}");
            String::from("{}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_defaults() {
        let world = MatchState::new(42);
        assert_eq!(world.phase, GamePhase::Splash);
        assert_eq!(world.scores, [0, 0]);
        assert_eq!(world.round_number, 1);
        assert!(world.players.iter().all(|p| p.alive));
        assert_eq!(world.players[0].pos, world.arena.spawn_a);
        assert_eq!(world.players[1].pos, world.arena.spawn_b);
    }

    #[test]
    fn test_pair_mut_splits_correctly() {
        let mut world = MatchState::new(42);
        let (me, other) = world.pair_mut(1);
        assert_eq!(me.id, 1);
        assert_eq!(other.id, 0);
    }

    #[test]
    fn test_generation_staleness() {
        let mut world = MatchState::new(42);
        let stale = world.owner_ref(0);
        world.players[0].generation += 1;
        assert!(!world.is_current(stale));
        assert!(world.is_current(world.owner_ref(0)));
    }

    #[test]
    fn test_resize_rebuilds_same_template() {
        let mut world = MatchState::new(42);
        let name = world.arena.name.clone();
        world.resize(1920.0, 1080.0);
        assert_eq!(world.arena.name, name);
        assert_eq!(world.view_w, 1920.0);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let world = MatchState::new(7);
        let json = world.snapshot_json();
        let back: MatchState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 7);
        assert_eq!(back.phase, GamePhase::Splash);
    }
}
