//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Per-frame deltas clamped to a maximum step
//! - No rendering or platform dependencies
//!
//! Collaborators (renderer, input devices, draft UI, admin tooling) read
//! state from [`state::MatchState`] and drive it through [`tick::tick`],
//! [`tick::try_fire`] and the command surface in [`round`].

pub mod cards;
pub mod combat;
pub mod map;
pub mod player;
pub mod projectile;
pub mod round;
pub mod scheduler;
pub mod state;
pub mod status;
pub mod tick;

pub use cards::{CardId, CATALOG, draw_options};
pub use map::{Arena, MapTemplate, Platform, MAP_TEMPLATES};
pub use player::{DamageOutcome, Player};
pub use projectile::{AoeKind, AreaEffect, Bomb, Particle, Projectile};
pub use round::{choose_card, give_card, start_match};
pub use scheduler::{Action, OwnerRef, Scheduled, Scheduler};
pub use state::{GamePhase, MatchState, PickState, PlayerId};
pub use tick::{PlayerInput, tick, try_fire};

use thiserror::Error;

/// Errors from the command surface (draft selections, admin actions).
///
/// Nothing on the per-tick simulation path returns these; numeric edge
/// cases there are clamped instead of reported.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("no card pick is active")]
    NoActivePick,
    #[error("card slot {0} is out of range")]
    SlotOutOfRange(usize),
    #[error("no such player {0}")]
    NoSuchPlayer(usize),
}
