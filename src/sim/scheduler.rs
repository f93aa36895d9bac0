//! Deferred one-shot simulation actions
//!
//! Typed descriptors keyed by simulation time instead of closures, so
//! pending work can be inspected, serialized, and safely dropped when its
//! target entity has been rebuilt since scheduling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PlayerId;

/// A player reference that survives rebuilds: the generation is bumped on
/// match reset, so actions aimed at an old incarnation can be detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub id: PlayerId,
    pub generation: u32,
}

/// What to do when the fire time passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Detonate at a fixed point (timed-detonation terminal hits)
    ExplodeAt {
        pos: Vec2,
        damage: f32,
        owner: OwnerRef,
    },
    /// One shot of a burst volley
    FireBurstShot { shooter: OwnerRef },
    /// Move the draft flow to the next queued picker (or start the round)
    AdvanceDraft,
    /// Wipe scores and rebuild both players from defaults
    ResetMatch,
}

impl Action {
    /// True for combat side effects that should not leak across a round
    /// boundary. Draft-flow actions are never cleared.
    pub fn is_combat(&self) -> bool {
        matches!(self, Action::ExplodeAt { .. } | Action::FireBurstShot { .. })
    }
}

/// An action with its fire time (absolute simulation ms)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheduled {
    pub fire_at_ms: f64,
    pub action: Action,
}

/// Pending deferred actions, scanned once per frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
}

impl Scheduler {
    pub fn schedule(&mut self, fire_at_ms: f64, action: Action) {
        self.pending.push(Scheduled { fire_at_ms, action });
    }

    /// Remove and return every action whose fire time has passed, in fire
    /// order (ties keep insertion order).
    pub fn take_due(&mut self, now_ms: f64) -> Vec<Scheduled> {
        let mut due: Vec<Scheduled> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].fire_at_ms <= now_ms {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.fire_at_ms.total_cmp(&b.fire_at_ms));
        due
    }

    /// Drop combat actions at a round boundary; draft-flow actions survive.
    pub fn clear_combat(&mut self) {
        self.pending.retain(|s| !s.action.is_combat());
    }

    pub fn pending(&self) -> &[Scheduled] {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_due_in_fire_order() {
        let mut s = Scheduler::default();
        s.schedule(300.0, Action::AdvanceDraft);
        s.schedule(100.0, Action::ResetMatch);
        s.schedule(900.0, Action::AdvanceDraft);

        let due = s.take_due(500.0);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].action, Action::ResetMatch);
        assert_eq!(due[1].action, Action::AdvanceDraft);
        assert_eq!(s.pending().len(), 1);
    }

    #[test]
    fn test_clear_combat_keeps_draft_flow() {
        let owner = OwnerRef {
            id: 0,
            generation: 0,
        };
        let mut s = Scheduler::default();
        s.schedule(10.0, Action::FireBurstShot { shooter: owner });
        s.schedule(
            20.0,
            Action::ExplodeAt {
                pos: Vec2::ZERO,
                damage: 10.0,
                owner,
            },
        );
        s.schedule(30.0, Action::AdvanceDraft);

        s.clear_combat();
        assert_eq!(s.pending().len(), 1);
        assert_eq!(s.pending()[0].action, Action::AdvanceDraft);
    }
}
