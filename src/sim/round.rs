//! Round lifecycle state machine
//!
//! Splash -> Drafting -> InRound -> RoundEnd -> (Drafting | MatchReset)
//! -> Splash. Phase transitions that need a delay go through the
//! scheduler as typed actions, never ad-hoc timers.

use std::collections::VecDeque;

use rand::Rng;

use crate::sim::CommandError;

use super::cards::{draw_options, CardId};
use super::map::MAP_TEMPLATES;
use super::player::Player;
use super::scheduler::Action;
use super::state::{GamePhase, MatchState, PickState, PlayerId};

/// Cards offered per pick
pub const DRAFT_OPTIONS: usize = 5;
/// Delay from match start to the first pick appearing (ms)
pub const PICK_INTRO_DELAY_MS: f64 = 120.0;
/// Delay between a selection and the next picker's options (ms)
pub const PICK_ADVANCE_DELAY_MS: f64 = 220.0;
/// Delay from round end to the winner's pick (ms)
pub const ROUND_END_DRAFT_DELAY_MS: f64 = 420.0;
/// Delay from match point to the full reset (ms)
pub const MATCH_RESET_DELAY_MS: f64 = 1200.0;

/// First start interaction: seed the opening draft (both players pick).
pub fn start_match(world: &mut MatchState) {
    if world.phase != GamePhase::Splash {
        return;
    }
    world.draft_queue = VecDeque::from([0, 1]);
    world.pick_state = PickState::default();
    world.phase = GamePhase::Drafting;
    world
        .scheduler
        .schedule(world.time_ms + PICK_INTRO_DELAY_MS, Action::AdvanceDraft);
    log::info!("match started (seed {})", world.seed);
}

/// Present options to the next queued picker, or start the round when
/// the queue has drained.
pub(crate) fn advance_draft(world: &mut MatchState) {
    if world.phase == GamePhase::MatchReset {
        return;
    }
    match world.draft_queue.pop_front() {
        Some(picker) => {
            world.phase = GamePhase::Drafting;
            world.pick_state.active = true;
            world.pick_state.current_picker = Some(picker);
            world.pick_state.options = draw_options(&mut world.rng, DRAFT_OPTIONS);
            world.pick_state.chosen = None;
        }
        None => {
            world.pick_state = PickState::default();
            start_round(world);
        }
    }
}

/// Apply the current picker's selection (hotkey index or clicked slot).
pub fn choose_card(world: &mut MatchState, slot: usize) -> Result<CardId, CommandError> {
    if !world.pick_state.active {
        return Err(CommandError::NoActivePick);
    }
    let Some(picker) = world.pick_state.current_picker else {
        return Err(CommandError::NoActivePick);
    };
    if slot >= world.pick_state.options.len() {
        return Err(CommandError::SlotOutOfRange(slot));
    }
    let card = world.pick_state.options[slot];
    world.players[picker].apply_card(card);
    world.pick_state.active = false;
    world.pick_state.chosen = Some(card);
    world
        .scheduler
        .schedule(world.time_ms + PICK_ADVANCE_DELAY_MS, Action::AdvanceDraft);
    Ok(card)
}

/// Admin entry point: hand a player any card outside the draft.
pub fn give_card(world: &mut MatchState, player: PlayerId, card: CardId) -> Result<(), CommandError> {
    if player >= world.players.len() {
        return Err(CommandError::NoSuchPlayer(player));
    }
    world.players[player].apply_card(card);
    Ok(())
}

/// Pick a random map, respawn both players, clear live entities.
pub(crate) fn start_round(world: &mut MatchState) {
    world.map_index = world.rng.random_range(0..MAP_TEMPLATES.len());
    world.arena =
        MAP_TEMPLATES[world.map_index].build(world.view_w, world.view_h, world.tuning.gravity);
    let (spawn_a, spawn_b) = (world.arena.spawn_a, world.arena.spawn_b);
    world.players[0].respawn_at(spawn_a);
    world.players[1].respawn_at(spawn_b);
    world.projectiles.clear();
    world.aoes.clear();
    world.bombs.clear();
    world.particles.clear();
    world.scheduler.clear_combat();
    world.phase = GamePhase::InRound;
    log::info!("round {} on {}", world.round_number, world.arena.name);
}

/// Score the round; either queue the next draft (winner picks first) or
/// enter the match-reset window.
pub(crate) fn end_round(world: &mut MatchState, winner: PlayerId) {
    world.phase = GamePhase::RoundEnd;
    world.scores[winner] += 1;
    world.round_number += 1;
    log::info!(
        "round won by player {} (score {}-{})",
        winner,
        world.scores[0],
        world.scores[1]
    );

    if world.scores[winner] >= world.tuning.target_score {
        world.phase = GamePhase::MatchReset;
        world
            .scheduler
            .schedule(world.time_ms + MATCH_RESET_DELAY_MS, Action::ResetMatch);
        log::info!("player {winner} takes the match");
    } else {
        let loser = MatchState::opponent_of(winner);
        world.draft_queue = VecDeque::from([winner, loser]);
        world
            .scheduler
            .schedule(world.time_ms + ROUND_END_DRAFT_DELAY_MS, Action::AdvanceDraft);
    }
}

/// Wipe scores and rebuild both players from scratch, discarding every
/// card-derived mutation. Generations bump so deferred actions aimed at
/// the old incarnations die on the vine.
pub(crate) fn reset_match(world: &mut MatchState) {
    world.scores = [0, 0];
    world.round_number = 1;
    let spawns = [world.arena.spawn_a, world.arena.spawn_b];
    for (id, spawn) in spawns.into_iter().enumerate() {
        let generation = world.players[id].generation + 1;
        let mut fresh = Player::new(id, spawn, &world.tuning);
        fresh.generation = generation;
        world.players[id] = fresh;
    }
    world.projectiles.clear();
    world.aoes.clear();
    world.bombs.clear();
    world.particles.clear();
    world.scheduler.clear_combat();
    world.phase = GamePhase::Splash;
    log::info!("match reset");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_match_seeds_draft_queue() {
        let mut world = MatchState::new(1);
        start_match(&mut world);
        assert_eq!(world.phase, GamePhase::Drafting);
        assert_eq!(world.draft_queue, VecDeque::from([0, 1]));
        assert_eq!(world.scheduler.pending().len(), 1);
    }

    #[test]
    fn test_start_match_only_from_splash() {
        let mut world = MatchState::new(1);
        world.phase = GamePhase::InRound;
        start_match(&mut world);
        assert_eq!(world.phase, GamePhase::InRound);
        assert!(world.draft_queue.is_empty());
    }

    #[test]
    fn test_draft_flow_applies_and_advances() {
        let mut world = MatchState::new(1);
        start_match(&mut world);
        advance_draft(&mut world);
        assert!(world.pick_state.active);
        assert_eq!(world.pick_state.current_picker, Some(0));
        assert_eq!(world.pick_state.options.len(), DRAFT_OPTIONS);

        let card = choose_card(&mut world, 2).unwrap();
        assert_eq!(world.players[0].cards, vec![card]);
        assert!(!world.pick_state.active);

        advance_draft(&mut world);
        assert_eq!(world.pick_state.current_picker, Some(1));
        choose_card(&mut world, 0).unwrap();

        // Queue drained: next advance starts the round
        advance_draft(&mut world);
        assert_eq!(world.phase, GamePhase::InRound);
        assert!(world.projectiles.is_empty());
        assert_eq!(world.players[0].pos, world.arena.spawn_a);
    }

    #[test]
    fn test_choose_card_rejections() {
        let mut world = MatchState::new(1);
        assert_eq!(choose_card(&mut world, 0), Err(CommandError::NoActivePick));

        start_match(&mut world);
        advance_draft(&mut world);
        assert_eq!(
            choose_card(&mut world, 99),
            Err(CommandError::SlotOutOfRange(99))
        );
        // A rejected action leaves the pick open
        assert!(world.pick_state.active);
    }

    #[test]
    fn test_give_card_checks_player() {
        let mut world = MatchState::new(1);
        assert_eq!(
            give_card(&mut world, 7, CardId::Poison),
            Err(CommandError::NoSuchPlayer(7))
        );
        give_card(&mut world, 0, CardId::Poison).unwrap();
        assert_eq!(world.players[0].poison_stacks, 1);
    }

    #[test]
    fn test_winner_picks_first_next_draft() {
        let mut world = MatchState::new(1);
        world.phase = GamePhase::InRound;
        end_round(&mut world, 1);
        assert_eq!(world.scores, [0, 1]);
        assert_eq!(world.round_number, 2);
        assert_eq!(world.draft_queue, VecDeque::from([1, 0]));
        assert_eq!(world.phase, GamePhase::RoundEnd);
    }

    #[test]
    fn test_target_score_enters_match_reset() {
        let mut world = MatchState::new(1);
        world.phase = GamePhase::InRound;
        world.scores[0] = 4;
        end_round(&mut world, 0);
        assert_eq!(world.phase, GamePhase::MatchReset);
        assert!(world.draft_queue.is_empty());
    }

    #[test]
    fn test_reset_match_rebuilds_from_defaults() {
        let mut world = MatchState::new(1);
        world.players[0].apply_card(CardId::GlassCannon);
        world.players[0].apply_card(CardId::Poison);
        world.scores = [5, 2];
        world.round_number = 8;
        let old_gen = world.players[0].generation;

        reset_match(&mut world);
        assert_eq!(world.phase, GamePhase::Splash);
        assert_eq!(world.scores, [0, 0]);
        assert_eq!(world.round_number, 1);
        for p in &world.players {
            assert!(p.cards.is_empty());
            assert_eq!(p.base_damage, world.tuning.base_damage);
            assert_eq!(p.max_health, world.tuning.max_health);
            assert_eq!(p.poison_stacks, 0);
        }
        assert_eq!(world.players[0].generation, old_gen + 1);
    }

    #[test]
    fn test_round_start_clears_live_entities_but_keeps_cards() {
        let mut world = MatchState::new(1);
        world.players[1].apply_card(CardId::Huge);
        world.players[0].health = 3.0;
        start_round(&mut world);
        assert_eq!(world.phase, GamePhase::InRound);
        assert_eq!(world.players[0].health, world.players[0].max_health);
        assert_eq!(world.players[1].cards, vec![CardId::Huge]);
        assert_eq!(world.players[1].max_health, 180.0);
    }
}
