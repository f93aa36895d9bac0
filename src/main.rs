//! Headless scripted-match driver
//!
//! Runs a deterministic match with two scripted players and logs the
//! round flow. Useful for exercising the simulation without a renderer:
//!
//! ```sh
//! RUST_LOG=info card-clash [seed]
//! ```

use card_clash::consts::NOMINAL_FRAME_MS;
use card_clash::sim::{
    choose_card, start_match, tick, GamePhase, MatchState, PlayerInput,
};

/// Stop after this much simulated time (ms)
const MAX_SIM_MS: f64 = 10.0 * 60.0 * 1000.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);

    let mut world = MatchState::new(seed);
    log::info!("running scripted match, seed {seed}");
    start_match(&mut world);

    let mut frame: u64 = 0;
    while world.time_ms < MAX_SIM_MS {
        let inputs = scripted_inputs(&world, frame);

        // Both players always take the first offered card
        if world.pick_state.active {
            if let Err(e) = choose_card(&mut world, 0) {
                log::warn!("pick failed: {e}");
            }
        }
        if world.phase == GamePhase::MatchReset {
            // Match decided; stop before the reset wipes the result
            break;
        }

        tick(&mut world, &inputs, NOMINAL_FRAME_MS);
        frame += 1;
    }

    println!(
        "finished after {:.1}s: score {}-{}, round {}",
        world.time_ms / 1000.0,
        world.scores[0],
        world.scores[1],
        world.round_number
    );
    println!(
        "player cards: {:?} vs {:?}",
        world.players[0]
            .cards
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>(),
        world.players[1]
            .cards
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
    );
}

/// Two simple scripted fighters: both chase each other and fire on a
/// staggered cadence so rounds actually resolve.
fn scripted_inputs(world: &MatchState, frame: u64) -> [PlayerInput; 2] {
    let p0 = &world.players[0];
    let p1 = &world.players[1];

    let chase_right = p1.center().x > p0.center().x;
    [
        PlayerInput {
            left: !chase_right,
            right: chase_right,
            jump: frame % 90 == 0,
            shoot: frame % 20 == 0,
            ..Default::default()
        },
        PlayerInput {
            left: chase_right,
            right: !chase_right,
            jump: frame % 75 == 5,
            shoot: frame % 24 == 3,
            ..Default::default()
        },
    ]
}
