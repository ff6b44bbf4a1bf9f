//! Handfoot simulator: plays one full game between four computer players.

use handfoot_core::{GameError, GamePhase, GameState, Strategy};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::{SimConfig, SEATS};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SimConfig::from_env()?;
    info!(config = %serde_json::to_string(&config)?, "Starting Handfoot simulation...");

    let mut game = match config.seed {
        Some(seed) => GameState::with_seed(config.rules.clone(), seed),
        None => GameState::new(config.rules.clone()),
    };
    let strategy = Strategy {
        discard: config.discard,
        ..Strategy::default()
    };
    for seat in &SEATS {
        game.add_player(seat.name, seat.precision, seat.speed, strategy.clone())?;
    }

    game.start()?;
    run(&mut game, config.max_turns)?;

    report(&game)?;
    Ok(())
}

/// Play turns and rounds until the game is over
fn run(game: &mut GameState, max_turns: u32) -> anyhow::Result<()> {
    let mut round_turns = 0;
    loop {
        match game.phase {
            GamePhase::PlayerTurn { player } => {
                if round_turns >= max_turns {
                    warn!(round = game.round, turns = round_turns, "turn limit reached, closing round");
                    game.close_round()?;
                    continue;
                }
                match game.play_turn(player) {
                    Ok(_) => {}
                    Err(GameError::NoCardsAvailable { player }) => {
                        warn!(player, round = game.round, "draw piles exhausted, closing round");
                        game.close_round()?;
                    }
                    Err(e) => return Err(e.into()),
                }
                round_turns += 1;
            }
            GamePhase::RoundComplete { round, went_out } => {
                info!(round, ?went_out, turns = round_turns, "round finished");
                round_turns = 0;
                game.next_round()?;
            }
            GamePhase::GameOver { .. } => return Ok(()),
            _ => return Err(GameError::InvalidPhase.into()),
        }
    }
}

fn report(game: &GameState) -> anyhow::Result<()> {
    for (round, scores) in game.round_scores.iter().enumerate() {
        println!("round {}: {:?}", round + 1, scores);
    }
    for player in &game.table.players {
        println!("{}: {}", player.name, game.totals[player.id as usize]);
    }
    if let Some(winner) = game.get_winner() {
        if let Some(player) = game.get_player(winner) {
            println!("winner: {}", player.name);
        }
    }
    println!("{}", game.to_json()?);
    Ok(())
}
