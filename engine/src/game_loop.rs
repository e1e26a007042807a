use crate::config::EngineConfig;
use crate::court::Side;
use crate::error::Result;
use crate::scoreboard::TennisScoreboard;
use crate::state::{MatchBuilder, MatchSnapshot};
use std::time::Duration;
use tennis_shared::config::MatchConfig;
use tennis_shared::events::{MatchEvent, ShotType};
use tennis_shared::vec3::Vec3;
use tokio::sync::{broadcast, mpsc};

/// Input from controllers to the game loop
#[derive(Debug, Clone)]
pub enum GameCommand {
    Move {
        player_id: u32,
        direction: Vec3,
        sprint: bool,
    },
    Aim {
        player_id: u32,
        delta: f64,
    },
    Shot {
        player_id: u32,
        shot: ShotType,
        hold_time: f64,
    },
    Shutdown,
}

/// Broadcasts from the game loop to every listener
#[derive(Debug, Clone)]
pub enum GameBroadcast {
    Event(MatchEvent),
    Snapshot(MatchSnapshot),
    MatchOver { rallies: u32, score_call: String },
}

/// Run the match frame loop. Owns all match state.
///
/// Ends on [`GameCommand::Shutdown`], once every command sender is dropped,
/// or after `max_points` rallies have been evaluated.
pub async fn run_game_loop(
    mut cmd_rx: mpsc::Receiver<GameCommand>,
    broadcast_tx: broadcast::Sender<GameBroadcast>,
    engine_config: EngineConfig,
    match_config: MatchConfig,
) -> Result<()> {
    let mut state = MatchBuilder::new(match_config)
        .seed(engine_config.rng_seed)
        .scoreboard(TennisScoreboard::new())
        .autopilot(Side::One, engine_config.autopilot_player_one)
        .build()?;

    let dt = engine_config.tick_dt();
    let snapshot_every = engine_config.snapshot_every();
    let mut tick_count: u64 = 0;

    let mut tick_interval = tokio::time::interval(Duration::from_secs_f64(dt));
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!(
        "Game loop running at {} Hz (snapshots every {} ticks)",
        engine_config.tick_rate_hz,
        snapshot_every
    );

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                for event in state.tick(dt) {
                    // No receivers is fine; nobody may be watching yet.
                    let _ = broadcast_tx.send(GameBroadcast::Event(event));
                }

                tick_count += 1;
                if tick_count % snapshot_every == 0 {
                    let _ = broadcast_tx.send(GameBroadcast::Snapshot(state.snapshot()));
                }

                if engine_config.max_points.is_some_and(|max| state.evaluated() >= max) {
                    tracing::info!("Reached {} rallies", state.evaluated());
                    break;
                }
            }

            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    tracing::info!("Command channel closed");
                    break;
                };
                let outcome = match cmd {
                    GameCommand::Move { player_id, direction, sprint } => {
                        state.request_move(player_id, direction, sprint)
                    }
                    GameCommand::Aim { player_id, delta } => state.request_aim(player_id, delta),
                    GameCommand::Shot { player_id, shot, hold_time } => {
                        match state.request_aimed_shot(player_id, shot, hold_time) {
                            Ok(false) => {
                                tracing::debug!("Player {} shot not allowed", player_id);
                                Ok(())
                            }
                            other => other.map(|_| ()),
                        }
                    }
                    GameCommand::Shutdown => {
                        tracing::info!("Shutdown requested");
                        break;
                    }
                };
                if let Err(e) = outcome {
                    tracing::warn!("Rejected command: {}", e);
                }
            }
        }
    }

    let _ = broadcast_tx.send(GameBroadcast::MatchOver {
        rallies: state.evaluated(),
        score_call: state.score_call(),
    });
    tracing::info!("Game loop ended ({})", state.score_call());
    Ok(())
}
