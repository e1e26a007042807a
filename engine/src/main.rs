//! Headless match runner. Streams events and snapshots to stdout as JSON lines.
//!
//! Usage: tennis-engine [--max-points N] [--seed S] [--tick-rate HZ] [--no-snapshots]
//!
//! Match tuning is read from the JSON file named by `TENNIS_CONFIG`, if set.

use tennis_engine::config::{match_config_from_env, EngineConfig};
use tennis_engine::game_loop::{run_game_loop, GameBroadcast, GameCommand};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = EngineConfig::default();
    let mut snapshots = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--max-points" => {
                i += 1;
                config.max_points = args.get(i).and_then(|s| s.parse().ok());
            }
            "--seed" => {
                i += 1;
                config.rng_seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(42);
            }
            "--tick-rate" => {
                i += 1;
                config.tick_rate_hz = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(60);
            }
            "--no-snapshots" => snapshots = false,
            other => tracing::warn!("Ignoring unknown argument {}", other),
        }
        i += 1;
    }

    // Validate configuration before starting
    if let Err(e) = config.validate() {
        eprintln!("Invalid engine configuration: {}", e);
        std::process::exit(1);
    }
    let match_config = match match_config_from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let (game_tx, game_rx) = mpsc::channel::<GameCommand>(config.command_buffer);
    let (broadcast_tx, mut broadcast_rx) = broadcast::channel::<GameBroadcast>(config.broadcast_buffer);

    let game = tokio::spawn(run_game_loop(game_rx, broadcast_tx, config, match_config));

    loop {
        tokio::select! {
            msg = broadcast_rx.recv() => match msg {
                Ok(GameBroadcast::Event(event)) => print_json(&event),
                Ok(GameBroadcast::Snapshot(snapshot)) => {
                    if snapshots {
                        print_json(&snapshot);
                    }
                }
                Ok(GameBroadcast::MatchOver { rallies, score_call }) => {
                    print_json(&serde_json::json!({
                        "type": "match_over",
                        "rallies": rallies,
                        "scoreCall": score_call,
                    }));
                    break;
                }
                Err(RecvError::Lagged(n)) => tracing::warn!("Output lagged, skipped {} messages", n),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                let _ = game_tx.send(GameCommand::Shutdown).await;
            }
        }
    }

    match game.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            eprintln!("Match failed: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Game loop panicked: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::warn!("Failed to serialize output: {}", e),
    }
}
