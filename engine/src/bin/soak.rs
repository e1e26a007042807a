//! Offline soak test for the match engine.
//!
//! Plays AI against AI as fast as possible (no wall-clock pacing) and
//! reports how rallies ended.
//!
//! Usage: cargo run --bin soak -- [OPTIONS]
//!
//! Options:
//!   --points N     Rallies to play (default: 500)
//!   --seed S       RNG seed (default: 42)
//!   --max-time S   Give up after this much simulated time (default: 36000)

use std::collections::HashMap;
use std::time::Instant;
use tennis_engine::config::{match_config_from_env, EngineConfig};
use tennis_engine::court::Side;
use tennis_engine::scoreboard::TennisScoreboard;
use tennis_engine::state::MatchBuilder;
use tennis_shared::events::{MatchEvent, ScoreDecision, ShotType};

#[derive(Default)]
struct Stats {
    decisions: HashMap<ScoreDecision, u64>,
    shots: HashMap<ShotType, u64>,
    bounces: u64,
    net_hits: u64,
    out_of_bounds: u64,
    hits_this_rally: u64,
    longest_rally: u64,
    total_hits: u64,
}

impl Stats {
    fn record(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::PlayerHit { shot, .. } => {
                *self.shots.entry(*shot).or_default() += 1;
                self.hits_this_rally += 1;
                self.total_hits += 1;
            }
            MatchEvent::GroundHit { .. } => self.bounces += 1,
            MatchEvent::NetHit { .. } => self.net_hits += 1,
            MatchEvent::OutOfBounds { .. } => self.out_of_bounds += 1,
            MatchEvent::RallyEvaluated { decision, .. } => {
                *self.decisions.entry(*decision).or_default() += 1;
                self.longest_rally = self.longest_rally.max(self.hits_this_rally);
                self.hits_this_rally = 0;
            }
            MatchEvent::ServeReady { .. } => {}
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut points: u32 = 500;
    let mut seed: u64 = 42;
    let mut max_time: f64 = 36_000.0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--points" => {
                i += 1;
                points = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(500);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(42);
            }
            "--max-time" => {
                i += 1;
                max_time = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(36_000.0);
            }
            _ => {}
        }
        i += 1;
    }

    let match_config = match match_config_from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let dt = EngineConfig::default().tick_dt();

    let mut state = match MatchBuilder::new(match_config)
        .seed(seed)
        .scoreboard(TennisScoreboard::new())
        .autopilot(Side::One, true)
        .build()
    {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to build match: {}", e);
            std::process::exit(1);
        }
    };

    println!("=== Tennis Engine Soak Test ===");
    println!("Points: {}", points);
    println!("Seed: {}", seed);
    println!();

    let start = Instant::now();
    let mut stats = Stats::default();
    let mut ticks: u64 = 0;
    while state.evaluated() < points && state.clock() < max_time {
        for event in state.tick(dt) {
            stats.record(&event);
        }
        ticks += 1;
    }
    let elapsed = start.elapsed();

    println!("=== Final Results ===");
    println!("Rallies evaluated: {}", state.evaluated());
    println!("Simulated time: {:.1}s over {} ticks", state.clock(), ticks);
    println!("Wall time: {:?}", elapsed);
    if elapsed.as_secs_f64() > 0.0 {
        println!(
            "Speed-up over real time: {:.0}x",
            state.clock() / elapsed.as_secs_f64()
        );
    }
    println!("Score: {}", state.score_call());
    println!();

    for decision in [
        ScoreDecision::Player1Point,
        ScoreDecision::Player2Point,
        ScoreDecision::None,
    ] {
        println!(
            "{:?}: {}",
            decision,
            stats.decisions.get(&decision).copied().unwrap_or(0)
        );
    }
    for shot in [ShotType::Flat, ShotType::Topspin, ShotType::Slice, ShotType::Lob] {
        println!("{:?} shots: {}", shot, stats.shots.get(&shot).copied().unwrap_or(0));
    }
    println!("Bounces: {}", stats.bounces);
    println!("Net hits: {}", stats.net_hits);
    println!("Out of bounds: {}", stats.out_of_bounds);
    println!("Longest rally: {} hits", stats.longest_rally);
    if state.evaluated() > 0 {
        println!(
            "Average hits per rally: {:.2}",
            stats.total_hits as f64 / state.evaluated() as f64
        );
    }
}
