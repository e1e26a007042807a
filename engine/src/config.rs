use crate::error::{EngineError, Result};
use std::path::Path;
use tennis_shared::config::MatchConfig;

/// Env var naming an optional JSON match config file.
pub const CONFIG_PATH_ENV: &str = "TENNIS_CONFIG";

/// Runtime configuration for the frame loop
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tick_rate_hz: u32,
    pub snapshot_rate_hz: u32,
    pub rng_seed: u64,
    /// Stop after this many evaluated rallies
    pub max_points: Option<u32>,
    /// Let the AI drive player one as well
    pub autopilot_player_one: bool,
    pub command_buffer: usize,
    pub broadcast_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            snapshot_rate_hz: 10,
            rng_seed: 42,
            max_points: None,
            autopilot_player_one: true,
            command_buffer: 256,
            broadcast_buffer: 1024,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.tick_rate_hz == 0 {
            return Err("tick_rate_hz must be > 0".to_string());
        }
        if self.snapshot_rate_hz == 0 || self.snapshot_rate_hz > self.tick_rate_hz {
            return Err("snapshot_rate_hz must be in 1..=tick_rate_hz".to_string());
        }
        if self.max_points == Some(0) {
            return Err("max_points must be > 0 when set".to_string());
        }
        if self.command_buffer == 0 || self.broadcast_buffer == 0 {
            return Err("channel buffers must be > 0".to_string());
        }
        Ok(())
    }

    pub fn tick_dt(&self) -> f64 {
        1.0 / self.tick_rate_hz as f64
    }

    /// Ticks between snapshots.
    pub fn snapshot_every(&self) -> u64 {
        (self.tick_rate_hz / self.snapshot_rate_hz).max(1) as u64
    }
}

/// Read, parse and validate a JSON match config.
pub fn load_match_config(path: impl AsRef<Path>) -> Result<MatchConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
        path: path.display().to_string(),
        source,
    })?;
    let config = MatchConfig::from_json_str(&json)?;
    config.validate().map_err(EngineError::InvalidConfig)?;
    Ok(config)
}

/// Match config from `TENNIS_CONFIG` if set, defaults otherwise.
pub fn match_config_from_env() -> Result<MatchConfig> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => {
            tracing::info!("Loading match config from {}", path);
            load_match_config(path)
        }
        _ => Ok(MatchConfig::default()),
    }
}
