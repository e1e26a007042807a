use crate::vec3::Vec3;
use serde::{Deserialize, Serialize};

/// Named court region used for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Player one's half (z < 0)
    ZoneA,
    /// Player two's half (z > 0)
    ZoneB,
    OutOfBounds,
    Net,
}

impl Zone {
    /// Parse the collision-geometry tag names.
    pub fn from_tag(tag: &str) -> Option<Zone> {
        match tag {
            "ZoneA" => Some(Zone::ZoneA),
            "ZoneB" => Some(Zone::ZoneB),
            "OutOfBounds" => Some(Zone::OutOfBounds),
            "Net" => Some(Zone::Net),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Zone::ZoneA => "ZoneA",
            Zone::ZoneB => "ZoneB",
            Zone::OutOfBounds => "OutOfBounds",
            Zone::Net => "Net",
        }
    }
}

/// Whether a player is driven by a person or by the built-in AI.
/// Fault assignment keys off this flag: humans play the player-one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Human,
    Ai,
}

/// Identity attached to hit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerTag {
    pub id: u32,
    pub kind: PlayerKind,
}

impl PlayerTag {
    pub fn human(id: u32) -> Self {
        Self {
            id,
            kind: PlayerKind::Human,
        }
    }

    pub fn ai(id: u32) -> Self {
        Self {
            id,
            kind: PlayerKind::Ai,
        }
    }
}

/// Outcome of a rally evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreDecision {
    None,
    Player1Point,
    Player2Point,
}

impl ScoreDecision {
    /// Point awarded to the opponent of a faulting hitter.
    pub fn fault_by(hitter: PlayerKind) -> Self {
        match hitter {
            PlayerKind::Human => ScoreDecision::Player2Point,
            PlayerKind::Ai => ScoreDecision::Player1Point,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RallyEventKind {
    PlayerHit,
    Bounce,
    NetHit,
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Flat,
    Topspin,
    Slice,
    Lob,
}

/// Events published by a running match, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchEvent {
    #[serde(rename = "player_hit")]
    PlayerHit {
        position: Vec3,
        velocity: Vec3,
        player: PlayerTag,
        shot: ShotType,
        /// First predicted ground contact; absent when the ball never lands
        #[serde(skip_serializing_if = "Option::is_none")]
        predicted_landing: Option<Vec3>,
    },
    #[serde(rename = "ground_hit")]
    GroundHit {
        position: Vec3,
        velocity: Vec3,
        zone: Zone,
    },
    #[serde(rename = "net_hit")]
    NetHit { position: Vec3, velocity: Vec3 },
    #[serde(rename = "out_of_bounds")]
    OutOfBounds { position: Vec3 },
    #[serde(rename = "rally_evaluated")]
    RallyEvaluated {
        decision: ScoreDecision,
        #[serde(rename = "scoreCall")]
        score_call: String,
    },
    #[serde(rename = "serve_ready")]
    ServeReady { server: PlayerTag, position: Vec3 },
}
