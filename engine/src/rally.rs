//! Rally state machine.
//!
//! Consumes hit/bounce/net/out-of-bounds events for one point, keeps the
//! ordered rally log and per-zone bounce counters, and turns the rally into a
//! single [`ScoreDecision`] when it ends by out-of-bounds or idle timeout.
//!
//! ```text
//! WaitingForRally --PlayerHit--> RallyInProgress --OOB/timeout--> RallyEnded
//!        ^                                                            |
//!        +---------------------- evaluate + reset -------------------+
//! ```

use crate::scoreboard::Scoreboard;
use tennis_shared::config::RallyConfig;
use tennis_shared::events::{PlayerTag, RallyEventKind, ScoreDecision, Zone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RallyState {
    WaitingForRally,
    RallyInProgress,
    RallyEnded,
}

/// One entry of the rally log.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RallyEvent {
    pub kind: RallyEventKind,
    pub timestamp: f64,
    pub zone: Option<Zone>,
    pub hitter: Option<PlayerTag>,
}

/// Which evaluation rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Two or more bounces in the active zone.
    DoubleBounce,
    /// Out of bounds with no bounce in the active zone.
    OutBeforeBounce,
    /// Out of bounds after at least one bounce. Scored as a fault by the
    /// hitter, same as [`Verdict::OutBeforeBounce`].
    OutAfterBounce,
    /// Ended without a fault (e.g. timeout); nobody scores.
    NoFault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RallyOutcome {
    pub decision: ScoreDecision,
    pub verdict: Verdict,
}

/// Bounces per court half for the current rally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BounceCounts {
    pub zone_a: u32,
    pub zone_b: u32,
}

impl BounceCounts {
    pub fn get(&self, zone: Option<Zone>) -> u32 {
        match zone {
            Some(Zone::ZoneA) => self.zone_a,
            Some(Zone::ZoneB) => self.zone_b,
            _ => 0,
        }
    }

    fn increment(&mut self, zone: Option<Zone>) {
        match zone {
            Some(Zone::ZoneA) => self.zone_a += 1,
            Some(Zone::ZoneB) => self.zone_b += 1,
            _ => {}
        }
    }
}

pub struct RallyMachine {
    idle_timeout: f64,
    state: RallyState,
    log: Vec<RallyEvent>,
    bounces: BounceCounts,
    last_hitter: Option<PlayerTag>,
    last_zone: Option<Zone>,
    rally_start: f64,
    last_hit_time: f64,
}

impl RallyMachine {
    pub fn new(config: &RallyConfig) -> Self {
        Self {
            idle_timeout: config.idle_timeout,
            state: RallyState::WaitingForRally,
            log: Vec::new(),
            bounces: BounceCounts::default(),
            last_hitter: None,
            last_zone: None,
            rally_start: 0.0,
            last_hit_time: 0.0,
        }
    }

    pub fn state(&self) -> RallyState {
        self.state
    }

    pub fn last_hitter(&self) -> Option<PlayerTag> {
        self.last_hitter
    }

    /// Most recently reported zone; the active zone for scoring.
    pub fn last_zone(&self) -> Option<Zone> {
        self.last_zone
    }

    pub fn bounces(&self) -> BounceCounts {
        self.bounces
    }

    pub fn bounce_count(&self, zone: Zone) -> u32 {
        self.bounces.get(Some(zone))
    }

    pub fn log(&self) -> &[RallyEvent] {
        &self.log
    }

    pub fn rally_start(&self) -> f64 {
        self.rally_start
    }

    /// Zone-trigger input: the ball is now over `zone`. Only court halves
    /// become the active zone; out-of-bounds and net arrive as their own events.
    pub fn report_zone(&mut self, zone: Zone) {
        match zone {
            Zone::ZoneA | Zone::ZoneB => self.last_zone = Some(zone),
            Zone::OutOfBounds | Zone::Net => {
                tracing::debug!("Zone report {:?} does not change the active zone", zone);
            }
        }
    }

    pub fn player_hit(&mut self, player: PlayerTag, now: f64) {
        match self.state {
            RallyState::WaitingForRally => {
                self.state = RallyState::RallyInProgress;
                self.rally_start = now;
                tracing::info!("Rally started by player {} ({:?})", player.id, player.kind);
            }
            RallyState::RallyInProgress => {}
            RallyState::RallyEnded => {
                tracing::warn!("Ignoring hit by player {} after rally ended", player.id);
                return;
            }
        }
        self.last_hitter = Some(player);
        self.last_hit_time = now;
        self.push(RallyEvent {
            kind: RallyEventKind::PlayerHit,
            timestamp: now,
            zone: None,
            hitter: Some(player),
        });
    }

    /// Floor contact, attributed to the most recently reported zone.
    pub fn bounce(&mut self, now: f64) {
        if !self.accepts(RallyEventKind::Bounce) {
            return;
        }
        let zone = self.last_zone;
        if zone.is_none() {
            tracing::warn!("Bounce at {:.2} with no zone reported", now);
        }
        self.bounces.increment(zone);
        self.push(RallyEvent {
            kind: RallyEventKind::Bounce,
            timestamp: now,
            zone,
            hitter: None,
        });
    }

    pub fn net_hit(&mut self, now: f64) {
        if !self.accepts(RallyEventKind::NetHit) {
            return;
        }
        self.push(RallyEvent {
            kind: RallyEventKind::NetHit,
            timestamp: now,
            zone: Some(Zone::Net),
            hitter: None,
        });
    }

    /// Ball left play: ends and evaluates the rally.
    pub fn out_of_bounds(
        &mut self,
        now: f64,
        scoreboard: &mut dyn Scoreboard,
    ) -> Option<RallyOutcome> {
        if !self.accepts(RallyEventKind::OutOfBounds) {
            return None;
        }
        self.push(RallyEvent {
            kind: RallyEventKind::OutOfBounds,
            timestamp: now,
            zone: Some(Zone::OutOfBounds),
            hitter: None,
        });
        self.end_rally();
        self.evaluate(scoreboard)
    }

    /// Ends and evaluates the rally once nobody has hit the ball for the idle timeout.
    pub fn check_timeout(
        &mut self,
        now: f64,
        scoreboard: &mut dyn Scoreboard,
    ) -> Option<RallyOutcome> {
        if self.state != RallyState::RallyInProgress {
            return None;
        }
        if now - self.last_hit_time <= self.idle_timeout {
            return None;
        }
        tracing::debug!(
            "Rally idle for {:.2}s, ending",
            now - self.last_hit_time
        );
        self.end_rally();
        self.evaluate(scoreboard)
    }

    /// InProgress -> Ended. Returns false from any other state.
    pub fn end_rally(&mut self) -> bool {
        if self.state != RallyState::RallyInProgress {
            return false;
        }
        self.state = RallyState::RallyEnded;
        true
    }

    /// Decide the ended rally, hand the decision to the scoreboard, then
    /// reset for the next point. A no-op unless the rally has ended.
    pub fn evaluate(&mut self, scoreboard: &mut dyn Scoreboard) -> Option<RallyOutcome> {
        if self.state != RallyState::RallyEnded {
            return None;
        }
        let outcome = self.decide();
        scoreboard.record(outcome.decision);
        tracing::info!(
            "Rally evaluated: {:?} ({:?}, {} events)",
            outcome.decision,
            outcome.verdict,
            self.log.len()
        );
        self.reset();
        Some(outcome)
    }

    /// Scoring policy over the current log and counters. Pure.
    pub fn decide(&self) -> RallyOutcome {
        let no_fault = RallyOutcome {
            decision: ScoreDecision::None,
            verdict: Verdict::NoFault,
        };
        let Some(hitter) = self.last_hitter else {
            return no_fault;
        };
        let fault = |verdict| RallyOutcome {
            decision: ScoreDecision::fault_by(hitter.kind),
            verdict,
        };

        let active_bounces = self.bounces.get(self.last_zone);
        if active_bounces >= 2 {
            return fault(Verdict::DoubleBounce);
        }

        let went_out = self
            .log
            .iter()
            .any(|e| e.kind == RallyEventKind::OutOfBounds);
        if went_out {
            if active_bounces == 0 {
                return fault(Verdict::OutBeforeBounce);
            }
            return fault(Verdict::OutAfterBounce);
        }

        no_fault
    }

    /// Clear log, counters, hitter and zone; back to waiting.
    pub fn reset(&mut self) {
        self.log.clear();
        self.bounces = BounceCounts::default();
        self.last_hitter = None;
        self.last_zone = None;
        self.state = RallyState::WaitingForRally;
    }

    fn accepts(&self, kind: RallyEventKind) -> bool {
        if self.state == RallyState::RallyInProgress {
            return true;
        }
        tracing::debug!("Ignoring {:?} while {:?}", kind, self.state);
        false
    }

    fn push(&mut self, event: RallyEvent) {
        tracing::debug!(
            "Rally event {:?} at {:.2} zone {:?}",
            event.kind,
            event.timestamp,
            event.zone
        );
        self.log.push(event);
    }
}
