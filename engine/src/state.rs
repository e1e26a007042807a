use crate::ai::{AiController, AiState, AiView};
use crate::ball::{BallMotion, BallState};
use crate::court::{Court, Side};
use crate::error::{EngineError, Result};
use crate::events::{EventBus, SubscriptionId};
use crate::player::Player;
use crate::rally::{RallyMachine, RallyOutcome, RallyState};
use crate::scoreboard::Scoreboard;
use crate::shot::ShotCommand;
use crate::trajectory::{self, Gravity};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tennis_shared::config::MatchConfig;
use tennis_shared::events::{MatchEvent, PlayerKind, ShotType, Zone};
use tennis_shared::vec3::{vec3, Vec3};

const SIDES: [Side; 2] = [Side::One, Side::Two];

/// Points in the landing-indicator arc carried by snapshots.
const ARC_SAMPLES: usize = 16;

/// Wires a [`MatchState`] together. A scoreboard is required.
pub struct MatchBuilder {
    config: MatchConfig,
    seed: u64,
    scoreboard: Option<Box<dyn Scoreboard + Send>>,
    autopilot: [bool; 2],
    first_server: Side,
}

impl MatchBuilder {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            seed: 42,
            scoreboard: None,
            autopilot: [false, true],
            first_server: Side::One,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn scoreboard(mut self, scoreboard: impl Scoreboard + Send + 'static) -> Self {
        self.scoreboard = Some(Box::new(scoreboard));
        self
    }

    /// Hand `side` to the AI. Player two is AI-driven by default.
    pub fn autopilot(mut self, side: Side, enabled: bool) -> Self {
        self.autopilot[side.index()] = enabled;
        self
    }

    pub fn first_server(mut self, side: Side) -> Self {
        self.first_server = side;
        self
    }

    pub fn build(self) -> Result<MatchState> {
        self.config.validate().map_err(EngineError::InvalidConfig)?;
        let scoreboard = self
            .scoreboard
            .ok_or(EngineError::MissingCollaborator("scoreboard"))?;

        let config = self.config;
        let gravity = Gravity::new(config.physics.gravity)?;
        let court = Court::new(config.court, &config.physics);
        let ball = BallMotion::new(config.physics, Vec3::ZERO)?;

        // Player one holds the human seat; fault assignment keys off the kind.
        let players = SIDES.map(|side| {
            let kind = match side {
                Side::One => PlayerKind::Human,
                Side::Two => PlayerKind::Ai,
            };
            let bounds = court.player_bounds(side, &config.players);
            Player::new(side.index() as u32 + 1, kind, side, bounds, config.players)
        });
        let brains = SIDES.map(|side| {
            self.autopilot[side.index()].then(|| {
                AiController::new(
                    config.ai,
                    gravity,
                    config.physics.floor_height(),
                    court.baseline(side),
                )
            })
        });

        let mut state = MatchState {
            config,
            gravity,
            ball,
            rally: RallyMachine::new(&config.rally),
            court,
            players,
            brains,
            scoreboard,
            rng: ChaCha8Rng::seed_from_u64(self.seed),
            clock: 0.0,
            bus: EventBus::new(),
            server: self.first_server,
            serving: false,
            announce_serve: false,
            evaluated: 0,
            last_outcome: None,
            pending: Vec::new(),
        };
        state.setup_serve();
        tracing::info!(
            "Match ready (seed {}, autopilot {:?}, P{} serves)",
            self.seed,
            self.autopilot,
            state.server.index() + 1
        );
        Ok(state)
    }
}

/// Player view for snapshots
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: u32,
    pub kind: PlayerKind,
    pub position: Vec3,
    pub stamina: f64,
    pub aim_angle: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiState>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub time: f64,
    pub ball: BallState,
    /// Remaining flight to the next floor contact, for landing indicators
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ball_arc: Vec<Vec3>,
    pub players: Vec<PlayerSnapshot>,
    pub rally: RallyState,
    pub server: u32,
    pub score_call: String,
    pub rallies: u32,
}

/// Everything a match needs, owned by one frame loop.
pub struct MatchState {
    config: MatchConfig,
    gravity: Gravity,
    ball: BallMotion,
    rally: RallyMachine,
    court: Court,
    players: [Player; 2],
    brains: [Option<AiController>; 2],
    scoreboard: Box<dyn Scoreboard + Send>,
    rng: ChaCha8Rng,
    clock: f64,
    bus: EventBus<MatchEvent>,
    server: Side,
    /// Ball held for the server; only the server may strike
    serving: bool,
    announce_serve: bool,
    evaluated: u32,
    last_outcome: Option<RallyOutcome>,
    /// Events emitted during the current tick
    pending: Vec<MatchEvent>,
}

impl MatchState {
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn ball(&self) -> &BallState {
        self.ball.state()
    }

    pub fn rally(&self) -> &RallyMachine {
        &self.rally
    }

    pub fn court(&self) -> &Court {
        &self.court
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, player_id: u32) -> Result<&Player> {
        let side = self.side_of(player_id)?;
        Ok(&self.players[side.index()])
    }

    pub fn server(&self) -> Side {
        self.server
    }

    pub fn is_serving(&self) -> bool {
        self.serving
    }

    /// Rallies evaluated so far.
    pub fn evaluated(&self) -> u32 {
        self.evaluated
    }

    /// Decision and rule of the most recently evaluated rally.
    pub fn last_outcome(&self) -> Option<RallyOutcome> {
        self.last_outcome
    }

    pub fn score_call(&self) -> String {
        self.scoreboard.call()
    }

    pub fn ai_state(&self, side: Side) -> Option<AiState> {
        self.brains[side.index()].as_ref().map(|b| b.state())
    }

    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&MatchEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Advance the match by `dt` seconds. Returns the events emitted since the
    /// previous tick (including those from `request_*` calls), in order.
    pub fn tick(&mut self, dt: f64) -> Vec<MatchEvent> {
        if !dt.is_finite() || dt <= 0.0 {
            tracing::warn!("Ignoring tick with dt {}", dt);
            return Vec::new();
        }
        self.clock += dt;
        self.announce_serve_if_due();

        for (side, command) in self.drive_ai(dt) {
            self.strike(side, command);
        }
        for player in &mut self.players {
            player.tick(dt);
        }

        self.advance_ball(dt);

        let outcome = self
            .rally
            .check_timeout(self.clock, &mut *self.scoreboard);
        self.finish_rally(outcome);

        std::mem::take(&mut self.pending)
    }

    pub fn request_move(&mut self, player_id: u32, direction: Vec3, sprint: bool) -> Result<()> {
        let side = self.side_of(player_id)?;
        self.players[side.index()].set_movement(direction, sprint);
        Ok(())
    }

    pub fn request_aim(&mut self, player_id: u32, delta: f64) -> Result<()> {
        let side = self.side_of(player_id)?;
        self.players[side.index()].adjust_aim(delta);
        Ok(())
    }

    /// Strike with an explicit direction. `Ok(false)` when the shot is not allowed now.
    pub fn request_shot(&mut self, player_id: u32, command: ShotCommand) -> Result<bool> {
        let side = self.side_of(player_id)?;
        Ok(self.strike(side, command))
    }

    /// Strike along the player's current aim.
    pub fn request_aimed_shot(&mut self, player_id: u32, shot: ShotType, hold_time: f64) -> Result<bool> {
        let side = self.side_of(player_id)?;
        let direction = self.players[side.index()].aim_direction();
        Ok(self.strike(side, ShotCommand::new(shot, direction, hold_time)))
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            time: self.clock,
            ball: *self.ball.state(),
            ball_arc: self.ball_arc(),
            players: SIDES
                .iter()
                .map(|side| {
                    let p = &self.players[side.index()];
                    PlayerSnapshot {
                        id: p.id,
                        kind: p.kind,
                        position: p.position,
                        stamina: p.stamina.current,
                        aim_angle: p.aim_angle(),
                        ai: self.ai_state(*side),
                    }
                })
                .collect(),
            rally: self.rally.state(),
            server: self.players[self.server.index()].id,
            score_call: self.scoreboard.call(),
            rallies: self.evaluated,
        }
    }

    fn side_of(&self, player_id: u32) -> Result<Side> {
        SIDES
            .into_iter()
            .find(|side| self.players[side.index()].id == player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))
    }

    fn emit(&mut self, event: MatchEvent) {
        self.bus.publish(&event);
        self.pending.push(event);
    }

    fn announce_serve_if_due(&mut self) {
        if !self.announce_serve {
            return;
        }
        self.announce_serve = false;
        let server = self.players[self.server.index()].tag();
        let position = self.ball.position();
        self.emit(MatchEvent::ServeReady { server, position });
    }

    fn drive_ai(&mut self, dt: f64) -> Vec<(Side, ShotCommand)> {
        let ball = *self.ball.state();
        let mut shots = Vec::new();
        for side in SIDES {
            let Some(brain) = self.brains[side.index()].as_mut() else {
                continue;
            };
            let (me, opponent) = split_players(&mut self.players, side);
            let view = AiView {
                ball: &ball,
                opponent,
                court: &self.court,
            };
            if let Some(command) = brain.tick(dt, me, &view, &mut self.rng) {
                shots.push((side, command));
            }
        }
        shots
    }

    fn strike(&mut self, side: Side, command: ShotCommand) -> bool {
        self.announce_serve_if_due();
        let striker = &self.players[side.index()];
        if self.serving {
            if side != self.server {
                tracing::debug!("Player {} cannot strike the other side's serve", striker.id);
                return false;
            }
        } else {
            if self.rally.last_hitter().map(|t| t.id) == Some(striker.id) {
                tracing::debug!("Player {} cannot strike twice in a row", striker.id);
                return false;
            }
            if !striker.can_reach(self.ball.position()) {
                tracing::debug!("Player {} is out of reach", striker.id);
                return false;
            }
        }

        let tag = striker.tag();
        let launch = command.resolve(&self.config.shots);
        let hit = self.ball.apply_shot(launch.impulse, launch.spin, tag);
        self.serving = false;
        self.rally.player_hit(tag, self.clock);

        let predicted_landing = self.predict_landing(hit.position, hit.velocity);
        self.emit(MatchEvent::PlayerHit {
            position: hit.position,
            velocity: hit.velocity,
            player: tag,
            shot: command.shot,
            predicted_landing,
        });

        let ball = *self.ball.state();
        for other in SIDES {
            let Some(brain) = self.brains[other.index()].as_mut() else {
                continue;
            };
            if other == side && brain.is_serving() {
                brain.reset();
            }
            let view = AiView {
                ball: &ball,
                opponent: &self.players[other.opponent().index()],
                court: &self.court,
            };
            brain.on_ball_hit(side, &self.players[other.index()], &view, &mut self.rng);
        }
        true
    }

    /// Sampled path of a ball in flight down to its next floor contact.
    fn ball_arc(&self) -> Vec<Vec3> {
        let ball = self.ball.state();
        if !ball.launched || ball.resting {
            return Vec::new();
        }
        let floor = self.config.physics.floor_height();
        let lifted = vec3(ball.position.x, ball.position.y - floor, ball.position.z);
        trajectory::sample_arc(lifted, ball.velocity, self.gravity, ARC_SAMPLES)
            .into_iter()
            .map(|mut p| {
                p.y += floor;
                p
            })
            .collect()
    }

    /// First floor contact of the ball centre, in world coordinates.
    fn predict_landing(&self, position: Vec3, velocity: Vec3) -> Option<Vec3> {
        let floor = self.config.physics.floor_height();
        let lifted = vec3(position.x, position.y - floor, position.z);
        trajectory::predict_landing(lifted, velocity, self.gravity).map(|mut p| {
            p.y = floor;
            p
        })
    }

    fn advance_ball(&mut self, dt: f64) {
        if !self.ball.state().launched {
            return;
        }
        let prev = self.ball.position();
        let ground = self.ball.tick(dt);

        if let Some(hit) = ground {
            let zone = self.court.classify(hit.position);
            // A landing outside the lines is the out-of-bounds event, not a
            // bounce in the half the ball was last over.
            if zone != Zone::OutOfBounds {
                self.rally.report_zone(zone);
                self.rally.bounce(self.clock);
            }
            self.emit(MatchEvent::GroundHit {
                position: hit.position,
                velocity: hit.velocity,
                zone,
            });
            if zone == Zone::OutOfBounds {
                self.ball_out(hit.position);
                return;
            }
        }

        let next = self.ball.position();
        if let Some(contact) = self.court.net_contact(prev, next) {
            if self.ball.resolve_net_contact(&[contact.normal]) {
                self.ball.set_position(contact.resolved_position);
                self.rally.net_hit(self.clock);
                self.emit(MatchEvent::NetHit {
                    position: contact.resolved_position,
                    velocity: self.ball.velocity(),
                });
            }
        }

        let position = self.ball.position();
        if self.court.left_arena(position) {
            self.ball_out(position);
        }
    }

    fn ball_out(&mut self, position: Vec3) {
        self.emit(MatchEvent::OutOfBounds { position });
        let outcome = self
            .rally
            .out_of_bounds(self.clock, &mut *self.scoreboard);
        self.finish_rally(outcome);
    }

    fn finish_rally(&mut self, outcome: Option<RallyOutcome>) {
        let Some(outcome) = outcome else {
            return;
        };
        self.evaluated += 1;
        self.last_outcome = Some(outcome);
        let score_call = self.scoreboard.call();
        self.emit(MatchEvent::RallyEvaluated {
            decision: outcome.decision,
            score_call,
        });
        self.server = self.server.opponent();
        self.setup_serve();
    }

    /// Players back to their baselines, ball in the server's hand.
    fn setup_serve(&mut self) {
        for side in SIDES {
            let home = self.court.baseline(side);
            self.players[side.index()].place(home);
            if let Some(brain) = self.brains[side.index()].as_mut() {
                brain.reset();
            }
        }
        let spot = self.players[self.server.index()].serve_point();
        self.ball.hold_at(spot);
        self.serving = true;
        self.announce_serve = true;
        if let Some(brain) = self.brains[self.server.index()].as_mut() {
            brain.begin_serve(self.config.rally.serve_delay);
        }
    }
}

fn split_players(players: &mut [Player; 2], side: Side) -> (&mut Player, &Player) {
    let [one, two] = players;
    match side {
        Side::One => (one, &*two),
        Side::Two => (two, &*one),
    }
}
