//! Score collaborators. The rally machine hands every decision to a
//! [`Scoreboard`]; aggregate state across rallies lives here.

use tennis_shared::events::ScoreDecision;

/// Receives exactly one decision per evaluated rally.
pub trait Scoreboard {
    fn record(&mut self, decision: ScoreDecision);

    /// Human-readable score line for logs and events.
    fn call(&self) -> String {
        String::new()
    }
}

/// Collects raw decisions in order.
impl Scoreboard for Vec<ScoreDecision> {
    fn record(&mut self, decision: ScoreDecision) {
        self.push(decision);
    }
}

const POINT_NAMES: [&str; 4] = ["Love", "15", "30", "40"];

/// Points and games with standard tennis game scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TennisScoreboard {
    /// Points in the current game, [player one, player two]
    pub points: [u32; 2],
    pub games: [u32; 2],
    /// Every decision received, including `None`
    pub rallies: u32,
    pub undecided: u32,
}

impl TennisScoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_points_awarded(&self) -> u32 {
        self.rallies - self.undecided
    }

    fn award(&mut self, winner: usize) {
        let loser = 1 - winner;
        self.points[winner] += 1;
        if self.points[winner] >= 4 && self.points[winner] >= self.points[loser] + 2 {
            self.games[winner] += 1;
            self.points = [0, 0];
            tracing::info!(
                "Game to P{} (games {}-{})",
                winner + 1,
                self.games[0],
                self.games[1]
            );
        }
    }
}

impl Scoreboard for TennisScoreboard {
    fn record(&mut self, decision: ScoreDecision) {
        self.rallies += 1;
        match decision {
            ScoreDecision::None => self.undecided += 1,
            ScoreDecision::Player1Point => self.award(0),
            ScoreDecision::Player2Point => self.award(1),
        }
    }

    fn call(&self) -> String {
        let [p1, p2] = self.points;
        if p1 >= 3 && p2 >= 3 {
            return match p1 as i64 - p2 as i64 {
                0 => "Deuce".to_string(),
                1 => "Advantage P1".to_string(),
                _ => "Advantage P2".to_string(),
            };
        }
        let name = |p: u32| POINT_NAMES[p.min(3) as usize];
        format!("{}-{}", name(p1), name(p2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_all(board: &mut TennisScoreboard, decisions: &[ScoreDecision]) {
        for d in decisions {
            board.record(*d);
        }
    }

    #[test]
    fn fresh_board_is_love_all() {
        assert_eq!(TennisScoreboard::new().call(), "Love-Love");
    }

    #[test]
    fn points_are_called_tennis_style() {
        let mut board = TennisScoreboard::new();
        record_all(
            &mut board,
            &[ScoreDecision::Player1Point, ScoreDecision::Player2Point, ScoreDecision::Player2Point],
        );
        assert_eq!(board.call(), "15-30");
    }

    #[test]
    fn none_counts_as_rally_without_point() {
        let mut board = TennisScoreboard::new();
        board.record(ScoreDecision::None);
        assert_eq!(board.rallies, 1);
        assert_eq!(board.undecided, 1);
        assert_eq!(board.total_points_awarded(), 0);
        assert_eq!(board.points, [0, 0]);
    }

    #[test]
    fn four_straight_points_win_a_game() {
        let mut board = TennisScoreboard::new();
        record_all(&mut board, &[ScoreDecision::Player2Point; 4]);
        assert_eq!(board.games, [0, 1]);
        assert_eq!(board.points, [0, 0]);
    }

    #[test]
    fn deuce_and_advantage() {
        let mut board = TennisScoreboard::new();
        record_all(
            &mut board,
            &[
                ScoreDecision::Player1Point,
                ScoreDecision::Player1Point,
                ScoreDecision::Player1Point,
                ScoreDecision::Player2Point,
                ScoreDecision::Player2Point,
                ScoreDecision::Player2Point,
            ],
        );
        assert_eq!(board.call(), "Deuce");

        board.record(ScoreDecision::Player1Point);
        assert_eq!(board.call(), "Advantage P1");

        board.record(ScoreDecision::Player2Point);
        assert_eq!(board.call(), "Deuce");

        board.record(ScoreDecision::Player2Point);
        assert_eq!(board.call(), "Advantage P2");
        assert_eq!(board.games, [0, 0]);

        board.record(ScoreDecision::Player2Point);
        assert_eq!(board.games, [0, 1]);
    }

    #[test]
    fn vec_collects_in_order() {
        let mut log: Vec<ScoreDecision> = Vec::new();
        log.record(ScoreDecision::Player1Point);
        log.record(ScoreDecision::None);
        assert_eq!(log, vec![ScoreDecision::Player1Point, ScoreDecision::None]);
    }
}
