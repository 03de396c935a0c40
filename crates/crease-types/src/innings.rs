use crate::ball::{Ball, DismissalKind};
use crate::ids::{PlayerId, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A set of deliveries bowled by one bowler. The bowler is bound when the
/// scorer selects one; a freshly rolled-over over starts with no bowler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Over {
    /// 1-based display number.
    pub number: u32,
    pub balls: Vec<Ball>,
    pub bowler: Option<PlayerId>,
}

impl Over {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            balls: Vec::new(),
            bowler: None,
        }
    }

    /// Deliveries that counted toward the six-ball quota. Between 0 and 6
    /// while the over is in progress; exactly 6 once complete, unless the
    /// innings ended mid-over.
    pub fn legal_ball_count(&self) -> usize {
        self.balls.iter().filter(|b| b.is_legal()).count()
    }
}

/// Per-innings batting figures for one player, accumulated from balls where
/// they were on strike.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingLine {
    pub runs: i32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub is_out: bool,
    pub dismissal: Option<DismissalKind>,
}

/// Per-innings bowling figures for one player.
///
/// `balls` is the legal-ball count of the current partial over and never
/// reaches 6: the sixth legal ball rolls it into `overs + 1, balls = 0`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingLine {
    pub overs: u32,
    pub balls: u32,
    pub runs: i32,
    pub wickets: u32,
    pub wides: u32,
    pub no_balls: u32,
}

impl BowlingLine {
    /// Overs bowled in decimal form (`overs + balls/6`), the figure NRR and
    /// economy calculations divide by.
    pub fn overs_decimal(&self) -> f64 {
        f64::from(self.overs) + f64::from(self.balls) / 6.0
    }
}

/// One team's batting turn.
///
/// Invariants maintained by the processor and checked by the audit module:
/// `runs` equals the sum of all ball runs across overs, `wickets` never
/// exceeds the configured cap, and `current_ball` stays in `0..6`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Innings {
    pub batting_team: TeamId,
    pub bowling_team: TeamId,
    pub runs: i32,
    pub wickets: u32,
    pub overs: Vec<Over>,
    /// Index into `overs` of the over in progress.
    pub current_over: usize,
    /// Legal balls bowled in the over in progress, `0..6`.
    pub current_ball: u32,
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub bowler: Option<PlayerId>,
    /// First-appearance order of batters, for scorecard display.
    pub batting_order: Vec<PlayerId>,
    pub batting: BTreeMap<PlayerId, BattingLine>,
    pub bowling: BTreeMap<PlayerId, BowlingLine>,
    /// Set after a no-ball: the next event records the runs scored off that
    /// no-ball and is not a fresh legal delivery.
    pub pending_no_ball_runs: bool,
}

impl Innings {
    pub fn new(batting_team: TeamId, bowling_team: TeamId) -> Self {
        Self {
            batting_team,
            bowling_team,
            runs: 0,
            wickets: 0,
            overs: vec![Over::new(1)],
            current_over: 0,
            current_ball: 0,
            striker: None,
            non_striker: None,
            bowler: None,
            batting_order: Vec::new(),
            batting: BTreeMap::new(),
            bowling: BTreeMap::new(),
            pending_no_ball_runs: false,
        }
    }

    pub fn current_over(&self) -> Option<&Over> {
        self.overs.last()
    }

    /// Total legal deliveries bowled, per the innings over/ball counters.
    pub fn legal_balls(&self) -> u32 {
        self.current_over as u32 * 6 + self.current_ball
    }

    /// Overs faced in decimal form (`completed + balls/6`).
    pub fn overs_decimal(&self) -> f64 {
        self.current_over as f64 + f64::from(self.current_ball) / 6.0
    }

    /// Sum of every recorded ball's runs; equals `self.runs` when the
    /// run-conservation invariant holds.
    pub fn ball_runs_total(&self) -> i32 {
        self.overs
            .iter()
            .flat_map(|o| o.balls.iter())
            .map(|b| b.runs)
            .sum()
    }

    pub fn batting_line(&self, id: &PlayerId) -> Option<&BattingLine> {
        self.batting.get(id)
    }

    pub fn bowling_line(&self, id: &PlayerId) -> Option<&BowlingLine> {
        self.bowling.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_innings_has_one_empty_over() {
        let innings = Innings::new(TeamId::new("a1"), TeamId::new("b1"));
        assert_eq!(innings.overs.len(), 1);
        assert_eq!(innings.overs[0].number, 1);
        assert_eq!(innings.legal_balls(), 0);
        assert_eq!(innings.overs_decimal(), 0.0);
    }

    #[test]
    fn overs_decimal_converts_balls_to_sixths() {
        let mut innings = Innings::new(TeamId::new("a1"), TeamId::new("b1"));
        innings.current_over = 2;
        innings.current_ball = 3;
        assert_eq!(innings.overs_decimal(), 2.5);
        assert_eq!(innings.legal_balls(), 15);
    }

    #[test]
    fn bowling_line_decimal_overs() {
        let line = BowlingLine {
            overs: 1,
            balls: 3,
            ..BowlingLine::default()
        };
        assert_eq!(line.overs_decimal(), 1.5);
    }
}
