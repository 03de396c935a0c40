//! Over and strike bookkeeping helpers, split out from the processor so the
//! counting rules can be exercised on their own.

use crease_types::{BallEvent, Innings, MatchConfig, PlayerId};

/// Whether a delivery counts toward the six-ball over quota.
///
/// Wides and no-balls never do. Neither does the ball following a no-ball
/// (`pending_no_ball` set): it only records the runs scored off that no-ball,
/// so the bowler's ball count and the over stay where they were.
pub fn delivery_is_legal(event: &BallEvent, pending_no_ball: bool) -> bool {
    !event.is_wide && !event.is_no_ball && !pending_no_ball
}

/// Scoreboard-style overs display, e.g. `"3.4"` for 3 complete overs and
/// 4 legal balls.
pub fn format_overs(overs: u32, balls: u32) -> String {
    format!("{overs}.{balls}")
}

/// Decimal-overs conversion used by run-rate arithmetic: `overs + balls/6`.
pub fn decimal_overs(overs: u32, balls: u32) -> f64 {
    f64::from(overs) + f64::from(balls) / 6.0
}

/// Whether a bowler has already bowled the configured maximum of complete
/// overs in this innings.
pub fn bowler_at_cap(innings: &Innings, bowler: &PlayerId, config: &MatchConfig) -> bool {
    innings
        .bowling_line(bowler)
        .is_some_and(|line| line.overs >= config.max_overs_per_bowler)
}
