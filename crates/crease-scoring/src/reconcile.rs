//! Dual-scorer reconciliation.
//!
//! The primary and secondary scorers record the same match independently.
//! These helpers reduce each stream's live innings to a comparable snapshot
//! and report the signed drift between them, so a discrepancy shows up on
//! the operators' console the moment the streams diverge.

use crease_types::{Innings, InningsNumber, Match, MatchId, MatchStatus};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The comparable essence of one stream's innings in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub match_id: MatchId,
    pub innings: InningsNumber,
    pub runs: i32,
    pub wickets: u32,
    pub legal_balls: u32,
}

impl ScoreSnapshot {
    /// Snapshot whichever innings the match is currently scoring: the
    /// regulation innings while live, the super-over innings during one.
    /// `None` when the match has no innings to compare (setup, completed).
    pub fn extract(m: &Match) -> Option<Self> {
        let (innings, number) = match m.status {
            MatchStatus::Live => (m.current_innings()?, m.current_innings),
            MatchStatus::SuperOver => {
                let so = m.super_over.as_ref()?;
                (m.current_super_over_innings()?, so.current_innings)
            }
            _ => return None,
        };
        Some(Self {
            match_id: m.id.clone(),
            innings: number,
            runs: innings.runs,
            wickets: innings.wickets,
            legal_balls: innings.legal_balls(),
        })
    }
}

/// Signed drift between two streams, primary minus secondary.
///
/// `in_sync` tracks runs and wickets only. The legal-ball delta is reported
/// for the console but a scorer momentarily lagging a delivery behind is
/// not treated as a discrepancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComparison {
    pub runs_diff: i32,
    pub wickets_diff: i32,
    pub balls_diff: i32,
    pub in_sync: bool,
}

impl ScoreComparison {
    fn from_deltas(runs_diff: i32, wickets_diff: i32, balls_diff: i32) -> Self {
        Self {
            runs_diff,
            wickets_diff,
            balls_diff,
            in_sync: runs_diff == 0 && wickets_diff == 0,
        }
    }

    fn between(primary: &ScoreSnapshot, secondary: &ScoreSnapshot) -> Self {
        Self::from_deltas(
            primary.runs - secondary.runs,
            primary.wickets as i32 - secondary.wickets as i32,
            primary.legal_balls as i32 - secondary.legal_balls as i32,
        )
    }
}

/// Compare two projections of the same innings, primary minus secondary.
pub fn compare(primary: &Innings, secondary: &Innings) -> ScoreComparison {
    ScoreComparison::from_deltas(
        primary.runs - secondary.runs,
        primary.wickets as i32 - secondary.wickets as i32,
        primary.legal_balls() as i32 - secondary.legal_balls() as i32,
    )
}

/// Compare the two scorer streams' live matches.
///
/// `None` when the streams are not comparable: either has no scorable
/// innings, the match ids differ, or the streams are on different innings
/// (one scorer is behind on a lifecycle transition, which is its own kind
/// of drift but not a ball-level one).
pub fn compare_streams(primary: &Match, secondary: &Match) -> Option<ScoreComparison> {
    let a = ScoreSnapshot::extract(primary)?;
    let b = ScoreSnapshot::extract(secondary)?;
    if a.match_id != b.match_id || a.innings != b.innings {
        return None;
    }
    let comparison = ScoreComparison::between(&a, &b);
    if !comparison.in_sync {
        warn!(
            runs_diff = comparison.runs_diff,
            wickets_diff = comparison.wickets_diff,
            balls_diff = comparison.balls_diff,
            "scorer streams have diverged"
        );
    }
    Some(comparison)
}
