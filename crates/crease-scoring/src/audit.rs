//! Innings bookkeeping audit.
//!
//! The processor maintains these invariants by construction; the audit
//! exists for state that arrived from elsewhere (storage, a peer stream, a
//! hand-edited fixture). It batch-scans an innings and reports every breach
//! it finds rather than stopping at the first, so an operator sees the whole
//! picture at once.

use crease_types::{Innings, MatchConfig};
use tracing::warn;

use crate::error::ScoringViolation;

/// Scan an innings against the configured caps and return every violation
/// found. An empty vector means the bookkeeping is internally consistent.
pub fn audit_innings(innings: &Innings, config: &MatchConfig) -> Vec<ScoringViolation> {
    let mut violations = Vec::new();

    let summed = innings.ball_runs_total();
    if innings.runs != summed {
        violations.push(ScoringViolation::RunsMismatch {
            recorded: innings.runs,
            summed,
        });
    }

    if innings.wickets > config.max_wickets {
        violations.push(ScoringViolation::WicketsExceedCap {
            wickets: innings.wickets,
            cap: config.max_wickets,
        });
    }

    if innings.current_ball >= 6 {
        violations.push(ScoringViolation::BallCounterOutOfRange {
            current_ball: innings.current_ball,
        });
    }

    for over in &innings.overs {
        let count = over.legal_ball_count();
        if count > 6 {
            violations.push(ScoringViolation::LegalBallOverflow {
                over_number: over.number,
                count,
            });
        }
        for (ball_index, ball) in over.balls.iter().enumerate() {
            if ball.is_wide && ball.is_no_ball {
                violations.push(ScoringViolation::ConflictingExtraFlags {
                    over_number: over.number,
                    ball_index,
                });
            }
        }
    }

    for (bowler, line) in &innings.bowling {
        if line.balls >= 6 {
            violations.push(ScoringViolation::BowlerBallsOutOfRange {
                bowler: bowler.clone(),
                balls: line.balls,
            });
        }
    }

    if !violations.is_empty() {
        warn!(count = violations.len(), "innings audit found violations");
    }
    violations
}
