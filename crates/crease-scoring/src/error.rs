use crease_types::{MatchStatus, PlayerId};

/// Errors signaled back to the caller of a scoring operation.
///
/// All of these are locally recoverable: the operation is rejected, the state
/// it was given is untouched, and the caller surfaces a non-fatal notification.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    /// A ball event was submitted without a striker or bowler selected.
    #[error("a striker and a bowler must be selected before scoring")]
    MissingParticipants,
    /// An event arrived after the wickets or overs cap was reached.
    #[error("innings is already complete")]
    InningsComplete,
    /// Undo was requested with no recorded previous state.
    #[error("nothing to undo")]
    NothingToUndo,
    /// A lifecycle operation is invalid for the match's current status.
    #[error("{operation} is not valid while the match is {status}")]
    InvalidTransition {
        status: MatchStatus,
        operation: &'static str,
    },
    /// The selected bowler has already bowled the configured maximum of overs.
    #[error("bowler {id} has reached the {cap}-over cap")]
    BowlerOverCap { id: PlayerId, cap: u32 },
    /// `undo_to_ball` was pointed at a delivery that does not exist.
    #[error("no ball at over index {over_index}, ball index {ball_index}")]
    NoSuchBall {
        over_index: usize,
        ball_index: usize,
    },
    /// The operation needs a live match (or live super over) and there is none.
    #[error("no live match to score against")]
    NotLive,
}

/// A detected breach of an innings bookkeeping invariant.
///
/// Produced by [`crate::audit::audit_innings`], which batch-scans an innings
/// for diagnostics and recovery; the processor itself never produces states
/// that violate these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScoringViolation {
    /// The innings run total does not equal the sum of its recorded balls.
    RunsMismatch { recorded: i32, summed: i32 },
    /// An over contains more than six legal deliveries.
    LegalBallOverflow { over_number: u32, count: usize },
    /// The wicket count exceeds the configured cap.
    WicketsExceedCap { wickets: u32, cap: u32 },
    /// The within-over ball counter left its `0..6` range.
    BallCounterOutOfRange { current_ball: u32 },
    /// A bowler's partial-over ball count reached 6 without rolling over.
    BowlerBallsOutOfRange { bowler: PlayerId, balls: u32 },
    /// A ball is flagged as both a wide and a no-ball.
    ConflictingExtraFlags { over_number: u32, ball_index: usize },
}

impl std::fmt::Display for ScoringViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RunsMismatch { recorded, summed } => write!(
                f,
                "innings records {recorded} runs but its balls sum to {summed}"
            ),
            Self::LegalBallOverflow { over_number, count } => {
                write!(f, "over {over_number} has {count} legal balls (max 6)")
            }
            Self::WicketsExceedCap { wickets, cap } => {
                write!(f, "{wickets} wickets recorded with a cap of {cap}")
            }
            Self::BallCounterOutOfRange { current_ball } => {
                write!(f, "ball counter {current_ball} is outside 0..6")
            }
            Self::BowlerBallsOutOfRange { bowler, balls } => {
                write!(f, "bowler {bowler} shows {balls} balls without rollover")
            }
            Self::ConflictingExtraFlags {
                over_number,
                ball_index,
            } => write!(
                f,
                "ball {ball_index} of over {over_number} is flagged both wide and no-ball"
            ),
        }
    }
}
