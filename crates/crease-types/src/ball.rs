use crate::ids::{BallId, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a batter was dismissed. The scoreboard does not model cricket-law
/// dismissal modes (bowled/caught/LBW/...); every wicket is recorded the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DismissalKind {
    Out,
}

/// A scorer's tap: the raw input to the ball event processor.
///
/// `runs` is the scorer-entered value. For a no-ball event the processor
/// ignores it and credits exactly one extra; runs scored off the no-ball are
/// submitted as a separate follow-up event. Negative values record penalty
/// runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallEvent {
    pub runs: i32,
    pub is_wicket: bool,
    pub is_wide: bool,
    pub is_no_ball: bool,
    /// When set, odd-run strike rotation is skipped for this delivery.
    /// End-of-over rotation still applies.
    pub suppress_strike_rotation: bool,
}

impl BallEvent {
    pub fn runs(runs: i32) -> Self {
        Self {
            runs,
            is_wicket: false,
            is_wide: false,
            is_no_ball: false,
            suppress_strike_rotation: false,
        }
    }

    pub fn wicket() -> Self {
        Self {
            is_wicket: true,
            ..Self::runs(0)
        }
    }

    /// A wide: one run to the batting side, not a legal delivery.
    pub fn wide() -> Self {
        Self {
            runs: 1,
            is_wide: true,
            ..Self::runs(0)
        }
    }

    /// A no-ball. The processor forces the delivery total to exactly 1
    /// whatever `runs` is submitted as.
    pub fn no_ball() -> Self {
        Self {
            runs: 1,
            is_no_ball: true,
            ..Self::runs(0)
        }
    }

    pub fn without_strike_rotation(mut self) -> Self {
        self.suppress_strike_rotation = true;
        self
    }
}

/// An immutable record of one delivery attempt, as appended to an over.
///
/// `runs` is the delivery total attributed to the innings (so 1 for the
/// no-ball itself, the bat-scored value for its follow-up). Participants are
/// captured at delivery time so later replacements don't rewrite history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub runs: i32,
    pub is_wicket: bool,
    pub is_wide: bool,
    pub is_no_ball: bool,
    /// This delivery carried the runs scored off the preceding no-ball and is
    /// not a fresh legal delivery.
    pub follows_no_ball: bool,
    /// Whether processing this delivery swapped striker and non-striker
    /// (odd-run rotation, not the end-of-over swap). Recorded so undo can
    /// reverse the swap without re-deriving suppression.
    pub rotated_strike: bool,
    pub striker: Option<PlayerId>,
    pub bowler: Option<PlayerId>,
    /// Wall-clock for display/debugging only, never for scoring decisions.
    pub recorded_at: DateTime<Utc>,
}

impl Ball {
    /// A wide or no-ball is an extra; an extra never carries the legal
    /// delivery designation.
    pub fn is_extra(&self) -> bool {
        self.is_wide || self.is_no_ball
    }

    /// A legal delivery counts toward the over's six-ball quota and the
    /// bowler's ball count. Extras and no-ball follow-ups do not.
    pub fn is_legal(&self) -> bool {
        !self.is_wide && !self.is_no_ball && !self.follows_no_ball
    }
}
