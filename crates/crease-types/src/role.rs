use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independent scorer streams. Each owns its own match projection;
/// the reconciler compares them but they never share mutable state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamId {
    Primary,
    Secondary,
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Closed set of caller roles. Capability checks live here rather than as
/// string comparisons scattered through callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerRole {
    Admin,
    PrimaryScorer,
    SecondaryScorer,
    Viewer,
    Unauthenticated,
}

impl ScorerRole {
    /// Whether this role may record ball events at all.
    pub fn can_score(&self) -> bool {
        matches!(self, Self::Admin | Self::PrimaryScorer | Self::SecondaryScorer)
    }

    /// Whether this role may edit teams, brackets, and season resets.
    pub fn can_administer(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether this role may mutate the given scorer stream. Admins may write
    /// either stream; each scorer role is bound to its own.
    pub fn may_write(&self, stream: StreamId) -> bool {
        match self {
            Self::Admin => true,
            Self::PrimaryScorer => stream == StreamId::Primary,
            Self::SecondaryScorer => stream == StreamId::Secondary,
            Self::Viewer | Self::Unauthenticated => false,
        }
    }
}

impl fmt::Display for ScorerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::PrimaryScorer => write!(f, "primary_scorer"),
            Self::SecondaryScorer => write!(f, "secondary_scorer"),
            Self::Viewer => write!(f, "viewer"),
            Self::Unauthenticated => write!(f, "unauthenticated"),
        }
    }
}
