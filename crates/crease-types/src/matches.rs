use crate::ids::{MatchId, TeamId};
use crate::innings::Innings;
use crate::team::Group;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a match.
///
/// `setup -> live (innings 1) -> live (innings 2) -> [super_over] -> completed`.
/// Only `Completed` is terminal; a tie in regulation may detour through
/// `SuperOver` before completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Pre-match phase. Live code models "no match yet" as
    /// `MatchState::current_match == None` and `start_match` goes straight
    /// to `Live`; the variant is kept so stored documents recorded with a
    /// `"setup"` status keep round-tripping.
    Setup,
    Live,
    SuperOver,
    Completed,
}

impl MatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Live => write!(f, "live"),
            Self::SuperOver => write!(f, "super_over"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Where a match sits in the tournament structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Group,
    SemiFinal1,
    SemiFinal2,
    Final,
}

/// Which innings of a (main or super-over) match is being scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsNumber {
    First,
    Second,
}

impl fmt::Display for InningsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "1"),
            Self::Second => write!(f, "2"),
        }
    }
}

/// Tie-breaker mini-match: same processor, reduced caps, team 1 bats first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperOver {
    pub innings1: Option<Innings>,
    pub innings2: Option<Innings>,
    pub current_innings: InningsNumber,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub group: Group,
    pub category: MatchCategory,
    pub team1: TeamId,
    pub team2: TeamId,
    pub innings1: Option<Innings>,
    pub innings2: Option<Innings>,
    pub current_innings: InningsNumber,
    pub status: MatchStatus,
    /// Set only when `status == Completed`; `None` there denotes a tie.
    pub winner: Option<TeamId>,
    pub super_over: Option<SuperOver>,
    pub started_at: DateTime<Utc>,
}

impl Match {
    /// The innings currently receiving ball events, if it exists yet.
    pub fn current_innings(&self) -> Option<&Innings> {
        match self.current_innings {
            InningsNumber::First => self.innings1.as_ref(),
            InningsNumber::Second => self.innings2.as_ref(),
        }
    }

    pub fn current_innings_mut(&mut self) -> Option<&mut Innings> {
        match self.current_innings {
            InningsNumber::First => self.innings1.as_mut(),
            InningsNumber::Second => self.innings2.as_mut(),
        }
    }

    /// The super-over innings currently receiving ball events.
    pub fn current_super_over_innings(&self) -> Option<&Innings> {
        let so = self.super_over.as_ref()?;
        match so.current_innings {
            InningsNumber::First => so.innings1.as_ref(),
            InningsNumber::Second => so.innings2.as_ref(),
        }
    }

    pub fn current_super_over_innings_mut(&mut self) -> Option<&mut Innings> {
        let so = self.super_over.as_mut()?;
        match so.current_innings {
            InningsNumber::First => so.innings1.as_mut(),
            InningsNumber::Second => so.innings2.as_mut(),
        }
    }
}

/// What kind of mutation produced an undo snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddBall,
    SwitchInnings,
    SuperOverBall,
    SwitchSuperOverInnings,
    ReplacePlayer,
}

/// Single-level undo slot: the full match as it was before the last mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAction {
    pub kind: ActionKind,
    pub previous: Match,
}

/// Live state of one scorer stream. Overwritten in place on every event;
/// completed matches move out of here into the append-only history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub current_match: Option<Match>,
    pub last_action: Option<LastAction>,
}
