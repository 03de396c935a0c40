use crate::ids::TeamId;
use crate::matches::{Match, MatchState};
use crate::role::StreamId;
use crate::team::Team;
use crate::tournament::TournamentState;
use serde::{Deserialize, Serialize};

/// The full persisted document the storage collaborator round-trips.
///
/// Optional fields serialize as explicit `null` so that "absent", "null" and
/// "undefined" can never diverge between the two scorer streams' stores.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardDocument {
    pub teams: Vec<Team>,
    /// Primary scorer stream's live state.
    pub primary: MatchState,
    /// Secondary scorer stream's live state.
    pub secondary: MatchState,
    /// Append-only list of completed matches.
    pub match_history: Vec<Match>,
    pub tournament: TournamentState,
}

impl ScoreboardDocument {
    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }

    pub fn team_mut(&mut self, id: &TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| &t.id == id)
    }

    pub fn stream(&self, stream: StreamId) -> &MatchState {
        match stream {
            StreamId::Primary => &self.primary,
            StreamId::Secondary => &self.secondary,
        }
    }

    pub fn stream_mut(&mut self, stream: StreamId) -> &mut MatchState {
        match stream {
            StreamId::Primary => &mut self.primary,
            StreamId::Secondary => &mut self.secondary,
        }
    }

    /// Clear live scoring state and history, keeping teams and bracket.
    pub fn reset_season(&mut self) {
        self.primary = MatchState::default();
        self.secondary = MatchState::default();
        self.match_history.clear();
    }
}
