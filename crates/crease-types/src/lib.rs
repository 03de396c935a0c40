pub mod ball;
pub mod config;
pub mod document;
pub mod error;
pub mod ids;
pub mod innings;
pub mod matches;
pub mod role;
pub mod team;
pub mod tournament;

pub use ball::{Ball, BallEvent, DismissalKind};
pub use config::{MatchConfig, SQUAD_MAX, SQUAD_MIN};
pub use document::ScoreboardDocument;
pub use error::DomainError;
pub use ids::{BallId, MatchId, PlayerId, TeamId};
pub use innings::{BattingLine, BowlingLine, Innings, Over};
pub use matches::{
    ActionKind, InningsNumber, LastAction, Match, MatchCategory, MatchState, MatchStatus, SuperOver,
};
pub use role::{ScorerRole, StreamId};
pub use team::{Group, Player, Team};
pub use tournament::{BracketSlot, TournamentState};
