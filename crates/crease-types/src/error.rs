use crate::ids::{PlayerId, TeamId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("unknown team {id}")]
    UnknownTeam { id: TeamId },
    #[error("unknown player {id}")]
    UnknownPlayer { id: PlayerId },
    #[error("playing squad of {size} is outside the allowed 7..=11 range")]
    SquadSizeOutOfRange { size: usize },
}
