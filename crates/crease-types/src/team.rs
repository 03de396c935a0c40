use crate::config::{SQUAD_MAX, SQUAD_MIN};
use crate::error::DomainError;
use crate::ids::{PlayerId, TeamId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Group membership in the two-group league stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    A,
    B,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Opaque reference into the image collaborator. Never interpreted here.
    pub photo: Option<String>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            photo: None,
        }
    }
}

/// A tournament team: roster plus the subset currently selected to play.
///
/// `playing_squad` holds the 7–11 selected ids; an empty squad means the whole
/// roster plays, preserving the behavior of data recorded before squad
/// selection existed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub group: Group,
    /// Display color, opaque to the core (the UI stores an HSL triple).
    pub color: String,
    pub players: Vec<Player>,
    pub playing_squad: Vec<PlayerId>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, group: Group) -> Self {
        Self {
            id,
            name: name.into(),
            group,
            color: String::new(),
            players: Vec::new(),
            playing_squad: Vec::new(),
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// The players eligible to take the field, falling back to the full
    /// roster when no squad has been picked.
    pub fn playing_players(&self) -> Vec<&Player> {
        if self.playing_squad.is_empty() {
            return self.players.iter().collect();
        }
        self.players
            .iter()
            .filter(|p| self.playing_squad.contains(&p.id))
            .collect()
    }

    /// Replace the selected squad wholesale. Sizes outside 7..=11 are rejected;
    /// every id must belong to the roster.
    pub fn set_playing_squad(&mut self, squad: Vec<PlayerId>) -> Result<(), DomainError> {
        if !(SQUAD_MIN..=SQUAD_MAX).contains(&squad.len()) {
            return Err(DomainError::SquadSizeOutOfRange { size: squad.len() });
        }
        if let Some(unknown) = squad.iter().find(|id| self.player(id).is_none()) {
            return Err(DomainError::UnknownPlayer {
                id: unknown.clone(),
            });
        }
        self.playing_squad = squad;
        Ok(())
    }

    /// Swap a retired/injured player out of the squad for a roster member.
    pub fn replace_in_squad(
        &mut self,
        outgoing: &PlayerId,
        incoming: PlayerId,
    ) -> Result<(), DomainError> {
        if self.player(&incoming).is_none() {
            return Err(DomainError::UnknownPlayer { id: incoming });
        }
        let Some(slot) = self.playing_squad.iter_mut().find(|id| *id == outgoing) else {
            return Err(DomainError::UnknownPlayer {
                id: outgoing.clone(),
            });
        };
        *slot = incoming;
        Ok(())
    }
}
