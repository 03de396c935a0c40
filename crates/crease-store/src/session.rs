//! Scorer sessions: the write path from an authenticated caller to the store.
//!
//! A session binds a caller's role to one scorer stream and keeps a local
//! copy of the document. Every mutation is applied to the local copy first
//! and then committed through the store; a failed save rolls the copy back,
//! so the session never shows state the store did not accept.

use crease_scoring as scoring;
use crease_scoring::{ScoreComparison, ScoringError, TeamStanding};
use crease_types::{
    ActionKind, BallEvent, BracketSlot, DomainError, Group, Innings, Match, MatchCategory,
    MatchConfig, MatchState, MatchStatus, PlayerId, ScoreboardDocument, ScorerRole, StreamId, Team,
    TeamId,
};
use std::collections::BTreeMap;
use tracing::info;

use crate::error::StoreError;
use crate::store::{ChangeEvent, MatchStore};

pub struct ScorerSession<S: MatchStore> {
    stream: StreamId,
    role: ScorerRole,
    config: MatchConfig,
    document: ScoreboardDocument,
    store: S,
}

impl<S: MatchStore> ScorerSession<S> {
    /// Open a session against the store, loading the current document.
    pub async fn open(
        store: S,
        stream: StreamId,
        role: ScorerRole,
        config: MatchConfig,
    ) -> Result<Self, StoreError> {
        let document = store.load().await?;
        info!(%stream, %role, "session opened");
        Ok(Self {
            stream,
            role,
            config,
            document,
            store,
        })
    }

    pub fn document(&self) -> &ScoreboardDocument {
        &self.document
    }

    /// This session's stream state as last committed (or rolled back to).
    pub fn state(&self) -> &MatchState {
        self.document.stream(self.stream)
    }

    /// Re-load the document, picking up writes from other sessions.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        self.document = self.store.load().await?;
        Ok(())
    }

    fn authorize_write(&self) -> Result<(), StoreError> {
        if self.role.may_write(self.stream) {
            Ok(())
        } else {
            Err(StoreError::Forbidden { role: self.role })
        }
    }

    fn authorize_admin(&self) -> Result<(), StoreError> {
        if self.role.can_administer() {
            Ok(())
        } else {
            Err(StoreError::Forbidden { role: self.role })
        }
    }

    fn current_match(&self) -> Result<&Match, StoreError> {
        self.state()
            .current_match
            .as_ref()
            .ok_or(StoreError::Scoring(ScoringError::NotLive))
    }

    /// Persist the local document, restoring `previous` if the store refuses.
    async fn commit(
        &mut self,
        previous: ScoreboardDocument,
        event: ChangeEvent,
    ) -> Result<(), StoreError> {
        match self.store.save(&self.document, event).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.document = previous;
                Err(err)
            }
        }
    }

    async fn commit_stream(&mut self, previous: ScoreboardDocument) -> Result<(), StoreError> {
        self.commit(previous, ChangeEvent::StreamUpdated(self.stream))
            .await
    }

    /// Start a match between two known teams; `team1` bats first.
    pub async fn start_match(
        &mut self,
        group: Group,
        category: MatchCategory,
        team1: TeamId,
        team2: TeamId,
    ) -> Result<(), StoreError> {
        self.authorize_write()?;
        for id in [&team1, &team2] {
            if self.document.team(id).is_none() {
                return Err(StoreError::Domain(DomainError::UnknownTeam {
                    id: id.clone(),
                }));
            }
        }
        let started = scoring::start_match(group, category, team1, team2);

        let previous = self.document.clone();
        *self.document.stream_mut(self.stream) = MatchState {
            current_match: Some(started),
            last_action: None,
        };
        self.commit_stream(previous).await
    }

    /// Record one ball event against whichever innings is live.
    pub async fn add_ball(&mut self, event: BallEvent) -> Result<(), StoreError> {
        self.authorize_write()?;
        let current = self.current_match()?.clone();
        let next = scoring::apply_ball_to_match(&current, &event, &self.config)?;
        let kind = if current.status == MatchStatus::SuperOver {
            ActionKind::SuperOverBall
        } else {
            ActionKind::AddBall
        };

        let previous = self.document.clone();
        let state = self.document.stream_mut(self.stream);
        state.last_action = Some(scoring::record_for_undo(kind, &current));
        state.current_match = Some(next);
        self.commit_stream(previous).await
    }

    pub async fn select_batsman(
        &mut self,
        player: PlayerId,
        on_strike: bool,
    ) -> Result<(), StoreError> {
        self.authorize_write()?;
        let next = edit_innings(self.current_match()?, |innings| {
            Ok(scoring::select_batsman(innings, player, on_strike))
        })?;
        self.replace_current(next, Keep).await
    }

    pub async fn select_bowler(&mut self, player: PlayerId) -> Result<(), StoreError> {
        self.authorize_write()?;
        let current = self.current_match()?;
        let config = if current.status == MatchStatus::SuperOver {
            self.config.super_over()
        } else {
            self.config.clone()
        };
        let next = edit_innings(current, |innings| {
            scoring::select_bowler(innings, player, &config)
        })?;
        self.replace_current(next, Keep).await
    }

    /// Manual strike correction.
    pub async fn swap_strike(&mut self) -> Result<(), StoreError> {
        self.authorize_write()?;
        let next = edit_innings(self.current_match()?, |innings| {
            Ok(scoring::swap_strike(innings))
        })?;
        self.replace_current(next, Keep).await
    }

    /// Substitute a player in the live innings (injury/retirement).
    pub async fn replace_player(
        &mut self,
        outgoing: PlayerId,
        incoming: PlayerId,
    ) -> Result<(), StoreError> {
        self.authorize_write()?;
        let current = self.current_match()?.clone();
        let next = edit_innings(&current, |innings| {
            Ok(scoring::replace_player(innings, &outgoing, incoming))
        })?;
        self.replace_current(
            next,
            Record(scoring::record_for_undo(ActionKind::ReplacePlayer, &current)),
        )
        .await
    }

    /// Undo the last recorded action, restoring the snapshot taken before it.
    pub async fn undo_last(&mut self) -> Result<(), StoreError> {
        self.authorize_write()?;
        let restored = scoring::undo(self.state())?;

        let previous = self.document.clone();
        *self.document.stream_mut(self.stream) = restored;
        self.commit_stream(previous).await
    }

    /// Rewind the live innings to before the delivery at the given position.
    /// Rewriting history invalidates the single-level undo slot.
    pub async fn undo_to_ball(
        &mut self,
        over_index: usize,
        ball_index: usize,
    ) -> Result<(), StoreError> {
        self.authorize_write()?;
        let rewound = scoring::undo_to_ball(self.current_match()?, over_index, ball_index)?;
        self.replace_current(rewound, Clear).await
    }

    pub async fn switch_innings(&mut self) -> Result<(), StoreError> {
        self.authorize_write()?;
        let current = self.current_match()?.clone();
        let next = scoring::switch_innings(&current)?;
        self.replace_current(
            next,
            Record(scoring::record_for_undo(ActionKind::SwitchInnings, &current)),
        )
        .await
    }

    pub async fn start_super_over(&mut self) -> Result<(), StoreError> {
        self.authorize_write()?;
        let next = scoring::start_super_over(self.current_match()?)?;
        self.replace_current(next, Clear).await
    }

    pub async fn switch_super_over_innings(&mut self) -> Result<(), StoreError> {
        self.authorize_write()?;
        let current = self.current_match()?.clone();
        let next = scoring::switch_super_over_innings(&current)?;
        self.replace_current(
            next,
            Record(scoring::record_for_undo(
                ActionKind::SwitchSuperOverInnings,
                &current,
            )),
        )
        .await
    }

    pub async fn end_super_over(&mut self) -> Result<(), StoreError> {
        self.authorize_write()?;
        let next = scoring::end_super_over(self.current_match()?)?;
        self.replace_current(next, Clear).await
    }

    /// Complete the match. The primary stream's completed match moves into
    /// the shared history; the secondary projection just clears its slot.
    pub async fn end_match(&mut self) -> Result<(), StoreError> {
        self.authorize_write()?;
        let completed = scoring::end_match(self.current_match()?)?;

        let previous = self.document.clone();
        if self.stream == StreamId::Primary {
            self.document.match_history.push(completed);
        }
        *self.document.stream_mut(self.stream) = MatchState::default();
        self.commit(previous, ChangeEvent::DocumentUpdated).await
    }

    /// Overwrite this stream's state with the primary stream's, resolving a
    /// discrepancy in the primary's favor. Meaningless on the primary itself.
    pub async fn adopt_primary(&mut self) -> Result<(), StoreError> {
        self.authorize_write()?;
        if self.stream == StreamId::Primary {
            return Err(StoreError::Forbidden { role: self.role });
        }
        let previous = self.document.clone();
        let primary = self.document.stream(StreamId::Primary).clone();
        *self.document.stream_mut(self.stream) = primary;
        self.commit_stream(previous).await
    }

    /// Signed drift between the two streams' live matches, when comparable.
    pub fn compare_with_peer(&self) -> Option<ScoreComparison> {
        let primary = self.document.primary.current_match.as_ref()?;
        let secondary = self.document.secondary.current_match.as_ref()?;
        scoring::compare_streams(primary, secondary)
    }

    /// Standings derived from the completed-match history.
    pub fn standings(&self) -> Vec<TeamStanding> {
        scoring::derive_team_stats(&self.document.match_history, &self.document.teams)
    }

    /// Per-player aggregates derived from the completed-match history.
    pub fn player_stats(&self) -> BTreeMap<PlayerId, scoring::PlayerStatLine> {
        scoring::derive_player_stats(&self.document.match_history, &self.document.teams)
    }

    /// Add a team or overwrite the one with the same id.
    pub async fn upsert_team(&mut self, team: Team) -> Result<(), StoreError> {
        self.authorize_admin()?;
        let previous = self.document.clone();
        match self.document.team_mut(&team.id) {
            Some(slot) => *slot = team,
            None => self.document.teams.push(team),
        }
        self.commit(previous, ChangeEvent::DocumentUpdated).await
    }

    pub async fn set_playing_squad(
        &mut self,
        team_id: &TeamId,
        squad: Vec<PlayerId>,
    ) -> Result<(), StoreError> {
        self.authorize_admin()?;
        let previous = self.document.clone();
        let team = self
            .document
            .team_mut(team_id)
            .ok_or_else(|| DomainError::UnknownTeam {
                id: team_id.clone(),
            })?;
        if let Err(err) = team.set_playing_squad(squad) {
            self.document = previous;
            return Err(err.into());
        }
        self.commit(previous, ChangeEvent::DocumentUpdated).await
    }

    /// Swap a retired or injured player out of a team's selected squad.
    /// Live-innings substitution is [`ScorerSession::replace_player`].
    pub async fn replace_in_squad(
        &mut self,
        team_id: &TeamId,
        outgoing: &PlayerId,
        incoming: PlayerId,
    ) -> Result<(), StoreError> {
        self.authorize_admin()?;
        let previous = self.document.clone();
        let team = self
            .document
            .team_mut(team_id)
            .ok_or_else(|| DomainError::UnknownTeam {
                id: team_id.clone(),
            })?;
        if let Err(err) = team.replace_in_squad(outgoing, incoming) {
            self.document = previous;
            return Err(err.into());
        }
        self.commit(previous, ChangeEvent::DocumentUpdated).await
    }

    /// Set or clear one bracket slot; downstream slots cascade-clear.
    pub async fn set_bracket_slot(
        &mut self,
        slot: BracketSlot,
        value: Option<TeamId>,
    ) -> Result<(), StoreError> {
        self.authorize_admin()?;
        let previous = self.document.clone();
        self.document.tournament.set(slot, value);
        self.commit(previous, ChangeEvent::DocumentUpdated).await
    }

    /// Clear live scoring state and history, keeping teams and bracket.
    pub async fn reset_season(&mut self) -> Result<(), StoreError> {
        self.authorize_admin()?;
        let previous = self.document.clone();
        self.document.reset_season();
        self.commit(previous, ChangeEvent::DocumentUpdated).await
    }

    async fn replace_current(
        &mut self,
        next: Match,
        undo_slot: UndoSlot,
    ) -> Result<(), StoreError> {
        let previous = self.document.clone();
        let state = self.document.stream_mut(self.stream);
        state.current_match = Some(next);
        match undo_slot {
            Record(action) => state.last_action = Some(action),
            Clear => state.last_action = None,
            Keep => {}
        }
        self.commit_stream(previous).await
    }
}

/// What a committed mutation does to the single-level undo slot.
enum UndoSlot {
    Record(crease_types::LastAction),
    Clear,
    Keep,
}
use UndoSlot::{Clear, Keep, Record};

/// Route an innings-level update to whichever innings is live, regulation or
/// super over.
fn edit_innings(
    m: &Match,
    update: impl FnOnce(&Innings) -> Result<Innings, ScoringError>,
) -> Result<Match, ScoringError> {
    let mut next = m.clone();
    match m.status {
        MatchStatus::Live => {
            let updated = update(m.current_innings().ok_or(ScoringError::NotLive)?)?;
            match next.current_innings_mut() {
                Some(slot) => *slot = updated,
                None => return Err(ScoringError::NotLive),
            }
        }
        MatchStatus::SuperOver => {
            let updated = update(
                m.current_super_over_innings()
                    .ok_or(ScoringError::NotLive)?,
            )?;
            match next.current_super_over_innings_mut() {
                Some(slot) => *slot = updated,
                None => return Err(ScoringError::NotLive),
            }
        }
        status => {
            return Err(ScoringError::InvalidTransition {
                status,
                operation: "edit_innings",
            });
        }
    }
    Ok(next)
}
