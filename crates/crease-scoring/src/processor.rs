//! The ball event processor: pure functions from innings state plus a scorer
//! action to the next innings state.
//!
//! Nothing here performs I/O or touches ambient state. Callers (sessions)
//! snapshot for undo, apply, then hand the result to persistence.

use chrono::Utc;
use crease_types::{
    Ball, BallEvent, BallId, DismissalKind, Innings, Match, MatchConfig, MatchStatus, Over,
    PlayerId,
};
use tracing::trace;

use crate::error::ScoringError;
use crate::lifecycle::innings_complete;
use crate::overs::{bowler_at_cap, delivery_is_legal};

/// Apply one ball event to an innings, returning the updated innings.
///
/// Implements the full delivery pipeline: extras accounting, wicket guard,
/// batter and bowler stat updates, odd-run strike rotation, the pending
/// no-ball-runs handoff, and over rollover (which also forces a strike swap
/// and clears the bowler selection).
///
/// Rejections leave the input untouched:
/// - [`ScoringError::MissingParticipants`] when no striker or bowler is set;
/// - [`ScoringError::InningsComplete`] when the wickets or overs cap has
///   already been reached.
pub fn apply_ball(
    innings: &Innings,
    event: &BallEvent,
    config: &MatchConfig,
) -> Result<Innings, ScoringError> {
    if innings.striker.is_none() || innings.bowler.is_none() {
        return Err(ScoringError::MissingParticipants);
    }
    if innings_complete(innings, config) {
        return Err(ScoringError::InningsComplete);
    }

    let mut next = innings.clone();
    let follows_no_ball = innings.pending_no_ball_runs;

    // A no-ball always contributes exactly one extra run; runs scored off it
    // arrive as the follow-up event carrying the pending flag.
    let total_runs = if event.is_no_ball { 1 } else { event.runs };
    let is_legal = delivery_is_legal(event, follows_no_ball);
    let rotates = !event.suppress_strike_rotation && total_runs % 2 != 0;

    trace!(
        runs = total_runs,
        wicket = event.is_wicket,
        wide = event.is_wide,
        no_ball = event.is_no_ball,
        follows_no_ball,
        is_legal,
        "applying ball"
    );

    let ball = Ball {
        id: BallId::new(),
        runs: total_runs,
        is_wicket: event.is_wicket,
        is_wide: event.is_wide,
        is_no_ball: event.is_no_ball,
        follows_no_ball,
        rotated_strike: rotates,
        striker: next.striker.clone(),
        bowler: next.bowler.clone(),
        recorded_at: Utc::now(),
    };

    if next.overs.is_empty() {
        next.overs.push(Over::new(1));
    }
    let over_index = next.overs.len() - 1;
    next.overs[over_index].balls.push(ball);

    next.runs += total_runs;
    if event.is_wicket {
        next.wickets += 1;
    }

    // Batter bookkeeping. A wide is never faced, so the whole block is gated.
    // The no-ball delivery itself credits the batter nothing and is not
    // faced; its follow-up carries the bat-scored value and counts as faced.
    if !event.is_wide
        && let Some(striker) = next.striker.clone()
    {
        let line = next.batting.entry(striker).or_default();
        if !event.is_no_ball {
            line.runs += event.runs;
            if event.runs == 4 {
                line.fours += 1;
            }
            if event.runs == 6 {
                line.sixes += 1;
            }
            line.balls_faced += 1;
        }
        if event.is_wicket {
            line.is_out = true;
            line.dismissal = Some(DismissalKind::Out);
        }
    }

    if let Some(bowler) = next.bowler.clone() {
        let line = next.bowling.entry(bowler).or_default();
        line.runs += total_runs;
        if event.is_wicket {
            line.wickets += 1;
        }
        if event.is_wide {
            line.wides += 1;
        }
        if event.is_no_ball {
            line.no_balls += 1;
        }
        if is_legal {
            line.balls += 1;
            if line.balls >= 6 {
                line.overs += 1;
                line.balls = 0;
            }
        }
    }

    // Odd delivery totals rotate strike, penalty runs included.
    if rotates {
        std::mem::swap(&mut next.striker, &mut next.non_striker);
    }

    next.pending_no_ball_runs = event.is_no_ball;

    if is_legal {
        next.current_ball += 1;
        if next.current_ball >= 6 {
            next.current_ball = 0;
            next.current_over += 1;
            next.overs.push(Over::new(next.current_over as u32 + 1));
            // End of over: strike always swaps and a new bowler must be
            // picked before the next delivery.
            std::mem::swap(&mut next.striker, &mut next.non_striker);
            next.bowler = None;
        }
    }

    Ok(next)
}

/// Apply a ball event to whichever innings the match is currently scoring:
/// the regulation innings while `Live`, the super-over innings (under reduced
/// caps) while `SuperOver`.
pub fn apply_ball_to_match(
    current: &Match,
    event: &BallEvent,
    config: &MatchConfig,
) -> Result<Match, ScoringError> {
    let mut next = current.clone();
    match current.status {
        MatchStatus::Live => {
            let innings = current.current_innings().ok_or(ScoringError::NotLive)?;
            let updated = apply_ball(innings, event, config)?;
            match next.current_innings_mut() {
                Some(slot) => *slot = updated,
                None => return Err(ScoringError::NotLive),
            }
        }
        MatchStatus::SuperOver => {
            let innings = current
                .current_super_over_innings()
                .ok_or(ScoringError::NotLive)?;
            let updated = apply_ball(innings, event, &config.super_over())?;
            match next.current_super_over_innings_mut() {
                Some(slot) => *slot = updated,
                None => return Err(ScoringError::NotLive),
            }
        }
        status => {
            return Err(ScoringError::InvalidTransition {
                status,
                operation: "add_ball",
            });
        }
    }
    Ok(next)
}

/// Put a batter on strike (or at the non-striker's end), seeding their
/// batting line and recording first appearance in the batting order.
pub fn select_batsman(innings: &Innings, player: PlayerId, on_strike: bool) -> Innings {
    let mut next = innings.clone();
    if on_strike {
        next.striker = Some(player.clone());
    } else {
        next.non_striker = Some(player.clone());
    }
    next.batting.entry(player.clone()).or_default();
    if !next.batting_order.contains(&player) {
        next.batting_order.push(player);
    }
    next
}

/// Bind a bowler to the over in progress, seeding their bowling line.
///
/// Enforces the per-bowler over cap here in the core rather than trusting
/// callers to disable the option.
pub fn select_bowler(
    innings: &Innings,
    player: PlayerId,
    config: &MatchConfig,
) -> Result<Innings, ScoringError> {
    if bowler_at_cap(innings, &player, config) {
        return Err(ScoringError::BowlerOverCap {
            id: player,
            cap: config.max_overs_per_bowler,
        });
    }
    let mut next = innings.clone();
    next.bowler = Some(player.clone());
    if let Some(over) = next.overs.last_mut() {
        over.bowler = Some(player.clone());
    }
    next.bowling.entry(player).or_default();
    Ok(next)
}

/// Manual strike swap, for scorer corrections.
pub fn swap_strike(innings: &Innings) -> Innings {
    let mut next = innings.clone();
    std::mem::swap(&mut next.striker, &mut next.non_striker);
    next
}

/// Substitute a retired or injured player in the live innings.
///
/// Only the on-field slots change hands; recorded balls and accumulated stat
/// lines keep the outgoing player's id, since they describe what already
/// happened.
pub fn replace_player(innings: &Innings, outgoing: &PlayerId, incoming: PlayerId) -> Innings {
    let mut next = innings.clone();
    if next.striker.as_ref() == Some(outgoing) {
        next.striker = Some(incoming.clone());
    }
    if next.non_striker.as_ref() == Some(outgoing) {
        next.non_striker = Some(incoming.clone());
    }
    if next.bowler.as_ref() == Some(outgoing) {
        next.bowler = Some(incoming.clone());
        if let Some(over) = next.overs.last_mut() {
            over.bowler = Some(incoming);
        }
    }
    next
}
