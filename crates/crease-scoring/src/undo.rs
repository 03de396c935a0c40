//! Undo support.
//!
//! Two mechanisms with different reach: a single-level snapshot slot
//! ([`record_for_undo`] / [`undo`]) that restores the whole match to the
//! moment before the last mutation, and [`undo_to_ball`], which walks the
//! recorded deliveries backwards and inverts each one, so a scorer can unwind
//! to any earlier point of the innings.

use crease_types::{
    ActionKind, BattingLine, BowlingLine, Innings, LastAction, Match, MatchState, MatchStatus,
    PlayerId,
};
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::ScoringError;

/// Snapshot the match before a mutation so [`undo`] can restore it.
pub fn record_for_undo(kind: ActionKind, current: &Match) -> LastAction {
    LastAction {
        kind,
        previous: current.clone(),
    }
}

/// Restore the snapshot taken before the last mutation. Single-level: the
/// slot is consumed, so a second undo without an intervening action fails
/// with [`ScoringError::NothingToUndo`].
pub fn undo(state: &MatchState) -> Result<MatchState, ScoringError> {
    let last = state
        .last_action
        .as_ref()
        .ok_or(ScoringError::NothingToUndo)?;
    debug!(kind = ?last.kind, "undoing last action");
    Ok(MatchState {
        current_match: Some(last.previous.clone()),
        last_action: None,
    })
}

/// Remove the delivery at `(over_index, ball_index)` and every delivery after
/// it from the innings currently being scored, inverting each one's effect.
///
/// The striker and bowler slots are restored from the earliest removed ball's
/// record, so an undo reaching back past a dismissal brings the dismissed
/// batter back on strike.
pub fn undo_to_ball(
    current: &Match,
    over_index: usize,
    ball_index: usize,
) -> Result<Match, ScoringError> {
    let mut next = current.clone();
    match current.status {
        MatchStatus::Live => {
            let innings = current.current_innings().ok_or(ScoringError::NotLive)?;
            let rewound = rewind_innings(innings, over_index, ball_index)?;
            match next.current_innings_mut() {
                Some(slot) => *slot = rewound,
                None => return Err(ScoringError::NotLive),
            }
        }
        MatchStatus::SuperOver => {
            let innings = current
                .current_super_over_innings()
                .ok_or(ScoringError::NotLive)?;
            let rewound = rewind_innings(innings, over_index, ball_index)?;
            match next.current_super_over_innings_mut() {
                Some(slot) => *slot = rewound,
                None => return Err(ScoringError::NotLive),
            }
        }
        status => {
            return Err(ScoringError::InvalidTransition {
                status,
                operation: "undo_to_ball",
            });
        }
    }
    Ok(next)
}

fn rewind_innings(
    innings: &Innings,
    over_index: usize,
    ball_index: usize,
) -> Result<Innings, ScoringError> {
    let target_exists = innings
        .overs
        .get(over_index)
        .is_some_and(|over| over.balls.len() > ball_index);
    if !target_exists {
        return Err(ScoringError::NoSuchBall {
            over_index,
            ball_index,
        });
    }

    debug!(over_index, ball_index, "rewinding innings");
    let mut next = innings.clone();
    let mut earliest_removed = None;

    while let Some((oi, bi)) = last_ball_position(&next) {
        if oi < over_index || (oi == over_index && bi < ball_index) {
            break;
        }
        let ball = next.overs[oi].balls.remove(bi);

        // Invert in reverse order of application: over counters first, then
        // the odd-run rotation, then the stat lines and totals.
        if ball.is_legal() {
            if next.current_ball == 0 && next.current_over > 0 {
                // This ball closed an over: drop the fresh over it opened,
                // re-swap the forced end-of-over rotation, and put the
                // over's bowler back in the slot.
                if next.overs.last().is_some_and(|o| o.balls.is_empty()) {
                    next.overs.pop();
                }
                next.current_over -= 1;
                next.current_ball = 5;
                std::mem::swap(&mut next.striker, &mut next.non_striker);
                next.bowler = ball.bowler.clone();
            } else {
                next.current_ball = next.current_ball.saturating_sub(1);
            }
        }

        if ball.rotated_strike {
            std::mem::swap(&mut next.striker, &mut next.non_striker);
        }

        if let Some(bowler) = ball.bowler.as_ref()
            && let Some(line) = next.bowling.get_mut(bowler)
        {
            line.runs -= ball.runs;
            if ball.is_wicket {
                line.wickets = line.wickets.saturating_sub(1);
            }
            if ball.is_wide {
                line.wides = line.wides.saturating_sub(1);
            }
            if ball.is_no_ball {
                line.no_balls = line.no_balls.saturating_sub(1);
            }
            if ball.is_legal() {
                if line.balls == 0 {
                    line.overs = line.overs.saturating_sub(1);
                    line.balls = 5;
                } else {
                    line.balls -= 1;
                }
            }
        }

        if !ball.is_wide
            && let Some(striker) = ball.striker.as_ref()
            && let Some(line) = next.batting.get_mut(striker)
        {
            // The no-ball delivery itself credited the batter nothing and
            // was not faced; any other ball's run total is what the bat
            // scored.
            if !ball.is_no_ball {
                line.runs -= ball.runs;
                if ball.runs == 4 {
                    line.fours = line.fours.saturating_sub(1);
                }
                if ball.runs == 6 {
                    line.sixes = line.sixes.saturating_sub(1);
                }
                line.balls_faced = line.balls_faced.saturating_sub(1);
            }
            if ball.is_wicket {
                line.is_out = false;
                line.dismissal = None;
            }
        }

        next.runs -= ball.runs;
        if ball.is_wicket {
            next.wickets = next.wickets.saturating_sub(1);
        }

        earliest_removed = Some(ball);
    }

    // On-field slots come from the earliest removed ball's record, which
    // captured who was in them at that delivery.
    if let Some(ball) = earliest_removed {
        next.striker = ball.striker;
        next.bowler = ball.bowler;
    }
    next.pending_no_ball_runs = next
        .overs
        .iter()
        .flat_map(|o| o.balls.iter())
        .next_back()
        .is_some_and(|b| b.is_no_ball);

    // Participants whose every contribution was removed drop back out of the
    // figures, unless they still hold an on-field slot.
    let striker = next.striker.clone();
    let non_striker = next.non_striker.clone();
    next.batting.retain(|id, line| {
        *line != BattingLine::default()
            || striker.as_ref() == Some(id)
            || non_striker.as_ref() == Some(id)
    });
    let kept: BTreeSet<PlayerId> = next.batting.keys().cloned().collect();
    next.batting_order.retain(|id| kept.contains(id));

    let bowler = next.bowler.clone();
    let bound: BTreeSet<PlayerId> = next.overs.iter().filter_map(|o| o.bowler.clone()).collect();
    next.bowling.retain(|id, line| {
        *line != BowlingLine::default() || bowler.as_ref() == Some(id) || bound.contains(id)
    });

    Ok(next)
}

fn last_ball_position(innings: &Innings) -> Option<(usize, usize)> {
    innings
        .overs
        .iter()
        .enumerate()
        .rev()
        .find(|(_, over)| !over.balls.is_empty())
        .map(|(oi, over)| (oi, over.balls.len() - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::start_match;
    use crate::processor::{apply_ball, select_batsman, select_bowler};
    use crease_types::{BallEvent, Group, MatchCategory, MatchConfig, PlayerId, TeamId};

    fn pid(tag: &str) -> PlayerId {
        PlayerId::new(tag)
    }

    fn ready_innings() -> Innings {
        let innings = Innings::new(TeamId::new("a1"), TeamId::new("b1"));
        let innings = select_batsman(&innings, pid("bat1"), true);
        let innings = select_batsman(&innings, pid("bat2"), false);
        select_bowler(&innings, pid("bowl1"), &MatchConfig::default()).unwrap()
    }

    fn live_match_with(innings: Innings) -> Match {
        let mut m = start_match(
            Group::A,
            MatchCategory::Group,
            TeamId::new("a1"),
            TeamId::new("b1"),
        );
        m.innings1 = Some(innings);
        m
    }

    #[test]
    fn undo_restores_the_recorded_snapshot() {
        let config = MatchConfig::default();
        let m = live_match_with(ready_innings());
        let snapshot = record_for_undo(ActionKind::AddBall, &m);

        let mut mutated = m.clone();
        let innings = mutated.innings1.take().unwrap();
        mutated.innings1 = Some(apply_ball(&innings, &BallEvent::runs(4), &config).unwrap());

        let state = MatchState {
            current_match: Some(mutated),
            last_action: Some(snapshot),
        };
        let undone = undo(&state).unwrap();
        similar_asserts::assert_eq!(undone.current_match, Some(m));
        assert!(undone.last_action.is_none());
    }

    #[test]
    fn undo_with_empty_slot_is_rejected() {
        let state = MatchState::default();
        assert_eq!(undo(&state), Err(ScoringError::NothingToUndo));
    }

    #[test]
    fn undo_to_ball_rejects_missing_position() {
        let m = live_match_with(ready_innings());
        assert_eq!(
            undo_to_ball(&m, 0, 0),
            Err(ScoringError::NoSuchBall {
                over_index: 0,
                ball_index: 0,
            })
        );
        assert_eq!(
            undo_to_ball(&m, 3, 1),
            Err(ScoringError::NoSuchBall {
                over_index: 3,
                ball_index: 1,
            })
        );
    }

    #[test]
    fn undo_to_ball_needs_a_live_match() {
        let mut m = live_match_with(ready_innings());
        m.status = MatchStatus::Completed;
        assert_eq!(
            undo_to_ball(&m, 0, 0),
            Err(ScoringError::InvalidTransition {
                status: MatchStatus::Completed,
                operation: "undo_to_ball",
            })
        );
    }

    /// Applies a mixed sequence spanning an over boundary, then rewinds to
    /// every earlier point and checks the innings equals the snapshot taken
    /// when that point was live.
    #[test]
    fn undo_to_ball_restores_each_prior_snapshot() {
        let config = MatchConfig::default();
        let events = [
            BallEvent::runs(1),
            BallEvent::wide(),
            BallEvent::runs(4),
            BallEvent::no_ball(),
            BallEvent::runs(2),
            BallEvent::runs(0),
            BallEvent::runs(3),
            BallEvent::runs(0),
            BallEvent::runs(2), // sixth legal ball, over closes
            BallEvent::runs(1),
            BallEvent::wide(),
        ];

        let mut innings = ready_innings();
        let mut snapshots = Vec::new();
        let mut positions = Vec::new();
        for event in events {
            if innings.bowler.is_none() {
                innings = select_bowler(&innings, pid("bowl2"), &config).unwrap();
            }
            let oi = innings.overs.len() - 1;
            positions.push((oi, innings.overs[oi].balls.len()));
            snapshots.push(innings.clone());
            innings = apply_ball(&innings, &event, &config).unwrap();
        }

        let final_match = live_match_with(innings);
        for (i, (oi, bi)) in positions.into_iter().enumerate() {
            let rewound = undo_to_ball(&final_match, oi, bi).unwrap();
            similar_asserts::assert_eq!(
                rewound.innings1.as_ref().unwrap(),
                &snapshots[i],
                "rewind to before event {i}"
            );
        }
    }

    #[test]
    fn wicket_undo_restores_the_dismissed_batter() {
        let config = MatchConfig::default();
        let mut innings = ready_innings();
        innings = apply_ball(&innings, &BallEvent::runs(1), &config).unwrap();
        let before_wicket = innings.clone();
        innings = apply_ball(&innings, &BallEvent::wicket(), &config).unwrap();
        // New batter takes the crease after the dismissal.
        innings = select_batsman(&innings, pid("bat3"), true);

        let m = live_match_with(innings);
        let rewound = undo_to_ball(&m, 0, 1).unwrap();
        let rewound_innings = rewound.innings1.as_ref().unwrap();

        assert_eq!(rewound_innings.wickets, 0);
        assert_eq!(rewound_innings.striker, Some(pid("bat2")));
        let line = rewound_innings.batting_line(&pid("bat2")).unwrap();
        assert!(!line.is_out);
        assert_eq!(line.dismissal, None);
        assert_eq!(rewound_innings.runs, before_wicket.runs);
        assert_eq!(rewound_innings.legal_balls(), before_wicket.legal_balls());
        // The batter who came in after the wicket never existed at this point.
        assert!(rewound_innings.batting_line(&pid("bat3")).is_none());
        assert_eq!(rewound_innings.batting_order, vec![pid("bat1"), pid("bat2")]);
    }

    #[test]
    fn undo_across_the_over_boundary_reopens_the_over() {
        let config = MatchConfig::default();
        let mut innings = ready_innings();
        for _ in 0..6 {
            innings = apply_ball(&innings, &BallEvent::runs(0), &config).unwrap();
        }
        assert_eq!(innings.current_over, 1);
        assert_eq!(innings.bowler, None);

        let m = live_match_with(innings);
        let rewound = undo_to_ball(&m, 0, 5).unwrap();
        let rewound_innings = rewound.innings1.as_ref().unwrap();

        assert_eq!(rewound_innings.current_over, 0);
        assert_eq!(rewound_innings.current_ball, 5);
        assert_eq!(rewound_innings.overs.len(), 1);
        assert_eq!(rewound_innings.bowler, Some(pid("bowl1")));
        let line = rewound_innings.bowling_line(&pid("bowl1")).unwrap();
        assert_eq!(line.overs, 0);
        assert_eq!(line.balls, 5);
    }

    #[test]
    fn undo_to_ball_targets_the_super_over_when_one_is_live() {
        let config = MatchConfig::default().super_over();
        let mut innings = ready_innings();
        innings = apply_ball(&innings, &BallEvent::runs(4), &config).unwrap();

        let mut m = live_match_with(Innings::new(TeamId::new("a1"), TeamId::new("b1")));
        m.status = MatchStatus::SuperOver;
        m.super_over = Some(crease_types::SuperOver {
            innings1: Some(innings),
            innings2: None,
            current_innings: crease_types::InningsNumber::First,
            completed: false,
        });

        let rewound = undo_to_ball(&m, 0, 0).unwrap();
        let so = rewound.super_over.as_ref().unwrap();
        assert_eq!(so.innings1.as_ref().unwrap().runs, 0);
        // The regulation innings is untouched.
        assert_eq!(rewound.innings1.as_ref().unwrap().runs, 0);
    }
}
