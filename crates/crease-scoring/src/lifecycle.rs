//! Innings and match lifecycle: `setup -> live(1) -> live(2) -> [super_over]
//! -> completed`.
//!
//! Every transition validates its precondition and returns
//! [`ScoringError::InvalidTransition`] instead of corrupting state; callers
//! surface the failure and carry on with the state they already had.

use chrono::Utc;
use crease_types::{
    Group, Innings, InningsNumber, Match, MatchCategory, MatchConfig, MatchId, MatchStatus,
    SuperOver, TeamId,
};
use tracing::debug;

use crate::error::ScoringError;

/// Whether an innings has exhausted its wickets or overs budget.
pub fn innings_complete(innings: &Innings, config: &MatchConfig) -> bool {
    innings.wickets >= config.max_wickets || innings.current_over as u32 >= config.max_overs
}

/// Create a live match with innings 1 ready to score.
///
/// The toss outcome is encoded by argument order: `team1` bats first.
pub fn start_match(group: Group, category: MatchCategory, team1: TeamId, team2: TeamId) -> Match {
    debug!(%team1, %team2, "starting match");
    Match {
        id: MatchId::new(),
        group,
        category,
        team1: team1.clone(),
        team2: team2.clone(),
        innings1: Some(Innings::new(team1, team2)),
        innings2: None,
        current_innings: InningsNumber::First,
        status: MatchStatus::Live,
        winner: None,
        super_over: None,
        started_at: Utc::now(),
    }
}

/// Move from innings 1 to innings 2, swapping batting and bowling teams.
///
/// Not automatic: the scorer (or an overs/wickets-exhausted check upstream)
/// triggers it explicitly. Invalid once innings 2 exists.
pub fn switch_innings(current: &Match) -> Result<Match, ScoringError> {
    if current.status != MatchStatus::Live
        || current.current_innings != InningsNumber::First
        || current.innings1.is_none()
    {
        return Err(ScoringError::InvalidTransition {
            status: current.status,
            operation: "switch_innings",
        });
    }
    let mut next = current.clone();
    next.innings2 = Some(Innings::new(next.team2.clone(), next.team1.clone()));
    next.current_innings = InningsNumber::Second;
    Ok(next)
}

/// Open a super over after a regulation tie (or another one after a tied
/// super over). Team 1 bats first, mirroring the main match.
pub fn start_super_over(current: &Match) -> Result<Match, ScoringError> {
    let tied_regulation = current.status == MatchStatus::Live
        && regulation_runs(current).is_some_and(|(r1, r2)| r1 == r2);
    let tied_super_over = current.status == MatchStatus::SuperOver
        && current
            .super_over
            .as_ref()
            .is_some_and(|so| so.completed && super_over_runs(so).is_some_and(|(s1, s2)| s1 == s2));

    if !tied_regulation && !tied_super_over {
        return Err(ScoringError::InvalidTransition {
            status: current.status,
            operation: "start_super_over",
        });
    }

    debug!(match_id = %current.id, escalation = tied_super_over, "starting super over");
    let mut next = current.clone();
    next.status = MatchStatus::SuperOver;
    next.super_over = Some(SuperOver {
        innings1: Some(Innings::new(next.team1.clone(), next.team2.clone())),
        innings2: None,
        current_innings: InningsNumber::First,
        completed: false,
    });
    Ok(next)
}

/// Move the super over from innings 1 to innings 2.
pub fn switch_super_over_innings(current: &Match) -> Result<Match, ScoringError> {
    let valid = current.status == MatchStatus::SuperOver
        && current
            .super_over
            .as_ref()
            .is_some_and(|so| so.current_innings == InningsNumber::First && !so.completed);
    if !valid {
        return Err(ScoringError::InvalidTransition {
            status: current.status,
            operation: "switch_super_over_innings",
        });
    }
    let mut next = current.clone();
    let team1 = next.team1.clone();
    let team2 = next.team2.clone();
    if let Some(so) = next.super_over.as_mut() {
        so.innings2 = Some(Innings::new(team2, team1));
        so.current_innings = InningsNumber::Second;
    }
    Ok(next)
}

/// Close out the super over. Winner determination stays with [`end_match`];
/// a still-tied super over can be escalated via [`start_super_over`].
pub fn end_super_over(current: &Match) -> Result<Match, ScoringError> {
    if current.status != MatchStatus::SuperOver || current.super_over.is_none() {
        return Err(ScoringError::InvalidTransition {
            status: current.status,
            operation: "end_super_over",
        });
    }
    let mut next = current.clone();
    if let Some(so) = next.super_over.as_mut() {
        so.completed = true;
    }
    Ok(next)
}

/// Complete the match and determine the winner.
///
/// Strictly more runs wins; equal runs is a tie (`winner = None`). When a
/// completed super over exists, its runs decide instead of the regulation
/// innings. The caller moves the returned match into history and clears the
/// live slot.
pub fn end_match(current: &Match) -> Result<Match, ScoringError> {
    if !matches!(current.status, MatchStatus::Live | MatchStatus::SuperOver) {
        return Err(ScoringError::InvalidTransition {
            status: current.status,
            operation: "end_match",
        });
    }

    let (team1_runs, team2_runs) = match current.super_over.as_ref() {
        Some(so) if so.completed => super_over_runs(so).unwrap_or((0, 0)),
        _ => regulation_runs(current).unwrap_or((0, 0)),
    };

    let mut next = current.clone();
    next.status = MatchStatus::Completed;
    next.winner = if team1_runs > team2_runs {
        Some(next.team1.clone())
    } else if team2_runs > team1_runs {
        Some(next.team2.clone())
    } else {
        None
    };
    debug!(match_id = %next.id, winner = ?next.winner, "match completed");
    Ok(next)
}

fn regulation_runs(m: &Match) -> Option<(i32, i32)> {
    Some((
        m.innings1.as_ref()?.runs,
        m.innings2.as_ref().map(|i| i.runs).unwrap_or(0),
    ))
}

fn super_over_runs(so: &SuperOver) -> Option<(i32, i32)> {
    Some((
        so.innings1.as_ref()?.runs,
        so.innings2.as_ref().map(|i| i.runs).unwrap_or(0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams() -> (TeamId, TeamId) {
        (TeamId::new("a1"), TeamId::new("a2"))
    }

    fn live_match() -> Match {
        let (t1, t2) = teams();
        start_match(Group::A, MatchCategory::Group, t1, t2)
    }

    fn with_runs(mut m: Match, innings1: i32, innings2: i32) -> Match {
        m = switch_innings(&m).unwrap();
        if let Some(i) = m.innings1.as_mut() {
            i.runs = innings1;
        }
        if let Some(i) = m.innings2.as_mut() {
            i.runs = innings2;
        }
        m
    }

    #[test]
    fn start_match_initializes_innings_one_live() {
        let m = live_match();
        assert_eq!(m.status, MatchStatus::Live);
        assert_eq!(m.current_innings, InningsNumber::First);
        assert!(m.innings1.is_some());
        assert!(m.innings2.is_none());
        assert_eq!(m.innings1.as_ref().unwrap().batting_team, m.team1);
    }

    #[test]
    fn switch_innings_swaps_batting_sides() {
        let m = switch_innings(&live_match()).unwrap();
        assert_eq!(m.current_innings, InningsNumber::Second);
        let innings2 = m.innings2.as_ref().unwrap();
        assert_eq!(innings2.batting_team, m.team2);
        assert_eq!(innings2.bowling_team, m.team1);
    }

    #[test]
    fn switch_innings_twice_is_rejected() {
        let m = switch_innings(&live_match()).unwrap();
        assert_eq!(
            switch_innings(&m),
            Err(ScoringError::InvalidTransition {
                status: MatchStatus::Live,
                operation: "switch_innings",
            })
        );
    }

    #[test]
    fn innings_complete_on_either_cap() {
        let config = MatchConfig::default();
        let (t1, t2) = teams();
        let mut innings = Innings::new(t1, t2);
        assert!(!innings_complete(&innings, &config));

        innings.wickets = config.max_wickets;
        assert!(innings_complete(&innings, &config));

        innings.wickets = 0;
        innings.current_over = config.max_overs as usize;
        assert!(innings_complete(&innings, &config));
    }

    #[test]
    fn higher_second_innings_wins() {
        let m = with_runs(live_match(), 120, 121);
        let done = end_match(&m).unwrap();
        assert_eq!(done.status, MatchStatus::Completed);
        assert_eq!(done.winner, Some(done.team2.clone()));
    }

    #[test]
    fn equal_runs_is_a_tie() {
        let m = with_runs(live_match(), 120, 120);
        let done = end_match(&m).unwrap();
        assert_eq!(done.status, MatchStatus::Completed);
        assert_eq!(done.winner, None);
    }

    #[test]
    fn end_match_twice_is_rejected() {
        let done = end_match(&with_runs(live_match(), 10, 20)).unwrap();
        assert_eq!(
            end_match(&done),
            Err(ScoringError::InvalidTransition {
                status: MatchStatus::Completed,
                operation: "end_match",
            })
        );
    }

    #[test]
    fn super_over_requires_a_tie() {
        let won = with_runs(live_match(), 100, 90);
        assert!(start_super_over(&won).is_err());

        let tied = with_runs(live_match(), 90, 90);
        let so_match = start_super_over(&tied).unwrap();
        assert_eq!(so_match.status, MatchStatus::SuperOver);
        let so = so_match.super_over.as_ref().unwrap();
        assert_eq!(so.current_innings, InningsNumber::First);
        assert_eq!(so.innings1.as_ref().unwrap().batting_team, so_match.team1);
    }

    #[test]
    fn completed_super_over_decides_the_winner() {
        let mut m = start_super_over(&with_runs(live_match(), 90, 90)).unwrap();
        m = switch_super_over_innings(&m).unwrap();
        {
            let so = m.super_over.as_mut().unwrap();
            so.innings1.as_mut().unwrap().runs = 8;
            so.innings2.as_mut().unwrap().runs = 10;
        }
        m = end_super_over(&m).unwrap();
        let done = end_match(&m).unwrap();
        assert_eq!(done.winner, Some(done.team2.clone()));
    }

    #[test]
    fn tied_super_over_can_escalate_to_another() {
        let mut m = start_super_over(&with_runs(live_match(), 90, 90)).unwrap();
        m = switch_super_over_innings(&m).unwrap();
        {
            let so = m.super_over.as_mut().unwrap();
            so.innings1.as_mut().unwrap().runs = 6;
            so.innings2.as_mut().unwrap().runs = 6;
        }
        // Not escalatable until the super over is closed out.
        assert!(start_super_over(&m).is_err());
        m = end_super_over(&m).unwrap();

        let second = start_super_over(&m).unwrap();
        let so = second.super_over.as_ref().unwrap();
        assert!(!so.completed);
        assert_eq!(so.innings1.as_ref().unwrap().runs, 0);
        assert!(so.innings2.is_none());
    }

    #[test]
    fn tied_super_over_left_unescalated_ends_as_tie() {
        let mut m = start_super_over(&with_runs(live_match(), 90, 90)).unwrap();
        m = switch_super_over_innings(&m).unwrap();
        {
            let so = m.super_over.as_mut().unwrap();
            so.innings1.as_mut().unwrap().runs = 6;
            so.innings2.as_mut().unwrap().runs = 6;
        }
        m = end_super_over(&m).unwrap();
        let done = end_match(&m).unwrap();
        assert_eq!(done.winner, None);
    }
}
