//! Tournament aggregates derived on demand from match records: group
//! standings with net run rate, and per-player career lines.
//!
//! Nothing here is stored; the match history is the source of truth and
//! these tables are recomputed whenever a caller wants them.

use crease_types::{BattingLine, BowlingLine, Innings, Match, MatchStatus, PlayerId, Team, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::overs::{decimal_overs, format_overs};

/// One team's row in the standings table.
///
/// Run-rate figures accumulate regulation innings only; super overs decide a
/// winner but never move net run rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team: TeamId,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points: u32,
    pub runs_scored: i32,
    pub overs_faced: f64,
    pub runs_conceded: i32,
    pub overs_bowled: f64,
    pub fours: u32,
    pub sixes: u32,
    pub wickets_taken: u32,
}

impl TeamStanding {
    fn new(team: TeamId) -> Self {
        Self {
            team,
            matches_played: 0,
            wins: 0,
            losses: 0,
            ties: 0,
            points: 0,
            runs_scored: 0,
            overs_faced: 0.0,
            runs_conceded: 0,
            overs_bowled: 0.0,
            fours: 0,
            sixes: 0,
            wickets_taken: 0,
        }
    }

    /// `runs_scored / overs_faced - runs_conceded / overs_bowled`, with each
    /// term dropping to zero when its overs figure is zero.
    pub fn net_run_rate(&self) -> f64 {
        let scored = if self.overs_faced > 0.0 {
            f64::from(self.runs_scored) / self.overs_faced
        } else {
            0.0
        };
        let conceded = if self.overs_bowled > 0.0 {
            f64::from(self.runs_conceded) / self.overs_bowled
        } else {
            0.0
        };
        scored - conceded
    }
}

/// Standings over the given matches, sorted by points then net run rate,
/// with team id as the deterministic final tie-break.
///
/// Only completed matches count. A win is 2 points, a tie 1 each. Every
/// team in `teams` gets a row even before its first completed match.
pub fn derive_team_stats(matches: &[Match], teams: &[Team]) -> Vec<TeamStanding> {
    let mut table: BTreeMap<TeamId, TeamStanding> = BTreeMap::new();
    for team in teams {
        table
            .entry(team.id.clone())
            .or_insert_with(|| TeamStanding::new(team.id.clone()));
    }

    for m in matches.iter().filter(|m| m.status == MatchStatus::Completed) {
        for team in [&m.team1, &m.team2] {
            let entry = table
                .entry(team.clone())
                .or_insert_with(|| TeamStanding::new(team.clone()));
            entry.matches_played += 1;
            match m.winner.as_ref() {
                Some(winner) if winner == team => {
                    entry.wins += 1;
                    entry.points += 2;
                }
                Some(_) => entry.losses += 1,
                None => {
                    entry.ties += 1;
                    entry.points += 1;
                }
            }
        }

        for innings in [m.innings1.as_ref(), m.innings2.as_ref()]
            .into_iter()
            .flatten()
        {
            if let Some(batting) = table.get_mut(&innings.batting_team) {
                batting.runs_scored += innings.runs;
                batting.overs_faced += innings.overs_decimal();
                for line in innings.batting.values() {
                    batting.fours += line.fours;
                    batting.sixes += line.sixes;
                }
            }
            if let Some(bowling) = table.get_mut(&innings.bowling_team) {
                bowling.runs_conceded += innings.runs;
                bowling.overs_bowled += innings.overs_decimal();
                bowling.wickets_taken += innings.wickets;
            }
        }
    }

    let mut standings: Vec<TeamStanding> = table.into_values().collect();
    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| {
                b.net_run_rate()
                    .partial_cmp(&a.net_run_rate())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.team.cmp(&b.team))
    });
    standings
}

/// One player's accumulated figures across every innings they appeared in,
/// super overs included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub player: PlayerId,
    pub matches_played: u32,
    pub runs: i32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub times_out: u32,
    pub highest_score: i32,
    pub wickets: u32,
    pub runs_conceded: i32,
    /// Legal deliveries bowled, normalized across over boundaries.
    pub balls_bowled: u32,
    /// Best single-innings figure as `(wickets, runs conceded)`: more
    /// wickets first, fewer runs breaking ties.
    pub best_bowling: Option<(u32, i32)>,
}

impl PlayerStatLine {
    fn new(player: PlayerId) -> Self {
        Self {
            player,
            matches_played: 0,
            runs: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
            times_out: 0,
            highest_score: 0,
            wickets: 0,
            runs_conceded: 0,
            balls_bowled: 0,
            best_bowling: None,
        }
    }

    /// Runs per hundred balls faced; zero before any ball is faced.
    pub fn strike_rate(&self) -> f64 {
        if self.balls_faced == 0 {
            0.0
        } else {
            f64::from(self.runs) * 100.0 / f64::from(self.balls_faced)
        }
    }

    /// Runs per dismissal; zero while the player is yet to be dismissed.
    pub fn batting_average(&self) -> f64 {
        if self.times_out == 0 {
            0.0
        } else {
            f64::from(self.runs) / f64::from(self.times_out)
        }
    }

    /// Runs conceded per over bowled; zero before any legal ball is bowled.
    pub fn economy(&self) -> f64 {
        if self.balls_bowled == 0 {
            0.0
        } else {
            f64::from(self.runs_conceded)
                / decimal_overs(self.balls_bowled / 6, self.balls_bowled % 6)
        }
    }

    /// Overs bowled in scoreboard form, e.g. `"4.2"`.
    pub fn overs_bowled_display(&self) -> String {
        format_overs(self.balls_bowled / 6, self.balls_bowled % 6)
    }
}

/// Per-player aggregates over the given matches, keyed by player id.
///
/// A match counts once toward `matches_played` however many innings the
/// player appeared in. Stat lines that never saw a ball (a batter selected
/// but not yet facing, a bowler bound but not yet bowling) contribute
/// nothing. Every rostered player in `teams` gets a zeroed line so lookups
/// never miss.
pub fn derive_player_stats(
    matches: &[Match],
    teams: &[Team],
) -> BTreeMap<PlayerId, PlayerStatLine> {
    let mut table: BTreeMap<PlayerId, PlayerStatLine> = BTreeMap::new();
    for player in teams.iter().flat_map(|t| &t.players) {
        table
            .entry(player.id.clone())
            .or_insert_with(|| PlayerStatLine::new(player.id.clone()));
    }

    for m in matches {
        let mut appeared: BTreeSet<PlayerId> = BTreeSet::new();

        for innings in all_innings(m) {
            for (id, line) in &innings.batting {
                if *line == BattingLine::default() {
                    continue;
                }
                let entry = table
                    .entry(id.clone())
                    .or_insert_with(|| PlayerStatLine::new(id.clone()));
                entry.runs += line.runs;
                entry.balls_faced += line.balls_faced;
                entry.fours += line.fours;
                entry.sixes += line.sixes;
                if line.is_out {
                    entry.times_out += 1;
                }
                entry.highest_score = entry.highest_score.max(line.runs);
                appeared.insert(id.clone());
            }

            for (id, line) in &innings.bowling {
                if *line == BowlingLine::default() {
                    continue;
                }
                let entry = table
                    .entry(id.clone())
                    .or_insert_with(|| PlayerStatLine::new(id.clone()));
                entry.wickets += line.wickets;
                entry.runs_conceded += line.runs;
                entry.balls_bowled += line.overs * 6 + line.balls;
                let figure = (line.wickets, line.runs);
                let better = match entry.best_bowling {
                    None => true,
                    Some((w, r)) => line.wickets > w || (line.wickets == w && line.runs < r),
                };
                if better {
                    entry.best_bowling = Some(figure);
                }
                appeared.insert(id.clone());
            }
        }

        for id in appeared {
            if let Some(entry) = table.get_mut(&id) {
                entry.matches_played += 1;
            }
        }
    }

    table
}

fn all_innings(m: &Match) -> impl Iterator<Item = &Innings> {
    let so = m.super_over.as_ref();
    [
        m.innings1.as_ref(),
        m.innings2.as_ref(),
        so.and_then(|s| s.innings1.as_ref()),
        so.and_then(|s| s.innings2.as_ref()),
    ]
    .into_iter()
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{end_match, start_match, switch_innings};
    use crease_types::{Group, MatchCategory};

    fn tid(tag: &str) -> TeamId {
        TeamId::new(tag)
    }

    fn pid(tag: &str) -> PlayerId {
        PlayerId::new(tag)
    }

    /// A completed match with both innings' totals and overs set directly.
    fn completed(
        team1: &str,
        team2: &str,
        runs1: i32,
        overs1: usize,
        runs2: i32,
        overs2: usize,
    ) -> Match {
        let mut m = start_match(Group::A, MatchCategory::Group, tid(team1), tid(team2));
        m = switch_innings(&m).unwrap();
        if let Some(i) = m.innings1.as_mut() {
            i.runs = runs1;
            i.current_over = overs1;
        }
        if let Some(i) = m.innings2.as_mut() {
            i.runs = runs2;
            i.current_over = overs2;
        }
        end_match(&m).unwrap()
    }

    #[test]
    fn standings_award_two_for_a_win_and_one_for_a_tie() {
        let matches = [
            completed("a1", "a2", 120, 8, 100, 8),
            completed("a1", "a3", 90, 8, 90, 8),
        ];
        let standings = derive_team_stats(&matches, &[]);

        assert_eq!(standings[0].team, tid("a1"));
        assert_eq!(standings[0].matches_played, 2);
        assert_eq!(standings[0].wins, 1);
        assert_eq!(standings[0].ties, 1);
        assert_eq!(standings[0].points, 3);

        let a3 = standings.iter().find(|s| s.team == tid("a3")).unwrap();
        assert_eq!(a3.points, 1);
        let a2 = standings.iter().find(|s| s.team == tid("a2")).unwrap();
        assert_eq!(a2.points, 0);
        assert_eq!(a2.losses, 1);
    }

    #[test]
    fn incomplete_matches_do_not_count() {
        let mut live = start_match(Group::A, MatchCategory::Group, tid("a1"), tid("a2"));
        live = switch_innings(&live).unwrap();
        assert!(derive_team_stats(&[live], &[]).is_empty());
    }

    #[test]
    fn net_run_rate_is_antisymmetric_after_one_match() {
        let matches = [completed("a1", "a2", 160, 8, 120, 8)];
        let standings = derive_team_stats(&matches, &[]);
        let a1 = standings.iter().find(|s| s.team == tid("a1")).unwrap();
        let a2 = standings.iter().find(|s| s.team == tid("a2")).unwrap();

        assert!(a1.net_run_rate() > 0.0);
        assert!((a1.net_run_rate() + a2.net_run_rate()).abs() < 1e-9);
    }

    #[test]
    fn standings_accumulate_boundary_and_wicket_figures() {
        let mut m = completed("a1", "a2", 60, 8, 40, 8);
        if let Some(i) = m.innings1.as_mut() {
            i.wickets = 3;
            i.batting.insert(pid("p1"), batting(30, 20, false));
            if let Some(line) = i.batting.get_mut(&pid("p1")) {
                line.fours = 3;
                line.sixes = 1;
            }
        }

        let standings = derive_team_stats(&[m], &[]);
        let a1 = standings.iter().find(|s| s.team == tid("a1")).unwrap();
        assert_eq!(a1.fours, 3);
        assert_eq!(a1.sixes, 1);
        let a2 = standings.iter().find(|s| s.team == tid("a2")).unwrap();
        assert_eq!(a2.wickets_taken, 3);
        assert_eq!(a1.wickets_taken, 0);
    }

    #[test]
    fn registered_teams_and_players_get_rows_before_playing() {
        let mut team = crease_types::Team::new(tid("b4"), "B4", Group::B);
        team.players.push(crease_types::Player::new(pid("p7"), "P7"));
        let teams = [team];

        let standings = derive_team_stats(&[], &teams);
        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].team, tid("b4"));
        assert_eq!(standings[0].matches_played, 0);

        let stats = derive_player_stats(&[], &teams);
        assert_eq!(stats[&pid("p7")], PlayerStatLine::new(pid("p7")));
    }

    #[test]
    fn net_run_rate_with_no_overs_is_zero() {
        let standing = TeamStanding::new(tid("a1"));
        assert_eq!(standing.net_run_rate(), 0.0);
    }

    #[test]
    fn standings_sort_by_points_then_net_run_rate() {
        let matches = [
            // a1 beats a2 by a wide margin, a3 beats a4 narrowly.
            completed("a1", "a2", 160, 8, 80, 8),
            completed("a3", "a4", 110, 8, 105, 8),
        ];
        let standings = derive_team_stats(&matches, &[]);
        assert_eq!(standings[0].team, tid("a1"));
        assert_eq!(standings[1].team, tid("a3"));
    }

    fn batting(runs: i32, balls: u32, out: bool) -> BattingLine {
        BattingLine {
            runs,
            balls_faced: balls,
            fours: 0,
            sixes: 0,
            is_out: out,
            dismissal: None,
        }
    }

    fn bowling(overs: u32, balls: u32, runs: i32, wickets: u32) -> BowlingLine {
        BowlingLine {
            overs,
            balls,
            runs,
            wickets,
            wides: 0,
            no_balls: 0,
        }
    }

    #[test]
    fn player_stats_accumulate_across_matches() {
        let mut m1 = completed("a1", "a2", 60, 8, 50, 8);
        if let Some(i) = m1.innings1.as_mut() {
            i.batting.insert(pid("p1"), batting(45, 30, true));
            i.bowling.insert(pid("p9"), bowling(2, 0, 20, 1));
        }
        let mut m2 = completed("a1", "a3", 70, 8, 40, 8);
        if let Some(i) = m2.innings1.as_mut() {
            i.batting.insert(pid("p1"), batting(60, 40, false));
        }
        if let Some(i) = m2.innings2.as_mut() {
            i.bowling.insert(pid("p1"), bowling(1, 3, 12, 2));
            i.bowling.insert(pid("p9"), bowling(2, 0, 31, 1));
        }

        let stats = derive_player_stats(&[m1, m2], &[]);

        let p1 = &stats[&pid("p1")];
        assert_eq!(p1.matches_played, 2);
        assert_eq!(p1.runs, 105);
        assert_eq!(p1.balls_faced, 70);
        assert_eq!(p1.times_out, 1);
        assert_eq!(p1.highest_score, 60);
        assert_eq!(p1.wickets, 2);
        assert_eq!(p1.balls_bowled, 9);
        assert_eq!(p1.best_bowling, Some((2, 12)));
        assert_eq!(p1.strike_rate(), 150.0);
        assert_eq!(p1.batting_average(), 105.0);
        assert_eq!(p1.economy(), 8.0);
        assert_eq!(p1.overs_bowled_display(), "1.3");

        let p9 = &stats[&pid("p9")];
        assert_eq!(p9.matches_played, 2);
        // Equal wickets: the cheaper figure is the best.
        assert_eq!(p9.best_bowling, Some((1, 20)));
    }

    #[test]
    fn untouched_stat_lines_are_ignored() {
        let mut m = completed("a1", "a2", 10, 8, 5, 8);
        if let Some(i) = m.innings1.as_mut() {
            i.batting.insert(pid("bench"), BattingLine::default());
            i.bowling.insert(pid("bench"), BowlingLine::default());
        }
        let stats = derive_player_stats(&[m], &[]);
        assert!(!stats.contains_key(&pid("bench")));
    }

    #[test]
    fn fresh_line_rates_are_zero() {
        let line = PlayerStatLine::new(pid("p1"));
        assert_eq!(line.strike_rate(), 0.0);
        assert_eq!(line.batting_average(), 0.0);
        assert_eq!(line.economy(), 0.0);
    }
}
