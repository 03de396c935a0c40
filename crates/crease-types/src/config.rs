use serde::{Deserialize, Serialize};

/// Smallest playing squad a team may field.
pub const SQUAD_MIN: usize = 7;
/// Largest playing squad a team may field.
pub const SQUAD_MAX: usize = 11;

/// Tournament-level match format. One instance is shared by every match in a
/// season; the super-over caps are projected out via [`MatchConfig::super_over`].
///
/// Defaults match the reference tournament format: 8 overs, 7 wickets,
/// 7 playing players, 2 overs per bowler, 1-over/2-wicket super over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub max_overs: u32,
    pub max_wickets: u32,
    pub playing_players: usize,
    pub max_overs_per_bowler: u32,
    pub super_over_overs: u32,
    pub super_over_wickets: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_overs: 8,
            max_wickets: 7,
            playing_players: 7,
            max_overs_per_bowler: 2,
            super_over_overs: 1,
            super_over_wickets: 2,
        }
    }
}

impl MatchConfig {
    /// The reduced-cap format a super over is scored under. Super-over balls
    /// go through the same processor as regulation balls, only the caps shrink.
    pub fn super_over(&self) -> MatchConfig {
        MatchConfig {
            max_overs: self.super_over_overs,
            max_wickets: self.super_over_wickets,
            // A single over cannot exceed the per-bowler cap anyway.
            max_overs_per_bowler: self.super_over_overs,
            ..self.clone()
        }
    }
}
