pub mod audit;
pub mod error;
pub mod lifecycle;
pub mod overs;
pub mod processor;
pub mod reconcile;
pub mod stats;
pub mod undo;

pub use audit::audit_innings;
pub use error::{ScoringError, ScoringViolation};
pub use lifecycle::{
    end_match, end_super_over, innings_complete, start_match, start_super_over, switch_innings,
    switch_super_over_innings,
};
pub use processor::{
    apply_ball, apply_ball_to_match, replace_player, select_batsman, select_bowler, swap_strike,
};
pub use reconcile::{ScoreComparison, ScoreSnapshot, compare, compare_streams};
pub use stats::{PlayerStatLine, TeamStanding, derive_player_stats, derive_team_stats};
pub use undo::{record_for_undo, undo, undo_to_ball};
