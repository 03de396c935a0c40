use crate::ids::TeamId;
use serde::{Deserialize, Serialize};

/// A settable position in the knockout bracket.
///
/// Pairings: SF1 is A1 vs B2, SF2 is B1 vs A2, the final is SF1 winner vs
/// SF2 winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSlot {
    QualifiedA1,
    QualifiedA2,
    QualifiedB1,
    QualifiedB2,
    Sf1Winner,
    Sf2Winner,
    FinalWinner,
}

/// Knockout-bracket bookkeeping for a 4-team-per-group, 2-semifinal,
/// 1-final tournament.
///
/// Each field is settable independently, but changing an upstream slot
/// cascades a clear into everything that depended on it: re-picking a
/// semifinal qualifier clears that semifinal's winner, and re-picking a
/// semifinal winner clears the recorded champion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentState {
    pub qualified_a1: Option<TeamId>,
    pub qualified_a2: Option<TeamId>,
    pub qualified_b1: Option<TeamId>,
    pub qualified_b2: Option<TeamId>,
    pub sf1_winner: Option<TeamId>,
    pub sf2_winner: Option<TeamId>,
    pub final_winner: Option<TeamId>,
}

impl TournamentState {
    /// Set (or clear, with `None`) one bracket slot, cascading clears into
    /// dependent downstream slots.
    pub fn set(&mut self, slot: BracketSlot, value: Option<TeamId>) {
        match slot {
            BracketSlot::QualifiedA1 => {
                self.qualified_a1 = value;
                self.clear_sf1();
            }
            BracketSlot::QualifiedB2 => {
                self.qualified_b2 = value;
                self.clear_sf1();
            }
            BracketSlot::QualifiedB1 => {
                self.qualified_b1 = value;
                self.clear_sf2();
            }
            BracketSlot::QualifiedA2 => {
                self.qualified_a2 = value;
                self.clear_sf2();
            }
            BracketSlot::Sf1Winner => {
                self.sf1_winner = value;
                self.final_winner = None;
            }
            BracketSlot::Sf2Winner => {
                self.sf2_winner = value;
                self.final_winner = None;
            }
            BracketSlot::FinalWinner => {
                self.final_winner = value;
            }
        }
    }

    fn clear_sf1(&mut self) {
        self.sf1_winner = None;
        self.final_winner = None;
    }

    fn clear_sf2(&mut self) {
        self.sf2_winner = None;
        self.final_winner = None;
    }

    /// SF1 participants (A1 vs B2), when both are picked.
    pub fn sf1_pairing(&self) -> Option<(&TeamId, &TeamId)> {
        Some((self.qualified_a1.as_ref()?, self.qualified_b2.as_ref()?))
    }

    /// SF2 participants (B1 vs A2), when both are picked.
    pub fn sf2_pairing(&self) -> Option<(&TeamId, &TeamId)> {
        Some((self.qualified_b1.as_ref()?, self.qualified_a2.as_ref()?))
    }

    /// Final participants, when both semifinal winners are recorded.
    pub fn final_pairing(&self) -> Option<(&TeamId, &TeamId)> {
        Some((self.sf1_winner.as_ref()?, self.sf2_winner.as_ref()?))
    }

    /// Clear every selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Option<TeamId> {
        Some(TeamId::new(s))
    }

    fn full_bracket() -> TournamentState {
        let mut t = TournamentState::default();
        t.set(BracketSlot::QualifiedA1, id("a1"));
        t.set(BracketSlot::QualifiedA2, id("a2"));
        t.set(BracketSlot::QualifiedB1, id("b1"));
        t.set(BracketSlot::QualifiedB2, id("b2"));
        t.set(BracketSlot::Sf1Winner, id("a1"));
        t.set(BracketSlot::Sf2Winner, id("b1"));
        t.set(BracketSlot::FinalWinner, id("a1"));
        t
    }

    #[test]
    fn pairings_require_both_slots() {
        let mut t = TournamentState::default();
        assert!(t.sf1_pairing().is_none());
        t.set(BracketSlot::QualifiedA1, id("a1"));
        assert!(t.sf1_pairing().is_none());
        t.set(BracketSlot::QualifiedB2, id("b2"));
        assert!(t.sf1_pairing().is_some());
    }

    #[test]
    fn repicking_a_qualifier_clears_its_semifinal_and_the_final() {
        let mut t = full_bracket();
        t.set(BracketSlot::QualifiedA1, id("a3"));

        assert_eq!(t.sf1_winner, None);
        assert_eq!(t.final_winner, None);
        // The other semifinal is untouched.
        assert_eq!(t.sf2_winner, id("b1"));
    }

    #[test]
    fn repicking_a_semifinal_winner_clears_only_the_final() {
        let mut t = full_bracket();
        t.set(BracketSlot::Sf2Winner, id("a2"));

        assert_eq!(t.final_winner, None);
        assert_eq!(t.sf1_winner, id("a1"));
        assert_eq!(t.qualified_b1, id("b1"));
    }

    #[test]
    fn clearing_with_none_cascades_the_same_way() {
        let mut t = full_bracket();
        t.set(BracketSlot::QualifiedB1, None);

        assert_eq!(t.qualified_b1, None);
        assert_eq!(t.sf2_winner, None);
        assert_eq!(t.final_winner, None);
    }

    #[test]
    fn reset_clears_everything() {
        let mut t = full_bracket();
        t.reset();
        similar_asserts::assert_eq!(t, TournamentState::default());
    }
}
