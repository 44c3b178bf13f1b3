// Draft format and policy knobs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DraftError;

// ---------------------------------------------------------------------------
// Pick slots
// ---------------------------------------------------------------------------

/// A non-captain slot on an alliance. The slot also names the draft round in
/// which it is filled: `First` in the forward round, `Second` in the reverse
/// (snake) round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PickSlot {
    First,
    Second,
}

impl PickSlot {
    /// All slots in round order.
    pub const ALL: [PickSlot; 2] = [PickSlot::First, PickSlot::Second];

    /// 1-based draft round that fills this slot.
    pub fn round(self) -> usize {
        match self {
            PickSlot::First => 1,
            PickSlot::Second => 2,
        }
    }

    /// Map a 1-based round number back to its slot.
    pub fn from_round(round: usize) -> Option<Self> {
        match round {
            1 => Some(PickSlot::First),
            2 => Some(PickSlot::Second),
            _ => None,
        }
    }

    /// Whether this round walks alliances from the last to the first.
    pub fn is_reverse(self) -> bool {
        matches!(self, PickSlot::Second)
    }
}

impl fmt::Display for PickSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pick {}", self.round())
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Which alliances may draft a team that currently captains another alliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StealPolicy {
    /// Captains are never draftable.
    None,
    /// Only an alliance drafting no later than the captain's own alliance
    /// (equal or smaller number) may take it.
    #[default]
    EarlierOnly,
    /// Any other alliance may take a captain.
    Unrestricted,
}

impl StealPolicy {
    /// Whether `requesting` may draft the captain of alliance `captain_of`.
    /// An alliance never drafts its own captain regardless of policy.
    pub fn permits(self, requesting: usize, captain_of: usize) -> bool {
        if requesting == captain_of {
            return false;
        }
        match self {
            StealPolicy::None => false,
            StealPolicy::EarlierOnly => requesting <= captain_of,
            StealPolicy::Unrestricted => true,
        }
    }
}

/// How the simulator chooses a suggestion from the filtered available list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationPolicy {
    /// Highest composite score.
    #[default]
    BestAvailable,
    /// Aim for the captain of the alliance drafting next in this round, so
    /// that alliance loses its leader.
    SnipeNextCaptain,
    /// Take the best team ranked below the requester's own captain.
    PreferLowerRanked,
}

/// Ordering applied to the available list in the second round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundTwoOrdering {
    /// Same `(score desc, rank asc)` ordering as the first round.
    #[default]
    Score,
    /// Defensive specialists first, then specialty scorers, then the most
    /// reliable robots; score and rank break ties.
    RoleSpecialist,
}

// ---------------------------------------------------------------------------
// Rules bundle
// ---------------------------------------------------------------------------

/// Competition format and policy choices for one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftRules {
    /// Alliance size including the captain. Two or three.
    pub teams_per_alliance: usize,
    /// Upper bound on the number of alliances.
    pub max_alliances: usize,
    pub captain_stealing: StealPolicy,
    pub recommendation: RecommendationPolicy,
    pub round_two_ordering: RoundTwoOrdering,
}

impl Default for DraftRules {
    fn default() -> Self {
        DraftRules {
            teams_per_alliance: 2,
            max_alliances: 8,
            captain_stealing: StealPolicy::EarlierOnly,
            recommendation: RecommendationPolicy::BestAvailable,
            round_two_ordering: RoundTwoOrdering::Score,
        }
    }
}

impl DraftRules {
    /// Reject alliance sizes the pick slots cannot express.
    pub fn validate(&self) -> Result<(), DraftError> {
        if (2..=PickSlot::ALL.len() + 1).contains(&self.teams_per_alliance) {
            Ok(())
        } else {
            Err(DraftError::InvalidAllianceSize {
                teams_per_alliance: self.teams_per_alliance,
            })
        }
    }

    /// Number of pick slots each alliance has: alliance size minus the
    /// captain. Meaningful only for rules that pass `validate`.
    pub fn picks_per_alliance(&self) -> usize {
        self.teams_per_alliance
            .saturating_sub(1)
            .min(PickSlot::ALL.len())
    }

    /// Slots in play for this format, in round order.
    pub fn slots(&self) -> &'static [PickSlot] {
        &PickSlot::ALL[..self.picks_per_alliance()]
    }

    /// Whether `slot` exists in this format.
    pub fn has_slot(&self, slot: PickSlot) -> bool {
        slot.round() <= self.picks_per_alliance()
    }

    /// `N = min(max_alliances, floor(team_count / teams_per_alliance))`.
    pub fn alliance_count(&self, team_count: usize) -> usize {
        let size = self.teams_per_alliance.max(1);
        self.max_alliances.min(team_count / size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_only_allows_equal_or_smaller_numbers() {
        let policy = StealPolicy::EarlierOnly;
        assert!(policy.permits(1, 2));
        assert!(policy.permits(1, 8));
        assert!(!policy.permits(3, 2));
        assert!(!policy.permits(2, 2));
    }

    #[test]
    fn none_policy_protects_every_captain() {
        assert!(!StealPolicy::None.permits(1, 2));
        assert!(!StealPolicy::None.permits(2, 1));
    }

    #[test]
    fn unrestricted_still_forbids_own_captain() {
        assert!(StealPolicy::Unrestricted.permits(4, 1));
        assert!(!StealPolicy::Unrestricted.permits(4, 4));
    }

    #[test]
    fn alliance_count_follows_team_count_and_cap() {
        let rules = DraftRules::default();
        assert_eq!(rules.alliance_count(8), 4);
        assert_eq!(rules.alliance_count(9), 4);
        assert_eq!(rules.alliance_count(40), 8);
        assert_eq!(rules.alliance_count(1), 0);

        let three = DraftRules {
            teams_per_alliance: 3,
            ..DraftRules::default()
        };
        assert_eq!(three.alliance_count(10), 3);
    }

    #[test]
    fn picks_per_alliance_matches_format() {
        let two = DraftRules::default();
        assert_eq!(two.picks_per_alliance(), 1);
        assert_eq!(two.slots(), &[PickSlot::First]);
        assert!(!two.has_slot(PickSlot::Second));

        let three = DraftRules {
            teams_per_alliance: 3,
            ..DraftRules::default()
        };
        assert_eq!(three.picks_per_alliance(), 2);
        assert_eq!(three.slots(), &[PickSlot::First, PickSlot::Second]);
    }

    #[test]
    fn validate_accepts_only_two_or_three_team_alliances() {
        for size in [2, 3] {
            let rules = DraftRules {
                teams_per_alliance: size,
                ..DraftRules::default()
            };
            assert_eq!(rules.validate(), Ok(()));
        }
        for size in [0, 1, 4, 6] {
            let rules = DraftRules {
                teams_per_alliance: size,
                ..DraftRules::default()
            };
            assert_eq!(
                rules.validate(),
                Err(DraftError::InvalidAllianceSize {
                    teams_per_alliance: size
                })
            );
        }
    }

    #[test]
    fn slot_round_mapping() {
        assert_eq!(PickSlot::from_round(1), Some(PickSlot::First));
        assert_eq!(PickSlot::from_round(2), Some(PickSlot::Second));
        assert_eq!(PickSlot::from_round(3), None);
        assert!(PickSlot::Second.is_reverse());
        assert_eq!(format!("{}", PickSlot::Second), "pick 2");
    }
}
