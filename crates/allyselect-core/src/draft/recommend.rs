// Snake-draft simulation producing one collision-free suggestion per open
// pick slot.

use std::collections::HashSet;

use tracing::debug;

use super::availability::ranked_candidates;
use super::state::DraftState;
use crate::rules::{PickSlot, RecommendationPolicy};
use crate::team::{Team, TeamId};

/// Recompute every alliance's suggestions.
///
/// Round one walks alliances in ascending order, round two (three-team
/// formats) in descending order. Within a round no team is suggested twice,
/// and round two never repeats a round-one suggestion. Alliances whose slot
/// is already filled get no suggestion but keep their place in the order.
pub fn recompute(state: &mut DraftState) {
    let count = state.alliances().len();
    let mut suggestions: Vec<(usize, PickSlot, Option<TeamId>)> = Vec::new();
    let mut claimed_earlier: HashSet<TeamId> = HashSet::new();

    for &slot in state.rules().slots() {
        let order: Vec<usize> = if slot.is_reverse() {
            (0..count).rev().collect()
        } else {
            (0..count).collect()
        };

        let mut claimed: HashSet<TeamId> = HashSet::new();
        for (position, &index) in order.iter().enumerate() {
            let alliance = &state.alliances()[index];
            if alliance.pick(slot).is_some() {
                suggestions.push((index, slot, None));
                continue;
            }

            let candidates: Vec<&Team> = ranked_candidates(state, alliance.number, slot)
                .into_iter()
                .filter(|t| !claimed.contains(&t.id) && !claimed_earlier.contains(&t.id))
                .collect();

            let choice = choose(state, &order, position, &candidates);
            if let Some(team) = choice {
                claimed.insert(team);
            }
            suggestions.push((index, slot, choice));
        }

        claimed_earlier.extend(claimed);
    }

    for alliance in &mut state.alliances {
        for slot in PickSlot::ALL {
            alliance.set_recommendation(slot, None);
        }
    }
    let mut made = 0;
    for (index, slot, team) in suggestions {
        state.alliances[index].set_recommendation(slot, team);
        made += usize::from(team.is_some());
    }
    debug!("recommendations recomputed: {} suggestion(s)", made);
}

/// Apply the configured policy to the filtered candidates of the alliance at
/// `position` in this round's `order` (alliance indices).
fn choose(
    state: &DraftState,
    order: &[usize],
    position: usize,
    candidates: &[&Team],
) -> Option<TeamId> {
    let best = candidates.first().map(|t| t.id);
    let alliances = state.alliances();

    match state.rules().recommendation {
        RecommendationPolicy::BestAvailable => best,
        RecommendationPolicy::SnipeNextCaptain => {
            // The last alliance in the round has nobody left to snipe from.
            let target = order
                .get(position + 1)
                .and_then(|&next| alliances[next].captain);
            target
                .filter(|id| candidates.iter().any(|t| t.id == *id))
                .or(best)
        }
        RecommendationPolicy::PreferLowerRanked => {
            let captain_rank = alliances[order[position]]
                .captain
                .and_then(|c| state.catalog().get(c))
                .map(|t| t.rank);
            captain_rank
                .and_then(|rank| candidates.iter().find(|t| t.rank > rank))
                .map(|t| t.id)
                .or(best)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{DraftRules, StealPolicy};
    use crate::scoring::ScoringWeights;
    use crate::team::{TeamCatalog, TeamMetrics, TeamRecord};

    fn state_with(scores: &[f64], rules: DraftRules) -> DraftState {
        let records = scores
            .iter()
            .enumerate()
            .map(|(i, &teleop)| TeamRecord {
                id: TeamId(i as u32 + 1),
                rank: i as u32 + 1,
                name: None,
                metrics: TeamMetrics {
                    teleop_score: teleop,
                    ..TeamMetrics::default()
                },
            })
            .collect();
        let catalog = TeamCatalog::from_records(records, &ScoringWeights::default()).unwrap();
        DraftState::new(catalog, rules).unwrap()
    }

    fn recs(state: &DraftState, slot: PickSlot) -> Vec<Option<u32>> {
        state
            .alliances()
            .iter()
            .map(|a| a.recommendation(slot).map(|t| t.0))
            .collect()
    }

    const DESCENDING: [f64; 8] = [80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 20.0, 10.0];

    #[test]
    fn forward_round_hands_out_distinct_best_teams() {
        let mut state = state_with(&DESCENDING, DraftRules::default());
        recompute(&mut state);
        // A1 may poach 2; A2 may poach 3; A3 may poach 4; A4 gets 5.
        assert_eq!(
            recs(&state, PickSlot::First),
            vec![Some(2), Some(3), Some(4), Some(5)]
        );
    }

    #[test]
    fn filled_slots_get_no_suggestion_but_still_draft_in_order() {
        let mut state = state_with(&DESCENDING, DraftRules::default());
        state.alliances[0].set_first_pick(Some(TeamId(6)));
        recompute(&mut state);
        assert_eq!(
            recs(&state, PickSlot::First),
            vec![None, Some(3), Some(4), Some(5)]
        );
    }

    #[test]
    fn snake_round_runs_in_reverse_and_avoids_round_one_claims() {
        let rules = DraftRules {
            teams_per_alliance: 3,
            captain_stealing: StealPolicy::None,
            ..DraftRules::default()
        };
        let scores: Vec<f64> = (0..12).map(|i| 120.0 - 10.0 * i as f64).collect();
        let mut state = state_with(&scores, rules);
        recompute(&mut state);
        // Four alliances, captains 1..=4; round one forward takes 5..=8,
        // round two backward takes 9..=12 starting at alliance 4.
        assert_eq!(
            recs(&state, PickSlot::First),
            vec![Some(5), Some(6), Some(7), Some(8)]
        );
        assert_eq!(
            recs(&state, PickSlot::Second),
            vec![Some(12), Some(11), Some(10), Some(9)]
        );
    }

    #[test]
    fn suggestions_never_repeat_across_rounds() {
        let rules = DraftRules {
            teams_per_alliance: 3,
            captain_stealing: StealPolicy::Unrestricted,
            ..DraftRules::default()
        };
        let scores: Vec<f64> = (0..24).map(|i| ((i * 37) % 24) as f64).collect();
        let mut state = state_with(&scores, rules);
        recompute(&mut state);

        let mut seen = HashSet::new();
        for alliance in state.alliances() {
            for slot in PickSlot::ALL {
                let team = alliance.recommendation(slot).expect("every slot is open");
                assert_ne!(Some(team), alliance.captain);
                assert!(seen.insert(team), "team {team} suggested twice");
            }
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn snipe_policy_targets_next_captain_then_best_for_last() {
        let rules = DraftRules {
            recommendation: RecommendationPolicy::SnipeNextCaptain,
            ..DraftRules::default()
        };
        // Team 8 has the best score but sniping prefers the next captain.
        let mut state = state_with(&[80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 20.0, 99.0], rules);
        recompute(&mut state);
        // A1 snipes 2, A2 snipes 3, A3 snipes 4; A4 drafts last and takes
        // the best score, team 8.
        assert_eq!(
            recs(&state, PickSlot::First),
            vec![Some(2), Some(3), Some(4), Some(8)]
        );
    }

    #[test]
    fn snipe_falls_back_when_target_is_protected() {
        let rules = DraftRules {
            teams_per_alliance: 3,
            recommendation: RecommendationPolicy::SnipeNextCaptain,
            ..DraftRules::default()
        };
        let scores: Vec<f64> = (0..6).map(|i| 60.0 - 10.0 * i as f64).collect();
        let mut state = state_with(&scores, rules);
        recompute(&mut state);
        // Two alliances: captains 1 and 2. Round one: A1 snipes 2, A2 is
        // last and takes the best left, 3. Round two runs A2 then A1; A2
        // cannot poach A1's captain and A1 is last in order.
        assert_eq!(recs(&state, PickSlot::First), vec![Some(2), Some(3)]);
        let second = recs(&state, PickSlot::Second);
        assert_eq!(second[1], Some(4));
        assert_eq!(second[0], Some(5));
    }

    #[test]
    fn prefer_lower_ranked_skips_better_ranked_captains() {
        let rules = DraftRules {
            recommendation: RecommendationPolicy::PreferLowerRanked,
            captain_stealing: StealPolicy::Unrestricted,
            ..DraftRules::default()
        };
        let mut state = state_with(&DESCENDING, rules);
        recompute(&mut state);
        // A3 (captain rank 3) could take 1 or 2 but prefers rank 4 and below.
        let first = recs(&state, PickSlot::First);
        assert_eq!(first[0], Some(2));
        assert_eq!(first[1], Some(3));
        assert_eq!(first[2], Some(4));
        assert_eq!(first[3], Some(5));
    }
}
