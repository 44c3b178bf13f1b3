// Which teams an alliance may legally draft right now, best first.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::state::DraftState;
use crate::error::DraftError;
use crate::rules::{PickSlot, RoundTwoOrdering};
use crate::team::{Team, TeamId};

/// Teams alliance `requesting` may draft into `slot`.
///
/// Excludes every selected pick, the requester's own captain, and any other
/// captain the stealing policy protects from the requester. The result is
/// ordered by `(score desc, rank asc)`, or by the role ordering when the
/// rules ask for it in round two. Sorting is stable over the rank-ordered
/// catalog, so equal keys always come out in the same order.
pub fn available_teams(
    state: &DraftState,
    requesting: usize,
    slot: PickSlot,
) -> Result<Vec<&Team>, DraftError> {
    state.alliance(requesting)?;
    let rules = state.rules();
    if !rules.has_slot(slot) {
        return Err(DraftError::InvalidSlot {
            slot,
            picks_per_alliance: rules.picks_per_alliance(),
        });
    }
    Ok(ranked_candidates(state, requesting, slot))
}

/// Ranking behind `available_teams` for an alliance and slot already known
/// to exist.
pub(crate) fn ranked_candidates(
    state: &DraftState,
    requesting: usize,
    slot: PickSlot,
) -> Vec<&Team> {
    let rules = state.rules();
    let picked: HashSet<TeamId> = state.selected_picks().into_iter().collect();
    let captains: HashMap<TeamId, usize> = state
        .alliances()
        .iter()
        .filter_map(|a| a.captain.map(|c| (c, a.number)))
        .collect();

    let mut teams: Vec<&Team> = state
        .catalog()
        .by_rank()
        .iter()
        .filter(|t| !picked.contains(&t.id))
        .filter(|t| match captains.get(&t.id) {
            Some(&owner) => rules.captain_stealing.permits(requesting, owner),
            None => true,
        })
        .collect();

    let ordering = if slot == PickSlot::Second {
        rules.round_two_ordering
    } else {
        RoundTwoOrdering::Score
    };
    match ordering {
        RoundTwoOrdering::Score => teams.sort_by(|a, b| by_score(a, b)),
        RoundTwoOrdering::RoleSpecialist => teams.sort_by(|a, b| by_role(a, b)),
    }
    teams
}

fn by_score(a: &Team, b: &Team) -> Ordering {
    b.score.total_cmp(&a.score).then(a.rank.cmp(&b.rank))
}

fn by_role(a: &Team, b: &Team) -> Ordering {
    let (ma, mb) = (&a.metrics, &b.metrics);
    mb.defense_rate
        .total_cmp(&ma.defense_rate)
        .then(mb.specialty_score.total_cmp(&ma.specialty_score))
        .then(ma.failure_rate.total_cmp(&mb.failure_rate))
        .then_with(|| by_score(a, b))
}
