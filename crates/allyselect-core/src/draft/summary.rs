// Read-only views published to consumers: the alliance table and the
// selector summary.

use serde::Serialize;

use super::state::DraftState;
use crate::team::TeamId;

/// Whether an alliance's captain was derived or pinned by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptainMode {
    Auto,
    Manual,
}

/// One row of the alliance table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllianceRow {
    pub alliance_number: usize,
    pub captain: Option<TeamId>,
    pub captain_mode: CaptainMode,
    /// One entry per pick slot in this format, in slot order.
    pub picks: Vec<Option<TeamId>>,
    /// Suggestion for each slot; `None` for filled slots.
    pub recommendations: Vec<Option<TeamId>>,
    /// Sum of the composite scores of the captain and every filled pick.
    pub alliance_score: f64,
}

/// Counters describing how far the draft has progressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorSummary {
    pub total_teams: usize,
    pub total_alliances: usize,
    pub captains_assigned: usize,
    pub selected_picks: usize,
    /// Teams neither captaining nor sitting in a pick slot.
    pub available_for_picks: usize,
    /// Some team is unclaimed and some alliance still has an open slot.
    pub can_make_picks: bool,
}

pub fn alliance_table(state: &DraftState) -> Vec<AllianceRow> {
    let slots = state.rules().slots();
    state
        .alliances()
        .iter()
        .map(|a| AllianceRow {
            alliance_number: a.number,
            captain: a.captain,
            captain_mode: if a.captain_is_manual {
                CaptainMode::Manual
            } else {
                CaptainMode::Auto
            },
            picks: slots.iter().map(|&s| a.pick(s)).collect(),
            recommendations: slots.iter().map(|&s| a.recommendation(s)).collect(),
            alliance_score: a.members().map(|id| state.catalog().score_of(id)).sum(),
        })
        .collect()
}

pub fn selector_summary(state: &DraftState) -> SelectorSummary {
    let captains_assigned = state
        .alliances()
        .iter()
        .filter(|a| a.captain.is_some())
        .count();
    let selected_picks = state.selected_picks().len();
    let total_teams = state.catalog().len();
    let available_for_picks = total_teams.saturating_sub(captains_assigned + selected_picks);
    let open_slot = state.alliances().iter().any(|a| {
        state
            .rules()
            .slots()
            .iter()
            .any(|&s| a.pick(s).is_none())
    });

    SelectorSummary {
        total_teams,
        total_alliances: state.alliances().len(),
        captains_assigned,
        selected_picks,
        available_for_picks,
        can_make_picks: available_for_picks > 0 && open_slot,
    }
}
