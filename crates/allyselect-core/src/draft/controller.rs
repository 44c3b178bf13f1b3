// The only mutation surface of a draft. Every operation validates fully,
// then applies, then repairs captains and recomputes suggestions.

use tracing::{info, warn};

use super::availability;
use super::recommend;
use super::state::DraftState;
use super::summary::{self, AllianceRow, SelectorSummary};
use crate::error::DraftError;
use crate::rules::{DraftRules, PickSlot};
use crate::scoring::ScoringWeights;
use crate::team::{Team, TeamCatalog, TeamId, TeamRecord};

/// Owns one draft and serializes every change to it.
///
/// A failed operation leaves the state exactly as it was. A successful one
/// returns with the uniqueness and no-self-draft invariants holding, captains
/// repaired, and suggestions recomputed.
#[derive(Debug, Clone)]
pub struct DraftController {
    state: DraftState,
}

impl DraftController {
    /// Score `records` under `weights` and start a fresh draft.
    pub fn new(
        records: Vec<TeamRecord>,
        weights: &ScoringWeights,
        rules: DraftRules,
    ) -> Result<Self, DraftError> {
        let catalog = TeamCatalog::from_records(records, weights)?;
        Self::from_catalog(catalog, rules)
    }

    /// Start a draft over an already scored catalog. Fails if `rules` name an
    /// alliance size the pick slots cannot hold.
    pub fn from_catalog(catalog: TeamCatalog, rules: DraftRules) -> Result<Self, DraftError> {
        let mut state = DraftState::new(catalog, rules)
            .inspect_err(|e| warn!("rejected draft rules: {}", e))?;
        recommend::recompute(&mut state);
        info!(
            "draft created: {} teams, {} alliances of {}",
            state.catalog().len(),
            state.alliances().len(),
            state.rules().teams_per_alliance
        );
        Ok(DraftController { state })
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn rules(&self) -> &DraftRules {
        self.state.rules()
    }

    pub fn catalog(&self) -> &TeamCatalog {
        self.state.catalog()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Put `team` into `slot` of alliance `alliance`, or clear the slot with
    /// `None`.
    pub fn set_pick(
        &mut self,
        alliance: usize,
        slot: PickSlot,
        team: Option<TeamId>,
    ) -> Result<(), DraftError> {
        self.validate_pick(alliance, slot, team).inspect_err(|e| {
            warn!("rejected pick for alliance {} {}: {}", alliance, slot, e);
        })?;

        let target = self.state.alliance_mut(alliance)?;
        if target.pick(slot) == team {
            return Ok(());
        }
        target.set_pick(slot, team);
        match team {
            Some(t) => info!("alliance {} {} <- team {}", alliance, slot, t),
            None => info!("alliance {} {} cleared", alliance, slot),
        }
        self.refresh();
        Ok(())
    }

    fn validate_pick(
        &self,
        alliance: usize,
        slot: PickSlot,
        team: Option<TeamId>,
    ) -> Result<(), DraftError> {
        let current = self.state.alliance(alliance)?;
        let rules = self.state.rules();
        if !rules.has_slot(slot) {
            return Err(DraftError::InvalidSlot {
                slot,
                picks_per_alliance: rules.picks_per_alliance(),
            });
        }

        let Some(team) = team else {
            return Ok(());
        };
        if !self.state.catalog().contains(team) {
            return Err(DraftError::UnknownTeam(team));
        }
        if current.captain == Some(team) {
            return Err(DraftError::SelfDraft { alliance, team });
        }
        if current.pick(slot) == Some(team) {
            return Ok(());
        }
        if self.state.is_picked(team) {
            return Err(DraftError::AlreadyPicked(team));
        }
        if let Some(owner) = self.state.captain_of(team) {
            if !rules.captain_stealing.permits(alliance, owner) {
                return Err(DraftError::AlreadyPicked(team));
            }
        }
        Ok(())
    }

    /// Pin `team` as captain of `alliance`, taking it from any other
    /// alliance that holds it. `None` removes the pin and lets the captain be
    /// derived again.
    pub fn set_captain(&mut self, alliance: usize, team: Option<TeamId>) -> Result<(), DraftError> {
        self.validate_captain(alliance, team).inspect_err(|e| {
            warn!("rejected captain for alliance {}: {}", alliance, e);
        })?;

        match team {
            None => {
                self.state.alliance_mut(alliance)?.clear_captain();
                info!("alliance {} captain released", alliance);
            }
            Some(team) => {
                for other in &mut self.state.alliances {
                    if other.number != alliance && other.captain == Some(team) {
                        info!(
                            "team {} moves from captain of alliance {} to alliance {}",
                            team, other.number, alliance
                        );
                        other.clear_captain();
                    }
                }
                let target = self.state.alliance_mut(alliance)?;
                target.captain = Some(team);
                target.captain_is_manual = true;
                info!("alliance {} captain pinned to team {}", alliance, team);
            }
        }
        self.refresh();
        Ok(())
    }

    fn validate_captain(&self, alliance: usize, team: Option<TeamId>) -> Result<(), DraftError> {
        self.state.alliance(alliance)?;
        let Some(team) = team else {
            return Ok(());
        };
        if self.state.is_picked(team) {
            return Err(DraftError::AlreadyPicked(team));
        }
        if !self.state.catalog().contains(team) {
            return Err(DraftError::UnknownTeam(team));
        }
        Ok(())
    }

    /// Empty every pick slot. Derived captains are re-derived from rank;
    /// manual pins stay.
    pub fn reset_picks(&mut self) {
        self.state.clear_picks_and_derived_captains();
        info!("all picks reset");
        self.refresh();
    }

    /// Replace the catalog wholesale. Alliances are rebuilt empty, so manual
    /// pins are dropped too.
    pub fn update_teams(&mut self, records: Vec<TeamRecord>) -> Result<(), DraftError> {
        let weights = *self.state.catalog().weights();
        let catalog = TeamCatalog::from_records(records, &weights)
            .inspect_err(|e| warn!("rejected catalog replacement: {}", e))?;
        let rules = self.state.rules().clone();
        *self = Self::from_catalog(catalog, rules)?;
        Ok(())
    }

    /// Rescore the catalog under new weights. Slots and captains are kept;
    /// only suggestions can change.
    pub fn update_weights(&mut self, weights: &ScoringWeights) {
        let rescored = self.state.catalog().rescored(weights);
        self.state.replace_catalog(rescored);
        info!("catalog rescored under new weights");
        recommend::recompute(&mut self.state);
    }

    fn refresh(&mut self) {
        let changes = self.state.derive_captains();
        if changes > 0 {
            info!("captain repair made {} change(s)", changes);
        }
        recommend::recompute(&mut self.state);
        debug_assert!(
            self.state.invariant_violations().is_empty(),
            "{:?}",
            self.state.invariant_violations()
        );
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn available_teams(&self, alliance: usize, slot: PickSlot) -> Result<Vec<&Team>, DraftError> {
        availability::available_teams(&self.state, alliance, slot)
    }

    /// Teams alliance `alliance` could pin as captain: everything not in a
    /// pick slot, plus its current captain, in rank order.
    pub fn captain_candidates(&self, alliance: usize) -> Result<Vec<&Team>, DraftError> {
        let own = self.state.alliance(alliance)?.captain;
        Ok(self
            .state
            .catalog()
            .by_rank()
            .iter()
            .filter(|t| Some(t.id) == own || !self.state.is_picked(t.id))
            .collect())
    }

    pub fn alliance_table(&self) -> Vec<AllianceRow> {
        summary::alliance_table(&self.state)
    }

    pub fn selector_summary(&self) -> SelectorSummary {
        summary::selector_summary(&self.state)
    }
}
