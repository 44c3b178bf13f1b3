// Draft state: the catalog snapshot, the alliance slots and the captain
// repair pass that keeps them consistent.

use std::collections::HashSet;

use tracing::debug;

use super::alliance::Alliance;
use crate::error::DraftError;
use crate::rules::{DraftRules, PickSlot};
use crate::team::{TeamCatalog, TeamId};

/// The complete state of one alliance selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftState {
    catalog: TeamCatalog,
    rules: DraftRules,
    pub(crate) alliances: Vec<Alliance>,
}

impl DraftState {
    /// Build empty alliances for `catalog` under `rules` and derive the
    /// initial captains from competition rank.
    pub fn new(catalog: TeamCatalog, rules: DraftRules) -> Result<Self, DraftError> {
        rules.validate()?;
        let count = rules.alliance_count(catalog.len());
        let alliances = (1..=count).map(Alliance::new).collect();
        let mut state = DraftState {
            catalog,
            rules,
            alliances,
        };
        state.derive_captains();
        Ok(state)
    }

    pub fn catalog(&self) -> &TeamCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &DraftRules {
        &self.rules
    }

    pub fn alliances(&self) -> &[Alliance] {
        &self.alliances
    }

    /// Look up an alliance by its 1-based number.
    pub fn alliance(&self, number: usize) -> Result<&Alliance, DraftError> {
        number
            .checked_sub(1)
            .and_then(|i| self.alliances.get(i))
            .ok_or(DraftError::UnknownAlliance {
                number,
                total: self.alliances.len(),
            })
    }

    pub(crate) fn alliance_mut(&mut self, number: usize) -> Result<&mut Alliance, DraftError> {
        let total = self.alliances.len();
        number
            .checked_sub(1)
            .and_then(|i| self.alliances.get_mut(i))
            .ok_or(DraftError::UnknownAlliance { number, total })
    }

    pub(crate) fn replace_catalog(&mut self, catalog: TeamCatalog) {
        self.catalog = catalog;
    }

    /// Every team sitting in a pick slot, in alliance then slot order.
    pub fn selected_picks(&self) -> Vec<TeamId> {
        self.alliances.iter().flat_map(|a| a.picks()).collect()
    }

    fn selected_pick_set(&self) -> HashSet<TeamId> {
        self.alliances.iter().flat_map(|a| a.picks()).collect()
    }

    /// Whether `team` occupies a pick slot anywhere.
    pub fn is_picked(&self, team: TeamId) -> bool {
        self.alliances.iter().any(|a| a.picks().any(|p| p == team))
    }

    /// Number of the alliance `team` currently captains, if any.
    pub fn captain_of(&self, team: TeamId) -> Option<usize> {
        self.alliances
            .iter()
            .find(|a| a.captain == Some(team))
            .map(|a| a.number)
    }

    /// Repair captains after a mutation.
    ///
    /// Captains that have become somebody's pick lose the captaincy (manual or
    /// not). Every captain-less alliance then takes, in alliance order, the
    /// best-ranked team that is neither picked nor captaining elsewhere.
    /// Returns the number of captain changes; a second call with no
    /// intervening mutation always returns 0.
    pub fn derive_captains(&mut self) -> usize {
        let picked = self.selected_pick_set();
        let mut changes = 0;

        for alliance in &mut self.alliances {
            if let Some(captain) = alliance.captain {
                if picked.contains(&captain) {
                    debug!(
                        "alliance {} loses captain {} (drafted away)",
                        alliance.number, captain
                    );
                    alliance.clear_captain();
                    changes += 1;
                }
            }
        }

        let mut claimed = picked;
        claimed.extend(self.alliances.iter().filter_map(|a| a.captain));

        let mut candidates = self
            .catalog
            .by_rank()
            .iter()
            .map(|t| t.id)
            .filter(|id| !claimed.contains(id));

        for alliance in &mut self.alliances {
            if alliance.captain.is_some() {
                continue;
            }
            let Some(next) = candidates.next() else {
                break;
            };
            debug!("alliance {} captain derived: {}", alliance.number, next);
            alliance.captain = Some(next);
            alliance.captain_is_manual = false;
            changes += 1;
        }

        changes
    }

    /// Empty every pick slot and release every derived captain, keeping
    /// manual pins. Callers re-derive afterwards.
    pub(crate) fn clear_picks_and_derived_captains(&mut self) {
        for alliance in &mut self.alliances {
            alliance.clear_picks();
            if !alliance.captain_is_manual {
                alliance.captain = None;
            }
        }
    }

    /// Describe every broken invariant. Empty when the state is consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for alliance in &self.alliances {
            if let Some(captain) = alliance.captain {
                if alliance.picks().any(|p| p == captain) {
                    violations.push(format!(
                        "alliance {} has its captain {} in a pick slot",
                        alliance.number, captain
                    ));
                }
            }
            for member in alliance.members() {
                if !self.catalog.contains(member) {
                    violations.push(format!(
                        "alliance {} holds team {} which is not in the catalog",
                        alliance.number, member
                    ));
                }
                if !seen.insert(member) {
                    violations.push(format!(
                        "team {} appears more than once (seen again in alliance {})",
                        member, alliance.number
                    ));
                }
            }
            for slot in PickSlot::ALL {
                if !self.rules.has_slot(slot) && alliance.pick(slot).is_some() {
                    violations.push(format!(
                        "alliance {} fills {} which this format does not have",
                        alliance.number, slot
                    ));
                }
            }
        }

        violations
    }
}
