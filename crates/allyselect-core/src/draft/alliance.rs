// A single alliance: its captain, pick slots and current suggestions.

use serde::Serialize;

use crate::rules::PickSlot;
use crate::team::TeamId;

/// One alliance in the draft. `number` is 1-based and defines draft order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alliance {
    pub number: usize,
    pub captain: Option<TeamId>,
    /// Captain was pinned by an operator rather than derived.
    pub captain_is_manual: bool,
    first_pick: Option<TeamId>,
    second_pick: Option<TeamId>,
    first_recommendation: Option<TeamId>,
    second_recommendation: Option<TeamId>,
}

impl Alliance {
    pub fn new(number: usize) -> Self {
        Alliance {
            number,
            captain: None,
            captain_is_manual: false,
            first_pick: None,
            second_pick: None,
            first_recommendation: None,
            second_recommendation: None,
        }
    }

    pub fn pick(&self, slot: PickSlot) -> Option<TeamId> {
        match slot {
            PickSlot::First => self.first_pick,
            PickSlot::Second => self.second_pick,
        }
    }

    pub fn recommendation(&self, slot: PickSlot) -> Option<TeamId> {
        match slot {
            PickSlot::First => self.first_recommendation,
            PickSlot::Second => self.second_recommendation,
        }
    }

    pub fn set_first_pick(&mut self, team: Option<TeamId>) {
        self.first_pick = team;
    }

    pub fn set_second_pick(&mut self, team: Option<TeamId>) {
        self.second_pick = team;
    }

    /// Dispatch to the setter for `slot`.
    pub fn set_pick(&mut self, slot: PickSlot, team: Option<TeamId>) {
        match slot {
            PickSlot::First => self.set_first_pick(team),
            PickSlot::Second => self.set_second_pick(team),
        }
    }

    pub(crate) fn set_recommendation(&mut self, slot: PickSlot, team: Option<TeamId>) {
        match slot {
            PickSlot::First => self.first_recommendation = team,
            PickSlot::Second => self.second_recommendation = team,
        }
    }

    /// Filled pick slots, in slot order.
    pub fn picks(&self) -> impl Iterator<Item = TeamId> + '_ {
        PickSlot::ALL.into_iter().filter_map(move |s| self.pick(s))
    }

    /// Captain followed by every filled pick.
    pub fn members(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.captain.into_iter().chain(self.picks())
    }

    /// Empty every pick slot and every suggestion.
    pub fn clear_picks(&mut self) {
        self.first_pick = None;
        self.second_pick = None;
        self.first_recommendation = None;
        self.second_recommendation = None;
    }

    /// Drop the captain and its manual pin.
    pub fn clear_captain(&mut self) {
        self.captain = None;
        self.captain_is_manual = false;
    }
}
