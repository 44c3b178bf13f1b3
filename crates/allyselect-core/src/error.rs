// Error taxonomy for draft mutations and catalog construction.

use thiserror::Error;

use crate::rules::PickSlot;
use crate::team::TeamId;

/// Every failure a controller operation can surface to its caller.
///
/// All of these are local and recoverable: an operation that returns one of
/// them has left the draft state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("team {0} does not exist in the team list")]
    UnknownTeam(TeamId),

    #[error("team {0} is already selected as a pick or protected as a captain")]
    AlreadyPicked(TeamId),

    #[error("team {team} is the captain of alliance {alliance} and cannot be drafted by it")]
    SelfDraft { alliance: usize, team: TeamId },

    #[error("slot {slot} is not available when alliances have {picks_per_alliance} pick(s)")]
    InvalidSlot {
        slot: PickSlot,
        picks_per_alliance: usize,
    },

    #[error("alliance {number} does not exist ({total} alliances configured)")]
    UnknownAlliance { number: usize, total: usize },

    #[error("team {0} appears more than once in the catalog")]
    DuplicateTeam(TeamId),

    #[error("alliances must have 2 or 3 teams, got {teams_per_alliance}")]
    InvalidAllianceSize { teams_per_alliance: usize },
}
