// Alliance draft engine: team catalog, composite scoring, captain derivation,
// pick validation and the snake-draft recommendation simulator.
//
// Pure computation. No I/O happens anywhere in this crate; callers supply the
// catalog records and weights and consume the alliance table.

pub mod draft;
pub mod error;
pub mod rules;
pub mod scoring;
pub mod team;

pub use draft::controller::DraftController;
pub use draft::summary::{AllianceRow, CaptainMode, SelectorSummary};
pub use error::DraftError;
pub use rules::{DraftRules, PickSlot, RecommendationPolicy, RoundTwoOrdering, StealPolicy};
pub use scoring::ScoringWeights;
pub use team::{Team, TeamCatalog, TeamId, TeamMetrics, TeamRecord};
