// Alliance draft: state, availability, recommendations and the controller
// that is the only way to mutate any of it.

pub mod alliance;
pub mod availability;
pub mod controller;
pub mod recommend;
pub mod state;
pub mod summary;
