// Library root for the alliance selection app: configuration, catalog
// loading and the operator session. Exposed so integration tests can drive
// the same code the binary runs.

pub mod catalog;
pub mod config;
pub mod session;
