// relaydash - util/mod.rs
//
// Utility modules: error types, named constants, formatting, logging setup.
// No dependencies on core, app, or platform layers.

pub mod constants;
pub mod error;
pub mod format;
pub mod logging;
