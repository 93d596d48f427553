// relaydash - app/mod.rs
//
// Application layer: feed orchestration and state management.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod feed;
pub mod state;
