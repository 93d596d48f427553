// relaydash - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library plus pure-data crates (serde, chrono, regex).
// Must NOT depend on: app, platform, or any transport crate.

pub mod bandwidth;
pub mod dedup;
pub mod filter;
pub mod group;
pub mod model;
pub mod parser;
