// relaydash - platform/mod.rs
//
// Platform abstraction layer: OS config directories and the websocket
// transport adapter.
// Dependencies: standard library, directories, tungstenite.

pub mod config;
pub mod socket;
