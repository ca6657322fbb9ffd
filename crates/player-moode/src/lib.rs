//! moOde player controller backend
//!
//! Queries the moOde HTTP command API for the current input, playback state
//! and track tags, and forwards relayed commands to the same interface.

pub mod models;
pub mod moode;

pub use moode::MoodeClient;
