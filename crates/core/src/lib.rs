//! Core monitoring logic: raw status model, source classification, state
//! normalization, change detection, and the polling loop.

pub mod classify;
pub mod error;
pub mod models;
pub mod monitor;
pub mod traits;

pub use classify::*;
pub use error::*;
pub use models::*;
pub use monitor::*;
pub use traits::*;
