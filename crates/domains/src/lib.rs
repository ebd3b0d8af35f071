//! draftroom/crates/domains/src/lib.rs
//!
//! The central domain types and interface definitions for Draftroom.

pub mod error;
pub mod models;
pub mod payload;
pub mod ports;
pub mod status;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use payload::*;
pub use ports::*;
pub use status::*;
