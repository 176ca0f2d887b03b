//! # notes-core
//!
//! Core types, traits, and abstractions for the notes AI assistant.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the inference and API crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, GatewayError, Result};
pub use models::*;
pub use traits::*;
