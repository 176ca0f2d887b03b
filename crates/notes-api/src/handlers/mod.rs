//! HTTP handler modules for notes-api.

pub mod ai;
pub mod health;
