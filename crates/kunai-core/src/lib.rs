//! Shared error taxonomy and engine constants for the kunai workspace.

pub mod constants;
pub mod error;
