//! Core data models for Clocktower.
//!
//! This crate provides the plain data types shared by the panel driver,
//! the effect adapters and the session core:
//!
//! - [`GamePhase`] - the discrete stages of a game session
//! - [`Edition`] - the selectable script editions and their palette
//! - [`MoodLight`] - the ambient colour tuple sent to the mood lights
//! - [`Team`] - the winning side declared at the end of a game

pub mod edition;
pub mod error;
pub mod phase;

// Re-export main types
pub use edition::{Edition, MoodLight, Team, FULL_BRIGHTNESS};
pub use error::ModelError;
pub use phase::GamePhase;
