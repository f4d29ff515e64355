//! Session orchestration for Clocktower.
//!
//! This crate ties the game's phase lifecycle to the physical stage:
//! - **machine**: the transition table and the generic phase machine
//! - **stage**: lights, sound and panel hooks run on phase entry and exit
//! - **actions**: the numbered action surface offered in each phase
//! - **session**: one live game, owning the machine and the stage
//! - **controller**: maps operator input onto the session
//! - **config**: typed configuration read from the environment
//! - **diagram**: Mermaid rendering of the machine
//!
//! # Example
//!
//! ```
//! use clocktower_core::{GameSession, MachineOptions, PhaseEvent, Stage};
//! use clocktower_models::GamePhase;
//!
//! let mut session = GameSession::new(MachineOptions::full(), Stage::bare());
//! assert_eq!(session.phase(), GamePhase::Configuration);
//!
//! session.fire(PhaseEvent::FinishConfiguration).unwrap();
//! session.fire(PhaseEvent::Start).unwrap();
//! assert_eq!(session.phase(), GamePhase::FirstNight);
//!
//! // Not an edge from FirstNight
//! assert!(session.fire(PhaseEvent::StartNight).is_err());
//! assert_eq!(session.phase(), GamePhase::FirstNight);
//! ```

pub mod actions;
pub mod config;
pub mod controller;
pub mod diagram;
pub mod error;
pub mod machine;
pub mod session;
pub mod stage;

pub use actions::{ActionEntry, ActionKind, StageAction};
pub use config::{ClocktowerConfig, HomeAssistantConfig, SmartThingsConfig, Variant};
pub use controller::{Menu, Outcome, PendingPlayer, SessionController};
pub use error::{Result, SessionError};
pub use machine::{
    MachineOptions, PhaseEvent, PhaseHooks, PhaseMachine, Transition, TransitionTable,
};
pub use session::GameSession;
pub use stage::Stage;
