//! Step-driven session runtime for tactical encounters.
//!
//! This crate wires the action provider abstraction, the turn pump and the
//! playback timeline around a [`tactics_core::Encounter`]. Consumers embed
//! [`Session`] to drive turns and subscribe to events.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the turn pump
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`playback`] stretches committed actions over session steps
pub mod api;
pub mod config;
pub mod events;
pub mod playback;
pub mod session;

pub use api::{
    ActionProvider, ChannelProvider, OpportunistProvider, Order, PassiveProvider,
    ProviderRegistry, Result, RuntimeError, ScriptedProvider,
};
pub use config::{AiPolicy, SessionConfig};
pub use events::{CombatEvent, Event, EventBus, Topic, TurnEvent, VisionEvent};
pub use playback::{ActionPhase, Playback};
pub use session::{Session, SessionStatus};
