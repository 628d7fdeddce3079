//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the session can stay focused on orchestration.

pub mod errors;
pub mod providers;
pub mod registry;

pub use errors::{Result, RuntimeError};
pub use providers::{
    ActionProvider, ChannelProvider, OpportunistProvider, Order, PassiveProvider, ScriptedProvider,
};
pub use registry::ProviderRegistry;
