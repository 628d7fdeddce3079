//! Topic-based event bus for session events.
//!
//! Events are published to topics and consumers subscribe only to the topics
//! they need. Commit events distinguish the instant state changed
//! ([`CombatEvent::CommitApplied`]) from the moment its playback finished
//! ([`CombatEvent::PlaybackFinished`]).

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CombatEvent, TurnEvent, VisionEvent};
