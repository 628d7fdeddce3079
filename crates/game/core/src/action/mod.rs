//! Action domain: what a unit can select and how a choice is committed.
//!
//! # Module Structure
//!
//! - `kind`: Closed set of action kinds and target types
//! - `descriptor`: Range, cost and targeting parameters of one action
//! - `loadout`: Learned actions and the unit's current selection
//! - `transition`: Validation and application hooks shared by all commits
//! - `commit`: Move, attack and self-cast commits
mod commit;
mod descriptor;
mod kind;
mod loadout;
mod transition;

pub use commit::{AttackCommit, CommitError, CommitOutcome, MoveCommit, SelfCastCommit};
pub use descriptor::ActionDescriptor;
pub use kind::{ActionKind, SelfCastKind, TargetType};
pub use loadout::{ActionKey, Loadout};
pub use transition::{CommitFailure, CommitTransition, TransitionPhase};

pub(crate) use commit::acting_unit;
