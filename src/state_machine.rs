//! Per-user conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the runtime feeds events in, applies the new mode and executes the
//! returned effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, MenuAction};
pub use state::SessionMode;
pub use transition::{transition, TransitionResult};
