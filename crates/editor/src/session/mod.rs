//! The loop session state machine and the controller that drives it.
//!
//! ```text
//! Idle --trigger--> AwaitingVariant --variant--> Active(exitable)
//!                         |                        |  ^
//!                      cancel                trigger (one more fragment)
//!                         v                        v  |
//!                       Idle <--exit / caret at anchor--
//! ```

mod controller;
mod state;

#[cfg(test)]
mod invariants;

pub use controller::{ExitReason, LoopSnippetController, SessionPhase, TriggerOutcome};
pub use state::{Disposables, FragmentText, InsertTarget, LoopSession, SessionInit, Transition};
