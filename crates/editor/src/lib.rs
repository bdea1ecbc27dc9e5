#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Repeatable "loop insertion" sessions.
//!
//! The user picks a separator/wrap pair once, then every trigger appends
//! `separator + wrap` at a tracked anchor, building `'a' | 'b' | 'c'` or
//! `x && y && z` one fragment at a time.
//!
//! # Main Types
//!
//! - [`LoopSnippetController`] - owns the single session and sequences triggers and teardown
//! - [`LoopSession`] - anchor tracking and exit detection as pure state transitions
//! - [`VariantCatalog`] - presets and the picker model
//! - [`LoopHost`] - everything the controller needs from the editing surface
//! - [`HeadlessEditor`] - in-memory [`LoopHost`] for tests and scripted replays
//!
//! # Event Flow
//!
//! ```text
//! trigger ──► controller ──insert_snippet──► host
//!                 ▲                            │
//!                 └──── handle_event ◄── change batch, selection change
//! ```

/// Presets, picker model and command arguments.
pub mod catalog;
/// Anchor marker projection.
pub mod decoration;
mod error;
/// In-memory host.
pub mod headless;
/// Host boundary.
pub mod host;
/// Session state machine and controller.
pub mod session;

pub use catalog::{LoopSnippetArgs, SnippetVariant, VariantCatalog, VariantPick, VariantPicker};
pub use error::LoopSnippetError;
pub use headless::{HeadlessEditor, PickerScript};
pub use host::{HostError, HostEvent, IN_LOOP_SNIPPET, ListenerKind, LoopHost, Subscription};
pub use session::{ExitReason, LoopSession, LoopSnippetController, SessionPhase, Transition, TriggerOutcome};
