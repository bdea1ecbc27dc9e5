#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Core types for loop snippet sessions: offsets, positions, selections,
//! document change batches, and templated snippet text.

/// Document change notifications.
pub mod change;
/// Async future aliases.
pub mod future;
/// Identifier types for editors, documents and listener subscriptions.
pub mod ids;
/// Line/character positions.
pub mod position;
/// Text range types measured in characters.
pub mod range;
/// Rope utilities: offset and position conversion.
pub mod rope;
/// Selection types.
pub mod selection;
/// Templated snippet text: builder, parser and renderer.
pub mod snippet;

pub use change::{ContentChange, DocumentChange, SelectionChange};
pub use future::BoxFutureLocal;
pub use ids::{DocumentId, EditorId, SubscriptionId};
pub use position::Position;
pub use range::{CharIdx, CharLen, Range};
pub use ropey::{Rope, RopeSlice};
pub use selection::Selection;
pub use snippet::{SnippetString, TemplateParseError};
