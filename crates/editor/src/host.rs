//! Boundary between loop snippet sessions and the editing surface that hosts them.
//!
//! The host owns documents, selections, rendering and the event loop. The
//! controller only ever talks to it through [`LoopHost`], so the same
//! session logic runs against a GUI editor or the in-memory
//! [`HeadlessEditor`](crate::headless::HeadlessEditor).

use loopsnip_primitives::{
	BoxFutureLocal, CharIdx, CharLen, DocumentChange, DocumentId, EditorId, Position, Range, Selection, SelectionChange,
	SnippetString, SubscriptionId,
};
use thiserror::Error;

use crate::catalog::{SnippetVariant, VariantPicker};
use crate::decoration::MarkerStyle;

/// Context key that is true exactly while a session is active.
pub const IN_LOOP_SNIPPET: &str = "inLoopSnippet";

/// Kinds of notifications a session can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
	DocumentChange,
	SelectionChange,
}

/// A listener registration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
	pub kind: ListenerKind,
	/// Editor the session runs in.
	pub editor: EditorId,
	/// Document the session tracks.
	pub document: DocumentId,
}

/// A notification delivered by the host's event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
	Document(DocumentChange),
	Selection(SelectionChange),
}

impl HostEvent {
	pub fn kind(&self) -> ListenerKind {
		match self {
			Self::Document(_) => ListenerKind::DocumentChange,
			Self::Selection(_) => ListenerKind::SelectionChange,
		}
	}
}

/// Failures reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
	/// The editor no longer exists.
	#[error("no such editor: {0}")]
	NoSuchEditor(EditorId),
	/// The document was closed while the session was running.
	#[error("document closed: {0}")]
	DocumentClosed(DocumentId),
	/// The host refused the edit for another reason.
	#[error("edit rejected: {0}")]
	Rejected(String),
}

/// Operations the editing surface provides to loop snippet sessions.
pub trait LoopHost {
	/// The editor that has focus, if any.
	fn active_editor(&self) -> Option<EditorId>;

	/// The document shown in `editor`.
	fn document_of(&self, editor: EditorId) -> Option<DocumentId>;

	fn selection(&self, editor: EditorId) -> Option<Selection>;

	fn set_selection(&mut self, editor: EditorId, selection: Selection);

	/// Text covered by `range`, empty for a point range.
	fn text_in(&self, editor: EditorId, range: Range) -> String;

	/// Length of the document shown in `editor`, in characters.
	fn document_len(&self, editor: EditorId) -> CharLen;

	fn offset_to_position(&self, editor: EditorId, offset: CharIdx) -> Position;

	fn position_to_offset(&self, editor: EditorId, position: Position) -> CharIdx;

	/// Inserts template text. With `at` the text goes there and the caret
	/// follows it; without, it replaces the current selection.
	///
	/// Resolves to false when the rendered text left the document unchanged,
	/// in which case no change notification follows.
	fn insert_snippet<'a>(
		&'a mut self,
		editor: EditorId,
		snippet: &'a SnippetString,
		at: Option<Position>,
	) -> BoxFutureLocal<'a, Result<bool, HostError>>;

	/// Pops a notification the host raised but has not delivered yet.
	///
	/// Called right after each insertion until it returns `None`. Hosts that
	/// deliver their notifications before `insert_snippet` resolves keep the
	/// default.
	fn take_pending_event(&mut self) -> Option<HostEvent> {
		None
	}

	/// Shows the picker; resolves to `None` when the user cancels.
	fn pick_variant<'a>(&'a mut self, picker: &'a VariantPicker) -> BoxFutureLocal<'a, Option<SnippetVariant>>;

	/// Draws the marker at `at`, or clears it when `at` is `None`.
	fn set_decoration(&mut self, editor: EditorId, style: &MarkerStyle, at: Option<Position>);

	fn set_context(&mut self, key: &'static str, value: bool);

	/// Opens the completion list at the caret.
	fn trigger_completions(&mut self, editor: EditorId);

	fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId;

	fn unsubscribe(&mut self, id: SubscriptionId);
}
