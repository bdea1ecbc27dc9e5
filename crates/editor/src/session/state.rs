use loopsnip_primitives::{CharIdx, ContentChange, DocumentChange, DocumentId, EditorId, SelectionChange, SnippetString, SubscriptionId};
use smallvec::SmallVec;
use tracing::trace;

use crate::host::ListenerKind;

/// Listener registrations owned by one session, released together.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Disposables {
	handles: SmallVec<[(ListenerKind, SubscriptionId); 2]>,
}

impl Disposables {
	pub fn push(&mut self, kind: ListenerKind, id: SubscriptionId) {
		self.handles.push((kind, id));
	}

	/// Returns true if a listener of `kind` is registered.
	pub fn holds(&self, kind: ListenerKind) -> bool {
		self.handles.iter().any(|(k, _)| *k == kind)
	}

	/// Removes and returns every handle.
	pub fn take(&mut self) -> SmallVec<[(ListenerKind, SubscriptionId); 2]> {
		std::mem::take(&mut self.handles)
	}

	pub fn is_empty(&self) -> bool {
		self.handles.is_empty()
	}
}

/// Result of feeding one notification to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
	/// The notification did not concern the anchor.
	Unchanged,
	/// At least one change qualified; the anchor is now `to`.
	AnchorMoved { from: CharIdx, to: CharIdx },
	/// The caret came back to the anchor; the session must end.
	Exit,
}

/// Where the next fragment goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertTarget {
	/// Replace the current selection (first insertion).
	Cursor,
	/// Insert at the anchor, relocating the caret there.
	Anchor(CharIdx),
}

/// The resolved text a session inserts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FragmentText {
	pub wrap: String,
	pub wrap_is_template: bool,
	pub separator: String,
	pub separator_is_template: bool,
}

/// State of one active loop session.
///
/// All notification handling is a pure function of this state and the
/// event; side effects are left to the controller.
#[derive(Debug, Clone)]
pub struct LoopSession {
	pub(crate) editor: EditorId,
	pub(crate) document: DocumentId,
	anchor: CharIdx,
	first_insertion: bool,
	suppress_next_change: bool,
	exitable: bool,
	pub(crate) show_marker: bool,
	pub(crate) trigger_completions: bool,
	fragment: FragmentText,
	pub(crate) disposables: Disposables,
}

/// Values a session is started from.
#[derive(Debug, Clone)]
pub struct SessionInit {
	pub editor: EditorId,
	pub document: DocumentId,
	pub anchor: CharIdx,
	/// False when the wrap was seeded from the selection.
	pub first_insertion: bool,
	pub exitable: bool,
	pub show_marker: bool,
	pub trigger_completions: bool,
	pub fragment: FragmentText,
}

impl LoopSession {
	pub fn new(init: SessionInit) -> Self {
		Self {
			editor: init.editor,
			document: init.document,
			anchor: init.anchor,
			first_insertion: init.first_insertion,
			suppress_next_change: false,
			exitable: init.exitable,
			show_marker: init.show_marker,
			trigger_completions: init.trigger_completions,
			fragment: init.fragment,
			disposables: Disposables::default(),
		}
	}

	pub fn anchor(&self) -> CharIdx {
		self.anchor
	}

	pub fn editor(&self) -> EditorId {
		self.editor
	}

	pub fn document(&self) -> DocumentId {
		self.document
	}

	pub fn is_exitable(&self) -> bool {
		self.exitable
	}

	pub fn is_first_insertion(&self) -> bool {
		self.first_insertion
	}

	/// True between the session's own insertion and its change notification.
	pub fn is_suppressing(&self) -> bool {
		self.suppress_next_change
	}

	/// Builds the next fragment: the wrap alone on the first insertion, the
	/// separator followed by the wrap afterwards. `None` if it would be empty.
	pub fn next_fragment(&self) -> Option<SnippetString> {
		let fragment = &self.fragment;
		let mut snippet = SnippetString::new();
		if !self.first_insertion && !fragment.separator.is_empty() {
			snippet.append(&fragment.separator, fragment.separator_is_template);
		}
		if !fragment.wrap.is_empty() {
			snippet.append(&fragment.wrap, fragment.wrap_is_template);
		}
		(!snippet.is_empty()).then_some(snippet)
	}

	pub fn insert_target(&self) -> InsertTarget {
		if self.first_insertion {
			InsertTarget::Cursor
		} else {
			InsertTarget::Anchor(self.anchor)
		}
	}

	/// Marks the next change batch as caused by our own insertion.
	pub fn begin_insert(&mut self) {
		self.suppress_next_change = true;
	}

	/// Drops the suppress flag for an insertion that changed nothing and so
	/// will not be followed by a change batch.
	pub fn abandon_insert(&mut self) {
		self.suppress_next_change = false;
	}

	/// Ends an insertion round, successful or skipped.
	pub fn finish_insert(&mut self) {
		self.first_insertion = false;
	}

	/// Applies a change batch to the anchor.
	///
	/// For the batch caused by our own insertion only the first change counts
	/// and it always moves the anchor. Otherwise every change before the
	/// anchor moves it, and a change exactly at the anchor moves it only when
	/// the session cannot be exited by typing.
	pub fn on_document_change(&mut self, event: &DocumentChange) -> Transition {
		if event.document != self.document || event.changes.is_empty() {
			return Transition::Unchanged;
		}

		let from = self.anchor;
		let own_insertion = self.suppress_next_change;
		let changes: &[ContentChange] = if own_insertion { &event.changes[..1] } else { &event.changes };

		let mut moved = false;
		for change in changes {
			let at_anchor = change.start == self.anchor;
			if change.start < self.anchor || (!self.exitable && at_anchor) || own_insertion {
				self.anchor = self.anchor.saturating_add_signed(change.delta());
				moved = true;
			}
		}
		self.suppress_next_change = false;

		if moved {
			trace!(from, to = self.anchor, own_insertion, "anchor moved");
			Transition::AnchorMoved { from, to: self.anchor }
		} else {
			Transition::Unchanged
		}
	}

	/// Decides whether a caret movement ends the session.
	pub fn on_selection_change(&self, event: &SelectionChange) -> Transition {
		if event.editor != self.editor || !self.exitable || self.suppress_next_change {
			return Transition::Unchanged;
		}
		let primary = event.selection.primary();
		if primary.is_point() && primary.head == self.anchor {
			Transition::Exit
		} else {
			Transition::Unchanged
		}
	}

	/// Pulls the anchor back inside a document of `len` characters.
	pub fn clamp_anchor(&mut self, len: usize) {
		self.anchor = self.anchor.min(len);
	}
}
