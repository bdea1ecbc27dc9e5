use serde::{Deserialize, Serialize};

use crate::ids::{DocumentId, EditorId};
use crate::range::{CharIdx, CharLen};
use crate::selection::Selection;

/// One replaced span within a document change batch.
///
/// Offsets are pre-change positions: `removed` characters starting at `start`
/// were replaced by `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChange {
	/// Starting offset of the replaced span.
	pub start: CharIdx,
	/// Number of characters removed.
	pub removed: CharLen,
	/// Replacement text.
	pub text: String,
}

impl ContentChange {
	/// A pure insertion at `start`.
	pub fn insert(start: CharIdx, text: impl Into<String>) -> Self {
		Self {
			start,
			removed: 0,
			text: text.into(),
		}
	}

	/// A pure deletion of `removed` characters at `start`.
	pub fn delete(start: CharIdx, removed: CharLen) -> Self {
		Self {
			start,
			removed,
			text: String::new(),
		}
	}

	/// Replaces `removed` characters at `start` with `text`.
	pub fn replace(start: CharIdx, removed: CharLen, text: impl Into<String>) -> Self {
		Self {
			start,
			removed,
			text: text.into(),
		}
	}

	/// Length of the replacement text in characters.
	pub fn inserted_len(&self) -> CharLen {
		self.text.chars().count()
	}

	/// Signed change in document length caused by this change.
	pub fn delta(&self) -> isize {
		self.inserted_len() as isize - self.removed as isize
	}
}

/// A batch of content changes delivered together for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
	/// The document that changed.
	pub document: DocumentId,
	/// Changes in the order the host reported them.
	pub changes: Vec<ContentChange>,
}

/// A selection-change notification for one editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
	/// The editor whose selection moved.
	pub editor: EditorId,
	/// The new selection; its primary range is the one that matters.
	pub selection: Selection,
}
