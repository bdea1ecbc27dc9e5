use smallvec::{SmallVec, smallvec};

use crate::range::{CharIdx, Range};


/// A set of ranges with a designated primary.
///
/// A selection always contains at least one range. Loop snippet sessions only
/// ever look at the primary range; secondary ranges are carried so host
/// notifications can be represented faithfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
	/// The collection of selection ranges (always non-empty).
	ranges: SmallVec<[Range; 1]>,
	/// Index of the primary range within `ranges`.
	primary_index: usize,
}

impl Selection {
	/// Create a new selection with a primary range followed by `others`.
	pub fn new(primary: Range, others: impl IntoIterator<Item = Range>) -> Self {
		let mut ranges: SmallVec<[Range; 1]> = smallvec![primary];
		ranges.extend(others);
		Self { ranges, primary_index: 0 }
	}

	/// Creates a single-range selection.
	pub fn single(anchor: CharIdx, head: CharIdx) -> Self {
		Self {
			ranges: smallvec![Range::new(anchor, head)],
			primary_index: 0,
		}
	}

	/// Creates a point selection (zero-width cursor).
	pub fn point(pos: CharIdx) -> Self {
		Self::single(pos, pos)
	}

	/// Returns the primary range.
	pub fn primary(&self) -> Range {
		self.ranges[self.primary_index]
	}

	/// Returns all ranges as a slice.
	pub fn ranges(&self) -> &[Range] {
		&self.ranges
	}

	/// Returns the number of ranges in this selection.
	///
	/// This is always at least 1 (Selection cannot be empty).
	#[allow(clippy::len_without_is_empty, reason = "Selection is never empty by design")]
	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	/// Returns the caret of the primary range.
	pub fn cursor(&self) -> CharIdx {
		self.primary().head
	}

	/// Returns a point selection at the end of the primary range.
	pub fn collapse_to_end(&self) -> Self {
		Self::point(self.primary().max())
	}

	/// Clamps every range to `[0, max_char]`.
	pub fn clamp(&self, max_char: CharIdx) -> Self {
		Self {
			ranges: self.ranges.iter().map(|r| r.clamp(max_char)).collect(),
			primary_index: self.primary_index,
		}
	}
}

impl Default for Selection {
	fn default() -> Self {
		Self::point(0)
	}
}
