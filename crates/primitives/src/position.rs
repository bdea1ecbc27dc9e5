use serde::{Deserialize, Serialize};

/// Position in line/character coordinates.
///
/// `character` counts characters from the start of the line, the same unit
/// used for absolute offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
	/// Zero-based line index.
	pub line: usize,
	/// Zero-based character offset in the line.
	pub character: usize,
}

impl Position {
	/// Creates a new position.
	pub const fn new(line: usize, character: usize) -> Self {
		Self { line, character }
	}
}
