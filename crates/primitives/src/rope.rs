//! Rope utilities and extensions.

use ropey::RopeSlice;

use crate::position::Position;
use crate::range::CharIdx;

/// Converts an absolute character offset to a line/character position.
///
/// Offsets past the end clamp to the end of the document.
pub fn offset_to_position(text: RopeSlice, offset: CharIdx) -> Position {
	let offset = offset.min(text.len_chars());
	let line = text.char_to_line(offset);
	Position::new(line, offset - text.line_to_char(line))
}

/// Converts a line/character position to an absolute character offset.
///
/// Lines past the end clamp to the end of the document; characters past the
/// end of a line clamp to the end of that line, before its line break.
pub fn position_to_offset(text: RopeSlice, pos: Position) -> CharIdx {
	if pos.line >= text.len_lines() {
		return text.len_chars();
	}
	let start = text.line_to_char(pos.line);
	let line = text.line(pos.line);
	let mut content_len = line.len_chars();
	for tail in ["\r\n", "\n", "\r"] {
		let tail_len = tail.chars().count();
		if content_len >= tail_len && line.slice(content_len - tail_len..content_len) == tail {
			content_len -= tail_len;
			break;
		}
	}
	start + pos.character.min(content_len)
}
