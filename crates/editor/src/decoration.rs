//! Projection of the anchor onto a zero-width marker.

use loopsnip_primitives::{CharIdx, EditorId, Position};

use crate::host::LoopHost;

/// How the host should draw the anchor marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
	/// Glyph drawn just before the anchor.
	pub glyph: char,
	/// Foreground colour as `#rrggbb`.
	pub color: &'static str,
}

/// The exit marker drawn while a session is active.
pub const EXIT_MARKER: MarkerStyle = MarkerStyle {
	glyph: '▌',
	color: "#0ebc79",
};

/// Where the marker belongs, or `None` when nothing should be drawn.
pub fn marker_position<H: LoopHost + ?Sized>(host: &H, editor: EditorId, enabled: bool, anchor: Option<CharIdx>) -> Option<Position> {
	let anchor = anchor.filter(|_| enabled)?;
	Some(host.offset_to_position(editor, anchor))
}

/// Renders the marker for `anchor`, or clears it.
pub fn refresh<H: LoopHost + ?Sized>(host: &mut H, editor: EditorId, enabled: bool, anchor: Option<CharIdx>) {
	let at = marker_position(host, editor, enabled, anchor);
	host.set_decoration(editor, &EXIT_MARKER, at);
}
