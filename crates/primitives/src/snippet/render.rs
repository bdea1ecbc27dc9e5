use std::collections::BTreeMap;
use std::ops::Range;

use super::syntax::{FieldKind, Node, SnippetTemplate};


/// Plain text produced from a template, with tabstop ranges in character
/// offsets relative to the start of the text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedSnippet {
	pub text: String,
	pub tabstops: BTreeMap<u32, Vec<Range<usize>>>,
}

impl RenderedSnippet {
	/// Length of the rendered text in characters.
	pub fn char_len(&self) -> usize {
		self.text.chars().count()
	}

	/// Where the caret lands after insertion: the first range of the lowest
	/// positive tabstop, else the final tabstop `$0`, else the end of the text.
	pub fn initial_caret(&self) -> Range<usize> {
		self.tabstops
			.iter()
			.find(|(idx, _)| **idx > 0)
			.or_else(|| self.tabstops.get_key_value(&0))
			.and_then(|(_, ranges)| ranges.first().cloned())
			.unwrap_or_else(|| {
				let end = self.char_len();
				end..end
			})
	}
}

pub fn render(template: &SnippetTemplate) -> RenderedSnippet {
	let mut rendered = RenderedSnippet::default();
	let mut out_chars = 0usize;
	render_nodes(&template.nodes, &mut rendered, &mut out_chars);
	rendered
}

fn render_nodes(nodes: &[Node], out: &mut RenderedSnippet, out_chars: &mut usize) {
	for node in nodes {
		match node {
			Node::Text(text) => push_text(out, out_chars, text),
			Node::Field(field) => {
				let start = *out_chars;
				match &field.kind {
					FieldKind::Tabstop => {}
					FieldKind::Placeholder(children) => render_nodes(children, out, out_chars),
					FieldKind::Choice(options) => {
						if let Some(first) = options.first() {
							push_text(out, out_chars, first);
						}
					}
				}
				out.tabstops.entry(field.index).or_default().push(start..*out_chars);
			}
		}
	}
}

fn push_text(out: &mut RenderedSnippet, out_chars: &mut usize, text: &str) {
	out.text.push_str(text);
	*out_chars = out_chars.saturating_add(text.chars().count());
}
