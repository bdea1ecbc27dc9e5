//! Template syntax for snippet text.
//!
//! Supported forms: `$n`, `${n}`, `${n:placeholder}` (placeholders nest),
//! `${n|a,b,c|}` and backslash escapes of `$`, `}` and `\`. A `$` that does
//! not start one of these forms is literal text, as is an unmatched `}` at
//! the top level.

use thiserror::Error;


/// Parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnippetTemplate {
	pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	Text(String),
	Field(Field),
}

/// A numbered tabstop, placeholder or choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
	pub index: u32,
	pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
	Tabstop,
	Placeholder(Vec<Node>),
	Choice(Vec<String>),
}

/// Errors produced while parsing template text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateParseError {
	/// A `${` field was opened at `offset` but never closed.
	#[error("unterminated field starting at offset {offset}")]
	UnterminatedField {
		/// Character offset of the `$` that opened the field.
		offset: usize,
	},
	/// A tabstop index does not fit in a `u32`.
	#[error("tabstop index out of range at offset {offset}")]
	IndexOutOfRange {
		/// Character offset of the index digits.
		offset: usize,
	},
}

/// Parses template text into a node tree.
pub fn parse_snippet_template(source: &str) -> Result<SnippetTemplate, TemplateParseError> {
	let mut parser = Parser {
		chars: source.chars().collect(),
		pos: 0,
	};
	let nodes = parser.parse_nodes(false)?;
	Ok(SnippetTemplate { nodes })
}

struct Parser {
	chars: Vec<char>,
	pos: usize,
}

impl Parser {
	fn peek(&self) -> Option<char> {
		self.chars.get(self.pos).copied()
	}

	fn peek_at(&self, ahead: usize) -> Option<char> {
		self.chars.get(self.pos + ahead).copied()
	}

	/// Parses nodes until end of input, or until the closing `}` of a placeholder.
	fn parse_nodes(&mut self, in_placeholder: bool) -> Result<Vec<Node>, TemplateParseError> {
		let mut nodes = Vec::new();
		let mut text = String::new();

		while let Some(ch) = self.peek() {
			match ch {
				'\\' => {
					match self.peek_at(1) {
						Some(next @ ('$' | '}' | '\\')) => {
							text.push(next);
							self.pos += 2;
						}
						_ => {
							text.push('\\');
							self.pos += 1;
						}
					}
				}
				'}' if in_placeholder => break,
				'$' => match self.parse_field()? {
					Some(field) => {
						flush_text(&mut text, &mut nodes);
						nodes.push(Node::Field(field));
					}
					None => {
						text.push('$');
						self.pos += 1;
					}
				},
				_ => {
					text.push(ch);
					self.pos += 1;
				}
			}
		}

		flush_text(&mut text, &mut nodes);
		Ok(nodes)
	}

	/// Parses a field at `$`. Returns `None` without consuming input when the
	/// `$` does not open a field.
	fn parse_field(&mut self) -> Result<Option<Field>, TemplateParseError> {
		let start = self.pos;
		match self.peek_at(1) {
			Some(d) if d.is_ascii_digit() => {
				self.pos += 1;
				let index = self.parse_index()?;
				Ok(Some(Field {
					index,
					kind: FieldKind::Tabstop,
				}))
			}
			Some('{') if self.peek_at(2).is_some_and(|d| d.is_ascii_digit()) => {
				self.pos += 2;
				let index = self.parse_index()?;
				let kind = match self.peek() {
					Some('}') => {
						self.pos += 1;
						FieldKind::Tabstop
					}
					Some(':') => {
						self.pos += 1;
						let children = self.parse_nodes(true)?;
						if self.peek() != Some('}') {
							return Err(TemplateParseError::UnterminatedField { offset: start });
						}
						self.pos += 1;
						FieldKind::Placeholder(children)
					}
					Some('|') => {
						self.pos += 1;
						let options = self.parse_choices().ok_or(TemplateParseError::UnterminatedField { offset: start })?;
						FieldKind::Choice(options)
					}
					_ => return Err(TemplateParseError::UnterminatedField { offset: start }),
				};
				Ok(Some(Field { index, kind }))
			}
			_ => Ok(None),
		}
	}

	fn parse_index(&mut self) -> Result<u32, TemplateParseError> {
		let start = self.pos;
		let mut digits = String::new();
		while let Some(d) = self.peek().filter(char::is_ascii_digit) {
			digits.push(d);
			self.pos += 1;
		}
		digits.parse().map_err(|_| TemplateParseError::IndexOutOfRange { offset: start })
	}

	/// Parses `a,b,c|}` after the opening `|`.
	fn parse_choices(&mut self) -> Option<Vec<String>> {
		let mut options = Vec::new();
		let mut current = String::new();
		loop {
			let ch = self.peek()?;
			match ch {
				'\\' => match self.peek_at(1) {
					Some(next @ (',' | '|' | '\\' | '$' | '}')) => {
						current.push(next);
						self.pos += 2;
					}
					_ => {
						current.push('\\');
						self.pos += 1;
					}
				},
				',' => {
					options.push(std::mem::take(&mut current));
					self.pos += 1;
				}
				'|' if self.peek_at(1) == Some('}') => {
					options.push(current);
					self.pos += 2;
					return Some(options);
				}
				_ => {
					current.push(ch);
					self.pos += 1;
				}
			}
		}
	}
}

fn flush_text(text: &mut String, nodes: &mut Vec<Node>) {
	if !text.is_empty() {
		nodes.push(Node::Text(std::mem::take(text)));
	}
}
