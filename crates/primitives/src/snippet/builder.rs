/// Snippet text handed to the host's insertion primitive.
///
/// Literal text appended with [`SnippetString::append_text`] is escaped so it
/// can never produce tabstops; text appended with
/// [`SnippetString::append_template`] is kept as raw template markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetString {
	value: String,
}

impl SnippetString {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends literal text, escaping template metacharacters.
	pub fn append_text(&mut self, text: &str) -> &mut Self {
		self.value.push_str(&escape_literal(text));
		self
	}

	/// Appends raw template markup.
	pub fn append_template(&mut self, template: &str) -> &mut Self {
		self.value.push_str(template);
		self
	}

	/// Appends `text` either as template markup or as literal text.
	pub fn append(&mut self, text: &str, is_template: bool) -> &mut Self {
		if is_template { self.append_template(text) } else { self.append_text(text) }
	}

	/// The template source, with literal portions escaped.
	pub fn value(&self) -> &str {
		&self.value
	}

	pub fn is_empty(&self) -> bool {
		self.value.is_empty()
	}
}

/// Escapes `$`, `}` and `\` so `text` renders verbatim.
pub fn escape_literal(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for ch in text.chars() {
		if matches!(ch, '$' | '}' | '\\') {
			out.push('\\');
		}
		out.push(ch);
	}
	out
}
