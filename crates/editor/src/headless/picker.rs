use serde::Deserialize;

/// Scripted answer for the next picker the headless host opens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", tag = "action")]
pub enum PickerScript {
	/// Type `filter` into the picker, then accept the item labelled `label`.
	Choose {
		#[serde(default)]
		filter: String,
		label: String,
	},
	/// Dismiss the picker.
	Cancel,
}

impl PickerScript {
	/// Accept a preset without typing a filter.
	pub fn preset(label: impl Into<String>) -> Self {
		Self::Choose {
			filter: String::new(),
			label: label.into(),
		}
	}

	/// Type `text` and accept it as a literal separator.
	pub fn custom_text(text: impl Into<String>) -> Self {
		let filter = text.into();
		Self::Choose {
			label: format!("Custom text: {filter}"),
			filter,
		}
	}

	/// Type `text` and accept it as a template separator.
	pub fn custom_snippet(text: impl Into<String>) -> Self {
		let filter = text.into();
		Self::Choose {
			label: format!("Custom snippet: {filter}"),
			filter,
		}
	}
}
