//! Separator/wrap presets and the picker model built from them.

use loopsnip_config::{LoopSnippetConfig, VariantPreset};
use serde::Deserialize;

/// A separator/wrap pair that drives one loop session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnippetVariant {
	/// Text inserted alone first, then after every separator.
	pub wrap: Option<String>,
	/// Text inserted between wraps.
	pub separator: String,
	/// Whether `wrap` is template markup. `None` defers to
	/// [`LoopSnippetConfig::selected_content_use_snippet`].
	pub wrap_is_template: Option<bool>,
	/// Whether `separator` is template markup.
	pub separator_is_template: bool,
	/// Whether typing past the anchor may end the session.
	pub exitable_by_typing: bool,
}

impl SnippetVariant {
	/// A variant with only a literal separator.
	pub fn separator(separator: impl Into<String>) -> Self {
		Self {
			separator: separator.into(),
			..Self::default()
		}
	}

	/// Returns true when the variant carries no usable wrap text.
	pub fn lacks_wrap(&self) -> bool {
		self.wrap.as_deref().is_none_or(str::is_empty)
	}
}

impl From<&VariantPreset> for SnippetVariant {
	fn from(preset: &VariantPreset) -> Self {
		Self {
			wrap: preset.wrap.clone(),
			separator: preset.separator.clone(),
			wrap_is_template: preset.wrap_is_snippet,
			separator_is_template: preset.separator_is_snippet,
			exitable_by_typing: preset.exitable_by_typing,
		}
	}
}

/// One labelled entry in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPick {
	pub label: String,
	pub variant: SnippetVariant,
}

/// Ordered preset table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantCatalog {
	presets: Vec<VariantPick>,
}

impl VariantCatalog {
	/// The built-in presets.
	pub fn builtin() -> Self {
		let presets = vec![
			VariantPick {
				label: "'' | ".to_string(),
				variant: SnippetVariant {
					wrap: Some("'$1'".to_string()),
					separator: " | ".to_string(),
					wrap_is_template: Some(true),
					separator_is_template: false,
					exitable_by_typing: true,
				},
			},
			VariantPick {
				label: " && ".to_string(),
				variant: SnippetVariant::separator(" && "),
			},
			VariantPick {
				label: " || ".to_string(),
				variant: SnippetVariant::separator(" || "),
			},
			VariantPick {
				label: ", ".to_string(),
				variant: SnippetVariant::separator(", "),
			},
		];
		Self { presets }
	}

	/// Built-in presets followed by the user's configured ones.
	pub fn with_config(config: &LoopSnippetConfig) -> Self {
		let mut catalog = Self::builtin();
		catalog.presets.extend(config.variants.iter().map(|preset| VariantPick {
			label: preset.label.clone(),
			variant: SnippetVariant::from(preset),
		}));
		catalog
	}

	pub fn presets(&self) -> &[VariantPick] {
		&self.presets
	}

	/// Looks a preset up by its label.
	pub fn get(&self, label: &str) -> Option<&SnippetVariant> {
		self.presets.iter().find(|pick| pick.label == label).map(|pick| &pick.variant)
	}

	/// Builds the picker model shown when no explicit variant was supplied.
	pub fn picker(&self) -> VariantPicker {
		VariantPicker {
			presets: self.presets.clone(),
		}
	}
}

impl Default for VariantCatalog {
	fn default() -> Self {
		Self::builtin()
	}
}

/// Picker contents: the presets plus two entries derived from the filter text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPicker {
	presets: Vec<VariantPick>,
}

impl VariantPicker {
	pub const TITLE: &'static str = "Select simple loop snippet SEPARATOR";

	pub fn title(&self) -> &'static str {
		Self::TITLE
	}

	/// Items to display for the current filter text.
	///
	/// A non-empty filter adds two ad-hoc entries using it as the separator,
	/// once as literal text and once as template markup.
	pub fn items(&self, filter: &str) -> Vec<VariantPick> {
		let mut items = self.presets.clone();
		if !filter.is_empty() {
			items.push(VariantPick {
				label: format!("Custom text: {filter}"),
				variant: SnippetVariant::separator(filter),
			});
			items.push(VariantPick {
				label: format!("Custom snippet: {filter}"),
				variant: SnippetVariant {
					separator_is_template: true,
					..SnippetVariant::separator(filter)
				},
			});
		}
		items
	}
}

/// Arguments of the insert command.
///
/// When both `wrap` and `separator` are present the picker is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopSnippetArgs {
	#[serde(default)]
	pub wrap: Option<String>,
	#[serde(default)]
	pub separator: Option<String>,
	#[serde(default, alias = "onlyMidCompletions")]
	pub exitable_by_typing: Option<bool>,
	#[serde(default)]
	pub wrap_is_snippet: Option<bool>,
	#[serde(default)]
	pub separator_is_snippet: Option<bool>,
}

impl LoopSnippetArgs {
	/// The variant these arguments describe, if they bypass the picker.
	pub fn explicit_variant(&self) -> Option<SnippetVariant> {
		let (Some(wrap), Some(separator)) = (&self.wrap, &self.separator) else {
			return None;
		};
		Some(SnippetVariant {
			wrap: Some(wrap.clone()),
			separator: separator.clone(),
			wrap_is_template: self.wrap_is_snippet,
			separator_is_template: self.separator_is_snippet.unwrap_or(false),
			exitable_by_typing: self.exitable_by_typing.unwrap_or(false),
		})
	}
}
