#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Configuration for loop snippet sessions.
//!
//! Configuration is written in TOML. All keys are optional:
//!
//! ```toml
//! showExitMarker = true
//! triggerCompletions = false
//! useSelectedContentAsSnippet = false
//! selectedContentUseSnippet = false
//!
//! # Extra presets, listed after the built-in ones in the picker.
//! [[variants]]
//! label = "; "
//! separator = "; "
//!
//! [[variants]]
//! label = "\"\" + "
//! wrap = "\"$1\""
//! separator = " + "
//! wrapIsSnippet = true
//! exitableByTyping = true
//! ```
//!
//! Keys may also be spelled in kebab-case (`show-exit-marker`). Unknown keys
//! are rejected so typos surface instead of silently falling back to defaults.
//!
//! # Configuration Files
//!
//! [`LoopSnippetConfig::load_default`] looks in
//! `$XDG_CONFIG_HOME/loopsnip/config.toml` (or the platform equivalent) and
//! falls back to defaults when the file does not exist.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

pub mod error;

pub use error::{ConfigError, Result};

/// Feature flags and user presets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoopSnippetConfig {
	/// Draw a marker at the anchor and allow presets to be exited by typing.
	#[serde(alias = "show-exit-marker")]
	pub show_exit_marker: bool,
	/// Open the completion list after every insertion.
	#[serde(alias = "trigger-completions")]
	pub trigger_completions: bool,
	/// Seed the wrap text from the current selection when the variant has none.
	#[serde(alias = "use-selected-content-as-snippet")]
	pub use_selected_content_as_snippet: bool,
	/// Treat the seeded wrap text as template markup.
	#[serde(alias = "selected-content-use-snippet")]
	pub selected_content_use_snippet: bool,
	/// User presets appended after the built-in ones.
	pub variants: Vec<VariantPreset>,
}

impl Default for LoopSnippetConfig {
	fn default() -> Self {
		Self {
			show_exit_marker: true,
			trigger_completions: false,
			use_selected_content_as_snippet: false,
			selected_content_use_snippet: false,
			variants: Vec::new(),
		}
	}
}

/// A named separator/wrap preset declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VariantPreset {
	/// Picker label.
	pub label: String,
	/// Text placed after every separator (and alone on the first insertion).
	#[serde(default)]
	pub wrap: Option<String>,
	/// Text placed between wraps.
	pub separator: String,
	/// Whether `wrap` is template markup. Unset defers to
	/// [`LoopSnippetConfig::selected_content_use_snippet`].
	#[serde(default, alias = "wrap-is-snippet")]
	pub wrap_is_snippet: Option<bool>,
	/// Whether `separator` is template markup.
	#[serde(default, alias = "separator-is-snippet")]
	pub separator_is_snippet: bool,
	/// Whether typing past the anchor ends the session.
	#[serde(default, alias = "exitable-by-typing")]
	pub exitable_by_typing: bool,
}

impl LoopSnippetConfig {
	/// Parses configuration from TOML source. `path` is only used in errors.
	pub fn parse(source: &str, path: &Path) -> Result<Self> {
		let config: Self = toml::from_str(source).map_err(|error| ConfigError::Toml {
			path: path.to_path_buf(),
			error,
		})?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from an explicit file.
	pub fn load(path: &Path) -> Result<Self> {
		let source = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::parse(&source, path)?;
		debug!(path = %path.display(), presets = config.variants.len(), "loaded loop snippet config");
		Ok(config)
	}

	/// Loads the user configuration file, or defaults if there is none.
	pub fn load_default() -> Result<Self> {
		match default_path() {
			Some(path) if path.exists() => Self::load(&path),
			_ => {
				debug!("no loop snippet config file, using defaults");
				Ok(Self::default())
			}
		}
	}

	fn validate(&self) -> Result<()> {
		for preset in &self.variants {
			let reason = if preset.label.is_empty() {
				Some("label must not be empty")
			} else if preset.separator.is_empty() && preset.wrap.as_deref().is_none_or(str::is_empty) {
				Some("separator and wrap are both empty")
			} else {
				None
			};
			if let Some(reason) = reason {
				return Err(ConfigError::InvalidVariant {
					label: preset.label.clone(),
					reason,
				});
			}
		}
		Ok(())
	}
}

/// Default location of the configuration file.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("loopsnip").join("config.toml"))
}
