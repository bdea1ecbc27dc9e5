//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unknown/mistyped key.
	#[error("TOML parse error in {path}: {error}")]
	Toml {
		/// Path to the file that failed to parse.
		path: PathBuf,
		/// The underlying parse error.
		error: toml::de::Error,
	},

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A user preset is unusable.
	#[error("invalid variant preset {label:?}: {reason}")]
	InvalidVariant {
		/// Label of the offending preset.
		label: String,
		/// Why it was rejected.
		reason: &'static str,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
