//! Configuration system for ndtips.
//!
//! Configuration is written in TOML:
//!
//! ```toml
//! # Documentation output root containing files/ and classes/.
//! root = "docs/html"
//! # Glob applied to file names during discovery.
//! pattern = "*-SummaryToolTips.js"
//! # "skip" logs and continues past unparseable tables, "fail" aborts the load.
//! on_error = "skip"
//! # Load groups on first lookup instead of eagerly at startup.
//! lazy = false
//! ```
//!
//! # Configuration Files
//!
//! ndtips looks for configuration in these locations (in order):
//!
//! 1. A path given explicitly (the `--config` flag)
//! 2. `$XDG_CONFIG_HOME/ndtips/config.toml` (or the platform equivalent)
//! 3. Built-in defaults
//!
//! A relative `root` is resolved against the directory of the file it was
//! read from.

pub mod error;

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use error::{ConfigError, Result};

/// Default discovery glob, matching the generator's file naming.
pub const DEFAULT_PATTERN: &str = "*-SummaryToolTips.js";

/// Name of the per-user configuration directory.
const APP_DIR: &str = "ndtips";

/// What the loader does with a table it cannot read or parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
	/// Log a warning and continue with the remaining tables.
	#[default]
	Skip,
	/// Abort the load on the first failure.
	Fail,
}

/// Parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Documentation output root.
	pub root: PathBuf,
	/// File name glob used during discovery.
	pub pattern: String,
	/// Failure policy for bulk loading.
	pub on_error: OnError,
	/// Defer loading until a group is first looked up.
	pub lazy: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			root: PathBuf::from("."),
			pattern: DEFAULT_PATTERN.to_string(),
			on_error: OnError::Skip,
			lazy: false,
		}
	}
}

impl Config {
	/// Parse a TOML string into a [`Config`].
	pub fn parse(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let mut config = Self::parse(&content)?;
		if config.root.is_relative()
			&& let Some(dir) = path.parent()
		{
			config.root = dir.join(&config.root);
		}
		Ok(config)
	}

	/// Resolve configuration from an explicit path, the user config file, or
	/// defaults, in that order.
	///
	/// An explicit path must exist; a missing user config file is not an error.
	pub fn discover(explicit: Option<&Path>) -> Result<Self> {
		if let Some(path) = explicit {
			return Self::load(path);
		}
		match default_path() {
			Some(path) if path.is_file() => Self::load(path),
			_ => Ok(Self::default()),
		}
	}

	fn validate(&self) -> Result<()> {
		if self.pattern.trim().is_empty() {
			return Err(ConfigError::Invalid {
				field: "pattern",
				reason: "must not be empty".to_string(),
			});
		}
		Ok(())
	}
}

/// Per-user configuration file location, if the platform has one.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}
