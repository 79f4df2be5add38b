//! Error types for table parsing and loading.

use std::path::PathBuf;

use thiserror::Error;

/// Reason a table failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
	#[error("expected {expected}, found {found}")]
	Expected {
		expected: &'static str,
		found: String,
	},
	#[error("unterminated string literal")]
	UnterminatedString,
	#[error("invalid escape sequence '\\{0}'")]
	InvalidEscape(String),
	#[error("tooltip id {0:?} is not a positive 32-bit integer")]
	InvalidId(String),
	#[error("unexpected trailing input: {0}")]
	TrailingInput(String),
}

/// Table parse failure with the 1-based position where it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {kind}")]
pub struct ParseError {
	pub kind: ParseErrorKind,
	pub line: usize,
	pub column: usize,
}

/// Errors raised while reading tables from disk.
#[derive(Debug, Error)]
pub enum LoadError {
	/// Error reading a table file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},

	/// A table file is not in the expected format.
	#[error("failed to parse {path}: {error}")]
	Parse { path: PathBuf, error: ParseError },

	/// The directory walker failed.
	#[error("walk error: {0}")]
	Walk(#[from] ignore::Error),

	/// The configured file pattern is not a valid glob.
	#[error("invalid pattern {pattern:?}: {error}")]
	Pattern {
		pattern: String,
		error: globset::Error,
	},
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;
