//! Discovery and registration of tables found on disk.
//!
//! # Data flow
//!
//! 1. Discovery walks the documentation root and keeps file names matching the
//!    configured glob.
//! 2. Each table is read, parsed and published with
//!    [`TooltipRegistry::register_group`].
//! 3. On-demand lookups map a group key to its table path and load it the
//!    first time the group is asked for.
//!
//! # Failure modes
//!
//! * Under [`OnError::Skip`] an unreadable or malformed table is logged and
//!   reported in [`LoadReport::skipped`]; under [`OnError::Fail`] it aborts the load.
//! * A group whose table does not exist is a miss (`Ok(None)`), not an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use ndtips_config::{Config, OnError};
use ndtips_registry::{GroupKey, InsertAction, TooltipGroup, TooltipRegistry};
use tracing::{debug, info, warn};

use crate::error::{LoadError, Result};
use crate::parse::{ParsedTable, parse_table};

/// Reads and parses a single table file without registering it.
pub fn read_table(path: &Path) -> Result<ParsedTable> {
	let src = std::fs::read_to_string(path).map_err(|error| LoadError::Io {
		path: path.to_path_buf(),
		error,
	})?;
	parse_table(&src).map_err(|error| LoadError::Parse {
		path: path.to_path_buf(),
		error,
	})
}

/// A table that was registered during a bulk load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedGroup {
	pub key: GroupKey,
	pub path: PathBuf,
	pub entries: usize,
	pub action: InsertAction,
}

/// Outcome of [`TooltipLoader::load_all`].
#[derive(Debug, Default)]
pub struct LoadReport {
	pub loaded: Vec<LoadedGroup>,
	/// Tables that failed under [`OnError::Skip`].
	pub skipped: Vec<(PathBuf, LoadError)>,
}

impl LoadReport {
	/// Total entries across all loaded groups.
	pub fn entries(&self) -> usize {
		self.loaded.iter().map(|g| g.entries).sum()
	}
}

/// Loads tables from a documentation root into a registry.
pub struct TooltipLoader<'r> {
	registry: &'r TooltipRegistry,
	root: PathBuf,
	matcher: GlobMatcher,
	on_error: OnError,
}

impl<'r> TooltipLoader<'r> {
	pub fn new(registry: &'r TooltipRegistry, config: &Config) -> Result<Self> {
		let matcher = Glob::new(&config.pattern)
			.map_err(|error| LoadError::Pattern {
				pattern: config.pattern.clone(),
				error,
			})?
			.compile_matcher();

		Ok(Self {
			registry,
			root: config.root.clone(),
			matcher,
			on_error: config.on_error,
		})
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn registry(&self) -> &'r TooltipRegistry {
		self.registry
	}

	/// Lists table files under the root in sorted order.
	pub fn discover(&self) -> Result<Vec<PathBuf>> {
		let mut walker = WalkBuilder::new(&self.root);
		walker.standard_filters(false).sort_by_file_name(|a, b| a.cmp(b));

		let mut paths = Vec::new();
		for entry in walker.build() {
			let entry = entry?;
			if entry.file_type().is_some_and(|ty| ty.is_file())
				&& self.matcher.is_match(entry.file_name())
			{
				paths.push(entry.into_path());
			}
		}
		Ok(paths)
	}

	/// Parses `path` and registers its group.
	pub fn load_file(&self, path: &Path) -> Result<(Arc<TooltipGroup>, InsertAction)> {
		let table = read_table(path)?;
		Ok(self.register_table(path, table))
	}

	fn register_table(&self, path: &Path, table: ParsedTable) -> (Arc<TooltipGroup>, InsertAction) {
		let duplicates = table.duplicates();
		if !duplicates.is_empty() {
			warn!(
				path = %path.display(),
				group = %table.group,
				?duplicates,
				"duplicate tooltip ids, keeping the last fragment"
			);
		}

		let group = Arc::new(table.into_group());
		let action = self.registry.register_group(Arc::clone(&group));
		(group, action)
	}

	/// Discovers and registers every table under the root.
	pub fn load_all(&self) -> Result<LoadReport> {
		let mut report = LoadReport::default();

		for path in self.discover()? {
			match self.load_file(&path) {
				Ok((group, action)) => report.loaded.push(LoadedGroup {
					key: group.key().clone(),
					entries: group.len(),
					path,
					action,
				}),
				Err(error) if self.on_error == OnError::Skip => {
					warn!(path = %path.display(), %error, "skipping tooltip table");
					report.skipped.push((path, error));
				}
				Err(error) => return Err(error),
			}
		}

		info!(
			root = %self.root.display(),
			groups = report.loaded.len(),
			entries = report.entries(),
			skipped = report.skipped.len(),
			"loaded tooltip tables"
		);
		Ok(report)
	}

	/// Returns the group for `key`, loading its table first if needed.
	///
	/// Keys without a file mapping, or whose table does not exist, yield `None`.
	pub fn ensure_group(&self, key: &str) -> Result<Option<Arc<TooltipGroup>>> {
		if let Some(group) = self.registry.group(key) {
			return Ok(Some(group));
		}

		let Some(relative) = GroupKey::from(key).tooltip_path() else {
			debug!(group = key, "no table mapping for group");
			return Ok(None);
		};
		let path = self.root.join(relative);
		if !path.is_file() {
			debug!(group = key, path = %path.display(), "table not found");
			return Ok(None);
		}

		let table = read_table(&path)?;
		if table.group.as_str() != key {
			warn!(
				requested = key,
				declared = %table.group,
				path = %path.display(),
				"table declares a different group"
			);
			// Already published by an earlier miss.
			if !self.registry.contains_group(table.group.as_str()) {
				self.register_table(&path, table);
			}
			return Ok(None);
		}

		let (group, _) = self.register_table(&path, table);
		Ok(Some(group))
	}

	/// Resolves a `(group, id)` pair, loading the group on first use.
	pub fn lookup_or_load(&self, key: &str, id: u32) -> Result<Option<Arc<str>>> {
		Ok(self
			.ensure_group(key)?
			.and_then(|group| group.get_raw(id).cloned()))
	}
}
