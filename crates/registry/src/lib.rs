//! Process-wide registry of documentation summary tooltips.
//!
//! A documentation generator writes one table per documented file or class.
//! Each table maps positive integer IDs to pre-rendered HTML fragments and is
//! registered under a group key such as `File:extensions/math.lua`. Viewers
//! then resolve `(group, id)` pairs against the registry.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`TooltipRegistry`] | Atomic container for all groups. |
//! | [`Snapshot`] | Immutable view of every group at one generation. |
//! | [`TooltipGroup`] | ID to fragment mapping of one group. |
//! | [`GroupKey`] | Group identifier; decomposes into a [`GroupKind`]. |
//! | [`TooltipId`] | Positive tooltip identifier. |
//!
//! # Example
//!
//! ```
//! use ndtips_registry::{TooltipId, TooltipRegistry};
//!
//! let registry = TooltipRegistry::new();
//! let id = TooltipId::new(28).unwrap();
//! registry.register("File:extensions/math.lua", [(id, "<div>math.Sign</div>")]);
//!
//! assert_eq!(registry.lookup("File:extensions/math.lua", 28).as_deref(), Some("<div>math.Sign</div>"));
//! assert!(registry.lookup("File:extensions/math.lua", 99).is_none());
//! ```

mod key;
mod runtime;
mod snapshot;

use std::sync::Arc;

pub use key::{GroupKey, GroupKind, TOOLTIP_FILE_SUFFIX, TooltipId};
pub use runtime::{InsertAction, TooltipRegistry};
pub use snapshot::{Snapshot, TooltipGroup};

/// Registers tooltips for a group in the process-wide registry.
pub fn register<I, S>(key: impl Into<GroupKey>, entries: I) -> InsertAction
where
	I: IntoIterator<Item = (TooltipId, S)>,
	S: Into<Arc<str>>,
{
	TooltipRegistry::global().register(key, entries)
}

/// Resolves a `(group, id)` pair against the process-wide registry.
pub fn lookup(key: &str, id: u32) -> Option<Arc<str>> {
	TooltipRegistry::global().lookup(key, id)
}

#[cfg(test)]
mod tests;
