//! Tooltip registry container with atomic publication.
//!
//! # Purpose
//!
//! Provide lock-free reads and linearizable registration on top of immutable
//! [`Snapshot`]s.
//!
//! # Mental model
//!
//! * Readers load an `Arc<Snapshot>` and resolve lookups against that immutable view.
//! * Writers build a replacement snapshot and publish it with CAS.
//! * Failed CAS means "someone else won first"; the writer retries from the latest snapshot.
//!
//! # Invariants
//!
//! * Registering a group replaces any previous mapping for that key. Entries are never merged.
//! * Concurrent registrations of distinct groups are never lost.
//! * The generation counter increases by exactly one per published registration.
//!
//! # Lifecycle
//!
//! 1. Startup: [`TooltipRegistry::new`] (or the lazily created [`TooltipRegistry::global`])
//!    publishes an empty snapshot.
//! 2. Loading: each table calls [`TooltipRegistry::register`] once.
//! 3. Steady state: viewers call [`TooltipRegistry::lookup`]. Misses are `None`, never errors.

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;

use crate::key::{GroupKey, TooltipId};
use crate::snapshot::{Snapshot, TooltipGroup};

static GLOBAL: LazyLock<TooltipRegistry> = LazyLock::new(TooltipRegistry::new);

/// Result of a group registration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertAction {
	/// Key was new; group inserted.
	InsertedNew,
	/// Key existed; its previous mapping was dropped.
	ReplacedExisting {
		/// Entry count of the mapping that was replaced.
		previous_len: usize,
	},
}

/// Store of tooltip groups keyed by [`GroupKey`].
pub struct TooltipRegistry {
	snap: ArcSwap<Snapshot>,
}

impl Default for TooltipRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for TooltipRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let snap = self.snap.load();
		f.debug_struct("TooltipRegistry")
			.field("groups", &snap.len())
			.field("generation", &snap.generation)
			.finish()
	}
}

impl TooltipRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			snap: ArcSwap::from_pointee(Snapshot::default()),
		}
	}

	/// Returns the process-wide registry.
	pub fn global() -> &'static TooltipRegistry {
		&GLOBAL
	}

	/// Registers tooltips for a group, replacing any previous mapping under
	/// the same key.
	///
	/// Fragments are stored verbatim. Registration cannot fail.
	pub fn register<I, S>(&self, key: impl Into<GroupKey>, entries: I) -> InsertAction
	where
		I: IntoIterator<Item = (TooltipId, S)>,
		S: Into<Arc<str>>,
	{
		self.register_group(TooltipGroup::new(key, entries))
	}

	/// Publishes a prebuilt group.
	pub fn register_group(&self, group: impl Into<Arc<TooltipGroup>>) -> InsertAction {
		let group = group.into();

		loop {
			let old = self.snap.load_full();

			let mut groups = old.groups.clone();
			let previous = groups.insert(group.key().clone(), Arc::clone(&group));
			let new_arc = Arc::new(Snapshot {
				groups,
				generation: old.generation + 1,
			});

			let prev = self.snap.compare_and_swap(&old, Arc::clone(&new_arc));
			if !Arc::ptr_eq(&*prev, &old) {
				// CAS failed, retry with updated snapshot
				continue;
			}

			return match previous {
				Some(previous) => {
					tracing::debug!(
						group = %group.key(),
						entries = group.len(),
						previous = previous.len(),
						generation = new_arc.generation,
						"replaced tooltip group"
					);
					InsertAction::ReplacedExisting {
						previous_len: previous.len(),
					}
				}
				None => {
					tracing::debug!(
						group = %group.key(),
						entries = group.len(),
						generation = new_arc.generation,
						"registered tooltip group"
					);
					InsertAction::InsertedNew
				}
			};
		}
	}

	/// Resolves a `(group, id)` pair to its fragment.
	#[inline]
	pub fn lookup(&self, key: &str, id: u32) -> Option<Arc<str>> {
		self.snap.load().group(key)?.get_raw(id).cloned()
	}

	/// Returns the whole mapping registered under `key`.
	#[inline]
	pub fn group(&self, key: &str) -> Option<Arc<TooltipGroup>> {
		self.snap.load().group(key).cloned()
	}

	pub fn contains_group(&self, key: &str) -> bool {
		self.snap.load().contains_group(key)
	}

	/// Registered group keys in sorted order.
	pub fn groups(&self) -> Vec<GroupKey> {
		self.snap.load().keys().into_iter().cloned().collect()
	}

	/// Returns the current snapshot. It stays valid across later registrations.
	pub fn snapshot(&self) -> Arc<Snapshot> {
		self.snap.load_full()
	}

	pub fn generation(&self) -> u64 {
		self.snap.load().generation
	}

	/// Returns the number of registered groups.
	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	/// Returns true if no group has been registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
