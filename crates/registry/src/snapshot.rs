//! Immutable registry views.
//!
//! # Role
//!
//! This module provides the pure view types used to query tooltip data.
//! It contains no mutation logic; publication lives in [`crate::runtime`].
//!
//! # Invariants
//!
//! - Fragments are stored exactly as registered and never re-encoded.
//! - A published [`Snapshot`] never changes; a registration publishes a new one.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::key::{GroupKey, TooltipId};

/// All tooltip entries registered under one group key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TooltipGroup {
	key: GroupKey,
	entries: FxHashMap<TooltipId, Arc<str>>,
}

impl TooltipGroup {
	/// Builds a group from `(id, fragment)` pairs. A repeated ID keeps the
	/// later fragment.
	pub fn new<I, S>(key: impl Into<GroupKey>, entries: I) -> Self
	where
		I: IntoIterator<Item = (TooltipId, S)>,
		S: Into<Arc<str>>,
	{
		Self {
			key: key.into(),
			entries: entries
				.into_iter()
				.map(|(id, html)| (id, html.into()))
				.collect(),
		}
	}

	pub fn key(&self) -> &GroupKey {
		&self.key
	}

	#[inline]
	pub fn get(&self, id: TooltipId) -> Option<&Arc<str>> {
		self.entries.get(&id)
	}

	/// Looks up a raw numeric ID; zero is never present.
	#[inline]
	pub fn get_raw(&self, id: u32) -> Option<&Arc<str>> {
		self.get(TooltipId::new(id)?)
	}

	pub fn contains(&self, id: TooltipId) -> bool {
		self.entries.contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns entries in ascending ID order.
	pub fn sorted(&self) -> Vec<(TooltipId, &str)> {
		let mut out: Vec<_> = self
			.entries
			.iter()
			.map(|(id, html)| (*id, &**html))
			.collect();
		out.sort_unstable_by_key(|(id, _)| *id);
		out
	}
}

/// Point-in-time view of every registered group.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
	pub(crate) groups: FxHashMap<GroupKey, Arc<TooltipGroup>>,
	/// Number of registrations published before this snapshot.
	pub(crate) generation: u64,
}

impl Snapshot {
	#[inline]
	pub fn group(&self, key: &str) -> Option<&Arc<TooltipGroup>> {
		self.groups.get(key)
	}

	/// Resolves a `(group, id)` pair against this view.
	#[inline]
	pub fn lookup(&self, key: &str, id: u32) -> Option<&str> {
		self.group(key)?.get_raw(id).map(|html| &**html)
	}

	pub fn contains_group(&self, key: &str) -> bool {
		self.groups.contains_key(key)
	}

	/// Group keys in sorted order.
	pub fn keys(&self) -> Vec<&GroupKey> {
		let mut keys: Vec<_> = self.groups.keys().collect();
		keys.sort_unstable();
		keys
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Number of registered groups.
	pub fn len(&self) -> usize {
		self.groups.len()
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}
}
