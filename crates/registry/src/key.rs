//! Group keys and tooltip identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// File name suffix shared by every generated tooltip table.
pub const TOOLTIP_FILE_SUFFIX: &str = "-SummaryToolTips.js";

/// Identifier of a tooltip group, e.g. `File:extensions/bit.lua` or
/// `LuaClass:Extensions.Color`.
///
/// Equality, ordering and hashing use the exact string, so a `&str` can be
/// used to query maps keyed by `GroupKey`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(Arc<str>);

impl GroupKey {
	pub fn new(key: impl Into<Arc<str>>) -> Self {
		Self(key.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Splits the key into its documented-symbol kind.
	pub fn kind(&self) -> GroupKind<'_> {
		let Some((prefix, name)) = self.0.split_once(':') else {
			return GroupKind::Other {
				prefix: "",
				name: &self.0,
			};
		};

		if prefix == "File" {
			return GroupKind::File { path: name };
		}
		match prefix.strip_suffix("Class") {
			Some(language) if !language.is_empty() => GroupKind::Class { language, name },
			_ => GroupKind::Other { prefix, name },
		}
	}

	/// Location of this group's table relative to the documentation root.
	///
	/// Returns `None` for kinds that have no file mapping, for an empty name,
	/// and for any segment that is not a plain name (`.`, `..`, a backslash or
	/// an absolute component), so the result never leaves the root.
	pub fn tooltip_path(&self) -> Option<PathBuf> {
		match self.kind() {
			GroupKind::File { path } => {
				let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
				if !segments.iter().all(|s| is_plain_segment(s)) {
					return None;
				}
				let file = segments.pop()?;
				let mut out = PathBuf::from("files");
				out.extend(segments);
				out.push(format!("{}{TOOLTIP_FILE_SUFFIX}", file.replace('.', "-")));
				Some(out)
			}
			GroupKind::Class { language, name } => {
				let mut segments: Vec<&str> = name.split('.').filter(|s| !s.is_empty()).collect();
				if !is_plain_segment(language) || !segments.iter().all(|s| is_plain_segment(s)) {
					return None;
				}
				let class = segments.pop()?;
				let mut out = PathBuf::from("classes");
				out.push(language);
				out.extend(segments);
				out.push(format!("{class}{TOOLTIP_FILE_SUFFIX}"));
				Some(out)
			}
			GroupKind::Other { .. } => None,
		}
	}
}

/// True when `segment` is a single ordinary path component.
fn is_plain_segment(segment: &str) -> bool {
	if segment.contains(['/', '\\']) {
		return false;
	}
	let mut components = Path::new(segment).components();
	matches!(
		(components.next(), components.next()),
		(Some(Component::Normal(_)), None)
	)
}

impl Borrow<str> for GroupKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for GroupKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for GroupKey {
	fn from(key: &str) -> Self {
		Self::new(key)
	}
}

impl From<String> for GroupKey {
	fn from(key: String) -> Self {
		Self::new(key)
	}
}

impl fmt::Display for GroupKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Debug for GroupKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "GroupKey({:?})", &*self.0)
	}
}

/// Decomposed view of a [`GroupKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind<'a> {
	/// `File:<path>`, a documented source file.
	File { path: &'a str },
	/// `<Language>Class:<name>`, a documented class.
	Class { language: &'a str, name: &'a str },
	/// Any other prefix. `prefix` is empty when the key has no colon.
	Other { prefix: &'a str, name: &'a str },
}

/// Positive tooltip identifier within a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TooltipId(NonZeroU32);

impl TooltipId {
	/// Returns `None` for zero.
	#[inline]
	pub const fn new(id: u32) -> Option<Self> {
		match NonZeroU32::new(id) {
			Some(id) => Some(Self(id)),
			None => None,
		}
	}

	#[inline]
	pub const fn get(self) -> u32 {
		self.0.get()
	}
}

impl From<NonZeroU32> for TooltipId {
	fn from(id: NonZeroU32) -> Self {
		Self(id)
	}
}

impl fmt::Display for TooltipId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}
