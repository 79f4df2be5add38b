//! Read-only inspection of tooltip fragments.
//!
//! Fragments follow a fixed layout: an outer `NDToolTip` container whose
//! classes name the topic type (`T*`) and language (`L*`), an optional
//! `NDPrototype` block and a trailing `TTSummary` sentence. Inspection pulls
//! those parts out as plain text for display. The fragment itself is never
//! modified, and a section that is missing or malformed simply yields `None`.

use std::sync::LazyLock;

use regex::Regex;

static TOOLTIP_CLASSES: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"<div class="NDToolTip([^"]*)""#).expect("valid regex"));
static PROTOTYPE_ID: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"<div id="NDPrototype(\d+)""#).expect("valid regex"));
static SUMMARY: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"(?s)<div class="TTSummary">(.*?)</div>"#).expect("valid regex"));

/// Kind of documented topic, from the container's `T*` class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopicType<'a> {
	/// File or class level summary (`TClass`).
	Class,
	/// Function available on both realms (`TShared`).
	Shared,
	Server,
	Client,
	/// Any other `T*` class, without the prefix.
	Other(&'a str),
}

impl<'a> TopicType<'a> {
	fn from_class(name: &'a str) -> Self {
		match name {
			"Class" => Self::Class,
			"Shared" => Self::Shared,
			"Server" => Self::Server,
			"Client" => Self::Client,
			other => Self::Other(other),
		}
	}

	pub fn as_str(&self) -> &'a str {
		match self {
			Self::Class => "Class",
			Self::Shared => "Shared",
			Self::Server => "Server",
			Self::Client => "Client",
			Self::Other(name) => name,
		}
	}
}

/// Parts of a fragment extracted for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment<'a> {
	pub topic: Option<TopicType<'a>>,
	/// Language name from the `L*` class, e.g. `Lua`.
	pub language: Option<&'a str>,
	pub prototype_id: Option<u32>,
	/// Prototype as plain text, e.g. `function math.Sign(value)`.
	pub prototype: Option<String>,
	/// Summary sentence as plain text.
	pub summary: Option<String>,
}

impl<'a> Fragment<'a> {
	pub fn inspect(html: &'a str) -> Self {
		let mut fragment = Fragment::default();

		if let Some(caps) = TOOLTIP_CLASSES.captures(html)
			&& let Some(classes) = caps.get(1)
		{
			for class in classes.as_str().split_whitespace() {
				if let Some(topic) = class.strip_prefix('T').filter(|s| !s.is_empty()) {
					fragment.topic.get_or_insert(TopicType::from_class(topic));
				} else if let Some(language) = class.strip_prefix('L').filter(|s| !s.is_empty()) {
					fragment.language.get_or_insert(language);
				}
			}
		}

		if let Some(caps) = PROTOTYPE_ID.captures(html)
			&& let Some(id) = caps.get(1)
		{
			fragment.prototype_id = id.as_str().parse().ok();
			fragment.prototype = balanced_div(&html[id.start()..])
				.map(html_to_text)
				.filter(|text| !text.is_empty());
		}

		fragment.summary = SUMMARY
			.captures(html)
			.and_then(|caps| caps.get(1))
			.map(|m| html_to_text(m.as_str()))
			.filter(|text| !text.is_empty());

		fragment
	}

	/// Prototype if present, otherwise the summary.
	pub fn headline(&self) -> Option<&str> {
		self.prototype.as_deref().or(self.summary.as_deref())
	}
}

/// Returns the inner markup of the `<div>` opened at the start of `html`,
/// up to its matching `</div>`.
///
/// `html` may begin anywhere inside the opening tag.
fn balanced_div(html: &str) -> Option<&str> {
	let body_start = html.find('>')? + 1;
	let mut depth = 1usize;
	let mut rest = &html[body_start..];
	let mut offset = body_start;

	while let Some(lt) = rest.find('<') {
		let tag = &rest[lt..];
		if tag.starts_with("</div") {
			depth -= 1;
			if depth == 0 {
				return Some(&html[body_start..offset + lt]);
			}
		} else if tag.starts_with("<div") {
			depth += 1;
		}
		offset += lt + 1;
		rest = &rest[lt + 1..];
	}
	None
}

/// Strips tags, decodes entities and normalizes whitespace.
///
/// A closing `</div>` after a trailing comma inserts a space so that
/// parameter cells read as `a, b` rather than `a,b`.
pub fn html_to_text(html: &str) -> String {
	let mut text = String::with_capacity(html.len());
	let mut rest = html;

	while let Some(lt) = rest.find('<') {
		text.push_str(&rest[..lt]);
		let Some(gt) = rest[lt..].find('>') else {
			rest = &rest[lt..];
			break;
		};
		let tag = &rest[lt..lt + gt + 1];
		if tag.starts_with("</div") && text.ends_with(',') {
			text.push(' ');
		}
		rest = &rest[lt + gt + 1..];
	}
	text.push_str(rest);

	let decoded = decode_entities(&text);
	decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes the named and numeric character references the generator emits.
/// Unknown references are left as written.
pub fn decode_entities(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut rest = text;

	while let Some(amp) = rest.find('&') {
		out.push_str(&rest[..amp]);
		rest = &rest[amp..];

		let decoded = rest.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
			let name = &rest[1..semi];
			let ch = match name {
				"amp" => Some('&'),
				"lt" => Some('<'),
				"gt" => Some('>'),
				"quot" => Some('"'),
				"apos" | "#39" => Some('\''),
				"nbsp" => Some(' '),
				_ => numeric_reference(name),
			}?;
			Some((ch, semi + 1))
		});

		match decoded {
			Some((ch, len)) => {
				out.push(ch);
				rest = &rest[len..];
			}
			None => {
				out.push('&');
				rest = &rest[1..];
			}
		}
	}
	out.push_str(rest);
	out
}

fn numeric_reference(name: &str) -> Option<char> {
	let digits = name.strip_prefix('#')?;
	let code = match digits.strip_prefix(['x', 'X']) {
		Some(hex) => u32::from_str_radix(hex, 16).ok()?,
		None => digits.parse().ok()?,
	};
	char::from_u32(code)
}
