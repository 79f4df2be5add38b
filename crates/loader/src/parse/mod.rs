//! # Parser
//!
//! Reads generated tooltip tables. A table is a single JavaScript call that
//! hands a group key and an object literal of fragments to the viewer:
//!
//! ```text
//! table  = bom? callee "(" string "," object ")" ";"?
//! callee = ident ("." ident)*
//! object = "{" (entry ("," entry)* ","?)? "}"
//! entry  = (digits | string) ":" string
//! string = '"' chars '"' | "'" chars "'"
//! ```
//!
//! Whitespace and comments are allowed between tokens. String literals are
//! decoded with JavaScript escape rules; nothing else about the fragment text
//! is touched.

use std::collections::HashSet;

use ndtips_registry::{GroupKey, TooltipGroup, TooltipId};

use crate::error::{ParseError, ParseErrorKind};


/// Decoded contents of one table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
	/// Dotted callee the table was written against, e.g. `NDSummary.OnToolTipsLoaded`.
	pub callee: String,
	pub group: GroupKey,
	/// Entries in file order, duplicates included.
	pub entries: Vec<(TooltipId, String)>,
}

impl ParsedTable {
	/// IDs that appear more than once, in first-repeat order.
	pub fn duplicates(&self) -> Vec<TooltipId> {
		let mut seen = HashSet::new();
		let mut dups = Vec::new();
		for (id, _) in &self.entries {
			if !seen.insert(*id) && !dups.contains(id) {
				dups.push(*id);
			}
		}
		dups
	}

	/// Converts into a registry group. A repeated ID keeps its last fragment.
	pub fn into_group(self) -> TooltipGroup {
		TooltipGroup::new(self.group, self.entries)
	}
}

/// Parses a complete table file.
///
/// # Errors
///
/// Returns a [`ParseError`] with the line and column of the first token that
/// does not fit the grammar.
///
/// # Examples
///
/// ```
/// use ndtips_loader::parse_table;
///
/// let table = parse_table(r#"NDSummary.OnToolTipsLoaded("File:a.lua",{3:"<div>x</div>"});"#).unwrap();
/// assert_eq!(table.group.as_str(), "File:a.lua");
/// assert_eq!(table.entries[0].1, "<div>x</div>");
/// ```
pub fn parse_table(src: &str) -> Result<ParsedTable, ParseError> {
	let mut parser = Parser::new(src);
	parser.skip_bom();
	parser.skip_trivia();

	let callee = parser.callee()?;
	parser.expect('(', "'('")?;
	let group = parser.string()?;
	parser.expect(',', "','")?;
	let entries = parser.object()?;
	parser.expect(')', "')'")?;
	parser.skip_trivia();
	if parser.peek() == Some(';') {
		parser.next();
		parser.skip_trivia();
	}

	if !parser.is_end() {
		let rest: String = parser.input.chars().take(16).collect();
		return Err(parser.error(ParseErrorKind::TrailingInput(rest)));
	}

	Ok(ParsedTable {
		callee,
		group: GroupKey::from(group),
		entries,
	})
}

/// Maintains the parser's state for recursive descent parsing.
struct Parser<'a> {
	/// Full source, for position reporting.
	src: &'a str,
	/// Unconsumed input.
	input: &'a str,
	/// Current byte position in `src`.
	position: usize,
}

impl<'a> Parser<'a> {
	fn new(src: &'a str) -> Self {
		Self {
			src,
			input: src,
			position: 0,
		}
	}

	fn peek(&self) -> Option<char> {
		self.input.chars().next()
	}

	fn peek_at(&self, n: usize) -> Option<char> {
		self.input.chars().nth(n)
	}

	fn next(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.position += ch.len_utf8();
		self.input = &self.input[ch.len_utf8()..];
		Some(ch)
	}

	fn is_end(&self) -> bool {
		self.input.is_empty()
	}

	fn skip_bom(&mut self) {
		if self.peek() == Some('\u{feff}') {
			self.next();
		}
	}

	/// Skips whitespace and `//` / `/* */` comments.
	fn skip_trivia(&mut self) {
		loop {
			match (self.peek(), self.peek_at(1)) {
				(Some(ch), _) if ch.is_whitespace() || ch == '\u{feff}' => {
					self.next();
				}
				(Some('/'), Some('/')) => {
					while let Some(ch) = self.next() {
						if ch == '\n' {
							break;
						}
					}
				}
				(Some('/'), Some('*')) => {
					self.next();
					self.next();
					while let Some(ch) = self.next() {
						if ch == '*' && self.peek() == Some('/') {
							self.next();
							break;
						}
					}
				}
				_ => return,
			}
		}
	}

	/// Consumes `ch` after optional trivia.
	fn expect(&mut self, ch: char, expected: &'static str) -> Result<(), ParseError> {
		self.skip_trivia();
		if self.peek() == Some(ch) {
			self.next();
			Ok(())
		} else {
			Err(self.unexpected(expected))
		}
	}

	fn take_while<F>(&mut self, predicate: F) -> &'a str
	where
		F: Fn(char) -> bool,
	{
		let len = self
			.input
			.char_indices()
			.find(|(_, ch)| !predicate(*ch))
			.map_or(self.input.len(), |(i, _)| i);
		let (taken, rest) = self.input.split_at(len);
		self.input = rest;
		self.position += len;
		taken
	}

	fn callee(&mut self) -> Result<String, ParseError> {
		let mut callee = String::new();
		loop {
			self.skip_trivia();
			if !self.peek().is_some_and(is_ident_start) {
				return Err(self.unexpected("identifier"));
			}
			callee.push_str(self.take_while(is_ident_continue));
			self.skip_trivia();
			if self.peek() != Some('.') {
				return Ok(callee);
			}
			self.next();
			callee.push('.');
		}
	}

	fn object(&mut self) -> Result<Vec<(TooltipId, String)>, ParseError> {
		self.expect('{', "'{'")?;
		let mut entries = Vec::new();

		loop {
			self.skip_trivia();
			if self.peek() == Some('}') {
				self.next();
				return Ok(entries);
			}

			let id = self.key()?;
			self.expect(':', "':'")?;
			let html = self.string()?;
			entries.push((id, html));

			self.skip_trivia();
			match self.peek() {
				Some(',') => {
					self.next();
				}
				Some('}') => {}
				_ => return Err(self.unexpected("',' or '}'")),
			}
		}
	}

	fn key(&mut self) -> Result<TooltipId, ParseError> {
		self.skip_trivia();
		let start = (self.input, self.position);
		let digits = match self.peek() {
			Some(ch) if ch.is_ascii_digit() => {
				self.take_while(|ch| ch.is_ascii_digit()).to_string()
			}
			Some('"' | '\'') => self.string()?,
			_ => return Err(self.unexpected("tooltip id")),
		};

		match digits.parse::<u32>().ok().and_then(TooltipId::new) {
			// Only canonical decimal names the same property as the number.
			Some(id) if id.get().to_string() == digits => Ok(id),
			_ => {
				(self.input, self.position) = start;
				Err(self.error(ParseErrorKind::InvalidId(digits)))
			}
		}
	}

	fn string(&mut self) -> Result<String, ParseError> {
		self.skip_trivia();
		let quote = match self.peek() {
			Some(q @ ('"' | '\'')) => q,
			_ => return Err(self.unexpected("string literal")),
		};
		let start = (self.input, self.position);
		self.next();

		let mut out = String::new();
		loop {
			out.push_str(self.take_while(|ch| !matches!(ch, '\\' | '\n' | '\r') && ch != quote));
			match self.next() {
				Some(ch) if ch == quote => return Ok(out),
				Some('\\') => self.escape(&mut out)?,
				_ => {
					(self.input, self.position) = start;
					return Err(self.error(ParseErrorKind::UnterminatedString));
				}
			}
		}
	}

	/// Decodes one escape sequence; the backslash is already consumed.
	fn escape(&mut self, out: &mut String) -> Result<(), ParseError> {
		let escape_start = self.position - 1;
		let Some(ch) = self.next() else {
			return Err(self.error(ParseErrorKind::UnterminatedString));
		};

		match ch {
			'n' => out.push('\n'),
			'r' => out.push('\r'),
			't' => out.push('\t'),
			'b' => out.push('\u{8}'),
			'f' => out.push('\u{c}'),
			'v' => out.push('\u{b}'),
			'0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
			'x' => {
				let code = self.hex_digits(2, escape_start)?;
				out.push(char::from_u32(code).ok_or_else(|| self.invalid_escape(escape_start))?);
			}
			'u' => {
				let c = self.unicode_escape(escape_start)?;
				out.push(c);
			}
			// Line continuation.
			'\r' => {
				if self.peek() == Some('\n') {
					self.next();
				}
			}
			'\n' | '\u{2028}' | '\u{2029}' => {}
			'0'..='9' => return Err(self.invalid_escape(escape_start)),
			other => out.push(other),
		}
		Ok(())
	}

	fn unicode_escape(&mut self, escape_start: usize) -> Result<char, ParseError> {
		if self.peek() == Some('{') {
			self.next();
			let hex = self.take_while(|ch| ch.is_ascii_hexdigit());
			if hex.is_empty() || self.next() != Some('}') {
				return Err(self.invalid_escape(escape_start));
			}
			return u32::from_str_radix(hex, 16)
				.ok()
				.and_then(char::from_u32)
				.ok_or_else(|| self.invalid_escape(escape_start));
		}

		let high = self.hex_digits(4, escape_start)?;
		if !(0xD800..0xDC00).contains(&high) {
			return char::from_u32(high).ok_or_else(|| self.invalid_escape(escape_start));
		}

		// Surrogate pair: a low surrogate escape must follow.
		if self.peek() != Some('\\') || self.peek_at(1) != Some('u') {
			return Err(self.invalid_escape(escape_start));
		}
		self.next();
		self.next();
		let low = self.hex_digits(4, escape_start)?;
		if !(0xDC00..0xE000).contains(&low) {
			return Err(self.invalid_escape(escape_start));
		}
		let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
		char::from_u32(code).ok_or_else(|| self.invalid_escape(escape_start))
	}

	fn hex_digits(&mut self, count: usize, escape_start: usize) -> Result<u32, ParseError> {
		let hex: String = self.input.chars().take(count).collect();
		if hex.len() != count || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(self.invalid_escape(escape_start));
		}
		for _ in 0..count {
			self.next();
		}
		u32::from_str_radix(&hex, 16).map_err(|_| self.invalid_escape(escape_start))
	}

	fn invalid_escape(&self, escape_start: usize) -> ParseError {
		let sequence = self.src[escape_start + 1..self.position].to_string();
		self.error_at(escape_start, ParseErrorKind::InvalidEscape(sequence))
	}

	fn unexpected(&self, expected: &'static str) -> ParseError {
		let found = match self.peek() {
			Some(ch) => format!("'{ch}'"),
			None => "end of input".to_string(),
		};
		self.error(ParseErrorKind::Expected { expected, found })
	}

	/// Creates a [`ParseError`] at the current position.
	fn error(&self, kind: ParseErrorKind) -> ParseError {
		self.error_at(self.position, kind)
	}

	fn error_at(&self, offset: usize, kind: ParseErrorKind) -> ParseError {
		let before = &self.src[..offset];
		let line_start = before.rfind('\n').map_or(0, |i| i + 1);
		ParseError {
			kind,
			line: before.matches('\n').count() + 1,
			column: before[line_start..].chars().count() + 1,
		}
	}
}

fn is_ident_start(ch: char) -> bool {
	ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_continue(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_' || ch == '$'
}
