//! Reading generated summary tooltip tables.
//!
//! The documentation generator writes one `*-SummaryToolTips.js` file per
//! documented file or class. This crate parses those files ([`parse_table`]),
//! finds them on disk and registers them ([`TooltipLoader`]), and extracts
//! display text from individual fragments ([`Fragment`]).

pub mod error;
pub mod fragment;
mod loader;
mod parse;

pub use error::{LoadError, ParseError, ParseErrorKind, Result};
pub use fragment::{Fragment, TopicType};
pub use loader::{LoadReport, LoadedGroup, TooltipLoader, read_table};
pub use parse::{ParsedTable, parse_table};
