//! # txt2mdx - Dictionary Source to MDict Index Converter
//!
//! This crate converts a plain-text dictionary source made of alternating
//! headword and meaning lines into the two tables an MDict compiler needs:
//! an HTML index (`headword<TAB>html`) and a redirect table
//! (`key<TAB>headword`) mapping readings and alternate spellings to their
//! canonical headword.
//!
//! ## Features
//!
//! - **Headword annotations**: manual readings `{よみ}`, `{no_kana}`, and `|` aliases
//! - **Automatic readings**: kana readings for kanji headwords from a
//!   morphological dictionary (vibrato) or a reading table
//! - **Meaning markup**: `[note](…)` and `[example](…)(…)` blocks plus
//!   automatic emphasis between punctuation
//! - **All-or-nothing output**: both tables are replaced together or not at all
//!
//! ## Quick Start
//!
//! ```
//! use txt2mdx::builder::{EntryConverter, ConverterConfig};
//! use txt2mdx::reading::TableReading;
//!
//! # fn main() -> txt2mdx::Result<()> {
//! let readings = TableReading::from_pairs([("日本", "にほん")]);
//! let converter = EntryConverter::new(ConverterConfig::default(), readings);
//!
//! let output = converter.convert(&["日本|Japan", "国、島国"], None)?;
//! assert_eq!(output.index_lines.len(), 1);
//! assert_eq!(output.redirect_lines, ["Japan\t日本", "にほん\t日本"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Builder**: [`builder`] parses headwords, formats meanings and assembles the tables
//! - **Readings**: [`reading`] provides the kana-conversion services
//! - **Utilities**: [`utils`] for script classification, I/O and progress reporting
//!
//! ## Error Handling
//!
//! All fallible operations return a [`Result<T>`] type, where errors are
//! represented by [`ConvertError`]. The crate uses the `snafu` library for
//! ergonomic error handling with context and backtraces.

pub mod builder;
pub mod error;
pub mod reading;
pub mod utils;

// Re-export commonly used types for convenience
pub use builder::{ConverterConfig, EntryConverter, ParsedHeadword, convert_file, convert_lines, format_meaning, parse_headword};
pub use reading::ReadingProvider;

// Re-export error types for convenience
pub use error::{ConvertError, Result, snafu};
