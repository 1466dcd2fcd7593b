//! Builder module for converting headword/meaning sources
//!
//! This module contains the conversion pipeline: source loading, headword
//! parsing, meaning formatting and the entry converter that assembles the
//! index and redirect tables.

pub mod source_loader;
pub mod headword;
pub mod meaning;
pub mod entry_converter;

// Re-export commonly used types for convenience
pub use source_loader::{RawEntry, pair_lines, read_source_lines};
pub use headword::{HeadwordKeys, HeadwordOptions, ParsedHeadword, parse_headword, parse_headword_at};
pub use meaning::{FormattedMeaning, MarkupKind, MarkupWarning, Segment, format_meaning, format_meaning_with_warnings};
pub use entry_converter::{
    ConvertOutput, ConvertSummary, ConverterConfig, EntryConverter,
    convert_file, convert_file_with_provider, convert_lines,
};
