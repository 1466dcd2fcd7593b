// Utility functions and helpers
//
// This module provides script classification, I/O helpers and progress
// reporting used by the conversion pipeline.

pub mod script;
pub mod io_utils;
pub mod progress_report;

pub use script::{contains_kanji, is_kanji, is_pure_katakana, katakana_to_hiragana};
pub use io_utils::{skip_utf8_bom, string_from_file, write_files_atomically};
pub use progress_report::{ProgressState, ProgressReportFn};
