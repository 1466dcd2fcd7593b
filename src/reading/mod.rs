//! Phonetic reading services.
//!
//! The converter never talks to a transliteration engine directly; it asks a
//! [`ReadingProvider`] for the kana reading of a kanji-bearing headword. This
//! keeps the engine replaceable, e.g. by a fixed [`TableReading`] in tests.
//!
//! # Providers
//!
//! - [`VibratoReading`]: morphological analysis with a vibrato system dictionary
//! - [`TableReading`]: fixed text → reading table, loadable from a TSV file
//! - [`NoReading`]: refuses every lookup
//! - [`CachedReading`]: LRU memoization in front of any other provider
//!
//! # Examples
//!
//! ```
//! use txt2mdx::reading::{ReadingProvider, TableReading};
//!
//! # fn main() -> txt2mdx::Result<()> {
//! let provider = TableReading::from_pairs([("猫", "ねこ")]);
//! assert_eq!(provider.reading("猫")?, "ねこ");
//! # Ok(())
//! # }
//! ```

pub mod cached_reading;
pub mod table_reading;
pub mod vibrato_reading;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use log::info;
use serde::{Deserialize, Serialize};

use crate::{ConvertError, Result};

pub use cached_reading::CachedReading;
pub use table_reading::TableReading;
pub use vibrato_reading::VibratoReading;

/// Field of an IPADIC feature string holding the katakana reading.
pub const IPADIC_READING_FIELD: usize = 7;

/// Converts text containing kanji into its phonetic (hiragana) reading.
///
/// Implementations must be deterministic: the same input always yields the
/// same reading within one run.
pub trait ReadingProvider {
    /// Returns the reading of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::ReadingUnavailable`] if the provider cannot
    /// produce a reading, or [`ConvertError::ReadingEngine`] if the
    /// underlying engine fails.
    fn reading(&self, text: &str) -> Result<String>;
}

impl<P: ReadingProvider + ?Sized> ReadingProvider for &P {
    fn reading(&self, text: &str) -> Result<String> {
        (**self).reading(text)
    }
}

impl<P: ReadingProvider + ?Sized> ReadingProvider for Box<P> {
    fn reading(&self, text: &str) -> Result<String> {
        (**self).reading(text)
    }
}

/// Provider used when no reading source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReading;

impl ReadingProvider for NoReading {
    fn reading(&self, text: &str) -> Result<String> {
        Err(ConvertError::reading_unavailable(text))
    }
}

fn default_feature_index() -> usize {
    IPADIC_READING_FIELD
}

/// Where automatic readings come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingSource {
    /// A vibrato system dictionary (`.dic`, or zstd-compressed `.zst`).
    Dictionary {
        dictionary: PathBuf,
        /// Index of the reading within each token's comma separated features
        #[serde(default = "default_feature_index")]
        feature_index: usize,
    },
    /// A TSV file of `text<TAB>reading` lines.
    Table {
        table: PathBuf,
    },
}

/// Opens the provider described by `source`, wrapped in an LRU cache of
/// `cache_size` entries (no cache when `cache_size` is 0).
pub fn open_reading_provider(source: Option<&ReadingSource>, cache_size: usize) -> Result<Box<dyn ReadingProvider>> {
    let provider: Box<dyn ReadingProvider> = match source {
        Some(ReadingSource::Dictionary { dictionary, feature_index }) => {
            info!("Loading reading dictionary: {}...", dictionary.display());
            Box::new(VibratoReading::from_path(dictionary, *feature_index)?)
        }
        Some(ReadingSource::Table { table }) => {
            info!("Loading reading table: {}...", table.display());
            Box::new(TableReading::from_file(table)?)
        }
        None => {
            info!("No reading source configured, automatic readings are unavailable");
            Box::new(NoReading)
        }
    };

    Ok(match NonZeroUsize::new(cache_size) {
        Some(capacity) => Box::new(CachedReading::new(provider, capacity)),
        None => provider,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_reading_refuses() {
        let err = NoReading.reading("猫").unwrap_err();
        assert!(matches!(err, ConvertError::ReadingUnavailable { ref text, .. } if text == "猫"));
    }

    #[test]
    fn test_reading_source_from_json() {
        let source: ReadingSource = serde_json::from_str(r#"{"dictionary": "ipadic.dic.zst"}"#).unwrap();
        assert_eq!(source, ReadingSource::Dictionary {
            dictionary: PathBuf::from("ipadic.dic.zst"),
            feature_index: IPADIC_READING_FIELD,
        });

        let source: ReadingSource = serde_json::from_str(r#"{"dictionary": "unidic.dic", "feature_index": 6}"#).unwrap();
        assert_eq!(source, ReadingSource::Dictionary {
            dictionary: PathBuf::from("unidic.dic"),
            feature_index: 6,
        });

        let source: ReadingSource = serde_json::from_str(r#"{"table": "readings.tsv"}"#).unwrap();
        assert_eq!(source, ReadingSource::Table { table: PathBuf::from("readings.tsv") });
    }

    #[test]
    fn test_open_without_source() -> Result<()> {
        let provider = open_reading_provider(None, 16)?;
        assert!(provider.reading("猫").is_err());
        Ok(())
    }
}
