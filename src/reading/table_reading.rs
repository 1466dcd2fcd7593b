//! Fixed text → reading table.

use std::collections::HashMap;
use std::path::Path;

use log::debug;

use crate::reading::ReadingProvider;
use crate::utils::io_utils::string_from_file;
use crate::{ConvertError, Result};

/// Reading provider backed by an in-memory table.
///
/// Lookups are whole-string: `東京` and `東京都` are separate rows.
#[derive(Debug, Clone, Default)]
pub struct TableReading {
    readings: HashMap<String, String>,
}

impl TableReading {
    /// Builds a table from `(text, reading)` pairs. Later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            readings: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Parses `text<TAB>reading` lines. Blank lines and lines starting with
    /// `#` are ignored.
    pub fn from_tsv_str(tsv: &str) -> Result<Self> {
        let mut readings = HashMap::new();
        for (n, line) in tsv.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (text, reading) = line.split_once('\t').ok_or_else(|| {
                ConvertError::invalid_parameter(format!("Reading table line {}: missing tab separator", n + 1))
            })?;
            readings.insert(text.trim().to_string(), reading.trim().to_string());
        }
        debug!("Loaded {} readings", readings.len());
        Ok(Self { readings })
    }

    /// Loads a TSV reading table from `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_tsv_str(&string_from_file(path)?)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl ReadingProvider for TableReading {
    fn reading(&self, text: &str) -> Result<String> {
        self.readings
            .get(text)
            .cloned()
            .ok_or_else(|| ConvertError::reading_unavailable(text))
    }
}
