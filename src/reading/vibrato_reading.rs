//! Readings from morphological analysis with vibrato.
//!
//! The text is tokenized with a MeCab-compatible system dictionary. Tokens
//! whose surface contains kanji are replaced by their dictionary reading
//! converted to hiragana; every other token keeps its surface, so kana and
//! latin letters pass through unchanged. Text with a kanji token the
//! dictionary has no reading for has no reading at all.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use vibrato::{Dictionary, Tokenizer};

use crate::reading::ReadingProvider;
use crate::utils::{contains_kanji, katakana_to_hiragana};
use crate::{ConvertError, Result};

pub struct VibratoReading {
    tokenizer: Tokenizer,
    feature_index: usize,
}

impl VibratoReading {
    /// Loads a system dictionary from `path`. Files ending in `.zst` are
    /// decompressed on the fly.
    pub fn from_path<P: AsRef<Path>>(path: P, feature_index: usize) -> Result<Self> {
        let path = path.as_ref();
        let is_zstd = path.extension().is_some_and(|ext| ext == "zst");
        let dict = if is_zstd {
            Dictionary::read(zstd::Decoder::new(File::open(path)?)?)
        } else {
            Dictionary::read(BufReader::new(File::open(path)?))
        }
        .map_err(|e| ConvertError::reading_engine(format!("Failed to load {}: {}", path.display(), e)))?;
        Ok(Self::from_dictionary(dict, feature_index))
    }

    pub fn from_dictionary(dict: Dictionary, feature_index: usize) -> Self {
        Self {
            tokenizer: Tokenizer::new(dict),
            feature_index,
        }
    }

    fn token_reading<'a>(&self, surface: &'a str, feature: &'a str) -> std::borrow::Cow<'a, str> {
        match feature.split(',').nth(self.feature_index) {
            Some(reading) if !reading.is_empty() && reading != "*" => katakana_to_hiragana(reading).into(),
            _ => surface.into(),
        }
    }
}

impl ReadingProvider for VibratoReading {
    fn reading(&self, text: &str) -> Result<String> {
        let mut worker = self.tokenizer.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();

        let mut reading = String::with_capacity(text.len() * 2);
        for token in worker.token_iter() {
            let surface = token.surface();
            if contains_kanji(surface) {
                reading.push_str(&self.token_reading(surface, token.feature()));
            } else {
                reading.push_str(surface);
            }
        }
        if contains_kanji(&reading) {
            debug!("No complete reading of {}: {}", text, reading);
            return Err(ConvertError::reading_unavailable(text));
        }
        debug!("Reading of {}: {}", text, reading);
        Ok(reading)
    }
}
