//! Headword line parsing and reading/redirect derivation.
//!
//! A headword line carries the canonical headword plus optional annotations:
//!
//! - `{no_kana}` anywhere: never show or redirect a reading
//! - `{reading}`: manual reading, overrides the automatic one
//! - `headword|alias|alias`: extra lookup forms
//!
//! ```
//! use txt2mdx::builder::headword::parse_headword;
//!
//! # fn main() -> txt2mdx::Result<()> {
//! let parsed = parse_headword("日本{にほん}|にっぽん|Japan")?;
//! assert_eq!(parsed.headword, "日本");
//! assert_eq!(parsed.manual_reading.as_deref(), Some("にほん"));
//! assert_eq!(parsed.aliases, ["にっぽん", "Japan"]);
//! assert!(!parsed.disable_reading);
//! # Ok(())
//! # }
//! ```

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::reading::ReadingProvider;
use crate::utils::{contains_kanji, is_pure_katakana};
use crate::{ConvertError, Result};

/// Marker disabling both the display reading and reading redirects.
pub const NO_KANA_MARKER: &str = "{no_kana}";

/// Separator between the headword and its aliases.
pub const ALIAS_SEPARATOR: char = '|';

static MANUAL_READING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(.+?)\}").unwrap());

/// Switches between the redirect/reading variants of the headword syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadwordOptions {
    /// Aliases become redirect keys even when `{no_kana}` is present.
    pub alias_redirect_always: bool,
    /// A pure katakana headword without manual reading shows its first alias
    /// (usually the foreign source word) as reading.
    pub katakana_english_alias: bool,
}

impl Default for HeadwordOptions {
    fn default() -> Self {
        Self {
            alias_redirect_always: true,
            katakana_english_alias: false,
        }
    }
}

/// One parsed headword line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedHeadword {
    /// Canonical headword, never empty
    pub headword: String,
    /// Reading given in `{...}`
    pub manual_reading: Option<String>,
    /// Segments after the first `|`, in source order
    pub aliases: Vec<String>,
    /// Set by `{no_kana}`
    pub disable_reading: bool,
}

/// Reading and lookup keys derived for one headword.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadwordKeys {
    /// Reading rendered next to the headword
    pub display_reading: Option<String>,
    /// Alternate lookup forms: aliases, then manual reading, then automatic
    /// reading, each key once
    pub redirect_keys: IndexSet<String>,
}

/// Parses a headword line. See [`parse_headword_at`].
pub fn parse_headword(raw: &str) -> Result<ParsedHeadword> {
    parse_headword_at(raw, 0)
}

/// Parses a headword line found at `line_no` of the source.
///
/// The steps run in a fixed order, each on what the previous one left:
/// `{no_kana}` removal, `{...}` extraction (the first one is the reading,
/// every one is removed), then the `|` split.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedHeadword`] if nothing is left for the
/// canonical headword.
pub fn parse_headword_at(raw: &str, line_no: u64) -> Result<ParsedHeadword> {
    let mut working = raw.to_string();

    let disable_reading = working.contains(NO_KANA_MARKER);
    if disable_reading {
        working = working.replace(NO_KANA_MARKER, "");
    }

    let manual_reading = MANUAL_READING
        .captures(&working)
        .and_then(|caps| caps.get(1))
        .map(|reading| reading.as_str().trim().to_string())
        .filter(|reading| !reading.is_empty());
    if MANUAL_READING.is_match(&working) {
        working = MANUAL_READING.replace_all(&working, "").into_owned();
    }

    let mut segments = working
        .split(ALIAS_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let headword = segments
        .next()
        .ok_or_else(|| ConvertError::malformed_headword(line_no, raw))?;
    let aliases = segments.collect();

    Ok(ParsedHeadword {
        headword,
        manual_reading,
        aliases,
        disable_reading,
    })
}

impl ParsedHeadword {
    /// Whether the automatic reading applies: reading not disabled, no
    /// manual reading, and kanji in the headword.
    pub fn needs_automatic_reading(&self) -> bool {
        !self.disable_reading && self.manual_reading.is_none() && contains_kanji(&self.headword)
    }

    /// Derives the display reading and the redirect keys.
    ///
    /// `provider` is consulted at most once, and only when
    /// [`needs_automatic_reading`](Self::needs_automatic_reading) holds.
    pub fn derive_keys<P: ReadingProvider + ?Sized>(&self, provider: &P, options: &HeadwordOptions) -> Result<HeadwordKeys> {
        let automatic_reading = if self.needs_automatic_reading() {
            Some(provider.reading(&self.headword)?)
        } else {
            None
        };
        Ok(self.keys_with_reading(automatic_reading, options))
    }

    /// Derives the display reading and the redirect keys from an already
    /// looked up automatic reading, `None` when there is none.
    pub fn keys_with_reading(&self, automatic_reading: Option<String>, options: &HeadwordOptions) -> HeadwordKeys {
        let mut redirect_keys = IndexSet::new();
        if options.alias_redirect_always || !self.disable_reading {
            redirect_keys.extend(self.aliases.iter().cloned());
        }
        if !self.disable_reading {
            if let Some(reading) = &self.manual_reading {
                redirect_keys.insert(reading.clone());
            }
        }
        if let Some(reading) = &automatic_reading {
            redirect_keys.insert(reading.clone());
        }

        let display_reading = if self.disable_reading {
            None
        } else if self.manual_reading.is_some() {
            self.manual_reading.clone()
        } else if automatic_reading.is_some() {
            automatic_reading
        } else if options.katakana_english_alias && is_pure_katakana(&self.headword) {
            self.aliases.first().cloned()
        } else {
            None
        };

        HeadwordKeys {
            display_reading,
            redirect_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{NoReading, TableReading};

    fn readings() -> TableReading {
        TableReading::from_pairs([("猫", "ねこ"), ("日本", "にほん"), ("東京", "とうきょう")])
    }

    fn keys(set: &IndexSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_plain_headword() -> Result<()> {
        for raw in ["猫", "  ねこ  ", "cat", "コンピューター"] {
            let parsed = parse_headword(raw)?;
            assert_eq!(parsed.headword, raw.trim());
            assert_eq!(parsed.manual_reading, None);
            assert!(parsed.aliases.is_empty());
            assert!(!parsed.disable_reading);
        }
        Ok(())
    }

    #[test]
    fn test_aliases() -> Result<()> {
        let parsed = parse_headword("猫|neko")?;
        assert_eq!(parsed.headword, "猫");
        assert_eq!(parsed.aliases, ["neko"]);

        let parsed = parse_headword(" 猫 || ネコ |  | neko ")?;
        assert_eq!(parsed.headword, "猫");
        assert_eq!(parsed.aliases, ["ネコ", "neko"]);

        let parsed = parse_headword("|猫|neko")?;
        assert_eq!(parsed.headword, "猫");
        assert_eq!(parsed.aliases, ["neko"]);
        Ok(())
    }

    #[test]
    fn test_manual_reading() -> Result<()> {
        let parsed = parse_headword("猫{ねこ}")?;
        assert_eq!(parsed.headword, "猫");
        assert_eq!(parsed.manual_reading.as_deref(), Some("ねこ"));

        // Allowed anywhere in the line
        let parsed = parse_headword("{ ねこ }猫|neko")?;
        assert_eq!(parsed.headword, "猫");
        assert_eq!(parsed.manual_reading.as_deref(), Some("ねこ"));
        assert_eq!(parsed.aliases, ["neko"]);

        let parsed = parse_headword("猫|neko{ねこ}")?;
        assert_eq!(parsed.aliases, ["neko"]);
        assert_eq!(parsed.manual_reading.as_deref(), Some("ねこ"));

        // Only the first one is the reading, all of them are removed
        let parsed = parse_headword("猫{ねこ}{びょう}")?;
        assert_eq!(parsed.headword, "猫");
        assert_eq!(parsed.manual_reading.as_deref(), Some("ねこ"));

        let parsed = parse_headword("猫{ねこ}|cat{キャット}")?;
        assert_eq!(parsed.headword, "猫");
        assert_eq!(parsed.aliases, ["cat"]);
        assert_eq!(parsed.manual_reading.as_deref(), Some("ねこ"));
        Ok(())
    }

    #[test]
    fn test_blank_manual_reading_counts_as_absent() -> Result<()> {
        let parsed = parse_headword("猫{  }")?;
        assert_eq!(parsed.headword, "猫");
        assert_eq!(parsed.manual_reading, None);

        // `{}` has no interior and stays part of the text
        let parsed = parse_headword("猫{}")?;
        assert_eq!(parsed.headword, "猫{}");
        Ok(())
    }

    #[test]
    fn test_no_kana() -> Result<()> {
        let parsed = parse_headword("猫{no_kana}")?;
        assert_eq!(parsed.headword, "猫");
        assert!(parsed.disable_reading);
        assert_eq!(parsed.manual_reading, None);

        let parsed = parse_headword("{no_kana}猫{ねこ}|neko")?;
        assert!(parsed.disable_reading);
        assert_eq!(parsed.manual_reading.as_deref(), Some("ねこ"));
        assert_eq!(parsed.aliases, ["neko"]);
        Ok(())
    }

    #[test]
    fn test_malformed_headword() {
        for raw in ["", "   ", "|", "{ねこ}", "{no_kana}", " | {ねこ} | "] {
            let err = parse_headword_at(raw, 42).unwrap_err();
            assert!(err.is_malformed_headword(), "Failed for input: {:?}", raw);
            assert!(matches!(err, ConvertError::MalformedHeadword { line_no: 42, .. }));
        }
    }

    #[test]
    fn test_automatic_reading_for_kanji() -> Result<()> {
        let parsed = parse_headword("猫")?;
        let derived = parsed.derive_keys(&readings(), &HeadwordOptions::default())?;
        assert_eq!(derived.display_reading.as_deref(), Some("ねこ"));
        assert_eq!(keys(&derived.redirect_keys), ["ねこ"]);
        Ok(())
    }

    #[test]
    fn test_kana_headword_needs_no_reading() -> Result<()> {
        let parsed = parse_headword("ねこ|neko")?;
        let derived = parsed.derive_keys(&NoReading, &HeadwordOptions::default())?;
        assert_eq!(derived.display_reading, None);
        assert_eq!(keys(&derived.redirect_keys), ["neko"]);
        Ok(())
    }

    #[test]
    fn test_manual_reading_wins_over_automatic() -> Result<()> {
        // NoReading would fail if it were consulted
        let parsed = parse_headword("猫{びょう}|cat")?;
        let derived = parsed.derive_keys(&NoReading, &HeadwordOptions::default())?;
        assert_eq!(derived.display_reading.as_deref(), Some("びょう"));
        assert_eq!(keys(&derived.redirect_keys), ["cat", "びょう"]);
        Ok(())
    }

    #[test]
    fn test_redirect_keys_are_unique_per_entry() -> Result<()> {
        let parsed = parse_headword("猫|ねこ|cat|ねこ")?;
        let derived = parsed.derive_keys(&readings(), &HeadwordOptions::default())?;
        assert_eq!(keys(&derived.redirect_keys), ["ねこ", "cat"]);
        assert_eq!(derived.display_reading.as_deref(), Some("ねこ"));
        Ok(())
    }

    #[test]
    fn test_no_kana_suppresses_readings_but_keeps_aliases() -> Result<()> {
        let parsed = parse_headword("猫{ねこ}{no_kana}|cat")?;
        let derived = parsed.derive_keys(&NoReading, &HeadwordOptions::default())?;
        assert_eq!(derived.display_reading, None);
        assert_eq!(keys(&derived.redirect_keys), ["cat"]);

        let options = HeadwordOptions { alias_redirect_always: false, ..Default::default() };
        let derived = parsed.derive_keys(&NoReading, &options)?;
        assert!(derived.redirect_keys.is_empty());
        Ok(())
    }

    #[test]
    fn test_katakana_english_alias() -> Result<()> {
        let parsed = parse_headword("コンピューター|computer|PC")?;

        let derived = parsed.derive_keys(&NoReading, &HeadwordOptions::default())?;
        assert_eq!(derived.display_reading, None);

        let options = HeadwordOptions { katakana_english_alias: true, ..Default::default() };
        let derived = parsed.derive_keys(&NoReading, &options)?;
        assert_eq!(derived.display_reading.as_deref(), Some("computer"));
        assert_eq!(keys(&derived.redirect_keys), ["computer", "PC"]);

        let mixed = parse_headword("パン屋|bakery")?;
        let derived = mixed.derive_keys(&TableReading::from_pairs([("パン屋", "ぱんや")]), &options)?;
        assert_eq!(derived.display_reading.as_deref(), Some("ぱんや"));
        Ok(())
    }

    #[test]
    fn test_missing_reading_is_reported() {
        let parsed = parse_headword("鳥").unwrap();
        let err = parsed.derive_keys(&readings(), &HeadwordOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::ReadingUnavailable { .. }));
    }
}
