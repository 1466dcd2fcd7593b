//! Conversion of a headword/meaning source into index and redirect tables.
//!
//! Each entry of the source produces:
//!
//! - one index line `headword<TAB>html`, where the html is an optional
//!   reading span followed by `<p data-orgtag="meaning">…</p>`
//! - one redirect line `key<TAB>headword` per redirect key of the headword
//!
//! Both tables keep source order. Redirect keys are unique within an entry
//! but may repeat across entries.
//!
//! A kanji headword the reading service has no reading for is still written,
//! without reading, and its line is logged; set
//! [`ConverterConfig::require_readings`] to fail instead.
//!
//! # Examples
//!
//! ```
//! use txt2mdx::builder::entry_converter::convert_lines;
//! use txt2mdx::reading::TableReading;
//!
//! # fn main() -> txt2mdx::Result<()> {
//! let readings = TableReading::from_pairs([("猫", "ねこ")]);
//! let (index, redirects) = convert_lines(&["猫|cat", "動物、ペット"], &readings)?;
//! assert_eq!(
//!     index,
//!     "猫\t<span class=\"pinyin_h\">ねこ</span><p data-orgtag=\"meaning\"><b>動物</b>、<b>ペット</b></p>"
//! );
//! assert_eq!(redirects, "cat\t猫\nねこ\t猫");
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```no_run
//! use txt2mdx::builder::{convert_file, ConverterConfig};
//!
//! # fn main() -> txt2mdx::Result<()> {
//! let config = ConverterConfig::from_file("txt2mdx.json")?;
//! let summary = convert_file("source.txt", "index.txt", "syns.txt", &config, None)?;
//! println!("{} entries, {} redirects", summary.entries, summary.redirects);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use log::*;
use serde::{Deserialize, Serialize};

use crate::builder::headword::{parse_headword_at, HeadwordOptions};
use crate::builder::meaning::format_meaning_with_warnings;
use crate::builder::source_loader::{pair_lines, read_source_lines, RawEntry};
use crate::reading::{open_reading_provider, ReadingProvider, ReadingSource};
use crate::utils::io_utils::{string_from_file, write_files_atomically};
use crate::utils::progress_report::{ProgressReportFn, ProgressState};
use crate::{ConvertError, Result};

/// Default class of the reading span in index html.
pub const DEFAULT_READING_CSS_CLASS: &str = "pinyin_h";

/// Default number of cached reading lookups.
pub const DEFAULT_READING_CACHE_SIZE: usize = 1024;

/// Configuration of a conversion run.
///
/// Every field has a default, so a JSON configuration only needs the
/// fields it changes:
///
/// ```json
/// {
///     "katakana_english_alias": true,
///     "reading": { "dictionary": "ipadic-mecab-2_7_0/system.dic.zst" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Headword syntax variants
    #[serde(flatten)]
    pub headword: HeadwordOptions,
    /// Skip (and log) entries with an empty headword instead of failing
    pub skip_malformed_headwords: bool,
    /// Class of the `<span>` holding the display reading
    pub reading_css_class: String,
    /// Source of automatic readings; none means kanji headwords only get a
    /// reading from `{...}`
    pub reading: Option<ReadingSource>,
    /// Fail on a kanji headword without automatic reading instead of
    /// writing it without one
    pub require_readings: bool,
    /// Capacity of the reading lookup cache, 0 to disable
    pub reading_cache_size: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            headword: HeadwordOptions::default(),
            skip_malformed_headwords: false,
            reading_css_class: DEFAULT_READING_CSS_CLASS.to_string(),
            reading: None,
            require_readings: false,
            reading_cache_size: DEFAULT_READING_CACHE_SIZE,
        }
    }
}

impl ConverterConfig {
    /// Loads a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = string_from_file(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Index and redirect lines produced by a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConvertOutput {
    pub index_lines: Vec<String>,
    pub redirect_lines: Vec<String>,
    /// Source lines of skipped malformed headwords
    pub skipped_lines: Vec<u64>,
    /// Source lines of kanji headwords written without automatic reading
    pub unread_lines: Vec<u64>,
    /// Number of incomplete block markups left as text
    pub markup_warnings: usize,
    /// Source lines of meanings with incomplete block markup
    pub warned_lines: Vec<u64>,
}

impl ConvertOutput {
    /// Index lines joined with `\n`, without trailing newline.
    pub fn index_text(&self) -> String {
        self.index_lines.join("\n")
    }

    /// Redirect lines joined with `\n`, without trailing newline.
    pub fn redirect_text(&self) -> String {
        self.redirect_lines.join("\n")
    }
}

/// Counts reported after converting a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertSummary {
    pub entries: usize,
    pub redirects: usize,
    pub skipped: usize,
    pub unread: usize,
    pub markup_warnings: usize,
}

/// Converts entries using a reading provider and a configuration.
pub struct EntryConverter<P> {
    pub config: ConverterConfig,
    provider: P,
}

impl<P: ReadingProvider> EntryConverter<P> {
    pub fn new(config: ConverterConfig, provider: P) -> Self {
        Self { config, provider }
    }

    /// Builds the html fragment of one entry.
    fn entry_html(&self, display_reading: Option<&str>, meaning_html: &str) -> String {
        let mut html = String::with_capacity(meaning_html.len() + 64);
        if let Some(reading) = display_reading {
            html.push_str(&format!(r#"<span class="{}">{}</span>"#, self.config.reading_css_class, reading));
        }
        html.push_str(r#"<p data-orgtag="meaning">"#);
        html.push_str(meaning_html);
        html.push_str("</p>");
        html
    }

    /// Looks up the automatic reading of a headword that needs one.
    fn automatic_reading(&self, headword: &str, line_no: u64, output: &mut ConvertOutput) -> Result<Option<String>> {
        match self.provider.reading(headword) {
            Ok(reading) => Ok(Some(reading)),
            Err(e) if e.is_reading_unavailable() && !self.config.require_readings => {
                warn!("Line {}: {}, written without reading", line_no, e);
                output.unread_lines.push(line_no);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Converts one entry, appending its lines to `output`.
    pub fn convert_entry(&self, entry: &RawEntry, output: &mut ConvertOutput) -> Result<()> {
        let parsed = parse_headword_at(&entry.headword_line, entry.line_no)?;
        let automatic_reading = if parsed.needs_automatic_reading() {
            self.automatic_reading(&parsed.headword, entry.line_no, output)?
        } else {
            None
        };
        let keys = parsed.keys_with_reading(automatic_reading, &self.config.headword);

        let meaning = format_meaning_with_warnings(&entry.meaning_line);
        for warning in &meaning.warnings {
            warn!("Line {}: {}", entry.line_no + 1, warning);
        }
        output.markup_warnings += meaning.warnings.len();
        if !meaning.warnings.is_empty() {
            output.warned_lines.push(entry.line_no + 1);
        }

        debug!(
            "Line {}: {} reading={:?} redirects={}",
            entry.line_no,
            parsed.headword,
            keys.display_reading,
            keys.redirect_keys.len()
        );

        for key in &keys.redirect_keys {
            output.redirect_lines.push(format!("{}\t{}", key, parsed.headword));
        }
        let html = self.entry_html(keys.display_reading.as_deref(), &meaning.html);
        output.index_lines.push(format!("{}\t{}", parsed.headword, html));
        Ok(())
    }

    /// Converts source lines into index and redirect lines.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::MalformedHeadword`] unless malformed headwords are skipped
    /// - [`ConvertError::ReadingUnavailable`] if readings are required
    /// - reading engine errors
    /// - [`ConvertError::UserInterrupted`] if the progress reporter cancels
    pub fn convert<S: AsRef<str>>(&self, lines: &[S], prog_rpt: Option<ProgressReportFn>) -> Result<ConvertOutput> {
        let entries = pair_lines(lines);
        info!("Converting {} entries...", entries.len());

        let mut output = ConvertOutput {
            index_lines: Vec::with_capacity(entries.len()),
            redirect_lines: Vec::with_capacity(entries.len()),
            ..Default::default()
        };
        let mut progress_state = ProgressState::new("EntryConverter::convert", entries.len() as u64, 10, prog_rpt);

        for (n, entry) in entries.iter().enumerate() {
            match self.convert_entry(entry, &mut output) {
                Ok(()) => {}
                Err(e) if e.is_malformed_headword() && self.config.skip_malformed_headwords => {
                    warn!("Skipping entry: {}", e);
                    output.skipped_lines.push(entry.line_no);
                }
                Err(e) => return Err(e),
            }
            let issues = output.skipped_lines.len() + output.unread_lines.len() + output.warned_lines.len();
            if progress_state.report_entry(n as u64, entry.line_no, issues as u64) {
                info!("Conversion cancelled by user");
                return Err(ConvertError::user_interrupted());
            }
        }

        if !output.skipped_lines.is_empty() {
            warn!("Skipped {} malformed headwords at lines {:?}", output.skipped_lines.len(), output.skipped_lines);
        }
        if !output.unread_lines.is_empty() {
            warn!("No reading for {} headwords at lines {:?}", output.unread_lines.len(), output.unread_lines);
        }
        info!(
            "Converted {} entries, {} redirects",
            output.index_lines.len(),
            output.redirect_lines.len()
        );
        Ok(output)
    }
}

/// Converts source lines with the default configuration.
///
/// Returns the index text and the redirect text.
pub fn convert_lines<S, P>(lines: &[S], provider: &P) -> Result<(String, String)>
where
    S: AsRef<str>,
    P: ReadingProvider + ?Sized,
{
    let converter = EntryConverter::new(ConverterConfig::default(), provider);
    let output = converter.convert(lines, None)?;
    Ok((output.index_text(), output.redirect_text()))
}

/// Converts the source at `input_path` and writes both tables.
///
/// The outputs are written only when the whole conversion succeeded, and
/// then as one unit: either both files are replaced or neither is.
pub fn convert_file<I, X, R>(
    input_path: I,
    index_path: X,
    redirect_path: R,
    config: &ConverterConfig,
    prog_rpt: Option<ProgressReportFn>,
) -> Result<ConvertSummary>
where
    I: AsRef<Path>,
    X: AsRef<Path>,
    R: AsRef<Path>,
{
    let provider = open_reading_provider(config.reading.as_ref(), config.reading_cache_size)?;
    convert_file_with_provider(input_path, index_path, redirect_path, config, provider, prog_rpt)
}

/// Same as [`convert_file`] with an explicit reading provider.
pub fn convert_file_with_provider<I, X, R, P>(
    input_path: I,
    index_path: X,
    redirect_path: R,
    config: &ConverterConfig,
    provider: P,
    prog_rpt: Option<ProgressReportFn>,
) -> Result<ConvertSummary>
where
    I: AsRef<Path>,
    X: AsRef<Path>,
    R: AsRef<Path>,
    P: ReadingProvider,
{
    info!("Loading source: {}...", input_path.as_ref().display());
    let lines = read_source_lines(input_path)?;

    let converter = EntryConverter::new(config.clone(), provider);
    let output = converter.convert(&lines, prog_rpt)?;

    let index_text = output.index_text();
    let redirect_text = output.redirect_text();
    write_files_atomically(&[
        (index_path.as_ref(), index_text.as_bytes()),
        (redirect_path.as_ref(), redirect_text.as_bytes()),
    ])?;
    info!("Wrote {} and {}", index_path.as_ref().display(), redirect_path.as_ref().display());

    Ok(ConvertSummary {
        entries: output.index_lines.len(),
        redirects: output.redirect_lines.len(),
        skipped: output.skipped_lines.len(),
        unread: output.unread_lines.len(),
        markup_warnings: output.markup_warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{NoReading, TableReading};

    fn readings() -> TableReading {
        TableReading::from_pairs([("猫", "ねこ"), ("日本", "にほん"), ("食べる", "たべる")])
    }

    fn meaning_p(html: &str) -> String {
        format!(r#"<p data-orgtag="meaning">{}</p>"#, html)
    }

    #[test]
    fn test_convert_lines() -> Result<()> {
        let lines = [
            "猫|cat",
            "動物、ペット",
            "",
            "ねこ",
            "[note](ひらがな)",
            "日本{にっぽん}|Japan",
            "国",
            "食べる{no_kana}",
            "eat",
        ];
        let (index, redirects) = convert_lines(&lines, &readings())?;

        let expected_index = [
            format!("猫\t<span class=\"pinyin_h\">ねこ</span>{}", meaning_p("<b>動物</b>、<b>ペット</b>")),
            format!("ねこ\t{}", meaning_p(r#"<p class="note">ひらがな</p>"#)),
            format!("日本\t<span class=\"pinyin_h\">にっぽん</span>{}", meaning_p("<b>国</b>")),
            format!("食べる\t{}", meaning_p("<b>eat</b>")),
        ]
        .join("\n");
        assert_eq!(index, expected_index);
        assert_eq!(redirects, "cat\t猫\nねこ\t猫\nJapan\t日本\nにっぽん\t日本");
        Ok(())
    }

    #[test]
    fn test_entry_count_matches_pairs() -> Result<()> {
        let lines = ["", "ねこ", "", "", "いぬ", "動物", "とり"];
        let converter = EntryConverter::new(ConverterConfig::default(), NoReading);
        let output = converter.convert(&lines, None)?;
        assert_eq!(output.index_lines.len(), 3);
        assert_eq!(output.index_lines[0], format!("ねこ\t{}", meaning_p("")));
        assert_eq!(output.index_lines[2], format!("とり\t{}", meaning_p("")));
        assert!(output.redirect_lines.is_empty());
        assert_eq!(output.redirect_text(), "");
        Ok(())
    }

    #[test]
    fn test_conversion_is_idempotent() -> Result<()> {
        let lines = ["猫|ねこ|cat", "動物", "日本", "国[note](島国)", "食べる", "[example](食べる)(to eat)"];
        let first = convert_lines(&lines, &readings())?;
        let second = convert_lines(&lines, &readings())?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_redirect_keys_map_to_their_own_headword() -> Result<()> {
        let lines = ["猫|cat", "a", "日本|Japan|ニッポン", "b", "ねこ|cat", "c"];
        let converter = EntryConverter::new(ConverterConfig::default(), readings());
        let output = converter.convert(&lines, None)?;
        let headwords: Vec<&str> = output
            .index_lines
            .iter()
            .filter_map(|line| line.split_once('\t').map(|(h, _)| h))
            .collect();
        for line in &output.redirect_lines {
            let (_, headword) = line.split_once('\t').unwrap();
            assert!(headwords.contains(&headword), "{}", line);
        }
        // Same key from two entries is kept twice
        assert_eq!(output.redirect_lines.iter().filter(|l| l.starts_with("cat\t")).count(), 2);
        Ok(())
    }

    #[test]
    fn test_malformed_headword_aborts_by_default() {
        let lines = ["猫", "a", "{ねこ}", "b"];
        let converter = EntryConverter::new(ConverterConfig::default(), readings());
        let err = converter.convert(&lines, None).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedHeadword { line_no: 3, .. }));
    }

    #[test]
    fn test_malformed_headword_can_be_skipped() -> Result<()> {
        let lines = ["猫", "a", "| ", "b", "ねこ", "c"];
        let config = ConverterConfig { skip_malformed_headwords: true, ..Default::default() };
        let converter = EntryConverter::new(config, readings());
        let output = converter.convert(&lines, None)?;
        assert_eq!(output.index_lines.len(), 2);
        assert_eq!(output.skipped_lines, [3]);
        Ok(())
    }

    #[test]
    fn test_missing_automatic_reading_is_logged_and_written() -> Result<()> {
        let lines = ["猫|cat", "a", "鳥", "b", "犬{いぬ}", "c"];
        let converter = EntryConverter::new(ConverterConfig::default(), NoReading);
        let output = converter.convert(&lines, None)?;
        assert_eq!(
            output.index_lines,
            [
                format!("猫\t{}", meaning_p("<b>a</b>")),
                format!("鳥\t{}", meaning_p("<b>b</b>")),
                format!("犬\t<span class=\"pinyin_h\">いぬ</span>{}", meaning_p("<b>c</b>")),
            ]
        );
        assert_eq!(output.redirect_lines, ["cat\t猫", "いぬ\t犬"]);
        assert_eq!(output.unread_lines, [1, 3]);
        Ok(())
    }

    #[test]
    fn test_missing_automatic_reading_fails_when_required() {
        let lines = ["猫", "a"];
        let config = ConverterConfig { require_readings: true, ..Default::default() };
        let err = EntryConverter::new(config, NoReading).convert(&lines, None).unwrap_err();
        assert!(matches!(err, ConvertError::ReadingUnavailable { .. }));
    }

    struct BrokenEngine;

    impl ReadingProvider for BrokenEngine {
        fn reading(&self, _: &str) -> Result<String> {
            Err(ConvertError::reading_engine("dictionary not loaded"))
        }
    }

    #[test]
    fn test_reading_engine_errors_always_abort() {
        let err = EntryConverter::new(ConverterConfig::default(), BrokenEngine)
            .convert(&["猫", "a"], None)
            .unwrap_err();
        assert!(matches!(err, ConvertError::ReadingEngine { .. }));
    }

    #[test]
    fn test_markup_warnings_are_counted() -> Result<()> {
        let lines = ["ねこ", "[note](a", "いぬ", "[example](b)"];
        let converter = EntryConverter::new(ConverterConfig::default(), NoReading);
        let output = converter.convert(&lines, None)?;
        assert_eq!(output.markup_warnings, 2);
        assert_eq!(output.warned_lines, [2, 4]);
        assert_eq!(output.index_lines.len(), 2);
        Ok(())
    }

    fn cancel_on_first_issue(state: &mut ProgressState) -> bool {
        state.issues > 0
    }

    #[test]
    fn test_progress_sees_problem_entries() {
        let lines = ["ねこ", "[note](a", "いぬ", "b", "とり", "c"];
        let converter = EntryConverter::new(ConverterConfig::default(), NoReading);
        let err = converter.convert(&lines, Some(cancel_on_first_issue)).unwrap_err();
        assert!(matches!(err, ConvertError::UserInterrupted { .. }));

        let lines = ["ねこ", "a", "いぬ", "b", "とり", "c"];
        assert!(converter.convert(&lines, Some(cancel_on_first_issue)).is_ok());
    }

    #[test]
    fn test_custom_reading_class_and_katakana_alias() -> Result<()> {
        let mut config = ConverterConfig::default();
        config.reading_css_class = "kana".to_string();
        config.headword.katakana_english_alias = true;
        let converter = EntryConverter::new(config, NoReading);
        let output = converter.convert(&["コーヒー|coffee", "飲み物"], None)?;
        assert_eq!(
            output.index_lines,
            [format!("コーヒー\t<span class=\"kana\">coffee</span>{}", meaning_p("<b>飲み物</b>"))]
        );
        assert_eq!(output.redirect_lines, ["coffee\tコーヒー"]);
        Ok(())
    }

    fn cancel_immediately(_: &mut ProgressState) -> bool {
        true
    }

    #[test]
    fn test_progress_reporter_can_cancel() {
        let lines = ["ねこ", "a"];
        let converter = EntryConverter::new(ConverterConfig::default(), NoReading);
        let err = converter.convert(&lines, Some(cancel_immediately)).unwrap_err();
        assert!(matches!(err, ConvertError::UserInterrupted { .. }));
    }

    #[test]
    fn test_config_from_json() {
        let config: ConverterConfig = serde_json::from_str(
            r#"{"alias_redirect_always": false, "reading": {"table": "readings.tsv"}, "reading_cache_size": 0, "require_readings": true}"#,
        )
        .unwrap();
        assert!(!config.headword.alias_redirect_always);
        assert!(!config.headword.katakana_english_alias);
        assert_eq!(config.reading, Some(ReadingSource::Table { table: "readings.tsv".into() }));
        assert_eq!(config.reading_cache_size, 0);
        assert!(config.require_readings);
        assert_eq!(config.reading_css_class, DEFAULT_READING_CSS_CLASS);

        let config: ConverterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ConverterConfig::default());
    }
}
