//! Reading a headword/meaning text source.
//!
//! The source alternates headword lines and meaning lines:
//!
//! ```text
//! 猫{ねこ}|cat
//! 小型の哺乳類、ペット[note](十二支には入らない)
//!
//! 犬
//! 忠実な動物
//! ```
//!
//! Blank lines between entries are ignored. A headword line is always
//! followed by its meaning line, even when that line is blank; a final
//! headword line without meaning gets an empty one.

use std::path::Path;

use log::debug;

use crate::utils::io_utils::{skip_utf8_bom, string_from_file};
use crate::Result;

/// One headword line and the meaning line that follows it, both trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawEntry {
    pub headword_line: String,
    pub meaning_line: String,
    /// 1-based source line of the headword
    pub line_no: u64,
}

/// Reads a UTF-8 source file into lines. Accepts `\n` and `\r\n` line ends.
pub fn read_source_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let source = string_from_file(path)?;
    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    debug!("Read {} source lines", lines.len());
    Ok(lines)
}

fn line_at<S: AsRef<str>>(lines: &[S], i: usize) -> &str {
    let line = lines[i].as_ref();
    if i == 0 { skip_utf8_bom(line) } else { line }
}

/// Groups source lines into headword/meaning pairs.
pub fn pair_lines<S: AsRef<str>>(lines: &[S]) -> Vec<RawEntry> {
    let mut entries = Vec::with_capacity(lines.len() / 2);
    let mut i = 0;
    while i < lines.len() {
        let headword_line = line_at(lines, i).trim();
        if headword_line.is_empty() {
            i += 1;
            continue;
        }
        let meaning_line = if i + 1 < lines.len() { line_at(lines, i + 1).trim() } else { "" };
        entries.push(RawEntry {
            headword_line: headword_line.to_string(),
            meaning_line: meaning_line.to_string(),
            line_no: i as u64 + 1,
        });
        i += 2;
    }
    entries
}
