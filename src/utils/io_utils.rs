//! I/O utility functions for source and output files.
//!
//! This module provides helper functions for:
//! - Reading UTF-8 text sources (with or without a byte order mark)
//! - Writing output files atomically through sibling temporary files
//!
//! # Examples
//!
//! ```no_run
//! use txt2mdx::utils::io_utils::{string_from_file, write_files_atomically};
//!
//! let source = string_from_file("dictionary.txt").unwrap();
//! write_files_atomically(&[("index.txt", source.as_bytes())]).unwrap();
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::Result;

/// Strips a leading UTF-8 byte order mark.
pub fn skip_utf8_bom(text: &str) -> &str {
    // UTF-8 BOM is 0xEF 0xBB 0xBF which appears as \u{FEFF} in UTF-8
    text.strip_prefix('\u{FEFF}').unwrap_or(text)
}

/// Reads a whole UTF-8 file into a string, dropping a leading BOM.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn string_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    let text = String::from_utf8(buffer)?;
    if text.starts_with('\u{FEFF}') {
        Ok(skip_utf8_bom(&text).to_string())
    } else {
        Ok(text)
    }
}

fn temporary_path_for(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().map(OsString::from).unwrap_or_default();
    file_name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(file_name)
}

fn write_temporary(path: &Path, data: &[u8]) -> Result<()> {
    debug!("Writing {} bytes to {}", data.len(), path.display());
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(data)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// Writes several files as one unit.
///
/// Every file is first written to a temporary file next to its destination.
/// Only when all of them were written are they renamed into place, so a
/// failure leaves no destination half-written and removes the temporaries.
pub fn write_files_atomically<P: AsRef<Path>>(files: &[(P, &[u8])]) -> Result<()> {
    let tmp_paths: Vec<PathBuf> = files.iter().map(|(path, _)| temporary_path_for(path.as_ref())).collect();
    let remove_all = |paths: &[PathBuf]| {
        for tmp in paths {
            let _ = fs::remove_file(tmp);
        }
    };

    for ((_, data), tmp) in files.iter().zip(&tmp_paths) {
        if let Err(e) = write_temporary(tmp, data) {
            remove_all(&tmp_paths);
            return Err(e);
        }
    }
    for (n, ((path, _), tmp)) in files.iter().zip(&tmp_paths).enumerate() {
        if let Err(e) = fs::rename(tmp, path.as_ref()) {
            remove_all(&tmp_paths[n..]);
            return Err(e.into());
        }
    }
    Ok(())
}
