//! Error types and result type for the txt2mdx crate.
//!
//! This module defines all error variants that can occur while converting a
//! headword/meaning text source. It uses the `snafu` library for ergonomic
//! error handling with automatic backtrace capture.
//!
//! # Examples
//!
//! ```
//! use txt2mdx::{ConvertError, Result};
//!
//! fn load_source() -> Result<String> {
//!     Err(ConvertError::invalid_parameter("Input path cannot be empty"))
//! }
//!
//! match load_source() {
//!     Ok(data) => println!("Loaded: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! # Error Variants
//!
//! - [`ConvertError::Io`]: I/O errors from reading the source or writing outputs
//! - [`ConvertError::ParserError`]: Configuration (JSON) parsing errors
//! - [`ConvertError::MalformedHeadword`]: A headword line with no usable headword
//! - [`ConvertError::ReadingUnavailable`]: No phonetic reading could be produced
//! - [`ConvertError::ReadingEngine`]: The reading engine failed to load or run

use std::io;
use snafu::{Snafu, Backtrace};

// Re-export snafu for context providers
pub use snafu;

/// Main error type for the txt2mdx crate.
///
/// All errors include automatic backtrace capture for debugging purposes.
/// Use the helper methods on `ConvertError` for convenient error construction.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConvertError {
    /// I/O error occurred during file operations.
    #[snafu(display("IO error: {source}"))]
    Io {
        source: io::Error,
        backtrace: Backtrace,
    },

    /// Error parsing JSON configuration or a reading table.
    #[snafu(display("Parser error: {source}"))]
    ParserError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        backtrace: Backtrace,
    },

    /// Function was called with invalid parameters.
    #[snafu(display("Invalid parameter: {message}"))]
    InvalidParameter {
        message: String,
        backtrace: Backtrace,
    },

    /// A headword line yielded an empty canonical headword.
    #[snafu(display("Malformed headword at line {line_no}: {raw:?}"))]
    MalformedHeadword {
        line_no: u64,
        raw: String,
        backtrace: Backtrace,
    },

    /// The reading service has no reading for the given text.
    #[snafu(display("No reading available for: {text}"))]
    ReadingUnavailable {
        text: String,
        backtrace: Backtrace,
    },

    /// The morphological analyser backing the reading service failed.
    #[snafu(display("Reading engine error: {message}"))]
    ReadingEngine {
        message: String,
        backtrace: Backtrace,
    },

    /// Operation was interrupted by user.
    #[snafu(display("User interrupted"))]
    UserInterrupted {
        backtrace: Backtrace,
    },
}

impl From<io::Error> for ConvertError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, backtrace: Backtrace::capture() }
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(source: serde_json::Error) -> Self {
        Self::ParserError {
            source: Box::new(source),
            backtrace: Backtrace::capture(),
        }
    }
}

impl From<std::string::FromUtf8Error> for ConvertError {
    fn from(source: std::string::FromUtf8Error) -> Self {
        Self::ParserError {
            source: Box::new(source),
            backtrace: Backtrace::capture(),
        }
    }
}

/// Helper methods for creating errors without context providers.
impl ConvertError {
    /// Creates an `InvalidParameter` error with the given message.
    ///
    /// # Examples
    ///
    /// ```
    /// use txt2mdx::ConvertError;
    ///
    /// let error = ConvertError::invalid_parameter("Path cannot be empty");
    /// ```
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `MalformedHeadword` error for the given source line.
    pub fn malformed_headword<S: Into<String>>(line_no: u64, raw: S) -> Self {
        Self::MalformedHeadword {
            line_no,
            raw: raw.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `ReadingUnavailable` error for the given text.
    pub fn reading_unavailable<S: Into<String>>(text: S) -> Self {
        Self::ReadingUnavailable {
            text: text.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `ReadingEngine` error with the given message.
    pub fn reading_engine<S: Into<String>>(message: S) -> Self {
        Self::ReadingEngine {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `UserInterrupted` error.
    pub fn user_interrupted() -> Self {
        Self::UserInterrupted {
            backtrace: Backtrace::capture(),
        }
    }

    /// Checks if this error is a `MalformedHeadword` variant.
    pub fn is_malformed_headword(&self) -> bool {
        matches!(self, ConvertError::MalformedHeadword { .. })
    }

    /// Checks if this error is a `ReadingUnavailable` variant.
    pub fn is_reading_unavailable(&self) -> bool {
        matches!(self, ConvertError::ReadingUnavailable { .. })
    }
}

/// A specialized `Result` type for txt2mdx operations.
///
/// This is a convenience type alias that uses [`ConvertError`] as the error type.
pub type Result<T> = std::result::Result<T, ConvertError>;
