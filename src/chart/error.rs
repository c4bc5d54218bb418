//! Error types for chart URL decoding.

use std::fmt;

/// An error that occurred while decoding a chart URL.
///
/// Only the URL envelope can fail: once a chord body exists, the
/// unscrambler, tokenizer and builder are all best-effort and never error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The URL payload did not contain the minimum required fields
    /// (a title and a chord body).
    MalformedChartUrl(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MalformedChartUrl(msg) => {
                write!(f, "malformed chart url: {msg}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}
