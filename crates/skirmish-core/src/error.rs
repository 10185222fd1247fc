//! Error types shared across the Skirmish workspace.

use std::error::Error;
use std::fmt;

/// An actor kind could not be resolved from user or file input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KindError {
    /// The text does not name a known kind.
    Unknown {
        /// The offending input, as given.
        input: String,
    },
    /// The numeric kind code is outside the known range.
    UnknownCode {
        /// The offending code.
        code: u8,
    },
}

impl fmt::Display for KindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { input } => write!(f, "unknown actor kind '{input}'"),
            Self::UnknownCode { code } => write!(f, "unknown actor kind code {code}"),
        }
    }
}

impl Error for KindError {}
