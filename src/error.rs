//! Unified error handling for modelprobe.
//!
//! Discovery and probe failures are converted into values (empty lists or
//! failed results) close to where they happen; this type carries them there.

use std::fmt;

/// Maximum length of an error description stored on a failed probe.
pub const MAX_ERROR_LEN: usize = 100;

/// Unified error type for gateway operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// Gateway answered with a non-200 status.
    Status(u16),
    /// The call did not complete within its timeout.
    Timeout,
    /// Connection or request failure.
    Transport(String),
    /// Response body could not be decoded.
    Parse(String),
    /// Report or marker file could not be written.
    Io(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Timeout => write!(f, "Timeout"),
            Self::Transport(msg) => write!(f, "{}", msg),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ProbeError {}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl ProbeError {
    /// Error string recorded on a failed probe: `HTTP <code>`, `Timeout`,
    /// or the description cut to [`MAX_ERROR_LEN`] characters.
    pub fn label(&self) -> String {
        match self {
            Self::Status(_) | Self::Timeout => self.to_string(),
            _ => truncate_chars(&self.to_string(), MAX_ERROR_LEN),
        }
    }
}

/// Cut a string to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
