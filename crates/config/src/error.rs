use std::fmt;

/// Error type for preference mutations.
///
/// Resolution never fails; only mutators and store initialization return
/// these.
#[derive(Debug)]
pub enum PrefsError {
    /// The mutation itself is invalid (unsetting the terminal global
    /// fallback, storing a value under the wrong category). Rejected before
    /// any state changes.
    Configuration(String),
    /// The durable write or read failed. On writes the in-memory store has
    /// already been updated; the caller decides whether to surface or retry.
    Persistence(String),
}

impl fmt::Display for PrefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::Persistence(msg) => write!(f, "persistence error: {msg}"),
        }
    }
}

impl std::error::Error for PrefsError {}
