//! Snapshot text handling: normalization, fingerprinting, and row counting.
//!
//! Everything here is pure; the poller composes these into one cycle.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Cheap content hash of normalized snapshot text.
///
/// Only meaningful for equality within one process lifetime. It is not
/// stable across Rust releases and must never be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A normalized CSV payload ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    text: String,
    fingerprint: Fingerprint,
}

impl Snapshot {
    /// Normalize raw feed text and fingerprint the result.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let text = normalize(raw);
        let fingerprint = fingerprint(&text);
        Self { text, fingerprint }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Number of data rows, excluding the header.
    #[must_use]
    pub fn signal_count(&self) -> usize {
        count_signals(&self.text)
    }
}

/// Strip every trailing `\r` and `\n`, then append exactly one `\n`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let trimmed = text.trim_end_matches(['\r', '\n']);
    let mut out = String::with_capacity(trimmed.len() + 1);
    out.push_str(trimmed);
    out.push('\n');
    out
}

#[must_use]
pub fn fingerprint(text: &str) -> Fingerprint {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    Fingerprint(hasher.finish())
}

/// Count non-blank lines minus the header row, floored at zero.
///
/// `\r\n`, a lone `\r`, and `\n` all end a line. The empty piece between
/// `\r` and `\n` is blank and drops out with the other blank lines.
#[must_use]
pub fn count_signals(text: &str) -> usize {
    text.split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .count()
        .saturating_sub(1)
}
