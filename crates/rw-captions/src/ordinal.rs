//! Hierarchical figure ordinals (`2.1`, `3`, `1.4.2`).

use std::fmt;
use std::str::FromStr;

/// Dot-separated ordinal sequence.
///
/// The number of components is the nesting depth plus one.
///
/// # Example
///
/// ```
/// use rw_captions::Ordinal;
///
/// let ordinal: Ordinal = "2.1".parse().unwrap();
/// assert_eq!(ordinal.depth(), 1);
/// assert_eq!(ordinal.to_string(), "2.1");
/// assert_eq!(ordinal.id_suffix(), "2_1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ordinal(Vec<u32>);

/// Error returned when an ordinal string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ordinal '{0}'")]
pub struct ParseOrdinalError(String);

impl Ordinal {
    /// Create an ordinal from its components.
    ///
    /// Returns `None` for an empty sequence.
    #[must_use]
    pub fn new(parts: Vec<u32>) -> Option<Self> {
        if parts.is_empty() {
            None
        } else {
            Some(Self(parts))
        }
    }

    /// Ordinal of `count` ones (`1.1.1` for 3), the degenerate ordinal
    /// used when only a nesting level is known.
    ///
    /// Returns `None` when `count` is zero.
    #[must_use]
    pub fn ones(count: usize) -> Option<Self> {
        Self::new(vec![1; count])
    }

    /// Components of the ordinal.
    #[must_use]
    pub fn parts(&self) -> &[u32] {
        &self.0
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; an ordinal has at least one component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Zero-based nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    /// Components joined with underscores, for use in element ids.
    #[must_use]
    pub fn id_suffix(&self) -> String {
        self.join("_")
    }

    fn join(&self, sep: &str) -> String {
        self.0
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join("."))
    }
}

impl FromStr for Ordinal {
    type Err = ParseOrdinalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('.')
            .map(str::parse::<u32>)
            .collect::<Result<Vec<_>, _>>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ParseOrdinalError(s.to_owned()))
    }
}
