//! Caption block argument parsing.
//!
//! The argument of a caption block may hold, in order:
//!
//! - a direction marker: `>` appends the caption, `<` prepends it,
//! - a number token: `1.2` is a manual number, `^2` a relative level,
//!
//! and nothing else. Leftover text fails validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::Ordinal;

static NUMBER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\^([1-9][0-9]*)|([1-9][0-9]*(?:\.[1-9][0-9]*)*))")
        .expect("invalid caption number regex")
});

/// Parsed caption block argument.
///
/// # Example
///
/// ```
/// use rw_captions::CaptionArgument;
///
/// let arg = CaptionArgument::parse("< 2.1", false).unwrap();
/// assert!(arg.prepend);
/// assert_eq!(arg.number.unwrap().to_string(), "2.1");
///
/// let arg = CaptionArgument::parse("^1", false).unwrap();
/// assert_eq!(arg.level, Some(1));
///
/// assert!(CaptionArgument::parse("2 extra", false).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionArgument {
    /// Insert the caption as the first child of the figure.
    pub prepend: bool,
    /// Manual number (`1.2`).
    pub number: Option<Ordinal>,
    /// Relative level override (`^2`).
    pub level: Option<usize>,
}

impl CaptionArgument {
    /// Parse a caption argument.
    ///
    /// `default_prepend` applies when no direction marker is present.
    /// Returns `None` when text other than the marker and number remains.
    #[must_use]
    pub fn parse(argument: &str, default_prepend: bool) -> Option<Self> {
        let mut parsed = Self {
            prepend: default_prepend,
            ..Self::default()
        };

        let mut rest = argument.trim();
        if let Some(stripped) = rest.strip_prefix('>') {
            parsed.prepend = false;
            rest = stripped.trim_start();
        } else if let Some(stripped) = rest.strip_prefix('<') {
            parsed.prepend = true;
            rest = stripped.trim_start();
        }

        if let Some(caps) = NUMBER_TOKEN.captures(rest) {
            let end = caps.get(0).map_or(0, |m| m.end());
            let after = &rest[end..];
            // The token must stand alone.
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                if let Some(level) = caps.get(1) {
                    parsed.level = Some(level.as_str().parse().ok()?);
                } else if let Some(number) = caps.get(2) {
                    let number: Ordinal = number.as_str().parse().ok()?;
                    // The counter must be able to step past every component.
                    if number.parts().contains(&u32::MAX) {
                        return None;
                    }
                    parsed.number = Some(number);
                }
                rest = after.trim_start();
            }
        }

        rest.is_empty().then_some(parsed)
    }
}
