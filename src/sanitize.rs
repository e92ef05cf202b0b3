//! Extraction of single values from colored, chatty CLI output.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

/// CSI color and erase-line sequences.
static ANSI_CSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[mK]").expect("valid ANSI pattern"));

/// Whether a character ends a line, including bare carriage returns.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Remove SGR (`m`) and erase-line (`K`) escape sequences.
pub fn strip_ansi(raw: &str) -> Cow<'_, str> {
    ANSI_CSI.replace_all(raw, "")
}

/// Return the last line that is non-blank after stripping escapes, trimmed.
///
/// A bare carriage return also ends a line. Returns an empty string when every
/// line is blank.
pub fn last_meaningful_line(raw: &str) -> String {
    let cleaned = strip_ansi(raw);
    cleaned
        .split(is_line_break)
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
