//! Raw page text cleanup applied before line splitting.

use std::sync::LazyLock;

use regex::Regex;

static LEADER_DOTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{3,}").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
static WIDE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Normalize one page of extracted text.
///
/// Strips NUL bytes, collapses table-of-contents leader dots (3+) to a single
/// space, collapses blank-line runs to one newline, collapses runs of
/// horizontal whitespace to one space, and trims the result.
pub fn normalize(raw: &str) -> String {
    let text = raw.replace('\0', "");
    let text = LEADER_DOTS.replace_all(&text, " ");
    let text = BLANK_LINES.replace_all(&text, "\n");
    let text = WIDE_SPACES.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes() {
        assert_eq!(normalize("ax\0is\0"), "axis");
    }

    #[test]
    fn collapses_leader_dots() {
        assert_eq!(
            normalize("3.2 Axis Calibration......41"),
            "3.2 Axis Calibration 41"
        );
        // Two dots stay untouched (sentence ellipsis threshold is 3).
        assert_eq!(normalize("see 3.2..41"), "see 3.2..41");
    }

    #[test]
    fn collapses_blank_line_runs() {
        assert_eq!(normalize("one\n\ntwo\n \n\t\nthree"), "one\ntwo\nthree");
    }

    #[test]
    fn collapses_horizontal_whitespace_only() {
        // Runs of spaces/tabs shrink, but single newlines keep line structure.
        assert_eq!(normalize("a    b\t\tc\nd"), "a b c\nd");
    }

    #[test]
    fn trims_and_is_idempotent() {
        let once = normalize("  ALARM LIST\n\n\nreset the axis  ");
        assert_eq!(once, "ALARM LIST\nreset the axis");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\n  "), "");
    }
}
