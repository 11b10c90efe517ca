//! Heading detection for manual-style section lines.
//!
//! Four independent low-recall, high-precision patterns. A missed heading
//! only files content under the previous section; a false positive only
//! starts a new section boundary. Both are acceptable.

use std::sync::LazyLock;

use regex::Regex;

/// One recognizer for a family of manual headings. Kept as tagged variants
/// (rather than a single monolithic pattern) so each can be tested alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingPattern {
    /// `3.2 Axis Calibration` — numeric outline prefix, then a capitalized
    /// word with at least 4 trailing characters.
    NumberedOutline,
    /// `CHAPTER 5 Spindle Drive` — literal CHAPTER marker.
    ChapterMarker,
    /// `ALARM LIST` — uppercase letters and spaces only, length >= 5.
    UppercaseBanner,
    /// `A. Safety Notes` — single capital, period, capitalized phrase.
    LetteredSection,
}

static NUMBERED_OUTLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.\d]*\s+[A-Z].{3,}$").unwrap());
static CHAPTER_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^CHAPTER\s+\w+.*$").unwrap());
static UPPERCASE_BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z ]{4,}$").unwrap());
static LETTERED_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\.\s+[A-Z].{3,}$").unwrap());

impl HeadingPattern {
    pub const ALL: [HeadingPattern; 4] = [
        HeadingPattern::NumberedOutline,
        HeadingPattern::ChapterMarker,
        HeadingPattern::UppercaseBanner,
        HeadingPattern::LetteredSection,
    ];

    /// Test `line` (already trimmed) against this pattern alone.
    pub fn matches(&self, line: &str) -> bool {
        match self {
            HeadingPattern::NumberedOutline => NUMBERED_OUTLINE.is_match(line),
            HeadingPattern::ChapterMarker => CHAPTER_MARKER.is_match(line),
            HeadingPattern::UppercaseBanner => UPPERCASE_BANNER.is_match(line),
            HeadingPattern::LetteredSection => LETTERED_SECTION.is_match(line),
        }
    }
}

/// True if the trimmed line matches any heading pattern.
pub fn is_heading(line: &str) -> bool {
    let line = line.trim();
    HeadingPattern::ALL.iter().any(|p| p.matches(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_outline_headings() {
        let p = HeadingPattern::NumberedOutline;
        assert!(p.matches("3.2 Axis Calibration"));
        assert!(p.matches("12 Spindle Overload Recovery"));
        assert!(p.matches("4.1.3 Homing Sequence"));
        assert!(!p.matches("3.2 ax")); // too short after the prefix
        assert!(!p.matches("3.2 lowercase heading"));
        assert!(!p.matches("see section 3.2 for details"));
    }

    #[test]
    fn chapter_marker_headings() {
        let p = HeadingPattern::ChapterMarker;
        assert!(p.matches("CHAPTER 5 Spindle Drive"));
        assert!(p.matches("CHAPTER FIVE"));
        assert!(!p.matches("Chapter 5")); // case-sensitive
        assert!(!p.matches("CHAPTER"));
    }

    #[test]
    fn uppercase_banner_headings() {
        let p = HeadingPattern::UppercaseBanner;
        assert!(p.matches("ALARM LIST"));
        assert!(p.matches("TROUBLESHOOTING"));
        assert!(!p.matches("ABCD")); // below length floor
        assert!(!p.matches("ALARM 21")); // digits break the banner
        assert!(!p.matches("Alarm List"));
    }

    #[test]
    fn lettered_section_headings() {
        let p = HeadingPattern::LetteredSection;
        assert!(p.matches("A. Safety Notes"));
        assert!(p.matches("B. Encoder Wiring"));
        assert!(!p.matches("A. ab")); // too short
        assert!(!p.matches("a. Safety Notes"));
        assert!(!p.matches("A Safety Notes"));
    }

    #[test]
    fn is_heading_trims_and_combines_patterns() {
        assert!(is_heading("  3.2 Axis Calibration  "));
        assert!(is_heading("ALARM LIST"));
        assert!(!is_heading("the motor stalls under load"));
        assert!(!is_heading(""));
    }

    #[test]
    fn classification_is_idempotent() {
        let lines = [
            "3.2 Axis Calibration",
            "ALARM LIST",
            "plain content line",
            "CHAPTER 2 Setup",
        ];
        for line in lines {
            let first = is_heading(line);
            for _ in 0..3 {
                assert_eq!(is_heading(line), first);
            }
        }
    }
}
