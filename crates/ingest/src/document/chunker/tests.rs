//! Tests for streaming chunk extraction.

use troubledesk_core::config::ChunkingConfig;
use troubledesk_core::{PageText, UNKNOWN_SECTION};

use super::extract_chunks;

fn cfg(max_words: usize, min_chars: usize) -> ChunkingConfig {
    ChunkingConfig {
        max_words,
        min_chars,
        keywords: vec![
            "alarm".to_string(),
            "axis".to_string(),
            "motor".to_string(),
            "error".to_string(),
        ],
    }
}

fn page(page_number: usize, text: &str) -> PageText {
    PageText {
        page_number,
        text: text.to_string(),
    }
}

#[test]
fn content_before_any_heading_gets_sentinel_section() {
    let pages = [page(1, "The axis motor alarm clears after a controller reset cycle completes.")];
    let chunks = extract_chunks(&pages, &cfg(350, 20));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].section, UNKNOWN_SECTION);
}

#[test]
fn heading_tags_following_content_and_is_not_included() {
    let text = "ALARM LIST\nAlarm 21 means the axis encoder reported a motor fault condition.";
    let chunks = extract_chunks(&[page(1, text)], &cfg(350, 20));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].section, "ALARM LIST");
    assert!(!chunks[0].content.contains("ALARM LIST"));
    assert!(chunks[0].content.starts_with("Alarm 21"));
}

#[test]
fn heading_change_flushes_previous_section() {
    let text = "3.1 Homing Errors\n\
                The axis fails homing when the motor alarm is latched in memory.\n\
                3.2 Axis Calibration\n\
                Recalibrate the axis after any encoder error or gain adjustment.";
    let chunks = extract_chunks(&[page(1, text)], &cfg(350, 20));
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].section, "3.1 Homing Errors");
    assert_eq!(chunks[1].section, "3.2 Axis Calibration");
    assert!(chunks[0].content.contains("fails homing"));
    assert!(chunks[1].content.contains("Recalibrate"));
}

#[test]
fn section_continues_across_pages_without_new_heading() {
    // Page 1 ends mid-section, page 2 continues it: one chunk spanning both,
    // still tagged with the last heading seen.
    let pages = [
        page(1, "ALARM LIST\nAlarm 12 is an axis overtravel condition raised"),
        page(2, "when the motor passes the soft limit during a rapid move."),
    ];
    let chunks = extract_chunks(&pages, &cfg(350, 20));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].section, "ALARM LIST");
    assert_eq!(chunks[0].page_start, 1);
    assert_eq!(chunks[0].page_end, 2);
}

#[test]
fn no_emitted_chunk_reaches_the_word_limit() {
    // Lines of 4 words each; the accumulator must flush before any append
    // that would reach the 10-word limit.
    let line = "axis motor alarm error";
    let text = [line; 6].join("\n");
    let chunks = extract_chunks(&[page(1, &text)], &cfg(10, 1));
    assert!(!chunks.is_empty());
    for c in &chunks {
        assert!(
            c.content.split_whitespace().count() < 10,
            "chunk has {} words",
            c.content.split_whitespace().count()
        );
    }
}

#[test]
fn exact_threshold_still_flushes_first() {
    // Two 4-word lines against an 8-word limit: the second append would hit
    // the limit exactly, so the first flushes alone.
    let text = "axis motor alarm error\naxis motor alarm error";
    let chunks = extract_chunks(&[page(1, text)], &cfg(8, 1));
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].content.split_whitespace().count(), 4);
    assert_eq!(chunks[1].content.split_whitespace().count(), 4);
}

#[test]
fn short_candidates_are_dropped() {
    let chunks = extract_chunks(&[page(1, "axis alarm")], &cfg(350, 150));
    assert!(chunks.is_empty());
}

#[test]
fn candidates_without_keywords_are_dropped() {
    let text = "This long paragraph talks about scheduled lubrication intervals and \
                the recommended grease type for the way covers, nothing else.";
    let chunks = extract_chunks(&[page(1, text)], &cfg(350, 20));
    assert!(chunks.is_empty());
}

#[test]
fn keyword_match_is_case_insensitive() {
    let text = "MOTOR OVERLOAD conditions require a cooldown period before the drive \
                will accept a reset command from the panel.";
    let chunks = extract_chunks(&[page(1, text)], &cfg(350, 20));
    assert_eq!(chunks.len(), 1);
}

#[test]
fn heading_with_no_preceding_content_produces_nothing() {
    let text = "ALARM LIST\nTROUBLESHOOTING\nThe axis motor alarm indicates an encoder error on the servo bus.";
    let chunks = extract_chunks(&[page(1, text)], &cfg(350, 20));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].section, "TROUBLESHOOTING");
}

#[test]
fn emitted_chunks_satisfy_all_invariants() {
    let pages = [
        page(3, "2.1 Drive Faults\nMotor stalls raise alarm 40 when the axis load meter \
                 exceeds the overload threshold for more than two seconds."),
        page(4, "Check the gain parameter and the encoder cable before clearing the \
                 alarm and re-homing the axis from the reference switch."),
        page(5, "MAINTENANCE\nWipe the way covers weekly."),
    ];
    let config = cfg(30, 50);
    let chunks = extract_chunks(&pages, &config);
    assert!(!chunks.is_empty());
    for c in &chunks {
        assert!(c.content.len() >= config.min_chars);
        let lower = c.content.to_lowercase();
        assert!(config.keywords.iter().any(|k| lower.contains(k.as_str())));
        assert!(c.page_start <= c.page_end);
        assert!(c.page_start >= 3 && c.page_end <= 5);
    }
}

#[test]
fn empty_pages_produce_no_chunks() {
    let pages = [page(1, ""), page(2, "   \n\n  ")];
    assert!(extract_chunks(&pages, &cfg(350, 1)).is_empty());
}
