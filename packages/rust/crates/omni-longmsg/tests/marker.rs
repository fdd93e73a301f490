#![allow(missing_docs)]

use omni_longmsg::{BreakMarker, ChunkError, DEFAULT_BREAK_MARKER, split_by_marker};

#[test]
fn split_by_marker_splits_at_marker_when_budget_is_tight() {
    let marker = DEFAULT_BREAK_MARKER;
    let chunks = split_by_marker(&format!("A{marker}B"), 1, marker).unwrap();
    assert_eq!(chunks, vec!["A", "B"]);
}

#[test]
fn split_by_marker_without_marker_hard_splits() {
    let chunks = split_by_marker("ABCDE", 2, "").unwrap();
    assert_eq!(chunks, vec!["AB", "CD", "E"]);
}

#[test]
fn split_by_marker_rejects_zero_budget() {
    assert!(matches!(
        split_by_marker("text", 0, DEFAULT_BREAK_MARKER),
        Err(ChunkError::InvalidArgument(_))
    ));
}

#[test]
fn split_by_marker_of_empty_text_is_empty() {
    assert!(split_by_marker("", 10, "|").unwrap().is_empty());
}

#[test]
fn split_by_marker_packs_segments_greedily() {
    let chunks = split_by_marker("aa|bb|cc", 4, "|").unwrap();
    assert_eq!(chunks, vec!["aabb", "cc"]);

    let whole = split_by_marker("aa|bb|cc", 100, "|").unwrap();
    assert_eq!(whole, vec!["aabbcc"]);
}

#[test]
fn split_by_marker_flushes_pending_before_hard_split() {
    let chunks = split_by_marker("ab|cdefghij|k", 4, "|").unwrap();
    assert_eq!(chunks, vec!["ab", "cdef", "ghij", "k"]);
}

#[test]
fn split_by_marker_counts_chars_not_bytes() {
    let chunks = split_by_marker("日本語テキスト", 3, "").unwrap();
    assert_eq!(chunks, vec!["日本語", "テキス", "ト"]);
}

#[test]
fn split_by_marker_round_trips_text_without_markers() {
    let marker = DEFAULT_BREAK_MARKER;
    let text: String = (0..60)
        .map(|i| format!("paragraph {i} {}{marker}", "x".repeat(i % 17)))
        .collect();

    for max_len in [1, 7, 32, 100, 4096] {
        let chunks = split_by_marker(&text, max_len, marker).unwrap();
        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= max_len));
        assert!(chunks.iter().all(|chunk| !chunk.contains(marker)));
        assert_eq!(chunks.concat(), text.replace(marker, ""));
    }
}

#[test]
fn default_break_marker_is_three_zero_width_spaces() {
    let marker = BreakMarker::default();
    assert_eq!(marker.as_str(), "\u{200b}\u{200b}\u{200b}");
    assert_eq!(marker.to_string(), DEFAULT_BREAK_MARKER);
    assert!(!marker.is_empty());
    assert!(BreakMarker::new("").is_empty());
}
