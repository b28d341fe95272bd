//! Change detection and re-anchoring after journal edits.

use quote_anchor::{
    compute_content_hash, compute_selector, has_content_changed, reanchor_highlight, Anchorer,
    Highlight,
};

const ENTRY: &str = "Work was overwhelming today. My inner critic kept repeating \
that everything has to be perfect or I will be rejected. When I got home I \
ate dinner in front of the TV and felt numb.";

#[test]
fn test_round_trip_without_change() {
    for quote in ["inner critic", "everything has to be perfect", "felt numb"] {
        let selector = compute_selector(ENTRY, quote, None).unwrap();
        let anchor = reanchor_highlight(ENTRY, &selector).unwrap();
        assert_eq!(anchor, selector.anchor(), "quote {quote:?}");
    }
}

#[test]
fn test_unrelated_insertions_shift_offsets() {
    let quote = "everything has to be perfect";
    let selector = compute_selector(ENTRY, quote, None).unwrap();

    let insert = "Note to self: breathe. ";
    let edited = format!("{insert}{ENTRY} (Edited later.)");
    let anchor = reanchor_highlight(&edited, &selector).unwrap();

    assert_eq!(anchor.start_offset, selector.start_offset + insert.len());
    assert_eq!(anchor.end_offset, selector.end_offset + insert.len());
    assert_eq!(&edited[anchor.start_offset..anchor.end_offset], quote);
}

#[test]
fn test_emoji_insertion_shifts_by_utf16_units() {
    let quote = "inner critic";
    let selector = compute_selector(ENTRY, quote, None).unwrap();

    let edited = format!("😞 {ENTRY}");
    let anchor = reanchor_highlight(&edited, &selector).unwrap();
    assert_eq!(anchor.start_offset, selector.start_offset + 3);

    // What a JavaScript client slicing the stored offsets would see.
    let units: Vec<u16> = edited.encode_utf16().collect();
    let seen = String::from_utf16(&units[anchor.start_offset..anchor.end_offset]).unwrap();
    assert_eq!(seen, quote);
}

#[test]
fn test_small_edit_inside_quote_still_anchors() {
    let selector = compute_selector(ENTRY, "everything has to be perfect", None).unwrap();
    let edited = ENTRY.replace("has to be perfect", "has to be perfekt");

    let anchor = reanchor_highlight(&edited, &selector).unwrap();
    assert_eq!(
        &edited[anchor.start_offset..anchor.end_offset],
        "everything has to be perfekt"
    );
}

#[test]
fn test_digest_flags_edit() {
    let stored = compute_content_hash(ENTRY);
    assert!(!has_content_changed(ENTRY, &stored));

    let edited = ENTRY.replace("numb", "calm");
    assert!(has_content_changed(&edited, &stored));
}

#[test]
fn test_refresh_pass_over_document_highlights() {
    let anchorer = Anchorer::default();
    let stored = compute_content_hash(ENTRY);
    let mut highlights: Vec<Highlight> = ["inner critic", "felt numb", "in front of the TV"]
        .iter()
        .enumerate()
        .map(|(i, quote)| {
            let selector = anchorer.compute_selector(ENTRY, quote, None).unwrap();
            Highlight::new(format!("h{i}"), "entry-7", "analysis-3", selector)
        })
        .collect();

    let edited = ENTRY
        .replace("Work was overwhelming today.", "Work was a lot.")
        .replace(" in front of the TV", "");

    let report = anchorer.refresh_highlights(&edited, Some(stored.as_str()), &mut highlights);

    assert!(report.content_changed);
    assert_eq!(report.content_hash, compute_content_hash(&edited));
    assert_eq!(report.relocated, 2);
    assert_eq!(report.failed, vec!["h2".to_string()]);

    for highlight in &highlights[..2] {
        assert!(!highlight.is_stale);
        assert!(highlight.selector.verify(&edited).is_ok());
    }
    assert!(highlights[2].is_stale);
}
