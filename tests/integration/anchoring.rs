//! Creating selectors for proposed quotes and matching them back.

use quote_anchor::{
    compute_selector, match_quote, search, AnchorError, MatchContext, TextSelector,
};

const FOX: &str = "The quick brown fox jumps over the lazy dog";

const JOURNAL: &str = "I woke up tired again. I keep telling myself I'm not good enought to be \
loved, and then I scroll my phone for hours so I don't have to feel it. \
My sister called; I didn't pick up. Part of me wanted to, part of me was scared.";

#[test]
fn test_brown_fox_selector() {
    let selector = compute_selector(FOX, "brown fox", None).unwrap();

    assert_eq!(selector.exact, "brown fox");
    assert_eq!(selector.start_offset, 10);
    assert_eq!(selector.end_offset, 19);
    assert_eq!(selector.prefix, "The quick ");
    assert_eq!(selector.suffix, " jumps over the lazy dog");
}

#[test]
fn test_fuzzy_quote_with_typo() {
    let found = match_quote(
        JOURNAL,
        "not good enough to be loved",
        &MatchContext::default(),
    )
    .unwrap();

    assert_eq!(found.errors, 1);
    assert!(found.score > 0.5);
    assert_eq!(&JOURNAL[found.start..found.end], "not good enought to be loved");
}

#[test]
fn test_paraphrased_quote_is_skipped() {
    // A language model paraphrase rather than a quotation.
    let result = compute_selector(JOURNAL, "I feel unlovable and avoid my feelings", None);
    let err = result.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");
}

#[test]
fn test_empty_quote_never_matches() {
    for text in ["", FOX, JOURNAL] {
        assert_eq!(
            match_quote(text, "", &MatchContext::default()),
            Err(AnchorError::EmptyQuote)
        );
        assert_eq!(compute_selector(text, "", None), Err(AnchorError::EmptyQuote));
        assert_eq!(compute_selector(text, "", Some(3)), Err(AnchorError::EmptyQuote));
    }
}

#[test]
fn test_exact_quote_returned_verbatim() {
    let quote = "part of me was scared";
    let selector = compute_selector(JOURNAL, quote, None).unwrap();
    assert_eq!(selector.exact, quote);
    assert!(selector.verify(JOURNAL).is_ok());
    assert_eq!(&JOURNAL[selector.byte_range(JOURNAL).unwrap()], quote);
}

#[test]
fn test_repeated_quote_disambiguated_by_hint() {
    let first = compute_selector(JOURNAL, "of me", None).unwrap();
    let second_start = JOURNAL.rfind("of me").unwrap();
    let second = compute_selector(JOURNAL, "of me", Some(second_start)).unwrap();

    assert!(first.start_offset < second.start_offset);
    assert_eq!(second.start_offset, second_start);
    assert_ne!(first.prefix, second.prefix);
}

#[test]
fn test_error_cap_bounds_search() {
    let text: Vec<char> = "abcdefgh".chars().collect();

    // Four substitutions against an 8 character pattern: exactly at the cap.
    let at_cap: Vec<char> = "abcdWXYZ".chars().collect();
    assert!(!search(&text, &at_cap, quote_anchor::max_errors_for(8)).is_empty());

    // Five substitutions: one more than floor(8 / 2).
    let over_cap: Vec<char> = "abcVWXYZ".chars().collect();
    assert!(search(&text, &over_cap, quote_anchor::max_errors_for(8)).is_empty());
}

#[test]
fn test_context_beats_position_for_repeated_quote() {
    let text = "He said sorry. She said sorry too, and meant it.";
    let context = MatchContext::new()
        .with_prefix("She said ")
        .with_suffix(" too")
        .with_hint(0);

    let found = match_quote(text, "sorry", &context).unwrap();
    assert_eq!(found.start, 24);
}

#[test]
fn test_selector_json_matches_persisted_shape() {
    let selector = compute_selector(FOX, "lazy dog", None).unwrap();
    let json = serde_json::to_string(&selector).unwrap();
    assert!(json.contains("\"startOffset\":35"));
    assert!(json.contains("\"endOffset\":43"));

    let parsed: TextSelector = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, selector);
}
