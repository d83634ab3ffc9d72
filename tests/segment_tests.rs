//! Segmentation and Deduplication Tests

use zimcorpus::config::Config;
use zimcorpus::segment::{normalize, DedupSet, Segmenter};

// =============================================================================
// Boundary Tests
// =============================================================================

#[test]
fn test_abbreviations_do_not_split() {
    let config = Config::builder()
        .abbreviations(["dr.", "p.m."])
        .build();
    let segmenter = Segmenter::new(&config);

    let sentences = segmenter.segment("Dr. Smith went home. He left at 5 p.m. sharp.");
    assert_eq!(
        sentences,
        vec!["Dr. Smith went home.", "He left at 5 p.m. sharp."]
    );
}

#[test]
fn test_default_abbreviation_list_covers_common_cases() {
    let segmenter = Segmenter::new(&Config::default());
    let sentences =
        segmenter.segment("The meeting ran until 9 p.m. on Friday. Everyone left afterwards.");
    assert_eq!(
        sentences,
        vec![
            "The meeting ran until 9 p.m. on Friday.",
            "Everyone left afterwards."
        ]
    );
}

#[test]
fn test_exclamation_and_question_terminate() {
    let segmenter = Segmenter::new(&Config::default());
    let sentences = segmenter.segment("What a surprise this was! Nobody expected it at all.");
    assert_eq!(
        sentences,
        vec!["What a surprise this was!", "Nobody expected it at all."]
    );
}

#[test]
fn test_terminator_at_end_of_unit() {
    let segmenter = Segmenter::new(&Config::default());
    let sentences = segmenter.segment("A single sentence with no continuation.");
    assert_eq!(sentences, vec!["A single sentence with no continuation."]);
}

// =============================================================================
// Acceptance Tests
// =============================================================================

#[test]
fn test_length_bounds_are_configurable() {
    let config = Config::builder()
        .min_sentence_chars(30)
        .max_sentence_chars(60)
        .build();
    let segmenter = Segmenter::new(&config);

    assert!(segmenter.segment("Too short to keep.").is_empty());
    assert_eq!(
        segmenter
            .segment("This one is comfortably inside the bounds.")
            .len(),
        1
    );
    let long = format!("This one rambles on {} and never stops.", "and on ".repeat(12));
    assert!(segmenter.segment(&long).is_empty());
}

#[test]
fn test_markup_leftovers_are_rejected() {
    let segmenter = Segmenter::new(&Config::default());
    assert!(segmenter.segment("[citation needed] said nobody ever.").is_empty());
    assert!(segmenter.segment("| align=center | leftover table row.").is_empty());
}

#[test]
fn test_requires_alphabetic_content() {
    let segmenter = Segmenter::new(&Config::default());
    assert!(segmenter.segment("1234 5678 9012 3456.").is_empty());
}

// =============================================================================
// Deduplication Tests
// =============================================================================

#[test]
fn test_dedup_is_run_scoped_and_first_wins() {
    let mut dedup = DedupSet::new();
    assert!(dedup.insert("The Nile flows north."));
    // Same sentence from a different article later in the run
    assert!(!dedup.insert("The Nile flows north."));
    assert!(!dedup.insert("the nile   flows north."));
    assert!(dedup.insert("The Nile flows south."));
    assert_eq!(dedup.len(), 2);
}

#[test]
fn test_normalize_preserves_nothing_but_content() {
    assert_eq!(normalize("  A  Sentence\tHere. "), "a sentence here.");
}
