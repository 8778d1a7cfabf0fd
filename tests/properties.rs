use citation_extractor::cleaner::{clean, default_pipeline};
use proptest::prelude::*;

proptest! {
    // Running the default pipeline a second time over its own output must
    // be a no-op: every built-in cleaner is pure and idempotent on
    // already-cleaned text.
    #[test]
    fn cleaning_is_idempotent_over_arbitrary_text(
        text in "[a-zA-Z0-9 \\t\\n<>&;.,()\u{2018}\u{2019}\u{201C}\u{201D}\u{2013}\u{2014}_-]{0,200}"
    ) {
        let once = clean(&text, &default_pipeline()).unwrap();
        let twice = clean(&once.cleaned, &default_pipeline()).unwrap();
        prop_assert_eq!(once.cleaned, twice.cleaned);
    }

    // A run of word characters survives the default pipeline byte-for-byte
    // (no cleaner in the default set rewrites alphanumerics), so its
    // original-text offset must round-trip through the offset map exactly.
    #[test]
    fn word_marker_offset_round_trips(
        prefix in "[ \\t\\n]{0,10}",
        marker in "[a-zA-Z0-9]{1,12}",
        suffix in "[ \\t\\n]{0,10}",
    ) {
        let text = format!("{prefix}{marker}{suffix}");
        let result = clean(&text, &default_pipeline()).unwrap();
        prop_assert!(result.cleaned.contains(&marker));

        let original_pos = text.find(&marker).unwrap();
        let clean_pos = result.map.original_to_clean(original_pos);
        prop_assert_eq!(result.map.clean_to_original(clean_pos), original_pos);
    }

    // clean() never panics over arbitrary unicode input, and the built-in
    // pipeline (no Custom cleaner present) never fails.
    #[test]
    fn clean_never_fails_on_arbitrary_unicode(text in ".{0,300}") {
        prop_assert!(clean(&text, &default_pipeline()).is_ok());
    }
}
