//! Group spans, capture numbering and pattern paths.

use morpha_pattern::{GroupKey, Matcher, PatternError};
use morpha_tests::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

mod named {
    use super::*;

    #[test]
    fn test_onset_and_nucleus() {
        Scenario::new("syllable")
            .pattern("(?<onset>[voice:-])(?<nucleus>[voice:+]+)")
            .word("-++")
            .step("both_groups", Query::first(), |a| {
                a.span(0, 3)
                    .group(0, "onset", Some((0, 1)))
                    .group(0, "nucleus", Some((1, 3)))
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_zero_length_group_is_absent() {
        Scenario::new("empty_group")
            .pattern("(?<x>[voice:+]*)[voice:-]")
            .word("-")
            .step("absent", Query::first(), |a| a.span(0, 1).group(0, "x", None))
            .run()
            .unwrap();
    }

    #[test]
    fn test_repeated_name_reports_last_occurrence() {
        Scenario::new("repeated_name")
            .pattern("(?<v>[voice:+])[voice:-](?<v>[voice:+])")
            .word("+-+")
            .step("last_wins", Query::first(), |a| a.group(0, "v", Some((2, 3))))
            .run()
            .unwrap();
    }
}

mod captures {
    use super::*;

    #[test]
    fn test_numbered_by_open_paren() {
        let scenario = |word: &str| {
            Scenario::new(format!("captures over {}", word))
                .pattern("([voice:-])(([voice:+])[voice:-])?")
                .word(word)
        };
        scenario("-")
            .step("optional_part_skipped", Query::first(), |a| {
                a.span(0, 1)
                    .capture(0, 1, Some((0, 1)))
                    .capture(0, 2, None)
                    .capture(0, 3, None)
            })
            .run()
            .unwrap();
        scenario("-+-")
            .step("optional_part_taken", Query::first(), |a| {
                a.span(0, 3)
                    .capture(0, 1, Some((0, 1)))
                    .capture(0, 2, Some((1, 3)))
                    .capture(0, 3, Some((1, 2)))
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_last_iteration_wins() {
        Scenario::new("iterated_capture")
            .pattern("([voice:+]|[voice:-])+")
            .word("+-+")
            .step("last_iteration", Query::first(), |a| {
                a.span(0, 3).capture(0, 1, Some((2, 3)))
            })
            .run()
            .unwrap();
    }
}

mod pattern_path {
    use super::*;

    #[test]
    fn test_top_level_name() {
        Scenario::new("named_pattern")
            .named("devoicing")
            .pattern("[voice:+][voice:-]")
            .word("+-")
            .step("path", Query::first(), |a| a.pattern_path(0, &["devoicing"]))
            .run()
            .unwrap();
    }

    #[test]
    fn test_unnamed_pattern_has_empty_path() {
        Scenario::new("unnamed_pattern")
            .pattern("[voice:+]")
            .word("+")
            .step("path", Query::first(), |a| a.pattern_path(0, &[]))
            .run()
            .unwrap();
    }
}

mod lookup {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_undefined_group_is_an_error() {
        // GIVEN a pattern without groups
        let phonology = Phonology::new();
        let pattern = phonology.parse("[voice:+]").unwrap();
        let matcher = Matcher::new(&phonology.system, &pattern, MatcherSettings::new()).unwrap();
        let found = matcher
            .find_match(&phonology.word("+"), MatchMode::First)
            .unwrap();

        // THEN lookups of unknown groups fail
        assert_eq!(
            found.try_group("x"),
            Err(PatternError::unknown_group(GroupKey::Named("x".to_string())))
        );
        assert!(found.capture(1).is_err());
    }

    #[test]
    #[should_panic(expected = "Unknown group 'x'")]
    fn test_undefined_group_panics() {
        let phonology = Phonology::new();
        let pattern = phonology.parse("[voice:+]").unwrap();
        let matcher = Matcher::new(&phonology.system, &pattern, MatcherSettings::new()).unwrap();
        let found = matcher
            .find_match(&phonology.word("+"), MatchMode::First)
            .unwrap();
        found.group("x");
    }
}

proptest! {
    #[test]
    fn prop_whole_pattern_capture_equals_match(word in "[+?-]{0,6}") {
        let phonology = Phonology::new();
        let pattern = phonology
            .parse("((?:[voice:+]|[voice:-][voice:-])+[voice:-]?)")
            .unwrap();
        let matcher = Matcher::new(&phonology.system, &pattern, MatcherSettings::new()).unwrap();
        let list = phonology.word(&word);

        for mode in [MatchMode::First, MatchMode::All] {
            for found in matcher.find_all_matches(&list, mode) {
                prop_assert_eq!(found.capture(1).unwrap(), Some(found.span()));
            }
        }
    }
}
