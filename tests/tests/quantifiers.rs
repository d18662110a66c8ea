//! Quantifier boundaries, checked with both anchors set so a match must
//! cover the whole word.

use morpha_tests::prelude::*;

fn whole_word(pattern: &str, word: &str) -> Scenario {
    Scenario::new(format!("{} over {}", pattern, word))
        .pattern(pattern)
        .word(word)
        .settings(|_| {
            MatcherSettings::new()
                .with_anchored_to_start(true)
                .with_anchored_to_end(true)
        })
}

mod optional {
    use super::*;

    #[test]
    fn test_zero_repetitions_accepted() {
        whole_word("[voice:-][voice:+]?", "-")
            .step("match", Query::first(), |a| a.span(0, 1))
            .run()
            .unwrap();
    }

    #[test]
    fn test_one_repetition_accepted() {
        whole_word("[voice:-][voice:+]?", "-+")
            .step("match", Query::first(), |a| a.span(0, 2))
            .run()
            .unwrap();
    }

    #[test]
    fn test_two_repetitions_rejected() {
        whole_word("[voice:-][voice:+]?", "-++")
            .step("no_match", Query::first(), |a| a.none())
            .run()
            .unwrap();
    }
}

mod one_or_more {
    use super::*;

    #[test]
    fn test_zero_repetitions_rejected() {
        whole_word("[voice:-][voice:+]+", "-")
            .step("no_match", Query::first(), |a| a.none())
            .run()
            .unwrap();
    }

    #[test]
    fn test_many_repetitions_accepted() {
        whole_word("[voice:-][voice:+]+", "-+++")
            .step("match", Query::first(), |a| a.span(0, 4))
            .run()
            .unwrap();
    }
}

mod zero_or_more {
    use super::*;

    #[test]
    fn test_zero_repetitions_at_end_of_input() {
        whole_word("[voice:-][voice:+]*", "-")
            .step("match", Query::first(), |a| a.span(0, 1))
            .run()
            .unwrap();
    }

    #[test]
    fn test_greedy_then_empty_tail() {
        Scenario::new("greedy_star")
            .pattern("[voice:+]*")
            .word("++-")
            .step("greedy_then_empty", Query::first(), |a| {
                a.spans(&[(0, 2), (2, 2)])
            })
            .step("every_start_and_length", Query::all(), |a| {
                a.spans(&[(0, 2), (0, 1), (0, 0), (1, 2), (1, 1), (2, 2)])
            })
            .run()
            .unwrap();
    }
}

mod bounded {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let pattern = "[voice:+]{2,3}";
        whole_word(pattern, "+")
            .step("too_few", Query::first(), |a| a.none())
            .run()
            .unwrap();
        whole_word(pattern, "++")
            .step("minimum", Query::first(), |a| a.span(0, 2))
            .run()
            .unwrap();
        whole_word(pattern, "+++")
            .step("maximum", Query::first(), |a| a.span(0, 3))
            .run()
            .unwrap();
        whole_word(pattern, "++++")
            .step("too_many", Query::first(), |a| a.none())
            .run()
            .unwrap();
    }

    #[test]
    fn test_exact_count() {
        whole_word("[voice:+]{2}", "++")
            .step("exact", Query::first(), |a| a.span(0, 2))
            .run()
            .unwrap();
        whole_word("[voice:+]{2}", "+++")
            .step("one_too_many", Query::first(), |a| a.none())
            .run()
            .unwrap();
    }

    #[test]
    fn test_open_range() {
        whole_word("[voice:+]{2,}", "+++++")
            .step("unbounded", Query::first(), |a| a.span(0, 5))
            .run()
            .unwrap();
    }

    #[test]
    fn test_inverted_range_is_a_parse_error() {
        Scenario::new("inverted")
            .pattern("[voice:+]{3,1}")
            .step("rejected", Query::first(), |a| {
                a.error("quantifier maximum 1 is below minimum 3")
            })
            .run()
            .unwrap();
    }
}
