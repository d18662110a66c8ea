//! Matcher settings and input shapes: visibility, optional and stacked
//! annotations, defaults and resource limits.

use morpha_graph::AnnotationList;
use morpha_tests::prelude::*;

mod visibility {
    use super::*;

    #[test]
    fn test_visible_boundary_blocks_sequence() {
        Scenario::new("visible_boundary")
            .pattern("[voice:+][voice:-]")
            .word("+#-")
            .step("blocked", Query::first(), |a| a.none())
            .run()
            .unwrap();
    }

    #[test]
    fn test_hidden_boundary_is_skipped() {
        Scenario::new("hidden_boundary")
            .pattern("[voice:+][voice:-]")
            .word("+#-")
            .settings(|p| MatcherSettings::new().with_annotation_types([p.seg]))
            .step("skipped", Query::first(), |a| a.span(0, 3))
            .run()
            .unwrap();
    }

    #[test]
    fn test_hidden_start_moves_to_next_visible() {
        Scenario::new("hidden_start")
            .pattern("[voice:-]")
            .word("+#-")
            .settings(|p| MatcherSettings::new().with_annotation_types([p.seg]))
            .step("starts_after_boundary", Query::at(1), |a| a.span(2, 3))
            .step("visible_start_unchanged", Query::at(0), |a| a.none())
            .run()
            .unwrap();
    }

    #[test]
    fn test_typed_constraint() {
        Scenario::new("typed")
            .pattern("[voice:+][@Bdry][voice:-]")
            .word("+#-+-")
            .step("boundary_consumed", Query::first(), |a| a.span(0, 3))
            .run()
            .unwrap();
    }
}

mod optional {
    use super::*;

    fn input(p: &Phonology) -> AnnotationList<u32> {
        [
            p.segment(0, &[("voice", &["+"])]),
            p.boundary(1).optional(),
            p.segment(2, &[("voice", &["-"])]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_optional_annotation_may_be_skipped() {
        Scenario::new("optional_skipped")
            .pattern("[voice:+][voice:-]")
            .input(input)
            .step("skipped", Query::first(), |a| a.span(0, 3))
            .run()
            .unwrap();
    }

    #[test]
    fn test_optional_annotation_may_be_consumed() {
        Scenario::new("optional_consumed")
            .pattern("[voice:+][@Bdry][voice:-]")
            .input(input)
            .step("consumed", Query::first(), |a| a.span(0, 3))
            .run()
            .unwrap();
    }
}

mod stacked {
    use super::*;

    fn input(p: &Phonology) -> AnnotationList<u32> {
        [
            p.segment(0, &[("voice", &["+"])]),
            p.segment(0, &[("voice", &["-"])]),
            p.segment(1, &[("voice", &["+"])]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_each_stacked_reading_is_tried() {
        Scenario::new("stacked")
            .pattern("[voice:-][voice:+]")
            .input(input)
            .step("second_reading", Query::first(), |a| a.span(0, 2))
            .step("not_from_first_reading", Query::at(0), |a| a.none())
            .step("from_second_reading", Query::at(1), |a| a.span(0, 2))
            .run()
            .unwrap();
    }

    #[test]
    fn test_successor_sees_every_reading() {
        Scenario::new("stacked_successors")
            .pattern("[voice:+]([voice:+]|[voice:-])")
            .input(|p| {
                [
                    p.segment(0, &[("voice", &["+"])]),
                    p.segment(1, &[("voice", &["+"])]),
                    p.segment(1, &[("voice", &["-"])]),
                ]
                .into_iter()
                .collect()
            })
            .step("two_paths", Query::all_at(0), |a| {
                a.spans(&[(0, 2), (0, 2)])
            })
            .run()
            .unwrap();
    }
}

mod defaults {
    use super::*;

    #[test]
    fn test_missing_feature_unifies_without_defaults() {
        Scenario::new("no_defaults")
            .pattern("[nasal:+]")
            .word("+")
            .step("matches", Query::first(), |a| a.span(0, 1))
            .run()
            .unwrap();
    }

    #[test]
    fn test_missing_feature_takes_default() {
        Scenario::new("defaults_reject")
            .pattern("[nasal:+]")
            .word("+")
            .settings(|_| MatcherSettings::new().with_defaults(true))
            .step("rejected", Query::first(), |a| a.none())
            .run()
            .unwrap();
        Scenario::new("defaults_accept")
            .pattern("[nasal:-]")
            .word("+")
            .settings(|_| MatcherSettings::new().with_defaults(true))
            .step("accepted", Query::first(), |a| a.span(0, 1))
            .run()
            .unwrap();
    }

    #[test]
    fn test_annotation_value_outranks_default() {
        // nasal defaults to '-', but the annotation says '+' and the
        // constraint does not mention nasal.
        let input = |p: &Phonology| -> AnnotationList<u32> {
            [p.segment(0, &[("voice", &["+"]), ("nasal", &["+"])])]
                .into_iter()
                .collect()
        };
        for use_defaults in [false, true] {
            Scenario::new(format!("nasal_annotation defaults={}", use_defaults))
                .pattern("[voice:+]")
                .input(input)
                .settings(move |_| MatcherSettings::new().with_defaults(use_defaults))
                .step("matches", Query::first(), |a| a.span(0, 1))
                .run()
                .unwrap();
        }
        Scenario::new("nasal_constraint_with_defaults")
            .pattern("[voice:+ nasal:+]")
            .input(input)
            .settings(|_| MatcherSettings::new().with_defaults(true))
            .step("matches", Query::first(), |a| a.span(0, 1))
            .run()
            .unwrap();
    }
}

mod subsumption {
    use super::*;

    fn subsumption() -> MatcherSettings {
        MatcherSettings::new().with_matching_method(MatchingMethod::Subsumption)
    }

    #[test]
    fn test_ambiguous_annotation_is_not_specific_enough() {
        Scenario::new("subsumption_ambiguous")
            .pattern("[voice:+]")
            .word("?+")
            .settings(|_| subsumption())
            .step("specific_only", Query::first(), |a| a.span(1, 2))
            .run()
            .unwrap();
        Scenario::new("unification_ambiguous")
            .pattern("[voice:+]")
            .word("?+")
            .step("both", Query::first(), |a| a.spans(&[(0, 1), (1, 2)]))
            .run()
            .unwrap();
    }

    #[test]
    fn test_missing_feature_needs_default() {
        Scenario::new("subsumption_missing")
            .pattern("[nasal:-]")
            .word("+")
            .settings(|_| subsumption())
            .step("rejected", Query::first(), |a| a.none())
            .run()
            .unwrap();
        Scenario::new("subsumption_default")
            .pattern("[nasal:-]")
            .word("+")
            .settings(|_| subsumption().with_defaults(true))
            .step("accepted", Query::first(), |a| a.span(0, 1))
            .run()
            .unwrap();
    }

    #[test]
    fn test_variables_agree_under_subsumption() {
        Scenario::new("subsumption_agreement")
            .pattern("[F:$v][F:$v]")
            .word("abb")
            .settings(|_| subsumption())
            .step("second_pair", Query::first(), |a| {
                a.span(1, 3).variable(0, "v", "F", &["b"])
            })
            .run()
            .unwrap();
    }
}

mod limits {
    use super::*;

    #[test]
    fn test_state_limit_is_reported() {
        Scenario::new("state_limit")
            .pattern("[voice:+][voice:-][voice:+]")
            .settings(|_| MatcherSettings::new().with_max_states(2))
            .step("rejected", Query::first(), |a| {
                a.error_matches(r"exceeded the limit of \d+ states")
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_parse_errors_surface() {
        Scenario::new("unknown_feature")
            .pattern("[tone:H]")
            .step("rejected", Query::first(), |a| {
                a.error_matches(r"line 1, column \d+: unknown feature 'tone'")
            })
            .run()
            .unwrap();
    }
}
