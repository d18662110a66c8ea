//! The reference matching scenarios.

use morpha_tests::prelude::*;

mod sequence {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("sequence")
            .pattern("[voice:+][voice:-]")
            .word("+-+")
            .step("scan_finds_one_match", Query::first(), |a| a.span(0, 2))
            .step("scan_all_finds_one_match", Query::all(), |a| a.span(0, 2))
            .step("nothing_starts_at_second", Query::at(1), |a| a.none())
            .step("nothing_starts_at_third", Query::at(2), |a| a.none())
    }

    #[test]
    fn test_voiced_then_voiceless() {
        scenario().run().unwrap();
    }
}

mod ambiguity {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("ambiguity")
            .pattern("(?<a>[voice:+])|(?<b>[voice:-])")
            .word("?")
            .step("all_mode_returns_one_per_branch", Query::all_at(0), |a| {
                a.count(2)
                    .group(0, "a", Some((0, 1)))
                    .group(0, "b", None)
                    .group(1, "a", None)
                    .group(1, "b", Some((0, 1)))
            })
            .step("first_mode_returns_first_branch", Query::at(0), |a| {
                a.count(1).group(0, "a", Some((0, 1)))
            })
            .step("scan_all_matches", Query::all(), |a| a.spans(&[(0, 1), (0, 1)]))
    }

    #[test]
    fn test_ambiguous_segment_matches_both_branches() {
        scenario().run().unwrap();
    }
}

mod agreement {
    use super::*;

    pub fn disagreeing() -> Scenario {
        Scenario::new("agreement_disagreeing")
            .pattern("[F:$v][F:$v]")
            .word("ab")
            .step("rejected", Query::first(), |a| a.none())
    }

    pub fn agreeing() -> Scenario {
        Scenario::new("agreement_agreeing")
            .pattern("[F:$v][F:$v]")
            .word("bb")
            .step("accepted_with_binding", Query::first(), |a| {
                a.span(0, 2).variable(0, "v", "F", &["b"])
            })
    }

    pub fn disagreement_marker() -> Scenario {
        Scenario::new("agreement_negated")
            .pattern("[F:$v][F:!$v]")
            .word("abaa")
            .step("only_differing_pair", Query::first(), |a| {
                a.span(0, 2).variable(0, "v", "F", &["a"])
            })
    }

    pub fn seeded() -> Scenario {
        Scenario::new("agreement_seeded")
            .pattern("[F:$v][F:$v]")
            .word("aabb")
            .bindings(|p| VariableBindings::with("v", p.value("F", &["b"])))
            .step("only_pair_agreeing_with_seed", Query::first(), |a| {
                a.span(2, 4).variable(0, "v", "F", &["b"])
            })
            .step("seed_rejects_first_pair", Query::at(0), |a| a.none())
    }

    #[test]
    fn test_shared_variable_rejects_disagreement() {
        disagreeing().run().unwrap();
    }

    #[test]
    fn test_shared_variable_binds_agreeing_value() {
        agreeing().run().unwrap();
    }

    #[test]
    fn test_seeded_binding_rejects_otherwise_matching_pair() {
        seeded().run().unwrap();
    }

    #[test]
    fn test_negated_variable_requires_difference() {
        disagreement_marker().run().unwrap();
    }
}
