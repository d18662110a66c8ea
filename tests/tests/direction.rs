//! Right-to-left traversal.

use morpha_tests::prelude::*;

fn rtl() -> MatcherSettings {
    MatcherSettings::new().with_direction(Direction::RightToLeft)
}

#[test]
fn test_scan_starts_from_the_right() {
    Scenario::new("rtl_scan")
        .pattern("[voice:+][voice:+]")
        .word("+++")
        .settings(|_| rtl())
        .step("rightmost_pair", Query::first(), |a| a.span(1, 3))
        .run()
        .unwrap();
    Scenario::new("ltr_scan")
        .pattern("[voice:+][voice:+]")
        .word("+++")
        .step("leftmost_pair", Query::first(), |a| a.span(0, 2))
        .run()
        .unwrap();
}

#[test]
fn test_sequence_keeps_left_to_right_order() {
    Scenario::new("rtl_sequence")
        .pattern("[voice:+][voice:-]")
        .word("+-+-")
        .settings(|_| rtl())
        .step("both_pairs_right_first", Query::first(), |a| {
            a.spans(&[(2, 4), (0, 2)])
        })
        .run()
        .unwrap();
}

#[test]
fn test_group_spans_are_absolute() {
    Scenario::new("rtl_groups")
        .pattern("(?<a>[voice:+])(?<b>[voice:-]+)")
        .word("+--")
        .settings(|_| rtl())
        .step("groups", Query::first(), |a| {
            a.span(0, 3)
                .group(0, "a", Some((0, 1)))
                .group(0, "b", Some((1, 3)))
        })
        .run()
        .unwrap();
}

#[test]
fn test_anchors_follow_traversal() {
    // The traversal starts at the right edge and ends at the left edge.
    Scenario::new("rtl_anchored_start")
        .pattern("[voice:+]")
        .word("++")
        .settings(|_| rtl().with_anchored_to_start(true))
        .step("right_edge_only", Query::first(), |a| a.span(1, 2))
        .run()
        .unwrap();
    Scenario::new("rtl_anchored_end")
        .pattern("[voice:+]")
        .word("++")
        .settings(|_| rtl().with_anchored_to_end(true))
        .step("left_edge_only", Query::first(), |a| a.span(0, 1))
        .run()
        .unwrap();
}

#[test]
fn test_explicit_margins_are_absolute() {
    Scenario::new("rtl_margin")
        .pattern("^[voice:+]")
        .word("++")
        .settings(|_| rtl())
        .step("left_margin", Query::first(), |a| a.span(0, 1))
        .run()
        .unwrap();
}
