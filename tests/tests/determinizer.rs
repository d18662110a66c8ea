//! Properties of the determinized automaton over generated patterns.

use morpha_compiler::{ArcLabel, Automaton, CompileSettings, ConditionId};
use morpha_core::{Direction, Span};
use morpha_feature::{FeatureStruct, Unifier};
use morpha_graph::Annotation;
use morpha_parser::{Pattern, PatternNode};
use morpha_tests::Phonology;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Shape {
    Leaf(usize),
    Alt(Vec<Shape>),
    Seq(Vec<Shape>),
    Optional(Box<Shape>),
    Star(Box<Shape>),
    Plus(Box<Shape>),
}

const LEAVES: usize = 7;

fn leaf(p: &Phonology, index: usize) -> PatternNode {
    match index {
        0 => PatternNode::constraint(p.seg, p.fs(&[("voice", &["+"])])),
        1 => PatternNode::constraint(p.seg, p.fs(&[("voice", &["-"])])),
        2 => PatternNode::constraint(p.seg, p.fs(&[("place", &["lab"])])),
        3 => PatternNode::constraint(p.seg, p.fs(&[("place", &["cor", "dor"])])),
        4 => PatternNode::constraint(p.seg, p.fs(&[("voice", &["+"]), ("place", &["lab"])])),
        5 => PatternNode::constraint(p.seg, FeatureStruct::new()),
        _ => PatternNode::constraint(p.bdry, FeatureStruct::new()),
    }
}

fn build(p: &Phonology, shape: &Shape) -> PatternNode {
    match shape {
        Shape::Leaf(i) => leaf(p, *i),
        Shape::Alt(branches) => PatternNode::alternation(branches.iter().map(|s| build(p, s))),
        Shape::Seq(children) => PatternNode::sequence(children.iter().map(|s| build(p, s))),
        Shape::Optional(child) => PatternNode::optional(build(p, child)),
        Shape::Star(child) => PatternNode::zero_or_more(build(p, child)),
        Shape::Plus(child) => PatternNode::one_or_more(build(p, child)),
    }
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    (0..LEAVES).prop_map(Shape::Leaf).prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..=3).prop_map(Shape::Alt),
            prop::collection::vec(inner.clone(), 1..=3).prop_map(Shape::Seq),
            inner.clone().prop_map(|s| Shape::Optional(Box::new(s))),
            inner.clone().prop_map(|s| Shape::Star(Box::new(s))),
            inner.prop_map(|s| Shape::Plus(Box::new(s))),
        ]
    })
}

/// Every segment shape the fixture can express, plus a boundary.
fn inputs(p: &Phonology) -> Vec<Annotation<u32>> {
    let voices: [&[&str]; 3] = [&["+"], &["-"], &["+", "-"]];
    let places: [&[&str]; 3] = [&["lab"], &["cor"], &["lab", "dor"]];
    let mut out = vec![p.boundary(0), p.segment(0, &[])];
    for voice in voices {
        out.push(p.segment(0, &[("voice", voice)]));
        for place in places {
            out.push(p.segment(0, &[("voice", voice), ("place", place)]));
        }
    }
    out.push(Annotation::new(
        p.seg,
        Span::new(0, 1),
        p.fs(&[("place", &["dor"])]),
    ));
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_transitions_are_exclusive_and_complete(shape in arb_shape()) {
        let p = Phonology::new();
        let pattern = Pattern::new([build(&p, &shape)]);
        let automaton = Automaton::compile(
            &pattern,
            Direction::LeftToRight,
            &p.system,
            &CompileSettings::default(),
        )
        .unwrap();
        let unifier = Unifier::new(&p.system);

        for state in &automaton.dfa().states {
            for annotation in inputs(&p) {
                let truth = |c: ConditionId| automaton.condition(c).is_match(&annotation, &unifier);
                let holding = state.transitions.iter().filter(|t| t.holds(truth)).count();
                let consumable = state.threads.iter().any(|thread| {
                    automaton.nfa().state(thread.state).arcs.iter().any(|arc| match arc.label {
                        ArcLabel::Consume(c) => automaton
                            .condition(automaton.constraint(c).condition)
                            .is_match(&annotation, &unifier),
                        _ => false,
                    })
                });
                prop_assert!(holding <= 1);
                prop_assert_eq!(holding == 1, consumable);
            }
        }
    }

    #[test]
    fn prop_both_directions_compile(shape in arb_shape()) {
        let p = Phonology::new();
        let pattern = Pattern::new([build(&p, &shape)]);
        for direction in [Direction::LeftToRight, Direction::RightToLeft] {
            let automaton =
                Automaton::compile(&pattern, direction, &p.system, &CompileSettings::default());
            prop_assert!(automaton.is_ok());
        }
    }
}
