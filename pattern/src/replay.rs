//! Replaying accepted walks.
//!
//! A walk fixes which annotation is consumed at each step and which DFA
//! transition it took. Several thread paths may explain the same walk; each
//! one is replayed on its own, in priority order, to recover group spans,
//! anchors, nested pattern names and variable bindings.

use crate::PatternMatch;
use morpha_compiler::{Automaton, DfaStateId, Link, TagOp};
use morpha_core::{AnnotationId, Direction, Offset, Span};
use morpha_feature::{Unifier, VariableBindings};
use morpha_graph::{Annotation, AnnotationFilter, AnnotationList};
use morpha_parser::Side;
use std::ops::ControlFlow;
use tracing::trace;

/// One consumed annotation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Step {
    pub annotation: AnnotationId,
    pub from: DfaStateId,
    pub transition: usize,
}

/// A walk that ended in an accepting state.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    pub steps: Vec<Step>,
    pub state: DfaStateId,
}

pub(crate) struct Replay<'a, 's, O> {
    pub automaton: &'a Automaton,
    pub list: &'a AnnotationList<O>,
    pub filter: AnnotationFilter<'a, O>,
    pub unifier: Unifier<'s>,
    /// Bindings every match starts from.
    pub bindings: &'a VariableBindings,
    pub start: &'a Annotation<O>,
}

impl<O: Offset> Replay<'_, '_, O> {
    fn dir(&self) -> Direction {
        self.automaton.direction()
    }

    /// Append the matches explained by `endpoint`; stop after one if `first`.
    pub fn collect(&self, endpoint: &Endpoint, first: bool, out: &mut Vec<PatternMatch<O>>) {
        let Some(annotations) = endpoint
            .steps
            .iter()
            .map(|s| self.list.get(s.annotation))
            .collect::<Option<Vec<_>>>()
        else {
            return;
        };
        let states = self.boundary_states(endpoint);
        let live = self.live_threads(endpoint, &states);

        let mut threads = Vec::with_capacity(states.len());
        let mut links = Vec::with_capacity(endpoint.steps.len());
        let start_threads = live[0].iter().enumerate().filter(|(_, live)| **live);
        for (thread, _) in start_threads {
            threads.push(thread);
            let flow = self.paths(endpoint, &live, 0, &mut threads, &mut links, &mut |threads, links| {
                if let Some(found) = self.build(endpoint, &annotations, &states, threads, links) {
                    out.push(found);
                    if first {
                        return ControlFlow::Break(());
                    }
                }
                ControlFlow::Continue(())
            });
            threads.pop();
            if flow.is_break() {
                return;
            }
        }
    }

    /// DFA state at each boundary, from before the first step to the end.
    fn boundary_states(&self, endpoint: &Endpoint) -> Vec<DfaStateId> {
        let mut states: Vec<DfaStateId> = endpoint.steps.iter().map(|s| s.from).collect();
        states.push(endpoint.state);
        states
    }

    /// Per boundary, the threads from which acceptance is still reachable.
    fn live_threads(&self, endpoint: &Endpoint, states: &[DfaStateId]) -> Vec<Vec<bool>> {
        let n = endpoint.steps.len();
        let mut live: Vec<Vec<bool>> = states
            .iter()
            .map(|s| vec![false; self.automaton.state(*s).threads.len()])
            .collect();
        for i in &self.automaton.state(endpoint.state).accepting {
            live[n][*i] = true;
        }
        for k in (0..n).rev() {
            for link in self.links(endpoint, k) {
                if live[k + 1][link.target] {
                    live[k][link.source] = true;
                }
            }
        }
        live
    }

    fn links(&self, endpoint: &Endpoint, k: usize) -> &[Link] {
        let step = endpoint.steps[k];
        &self.automaton.state(step.from).transitions[step.transition].links
    }

    #[allow(clippy::too_many_arguments)]
    fn paths(
        &self,
        endpoint: &Endpoint,
        live: &[Vec<bool>],
        k: usize,
        threads: &mut Vec<usize>,
        links: &mut Vec<Link>,
        emit: &mut dyn FnMut(&[usize], &[Link]) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        if k == endpoint.steps.len() {
            return emit(threads, links);
        }
        let current = threads[k];
        for link in self.links(endpoint, k) {
            if link.source != current || !live[k + 1][link.target] {
                continue;
            }
            threads.push(link.target);
            links.push(*link);
            let flow = self.paths(endpoint, live, k + 1, threads, links, emit);
            links.pop();
            threads.pop();
            flow?;
        }
        ControlFlow::Continue(())
    }

    fn build(
        &self,
        endpoint: &Endpoint,
        annotations: &[&Annotation<O>],
        states: &[DfaStateId],
        threads: &[usize],
        links: &[Link],
    ) -> Option<PatternMatch<O>> {
        let n = annotations.len();
        let slots = self.automaton.groups().len();
        let mut open: Vec<Option<usize>> = vec![None; slots];
        let mut closed: Vec<Option<(usize, usize)>> = vec![None; slots];
        let mut pattern_path = Vec::new();
        let mut bindings = self.bindings.clone();

        for k in 0..=n {
            let thread = &self.automaton.state(states[k]).threads[threads[k]];
            for op in &thread.tags {
                match *op {
                    TagOp::Open(slot) => open[slot as usize] = Some(k),
                    TagOp::Close(slot) => {
                        if let Some(o) = open[slot as usize] {
                            closed[slot as usize] = Some((o, k));
                        }
                    }
                    TagOp::Anchor(side) => {
                        if !self.anchor_holds(side, k, annotations) {
                            trace!(?side, boundary = k, "anchor failed");
                            return None;
                        }
                    }
                    TagOp::Enter(index) => {
                        if let Some(name) = self.automaton.paths().get(index as usize) {
                            pattern_path.push(name.clone());
                        }
                    }
                }
            }
            if k < n {
                let constraint = self.automaton.constraint(links[k].constraint);
                if constraint.has_variables
                    && !self
                        .unifier
                        .matches_with_bindings(&annotations[k].fs, &constraint.fs, &mut bindings)
                {
                    trace!(boundary = k, "variable binding failed");
                    return None;
                }
            }
        }

        let dir = self.dir();
        let groups = self
            .automaton
            .groups()
            .iter()
            .zip(closed)
            .map(|(key, span)| {
                let span = span
                    .filter(|(o, c)| o != c)
                    .map(|(o, c)| {
                        Span::from_direction(
                            self.open_pos(o, annotations),
                            self.close_pos(c, annotations),
                            dir,
                        )
                    });
                (key.clone(), span)
            })
            .collect();

        let span = match (annotations.first(), annotations.last()) {
            (Some(first), Some(last)) => {
                Span::from_direction(first.span.start_in(dir), last.span.end_in(dir), dir)
            }
            _ => Span::empty(self.start.span.start_in(dir)),
        };

        Some(PatternMatch {
            span,
            groups,
            variables: bindings.into_map(),
            pattern_path,
            annotations: endpoint.steps.iter().map(|s| s.annotation).collect(),
            next_start: None,
        })
    }

    /// Where a group opened at boundary `k` begins, in traversal terms.
    fn open_pos(&self, k: usize, annotations: &[&Annotation<O>]) -> O {
        let dir = self.dir();
        match (annotations.get(k), annotations.last()) {
            (Some(next), _) => next.span.start_in(dir),
            (None, Some(last)) => last.span.end_in(dir),
            (None, None) => self.start.span.start_in(dir),
        }
    }

    /// Where a group closed at boundary `k` ends, in traversal terms.
    fn close_pos(&self, k: usize, annotations: &[&Annotation<O>]) -> O {
        match k.checked_sub(1).and_then(|i| annotations.get(i)) {
            Some(prev) => prev.span.end_in(self.dir()),
            None => self.open_pos(0, annotations),
        }
    }

    /// Margins are absolute: `Left` is the left edge whatever the direction.
    fn anchor_holds(&self, side: Side, k: usize, annotations: &[&Annotation<O>]) -> bool {
        let prev = k.checked_sub(1).and_then(|i| annotations.get(i));
        let next = annotations.get(k);
        let (left_end, right_start) = match self.dir() {
            Direction::LeftToRight => (prev.map(|a| a.span.end), next.map(|a| a.span.start)),
            Direction::RightToLeft => (next.map(|a| a.span.end), prev.map(|a| a.span.start)),
        };
        let here = self.start.span.start_in(self.dir());
        match side {
            Side::Left => {
                left_end.is_none() && self.list.is_left_edge(right_start.unwrap_or(here), self.filter)
            }
            Side::Right => {
                right_start.is_none()
                    && self.list.is_right_edge(left_end.unwrap_or(here), self.filter)
            }
        }
    }
}
