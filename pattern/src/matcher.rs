//! Matching a compiled pattern against an annotation list.

use crate::replay::{Endpoint, Replay, Step};
use crate::{MatchMode, MatcherSettings, Matches, PatternMatch, PatternResult};
use morpha_compiler::{Automaton, ConditionId, DfaStateId};
use morpha_core::{AnnotationId, Direction, Offset};
use morpha_feature::{Unifier, VariableBindings};
use morpha_graph::{Annotation, AnnotationFilter, AnnotationList};
use morpha_parser::{Pattern, PatternNode, Side};
use morpha_registry::FeatureSystem;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// A pattern compiled for one direction, ready to run over many inputs.
#[derive(Debug, Clone)]
pub struct Matcher<'s> {
    system: &'s FeatureSystem,
    automaton: Automaton,
    settings: MatcherSettings,
}

impl<'s> Matcher<'s> {
    /// Compile `pattern` under `settings`.
    pub fn new(
        system: &'s FeatureSystem,
        pattern: &Pattern,
        settings: MatcherSettings,
    ) -> PatternResult<Self> {
        let anchored = anchor(pattern, &settings);
        let automaton =
            Automaton::compile(&anchored, settings.direction, system, &settings.compile)?;
        debug!(
            direction = %settings.direction,
            dfa_states = automaton.dfa().len(),
            groups = automaton.groups().len(),
            "built matcher"
        );
        Ok(Self {
            system,
            automaton,
            settings,
        })
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn settings(&self) -> &MatcherSettings {
        &self.settings
    }

    pub fn direction(&self) -> Direction {
        self.settings.direction
    }

    /// Returns true if a match begins at `start`.
    pub fn is_match<O: Offset>(&self, list: &AnnotationList<O>, start: AnnotationId) -> bool {
        !self.matches_at(list, start, MatchMode::First).is_empty()
    }

    /// The matches beginning at `start`, preferred first.
    ///
    /// Longer matches come before shorter ones; among equally long matches,
    /// earlier alternatives and greedier quantifiers come first. A start
    /// hidden by the type filter moves on to the next visible annotation.
    pub fn matches_at<O: Offset>(
        &self,
        list: &AnnotationList<O>,
        start: AnnotationId,
        mode: MatchMode,
    ) -> Vec<PatternMatch<O>> {
        self.matches_at_with_bindings(list, start, mode, &VariableBindings::new())
    }

    /// Like [`Matcher::matches_at`], with pattern variables already bound.
    ///
    /// Every match agrees with `bindings` and reports them among its
    /// variables.
    pub fn matches_at_with_bindings<O: Offset>(
        &self,
        list: &AnnotationList<O>,
        start: AnnotationId,
        mode: MatchMode,
        bindings: &VariableBindings,
    ) -> Vec<PatternMatch<O>> {
        let filter = |a: &Annotation<O>| self.is_visible(a);
        let Some(start) = self.visible_start(list, start, &filter) else {
            return Vec::new();
        };
        let Some(start_annotation) = list.get(start) else {
            return Vec::new();
        };
        let dir = self.direction();

        let mut walk = Walk {
            automaton: &self.automaton,
            list,
            filter: &filter,
            unifier: self.unifier(),
            truth: FxHashMap::default(),
            steps: Vec::new(),
            endpoints: Vec::new(),
        };
        let candidates = list.expand_optional(vec![start], dir, &filter);
        walk.run(self.automaton.start(), candidates);
        let mut endpoints = walk.endpoints;
        endpoints.sort_by(|a, b| b.steps.len().cmp(&a.steps.len()));
        trace!(start = start.raw(), endpoints = endpoints.len(), "walked automaton");

        let replay = Replay {
            automaton: &self.automaton,
            list,
            filter: &filter,
            unifier: self.unifier(),
            bindings,
            start: start_annotation,
        };
        let first = mode == MatchMode::First;
        let mut out = Vec::new();
        for endpoint in &endpoints {
            replay.collect(endpoint, first, &mut out);
            if first && !out.is_empty() {
                break;
            }
        }
        for found in &mut out {
            found.next_start = self.next_start(list, start, found, &filter);
        }
        out
    }

    /// The first match anywhere in `list`.
    pub fn find_match<O: Offset>(
        &self,
        list: &AnnotationList<O>,
        mode: MatchMode,
    ) -> Option<PatternMatch<O>> {
        self.find_all_matches(list, mode).next()
    }

    pub fn find_match_with_bindings<O: Offset>(
        &self,
        list: &AnnotationList<O>,
        mode: MatchMode,
        bindings: &VariableBindings,
    ) -> Option<PatternMatch<O>> {
        self.find_all_matches_with_bindings(list, mode, bindings.clone())
            .next()
    }

    /// Every match in `list`, in traversal order.
    pub fn find_all_matches<'m, O: Offset>(
        &'m self,
        list: &'m AnnotationList<O>,
        mode: MatchMode,
    ) -> Matches<'m, 's, O> {
        Matches::new(self, list, mode, VariableBindings::new())
    }

    /// Every match in `list` that agrees with `bindings`.
    pub fn find_all_matches_with_bindings<'m, O: Offset>(
        &'m self,
        list: &'m AnnotationList<O>,
        mode: MatchMode,
        bindings: VariableBindings,
    ) -> Matches<'m, 's, O> {
        Matches::new(self, list, mode, bindings)
    }

    pub(crate) fn is_visible<O>(&self, annotation: &Annotation<O>) -> bool {
        match &self.settings.annotation_types {
            Some(types) => types.contains(&annotation.ann_type),
            None => true,
        }
    }

    fn unifier(&self) -> Unifier<'s> {
        Unifier::new(self.system)
            .with_defaults(self.settings.use_defaults)
            .with_method(self.settings.matching_method)
    }

    /// `start` itself when visible, else the next visible annotation.
    fn visible_start<O: Offset>(
        &self,
        list: &AnnotationList<O>,
        start: AnnotationId,
        filter: AnnotationFilter<'_, O>,
    ) -> Option<AnnotationId> {
        let rank = list.rank(start, self.direction())?;
        list.ordered(self.direction())
            .iter()
            .skip(rank)
            .copied()
            .find(|id| list.get(*id).is_some_and(|a| filter(a)))
    }

    fn next_start<O: Offset>(
        &self,
        list: &AnnotationList<O>,
        start: AnnotationId,
        found: &PatternMatch<O>,
        filter: AnnotationFilter<'_, O>,
    ) -> Option<AnnotationId> {
        let dir = self.direction();
        if let Some(last) = found.annotations.last() {
            return list.successors(*last, dir, filter).first().copied();
        }
        let rank = list.rank(start, dir)?;
        list.ordered(dir)
            .iter()
            .skip(rank + 1)
            .copied()
            .find(|id| list.get(*id).is_some_and(|a| filter(a)))
    }
}

/// Wrap `pattern` in margins for the anchoring settings.
fn anchor(pattern: &Pattern, settings: &MatcherSettings) -> Pattern {
    let ltr = settings.direction.is_left_to_right();
    let left = if ltr {
        settings.anchored_to_start
    } else {
        settings.anchored_to_end
    };
    let right = if ltr {
        settings.anchored_to_end
    } else {
        settings.anchored_to_start
    };
    let mut out = pattern.clone();
    if left {
        out.children.insert(0, PatternNode::margin(Side::Left));
    }
    if right {
        out.children.push(PatternNode::margin(Side::Right));
    }
    out
}

/// Depth-first walk of the DFA over the annotation graph.
struct Walk<'a, 's, O> {
    automaton: &'a Automaton,
    list: &'a AnnotationList<O>,
    filter: AnnotationFilter<'a, O>,
    unifier: Unifier<'s>,
    truth: FxHashMap<(AnnotationId, ConditionId), bool>,
    steps: Vec<Step>,
    endpoints: Vec<Endpoint>,
}

impl<O: Offset> Walk<'_, '_, O> {
    fn run(&mut self, state: DfaStateId, candidates: Vec<AnnotationId>) {
        let automaton = self.automaton;
        let list = self.list;
        let dfa_state = automaton.state(state);
        if dfa_state.is_accepting() {
            self.endpoints.push(Endpoint {
                steps: self.steps.clone(),
                state,
            });
        }
        if dfa_state.transitions.is_empty() {
            return;
        }

        for id in candidates {
            let Some(annotation) = list.get(id) else {
                continue;
            };
            let mut chosen = None;
            for (i, transition) in dfa_state.transitions.iter().enumerate() {
                if transition.holds(|c| self.condition_holds(id, annotation, c)) {
                    debug_assert!(
                        chosen.is_none(),
                        "overlapping transitions in state {}",
                        state.index()
                    );
                    chosen = Some(i);
                    if !cfg!(debug_assertions) {
                        break;
                    }
                }
            }
            let Some(i) = chosen else {
                continue;
            };
            let target = dfa_state.transitions[i].target;
            trace!(
                annotation = id.raw(),
                from = state.index(),
                to = target.index(),
                "step"
            );
            self.steps.push(Step {
                annotation: id,
                from: state,
                transition: i,
            });
            let next = list.successors(id, automaton.direction(), self.filter);
            self.run(target, next);
            self.steps.pop();
        }
    }

    fn condition_holds(
        &mut self,
        id: AnnotationId,
        annotation: &Annotation<O>,
        condition: ConditionId,
    ) -> bool {
        let automaton = self.automaton;
        let unifier = &self.unifier;
        *self
            .truth
            .entry((id, condition))
            .or_insert_with(|| automaton.condition(condition).is_match(annotation, unifier))
    }
}
