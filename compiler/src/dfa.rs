//! Symbolic subset construction.
//!
//! A DFA state is an ordered list of threads. A thread is an NFA state that
//! can consume or accept, together with the tag operations met on the
//! epsilon path since the last consumption. Thread order is priority order.
//!
//! Outgoing transitions are the satisfiable minterms over the distinct
//! conditions of the state's consume arcs. Every base condition holds a single
//! literal, so its negation is an exact complement and the minterms partition
//! the annotations the state can consume.

use crate::nfa::{ArcLabel, CompiledConstraint, ConditionId, ConstraintId, Nfa, NfaStateId, TagOp};
use crate::{CompileError, CompileResult, CompileSettings};
use morpha_constraint::Condition;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DfaStateId(pub u32);

impl DfaStateId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Thread {
    pub state: NfaStateId,
    pub tags: SmallVec<[TagOp; 4]>,
}

/// One way a thread of the target state was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Thread index in the source state.
    pub source: usize,
    pub constraint: ConstraintId,
    /// Thread index in the target state.
    pub target: usize,
}

#[derive(Debug, Clone)]
pub struct Transition {
    /// The minterm: every positive condition and the negation of every other.
    pub condition: Condition,
    pub positives: Vec<ConditionId>,
    pub negatives: Vec<ConditionId>,
    pub target: DfaStateId,
    /// In source-thread priority order.
    pub links: Vec<Link>,
}

impl Transition {
    /// Decide the minterm from the truth of its base conditions.
    pub fn holds(&self, mut truth: impl FnMut(ConditionId) -> bool) -> bool {
        self.positives.iter().all(|c| truth(*c)) && self.negatives.iter().all(|c| !truth(*c))
    }
}

#[derive(Debug, Clone)]
pub struct DfaState {
    pub threads: Vec<Thread>,
    pub transitions: Vec<Transition>,
    /// Indices of threads sitting on the NFA accept state.
    pub accepting: Vec<usize>,
}

impl DfaState {
    pub fn is_accepting(&self) -> bool {
        !self.accepting.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Dfa {
    pub states: Vec<DfaState>,
}

impl Dfa {
    pub const START: DfaStateId = DfaStateId(0);

    pub fn state(&self, id: DfaStateId) -> &DfaState {
        &self.states[id.index()]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

pub(crate) struct Determinizer<'a> {
    nfa: &'a Nfa,
    constraints: &'a [CompiledConstraint],
    conditions: &'a [Condition],
    settings: &'a CompileSettings,
    states: Vec<DfaState>,
    memo: FxHashMap<Vec<Thread>, DfaStateId>,
    warned: bool,
}

impl<'a> Determinizer<'a> {
    pub fn new(
        nfa: &'a Nfa,
        constraints: &'a [CompiledConstraint],
        conditions: &'a [Condition],
        settings: &'a CompileSettings,
    ) -> Self {
        Self {
            nfa,
            constraints,
            conditions,
            settings,
            states: Vec::new(),
            memo: FxHashMap::default(),
            warned: false,
        }
    }

    pub fn run(mut self) -> CompileResult<Dfa> {
        let start = self.closure(self.nfa.start);
        let mut queue = VecDeque::new();
        queue.push_back(self.intern(start)?.0);

        let mut minterms = 0usize;
        while let Some(id) = queue.pop_front() {
            let transitions = self.expand(id, &mut queue, &mut minterms)?;
            self.states[id.index()].transitions = transitions;
        }

        debug!(
            nfa_states = self.nfa.len(),
            dfa_states = self.states.len(),
            minterms,
            "determinized automaton"
        );
        Ok(Dfa {
            states: self.states,
        })
    }

    fn intern(&mut self, threads: Vec<Thread>) -> CompileResult<(DfaStateId, bool)> {
        if let Some(id) = self.memo.get(&threads) {
            return Ok((*id, false));
        }
        let limit = self.settings.max_states;
        if self.states.len() >= limit {
            return Err(CompileError::state_limit(limit));
        }
        if !self.warned && self.states.len() >= limit / 2 {
            self.warned = true;
            warn!(
                states = self.states.len(),
                limit, "determinization is approaching its state limit"
            );
        }

        let accepting = threads
            .iter()
            .enumerate()
            .filter(|(_, t)| self.nfa.state(t.state).accepting)
            .map(|(i, _)| i)
            .collect();
        let id = DfaStateId(self.states.len() as u32);
        self.memo.insert(threads.clone(), id);
        self.states.push(DfaState {
            threads,
            transitions: Vec::new(),
            accepting,
        });
        Ok((id, true))
    }

    fn expand(
        &mut self,
        id: DfaStateId,
        queue: &mut VecDeque<DfaStateId>,
        minterms: &mut usize,
    ) -> CompileResult<Vec<Transition>> {
        // (source thread, constraint, NFA target) in priority order
        let mut moves: Vec<(usize, ConstraintId, NfaStateId)> = Vec::new();
        for (i, thread) in self.states[id.index()].threads.iter().enumerate() {
            for arc in &self.nfa.state(thread.state).arcs {
                if let ArcLabel::Consume(c) = arc.label {
                    moves.push((i, c, arc.target));
                }
            }
        }
        if moves.is_empty() {
            return Ok(Vec::new());
        }

        let mut conditions: Vec<ConditionId> = moves
            .iter()
            .map(|(_, c, _)| self.constraints[c.index()].condition)
            .collect();
        conditions.sort();
        conditions.dedup();

        let mut found = Vec::new();
        self.split(&conditions, 0, Condition::any(), &mut Vec::new(), &mut Vec::new(), &mut found);
        *minterms += found.len();

        let mut transitions = Vec::with_capacity(found.len());
        for (condition, positives, negatives) in found {
            let mut threads: Vec<Thread> = Vec::new();
            let mut index: FxHashMap<Thread, usize> = FxHashMap::default();
            let mut links = Vec::new();
            for (source, constraint, target) in &moves {
                let cond = self.constraints[constraint.index()].condition;
                if !positives.contains(&cond) {
                    continue;
                }
                for thread in self.closure(*target) {
                    let k = match index.get(&thread) {
                        Some(k) => *k,
                        None => {
                            threads.push(thread.clone());
                            index.insert(thread, threads.len() - 1);
                            threads.len() - 1
                        }
                    };
                    links.push(Link {
                        source: *source,
                        constraint: *constraint,
                        target: k,
                    });
                }
            }
            if threads.is_empty() {
                continue;
            }
            let (target, fresh) = self.intern(threads)?;
            if fresh {
                queue.push_back(target);
            }
            transitions.push(Transition {
                condition,
                positives,
                negatives,
                target,
                links,
            });
        }
        Ok(transitions)
    }

    /// Enumerate satisfiable minterms, trying each condition positive first.
    fn split(
        &self,
        conditions: &[ConditionId],
        i: usize,
        acc: Condition,
        positives: &mut Vec<ConditionId>,
        negatives: &mut Vec<ConditionId>,
        out: &mut Vec<(Condition, Vec<ConditionId>, Vec<ConditionId>)>,
    ) {
        if !acc.is_satisfiable() {
            return;
        }
        let Some(&id) = conditions.get(i) else {
            if !positives.is_empty() {
                out.push((acc, positives.clone(), negatives.clone()));
            }
            return;
        };
        let base = &self.conditions[id.index()];

        positives.push(id);
        self.split(conditions, i + 1, acc.conjunction(base), positives, negatives, out);
        positives.pop();

        negatives.push(id);
        self.split(conditions, i + 1, acc.conjunction(&base.negation()), positives, negatives, out);
        negatives.pop();
    }

    /// Threads reachable from `from` over epsilon and tag arcs, in depth-first
    /// arc order.
    fn closure(&self, from: NfaStateId) -> Vec<Thread> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut on_path = Vec::new();
        self.visit(from, SmallVec::new(), &mut on_path, &mut seen, &mut out);
        out
    }

    fn visit(
        &self,
        state: NfaStateId,
        tags: SmallVec<[TagOp; 4]>,
        on_path: &mut Vec<NfaStateId>,
        seen: &mut FxHashSet<Thread>,
        out: &mut Vec<Thread>,
    ) {
        // An epsilon cycle adds nothing new.
        if on_path.contains(&state) {
            return;
        }
        let nfa_state = self.nfa.state(state);
        if nfa_state.accepting || nfa_state.consumes() {
            let thread = Thread {
                state,
                tags: tags.clone(),
            };
            if seen.insert(thread.clone()) {
                out.push(thread);
            }
        }
        on_path.push(state);
        for arc in &nfa_state.arcs {
            match arc.label {
                ArcLabel::Epsilon => self.visit(arc.target, tags.clone(), on_path, seen, out),
                ArcLabel::Tag(op) => {
                    let mut tags = tags.clone();
                    tags.push(op);
                    self.visit(arc.target, tags, on_path, seen, out);
                }
                ArcLabel::Consume(_) => {}
            }
        }
        on_path.pop();
    }
}
