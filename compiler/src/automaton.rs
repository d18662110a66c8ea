//! The compiled, immutable automaton.

use crate::dfa::{Determinizer, Dfa, DfaState, DfaStateId};
use crate::nfa::{CompiledConstraint, ConditionId, ConstraintId, GroupKey, Nfa, NfaBuilder};
use crate::{CompileResult, CompileSettings};
use morpha_constraint::Condition;
use morpha_core::Direction;
use morpha_parser::Pattern;
use morpha_registry::FeatureSystem;
use std::fmt::Write;
use tracing::debug;

/// A pattern compiled for one traversal direction.
#[derive(Debug, Clone)]
pub struct Automaton {
    direction: Direction,
    nfa: Nfa,
    dfa: Dfa,
    constraints: Vec<CompiledConstraint>,
    conditions: Vec<Condition>,
    groups: Vec<GroupKey>,
    paths: Vec<String>,
}

impl Automaton {
    /// Compile `pattern` for traversal in `direction`.
    ///
    /// Structural errors in the pattern and runaway determinization are
    /// reported here; matching never fails.
    pub fn compile(
        pattern: &Pattern,
        direction: Direction,
        system: &FeatureSystem,
        settings: &CompileSettings,
    ) -> CompileResult<Self> {
        let out = NfaBuilder::new(direction).build(pattern)?;
        debug!(
            %direction,
            nfa_states = out.nfa.len(),
            constraints = out.constraints.len(),
            conditions = out.conditions.len(),
            "compiled pattern to nfa"
        );
        for (i, condition) in out.conditions.iter().enumerate() {
            debug!(id = i, condition = %condition.display(system), "condition");
        }

        let dfa = Determinizer::new(&out.nfa, &out.constraints, &out.conditions, settings).run()?;
        Ok(Self {
            direction,
            nfa: out.nfa,
            dfa,
            constraints: out.constraints,
            conditions: out.conditions,
            groups: out.groups,
            paths: out.paths,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn start(&self) -> DfaStateId {
        Dfa::START
    }

    pub fn state(&self, id: DfaStateId) -> &DfaState {
        self.dfa.state(id)
    }

    pub fn constraint(&self, id: ConstraintId) -> &CompiledConstraint {
        &self.constraints[id.index()]
    }

    pub fn condition(&self, id: ConditionId) -> &Condition {
        &self.conditions[id.index()]
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Group keys indexed by tag slot.
    pub fn groups(&self) -> &[GroupKey] {
        &self.groups
    }

    pub fn has_group(&self, key: &GroupKey) -> bool {
        self.groups.contains(key)
    }

    /// Nested pattern names indexed by `TagOp::Enter` payload.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Render the DFA as a Graphviz digraph.
    pub fn to_dot(&self, system: &FeatureSystem) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph automaton {{");
        let _ = writeln!(out, "  rankdir=LR;");
        for (i, state) in self.dfa.states.iter().enumerate() {
            let shape = if state.is_accepting() {
                "doublecircle"
            } else {
                "circle"
            };
            let _ = writeln!(out, "  d{} [shape={} label=\"{}\"];", i, shape, i);
        }
        for (i, state) in self.dfa.states.iter().enumerate() {
            for transition in &state.transitions {
                let label = transition
                    .condition
                    .display(system)
                    .to_string()
                    .replace('\\', "\\\\")
                    .replace('"', "\\\"");
                let _ = writeln!(
                    out,
                    "  d{} -> d{} [label=\"{}\"];",
                    i,
                    transition.target.index(),
                    label
                );
            }
        }
        out.push_str("}\n");
        out
    }
}
