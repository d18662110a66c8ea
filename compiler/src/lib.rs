//! Morpha Compiler
//!
//! Turn a pattern AST into an immutable, deterministic automaton.
//!
//! Responsibilities:
//! - Compile the AST into a tagged NFA for one traversal direction
//! - Intern constraint conditions and group/path identifiers
//! - Determinize over predicate minterms, keeping every tag history
//! - Bound runaway determinization with a state limit
//! - Render automata as Graphviz for inspection

mod automaton;
mod dfa;
mod error;
mod nfa;
mod settings;

pub use automaton::Automaton;
pub use dfa::{Dfa, DfaState, DfaStateId, Link, Thread, Transition};
pub use error::{CompileError, CompileResult};
pub use nfa::{
    Arc, ArcLabel, CompiledConstraint, ConditionId, ConstraintId, GroupKey, Nfa, NfaState,
    NfaStateId, TagOp,
};
pub use settings::CompileSettings;
