//! Compilation configuration.

/// Settings for [`Automaton::compile`](crate::Automaton::compile).
#[derive(Debug, Clone)]
pub struct CompileSettings {
    /// Upper bound on the number of deterministic states.
    pub max_states: usize,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self { max_states: 10_000 }
    }
}

impl CompileSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }
}
