//! Scenario error types.

use thiserror::Error;

/// Errors raised while running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Scenario '{scenario}' has no pattern")]
    MissingPattern { scenario: String },

    #[error("Step '{step}' in scenario '{scenario}': {message}")]
    AssertionFailed {
        scenario: String,
        step: String,
        message: String,
    },
}

impl ScenarioError {
    pub fn missing_pattern(scenario: impl Into<String>) -> Self {
        Self::MissingPattern {
            scenario: scenario.into(),
        }
    }

    pub fn assertion_failed(
        scenario: impl Into<String>,
        step: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::AssertionFailed {
            scenario: scenario.into(),
            step: step.into(),
            message: message.into(),
        }
    }
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
