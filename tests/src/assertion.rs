//! Assertion types and builders for verifying step results.

use crate::error::{ScenarioError, ScenarioResult};
use crate::Phonology;
use morpha_pattern::{GroupKey, PatternMatch};

/// A complete assertion for a step result.
#[derive(Default)]
pub struct Assertion {
    pub count: Option<usize>,
    pub spans: Option<Vec<(u32, u32)>>,
    pub groups: Vec<(usize, GroupKey, Option<(u32, u32)>)>,
    pub variables: Vec<(usize, String, String, Vec<String>)>,
    pub pattern_paths: Vec<(usize, Vec<String>)>,
    pub error: Option<String>,
    pub error_pattern: Option<String>,
    #[allow(clippy::type_complexity)]
    pub custom: Option<Box<dyn Fn(&[PatternMatch<u32>]) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assertion")
            .field("count", &self.count)
            .field("spans", &self.spans)
            .field("groups", &self.groups)
            .field("variables", &self.variables)
            .field("pattern_paths", &self.pattern_paths)
            .field("error", &self.error)
            .field("error_pattern", &self.error_pattern)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl Assertion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify the assertion against a result.
    pub fn verify(
        &self,
        scenario: &str,
        step: &str,
        phonology: &Phonology,
        result: &Result<Vec<PatternMatch<u32>>, String>,
    ) -> ScenarioResult<()> {
        let fail = |message: String| ScenarioError::assertion_failed(scenario, step, message);

        if let Some(ref expected) = self.error {
            return match result {
                Err(msg) if msg.contains(expected.as_str()) => Ok(()),
                Err(msg) => Err(fail(format!(
                    "expected error containing '{}', got: {}",
                    expected, msg
                ))),
                Ok(_) => Err(fail(format!(
                    "expected error containing '{}', but step succeeded",
                    expected
                ))),
            };
        }

        if let Some(ref pattern) = self.error_pattern {
            let re = regex_lite::Regex::new(pattern)
                .map_err(|e| fail(format!("invalid regex pattern: {}", e)))?;
            return match result {
                Err(msg) if re.is_match(msg) => Ok(()),
                Err(msg) => Err(fail(format!(
                    "expected error matching '{}', got: {}",
                    pattern, msg
                ))),
                Ok(_) => Err(fail(format!(
                    "expected error matching '{}', but step succeeded",
                    pattern
                ))),
            };
        }

        let matches = result
            .as_ref()
            .map_err(|msg| fail(format!("step failed: {}", msg)))?;

        if let Some(ref custom) = self.custom {
            if !custom(matches) {
                return Err(fail("custom assertion failed".to_string()));
            }
        }

        if let Some(expected) = self.count {
            if matches.len() != expected {
                return Err(fail(format!(
                    "expected {} matches, got {}",
                    expected,
                    matches.len()
                )));
            }
        }

        if let Some(ref expected) = self.spans {
            let actual: Vec<(u32, u32)> = matches
                .iter()
                .map(|m| (m.span().start, m.span().end))
                .collect();
            if &actual != expected {
                return Err(fail(format!(
                    "expected spans {:?}, got {:?}",
                    expected, actual
                )));
            }
        }

        for (index, key, expected) in &self.groups {
            let found = nth(matches, *index).map_err(&fail)?;
            let actual = match found.groups().get(key) {
                Some(span) => span.map(|s| (s.start, s.end)),
                None => return Err(fail(format!("match {} has no group {}", index, key))),
            };
            if &actual != expected {
                return Err(fail(format!(
                    "expected group {} of match {} to be {:?}, got {:?}",
                    key, index, expected, actual
                )));
            }
        }

        for (index, name, feature, symbols) in &self.variables {
            let found = nth(matches, *index).map_err(&fail)?;
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            let expected = phonology.value(feature, &symbols);
            if found.variable(name) != Some(&expected) {
                return Err(fail(format!(
                    "expected ${} of match {} to be {}:{:?}, got {:?}",
                    name,
                    index,
                    feature,
                    symbols,
                    found.variable(name)
                )));
            }
        }

        for (index, expected) in &self.pattern_paths {
            let found = nth(matches, *index).map_err(&fail)?;
            if found.pattern_path() != expected.as_slice() {
                return Err(fail(format!(
                    "expected pattern path {:?} for match {}, got {:?}",
                    expected,
                    index,
                    found.pattern_path()
                )));
            }
        }

        Ok(())
    }
}

fn nth(matches: &[PatternMatch<u32>], index: usize) -> Result<&PatternMatch<u32>, String> {
    matches
        .get(index)
        .ok_or_else(|| format!("expected a match at index {}, got {}", index, matches.len()))
}

/// Builder for creating assertions.
#[derive(Debug, Default)]
pub struct AssertionBuilder {
    assertion: Assertion,
}

impl AssertionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Assertion {
        self.assertion
    }

    pub fn count(mut self, n: usize) -> Self {
        self.assertion.count = Some(n);
        self
    }

    pub fn none(self) -> Self {
        self.count(0)
    }

    /// Expect exactly these match spans, in order.
    pub fn spans(mut self, spans: &[(u32, u32)]) -> Self {
        self.assertion.spans = Some(spans.to_vec());
        self
    }

    /// Expect exactly one match with this span.
    pub fn span(self, start: u32, end: u32) -> Self {
        self.spans(&[(start, end)])
    }

    /// Expect the named group of match `index` to cover `span`.
    pub fn group(mut self, index: usize, name: &str, span: Option<(u32, u32)>) -> Self {
        self.assertion
            .groups
            .push((index, GroupKey::Named(name.to_string()), span));
        self
    }

    pub fn capture(mut self, index: usize, id: u32, span: Option<(u32, u32)>) -> Self {
        self.assertion
            .groups
            .push((index, GroupKey::Capture(id), span));
        self
    }

    /// Expect `$name` of match `index` to be bound to `feature:{symbols}`.
    pub fn variable(mut self, index: usize, name: &str, feature: &str, symbols: &[&str]) -> Self {
        self.assertion.variables.push((
            index,
            name.to_string(),
            feature.to_string(),
            symbols.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub fn pattern_path(mut self, index: usize, path: &[&str]) -> Self {
        self.assertion
            .pattern_paths
            .push((index, path.iter().map(|s| s.to_string()).collect()));
        self
    }

    /// Expect the scenario to fail with a message containing `contains`.
    pub fn error(mut self, contains: impl Into<String>) -> Self {
        self.assertion.error = Some(contains.into());
        self
    }

    /// Expect the scenario to fail with a message matching `pattern`.
    pub fn error_matches(mut self, pattern: impl Into<String>) -> Self {
        self.assertion.error_pattern = Some(pattern.into());
        self
    }

    pub fn assert_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&[PatternMatch<u32>]) -> bool + Send + Sync + 'static,
    {
        self.assertion.custom = Some(Box::new(f));
        self
    }
}
