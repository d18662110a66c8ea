//! Scenario definition and runner.

use crate::error::{ScenarioError, ScenarioResult};
use crate::{Assertion, AssertionBuilder, Phonology};
use morpha_core::AnnotationId;
use morpha_feature::VariableBindings;
use morpha_graph::AnnotationList;
use morpha_pattern::{MatchMode, Matcher, MatcherSettings, PatternMatch};

type InputFn = Box<dyn Fn(&Phonology) -> AnnotationList<u32>>;
type SettingsFn = Box<dyn Fn(&Phonology) -> MatcherSettings>;
type BindingsFn = Box<dyn Fn(&Phonology) -> VariableBindings>;

/// What a step asks the matcher.
#[derive(Debug, Clone, Copy)]
pub enum Query {
    /// Every match over the whole input.
    Scan(MatchMode),
    /// The matches starting at one annotation.
    At(usize, MatchMode),
    /// The first match over the whole input, if any.
    Find(MatchMode),
}

impl Query {
    pub fn first() -> Self {
        Query::Scan(MatchMode::First)
    }

    pub fn all() -> Self {
        Query::Scan(MatchMode::All)
    }

    pub fn at(index: usize) -> Self {
        Query::At(index, MatchMode::First)
    }

    pub fn all_at(index: usize) -> Self {
        Query::At(index, MatchMode::All)
    }

    fn run(
        &self,
        matcher: &Matcher<'_>,
        list: &AnnotationList<u32>,
        bindings: &VariableBindings,
    ) -> Vec<PatternMatch<u32>> {
        match *self {
            Query::Scan(mode) => matcher
                .find_all_matches_with_bindings(list, mode, bindings.clone())
                .collect(),
            Query::At(index, mode) => {
                matcher.matches_at_with_bindings(list, AnnotationId::new(index), mode, bindings)
            }
            Query::Find(mode) => matcher
                .find_match_with_bindings(list, mode, bindings)
                .into_iter()
                .collect(),
        }
    }
}

struct Step {
    name: String,
    query: Query,
    assertion: Assertion,
}

/// A pattern, an input and the steps to check against them.
pub struct Scenario {
    name: String,
    pattern: Option<String>,
    pattern_name: Option<String>,
    input: InputFn,
    settings: SettingsFn,
    bindings: BindingsFn,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: None,
            pattern_name: None,
            input: Box::new(|_| AnnotationList::new()),
            settings: Box::new(|_| MatcherSettings::new()),
            bindings: Box::new(|_| VariableBindings::new()),
            steps: Vec::new(),
        }
    }

    pub fn pattern(mut self, text: impl Into<String>) -> Self {
        self.pattern = Some(text.into());
        self
    }

    /// Name the top-level pattern; the name leads every pattern path.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.pattern_name = Some(name.into());
        self
    }

    /// Use [`Phonology::word`] for the input.
    pub fn word(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.input = Box::new(move |p| p.word(&text));
        self
    }

    pub fn input<F>(mut self, f: F) -> Self
    where
        F: Fn(&Phonology) -> AnnotationList<u32> + 'static,
    {
        self.input = Box::new(f);
        self
    }

    pub fn settings<F>(mut self, f: F) -> Self
    where
        F: Fn(&Phonology) -> MatcherSettings + 'static,
    {
        self.settings = Box::new(f);
        self
    }

    /// Variable bindings every query starts from.
    pub fn bindings<F>(mut self, f: F) -> Self
    where
        F: Fn(&Phonology) -> VariableBindings + 'static,
    {
        self.bindings = Box::new(f);
        self
    }

    pub fn step<F>(mut self, name: impl Into<String>, query: Query, f: F) -> Self
    where
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.steps.push(Step {
            name: name.into(),
            query,
            assertion: f(AssertionBuilder::new()).build(),
        });
        self
    }

    /// Parse, compile and check every step in order.
    ///
    /// A pattern that fails to parse or compile fails each step with its
    /// message, so steps can assert on the error.
    pub fn run(&self) -> ScenarioResult<()> {
        let phonology = Phonology::new();
        let text = self
            .pattern
            .as_ref()
            .ok_or_else(|| ScenarioError::missing_pattern(&self.name))?;
        let settings = (self.settings)(&phonology);
        let matcher = phonology
            .parse_named(text, self.pattern_name.clone())
            .map_err(|e| e.to_string())
            .and_then(|pattern| {
                Matcher::new(&phonology.system, &pattern, settings).map_err(|e| e.to_string())
            });
        let list = (self.input)(&phonology);
        let bindings = (self.bindings)(&phonology);

        for step in &self.steps {
            let result = match &matcher {
                Ok(matcher) => Ok(step.query.run(matcher, &list, &bindings)),
                Err(message) => Err(message.clone()),
            };
            step.assertion
                .verify(&self.name, &step.name, &phonology, &result)?;
        }
        Ok(())
    }
}
