//! Lazy enumeration of matches across an input.

use crate::{MatchMode, Matcher, PatternMatch};
use morpha_core::Offset;
use morpha_feature::VariableBindings;
use morpha_graph::AnnotationList;
use std::collections::VecDeque;

/// Iterator over the matches of one [`Matcher`] in one list.
///
/// In [`MatchMode::First`] each start position contributes its preferred
/// match and scanning resumes after it, so results do not overlap. In
/// [`MatchMode::All`] every start position contributes every match.
pub struct Matches<'m, 's, O> {
    matcher: &'m Matcher<'s>,
    list: &'m AnnotationList<O>,
    mode: MatchMode,
    bindings: VariableBindings,
    cursor: usize,
    pending: VecDeque<PatternMatch<O>>,
}

impl<'m, 's, O: Offset> Matches<'m, 's, O> {
    pub(crate) fn new(
        matcher: &'m Matcher<'s>,
        list: &'m AnnotationList<O>,
        mode: MatchMode,
        bindings: VariableBindings,
    ) -> Self {
        Self {
            matcher,
            list,
            mode,
            bindings,
            cursor: 0,
            pending: VecDeque::new(),
        }
    }

    /// Move the cursor past a First-mode match.
    fn skip_past(&mut self, found: &PatternMatch<O>) {
        let dir = self.matcher.direction();
        if found.span.is_empty() {
            self.cursor += 1;
            return;
        }
        let end = found.span.end_in(dir);
        let order = self.list.ordered(dir);
        self.cursor = (self.cursor + 1..order.len())
            .find(|i| {
                self.list
                    .get(order[*i])
                    .is_some_and(|a| dir.at_or_after(&a.span.start_in(dir), &end))
            })
            .unwrap_or(order.len());
    }
}

impl<O: Offset> Iterator for Matches<'_, '_, O> {
    type Item = PatternMatch<O>;

    fn next(&mut self) -> Option<Self::Item> {
        let dir = self.matcher.direction();
        loop {
            if let Some(found) = self.pending.pop_front() {
                return Some(found);
            }
            let id = *self.list.ordered(dir).get(self.cursor)?;
            let visible = self
                .list
                .get(id)
                .is_some_and(|a| self.matcher.is_visible(a));
            if !visible {
                self.cursor += 1;
                continue;
            }
            let found = self
                .matcher
                .matches_at_with_bindings(self.list, id, self.mode, &self.bindings);
            match self.mode {
                MatchMode::All => {
                    self.cursor += 1;
                    self.pending.extend(found);
                }
                MatchMode::First => match found.into_iter().next() {
                    Some(found) => {
                        self.skip_past(&found);
                        return Some(found);
                    }
                    None => self.cursor += 1,
                },
            }
        }
    }
}
