//! Bidirectionally ordered annotation list.

use crate::Annotation;
use morpha_core::{AnnotationId, Direction, Offset};
use rustc_hash::FxHashSet;
use std::cmp::Reverse;

/// Decides which annotations a traversal may see.
pub type AnnotationFilter<'a, O> = &'a dyn Fn(&Annotation<O>) -> bool;

/// Annotations over one medium, kept in both traversal orders.
///
/// Left-to-right order sorts by start, longer annotations first among equal
/// starts. Right-to-left order mirrors it: by end descending, longer first.
#[derive(Debug, Clone)]
pub struct AnnotationList<O> {
    annotations: Vec<Annotation<O>>,
    ltr: Vec<AnnotationId>,
    rtl: Vec<AnnotationId>,
}

impl<O: Offset> Default for AnnotationList<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Offset> AnnotationList<O> {
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
            ltr: Vec::new(),
            rtl: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Add an annotation, keeping both orders sorted.
    pub fn push(&mut self, annotation: Annotation<O>) -> AnnotationId {
        let id = AnnotationId::new(self.annotations.len());
        let span = annotation.span;
        self.annotations.push(annotation);

        let ltr_key = |a: &Annotation<O>, id: AnnotationId| (a.span.start, Reverse(a.span.end), id);
        let new_key = (span.start, Reverse(span.end), id);
        let at = self
            .ltr
            .partition_point(|other| ltr_key(&self.annotations[other.raw()], *other) < new_key);
        self.ltr.insert(at, id);

        let rtl_key = |a: &Annotation<O>, id: AnnotationId| (Reverse(a.span.end), a.span.start, id);
        let new_key = (Reverse(span.end), span.start, id);
        let at = self
            .rtl
            .partition_point(|other| rtl_key(&self.annotations[other.raw()], *other) < new_key);
        self.rtl.insert(at, id);

        id
    }

    /// Get an annotation by id.
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation<O>> {
        self.annotations.get(id.raw())
    }

    /// Annotation ids in traversal order.
    pub fn ordered(&self, dir: Direction) -> &[AnnotationId] {
        match dir {
            Direction::LeftToRight => &self.ltr,
            Direction::RightToLeft => &self.rtl,
        }
    }

    /// Iterate annotations in traversal order.
    pub fn iter(&self, dir: Direction) -> impl Iterator<Item = (AnnotationId, &Annotation<O>)> {
        self.ordered(dir)
            .iter()
            .map(move |id| (*id, &self.annotations[id.raw()]))
    }

    /// Position of an annotation within the traversal order.
    pub fn rank(&self, id: AnnotationId, dir: Direction) -> Option<usize> {
        self.ordered(dir).iter().position(|other| *other == id)
    }

    /// The visible annotations at the first position of the traversal.
    pub fn first(&self, dir: Direction, filter: AnnotationFilter<'_, O>) -> Vec<AnnotationId> {
        let group = self.position_group(0, None, dir, filter);
        self.expand_optional(group, dir, filter)
    }

    /// The visible annotations at the position following `id`.
    ///
    /// Annotations stacked at that position are all returned. Optional
    /// annotations are returned together with the annotations that follow
    /// them, so a traversal can skip them.
    pub fn successors(
        &self,
        id: AnnotationId,
        dir: Direction,
        filter: AnnotationFilter<'_, O>,
    ) -> Vec<AnnotationId> {
        let (Some(rank), Some(annotation)) = (self.rank(id, dir), self.get(id)) else {
            return Vec::new();
        };
        let bound = annotation.span.end_in(dir);
        let group = self.position_group(rank + 1, Some(bound), dir, filter);
        self.expand_optional(group, dir, filter)
    }

    /// Add the followers of every optional annotation in `ids`.
    pub fn expand_optional(
        &self,
        ids: Vec<AnnotationId>,
        dir: Direction,
        filter: AnnotationFilter<'_, O>,
    ) -> Vec<AnnotationId> {
        let mut seen: FxHashSet<AnnotationId> = ids.iter().copied().collect();
        let mut out = Vec::with_capacity(ids.len());
        let mut queue = std::collections::VecDeque::from(ids);
        while let Some(id) = queue.pop_front() {
            out.push(id);
            let Some(annotation) = self.get(id) else {
                continue;
            };
            if !annotation.optional {
                continue;
            }
            let Some(rank) = self.rank(id, dir) else {
                continue;
            };
            let bound = annotation.span.end_in(dir);
            for next in self.position_group(rank + 1, Some(bound), dir, filter) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        out
    }

    /// Visible annotations sharing the first start position at or after
    /// `bound`, scanning the traversal order from `from`.
    fn position_group(
        &self,
        from: usize,
        bound: Option<O>,
        dir: Direction,
        filter: AnnotationFilter<'_, O>,
    ) -> Vec<AnnotationId> {
        let mut group = Vec::new();
        let mut at: Option<O> = None;
        for id in self.ordered(dir).iter().skip(from) {
            let annotation = &self.annotations[id.raw()];
            let start = annotation.span.start_in(dir);
            if let Some(at) = at {
                if start != at {
                    break;
                }
            }
            if !filter(annotation) {
                continue;
            }
            if bound.is_some_and(|b| !dir.at_or_after(&start, &b)) {
                continue;
            }
            at = Some(start);
            group.push(*id);
        }
        group
    }

    /// Returns true if no visible, mandatory annotation ends at or before `pos`.
    pub fn is_left_edge(&self, pos: O, filter: AnnotationFilter<'_, O>) -> bool {
        !self
            .annotations
            .iter()
            .any(|a| filter(a) && !a.optional && a.span.end <= pos && a.span.start < pos)
    }

    /// Returns true if no visible, mandatory annotation starts at or after `pos`.
    pub fn is_right_edge(&self, pos: O, filter: AnnotationFilter<'_, O>) -> bool {
        !self
            .annotations
            .iter()
            .any(|a| filter(a) && !a.optional && a.span.start >= pos && a.span.end > pos)
    }
}

impl<O: Offset> FromIterator<Annotation<O>> for AnnotationList<O> {
    fn from_iter<I: IntoIterator<Item = Annotation<O>>>(iter: I) -> Self {
        let mut list = AnnotationList::new();
        for annotation in iter {
            list.push(annotation);
        }
        list
    }
}
