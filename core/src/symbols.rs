//! Dense bitsets over feature symbol indices.

use smallvec::SmallVec;
use std::fmt;

const WORD_BITS: usize = 64;

/// A set of symbol indices local to one feature.
///
/// Trailing zero words are always trimmed, so structural equality and
/// hashing agree with set equality.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolSet {
    words: SmallVec<[u64; 1]>,
}

impl SymbolSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The set `{0, 1, .., len - 1}`.
    pub fn full(len: usize) -> Self {
        let mut words: SmallVec<[u64; 1]> = SmallVec::new();
        let whole = len / WORD_BITS;
        let rest = len % WORD_BITS;
        words.extend(std::iter::repeat(u64::MAX).take(whole));
        if rest > 0 {
            words.push((1u64 << rest) - 1);
        }
        Self { words }
    }

    pub fn singleton(index: usize) -> Self {
        let mut set = Self::new();
        set.insert(index);
        set
    }

    /// Add an index. Returns true if it was not already present.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = (index / WORD_BITS, index % WORD_BITS);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        let present = self.words[word] & (1 << bit) != 0;
        self.words[word] |= 1 << bit;
        !present
    }

    /// Remove an index. Returns true if it was present.
    pub fn remove(&mut self, index: usize) -> bool {
        let (word, bit) = (index / WORD_BITS, index % WORD_BITS);
        let Some(w) = self.words.get_mut(word) else {
            return false;
        };
        let present = *w & (1 << bit) != 0;
        *w &= !(1 << bit);
        self.trim();
        present
    }

    pub fn contains(&self, index: usize) -> bool {
        let (word, bit) = (index / WORD_BITS, index % WORD_BITS);
        self.words
            .get(word)
            .is_some_and(|w| w & (1 << bit) != 0)
    }

    /// Number of indices in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn intersection(&self, other: &SymbolSet) -> SymbolSet {
        let mut words: SmallVec<[u64; 1]> = self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| a & b)
            .collect();
        Self::trim_words(&mut words);
        Self { words }
    }

    pub fn union(&self, other: &SymbolSet) -> SymbolSet {
        let (long, short) = if self.words.len() >= other.words.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut words = long.words.clone();
        for (w, s) in words.iter_mut().zip(short.words.iter()) {
            *w |= s;
        }
        Self { words }
    }

    /// Indices in `self` but not in `other`.
    pub fn difference(&self, other: &SymbolSet) -> SymbolSet {
        let mut words = self.words.clone();
        for (w, o) in words.iter_mut().zip(other.words.iter()) {
            *w &= !o;
        }
        Self::trim_words(&mut words);
        Self { words }
    }

    pub fn is_disjoint(&self, other: &SymbolSet) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & b == 0)
    }

    pub fn is_subset(&self, other: &SymbolSet) -> bool {
        self.words.iter().enumerate().all(|(i, w)| {
            let o = other.words.get(i).copied().unwrap_or(0);
            w & !o == 0
        })
    }

    /// Iterate indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            (0..WORD_BITS)
                .filter(move |bit| w & (1 << bit) != 0)
                .map(move |bit| i * WORD_BITS + bit)
        })
    }

    fn trim(&mut self) {
        Self::trim_words(&mut self.words);
    }

    fn trim_words(words: &mut SmallVec<[u64; 1]>) {
        while words.last() == Some(&0) {
            words.pop();
        }
    }
}

impl FromIterator<usize> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = SymbolSet::new();
        for index in iter {
            set.insert(index);
        }
        set
    }
}

impl fmt::Debug for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
