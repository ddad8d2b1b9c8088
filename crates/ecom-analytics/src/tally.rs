//! Insertion-ordered group-by accumulator.

use std::collections::HashMap;
use std::hash::Hash;

/// Maps each group key to a running aggregate while remembering the order
/// in which keys were first seen.
///
/// Stable sorts over [`Tally::into_entries`] therefore break ties by
/// first appearance.
#[derive(Debug, Clone)]
pub(crate) struct Tally<K, A> {
    index: HashMap<K, usize>,
    entries: Vec<(K, A)>,
}

impl<K, A> Tally<K, A>
where
    K: Eq + Hash + Clone,
    A: Default,
{
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Accumulator for `key`, created on first sight.
    pub(crate) fn entry(&mut self, key: K) -> &mut A {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(key.clone(), slot);
                self.entries.push((key, A::default()));
                slot
            }
        };
        &mut self.entries[slot].1
    }

    pub(crate) fn into_entries(self) -> Vec<(K, A)> {
        self.entries
    }
}

/// Stable sort descending by count.
pub(crate) fn rank_descending<K>(mut entries: Vec<(K, usize)>) -> Vec<(K, usize)> {
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_keeps_first_seen_order() {
        let mut tally: Tally<&str, usize> = Tally::new();
        for key in ["b", "a", "b", "c", "a"] {
            *tally.entry(key) += 1;
        }
        assert_eq!(tally.into_entries(), vec![("b", 2), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_rank_descending_breaks_ties_by_position() {
        let ranked = rank_descending(vec![("x", 1), ("y", 3), ("z", 1), ("w", 3)]);
        assert_eq!(ranked, vec![("y", 3), ("w", 3), ("x", 1), ("z", 1)]);
    }
}
