use crate::{
    errors::TupleError,
    node::Node,
    sequence::{Iter, Sequence},
};
use std::fmt;
use tracing::debug;

/// Returned by the numeric queries of an empty tuple.
pub const SENTINEL: i32 = -1;

/// Rendering of an empty tuple.
pub const EMPTY_MARKER: &str = "-1";

/// An ordered tuple of natural numbers (excluding zero).
///
/// Order is insertion order, not numeric order, and the same number may
/// appear more than once. Non-positive values are silently ignored on the way
/// in.
#[derive(Debug, Default)]
pub struct NaturalTuple {
    seq: Sequence,
}

impl NaturalTuple {
    /// Builds a tuple from `values` in order, dropping every value `<= 0`.
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let mut tuple = Self::default();
        tuple.extend(values);
        tuple
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Value at `index`, if any.
    pub fn get(&self, index: usize) -> Option<i32> {
        let h = self.seq.node_at(index)?;
        self.seq.get(h).map(Node::value)
    }

    pub fn iter(&self) -> Iter<'_> {
        self.seq.iter()
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.iter().collect()
    }

    /// Smallest stored number; [`SENTINEL`] if the tuple is empty.
    pub fn min(&self) -> i32 {
        self.min_value().unwrap_or(SENTINEL)
    }

    /// Largest stored number; [`SENTINEL`] if the tuple is empty.
    pub fn max(&self) -> i32 {
        self.max_value().unwrap_or(SENTINEL)
    }

    pub fn min_value(&self) -> Option<i32> {
        self.iter().min()
    }

    pub fn max_value(&self) -> Option<i32> {
        self.iter().max()
    }

    /// Appends `number` at the end. Has no effect if `number <= 0`.
    pub fn insert(&mut self, number: i32) {
        match Node::new(number) {
            Ok(node) => {
                self.seq.push_back(node);
                debug!(number, len = self.len(), "inserted");
            }
            Err(err) => debug!(number, %err, "ignored"),
        }
    }

    /// Index of the first occurrence of `number`.
    pub fn index_of(&self, number: i32) -> Option<usize> {
        self.iter().position(|v| v == number)
    }

    /// Like [`index_of`](Self::index_of), but `-1` when absent.
    pub fn index_of_or_sentinel(&self, number: i32) -> i64 {
        self.index_of(number)
            .and_then(|i| i64::try_from(i).ok())
            .unwrap_or(i64::from(SENTINEL))
    }

    /// How often `number` is contained in this tuple.
    pub fn count_numbers(&self, number: i32) -> usize {
        self.iter().filter(|&v| v == number).count()
    }

    /// Removes every occurrence of `number`.
    ///
    /// Returns `true` if at least one number was removed.
    pub fn remove(&mut self, number: i32) -> bool {
        let mut removed = 0usize;
        while let Some(index) = self.index_of(number) {
            if self.seq.remove_at(index).is_none() {
                break;
            }
            removed += 1;
        }
        debug!(number, removed, len = self.len(), "remove");
        removed > 0
    }

    /// Swaps the numbers at `first` and `second`.
    ///
    /// Returns `false`, leaving the tuple untouched, once at least one
    /// position is out of range.
    pub fn swap(&mut self, first: usize, second: usize) -> bool {
        match self.try_swap(first, second) {
            Ok(()) => true,
            Err(err) => {
                debug!(first, second, %err, "swap rejected");
                false
            }
        }
    }

    /// Swaps the numbers at `first` and `second`, reporting the offending
    /// index on failure.
    pub fn try_swap(&mut self, first: usize, second: usize) -> Result<(), TupleError> {
        let len = self.len();
        for index in [first, second] {
            if index >= len {
                return Err(TupleError::InvalidIndex { index, len });
            }
        }
        if first == second {
            return Ok(());
        }

        // Detach the higher position first so the lower one keeps its meaning.
        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let invalid = |index| TupleError::InvalidIndex { index, len };
        let high_node = self.seq.remove_at(high).ok_or_else(|| invalid(high))?;
        let low_node = self.seq.remove_at(low).ok_or_else(|| invalid(low))?;

        self.seq.insert_at(high_node, low)?;
        self.seq.insert_at(low_node, high)?;

        debug!(low, high, "swapped");
        Ok(())
    }
}

impl PartialEq for NaturalTuple {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for NaturalTuple {}

impl fmt::Display for NaturalTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut values = self.iter();
        let Some(first) = values.next() else {
            return f.write_str(EMPTY_MARKER);
        };
        write!(f, "{first}")?;
        for v in values {
            write!(f, ",{v}")?;
        }
        Ok(())
    }
}

impl Extend<i32> for NaturalTuple {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = i32>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl FromIterator<i32> for NaturalTuple {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        Self::new(iter)
    }
}

impl From<&[i32]> for NaturalTuple {
    fn from(values: &[i32]) -> Self {
        Self::new(values.iter().copied())
    }
}

impl<const N: usize> From<[i32; N]> for NaturalTuple {
    fn from(values: [i32; N]) -> Self {
        Self::new(values)
    }
}

impl From<Vec<i32>> for NaturalTuple {
    fn from(values: Vec<i32>) -> Self {
        Self::new(values)
    }
}

impl<'a> IntoIterator for &'a NaturalTuple {
    type Item = i32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        Swap(usize, usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (-3i32..12).prop_map(Op::Insert),
            1 => (0i32..12).prop_map(Op::Remove),
            2 => (0usize..14, 0usize..14).prop_map(|(a, b)| Op::Swap(a, b)),
        ]
    }

    proptest! {
        #[test]
        fn matches_vec_model(
            initial in prop::collection::vec(-5i32..12, 0..16),
            ops in prop::collection::vec(op(), 0..64),
        ) {
            let mut tuple = NaturalTuple::new(initial.iter().copied());
            let mut model: Vec<i32> = initial.into_iter().filter(|&v| v > 0).collect();

            for op in ops {
                match op {
                    Op::Insert(v) => {
                        tuple.insert(v);
                        if v > 0 {
                            model.push(v);
                        }
                    }
                    Op::Remove(v) => {
                        let expected = model.contains(&v);
                        model.retain(|&x| x != v);
                        prop_assert_eq!(tuple.remove(v), expected);
                    }
                    Op::Swap(a, b) => {
                        let valid = a < model.len() && b < model.len();
                        if valid {
                            model.swap(a, b);
                        }
                        prop_assert_eq!(tuple.swap(a, b), valid);
                    }
                }
                tuple.seq.assert_invariants();
                prop_assert_eq!(tuple.to_vec(), model.clone());
                prop_assert_eq!(tuple.min_value(), model.iter().copied().min());
                prop_assert_eq!(tuple.max_value(), model.iter().copied().max());
            }

            let rebuilt = NaturalTuple::from(model.as_slice());
            prop_assert_eq!(&tuple, &rebuilt);
            prop_assert_eq!(&rebuilt, &tuple);
        }
    }
}
