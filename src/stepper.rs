//! Index-tuple iteration over n-dimensional arrays.
//!
//! `ArrayStepper` yields every valid index tuple of an array with arbitrary
//! rank and per-dimension extents, exactly once, in mixed-radix counting
//! order with dimension 0 fastest-varying. The heap stores elements in the
//! same order, so `linear_index` maps a tuple to its storage offset.

use smallvec::{smallvec, SmallVec};

use crate::value::Extents;

/// One element position: an ordered set of per-dimension coordinates.
pub type IndexTuple = SmallVec<[usize; 4]>;

/// Lazy iterator over every index tuple of an array.
///
/// Any zero extent (a zero-length array) yields an empty sequence. The
/// iterator is finite and non-restartable; build a new one to walk again.
pub struct ArrayStepper {
    extents: Extents,
    /// The tuple the next call will yield, or `None` once exhausted.
    next: Option<IndexTuple>,
}

impl ArrayStepper {
    pub fn new(extents: &[usize]) -> Self {
        let next = if extents.is_empty() || extents.contains(&0) {
            None
        } else {
            Some(smallvec![0; extents.len()])
        };
        Self {
            extents: Extents::from_slice(extents),
            next,
        }
    }
}

impl Iterator for ArrayStepper {
    type Item = IndexTuple;

    fn next(&mut self) -> Option<IndexTuple> {
        let current = self.next.take()?;
        // Mixed-radix increment with carry, dimension 0 fastest.
        let mut succ = current.clone();
        for d in 0..succ.len() {
            succ[d] += 1;
            if succ[d] < self.extents[d] {
                self.next = Some(succ);
                break;
            }
            succ[d] = 0;
        }
        Some(current)
    }
}

/// Storage offset of an index tuple, dimension 0 having stride 1.
///
/// Returns `None` on rank mismatch or any out-of-range coordinate.
pub fn linear_index(extents: &[usize], index: &[usize]) -> Option<usize> {
    if index.len() != extents.len() || extents.is_empty() {
        return None;
    }
    let mut offset = 0usize;
    for d in (0..extents.len()).rev() {
        if index[d] >= extents[d] {
            return None;
        }
        offset = offset * extents[d] + index[d];
    }
    Some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_dimension_counts_up() {
        let tuples: Vec<_> = ArrayStepper::new(&[4]).collect();
        assert_eq!(
            tuples,
            vec![
                IndexTuple::from_slice(&[0]),
                IndexTuple::from_slice(&[1]),
                IndexTuple::from_slice(&[2]),
                IndexTuple::from_slice(&[3]),
            ]
        );
    }

    #[test]
    fn dimension_zero_varies_fastest() {
        let tuples: Vec<_> = ArrayStepper::new(&[2, 3]).collect();
        let expected: Vec<IndexTuple> = [
            [0, 0], [1, 0], [0, 1], [1, 1], [0, 2], [1, 2],
        ]
        .iter()
        .map(|t| IndexTuple::from_slice(t))
        .collect();
        assert_eq!(tuples, expected);
    }

    #[test]
    fn zero_extent_yields_nothing() {
        assert_eq!(ArrayStepper::new(&[0]).count(), 0);
        assert_eq!(ArrayStepper::new(&[3, 0, 2]).count(), 0);
        assert_eq!(ArrayStepper::new(&[]).count(), 0);
    }

    #[test]
    fn linear_index_matches_iteration_order() {
        let extents = [3, 2, 4];
        for (i, tuple) in ArrayStepper::new(&extents).enumerate() {
            assert_eq!(linear_index(&extents, &tuple), Some(i));
        }
    }

    #[test]
    fn linear_index_rejects_bad_tuples() {
        assert_eq!(linear_index(&[2, 2], &[0]), None);
        assert_eq!(linear_index(&[2, 2], &[2, 0]), None);
        assert_eq!(linear_index(&[], &[]), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn covers_every_element_exactly_once(extents in proptest::collection::vec(0usize..5, 1..4)) {
            let expected: usize = extents.iter().product();
            let tuples: Vec<_> = ArrayStepper::new(&extents).collect();
            prop_assert_eq!(tuples.len(), expected);

            let distinct: std::collections::HashSet<Vec<usize>> =
                tuples.iter().map(|t| t.to_vec()).collect();
            prop_assert_eq!(distinct.len(), expected);

            for t in &tuples {
                for (d, &coord) in t.iter().enumerate() {
                    prop_assert!(coord < extents[d]);
                }
            }
        }

        #[test]
        fn order_is_mixed_radix(extents in proptest::collection::vec(1usize..4, 1..4)) {
            let offsets: Vec<_> = ArrayStepper::new(&extents)
                .map(|t| linear_index(&extents, &t).unwrap())
                .collect();
            let sequential: Vec<_> = (0..offsets.len()).collect();
            prop_assert_eq!(offsets, sequential);
        }
    }
}
