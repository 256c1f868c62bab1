//! Lazy sampling of distinct ordinal offsets.

use std::collections::HashSet;
use std::iter::FusedIterator;

use rand::Rng;
use tracing::trace;

/// Iterator over a uniformly random permutation of `0..bound`.
///
/// Each draw is made uniformly from the whole range and rejected if it was
/// already emitted. The iterator yields exactly `bound` distinct values and
/// then stops. Every call to [`RandomOffsets::new`] opens an independent
/// session with an empty history.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use kgbench_core::RandomOffsets;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let offsets: BTreeSet<usize> = RandomOffsets::new(&mut rng, 5).collect();
/// assert_eq!(offsets, (0..5).collect());
/// assert_eq!(RandomOffsets::new(&mut rng, 0).count(), 0);
/// ```
#[derive(Debug)]
pub struct RandomOffsets<'r, R> {
    rng: &'r mut R,
    bound: usize,
    emitted: HashSet<usize>,
}

impl<'r, R: Rng> RandomOffsets<'r, R> {
    /// Starts a new sampling session over `0..bound`.
    #[must_use]
    pub fn new(rng: &'r mut R, bound: usize) -> Self {
        Self {
            rng,
            bound,
            emitted: HashSet::new(),
        }
    }

    /// Returns the exclusive upper bound of the session.
    #[must_use]
    pub fn bound(&self) -> usize {
        self.bound
    }
}

impl<R: Rng> Iterator for RandomOffsets<'_, R> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.emitted.len() >= self.bound {
            return None;
        }
        loop {
            let candidate = self.rng.gen_range(0..self.bound);
            if self.emitted.insert(candidate) {
                trace!(offset = candidate, bound = self.bound, "random offset drawn");
                return Some(candidate);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bound - self.emitted.len();
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for RandomOffsets<'_, R> {}

impl<R: Rng> FusedIterator for RandomOffsets<'_, R> {}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use crate::test_utils::suite_proptest_config;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(17)]
    fn emits_every_offset_once(#[case] bound: usize) {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut offsets: Vec<usize> = RandomOffsets::new(&mut rng, bound).collect();
        offsets.sort_unstable();
        assert_eq!(offsets, (0..bound).collect::<Vec<_>>());
    }

    #[test]
    fn size_hint_tracks_remaining_draws() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut offsets = RandomOffsets::new(&mut rng, 4);
        assert_eq!(offsets.len(), 4);
        let _ = offsets.next();
        let _ = offsets.next();
        assert_eq!(offsets.len(), 2);
        assert_eq!(offsets.by_ref().count(), 2);
        assert_eq!(offsets.next(), None);
    }

    #[test]
    fn sessions_do_not_share_history() {
        let mut rng = SmallRng::seed_from_u64(9);
        let first: Vec<usize> = RandomOffsets::new(&mut rng, 3).collect();
        let second: Vec<usize> = RandomOffsets::new(&mut rng, 3).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn same_seed_reproduces_the_permutation() {
        let mut left = SmallRng::seed_from_u64(11);
        let mut right = SmallRng::seed_from_u64(11);
        let a: Vec<usize> = RandomOffsets::new(&mut left, 32).collect();
        let b: Vec<usize> = RandomOffsets::new(&mut right, 32).collect();
        assert_eq!(a, b);
    }

    proptest! {
        #![proptest_config(suite_proptest_config(64))]

        #[test]
        fn offsets_are_a_permutation(seed in any::<u64>(), bound in 0_usize..200) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let offsets: Vec<usize> = RandomOffsets::new(&mut rng, bound).collect();
            prop_assert_eq!(offsets.len(), bound);
            prop_assert!(offsets.iter().all(|&offset| offset < bound));
            let distinct: HashSet<usize> = offsets.iter().copied().collect();
            prop_assert_eq!(distinct.len(), bound);
        }
    }
}
