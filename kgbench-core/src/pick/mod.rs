//! Unbiased sampling without replacement over ordinally addressed candidates.
//!
//! A [`Picker`] couples its own random source with a [`CandidateSource`]. It
//! draws distinct offsets with [`RandomOffsets`] and resolves each one through
//! a single-result page lookup, so the candidate collection is never
//! materialised by the picker itself.

mod instances;
mod not_playing;

pub use instances::Instances;
pub use not_playing::NotPlayingRole;

use rand::Rng;
use tracing::{debug, instrument};

use crate::{
    error::{PickError, StoreError},
    offsets::RandomOffsets,
};

/// Candidates addressable by ordinal offset.
pub trait CandidateSource {
    /// Identifier yielded for each candidate.
    type Id;

    /// Returns a short description used in diagnostics.
    fn describe(&self) -> String;

    /// Returns the number of eligible candidates under current constraints.
    ///
    /// Sampling addresses offsets in `0..candidate_count()`.
    fn candidate_count(&self) -> Result<usize, StoreError>;

    /// Fetches the candidate at `offset`, or `None` if nothing is stored there.
    fn candidate_at(&self, offset: usize) -> Result<Option<Self::Id>, StoreError>;
}

/// Samples distinct identifiers from a [`CandidateSource`].
///
/// # Examples
/// ```
/// use kgbench_core::{CandidateSource, Picker, StoreError};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// struct Letters(Vec<char>);
///
/// impl CandidateSource for Letters {
///     type Id = char;
///     fn describe(&self) -> String { "letters".into() }
///     fn candidate_count(&self) -> Result<usize, StoreError> { Ok(self.0.len()) }
///     fn candidate_at(&self, offset: usize) -> Result<Option<char>, StoreError> {
///         Ok(self.0.get(offset).copied())
///     }
/// }
///
/// let mut picker = Picker::new(SmallRng::seed_from_u64(1), Letters(vec!['a', 'b', 'c']));
/// let mut picked = picker.pick(3)?;
/// picked.sort_unstable();
/// assert_eq!(picked, vec!['a', 'b', 'c']);
/// assert!(picker.pick(4).is_err());
/// # Ok::<(), kgbench_core::PickError>(())
/// ```
#[derive(Debug)]
pub struct Picker<R, C> {
    rng: R,
    candidates: C,
}

impl<R: Rng, C: CandidateSource> Picker<R, C> {
    /// Creates a picker owning `rng` and drawing from `candidates`.
    #[must_use]
    pub fn new(rng: R, candidates: C) -> Self {
        Self { rng, candidates }
    }

    /// Returns the candidate source.
    #[must_use]
    pub fn candidates(&self) -> &C {
        &self.candidates
    }

    /// Returns the number of eligible candidates.
    ///
    /// # Errors
    /// Returns [`PickError::Store`] when the source cannot be counted.
    pub fn candidate_count(&self) -> Result<usize, PickError> {
        Ok(self.candidates.candidate_count()?)
    }

    /// Starts a lazy sampling session.
    ///
    /// The returned iterator yields every candidate at most once, in random
    /// order, and is empty when no candidates exist. Callers usually bound it
    /// with [`Iterator::take`].
    ///
    /// # Errors
    /// Returns [`PickError::Store`] when the candidate count cannot be read.
    // No `err`: the returned iterator borrows `self`.
    #[instrument(
        name = "pick.sample",
        skip(self),
        fields(source = %self.candidates.describe()),
    )]
    pub fn sample(&mut self) -> Result<Sample<'_, R, C>, PickError> {
        let count = self.candidates.candidate_count()?;
        debug!(count, "sampling session started");
        Ok(Sample {
            offsets: RandomOffsets::new(&mut self.rng, count),
            candidates: &self.candidates,
            count,
        })
    }

    /// Draws exactly `k` distinct identifiers.
    ///
    /// # Errors
    /// Returns [`PickError::ExhaustedCandidates`] when fewer than `k`
    /// candidates exist, and propagates lookup failures.
    pub fn pick(&mut self, k: usize) -> Result<Vec<C::Id>, PickError> {
        let sample = self.sample()?;
        let available = sample.len();
        if k > available {
            return Err(PickError::ExhaustedCandidates {
                requested: k,
                available,
            });
        }
        sample.take(k).collect()
    }

    /// Draws a single identifier, or `None` when there are no candidates.
    ///
    /// # Errors
    /// Propagates counting and lookup failures.
    pub fn pick_one(&mut self) -> Result<Option<C::Id>, PickError> {
        self.sample()?.next().transpose()
    }

    /// Consumes the picker and returns its random source.
    #[must_use]
    pub fn into_rng(self) -> R {
        self.rng
    }
}

/// Lazy sequence of sampled identifiers produced by [`Picker::sample`].
#[derive(Debug)]
pub struct Sample<'p, R, C> {
    offsets: RandomOffsets<'p, R>,
    candidates: &'p C,
    count: usize,
}

impl<R: Rng, C: CandidateSource> Iterator for Sample<'_, R, C> {
    type Item = Result<C::Id, PickError>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offsets.next()?;
        let fetched = match self.candidates.candidate_at(offset) {
            Ok(Some(id)) => Ok(id),
            Ok(None) => Err(PickError::MissingCandidate {
                offset,
                count: self.count,
            }),
            Err(error) => Err(PickError::Store(error)),
        };
        Some(fetched)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }
}

impl<R: Rng, C: CandidateSource> ExactSizeIterator for Sample<'_, R, C> {}
