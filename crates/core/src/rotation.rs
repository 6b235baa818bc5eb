//! Duty Rotation
//!
//! Round-robin selection over a deterministically ordered candidate pool. The cursor is the
//! reference of the last selected candidate; a cursor that no longer matches anyone in the
//! pool restarts the rotation from the first candidate.

use std::{cmp::Ordering, fmt::Debug};

use thiserror::Error;

/// Selection attempted on a pool without candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rotation pool has no eligible candidates")]
pub struct EmptyPoolError;

/// A member of a rotation pool.
pub trait RotationCandidate {
    /// Stable reference persisted as the rotation cursor.
    type Ref: Clone + PartialEq + Debug;

    /// Reference identifying this candidate.
    fn rotation_ref(&self) -> Self::Ref;

    /// Total order used to arrange the pool.
    fn rotation_order(&self, other: &Self) -> Ordering;
}

/// Candidate chosen by a rotation step, together with the advanced cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a, C: RotationCandidate> {
    /// Selected candidate.
    pub candidate: &'a C,

    /// Cursor to persist for the next step.
    pub cursor: C::Ref,
}

/// Ordered, duplicate-free rotation pool.
#[derive(Debug, Clone)]
pub struct RotationPool<C> {
    candidates: Vec<C>,
}

impl<C: RotationCandidate> RotationPool<C> {
    /// Arrange candidates by [`RotationCandidate::rotation_order`], keeping the first
    /// occurrence of each reference.
    pub fn new<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        let mut candidates: Vec<C> = candidates.into_iter().collect();

        candidates.sort_by(C::rotation_order);

        let mut seen: Vec<C::Ref> = Vec::with_capacity(candidates.len());

        candidates.retain(|candidate| {
            let reference = candidate.rotation_ref();

            if seen.contains(&reference) {
                return false;
            }

            seen.push(reference);

            true
        });

        Self { candidates }
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the pool has no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates in rotation order.
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.candidates
    }

    /// Select the candidate after `cursor`.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyPoolError`] when the pool has no candidates.
    pub fn next_candidate(
        &self,
        cursor: Option<&C::Ref>,
    ) -> Result<Selection<'_, C>, EmptyPoolError> {
        next_candidate(&self.candidates, cursor)
    }
}

/// Select the candidate following `cursor` in an already ordered pool.
///
/// With no cursor, or a cursor that matches no candidate, the first candidate is chosen.
/// The candidate after the last one is the first one.
///
/// # Errors
///
/// Returns [`EmptyPoolError`] when `pool` is empty.
pub fn next_candidate<'a, C: RotationCandidate>(
    pool: &'a [C],
    cursor: Option<&C::Ref>,
) -> Result<Selection<'a, C>, EmptyPoolError> {
    let first = pool.first().ok_or(EmptyPoolError)?;

    let candidate = cursor
        .and_then(|cursor| {
            pool.iter()
                .position(|candidate| candidate.rotation_ref() == *cursor)
        })
        .and_then(|position| pool.get(position + 1))
        .unwrap_or(first);

    Ok(Selection {
        candidate,
        cursor: candidate.rotation_ref(),
    })
}
