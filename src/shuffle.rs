//! Randomized renumbering of puzzle pieces.
//!
//! A shuffle draws one [`Permutation`] and applies it to both the questions
//! and the answers, so each question stays paired with its answer under the
//! new number. Text on pieces beyond the grid's piece count takes part in the
//! shuffle instead of being dropped.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::grid::LayoutParams;
use crate::puzzle::{ContentMap, PieceIndex, PuzzleState, MAX_PIECE_INDEX};

/// Error produced when an explicit list of images is not a bijection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("image {image} is outside the domain {floor}..={last}")]
    OutOfDomain {
        image: PieceIndex,
        floor: PieceIndex,
        last: PieceIndex,
    },
    #[error("image {0} is used more than once")]
    Duplicate(PieceIndex),
    #[error("{len} images do not fit in piece indices starting at {floor}")]
    Overflow { floor: PieceIndex, len: usize },
}

/// A bijection on a contiguous range of piece indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    floor: PieceIndex,
    /// `images[i]` is where index `floor + i` moves to.
    images: Vec<PieceIndex>,
}

impl Permutation {
    /// Permutation on `floor..=max` that moves nothing.
    pub fn identity(floor: PieceIndex, max: PieceIndex) -> Self {
        Self {
            floor,
            images: (floor..=max).collect(),
        }
    }

    /// Builds a permutation mapping `floor + i` to `images[i]`.
    pub fn from_images(
        floor: PieceIndex,
        images: Vec<PieceIndex>,
    ) -> Result<Self, PermutationError> {
        let permutation = Self { floor, images };
        let Some(domain) = permutation.domain() else {
            if permutation.images.is_empty() {
                return Ok(permutation);
            }
            return Err(PermutationError::Overflow {
                floor,
                len: permutation.images.len(),
            });
        };
        let mut seen = FxHashSet::default();
        for &image in &permutation.images {
            if !domain.contains(&image) {
                return Err(PermutationError::OutOfDomain {
                    image,
                    floor: *domain.start(),
                    last: *domain.end(),
                });
            }
            if !seen.insert(image) {
                return Err(PermutationError::Duplicate(image));
            }
        }
        Ok(permutation)
    }

    /// Indices the permutation moves, or `None` when it is empty.
    pub fn domain(&self) -> Option<RangeInclusive<PieceIndex>> {
        let offset = PieceIndex::try_from(self.images.len().checked_sub(1)?).ok()?;
        Some(self.floor..=self.floor.checked_add(offset)?)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image of `index`, or `None` outside the domain.
    pub fn get(&self, index: PieceIndex) -> Option<PieceIndex> {
        let slot = index.checked_sub(self.floor)? as usize;
        self.images.get(slot).copied()
    }

    /// Image of `index`; indices outside the domain map to themselves.
    #[inline]
    pub fn apply(&self, index: PieceIndex) -> PieceIndex {
        self.get(index).unwrap_or(index)
    }

    /// `(index, image)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (PieceIndex, PieceIndex)> + '_ {
        self.domain()
            .into_iter()
            .flatten()
            .zip(self.images.iter().copied())
    }

    pub fn inverse(&self) -> Self {
        let mut images = vec![0; self.images.len()];
        for (index, image) in self.iter() {
            images[(image - self.floor) as usize] = index;
        }
        Self {
            floor: self.floor,
            images,
        }
    }
}

/// Largest piece index a shuffle has to cover.
///
/// This is the grid's piece count, raised to the largest key of either map
/// so that text beyond the grid is shuffled rather than lost.
pub fn max_index(
    layout: &LayoutParams,
    questions: &ContentMap,
    answers: &ContentMap,
) -> PieceIndex {
    [questions.max_index(), answers.max_index()]
        .into_iter()
        .flatten()
        .fold(layout.piece_count(), PieceIndex::max)
}

/// Draws a uniformly random permutation of `seed_floor..=max_index` from the
/// thread-local RNG.
pub fn generate_permutation(max_index: PieceIndex, seed_floor: PieceIndex) -> Permutation {
    generate_permutation_with(&mut rand::rng(), max_index, seed_floor)
}

/// Draws a uniformly random permutation of `seed_floor..=max_index` from
/// `rng`.
///
/// Empty when `seed_floor > max_index`.
pub fn generate_permutation_with<R: Rng + ?Sized>(
    rng: &mut R,
    max_index: PieceIndex,
    seed_floor: PieceIndex,
) -> Permutation {
    let mut images: Vec<PieceIndex> = (seed_floor..=max_index).collect();
    images.shuffle(rng);
    Permutation {
        floor: seed_floor,
        images,
    }
}

/// Renames every key of `content` by `permutation`, keeping the text.
///
/// Keys outside the permutation's domain are kept as they are.
pub fn remap(content: &ContentMap, permutation: &Permutation) -> ContentMap {
    content
        .iter()
        .map(|(index, lines)| (permutation.apply(index), lines.to_vec()))
        .collect()
}

/// Applies one permutation to both content maps of a puzzle.
pub fn apply(state: &PuzzleState, permutation: &Permutation) -> PuzzleState {
    PuzzleState {
        grid: state.grid,
        questions: remap(&state.questions, permutation),
        answers: remap(&state.answers, permutation),
    }
}

/// Returns a copy of `state` with its pieces renumbered at random.
///
/// Keys above [`MAX_PIECE_INDEX`] keep their numbers.
pub fn shuffle<R: Rng + ?Sized>(
    rng: &mut R,
    state: &PuzzleState,
    layout: &LayoutParams,
) -> PuzzleState {
    let max = max_index(layout, &state.questions, &state.answers);
    if max > layout.piece_count() {
        log::warn!(
            "shuffling pieces up to {max}, beyond the {} pieces of the {} grid",
            layout.piece_count(),
            layout.grid,
        );
    }
    if max > MAX_PIECE_INDEX {
        log::warn!("pieces above {MAX_PIECE_INDEX} are left in place, up to {max}");
    }
    let permutation = generate_permutation_with(rng, max.min(MAX_PIECE_INDEX), 1);
    log::debug!("shuffling {} pieces", permutation.len());
    apply(state, &permutation)
}
