//! Puzzle content definitions: grid choices, content maps and puzzle state.
//!
//! Every value here is plain data. Transitions on [`PuzzleState`] return a new
//! state instead of editing the old one, so the caller decides when to commit.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 1-based puzzle piece number.
///
/// Indices up to the active grid's piece count are shown on the diagram;
/// larger ones are stale entries left over from a bigger grid and are kept.
pub type PieceIndex = u32;

/// Largest piece index a puzzle may hold.
pub const MAX_PIECE_INDEX: PieceIndex = 999;

/// Error produced for a piece index outside `1..=MAX_PIECE_INDEX`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceIndexError {
    #[error("piece numbers start at 1")]
    Zero,
    #[error("piece {0} is above the largest piece number {max}", max = MAX_PIECE_INDEX)]
    TooLarge(PieceIndex),
}

/// Returns `index` if a puzzle may hold text under it.
pub fn check_index(index: PieceIndex) -> Result<PieceIndex, PieceIndexError> {
    match index {
        0 => Err(PieceIndexError::Zero),
        index if index > MAX_PIECE_INDEX => Err(PieceIndexError::TooLarge(index)),
        index => Ok(index),
    }
}

/// Broad family of a tiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Triangle,
    Hexagon,
}

/// One of the fixed tilings a puzzle can be cut into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridChoice {
    /// Triangle of side 2: 4 tiles, 3 pieces.
    SmallTriangle,
    /// Triangle of side 4: 16 tiles, 18 pieces.
    #[default]
    LargeTriangle,
    /// Hexagon of side 1: 6 tiles, 6 pieces.
    SmallHexagon,
    /// Hexagon of side 2: 24 tiles, 30 pieces.
    LargeHexagon,
}

impl GridChoice {
    /// All grid choices, in the order the editor offers them.
    pub const ALL: [GridChoice; 4] = [
        GridChoice::SmallTriangle,
        GridChoice::SmallHexagon,
        GridChoice::LargeTriangle,
        GridChoice::LargeHexagon,
    ];

    /// Stable identifier used in save tokens and on the command line.
    pub const fn id(self) -> &'static str {
        match self {
            GridChoice::SmallTriangle => "small-triangle",
            GridChoice::LargeTriangle => "large-triangle",
            GridChoice::SmallHexagon => "small-hexagon",
            GridChoice::LargeHexagon => "large-hexagon",
        }
    }

    /// Grid whose identifier is exactly `id`.
    pub fn from_id(id: &str) -> Option<Self> {
        GridChoice::ALL.into_iter().find(|grid| grid.id() == id)
    }

    pub const fn shape(self) -> Shape {
        match self {
            GridChoice::SmallTriangle | GridChoice::LargeTriangle => Shape::Triangle,
            GridChoice::SmallHexagon | GridChoice::LargeHexagon => Shape::Hexagon,
        }
    }

    /// Side length of the outline, measured in tile edges.
    pub const fn side(self) -> u32 {
        match self {
            GridChoice::SmallTriangle => 2,
            GridChoice::LargeTriangle => 4,
            GridChoice::SmallHexagon => 1,
            GridChoice::LargeHexagon => 2,
        }
    }
}

impl fmt::Display for GridChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error produced when parsing an unknown grid identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown grid {0:?}")]
pub struct ParseGridError(pub String);

/// Lenient parse for typed input: ignores case and surrounding whitespace.
impl FromStr for GridChoice {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        GridChoice::ALL
            .into_iter()
            .find(|grid| grid.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseGridError(trimmed.to_string()))
    }
}

/// Question or answer text keyed by piece index.
///
/// Each entry holds the lines of text printed on that piece. Keys are kept in
/// ascending order so that iteration and serialization are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentMap(BTreeMap<PieceIndex, Vec<String>>);

impl ContentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lines for `index`, returning the lines it replaced.
    pub fn insert(
        &mut self,
        index: PieceIndex,
        lines: Vec<String>,
    ) -> Result<Option<Vec<String>>, PieceIndexError> {
        Ok(self.0.insert(check_index(index)?, lines))
    }

    pub fn remove(&mut self, index: PieceIndex) -> Option<Vec<String>> {
        self.0.remove(&index)
    }

    pub fn get(&self, index: PieceIndex) -> Option<&[String]> {
        self.0.get(&index).map(Vec::as_slice)
    }

    pub fn contains(&self, index: PieceIndex) -> bool {
        self.0.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest key present, or `None` for an empty map.
    pub fn max_index(&self) -> Option<PieceIndex> {
        self.0.keys().next_back().copied()
    }

    /// Checks that every key is a valid piece index.
    pub fn check_indices(&self) -> Result<(), PieceIndexError> {
        // keys are sorted, so the smallest and largest decide
        for &index in self.0.keys().next().into_iter().chain(self.0.keys().next_back()) {
            check_index(index)?;
        }
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = PieceIndex> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceIndex, &[String])> + '_ {
        self.0.iter().map(|(&index, lines)| (index, lines.as_slice()))
    }
}

/// Keys are taken as given; [`ContentMap::check_indices`] validates them.
impl<S: Into<String>> FromIterator<(PieceIndex, Vec<S>)> for ContentMap {
    fn from_iter<I: IntoIterator<Item = (PieceIndex, Vec<S>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(index, lines)| (index, lines.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

impl IntoIterator for ContentMap {
    type Item = (PieceIndex, Vec<String>);
    type IntoIter = std::collections::btree_map::IntoIter<PieceIndex, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de> Deserialize<'de> for ContentMap {
    /// Deserializes a map, rejecting repeated piece indices instead of letting
    /// the last one win.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ContentMapVisitor;

        impl<'de> Visitor<'de> for ContentMapVisitor {
            type Value = ContentMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from piece index to lines of text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ContentMap, A::Error> {
                let mut entries = BTreeMap::new();
                while let Some((index, lines)) = access.next_entry::<PieceIndex, Vec<String>>()? {
                    if entries.insert(index, lines).is_some() {
                        return Err(serde::de::Error::custom(format_args!(
                            "duplicate piece index {index}"
                        )));
                    }
                }
                Ok(ContentMap(entries))
            }
        }

        deserializer.deserialize_map(ContentMapVisitor)
    }
}

/// Which of the two content maps an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Question,
    Answer,
}

/// Everything that is saved, loaded and shuffled together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleState {
    pub grid: GridChoice,
    pub questions: ContentMap,
    pub answers: ContentMap,
}

impl PuzzleState {
    /// Creates a state with no text on any piece.
    pub fn empty(grid: GridChoice) -> Self {
        Self {
            grid,
            questions: ContentMap::new(),
            answers: ContentMap::new(),
        }
    }

    /// Returns a copy using `grid`. Text on pieces the new grid does not have
    /// is kept.
    pub fn with_grid(&self, grid: GridChoice) -> Self {
        Self {
            grid,
            ..self.clone()
        }
    }

    /// Returns a copy with one entry replaced. Empty `lines` removes the entry.
    pub fn with_text(
        &self,
        side: Side,
        index: PieceIndex,
        lines: Vec<String>,
    ) -> Result<Self, PieceIndexError> {
        let index = check_index(index)?;
        let mut next = self.clone();
        let content = match side {
            Side::Question => &mut next.questions,
            Side::Answer => &mut next.answers,
        };
        if lines.is_empty() {
            content.remove(index);
        } else {
            content.insert(index, lines)?;
        }
        Ok(next)
    }

    /// Returns a copy with all text removed and the grid kept.
    pub fn cleared(&self) -> Self {
        Self::empty(self.grid)
    }
}

impl Default for PuzzleState {
    /// The starter puzzle shown when the editor opens.
    fn default() -> Self {
        Self {
            grid: GridChoice::default(),
            questions: ContentMap::from_iter([
                (1, vec!["Write", "your questions here..."]),
                (2, vec!["The small shapes", "above the diagram..."]),
            ]),
            answers: ContentMap::from_iter([
                (1, vec!["and your answers", "here! Or vice versa."]),
                (2, vec!["change the puzzle shape."]),
            ]),
        }
    }
}
