//! Layout of the puzzle pieces for each grid choice.
//!
//! A piece is an edge shared by two tiles: its question is printed on one
//! side of the cut and its answer on the other. Pieces are numbered from 1 in
//! the order their edges are discovered while walking the tiles, so the
//! numbering of a grid never changes.

use std::collections::hash_map::Entry;
use std::collections::BTreeSet;
use std::fmt::Write;
use std::ops::RangeInclusive;

use rustc_hash::FxHashMap;

use crate::geometry::{hexagon_tiles, triangle_tiles, Edge, Orientation, Tile};
use crate::puzzle::{GridChoice, PieceIndex, PuzzleState, Shape};

/// An internal edge of the grid, holding one question/answer pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub index: PieceIndex,
    /// Indices into [`LayoutParams::tiles`] of the tiles on either side.
    pub tiles: (usize, usize),
    pub edge: Edge,
}

/// Layout derived from a [`GridChoice`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutParams {
    pub grid: GridChoice,
    pub shape: Shape,
    pub side: u32,
    pub tiles: Vec<Tile>,
    /// `pieces[i]` has index `i + 1`.
    pub pieces: Vec<Piece>,
    /// Number of tile edges on the outline of the grid.
    pub boundary_edges: usize,
}

impl LayoutParams {
    /// Number of question/answer pairs the grid holds.
    pub fn piece_count(&self) -> u32 {
        self.pieces.len() as u32
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Indices of the pieces shown on the diagram.
    pub fn piece_indices(&self) -> RangeInclusive<PieceIndex> {
        1..=self.piece_count()
    }

    pub fn piece(&self, index: PieceIndex) -> Option<&Piece> {
        let slot = index.checked_sub(1)? as usize;
        self.pieces.get(slot)
    }

    /// Pieces along the edges of one tile.
    pub fn pieces_of_tile(&self, tile: usize) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces
            .iter()
            .filter(move |piece| piece.tiles.0 == tile || piece.tiles.1 == tile)
    }
}

/// Computes the layout for a grid choice.
///
/// Total and deterministic: the same grid always yields the same layout.
pub fn compute(grid: GridChoice) -> LayoutParams {
    let tiles = match grid.shape() {
        Shape::Triangle => triangle_tiles(grid.side()),
        Shape::Hexagon => hexagon_tiles(grid.side()),
    };

    // first tile seen on each edge; a second sighting makes it a piece
    let mut first_owner: FxHashMap<Edge, usize> = FxHashMap::default();
    let mut pieces = Vec::new();

    for (tile_index, tile) in tiles.iter().enumerate() {
        for edge in tile.edges() {
            match first_owner.entry(edge) {
                Entry::Occupied(owner) => pieces.push(Piece {
                    index: pieces.len() as PieceIndex + 1,
                    tiles: (*owner.get(), tile_index),
                    edge,
                }),
                Entry::Vacant(slot) => {
                    slot.insert(tile_index);
                }
            }
        }
    }

    let boundary_edges = first_owner.len() - pieces.len();
    log::debug!(
        "computed {grid} layout: {} tiles, {} pieces, {boundary_edges} boundary edges",
        tiles.len(),
        pieces.len(),
    );

    LayoutParams {
        grid,
        shape: grid.shape(),
        side: grid.side(),
        tiles,
        pieces,
        boundary_edges,
    }
}

/// Formats a layout as a human-readable listing of tiles and pieces.
pub fn format_layout(layout: &LayoutParams) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{}: {} tiles, {} pieces, {} boundary edges",
        layout.grid,
        layout.tile_count(),
        layout.piece_count(),
        layout.boundary_edges,
    );

    output.push_str("tiles:\n");
    for (tile_index, tile) in layout.tiles.iter().enumerate() {
        let orientation = match tile.orientation {
            Orientation::Up => "up",
            Orientation::Down => "down",
        };
        let (a, b) = tile.anchor;
        let _ = writeln!(output, "{tile_index:>4}  {orientation:<4}  ({a}, {b})");
    }

    output.push_str("pieces:\n");
    for piece in &layout.pieces {
        let ((a0, b0), (a1, b1)) = piece.edge;
        let _ = writeln!(
            output,
            "{:>4}  tiles {}-{}  ({a0}, {b0})-({a1}, {b1})",
            piece.index, piece.tiles.0, piece.tiles.1,
        );
    }

    output
}

/// Formats the text of a puzzle, one block per piece that has any text.
///
/// Pieces beyond the grid's piece count are listed with an `off grid` marker.
/// Lines within one question or answer are joined with ` / `.
pub fn format_puzzle(state: &PuzzleState, layout: &LayoutParams) -> String {
    let indices: BTreeSet<PieceIndex> = state
        .questions
        .keys()
        .chain(state.answers.keys())
        .collect();
    let filled = indices
        .iter()
        .filter(|&&index| layout.piece_indices().contains(&index))
        .count();

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{}: {filled} of {} pieces filled",
        state.grid,
        layout.piece_count(),
    );

    for index in indices {
        let marker = if layout.piece_indices().contains(&index) {
            ""
        } else {
            "  (off grid)"
        };
        let question = labelled("Q:", state.questions.get(index));
        let answer = labelled("A:", state.answers.get(index));
        let _ = writeln!(output, "{index:>4}  {question}{marker}");
        let _ = writeln!(output, "      {answer}");
    }

    output
}

fn labelled(label: &str, lines: Option<&[String]>) -> String {
    match lines {
        Some(lines) if !lines.is_empty() => format!("{label} {}", lines.join(" / ")),
        _ => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::ContentMap;

    #[test]
    fn test_piece_counts() {
        let expected = [
            (GridChoice::SmallTriangle, 4, 3, 6),
            (GridChoice::LargeTriangle, 16, 18, 12),
            (GridChoice::SmallHexagon, 6, 6, 6),
            (GridChoice::LargeHexagon, 24, 30, 12),
        ];
        for (grid, tiles, pieces, boundary) in expected {
            let layout = compute(grid);
            assert_eq!(layout.tile_count(), tiles, "{grid} tile count");
            assert_eq!(layout.piece_count(), pieces, "{grid} piece count");
            assert_eq!(layout.boundary_edges, boundary, "{grid} boundary edges");
        }
    }

    #[test]
    fn test_compute_is_deterministic() {
        for grid in GridChoice::ALL {
            let layout = compute(grid);
            assert!(layout.piece_count() >= 1, "{grid} has no pieces");
            assert_eq!(layout, compute(grid), "{grid} layout changed between calls");
        }
    }

    #[test]
    fn test_pieces_join_distinct_tiles_on_shared_edges() {
        for grid in GridChoice::ALL {
            let layout = compute(grid);
            let mut edges = BTreeSet::new();
            for (slot, piece) in layout.pieces.iter().enumerate() {
                assert_eq!(piece.index as usize, slot + 1, "{grid} numbering has a gap");
                let (first, second) = piece.tiles;
                assert_ne!(first, second, "{grid} piece {} joins a tile to itself", piece.index);
                assert!(layout.tiles[first].edges().contains(&piece.edge));
                assert!(layout.tiles[second].edges().contains(&piece.edge));
                assert!(edges.insert(piece.edge), "{grid} edge listed twice");
            }
        }
    }

    #[test]
    fn test_piece_lookup() {
        let layout = compute(GridChoice::SmallHexagon);
        assert_eq!(layout.piece(0), None);
        assert_eq!(layout.piece(1).map(|piece| piece.index), Some(1));
        assert_eq!(layout.piece(6).map(|piece| piece.index), Some(6));
        assert_eq!(layout.piece(7), None);
        assert_eq!(layout.piece_indices(), 1..=6);
    }

    #[test]
    fn test_small_hexagon_tiles_each_border_two_pieces() {
        let layout = compute(GridChoice::SmallHexagon);
        for tile in 0..layout.tile_count() {
            assert_eq!(layout.pieces_of_tile(tile).count(), 2, "tile {tile}");
        }
    }

    #[test]
    fn test_small_triangle_layout_snapshot() {
        let output = format_layout(&compute(GridChoice::SmallTriangle));
        insta::assert_snapshot!(output, @r"
        small-triangle: 4 tiles, 3 pieces, 6 boundary edges
        tiles:
           0  up    (0, 0)
           1  down  (0, 0)
           2  up    (1, 0)
           3  up    (0, 1)
        pieces:
           1  tiles 0-1  (0, 1)-(1, 0)
           2  tiles 1-2  (1, 0)-(1, 1)
           3  tiles 1-3  (0, 1)-(1, 1)
        ");
    }

    #[test]
    fn test_puzzle_listing_marks_off_grid_pieces() {
        let state = PuzzleState {
            grid: GridChoice::SmallTriangle,
            questions: ContentMap::from_iter([(1, vec!["a", "b"]), (7, vec!["far"])]),
            answers: ContentMap::from_iter([(1, vec!["x"]), (2, vec!["y"])]),
        };
        let output = format_puzzle(&state, &compute(state.grid));
        insta::assert_snapshot!(output, @r"
        small-triangle: 2 of 3 pieces filled
           1  Q: a / b
              A: x
           2  Q:
              A: y
           7  Q: far  (off grid)
              A:
        ");
    }
}
