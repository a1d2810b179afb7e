//! Triangular lattice primitives.
//!
//! Every Tarsia grid is cut from the regular triangular lattice. Lattice
//! points use axial coordinates `(a, b)`, meaning the point `a * e1 + b * e2`
//! where `e1` and `e2` are unit vectors 60 degrees apart. Each unit rhombus
//! `(a, b)..(a + 1, b + 1)` splits into one upward and one downward tile.

/// A lattice point in axial coordinates.
pub type Point = (i32, i32);

/// A tile edge, stored with its endpoints in ascending order so that the two
/// tiles sharing it produce the same value.
pub type Edge = (Point, Point);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Up,
    Down,
}

/// One triangular card of the puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub orientation: Orientation,
    /// Lower-left corner of the rhombus the tile belongs to.
    pub anchor: Point,
}

impl Tile {
    pub const fn up(a: i32, b: i32) -> Self {
        Self {
            orientation: Orientation::Up,
            anchor: (a, b),
        }
    }

    pub const fn down(a: i32, b: i32) -> Self {
        Self {
            orientation: Orientation::Down,
            anchor: (a, b),
        }
    }

    /// Returns the three corners, counter-clockwise.
    #[inline]
    pub const fn corners(&self) -> [Point; 3] {
        let (a, b) = self.anchor;
        match self.orientation {
            Orientation::Up => [(a, b), (a + 1, b), (a, b + 1)],
            Orientation::Down => [(a + 1, b), (a + 1, b + 1), (a, b + 1)],
        }
    }

    /// Returns the three edges in corner order.
    pub fn edges(&self) -> [Edge; 3] {
        let [p, q, r] = self.corners();
        [edge(p, q), edge(q, r), edge(r, p)]
    }
}

/// Builds the normalized edge between two points.
#[inline]
pub fn edge(p: Point, q: Point) -> Edge {
    if p <= q {
        (p, q)
    } else {
        (q, p)
    }
}

/// Tiles of an upward triangle with `side` tiles along each edge.
///
/// The triangle has corners `(0, 0)`, `(side, 0)` and `(0, side)` and holds
/// `side^2` tiles, listed row by row from the base.
pub fn triangle_tiles(side: u32) -> Vec<Tile> {
    let n = side as i32;
    let mut tiles = Vec::with_capacity((side * side) as usize);
    for b in 0..n {
        for a in 0..n - b {
            tiles.push(Tile::up(a, b));
            if a + b <= n - 2 {
                tiles.push(Tile::down(a, b));
            }
        }
    }
    tiles
}

/// Tiles of a hexagon with `side` tiles along each edge, centred on the
/// origin.
///
/// Holds `6 * side^2` tiles, listed row by row from the bottom.
pub fn hexagon_tiles(side: u32) -> Vec<Tile> {
    let n = side as i32;
    let inside = |(a, b): Point| a.abs() <= n && b.abs() <= n && (a + b).abs() <= n;

    let mut tiles = Vec::with_capacity((6 * side * side) as usize);
    for b in -n..n {
        for a in -n..n {
            for tile in [Tile::up(a, b), Tile::down(a, b)] {
                if tile.corners().into_iter().all(inside) {
                    tiles.push(tile);
                }
            }
        }
    }
    tiles
}
