//! Ray tables for sliding piece attack generation.
//!
//! For every direction and origin square the table stores the ray out to the
//! board edge and, for every subset of that ray that may be occupied, the
//! first blocker and the squares reachable before (and including) it.
//! Lookups restrict the occupancy to the ray, turn it into a subset index and
//! read the entry. Everything is built once on first use and frozen.

use crate::Bitboard;
use chess_core::Square;
use std::sync::OnceLock;

/// The eight compass directions a ray can run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing the other way along the same line.
    #[inline]
    pub const fn opposite(self) -> Direction {
        Self::ALL[(self as usize + 4) % 8]
    }

    /// True for rook lines, false for bishop lines.
    #[inline]
    pub const fn is_orthogonal(self) -> bool {
        (self as u8) % 2 == 0
    }

    /// Moves every square of `bb` one step this way, dropping what leaves the board.
    #[inline]
    pub const fn shift(self, bb: Bitboard) -> Bitboard {
        match self {
            Direction::North => bb.north(),
            Direction::NorthEast => bb.north_east(),
            Direction::East => bb.east(),
            Direction::SouthEast => bb.south_east(),
            Direction::South => bb.south(),
            Direction::SouthWest => bb.south_west(),
            Direction::West => bb.west(),
            Direction::NorthWest => bb.north_west(),
        }
    }

    /// Index distance covered by one step.
    #[inline]
    const fn stride(self) -> u8 {
        match self {
            Direction::North | Direction::South => 8,
            Direction::NorthEast | Direction::SouthWest => 9,
            Direction::East | Direction::West => 1,
            Direction::SouthEast | Direction::NorthWest => 7,
        }
    }
}

/// Outcome of tracing one ray against an occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayEntry {
    /// The first occupied square on the ray, or empty if the ray is clear.
    pub blocker: Bitboard,
    /// Squares from the origin up to and including the blocker.
    pub attacks: Bitboard,
}

/// One ray: its mask and where its entries start in the shared entry list.
#[derive(Debug, Clone, Copy)]
struct RayLine {
    mask: Bitboard,
    origin: u8,
    offset: usize,
}

struct RayTables {
    lines: [[RayLine; 64]; 8],
    entries: Vec<RayEntry>,
    between: Vec<Bitboard>,
}

static RAY_TABLES: OnceLock<RayTables> = OnceLock::new();

#[inline]
fn tables() -> &'static RayTables {
    RAY_TABLES.get_or_init(RayTables::new)
}

impl RayTables {
    fn new() -> Self {
        let mut lines = [[RayLine {
            mask: Bitboard::EMPTY,
            origin: 0,
            offset: 0,
        }; 64]; 8];
        let mut entries = Vec::new();

        for dir in Direction::ALL {
            for origin in 0..64u8 {
                let mut squares = Vec::with_capacity(7);
                let mut step = dir.shift(Bitboard(1u64 << origin));
                while step.is_not_empty() {
                    squares.push(step);
                    step = dir.shift(step);
                }

                let offset = entries.len();
                let mask = squares.iter().fold(Bitboard::EMPTY, |acc, &s| acc | s);
                lines[dir.index()][origin as usize] = RayLine {
                    mask,
                    origin,
                    offset,
                };

                for subset in 0..(1usize << squares.len()) {
                    let mut attacks = Bitboard::EMPTY;
                    let mut blocker = Bitboard::EMPTY;
                    for (k, &s) in squares.iter().enumerate() {
                        attacks |= s;
                        if subset & (1 << k) != 0 {
                            blocker = s;
                            break;
                        }
                    }
                    entries.push(RayEntry { blocker, attacks });
                }
            }
        }

        let mut between = vec![Bitboard::EMPTY; 64 * 64];
        for dir in Direction::ALL {
            for from in 0..64usize {
                let line = lines[dir.index()][from];
                for to in line.mask.singles() {
                    let to_index = to.0.trailing_zeros() as usize;
                    let beyond = lines[dir.index()][to_index].mask;
                    between[from * 64 + to_index] = line.mask & !beyond & !to;
                }
            }
        }

        RayTables {
            lines,
            entries,
            between,
        }
    }
}

/// Squares from `sq` to the board edge along `dir`, excluding `sq`.
#[inline]
pub fn ray(dir: Direction, sq: Square) -> Bitboard {
    tables().lines[dir.index()][sq.index() as usize].mask
}

/// Traces the ray from `sq` along `dir` against `occupied`.
#[inline]
pub fn ray_entry(dir: Direction, sq: Square, occupied: Bitboard) -> RayEntry {
    let tables = tables();
    let line = &tables.lines[dir.index()][sq.index() as usize];
    let stride = dir.stride();
    let mut index = 0usize;
    for bit in (occupied & line.mask).singles() {
        let distance = (bit.0.trailing_zeros() as u8).abs_diff(line.origin) / stride;
        index |= 1 << (distance - 1);
    }
    tables.entries[line.offset + index]
}

/// Returns rook attacks for a square given occupied squares.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Direction::ORTHOGONAL
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| {
            acc | ray_entry(dir, sq, occupied).attacks
        })
}

/// Returns bishop attacks for a square given occupied squares.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Direction::DIAGONAL
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| {
            acc | ray_entry(dir, sq, occupied).attacks
        })
}

/// Returns queen attacks (bishop + rook).
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Squares strictly between `a` and `b` if they share a line, else empty.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    tables().between[a.index() as usize * 64 + b.index() as usize]
}
