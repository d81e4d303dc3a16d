//! Fixed attack and move tables for kings, knights and pawns.
//!
//! All tables are built at compile time from the edge-masked bitboard
//! shifts, so no offset can wrap around the board.

use crate::Bitboard;
use chess_core::{Color, Square};

pub use super::rays::{bishop_attacks, queen_attacks, rook_attacks};

/// Precomputed knight attack tables.
const KNIGHT_ATTACKS: [Bitboard; 64] = compute_knight_attacks();

/// Precomputed king attack tables.
const KING_ATTACKS: [Bitboard; 64] = compute_king_attacks();

/// Precomputed pawn tables, indexed by color.
static PAWN_TABLES: [PawnTable; 2] = [
    compute_pawn_table(Color::White),
    compute_pawn_table(Color::Black),
];

/// Pawn destinations from every square, split by move category.
///
/// Pushes and captures are split on whether they land on the promotion
/// rank, so a generator can expand promotions without re-testing ranks.
pub struct PawnTable {
    /// One step forward, not onto the promotion rank.
    pub push: [Bitboard; 64],
    /// One step forward onto the promotion rank.
    pub promotion_push: [Bitboard; 64],
    /// Two steps forward, only from the starting rank.
    pub double_push: [Bitboard; 64],
    /// Diagonal capture, not onto the promotion rank.
    pub capture: [Bitboard; 64],
    /// Diagonal capture onto the promotion rank.
    pub promotion_capture: [Bitboard; 64],
    /// Diagonal targets from the rank where en passant is possible.
    pub en_passant: [Bitboard; 64],
}

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns the pawn tables for `color`.
#[inline]
pub fn pawn_table(color: Color) -> &'static PawnTable {
    &PAWN_TABLES[color.index()]
}

/// Returns every square a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    let table = pawn_table(color);
    let i = sq.index() as usize;
    table.capture[i] | table.promotion_capture[i]
}

/// Computes knight attacks for all squares at compile time.
const fn compute_knight_attacks() -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0;

    while sq < 64 {
        let b = Bitboard(1u64 << sq);
        let n = b.north();
        let s = b.south();
        let e = b.east();
        let w = b.west();
        attacks[sq] = Bitboard(
            n.north().east().0
                | n.north().west().0
                | s.south().east().0
                | s.south().west().0
                | e.east().north().0
                | e.east().south().0
                | w.west().north().0
                | w.west().south().0,
        );
        sq += 1;
    }

    attacks
}

/// Computes king attacks for all squares at compile time.
const fn compute_king_attacks() -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0;

    while sq < 64 {
        let b = Bitboard(1u64 << sq);
        let row = Bitboard(b.0 | b.east().0 | b.west().0);
        attacks[sq] = Bitboard((row.0 | row.north().0 | row.south().0) & !b.0);
        sq += 1;
    }

    attacks
}

const fn compute_pawn_table(color: Color) -> PawnTable {
    let mut table = PawnTable {
        push: [Bitboard::EMPTY; 64],
        promotion_push: [Bitboard::EMPTY; 64],
        double_push: [Bitboard::EMPTY; 64],
        capture: [Bitboard::EMPTY; 64],
        promotion_capture: [Bitboard::EMPTY; 64],
        en_passant: [Bitboard::EMPTY; 64],
    };
    let last = color.promotion_rank().mask();
    let start = color.double_push_rank().mask();
    let passant = color.en_passant_rank().mask();
    let mut sq = 0;

    while sq < 64 {
        let b = Bitboard(1u64 << sq);
        let (step, diagonals) = match color {
            Color::White => (b.north(), Bitboard(b.north_east().0 | b.north_west().0)),
            Color::Black => (b.south(), Bitboard(b.south_east().0 | b.south_west().0)),
        };

        table.push[sq] = Bitboard(step.0 & !last);
        table.promotion_push[sq] = Bitboard(step.0 & last);
        table.capture[sq] = Bitboard(diagonals.0 & !last);
        table.promotion_capture[sq] = Bitboard(diagonals.0 & last);
        if b.0 & start != 0 {
            table.double_push[sq] = match color {
                Color::White => step.north(),
                Color::Black => step.south(),
            };
        }
        if b.0 & passant != 0 {
            table.en_passant[sq] = diagonals;
        }
        sq += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn knight_attacks_by_region() {
        assert_eq!(knight_attacks(sq("d4")).count(), 8);
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(sq("a4")).count(), 4);
        assert_eq!(knight_attacks(Square::H8).count(), 2);
        assert_eq!(knight_attacks(sq("g2")).count(), 4);
    }

    #[test]
    fn king_attacks_by_region() {
        assert_eq!(king_attacks(sq("d4")).count(), 8);
        assert_eq!(king_attacks(Square::A1).count(), 3);
        assert_eq!(king_attacks(sq("a4")).count(), 5);
        assert_eq!(king_attacks(sq("h5")).count(), 5);
    }

    #[test]
    fn tables_match_offsets_everywhere() {
        let knight = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
        let king = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];
        for index in 0..64 {
            let s = Square::from_index(index).unwrap();
            let expect = |offsets: &[(i8, i8)]| {
                offsets
                    .iter()
                    .filter_map(|&(df, dr)| s.offset(df, dr))
                    .fold(Bitboard::EMPTY, |acc, t| acc | Bitboard::from_square(t))
            };
            assert_eq!(knight_attacks(s), expect(&knight), "knight on {}", s);
            assert_eq!(king_attacks(s), expect(&king), "king on {}", s);
        }
    }

    #[test]
    fn knight_specific_squares() {
        let attacks = knight_attacks(sq("e4"));
        for target in ["d6", "f6", "g5", "g3", "f2", "d2", "c3", "c5"] {
            assert!(attacks.contains(sq(target)), "{}", target);
        }
    }

    #[test]
    fn pawn_attacks_both_colors() {
        let white = pawn_attacks(sq("d4"), Color::White);
        assert_eq!(white.count(), 2);
        assert!(white.contains(sq("c5")) && white.contains(sq("e5")));

        let black = pawn_attacks(sq("d4"), Color::Black);
        assert!(black.contains(sq("c3")) && black.contains(sq("e3")));

        let edge = pawn_attacks(sq("a4"), Color::White);
        assert_eq!(edge, Bitboard::from_square(sq("b5")));
        assert!(pawn_attacks(sq("d8"), Color::White).is_empty());
    }

    #[test]
    fn pawn_pushes_split_on_promotion() {
        let white = pawn_table(Color::White);
        let e2 = sq("e2").index() as usize;
        let e7 = sq("e7").index() as usize;
        assert_eq!(white.push[e2], Bitboard::from_square(sq("e3")));
        assert_eq!(white.double_push[e2], Bitboard::from_square(sq("e4")));
        assert!(white.promotion_push[e2].is_empty());
        assert!(white.push[e7].is_empty());
        assert_eq!(white.promotion_push[e7], Bitboard::from_square(Square::E8));
        assert!(white.double_push[e7].is_empty());

        let black = pawn_table(Color::Black);
        assert_eq!(black.double_push[e7], Bitboard::from_square(sq("e5")));
        assert_eq!(black.promotion_push[e2], Bitboard::from_square(Square::E1));
        assert_eq!(black.promotion_capture[e2].count(), 2);
        assert!(black.capture[e2].is_empty());
    }

    #[test]
    fn en_passant_only_from_fifth_rank() {
        let white = pawn_table(Color::White);
        let black = pawn_table(Color::Black);
        for index in 0..64u8 {
            let s = Square::from_index(index).unwrap();
            let i = index as usize;
            assert_eq!(
                white.en_passant[i].is_not_empty(),
                s.rank() == Rank::R5,
                "{}",
                s
            );
            assert_eq!(
                black.en_passant[i].is_not_empty(),
                s.rank() == Rank::R4,
                "{}",
                s
            );
        }
        let h5 = Square::new(File::H, Rank::R5).index() as usize;
        assert_eq!(white.en_passant[h5], Bitboard::from_square(sq("g6")));
    }
}
