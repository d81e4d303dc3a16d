//! Piece placement and the queries built on it.
//!
//! A [`Position`] is only the board: twelve piece bitboards plus the
//! per-color and total occupancy derived from them. Side to move, castling
//! rights and clocks live in [`Game`](crate::Game). Squares passed to the
//! query methods are one-hot bitboards.

use chess_core::{CastleSide, Color, File, Move, MoveKind, Piece, Square};

use crate::movegen::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, ray_entry, rook_attacks,
    Direction,
};
use crate::Bitboard;

/// Board contents as bitboards, one per color and piece kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    /// Indexed by `[color][piece]`.
    pieces: [[Bitboard; 6]; 2],
    colors: [Bitboard; 2],
    occupied: Bitboard,
}

impl Position {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            colors: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
        }
    }

    /// Creates the standard starting placement.
    pub fn startpos() -> Self {
        let mut position = Position::empty();
        let back = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in File::ALL.into_iter().zip(back) {
            for color in Color::ALL {
                position.put(piece, color, Square::new(file, color.back_rank()));
                position.put(Piece::Pawn, color, Square::new(file, color.double_push_rank()));
            }
        }
        position
    }

    /// Places a piece on an empty square.
    pub fn put(&mut self, piece: Piece, color: Color, sq: Square) {
        let bb = Bitboard::from_square(sq);
        debug_assert!(!self.occupied.intersects(bb), "{} is occupied", sq);
        self.pieces[color.index()][piece.index()] |= bb;
        self.colors[color.index()] |= bb;
        self.occupied |= bb;
    }

    /// Squares holding `color`'s pieces of kind `piece`.
    #[inline]
    pub fn pieces(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Squares holding pieces of kind `piece` of either color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece) -> Bitboard {
        self.pieces[0][piece.index()] | self.pieces[1][piece.index()]
    }

    /// Squares holding any of `color`'s pieces.
    #[inline]
    pub fn color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Squares holding any piece.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// The square of `color`'s king (empty if there is none).
    #[inline]
    pub fn king(&self, color: Color) -> Bitboard {
        self.pieces(Piece::King, color)
    }

    /// Returns the piece and color on `sq`, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let bb = Bitboard::from_square(sq);
        if !self.occupied.intersects(bb) {
            return None;
        }
        let color = if self.colors[0].intersects(bb) {
            Color::White
        } else {
            Color::Black
        };
        Piece::ALL
            .into_iter()
            .find(|&piece| self.pieces(piece, color).intersects(bb))
            .map(|piece| (piece, color))
    }

    /// Queens plus rooks of `color`.
    #[inline]
    pub fn rook_sliders(&self, color: Color) -> Bitboard {
        self.pieces(Piece::Queen, color) | self.pieces(Piece::Rook, color)
    }

    /// Queens plus bishops of `color`.
    #[inline]
    pub fn bishop_sliders(&self, color: Color) -> Bitboard {
        self.pieces(Piece::Queen, color) | self.pieces(Piece::Bishop, color)
    }

    /// Squares of `color`'s pieces attacking the one-hot `target`, tracing
    /// sliders against `occupied`.
    fn attackers_with(&self, color: Color, target: Bitboard, occupied: Bitboard) -> Bitboard {
        let Some(sq) = target.lsb() else {
            return Bitboard::EMPTY;
        };
        (king_attacks(sq) & self.pieces(Piece::King, color))
            | (knight_attacks(sq) & self.pieces(Piece::Knight, color))
            // A pawn of `color` attacks `sq` exactly when a pawn of the other
            // color on `sq` would attack the pawn.
            | (pawn_attacks(sq, color.opposite()) & self.pieces(Piece::Pawn, color))
            | (rook_attacks(sq, occupied) & self.rook_sliders(color))
            | (bishop_attacks(sq, occupied) & self.bishop_sliders(color))
    }

    /// Squares of `color`'s pieces attacking the one-hot `target`.
    #[inline]
    pub fn attackers(&self, color: Color, target: Bitboard) -> Bitboard {
        self.attackers_with(color, target, self.occupied)
    }

    /// Returns true if any piece of `color` attacks the one-hot `target`.
    #[inline]
    pub fn is_attacked(&self, color: Color, target: Bitboard) -> bool {
        self.attackers(color, target).is_not_empty()
    }

    /// The individual pieces of `color` giving check to the king on `king`.
    ///
    /// Same computation as [`Position::attackers`]; callers split the result
    /// with [`Bitboard::singles`] or count it to tell single from double
    /// check.
    #[inline]
    pub fn checkers(&self, color: Color, king: Bitboard) -> Bitboard {
        self.attackers(color, king)
    }

    /// Every square attacked by `color`.
    ///
    /// With `exclude_king` the defending king is lifted off the board before
    /// tracing sliders, so a square behind the king on a checking line still
    /// counts as attacked.
    pub fn attacked_squares(&self, color: Color, exclude_king: bool) -> Bitboard {
        let occupied = if exclude_king {
            self.occupied & !self.king(color.opposite())
        } else {
            self.occupied
        };

        let mut attacked = Bitboard::EMPTY;
        for sq in self.pieces(Piece::Pawn, color) {
            attacked |= pawn_attacks(sq, color);
        }
        for sq in self.pieces(Piece::Knight, color) {
            attacked |= knight_attacks(sq);
        }
        for sq in self.pieces(Piece::King, color) {
            attacked |= king_attacks(sq);
        }
        for sq in self.rook_sliders(color) {
            attacked |= rook_attacks(sq, occupied);
        }
        for sq in self.bishop_sliders(color) {
            attacked |= bishop_attacks(sq, occupied);
        }
        attacked
    }

    /// Where the piece on the one-hot `square` may move without exposing the
    /// king on `king`.
    ///
    /// Returns [`Bitboard::FULL`] when the piece is not pinned. Otherwise
    /// returns the line between king and pinner, pinner included. A piece is
    /// pinned when, along one axis, the nearest piece one way is its king and
    /// the nearest piece the other way is an enemy slider moving along that
    /// axis (`rook_sliders` for files and ranks, `bishop_sliders` for
    /// diagonals).
    pub fn pinned_movement(
        &self,
        square: Bitboard,
        king: Bitboard,
        rook_sliders: Bitboard,
        bishop_sliders: Bitboard,
    ) -> Bitboard {
        let Some(sq) = square.lsb() else {
            return Bitboard::FULL;
        };
        if king.is_empty() {
            return Bitboard::FULL;
        }
        for dir in [
            Direction::North,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
        ] {
            let forward = ray_entry(dir, sq, self.occupied);
            let backward = ray_entry(dir.opposite(), sq, self.occupied);
            let sliders = if dir.is_orthogonal() {
                rook_sliders
            } else {
                bishop_sliders
            };
            if forward.blocker == king && backward.blocker.intersects(sliders) {
                return (forward.attacks & !king) | backward.attacks;
            }
            if backward.blocker == king && forward.blocker.intersects(sliders) {
                return (backward.attacks & !king) | forward.attacks;
            }
        }
        Bitboard::FULL
    }

    /// Applies a move without any legality check.
    ///
    /// Returns the new position and the kind of piece captured, if any. An
    /// en passant capture reports a pawn.
    pub fn make_move(&self, mv: Move) -> (Position, Option<Piece>) {
        let mut next = self.clone();
        let us = mv.color().index();
        let them = mv.color().opposite().index();
        // Black's castling masks are White's moved up seven ranks.
        let rank_shift = if mv.color() == Color::White { 0 } else { 56 };

        let captured = match mv.kind() {
            MoveKind::Castle(side) => {
                let (king_mask, rook_mask) = match side {
                    CastleSide::Kingside => (0x50u64, 0xA0u64),
                    CastleSide::Queenside => (0x14u64, 0x09u64),
                };
                let king_mask = Bitboard(king_mask << rank_shift);
                let rook_mask = Bitboard(rook_mask << rank_shift);
                next.pieces[us][Piece::King.index()] ^= king_mask;
                next.pieces[us][Piece::Rook.index()] ^= rook_mask;
                next.colors[us] ^= king_mask | rook_mask;
                None
            }
            kind => {
                let from = Bitboard::from_square(mv.from());
                let to = Bitboard::from_square(mv.to());

                let mut captured = None;
                if self.colors[them].intersects(to) {
                    for piece in Piece::ALL {
                        if self.pieces[them][piece.index()].intersects(to) {
                            next.pieces[them][piece.index()] ^= to;
                            captured = Some(piece);
                            break;
                        }
                    }
                    next.colors[them] ^= to;
                }

                next.pieces[us][mv.piece().index()] ^= from | to;
                next.colors[us] ^= from | to;

                match kind {
                    MoveKind::EnPassant => {
                        let victim = match mv.color() {
                            Color::White => to.south(),
                            Color::Black => to.north(),
                        };
                        next.pieces[them][Piece::Pawn.index()] ^= victim;
                        next.colors[them] ^= victim;
                        captured = Some(Piece::Pawn);
                    }
                    MoveKind::Promotion(piece) => {
                        next.pieces[us][Piece::Pawn.index()] ^= to;
                        next.pieces[us][piece.index()] ^= to;
                    }
                    _ => {}
                }
                captured
            }
        };

        next.occupied = next.colors[0] | next.colors[1];
        debug_assert!(next.is_consistent(), "inconsistent after {:?}", mv);
        (next, captured)
    }

    /// Returns true if neither side has enough material left to mate.
    ///
    /// Only a few shortcuts are recognised: lone kings, king and one minor
    /// piece against a lone king, and one bishop each standing on the same
    /// square color. Other dead positions (several same-colored bishops,
    /// blocked pawn walls, ...) are not detected.
    pub fn is_dead(&self) -> bool {
        let heavy_or_pawns = self.pieces_of(Piece::Pawn)
            | self.pieces_of(Piece::Rook)
            | self.pieces_of(Piece::Queen);
        if heavy_or_pawns.is_not_empty() {
            return false;
        }

        let minors = |color: Color| -> u32 {
            Piece::ALL
                .into_iter()
                .filter(|piece| piece.is_minor())
                .map(|piece| self.pieces(piece, color).count())
                .sum()
        };
        let white_bishops = self.pieces(Piece::Bishop, Color::White);
        let black_bishops = self.pieces(Piece::Bishop, Color::Black);
        let white_minors = minors(Color::White);
        let black_minors = minors(Color::Black);

        match (white_minors, black_minors) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (1, 1) if white_bishops.count() == 1 && black_bishops.count() == 1 => {
                white_bishops.intersects(Bitboard::LIGHT_SQUARES)
                    == black_bishops.intersects(Bitboard::LIGHT_SQUARES)
            }
            _ => false,
        }
    }

    /// Checks that the twelve piece boards are disjoint and agree with the
    /// color and total occupancy.
    pub fn is_consistent(&self) -> bool {
        if self.colors[0].intersects(self.colors[1]) {
            return false;
        }
        if self.colors[0] | self.colors[1] != self.occupied {
            return false;
        }
        for color in Color::ALL {
            let mut seen = Bitboard::EMPTY;
            for piece in Piece::ALL {
                let bb = self.pieces(piece, color);
                if seen.intersects(bb) {
                    return false;
                }
                seen |= bb;
            }
            if seen != self.color(color) {
                return false;
            }
        }
        true
    }

    /// Renders the FEN piece placement field.
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in (0..8u8).rev() {
            let mut gap = 0;
            for file in 0..8u8 {
                let occupant = Square::from_index(rank * 8 + file).and_then(|sq| self.piece_at(sq));
                match occupant {
                    Some((piece, color)) => {
                        if gap > 0 {
                            out.push(char::from(b'0' + gap));
                            gap = 0;
                        }
                        out.push(piece.to_fen_char(color));
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                out.push(char::from(b'0' + gap));
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Fen;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn bb(squares: &[&str]) -> Bitboard {
        squares
            .iter()
            .fold(Bitboard::EMPTY, |acc, s| acc | Bitboard::from_square(sq(s)))
    }

    fn from_placement(fen: &str) -> Position {
        let parsed = Fen::parse(fen).unwrap();
        let mut position = Position::empty();
        for (sq, piece, color) in parsed.pieces() {
            position.put(piece, color, sq);
        }
        position
    }

    #[test]
    fn startpos_layout() {
        let pos = Position::startpos();
        assert_eq!(pos.occupied().count(), 32);
        assert_eq!(pos.color(Color::White), Bitboard(0xFFFF));
        assert_eq!(pos.king(Color::Black), bb(&["e8"]));
        assert_eq!(pos.piece_at(sq("d1")), Some((Piece::Queen, Color::White)));
        assert_eq!(pos.piece_at(sq("e4")), None);
        assert_eq!(pos.placement(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
        assert!(pos.is_consistent());
    }

    #[test]
    fn attackers_of_a_square() {
        let pos = from_placement("4k3/8/8/3r4/8/2N5/4P3/4K3 w - - 0 1");
        assert_eq!(pos.attackers(Color::White, bb(&["d5"])), bb(&["c3"]));
        assert_eq!(pos.attackers(Color::White, bb(&["d3"])), bb(&["e2"]));
        assert_eq!(pos.attackers(Color::Black, bb(&["d1"])), bb(&["d5"]));
        assert!(pos.is_attacked(Color::White, bb(&["f2"])));
        assert!(!pos.is_attacked(Color::Black, bb(&["e1"])));
    }

    #[test]
    fn double_check_has_two_checkers() {
        let pos = from_placement("4k3/8/8/8/1b6/8/4r3/4K3 w - - 0 1");
        let checkers = pos.checkers(Color::Black, pos.king(Color::White));
        assert_eq!(checkers, bb(&["b4", "e2"]));
    }

    #[test]
    fn attacked_squares_see_through_king() {
        let pos = from_placement("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        let blocked = pos.attacked_squares(Color::Black, false);
        let through = pos.attacked_squares(Color::Black, true);
        assert!(!blocked.contains(sq("f1")));
        assert!(through.contains(sq("f1")));
        assert!(through.contains(sq("h1")));
    }

    #[test]
    fn pinned_piece_keeps_its_line() {
        let pos = from_placement("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        let king = pos.king(Color::White);
        let movement = pos.pinned_movement(
            bb(&["e2"]),
            king,
            pos.rook_sliders(Color::Black),
            pos.bishop_sliders(Color::Black),
        );
        assert_eq!(movement, bb(&["e3", "e4", "e5", "e6", "e7"]));

        let free = pos.pinned_movement(
            bb(&["e8"]),
            king,
            pos.rook_sliders(Color::Black),
            pos.bishop_sliders(Color::Black),
        );
        assert_eq!(free, Bitboard::FULL);
    }

    #[test]
    fn wrong_slider_does_not_pin() {
        // A rook on a diagonal and a bishop on a file pin nothing.
        let pos = from_placement("4k3/4b3/8/r7/8/2B5/4N3/4K3 w - - 0 1");
        let king = pos.king(Color::White);
        let rooks = pos.rook_sliders(Color::Black);
        let bishops = pos.bishop_sliders(Color::Black);
        assert_eq!(
            pos.pinned_movement(bb(&["c3"]), king, rooks, bishops),
            Bitboard::FULL
        );
        assert_eq!(
            pos.pinned_movement(bb(&["e2"]), king, rooks, bishops),
            Bitboard::FULL
        );
    }

    #[test]
    fn make_move_capture_and_promotion() {
        let pos = from_placement("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let mv = Move::new(
            Piece::Pawn,
            Color::White,
            sq("a7"),
            sq("b8"),
            MoveKind::Promotion(Piece::Queen),
        );
        let (next, captured) = pos.make_move(mv);
        assert_eq!(captured, Some(Piece::Rook));
        assert_eq!(next.piece_at(sq("b8")), Some((Piece::Queen, Color::White)));
        assert!(next.pieces(Piece::Pawn, Color::White).is_empty());
        assert!(next.pieces(Piece::Rook, Color::Black).is_empty());
        assert!(next.is_consistent());
        // The source position is untouched.
        assert_eq!(pos.piece_at(sq("a7")), Some((Piece::Pawn, Color::White)));
    }

    #[test]
    fn make_move_en_passant_removes_victim() {
        let pos = from_placement("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let mv = Move::new(Piece::Pawn, Color::White, sq("e5"), sq("d6"), MoveKind::EnPassant);
        let (next, captured) = pos.make_move(mv);
        assert_eq!(captured, Some(Piece::Pawn));
        assert_eq!(next.piece_at(sq("d5")), None);
        assert_eq!(next.piece_at(sq("d6")), Some((Piece::Pawn, Color::White)));
    }

    #[test]
    fn make_move_castles_all_four_ways() {
        let pos = from_placement("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let cases = [
            (Color::White, CastleSide::Kingside, "g1", "f1"),
            (Color::White, CastleSide::Queenside, "c1", "d1"),
            (Color::Black, CastleSide::Kingside, "g8", "f8"),
            (Color::Black, CastleSide::Queenside, "c8", "d8"),
        ];
        for (color, side, king_to, rook_to) in cases {
            let (next, captured) = pos.make_move(Move::castle(color, side));
            assert_eq!(captured, None);
            assert_eq!(next.piece_at(sq(king_to)), Some((Piece::King, color)));
            assert_eq!(next.piece_at(sq(rook_to)), Some((Piece::Rook, color)));
            assert_eq!(next.piece_at(side.rook_home(color)), None);
            assert_eq!(next.occupied().count(), 6);
        }
    }

    #[test]
    fn dead_positions() {
        assert!(from_placement("4k3/8/8/8/8/8/8/4K3 w - -").is_dead());
        assert!(from_placement("4k3/8/8/8/8/8/8/3BK3 w - -").is_dead());
        assert!(from_placement("4kn2/8/8/8/8/8/8/4K3 w - -").is_dead());
        // c1 and f8 are both dark.
        assert!(from_placement("4kb2/8/8/8/8/8/8/2B1K3 w - -").is_dead());
        // c1 dark, c8 light.
        assert!(!from_placement("2b1k3/8/8/8/8/8/8/2B1K3 w - -").is_dead());
        assert!(!from_placement("4k3/8/8/8/8/8/8/2NNK3 w - -").is_dead());
        assert!(!from_placement("4k3/8/8/8/8/8/4P3/4K3 w - -").is_dead());
        assert!(!from_placement("4kn2/8/8/8/8/8/8/3NK3 w - -").is_dead());
    }

    #[test]
    fn placement_renders_gaps() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        assert_eq!(
            from_placement(fen).placement(),
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R"
        );
    }
}
