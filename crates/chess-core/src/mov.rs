//! Move representation.

use crate::{Color, Piece, Square};
use std::fmt;

/// Which rook a king castles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastleSide {
    /// O-O, with the h-file rook.
    Kingside,
    /// O-O-O, with the a-file rook.
    Queenside,
}

impl CastleSide {
    /// Both sides, kingside first.
    pub const ALL: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// Square the king lands on.
    #[inline]
    pub const fn king_target(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::Kingside, Color::White) => Square::G1,
            (CastleSide::Queenside, Color::White) => Square::C1,
            (CastleSide::Kingside, Color::Black) => Square::G8,
            (CastleSide::Queenside, Color::Black) => Square::C8,
        }
    }

    /// Home square of the rook this side castles with.
    #[inline]
    pub const fn rook_home(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::Kingside, Color::White) => Square::H1,
            (CastleSide::Queenside, Color::White) => Square::A1,
            (CastleSide::Kingside, Color::Black) => Square::H8,
            (CastleSide::Queenside, Color::Black) => Square::A8,
        }
    }
}

/// What a move does beyond relocating one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveKind {
    /// A plain move or capture, including pawn double pushes.
    Normal,
    /// Pawn capture of a pawn that just double-pushed past it.
    EnPassant,
    /// King and rook swap sides.
    Castle(CastleSide),
    /// Pawn reaches the last rank and becomes the given piece.
    Promotion(Piece),
}

/// Canonical move identity: from, to, castle side and promotion piece
/// packed into 16 bits.
///
/// Layout: bits 0-5 from, bits 6-11 to, bits 12-15 tag
/// (0 none, 1 kingside, 2 queenside, 3-6 promotion to N/B/R/Q).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveId(u16);

impl MoveId {
    /// Raw packed value.
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }
}

/// A chess move.
///
/// Moves carry the mover's kind and color so that applying one never has to
/// look the piece up again. Castling is recorded as the king's two-square
/// step (e1g1, e1c1, ...).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    piece: Piece,
    color: Color,
    from: Square,
    to: Square,
    kind: MoveKind,
}

impl Move {
    /// Placeholder filling unused move list slots. Never a legal move.
    pub const NULL: Move = Move::normal(Piece::Pawn, Color::White, Square::A1, Square::A1);

    /// Creates a move of the given kind.
    #[inline]
    pub const fn new(piece: Piece, color: Color, from: Square, to: Square, kind: MoveKind) -> Self {
        Move {
            piece,
            color,
            from,
            to,
            kind,
        }
    }

    /// Creates a normal move.
    #[inline]
    pub const fn normal(piece: Piece, color: Color, from: Square, to: Square) -> Self {
        Self::new(piece, color, from, to, MoveKind::Normal)
    }

    /// Creates the king move for castling on `side`.
    #[inline]
    pub const fn castle(color: Color, side: CastleSide) -> Self {
        let from = match color {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        };
        Self::new(
            Piece::King,
            color,
            from,
            side.king_target(color),
            MoveKind::Castle(side),
        )
    }

    #[inline]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        match self.kind {
            MoveKind::Promotion(piece) => Some(piece),
            _ => None,
        }
    }

    /// Returns the castle side if this is a castling move.
    #[inline]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self.kind {
            MoveKind::Castle(side) => Some(side),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    /// Returns true for a pawn advancing two ranks.
    #[inline]
    pub const fn is_double_push(self) -> bool {
        matches!(self.piece, Piece::Pawn) && self.from.index().abs_diff(self.to.index()) == 16
    }

    /// Returns the canonical id of this move.
    pub const fn id(self) -> MoveId {
        let tag: u16 = match self.kind {
            MoveKind::Normal | MoveKind::EnPassant => 0,
            MoveKind::Castle(CastleSide::Kingside) => 1,
            MoveKind::Castle(CastleSide::Queenside) => 2,
            MoveKind::Promotion(Piece::Knight) => 3,
            MoveKind::Promotion(Piece::Bishop) => 4,
            MoveKind::Promotion(Piece::Rook) => 5,
            MoveKind::Promotion(_) => 6,
        };
        MoveId((self.from.index() as u16) | ((self.to.index() as u16) << 6) | (tag << 12))
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.promotion() {
            Some(piece) => format!("{}{}{}", self.from, self.to, piece.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move({} {} {} {:?})",
            self.color,
            self.piece,
            self.to_uci(),
            self.kind
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};
    use std::collections::HashSet;

    #[test]
    fn uci_notation() {
        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        let m = Move::normal(Piece::Pawn, Color::White, e2, e4);
        assert_eq!(m.to_uci(), "e2e4");
        assert!(m.is_double_push());

        let e7 = Square::new(File::E, Rank::R7);
        let promo = Move::new(
            Piece::Pawn,
            Color::White,
            e7,
            Square::E8,
            MoveKind::Promotion(Piece::Knight),
        );
        assert_eq!(promo.to_uci(), "e7e8n");
        assert_eq!(promo.promotion(), Some(Piece::Knight));
        assert!(!promo.is_double_push());
    }

    #[test]
    fn castling_is_king_step() {
        let m = Move::castle(Color::White, CastleSide::Kingside);
        assert_eq!(m.to_uci(), "e1g1");
        assert_eq!(m.castle_side(), Some(CastleSide::Kingside));
        let m = Move::castle(Color::Black, CastleSide::Queenside);
        assert_eq!(m.to_uci(), "e8c8");
        assert_eq!(m.piece(), Piece::King);
    }

    #[test]
    fn ids_distinguish_promotions_and_castling() {
        let from = Square::new(File::B, Rank::R7);
        let to = Square::A8;
        let ids: HashSet<MoveId> = Piece::PROMOTIONS
            .iter()
            .map(|&p| Move::new(Piece::Pawn, Color::White, from, to, MoveKind::Promotion(p)).id())
            .collect();
        assert_eq!(ids.len(), 4);

        let castle = Move::castle(Color::White, CastleSide::Kingside);
        let step = Move::normal(Piece::King, Color::White, Square::E1, Square::G1);
        assert_ne!(castle.id(), step.id());
    }

    #[test]
    fn id_packs_squares() {
        let m = Move::normal(Piece::Rook, Color::Black, Square::H8, Square::H1);
        assert_eq!(m.id().get() & 0x3F, 63);
        assert_eq!((m.id().get() >> 6) & 0x3F, 7);
        assert_eq!(m.id().get() >> 12, 0);
    }
}
