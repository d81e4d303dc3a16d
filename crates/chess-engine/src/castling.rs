//! Castling rights.

use chess_core::{CastleSide, Color, Square};
use std::fmt;

/// The four castling rights, one bit each.
///
/// Rights are only ever removed during a game; nothing in the engine sets
/// a bit once it has been cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);

    const WHITE_KINGSIDE: u8 = 0b0001;
    const WHITE_QUEENSIDE: u8 = 0b0010;
    const BLACK_KINGSIDE: u8 = 0b0100;
    const BLACK_QUEENSIDE: u8 = 0b1000;

    #[inline]
    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Parses the castling field of a FEN record ("KQkq", "Kq", "-", ...).
    pub fn from_fen(field: &str) -> Self {
        field.chars().fold(Self::NONE, |rights, c| match c {
            'K' => rights.with(Color::White, CastleSide::Kingside),
            'Q' => rights.with(Color::White, CastleSide::Queenside),
            'k' => rights.with(Color::Black, CastleSide::Kingside),
            'q' => rights.with(Color::Black, CastleSide::Queenside),
            _ => rights,
        })
    }

    /// Returns true if `color` may still castle on `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    /// Returns these rights plus one more. Only used while decoding a
    /// starting position.
    #[inline]
    #[must_use]
    pub const fn with(self, color: Color, side: CastleSide) -> Self {
        CastleRights(self.0 | Self::flag(color, side))
    }

    /// Returns these rights minus one.
    #[inline]
    #[must_use]
    pub const fn without(self, color: Color, side: CastleSide) -> Self {
        CastleRights(self.0 & !Self::flag(color, side))
    }

    /// Returns these rights minus both of `color`'s.
    #[inline]
    #[must_use]
    pub const fn without_color(self, color: Color) -> Self {
        self.without(color, CastleSide::Kingside)
            .without(color, CastleSide::Queenside)
    }

    /// Drops whatever right is tied to a rook standing on `sq`.
    ///
    /// Used both when a rook leaves its home square and when something
    /// captures on it.
    #[inline]
    #[must_use]
    pub fn without_rook_on(self, sq: Square) -> Self {
        let mut rights = self;
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if side.rook_home(color) == sq {
                    rights = rights.without(color, side);
                }
            }
        }
        rights
    }

    /// Returns true if `self` holds no right that `earlier` lacked.
    #[inline]
    pub const fn is_subset_of(self, earlier: CastleRights) -> bool {
        self.0 & !earlier.0 == 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CastleRights {
    /// Renders the FEN castling field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let letters = [
            (Color::White, CastleSide::Kingside, 'K'),
            (Color::White, CastleSide::Queenside, 'Q'),
            (Color::Black, CastleSide::Kingside, 'k'),
            (Color::Black, CastleSide::Queenside, 'q'),
        ];
        for (color, side, letter) in letters {
            if self.has(color, side) {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_roundtrip() {
        for field in ["KQkq", "Kq", "k", "-"] {
            assert_eq!(CastleRights::from_fen(field).to_string(), field);
        }
    }

    #[test]
    fn removing_rights() {
        let rights = CastleRights::ALL.without(Color::White, CastleSide::Queenside);
        assert!(rights.has(Color::White, CastleSide::Kingside));
        assert!(!rights.has(Color::White, CastleSide::Queenside));
        assert!(rights.is_subset_of(CastleRights::ALL));
        assert!(!CastleRights::ALL.is_subset_of(rights));

        let black_gone = rights.without_color(Color::Black);
        assert_eq!(black_gone.to_string(), "K");
    }

    #[test]
    fn rook_squares_map_to_rights() {
        let rights = CastleRights::ALL.without_rook_on(Square::H8);
        assert_eq!(rights.to_string(), "KQq");
        let rights = rights.without_rook_on(Square::A1);
        assert_eq!(rights.to_string(), "Kq");
        assert_eq!(rights.without_rook_on(Square::E1), rights);
    }
}
