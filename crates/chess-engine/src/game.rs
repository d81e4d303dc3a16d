//! Game state on top of a [`Position`].
//!
//! A [`Game`] adds everything the rules need beyond piece placement: side to
//! move, castling rights, the en passant target, the repetition table and
//! both clocks. Games are values. [`Game::make_move`] returns the next game
//! and leaves `self` untouched, so any number of games can be held at once
//! (one per search branch, one per worker thread) without undo logic.

use std::collections::HashMap;
use std::fmt;

use chess_core::{CastleSide, Color, Fen, FenError, Move, MoveKind, Piece, Rank, Square};
use thiserror::Error;

use crate::movegen::{generate_moves, MoveList};
use crate::rules::{game_result, GameResult};
use crate::{Bitboard, CastleRights, Position};

/// Errors raised at the boundary where outside input becomes a [`Game`].
///
/// The engine itself never fails once it holds a valid game; these cover
/// decoding FEN and looking up moves given as text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// Everything that makes two positions the same for repetition purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PositionKey {
    position: Position,
    side: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
}

/// A chess game at one point in time.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    side: Color,
    castling: CastleRights,
    /// Square a pawn skipped over on the previous move.
    en_passant: Option<Square>,
    /// Occurrences of each position since the last irreversible move,
    /// including the current one.
    repetitions: HashMap<PositionKey, u8>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::with_state(
            Position::startpos(),
            Color::White,
            CastleRights::ALL,
            None,
            0,
            1,
        )
    }

    fn with_state(
        position: Position,
        side: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        let mut game = Game {
            position,
            side,
            castling,
            en_passant,
            repetitions: HashMap::new(),
            halfmove_clock,
            fullmove_number,
        };
        let key = game.key();
        game.repetitions.insert(key, 1);
        game
    }

    /// Creates a game from a FEN string.
    ///
    /// Besides the FEN syntax this rejects positions the engine cannot play
    /// from: a missing or extra king, pawns on the first or last rank,
    /// castling rights whose king or rook is not on its home square, an en
    /// passant target with no double-pushed pawn in front of it, and a side
    /// to move that could capture the enemy king.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let fen = Fen::parse(fen)?;

        let mut position = Position::empty();
        for (sq, piece, color) in fen.pieces() {
            position.put(piece, color, sq);
        }
        if !position.is_consistent() {
            return Err(GameError::InvalidPosition(
                "piece boards overlap".to_string(),
            ));
        }

        for color in Color::ALL {
            let kings = position.king(color).count();
            if kings != 1 {
                return Err(GameError::InvalidPosition(format!(
                    "{} has {} kings",
                    color, kings
                )));
            }
        }

        if position
            .pieces_of(Piece::Pawn)
            .intersects(Bitboard::RANK_1 | Bitboard::RANK_8)
        {
            return Err(GameError::InvalidPosition(
                "pawn on the first or last rank".to_string(),
            ));
        }

        let castling = CastleRights::from_fen(&fen.castling);
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if !castling.has(color, side) {
                    continue;
                }
                let king_home = Move::castle(color, side).from();
                let rook_home = side.rook_home(color);
                if position.piece_at(king_home) != Some((Piece::King, color))
                    || position.piece_at(rook_home) != Some((Piece::Rook, color))
                {
                    return Err(GameError::InvalidPosition(format!(
                        "{} cannot castle {:?} without king and rook at home",
                        color, side
                    )));
                }
            }
        }

        if let Some(ep) = fen.en_passant {
            Self::validate_en_passant(&position, fen.side, ep)?;
        }

        let them = fen.side.opposite();
        if position.is_attacked(fen.side, position.king(them)) {
            return Err(GameError::InvalidPosition(format!(
                "{} is in check but it is {}'s move",
                them, fen.side
            )));
        }

        Ok(Self::with_state(
            position,
            fen.side,
            castling,
            fen.en_passant,
            fen.halfmove_clock,
            fen.fullmove_number,
        ))
    }

    fn validate_en_passant(position: &Position, side: Color, ep: Square) -> Result<(), GameError> {
        let them = side.opposite();
        let expected_rank = match side {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        let forward = them.pawn_direction();
        let pawn = ep.offset(0, forward);
        let origin = ep.offset(0, -forward);
        let valid = ep.rank() == expected_rank
            && position.piece_at(ep).is_none()
            && origin.is_some_and(|sq| position.piece_at(sq).is_none())
            && pawn.is_some_and(|sq| position.piece_at(sq) == Some((Piece::Pawn, them)));
        if valid {
            Ok(())
        } else {
            Err(GameError::InvalidPosition(format!(
                "en passant target {} does not follow a double pawn push",
                ep
            )))
        }
    }

    fn key(&self) -> PositionKey {
        PositionKey {
            position: self.position.clone(),
            side: self.side,
            castling: self.castling,
            en_passant: self.en_passant,
        }
    }

    /// Returns the current piece placement.
    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn castle_rights(&self) -> CastleRights {
        self.castling
    }

    /// Square a pawn may capture onto en passant this move, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Halfmoves since the last pawn move or capture.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// How often the current position has occurred since the last
    /// irreversible move, counting this occurrence.
    pub fn repetition_count(&self) -> u8 {
        self.repetitions.get(&self.key()).copied().unwrap_or(0)
    }

    /// Returns true if any position since the last irreversible move has
    /// occurred three times.
    pub fn has_threefold(&self) -> bool {
        self.repetitions.values().any(|&count| count >= 3)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position
            .is_attacked(self.side.opposite(), self.position.king(self.side))
    }

    /// Generates every legal move for the side to move.
    #[inline]
    pub fn legal_moves(&self) -> MoveList {
        generate_moves(self)
    }

    /// Returns the terminal result, or `None` while the game goes on.
    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        game_result(self)
    }

    /// Plays a move and returns the resulting game.
    ///
    /// `mv` must come from this game's [`Game::legal_moves`]. Anything else
    /// is a caller bug; it is caught by a debug assertion only.
    pub fn make_move(&self, mv: Move) -> Game {
        debug_assert!(
            self.legal_moves().as_slice().contains(&mv),
            "{:?} is not legal in {}",
            mv,
            self
        );

        let us = self.side;
        let (position, captured) = self.position.make_move(mv);

        let mut castling = self.castling;
        match mv.piece() {
            Piece::King => castling = castling.without_color(us),
            Piece::Rook => castling = castling.without_rook_on(mv.from()),
            _ => {}
        }
        if captured == Some(Piece::Rook) {
            castling = castling.without_rook_on(mv.to());
        }

        let en_passant = if mv.is_double_push() {
            Square::from_index((mv.from().index() + mv.to().index()) / 2)
        } else {
            None
        };

        let halfmove_clock = if mv.piece() == Piece::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock + 1
        };
        let fullmove_number = match us {
            Color::White => self.fullmove_number,
            Color::Black => self.fullmove_number + 1,
        };

        let irreversible = captured.is_some()
            || matches!(mv.kind(), MoveKind::Promotion(_) | MoveKind::Castle(_));
        let repetitions = if irreversible {
            HashMap::new()
        } else {
            self.repetitions.clone()
        };

        let mut next = Game {
            position,
            side: us.opposite(),
            castling,
            en_passant,
            repetitions,
            halfmove_clock,
            fullmove_number,
        };
        let key = next.key();
        let count = next.repetitions.entry(key).or_insert(0);
        *count = count.saturating_add(1);
        next
    }

    /// Finds the legal move written in UCI notation ("e2e4", "e7e8q", "e1g1").
    pub fn find_uci(&self, uci: &str) -> Option<Move> {
        self.legal_moves()
            .as_slice()
            .iter()
            .copied()
            .find(|mv| mv.to_uci() == uci)
    }

    /// Plays a move given in UCI notation.
    pub fn make_move_uci(&self, uci: &str) -> Result<Game, GameError> {
        let mv = self
            .find_uci(uci)
            .ok_or_else(|| GameError::IllegalMove(uci.to_string()))?;
        Ok(self.make_move(mv))
    }

    /// Renders the game as a FEN string.
    pub fn to_fen(&self) -> String {
        Fen {
            placement: self.position.placement(),
            side: self.side,
            castling: self.castling.to_string(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}
