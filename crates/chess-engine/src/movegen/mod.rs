//! Legal move generation.
//!
//! Moves are generated legal from the start rather than generated and then
//! filtered. The king steps only onto squares the opponent does not attack.
//! Every other piece intersects its raw destinations with a check-evasion
//! mask and its pin ray. En passant is the single exception and is
//! confirmed by playing it out.

mod attacks;
pub mod perft;
mod rays;

use crate::{Bitboard, Game};
use chess_core::{CastleSide, Color, Move, MoveKind, Piece};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, pawn_table, queen_attacks,
    rook_attacks, PawnTable,
};
pub use rays::{between, ray, ray_entry, Direction, RayEntry};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of legal moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the side to move.
pub fn generate_moves(game: &Game) -> MoveList {
    let mut moves = MoveList::new();
    let position = game.position();
    let us = game.side_to_move();
    let them = us.opposite();
    let king = position.king(us);
    let Some(king_sq) = king.lsb() else {
        return moves;
    };
    let own = position.color(us);

    // King steps first, against attacks traced through the king itself.
    let attacked = position.attacked_squares(them, true);
    for to in king_attacks(king_sq) & !own & !attacked {
        moves.push(Move::normal(Piece::King, us, king_sq, to));
    }

    let checkers = position.checkers(them, king);
    if checkers.has_many() {
        return moves;
    }

    let enemy_rooks = position.rook_sliders(them);
    let enemy_bishops = position.bishop_sliders(them);
    let (capture_mask, push_mask) = match checkers.lsb() {
        Some(checker_sq) => {
            let sliding = position
                .piece_at(checker_sq)
                .is_some_and(|(piece, _)| piece.is_slider());
            let push = if sliding {
                between(king_sq, checker_sq)
            } else {
                Bitboard::EMPTY
            };
            (checkers, push)
        }
        None => (Bitboard::FULL, Bitboard::FULL),
    };
    let evasion = capture_mask | push_mask;

    let targets = Targets {
        game,
        king,
        enemy_rooks,
        enemy_bishops,
        capture_mask,
        push_mask,
    };

    let occupied = position.occupied();
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        for from in position.pieces(piece, us) {
            let pin = targets.pin(Bitboard::from_square(from));
            let reach = match piece {
                Piece::Knight => knight_attacks(from),
                Piece::Bishop => bishop_attacks(from, occupied),
                Piece::Rook => rook_attacks(from, occupied),
                _ => queen_attacks(from, occupied),
            };
            for to in reach & !own & evasion & pin {
                moves.push(Move::normal(piece, us, from, to));
            }
        }
    }

    generate_pawn_moves(&targets, &mut moves);

    if checkers.is_empty() {
        generate_castling_moves(game, attacked, &mut moves);
    }

    moves
}

/// Masks shared by every non-king move of one generation pass.
struct Targets<'a> {
    game: &'a Game,
    king: Bitboard,
    enemy_rooks: Bitboard,
    enemy_bishops: Bitboard,
    /// Squares a capture must land on: the checker, or anywhere.
    capture_mask: Bitboard,
    /// Squares a quiet move must land on: between king and checker, or anywhere.
    push_mask: Bitboard,
}

impl Targets<'_> {
    #[inline]
    fn pin(&self, square: Bitboard) -> Bitboard {
        self.game.position().pinned_movement(
            square,
            self.king,
            self.enemy_rooks,
            self.enemy_bishops,
        )
    }
}

fn generate_pawn_moves(targets: &Targets<'_>, moves: &mut MoveList) {
    let game = targets.game;
    let position = game.position();
    let us = game.side_to_move();
    let them = us.opposite();
    let table = pawn_table(us);
    let empty = !position.occupied();
    let enemy = position.color(them);

    for from in position.pieces(Piece::Pawn, us) {
        let i = from.index() as usize;
        let from_bb = Bitboard::from_square(from);
        let pin = targets.pin(from_bb);
        let quiet = targets.push_mask & pin & empty;
        let capture = targets.capture_mask & pin & enemy;

        let single = table.push[i] & empty;
        for to in single & quiet {
            moves.push(Move::normal(Piece::Pawn, us, from, to));
        }
        if single.is_not_empty() {
            for to in table.double_push[i] & quiet {
                moves.push(Move::normal(Piece::Pawn, us, from, to));
            }
        }
        for to in table.capture[i] & capture {
            moves.push(Move::normal(Piece::Pawn, us, from, to));
        }

        let promotions = (table.promotion_push[i] & quiet) | (table.promotion_capture[i] & capture);
        for to in promotions {
            for piece in Piece::PROMOTIONS {
                moves.push(Move::new(Piece::Pawn, us, from, to, MoveKind::Promotion(piece)));
            }
        }

        if let Some(ep) = game.en_passant() {
            let ep_bb = Bitboard::from_square(ep);
            if !table.en_passant[i].intersects(ep_bb) {
                continue;
            }
            let victim = match us {
                Color::White => ep_bb.south(),
                Color::Black => ep_bb.north(),
            };
            let evades = ep_bb.intersects(targets.push_mask & pin)
                || (victim.intersects(targets.capture_mask) && ep_bb.intersects(pin));
            if !evades {
                continue;
            }
            // Removing two pawns from one rank can open a line the pin
            // masks never saw, so play it out and look again.
            let mv = Move::new(Piece::Pawn, us, from, ep, MoveKind::EnPassant);
            let (after, _) = position.make_move(mv);
            if !after.is_attacked(them, targets.king) {
                moves.push(mv);
            }
        }
    }
}

fn generate_castling_moves(game: &Game, attacked: Bitboard, moves: &mut MoveList) {
    let position = game.position();
    let us = game.side_to_move();
    let rights = game.castle_rights();

    for side in CastleSide::ALL {
        if !rights.has(us, side) {
            continue;
        }
        let mv = Move::castle(us, side);
        let king_from = mv.from();
        let rook_home = side.rook_home(us);
        if !position.pieces(Piece::Rook, us).contains(rook_home)
            || !position.king(us).contains(king_from)
        {
            continue;
        }
        if position.occupied().intersects(between(king_from, rook_home)) {
            continue;
        }
        let king_path = between(king_from, mv.to())
            | Bitboard::from_square(king_from)
            | Bitboard::from_square(mv.to());
        if attacked.intersects(king_path) {
            continue;
        }
        moves.push(mv);
    }
}
