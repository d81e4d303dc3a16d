//! Bitboard chess engine: attack tables, legal move generation and game
//! results.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with edge-safe shifts
//! - [`Position`] - piece placement with attack, check and pin queries
//! - [`Game`] - full game state with repetition tracking
//! - [`generate_moves`] - legal move generation
//! - [`game_result`] - mate, stalemate and draw classification
//! - [`perft`] - node counting for generator validation
//!
//! # Architecture
//!
//! Each piece type and color has a 64-bit set of occupied squares. Knight,
//! king and pawn attacks come from precomputed tables. Slider attacks walk
//! per-direction ray tables indexed by the occupancy of the ray, so a
//! lookup stops at the first blocker.
//!
//! # Example
//!
//! ```
//! use chess_engine::{perft, Game};
//!
//! let game = Game::new();
//! assert_eq!(game.legal_moves().len(), 20);
//!
//! let game = game.make_move_uci("e2e4").unwrap();
//! let game = game.make_move_uci("e7e5").unwrap();
//! assert_eq!(game.result(), None);
//! assert_eq!(perft(&game, 1), 29);
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod bitboard;
mod castling;
mod game;
pub mod movegen;
mod position;
pub mod rules;

pub use bitboard::Bitboard;
pub use castling::CastleRights;
pub use game::{Game, GameError};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    between, bishop_attacks, generate_moves, king_attacks, knight_attacks, pawn_attacks,
    queen_attacks, rook_attacks, MoveList,
};
pub use position::Position;
pub use rules::{game_result, DrawReason, GameResult};
