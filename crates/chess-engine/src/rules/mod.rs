//! Terminal game results.
//!
//! Results are plain outputs of a finished game, never errors.

use std::fmt;

use crate::Game;
use chess_core::Color;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

impl GameResult {
    /// The side that delivered mate, if any.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }

    /// PGN-style score ("1-0", "0-1", "1/2-1/2").
    pub const fn score(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        }
    }
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// Neither side can mate with the material left.
    DeadPosition,
    /// The same position occurred three times.
    ThreefoldRepetition,
    /// 100 halfmoves without a pawn move or capture.
    FiftyMoveRule,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "white wins"),
            GameResult::BlackWins => write!(f, "black wins"),
            GameResult::Draw(reason) => write!(f, "draw by {}", reason),
        }
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::DeadPosition => "dead position",
            DrawReason::ThreefoldRepetition => "threefold repetition",
            DrawReason::FiftyMoveRule => "fifty-move rule",
        };
        write!(f, "{}", name)
    }
}

/// Halfmoves without progress after which the game is drawn.
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Classifies `game`, returning `None` while play continues.
///
/// Checked in order: mate or stalemate, dead position, threefold
/// repetition, fifty-move rule. Draws are applied automatically; there is
/// no claiming.
pub fn game_result(game: &Game) -> Option<GameResult> {
    if game.legal_moves().is_empty() {
        if !game.is_check() {
            return Some(GameResult::Draw(DrawReason::Stalemate));
        }
        return Some(match game.side_to_move() {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        });
    }
    if game.position().is_dead() {
        return Some(GameResult::Draw(DrawReason::DeadPosition));
    }
    if game.has_threefold() {
        return Some(GameResult::Draw(DrawReason::ThreefoldRepetition));
    }
    if game.halfmove_clock() >= FIFTY_MOVE_HALFMOVES {
        return Some(GameResult::Draw(DrawReason::FiftyMoveRule));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_rank_mate() {
        let game = Game::from_fen("6k1/5ppp/8/8/8/8/8/K2R4 w - - 0 1")
            .unwrap()
            .make_move_uci("d1d8")
            .unwrap();
        assert_eq!(game.result(), Some(GameResult::WhiteWins));
        assert_eq!(GameResult::WhiteWins.winner(), Some(Color::White));
    }

    #[test]
    fn mate_outranks_fifty_moves() {
        // Mate delivered on the hundredth quiet halfmove is still mate.
        let game = Game::from_fen("6k1/5ppp/8/8/8/8/8/K2R4 w - - 99 80")
            .unwrap()
            .make_move_uci("d1d8")
            .unwrap();
        assert_eq!(game.halfmove_clock(), 100);
        assert_eq!(game.result(), Some(GameResult::WhiteWins));
    }

    #[test]
    fn dead_position() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1").unwrap();
        assert_eq!(
            game.result(),
            Some(GameResult::Draw(DrawReason::DeadPosition))
        );
    }

    #[test]
    fn fifty_move_boundary() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 60").unwrap();
        assert_eq!(game.result(), None);
        let game = game.make_move_uci("a1a2").unwrap();
        assert_eq!(game.halfmove_clock(), 100);
        assert_eq!(
            game.result(),
            Some(GameResult::Draw(DrawReason::FiftyMoveRule))
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            GameResult::Draw(DrawReason::FiftyMoveRule).to_string(),
            "draw by fifty-move rule"
        );
        assert_eq!(GameResult::BlackWins.score(), "0-1");
    }
}
