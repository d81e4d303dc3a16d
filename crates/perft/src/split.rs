//! Root-split perft on a rayon pool.
//!
//! Each root move is one task. Subtrees differ wildly in size, so idle
//! workers steal whatever root moves are left. Every task plays its move on
//! a fresh game; nothing mutable is shared.

use anyhow::Context;
use chess_core::Move;
use chess_engine::{perft, Game};
use rayon::prelude::*;

/// Node count below each root move, in generation order.
pub fn perft_split(game: &Game, depth: u32, threads: usize) -> anyhow::Result<Vec<(Move, u64)>> {
    if depth == 0 {
        return Ok(Vec::new());
    }
    let moves: Vec<Move> = game.legal_moves().iter().copied().collect();

    let count = |&mv: &Move| {
        let nodes = if depth == 1 {
            1
        } else {
            perft(&game.make_move(mv), depth - 1)
        };
        (mv, nodes)
    };

    if threads <= 1 {
        return Ok(moves.iter().map(count).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("building perft thread pool")?;
    Ok(pool.install(|| moves.par_iter().map(count).collect()))
}
