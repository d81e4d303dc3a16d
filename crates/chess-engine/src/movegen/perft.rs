//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use crate::Game;

/// Counts the number of leaf nodes at the given depth.
///
/// Leaves one ply away are counted from the move list without playing them.
pub fn perft(game: &Game, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = game.legal_moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&m| perft(&game.make_move(m), depth - 1))
        .sum()
}

/// Perft with divide: the node count below each root move, sorted by UCI.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(game: &Game, depth: u32) -> Vec<(String, u64)> {
    let moves = game.legal_moves();
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let nodes = if depth > 1 {
            perft(&game.make_move(*m), depth - 1)
        } else {
            1
        };
        tracing::debug!(mv = %m, nodes, "divide");
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
    const POSITION_6: &str =
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

    fn check(fen: &str, expected: &[u64]) {
        let game = Game::from_fen(fen).unwrap();
        for (depth, &nodes) in expected.iter().enumerate() {
            assert_eq!(
                perft(&game, depth as u32 + 1),
                nodes,
                "{} at depth {}",
                fen,
                depth + 1
            );
        }
    }

    #[test]
    fn perft_startpos() {
        check(chess_core::Fen::STARTPOS, &[20, 400, 8902, 197281]);
    }

    // Depth 5 is slower, only run in release mode
    #[test]
    #[ignore]
    fn perft_startpos_depth_5() {
        assert_eq!(perft(&Game::new(), 5), 4865609);
    }

    #[test]
    fn perft_kiwipete() {
        check(KIWIPETE, &[48, 2039, 97862]);
    }

    #[test]
    #[ignore]
    fn perft_kiwipete_depth_4() {
        let game = Game::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&game, 4), 4085603);
    }

    // Check evasion, en passant along a pinned rank, promotion
    #[test]
    fn perft_position3() {
        check(POSITION_3, &[14, 191, 2812, 43238]);
    }

    #[test]
    #[ignore]
    fn perft_position3_depth_5() {
        let game = Game::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&game, 5), 674624);
    }

    // Lots of promotions and captures
    #[test]
    fn perft_position4() {
        check(POSITION_4, &[6, 264, 9467]);
    }

    #[test]
    #[ignore]
    fn perft_position4_depth_4() {
        let game = Game::from_fen(POSITION_4).unwrap();
        assert_eq!(perft(&game, 4), 422333);
    }

    #[test]
    fn perft_position5() {
        check(POSITION_5, &[44, 1486, 62379]);
    }

    #[test]
    fn perft_position6() {
        check(POSITION_6, &[46, 2079, 89890]);
    }

    #[test]
    fn perft_divide_sums_to_perft() {
        let game = Game::from_fen(KIWIPETE).unwrap();
        let results = perft_divide(&game, 2);
        assert_eq!(results.len(), 48);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 2039);
        assert!(results.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(results.iter().any(|(m, _)| m == "e1g1"));
    }
}
