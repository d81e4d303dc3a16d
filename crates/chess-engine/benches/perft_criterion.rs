use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chess_engine::{perft, Game};

struct Case {
    name: &'static str,
    fen: &'static str,
    nodes: &'static [u64],
}

const QUICK: &[Case] = &[
    Case {
        name: "startpos",
        fen: chess_core::Fen::STARTPOS,
        nodes: &[20, 400, 8902],
    },
    Case {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        nodes: &[48, 2039],
    },
    Case {
        name: "position_3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        nodes: &[14, 191, 2812],
    },
];

const FULL: &[Case] = &[
    Case {
        name: "startpos",
        fen: chess_core::Fen::STARTPOS,
        nodes: &[20, 400, 8902, 197_281],
    },
    Case {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        nodes: &[48, 2039, 97_862],
    },
    Case {
        name: "position_3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        nodes: &[14, 191, 2812, 43_238, 674_624],
    },
    Case {
        name: "position_4",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        nodes: &[6, 264, 9467, 422_333],
    },
    Case {
        name: "position_5",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        nodes: &[44, 1486, 62_379],
    },
];

// CHESS_BENCH_SUITE=full selects the deeper cases.
fn selected() -> (&'static str, &'static [Case]) {
    match std::env::var("CHESS_BENCH_SUITE") {
        Ok(value) if value.eq_ignore_ascii_case("full") => ("full", FULL),
        _ => ("quick", QUICK),
    }
}

fn bench_perft(c: &mut Criterion) {
    let (suite, cases) = selected();
    let mut group = c.benchmark_group(format!("perft_{suite}"));
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for case in cases {
        let game = Game::from_fen(case.fen).expect("benchmark FEN should parse");

        for (i, &expected) in case.nodes.iter().enumerate() {
            let depth = i as u32 + 1;
            assert_eq!(
                perft(&game, depth),
                expected,
                "{} depth {}",
                case.name,
                depth
            );

            group.throughput(Throughput::Elements(expected));
            group.bench_with_input(
                BenchmarkId::new(case.name, depth),
                &depth,
                |b, &depth| b.iter(|| perft(black_box(&game), black_box(depth))),
            );
        }
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let game = Game::from_fen(QUICK[1].fen).expect("benchmark FEN should parse");
    c.bench_function("legal_moves_kiwipete", |b| {
        b.iter(|| black_box(&game).legal_moves().len())
    });
}

criterion_group!(perft_benches, bench_perft, bench_movegen);
criterion_main!(perft_benches);
