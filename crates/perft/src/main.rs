//! chess-perft - counts legal move-tree leaves and checks them against
//! reference suites.

mod split;
mod suite;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use chess_core::{Color, Fen};
use chess_engine::{Game, GameResult};
use clap::{Parser, Subcommand};
use serde::Serialize;
use split::perft_split;
use suite::Suite;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-perft")]
#[command(about = "Perft driver for the bitboard chess engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaves below one position
    Run {
        /// Root position
        #[arg(long, default_value = Fen::STARTPOS)]
        fen: String,
        /// Depth in plies
        #[arg(short, long, default_value = "5")]
        depth: u32,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
        /// Worker threads for the root split
        #[arg(short, long, default_value = "1")]
        threads: usize,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Verify every position of a TOML suite
    Suite {
        /// Suite file with [[position]] entries
        file: PathBuf,
        /// Skip expected counts deeper than this
        #[arg(long)]
        max_depth: Option<u32>,
        /// Worker threads for the root split
        #[arg(short, long, default_value = "1")]
        threads: usize,
    },
}

#[derive(Serialize)]
struct RunReport {
    fen: String,
    depth: u32,
    nodes: u64,
    millis: u128,
    nps: u64,
    result: Option<GameResult>,
    winner: Option<Color>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    divide: Vec<DivideEntry>,
}

#[derive(Serialize)]
struct DivideEntry {
    #[serde(rename = "move")]
    uci: String,
    nodes: u64,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            fen,
            depth,
            divide,
            threads,
            json,
        } => run(&fen, depth, divide, threads, json),
        Commands::Suite {
            file,
            max_depth,
            threads,
        } => run_suite(&file, max_depth, threads),
    }
}

fn nps(nodes: u64, millis: u128) -> u64 {
    (nodes as u128 * 1000 / millis.max(1)) as u64
}

fn run(
    fen: &str,
    depth: u32,
    divide: bool,
    threads: usize,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let game = Game::from_fen(fen).with_context(|| format!("invalid FEN: {}", fen))?;
    let result = game.result();
    if let Some(result) = result {
        tracing::info!(%result, "root position is terminal");
    }

    let start = Instant::now();
    let split = if depth == 0 {
        Vec::new()
    } else {
        perft_split(&game, depth, threads)?
    };
    let nodes: u64 = if depth == 0 {
        1
    } else {
        split.iter().map(|(_, n)| n).sum()
    };
    let millis = start.elapsed().as_millis();
    tracing::info!(depth, nodes, millis, nps = nps(nodes, millis), threads, "perft done");

    let mut entries: Vec<DivideEntry> = split
        .iter()
        .map(|(mv, nodes)| DivideEntry {
            uci: mv.to_uci(),
            nodes: *nodes,
        })
        .collect();
    entries.sort_by(|a, b| a.uci.cmp(&b.uci));

    if json {
        let report = RunReport {
            fen: game.to_fen(),
            depth,
            nodes,
            millis,
            nps: nps(nodes, millis),
            result,
            winner: result.and_then(GameResult::winner),
            divide: if divide { entries } else { Vec::new() },
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    if divide {
        for entry in &entries {
            println!("{}: {}", entry.uci, entry.nodes);
        }
        println!();
    }
    println!("Nodes: {}", nodes);
    if let Some(result) = result {
        println!("Result: {} ({})", result, result.score());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_suite(
    file: &Path,
    max_depth: Option<u32>,
    threads: usize,
) -> anyhow::Result<ExitCode> {
    let suite = Suite::load(file).with_context(|| format!("loading {}", file.display()))?;
    tracing::info!(positions = suite.positions.len(), "suite loaded");

    let mut failures = 0usize;
    let start = Instant::now();
    let mut total = 0u64;

    for entry in &suite.positions {
        let game = entry.game()?;
        for (depth, expected) in entry.depths(max_depth) {
            let nodes: u64 = perft_split(&game, depth, threads)?
                .iter()
                .map(|(_, n)| n)
                .sum();
            total += nodes;
            if nodes == expected {
                tracing::info!(name = %entry.name, depth, nodes, "ok");
            } else {
                failures += 1;
                tracing::error!(name = %entry.name, depth, nodes, expected, "mismatch");
            }
        }
    }

    let millis = start.elapsed().as_millis();
    tracing::info!(total, millis, nps = nps(total, millis), failures, "suite done");

    if failures > 0 {
        println!("{} mismatches", failures);
        Ok(ExitCode::FAILURE)
    } else {
        println!("All positions match ({} nodes)", total);
        Ok(ExitCode::SUCCESS)
    }
}
