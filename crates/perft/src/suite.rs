//! Perft suite files.
//!
//! A suite is a TOML file with one `[[position]]` table per position:
//!
//! ```toml
//! [[position]]
//! name = "startpos"
//! fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
//! nodes = [20, 400, 8902]
//! ```
//!
//! `nodes[i]` is the expected leaf count at depth `i + 1`.

use std::path::Path;

use chess_engine::{Game, GameError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a suite file.
#[derive(Error, Debug)]
pub enum SuiteError {
    /// Failed to read the suite file from disk.
    #[error("Failed to read suite file: {0}")]
    ReadError(#[from] std::io::Error),
    /// The file is not valid TOML or does not match the suite layout.
    #[error("Failed to parse suite: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The file has no `[[position]]` entries.
    #[error("Suite has no positions")]
    Empty,
    /// An entry lists no expected node counts.
    #[error("Position {0} has no node counts")]
    NoNodes(String),
    /// An entry's FEN cannot be played from.
    #[error("Position {name}: {source}")]
    InvalidFen {
        name: String,
        #[source]
        source: GameError,
    },
}

/// One position with its reference node counts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuiteEntry {
    pub name: String,
    pub fen: String,
    pub nodes: Vec<u64>,
}

impl SuiteEntry {
    /// Builds the root game for this entry.
    pub fn game(&self) -> Result<Game, SuiteError> {
        Game::from_fen(&self.fen).map_err(|source| SuiteError::InvalidFen {
            name: self.name.clone(),
            source,
        })
    }

    /// Expected counts limited to `max_depth`, paired with their depth.
    pub fn depths(&self, max_depth: Option<u32>) -> impl Iterator<Item = (u32, u64)> + '_ {
        let limit = max_depth.map_or(usize::MAX, |d| d as usize);
        self.nodes
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, &nodes)| (i as u32 + 1, nodes))
    }
}

/// A list of reference positions.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Suite {
    #[serde(default, rename = "position")]
    pub positions: Vec<SuiteEntry>,
}

impl Suite {
    /// Parses and validates suite text.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::ParseError`] for malformed TOML, and the
    /// matching validation error for an empty suite, an entry without
    /// counts, or an unplayable FEN.
    pub fn parse(content: &str) -> Result<Self, SuiteError> {
        let suite: Suite = toml::from_str(content)?;
        if suite.positions.is_empty() {
            return Err(SuiteError::Empty);
        }
        for entry in &suite.positions {
            if entry.nodes.is_empty() {
                return Err(SuiteError::NoNodes(entry.name.clone()));
            }
            entry.game()?;
        }
        Ok(suite)
    }

    /// Loads a suite from disk.
    pub fn load(path: &Path) -> Result<Self, SuiteError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[[position]]
name = "startpos"
fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
nodes = [20, 400, 8902]

[[position]]
name = "position 3"
fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -"
nodes = [14, 191]
"#;

    #[test]
    fn parse_sample() {
        let suite = Suite::parse(SAMPLE).unwrap();
        assert_eq!(suite.positions.len(), 2);
        assert_eq!(suite.positions[1].name, "position 3");
        assert_eq!(suite.positions[0].nodes, vec![20, 400, 8902]);
    }

    #[test]
    fn depths_respect_limit() {
        let suite = Suite::parse(SAMPLE).unwrap();
        let depths: Vec<_> = suite.positions[0].depths(Some(2)).collect();
        assert_eq!(depths, vec![(1, 20), (2, 400)]);
        assert_eq!(suite.positions[0].depths(None).count(), 3);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let suite = Suite::load(file.path()).unwrap();
        assert_eq!(suite.positions.len(), 2);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Suite::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SuiteError::ReadError(_)));
    }

    #[test]
    fn rejects_bad_suites() {
        assert!(matches!(Suite::parse(""), Err(SuiteError::Empty)));
        assert!(matches!(
            Suite::parse("[[position]]\nname = 1"),
            Err(SuiteError::ParseError(_))
        ));
        let no_kings = r#"
[[position]]
name = "x"
fen = "8/8/8/8/8/8/8/8 w - - 0 1"
nodes = [1]
"#;
        assert!(matches!(
            Suite::parse(no_kings),
            Err(SuiteError::InvalidFen { .. })
        ));
        let no_nodes = r#"
[[position]]
name = "x"
fen = "4k3/8/8/8/8/8/8/4K3 w - - 0 1"
nodes = []
"#;
        assert!(matches!(Suite::parse(no_nodes), Err(SuiteError::NoNodes(_))));
    }
}
