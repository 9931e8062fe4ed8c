//! Run output: per-generation CSV stats and JSON result export.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::schema::{Board, EvolutionResult, GenerationSummary};

const STATS_HEADER: &str = "gen,best_fit,avg_fit,min_fit,max_fit,mut";

/// Writes one CSV row per generation summary.
pub struct StatsWriter<W: Write> {
    out: W,
    rows: usize,
}

impl<W: Write> StatsWriter<W> {
    /// Wrap `out` and write the header line.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "{STATS_HEADER}")?;
        Ok(Self { out, rows: 0 })
    }

    pub fn write(&mut self, summary: &GenerationSummary) -> io::Result<()> {
        writeln!(
            self.out,
            "{},{},{},{},{},{}",
            summary.generation,
            summary.best_score,
            summary.avg_score,
            summary.min_score,
            summary.max_score,
            summary.mutations
        )?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl StatsWriter<BufWriter<File>> {
    /// Create (or truncate) a CSV file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

/// Save a run result as pretty JSON to `dir/result.json`.
pub fn save_result<P: AsRef<Path>>(result: &EvolutionResult, dir: P) -> io::Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join("result.json");

    let json = serde_json::to_string_pretty(result)?;
    fs::write(&path, json)?;
    Ok(path)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoardFile {
    Result(EvolutionResult),
    Board(Board),
}

/// Load a board from either a saved result or a bare cell list.
///
/// A result with no best board yields an empty board.
pub fn load_board<P: AsRef<Path>>(path: P) -> io::Result<Board> {
    let content = fs::read_to_string(path)?;
    let file: BoardFile = serde_json::from_str(&content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    Ok(match file {
        BoardFile::Result(result) => result.best.map(|b| b.board).unwrap_or_default(),
        BoardFile::Board(board) => board,
    })
}
