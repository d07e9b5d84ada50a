//! Elevation grid input and output.
//!
//! The text format is N lines of whitespace-separated integers. Only the
//! first N tokens of each line are used and lines after the N-th are ignored.
pub mod synthetic;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::grid::Matrix;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open elevation source {}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading elevation data")]
    Read(#[source] io::Error),

    #[error("row {row} has {found} integer values, expected {expected}")]
    MalformedRow { row: usize, expected: usize, found: usize },

    #[error("elevation data has {found} rows, expected {expected}")]
    MissingRows { expected: usize, found: usize },
}

/// Parse an `n × n` elevation grid from `reader`.
pub fn parse_landscape<R: BufRead>(reader: R, n: usize) -> Result<Matrix<i32>, LoadError> {
    let mut data = Vec::with_capacity(n * n);
    let mut lines = reader.lines();

    for row in 0..n {
        let line = match lines.next() {
            Some(line) => line.map_err(LoadError::Read)?,
            None => return Err(LoadError::MissingRows { expected: n, found: row }),
        };
        let before = data.len();
        data.extend(
            line.split_whitespace()
                .take(n)
                .map_while(|tok| tok.parse::<i32>().ok()),
        );
        let found = data.len() - before;
        if found < n {
            return Err(LoadError::MalformedRow { row, expected: n, found });
        }
    }

    Ok(Matrix::from_vec(n, data))
}

/// Open `path` and parse an `n × n` elevation grid from it.
pub fn load_landscape(path: &Path, n: usize) -> Result<Matrix<i32>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = parse_landscape(BufReader::new(file), n)?;
    log::debug!("loaded {n}×{n} elevation grid from {}", path.display());
    Ok(grid)
}

/// Write `grid` in the format read by [`parse_landscape`].
pub fn write_landscape<W: Write>(mut writer: W, grid: &Matrix<i32>) -> io::Result<()> {
    for row in grid.rows() {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}
