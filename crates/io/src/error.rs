use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use nfadfa_automata::AutomatonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IOError {
    #[error("File {0} does not exist")]
    NotFound(PathBuf),

    #[error("Invalid automaton: {0}")]
    InvalidAutomaton(#[from] AutomatonError),

    #[error("Transition ({from}, {symbol}) of a deterministic automaton must have exactly one destination, found {count}")]
    NotDeterministic {
        from: String,
        symbol: String,
        count: usize,
    },

    #[error("Graphviz dot failed: {0}")]
    Render(io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Opens the file for reading, reporting a missing file as [IOError::NotFound].
pub(crate) fn open_file(path: &Path) -> Result<File, IOError> {
    File::open(path).map_err(|error| {
        if error.kind() == io::ErrorKind::NotFound {
            IOError::NotFound(path.to_path_buf())
        } else {
            IOError::Io(error)
        }
    })
}
