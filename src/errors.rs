use std::path::PathBuf;
use thiserror::Error;

/// Fatal resolution errors. Any variant aborts the whole merge; no output
/// is committed until resolution succeeds in full.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("{}:{line}: included file not found: {}", file.display(), path.display())]
    MissingInclude { file: PathBuf, line: usize, path: PathBuf },

    #[error("cyclic include detected at {}", file.display())]
    CyclicInclude { file: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
