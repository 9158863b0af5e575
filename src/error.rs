use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Requests that cannot be honoured in the current session state. These are
/// reported to the user at the menu and the session carries on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidOperation {
    #[error("nothing to replay yet, finish a run first")]
    NoPriorRun,
    #[error("run finished in zero time, no speed can be computed")]
    ZeroDuration,
    #[error("sample size {requested} is out of range (1..={available})")]
    SampleSizeOutOfRange { requested: usize, available: usize },
}

/// Startup failures. Fatal: the process exits non-zero.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("cannot read word file {}", path.display())]
    WordFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("word list has no usable words")]
    EmptyPool,
    #[error("word list has {available} usable words but {requested} were requested")]
    PoolTooSmall { available: usize, requested: usize },
    #[error("target text is empty")]
    EmptyTarget,
    #[error("cannot switch the terminal to raw mode")]
    RawMode(#[source] io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("elapsed time is zero")]
    DivisionByZero,
}

impl From<ScoringError> for InvalidOperation {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::DivisionByZero => InvalidOperation::ZeroDuration,
        }
    }
}
