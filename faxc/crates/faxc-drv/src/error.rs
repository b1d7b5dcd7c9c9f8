//! Errors a `faxc` invocation can fail with, outside the checker's own
//! [`faxc_util::CheckError`] taxonomy — reading a source file, or the
//! parser rejecting it before the checker ever sees an AST.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("couldn't read {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Check(String),
}

pub type Result<T> = std::result::Result<T, DriverError>;
