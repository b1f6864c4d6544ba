use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("could not parse {} as CSV: {message}", .path.display())]
    MalformedInput { path: PathBuf, message: String },

    #[error("could not write {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
