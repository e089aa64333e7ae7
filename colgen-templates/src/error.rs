use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown color '{0}'")]
    UnknownColor(String),

    #[error("cannot resolve '{0}'")]
    UnknownField(String),

    #[error("loop opened on line {line} is never closed")]
    UnclosedLoop { line: usize },
}
