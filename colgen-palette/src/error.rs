use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("unknown scheme '{0}'")]
    UnknownScheme(String),

    #[error("unknown mode '{0}', expected dark or light")]
    UnknownMode(String),
}
