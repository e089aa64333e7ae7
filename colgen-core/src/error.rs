use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacementError {
    /// Grid dimensions are zero or finer than the image's pixel grid.
    #[error("invalid grid {cols}x{rows} for a {width}x{height} image")]
    InvalidGrid {
        cols: usize,
        rows: usize,
        width: u32,
        height: u32,
    },

    #[error("could not load image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("edge map is {edge_width}x{edge_height} but the image is {width}x{height}")]
    EdgeMapMismatch {
        width: u32,
        height: u32,
        edge_width: u32,
        edge_height: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
