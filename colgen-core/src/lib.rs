//! Widget placement for wallpapers.
//!
//! A wallpaper is cut into a coarse grid, every cell gets a "calmness" score
//! (low pixel variance and few edges score low), and widgets are then placed
//! greedily on the calmest free rectangles.

mod error;
mod grid;
mod image_ops;
mod region;
mod search;
mod suggestions;
mod widgets;

pub use error::PlacementError;
pub use grid::{score, score_cells, score_image, ScoreGrid, EDGE_SCALE, EDGE_WEIGHT, VARIANCE_WEIGHT};
pub use image_ops::{compute_edge_map, load_grayscale_image, to_grayscale, CANNY_HIGH, CANNY_LOW};
pub use region::Region;
pub use search::find_best_position;
pub use suggestions::{GridSize, Suggestions, WidgetEntry, WidgetSuggestion};
pub use widgets::{
    place_widgets, resolve_widget_specs, suggest_widgets, DefaultWidget, JsonWidgetState,
    Placement, PriorWidget, WidgetSpec, WidgetStateSource, DEFAULT_WIDGETS, FALLBACK_SIZE,
};
