use std::path::Path;

use image::{DynamicImage, GrayImage};

use crate::image_ops::{compute_edge_map, load_grayscale_image, to_grayscale};
use crate::{PlacementError, Region};

/// Weight of the intensity variance in a cell's score.
pub const VARIANCE_WEIGHT: f64 = 0.3;
/// Weight of the (scaled) edge density in a cell's score.
pub const EDGE_WEIGHT: f64 = 0.7;
/// Edge density is a fraction; this brings it onto the variance's scale.
pub const EDGE_SCALE: f64 = 1000.0;

/// Per-cell calmness scores, row-major. Lower is calmer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGrid {
    cols: usize,
    rows: usize,
    cells: Vec<f64>,
}

impl ScoreGrid {
    /// Builds a grid from row-major cells. Returns `None` if the cell count
    /// does not match `cols * rows`.
    pub fn new(cols: usize, rows: usize, cells: Vec<f64>) -> Option<Self> {
        (cells.len() == cols * rows).then_some(Self { cols, rows, cells })
    }

    /// Builds a grid from nested rows. Returns `None` for ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let n = rows.len();
        Self::new(cols, n, rows.into_iter().flatten().collect())
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Iterates rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Mean score of the cells covered by `region`, or `None` if the region
    /// is empty or leaves the grid.
    pub fn mean(&self, region: &Region) -> Option<f64> {
        if region.width == 0
            || region.height == 0
            || region.x + region.width > self.cols
            || region.y + region.height > self.rows
        {
            return None;
        }

        let mut sum = 0.0;
        for row in region.y..region.y + region.height {
            let start = row * self.cols + region.x;
            sum += self.cells[start..start + region.width].iter().sum::<f64>();
        }
        Some(sum / (region.width * region.height) as f64)
    }
}

/// Loads `path` and scores it on a `cols x rows` grid.
pub fn score_image(path: &Path, cols: usize, rows: usize) -> Result<ScoreGrid, PlacementError> {
    let gray = load_grayscale_image(path)?;
    let edges = compute_edge_map(&gray);
    score_cells(&gray, &edges, cols, rows)
}

/// Scores an already decoded image.
pub fn score(image: &DynamicImage, cols: usize, rows: usize) -> Result<ScoreGrid, PlacementError> {
    let gray = to_grayscale(image);
    let edges = compute_edge_map(&gray);
    score_cells(&gray, &edges, cols, rows)
}

/// Scores a grayscale image against its edge map.
///
/// Cells are `floor(height / rows) x floor(width / cols)` pixels; leftover
/// pixels on the right and bottom edges are not scored.
pub fn score_cells(
    gray: &GrayImage,
    edges: &GrayImage,
    cols: usize,
    rows: usize,
) -> Result<ScoreGrid, PlacementError> {
    let (width, height) = gray.dimensions();
    if cols == 0 || rows == 0 || cols > width as usize || rows > height as usize {
        return Err(PlacementError::InvalidGrid {
            cols,
            rows,
            width,
            height,
        });
    }
    if edges.dimensions() != (width, height) {
        let (edge_width, edge_height) = edges.dimensions();
        return Err(PlacementError::EdgeMapMismatch {
            width,
            height,
            edge_width,
            edge_height,
        });
    }

    let cell_w = width / cols as u32;
    let cell_h = height / rows as u32;
    let area = (cell_w * cell_h) as f64;

    let mut cells = Vec::with_capacity(cols * rows);
    for r in 0..rows as u32 {
        for c in 0..cols as u32 {
            let (x0, y0) = (c * cell_w, r * cell_h);

            let mut sum = 0.0;
            let mut edge_count = 0usize;
            for y in y0..y0 + cell_h {
                for x in x0..x0 + cell_w {
                    sum += gray.get_pixel(x, y)[0] as f64;
                    if edges.get_pixel(x, y)[0] > 0 {
                        edge_count += 1;
                    }
                }
            }
            let mean = sum / area;

            let mut sq = 0.0;
            for y in y0..y0 + cell_h {
                for x in x0..x0 + cell_w {
                    let d = gray.get_pixel(x, y)[0] as f64 - mean;
                    sq += d * d;
                }
            }
            let variance = sq / area;
            let edge_density = edge_count as f64 / area;

            cells.push(variance * VARIANCE_WEIGHT + edge_density * EDGE_SCALE * EDGE_WEIGHT);
        }
    }

    log::debug!("scored {cols}x{rows} grid, cells of {cell_w}x{cell_h}px");
    Ok(ScoreGrid { cols, rows, cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn uniform_image_scores_zero_everywhere() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(160, 90, Luma([200])));
        let grid = score(&img, 16, 9).unwrap();
        assert_eq!((grid.cols(), grid.rows()), (16, 9));
        assert!(grid.iter_rows().flatten().all(|&s| s == 0.0));
    }

    #[test]
    fn grid_has_requested_shape_with_finite_scores() {
        let gray = GrayImage::from_fn(101, 53, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
        let edges = compute_edge_map(&gray);
        let grid = score_cells(&gray, &edges, 7, 5).unwrap();

        assert_eq!(grid.iter_rows().count(), 5);
        for row in grid.iter_rows() {
            assert_eq!(row.len(), 7);
            assert!(row.iter().all(|s| s.is_finite() && *s >= 0.0));
        }
    }

    #[test]
    fn variance_term_matches_hand_computation() {
        // Left half 0, right half 100 in a single cell, no edges supplied.
        let gray = GrayImage::from_fn(4, 2, |x, _| if x < 2 { Luma([0]) } else { Luma([100]) });
        let edges = GrayImage::new(4, 2);
        let grid = score_cells(&gray, &edges, 1, 1).unwrap();
        // variance = 2500
        assert_eq!(grid.get(0, 0), Some(2500.0 * VARIANCE_WEIGHT));
    }

    #[test]
    fn color_cells_score_on_bt601_luma() {
        // Red left half (luma 76), blue right half (luma 29).
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        }));
        let gray = to_grayscale(&img);
        let grid = score_cells(&gray, &GrayImage::new(4, 2), 1, 1).unwrap();
        // variance = 23.5^2
        assert_eq!(grid.get(0, 0), Some(552.25 * VARIANCE_WEIGHT));
    }

    #[test]
    fn edge_term_matches_hand_computation() {
        let gray = GrayImage::from_pixel(4, 4, Luma([10]));
        let mut edges = GrayImage::new(4, 4);
        edges.put_pixel(0, 0, Luma([255]));
        edges.put_pixel(1, 1, Luma([255]));
        let grid = score_cells(&gray, &edges, 1, 1).unwrap();
        let expected = 2.0 / 16.0 * EDGE_SCALE * EDGE_WEIGHT;
        assert!((grid.get(0, 0).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn remainder_pixels_are_ignored() {
        // 5 columns into 2 cells: the noisy last column is never scored.
        let gray = GrayImage::from_fn(5, 1, |x, _| if x == 4 { Luma([255]) } else { Luma([0]) });
        let edges = GrayImage::new(5, 1);
        let grid = score_cells(&gray, &edges, 2, 1).unwrap();
        assert_eq!(grid.get(0, 0), Some(0.0));
        assert_eq!(grid.get(1, 0), Some(0.0));
    }

    #[test]
    fn invalid_grids_are_rejected() {
        let gray = GrayImage::new(10, 10);
        for (cols, rows) in [(0, 3), (3, 0), (11, 3), (3, 11)] {
            let err = score_cells(&gray, &gray, cols, rows).unwrap_err();
            assert!(matches!(err, PlacementError::InvalidGrid { .. }), "{cols}x{rows}");
        }
    }

    #[test]
    fn mismatched_edge_map_is_rejected() {
        let gray = GrayImage::new(10, 10);
        let edges = GrayImage::new(9, 10);
        assert!(matches!(
            score_cells(&gray, &edges, 2, 2),
            Err(PlacementError::EdgeMapMismatch { .. })
        ));
    }

    #[test]
    fn mean_over_region() {
        let grid = ScoreGrid::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(grid.mean(&Region::new(1, 0, 2, 2)), Some(4.0));
        assert_eq!(grid.mean(&Region::new(2, 0, 2, 1)), None);
        assert_eq!(grid.mean(&Region::new(0, 0, 0, 1)), None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(ScoreGrid::from_rows(vec![vec![1.0], vec![1.0, 2.0]]).is_none());
        assert!(ScoreGrid::new(2, 2, vec![0.0; 3]).is_none());
    }
}
