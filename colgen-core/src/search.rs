use crate::{Region, ScoreGrid};

/// Finds the calmest `width x height` spot on `grid` that avoids `exclude`.
///
/// Candidates are visited row by row, left to right, and only a strictly
/// lower mean replaces the current best, so ties go to the top-most, then
/// left-most position. Returns `None` when nothing fits.
pub fn find_best_position(
    grid: &ScoreGrid,
    width: usize,
    height: usize,
    exclude: &[Region],
) -> Option<(Region, f64)> {
    if width == 0 || height == 0 || width > grid.cols() || height > grid.rows() {
        return None;
    }

    let mut best: Option<(Region, f64)> = None;
    for row in 0..=grid.rows() - height {
        for col in 0..=grid.cols() - width {
            let candidate = Region::new(col, row, width, height);
            if exclude.iter().any(|ex| candidate.overlaps(ex)) {
                continue;
            }

            let Some(mean) = grid.mean(&candidate) else {
                continue;
            };
            if best.map_or(true, |(_, score)| mean < score) {
                best = Some((candidate, mean));
            }
        }
    }
    best
}
