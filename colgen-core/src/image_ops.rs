use std::collections::VecDeque;
use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};

use crate::PlacementError;

/// Gradient magnitude below which a pixel can never be an edge.
pub const CANNY_LOW: i32 = 50;
/// Gradient magnitude above which a pixel is always an edge.
pub const CANNY_HIGH: i32 = 150;

const EDGE: u8 = 255;

/// tan(22.5°) in Q15 fixed point, for bucketing gradient directions.
const TG22: i64 = 13573;
const SHIFT: u32 = 15;

pub fn load_grayscale_image(path: &Path) -> Result<GrayImage, PlacementError> {
    let img = image::open(path).map_err(|source| PlacementError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(to_grayscale(&img))
}

/// BT.601 luma in 14-bit fixed point, rounded: `0.299 R + 0.587 G + 0.114 B`.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + (1 << 13)) >> 14;
        Luma([luma as u8])
    })
}

/// Canny edge detection with a 3x3 Sobel aperture and L1 gradient norm.
///
/// Returns a map of the same size where edge pixels are 255 and everything
/// else is 0. There is no smoothing pass before the gradient.
pub fn compute_edge_map(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let mut edges = GrayImage::new(width, height);
    if w == 0 || h == 0 {
        return edges;
    }

    let (gx, gy) = sobel(gray);
    let mut class = classify(&gx, &gy, w, h);

    // Hysteresis: keep weak pixels 8-connected to a strong one.
    let mut queue: VecDeque<usize> = (0..w * h).filter(|&i| class[i] == 2).collect();
    for &i in &queue {
        edges.put_pixel((i % w) as u32, (i / w) as u32, Luma([EDGE]));
    }
    while let Some(i) = queue.pop_front() {
        let (x, y) = ((i % w) as isize, (i / w) as isize);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let n = ny as usize * w + nx as usize;
                if class[n] == 1 {
                    class[n] = 2;
                    edges.put_pixel(nx as u32, ny as u32, Luma([EDGE]));
                    queue.push_back(n);
                }
            }
        }
    }

    edges
}

/// Non-maximum suppression and double threshold over Sobel responses.
/// 0 = not an edge, 1 = weak candidate, 2 = strong.
fn classify(gx: &[i32], gy: &[i32], w: usize, h: usize) -> Vec<u8> {
    let magnitude: Vec<i32> = gx.iter().zip(gy).map(|(x, y)| x.abs() + y.abs()).collect();
    let mag_at = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0
        } else {
            magnitude[y as usize * w + x as usize]
        }
    };

    let mut class = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let m = magnitude[i];
            if m <= CANNY_LOW {
                continue;
            }

            let ax = gx[i].abs() as i64;
            let ay = (gy[i].abs() as i64) << SHIFT;
            let tg22x = ax * TG22;
            let tg67x = tg22x + (ax << (SHIFT + 1));
            let (xi, yi) = (x as isize, y as isize);

            // Axis-aligned directions accept a tie with the following
            // neighbour; diagonals must beat both.
            let is_max = if ay < tg22x {
                m > mag_at(xi - 1, yi) && m >= mag_at(xi + 1, yi)
            } else if ay > tg67x {
                m > mag_at(xi, yi - 1) && m >= mag_at(xi, yi + 1)
            } else if (gx[i] < 0) == (gy[i] < 0) {
                m > mag_at(xi - 1, yi - 1) && m > mag_at(xi + 1, yi + 1)
            } else {
                m > mag_at(xi + 1, yi - 1) && m > mag_at(xi - 1, yi + 1)
            };

            if is_max {
                class[i] = if m > CANNY_HIGH { 2 } else { 1 };
            }
        }
    }
    class
}

/// Horizontal and vertical Sobel responses, border pixels replicated.
fn sobel(gray: &GrayImage) -> (Vec<i32>, Vec<i32>) {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as isize, height as isize);
    let px = |x: isize, y: isize| -> i32 {
        let x = x.clamp(0, w - 1) as u32;
        let y = y.clamp(0, h - 1) as u32;
        gray.get_pixel(x, y)[0] as i32
    };

    let mut gx = Vec::with_capacity((w * h) as usize);
    let mut gy = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        for x in 0..w {
            let dx = (px(x + 1, y - 1) + 2 * px(x + 1, y) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2 * px(x - 1, y) + px(x - 1, y + 1));
            let dy = (px(x - 1, y + 1) + 2 * px(x, y + 1) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2 * px(x, y - 1) + px(x + 1, y - 1));
            gx.push(dx);
            gy.push(dy);
        }
    }
    (gx, gy)
}
