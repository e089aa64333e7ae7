use image::{DynamicImage, GenericImageView};
use palette::{IntoColor, Lch, Srgb};

/// Used when nothing in the image is colorful enough to seed a scheme.
pub const FALLBACK_SEED: Srgb<u8> = Srgb::new(0x42, 0x85, 0xf4);

const THUMBNAIL_SIZE: u32 = 128;
const MAX_COLORS: usize = 128;
const KMEANS_ITERATIONS: usize = 10;

const CUTOFF_CHROMA: f32 = 5.0;
const CUTOFF_EXCITED_PROPORTION: f32 = 0.01;
const TARGET_CHROMA: f32 = 48.0;
const WEIGHT_PROPORTION: f32 = 0.7;
const WEIGHT_CHROMA_ABOVE: f32 = 0.1;
const WEIGHT_CHROMA_BELOW: f32 = 0.3;
/// Ranked seeds must differ by at least this many degrees of hue.
const MIN_HUE_DISTANCE: f32 = 15.0;

/// Picks the color a scheme should be built around.
pub fn extract_seed_color(img: &DynamicImage) -> Srgb<u8> {
    let (width, height) = img.dimensions();
    let small = if width > THUMBNAIL_SIZE || height > THUMBNAIL_SIZE {
        img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
    } else {
        img.clone()
    };

    let pixels: Vec<[u8; 3]> = small.to_rgb8().pixels().map(|p| p.0).collect();
    let clusters = quantize(&pixels, MAX_COLORS);
    let seed = rank_seeds(&clusters).first().copied().unwrap_or(FALLBACK_SEED);
    log::debug!(
        "seed #{:02x}{:02x}{:02x} from {} clusters",
        seed.red,
        seed.green,
        seed.blue,
        clusters.len()
    );
    seed
}

/// Reduces `pixels` to at most `max_colors` representative colors, each with
/// the number of pixels it stands for.
///
/// Pixels are first bucketed at 5 bits per channel; the most populated
/// buckets seed a weighted k-means over all buckets.
pub fn quantize(pixels: &[[u8; 3]], max_colors: usize) -> Vec<(Srgb<u8>, usize)> {
    if pixels.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    // (sum r, sum g, sum b, count) per 15-bit bucket
    let mut buckets = vec![(0u64, 0u64, 0u64, 0usize); 1 << 15];
    for &[r, g, b] in pixels {
        let key = ((r as usize >> 3) << 10) | ((g as usize >> 3) << 5) | (b as usize >> 3);
        let bucket = &mut buckets[key];
        bucket.0 += r as u64;
        bucket.1 += g as u64;
        bucket.2 += b as u64;
        bucket.3 += 1;
    }

    let mut points: Vec<([f32; 3], usize)> = buckets
        .into_iter()
        .filter(|b| b.3 > 0)
        .map(|(r, g, b, n)| {
            let n64 = n as f32;
            ([r as f32 / n64, g as f32 / n64, b as f32 / n64], n)
        })
        .collect();
    // Most populated first; ties broken by color so the result is stable.
    points.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut centroids: Vec<[f32; 3]> = points.iter().take(max_colors).map(|p| p.0).collect();
    let mut assignment = vec![0usize; points.len()];

    for _ in 0..KMEANS_ITERATIONS {
        let mut changed = false;
        for (i, (p, _)) in points.iter().enumerate() {
            let nearest = nearest(p, &centroids);
            if assignment[i] != nearest {
                assignment[i] = nearest;
                changed = true;
            }
        }

        let mut sums = vec![([0.0f32; 3], 0usize); centroids.len()];
        for ((p, n), &c) in points.iter().zip(&assignment) {
            for k in 0..3 {
                sums[c].0[k] += p[k] * *n as f32;
            }
            sums[c].1 += n;
        }
        for (centroid, (sum, n)) in centroids.iter_mut().zip(&sums) {
            if *n > 0 {
                *centroid = [sum[0] / *n as f32, sum[1] / *n as f32, sum[2] / *n as f32];
            }
        }

        if !changed {
            break;
        }
    }

    let mut population = vec![0usize; centroids.len()];
    for ((_, n), &c) in points.iter().zip(&assignment) {
        population[c] += n;
    }

    centroids
        .into_iter()
        .zip(population)
        .filter(|(_, n)| *n > 0)
        .map(|(c, n)| {
            let px = |v: f32| v.round().clamp(0.0, 255.0) as u8;
            (Srgb::new(px(c[0]), px(c[1]), px(c[2])), n)
        })
        .collect()
}

fn nearest(p: &[f32; 3], centroids: &[[f32; 3]]) -> usize {
    let dist = |c: &[f32; 3]| (0..3).map(|k| (p[k] - c[k]).powi(2)).sum::<f32>();
    centroids
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| dist(*a).total_cmp(&dist(*b)))
        .map_or(0, |(i, _)| i)
}

/// Orders quantized colors by how well they would work as a seed.
///
/// Colors that are nearly gray, or whose hue barely appears in the image,
/// are dropped. The rest favor hues that cover much of the image and a
/// chroma near 48. Returned colors are at least 15° of hue apart.
pub fn rank_seeds(clusters: &[(Srgb<u8>, usize)]) -> Vec<Srgb<u8>> {
    let total: usize = clusters.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }

    let lchs: Vec<Lch> = clusters
        .iter()
        .map(|(c, _)| c.into_format::<f32>().into_color())
        .collect();

    let mut hue_population = [0usize; 360];
    for (lch, (_, n)) in lchs.iter().zip(clusters) {
        hue_population[hue_bin(lch)] += n;
    }

    // Share of the image within ±15° of each hue.
    let mut excited = [0.0f32; 360];
    for (hue, &n) in hue_population.iter().enumerate() {
        let proportion = n as f32 / total as f32;
        for offset in -14i32..=15 {
            let neighbor = (hue as i32 + offset).rem_euclid(360) as usize;
            excited[neighbor] += proportion;
        }
    }

    let mut scored: Vec<(Srgb<u8>, f32, f32)> = Vec::new();
    for (lch, (color, _)) in lchs.iter().zip(clusters) {
        let proportion = excited[hue_bin(lch)];
        if lch.chroma < CUTOFF_CHROMA || proportion <= CUTOFF_EXCITED_PROPORTION {
            continue;
        }
        let chroma_weight = if lch.chroma < TARGET_CHROMA {
            WEIGHT_CHROMA_BELOW
        } else {
            WEIGHT_CHROMA_ABOVE
        };
        let score = proportion * 100.0 * WEIGHT_PROPORTION + (lch.chroma - TARGET_CHROMA) * chroma_weight;
        scored.push((*color, lch.hue.into_positive_degrees(), score));
    }
    scored.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut chosen: Vec<(Srgb<u8>, f32)> = Vec::new();
    for (color, hue, _) in scored {
        if chosen.iter().all(|(_, h)| hue_distance(*h, hue) >= MIN_HUE_DISTANCE) {
            chosen.push((color, hue));
        }
    }
    chosen.into_iter().map(|(c, _)| c).collect()
}

fn hue_bin(lch: &Lch) -> usize {
    (lch.hue.into_positive_degrees().round() as usize) % 360
}

fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}
