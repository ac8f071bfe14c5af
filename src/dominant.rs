// src/dominant.rs

//! Dominant-color extraction: scale the image down, sample its opaque
//! pixels, cluster them with k-means and report the rounded centroids.

use crate::color::Rgb;
use crate::config::MatchConfig;
use image::imageops::FilterType;
use image::DynamicImage;
use log::debug;
use rand::Rng;

type Point = [f64; 3];

/// Scales `image` so its longest side is at most `max_dimension`. Images that
/// already fit are returned as RGBA without resampling.
pub fn downscale(image: &DynamicImage, max_dimension: u32) -> image::RgbaImage {
    let (width, height) = (image.width(), image.height());
    let longest = width.max(height).max(1);
    if longest <= max_dimension {
        return image.to_rgba8();
    }
    let scale = max_dimension as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    image.resize_exact(w, h, FilterType::Triangle).to_rgba8()
}

/// Collects the non-transparent pixels. When there are more than
/// `max_samples`, draws `max_samples` of them uniformly with replacement.
pub fn sample_pixels<R: Rng>(
    image: &image::RgbaImage,
    max_samples: usize,
    rng: &mut R,
) -> Vec<Rgb> {
    let pixels: Vec<Rgb> = image
        .pixels()
        .filter(|p| p.0[3] != 0)
        .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
        .collect();
    if pixels.len() <= max_samples {
        return pixels;
    }
    (0..max_samples)
        .map(|_| pixels[rng.gen_range(0..pixels.len())])
        .collect()
}

/// Clusters `pixels` into at most `k` colors.
///
/// Initial centroids are distinct pixel positions picked at random; when
/// there are fewer than `k` pixels they are returned unchanged. Iteration
/// stops early once no assignment changes.
pub fn kmeans<R: Rng>(pixels: &[Rgb], k: usize, max_iterations: usize, rng: &mut R) -> Vec<Rgb> {
    if pixels.is_empty() || k == 0 {
        return Vec::new();
    }
    if pixels.len() <= k {
        return pixels.to_vec();
    }

    let points: Vec<Point> = pixels
        .iter()
        .map(|p| [p.r as f64, p.g as f64, p.b as f64])
        .collect();
    let mut centroids = initial_centroids(&points, k, rng);
    // Unassigned at first, so the opening pass always counts as a change.
    let mut assignments = vec![usize::MAX; points.len()];

    for iteration in 0..max_iterations {
        let mut changed = false;
        for (point, assigned) in points.iter().zip(assignments.iter_mut()) {
            let nearest = nearest_centroid(point, &centroids);
            if *assigned != nearest {
                *assigned = nearest;
                changed = true;
            }
        }

        let mut sums = vec![[0.0f64; 4]; centroids.len()];
        for (point, &cluster) in points.iter().zip(&assignments) {
            let acc = &mut sums[cluster];
            acc[0] += point[0];
            acc[1] += point[1];
            acc[2] += point[2];
            acc[3] += 1.0;
        }
        for (centroid, acc) in centroids.iter_mut().zip(&sums) {
            if acc[3] > 0.0 {
                *centroid = [acc[0] / acc[3], acc[1] / acc[3], acc[2] / acc[3]];
            }
        }

        if !changed {
            debug!("k-means converged after {} iterations", iteration + 1);
            break;
        }
    }

    centroids
        .iter()
        .map(|c| Rgb::new(round_channel(c[0]), round_channel(c[1]), round_channel(c[2])))
        .collect()
}

/// Runs the full pipeline on a decoded image with the configured limits.
pub fn dominant_colors<R: Rng>(
    image: &DynamicImage,
    config: &MatchConfig,
    rng: &mut R,
) -> Vec<Rgb> {
    let scaled = downscale(image, config.max_dimension);
    let samples = sample_pixels(&scaled, config.max_pixel_samples, rng);
    debug!(
        "Sampled {} pixels from {}x{} image",
        samples.len(),
        scaled.width(),
        scaled.height()
    );
    kmeans(&samples, config.dominant_colors, config.kmeans_iterations, rng)
}

fn initial_centroids<R: Rng>(points: &[Point], k: usize, rng: &mut R) -> Vec<Point> {
    rand::seq::index::sample(rng, points.len(), k)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

fn nearest_centroid(point: &Point, centroids: &[Point]) -> usize {
    let mut best = 0;
    let mut best_distance = squared_distance(point, &centroids[0]);
    for (i, centroid) in centroids.iter().enumerate().skip(1) {
        let distance = squared_distance(point, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}

fn squared_distance(a: &Point, b: &Point) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn round_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn fewer_pixels_than_clusters_are_returned_as_is() {
        let pixels = vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)];
        assert_eq!(kmeans(&pixels, 5, 12, &mut rng()), pixels);
        assert!(kmeans(&[], 5, 12, &mut rng()).is_empty());
    }

    #[test]
    fn separates_two_obvious_clusters() {
        let mut pixels = vec![Rgb::new(250, 10, 10); 40];
        pixels.extend(vec![Rgb::new(10, 10, 250); 60]);
        pixels.push(Rgb::new(240, 20, 20));

        let mut centroids = kmeans(&pixels, 2, 12, &mut rng());
        centroids.sort_by_key(|c| c.r);
        assert_eq!(centroids[0], Rgb::new(10, 10, 250));
        // 40 x 250 + 240 over 41 pixels
        assert_eq!(centroids[1], Rgb::new(250, 10, 10));
    }

    #[test]
    fn transparent_pixels_are_skipped() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255]));
        image.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let samples = sample_pixels(&image, 100, &mut rng());
        assert_eq!(samples.len(), 15);
        assert!(samples.iter().all(|p| *p == Rgb::new(200, 100, 50)));
    }

    #[test]
    fn sampling_caps_the_pixel_count() {
        let image = RgbaImage::from_pixel(50, 50, Rgba([9, 9, 9, 255]));
        assert_eq!(sample_pixels(&image, 100, &mut rng()).len(), 100);
    }

    #[test]
    fn downscale_bounds_the_longest_side() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(1000, 250));
        let scaled = downscale(&image, 420);
        assert_eq!((scaled.width(), scaled.height()), (420, 105));

        let small = DynamicImage::ImageRgba8(RgbaImage::new(30, 20));
        let kept = downscale(&small, 420);
        assert_eq!((kept.width(), kept.height()), (30, 20));
    }

    #[test]
    fn solid_image_has_one_dominant_color() {
        let solid = RgbaImage::from_pixel(64, 64, Rgba([18, 52, 86, 255]));
        let image = DynamicImage::ImageRgba8(solid);
        let colors = dominant_colors(&image, &MatchConfig::default(), &mut rng());
        assert_eq!(colors.len(), 5);
        assert!(colors.iter().all(|c| *c == Rgb::new(18, 52, 86)));
    }
}
