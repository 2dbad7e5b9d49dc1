//! Pixel-level card analyzer.
//!
//! Decodes the photograph once, converts it to grayscale and extracts the
//! card outline from a Canny edge map. The four analyses then read from
//! that shared state:
//!
//! - edges: polygon approximation of the outline plus its compactness
//! - corners: FAST corner count plus mean Sobel gradient
//! - surface: residual against a median-filtered copy plus patch variance
//! - centering: outline bounding-box offset plus border uniformity

use std::f64::consts::PI;
use std::path::Path;

use anyhow::{bail, Context, Result};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::corners::corners_fast9;
use imageproc::edges::canny;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use imageproc::point::Point;
use tracing::{debug, trace};

use crate::domain::{
    CardAnalyzer, CenteringDetails, ComponentDetails, ComponentResult, CornerDetails, EdgeDetails,
    SurfaceDetails, NO_IMAGE_LOADED,
};

/// Tuning for the pixel-level analyses.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Gaussian sigma applied before edge detection.
    pub blur_sigma: f32,
    /// Canny low hysteresis threshold.
    pub canny_low: f32,
    /// Canny high hysteresis threshold.
    pub canny_high: f32,
    /// Polygon approximation tolerance as a fraction of the perimeter.
    pub polygon_epsilon: f64,
    /// FAST-9 intensity threshold.
    pub fast_threshold: u8,
    /// Width in pixels of the border strips compared for uniformity.
    pub border_strip: u32,
    /// Center offset, as a fraction of the image size, that scores zero.
    pub max_center_offset: f64,
    /// Smallest accepted width or height.
    pub min_dimension: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            // Matches a 5x5 kernel with automatic sigma.
            blur_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 150.0,
            polygon_epsilon: 0.02,
            fast_threshold: 30,
            border_strip: 10,
            max_center_offset: 0.1,
            min_dimension: 16,
        }
    }
}

/// Largest outer contour of the edge map.
#[derive(Debug, Clone)]
struct Outline {
    points: Vec<Point<i32>>,
    perimeter: f64,
    area: f64,
}

impl Outline {
    /// Inclusive bounding box as `(x, y, width, height)`.
    fn bounding_box(&self) -> (u32, u32, u32, u32) {
        let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
        let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let to_u32 = |v: i32| u32::try_from(v).unwrap_or(0);
        (
            to_u32(min_x),
            to_u32(min_y),
            to_u32(max_x - min_x + 1),
            to_u32(max_y - min_y + 1),
        )
    }
}

/// State derived from the loaded image.
#[derive(Debug)]
struct LoadedCard {
    gray: GrayImage,
    outline: Option<Outline>,
}

/// Analyzer that measures the card from its pixels.
#[derive(Debug, Default)]
pub struct VisionCardAnalyzer {
    config: VisionConfig,
    card: Option<LoadedCard>,
}

impl VisionCardAnalyzer {
    /// Creates an analyzer with the given tuning.
    #[must_use]
    pub const fn new(config: VisionConfig) -> Self {
        Self { config, card: None }
    }

    /// Derives the shared state from an already decoded grayscale image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is smaller than `min_dimension`.
    pub fn load_gray(&mut self, gray: GrayImage) -> Result<()> {
        self.card = None;

        let (width, height) = gray.dimensions();
        if width.min(height) < self.config.min_dimension {
            bail!(
                "Image is {width}x{height}, need at least {min}x{min}",
                min = self.config.min_dimension
            );
        }

        let blurred = gaussian_blur_f32(&gray, self.config.blur_sigma);
        let edges = canny(&blurred, self.config.canny_low, self.config.canny_high);
        let outline = largest_outline(&edges);

        match &outline {
            Some(o) => debug!(
                "Card outline: {} points, perimeter {:.1}, area {:.1}",
                o.points.len(),
                o.perimeter,
                o.area
            ),
            None => debug!("No card outline found in {width}x{height} image"),
        }

        self.card = Some(LoadedCard { gray, outline });
        Ok(())
    }
}

impl CardAnalyzer for VisionCardAnalyzer {
    fn name(&self) -> &'static str {
        "vision"
    }

    fn load_image(&mut self, path: &Path) -> Result<()> {
        self.card = None;
        let image = image::open(path)
            .with_context(|| format!("Failed to decode card image: {}", path.display()))?;
        self.load_gray(image.to_luma8())
            .with_context(|| format!("Unusable card image: {}", path.display()))
    }

    fn analyze_edges(&self) -> ComponentResult {
        let Some(card) = &self.card else {
            return ComponentResult::unavailable(NO_IMAGE_LOADED);
        };
        let Some(outline) = &card.outline else {
            return ComponentResult::unavailable("No edges detected");
        };

        let vertices = polygon_vertices(outline, self.config.polygon_epsilon);
        let corner_score = if vertices == 4 {
            100.0
        } else {
            (100.0 - count_f64(vertices.abs_diff(4)) * 10.0).max(0.0)
        };

        let smoothness_score = if outline.area > 0.0 {
            let compactness = outline.perimeter.powi(2) / (4.0 * PI * outline.area);
            (100.0 - (compactness - 1.0) * 50.0).max(0.0)
        } else {
            0.0
        };

        trace!("Edges: {vertices} vertices, corner {corner_score:.1}, smoothness {smoothness_score:.1}");
        ComponentResult::new(
            (corner_score + smoothness_score) / 2.0,
            ComponentDetails::Edges(EdgeDetails {
                corners_detected: vertices,
                corner_score,
                smoothness_score,
                perimeter: outline.perimeter,
                area: outline.area,
            }),
        )
    }

    fn analyze_corners(&self) -> ComponentResult {
        let Some(card) = &self.card else {
            return ComponentResult::unavailable(NO_IMAGE_LOADED);
        };

        let corners_detected = corners_fast9(&card.gray, self.config.fast_threshold).len();
        let avg_gradient = mean_gradient(&card.gray);
        let sharpness_score = (avg_gradient * 2.0).min(100.0);
        let count_score = if (3..=6).contains(&corners_detected) {
            100.0
        } else {
            (100.0 - count_f64(corners_detected.abs_diff(4)) * 15.0).max(0.0)
        };

        trace!("Corners: {corners_detected} detected, mean gradient {avg_gradient:.2}");
        ComponentResult::new(
            (sharpness_score + count_score) / 2.0,
            ComponentDetails::Corners(CornerDetails {
                corners_detected,
                sharpness_score,
                count_score,
                avg_gradient,
            }),
        )
    }

    fn analyze_surface(&self) -> ComponentResult {
        let Some(card) = &self.card else {
            return ComponentResult::unavailable(NO_IMAGE_LOADED);
        };
        let gray = &card.gray;

        let (mean_intensity, variance) = mean_and_variance(gray.pixels().map(|p| p.0[0]));
        let smoothed = median_filter(gray, 1, 1);
        let residuals = gray
            .pixels()
            .zip(smoothed.pixels())
            .map(|(a, b)| a.0[0].abs_diff(b.0[0]));
        let (defect_score, _) = mean_and_variance(residuals);
        let texture_variance = patch_variance(gray);

        let defect_quality = (100.0 - defect_score * 2.0).max(0.0);
        let texture_quality = (100.0 - texture_variance / 100.0).max(0.0);

        trace!("Surface: defect {defect_score:.2}, texture variance {texture_variance:.1}");
        ComponentResult::new(
            (defect_quality + texture_quality) / 2.0,
            ComponentDetails::Surface(SurfaceDetails {
                mean_intensity,
                std_intensity: variance.sqrt(),
                defect_score,
                texture_variance,
                defect_quality,
                texture_quality,
            }),
        )
    }

    fn analyze_centering(&self) -> ComponentResult {
        let Some(card) = &self.card else {
            return ComponentResult::unavailable(NO_IMAGE_LOADED);
        };
        let Some(outline) = &card.outline else {
            return ComponentResult::unavailable("No card boundary detected");
        };

        let (width, height) = card.gray.dimensions();
        let (x, y, w, h) = outline.bounding_box();
        let card_center = (x + w / 2, y + h / 2);
        let image_center = (width / 2, height / 2);

        let offset_x = card_center.0.abs_diff(image_center.0);
        let offset_y = card_center.1.abs_diff(image_center.1);
        let centering_x_score = axis_score(offset_x, width, self.config.max_center_offset);
        let centering_y_score = axis_score(offset_y, height, self.config.max_center_offset);
        let border_uniformity_score = border_uniformity(&card.gray, self.config.border_strip);

        trace!("Centering: offset ({offset_x}, {offset_y}), border {border_uniformity_score:.1}");
        ComponentResult::new(
            (centering_x_score + centering_y_score + border_uniformity_score) / 3.0,
            ComponentDetails::Centering(CenteringDetails {
                offset_x,
                offset_y,
                centering_x_score,
                centering_y_score,
                border_uniformity_score,
                card_center,
                image_center,
            }),
        )
    }
}

#[allow(clippy::cast_precision_loss)]
const fn count_f64(n: usize) -> f64 {
    n as f64
}

/// Picks the outer contour enclosing the largest area.
fn largest_outline(edges: &GrayImage) -> Option<Outline> {
    find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.points.len() >= 3)
        .map(|c| Outline {
            perimeter: arc_length(&c.points, true),
            area: shoelace_area(&c.points),
            points: c.points,
        })
        .max_by(|a, b| a.area.total_cmp(&b.area))
}

fn shoelace_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            f64::from(a.x) * f64::from(b.y) - f64::from(b.x) * f64::from(a.y)
        })
        .sum();
    twice.abs() / 2.0
}

/// Vertex count of the simplified outline polygon.
fn polygon_vertices(outline: &Outline, epsilon_fraction: f64) -> usize {
    let epsilon = epsilon_fraction * outline.perimeter;
    if epsilon <= 0.0 {
        return outline.points.len();
    }
    let mut polygon = approximate_polygon_dp(&outline.points, epsilon, true);
    if polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
    polygon.len()
}

/// Mean Sobel gradient magnitude.
#[allow(clippy::cast_precision_loss)]
fn mean_gradient(gray: &GrayImage) -> f64 {
    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);
    let total: f64 = gx
        .pixels()
        .zip(gy.pixels())
        .map(|(x, y)| f64::from(x.0[0]).hypot(f64::from(y.0[0])))
        .sum();
    let count = u64::from(gray.width()) * u64::from(gray.height());
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Population mean and variance of a sample.
#[allow(clippy::cast_precision_loss)]
fn mean_and_variance(values: impl Iterator<Item = u8>) -> (f64, f64) {
    let (mut n, mut sum, mut sum_sq) = (0u64, 0.0f64, 0.0f64);
    for v in values {
        let v = f64::from(v);
        n += 1;
        sum += v;
        sum_sq += v * v;
    }
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = sum / n as f64;
    let variance = (sum_sq / n as f64 - mean * mean).max(0.0);
    (mean, variance)
}

/// Average intensity variance over a grid of square patches.
///
/// Patches are a tenth of the shorter side. The patch walk stops one patch
/// short of each edge, while the divisor counts every whole patch that
/// fits, so partially covered images score slightly lower variance.
#[allow(clippy::cast_precision_loss)]
fn patch_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    let size = width.min(height) / 10;
    if size == 0 {
        return 0.0;
    }

    let mut total = 0.0;
    for y in (0..height - size).step_by(size as usize) {
        for x in (0..width - size).step_by(size as usize) {
            let patch = (y..y + size)
                .flat_map(|py| (x..x + size).map(move |px| (px, py)))
                .map(|(px, py)| gray.get_pixel(px, py).0[0]);
            total += mean_and_variance(patch).1;
        }
    }

    let patches = u64::from(height / size) * u64::from(width / size);
    total / patches as f64
}

fn axis_score(offset: u32, extent: u32, max_fraction: f64) -> f64 {
    let max_offset = f64::from(extent) * max_fraction;
    if max_offset <= 0.0 {
        return 0.0;
    }
    (100.0 - f64::from(offset) / max_offset * 100.0).max(0.0)
}

/// Scores how evenly bright the four border strips are.
fn border_uniformity(gray: &GrayImage, strip: u32) -> f64 {
    let (width, height) = gray.dimensions();
    let sx = strip.min(width);
    let sy = strip.min(height);

    let region = |x0: u32, y0: u32, w: u32, h: u32| {
        mean_and_variance(
            (y0..y0 + h)
                .flat_map(move |y| (x0..x0 + w).map(move |x| (x, y)))
                .map(|(x, y)| gray.get_pixel(x, y).0[0]),
        )
        .0
    };

    let borders = [
        region(0, 0, width, sy),
        region(0, height - sy, width, sy),
        region(0, 0, sx, height),
        region(width - sx, 0, sx, height),
    ];

    let mean = borders.iter().sum::<f64>() / 4.0;
    let variance = borders.iter().map(|b| (b - mean).powi(2)).sum::<f64>() / 4.0;
    (100.0 - variance.sqrt()).max(0.0)
}
