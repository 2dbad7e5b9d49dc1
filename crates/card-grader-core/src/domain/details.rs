//! Analyzer diagnostics attached to component results.

use serde::{Deserialize, Serialize};

/// Diagnostic record explaining how a component score was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentDetails {
    /// Card outline measurements.
    Edges(EdgeDetails),
    /// Corner detection measurements.
    Corners(CornerDetails),
    /// Surface defect and texture measurements.
    Surface(SurfaceDetails),
    /// Card placement and border measurements.
    Centering(CenteringDetails),
    /// Score estimated from file metadata rather than pixels.
    Simulated(SimulatedDetails),
    /// Analysis did not run.
    Unavailable {
        /// Why no measurement is available.
        reason: String,
    },
    /// Any other payload, kept as-is.
    Other(serde_json::Value),
}

impl ComponentDetails {
    /// Flattens the record into label/value pairs for human-readable output.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Edges(d) => vec![
                ("corners_detected", d.corners_detected.to_string()),
                ("corner_score", fmt2(d.corner_score)),
                ("smoothness_score", fmt2(d.smoothness_score)),
                ("perimeter", fmt2(d.perimeter)),
                ("area", fmt2(d.area)),
            ],
            Self::Corners(d) => vec![
                ("corners_detected", d.corners_detected.to_string()),
                ("sharpness_score", fmt2(d.sharpness_score)),
                ("count_score", fmt2(d.count_score)),
                ("avg_gradient", fmt2(d.avg_gradient)),
            ],
            Self::Surface(d) => vec![
                ("mean_intensity", fmt2(d.mean_intensity)),
                ("std_intensity", fmt2(d.std_intensity)),
                ("defect_score", fmt2(d.defect_score)),
                ("texture_variance", fmt2(d.texture_variance)),
                ("defect_quality", fmt2(d.defect_quality)),
                ("texture_quality", fmt2(d.texture_quality)),
            ],
            Self::Centering(d) => vec![
                ("offset_x", d.offset_x.to_string()),
                ("offset_y", d.offset_y.to_string()),
                ("centering_x_score", fmt2(d.centering_x_score)),
                ("centering_y_score", fmt2(d.centering_y_score)),
                ("border_uniformity_score", fmt2(d.border_uniformity_score)),
                (
                    "card_center",
                    format!("({}, {})", d.card_center.0, d.card_center.1),
                ),
                (
                    "image_center",
                    format!("({}, {})", d.image_center.0, d.image_center.1),
                ),
            ],
            Self::Simulated(d) => {
                let mut fields = Vec::with_capacity(3);
                if let Some(size) = d.file_size {
                    fields.push(("file_size", size.to_string()));
                }
                fields.push(("filename_indicators", d.filename_indicators.clone()));
                fields.push(("simulated_analysis", d.simulated_analysis.clone()));
                fields
            }
            Self::Unavailable { reason } => vec![("reason", reason.clone())],
            Self::Other(serde_json::Value::String(note)) => vec![("note", note.clone())],
            Self::Other(value) => vec![("raw", value.to_string())],
        }
    }
}

fn fmt2(value: f64) -> String {
    format!("{value:.2}")
}

/// Outline measurements from the largest detected contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDetails {
    /// Vertices of the simplified outline polygon.
    pub corners_detected: usize,
    /// Rectangularity score (0-100).
    pub corner_score: f64,
    /// Compactness-based smoothness score (0-100).
    pub smoothness_score: f64,
    /// Outline perimeter in pixels.
    pub perimeter: f64,
    /// Enclosed area in square pixels.
    pub area: f64,
}

/// Corner detection measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerDetails {
    /// Number of detected corner features.
    pub corners_detected: usize,
    /// Gradient-based sharpness score (0-100).
    pub sharpness_score: f64,
    /// Score for how close the count is to a clean rectangle (0-100).
    pub count_score: f64,
    /// Mean Sobel gradient magnitude.
    pub avg_gradient: f64,
}

/// Surface defect and texture measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDetails {
    /// Mean grayscale intensity.
    pub mean_intensity: f64,
    /// Standard deviation of grayscale intensity.
    pub std_intensity: f64,
    /// Mean residual against a median-filtered copy.
    pub defect_score: f64,
    /// Mean per-patch intensity variance.
    pub texture_variance: f64,
    /// Defect-derived quality (0-100).
    pub defect_quality: f64,
    /// Texture-derived quality (0-100).
    pub texture_quality: f64,
}

/// Card placement and border measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenteringDetails {
    /// Horizontal distance between card and image centers.
    pub offset_x: u32,
    /// Vertical distance between card and image centers.
    pub offset_y: u32,
    /// Horizontal placement score (0-100).
    pub centering_x_score: f64,
    /// Vertical placement score (0-100).
    pub centering_y_score: f64,
    /// Border brightness uniformity score (0-100).
    pub border_uniformity_score: f64,
    /// Center of the detected card bounding box.
    pub card_center: (u32, u32),
    /// Center of the image.
    pub image_center: (u32, u32),
}

/// Metadata used by the file-heuristic analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedDetails {
    /// File size in bytes, where it influenced the score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Lowercased file name that was inspected.
    pub filename_indicators: String,
    /// Short note on how the score was estimated.
    pub simulated_analysis: String,
}
