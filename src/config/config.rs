use serde::{Deserialize, Serialize};

use crate::mesh::mesh::Region;

/// Calibration data for the regional asymmetry scorer.
///
/// The sensitivity constants and the noise floor are hand-tuned against
/// reference imagery, not derived; revising the calibration must not require
/// touching the scoring algorithm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Average deviations below this fraction of the reference width are
    /// treated as measurement noise and score 0.
    pub noise_floor: f32,
    /// Weight of the depth (z) deviation relative to the lateral deviation.
    pub depth_weight: f32,
    pub sensitivity_eyes: f32,
    pub sensitivity_eyebrows: f32,
    pub sensitivity_lips: f32,
    pub sensitivity_nose: f32,
    pub sensitivity_jawline: f32,
}

impl ScoringConfig {
    pub fn new() -> Self {
        ScoringConfig {
            noise_floor: 0.0010,
            depth_weight: 0.2,
            sensitivity_eyes: 0.05,
            sensitivity_eyebrows: 0.06,
            sensitivity_lips: 0.05,
            sensitivity_nose: 0.04,
            sensitivity_jawline: 0.08,
        }
    }

    /// sensitivity returns the full-scale deviation for a region: an average
    /// deviation of `noise_floor + sensitivity` maps to a score of 1000.
    pub fn sensitivity(&self, region: Region) -> f32 {
        match region {
            Region::Eyes => self.sensitivity_eyes,
            Region::Eyebrows => self.sensitivity_eyebrows,
            Region::Lips => self.sensitivity_lips,
            Region::Nose => self.sensitivity_nose,
            Region::Jawline => self.sensitivity_jawline,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig::new()
    }
}

/// Options for the diagnostic overlay renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    /// Draw per-landmark point markers.
    pub draw_points: bool,
    /// Draw labeled bounding boxes around the coarse feature groups.
    pub draw_feature_boxes: bool,
    /// Fraction in (0, 1] of landmark points to draw, taken as a prefix of
    /// the index order.
    pub point_density: f32,
}

impl OverlayConfig {
    pub fn new() -> Self {
        OverlayConfig {
            draw_points: true,
            draw_feature_boxes: false,
            point_density: 1.0,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig::new()
    }
}
