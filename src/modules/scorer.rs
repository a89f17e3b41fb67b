use log::warn;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::config::ScoringConfig;
use crate::error::Result;
use crate::mesh::mesh::{FaceMesh, Region};
use crate::modules::midline::Midline;
use crate::utils::coordinate::{Coordinate3D, LandmarkSet};

const SCORE_MAX: f32 = 1000.0;

/// Per-region asymmetry scores in [0, 1000].
///
/// Field order is the fixed reporting order; serialization iterates the
/// regions in exactly this order so downstream tabulation is deterministic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RegionScores {
    pub eyes: f32,
    pub eyebrows: f32,
    pub lips: f32,
    pub nose: f32,
    pub jawline: f32,
}

impl RegionScores {
    /// zeroed returns the all-zero placeholder used when rendering before
    /// any scoring pass has run.
    pub fn zeroed() -> Self {
        RegionScores {
            eyes: 0.0,
            eyebrows: 0.0,
            lips: 0.0,
            nose: 0.0,
            jawline: 0.0,
        }
    }

    pub fn get(&self, region: Region) -> f32 {
        match region {
            Region::Eyes => self.eyes,
            Region::Eyebrows => self.eyebrows,
            Region::Lips => self.lips,
            Region::Nose => self.nose,
            Region::Jawline => self.jawline,
        }
    }

    fn set(&mut self, region: Region, score: f32) {
        match region {
            Region::Eyes => self.eyes = score,
            Region::Eyebrows => self.eyebrows = score,
            Region::Lips => self.lips = score,
            Region::Nose => self.nose = score,
            Region::Jawline => self.jawline = score,
        }
    }

    /// iter yields (region, score) in the fixed reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Region, f32)> + '_ {
        Region::ALL.into_iter().map(|region| (region, self.get(region)))
    }

    pub fn mean(&self) -> f32 {
        let sum: f32 = self.iter().map(|(_, score)| score).sum();
        sum / Region::ALL.len() as f32
    }

    /// worst returns the region with the maximal score; ties resolve to the
    /// first region in reporting order.
    pub fn worst(&self) -> Region {
        let mut best = Region::ALL[0];
        let mut best_score = self.get(best);
        for region in Region::ALL {
            let score = self.get(region);
            if score > best_score {
                best = region;
                best_score = score;
            }
        }
        best
    }
}

/// Severity grade derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Perfect,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn from_total_score(total: f32) -> Self {
        if total < 100.0 {
            Severity::Perfect
        } else if total < 350.0 {
            Severity::Mild
        } else if total < 650.0 {
            Severity::Moderate
        } else {
            Severity::Severe
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Perfect => "Perfect",
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        };
        f.write_str(label)
    }
}

/// The result of one analysis pass. Built once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct AsymmetryReport {
    pub region_scores: RegionScores,
    /// Unweighted mean of the five region scores.
    pub total_score: f32,
    /// Total score rescaled to a 0-100 percentage.
    pub asymmetry_index: f32,
    pub worst_region: Region,
}

impl AsymmetryReport {
    pub fn severity(&self) -> Severity {
        Severity::from_total_score(self.total_score)
    }
}

/// Computes per-region symmetry-pair deviations against the fitted midline
/// and maps them into clamped clinical scores.
#[derive(Debug, Clone)]
pub struct AsymmetryScorer {
    config: ScoringConfig,
}

impl AsymmetryScorer {
    pub fn new(config: ScoringConfig) -> Self {
        AsymmetryScorer { config }
    }

    /// score runs the full scoring pass: midline fit, per-region pair
    /// deviations, normalization and report assembly.
    ///
    /// Pure function of its inputs apart from the warning emitted when the
    /// reference landmarks coincide.
    pub fn score(&self, landmarks: &LandmarkSet, mesh: &FaceMesh) -> Result<AsymmetryReport> {
        mesh.validate(landmarks.len())?;
        let midline = Midline::fit(landmarks, mesh.scoring_midline)?;
        let reference_width = self.reference_width(landmarks, mesh);

        let mut region_scores = RegionScores::zeroed();
        for region in Region::ALL {
            let score = self.regional_score(landmarks, mesh, region, &midline, reference_width);
            region_scores.set(region, score);
        }

        let total_score = region_scores.mean();
        Ok(AsymmetryReport {
            region_scores,
            total_score,
            asymmetry_index: (total_score / SCORE_MAX) * 100.0,
            worst_region: region_scores.worst(),
        })
    }

    /// reference_width measures the span between the two fixed oval
    /// landmarks. A zero span means the detection collapsed; scoring falls
    /// back to unit width instead of dividing by zero.
    fn reference_width(&self, landmarks: &LandmarkSet, mesh: &FaceMesh) -> f32 {
        let (lead, counterpart) = mesh.reference_span;
        let width = (to_vector(landmarks.point(lead)) - to_vector(landmarks.point(counterpart)))
            .norm();
        if width == 0.0 {
            warn!(
                "reference landmarks {} and {} coincide, falling back to unit width",
                lead, counterpart
            );
            return 1.0;
        }
        width
    }

    fn regional_score(
        &self,
        landmarks: &LandmarkSet,
        mesh: &FaceMesh,
        region: Region,
        midline: &Midline,
        reference_width: f32,
    ) -> f32 {
        let filter = mesh.pair_filter(region);
        let pairs = mesh
            .symmetry_pairs
            .iter()
            .filter(|(lead, _)| filter.contains(lead));

        let mut deviation_sum = 0.0f32;
        let mut count = 0usize;
        for &(lead, counterpart) in pairs {
            let p_lead = landmarks.point(lead);
            let p_counterpart = landmarks.point(counterpart);
            let d_lead = midline.distance_to(p_lead.x, p_lead.y);
            let d_counterpart = midline.distance_to(p_counterpart.x, p_counterpart.y);
            let lateral = (d_lead - d_counterpart).abs() / reference_width;
            let depth = (p_lead.z - p_counterpart.z).abs() / reference_width;
            deviation_sum += lateral + self.config.depth_weight * depth;
            count += 1;
        }
        if count == 0 {
            return 0.0;
        }

        let avg_deviation = deviation_sum / count as f32;
        if avg_deviation < self.config.noise_floor {
            return 0.0;
        }
        let score =
            ((avg_deviation - self.config.noise_floor) / self.config.sensitivity(region)) * SCORE_MAX;
        score.clamp(0.0, SCORE_MAX)
    }
}

fn to_vector(p: Coordinate3D) -> Vector3<f32> {
    Vector3::new(p.x, p.y, p.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::mesh::NUM_LANDMARKS;
    use ndarray::Array2;

    const MID_X: f32 = 200.0;
    const PAIR_OFFSET: f32 = 10.0;

    /// Builds a face whose symmetry pairs all mirror exactly about the
    /// vertical line x = MID_X, with equal depth on both sides.
    fn symmetric_face() -> Array2<f32> {
        let mesh = FaceMesh::standard();
        let mut coords = Array2::<f32>::zeros((NUM_LANDMARKS, 3));
        for (k, &index) in mesh.scoring_midline.iter().enumerate() {
            coords[[index, 0]] = MID_X;
            coords[[index, 1]] = 40.0 + 35.0 * k as f32;
        }
        for (j, &(lead, counterpart)) in mesh.symmetry_pairs.iter().enumerate() {
            let y = 90.0 + 2.0 * j as f32;
            coords[[lead, 0]] = MID_X - PAIR_OFFSET;
            coords[[lead, 1]] = y;
            coords[[lead, 2]] = 4.0;
            coords[[counterpart, 0]] = MID_X + PAIR_OFFSET;
            coords[[counterpart, 1]] = y;
            coords[[counterpart, 2]] = 4.0;
        }
        coords
    }

    fn scorer() -> AsymmetryScorer {
        AsymmetryScorer::new(ScoringConfig::new())
    }

    fn score_with_eye_offset(delta: f32) -> AsymmetryReport {
        let mut coords = symmetric_face();
        // Push one right-eye landmark further from the midline.
        coords[[159, 0]] -= delta;
        let landmarks = LandmarkSet::from_pixel_coords(coords).unwrap();
        scorer().score(&landmarks, &FaceMesh::standard()).unwrap()
    }

    #[test]
    fn symmetric_face_scores_zero_everywhere() {
        let landmarks = LandmarkSet::from_pixel_coords(symmetric_face()).unwrap();
        let report = scorer().score(&landmarks, &FaceMesh::standard()).unwrap();
        for (region, score) in report.region_scores.iter() {
            assert_eq!(score, 0.0, "nonzero score for {region}");
        }
        assert_eq!(report.total_score, 0.0);
        assert_eq!(report.asymmetry_index, 0.0);
        // All-zero tie resolves to the first region in reporting order.
        assert_eq!(report.worst_region, Region::Eyes);
    }

    #[test]
    fn scores_stay_in_range_and_total_is_mean() {
        let report = score_with_eye_offset(6.0);
        for (_, score) in report.region_scores.iter() {
            assert!((0.0..=1000.0).contains(&score));
        }
        let mean: f32 =
            report.region_scores.iter().map(|(_, s)| s).sum::<f32>() / Region::ALL.len() as f32;
        assert!((report.total_score - mean).abs() < 1e-4);
        assert!((report.asymmetry_index - report.total_score / 10.0).abs() < 1e-4);
    }

    #[test]
    fn lateral_offset_never_decreases_the_region_score() {
        let mut previous = 0.0f32;
        for delta in [0.5, 2.0, 4.0, 8.0, 16.0, 64.0] {
            let score = score_with_eye_offset(delta).region_scores.eyes;
            assert!(
                score >= previous,
                "score dropped from {previous} to {score} at delta {delta}"
            );
            previous = score;
        }
    }

    #[test]
    fn large_offset_saturates_at_full_scale() {
        let report = score_with_eye_offset(500.0);
        assert_eq!(report.region_scores.eyes, 1000.0);
        assert_eq!(report.worst_region, Region::Eyes);
    }

    #[test]
    fn sub_noise_floor_deviation_scores_zero() {
        // avg deviation = delta / (ref_width * pair_count) = 0.1 / 160,
        // well below the 0.0010 floor.
        let report = score_with_eye_offset(0.1);
        assert_eq!(report.region_scores.eyes, 0.0);
    }

    #[test]
    fn depth_deviation_alone_raises_the_score() {
        let mut coords = symmetric_face();
        coords[[159, 2]] += 120.0;
        let landmarks = LandmarkSet::from_pixel_coords(coords).unwrap();
        let report = scorer().score(&landmarks, &FaceMesh::standard()).unwrap();
        assert!(report.region_scores.eyes > 0.0);
        assert_eq!(report.region_scores.lips, 0.0);
    }

    #[test]
    fn coincident_reference_landmarks_fall_back_to_unit_width() {
        let mut coords = symmetric_face();
        for c in 0..3 {
            let v = coords[[234, c]];
            coords[[454, c]] = v;
        }
        let landmarks = LandmarkSet::from_pixel_coords(coords).unwrap();
        let report = scorer().score(&landmarks, &FaceMesh::standard()).unwrap();
        for (_, score) in report.region_scores.iter() {
            assert!(score.is_finite());
        }
    }

    #[test]
    fn worst_region_is_argmax() {
        let scores = RegionScores {
            eyes: 10.0,
            eyebrows: 0.0,
            lips: 999.0,
            nose: 5.0,
            jawline: 0.0,
        };
        assert_eq!(scores.worst(), Region::Lips);
    }

    #[test]
    fn worst_region_tie_resolves_to_first_in_order() {
        let scores = RegionScores {
            eyes: 999.0,
            eyebrows: 0.0,
            lips: 999.0,
            nose: 0.0,
            jawline: 0.0,
        };
        assert_eq!(scores.worst(), Region::Eyes);
    }

    #[test]
    fn region_scores_serialize_in_reporting_order() {
        let json = serde_json::to_string(&RegionScores::zeroed()).unwrap();
        let eyes = json.find("eyes").unwrap();
        let eyebrows = json.find("eyebrows").unwrap();
        let lips = json.find("lips").unwrap();
        let nose = json.find("nose").unwrap();
        let jawline = json.find("jawline").unwrap();
        assert!(eyes < eyebrows && eyebrows < lips && lips < nose && nose < jawline);
    }

    #[test]
    fn severity_thresholds_match_grading() {
        assert_eq!(Severity::from_total_score(0.0), Severity::Perfect);
        assert_eq!(Severity::from_total_score(99.9), Severity::Perfect);
        assert_eq!(Severity::from_total_score(100.0), Severity::Mild);
        assert_eq!(Severity::from_total_score(349.9), Severity::Mild);
        assert_eq!(Severity::from_total_score(350.0), Severity::Moderate);
        assert_eq!(Severity::from_total_score(650.0), Severity::Severe);
    }
}
