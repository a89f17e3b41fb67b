use opencv::core::Mat;

use crate::config::config::{OverlayConfig, ScoringConfig};
use crate::error::Result;
use crate::mesh::mesh::{FaceMesh, Region};
use crate::modules::overlay::OverlayRenderer;
use crate::modules::scorer::{AsymmetryReport, AsymmetryScorer, RegionScores};
use crate::utils::coordinate::LandmarkSet;

/// The full analysis pipeline: geometry tables, scorer and overlay renderer
/// behind one facade.
///
/// Each invocation is synchronous and returns a fresh, independently-owned
/// result; the pipeline holds no per-image state, so concurrent hosts can
/// run one invocation per request without coordination.
#[derive(Debug, Clone)]
pub struct AsymmetryPipeline {
    mesh: FaceMesh,
    scorer: AsymmetryScorer,
    renderer: OverlayRenderer,
}

impl AsymmetryPipeline {
    /// new initializes the pipeline over the standard 468-point mesh.
    ///
    /// # Arguments
    /// * `in_scoring` - Option<ScoringConfig>, reference calibration when None
    /// * `in_overlay` - Option<OverlayConfig>, default overlay options when None
    ///
    /// # Returns
    /// * `AsymmetryPipeline`
    pub fn new(in_scoring: Option<ScoringConfig>, in_overlay: Option<OverlayConfig>) -> Self {
        let scoring = in_scoring.unwrap_or_else(ScoringConfig::new);
        let overlay = in_overlay.unwrap_or_else(OverlayConfig::new);
        AsymmetryPipeline {
            mesh: FaceMesh::standard(),
            scorer: AsymmetryScorer::new(scoring),
            renderer: OverlayRenderer::new(overlay),
        }
    }

    pub fn mesh(&self) -> &FaceMesh {
        &self.mesh
    }

    /// analyze runs the scoring pass over one landmark set.
    ///
    /// # Arguments
    /// * `landmarks` - the canonical 468-point set for one image
    ///
    /// # Returns
    /// * `Result<AsymmetryReport>`
    pub fn analyze(&self, landmarks: &LandmarkSet) -> Result<AsymmetryReport> {
        self.scorer.score(landmarks, &self.mesh)
    }

    /// render draws the diagnostic overlay onto a copy of `image` and
    /// reports the worst region of `scores`.
    ///
    /// # Arguments
    /// * `image` - source image, RGB, never mutated
    /// * `landmarks` - the canonical 468-point set for the same image
    /// * `scores` - per-region scores, or a zeroed placeholder
    ///
    /// # Returns
    /// * `Result<(Mat, Region)>`
    pub fn render(
        &self,
        image: &Mat,
        landmarks: &LandmarkSet,
        scores: &RegionScores,
    ) -> Result<(Mat, Region)> {
        self.renderer.render(image, landmarks, scores, &self.mesh)
    }

    /// render_preview draws the overlay before any scoring pass has run,
    /// using the all-zero placeholder scores.
    pub fn render_preview(&self, image: &Mat, landmarks: &LandmarkSet) -> Result<(Mat, Region)> {
        self.render(image, landmarks, &RegionScores::zeroed())
    }
}

impl Default for AsymmetryPipeline {
    fn default() -> Self {
        AsymmetryPipeline::new(None, None)
    }
}
