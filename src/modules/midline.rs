use crate::error::{AsymmetryError, Result};
use crate::utils::coordinate::LandmarkSet;

/// Minimum spread of squared y-residuals below which the regression is
/// treated as undefined.
const MIN_Y_SPREAD: f32 = 1e-6;

/// The estimated facial symmetry axis, x = slope * y + intercept in
/// image-pixel space.
///
/// The face midline is near vertical, so x is regressed on y; a perfectly
/// vertical axis then has slope 0 instead of an undefined one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Midline {
    pub slope: f32,
    pub intercept: f32,
}

impl Midline {
    /// fit estimates the midline by ordinary least squares over the
    /// landmarks selected by `indices`.
    pub fn fit(landmarks: &LandmarkSet, indices: &[usize]) -> Result<Self> {
        let samples: Vec<(f32, f32)> = indices
            .iter()
            .map(|&index| {
                let p = landmarks.point(index);
                (p.x, p.y)
            })
            .collect();
        Midline::fit_points(&samples)
    }

    /// fit_points runs the regression over raw (x, y) samples.
    ///
    /// Fails with `DegenerateMidline` when the y-values coincide, instead of
    /// letting a near-zero denominator leak NaN or Infinity into the scores
    /// downstream.
    pub fn fit_points(samples: &[(f32, f32)]) -> Result<Self> {
        let n = samples.len() as f32;
        let mut mean_x = 0.0f32;
        let mut mean_y = 0.0f32;
        for &(x, y) in samples {
            mean_x += x;
            mean_y += y;
        }
        mean_x /= n;
        mean_y /= n;

        let mut sxy = 0.0f32;
        let mut syy = 0.0f32;
        for &(x, y) in samples {
            sxy += (x - mean_x) * (y - mean_y);
            syy += (y - mean_y) * (y - mean_y);
        }

        if syy < MIN_Y_SPREAD {
            return Err(AsymmetryError::DegenerateMidline {
                y: mean_y,
                count: samples.len(),
            });
        }

        let slope = sxy / syy;
        Ok(Midline {
            slope,
            intercept: mean_x - slope * mean_y,
        })
    }

    /// distance_to returns the perpendicular distance from (x, y) to the
    /// midline.
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        (x - self.slope * y - self.intercept).abs() / (1.0 + self.slope * self.slope).sqrt()
    }

    /// x_at evaluates the line at vertical position y.
    pub fn x_at(&self, y: f32) -> f32 {
        self.slope * y + self.intercept
    }
}
