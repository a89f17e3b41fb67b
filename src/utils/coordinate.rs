use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{AsymmetryError, Result};
use crate::mesh::mesh::NUM_LANDMARKS;

/// A single landmark as emitted by the external face landmark detector:
/// x and y are fractions of image width and height, z shares the horizontal
/// scale of x.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A landmark in image-pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// The canonical ordered set of 468 landmark points in image-pixel units.
///
/// The row index is the semantic identity of an anatomical point (index 1 is
/// the nose tip); every downstream table is keyed on it. The set is built
/// once per image at the detector boundary and immutable afterwards.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    coords: Array2<f32>,
}

impl LandmarkSet {
    /// from_normalized converts the detector output into pixel units:
    /// x scales by image width, y by image height and z by image width.
    ///
    /// This is the only adaptation point between the detector's output shape
    /// and the core's; the count is validated here and nowhere else.
    pub fn from_normalized(
        landmarks: &[NormalizedLandmark],
        img_w: f32,
        img_h: f32,
    ) -> Result<Self> {
        if landmarks.len() != NUM_LANDMARKS {
            return Err(AsymmetryError::MalformedInput {
                expected: NUM_LANDMARKS,
                rows: landmarks.len(),
                cols: 3,
            });
        }
        let mut coords = Array2::<f32>::zeros((NUM_LANDMARKS, 3));
        for (i, lm) in landmarks.iter().enumerate() {
            coords[[i, 0]] = lm.x * img_w;
            coords[[i, 1]] = lm.y * img_h;
            coords[[i, 2]] = lm.z * img_w;
        }
        Ok(LandmarkSet { coords })
    }

    /// from_pixel_coords wraps an already-scaled (468, 3) coordinate block.
    pub fn from_pixel_coords(coords: Array2<f32>) -> Result<Self> {
        let (rows, cols) = coords.dim();
        if rows != NUM_LANDMARKS || cols != 3 {
            return Err(AsymmetryError::MalformedInput {
                expected: NUM_LANDMARKS,
                rows,
                cols,
            });
        }
        Ok(LandmarkSet { coords })
    }

    pub fn len(&self) -> usize {
        self.coords.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.nrows() == 0
    }

    /// point returns the landmark at `index`.
    ///
    /// Panics if `index` is out of range; referencing a point outside the
    /// validated set is a contract violation, not a recoverable state.
    pub fn point(&self, index: usize) -> Coordinate3D {
        Coordinate3D {
            x: self.coords[[index, 0]],
            y: self.coords[[index, 1]],
            z: self.coords[[index, 2]],
        }
    }

    pub fn coords(&self) -> &Array2<f32> {
        &self.coords
    }
}
