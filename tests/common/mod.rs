use ndarray::Array2;
use rs_face_asymmetry::{FaceMesh, LandmarkSet, NUM_LANDMARKS};

const MID_X: f32 = 320.0;
const PAIR_OFFSET: f32 = 24.0;

/// Builds a synthetic face whose symmetry pairs mirror exactly about the
/// vertical line x = MID_X with equal depth on both sides, so every region
/// scores zero.
pub fn symmetric_face_coords() -> Array2<f32> {
    let mesh = FaceMesh::standard();
    let mut coords = Array2::<f32>::zeros((NUM_LANDMARKS, 3));
    for i in 0..NUM_LANDMARKS {
        coords[[i, 0]] = 100.0 + (i % 24) as f32 * 18.0;
        coords[[i, 1]] = 60.0 + (i / 24) as f32 * 18.0;
    }
    for (k, &index) in mesh.scoring_midline.iter().enumerate() {
        coords[[index, 0]] = MID_X;
        coords[[index, 1]] = 80.0 + 30.0 * k as f32;
    }
    for (j, &(lead, counterpart)) in mesh.symmetry_pairs.iter().enumerate() {
        let y = 150.0 + 3.0 * j as f32;
        coords[[lead, 0]] = MID_X - PAIR_OFFSET;
        coords[[lead, 1]] = y;
        coords[[lead, 2]] = 5.0;
        coords[[counterpart, 0]] = MID_X + PAIR_OFFSET;
        coords[[counterpart, 1]] = y;
        coords[[counterpart, 2]] = 5.0;
    }
    coords
}

pub fn symmetric_face() -> LandmarkSet {
    LandmarkSet::from_pixel_coords(symmetric_face_coords()).unwrap()
}
