use serde::{Deserialize, Serialize};

use crate::error::{AsymmetryError, Result};

/// Number of points produced by the face landmark detector.
pub const NUM_LANDMARKS: usize = 468;

const FACE_OVAL: [usize; 36] = [
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];

const LEFT_EYE: [usize; 16] = [
    362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
];

const RIGHT_EYE: [usize; 16] = [
    33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
];

const LEFT_EYEBROW: [usize; 10] = [336, 285, 295, 282, 283, 276, 300, 293, 334, 296];

const RIGHT_EYEBROW: [usize; 10] = [70, 63, 105, 66, 107, 55, 65, 52, 53, 46];

const LIPS: [usize; 31] = [
    61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291, 308, 324, 318, 402, 317, 14, 87, 178, 88,
    95, 78, 191, 80, 81, 82, 13, 312, 311, 310, 415,
];

const NOSE: [usize; 16] = [
    168, 6, 197, 195, 5, 4, 1, 2, 98, 327, 79, 309, 102, 331, 64, 294,
];

/// Anatomically homologous (right, left) landmark pairs across the midline.
/// Used for scoring only, never for rendering.
const SYMMETRY_PAIRS: [(usize, usize); 40] = [
    (33, 263),
    (133, 362),
    (159, 386),
    (145, 374),
    (153, 380),
    (154, 381),
    (155, 382),
    (133, 362),
    (70, 300),
    (105, 334),
    (107, 336),
    (55, 285),
    (65, 295),
    (52, 282),
    (53, 283),
    (46, 276),
    (61, 291),
    (78, 308),
    (95, 324),
    (82, 312),
    (191, 415),
    (80, 310),
    (81, 311),
    (178, 402),
    (87, 317),
    (79, 309),
    (102, 331),
    (64, 294),
    (98, 327),
    (97, 326),
    (234, 454),
    (127, 356),
    (132, 361),
    (58, 288),
    (172, 402),
    (136, 365),
    (150, 379),
    (149, 378),
    (176, 400),
    (148, 377),
];

// Lead-index filters selecting the symmetry pairs scored per region.
const LIP_PAIR_FILTER: [usize; 9] = [61, 78, 95, 82, 191, 80, 81, 178, 87];
const NOSE_PAIR_FILTER: [usize; 5] = [79, 102, 64, 98, 97];
const JAW_PAIR_FILTER: [usize; 10] = [234, 127, 132, 58, 172, 136, 150, 149, 176, 148];

/// Landmark subset for the scoring midline fit, forehead through nose bridge
/// to chin.
const SCORING_MIDLINE: [usize; 10] = [10, 168, 6, 197, 195, 5, 4, 1, 2, 152];

/// Smaller subset (forehead, nasion, nose tip, chin) for the rendered
/// midline. Intentionally independent of the scoring fit.
const RENDER_MIDLINE: [usize; 4] = [10, 168, 1, 152];

/// Far-right / far-left oval landmarks whose distance normalizes deviations.
const REFERENCE_SPAN: (usize, usize) = (234, 454);

/// Scored anatomical regions, in the fixed reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Eyes,
    Eyebrows,
    Lips,
    Nose,
    Jawline,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Eyes,
        Region::Eyebrows,
        Region::Lips,
        Region::Nose,
        Region::Jawline,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Eyes => "Eyes",
            Region::Eyebrows => "Eyebrows",
            Region::Lips => "Lips",
            Region::Nose => "Nose",
            Region::Jawline => "Jawline",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable landmark index tables of the 468-point face mesh.
///
/// All downstream components borrow these tables instead of reaching for
/// module-level globals, so a host can in principle carry a customized mesh.
#[derive(Debug, Clone, Copy)]
pub struct FaceMesh {
    pub face_oval: &'static [usize],
    pub left_eye: &'static [usize],
    pub right_eye: &'static [usize],
    pub left_eyebrow: &'static [usize],
    pub right_eyebrow: &'static [usize],
    pub lips: &'static [usize],
    pub nose: &'static [usize],
    pub symmetry_pairs: &'static [(usize, usize)],
    pub scoring_midline: &'static [usize],
    pub render_midline: &'static [usize],
    pub reference_span: (usize, usize),
}

impl FaceMesh {
    /// standard returns the canonical MediaPipe-compatible index tables.
    pub fn standard() -> Self {
        FaceMesh {
            face_oval: &FACE_OVAL,
            left_eye: &LEFT_EYE,
            right_eye: &RIGHT_EYE,
            left_eyebrow: &LEFT_EYEBROW,
            right_eyebrow: &RIGHT_EYEBROW,
            lips: &LIPS,
            nose: &NOSE,
            symmetry_pairs: &SYMMETRY_PAIRS,
            scoring_midline: &SCORING_MIDLINE,
            render_midline: &RENDER_MIDLINE,
            reference_span: REFERENCE_SPAN,
        }
    }

    /// pair_filter returns the lead-index list selecting which symmetry
    /// pairs contribute to a region's score.
    pub fn pair_filter(&self, region: Region) -> &'static [usize] {
        match region {
            Region::Eyes => &RIGHT_EYE,
            Region::Eyebrows => &RIGHT_EYEBROW,
            Region::Lips => &LIP_PAIR_FILTER,
            Region::Nose => &NOSE_PAIR_FILTER,
            Region::Jawline => &JAW_PAIR_FILTER,
        }
    }

    /// jaw_section returns the 16-point jawline slice of the face oval used
    /// for the JAW feature box.
    pub fn jaw_section(&self) -> &[usize] {
        &self.face_oval[10..26]
    }

    /// tesselation builds the full point correspondence graph used for mesh
    /// visualization: the oval ring plus a regular stride pattern across all
    /// 468 points.
    pub fn tesselation(&self) -> Vec<(usize, usize)> {
        let mut connections = Vec::with_capacity(self.face_oval.len() + NUM_LANDMARKS);
        for i in 0..self.face_oval.len() {
            connections.push((self.face_oval[i], self.face_oval[(i + 1) % self.face_oval.len()]));
        }
        for i in (0..NUM_LANDMARKS).step_by(2) {
            if i + 1 < NUM_LANDMARKS {
                connections.push((i, i + 1));
            }
            if i + 30 < NUM_LANDMARKS {
                connections.push((i, i + 30));
            }
        }
        connections
    }

    /// validate checks that every table index addresses a point inside a
    /// `len`-point landmark set.
    pub fn validate(&self, len: usize) -> Result<()> {
        let groups = [
            self.face_oval,
            self.left_eye,
            self.right_eye,
            self.left_eyebrow,
            self.right_eyebrow,
            self.lips,
            self.nose,
            self.scoring_midline,
            self.render_midline,
        ];
        for group in groups {
            for &index in group {
                if index >= len {
                    return Err(AsymmetryError::IndexOutOfRange { index, len });
                }
            }
        }
        for &(lead, counterpart) in self.symmetry_pairs {
            for index in [lead, counterpart] {
                if index >= len {
                    return Err(AsymmetryError::IndexOutOfRange { index, len });
                }
            }
        }
        for index in [self.reference_span.0, self.reference_span.1] {
            if index >= len {
                return Err(AsymmetryError::IndexOutOfRange { index, len });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_are_in_range() {
        let mesh = FaceMesh::standard();
        assert!(mesh.validate(NUM_LANDMARKS).is_ok());
    }

    #[test]
    fn standard_tables_rejected_for_short_set() {
        let mesh = FaceMesh::standard();
        let err = mesh.validate(100).unwrap_err();
        assert!(matches!(err, AsymmetryError::IndexOutOfRange { .. }));
    }

    #[test]
    fn pair_filters_select_lead_indices_of_real_pairs() {
        let mesh = FaceMesh::standard();
        for region in Region::ALL {
            let filter = mesh.pair_filter(region);
            let selected = mesh
                .symmetry_pairs
                .iter()
                .filter(|(lead, _)| filter.contains(lead))
                .count();
            assert!(selected > 0, "no pairs selected for {region}");
        }
    }

    #[test]
    fn jaw_section_is_sixteen_points() {
        let mesh = FaceMesh::standard();
        assert_eq!(mesh.jaw_section().len(), 16);
        assert_eq!(mesh.jaw_section()[0], 361);
        assert_eq!(mesh.jaw_section()[15], 58);
    }

    #[test]
    fn tesselation_is_deterministic() {
        let mesh = FaceMesh::standard();
        let edges = mesh.tesselation();
        assert_eq!(edges, mesh.tesselation());
        assert_eq!(edges[0], (10, 338));
        // oval ring + 234 consecutive edges + 219 stride-30 edges
        assert_eq!(edges.len(), 36 + 234 + 219);
    }
}
