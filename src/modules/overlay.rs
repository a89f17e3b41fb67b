use opencv::core::{Mat, MatTraitConst, Point, Scalar, Vector};
use opencv::imgproc;
use opencv::imgproc::{FONT_HERSHEY_SIMPLEX, LINE_8, LINE_AA};

use crate::config::config::OverlayConfig;
use crate::error::Result;
use crate::mesh::mesh::{FaceMesh, Region, NUM_LANDMARKS};
use crate::modules::midline::Midline;
use crate::modules::scorer::RegionScores;
use crate::utils::coordinate::LandmarkSet;

// Images arrive in RGB channel order, so the color tuples below are RGB.
const POINT_COLOR: (f64, f64, f64) = (220.0, 220.0, 220.0);
const MIDLINE_COLOR: (f64, f64, f64) = (255.0, 0.0, 255.0);
const EYES_COLOR: (f64, f64, f64) = (0.0, 255.0, 0.0);
const LIPS_COLOR: (f64, f64, f64) = (0.0, 0.0, 255.0);
const BROWS_COLOR: (f64, f64, f64) = (255.0, 255.0, 0.0);
const NOSE_COLOR: (f64, f64, f64) = (0.0, 255.0, 255.0);
const OVAL_COLOR: (f64, f64, f64) = (200.0, 200.0, 200.0);
const JAW_BOX_COLOR: (f64, f64, f64) = (255.0, 165.0, 0.0);
const FACE_BOX_COLOR: (f64, f64, f64) = (255.0, 255.0, 255.0);

/// Draws the diagnostic overlay onto a copy of the source image.
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    config: OverlayConfig,
}

impl OverlayRenderer {
    pub fn new(config: OverlayConfig) -> Self {
        OverlayRenderer { config }
    }

    /// render returns an annotated copy of `image` together with the worst
    /// region of the supplied scores. The input buffer is never touched, so
    /// the same routine serves the pre-scoring preview (all-zero placeholder
    /// scores) and the final annotated result.
    pub fn render(
        &self,
        image: &Mat,
        landmarks: &LandmarkSet,
        scores: &RegionScores,
        mesh: &FaceMesh,
    ) -> Result<(Mat, Region)> {
        mesh.validate(landmarks.len())?;
        let mut out = image.clone();
        let img_h = image.rows();

        let projected = project_to_pixels(landmarks);

        if self.config.draw_points {
            let count = point_count(self.config.point_density);
            for point in projected.iter().take(count) {
                imgproc::circle(&mut out, *point, 1, color(POINT_COLOR), -1, LINE_AA, 0)?;
            }
        }

        if self.config.draw_feature_boxes {
            let mut eyes: Vec<usize> = mesh.left_eye.to_vec();
            eyes.extend_from_slice(mesh.right_eye);
            let all_points: Vec<usize> = (0..landmarks.len()).collect();
            let boxes: [(&str, &[usize], (f64, f64, f64)); 5] = [
                ("EYES", &eyes, EYES_COLOR),
                ("LIPS", mesh.lips, LIPS_COLOR),
                ("NOSE", mesh.nose, NOSE_COLOR),
                ("JAW", mesh.jaw_section(), JAW_BOX_COLOR),
                ("FACE", &all_points, FACE_BOX_COLOR),
            ];
            for (label, indices, box_color) in boxes {
                self.draw_feature_box(&mut out, &projected, indices, label, color(box_color))?;
            }
        }

        draw_contour(&mut out, &projected, mesh.left_eye, true, color(EYES_COLOR))?;
        draw_contour(&mut out, &projected, mesh.right_eye, true, color(EYES_COLOR))?;
        draw_contour(&mut out, &projected, mesh.lips, true, color(LIPS_COLOR))?;
        draw_contour(&mut out, &projected, mesh.left_eyebrow, true, color(BROWS_COLOR))?;
        draw_contour(&mut out, &projected, mesh.right_eyebrow, true, color(BROWS_COLOR))?;
        draw_contour(&mut out, &projected, mesh.nose, false, color(NOSE_COLOR))?;
        draw_contour(&mut out, &projected, mesh.face_oval, true, color(OVAL_COLOR))?;

        // The rendering midline is a looser 4-point fit over the already
        // truncated pixel coordinates, independent of the scoring fit.
        let samples: Vec<(f32, f32)> = mesh
            .render_midline
            .iter()
            .map(|&index| (projected[index].x as f32, projected[index].y as f32))
            .collect();
        let midline = Midline::fit_points(&samples)?;
        imgproc::line(
            &mut out,
            Point::new(midline.x_at(0.0) as i32, 0),
            Point::new(midline.x_at(img_h as f32) as i32, img_h),
            color(MIDLINE_COLOR),
            2,
            LINE_AA,
            0,
        )?;

        Ok((out, scores.worst()))
    }

    fn draw_feature_box(
        &self,
        out: &mut Mat,
        projected: &[Point],
        indices: &[usize],
        label: &str,
        box_color: Scalar,
    ) -> Result<()> {
        let mut points: Vector<Point> = Vector::new();
        for &index in indices {
            points.push(projected[index]);
        }
        let rect = imgproc::bounding_rect(&points)?;
        imgproc::rectangle(out, rect, box_color, 1, LINE_8, 0)?;
        imgproc::put_text(
            out,
            label,
            Point::new(rect.x, rect.y - 5),
            FONT_HERSHEY_SIMPLEX,
            0.4,
            box_color,
            1,
            LINE_AA,
            false,
        )?;
        Ok(())
    }
}

/// project_to_pixels drops z and truncates x, y to integer pixel positions.
fn project_to_pixels(landmarks: &LandmarkSet) -> Vec<Point> {
    (0..landmarks.len())
        .map(|index| {
            let p = landmarks.point(index);
            Point::new(p.x as i32, p.y as i32)
        })
        .collect()
}

/// point_count truncates the point count to the density prefix. The prefix
/// is taken in index order, not spatially, so the drawn subset is identical
/// across runs.
fn point_count(density: f32) -> usize {
    ((NUM_LANDMARKS as f32 * density) as usize).min(NUM_LANDMARKS)
}

fn draw_contour(
    out: &mut Mat,
    projected: &[Point],
    indices: &[usize],
    closed: bool,
    contour_color: Scalar,
) -> Result<()> {
    let mut contour: Vector<Point> = Vector::new();
    for &index in indices {
        contour.push(projected[index]);
    }
    let mut contours: Vector<Vector<Point>> = Vector::new();
    contours.push(contour);
    imgproc::polylines(out, &contours, closed, contour_color, 1, LINE_AA, 0)?;
    Ok(())
}

fn color(rgb: (f64, f64, f64)) -> Scalar {
    Scalar::new(rgb.0, rgb.1, rgb.2, 0.0)
}
