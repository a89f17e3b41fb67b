use anyhow::Error;
use opencv::core::{Mat, Vector};
use opencv::imgcodecs::{imdecode, IMREAD_COLOR};
use opencv::imgproc::{cvt_color, COLOR_BGR2RGB};

/// decode_image_rgb decodes raw encoded image bytes (jpg, png) into an RGB
/// matrix ready for the overlay renderer.
pub fn decode_image_rgb(im_bytes: &[u8]) -> Result<Mat, Error> {
    let img_as_mat = match Mat::from_slice(im_bytes) {
        Ok(img_as_mat) => img_as_mat,
        Err(e) => return Err(Error::from(e)),
    };

    let img_bgr = match imdecode(&img_as_mat, IMREAD_COLOR) {
        Ok(img_bgr) => img_bgr,
        Err(e) => return Err(Error::from(e)),
    };

    let mut img_rgb = Mat::default();
    match cvt_color(&img_bgr, &mut img_rgb, COLOR_BGR2RGB, 0) {
        Ok(_) => {}
        Err(e) => return Err(Error::from(e)),
    };

    Ok(img_rgb)
}

/// encode_image_rgb encodes an RGB matrix back into the requested container
/// format (".png", ".jpg") for hosts that hand the annotated copy onward.
pub fn encode_image_rgb(img: &Mat, ext: &str) -> Result<Vec<u8>, Error> {
    let mut img_bgr = Mat::default();
    match cvt_color(img, &mut img_bgr, opencv::imgproc::COLOR_RGB2BGR, 0) {
        Ok(_) => {}
        Err(e) => return Err(Error::from(e)),
    };

    let mut buf: Vector<u8> = Vector::new();
    match opencv::imgcodecs::imencode(ext, &img_bgr, &mut buf, &Vector::new()) {
        Ok(_) => {}
        Err(e) => return Err(Error::from(e)),
    };

    Ok(buf.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{MatTraitConst, Scalar, CV_8UC3};

    #[test]
    fn encode_decode_preserves_dimensions() {
        let img =
            Mat::new_rows_cols_with_default(48, 64, CV_8UC3, Scalar::new(10.0, 40.0, 90.0, 0.0))
                .unwrap();
        let bytes = encode_image_rgb(&img, ".png").unwrap();
        let decoded = decode_image_rgb(&bytes).unwrap();
        assert_eq!(decoded.rows(), 48);
        assert_eq!(decoded.cols(), 64);
    }

    #[test]
    fn decode_rejects_garbage_bytes() {
        let decoded = decode_image_rgb(&[0u8, 1, 2, 3]);
        // imdecode yields an empty matrix for undecodable input.
        match decoded {
            Ok(mat) => assert_eq!(mat.rows(), 0),
            Err(_) => {}
        }
    }
}
