use cvmat_core::{Mat, Point2fVector, PointVector};

use crate::{backend::Backend, error::ImgprocError};

/// Compute the 3x3 perspective transform mapping four source points onto four
/// destination points.
///
/// # Arguments
///
/// * `backend` - The native library backend.
/// * `src` - Vertices of the quadrangle in the source image.
/// * `dst` - Vertices of the corresponding quadrangle in the destination image.
///
/// # Returns
///
/// A newly allocated `CV_64FC1` transformation matrix owned by the caller.
pub fn get_perspective_transform<B: Backend + ?Sized>(
    backend: &B,
    src: &PointVector,
    dst: &PointVector,
) -> Result<Mat<'static>, ImgprocError> {
    log::debug!(
        "get_perspective_transform: {} -> {} points",
        src.size(),
        dst.size()
    );
    let mut out = Mat::new();
    backend.get_perspective_transform(src.as_ffi()?, dst.as_ffi()?, &mut out)?;
    Ok(out)
}

/// Floating point variant of [`get_perspective_transform`].
pub fn get_perspective_transform_2f<B: Backend + ?Sized>(
    backend: &B,
    src: &Point2fVector,
    dst: &Point2fVector,
) -> Result<Mat<'static>, ImgprocError> {
    log::debug!(
        "get_perspective_transform_2f: {} -> {} points",
        src.size(),
        dst.size()
    );
    let mut out = Mat::new();
    backend.get_perspective_transform_2f(src.as_ffi()?, dst.as_ffi()?, &mut out)?;
    Ok(out)
}
