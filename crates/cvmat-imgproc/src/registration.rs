use cvmat_core::{Mat, Point2f};

use crate::{backend::Backend, error::ImgprocError};

/// Detect the translational shift between two images of the same size.
///
/// # Arguments
///
/// * `backend` - The native library backend.
/// * `src1` - The first floating point single channel image.
/// * `src2` - The second image, same size and type as `src1`.
/// * `window` - An optional windowing mat (for example a Hanning window), or
///   an empty mat.
///
/// # Returns
///
/// The detected sub-pixel shift and the peak response, in `[0, 1]`.
pub fn phase_correlate<B: Backend + ?Sized>(
    backend: &B,
    src1: &Mat<'_>,
    src2: &Mat<'_>,
    window: &Mat<'_>,
) -> Result<(Point2f, f64), ImgprocError> {
    log::debug!(
        "phase_correlate: {}x{}, windowed {}",
        src1.cols(),
        src1.rows(),
        !window.empty()
    );
    let (shift, response) = backend.phase_correlate(src1, src2, window)?;
    Ok((shift.into(), response))
}
