use cvmat_core::Mat;

use crate::{backend::Backend, error::ImgprocError};

/// Comparison operator between two arrays or an array and a scalar.
///
/// Exposed with the native codes for callers that talk to the library
/// directly; no operation of this crate takes it yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CompareType {
    /// `src1 == src2`
    Eq = 0,
    /// `src1 > src2`
    Gt = 1,
    /// `src1 >= src2`
    Ge = 2,
    /// `src1 < src2`
    Lt = 3,
    /// `src1 <= src2`
    Le = 4,
    /// `src1 != src2`
    Ne = 5,
}

/// Apply a perspective matrix to a set of 2D or 3D points.
///
/// # Arguments
///
/// * `backend` - The native library backend.
/// * `src` - The input points, a 2 or 3 channel floating point mat.
/// * `dst` - The output points, same shape and type as `src`.
/// * `transform` - A 3x3 or 4x4 floating point transformation matrix.
pub fn perspective_transform<B: Backend + ?Sized>(
    backend: &B,
    src: &Mat<'_>,
    dst: &mut Mat<'_>,
    transform: &Mat<'_>,
) -> Result<(), ImgprocError> {
    log::debug!(
        "perspective_transform: {} points with a {}x{} matrix",
        src.total(),
        transform.rows(),
        transform.cols()
    );
    backend.perspective_transform(src, dst, transform)
}
