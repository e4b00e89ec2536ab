use cvmat_core::{ffi, Mat, Size};

use crate::{backend::Backend, error::ImgprocError};

/// Interpolation mode used when resizing or warping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum InterpolationFlags {
    /// Nearest neighbor.
    Nearest = 0,
    /// Bilinear.
    Linear = 1,
    /// Bicubic over a 4x4 neighborhood.
    Cubic = 2,
    /// Resampling using pixel area relation.
    Area = 3,
    /// Lanczos over an 8x8 neighborhood.
    Lanczos4 = 4,
    /// Mask for the interpolation codes.
    Max = 7,
}

impl InterpolationFlags {
    /// The library's default interpolation, same as [`InterpolationFlags::Linear`].
    pub const DEFAULT: Self = Self::Linear;
}

impl Default for InterpolationFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Resize an image.
///
/// Either `size` is non-zero and gives the output size, or it is zero and the
/// output size is computed from the `fx` and `fy` scale factors.
///
/// # Arguments
///
/// * `backend` - The native library backend.
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `size` - The output size, or zero.
/// * `fx` - The horizontal scale factor, used when `size` is zero.
/// * `fy` - The vertical scale factor, used when `size` is zero.
/// * `interpolation` - The interpolation mode.
pub fn resize<B: Backend + ?Sized>(
    backend: &B,
    src: &Mat<'_>,
    dst: &mut Mat<'_>,
    size: Size,
    fx: f64,
    fy: f64,
    interpolation: InterpolationFlags,
) -> Result<(), ImgprocError> {
    log::debug!(
        "resize: {}x{} -> {size} (fx {fx}, fy {fy}), {interpolation:?}",
        src.cols(),
        src.rows()
    );
    backend.resize(src, dst, ffi::Size::from(size), fx, fy, interpolation as i32)
}
