use cvmat_core::{ffi, Mat, Size};

use crate::{backend::Backend, error::ImgprocError};

/// Pixel extrapolation method at the image border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum BorderType {
    /// `iiiiii|abcdefgh|iiiiiii` with some specified `i`
    Constant = 0,
    /// `aaaaaa|abcdefgh|hhhhhhh`
    Replicate = 1,
    /// `fedcba|abcdefgh|hgfedcb`
    Reflect = 2,
    /// `cdefgh|abcdefgh|abcdefg`
    Wrap = 3,
    /// `gfedcb|abcdefgh|gfedcba`
    Reflect101 = 4,
    /// `uvwxyz|abcdefgh|ijklmno`
    Transparent = 5,
    /// Do not look outside of the region of interest.
    Isolated = 16,
}

impl BorderType {
    /// The library's default border, same as [`BorderType::Reflect101`].
    pub const DEFAULT: Self = Self::Reflect101;
}

impl Default for BorderType {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Blur an image using a Gaussian filter.
///
/// # Arguments
///
/// * `backend` - The native library backend.
/// * `src` - The input image.
/// * `dst` - The output image, reallocated to the shape and type of `src`.
/// * `ksize` - The kernel size. Width and height must be positive and odd, or
///   zero to be computed from the sigmas.
/// * `sigma_x` - The standard deviation in the horizontal direction.
/// * `sigma_y` - The standard deviation in the vertical direction, `0.0` to
///   reuse `sigma_x`.
/// * `border_type` - The pixel extrapolation method.
pub fn gaussian_blur<B: Backend + ?Sized>(
    backend: &B,
    src: &Mat<'_>,
    dst: &mut Mat<'_>,
    ksize: Size,
    sigma_x: f64,
    sigma_y: f64,
    border_type: BorderType,
) -> Result<(), ImgprocError> {
    log::debug!("gaussian_blur: ksize {ksize}, sigma ({sigma_x}, {sigma_y}), {border_type:?}");
    backend.gaussian_blur(
        src,
        dst,
        ffi::Size::from(ksize),
        sigma_x,
        sigma_y,
        border_type as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_codes() {
        assert_eq!(BorderType::Constant as i32, 0);
        assert_eq!(BorderType::Transparent as i32, 5);
        assert_eq!(BorderType::Isolated as i32, 16);
        assert_eq!(BorderType::default() as i32, 4);
    }
}
