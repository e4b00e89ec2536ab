use cvmat_core::Mat;

use crate::{backend::Backend, error::ImgprocError};

/// Color space conversion codes understood by the native library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ColorConversionCode {
    /// Adds an alpha channel to a BGR image.
    BgrToBgra = 0,
    /// Removes the alpha channel from a BGRA image.
    BgraToBgr = 1,
    /// BGR to RGBA.
    BgrToRgba = 2,
    /// RGBA to BGR.
    RgbaToBgr = 3,
    /// BGR to RGB.
    BgrToRgb = 4,
    /// BGRA to RGBA.
    BgraToRgba = 5,
    /// BGR to grayscale.
    BgrToGray = 6,
    /// RGB to grayscale.
    RgbToGray = 7,
    /// Grayscale to BGR.
    GrayToBgr = 8,
    /// Grayscale to BGRA.
    GrayToBgra = 9,
    /// BGRA to grayscale.
    BgraToGray = 10,
    /// RGBA to grayscale.
    RgbaToGray = 11,
    /// BGR to YCrCb.
    BgrToYCrCb = 36,
    /// RGB to YCrCb.
    RgbToYCrCb = 37,
    /// YCrCb to BGR.
    YCrCbToBgr = 38,
    /// YCrCb to RGB.
    YCrCbToRgb = 39,
    /// BGR to HSV.
    BgrToHsv = 40,
    /// RGB to HSV.
    RgbToHsv = 41,
    /// BGR to CIE L*a*b*.
    BgrToLab = 44,
    /// RGB to CIE L*a*b*.
    RgbToLab = 45,
    /// BGR to CIE L*u*v*.
    BgrToLuv = 50,
    /// RGB to CIE L*u*v*.
    RgbToLuv = 51,
    /// BGR to HLS.
    BgrToHls = 52,
    /// RGB to HLS.
    RgbToHls = 53,
    /// HSV to BGR.
    HsvToBgr = 54,
    /// HSV to RGB.
    HsvToRgb = 55,
    /// CIE L*a*b* to BGR.
    LabToBgr = 56,
    /// CIE L*a*b* to RGB.
    LabToRgb = 57,
    /// CIE L*u*v* to BGR.
    LuvToBgr = 58,
    /// CIE L*u*v* to RGB.
    LuvToRgb = 59,
    /// HLS to BGR.
    HlsToBgr = 60,
    /// HLS to RGB.
    HlsToRgb = 61,
    /// BGR to YUV.
    BgrToYuv = 82,
    /// RGB to YUV.
    RgbToYuv = 83,
    /// YUV to BGR.
    YuvToBgr = 84,
    /// YUV to RGB.
    YuvToRgb = 85,
}

/// Convert an image from one color space to another.
///
/// `dst` is reallocated by the native library to the channel count the
/// conversion produces.
///
/// Example:
///
/// ```no_run
/// use cvmat_core::Mat;
/// use cvmat_imgproc::{backend::Backend, color::{cvt_color, ColorConversionCode}};
///
/// fn to_gray(backend: &dyn Backend, bgr: &Mat<'_>) -> Mat<'static> {
///     let mut gray = Mat::new();
///     cvt_color(backend, bgr, &mut gray, ColorConversionCode::BgrToGray).unwrap();
///     gray
/// }
/// ```
pub fn cvt_color<B: Backend + ?Sized>(
    backend: &B,
    src: &Mat<'_>,
    dst: &mut Mat<'_>,
    code: ColorConversionCode,
) -> Result<(), ImgprocError> {
    log::debug!("cvt_color: {code:?} on a {} mat", src.mat_type());
    backend.cvt_color(src, dst, code as i32)
}
