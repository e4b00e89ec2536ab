//! Backend abstraction over the native vision library.
//!
//! Every operation of this crate marshals its arguments into the C-layout
//! structs of [`cvmat_core::ffi`] and forwards them to exactly one method of
//! [`Backend`]. The native library is reached through [`crate::native`]
//! (feature `native`); tests and other hosts can plug in their own backend.

use std::ffi::CStr;

use cvmat_core::{ffi, Mat};

use crate::error::ImgprocError;

/// One method per native entry point.
///
/// Inputs are passed as borrowed mats, outputs as mutable mats that the
/// backend reshapes with [`Mat::create`] or fills with [`Mat::assign`].
/// Enumeration arguments arrive as their native integer codes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so that a backend can be shared by
/// callers on several threads. Calls are synchronous.
pub trait Backend: Send + Sync {
    /// Applies a perspective matrix to every point of `src`.
    fn perspective_transform(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        transform: &Mat<'_>,
    ) -> Result<(), ImgprocError>;

    /// Blurs `src` with a Gaussian kernel.
    fn gaussian_blur(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        ksize: ffi::Size,
        sigma_x: f64,
        sigma_y: f64,
        border_type: i32,
    ) -> Result<(), ImgprocError>;

    /// Draws an arrow from `pt1` to `pt2`.
    fn arrowed_line(
        &self,
        img: &mut Mat<'_>,
        pt1: ffi::Point,
        pt2: ffi::Point,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError>;

    /// Draws a circle.
    fn circle(
        &self,
        img: &mut Mat<'_>,
        center: ffi::Point,
        radius: i32,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError>;

    /// Draws an elliptic arc or a filled sector.
    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &self,
        img: &mut Mat<'_>,
        center: ffi::Point,
        axes: ffi::Point,
        angle: f64,
        start_angle: f64,
        end_angle: f64,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError>;

    /// Draws a line segment.
    fn line(
        &self,
        img: &mut Mat<'_>,
        pt1: ffi::Point,
        pt2: ffi::Point,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError>;

    /// Draws a rectangle outline, or a filled rectangle for a negative thickness.
    fn rectangle(
        &self,
        img: &mut Mat<'_>,
        rect: ffi::Rect,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError>;

    /// Fills the area bounded by one or more polygons.
    fn fill_poly(
        &self,
        img: &mut Mat<'_>,
        contours: ffi::Contours,
        color: ffi::Scalar,
    ) -> Result<(), ImgprocError>;

    /// Draws one or more polygonal curves.
    fn polylines(
        &self,
        img: &mut Mat<'_>,
        contours: ffi::Contours,
        is_closed: bool,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError>;

    /// Measures a text string, returning its size and the baseline offset.
    fn get_text_size(
        &self,
        text: &CStr,
        font_face: i32,
        font_scale: f64,
        thickness: i32,
    ) -> Result<(ffi::Size, i32), ImgprocError>;

    /// Renders a text string.
    #[allow(clippy::too_many_arguments)]
    fn put_text(
        &self,
        img: &mut Mat<'_>,
        text: &CStr,
        org: ffi::Point,
        font_face: i32,
        font_scale: f64,
        color: ffi::Scalar,
        thickness: i32,
        line_type: i32,
        bottom_left_origin: bool,
    ) -> Result<(), ImgprocError>;

    /// Converts `src` from one color space to another.
    fn cvt_color(&self, src: &Mat<'_>, dst: &mut Mat<'_>, code: i32)
        -> Result<(), ImgprocError>;

    /// Resizes `src` to `size`, or by the `fx`/`fy` factors when `size` is empty.
    fn resize(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        size: ffi::Size,
        fx: f64,
        fy: f64,
        interpolation: i32,
    ) -> Result<(), ImgprocError>;

    /// Computes the perspective transform mapping four points onto four others.
    fn get_perspective_transform(
        &self,
        src: ffi::Points,
        dst: ffi::Points,
        out: &mut Mat<'_>,
    ) -> Result<(), ImgprocError>;

    /// Floating point variant of [`Backend::get_perspective_transform`].
    fn get_perspective_transform_2f(
        &self,
        src: ffi::Points2f,
        dst: ffi::Points2f,
        out: &mut Mat<'_>,
    ) -> Result<(), ImgprocError>;

    /// Estimates the translational shift between two images.
    fn phase_correlate(
        &self,
        src1: &Mat<'_>,
        src2: &Mat<'_>,
        window: &Mat<'_>,
    ) -> Result<(ffi::Point2f, f64), ImgprocError>;

    /// Estimates a new camera matrix for fisheye undistortion and rectification.
    #[allow(clippy::too_many_arguments)]
    fn estimate_new_camera_matrix_for_undistort_rectify(
        &self,
        k: &Mat<'_>,
        d: &Mat<'_>,
        img_size: ffi::Size,
        r: &Mat<'_>,
        p: &mut Mat<'_>,
        balance: f64,
        new_size: ffi::Size,
        fov_scale: f64,
    ) -> Result<(), ImgprocError>;

    /// Computes the optimal new camera matrix and its valid pixel region.
    #[allow(clippy::too_many_arguments)]
    fn get_optimal_new_camera_matrix_with_params(
        &self,
        camera_matrix: &Mat<'_>,
        dist_coeffs: &Mat<'_>,
        image_size: ffi::Size,
        alpha: f64,
        new_img_size: ffi::Size,
        center_principal_point: bool,
        out: &mut Mat<'_>,
    ) -> Result<ffi::Rect, ImgprocError>;

    /// Undistorts points observed through a fisheye lens.
    fn fisheye_undistort_points(
        &self,
        distorted: &Mat<'_>,
        undistorted: &mut Mat<'_>,
        k: &Mat<'_>,
        d: &Mat<'_>,
        r: &Mat<'_>,
        p: &Mat<'_>,
    ) -> Result<(), ImgprocError>;

    /// Removes lens distortion from an image.
    fn undistort(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        camera_matrix: &Mat<'_>,
        dist_coeffs: &Mat<'_>,
        new_camera_matrix: &Mat<'_>,
    ) -> Result<(), ImgprocError>;

    /// Removes lens distortion from a set of points.
    fn undistort_points(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        camera_matrix: &Mat<'_>,
        dist_coeffs: &Mat<'_>,
        r: &Mat<'_>,
        new_camera_matrix: &Mat<'_>,
    ) -> Result<(), ImgprocError>;

    /// Removes fisheye distortion from an image.
    fn fisheye_undistort_image_with_params(
        &self,
        distorted: &Mat<'_>,
        undistorted: &mut Mat<'_>,
        k: &Mat<'_>,
        d: &Mat<'_>,
        knew: &Mat<'_>,
        size: ffi::Size,
    ) -> Result<(), ImgprocError>;
}
