use cvmat_core::{ffi, Mat, Rectangle, Size};

use crate::{backend::Backend, error::ImgprocError};

/// Estimate a new camera matrix for fisheye undistortion or rectification.
///
/// # Arguments
///
/// * `backend` - The native library backend.
/// * `k` - The 3x3 camera intrinsic matrix.
/// * `d` - The 4 fisheye distortion coefficients.
/// * `img_size` - The size of the distorted image.
/// * `r` - The rectification transform, or an empty mat for the identity.
/// * `p` - The output new camera matrix.
/// * `balance` - Weight between the minimum (0) and maximum (1) focal length.
/// * `new_size` - The size of the undistorted image.
/// * `fov_scale` - Divisor of the new focal length.
#[allow(clippy::too_many_arguments)]
pub fn estimate_new_camera_matrix_for_undistort_rectify<B: Backend + ?Sized>(
    backend: &B,
    k: &Mat<'_>,
    d: &Mat<'_>,
    img_size: Size,
    r: &Mat<'_>,
    p: &mut Mat<'_>,
    balance: f64,
    new_size: Size,
    fov_scale: f64,
) -> Result<(), ImgprocError> {
    log::debug!(
        "estimate_new_camera_matrix_for_undistort_rectify: {img_size} -> {new_size}, balance {balance}"
    );
    backend.estimate_new_camera_matrix_for_undistort_rectify(
        k,
        d,
        img_size.into(),
        r,
        p,
        balance,
        new_size.into(),
        fov_scale,
    )
}

/// Compute the optimal new camera matrix for a free scaling parameter.
///
/// # Arguments
///
/// * `camera_matrix` - The 3x3 camera intrinsic matrix.
/// * `dist_coeffs` - The distortion coefficients.
/// * `image_size` - The size of the original image.
/// * `alpha` - Free scaling parameter between 0 (only valid pixels) and 1
///   (all source pixels retained).
/// * `new_img_size` - The size of the rectified image.
/// * `center_principal_point` - Whether the principal point is forced to the
///   image center.
///
/// # Returns
///
/// The new camera matrix, owned by the caller, and the rectangle of valid
/// pixels in the undistorted image.
pub fn get_optimal_new_camera_matrix_with_params<B: Backend + ?Sized>(
    backend: &B,
    camera_matrix: &Mat<'_>,
    dist_coeffs: &Mat<'_>,
    image_size: Size,
    alpha: f64,
    new_img_size: Size,
    center_principal_point: bool,
) -> Result<(Mat<'static>, Rectangle), ImgprocError> {
    log::debug!(
        "get_optimal_new_camera_matrix_with_params: {image_size} -> {new_img_size}, alpha {alpha}"
    );
    let mut out = Mat::new();
    let roi: ffi::Rect = backend.get_optimal_new_camera_matrix_with_params(
        camera_matrix,
        dist_coeffs,
        image_size.into(),
        alpha,
        new_img_size.into(),
        center_principal_point,
        &mut out,
    )?;
    Ok((out, roi.into()))
}

/// Undistort 2D points observed through a fisheye lens.
///
/// # Arguments
///
/// * `distorted` - The distorted points, a 2 channel floating point mat.
/// * `undistorted` - The output points.
/// * `k` - The 3x3 camera intrinsic matrix.
/// * `d` - The 4 fisheye distortion coefficients.
/// * `r` - The rectification transform, or an empty mat.
/// * `p` - The new camera matrix, or an empty mat for normalized coordinates.
pub fn fisheye_undistort_points<B: Backend + ?Sized>(
    backend: &B,
    distorted: &Mat<'_>,
    undistorted: &mut Mat<'_>,
    k: &Mat<'_>,
    d: &Mat<'_>,
    r: &Mat<'_>,
    p: &Mat<'_>,
) -> Result<(), ImgprocError> {
    log::debug!("fisheye_undistort_points: {} points", distorted.total());
    backend.fisheye_undistort_points(distorted, undistorted, k, d, r, p)
}

/// Transform an image to compensate for lens distortion.
pub fn undistort<B: Backend + ?Sized>(
    backend: &B,
    src: &Mat<'_>,
    dst: &mut Mat<'_>,
    camera_matrix: &Mat<'_>,
    dist_coeffs: &Mat<'_>,
    new_camera_matrix: &Mat<'_>,
) -> Result<(), ImgprocError> {
    log::debug!("undistort: {}x{}", src.cols(), src.rows());
    backend.undistort(src, dst, camera_matrix, dist_coeffs, new_camera_matrix)
}

/// Compute the ideal point coordinates from observed, distorted ones.
///
/// # Arguments
///
/// * `src` - The observed points, a 2 channel floating point mat.
/// * `dst` - The output points.
/// * `camera_matrix` - The 3x3 camera intrinsic matrix.
/// * `dist_coeffs` - The distortion coefficients.
/// * `rectification` - The rectification transform, or an empty mat.
/// * `new_camera_matrix` - The new camera matrix, or an empty mat for
///   normalized coordinates.
pub fn undistort_points<B: Backend + ?Sized>(
    backend: &B,
    src: &Mat<'_>,
    dst: &mut Mat<'_>,
    camera_matrix: &Mat<'_>,
    dist_coeffs: &Mat<'_>,
    rectification: &Mat<'_>,
    new_camera_matrix: &Mat<'_>,
) -> Result<(), ImgprocError> {
    log::debug!("undistort_points: {} points", src.total());
    backend.undistort_points(
        src,
        dst,
        camera_matrix,
        dist_coeffs,
        rectification,
        new_camera_matrix,
    )
}

/// Transform an image to compensate for fisheye lens distortion.
///
/// # Arguments
///
/// * `distorted` - The distorted image.
/// * `undistorted` - The output image.
/// * `k` - The 3x3 camera intrinsic matrix.
/// * `d` - The 4 fisheye distortion coefficients.
/// * `knew` - The camera matrix of the undistorted image.
/// * `size` - The size of the undistorted image.
pub fn fisheye_undistort_image_with_params<B: Backend + ?Sized>(
    backend: &B,
    distorted: &Mat<'_>,
    undistorted: &mut Mat<'_>,
    k: &Mat<'_>,
    d: &Mat<'_>,
    knew: &Mat<'_>,
    size: Size,
) -> Result<(), ImgprocError> {
    log::debug!(
        "fisheye_undistort_image_with_params: {}x{} -> {size}",
        distorted.cols(),
        distorted.rows()
    );
    backend.fisheye_undistort_image_with_params(distorted, undistorted, k, d, knew, size.into())
}
