//! Backend calling the native vision library through its C entry points.
//!
//! The entry points are declared here and resolved at link time; the consumer
//! links the native library (for example with `cargo:rustc-link-lib` in its
//! build script). Every call returns a status code, 0 meaning success.
//!
//! Inputs go out as [`ffi::MatView`] descriptors. Operations that produce a new
//! mat fill an [`ffi::MatBuffer`] allocated by the library; its bytes are copied
//! into the caller's output mat and the buffer is handed back to
//! `cvmat_buffer_release`.

use std::ffi::{c_char, c_double, c_int, CStr};

use cvmat_core::{ffi, Mat};

use crate::{backend::Backend, error::ImgprocError};

extern "C" {
    fn cvmat_buffer_release(buffer: *mut ffi::MatBuffer);

    // --- core ---

    fn cvmat_perspective_transform(
        src: ffi::MatView,
        dst: *mut ffi::MatBuffer,
        transform: ffi::MatView,
    ) -> c_int;

    // --- imgproc ---

    fn cvmat_gaussian_blur(
        src: ffi::MatView,
        dst: *mut ffi::MatBuffer,
        ksize: ffi::Size,
        sigma_x: c_double,
        sigma_y: c_double,
        border_type: c_int,
    ) -> c_int;

    fn cvmat_arrowed_line(
        img: ffi::MatView,
        pt1: ffi::Point,
        pt2: ffi::Point,
        color: ffi::Scalar,
        thickness: c_int,
    ) -> c_int;

    fn cvmat_circle(
        img: ffi::MatView,
        center: ffi::Point,
        radius: c_int,
        color: ffi::Scalar,
        thickness: c_int,
    ) -> c_int;

    fn cvmat_ellipse(
        img: ffi::MatView,
        center: ffi::Point,
        axes: ffi::Point,
        angle: c_double,
        start_angle: c_double,
        end_angle: c_double,
        color: ffi::Scalar,
        thickness: c_int,
    ) -> c_int;

    fn cvmat_line(
        img: ffi::MatView,
        pt1: ffi::Point,
        pt2: ffi::Point,
        color: ffi::Scalar,
        thickness: c_int,
    ) -> c_int;

    fn cvmat_rectangle(
        img: ffi::MatView,
        rect: ffi::Rect,
        color: ffi::Scalar,
        thickness: c_int,
    ) -> c_int;

    fn cvmat_fill_poly(img: ffi::MatView, contours: ffi::Contours, color: ffi::Scalar) -> c_int;

    fn cvmat_polylines(
        img: ffi::MatView,
        contours: ffi::Contours,
        is_closed: bool,
        color: ffi::Scalar,
        thickness: c_int,
    ) -> c_int;

    fn cvmat_get_text_size_with_baseline(
        text: *const c_char,
        font_face: c_int,
        font_scale: c_double,
        thickness: c_int,
        size: *mut ffi::Size,
        baseline: *mut c_int,
    ) -> c_int;

    fn cvmat_put_text_with_params(
        img: ffi::MatView,
        text: *const c_char,
        org: ffi::Point,
        font_face: c_int,
        font_scale: c_double,
        color: ffi::Scalar,
        thickness: c_int,
        line_type: c_int,
        bottom_left_origin: bool,
    ) -> c_int;

    fn cvmat_cvt_color(src: ffi::MatView, dst: *mut ffi::MatBuffer, code: c_int) -> c_int;

    fn cvmat_resize(
        src: ffi::MatView,
        dst: *mut ffi::MatBuffer,
        size: ffi::Size,
        fx: c_double,
        fy: c_double,
        interpolation: c_int,
    ) -> c_int;

    fn cvmat_get_perspective_transform(
        src: ffi::Points,
        dst: ffi::Points,
        out: *mut ffi::MatBuffer,
    ) -> c_int;

    fn cvmat_get_perspective_transform_2f(
        src: ffi::Points2f,
        dst: ffi::Points2f,
        out: *mut ffi::MatBuffer,
    ) -> c_int;

    fn cvmat_phase_correlate(
        src1: ffi::MatView,
        src2: ffi::MatView,
        window: ffi::MatView,
        shift: *mut ffi::Point2f,
        response: *mut c_double,
    ) -> c_int;

    // --- calib3d ---

    fn cvmat_fisheye_estimate_new_camera_matrix_for_undistort_rectify(
        k: ffi::MatView,
        d: ffi::MatView,
        img_size: ffi::Size,
        r: ffi::MatView,
        p: *mut ffi::MatBuffer,
        balance: c_double,
        new_size: ffi::Size,
        fov_scale: c_double,
    ) -> c_int;

    fn cvmat_get_optimal_new_camera_matrix_with_params(
        camera_matrix: ffi::MatView,
        dist_coeffs: ffi::MatView,
        image_size: ffi::Size,
        alpha: c_double,
        new_img_size: ffi::Size,
        valid_pix_roi: *mut ffi::Rect,
        center_principal_point: bool,
        out: *mut ffi::MatBuffer,
    ) -> c_int;

    fn cvmat_fisheye_undistort_points(
        distorted: ffi::MatView,
        undistorted: *mut ffi::MatBuffer,
        k: ffi::MatView,
        d: ffi::MatView,
        r: ffi::MatView,
        p: ffi::MatView,
    ) -> c_int;

    fn cvmat_undistort(
        src: ffi::MatView,
        dst: *mut ffi::MatBuffer,
        camera_matrix: ffi::MatView,
        dist_coeffs: ffi::MatView,
        new_camera_matrix: ffi::MatView,
    ) -> c_int;

    fn cvmat_undistort_points(
        src: ffi::MatView,
        dst: *mut ffi::MatBuffer,
        camera_matrix: ffi::MatView,
        dist_coeffs: ffi::MatView,
        rectification: ffi::MatView,
        new_camera_matrix: ffi::MatView,
    ) -> c_int;

    fn cvmat_fisheye_undistort_image_with_params(
        distorted: ffi::MatView,
        undistorted: *mut ffi::MatBuffer,
        k: ffi::MatView,
        d: ffi::MatView,
        knew: ffi::MatView,
        size: ffi::Size,
    ) -> c_int;
}

/// The native vision library, linked into the final binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeBackend;

fn check(operation: &str, status: c_int) -> Result<(), ImgprocError> {
    if status != 0 {
        return Err(ImgprocError::backend(
            operation,
            format!("native call returned status {status}"),
        ));
    }
    Ok(())
}

/// Runs a native call that allocates its result and copies it into `dst`.
///
/// The library buffer is released whatever the outcome.
fn with_output<F>(operation: &str, dst: &mut Mat<'_>, call: F) -> Result<(), ImgprocError>
where
    F: FnOnce(*mut ffi::MatBuffer) -> c_int,
{
    let mut buffer = ffi::MatBuffer::null();
    let status = call(&mut buffer);
    let result = check(operation, status).and_then(|_| {
        // SAFETY: on success the library filled `buffer` with a compact mat
        unsafe { dst.assign_from_raw(&buffer) }.map_err(ImgprocError::from)
    });
    if !buffer.data.data.is_null() {
        // SAFETY: `buffer` was allocated by the library and is released once
        unsafe { cvmat_buffer_release(&mut buffer) };
    }
    result
}

impl Backend for NativeBackend {
    fn perspective_transform(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        transform: &Mat<'_>,
    ) -> Result<(), ImgprocError> {
        let (src, transform) = (src.as_raw()?, transform.as_raw()?);
        with_output("perspective_transform", dst, |out| unsafe {
            cvmat_perspective_transform(src, out, transform)
        })
    }

    fn gaussian_blur(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        ksize: ffi::Size,
        sigma_x: f64,
        sigma_y: f64,
        border_type: i32,
    ) -> Result<(), ImgprocError> {
        let src = src.as_raw()?;
        with_output("gaussian_blur", dst, |out| unsafe {
            cvmat_gaussian_blur(src, out, ksize, sigma_x, sigma_y, border_type)
        })
    }

    fn arrowed_line(
        &self,
        img: &mut Mat<'_>,
        pt1: ffi::Point,
        pt2: ffi::Point,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError> {
        let img = img.as_raw_mut()?;
        let status = unsafe { cvmat_arrowed_line(img, pt1, pt2, color, thickness) };
        check("arrowed_line", status)
    }

    fn circle(
        &self,
        img: &mut Mat<'_>,
        center: ffi::Point,
        radius: i32,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError> {
        let img = img.as_raw_mut()?;
        let status = unsafe { cvmat_circle(img, center, radius, color, thickness) };
        check("circle", status)
    }

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
    ) -> Result<(), ImgprocError> {
        let status = unsafe {
            cvmat_ellipse(
                img.as_raw_mut()?,
                center,
                axes,
                angle,
                start_angle,
                end_angle,
                color,
                thickness,
            )
        };
        check("ellipse", status)
    }

    fn line(
        &self,
        img: &mut Mat<'_>,
        pt1: ffi::Point,
        pt2: ffi::Point,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError> {
        let img = img.as_raw_mut()?;
        let status = unsafe { cvmat_line(img, pt1, pt2, color, thickness) };
        check("line", status)
    }

    fn rectangle(
        &self,
        img: &mut Mat<'_>,
        rect: ffi::Rect,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError> {
        let img = img.as_raw_mut()?;
        let status = unsafe { cvmat_rectangle(img, rect, color, thickness) };
        check("rectangle", status)
    }

    fn fill_poly(
        &self,
        img: &mut Mat<'_>,
        contours: ffi::Contours,
        color: ffi::Scalar,
    ) -> Result<(), ImgprocError> {
        let img = img.as_raw_mut()?;
        let status = unsafe { cvmat_fill_poly(img, contours, color) };
        check("fill_poly", status)
    }

    fn polylines(
        &self,
        img: &mut Mat<'_>,
        contours: ffi::Contours,
        is_closed: bool,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError> {
        let status =
            unsafe { cvmat_polylines(img.as_raw_mut()?, contours, is_closed, color, thickness) };
        check("polylines", status)
    }

    fn get_text_size(
        &self,
        text: &CStr,
        font_face: i32,
        font_scale: f64,
        thickness: i32,
    ) -> Result<(ffi::Size, i32), ImgprocError> {
        let mut size = ffi::Size::default();
        let mut baseline: c_int = 0;
        let status = unsafe {
            cvmat_get_text_size_with_baseline(
                text.as_ptr(),
                font_face,
                font_scale,
                thickness,
                &mut size,
                &mut baseline,
            )
        };
        check("get_text_size", status)?;
        Ok((size, baseline))
    }

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
    ) -> Result<(), ImgprocError> {
        let status = unsafe {
            cvmat_put_text_with_params(
                img.as_raw_mut()?,
                text.as_ptr(),
                org,
                font_face,
                font_scale,
                color,
                thickness,
                line_type,
                bottom_left_origin,
            )
        };
        check("put_text", status)
    }

    fn cvt_color(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        code: i32,
    ) -> Result<(), ImgprocError> {
        let src = src.as_raw()?;
        with_output("cvt_color", dst, |out| unsafe {
            cvmat_cvt_color(src, out, code)
        })
    }

    fn resize(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        size: ffi::Size,
        fx: f64,
        fy: f64,
        interpolation: i32,
    ) -> Result<(), ImgprocError> {
        let src = src.as_raw()?;
        with_output("resize", dst, |out| unsafe {
            cvmat_resize(src, out, size, fx, fy, interpolation)
        })
    }

    fn get_perspective_transform(
        &self,
        src: ffi::Points,
        dst: ffi::Points,
        out: &mut Mat<'_>,
    ) -> Result<(), ImgprocError> {
        with_output("get_perspective_transform", out, |buffer| unsafe {
            cvmat_get_perspective_transform(src, dst, buffer)
        })
    }

    fn get_perspective_transform_2f(
        &self,
        src: ffi::Points2f,
        dst: ffi::Points2f,
        out: &mut Mat<'_>,
    ) -> Result<(), ImgprocError> {
        with_output("get_perspective_transform_2f", out, |buffer| unsafe {
            cvmat_get_perspective_transform_2f(src, dst, buffer)
        })
    }

    fn phase_correlate(
        &self,
        src1: &Mat<'_>,
        src2: &Mat<'_>,
        window: &Mat<'_>,
    ) -> Result<(ffi::Point2f, f64), ImgprocError> {
        let mut shift = ffi::Point2f::default();
        let mut response: c_double = 0.0;
        let status = unsafe {
            cvmat_phase_correlate(
                src1.as_raw()?,
                src2.as_raw()?,
                window.as_raw()?,
                &mut shift,
                &mut response,
            )
        };
        check("phase_correlate", status)?;
        Ok((shift, response))
    }

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
    ) -> Result<(), ImgprocError> {
        let (k, d, r) = (k.as_raw()?, d.as_raw()?, r.as_raw()?);
        with_output(
            "estimate_new_camera_matrix_for_undistort_rectify",
            p,
            |out| unsafe {
                cvmat_fisheye_estimate_new_camera_matrix_for_undistort_rectify(
                    k, d, img_size, r, out, balance, new_size, fov_scale,
                )
            },
        )
    }

    fn get_optimal_new_camera_matrix_with_params(
        &self,
        camera_matrix: &Mat<'_>,
        dist_coeffs: &Mat<'_>,
        image_size: ffi::Size,
        alpha: f64,
        new_img_size: ffi::Size,
        center_principal_point: bool,
        out: &mut Mat<'_>,
    ) -> Result<ffi::Rect, ImgprocError> {
        let (camera_matrix, dist_coeffs) = (camera_matrix.as_raw()?, dist_coeffs.as_raw()?);
        let mut roi = ffi::Rect::default();
        with_output("get_optimal_new_camera_matrix_with_params", out, |buffer| unsafe {
            cvmat_get_optimal_new_camera_matrix_with_params(
                camera_matrix,
                dist_coeffs,
                image_size,
                alpha,
                new_img_size,
                &mut roi,
                center_principal_point,
                buffer,
            )
        })?;
        Ok(roi)
    }

    fn fisheye_undistort_points(
        &self,
        distorted: &Mat<'_>,
        undistorted: &mut Mat<'_>,
        k: &Mat<'_>,
        d: &Mat<'_>,
        r: &Mat<'_>,
        p: &Mat<'_>,
    ) -> Result<(), ImgprocError> {
        let (distorted, k, d, r, p) = (
            distorted.as_raw()?,
            k.as_raw()?,
            d.as_raw()?,
            r.as_raw()?,
            p.as_raw()?,
        );
        with_output("fisheye_undistort_points", undistorted, |out| unsafe {
            cvmat_fisheye_undistort_points(distorted, out, k, d, r, p)
        })
    }

    fn undistort(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        camera_matrix: &Mat<'_>,
        dist_coeffs: &Mat<'_>,
        new_camera_matrix: &Mat<'_>,
    ) -> Result<(), ImgprocError> {
        let (src, camera_matrix, dist_coeffs, new_camera_matrix) = (
            src.as_raw()?,
            camera_matrix.as_raw()?,
            dist_coeffs.as_raw()?,
            new_camera_matrix.as_raw()?,
        );
        with_output("undistort", dst, |out| unsafe {
            cvmat_undistort(src, out, camera_matrix, dist_coeffs, new_camera_matrix)
        })
    }

    fn undistort_points(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        camera_matrix: &Mat<'_>,
        dist_coeffs: &Mat<'_>,
        rectification: &Mat<'_>,
        new_camera_matrix: &Mat<'_>,
    ) -> Result<(), ImgprocError> {
        let (src, camera_matrix, dist_coeffs, rectification, new_camera_matrix) = (
            src.as_raw()?,
            camera_matrix.as_raw()?,
            dist_coeffs.as_raw()?,
            rectification.as_raw()?,
            new_camera_matrix.as_raw()?,
        );
        with_output("undistort_points", dst, |out| unsafe {
            cvmat_undistort_points(
                src,
                out,
                camera_matrix,
                dist_coeffs,
                rectification,
                new_camera_matrix,
            )
        })
    }

    fn fisheye_undistort_image_with_params(
        &self,
        distorted: &Mat<'_>,
        undistorted: &mut Mat<'_>,
        k: &Mat<'_>,
        d: &Mat<'_>,
        knew: &Mat<'_>,
        size: ffi::Size,
    ) -> Result<(), ImgprocError> {
        let (distorted, k, d, knew) = (distorted.as_raw()?, k.as_raw()?, d.as_raw()?, knew.as_raw()?);
        with_output("fisheye_undistort_image_with_params", undistorted, |out| unsafe {
            cvmat_fisheye_undistort_image_with_params(distorted, out, k, d, knew, size)
        })
    }
}
