use std::ffi::CStr;
use std::sync::Mutex;

use cvmat_core::{ffi, Mat, MatType, Point, Point2f, Point2fVector, PointVector, PointsVector};
use cvmat_core::{Rectangle, Rgba, Size};
use cvmat_imgproc::{
    backend::Backend,
    calibration, color,
    color::ColorConversionCode,
    draw,
    draw::{HersheyFont, LineType, TextParams},
    error::ImgprocError,
    filter,
    filter::BorderType,
    registration, resize,
    resize::InterpolationFlags,
    warp,
};

/// A native call as the backend saw it.
#[derive(Debug, PartialEq)]
enum Call {
    PerspectiveTransform,
    GaussianBlur(ffi::Size, f64, f64, i32),
    ArrowedLine(ffi::Point, ffi::Point, ffi::Scalar, i32),
    Circle(ffi::Point, i32, ffi::Scalar, i32),
    Ellipse(ffi::Point, ffi::Point, f64, f64, f64),
    Line(ffi::Point, ffi::Point, ffi::Scalar, i32),
    Rectangle(ffi::Rect, ffi::Scalar, i32),
    FillPoly(Vec<Vec<ffi::Point>>, ffi::Scalar),
    Polylines(Vec<Vec<ffi::Point>>, bool),
    GetTextSize(String, i32),
    PutText(String, ffi::Point, i32, i32, bool),
    CvtColor(i32),
    Resize(ffi::Size, f64, f64, i32),
    GetPerspectiveTransform(Vec<ffi::Point>, Vec<ffi::Point>),
    GetPerspectiveTransform2f(usize, usize),
    PhaseCorrelate(bool),
    EstimateNewCameraMatrix(ffi::Size, ffi::Size, f64),
    GetOptimalNewCameraMatrix(ffi::Size, f64, bool),
    FisheyeUndistortPoints,
    Undistort,
    UndistortPoints,
    FisheyeUndistortImage(ffi::Size),
}

/// Records every call and produces deterministic outputs.
#[derive(Default)]
struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
}

impl RecordingBackend {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

fn read_points(points: ffi::Points) -> Vec<ffi::Point> {
    if points.length == 0 {
        return Vec::new();
    }
    unsafe { std::slice::from_raw_parts(points.points, points.length as usize) }.to_vec()
}

fn read_contours(contours: ffi::Contours) -> Vec<Vec<ffi::Point>> {
    let inner = unsafe { std::slice::from_raw_parts(contours.contours, contours.length as usize) };
    inner.iter().map(|p| read_points(*p)).collect()
}

fn identity(out: &mut Mat<'_>) -> Result<(), ImgprocError> {
    out.create(3, 3, MatType::CV_64FC1)?;
    for i in 0..3 {
        out.set_double_at(i, i, 1.0)?;
    }
    Ok(())
}

impl Backend for RecordingBackend {
    fn perspective_transform(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        _transform: &Mat<'_>,
    ) -> Result<(), ImgprocError> {
        self.record(Call::PerspectiveTransform);
        src.copy_to(dst)?;
        Ok(())
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
        self.record(Call::GaussianBlur(ksize, sigma_x, sigma_y, border_type));
        src.copy_to(dst)?;
        Ok(())
    }

    fn arrowed_line(
        &self,
        _img: &mut Mat<'_>,
        pt1: ffi::Point,
        pt2: ffi::Point,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError> {
        self.record(Call::ArrowedLine(pt1, pt2, color, thickness));
        Ok(())
    }

    fn circle(
        &self,
        img: &mut Mat<'_>,
        center: ffi::Point,
        radius: i32,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError> {
        self.record(Call::Circle(center, radius, color, thickness));
        img.set_uchar_at(center.y as usize, center.x as usize, color.val1 as u8)?;
        Ok(())
    }

    fn ellipse(
        &self,
        _img: &mut Mat<'_>,
        center: ffi::Point,
        axes: ffi::Point,
        angle: f64,
        start_angle: f64,
        end_angle: f64,
        _color: ffi::Scalar,
        _thickness: i32,
    ) -> Result<(), ImgprocError> {
        self.record(Call::Ellipse(center, axes, angle, start_angle, end_angle));
        Ok(())
    }

    fn line(
        &self,
        _img: &mut Mat<'_>,
        pt1: ffi::Point,
        pt2: ffi::Point,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError> {
        self.record(Call::Line(pt1, pt2, color, thickness));
        Ok(())
    }

    fn rectangle(
        &self,
        _img: &mut Mat<'_>,
        rect: ffi::Rect,
        color: ffi::Scalar,
        thickness: i32,
    ) -> Result<(), ImgprocError> {
        self.record(Call::Rectangle(rect, color, thickness));
        Ok(())
    }

    fn fill_poly(
        &self,
        _img: &mut Mat<'_>,
        contours: ffi::Contours,
        color: ffi::Scalar,
    ) -> Result<(), ImgprocError> {
        self.record(Call::FillPoly(read_contours(contours), color));
        Ok(())
    }

    fn polylines(
        &self,
        _img: &mut Mat<'_>,
        contours: ffi::Contours,
        is_closed: bool,
        _color: ffi::Scalar,
        _thickness: i32,
    ) -> Result<(), ImgprocError> {
        self.record(Call::Polylines(read_contours(contours), is_closed));
        Ok(())
    }

    fn get_text_size(
        &self,
        text: &CStr,
        font_face: i32,
        font_scale: f64,
        thickness: i32,
    ) -> Result<(ffi::Size, i32), ImgprocError> {
        let text = text.to_string_lossy().into_owned();
        let width = (text.len() as f64 * 10.0 * font_scale) as i32;
        self.record(Call::GetTextSize(text, font_face));
        Ok((
            ffi::Size {
                width,
                height: 12,
            },
            thickness + 2,
        ))
    }

    fn put_text(
        &self,
        _img: &mut Mat<'_>,
        text: &CStr,
        org: ffi::Point,
        font_face: i32,
        _font_scale: f64,
        _color: ffi::Scalar,
        _thickness: i32,
        line_type: i32,
        bottom_left_origin: bool,
    ) -> Result<(), ImgprocError> {
        self.record(Call::PutText(
            text.to_string_lossy().into_owned(),
            org,
            font_face,
            line_type,
            bottom_left_origin,
        ));
        Ok(())
    }

    fn cvt_color(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        code: i32,
    ) -> Result<(), ImgprocError> {
        self.record(Call::CvtColor(code));
        dst.create(src.rows(), src.cols(), MatType::CV_8UC1)?;
        Ok(())
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
        self.record(Call::Resize(size, fx, fy, interpolation));
        dst.create(size.height as usize, size.width as usize, src.mat_type())?;
        Ok(())
    }

    fn get_perspective_transform(
        &self,
        src: ffi::Points,
        dst: ffi::Points,
        out: &mut Mat<'_>,
    ) -> Result<(), ImgprocError> {
        self.record(Call::GetPerspectiveTransform(
            read_points(src),
            read_points(dst),
        ));
        identity(out)
    }

    fn get_perspective_transform_2f(
        &self,
        src: ffi::Points2f,
        dst: ffi::Points2f,
        out: &mut Mat<'_>,
    ) -> Result<(), ImgprocError> {
        self.record(Call::GetPerspectiveTransform2f(
            src.length as usize,
            dst.length as usize,
        ));
        identity(out)
    }

    fn phase_correlate(
        &self,
        _src1: &Mat<'_>,
        _src2: &Mat<'_>,
        window: &Mat<'_>,
    ) -> Result<(ffi::Point2f, f64), ImgprocError> {
        self.record(Call::PhaseCorrelate(window.empty()));
        Ok((ffi::Point2f { x: 1.5, y: -2.25 }, 0.75))
    }

    fn estimate_new_camera_matrix_for_undistort_rectify(
        &self,
        k: &Mat<'_>,
        _d: &Mat<'_>,
        img_size: ffi::Size,
        _r: &Mat<'_>,
        p: &mut Mat<'_>,
        balance: f64,
        new_size: ffi::Size,
        _fov_scale: f64,
    ) -> Result<(), ImgprocError> {
        self.record(Call::EstimateNewCameraMatrix(img_size, new_size, balance));
        k.copy_to(p)?;
        Ok(())
    }

    fn get_optimal_new_camera_matrix_with_params(
        &self,
        camera_matrix: &Mat<'_>,
        _dist_coeffs: &Mat<'_>,
        image_size: ffi::Size,
        alpha: f64,
        _new_img_size: ffi::Size,
        center_principal_point: bool,
        out: &mut Mat<'_>,
    ) -> Result<ffi::Rect, ImgprocError> {
        self.record(Call::GetOptimalNewCameraMatrix(
            image_size,
            alpha,
            center_principal_point,
        ));
        camera_matrix.copy_to(out)?;
        Ok(ffi::Rect {
            x: 4,
            y: 3,
            width: image_size.width - 8,
            height: image_size.height - 6,
        })
    }

    fn fisheye_undistort_points(
        &self,
        distorted: &Mat<'_>,
        undistorted: &mut Mat<'_>,
        _k: &Mat<'_>,
        _d: &Mat<'_>,
        _r: &Mat<'_>,
        _p: &Mat<'_>,
    ) -> Result<(), ImgprocError> {
        self.record(Call::FisheyeUndistortPoints);
        distorted.copy_to(undistorted)?;
        Ok(())
    }

    fn undistort(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        _camera_matrix: &Mat<'_>,
        _dist_coeffs: &Mat<'_>,
        _new_camera_matrix: &Mat<'_>,
    ) -> Result<(), ImgprocError> {
        self.record(Call::Undistort);
        src.copy_to(dst)?;
        Ok(())
    }

    fn undistort_points(
        &self,
        src: &Mat<'_>,
        dst: &mut Mat<'_>,
        _camera_matrix: &Mat<'_>,
        _dist_coeffs: &Mat<'_>,
        _rectification: &Mat<'_>,
        _new_camera_matrix: &Mat<'_>,
    ) -> Result<(), ImgprocError> {
        self.record(Call::UndistortPoints);
        src.copy_to(dst)?;
        Ok(())
    }

    fn fisheye_undistort_image_with_params(
        &self,
        distorted: &Mat<'_>,
        undistorted: &mut Mat<'_>,
        _k: &Mat<'_>,
        _d: &Mat<'_>,
        _knew: &Mat<'_>,
        size: ffi::Size,
    ) -> Result<(), ImgprocError> {
        self.record(Call::FisheyeUndistortImage(size));
        undistorted.create(
            size.height as usize,
            size.width as usize,
            distorted.mat_type(),
        )?;
        Ok(())
    }
}

fn camera_matrix() -> Result<Mat<'static>, ImgprocError> {
    Ok(Mat::from_slice::<f64>(
        3,
        3,
        1,
        &[500.0, 0.0, 320.0, 0.0, 500.0, 240.0, 0.0, 0.0, 1.0],
    )?)
}

fn bgr_scalar(b: f64, g: f64, r: f64, a: f64) -> ffi::Scalar {
    ffi::Scalar {
        val1: b,
        val2: g,
        val3: r,
        val4: a,
    }
}

#[test]
fn test_gaussian_blur() -> Result<(), ImgprocError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let backend = RecordingBackend::default();
    let src = Mat::from_vec(2, 2, MatType::CV_8UC1, vec![1, 2, 3, 4])?;
    let mut dst = Mat::new();
    filter::gaussian_blur(
        &backend,
        &src,
        &mut dst,
        Size::new(23, 23),
        30.0,
        50.0,
        BorderType::Reflect101,
    )?;
    assert_eq!(
        backend.calls(),
        vec![Call::GaussianBlur(
            ffi::Size {
                width: 23,
                height: 23
            },
            30.0,
            50.0,
            4
        )]
    );
    assert_eq!(dst.to_bytes(), vec![1, 2, 3, 4]);
    Ok(())
}

#[test]
fn test_draw_color_is_bgr() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let mut img = Mat::new_with_size(10, 10, MatType::CV_8UC1)?;
    let color = Rgba::new(10, 20, 30, 40);

    draw::line(&backend, &mut img, Point::new(1, 2), Point::new(8, 9), color, 2)?;
    draw::arrowed_line(&backend, &mut img, Point::new(0, 0), Point::new(5, 5), color, 1)?;
    draw::circle(&backend, &mut img, Point::new(4, 3), 2, color, -1)?;

    let bgra = bgr_scalar(30.0, 20.0, 10.0, 40.0);
    assert_eq!(
        backend.calls(),
        vec![
            Call::Line(ffi::Point { x: 1, y: 2 }, ffi::Point { x: 8, y: 9 }, bgra, 2),
            Call::ArrowedLine(ffi::Point { x: 0, y: 0 }, ffi::Point { x: 5, y: 5 }, bgra, 1),
            Call::Circle(ffi::Point { x: 4, y: 3 }, 2, bgra, -1),
        ]
    );
    // the recording circle writes the blue component at its center
    assert_eq!(img.get_uchar_at(3, 4)?, 30);
    Ok(())
}

#[test]
fn test_rectangle_is_origin_and_size() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let mut img = Mat::new_with_size(100, 100, MatType::CV_8UC3)?;
    draw::rectangle(
        &backend,
        &mut img,
        Rectangle::new(50, 60, 10, 20),
        Rgba::new(255, 0, 0, 0),
        1,
    )?;
    assert_eq!(
        backend.calls(),
        vec![Call::Rectangle(
            ffi::Rect {
                x: 10,
                y: 20,
                width: 40,
                height: 40
            },
            bgr_scalar(0.0, 0.0, 255.0, 0.0),
            1
        )]
    );
    Ok(())
}

#[test]
fn test_rectangle_extreme_corners() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let mut img = Mat::new_with_size(4, 4, MatType::CV_8UC1)?;
    draw::rectangle(
        &backend,
        &mut img,
        Rectangle::new(-1, 0, i32::MAX, 2),
        Rgba::default(),
        1,
    )?;
    assert_eq!(
        backend.calls(),
        vec![Call::Rectangle(
            ffi::Rect {
                x: -1,
                y: 0,
                width: i32::MAX,
                height: 2
            },
            ffi::Scalar::default(),
            1
        )]
    );
    Ok(())
}

#[test]
fn test_ellipse() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let mut img = Mat::new_with_size(100, 100, MatType::CV_8UC1)?;
    draw::ellipse(
        &backend,
        &mut img,
        Point::new(50, 50),
        Point::new(25, 25),
        30.0,
        0.0,
        360.0,
        Rgba::default(),
        1,
    )?;
    assert_eq!(
        backend.calls(),
        vec![Call::Ellipse(
            ffi::Point { x: 50, y: 50 },
            ffi::Point { x: 25, y: 25 },
            30.0,
            0.0,
            360.0
        )]
    );
    Ok(())
}

#[test]
fn test_fill_poly_and_polylines() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let mut img = Mat::new_with_size(100, 100, MatType::CV_8UC1)?;
    let pts = PointsVector::from_points(&[
        vec![Point::new(10, 10), Point::new(10, 20), Point::new(20, 20)],
        vec![Point::new(1, 1)],
    ]);

    draw::fill_poly(&backend, &mut img, &pts, Rgba::new(0, 0, 255, 0))?;
    draw::polylines(&backend, &mut img, &pts, true, Rgba::default(), 1)?;

    let expected = vec![
        vec![
            ffi::Point { x: 10, y: 10 },
            ffi::Point { x: 10, y: 20 },
            ffi::Point { x: 20, y: 20 },
        ],
        vec![ffi::Point { x: 1, y: 1 }],
    ];
    assert_eq!(
        backend.calls(),
        vec![
            Call::FillPoly(expected.clone(), bgr_scalar(255.0, 0.0, 0.0, 0.0)),
            Call::Polylines(expected, true),
        ]
    );
    Ok(())
}

#[test]
fn test_fill_poly_empty_contours() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let mut img = Mat::new_with_size(4, 4, MatType::CV_8UC1)?;
    draw::fill_poly(&backend, &mut img, &PointsVector::new(), Rgba::default())?;
    assert_eq!(
        backend.calls(),
        vec![Call::FillPoly(vec![], ffi::Scalar::default())]
    );
    Ok(())
}

#[test]
fn test_get_text_size() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let size = draw::get_text_size(&backend, "test", HersheyFont::SIMPLEX, 1.5, 1)?;
    assert_eq!(size, Size::new(60, 12));

    let (size, baseline) = draw::get_text_size_with_baseline(
        &backend,
        "go",
        HersheyFont::COMPLEX | HersheyFont::ITALIC,
        1.0,
        3,
    )?;
    assert_eq!(size, Size::new(20, 12));
    assert_eq!(baseline, 5);

    assert_eq!(
        backend.calls(),
        vec![
            Call::GetTextSize("test".to_string(), 0),
            Call::GetTextSize("go".to_string(), 19),
        ]
    );
    Ok(())
}

#[test]
fn test_put_text() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let mut img = Mat::new_with_size(150, 150, MatType::CV_8UC1)?;

    draw::put_text(
        &backend,
        &mut img,
        "Testing",
        Point::new(10, 10),
        HersheyFont::PLAIN,
        1.2,
        Rgba::new(255, 255, 255, 0),
        2,
    )?;

    let params = TextParams {
        font: HersheyFont::DUPLEX,
        line_type: LineType::LineAA,
        bottom_left_origin: true,
        ..Default::default()
    };
    draw::put_text_with_params(&backend, &mut img, "Params", Point::new(5, 6), &params)?;

    assert_eq!(
        backend.calls(),
        vec![
            Call::PutText("Testing".to_string(), ffi::Point { x: 10, y: 10 }, 1, 8, false),
            Call::PutText("Params".to_string(), ffi::Point { x: 5, y: 6 }, 2, 16, true),
        ]
    );
    Ok(())
}

#[test]
fn test_text_with_nul_is_rejected() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let mut img = Mat::new_with_size(10, 10, MatType::CV_8UC1)?;
    let res = draw::put_text(
        &backend,
        &mut img,
        "ab\0c",
        Point::new(0, 0),
        HersheyFont::SIMPLEX,
        1.0,
        Rgba::default(),
        1,
    );
    assert_eq!(res, Err(ImgprocError::InvalidText(2)));
    assert!(draw::get_text_size(&backend, "\0", HersheyFont::SIMPLEX, 1.0, 1).is_err());
    assert!(backend.calls().is_empty());
    Ok(())
}

#[test]
fn test_cvt_color() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let src = Mat::new_with_size(20, 30, MatType::CV_8UC3)?;
    let mut dst = Mat::new();
    color::cvt_color(&backend, &src, &mut dst, ColorConversionCode::BgrToGray)?;
    assert_eq!(backend.calls(), vec![Call::CvtColor(6)]);
    assert_eq!(dst.rows(), 20);
    assert_eq!(dst.cols(), 30);
    assert_eq!(dst.channels(), 1);
    Ok(())
}

#[test]
fn test_resize() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let src = Mat::new_with_size(40, 60, MatType::CV_8UC3)?;
    let mut dst = Mat::new();
    resize::resize(
        &backend,
        &src,
        &mut dst,
        Size::new(30, 20),
        0.0,
        0.0,
        InterpolationFlags::Cubic,
    )?;
    assert_eq!(
        backend.calls(),
        vec![Call::Resize(
            ffi::Size {
                width: 30,
                height: 20
            },
            0.0,
            0.0,
            2
        )]
    );
    assert_eq!(dst.size(), vec![20, 30]);
    assert_eq!(dst.mat_type(), MatType::CV_8UC3);
    Ok(())
}

#[test]
fn test_output_into_region() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let src = Mat::from_vec(2, 2, MatType::CV_8UC1, vec![9, 9, 9, 9])?;
    let mut canvas = Mat::new_with_size(4, 4, MatType::CV_8UC1)?;
    {
        let mut roi = canvas.region(Rectangle::new(2, 2, 4, 4))?;
        filter::gaussian_blur(
            &backend,
            &src,
            &mut roi,
            Size::new(3, 3),
            1.0,
            0.0,
            BorderType::default(),
        )?;
    }
    assert_eq!(canvas.get_uchar_at(3, 3)?, 9);
    assert_eq!(canvas.get_uchar_at(0, 0)?, 0);
    Ok(())
}

#[test]
fn test_get_perspective_transform() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let src = PointVector::from_points(&[
        Point::new(0, 0),
        Point::new(10, 5),
        Point::new(10, 10),
        Point::new(5, 10),
    ]);
    let dst = PointVector::from_points(&[
        Point::new(0, 0),
        Point::new(10, 0),
        Point::new(10, 10),
        Point::new(0, 10),
    ]);
    let m = warp::get_perspective_transform(&backend, &src, &dst)?;
    assert_eq!(m.rows(), 3);
    assert_eq!(m.cols(), 3);
    assert_eq!(m.get_double_at(2, 2)?, 1.0);

    let src_points = src.to_points().into_iter().map(ffi::Point::from).collect();
    let dst_points = dst.to_points().into_iter().map(ffi::Point::from).collect();
    assert_eq!(
        backend.calls(),
        vec![Call::GetPerspectiveTransform(src_points, dst_points)]
    );

    let src2f: Point2fVector = src
        .to_points()
        .into_iter()
        .map(|p| Point2f::new(p.x as f32, p.y as f32))
        .collect();
    let dst2f = Point2fVector::from_points(&[Point2f::new(0.0, 0.0); 4]);
    let m = warp::get_perspective_transform_2f(&backend, &src2f, &dst2f)?;
    assert_eq!(m.mat_type(), MatType::CV_64FC1);
    assert_eq!(backend.calls(), vec![Call::GetPerspectiveTransform2f(4, 4)]);
    Ok(())
}

#[test]
fn test_perspective_transform() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let src = Mat::from_slice::<f32>(1, 2, 2, &[1.0, 2.0, 3.0, 4.0])?;
    let mut tm = Mat::new();
    identity(&mut tm)?;
    let mut dst = Mat::new();
    cvmat_imgproc::core::perspective_transform(&backend, &src, &mut dst, &tm)?;
    assert_eq!(backend.calls(), vec![Call::PerspectiveTransform]);
    approx::assert_relative_eq!(dst.get_float_at(0, 3)?, 4.0);
    Ok(())
}

#[test]
fn test_phase_correlate() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let src1 = Mat::new_with_size(8, 8, MatType::CV_32FC1)?;
    let src2 = Mat::new_with_size(8, 8, MatType::CV_32FC1)?;
    let (shift, response) = registration::phase_correlate(&backend, &src1, &src2, &Mat::new())?;
    approx::assert_relative_eq!(shift.x, 1.5);
    approx::assert_relative_eq!(shift.y, -2.25);
    approx::assert_relative_eq!(response, 0.75);
    assert_eq!(backend.calls(), vec![Call::PhaseCorrelate(true)]);
    Ok(())
}

#[test]
fn test_get_optimal_new_camera_matrix() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let k = camera_matrix()?;
    let d = Mat::from_slice::<f64>(1, 5, 1, &[-0.1, 0.01, 0.0, 0.0, 0.0])?;
    let (new_k, roi) = calibration::get_optimal_new_camera_matrix_with_params(
        &backend,
        &k,
        &d,
        Size::new(640, 480),
        0.5,
        Size::new(640, 480),
        false,
    )?;
    assert_eq!(new_k.get_double_at(0, 2)?, 320.0);
    assert_eq!(roi, Rectangle::new(4, 3, 636, 477));
    assert_eq!(
        backend.calls(),
        vec![Call::GetOptimalNewCameraMatrix(
            ffi::Size {
                width: 640,
                height: 480
            },
            0.5,
            false
        )]
    );
    Ok(())
}

#[test]
fn test_fisheye_calibration() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let k = camera_matrix()?;
    let d = Mat::from_slice::<f64>(1, 4, 1, &[0.1, 0.01, 0.0, 0.0])?;
    let r = Mat::new();

    let mut p = Mat::new();
    calibration::estimate_new_camera_matrix_for_undistort_rectify(
        &backend,
        &k,
        &d,
        Size::new(640, 480),
        &r,
        &mut p,
        1.0,
        Size::new(320, 240),
        1.0,
    )?;
    assert_eq!(p.size(), vec![3, 3]);

    let distorted = Mat::new_with_size(480, 640, MatType::CV_8UC3)?;
    let mut undistorted = Mat::new();
    calibration::fisheye_undistort_image_with_params(
        &backend,
        &distorted,
        &mut undistorted,
        &k,
        &d,
        &p,
        Size::new(320, 240),
    )?;
    assert_eq!(undistorted.rows(), 240);
    assert_eq!(undistorted.cols(), 320);

    let points = Mat::from_slice::<f64>(2, 1, 2, &[10.0, 20.0, 30.0, 40.0])?;
    let mut out = Mat::new();
    calibration::fisheye_undistort_points(&backend, &points, &mut out, &k, &d, &r, &p)?;
    assert_eq!(out.to_bytes(), points.to_bytes());

    assert_eq!(
        backend.calls(),
        vec![
            Call::EstimateNewCameraMatrix(
                ffi::Size {
                    width: 640,
                    height: 480
                },
                ffi::Size {
                    width: 320,
                    height: 240
                },
                1.0
            ),
            Call::FisheyeUndistortImage(ffi::Size {
                width: 320,
                height: 240
            }),
            Call::FisheyeUndistortPoints,
        ]
    );
    Ok(())
}

#[test]
fn test_undistort() -> Result<(), ImgprocError> {
    let backend = RecordingBackend::default();
    let k = camera_matrix()?;
    let d = Mat::from_slice::<f64>(1, 5, 1, &[-0.1, 0.01, 0.0, 0.0, 0.0])?;
    let src = Mat::new_with_size(48, 64, MatType::CV_8UC1)?;
    let mut dst = Mat::new();
    calibration::undistort(&backend, &src, &mut dst, &k, &d, &k)?;
    assert_eq!(dst.size(), src.size());

    let points = Mat::from_slice::<f32>(1, 1, 2, &[100.0, 200.0])?;
    let mut out = Mat::new();
    calibration::undistort_points(&backend, &points, &mut out, &k, &d, &Mat::new(), &k)?;
    approx::assert_relative_eq!(out.get_float_at(0, 1)?, 200.0);

    assert_eq!(backend.calls(), vec![Call::Undistort, Call::UndistortPoints]);
    Ok(())
}

#[test]
fn test_backend_as_trait_object() -> Result<(), ImgprocError> {
    let backend: Box<dyn Backend> = Box::new(RecordingBackend::default());
    let mut img = Mat::new_with_size(4, 4, MatType::CV_8UC1)?;
    draw::line(
        backend.as_ref(),
        &mut img,
        Point::new(0, 0),
        Point::new(3, 3),
        Rgba::default(),
        1,
    )?;
    Ok(())
}
