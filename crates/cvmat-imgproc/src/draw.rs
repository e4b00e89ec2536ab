use std::ffi::CString;

use cvmat_core::{ffi, Mat, Point, PointsVector, Rectangle, Rgba, Size};

use crate::{backend::Backend, error::ImgprocError};

/// Hershey font face, optionally combined with [`HersheyFont::ITALIC`].
///
/// ```
/// use cvmat_imgproc::draw::HersheyFont;
///
/// let font = HersheyFont::COMPLEX | HersheyFont::ITALIC;
/// assert_eq!(font.code(), 19);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HersheyFont(i32);

impl HersheyFont {
    /// Normal size sans-serif font.
    pub const SIMPLEX: Self = Self(0);
    /// Small size sans-serif font.
    pub const PLAIN: Self = Self(1);
    /// Normal size sans-serif font, more complex than [`HersheyFont::SIMPLEX`].
    pub const DUPLEX: Self = Self(2);
    /// Normal size serif font.
    pub const COMPLEX: Self = Self(3);
    /// Normal size serif font, more complex than [`HersheyFont::COMPLEX`].
    pub const TRIPLEX: Self = Self(4);
    /// Smaller version of [`HersheyFont::COMPLEX`].
    pub const COMPLEX_SMALL: Self = Self(5);
    /// Hand-writing style font.
    pub const SCRIPT_SIMPLEX: Self = Self(6);
    /// More complex variant of [`HersheyFont::SCRIPT_SIMPLEX`].
    pub const SCRIPT_COMPLEX: Self = Self(7);
    /// Flag for italic font.
    pub const ITALIC: Self = Self(16);

    /// The native integer code.
    pub fn code(&self) -> i32 {
        self.0
    }
}

impl std::ops::BitOr for HersheyFont {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Line drawing mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum LineType {
    /// Filled shape.
    Filled = -1,
    /// 4-connected line.
    Line4 = 4,
    /// 8-connected line.
    #[default]
    Line8 = 8,
    /// Antialiased line.
    LineAA = 16,
}

/// Rendering parameters for [`put_text_with_params`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextParams {
    /// Font face
    pub font: HersheyFont,
    /// Factor multiplying the font's base size
    pub scale: f64,
    /// Text color
    pub color: Rgba,
    /// Stroke thickness
    pub thickness: i32,
    /// Line drawing mode
    pub line_type: LineType,
    /// When true, the image origin is at the bottom-left corner
    pub bottom_left_origin: bool,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            font: HersheyFont::SIMPLEX,
            scale: 1.0,
            color: Rgba::new(255, 255, 255, 255),
            thickness: 1,
            line_type: LineType::Line8,
            bottom_left_origin: false,
        }
    }
}

/// Draw an arrow segment pointing from `pt1` to `pt2`.
///
/// # Arguments
///
/// * `backend` - The native library backend.
/// * `img` - The image to draw on.
/// * `pt1` - The point the arrow starts from.
/// * `pt2` - The point the arrow points to.
/// * `color` - The color of the arrow.
/// * `thickness` - The thickness of the arrow.
pub fn arrowed_line<B: Backend + ?Sized>(
    backend: &B,
    img: &mut Mat<'_>,
    pt1: Point,
    pt2: Point,
    color: Rgba,
    thickness: i32,
) -> Result<(), ImgprocError> {
    log::debug!("arrowed_line: {pt1:?} -> {pt2:?}");
    backend.arrowed_line(img, pt1.into(), pt2.into(), color.into(), thickness)
}

/// Draw a circle.
///
/// A negative `thickness` draws a filled circle.
pub fn circle<B: Backend + ?Sized>(
    backend: &B,
    img: &mut Mat<'_>,
    center: Point,
    radius: i32,
    color: Rgba,
    thickness: i32,
) -> Result<(), ImgprocError> {
    log::debug!("circle: center {center:?}, radius {radius}");
    backend.circle(img, center.into(), radius, color.into(), thickness)
}

/// Draw an elliptic arc, or a filled ellipse sector for a negative `thickness`.
///
/// # Arguments
///
/// * `center` - The center of the ellipse.
/// * `axes` - Half of the size of the ellipse main axes.
/// * `angle` - The ellipse rotation angle in degrees.
/// * `start_angle` - The starting angle of the arc in degrees.
/// * `end_angle` - The ending angle of the arc in degrees.
#[allow(clippy::too_many_arguments)]
pub fn ellipse<B: Backend + ?Sized>(
    backend: &B,
    img: &mut Mat<'_>,
    center: Point,
    axes: Point,
    angle: f64,
    start_angle: f64,
    end_angle: f64,
    color: Rgba,
    thickness: i32,
) -> Result<(), ImgprocError> {
    log::debug!("ellipse: center {center:?}, axes {axes:?}, angle {angle}");
    backend.ellipse(
        img,
        center.into(),
        axes.into(),
        angle,
        start_angle,
        end_angle,
        color.into(),
        thickness,
    )
}

/// Draw a line segment connecting two points.
pub fn line<B: Backend + ?Sized>(
    backend: &B,
    img: &mut Mat<'_>,
    pt1: Point,
    pt2: Point,
    color: Rgba,
    thickness: i32,
) -> Result<(), ImgprocError> {
    log::debug!("line: {pt1:?} -> {pt2:?}");
    backend.line(img, pt1.into(), pt2.into(), color.into(), thickness)
}

/// Draw a rectangle outline, or a filled rectangle for a negative `thickness`.
///
/// The rectangle reaches the native library as origin plus size.
pub fn rectangle<B: Backend + ?Sized>(
    backend: &B,
    img: &mut Mat<'_>,
    rect: Rectangle,
    color: Rgba,
    thickness: i32,
) -> Result<(), ImgprocError> {
    log::debug!("rectangle: {rect:?}");
    backend.rectangle(img, ffi::Rect::from(rect), color.into(), thickness)
}

/// Fill the area bounded by one or more polygons.
pub fn fill_poly<B: Backend + ?Sized>(
    backend: &B,
    img: &mut Mat<'_>,
    points: &PointsVector,
    color: Rgba,
) -> Result<(), ImgprocError> {
    log::debug!("fill_poly: {} polygons", points.size());
    let contours = points.as_ffi()?;
    backend.fill_poly(img, contours_of(&contours)?, color.into())
}

/// Draw one or more polygonal curves.
pub fn polylines<B: Backend + ?Sized>(
    backend: &B,
    img: &mut Mat<'_>,
    points: &PointsVector,
    is_closed: bool,
    color: Rgba,
    thickness: i32,
) -> Result<(), ImgprocError> {
    log::debug!("polylines: {} curves, closed {is_closed}", points.size());
    let contours = points.as_ffi()?;
    backend.polylines(
        img,
        contours_of(&contours)?,
        is_closed,
        color.into(),
        thickness,
    )
}

fn contours_of(points: &[ffi::Points]) -> Result<ffi::Contours, ImgprocError> {
    Ok(ffi::Contours {
        contours: points.as_ptr(),
        length: ffi::to_c_len(points.len())?,
    })
}

/// Compute the size of the box that contains the given text.
///
/// # Errors
///
/// Returns [`ImgprocError::InvalidText`] if `text` contains a NUL byte.
pub fn get_text_size<B: Backend + ?Sized>(
    backend: &B,
    text: &str,
    font: HersheyFont,
    scale: f64,
    thickness: i32,
) -> Result<Size, ImgprocError> {
    let (size, _) = get_text_size_with_baseline(backend, text, font, scale, thickness)?;
    Ok(size)
}

/// Compute the size of the box that contains the given text, together with
/// the y-coordinate of the baseline relative to the bottom-most text point.
pub fn get_text_size_with_baseline<B: Backend + ?Sized>(
    backend: &B,
    text: &str,
    font: HersheyFont,
    scale: f64,
    thickness: i32,
) -> Result<(Size, i32), ImgprocError> {
    let text = CString::new(text)?;
    log::debug!("get_text_size: {text:?}, font {}", font.code());
    let (size, baseline) = backend.get_text_size(&text, font.code(), scale, thickness)?;
    Ok((size.into(), baseline))
}

/// Render a text string with 8-connected lines and a top-left origin.
///
/// # Arguments
///
/// * `org` - The bottom-left corner of the text string in the image.
#[allow(clippy::too_many_arguments)]
pub fn put_text<B: Backend + ?Sized>(
    backend: &B,
    img: &mut Mat<'_>,
    text: &str,
    org: Point,
    font: HersheyFont,
    scale: f64,
    color: Rgba,
    thickness: i32,
) -> Result<(), ImgprocError> {
    let params = TextParams {
        font,
        scale,
        color,
        thickness,
        ..Default::default()
    };
    put_text_with_params(backend, img, text, org, &params)
}

/// Render a text string with full control of the rendering parameters.
///
/// ```no_run
/// use cvmat_core::{Mat, Point};
/// use cvmat_imgproc::{backend::Backend, draw::{put_text_with_params, LineType, TextParams}};
///
/// fn label(backend: &dyn Backend, img: &mut Mat<'_>) {
///     let params = TextParams {
///         line_type: LineType::LineAA,
///         ..Default::default()
///     };
///     put_text_with_params(backend, img, "hello", Point::new(10, 20), &params).unwrap();
/// }
/// ```
pub fn put_text_with_params<B: Backend + ?Sized>(
    backend: &B,
    img: &mut Mat<'_>,
    text: &str,
    org: Point,
    params: &TextParams,
) -> Result<(), ImgprocError> {
    let text = CString::new(text)?;
    log::debug!("put_text: {text:?} at {org:?}, {params:?}");
    backend.put_text(
        img,
        &text,
        org.into(),
        params.font.code(),
        params.scale,
        params.color.into(),
        params.thickness,
        params.line_type as i32,
        params.bottom_left_origin,
    )
}
