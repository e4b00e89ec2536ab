/// A 2D point with integer coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A 2D point with single precision floating point coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2f {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Point2f {
    /// Creates a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point2f {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Size in pixels
///
/// # Examples
///
/// ```
/// use cvmat_core::Size;
///
/// let size = Size::new(640, 480);
/// assert_eq!(size.width, 640);
/// assert!(Size::default().is_empty());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns true if either extent is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Size {{ width: {}, height: {} }}", self.width, self.height)
    }
}

/// An axis aligned rectangle given by two corners.
///
/// `min` is inclusive and `max` exclusive, so a rectangle from `(1, 1)` to
/// `(3, 4)` covers 2 columns and 3 rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle {
    /// Top-left corner (inclusive)
    pub min: Point,
    /// Bottom-right corner (exclusive)
    pub max: Point,
}

impl Rectangle {
    /// Creates a rectangle from two corners, swapping coordinates so that `min <= max`.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Creates a rectangle from its origin and its extents.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            min: origin,
            max: Point::new(
                origin.x.saturating_add(size.width),
                origin.y.saturating_add(size.height),
            ),
        }
    }

    /// Width of the rectangle, saturating at the `i32` bounds.
    pub fn dx(&self) -> i32 {
        self.max.x.saturating_sub(self.min.x)
    }

    /// Height of the rectangle, saturating at the `i32` bounds.
    pub fn dy(&self) -> i32 {
        self.max.y.saturating_sub(self.min.y)
    }

    /// Extents of the rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.dx(), self.dy())
    }

    /// Returns true if the rectangle covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }
}

/// An 8-bit color with alpha, in the caller's RGBA order.
///
/// The wrapped library expects channels as B, G, R, A; see
/// [`crate::ffi::Scalar`] for the marshaled form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba {
    /// Creates a new color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}
