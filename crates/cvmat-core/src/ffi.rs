//! C-compatible parameter structs shared with the wrapped vision library.
//!
//! Field order and widths follow the library's ABI and must not change. The
//! caller-facing types in [`crate::geometry`] convert into these with `From`.

use std::ffi::{c_char, c_int};

use crate::{error::MatError, geometry};

/// C layout of an integer point.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    /// Horizontal coordinate
    pub x: c_int,
    /// Vertical coordinate
    pub y: c_int,
}

/// C layout of a single precision point.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2f {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

/// C layout of a size.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    /// Width
    pub width: c_int,
    /// Height
    pub height: c_int,
}

/// C layout of a rectangle as origin plus extents.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Origin column
    pub x: c_int,
    /// Origin row
    pub y: c_int,
    /// Width
    pub width: c_int,
    /// Height
    pub height: c_int,
}

/// C layout of a 4-component scalar, used for colors in B, G, R, A order.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Scalar {
    /// First component (blue for colors)
    pub val1: f64,
    /// Second component (green for colors)
    pub val2: f64,
    /// Third component (red for colors)
    pub val3: f64,
    /// Fourth component (alpha for colors)
    pub val4: f64,
}

/// Descriptor of a contiguous byte buffer.
///
/// The descriptor does not own the bytes; whoever built it keeps them alive.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct ByteArray {
    /// Pointer to the first byte
    pub data: *mut c_char,
    /// Number of bytes
    pub length: c_int,
}

/// Descriptor of a sequence of integer points.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Points {
    /// Pointer to the first point
    pub points: *const Point,
    /// Number of points
    pub length: c_int,
}

/// Descriptor of a sequence of single precision points.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Points2f {
    /// Pointer to the first point
    pub points: *const Point2f,
    /// Number of points
    pub length: c_int,
}

/// Descriptor of a sequence of point sequences.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Contours {
    /// Pointer to the first inner sequence
    pub contours: *const Points,
    /// Number of inner sequences
    pub length: c_int,
}

/// Borrowed descriptor of a mat's storage handed to the wrapped library.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct MatView {
    /// Pointer to the first element, null for an empty mat
    pub data: *mut u8,
    /// Number of rows
    pub rows: c_int,
    /// Number of columns
    pub cols: c_int,
    /// Type code, see [`crate::MatType::code`]
    pub mat_type: c_int,
    /// Bytes per row
    pub step: usize,
}

/// A mat allocated by the wrapped library and returned to the caller.
///
/// The bytes are compact (no row padding) and must be handed back to the
/// library's release function once copied.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct MatBuffer {
    /// Compact element bytes
    pub data: ByteArray,
    /// Number of rows
    pub rows: c_int,
    /// Number of columns
    pub cols: c_int,
    /// Type code, see [`crate::MatType::code`]
    pub mat_type: c_int,
}

impl ByteArray {
    /// A descriptor that points nowhere.
    pub const fn null() -> Self {
        Self {
            data: std::ptr::null_mut(),
            length: 0,
        }
    }
}

impl MatBuffer {
    /// An empty result slot for the wrapped library to fill.
    pub const fn null() -> Self {
        Self {
            data: ByteArray::null(),
            rows: 0,
            cols: 0,
            mat_type: 0,
        }
    }
}

/// Describes a caller byte buffer without copying it.
///
/// # Errors
///
/// Returns [`MatError::EmptyInput`] for a zero-length buffer.
pub fn to_byte_array(data: &mut [u8]) -> Result<ByteArray, MatError> {
    if data.is_empty() {
        return Err(MatError::EmptyInput);
    }
    Ok(ByteArray {
        length: to_c_len(data.len())?,
        data: data.as_mut_ptr() as *mut c_char,
    })
}

/// Converts a Rust length or extent to the native `int`.
///
/// # Errors
///
/// Returns [`MatError::LengthOverflow`] if `len` exceeds `c_int::MAX`.
pub fn to_c_len(len: usize) -> Result<c_int, MatError> {
    c_int::try_from(len).map_err(|_| MatError::LengthOverflow(len))
}

/// Copies the bytes described by a [`ByteArray`] into an owned vector.
///
/// # Safety
///
/// `array.data` must be valid for reads of `array.length` bytes, or null.
pub unsafe fn from_byte_array(array: &ByteArray) -> Vec<u8> {
    if array.data.is_null() || array.length <= 0 {
        return Vec::new();
    }
    std::slice::from_raw_parts(array.data as *const u8, array.length as usize).to_vec()
}

impl From<geometry::Point> for Point {
    fn from(p: geometry::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point> for geometry::Point {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<geometry::Point2f> for Point2f {
    fn from(p: geometry::Point2f) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point2f> for geometry::Point2f {
    fn from(p: Point2f) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<geometry::Size> for Size {
    fn from(s: geometry::Size) -> Self {
        Self {
            width: s.width,
            height: s.height,
        }
    }
}

impl From<Size> for geometry::Size {
    fn from(s: Size) -> Self {
        Self {
            width: s.width,
            height: s.height,
        }
    }
}

impl From<geometry::Rectangle> for Rect {
    fn from(r: geometry::Rectangle) -> Self {
        Self {
            x: r.min.x,
            y: r.min.y,
            width: r.dx(),
            height: r.dy(),
        }
    }
}

impl From<Rect> for geometry::Rectangle {
    fn from(r: Rect) -> Self {
        Self {
            min: geometry::Point::new(r.x, r.y),
            max: geometry::Point::new(
                r.x.saturating_add(r.width),
                r.y.saturating_add(r.height),
            ),
        }
    }
}

impl From<geometry::Rgba> for Scalar {
    fn from(c: geometry::Rgba) -> Self {
        Self {
            val1: c.b as f64,
            val2: c.g as f64,
            val3: c.r as f64,
            val4: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rectangle, Rgba};

    #[test]
    fn test_color_is_reversed() {
        let scalar = Scalar::from(Rgba::new(10, 20, 30, 40));
        assert_eq!(
            scalar,
            Scalar {
                val1: 30.0,
                val2: 20.0,
                val3: 10.0,
                val4: 40.0,
            }
        );
    }

    #[test]
    fn test_rect_origin_size() {
        let rect = Rect::from(Rectangle::new(2, 3, 12, 8));
        assert_eq!(
            rect,
            Rect {
                x: 2,
                y: 3,
                width: 10,
                height: 5,
            }
        );
        assert_eq!(Rectangle::from(rect), Rectangle::new(2, 3, 12, 8));
    }

    #[test]
    fn test_byte_array_empty() {
        let mut data: Vec<u8> = vec![];
        assert!(matches!(to_byte_array(&mut data), Err(MatError::EmptyInput)));
    }

    #[test]
    fn test_byte_array_no_copy() -> Result<(), MatError> {
        let mut data = vec![1u8, 2, 3];
        let array = to_byte_array(&mut data)?;
        assert_eq!(array.data as *const u8, data.as_ptr());
        assert_eq!(array.length, 3);
        assert_eq!(unsafe { from_byte_array(&array) }, vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_rect_extreme_corners_saturate() {
        let rect = Rect::from(Rectangle::new(-10, i32::MIN, i32::MAX, 0));
        assert_eq!(rect.width, i32::MAX);
        assert_eq!(rect.height, i32::MAX);

        let back = Rectangle::from(Rect {
            x: i32::MAX - 1,
            y: 0,
            width: 10,
            height: 1,
        });
        assert_eq!(back.max.x, i32::MAX);
    }

    #[test]
    fn test_c_len() {
        assert_eq!(to_c_len(42), Ok(42));
        assert_eq!(to_c_len(i32::MAX as usize), Ok(i32::MAX));
        let too_long = i32::MAX as usize + 1;
        assert_eq!(to_c_len(too_long), Err(MatError::LengthOverflow(too_long)));
    }

    #[test]
    fn test_struct_layouts() {
        assert_eq!(std::mem::size_of::<Point>(), 8);
        assert_eq!(std::mem::size_of::<Rect>(), 16);
        assert_eq!(std::mem::size_of::<Scalar>(), 32);
        assert_eq!(std::mem::align_of::<Scalar>(), 8);
    }
}
