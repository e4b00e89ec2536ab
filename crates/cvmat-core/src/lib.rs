#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `cvmat-core` holds the data side of the vision library bindings: the dense
//! array handle [`Mat`], its element types, the point collections passed to
//! drawing and geometry operations, and the C-layout structs exchanged with the
//! native library.
//!
//! # Ownership
//!
//! - A [`Mat`] either owns its bytes or borrows them for a lifetime `'a`.
//! - Wrapping caller bytes never copies them: [`Mat::from_bytes`] borrows a
//!   slice, [`Mat::from_vec`] takes ownership of a vector.
//! - [`Mat::region`] aliases a sub-rectangle of its parent and mutably borrows
//!   the parent for as long as it lives.
//! - Cloning is always a deep copy.
//!
//! # Quick Start
//!
//! ```rust
//! use cvmat_core::{Mat, MatType, Rectangle};
//!
//! let mut mat = Mat::new_with_size(3, 4, MatType::CV_8UC3).unwrap();
//! assert_eq!(mat.step(), 12);
//!
//! let roi = mat.region(Rectangle::new(1, 1, 3, 3)).unwrap();
//! assert!(!roi.is_continuous());
//! assert_eq!(roi.to_bytes().len(), 2 * 2 * 3);
//!
//! let planes = mat.split().unwrap();
//! assert_eq!(planes.len(), 3);
//! ```

/// Allocator module containing memory management utilities.
pub mod allocator;

/// Error types for mat construction and access.
pub mod error;

/// C-layout structs exchanged with the native library.
pub mod ffi;

/// Caller-facing geometric types.
pub mod geometry;

/// The dense array handle.
pub mod mat;

/// Element depth and type codes.
pub mod mat_type;

/// Owned point collections.
pub mod points;

/// Serde module for JSON/other format serialization and deserialization.
///
/// Enabled with the `serde` feature.
#[cfg(feature = "serde")]
pub mod serde;

/// Storage module containing the owned byte buffer behind a mat.
pub mod storage;

pub use crate::allocator::{CpuAllocator, MatAllocator, MatAllocatorError};
pub use crate::error::MatError;
pub use crate::geometry::{Point, Point2f, Rectangle, Rgba, Size};
pub use crate::mat::Mat;
pub use crate::mat_type::{DataType, Depth, MatType};
pub use crate::points::{Point2fVector, PointVector, PointsVector};
