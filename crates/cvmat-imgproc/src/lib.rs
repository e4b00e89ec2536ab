#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Every function takes the [`backend::Backend`] to run on as its first
//! argument, converts its arguments to the native layouts of
//! [`cvmat_core::ffi`] and performs exactly one backend call. Colors are sent
//! in B, G, R, A order and rectangles as origin plus size.

/// backend abstraction over the native library.
pub mod backend;

/// camera calibration and undistortion module.
pub mod calibration;

/// color space conversions module.
pub mod color;

/// array operations module.
pub mod core;

/// utilities to draw on images.
pub mod draw;

/// error types for the image processing operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// native library backend.
#[cfg(feature = "native")]
pub mod native;

/// image registration module.
pub mod registration;

/// utility functions for resizing images.
pub mod resize;

/// image geometric transformations module.
pub mod warp;

pub use crate::backend::Backend;
pub use crate::error::ImgprocError;
#[cfg(feature = "native")]
pub use crate::native::NativeBackend;
