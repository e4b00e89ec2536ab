#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use cvmat_core as core;

#[doc(inline)]
pub use cvmat_imgproc as imgproc;
