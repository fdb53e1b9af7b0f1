#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use skelet_image as image;

#[doc(inline)]
pub use skelet_imgproc as imgproc;

#[doc(inline)]
pub use skelet_io as io;
