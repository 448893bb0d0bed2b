//! ovlpack - arcade overlay layouts to packed color-plane bitmaps
//!
//! Reads `<game>.lay` overlay rectangles, rasterizes them into the 256x224
//! logical screen and packs the result into a 1024-byte color plane, written
//! out as `col_<game>.bin` and `col_<game>.txt`.

pub mod batch;
pub mod emit;
pub mod error;
pub mod layout;
pub mod names;
pub mod orientation;
pub mod overlay;
