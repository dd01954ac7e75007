//! Encoder/decoder for [QOI image format](https://qoiformat.org/), implemented in pure and safe Rust.
//!
//! - Byte-exact output: the same pixels always encode to the same bytes.
//! - Compliant with the [latest](https://qoiformat.org/qoi-specification.pdf) QOI format specification.
//! - Zero unsafe code.
//! - Supports decoding from / encoding to `std::io` streams directly.
//! - `no_std` support.
//!
//! ### Examples
//!
//! ```rust
//! use qoi::{decode_to_vec, encode_to_vec, ColorSpace};
//!
//! # fn main() -> qoi::Result<()> {
//! let (width, height) = (2, 1);
//! let pixels = [255_u8, 0, 0, 255, 0, 0, 255, 128];
//!
//! let encoded = encode_to_vec(&pixels, width, height, 4, ColorSpace::Srgb)?;
//! let (header, decoded) = decode_to_vec(&encoded)?;
//!
//! assert_eq!(header.width, width);
//! assert_eq!(header.height, height);
//! assert_eq!(decoded, pixels);
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(
    clippy::similar_names,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::cargo_common_metadata
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "alloc", feature = "std"))]
extern crate alloc;

mod chunk;
mod decode;
mod encode;
mod error;
mod header;
#[cfg(any(feature = "alloc", feature = "std"))]
mod image;
mod index;
mod pixel;

#[doc(hidden)]
pub mod consts;

#[cfg(any(feature = "alloc", feature = "std"))]
pub use crate::decode::decode_to_vec;
pub use crate::decode::{decode_header, decode_to_buf, Bytes, Decoder, Reader};

#[cfg(any(feature = "alloc", feature = "std"))]
pub use crate::encode::encode_to_vec;
pub use crate::encode::{encode_to_buf, encoded_size_limit, Encoder};

pub use crate::error::{Error, Result};
pub use crate::header::{is_qoi, Channels, ColorSpace, Header};
#[cfg(any(feature = "alloc", feature = "std"))]
pub use crate::image::{decode, encode, RawImage};
