use crate::consts::{QOI_MAGIC, QOI_PIXELS_MAX};

/// Errors that can occur while encoding or decoding a QOI image.
///
/// Every error is terminal for the call that produced it: no partial image
/// is returned and a broken stream is never resynchronized.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Width or height is zero.
    #[error("image contains no pixels: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },
    /// Channel count other than 3 or 4.
    #[error("invalid number of channels: {channels} (expected 3 or 4)")]
    InvalidChannelCount { channels: u8 },
    /// Color space byte other than 0 or 1.
    #[error("invalid color space: {colorspace} (expected 0 or 1)")]
    InvalidColorspace { colorspace: u8 },
    /// First four bytes are not `qoif`.
    #[error("invalid magic: expected {:?}, got {magic:?}", QOI_MAGIC)]
    BadMagic { magic: [u8; 4] },
    /// Fewer than 14 bytes were supplied for the header.
    #[error("truncated header: {size} bytes (expected 14)")]
    TruncatedHeader { size: usize },
    /// A chunk needs more bytes than the stream has left.
    #[error("unexpected end of stream while decoding")]
    UnexpectedEndOfStream,
    /// The trailing 8 bytes are not the stream end marker.
    #[error("invalid stream end marker")]
    MalformedEndMarker,
    /// The chunk stream describes a different number of pixels than the header.
    #[error("pixel count mismatch: chunk stream does not describe exactly {expected} pixels")]
    PixelCountMismatch { expected: usize },
    #[error("image is too large: {width}x{height} (max={}Mp)", QOI_PIXELS_MAX / 1_000_000)]
    ImageTooLarge { width: u32, height: u32 },
    #[error("invalid image length: {size} bytes for {width}x{height}")]
    InvalidImageLength { size: usize, width: u32, height: u32 },
    #[error("output buffer size too small: {size} (minimum required: {required})")]
    OutputBufferTooSmall { size: usize, required: usize },
    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
