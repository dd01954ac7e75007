use alloc::vec::Vec;

use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::header::{Channels, ColorSpace, Header};

/// A decoded image: dimensions, pixel format and an owned row-major pixel buffer.
///
/// The buffer holds `width * height * channels` bytes with no row padding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawImage {
    header: Header,
    pixels: Vec<u8>,
}

impl RawImage {
    /// Wraps a pixel buffer, checking it against the dimensions and channel count.
    pub fn new(
        width: u32, height: u32, channels: Channels, colorspace: ColorSpace, pixels: Vec<u8>,
    ) -> Result<Self> {
        let header = Header::try_new(width, height, channels, colorspace)?;
        Self::from_header(header, pixels)
    }

    pub fn from_header(header: Header, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != header.n_bytes() {
            return Err(Error::InvalidImageLength {
                size: pixels.len(),
                width: header.width,
                height: header.height,
            });
        }
        Ok(Self { header, pixels })
    }

    /// Decodes a complete QOI stream.
    pub fn decode(data: impl AsRef<[u8]>) -> Result<Self> {
        let mut decoder = Decoder::new(&data)?;
        let pixels = decoder.decode_to_vec()?;
        Ok(Self { header: *decoder.header(), pixels })
    }

    /// Encodes the image into a complete QOI stream.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Encoder::with_header(&self.pixels, self.header)?.encode_to_vec()
    }

    pub const fn header(&self) -> &Header {
        &self.header
    }

    pub const fn width(&self) -> u32 {
        self.header.width
    }

    pub const fn height(&self) -> u32 {
        self.header.height
    }

    pub const fn channels(&self) -> Channels {
        self.header.channels
    }

    pub const fn colorspace(&self) -> ColorSpace {
        self.header.colorspace
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Encodes a raw image into a QOI stream.
#[inline]
pub fn encode(image: &RawImage) -> Result<Vec<u8>> {
    image.encode()
}

/// Decodes a QOI stream into a raw image with the channel count stored in its header.
#[inline]
pub fn decode(data: impl AsRef<[u8]>) -> Result<RawImage> {
    RawImage::decode(data)
}
