use core::convert::{TryFrom, TryInto};

use crate::consts::{QOI_HEADER_SIZE, QOI_MAGIC, QOI_PIXELS_MAX};
use crate::error::{Error, Result};

/// Color space tag stored in byte 13 of the header.
///
/// Purely informative: pixels are encoded and decoded the same way either way.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum ColorSpace {
    /// sRGB color channels, linear alpha
    #[default]
    Srgb = 0,
    /// All channels linear
    Linear = 1,
}

/// Pixel layout stored in byte 12 of the header, and of raw buffers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum Channels {
    /// `r, g, b` per pixel, alpha implicitly 255
    #[default]
    Rgb = 3,
    /// `r, g, b, a` per pixel
    Rgba = 4,
}

impl ColorSpace {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Channels {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Bytes taken by one pixel in a raw buffer.
    pub const fn bytes_per_pixel(self) -> usize {
        self as usize
    }
}

impl From<ColorSpace> for u8 {
    #[inline]
    fn from(colorspace: ColorSpace) -> Self {
        colorspace.as_u8()
    }
}

impl From<Channels> for u8 {
    #[inline]
    fn from(channels: Channels) -> Self {
        channels.as_u8()
    }
}

impl TryFrom<u8> for ColorSpace {
    type Error = Error;

    #[inline]
    fn try_from(colorspace: u8) -> Result<Self> {
        match colorspace {
            0 => Ok(Self::Srgb),
            1 => Ok(Self::Linear),
            _ => Err(Error::InvalidColorspace { colorspace }),
        }
    }
}

impl TryFrom<u8> for Channels {
    type Error = Error;

    #[inline]
    fn try_from(channels: u8) -> Result<Self> {
        match channels {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            _ => Err(Error::InvalidChannelCount { channels }),
        }
    }
}

/// Image header: dimensions, channels, color space.
///
/// ### Notes
/// A valid image header must satisfy the following conditions:
/// * Both width and height must be non-zero.
/// * Maximum number of pixels is 400Mp (=4e8 pixels).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of 8-bit channels per pixel
    pub channels: Channels,
    /// Color space (informative field, doesn't affect encoding)
    pub colorspace: ColorSpace,
}

impl Default for Header {
    #[inline]
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            channels: Channels::default(),
            colorspace: ColorSpace::default(),
        }
    }
}

impl Header {
    /// Creates a new header and validates image dimensions.
    #[inline]
    pub const fn try_new(
        width: u32, height: u32, channels: Channels, colorspace: ColorSpace,
    ) -> Result<Self> {
        let n_pixels = (width as usize).saturating_mul(height as usize);
        if n_pixels == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if n_pixels > QOI_PIXELS_MAX {
            return Err(Error::ImageTooLarge { width, height });
        }
        Ok(Self { width, height, channels, colorspace })
    }

    /// Creates a new header with modified channels.
    #[inline]
    pub const fn with_channels(mut self, channels: Channels) -> Self {
        self.channels = channels;
        self
    }

    /// Creates a new header with modified color space.
    #[inline]
    pub const fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }

    /// Serializes the header into a bytes array.
    #[inline]
    pub fn encode(&self) -> [u8; QOI_HEADER_SIZE] {
        let mut out = [0; QOI_HEADER_SIZE];
        out[..4].copy_from_slice(&QOI_MAGIC);
        out[4..8].copy_from_slice(&self.width.to_be_bytes());
        out[8..12].copy_from_slice(&self.height.to_be_bytes());
        out[12] = self.channels.into();
        out[13] = self.colorspace.into();
        out
    }

    /// Deserializes the header from the start of `data`.
    ///
    /// Checks run in wire order: length, magic, channels, color space, then
    /// the dimensions as a whole.
    #[inline]
    pub fn decode(data: impl AsRef<[u8]>) -> Result<Self> {
        let data = data.as_ref();
        let Some(&[m0, m1, m2, m3, w0, w1, w2, w3, h0, h1, h2, h3, channels, colorspace]) =
            data.get(..QOI_HEADER_SIZE)
        else {
            return Err(Error::TruncatedHeader { size: data.len() });
        };
        let magic = [m0, m1, m2, m3];
        if magic != QOI_MAGIC {
            return Err(Error::BadMagic { magic });
        }
        let channels = channels.try_into()?;
        let colorspace = colorspace.try_into()?;
        let width = u32::from_be_bytes([w0, w1, w2, w3]);
        let height = u32::from_be_bytes([h0, h1, h2, h3]);
        Self::try_new(width, height, channels, colorspace)
    }

    /// Returns a number of pixels in the image.
    #[inline]
    pub const fn n_pixels(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Returns the total number of bytes in the raw pixel array.
    ///
    /// This may come useful when pre-allocating a buffer to decode the image into.
    #[inline]
    pub const fn n_bytes(&self) -> usize {
        self.n_pixels() * self.channels.bytes_per_pixel()
    }

    /// The maximum number of bytes the encoded image will take.
    ///
    /// Can be used to pre-allocate the buffer to encode the image into.
    #[inline]
    pub fn encode_max_len(&self) -> usize {
        crate::encode::encoded_size_limit(self.width, self.height, self.channels.as_u8())
    }
}

/// Returns true if `data` starts with a complete header carrying the QOI magic.
///
/// This is a cheap format sniff; it doesn't validate the rest of the header.
#[inline]
pub fn is_qoi(data: impl AsRef<[u8]>) -> bool {
    let data = data.as_ref();
    data.len() >= QOI_HEADER_SIZE && data[..4] == QOI_MAGIC
}
