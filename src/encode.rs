#[cfg(any(feature = "alloc", feature = "std"))]
use alloc::{vec, vec::Vec};
use core::convert::TryFrom;
#[cfg(feature = "std")]
use std::io::Write;

use bytemuck::Pod;

use crate::chunk::Chunk;
use crate::consts::{QOI_HEADER_SIZE, QOI_PADDING, QOI_PADDING_SIZE, QOI_RUN_MAX};
use crate::error::{Error, Result};
use crate::header::{Channels, ColorSpace, Header};
use crate::index::RunningIndex;
use crate::pixel::Pixel;

/// Appends chunks to the output buffer, failing instead of overrunning it.
struct ChunkWriter<'a> {
    out: &'a mut [u8],
    pos: usize,
}

impl<'a> ChunkWriter<'a> {
    fn new(out: &'a mut [u8]) -> Self {
        Self { out, pos: 0 }
    }

    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.pos + bytes.len();
        let size = self.out.len();
        let dst = self
            .out
            .get_mut(self.pos..end)
            .ok_or(Error::OutputBufferTooSmall { size, required: end })?;
        dst.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    #[inline]
    fn write_chunk(&mut self, chunk: Chunk) -> Result<()> {
        let (bytes, len) = chunk.to_bytes();
        self.write_bytes(&bytes[..len])
    }

    const fn position(&self) -> usize {
        self.pos
    }
}

fn encode_impl<const N: usize>(out: &mut [u8], data: &[u8], header: &Header) -> Result<usize>
where
    [u8; N]: Pod,
{
    let mut writer = ChunkWriter::new(out);
    writer.write_bytes(&header.encode())?;

    let pixels: &[[u8; N]] = bytemuck::cast_slice(data);
    let n_pixels = pixels.len();

    let mut index = RunningIndex::new();
    let mut px_prev = Pixel::START;
    let mut run = 0_u8;

    for (i, &raw) in pixels.iter().enumerate() {
        let px = Pixel::from_array(raw);
        if px == px_prev {
            run += 1;
            if run == QOI_RUN_MAX || i == n_pixels - 1 {
                writer.write_chunk(Chunk::Run(run))?;
                run = 0;
            }
            continue;
        }
        if run != 0 {
            writer.write_chunk(Chunk::Run(run))?;
            run = 0;
        }
        let chunk = Chunk::select(px, px_prev, &index);
        if chunk.updates_index() {
            index.insert(px);
        }
        writer.write_chunk(chunk)?;
        px_prev = px;
    }

    writer.write_bytes(&QOI_PADDING)?;
    Ok(writer.position())
}

#[inline]
fn encode_impl_all(out: &mut [u8], data: &[u8], header: &Header) -> Result<usize> {
    let n_written = match header.channels {
        Channels::Rgb => encode_impl::<3>(out, data, header),
        Channels::Rgba => encode_impl::<4>(out, data, header),
    }?;
    log::trace!(
        target: "qoi",
        "encoded {}x{}x{} image into {} bytes",
        header.width,
        header.height,
        header.channels.as_u8(),
        n_written
    );
    Ok(n_written)
}

/// The maximum number of bytes the encoded image will take.
///
/// Can be used to pre-allocate the buffer to encode the image into.
#[inline]
pub fn encoded_size_limit(width: u32, height: u32, channels: u8) -> usize {
    let (width, height) = (width as usize, height as usize);
    let n_pixels = width.saturating_mul(height);
    QOI_HEADER_SIZE
        + n_pixels.saturating_mul(usize::from(channels))
        + n_pixels
        + QOI_PADDING_SIZE
}

/// Encode the image into a pre-allocated buffer.
///
/// Returns the total number of bytes written.
#[inline]
pub fn encode_to_buf(
    out: impl AsMut<[u8]>, data: impl AsRef<[u8]>, width: u32, height: u32, channels: u8,
    colorspace: ColorSpace,
) -> Result<usize> {
    let channels = Channels::try_from(channels)?;
    let header = Header::try_new(width, height, channels, colorspace)?;
    Encoder::with_header(data.as_ref(), header)?.encode_to_buf(out)
}

/// Encode the image into a newly allocated vector.
#[cfg(any(feature = "alloc", feature = "std"))]
#[inline]
pub fn encode_to_vec(
    data: impl AsRef<[u8]>, width: u32, height: u32, channels: u8, colorspace: ColorSpace,
) -> Result<Vec<u8>> {
    let channels = Channels::try_from(channels)?;
    let header = Header::try_new(width, height, channels, colorspace)?;
    Encoder::with_header(data.as_ref(), header)?.encode_to_vec()
}

/// Encode QOI images from raw pixel buffers.
#[derive(Clone, Debug)]
pub struct Encoder<'a> {
    data: &'a [u8],
    header: Header,
}

impl<'a> Encoder<'a> {
    /// Creates a new encoder from a given array of pixel data and image dimensions.
    ///
    /// The number of channels will be inferred automatically (the valid values
    /// are 3 or 4). The color space will be set to sRGB by default.
    #[inline]
    pub fn new(data: &'a (impl AsRef<[u8]> + ?Sized), width: u32, height: u32) -> Result<Self> {
        let data = data.as_ref();
        let mut header =
            Header::try_new(width, height, Channels::default(), ColorSpace::default())?;
        let size = data.len();
        header.channels = match size.checked_div(header.n_pixels()) {
            Some(3) => Channels::Rgb,
            Some(4) => Channels::Rgba,
            _ => return Err(Error::InvalidImageLength { size, width, height }),
        };
        Self::with_header(data, header)
    }

    /// Creates a new encoder for a pixel buffer described by an existing header.
    ///
    /// Fails if the buffer length doesn't match the header exactly.
    #[inline]
    pub fn with_header(data: &'a [u8], header: Header) -> Result<Self> {
        let size = data.len();
        if size != header.n_bytes() {
            return Err(Error::InvalidImageLength {
                size,
                width: header.width,
                height: header.height,
            });
        }
        Ok(Self { data, header })
    }

    /// Returns a new encoder with modified color space.
    ///
    /// Note: the color space doesn't affect encoding or decoding in any way, it's
    /// a purely informative field that's stored in the image header.
    #[inline]
    pub const fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.header = self.header.with_colorspace(colorspace);
        self
    }

    /// Returns the inferred number of channels.
    #[inline]
    pub const fn channels(&self) -> Channels {
        self.header.channels
    }

    /// Returns the header that will be stored in the encoded image.
    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The maximum number of bytes the encoded image will take.
    ///
    /// Can be used to pre-allocate the buffer to encode the image into.
    #[inline]
    pub fn required_buf_len(&self) -> usize {
        self.header.encode_max_len()
    }

    /// Encodes the image to a pre-allocated buffer and returns the number of bytes written.
    ///
    /// The minimum size of the buffer can be found via [`Encoder::required_buf_len`].
    #[inline]
    pub fn encode_to_buf(&self, mut buf: impl AsMut<[u8]>) -> Result<usize> {
        let buf = buf.as_mut();
        let size_required = self.required_buf_len();
        if buf.len() < size_required {
            return Err(Error::OutputBufferTooSmall { size: buf.len(), required: size_required });
        }
        encode_impl_all(buf, self.data, &self.header)
    }

    /// Encodes the image into a newly allocated vector of bytes and returns it.
    #[cfg(any(feature = "alloc", feature = "std"))]
    #[inline]
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut out = vec![0_u8; self.required_buf_len()];
        let size = encode_impl_all(&mut out, self.data, &self.header)?;
        out.truncate(size);
        Ok(out)
    }

    /// Encodes the image directly to a generic writer that implements [`Write`](std::io::Write).
    ///
    /// Returns the number of bytes written.
    #[cfg(feature = "std")]
    #[inline]
    pub fn encode_to_stream<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let out = self.encode_to_vec()?;
        writer.write_all(&out)?;
        Ok(out.len())
    }
}
