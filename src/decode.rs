#[cfg(any(feature = "alloc", feature = "std"))]
use alloc::{vec, vec::Vec};
#[cfg(feature = "std")]
use std::io::Read;

use bytemuck::Pod;

use crate::chunk::Chunk;
use crate::consts::{QOI_HEADER_SIZE, QOI_PADDING, QOI_PADDING_SIZE};
use crate::error::{Error, Result};
use crate::header::{Channels, Header};
use crate::index::RunningIndex;
use crate::pixel::Pixel;

fn decode_impl<const N: usize>(out: &mut [u8], mut data: &[u8], n_pixels: usize) -> Result<()>
where
    [u8; N]: Pod,
{
    let pixels: &mut [[u8; N]] = bytemuck::cast_slice_mut(&mut out[..n_pixels * N]);

    let mut index = RunningIndex::new();
    let mut px = Pixel::START;
    let mut pos = 0;

    while pos < n_pixels {
        let (chunk, rest) = Chunk::read(data)?;
        data = rest;
        if let Chunk::Run(run) = chunk {
            let end = pos + usize::from(run);
            if end > n_pixels {
                return Err(Error::PixelCountMismatch { expected: n_pixels });
            }
            pixels[pos..end].fill(px.to_array());
            pos = end;
            continue;
        }
        px = chunk.apply(px, &index);
        if chunk.updates_index() {
            index.insert(px);
        }
        pixels[pos] = px.to_array();
        pos += 1;
    }

    if !data.is_empty() {
        return Err(Error::PixelCountMismatch { expected: n_pixels });
    }
    Ok(())
}

/// Decodes everything that follows the header: the chunk stream and the end marker.
fn decode_body(out: &mut [u8], body: &[u8], header: &Header, channels: Channels) -> Result<()> {
    if body.len() < QOI_PADDING_SIZE {
        return Err(Error::UnexpectedEndOfStream);
    }
    let (chunks, padding) = body.split_at(body.len() - QOI_PADDING_SIZE);
    if padding != QOI_PADDING {
        return Err(Error::MalformedEndMarker);
    }
    let n_pixels = header.n_pixels();
    match channels {
        Channels::Rgb => decode_impl::<3>(out, chunks, n_pixels),
        Channels::Rgba => decode_impl::<4>(out, chunks, n_pixels),
    }?;
    log::trace!(
        target: "qoi",
        "decoded {}x{}x{} image from {} chunk bytes",
        header.width,
        header.height,
        channels.as_u8(),
        chunks.len()
    );
    Ok(())
}

/// Decode the image header from a slice of bytes.
#[inline]
pub fn decode_header(data: impl AsRef<[u8]>) -> Result<Header> {
    Header::decode(data)
}

/// Decode the image into a pre-allocated buffer.
///
/// Note: the resulting number of channels will match the header. In order to change
/// the number of channels, use [`Decoder::with_channels`].
#[inline]
pub fn decode_to_buf(buf: impl AsMut<[u8]>, data: impl AsRef<[u8]>) -> Result<Header> {
    let mut decoder = Decoder::new(&data)?;
    decoder.decode_to_buf(buf)?;
    Ok(*decoder.header())
}

/// Decode the image into a newly allocated vector.
///
/// Note: the resulting number of channels will match the header. In order to change
/// the number of channels, use [`Decoder::with_channels`].
#[cfg(any(feature = "alloc", feature = "std"))]
#[inline]
pub fn decode_to_vec(data: impl AsRef<[u8]>) -> Result<(Header, Vec<u8>)> {
    let mut decoder = Decoder::new(&data)?;
    let out = decoder.decode_to_vec()?;
    Ok((*decoder.header(), out))
}

/// Source of an encoded image: the header first, then everything after it.
pub trait Reader {
    fn decode_header(&mut self) -> Result<Header>;
    fn decode_image(&mut self, out: &mut [u8], channels: Channels, header: &Header) -> Result<()>;
}

/// An in-memory encoded image.
#[derive(Clone, Copy, Debug)]
pub struct Bytes<'a>(&'a [u8]);

impl<'a> Bytes<'a> {
    #[inline]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self(buf)
    }

    #[inline]
    pub const fn as_slice(&self) -> &[u8] {
        self.0
    }
}

impl Reader for Bytes<'_> {
    #[inline]
    fn decode_header(&mut self) -> Result<Header> {
        let header = Header::decode(self.0)?;
        self.0 = &self.0[QOI_HEADER_SIZE..];
        Ok(header)
    }

    #[inline]
    fn decode_image(&mut self, out: &mut [u8], channels: Channels, header: &Header) -> Result<()> {
        decode_body(out, self.0, header, channels)
    }
}

#[cfg(feature = "std")]
impl<R: Read> Reader for R {
    #[inline]
    fn decode_header(&mut self) -> Result<Header> {
        let mut buf = Vec::with_capacity(QOI_HEADER_SIZE);
        self.take(QOI_HEADER_SIZE as u64).read_to_end(&mut buf)?;
        Header::decode(buf)
    }

    #[inline]
    fn decode_image(&mut self, out: &mut [u8], channels: Channels, header: &Header) -> Result<()> {
        let mut body = Vec::new();
        self.read_to_end(&mut body)?;
        decode_body(out, &body, header, channels)
    }
}

/// Decode QOI images from slices or from streams.
#[derive(Clone)]
pub struct Decoder<R> {
    reader: R,
    header: Header,
    channels: Channels,
}

impl<'a> Decoder<Bytes<'a>> {
    /// Creates a new decoder from a slice of bytes.
    ///
    /// The header will be decoded immediately upon construction.
    ///
    /// Note: this provides the most efficient decoding, but requires the source data to
    /// be loaded in memory in order to decode it. In order to decode from a generic
    /// stream, use [`Decoder::from_stream`] instead.
    #[inline]
    pub fn new(data: &'a (impl AsRef<[u8]> + ?Sized)) -> Result<Self> {
        Self::new_impl(Bytes::new(data.as_ref()))
    }

    /// Returns the undecoded tail of the input slice of bytes.
    #[inline]
    pub const fn data(&self) -> &[u8] {
        self.reader.as_slice()
    }
}

#[cfg(feature = "std")]
impl<R: Read> Decoder<R> {
    /// Creates a new decoder from a generic reader that implements [`Read`](std::io::Read).
    ///
    /// The header will be decoded immediately upon construction; the rest of
    /// the stream is read when the image is decoded.
    #[inline]
    pub fn from_stream(reader: R) -> Result<Self> {
        Self::new_impl(reader)
    }

    /// Returns an immutable reference to the underlying reader.
    #[inline]
    pub const fn reader(&self) -> &R {
        &self.reader
    }

    /// Consumes the decoder and returns the underlying reader back.
    #[inline]
    #[allow(clippy::missing_const_for_fn)]
    pub fn into_reader(self) -> R {
        self.reader
    }
}

impl<R: Reader> Decoder<R> {
    #[inline]
    fn new_impl(mut reader: R) -> Result<Self> {
        let header = reader.decode_header()?;
        log::debug!(target: "qoi", "accepted header: {:?}", header);
        Ok(Self { reader, header, channels: header.channels })
    }

    /// Returns a new decoder with modified number of channels.
    ///
    /// By default, the number of channels in the decoded image will be equal
    /// to whatever is specified in the header. However, it is also possible
    /// to decode RGB into RGBA (in which case the alpha channel will be set
    /// to 255), and vice versa (in which case the alpha channel will be ignored).
    #[inline]
    pub const fn with_channels(mut self, channels: Channels) -> Self {
        self.channels = channels;
        self
    }

    /// Returns the number of channels in the decoded image.
    ///
    /// Note: this may differ from the number of channels specified in the header.
    #[inline]
    pub const fn channels(&self) -> Channels {
        self.channels
    }

    /// Returns the decoded image header.
    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The number of bytes the decoded image will take.
    ///
    /// Can be used to pre-allocate the buffer to decode the image into.
    #[inline]
    pub const fn required_buf_len(&self) -> usize {
        self.header.with_channels(self.channels).n_bytes()
    }

    /// Decodes the image to a pre-allocated buffer and returns the number of bytes written.
    ///
    /// The minimum size of the buffer can be found via [`Decoder::required_buf_len`].
    #[inline]
    pub fn decode_to_buf(&mut self, mut buf: impl AsMut<[u8]>) -> Result<usize> {
        let buf = buf.as_mut();
        let size = self.required_buf_len();
        if buf.len() < size {
            return Err(Error::OutputBufferTooSmall { size: buf.len(), required: size });
        }
        self.reader.decode_image(buf, self.channels, &self.header)?;
        Ok(size)
    }

    /// Decodes the image into a newly allocated vector of bytes and returns it.
    #[cfg(any(feature = "alloc", feature = "std"))]
    #[inline]
    pub fn decode_to_vec(&mut self) -> Result<Vec<u8>> {
        let mut out = vec![0; self.required_buf_len()];
        self.reader.decode_image(&mut out, self.channels, &self.header)?;
        Ok(out)
    }
}
