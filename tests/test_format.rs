mod common;

use std::thread;

use qoi::{
    consts::{QOI_HEADER_SIZE, QOI_MIME_TYPE, QOI_MIME_TYPES, QOI_OP_RGB, QOI_OP_RGBA, QOI_PADDING},
    decode, decode_header, decode_to_vec, encode, encode_to_vec, is_qoi, Channels, ColorSpace,
    Error, RawImage, Result,
};

use self::common::{hash, qoi_stream, raw};

fn chunks_of(encoded: &[u8]) -> &[u8] {
    &encoded[QOI_HEADER_SIZE..encoded.len() - QOI_PADDING.len()]
}

fn roundtrip(pixels: &[[u8; 4]], width: u32, height: u32, channels: usize) -> Result<Vec<u8>> {
    let data = raw(pixels, channels);
    let encoded = encode_to_vec(&data, width, height, channels as u8, ColorSpace::Srgb)?;
    let (header, decoded) = decode_to_vec(&encoded)?;
    assert_eq!((header.width, header.height), (width, height));
    assert_eq!(decoded, data);
    Ok(encoded)
}

#[test]
fn test_single_pixel() -> Result<()> {
    for channels in [3, 4] {
        let encoded = roundtrip(&[[0, 0, 0, 255]], 1, 1, channels)?;
        assert_eq!(encoded.len(), QOI_HEADER_SIZE + 1 + QOI_PADDING.len());
        // same as the implicit previous pixel, so it's a run of one
        assert_eq!(chunks_of(&encoded), [0xc0]);

        let encoded = roundtrip(&[[12, 34, 56, 255]], 1, 1, channels)?;
        assert_eq!(chunks_of(&encoded), [QOI_OP_RGB, 12, 34, 56]);
    }
    Ok(())
}

#[test]
fn test_header_layout() -> Result<()> {
    let data = vec![0_u8; 3 * 0x0102 * 3];
    let encoded = encode_to_vec(&data, 0x0102, 3, 3, ColorSpace::Linear)?;
    assert_eq!(&encoded[..QOI_HEADER_SIZE], b"qoif\x00\x00\x01\x02\x00\x00\x00\x03\x03\x01");
    assert_eq!(&encoded[encoded.len() - 8..], [0, 0, 0, 0, 0, 0, 0, 1]);
    Ok(())
}

#[test]
fn test_run_splitting() -> Result<()> {
    for channels in [3, 4] {
        let encoded = roundtrip(&[[0, 0, 0, 255]; 62], 62, 1, channels)?;
        assert_eq!(chunks_of(&encoded), [0xfd]);

        let encoded = roundtrip(&[[0, 0, 0, 255]; 63], 63, 1, channels)?;
        assert_eq!(chunks_of(&encoded), [0xfd, 0xc0]);

        let encoded = roundtrip(&[[0, 0, 0, 255]; 200], 20, 10, channels)?;
        assert_eq!(chunks_of(&encoded), [0xfd, 0xfd, 0xfd, 0xc0 | 13]);
    }
    Ok(())
}

#[test]
fn test_run_flushed_before_next_chunk() -> Result<()> {
    let pixels = [[0, 0, 0, 255], [0, 0, 0, 255], [1, 1, 1, 255], [1, 1, 1, 255]];
    let encoded = roundtrip(&pixels, 2, 2, 4)?;
    // run of 2, diff (+1, +1, +1), run of 1 closed by the last pixel
    assert_eq!(chunks_of(&encoded), [0xc1, 0x40 | 3 << 4 | 3 << 2 | 3, 0xc0]);
    Ok(())
}

#[test]
fn test_four_literals() -> Result<()> {
    let pixels = [[10, 200, 30, 100], [200, 10, 130, 50], [90, 250, 5, 20], [250, 60, 180, 240]];

    let encoded = roundtrip(&pixels, 2, 2, 4)?;
    assert_eq!(encoded.len(), 14 + 4 * 5 + 8);
    for (chunk, px) in chunks_of(&encoded).chunks(5).zip(pixels) {
        assert_eq!(chunk[0], QOI_OP_RGBA);
        assert_eq!(chunk[1..], px);
    }

    let encoded = roundtrip(&pixels, 2, 2, 3)?;
    assert_eq!(encoded.len(), 14 + 4 * 4 + 8);
    for (chunk, px) in chunks_of(&encoded).chunks(4).zip(pixels) {
        assert_eq!(chunk[0], QOI_OP_RGB);
        assert_eq!(chunk[1..], px[..3]);
    }
    Ok(())
}

#[test]
fn test_index_collision_is_not_a_match() -> Result<()> {
    let (p1, p2) = ([1, 0, 0, 255], [65, 0, 0, 255]);
    assert_eq!(hash(p1), hash(p2));

    let encoded = roundtrip(&[p1, p2, p1], 3, 1, 4)?;
    assert_eq!(
        chunks_of(&encoded),
        [0x40 | 3 << 4 | 2 << 2 | 2, QOI_OP_RGB, 65, 0, 0, QOI_OP_RGB, 1, 0, 0]
    );
    Ok(())
}

#[test]
fn test_index_hit() -> Result<()> {
    let (p1, p2) = ([100, 0, 0, 255], [0, 100, 201, 255]);
    assert_ne!(hash(p1), hash(p2));
    let encoded = roundtrip(&[p1, p2, p1, p2], 4, 1, 3)?;
    assert_eq!(
        chunks_of(&encoded),
        [QOI_OP_RGB, 100, 0, 0, QOI_OP_RGB, 0, 100, 201, hash(p1), hash(p2)]
    );
    Ok(())
}

#[test]
fn test_transparent_black_hits_empty_index() -> Result<()> {
    // the running index starts zeroed, so (0, 0, 0, 0) is already in slot 0
    let encoded = roundtrip(&[[0, 0, 0, 0]], 1, 1, 4)?;
    assert_eq!(chunks_of(&encoded), [0x00]);

    // ...but an opaque black RGB pixel never matches a zeroed slot
    let encoded = roundtrip(&[[9, 9, 9, 255], [0, 0, 0, 255]], 2, 1, 3)?;
    assert_eq!(chunks_of(&encoded), [0x80 | (32 + 9), 0x88, 0x80 | (32 - 9), 0x88]);
    Ok(())
}

#[test]
fn test_alpha_change_uses_rgba_literal() -> Result<()> {
    let encoded = roundtrip(&[[0, 0, 0, 254], [1, 0, 0, 254]], 2, 1, 4)?;
    assert_eq!(chunks_of(&encoded), [QOI_OP_RGBA, 0, 0, 0, 254, 0x40 | 3 << 4 | 2 << 2 | 2]);
    Ok(())
}

#[test]
fn test_deterministic() -> Result<()> {
    let data: Vec<u8> = (0..64 * 64 * 4).map(|i| ((i * 7) ^ (i >> 5)) as u8).collect();
    let first = encode_to_vec(&data, 64, 64, 4, ColorSpace::Srgb)?;
    let second = encode_to_vec(&data, 64, 64, 4, ColorSpace::Srgb)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_concurrent_encoding() -> Result<()> {
    let data: Vec<u8> = (0..128 * 32 * 3).map(|i| (i % 251) as u8).collect();
    let expected = encode_to_vec(&data, 128, 32, 3, ColorSpace::Srgb)?;
    let data = data.as_slice();
    let results = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(move || encode_to_vec(data, 128, 32, 3, ColorSpace::Srgb)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
    });
    for result in results {
        assert_eq!(result?, expected);
    }
    Ok(())
}

#[test]
fn test_raw_image() -> Result<()> {
    let pixels = raw(&[[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12]], 4);
    let image = RawImage::new(3, 1, Channels::Rgba, ColorSpace::Linear, pixels.clone())?;
    let encoded = encode(&image)?;
    assert!(is_qoi(&encoded));
    assert_eq!(QOI_MIME_TYPES[0], QOI_MIME_TYPE);

    let header = decode_header(&encoded)?;
    assert_eq!(&header, image.header());

    let decoded = decode(&encoded)?;
    assert_eq!(decoded, image);
    assert_eq!(decoded.colorspace(), ColorSpace::Linear);
    assert_eq!(decoded.into_pixels(), pixels);

    assert!(matches!(
        RawImage::new(2, 2, Channels::Rgb, ColorSpace::Srgb, vec![0; 11]),
        Err(Error::InvalidImageLength { size: 11, width: 2, height: 2 })
    ));
    assert!(matches!(
        RawImage::new(2, 0, Channels::Rgb, ColorSpace::Srgb, vec![]),
        Err(Error::InvalidDimension { width: 2, height: 0 })
    ));
    Ok(())
}

#[test]
fn test_invalid_encode_args() {
    assert!(matches!(
        encode_to_vec([0_u8; 10], 1, 2, 5, ColorSpace::Srgb),
        Err(Error::InvalidChannelCount { channels: 5 })
    ));
    assert!(matches!(
        encode_to_vec([0_u8; 0], 0, 2, 3, ColorSpace::Srgb),
        Err(Error::InvalidDimension { width: 0, height: 2 })
    ));
    assert!(matches!(
        encode_to_vec([0_u8; 6], 1, 2, 4, ColorSpace::Srgb),
        Err(Error::InvalidImageLength { size: 6, .. })
    ));
    assert!(matches!(
        encode_to_vec([0_u8; 0], 40_000, 40_000, 3, ColorSpace::Srgb),
        Err(Error::ImageTooLarge { .. })
    ));
}

#[test]
fn test_malformed_header() {
    let valid = qoi_stream(1, 1, 3, &[0xc0]);
    assert!(decode_to_vec(&valid).is_ok());
    assert!(!is_qoi(&valid[..13]));

    assert!(matches!(decode_to_vec(&valid[..13]), Err(Error::TruncatedHeader { size: 13 })));
    assert!(matches!(decode_to_vec([0_u8; 0]), Err(Error::TruncatedHeader { size: 0 })));

    let mut data = valid.clone();
    data[..4].copy_from_slice(b"qoix");
    assert!(!is_qoi(&data));
    assert!(matches!(decode_to_vec(&data), Err(Error::BadMagic { magic }) if &magic == b"qoix"));

    let mut data = valid.clone();
    data[12] = 5;
    assert!(matches!(decode_to_vec(&data), Err(Error::InvalidChannelCount { channels: 5 })));

    let mut data = valid.clone();
    data[13] = 2;
    assert!(matches!(decode_to_vec(&data), Err(Error::InvalidColorspace { colorspace: 2 })));

    let data = qoi_stream(0, 1, 3, &[]);
    assert!(matches!(decode_to_vec(&data), Err(Error::InvalidDimension { width: 0, height: 1 })));
}

#[test]
fn test_malformed_stream() -> Result<()> {
    let data = raw(&[[1, 2, 3, 255], [200, 100, 50, 255], [200, 100, 50, 255]], 3);
    let encoded = encode_to_vec(&data, 3, 1, 3, ColorSpace::Srgb)?;

    // end marker stripped
    let truncated = &encoded[..encoded.len() - 8];
    assert!(matches!(
        decode_to_vec(truncated),
        Err(Error::MalformedEndMarker | Error::UnexpectedEndOfStream)
    ));

    // end marker damaged
    let mut damaged = encoded.clone();
    *damaged.last_mut().unwrap() = 2;
    assert!(matches!(decode_to_vec(&damaged), Err(Error::MalformedEndMarker)));

    // shorter than header + end marker
    assert!(matches!(
        decode_to_vec(&encoded[..QOI_HEADER_SIZE + 3]),
        Err(Error::UnexpectedEndOfStream)
    ));

    // chunks run out before all pixels are decoded
    let data = qoi_stream(2, 1, 3, &[0x55]);
    assert!(matches!(decode_to_vec(&data), Err(Error::UnexpectedEndOfStream)));

    // literal cut short by the end marker
    let data = qoi_stream(1, 1, 4, &[QOI_OP_RGBA, 1, 2]);
    assert!(matches!(decode_to_vec(&data), Err(Error::UnexpectedEndOfStream)));
    Ok(())
}

#[test]
fn test_pixel_count_mismatch() {
    // run overshoots the image
    let data = qoi_stream(2, 1, 3, &[0xc2]);
    assert!(matches!(decode_to_vec(&data), Err(Error::PixelCountMismatch { expected: 2 })));

    // chunks left over once the image is complete
    let data = qoi_stream(1, 1, 3, &[0x55, 0x55]);
    assert!(matches!(decode_to_vec(&data), Err(Error::PixelCountMismatch { expected: 1 })));
}
