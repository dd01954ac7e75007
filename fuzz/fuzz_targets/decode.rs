#![no_main]
use libfuzzer_sys::fuzz_target;

use qoi::{decode_header, decode_to_vec, Channels, ColorSpace, Header};

fuzz_target!(|input: (u16, u16, bool, &[u8])| {
    let (w, h, is_4, data) = input;
    let (w, h) = (1 + w % 260, 1 + h % 260);
    let channels = if is_4 { 4 } else { 3 };

    let mut vec = b"qoif".to_vec();
    vec.extend((w as u32).to_be_bytes());
    vec.extend((h as u32).to_be_bytes());
    vec.extend([channels, 0]);
    vec.extend(data);
    vec.extend([0, 0, 0, 0, 0, 0, 0, 1]);

    let header_expected = Header {
        width: w as u32,
        height: h as u32,
        channels: Channels::try_from(channels).unwrap(),
        colorspace: ColorSpace::Srgb,
    };
    assert_eq!(decode_header(&vec).unwrap(), header_expected);

    if let Ok((header, out)) = decode_to_vec(&vec) {
        assert_eq!(header, header_expected);
        assert_eq!(out.len(), header.n_bytes());
    }

    // arbitrary bytes must be rejected cleanly, never panic
    let _ = decode_to_vec(data);
});
