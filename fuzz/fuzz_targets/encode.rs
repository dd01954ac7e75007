#![no_main]
use libfuzzer_sys::fuzz_target;

use qoi::{decode_to_vec, encode_to_vec, encoded_size_limit, ColorSpace};

fuzz_target!(|input: (bool, u8, &[u8])| {
    let (is_4, w_frac, data) = input;
    let channels = if is_4 { 4 } else { 3 };
    let size = data.len();
    let n_pixels = size / channels as usize;
    let (w, h) = if n_pixels == 0 {
        (0, 0)
    } else {
        let w = ((n_pixels * (1 + w_frac as usize)) / 256).max(1);
        let h = n_pixels / w;
        (w, h)
    };
    let raw = &data[..(w * h * channels as usize)];
    let out = encode_to_vec(raw, w as u32, h as u32, channels, ColorSpace::Srgb);
    if w * h != 0 {
        let out = out.unwrap();
        assert!(out.len() <= encoded_size_limit(w as u32, h as u32, channels));
        let (header, decoded) = decode_to_vec(&out).unwrap();
        assert_eq!((header.width, header.height), (w as u32, h as u32));
        assert_eq!(decoded, raw);
    } else {
        assert!(out.is_err());
    }
});
