#![allow(dead_code)]

pub fn hash<const N: usize>(px: [u8; N]) -> u8 {
    let r = px[0].wrapping_mul(3);
    let g = px[1].wrapping_mul(5);
    let b = px[2].wrapping_mul(7);
    let a = px.get(3).copied().unwrap_or(0xff).wrapping_mul(11);
    (r.wrapping_add(g).wrapping_add(b).wrapping_add(a)) % 64
}

/// Wraps a component difference into the signed 8-bit range.
fn wrap(v: i16) -> i16 {
    (v + 128).rem_euclid(256) - 128
}

/// Straight-line encoder with signed arithmetic and no code shared with the crate.
pub fn reference_encode(data: &[u8], width: u32, height: u32, channels: u8, colorspace: u8) -> Vec<u8> {
    let channels = channels as usize;
    let n_pixels = data.len() / channels;
    assert_eq!(n_pixels, width as usize * height as usize);

    let mut out = b"qoif".to_vec();
    out.extend(width.to_be_bytes());
    out.extend(height.to_be_bytes());
    out.push(channels as u8);
    out.push(colorspace);

    let mut index = [[0_u8; 4]; 64];
    let mut prev = [0_u8, 0, 0, 255];
    let mut run = 0_u8;

    for (i, c) in data.chunks_exact(channels).enumerate() {
        let px = if channels == 4 { [c[0], c[1], c[2], c[3]] } else { [c[0], c[1], c[2], 255] };
        if px == prev {
            run += 1;
            if run == 62 || i == n_pixels - 1 {
                out.push(0xc0 | (run - 1));
                run = 0;
            }
            continue;
        }
        if run > 0 {
            out.push(0xc0 | (run - 1));
            run = 0;
        }
        let h = hash(px) as usize;
        if index[h] == px {
            out.push(h as u8);
        } else {
            index[h] = px;
            if px[3] != prev[3] {
                out.extend([0xff, px[0], px[1], px[2], px[3]]);
            } else {
                let d = |k: usize| wrap(i16::from(px[k]) - i16::from(prev[k]));
                let (dr, dg, db) = (d(0), d(1), d(2));
                let (dr_dg, db_dg) = (wrap(dr - dg), wrap(db - dg));
                if [dr, dg, db].iter().all(|v| (-2..=1).contains(v)) {
                    out.push(0x40 | ((dr + 2) << 4 | (dg + 2) << 2 | (db + 2)) as u8);
                } else if (-32..=31).contains(&dg)
                    && (-8..=7).contains(&dr_dg)
                    && (-8..=7).contains(&db_dg)
                {
                    out.push(0x80 | (dg + 32) as u8);
                    out.push(((dr_dg + 8) << 4 | (db_dg + 8)) as u8);
                } else {
                    out.extend([0xfe, px[0], px[1], px[2]]);
                }
            }
        }
        prev = px;
    }

    out.extend([0, 0, 0, 0, 0, 0, 0, 1]);
    out
}

/// Builds a raw buffer out of RGBA pixels, dropping alpha when `channels == 3`.
pub fn raw(pixels: &[[u8; 4]], channels: usize) -> Vec<u8> {
    pixels.iter().flat_map(|px| px[..channels].to_vec()).collect()
}

/// Wraps a chunk stream in a header and end marker.
pub fn qoi_stream(width: u32, height: u32, channels: u8, chunks: &[u8]) -> Vec<u8> {
    let mut out = b"qoif".to_vec();
    out.extend(width.to_be_bytes());
    out.extend(height.to_be_bytes());
    out.extend([channels, 0]);
    out.extend(chunks);
    out.extend([0, 0, 0, 0, 0, 0, 0, 1]);
    out
}
