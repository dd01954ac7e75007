use crate::consts::{
    QOI_MASK_2, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN,
    QOI_RUN_MAX,
};
use crate::error::{Error, Result};
use crate::index::RunningIndex;
use crate::pixel::Pixel;

/// One encoded unit of the pixel stream.
///
/// Deltas are stored unbiased as wrapping `u8` differences from the previous
/// pixel; biasing happens only when reading/writing the wire bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Chunk {
    /// `00iiiiii`: pixel is the running index entry `i`.
    Index(u8),
    /// `01rrggbb`: each component differs by -2..=1, alpha unchanged.
    Diff { vr: u8, vg: u8, vb: u8 },
    /// `10gggggg rrrrbbbb`: green differs by -32..=31, red/blue by -8..=7 relative to green.
    Luma { vg: u8, vg_r: u8, vg_b: u8 },
    /// `11111110 r g b`: literal color, alpha unchanged.
    Rgb { r: u8, g: u8, b: u8 },
    /// `11111111 r g b a`: literal color and alpha.
    Rgba(Pixel),
    /// `11nnnnnn`: previous pixel repeated `n + 1` times (1..=62).
    Run(u8),
}

impl Chunk {
    /// Picks the chunk for a pixel that differs from the previous one.
    ///
    /// Rules are tried in order and the first match wins:
    /// index, diff, luma, then an RGB or RGBA literal. Runs are decided by the
    /// caller before this is reached.
    #[inline]
    pub fn select(px: Pixel, px_prev: Pixel, index: &RunningIndex) -> Self {
        if let Some(slot) = index.find(px) {
            return Self::Index(slot);
        }
        if px.a() != px_prev.a() {
            return Self::Rgba(px);
        }

        let vr = px.r().wrapping_sub(px_prev.r());
        let vg = px.g().wrapping_sub(px_prev.g());
        let vb = px.b().wrapping_sub(px_prev.b());

        let (vr_2, vg_2, vb_2) = (vr.wrapping_add(2), vg.wrapping_add(2), vb.wrapping_add(2));
        if vr_2 | vg_2 | vb_2 | 3 == 3 {
            return Self::Diff { vr, vg, vb };
        }

        let vg_r = vr.wrapping_sub(vg);
        let vg_b = vb.wrapping_sub(vg);
        let (vg_32, vg_r_8, vg_b_8) =
            (vg.wrapping_add(32), vg_r.wrapping_add(8), vg_b.wrapping_add(8));
        if vg_r_8 | vg_b_8 | 15 == 15 && vg_32 | 63 == 63 {
            return Self::Luma { vg, vg_r, vg_b };
        }

        Self::Rgb { r: px.r(), g: px.g(), b: px.b() }
    }

    /// Wire bytes of the chunk: a 5-byte scratch array and how much of it is used.
    #[inline]
    pub fn to_bytes(self) -> ([u8; 5], usize) {
        match self {
            Self::Index(slot) => ([QOI_OP_INDEX | slot, 0, 0, 0, 0], 1),
            Self::Diff { vr, vg, vb } => {
                let (vr_2, vg_2, vb_2) =
                    (vr.wrapping_add(2), vg.wrapping_add(2), vb.wrapping_add(2));
                ([QOI_OP_DIFF | vr_2 << 4 | vg_2 << 2 | vb_2, 0, 0, 0, 0], 1)
            }
            Self::Luma { vg, vg_r, vg_b } => {
                let (vg_32, vg_r_8, vg_b_8) =
                    (vg.wrapping_add(32), vg_r.wrapping_add(8), vg_b.wrapping_add(8));
                ([QOI_OP_LUMA | vg_32, vg_r_8 << 4 | vg_b_8, 0, 0, 0], 2)
            }
            Self::Rgb { r, g, b } => ([QOI_OP_RGB, r, g, b, 0], 4),
            Self::Rgba(px) => ([QOI_OP_RGBA, px.r(), px.g(), px.b(), px.a()], 5),
            Self::Run(run) => {
                debug_assert!((1..=QOI_RUN_MAX).contains(&run));
                ([QOI_OP_RUN | (run - 1), 0, 0, 0, 0], 1)
            }
        }
    }

    /// Parses the chunk at the start of `data`, returning it with the remaining bytes.
    ///
    /// Literal tags are matched on the whole byte before the 2-bit tag
    /// dispatch, since `0xfe`/`0xff` share their top bits with runs.
    #[inline]
    pub fn read(data: &[u8]) -> Result<(Self, &[u8])> {
        Ok(match *data {
            [QOI_OP_RGB, r, g, b, ref rest @ ..] => (Self::Rgb { r, g, b }, rest),
            [QOI_OP_RGBA, r, g, b, a, ref rest @ ..] => (Self::Rgba(Pixel::new(r, g, b, a)), rest),
            [b1, ref rest @ ..] if b1 & QOI_MASK_2 == QOI_OP_INDEX => {
                (Self::Index(b1 & !QOI_MASK_2), rest)
            }
            [b1, ref rest @ ..] if b1 & QOI_MASK_2 == QOI_OP_DIFF => {
                let vr = ((b1 >> 4) & 0x03).wrapping_sub(2);
                let vg = ((b1 >> 2) & 0x03).wrapping_sub(2);
                let vb = (b1 & 0x03).wrapping_sub(2);
                (Self::Diff { vr, vg, vb }, rest)
            }
            [b1, b2, ref rest @ ..] if b1 & QOI_MASK_2 == QOI_OP_LUMA => {
                let vg = (b1 & !QOI_MASK_2).wrapping_sub(32);
                let vg_r = (b2 >> 4).wrapping_sub(8);
                let vg_b = (b2 & 0x0f).wrapping_sub(8);
                (Self::Luma { vg, vg_r, vg_b }, rest)
            }
            [b1, ref rest @ ..] if b1 & QOI_MASK_2 == QOI_OP_RUN && b1 < QOI_OP_RGB => {
                (Self::Run((b1 & !QOI_MASK_2) + 1), rest)
            }
            _ => return Err(Error::UnexpectedEndOfStream),
        })
    }

    /// Reconstructs the pixel a non-run chunk stands for.
    #[inline]
    pub fn apply(self, px_prev: Pixel, index: &RunningIndex) -> Pixel {
        match self {
            Self::Index(slot) => index.get(slot),
            Self::Diff { vr, vg, vb } => px_prev.rgb_add(vr, vg, vb),
            Self::Luma { vg, vg_r, vg_b } => {
                px_prev.rgb_add(vg_r.wrapping_add(vg), vg, vg_b.wrapping_add(vg))
            }
            Self::Rgb { r, g, b } => px_prev.with_rgb(r, g, b),
            Self::Rgba(px) => px,
            Self::Run(_) => px_prev,
        }
    }

    /// Whether the pixel this chunk produces must be stored in the running index.
    #[inline]
    pub const fn updates_index(self) -> bool {
        !matches!(self, Self::Index(_) | Self::Run(_))
    }
}
