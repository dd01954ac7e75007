use crate::consts::QOI_INDEX_SIZE;

/// An RGBA pixel; three-channel images carry an implicit alpha of 255.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[repr(transparent)]
pub struct Pixel([u8; 4]);

impl Pixel {
    /// All-zero pixel, the initial state of every running index slot.
    pub const ZERO: Self = Self([0; 4]);

    /// The "previous pixel" every stream starts from.
    pub const START: Self = Self([0, 0, 0, 0xff]);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Reads RGB or RGBA components; alpha defaults to 255.
    #[inline]
    pub const fn from_array<const N: usize>(arr: [u8; N]) -> Self {
        let mut i = 0;
        let mut out = Self::START;
        while i < N && i < 4 {
            out.0[i] = arr[i];
            i += 1;
        }
        out
    }

    /// Takes the first `N` components (alpha is dropped when `N == 3`).
    #[inline]
    pub const fn to_array<const N: usize>(self) -> [u8; N] {
        let mut i = 0;
        let mut out = [0; N];
        while i < N && i < 4 {
            out[i] = self.0[i];
            i += 1;
        }
        out
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0[3]
    }

    #[inline]
    pub const fn with_rgb(mut self, r: u8, g: u8, b: u8) -> Self {
        self.0[0] = r;
        self.0[1] = g;
        self.0[2] = b;
        self
    }

    /// Running index slot: `(r * 3 + g * 5 + b * 7 + a * 11) % 64`.
    #[inline]
    pub const fn hash_index(self) -> u8 {
        let r = self.r().wrapping_mul(3);
        let g = self.g().wrapping_mul(5);
        let b = self.b().wrapping_mul(7);
        let a = self.a().wrapping_mul(11);
        r.wrapping_add(g).wrapping_add(b).wrapping_add(a) % (QOI_INDEX_SIZE as u8)
    }

    /// Adds wrapping deltas to the color components, keeping alpha.
    #[inline]
    pub const fn rgb_add(self, r: u8, g: u8, b: u8) -> Self {
        self.with_rgb(
            self.r().wrapping_add(r),
            self.g().wrapping_add(g),
            self.b().wrapping_add(b),
        )
    }
}
