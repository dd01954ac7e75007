use crate::consts::QOI_INDEX_SIZE;
use crate::pixel::Pixel;

/// The 64-slot running index of recently seen pixels.
///
/// Encoder and decoder must apply exactly the same updates in the same order,
/// otherwise index chunks resolve to different colors on either side.
#[derive(Clone, Debug)]
pub struct RunningIndex {
    slots: [Pixel; QOI_INDEX_SIZE],
}

impl RunningIndex {
    #[inline]
    pub const fn new() -> Self {
        Self { slots: [Pixel::ZERO; QOI_INDEX_SIZE] }
    }

    #[inline]
    pub fn get(&self, slot: u8) -> Pixel {
        self.slots[usize::from(slot) % QOI_INDEX_SIZE]
    }

    /// Returns the slot of `px` if it currently holds exactly `px`.
    ///
    /// Slots are compared by value, so two colors sharing a hash never alias.
    #[inline]
    pub fn find(&self, px: Pixel) -> Option<u8> {
        let slot = px.hash_index();
        (self.get(slot) == px).then_some(slot)
    }

    /// Stores `px` in its slot, evicting whatever was there.
    #[inline]
    pub fn insert(&mut self, px: Pixel) {
        self.slots[usize::from(px.hash_index())] = px;
    }
}

impl Default for RunningIndex {
    fn default() -> Self {
        Self::new()
    }
}
