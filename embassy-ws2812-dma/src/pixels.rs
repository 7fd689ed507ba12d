use rgb::RGB8;

use crate::error::Error;

/// Colors of a fixed-length chain, stored in WS2812 wire order (G, R, B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelStore<const LEDS: usize> {
    grb: [[u8; 3]; LEDS],
}

impl<const LEDS: usize> PixelStore<LEDS> {
    /// All pixels off.
    pub const fn new() -> Self {
        Self {
            grb: [[0; 3]; LEDS],
        }
    }

    /// Number of LEDs in the chain.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        LEDS
    }

    /// True for a zero-length chain.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        LEDS == 0
    }

    /// Stage a color. An index past the end of the chain is ignored.
    #[inline]
    pub fn set(&mut self, index: usize, color: RGB8) {
        if let Some(slot) = self.grb.get_mut(index) {
            *slot = [color.g, color.r, color.b];
        }
    }

    /// Stage a color, reporting an index past the end of the chain.
    pub fn try_set(&mut self, index: usize, color: RGB8) -> Result<(), Error> {
        let slot = self
            .grb
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len: LEDS })?;
        *slot = [color.g, color.r, color.b];
        Ok(())
    }

    /// Color at `index`, in RGB order.
    pub fn get(&self, index: usize) -> Option<RGB8> {
        self.grb.get(index).map(|&[g, r, b]| RGB8::new(r, g, b))
    }

    /// Color at `index` as stored, in wire order `[g, r, b]`.
    pub fn raw(&self, index: usize) -> Option<[u8; 3]> {
        self.grb.get(index).copied()
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.grb = [[0; 3]; LEDS];
    }

    /// Stage `color` on every LED.
    pub fn fill(&mut self, color: RGB8) {
        self.grb = [[color.g, color.r, color.b]; LEDS];
    }

    /// Colors in chain order, RGB.
    pub fn iter(&self) -> impl Iterator<Item = RGB8> + '_ {
        self.grb.iter().map(|&[g, r, b]| RGB8::new(r, g, b))
    }

    /// Wire-order channel triples, one per LED.
    pub(crate) fn wire(&self) -> &[[u8; 3]; LEDS] {
        &self.grb
    }
}

impl<const LEDS: usize> Default for PixelStore<LEDS> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_in_wire_order() {
        let mut px = PixelStore::<4>::new();
        px.set(2, RGB8::new(1, 2, 3));
        assert_eq!(px.raw(2), Some([2, 1, 3]));
        assert_eq!(px.get(2), Some(RGB8::new(1, 2, 3)));
        assert_eq!(px.raw(0), Some([0, 0, 0]));
    }

    #[test]
    fn out_of_range_set_is_ignored() {
        let mut px = PixelStore::<4>::new();
        px.set(1, RGB8::new(9, 8, 7));
        let before = px.clone();

        px.set(4, RGB8::new(255, 255, 255));
        px.set(usize::MAX, RGB8::new(255, 255, 255));

        assert_eq!(px, before);
        assert_eq!(px.get(4), None);
    }

    #[test]
    fn try_set_reports_bad_index() {
        let mut px = PixelStore::<4>::new();
        assert_eq!(px.try_set(3, RGB8::new(1, 1, 1)), Ok(()));
        assert_eq!(
            px.try_set(4, RGB8::new(1, 1, 1)),
            Err(Error::IndexOutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn clear_and_fill() {
        let mut px = PixelStore::<3>::new();
        px.fill(RGB8::new(10, 20, 30));
        assert!(px.iter().all(|c| c == RGB8::new(10, 20, 30)));
        assert_eq!(px.raw(1), Some([20, 10, 30]));

        px.clear();
        assert_eq!(px, PixelStore::new());
        assert_eq!(px.len(), 3);
    }
}
