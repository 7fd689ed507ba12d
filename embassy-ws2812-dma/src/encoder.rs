//! Pixel store to PWM compare values.

use crate::pixels::PixelStore;
use crate::timing::{BITS_PER_LED, Timing};

/// Encode every pixel into `buf`, one compare value per bit, MSB first in
/// G, R, B order, then fill the rest of `buf` with the idle word.
///
/// `buf` must hold at least `LEDS * 24` words; the controller checks this
/// at compile time.
pub fn encode<const LEDS: usize>(pixels: &PixelStore<LEDS>, buf: &mut [u16], timing: &Timing) {
    let (data, reset) = buf.split_at_mut(LEDS * BITS_PER_LED);
    for (grb, locs) in pixels.wire().iter().zip(data.chunks_exact_mut(BITS_PER_LED)) {
        let color = ((grb[0] as u32) << 16) | ((grb[1] as u32) << 8) | (grb[2] as u32);
        for (i, loc) in locs.iter_mut().enumerate() {
            let bit = (color >> (BITS_PER_LED - i - 1)) & 1;
            *loc = timing.word(bit != 0);
        }
    }
    reset.fill(timing.idle());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{RESET_SLOTS, buffer_len};
    use rgb::RGB8;

    const LEDS: usize = 4;
    const N: usize = buffer_len(LEDS);
    const T: Timing = Timing::from_reload(135);

    fn encoded(px: &PixelStore<LEDS>) -> [u16; N] {
        let mut buf = [0xffff; N];
        encode(px, &mut buf, &T);
        buf
    }

    #[test]
    fn all_off_is_short_pulses_then_zero_tail() {
        let buf = encoded(&PixelStore::new());
        assert!(buf[..LEDS * 24].iter().all(|&w| w == T.short));
        assert!(buf[LEDS * 24..].iter().all(|&w| w == 0));
        assert_eq!(buf.len() - LEDS * 24, RESET_SLOTS);
    }

    #[test]
    fn channels_go_out_green_red_blue_msb_first() {
        let mut px = PixelStore::new();
        px.set(1, RGB8::new(0b1000_0001, 0b0101_0000, 0b0000_0011));
        let buf = encoded(&px);

        let led = &buf[24..48];
        let bits: [u8; 3] = core::array::from_fn(|ch| {
            led[ch * 8..ch * 8 + 8]
                .iter()
                .fold(0u8, |acc, &w| (acc << 1) | (w == T.long) as u8)
        });
        assert_eq!(bits, [0b0101_0000, 0b1000_0001, 0b0000_0011]);
        assert!(led.iter().all(|&w| w == T.short || w == T.long));
    }

    #[test]
    fn pure_red_on_first_led() {
        let mut px = PixelStore::new();
        px.set(0, RGB8::new(255, 0, 0));
        let buf = encoded(&px);

        assert!(buf[0..8].iter().all(|&w| w == T.short));
        assert!(buf[8..16].iter().all(|&w| w == T.long));
        assert!(buf[16..24].iter().all(|&w| w == T.short));
        assert!(buf[24..LEDS * 24].iter().all(|&w| w == T.short));
        assert!(buf[LEDS * 24..].iter().all(|&w| w == 0));
    }

    #[test]
    fn encoding_is_deterministic() {
        let mut px = PixelStore::new();
        px.set(0, RGB8::new(12, 200, 7));
        px.set(3, RGB8::new(255, 255, 255));
        assert_eq!(encoded(&px), encoded(&px));
    }

    #[test]
    fn tail_carries_polarity_mask() {
        let t = Timing::from_reload(20).with_polarity(0x8000);
        let mut px = PixelStore::<1>::new();
        px.set(0, RGB8::new(0, 0, 1));
        let mut buf = [0u16; 30];
        encode(&px, &mut buf, &t);

        assert_eq!(buf[0], 0x8000 | t.short);
        assert_eq!(buf[23], 0x8000 | t.long);
        assert!(buf[24..].iter().all(|&w| w == 0x8000));
    }
}
