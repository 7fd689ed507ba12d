//! WS2812 pulse widths expressed as timer compare values.
//!
//! The timer runs with a fixed reload value whose period is one WS2812
//! bit (about 1.25 µs for the 800 kHz parts). A 0-bit is a high pulse of
//! roughly 32 % of that period and a 1-bit roughly 64 %.

/// Bits sent per LED (8 each for G, R, B).
pub const BITS_PER_LED: usize = 24;
/// Default number of zero slots appended after the color data.
///
/// 200 slots of 1.25 µs hold the line low for 250 µs, enough for the
/// 50 µs latch of the original WS2812 and the longer one of WS2812B parts.
pub const RESET_SLOTS: usize = 200;
/// WS2812 minimum latch time in ns.
pub const MIN_RESET_NS: u32 = 50_000;
/// WS2812 bit period in ns at 800 kHz.
pub const FRAME_NS: u32 = 1250;

/// 0-bit high time as a percentage of the bit period.
const SHORT_PERCENT: u32 = 32;
/// 1-bit high time as a percentage of the bit period.
const LONG_PERCENT: u32 = 64;

/// Length of a waveform buffer for `leds` LEDs with the default reset tail.
pub const fn buffer_len(leds: usize) -> usize {
    leds * BITS_PER_LED + RESET_SLOTS
}

/// Minimum number of reset slots so that `slots * bit_period_ns >= reset_ns`.
pub const fn reset_slots_for(bit_period_ns: u32, reset_ns: u32) -> usize {
    reset_ns.div_ceil(bit_period_ns) as usize
}

/// Compare values driving the PWM output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Timer reload (auto-reload / counter top) value, one bit period.
    pub reload: u16,
    /// Compare value for a 0-bit.
    pub short: u16,
    /// Compare value for a 1-bit.
    pub long: u16,
    /// Mask OR-ed into every emitted word.
    ///
    /// Zero for timers with a plain compare register. nRF PWM decoders
    /// read bit 15 as the edge polarity and need `0x8000` here.
    pub polarity: u16,
    /// Duration of one reload period in ns.
    pub bit_period_ns: u32,
}

impl Timing {
    /// Derive the pulse widths from the timer reload value, assuming the
    /// reload period is the nominal 1.25 µs.
    pub const fn from_reload(reload: u16) -> Self {
        assert!(reload >= 4, "reload too small to encode two pulse widths");
        let short = (reload as u32 * SHORT_PERCENT / 100) as u16;
        let long = (reload as u32 * LONG_PERCENT / 100) as u16;
        Self {
            reload,
            short,
            long,
            polarity: 0,
            bit_period_ns: FRAME_NS,
        }
    }

    /// Derive the reload value from the timer clock and the bit period.
    pub const fn from_clock(timer_hz: u32, bit_period_ns: u32) -> Self {
        let ticks = (timer_hz as u64 * bit_period_ns as u64 + 500_000_000) / 1_000_000_000;
        assert!(ticks <= u16::MAX as u64, "bit period does not fit a 16-bit timer");
        Self {
            bit_period_ns,
            ..Self::from_reload(ticks as u16)
        }
    }

    /// Same timing with `mask` set in every emitted word.
    pub const fn with_polarity(self, mask: u16) -> Self {
        assert!(
            mask & self.reload == 0,
            "polarity mask overlaps the compare range"
        );
        Self {
            polarity: mask,
            ..self
        }
    }

    /// Word emitted for one data bit.
    #[inline(always)]
    pub const fn word(&self, bit: bool) -> u16 {
        if bit {
            self.long | self.polarity
        } else {
            self.short | self.polarity
        }
    }

    /// Time to stream `words` compare values.
    pub const fn stream_ns(&self, words: usize) -> u64 {
        words as u64 * self.bit_period_ns as u64
    }

    /// Reset slots needed to hold the line low for the WS2812 latch time.
    pub const fn min_reset_slots(&self) -> usize {
        reset_slots_for(self.bit_period_ns, MIN_RESET_NS)
    }

    /// Word that holds the line low for a full period.
    #[inline(always)]
    pub const fn idle(&self) -> u16 {
        self.polarity
    }
}

/// STM32 TIM1 on a 108 MHz APB2 clock, prescaler 0, ARR = 135.
impl Default for Timing {
    fn default() -> Self {
        Self::from_reload(135)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_widths_follow_reload() {
        let t = Timing::from_reload(135);
        assert_eq!(t.short, 43);
        assert_eq!(t.long, 86);
        assert_eq!(t.polarity, 0);
        assert_eq!(t.bit_period_ns, 1250);
        assert_eq!(t.min_reset_slots(), 40);
        assert!(t.short < t.long && t.long <= t.reload);
    }

    #[test]
    fn nrf_pwm_clock() {
        // 16 MHz PWM clock, 1.25 µs frame.
        let t = Timing::from_clock(16_000_000, 1250).with_polarity(0x8000);
        assert_eq!(t.reload, 20);
        assert_eq!(t.bit_period_ns, 1250);
        assert_eq!(t.short, 6);
        assert_eq!(t.long, 12);
        assert_eq!(t.word(false), 0x8006);
        assert_eq!(t.word(true), 0x800c);
        assert_eq!(t.idle(), 0x8000);
    }

    #[test]
    fn default_reset_tail_covers_latch() {
        let min = reset_slots_for(1250, MIN_RESET_NS);
        assert_eq!(min, 40);
        assert!(RESET_SLOTS >= min);
        assert_eq!(reset_slots_for(1280, MIN_RESET_NS), 40);
        assert_eq!(reset_slots_for(1000, 50_001), 51);
    }

    #[test]
    fn faster_bit_period_needs_more_reset_slots() {
        let t = Timing::from_clock(16_000_000, 1000);
        assert_eq!(t.reload, 16);
        assert_eq!(t.min_reset_slots(), 50);
        assert_eq!(t.stream_ns(buffer_len(2000)), 48_200_000);
    }

    #[test]
    fn buffer_len_counts_bits_and_tail() {
        assert_eq!(buffer_len(0), RESET_SLOTS);
        assert_eq!(buffer_len(4), 4 * 24 + 200);
    }
}
