//! Use WS2812 LEDs (aka Neopixel) with a timer PWM channel fed by DMA and
//! the embassy ecosystem.
//!
//! Colors are staged in a [`PixelStore`], encoded into one timer compare
//! value per bit, and streamed by the DMA engine into the compare
//! register while the CPU does other work. A reset tail of idle words
//! latches the colors. The transfer-complete interrupt reports back
//! through a [`TransferSignal`].
//!
//! This crate is intended for usage with the `smart-leds` crate: it
//! implements the `SmartLedsWriteAsync` trait.
//!
//! ```ignore
//! static DONE: TransferSignal = TransferSignal::new(InstanceId(0));
//! static BUF: StaticCell<[u16; buffer_len(8)]> = StaticCell::new();
//!
//! let buf = BUF.init(ws2812_buffer!(8));
//! let mut ws: Ws2812Dma<_, 8, { buffer_len(8) }> = Ws2812Dma::new(pwm, &DONE, buf, Config::default());
//! ws.initialize().await?;
//! ws.set_pixel(0, 255, 0, 0);
//! ws.show().await?;
//! ```

#![no_std]

mod encoder;
mod error;
mod hal;
#[cfg(feature = "nrf")]
pub mod nrf;
mod pixels;
mod signal;
mod strip;
mod timing;

pub use encoder::encode;
pub use error::Error;
pub use hal::PwmDma;
pub use pixels::PixelStore;
pub use rgb::RGB8;
pub use signal::{InstanceId, TransferSignal};
pub use strip::{Config, Ws2812Dma};
pub use timing::{BITS_PER_LED, FRAME_NS, MIN_RESET_NS, RESET_SLOTS, Timing, buffer_len, reset_slots_for};

/// A zeroed waveform buffer for `$leds` LEDs with the default reset tail.
#[macro_export]
macro_rules! ws2812_buffer {
    ($leds:expr) => {
        [0u16; $crate::buffer_len($leds)]
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn buffer_macro_size() {
        let buf = ws2812_buffer!(4);
        assert_eq!(buf.len(), 4 * 24 + 200);
        assert!(buf.iter().all(|&w| w == 0));
    }
}
