use embassy_time::{Duration, Instant, with_deadline};
use rgb::RGB8;
use smart_leds_trait::SmartLedsWriteAsync;

use crate::encoder::encode;
use crate::error::Error;
use crate::hal::PwmDma;
use crate::pixels::PixelStore;
use crate::signal::TransferSignal;
use crate::timing::{BITS_PER_LED, FRAME_NS, MIN_RESET_NS, Timing, reset_slots_for};

/// Driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Compare values for the timer the PWM channel runs on.
    pub timing: Timing,
    /// Grace period on top of the frame's own streaming time before
    /// `show` gives up on the previous transfer.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            timeout: Duration::from_millis(50),
        }
    }
}

/// Driver for a chain of `LEDS` WS2812-family devices on one PWM channel
/// fed by DMA.
///
/// `N` is the waveform buffer length: 24 words per LED plus the reset
/// tail. [`buffer_len`](crate::buffer_len) gives the default.
pub struct Ws2812Dma<P, const LEDS: usize, const N: usize> {
    pwm: P,
    signal: &'static TransferSignal,
    buf: &'static mut [u16; N],
    pixels: PixelStore<LEDS>,
    config: Config,
}

impl<P: PwmDma, const LEDS: usize, const N: usize> Ws2812Dma<P, LEDS, N> {
    /// Set up the chain. Nothing is transmitted until
    /// [`initialize`](Self::initialize) or [`show`](Self::show).
    pub fn new(
        pwm: P,
        signal: &'static TransferSignal,
        buf: &'static mut [u16; N],
        config: Config,
    ) -> Self {
        const {
            assert!(
                N >= LEDS * BITS_PER_LED + reset_slots_for(FRAME_NS, MIN_RESET_NS),
                "buffer must hold 24 words per LED plus a 50 µs reset tail"
            );
        }
        let timing = &config.timing;
        assert!(
            timing.short < timing.long && timing.long <= timing.reload,
            "pulse widths must fit inside the reload period"
        );
        assert!(
            N - LEDS * BITS_PER_LED >= timing.min_reset_slots(),
            "reset tail shorter than 50 µs at this bit period"
        );

        Self {
            pwm,
            signal,
            buf,
            pixels: PixelStore::new(),
            config,
        }
    }

    /// Turn every LED off and send that state once.
    pub async fn initialize(&mut self) -> Result<(), Error<P::Error>> {
        self.pixels.clear();
        self.show().await
    }

    /// Stage a color. An index past the end of the chain is ignored.
    #[inline]
    pub fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8) {
        self.pixels.set(index, RGB8::new(r, g, b));
    }

    /// Stage a color, reporting an index past the end of the chain.
    pub fn try_set_pixel(&mut self, index: usize, color: RGB8) -> Result<(), Error<P::Error>> {
        self.pixels.try_set(index, color).map_err(Error::widen)
    }

    /// Staged color at `index`, in RGB order.
    pub fn pixel(&self, index: usize) -> Option<RGB8> {
        self.pixels.get(index)
    }

    /// Stage every LED off without transmitting.
    pub fn clear(&mut self) {
        self.pixels.clear();
    }

    /// Staged colors.
    pub fn pixels(&self) -> &PixelStore<LEDS> {
        &self.pixels
    }

    /// Staged colors, for bulk edits before the next `show`.
    pub fn pixels_mut(&mut self) -> &mut PixelStore<LEDS> {
        &mut self.pixels
    }

    /// The waveform last handed to the transfer engine.
    pub fn buffer(&self) -> &[u16; N] {
        &*self.buf
    }

    /// Whether the last transfer has not reported completion yet.
    pub fn is_busy(&self) -> bool {
        self.signal.is_busy()
    }

    /// Configuration the driver was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send the staged colors.
    ///
    /// Waits for a transfer still in flight, re-encodes the whole buffer
    /// and arms the next transfer. Returns as soon as the transfer is
    /// armed, not when it finishes.
    pub async fn show(&mut self) -> Result<(), Error<P::Error>> {
        self.wait_idle().await?;
        self.signal.claim();

        encode(&self.pixels, &mut self.buf[..], &self.config.timing);

        let idle = self.config.timing.idle();
        self.pwm.set_compare(idle);
        if let Err(err) = self.pwm.start_transfer(&self.buf[..]) {
            #[cfg(feature = "defmt")]
            defmt::warn!("ws2812: transfer refused");
            self.pwm.set_compare(idle);
            self.signal.release();
            return Err(Error::Pwm(err));
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("ws2812: armed {} words for {} leds", N, LEDS);
        Ok(())
    }

    async fn wait_idle(&mut self) -> Result<(), Error<P::Error>> {
        if !self.signal.is_busy() {
            return Ok(());
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("ws2812: waiting for previous transfer");
        let frame = Duration::from_micros(self.config.timing.stream_ns(N).div_ceil(1000));
        let deadline = Instant::now() + frame + self.config.timeout;
        while self.signal.is_busy() {
            if with_deadline(deadline, self.signal.wait()).await.is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "ws2812: no completion after {} ms, releasing",
                    self.config.timeout.as_millis()
                );
                self.pwm.abort_transfer();
                self.pwm.set_compare(self.config.timing.idle());
                self.signal.abandon();
                return Err(Error::TransferTimeout);
            }
        }
        Ok(())
    }
}

impl<P: PwmDma, const LEDS: usize, const N: usize> SmartLedsWriteAsync for Ws2812Dma<P, LEDS, N> {
    type Error = Error<P::Error>;
    type Color = RGB8;

    /// Write all the items of an iterator to a WS2812 strip
    async fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for (index, item) in iterator.into_iter().take(LEDS).enumerate() {
            self.pixels.set(index, item.into());
        }
        self.show().await
    }
}
