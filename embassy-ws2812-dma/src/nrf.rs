//! nRF52 `PWM0` as a [`PwmDma`] engine.
//!
//! The PWM peripheral fetches its duty cycles through EasyDMA, one word
//! per PWM period, so a single sequence playback streams the whole
//! waveform. Bit 15 of every word selects the edge polarity; use
//! [`TIMING`] which sets it.
//!
//! The application owns the interrupt vector and forwards it:
//!
//! ```ignore
//! static DONE: TransferSignal = TransferSignal::new(nrf::PWM0_ID);
//!
//! #[interrupt]
//! fn PWM0() {
//!     nrf::on_interrupt(&DONE);
//! }
//! ```

use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::{Peri, gpio, pac, peripherals, pwm};

use crate::hal::PwmDma;
use crate::signal::{InstanceId, TransferSignal};
use crate::timing::{FRAME_NS, Timing};

/// PWM clock in Hz.
const PWM_CLOCK: u32 = 16_000_000;

/// 16 MHz PWM clock, 1.25 µs frame, rising-edge polarity.
pub const TIMING: Timing = Timing::from_clock(PWM_CLOCK, FRAME_NS).with_polarity(0x8000);

/// Instance id reported by [`on_interrupt`].
pub const PWM0_ID: InstanceId = InstanceId(0);

/// Error starting a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pwm0Error {
    /// EasyDMA only reads from RAM.
    BufferNotInRam,
    /// The sequence counter is 15 bits wide.
    SequenceTooLong,
}

/// `PWM0` driving one output pin, configured for WS2812 frames.
pub struct Pwm0Dma {
    // Keeps the counter, prescaler and pin routing alive.
    _pwm: pwm::SequencePwm<'static>,
    // A sequence was started and STOPPED has not been observed since.
    running: bool,
}

impl Pwm0Dma {
    /// Configure `PWM0` on `pin` and enable its sequence-end interrupt.
    pub fn new<P: gpio::Pin>(pwm: Peri<'static, peripherals::PWM0>, pin: Peri<'static, P>) -> Self {
        let mut config = pwm::Config::default();
        config.counter_mode = pwm::CounterMode::Up;
        config.max_duty = TIMING.reload;
        config.prescaler = pwm::Prescaler::Div1;
        config.sequence_load = pwm::SequenceLoad::Common;
        config.ch0_drive = gpio::OutputDrive::HighDrive0Standard1;
        let pwm = pwm::SequencePwm::new_1ch(pwm, pin, config).expect("to create sequence PWM");

        let r = pac::PWM0;
        r.events_seqend(0).write_value(0);
        r.events_stopped().write_value(0);
        r.intenset().write(|w| w.set_seqend(0, true));
        interrupt::PWM0.unpend();
        interrupt::PWM0.set_priority(Priority::P3);
        // SAFETY: the handler only touches PWM0 registers and the signal.
        unsafe { interrupt::PWM0.enable() };

        Self { _pwm: pwm, running: false }
    }

    /// Stop playback and wait until the peripheral reports it.
    ///
    /// STOP only takes effect at the end of the current PWM period, and
    /// the completion interrupt may already have issued it.
    fn halt(&mut self) {
        if !self.running {
            return;
        }
        let r = pac::PWM0;
        if r.events_stopped().read() == 0 {
            r.tasks_stop().write_value(1);
            while r.events_stopped().read() == 0 {
                core::hint::spin_loop();
            }
        }
        r.events_stopped().write_value(0);
        self.running = false;
    }
}

impl PwmDma for Pwm0Dma {
    type Error = Pwm0Error;

    /// The nRF PWM has no standalone compare register, so `value` is
    /// ignored. The peripheral is stopped instead, which returns the pin to
    /// its GPIO idle level (low). Returns once STOPPED has been observed.
    fn set_compare(&mut self, _value: u16) {
        self.halt();
    }

    fn start_transfer(&mut self, words: &[u16]) -> Result<(), Self::Error> {
        let ptr = words.as_ptr() as u32;
        if !(0x2000_0000..0x4000_0000).contains(&ptr) {
            return Err(Pwm0Error::BufferNotInRam);
        }
        if words.len() > 0x7fff {
            return Err(Pwm0Error::SequenceTooLong);
        }

        self.halt();
        let r = pac::PWM0;
        r.seq(0).ptr().write_value(ptr);
        r.seq(0).cnt().write(|w| w.0 = words.len() as u32);
        r.seq(0).refresh().write(|w| w.0 = 0);
        r.seq(0).enddelay().write(|w| w.0 = 0);
        r.events_seqend(0).write_value(0);
        r.events_stopped().write_value(0);
        self.running = true;
        r.tasks_seqstart(0).write_value(1);
        Ok(())
    }

    fn abort_transfer(&mut self) {
        self.halt();
        // Drop a SEQEND that raced the stop so it cannot complete the next
        // transfer.
        pac::PWM0.events_seqend(0).write_value(0);
        interrupt::PWM0.unpend();
    }
}

/// Forward the `PWM0` interrupt to `signal`.
pub fn on_interrupt(signal: &TransferSignal) {
    let r = pac::PWM0;
    if r.events_seqend(0).read() != 0 {
        r.events_seqend(0).write_value(0);
        signal.complete(PWM0_ID, || r.tasks_stop().write_value(1));
    }
}
