/// Timer PWM channel whose compare register is fed by DMA.
///
/// The timer must already run with a reload value matching
/// [`Timing::reload`](crate::Timing::reload), one WS2812 bit per period.
/// Completion is not reported through this trait: the transfer-complete
/// interrupt calls [`TransferSignal::complete`](crate::TransferSignal::complete).
pub trait PwmDma {
    type Error;

    /// Write the compare register directly.
    fn set_compare(&mut self, value: u16);

    /// Arm a transfer that loads one word of `words` into the compare
    /// register per timer period, then return without waiting.
    ///
    /// The driver does not write `words` again until completion has been
    /// signaled or the transfer has been aborted.
    fn start_transfer(&mut self, words: &[u16]) -> Result<(), Self::Error>;

    /// Stop a transfer that never reported completion.
    ///
    /// On return the engine no longer reads the `words` passed to the last
    /// [`start_transfer`](Self::start_transfer), and no completion for that
    /// transfer is pending or will be raised.
    fn abort_transfer(&mut self);
}

impl<T: PwmDma + ?Sized> PwmDma for &mut T {
    type Error = T::Error;

    #[inline]
    fn set_compare(&mut self, value: u16) {
        T::set_compare(self, value)
    }

    #[inline]
    fn start_transfer(&mut self, words: &[u16]) -> Result<(), Self::Error> {
        T::start_transfer(self, words)
    }

    #[inline]
    fn abort_transfer(&mut self) {
        T::abort_transfer(self)
    }
}
