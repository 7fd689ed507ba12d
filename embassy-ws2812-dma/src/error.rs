use core::convert::Infallible;

/// Error during WS2812 driver operation.
///
/// `E` is the error type of the [`PwmDma`](crate::PwmDma) implementation.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E = Infallible> {
    /// The PWM/DMA engine refused to start the transfer.
    Pwm(E),
    /// The previous transfer never reported completion.
    ///
    /// The busy state has been released and the line forced low; the
    /// next `show` starts a fresh transfer.
    TransferTimeout,
    /// Pixel index past the end of the chain.
    IndexOutOfRange { index: usize, len: usize },
}

impl<E> Error<E> {
    /// Re-tag an error that cannot carry a PWM error.
    pub(crate) fn widen(err: Error) -> Self {
        match err {
            Error::Pwm(never) => match never {},
            Error::TransferTimeout => Error::TransferTimeout,
            Error::IndexOutOfRange { index, len } => Error::IndexOutOfRange { index, len },
        }
    }
}

impl<E: core::fmt::Debug> core::fmt::Debug for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Pwm(err) => write!(f, "pwm error: {:?}", err),
            Error::TransferTimeout => write!(f, "transfer timed out"),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "pixel index {} out of range (len {})", index, len)
            }
        }
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}
