//! Transfer-in-progress state shared with the completion interrupt.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Identifies the peripheral instance a completion interrupt came from.
///
/// Platforms that share one interrupt line between several timers pass
/// the id of the timer that finished; the signal ignores other ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InstanceId(pub u8);

/// Busy flag plus wakeup for a task waiting on the current transfer.
///
/// Lives in a `static` so both the driver and the interrupt handler can
/// reach it:
///
/// ```ignore
/// static STRIP_DONE: TransferSignal = TransferSignal::new(InstanceId(1));
///
/// #[interrupt]
/// fn TIM1_UP() {
///     STRIP_DONE.complete(InstanceId(1), || TIM1.ccr(0).write(|w| w.set_ccr(0)));
/// }
/// ```
pub struct TransferSignal {
    instance: InstanceId,
    busy: AtomicBool,
    done: Signal<CriticalSectionRawMutex, ()>,
}

impl TransferSignal {
    pub const fn new(instance: InstanceId) -> Self {
        Self {
            instance,
            busy: AtomicBool::new(false),
            done: Signal::new(),
        }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Whether a transfer is armed and has not completed.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Report a finished transfer from interrupt context.
    ///
    /// `force_low` must set the compare value to zero so the line idles
    /// low even if the last word was a long pulse. Returns `false`, doing
    /// nothing, when `source` is another instance or no transfer is armed.
    pub fn complete(&self, source: InstanceId, force_low: impl FnOnce()) -> bool {
        if source != self.instance || !self.is_busy() {
            return false;
        }
        force_low();
        self.busy.store(false, Ordering::Release);
        self.done.signal(());
        true
    }

    /// Claim the transfer engine. Only the owning driver calls this, and
    /// only after observing the flag clear.
    pub(crate) fn claim(&self) {
        self.done.reset();
        self.busy.store(true, Ordering::Release);
    }

    /// Drop the busy state without a completion interrupt.
    pub(crate) fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Give up on an aborted transfer. A completion that still arrives for
    /// it finds the flag clear and is dropped.
    pub(crate) fn abandon(&self) {
        self.release();
        self.done.reset();
    }

    /// Resolves once a completion has been signaled since the last claim.
    pub(crate) async fn wait(&self) {
        self.done.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn completion_clears_busy_and_forces_low() {
        let sig = TransferSignal::new(InstanceId(1));
        sig.claim();
        assert!(sig.is_busy());

        let forced = Cell::new(false);
        assert!(sig.complete(InstanceId(1), || forced.set(true)));
        assert!(forced.get());
        assert!(!sig.is_busy());
    }

    #[test]
    fn foreign_instance_is_ignored() {
        let sig = TransferSignal::new(InstanceId(1));
        sig.claim();

        let forced = Cell::new(false);
        assert!(!sig.complete(InstanceId(8), || forced.set(true)));
        assert!(!forced.get());
        assert!(sig.is_busy());
    }

    #[test]
    fn completion_without_armed_transfer_is_dropped() {
        let sig = TransferSignal::new(InstanceId(1));
        sig.claim();
        sig.abandon();

        let forced = Cell::new(false);
        assert!(!sig.complete(InstanceId(1), || forced.set(true)));
        assert!(!forced.get());
        assert!(!sig.is_busy());
    }

    #[test]
    fn waiter_sees_completion_signaled_before_it_waits() {
        let sig = TransferSignal::new(InstanceId(0));
        sig.claim();
        sig.complete(InstanceId(0), || {});
        embassy_futures::block_on(sig.wait());
    }
}
