//! Clock-loss notification slots and the interrupt entry point.

use super::clock_config::ClockErrorNotify;
use super::hw::ScgHardware;
use super::vals::MonitoredSource;
use super::Scg;

/// One optional callback per monitored source.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ErrorNotifiers {
    slots: [Option<ClockErrorNotify>; 5],
}

impl ErrorNotifiers {
    pub const fn new() -> Self {
        Self { slots: [None; 5] }
    }

    pub fn get(&self, src: MonitoredSource) -> Option<ClockErrorNotify> {
        self.slots[src.index()]
    }

    /// Overwrite the slot of `src` when loss is reported by interrupt.
    ///
    /// A monitor that resets the chip on clock loss never reaches the
    /// handler, so its slot is left as it was.
    pub fn install(
        &mut self,
        src: MonitoredSource,
        monitor: bool,
        reset_on_loss: bool,
        notify: Option<ClockErrorNotify>,
    ) {
        if monitor && !reset_on_loss {
            self.slots[src.index()] = notify;
        }
    }
}

impl<H: ScgHardware> Scg<H> {
    /// SCG clock-monitor interrupt handler.
    ///
    /// Reads and clears the loss flag of every monitored source in a fixed
    /// order and calls the registered callback of each one that fired.
    pub fn on_interrupt(&mut self) {
        for src in MonitoredSource::ALL {
            if !self.hw.check_and_clear_error(src) {
                continue;
            }
            match self.notifiers.get(src) {
                Some(notify) => notify(),
                None => warn!("scg: clock loss on {:?} with no handler", src),
            }
        }
    }
}
