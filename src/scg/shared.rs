//! Shared, interrupt-safe SCG instance.

use core::cell::RefCell;

use critical_section::CriticalSection;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::hw::ScgHardware;
use super::Scg;

/// An [`Scg`] that can live in a `static` and be reached from the SCG
/// interrupt handler.
///
/// ```ignore
/// static SCG: SharedScg<MyScg> = SharedScg::new();
///
/// SCG.init(MyScg::take()).ok();
/// SCG.with(|scg| scg.configure_firc(&FircConfig::new()));
///
/// #[interrupt]
/// fn SCG() {
///     SCG.on_interrupt();
/// }
/// ```
pub struct SharedScg<H: ScgHardware> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<Scg<H>>>>,
}

impl<H: ScgHardware> SharedScg<H> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Install the hardware layer. Hands it back if already initialized.
    pub fn init(&self, hw: H) -> Result<(), H> {
        self.inner.lock(|cell| {
            let mut slot = cell.borrow_mut();
            if slot.is_some() {
                warn!("scg: already initialized");
                return Err(hw);
            }
            *slot = Some(Scg::new(hw));
            Ok(())
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.lock(|cell| cell.borrow().is_some())
    }

    /// Run `f` on the controller inside a critical section.
    ///
    /// Returns `None` before [`init`](Self::init).
    pub fn with<R>(&self, f: impl FnOnce(&mut Scg<H>) -> R) -> Option<R> {
        self.inner.lock(|cell| cell.borrow_mut().as_mut().map(f))
    }

    /// [`with`](Self::with) for callers already inside a critical section.
    pub fn with_cs<R>(&self, cs: CriticalSection, f: impl FnOnce(&mut Scg<H>) -> R) -> Option<R> {
        self.inner.borrow(cs).borrow_mut().as_mut().map(f)
    }

    /// Dispatch the SCG clock-loss interrupt.
    pub fn on_interrupt(&self) {
        self.with(|scg| scg.on_interrupt());
    }

    /// Take the hardware layer back out.
    pub fn release(&self) -> Option<H> {
        self.inner.lock(|cell| cell.borrow_mut().take().map(Scg::release))
    }
}

impl<H: ScgHardware> Default for SharedScg<H> {
    fn default() -> Self {
        Self::new()
    }
}
