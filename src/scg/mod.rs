//! System clock generator (SCG).
//!
//! [`Scg`] owns the hardware access layer and the clock registry. Every
//! configuration call populates the registry on first use, drives the
//! hardware, waits for it with a bounded poll, and re-derives the affected
//! clocks before it returns.
//!
//! ```ignore
//! let mut scg = Scg::new(hw);
//! scg.configure_fosc(&FoscConfig::new(Hertz::mhz(8)))?;
//! scg.configure_pll0(&Pll0Config::new(PllSource::Fosc, PllPrediv::Div1, 24))?;
//! scg.select_sys_clock(&SysClkConfig::new(SysClkSource::Pll0).with_dividers(
//!     SysClkDiv::Div2,
//!     SysClkDiv::Div2,
//!     SysClkDiv::Div4,
//! ))?;
//! ```

mod clock;
mod clock_config;
mod clock_read;
mod derive;
mod hw;
mod notify;
mod sequencer;
mod shared;
mod source;
mod vals;


pub use clock::*;
pub use clock_config::*;
pub use derive::{pll_output, SysFrequencies};
pub use hw::*;
pub use shared::SharedScg;
pub use vals::*;

use crate::time::Hertz;
use notify::ErrorNotifiers;

/// Failure of an SCG operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The hardware did not acknowledge within its poll budget.
    Timeout,
    /// The clock feeds the core; switch the core away first.
    SequenceError,
    /// Frequency or divider combination out of range, or an input frequency
    /// that is not known.
    ParamInvalid,
    /// The required input clock is not running.
    SourceInvalid,
    /// The core did not end up on the selected source.
    SwitchMismatch,
}

impl Error {
    /// Flat status code of this failure.
    pub const fn status(self) -> ClockStatus {
        match self {
            Error::Timeout => ClockStatus::Timeout,
            Error::SequenceError => ClockStatus::SequenceError,
            Error::ParamInvalid => ClockStatus::ParamInvalid,
            Error::SourceInvalid | Error::SwitchMismatch => ClockStatus::Error,
        }
    }
}

impl From<Error> for ClockStatus {
    fn from(e: Error) -> Self {
        e.status()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Timeout => write!(f, "clock did not stabilize in time"),
            Error::SequenceError => write!(f, "clock feeds the core"),
            Error::ParamInvalid => write!(f, "clock parameters out of range"),
            Error::SourceInvalid => write!(f, "input clock not running"),
            Error::SwitchMismatch => write!(f, "core clock switch not taken"),
        }
    }
}

impl core::error::Error for Error {}

/// System clock generator controller.
pub struct Scg<H: ScgHardware> {
    hw: H,
    registry: Registry,
    notifiers: ErrorNotifiers,
    fosc_freq: Option<Hertz>,
    sosc_freq: Option<Hertz>,
}

impl<H: ScgHardware> Scg<H> {
    /// Take over the clock generator. The registry is populated lazily.
    pub const fn new(hw: H) -> Self {
        Self {
            hw,
            registry: Registry::new(),
            notifiers: ErrorNotifiers::new(),
            fosc_freq: None,
            sosc_freq: None,
        }
    }

    /// Status and frequency of a clock domain.
    ///
    /// A clock that is not running reads 0 Hz; a running clock whose
    /// frequency has not been established reads as `Undefined`.
    pub fn query(&mut self, domain: ClockDomain) -> (ClockStatus, Hertz) {
        self.ensure_initialized();
        self.registry.get(domain).observed()
    }

    /// [`query`](Self::query) by registry index. Out-of-range indices give
    /// `ParamInvalid` and 0 Hz.
    pub fn query_index(&mut self, index: usize) -> (ClockStatus, Hertz) {
        match ClockDomain::from_index(index) {
            Some(domain) => self.query(domain),
            None => (ClockStatus::ParamInvalid, Hertz::ZERO),
        }
    }

    /// Frequency the clock would have when running.
    ///
    /// Unlike [`query`](Self::query) this keeps the ratio of a stopped
    /// divider tap. `None` if the frequency is not known.
    pub fn nominal_frequency(&mut self, domain: ClockDomain) -> Option<Hertz> {
        self.ensure_initialized();
        self.registry.get(domain).frequency
    }

    /// The source chain the core currently runs from.
    pub fn run_clock(&mut self) -> Option<RunClock> {
        self.ensure_initialized();
        self.registry.run_clock()
    }

    /// Read-only view of the registry, as last derived.
    ///
    /// Unlike [`query`](Self::query) this does not populate the registry
    /// first.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Route a clock to the CLKOUT pin and select the flash controller clock.
    pub fn set_clock_out(&mut self, config: &ClockOutConfig) {
        self.ensure_initialized();

        // Drop both NVM clock selections while CLKOUTSEL changes.
        self.hw.set_clock_out(ClkOutCfg {
            source: config.source,
            nvm: None,
        });
        self.hw.set_clock_out(ClkOutCfg {
            source: config.source,
            nvm: Some(config.nvm),
        });

        self.refresh_clock_out();
        debug!("scg: CLKOUT from {:?}", config.source);
    }

    /// Apply a full configuration.
    ///
    /// Sources come up in dependency order (SIRC, FIRC, FOSC, SOSC, SIRC32K,
    /// PLL0), then the core clock and CLKOUT are selected. The first failure
    /// stops the sequence.
    pub fn apply(&mut self, config: &Config) -> Result<(), Error> {
        self.ensure_initialized();

        if let Some(c) = config.sirc.as_update() {
            self.configure_sirc(c)?;
        }
        if let Some(c) = config.firc.as_update() {
            self.configure_firc(c)?;
        }
        if let Some(c) = config.fosc.as_update() {
            self.configure_fosc(c)?;
        }
        if let Some(c) = config.sosc.as_update() {
            self.configure_sosc(c)?;
        }
        if let Some(c) = config.sirc32k.as_update() {
            self.configure_sirc32k(c)?;
        }
        if let Some(c) = config.pll0.as_update() {
            self.configure_pll0(c)?;
        }
        if let Some(c) = config.sys_clk.as_update() {
            self.select_sys_clock(c)?;
        }
        if let Some(c) = config.clock_out.as_update() {
            self.set_clock_out(c);
        }
        Ok(())
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Direct access to the hardware layer.
    ///
    /// Changes made through it are not seen by the registry until the
    /// affected clock is configured again.
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Give the hardware layer back.
    pub fn release(self) -> H {
        self.hw
    }
}
