//! Core clock selection and de-initialization.

use super::clock::{
    ClockDomain, ClockStatus, BUS_CLK_MAX, CORE_CLK_MAX, SLOW_CLK_MAX, SYSCLK_SWITCH_TIMEOUT,
};
use super::clock_config::{
    FircConfig, FoscConfig, Pll0Config, Sirc32kConfig, SoscConfig, SysClkConfig,
};
use super::derive::SysFrequencies;
use super::hw::{ScgHardware, SysClkCtrl};
use super::vals::SysClkSource;
use super::{Error, Scg};
use crate::utils::blocking_wait_countdown;

const fn source_domain(source: SysClkSource) -> ClockDomain {
    match source {
        SysClkSource::Firc => ClockDomain::Firc,
        SysClkSource::Fosc => ClockDomain::Fosc,
        SysClkSource::Pll0 => ClockDomain::Pll0,
    }
}

/// Drop every outcome of a de-init step except a refusal.
fn unless_refused(result: Result<ClockStatus, Error>) -> Result<(), Error> {
    match result {
        Err(Error::SequenceError) => Err(Error::SequenceError),
        _ => Ok(()),
    }
}

impl<H: ScgHardware> Scg<H> {
    /// Select the core clock source and its core/bus/slow dividers.
    ///
    /// The source must be running at a known frequency, and the resulting
    /// clocks must stay within 150 MHz (core), 75 MHz (bus) and 37.5 MHz
    /// (slow). Nothing is written unless both hold.
    pub fn select_sys_clock(&mut self, config: &SysClkConfig) -> Result<ClockStatus, Error> {
        self.ensure_initialized();

        let state = self.registry.get(source_domain(config.source));
        if !state.is_valid() {
            warn!("scg: cannot select {:?}, not running", config.source);
            return Err(Error::SourceInvalid);
        }
        let Some(source_freq) = state.frequency else {
            warn!("scg: cannot select {:?}, frequency unknown", config.source);
            return Err(Error::ParamInvalid);
        };

        let projected = SysFrequencies::new(source_freq, &config.dividers);
        if projected.core > CORE_CLK_MAX
            || projected.bus > BUS_CLK_MAX
            || projected.slow > SLOW_CLK_MAX
        {
            warn!("scg: {:?} exceeds the system clock limits", projected);
            return Err(Error::ParamInvalid);
        }

        self.hw.set_selector(SysClkCtrl {
            monitor: config.monitor,
            source: config.source,
            dividers: config.dividers,
        });

        let hw = &mut self.hw;
        let settled = blocking_wait_countdown(|| hw.update_complete(), SYSCLK_SWITCH_TIMEOUT);
        let result = match settled {
            Err(()) => {
                warn!("scg: system clock update not taken");
                Err(Error::Timeout)
            }
            Ok(()) if SysClkSource::from_bits(self.hw.current_source()) != Some(config.source) => {
                warn!("scg: core did not move to {:?}", config.source);
                Err(Error::SwitchMismatch)
            }
            Ok(()) => {
                info!("scg: core on {:?}, {:?}", config.source, projected);
                Ok(ClockStatus::Valid)
            }
        };

        self.refresh_sys_clock();
        result
    }

    /// Move the core to another running source, keeping the current dividers.
    pub fn switch_sys_clock(&mut self, source: SysClkSource) -> Result<ClockStatus, Error> {
        self.ensure_initialized();

        if !self.registry.get(source_domain(source)).is_valid() {
            warn!("scg: cannot switch to {:?}, not running", source);
            return Err(Error::SourceInvalid);
        }

        let mut ctrl = self.hw.selector();
        ctrl.source = source;
        self.hw.set_selector(ctrl);

        self.refresh_sys_clock();
        Ok(ClockStatus::Valid)
    }

    /// Return to the reset clock configuration.
    ///
    /// The core is moved to the FIRC, bringing the FIRC up with its default
    /// settings if needed, and the PLL, FOSC, SOSC and SIRC32K are switched
    /// off. Individual disable results are ignored apart from a refusal.
    pub fn deinit(&mut self) -> Result<ClockStatus, Error> {
        self.ensure_initialized();

        if SysClkSource::from_bits(self.hw.current_source()) != Some(SysClkSource::Firc) {
            match self.switch_sys_clock(SysClkSource::Firc) {
                Ok(_) => {}
                Err(Error::SourceInvalid) => {
                    if let Err(Error::Timeout) = self.configure_firc(&FircConfig::new()) {
                        return Err(Error::Timeout);
                    }
                    self.switch_sys_clock(SysClkSource::Firc)?;
                }
                Err(e) => return Err(e),
            }
        }

        unless_refused(self.configure_pll0(&Pll0Config::disabled()))?;
        unless_refused(self.configure_fosc(&FoscConfig::disabled()))?;
        unless_refused(self.configure_sosc(&SoscConfig::disabled()))?;
        unless_refused(self.configure_sirc32k(&Sirc32kConfig::disabled()))?;
        info!("scg: de-initialized, core on FIRC");
        Ok(ClockStatus::Valid)
    }
}
