//! Source configurators.
//!
//! Each configurator brings its source up or down, waits for the hardware to
//! acknowledge, installs the loss callback and refreshes the registry for the
//! source and everything downstream of it. A refusal because the core runs
//! on the source returns before any of that happens.

use super::clock::{
    ClockDomain, ClockStatus, CLOCK_DIV_TIMEOUT, CLOCK_OFF_TIMEOUT, FIRC_STABILIZATION_TIMEOUT,
    FOSC_STABILIZATION_TIMEOUT, PLL0_FREQ_MAX, PLL0_FREQ_MIN, PLL0_MULT_MAX,
    PLL0_PREDIV_WORKAROUND_CYCLES, PLL0_STABILIZATION_TIMEOUT, SIRC32K_STABILIZATION_TIMEOUT,
    SIRC_STABILIZATION_TIMEOUT, SOSC_STABILIZATION_TIMEOUT,
};
use super::clock_config::{
    FircConfig, FoscConfig, Pll0Config, Sirc32kConfig, SircConfig, SoscConfig,
};
use super::hw::{DividerTaps, OscAnalog, OscControl, PllSetting, ScgHardware, TrimConfig};
use super::vals::{MonitoredSource, PllPrediv, PllSource, Source, TrimSource};
use super::{derive, Error, Scg};
use crate::utils::{blocking_wait_clear, blocking_wait_countdown};

impl<H: ScgHardware> Scg<H> {
    // =========================================================================
    // SOSC
    // =========================================================================

    /// Configure the slow crystal oscillator.
    pub fn configure_sosc(&mut self, config: &SoscConfig) -> Result<ClockStatus, Error> {
        self.ensure_initialized();

        let result = if config.enable {
            self.enable_sosc(config)
        } else {
            self.hw.disable(Source::Sosc);
            self.wait_stopped(Source::Sosc);
            Ok(ClockStatus::Disabled)
        };

        self.notifiers.install(
            MonitoredSource::Sosc,
            config.monitor,
            config.monitor_reset,
            config.error_notify,
        );
        self.sosc_freq = config.frequency;
        self.refresh_after(Source::Sosc);
        result
    }

    fn enable_sosc(&mut self, config: &SoscConfig) -> Result<ClockStatus, Error> {
        self.hw.set_analog(OscAnalog::Sosc {
            eocv: 64,
            gm_sel: 3,
            curprg_sf: 3,
            curprg_comp: 3,
        });

        let mut ctrl = self.hw.control(Source::Sosc);
        ctrl.lock = false;
        self.hw.set_control(Source::Sosc, ctrl);
        ctrl.bypass = config.bypass;
        ctrl.enable = true;
        self.hw.set_control(Source::Sosc, ctrl);

        self.wait_valid(Source::Sosc, SOSC_STABILIZATION_TIMEOUT)?;
        self.finish_monitor(Source::Sosc, config.monitor, config.monitor_reset, config.lock);
        debug!("scg: SOSC running");
        Ok(ClockStatus::Valid)
    }

    // =========================================================================
    // FOSC
    // =========================================================================

    /// Configure the fast crystal oscillator.
    ///
    /// Turning it off while the core runs from it, directly or through the
    /// PLL, is refused with [`Error::SequenceError`].
    pub fn configure_fosc(&mut self, config: &FoscConfig) -> Result<ClockStatus, Error> {
        self.ensure_initialized();

        let result = if config.enable {
            self.enable_fosc(config)
        } else {
            self.guard_disable(Source::Fosc)?;
            self.hw.disable(Source::Fosc);
            self.wait_stopped(Source::Fosc);
            Ok(ClockStatus::Disabled)
        };

        self.notifiers.install(
            MonitoredSource::Fosc,
            config.monitor,
            config.monitor_reset,
            config.error_notify,
        );
        self.fosc_freq = config.frequency;
        self.refresh_after(Source::Fosc);
        result
    }

    fn enable_fosc(&mut self, config: &FoscConfig) -> Result<ClockStatus, Error> {
        // The amplitude comparator is required with a crystal and must be off in bypass.
        self.hw.set_analog(OscAnalog::Fosc {
            bypass: config.bypass,
            comp_en: !config.bypass,
            eocv: 50,
            gm_sel: 15,
            alc_d: 1,
            hyst_d: 0,
        });

        let mut ctrl = self.hw.control(Source::Fosc);
        ctrl.lock = false;
        self.hw.set_control(Source::Fosc, ctrl);
        ctrl.stop_enable = config.stop_enable;
        ctrl.enable = true;
        self.hw.set_control(Source::Fosc, ctrl);

        self.wait_valid(Source::Fosc, FOSC_STABILIZATION_TIMEOUT)?;
        self.finish_monitor(Source::Fosc, config.monitor, config.monitor_reset, config.lock);
        self.apply_divider(Source::Fosc, config.div)?;
        debug!("scg: FOSC running at {:?}", config.frequency);
        Ok(ClockStatus::Valid)
    }

    // =========================================================================
    // SIRC
    // =========================================================================

    /// Configure the slow internal RC oscillator.
    ///
    /// The SIRC has no off switch; this only reprograms it.
    pub fn configure_sirc(&mut self, config: &SircConfig) -> Result<ClockStatus, Error> {
        self.ensure_initialized();

        let result = self.enable_sirc(config);

        // No reset-style reporting for the IRCs.
        self.notifiers
            .install(MonitoredSource::Sirc, config.monitor, false, config.error_notify);
        self.refresh_after(Source::Sirc);
        result
    }

    fn enable_sirc(&mut self, config: &SircConfig) -> Result<ClockStatus, Error> {
        let mut ctrl = self.hw.control(Source::Sirc);
        ctrl.monitor = config.monitor;
        ctrl.lock = config.lock;
        ctrl.trim_update = config.trim_enable;
        ctrl.trim_enable = config.trim_enable;
        ctrl.low_power = config.low_power;
        ctrl.stop_enable = config.stop_enable;
        self.hw.set_control(Source::Sirc, ctrl);

        self.wait_valid(Source::Sirc, SIRC_STABILIZATION_TIMEOUT)?;
        self.apply_divider(Source::Sirc, config.div)?;
        if config.trim_enable {
            self.apply_trim(Source::Sirc, config.trim_source);
        }
        Ok(ClockStatus::Valid)
    }

    // =========================================================================
    // SIRC32K
    // =========================================================================

    /// Configure the 32 kHz low-power RC oscillator.
    pub fn configure_sirc32k(&mut self, config: &Sirc32kConfig) -> Result<ClockStatus, Error> {
        self.ensure_initialized();

        let ctrl = OscControl {
            enable: config.enable,
            lock: config.lock,
            ..OscControl::default()
        };
        self.hw.set_control(Source::Sirc32k, ctrl);

        let result = if config.enable {
            self.wait_valid(Source::Sirc32k, SIRC32K_STABILIZATION_TIMEOUT)
                .map(|()| ClockStatus::Valid)
        } else {
            self.wait_stopped(Source::Sirc32k);
            Ok(ClockStatus::Disabled)
        };

        self.refresh_after(Source::Sirc32k);
        result
    }

    // =========================================================================
    // FIRC
    // =========================================================================

    /// Configure the fast internal RC oscillator.
    ///
    /// Turning it off while the core runs from it, directly or through the
    /// PLL, is refused with [`Error::SequenceError`]. If it does not come up
    /// within its budget it is switched off again, unless the core depends
    /// on it.
    pub fn configure_firc(&mut self, config: &FircConfig) -> Result<ClockStatus, Error> {
        self.ensure_initialized();

        let result = if config.enable {
            self.enable_firc(config)
        } else {
            self.guard_disable(Source::Firc)?;
            self.hw.disable(Source::Firc);
            self.wait_stopped(Source::Firc);
            Ok(ClockStatus::Disabled)
        };

        self.notifiers
            .install(MonitoredSource::Firc, config.monitor, false, config.error_notify);
        self.refresh_after(Source::Firc);
        result
    }

    fn enable_firc(&mut self, config: &FircConfig) -> Result<ClockStatus, Error> {
        self.hw.set_analog(OscAnalog::Firc { clken: 0b11 });

        let mut ctrl = self.hw.control(Source::Firc);
        ctrl.trim_update = config.trim_enable;
        ctrl.trim_enable = config.trim_enable;
        ctrl.stop_enable = config.stop_enable;
        ctrl.enable = true;
        self.hw.set_control(Source::Firc, ctrl);

        if let Err(e) = self.wait_valid(Source::Firc, FIRC_STABILIZATION_TIMEOUT) {
            // Leave it enabled while the core still runs from it.
            if self.guard_disable(Source::Firc).is_ok() {
                self.hw.disable(Source::Firc);
            }
            return Err(e);
        }

        let mut ctrl = self.hw.control(Source::Firc);
        ctrl.monitor = config.monitor;
        self.hw.set_control(Source::Firc, ctrl);
        ctrl.lock = config.lock;
        self.hw.set_control(Source::Firc, ctrl);

        self.apply_divider(Source::Firc, config.div)?;
        if config.trim_enable {
            self.apply_trim(Source::Firc, config.trim_source);
        }
        debug!("scg: FIRC running");
        Ok(ClockStatus::Valid)
    }

    // =========================================================================
    // PLL0
    // =========================================================================

    /// Configure the PLL.
    ///
    /// The PLL cannot be touched at all while the core runs from it. The
    /// output frequency is checked against 75..=200 MHz before any register
    /// is written; behind the FOSC both bounds are excluded.
    pub fn configure_pll0(&mut self, config: &Pll0Config) -> Result<ClockStatus, Error> {
        self.ensure_initialized();
        self.guard_disable(Source::Pll0)?;

        let result = if config.enable {
            self.enable_pll0(config)
        } else {
            let mut ctrl = self.hw.control(Source::Pll0);
            ctrl.lock = false;
            self.hw.set_control(Source::Pll0, ctrl);
            self.hw.disable(Source::Pll0);
            let hw = &mut self.hw;
            if blocking_wait_clear(|| hw.is_pll_locked(), CLOCK_OFF_TIMEOUT).is_err() {
                warn!("scg: PLL0 still locked after disable");
            }
            Ok(ClockStatus::Disabled)
        };

        self.notifiers.install(
            MonitoredSource::Pll0,
            config.monitor,
            config.monitor_reset,
            config.error_notify,
        );
        self.refresh_after(Source::Pll0);
        result
    }

    fn enable_pll0(&mut self, config: &Pll0Config) -> Result<ClockStatus, Error> {
        let input = self.registry.get(derive::pll_input_domain(config.source));
        if !input.is_valid() {
            warn!("scg: PLL0 input {:?} is not running", config.source);
            return Err(Error::SourceInvalid);
        }
        let Some(input_freq) = input.frequency else {
            warn!("scg: PLL0 input {:?} has no known frequency", config.source);
            return Err(Error::ParamInvalid);
        };
        if config.mult > PLL0_MULT_MAX {
            return Err(Error::ParamInvalid);
        }
        let output = derive::pll_output(config.source, input_freq, config.prediv, config.mult);
        // The bounds themselves are legal only behind the FIRC.
        let in_range = match config.source {
            PllSource::Firc => output >= PLL0_FREQ_MIN && output <= PLL0_FREQ_MAX,
            PllSource::Fosc => output > PLL0_FREQ_MIN && output < PLL0_FREQ_MAX,
        };
        if !in_range {
            warn!("scg: PLL0 output {:?} out of range", output);
            return Err(Error::ParamInvalid);
        }

        let setting = PllSetting {
            prediv: config.prediv,
            mult: config.mult,
            source: config.source,
        };

        // A /2 pre-divider only takes effect after the PLL has run on /4 once.
        if config.prediv == PllPrediv::Div2 {
            self.hw.set_pll_setting(PllSetting {
                prediv: PllPrediv::Div4,
                ..setting
            });
            self.hw.set_control(
                Source::Pll0,
                OscControl {
                    enable: true,
                    ..OscControl::default()
                },
            );
            self.hw.settle(PLL0_PREDIV_WORKAROUND_CYCLES);
            self.hw.set_control(Source::Pll0, OscControl::default());
        }
        self.hw.set_pll_setting(setting);

        let mut ctrl = OscControl {
            enable: true,
            stop_enable: config.stop_enable,
            ..OscControl::default()
        };
        self.hw.set_control(Source::Pll0, ctrl);

        let hw = &mut self.hw;
        if blocking_wait_countdown(|| hw.is_pll_locked(), PLL0_STABILIZATION_TIMEOUT).is_err() {
            warn!("scg: PLL0 did not lock");
            return Err(Error::Timeout);
        }

        ctrl.monitor = config.monitor;
        self.hw.set_control(Source::Pll0, ctrl);
        ctrl.monitor_reset = config.monitor_reset;
        ctrl.lock = config.lock;
        self.hw.set_control(Source::Pll0, ctrl);

        self.apply_divider(Source::Pll0, config.div)?;
        debug!("scg: PLL0 locked at {:?}", output);
        Ok(ClockStatus::Valid)
    }

    // =========================================================================
    // Shared steps
    // =========================================================================

    /// Refuse to touch `src` while the core depends on it.
    pub(crate) fn guard_disable(&self, src: Source) -> Result<(), Error> {
        match self.registry.run_clock() {
            Some(run_clock) if run_clock.depends_on(src) => {
                warn!("scg: {:?} feeds the core ({:?})", src, run_clock);
                Err(Error::SequenceError)
            }
            _ => Ok(()),
        }
    }

    fn wait_valid(&mut self, src: Source, budget: u32) -> Result<(), Error> {
        let hw = &mut self.hw;
        blocking_wait_countdown(|| hw.is_valid(src), budget).map_err(|()| {
            warn!("scg: {:?} not valid after {:?} polls", src, budget);
            Error::Timeout
        })
    }

    /// Wait for a source to report invalid after it was turned off.
    ///
    /// The outcome is not an error: the next readback records whatever state
    /// the source ended up in.
    fn wait_stopped(&mut self, src: Source) {
        let hw = &mut self.hw;
        if blocking_wait_clear(|| hw.is_valid(src), CLOCK_OFF_TIMEOUT).is_err() {
            warn!("scg: {:?} still valid after disable", src);
        } else {
            debug!("scg: {:?} off", src);
        }
    }

    /// Program the clock monitor, then reset-style reporting and the lock bit.
    fn finish_monitor(&mut self, src: Source, monitor: bool, monitor_reset: bool, lock: bool) {
        let mut ctrl = self.hw.control(src);
        ctrl.monitor = monitor;
        self.hw.set_control(src, ctrl);
        ctrl.monitor_reset = monitor_reset;
        ctrl.lock = lock;
        self.hw.set_control(src, ctrl);
    }

    /// Glitch-free divider update.
    ///
    /// Taps are stopped and must drop their acks before the new ratios are
    /// written, then restarted and must raise all three acks again.
    fn apply_divider(&mut self, src: Source, taps: DividerTaps) -> Result<(), Error> {
        self.hw.disable_divider(src);
        let hw = &mut self.hw;
        blocking_wait_clear(|| hw.divider(src).ack.any(), CLOCK_DIV_TIMEOUT).map_err(|()| {
            warn!("scg: {:?} divider did not stop", src);
            Error::Timeout
        })?;

        self.hw.set_divider(src, taps);
        self.hw.enable_divider(src);
        let hw = &mut self.hw;
        blocking_wait_countdown(|| hw.divider(src).ack.all(), CLOCK_DIV_TIMEOUT).map_err(|()| {
            warn!("scg: {:?} divider did not acknowledge", src);
            Error::Timeout
        })
    }

    /// Program the IRC auto-trim.
    ///
    /// Trimming against FOSC needs its frequency in MHz; without it the trim
    /// is left unprogrammed.
    fn apply_trim(&mut self, src: Source, trim_source: TrimSource) {
        let div = match trim_source {
            TrimSource::Sosc => 0,
            TrimSource::Fosc => match self.registry.running_frequency(ClockDomain::Fosc) {
                Some(f) if f.0 >= 1_000_000 => (f.0 / 1_000_000 - 1) as u16,
                _ => {
                    warn!("scg: {:?} trim skipped, FOSC frequency unknown", src);
                    return;
                }
            },
        };
        self.hw.set_trim(
            src,
            TrimConfig {
                source: trim_source,
                div,
                sample: true,
                delay: true,
            },
        );
    }
}
