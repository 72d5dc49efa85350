//! Per-source settings records and the aggregate SCG configuration.

use super::hw::{DividerTaps, SysDividers};
use super::vals::{
    AsyncDiv, ClkOutSource, NvmClkSource, PllPrediv, PllSource, SysClkDiv, SysClkSource,
    TrimSource,
};
use crate::time::Hertz;

/// Callback invoked from the clock-monitor interrupt when a source is lost.
pub type ClockErrorNotify = fn();

/// Divider taps programmed when nothing else is requested: /1, /2, /4.
pub const DEFAULT_DIVIDER_TAPS: DividerTaps =
    DividerTaps::new(AsyncDiv::Div1, AsyncDiv::Div2, AsyncDiv::Div4);

/// Either keep the current hardware setting or replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOption<T> {
    /// Leave the hardware as it is.
    Keep,
    /// Apply the given setting.
    Update(T),
}

impl<T> ConfigOption<T> {
    pub const fn keep() -> Self {
        ConfigOption::Keep
    }

    pub const fn new(value: T) -> Self {
        ConfigOption::Update(value)
    }

    pub fn as_update(&self) -> Option<&T> {
        match self {
            ConfigOption::Keep => None,
            ConfigOption::Update(value) => Some(value),
        }
    }
}

impl<T> Default for ConfigOption<T> {
    fn default() -> Self {
        ConfigOption::Keep
    }
}

// =============================================================================
// FIRC
// =============================================================================

/// Fast internal RC oscillator settings.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct FircConfig {
    pub enable: bool,
    pub lock: bool,
    /// Clock monitor. FIRC loss is always reported by interrupt.
    pub monitor: bool,
    /// Auto-trim against `trim_source`.
    pub trim_enable: bool,
    /// Keep running in stop mode.
    pub stop_enable: bool,
    pub trim_source: TrimSource,
    pub div: DividerTaps,
    pub error_notify: Option<ClockErrorNotify>,
}

impl FircConfig {
    pub const fn new() -> Self {
        Self {
            enable: true,
            lock: false,
            monitor: false,
            trim_enable: false,
            stop_enable: false,
            trim_source: TrimSource::Fosc,
            div: DEFAULT_DIVIDER_TAPS,
            error_notify: None,
        }
    }

    pub const fn disabled() -> Self {
        Self::new().with_enable(false)
    }

    pub const fn with_enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    pub const fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub const fn with_monitor(mut self, monitor: bool, notify: Option<ClockErrorNotify>) -> Self {
        self.monitor = monitor;
        self.error_notify = notify;
        self
    }

    pub const fn with_trim(mut self, source: TrimSource) -> Self {
        self.trim_enable = true;
        self.trim_source = source;
        self
    }

    pub const fn with_stop_enable(mut self, stop_enable: bool) -> Self {
        self.stop_enable = stop_enable;
        self
    }

    pub const fn with_div(mut self, div: DividerTaps) -> Self {
        self.div = div;
        self
    }
}

impl Default for FircConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SIRC
// =============================================================================

/// Slow internal RC oscillator settings. The SIRC cannot be switched off.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct SircConfig {
    pub lock: bool,
    /// Clock monitor. SIRC loss is always reported by interrupt.
    pub monitor: bool,
    pub trim_enable: bool,
    /// Keep running in low-power mode.
    pub low_power: bool,
    /// Keep running in stop mode.
    pub stop_enable: bool,
    pub trim_source: TrimSource,
    pub div: DividerTaps,
    pub error_notify: Option<ClockErrorNotify>,
}

impl SircConfig {
    pub const fn new() -> Self {
        Self {
            lock: false,
            monitor: false,
            trim_enable: false,
            low_power: false,
            stop_enable: false,
            trim_source: TrimSource::Fosc,
            div: DEFAULT_DIVIDER_TAPS,
            error_notify: None,
        }
    }

    pub const fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub const fn with_monitor(mut self, monitor: bool, notify: Option<ClockErrorNotify>) -> Self {
        self.monitor = monitor;
        self.error_notify = notify;
        self
    }

    pub const fn with_trim(mut self, source: TrimSource) -> Self {
        self.trim_enable = true;
        self.trim_source = source;
        self
    }

    pub const fn with_low_power(mut self, low_power: bool) -> Self {
        self.low_power = low_power;
        self
    }

    pub const fn with_stop_enable(mut self, stop_enable: bool) -> Self {
        self.stop_enable = stop_enable;
        self
    }

    pub const fn with_div(mut self, div: DividerTaps) -> Self {
        self.div = div;
        self
    }
}

impl Default for SircConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FOSC
// =============================================================================

/// Fast crystal oscillator settings.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct FoscConfig {
    pub enable: bool,
    /// External clock input instead of a crystal.
    pub bypass: bool,
    pub stop_enable: bool,
    pub monitor: bool,
    /// Report clock loss by reset instead of interrupt.
    pub monitor_reset: bool,
    pub lock: bool,
    pub div: DividerTaps,
    /// Crystal frequency. Without it the FOSC runs at an unknown rate.
    pub frequency: Option<Hertz>,
    pub error_notify: Option<ClockErrorNotify>,
}

impl FoscConfig {
    pub const fn new(frequency: Hertz) -> Self {
        Self {
            enable: true,
            bypass: false,
            stop_enable: false,
            monitor: false,
            monitor_reset: false,
            lock: false,
            div: DEFAULT_DIVIDER_TAPS,
            frequency: Some(frequency),
            error_notify: None,
        }
    }

    pub const fn disabled() -> Self {
        Self {
            enable: false,
            frequency: None,
            ..Self::new(Hertz::ZERO)
        }
    }

    pub const fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }

    pub const fn with_stop_enable(mut self, stop_enable: bool) -> Self {
        self.stop_enable = stop_enable;
        self
    }

    /// Clock monitor and the callback run when it reports a loss.
    pub const fn with_monitor(mut self, monitor: bool, notify: Option<ClockErrorNotify>) -> Self {
        self.monitor = monitor;
        self.error_notify = notify;
        self
    }

    /// Report a loss by reset instead of through the callback.
    pub const fn with_monitor_reset(mut self, reset: bool) -> Self {
        self.monitor_reset = reset;
        self
    }

    pub const fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub const fn with_div(mut self, div: DividerTaps) -> Self {
        self.div = div;
        self
    }
}

// =============================================================================
// SOSC
// =============================================================================

/// Slow crystal oscillator settings.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct SoscConfig {
    pub enable: bool,
    pub bypass: bool,
    pub monitor: bool,
    pub monitor_reset: bool,
    pub lock: bool,
    pub frequency: Option<Hertz>,
    pub error_notify: Option<ClockErrorNotify>,
}

impl SoscConfig {
    pub const fn new(frequency: Hertz) -> Self {
        Self {
            enable: true,
            bypass: false,
            monitor: false,
            monitor_reset: false,
            lock: false,
            frequency: Some(frequency),
            error_notify: None,
        }
    }

    pub const fn disabled() -> Self {
        Self {
            enable: false,
            frequency: None,
            ..Self::new(Hertz::ZERO)
        }
    }

    pub const fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }

    pub const fn with_monitor(mut self, monitor: bool, notify: Option<ClockErrorNotify>) -> Self {
        self.monitor = monitor;
        self.error_notify = notify;
        self
    }

    pub const fn with_monitor_reset(mut self, reset: bool) -> Self {
        self.monitor_reset = reset;
        self
    }

    pub const fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }
}

// =============================================================================
// SIRC32K
// =============================================================================

/// 32 kHz low-power RC oscillator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sirc32kConfig {
    pub enable: bool,
    pub lock: bool,
}

impl Sirc32kConfig {
    pub const fn new() -> Self {
        Self {
            enable: true,
            lock: false,
        }
    }

    pub const fn disabled() -> Self {
        Self {
            enable: false,
            lock: false,
        }
    }

    pub const fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }
}

impl Default for Sirc32kConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// PLL0
// =============================================================================

/// PLL settings.
///
/// Output = `input' / (prediv + 1) * (mult + 16) / 2`, where `input'` is
/// FIRC / 2 or FOSC. The output must stay within 75..=200 MHz.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Pll0Config {
    pub enable: bool,
    pub source: PllSource,
    pub prediv: PllPrediv,
    /// MULT field, 0..=63.
    pub mult: u8,
    pub stop_enable: bool,
    pub monitor: bool,
    pub monitor_reset: bool,
    pub lock: bool,
    pub div: DividerTaps,
    pub error_notify: Option<ClockErrorNotify>,
}

impl Pll0Config {
    pub const fn new(source: PllSource, prediv: PllPrediv, mult: u8) -> Self {
        Self {
            enable: true,
            source,
            prediv,
            mult,
            stop_enable: false,
            monitor: false,
            monitor_reset: false,
            lock: false,
            div: DEFAULT_DIVIDER_TAPS,
            error_notify: None,
        }
    }

    pub const fn disabled() -> Self {
        Self {
            enable: false,
            ..Self::new(PllSource::Firc, PllPrediv::Div1, 0)
        }
    }

    pub const fn with_stop_enable(mut self, stop_enable: bool) -> Self {
        self.stop_enable = stop_enable;
        self
    }

    pub const fn with_monitor(mut self, monitor: bool, notify: Option<ClockErrorNotify>) -> Self {
        self.monitor = monitor;
        self.error_notify = notify;
        self
    }

    pub const fn with_monitor_reset(mut self, reset: bool) -> Self {
        self.monitor_reset = reset;
        self
    }

    pub const fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub const fn with_div(mut self, div: DividerTaps) -> Self {
        self.div = div;
        self
    }
}

// =============================================================================
// System clock / clock out
// =============================================================================

/// Core clock source selection.
///
/// - core = source / div_core
/// - bus  = core / div_bus
/// - slow = core / div_slow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysClkConfig {
    pub source: SysClkSource,
    pub dividers: SysDividers,
    /// System clock monitor.
    pub monitor: bool,
}

impl SysClkConfig {
    pub const fn new(source: SysClkSource) -> Self {
        Self {
            source,
            dividers: SysDividers {
                core: SysClkDiv::Div1,
                bus: SysClkDiv::Div2,
                slow: SysClkDiv::Div4,
            },
            monitor: false,
        }
    }

    pub const fn with_dividers(mut self, core: SysClkDiv, bus: SysClkDiv, slow: SysClkDiv) -> Self {
        self.dividers = SysDividers { core, bus, slow };
        self
    }

    pub const fn with_monitor(mut self, monitor: bool) -> Self {
        self.monitor = monitor;
        self
    }
}

/// CLKOUT pin routing plus the flash controller clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockOutConfig {
    pub source: ClkOutSource,
    pub nvm: NvmClkSource,
}

impl ClockOutConfig {
    pub const fn new(source: ClkOutSource, nvm: NvmClkSource) -> Self {
        Self { source, nvm }
    }
}

// =============================================================================
// Aggregate configuration
// =============================================================================

/// Full SCG configuration applied by [`Scg::apply`](super::Scg::apply).
///
/// Every entry defaults to [`ConfigOption::Keep`].
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Config {
    pub sirc: ConfigOption<SircConfig>,
    pub firc: ConfigOption<FircConfig>,
    pub fosc: ConfigOption<FoscConfig>,
    pub sosc: ConfigOption<SoscConfig>,
    pub sirc32k: ConfigOption<Sirc32kConfig>,
    pub pll0: ConfigOption<Pll0Config>,
    pub sys_clk: ConfigOption<SysClkConfig>,
    pub clock_out: ConfigOption<ClockOutConfig>,
}

impl Config {
    /// Keep everything as the hardware currently has it.
    pub const fn new_keep() -> Self {
        Self {
            sirc: ConfigOption::Keep,
            firc: ConfigOption::Keep,
            fosc: ConfigOption::Keep,
            sosc: ConfigOption::Keep,
            sirc32k: ConfigOption::Keep,
            pll0: ConfigOption::Keep,
            sys_clk: ConfigOption::Keep,
            clock_out: ConfigOption::Keep,
        }
    }
}
