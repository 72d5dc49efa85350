//! Hardware access capability consumed by the SCG core.
//!
//! The core never touches registers itself. A board or chip crate implements
//! [`ScgHardware`] on top of its PAC; the records below are the decoded form of
//! the register fields the core reads and writes.

use super::vals::{
    AsyncDiv, ClkOutSource, MonitoredSource, NvmClkSource, PllPrediv, PllSource, Source,
    SysClkDiv, SysClkSource, TrimSource,
};

/// One flag per divider tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapFlags {
    pub high: bool,
    pub mid: bool,
    pub low: bool,
}

impl TapFlags {
    pub const NONE: Self = Self {
        high: false,
        mid: false,
        low: false,
    };
    pub const ALL: Self = Self {
        high: true,
        mid: true,
        low: true,
    };

    pub const fn all(&self) -> bool {
        self.high && self.mid && self.low
    }

    pub const fn any(&self) -> bool {
        self.high || self.mid || self.low
    }
}

/// Ratios of the three divider taps of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DividerTaps {
    pub high: AsyncDiv,
    pub mid: AsyncDiv,
    pub low: AsyncDiv,
}

impl DividerTaps {
    pub const fn new(high: AsyncDiv, mid: AsyncDiv, low: AsyncDiv) -> Self {
        Self { high, mid, low }
    }
}

/// Readback of a source's divider register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DividerReg {
    pub taps: DividerTaps,
    /// DIVx_EN bits.
    pub enabled: TapFlags,
    /// DIVx_ACK bits, set once a tap has taken its new setting.
    pub ack: TapFlags,
}

/// Decoded oscillator/PLL control-status word.
///
/// Not every source implements every bit; implementations ignore the ones
/// their register lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OscControl {
    pub enable: bool,
    pub bypass: bool,
    pub stop_enable: bool,
    pub low_power: bool,
    pub trim_update: bool,
    pub trim_enable: bool,
    /// Clock monitor enable.
    pub monitor: bool,
    /// Clock monitor reports loss by reset instead of interrupt.
    pub monitor_reset: bool,
    pub lock: bool,
}

/// Analog/front-end configuration written before an oscillator is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OscAnalog {
    /// SOSCCFG drive settings.
    Sosc {
        eocv: u8,
        gm_sel: u8,
        curprg_sf: u8,
        curprg_comp: u8,
    },
    /// FOSCCFG drive settings.
    Fosc {
        bypass: bool,
        comp_en: bool,
        eocv: u8,
        gm_sel: u8,
        alc_d: u8,
        hyst_d: u8,
    },
    /// FIRCCFG clock gates.
    Firc { clken: u8 },
}

/// IRC auto-trim configuration (xTCFG).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrimConfig {
    pub source: TrimSource,
    pub div: u16,
    pub sample: bool,
    pub delay: bool,
}

/// PLL0CFG contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllSetting {
    pub prediv: PllPrediv,
    pub mult: u8,
    pub source: PllSource,
}

/// Core/bus/slow divider settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysDividers {
    pub core: SysClkDiv,
    pub bus: SysClkDiv,
    pub slow: SysClkDiv,
}

/// System clock control register (CCR).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysClkCtrl {
    /// System clock monitor enable.
    pub monitor: bool,
    pub source: SysClkSource,
    pub dividers: SysDividers,
}

/// Clock-out configuration register (CLKOUTCFG).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClkOutCfg {
    pub source: ClkOutSource,
    pub nvm: Option<NvmClkSource>,
}

/// Register-level operations of the system clock generator.
///
/// All methods must complete without blocking. They take `&mut self` so that
/// implementations backed by a recording model (and real register blocks
/// behind a token) need no interior mutability.
pub trait ScgHardware {
    /// Program the analog front end of an oscillator.
    fn set_analog(&mut self, cfg: OscAnalog);

    /// Read the control-status word of `src`.
    fn control(&mut self, src: Source) -> OscControl;

    /// Write the control-status word of `src`.
    fn set_control(&mut self, src: Source, ctrl: OscControl);

    /// Clear the enable bit of `src`.
    fn disable(&mut self, src: Source);

    /// Whether `src` reports a valid (stable) output.
    fn is_valid(&mut self, src: Source) -> bool;

    /// Whether the PLL reports lock.
    fn is_pll_locked(&mut self) -> bool;

    /// Read the divider register of `src`.
    fn divider(&mut self, src: Source) -> DividerReg;

    /// Program the tap ratios of `src` without touching the enable bits.
    fn set_divider(&mut self, src: Source, taps: DividerTaps);

    /// Set all tap enable bits of `src`.
    fn enable_divider(&mut self, src: Source);

    /// Clear all tap enable bits of `src`.
    fn disable_divider(&mut self, src: Source);

    /// Program the auto-trim configuration of an IRC (`Firc` or `Sirc`).
    fn set_trim(&mut self, src: Source, trim: TrimConfig);

    /// Read PLL0CFG.
    fn pll_setting(&mut self) -> PllSetting;

    /// Write PLL0CFG.
    fn set_pll_setting(&mut self, setting: PllSetting);

    /// Read and clear the clock-loss flag of `src`.
    fn check_and_clear_error(&mut self, src: MonitoredSource) -> bool;

    /// Write the system clock control register.
    fn set_selector(&mut self, ctrl: SysClkCtrl);

    /// Read back the programmed system clock control register.
    fn selector(&mut self) -> SysClkCtrl;

    /// Raw SCS status field: the source the core is running from right now.
    fn current_source(&mut self) -> u8;

    /// Core/bus/slow dividers currently in effect.
    fn current_dividers(&mut self) -> SysDividers;

    /// Whether the last selector write has been taken over by the hardware.
    fn update_complete(&mut self) -> bool;

    /// Raw CLKOUTSEL field.
    fn clock_out_bits(&mut self) -> u8;

    /// Write the clock-out configuration register.
    fn set_clock_out(&mut self, cfg: ClkOutCfg);

    /// Busy-wait for roughly `cycles` core cycles.
    fn settle(&mut self, cycles: u32) {
        for _ in 0..cycles {
            core::hint::spin_loop();
        }
    }
}
