//! Clock domains, constants, and the clock registry.

use super::vals::Source;
use crate::time::Hertz;

// =============================================================================
// Constants
// =============================================================================

pub const CLK_FIRC_FREQ: Hertz = Hertz(96_000_000);
pub const CLK_SIRC_FREQ: Hertz = Hertz(12_000_000);
pub const CLK_SIRC32K_FREQ: Hertz = Hertz(32_000);

/// Legal PLL output range, bounds included.
pub const PLL0_FREQ_MIN: Hertz = Hertz(75_000_000);
pub const PLL0_FREQ_MAX: Hertz = Hertz(200_000_000);
/// Largest value of the PLL0CFG MULT field.
pub const PLL0_MULT_MAX: u8 = 63;

pub const CORE_CLK_MAX: Hertz = Hertz(150_000_000);
pub const BUS_CLK_MAX: Hertz = Hertz(75_000_000);
pub const SLOW_CLK_MAX: Hertz = Hertz(37_500_000);

// Poll budgets, in flag reads.
pub const FOSC_STABILIZATION_TIMEOUT: u32 = 320_500;
pub const SOSC_STABILIZATION_TIMEOUT: u32 = 320_500;
pub const PLL0_STABILIZATION_TIMEOUT: u32 = 320_500;
pub const FIRC_STABILIZATION_TIMEOUT: u32 = 20;
pub const SIRC_STABILIZATION_TIMEOUT: u32 = 100;
pub const SIRC32K_STABILIZATION_TIMEOUT: u32 = 100;
pub const SYSCLK_SWITCH_TIMEOUT: u32 = 1_000;
pub const CLOCK_OFF_TIMEOUT: u32 = 1_000;
pub const CLOCK_DIV_TIMEOUT: u32 = 1_000;

/// Cycles the PLL is left running on the transient /4 pre-divider.
pub(crate) const PLL0_PREDIV_WORKAROUND_CYCLES: u32 = 200;

// =============================================================================
// Status
// =============================================================================

/// Status of a clock domain, and the flat status code of an SCG operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStatus {
    /// Running / operation succeeded.
    Valid,
    /// Turned off.
    Disabled,
    /// Not determined yet, or routed from an unrecognised selector value.
    Undefined,
    /// Hardware did not acknowledge within its poll budget.
    Timeout,
    /// Refused: the clock is feeding the core.
    SequenceError,
    /// Requested frequency or divider combination is out of range.
    ParamInvalid,
    /// Generic failure.
    Error,
}

// =============================================================================
// Clock domains
// =============================================================================

/// Every clock tracked by the registry.
///
/// The discriminant is the registry index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDomain {
    Firc = 0,
    FircDivH,
    FircDivM,
    FircDivL,
    Sirc,
    SircDivH,
    SircDivM,
    SircDivL,
    Fosc,
    FoscDivH,
    FoscDivM,
    FoscDivL,
    Sosc,
    Sirc32k,
    Pll0,
    Pll0DivH,
    Pll0DivM,
    Pll0DivL,
    Core,
    Bus,
    Slow,
    ClkOut,
}

impl ClockDomain {
    pub const COUNT: usize = 22;

    pub const ALL: [ClockDomain; Self::COUNT] = [
        ClockDomain::Firc,
        ClockDomain::FircDivH,
        ClockDomain::FircDivM,
        ClockDomain::FircDivL,
        ClockDomain::Sirc,
        ClockDomain::SircDivH,
        ClockDomain::SircDivM,
        ClockDomain::SircDivL,
        ClockDomain::Fosc,
        ClockDomain::FoscDivH,
        ClockDomain::FoscDivM,
        ClockDomain::FoscDivL,
        ClockDomain::Sosc,
        ClockDomain::Sirc32k,
        ClockDomain::Pll0,
        ClockDomain::Pll0DivH,
        ClockDomain::Pll0DivM,
        ClockDomain::Pll0DivL,
        ClockDomain::Core,
        ClockDomain::Bus,
        ClockDomain::Slow,
        ClockDomain::ClkOut,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl Source {
    /// Registry entry of the source itself.
    pub const fn domain(self) -> ClockDomain {
        match self {
            Source::Firc => ClockDomain::Firc,
            Source::Sirc => ClockDomain::Sirc,
            Source::Fosc => ClockDomain::Fosc,
            Source::Sosc => ClockDomain::Sosc,
            Source::Sirc32k => ClockDomain::Sirc32k,
            Source::Pll0 => ClockDomain::Pll0,
        }
    }

    /// Registry entries of the high/medium/low divider taps, if the source has any.
    pub const fn taps(self) -> Option<[ClockDomain; 3]> {
        match self {
            Source::Firc => Some([
                ClockDomain::FircDivH,
                ClockDomain::FircDivM,
                ClockDomain::FircDivL,
            ]),
            Source::Sirc => Some([
                ClockDomain::SircDivH,
                ClockDomain::SircDivM,
                ClockDomain::SircDivL,
            ]),
            Source::Fosc => Some([
                ClockDomain::FoscDivH,
                ClockDomain::FoscDivM,
                ClockDomain::FoscDivL,
            ]),
            Source::Pll0 => Some([
                ClockDomain::Pll0DivH,
                ClockDomain::Pll0DivM,
                ClockDomain::Pll0DivL,
            ]),
            Source::Sosc | Source::Sirc32k => None,
        }
    }
}

// =============================================================================
// Run clock
// =============================================================================

/// The source chain currently feeding the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunClock {
    Firc,
    Fosc,
    /// PLL0 with FIRC as its input.
    Pll0Firc,
    /// PLL0 with FOSC as its input.
    Pll0Fosc,
}

impl RunClock {
    /// Whether turning `src` off would stop the core clock.
    pub const fn depends_on(self, src: Source) -> bool {
        matches!(
            (self, src),
            (RunClock::Firc, Source::Firc)
                | (RunClock::Pll0Firc, Source::Firc)
                | (RunClock::Fosc, Source::Fosc)
                | (RunClock::Pll0Fosc, Source::Fosc)
                | (RunClock::Pll0Firc, Source::Pll0)
                | (RunClock::Pll0Fosc, Source::Pll0)
        )
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Status and frequency of one clock domain, as the registry keeps it.
///
/// Only [`ClockState::observed`] leaves the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct ClockState {
    pub status: ClockStatus,
    /// `None` while the clock is valid but its frequency has not been derived.
    pub frequency: Option<Hertz>,
}

impl ClockState {
    pub const UNDEFINED: Self = Self {
        status: ClockStatus::Undefined,
        frequency: Some(Hertz::ZERO),
    };

    pub const DISABLED: Self = Self {
        status: ClockStatus::Disabled,
        frequency: Some(Hertz::ZERO),
    };

    pub const fn valid(frequency: Hertz) -> Self {
        Self {
            status: ClockStatus::Valid,
            frequency: Some(frequency),
        }
    }

    /// Valid, frequency not known yet.
    pub const fn valid_unknown() -> Self {
        Self {
            status: ClockStatus::Valid,
            frequency: None,
        }
    }

    pub const fn valid_or_unknown(frequency: Option<Hertz>) -> Self {
        Self {
            status: ClockStatus::Valid,
            frequency,
        }
    }

    pub const fn is_valid(&self) -> bool {
        matches!(self.status, ClockStatus::Valid)
    }

    /// Frequency if the clock is valid and its frequency is known.
    pub fn running_frequency(&self) -> Option<Hertz> {
        if self.is_valid() {
            self.frequency
        } else {
            None
        }
    }

    /// The externally visible `(status, frequency)` pair.
    ///
    /// Anything that is not valid reads 0 Hz, and a valid clock whose
    /// frequency is still unknown reads as `Undefined`.
    pub fn observed(&self) -> (ClockStatus, Hertz) {
        match (self.status, self.frequency) {
            (ClockStatus::Valid, Some(f)) => (ClockStatus::Valid, f),
            (ClockStatus::Valid, None) => (ClockStatus::Undefined, Hertz::ZERO),
            (status, _) => (status, Hertz::ZERO),
        }
    }
}

/// In-memory model of every clock domain plus the active run clock.
#[derive(Debug, Clone)]
pub struct Registry {
    states: [ClockState; ClockDomain::COUNT],
    run_clock: Option<RunClock>,
    populated: bool,
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            states: [ClockState::UNDEFINED; ClockDomain::COUNT],
            run_clock: None,
            populated: false,
        }
    }

    pub(crate) fn get(&self, domain: ClockDomain) -> ClockState {
        self.states[domain.index()]
    }

    /// Externally visible `(status, frequency)` of `domain`.
    pub fn observed(&self, domain: ClockDomain) -> (ClockStatus, Hertz) {
        self.get(domain).observed()
    }

    pub(crate) fn set(&mut self, domain: ClockDomain, state: ClockState) {
        self.states[domain.index()] = state;
    }

    pub fn run_clock(&self) -> Option<RunClock> {
        self.run_clock
    }

    pub(crate) fn set_run_clock(&mut self, run_clock: Option<RunClock>) {
        self.run_clock = run_clock;
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub(crate) fn mark_populated(&mut self) {
        self.populated = true;
    }

    /// Frequency of `domain` if it is running at a known rate.
    pub(crate) fn running_frequency(&self, domain: ClockDomain) -> Option<Hertz> {
        self.get(domain).running_frequency()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
