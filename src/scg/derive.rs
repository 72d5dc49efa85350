//! Derived clock computation.
//!
//! Everything here is a pure function of a hardware readback and the upstream
//! registry entries; the readback itself lives in `clock_read`.

use super::clock::{ClockDomain, ClockState, ClockStatus, Registry, RunClock};
use super::hw::{DividerReg, SysDividers};
use super::vals::{AsyncDiv, ClkOutSource, PllPrediv, PllSource, SysClkSource};
use crate::time::Hertz;

/// State of an oscillator from its valid flag and nominal frequency.
///
/// `frequency` is `None` for a crystal whose frequency has not been supplied.
pub(crate) fn oscillator(valid: bool, frequency: Option<Hertz>) -> ClockState {
    if valid {
        ClockState::valid_or_unknown(frequency)
    } else {
        ClockState::DISABLED
    }
}

/// State of one divider tap.
///
/// The tap follows its own enable bit, but keeps its nominal frequency even
/// while disabled. A stopped parent stops every tap.
pub(crate) fn tap(parent: &ClockState, enabled: bool, div: AsyncDiv) -> ClockState {
    if !parent.is_valid() {
        return ClockState::DISABLED;
    }
    let frequency = parent.frequency.map(|f| f >> div.shift());
    if enabled {
        ClockState::valid_or_unknown(frequency)
    } else {
        ClockState {
            status: ClockStatus::Disabled,
            frequency,
        }
    }
}

/// States of the high/medium/low taps of a divided source.
pub(crate) fn taps(parent: &ClockState, divider: &DividerReg) -> [ClockState; 3] {
    [
        tap(parent, divider.enabled.high, divider.taps.high),
        tap(parent, divider.enabled.mid, divider.taps.mid),
        tap(parent, divider.enabled.low, divider.taps.low),
    ]
}

/// PLL output for a given input clock.
///
/// `prescaled / (prediv + 1) * (mult + 16) / 2`, where the FIRC input passes
/// through the fixed /2 input prescaler first.
pub fn pll_output(source: PllSource, input: Hertz, prediv: PllPrediv, mult: u8) -> Hertz {
    let prescaled = match source {
        PllSource::Firc => input.0 / 2,
        PllSource::Fosc => input.0,
    };
    let out = (prescaled / prediv.ratio()) as u64 * (mult as u64 + 16) / 2;
    Hertz(out.min(u32::MAX as u64) as u32)
}

/// Registry entry feeding the PLL for a given input selection.
pub(crate) const fn pll_input_domain(source: PllSource) -> ClockDomain {
    match source {
        PllSource::Firc => ClockDomain::Firc,
        PllSource::Fosc => ClockDomain::Fosc,
    }
}

/// State of the PLL output.
///
/// A locked PLL whose input is not running at a known rate stays valid with
/// an unknown frequency.
pub(crate) fn pll(
    valid: bool,
    source: PllSource,
    prediv: PllPrediv,
    mult: u8,
    registry: &Registry,
) -> ClockState {
    if !valid {
        return ClockState::DISABLED;
    }
    let frequency = registry
        .running_frequency(pll_input_domain(source))
        .map(|input| pll_output(source, input, prediv, mult));
    ClockState::valid_or_unknown(frequency)
}

/// Core, bus and slow clocks for a given source frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysFrequencies {
    pub core: Hertz,
    pub bus: Hertz,
    pub slow: Hertz,
}

impl SysFrequencies {
    pub fn new(source: Hertz, dividers: &SysDividers) -> Self {
        let core = source / dividers.core.ratio();
        Self {
            core,
            bus: core / dividers.bus.ratio(),
            slow: core / dividers.slow.ratio(),
        }
    }
}

/// Result of deriving the core clock tree.
pub(crate) struct SysClockTree {
    pub core: ClockState,
    pub bus: ClockState,
    pub slow: ClockState,
    pub run_clock: Option<RunClock>,
}

/// Derive core/bus/slow from the source the hardware reports as selected.
///
/// The run clock follows the selector alone: a source whose valid flag has
/// dropped still drives the core until the selector moves. The three clocks
/// always read valid; their frequency stays unknown when the selected source
/// is not running at a known rate.
pub(crate) fn sys_clock(
    current: Option<SysClkSource>,
    dividers: &SysDividers,
    pll_input: PllSource,
    registry: &Registry,
) -> SysClockTree {
    let (run_clock, source_freq) = match current {
        Some(SysClkSource::Firc) => (
            Some(RunClock::Firc),
            registry.running_frequency(ClockDomain::Firc),
        ),
        Some(SysClkSource::Fosc) => (
            Some(RunClock::Fosc),
            registry.running_frequency(ClockDomain::Fosc),
        ),
        Some(SysClkSource::Pll0) => {
            let run_clock = match pll_input {
                PllSource::Firc => RunClock::Pll0Firc,
                PllSource::Fosc => RunClock::Pll0Fosc,
            };
            (Some(run_clock), registry.running_frequency(ClockDomain::Pll0))
        }
        None => (None, None),
    };

    match source_freq {
        Some(f) => {
            let freqs = SysFrequencies::new(f, dividers);
            SysClockTree {
                core: ClockState::valid(freqs.core),
                bus: ClockState::valid(freqs.bus),
                slow: ClockState::valid(freqs.slow),
                run_clock,
            }
        }
        None => SysClockTree {
            core: ClockState::valid_unknown(),
            bus: ClockState::valid_unknown(),
            slow: ClockState::valid_unknown(),
            run_clock,
        },
    }
}

/// State of the CLKOUT pin for a raw CLKOUTSEL value.
pub(crate) fn clock_out(bits: u8, registry: &Registry) -> ClockState {
    let domain = match ClkOutSource::from_bits(bits) {
        None => return ClockState::UNDEFINED,
        Some(ClkOutSource::Off) => return ClockState::DISABLED,
        Some(ClkOutSource::Fosc) => ClockDomain::Fosc,
        Some(ClkOutSource::Sirc) => ClockDomain::Sirc,
        Some(ClkOutSource::Firc) => ClockDomain::Firc,
        Some(ClkOutSource::Sosc) => ClockDomain::Sosc,
        Some(ClkOutSource::Pll0) => ClockDomain::Pll0,
        Some(ClkOutSource::Sirc32k) => ClockDomain::Sirc32k,
    };
    registry.get(domain)
}
