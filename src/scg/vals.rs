//! Field values shared by the settings records and the hardware access layer.
//!
//! Each enum mirrors one register field. `to_bits`/`from_bits` give the raw
//! field encoding for implementations of [`ScgHardware`](super::ScgHardware).

/// Physical clock sources managed by the SCG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    /// 96 MHz fast internal RC oscillator.
    Firc,
    /// 12 MHz slow internal RC oscillator.
    Sirc,
    /// Fast external crystal oscillator.
    Fosc,
    /// Slow external crystal oscillator.
    Sosc,
    /// 32 kHz low-power internal RC oscillator.
    Sirc32k,
    /// The system PLL.
    Pll0,
}

/// Sources watched by the clock monitor, in interrupt dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitoredSource {
    Sirc,
    Sosc,
    Fosc,
    Pll0,
    Firc,
}

impl MonitoredSource {
    /// All monitored sources in the order the interrupt handler polls them.
    pub const ALL: [MonitoredSource; 5] = [
        MonitoredSource::Sirc,
        MonitoredSource::Sosc,
        MonitoredSource::Fosc,
        MonitoredSource::Pll0,
        MonitoredSource::Firc,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Asynchronous divider tap ratio (DIVH/DIVM/DIVL fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AsyncDiv {
    #[default]
    Div1 = 0,
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
    Div32 = 5,
    Div64 = 6,
}

impl AsyncDiv {
    pub const fn to_bits(self) -> u8 {
        self as u8
    }

    /// Decode a raw field value. The reserved encoding reads as `Div64`.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x7 {
            0 => AsyncDiv::Div1,
            1 => AsyncDiv::Div2,
            2 => AsyncDiv::Div4,
            3 => AsyncDiv::Div8,
            4 => AsyncDiv::Div16,
            5 => AsyncDiv::Div32,
            _ => AsyncDiv::Div64,
        }
    }

    /// Right shift applied to the parent frequency.
    pub const fn shift(self) -> u32 {
        self as u32
    }
}

/// PLL input selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PllSource {
    /// FIRC, halved by the fixed input prescaler.
    Firc,
    /// FOSC, fed directly.
    Fosc,
}

/// PLL reference pre-divider, `input / (prediv + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PllPrediv {
    #[default]
    Div1 = 0,
    Div2 = 1,
    Div3 = 2,
    Div4 = 3,
    Div5 = 4,
    Div6 = 5,
    Div7 = 6,
    Div8 = 7,
}

impl PllPrediv {
    pub const fn to_bits(self) -> u8 {
        self as u8
    }

    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x7 {
            0 => PllPrediv::Div1,
            1 => PllPrediv::Div2,
            2 => PllPrediv::Div3,
            3 => PllPrediv::Div4,
            4 => PllPrediv::Div5,
            5 => PllPrediv::Div6,
            6 => PllPrediv::Div7,
            _ => PllPrediv::Div8,
        }
    }

    /// Division ratio.
    pub const fn ratio(self) -> u32 {
        self as u32 + 1
    }
}

/// Sources the core clock can run from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SysClkSource {
    Firc,
    Fosc,
    Pll0,
}

impl SysClkSource {
    pub const fn to_bits(self) -> u8 {
        match self {
            SysClkSource::Fosc => 1,
            SysClkSource::Firc => 3,
            SysClkSource::Pll0 => 6,
        }
    }

    /// Decode the SCS status field. Values with no selectable source give `None`.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(SysClkSource::Fosc),
            3 => Some(SysClkSource::Firc),
            6 => Some(SysClkSource::Pll0),
            _ => None,
        }
    }
}

/// Core/bus/slow clock divider, `input / (div + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SysClkDiv {
    #[default]
    Div1 = 0,
    Div2 = 1,
    Div3 = 2,
    Div4 = 3,
    Div5 = 4,
    Div6 = 5,
    Div7 = 6,
    Div8 = 7,
    Div9 = 8,
    Div10 = 9,
    Div11 = 10,
    Div12 = 11,
    Div13 = 12,
    Div14 = 13,
    Div15 = 14,
    Div16 = 15,
}

impl SysClkDiv {
    pub const fn to_bits(self) -> u8 {
        self as u8
    }

    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0xf {
            0 => SysClkDiv::Div1,
            1 => SysClkDiv::Div2,
            2 => SysClkDiv::Div3,
            3 => SysClkDiv::Div4,
            4 => SysClkDiv::Div5,
            5 => SysClkDiv::Div6,
            6 => SysClkDiv::Div7,
            7 => SysClkDiv::Div8,
            8 => SysClkDiv::Div9,
            9 => SysClkDiv::Div10,
            10 => SysClkDiv::Div11,
            11 => SysClkDiv::Div12,
            12 => SysClkDiv::Div13,
            13 => SysClkDiv::Div14,
            14 => SysClkDiv::Div15,
            _ => SysClkDiv::Div16,
        }
    }

    /// Division ratio.
    pub const fn ratio(self) -> u32 {
        self as u32 + 1
    }
}

/// Clock routed to the CLKOUT pin (CLKOUTSEL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClkOutSource {
    #[default]
    Off,
    Fosc,
    Sirc,
    Firc,
    Sosc,
    Pll0,
    Sirc32k,
}

impl ClkOutSource {
    pub const fn to_bits(self) -> u8 {
        match self {
            ClkOutSource::Off => 0,
            ClkOutSource::Fosc => 1,
            ClkOutSource::Sirc => 2,
            ClkOutSource::Firc => 3,
            ClkOutSource::Sosc => 4,
            ClkOutSource::Pll0 => 6,
            ClkOutSource::Sirc32k => 7,
        }
    }

    /// Decode CLKOUTSEL. Reserved values give `None`.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(ClkOutSource::Off),
            1 => Some(ClkOutSource::Fosc),
            2 => Some(ClkOutSource::Sirc),
            3 => Some(ClkOutSource::Firc),
            4 => Some(ClkOutSource::Sosc),
            6 => Some(ClkOutSource::Pll0),
            7 => Some(ClkOutSource::Sirc32k),
            _ => None,
        }
    }
}

/// Clock feeding the flash controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvmClkSource {
    #[default]
    Firc,
    Sirc,
}

/// Reference used by the IRC auto-trim logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrimSource {
    #[default]
    Fosc,
    Sosc,
}
