#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod utils;

pub mod scg;
pub mod time;

// Reexports
pub use scg::{ClockDomain, ClockStatus, Error, Scg, ScgHardware, SharedScg};
pub use time::Hertz;
