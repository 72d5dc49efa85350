//! Hardware readback into the clock registry.

use super::clock::{ClockDomain, ClockState, CLK_FIRC_FREQ, CLK_SIRC32K_FREQ, CLK_SIRC_FREQ};
use super::hw::{DividerReg, ScgHardware};
use super::vals::{Source, SysClkSource};
use super::{derive, Scg};
use crate::time::Hertz;

impl<H: ScgHardware> Scg<H> {
    /// Populate the registry from the hardware once.
    ///
    /// Crystal frequencies are not known at this point, so a running FOSC or
    /// SOSC reads as valid with an unknown frequency until it is configured.
    pub fn ensure_initialized(&mut self) {
        if self.registry.is_populated() {
            return;
        }

        self.refresh_source(Source::Firc, Some(CLK_FIRC_FREQ));
        self.refresh_source(Source::Sirc, Some(CLK_SIRC_FREQ));
        self.refresh_source(Source::Fosc, None);
        self.refresh_source(Source::Sirc32k, Some(CLK_SIRC32K_FREQ));
        self.refresh_source(Source::Sosc, None);
        self.refresh_pll0();
        self.refresh_clock_out();
        self.refresh_sys_clock();
        self.registry.mark_populated();

        debug!("scg: registry populated, run clock {:?}", self.registry.run_clock());
        self.trace_registry();
    }

    /// Re-read an oscillator and its divider taps.
    ///
    /// `nominal` is the frequency the oscillator runs at when valid.
    pub(crate) fn refresh_source(&mut self, src: Source, nominal: Option<Hertz>) {
        if src == Source::Pll0 {
            self.refresh_pll0();
            return;
        }

        match src {
            Source::Fosc => self.fosc_freq = nominal,
            Source::Sosc => self.sosc_freq = nominal,
            _ => {}
        }

        let valid = self.hw.is_valid(src);
        let state = derive::oscillator(valid, nominal);
        self.registry.set(src.domain(), state);
        self.refresh_taps(src, valid, &state);
    }

    pub(crate) fn refresh_pll0(&mut self) {
        let valid = self.hw.is_valid(Source::Pll0);
        let state = if valid {
            let setting = self.hw.pll_setting();
            derive::pll(true, setting.source, setting.prediv, setting.mult, &self.registry)
        } else {
            ClockState::DISABLED
        };
        self.registry.set(ClockDomain::Pll0, state);
        self.refresh_taps(Source::Pll0, valid, &state);
    }

    fn refresh_taps(&mut self, src: Source, valid: bool, parent: &ClockState) {
        let Some(domains) = src.taps() else {
            return;
        };
        let divider = if valid {
            self.hw.divider(src)
        } else {
            DividerReg::default()
        };
        for (domain, state) in domains.into_iter().zip(derive::taps(parent, &divider)) {
            self.registry.set(domain, state);
        }
    }

    pub(crate) fn refresh_clock_out(&mut self) {
        let bits = self.hw.clock_out_bits();
        let state = derive::clock_out(bits, &self.registry);
        self.registry.set(ClockDomain::ClkOut, state);
    }

    /// Re-derive core/bus/slow and the run clock from what the hardware reports.
    pub(crate) fn refresh_sys_clock(&mut self) {
        let current = SysClkSource::from_bits(self.hw.current_source());
        let dividers = self.hw.current_dividers();
        let pll_input = self.hw.pll_setting().source;
        let tree = derive::sys_clock(current, &dividers, pll_input, &self.registry);

        self.registry.set(ClockDomain::Core, tree.core);
        self.registry.set(ClockDomain::Bus, tree.bus);
        self.registry.set(ClockDomain::Slow, tree.slow);
        self.registry.set_run_clock(tree.run_clock);
    }

    /// Refresh `src` and everything fed by it.
    pub(crate) fn refresh_after(&mut self, src: Source) {
        let nominal = match src {
            Source::Firc => Some(CLK_FIRC_FREQ),
            Source::Sirc => Some(CLK_SIRC_FREQ),
            Source::Sirc32k => Some(CLK_SIRC32K_FREQ),
            Source::Fosc => self.fosc_freq,
            Source::Sosc => self.sosc_freq,
            Source::Pll0 => None,
        };
        self.refresh_source(src, nominal);
        if matches!(src, Source::Firc | Source::Fosc) {
            self.refresh_pll0();
        }
        self.refresh_sys_clock();
        self.refresh_clock_out();
        self.trace_registry();
    }

    fn trace_registry(&self) {
        for domain in ClockDomain::ALL {
            let state = self.registry.get(domain);
            trace!("scg: {:?} = {:?} {:?}", domain, state.status, state.frequency);
        }
    }
}
