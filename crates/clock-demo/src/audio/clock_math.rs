//! TLV320DAC3100 PLL and DAC divider search.
//!
//! # Clock Tree
//!
//! ```text
//!   PLL_CLKIN (MCLK or BCLK)
//!       -> /P          (1..=8)           512 kHz ..= 20 MHz
//!       -> x R x J.D   (R 1..=4, J 4..=55, D = 0)
//!   PLL_CLK                              80 MHz ..= 110 MHz
//!       -> /NDAC       (1..=128)
//!   DAC_CLK                              <= 49.152 MHz
//!       -> /MDAC       (1..=128)
//!   DAC_MOD_CLK                          2.8 MHz ..= 6.758 MHz
//!       -> /DOSR       (8..=1024, step 8)
//!   DAC_FS
//! ```
//!
//! D stays 0: the fractional PLL mode needs PLL_CLKIN/P >= 10 MHz, which
//! neither a 5 MHz MCLK nor any demo BCLK reaches.
//!
//! # Formula
//!
//!   DAC_FS = PLL_CLKIN x R x J / (P x NDAC x MDAC x DOSR)
//!
//! For a fixed (DOSR, P, R, J) the product NDAC x MDAC is forced to one of
//! the two integers around `PLL_CLK / (DAC_FS x DOSR)`, so the search is
//! over DOSR, P, R, J only, and each candidate product is then split into
//! NDAC x MDAC. All comparisons use exact integer cross-multiplication.
//!
//! # Processing block
//!
//! PRB_P1 (the power-on default) is resource class 8, which requires
//! MDAC x DOSR >= 8 x 32.
//!
//! # BCLK as PLL input
//!
//! BCLK = slots x slot width x fs, set by the I2S transport rather than the
//! sample word length. With two 32-bit slots (64 x fs) 8 kHz is exactly the
//! 512 kHz PLL input floor; with 16-bit slots (32 x fs) 8 kHz has no plan.
//!
//! Reference: TI TLV320DAC3100 datasheet (SLAS671), clock generation and
//! PLL sections.

/// Minimum PLL_CLKIN / P.
pub const PLL_IN_MIN_HZ: u32 = 512_000;
/// Maximum PLL_CLKIN / P.
pub const PLL_IN_MAX_HZ: u32 = 20_000_000;
/// Minimum PLL_CLK.
pub const PLL_OUT_MIN_HZ: u32 = 80_000_000;
/// Maximum PLL_CLK.
pub const PLL_OUT_MAX_HZ: u32 = 110_000_000;
/// Maximum DAC_CLK (after NDAC).
pub const DAC_CLK_MAX_HZ: u32 = 49_152_000;
/// Minimum DAC_MOD_CLK (after MDAC).
pub const DAC_MOD_CLK_MIN_HZ: u32 = 2_800_000;
/// Maximum DAC_MOD_CLK (after MDAC).
pub const DAC_MOD_CLK_MAX_HZ: u32 = 6_758_000;

/// PLL pre-divider range upper bound.
pub const P_MAX: u8 = 8;
/// PLL multiplier R upper bound.
pub const R_MAX: u8 = 4;
/// PLL integer multiplier J lower bound (D = 0).
pub const J_MIN: u8 = 4;
/// PLL integer multiplier J upper bound (D = 0).
pub const J_MAX: u8 = 55;
/// NDAC / MDAC upper bound.
pub const DIVIDER_MAX: u8 = 128;
/// DOSR granularity.
pub const DOSR_STEP: u16 = 8;
/// DOSR upper bound.
pub const DOSR_MAX: u16 = 1024;
/// PRB_P1 resource class 8 x 32.
pub const MIN_MDAC_X_DOSR: u32 = 256;


/// Largest sample-rate error a plan may have.
///
/// 1000 ppm is a 1.7 cent pitch shift: audible side by side, which is the
/// point of the demo, but well inside what the codec PLL locks to.
pub const MAX_ERROR_PPM: u32 = 1_000;

/// Which pin feeds the PLL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PllClockIn {
    /// MCLK pin.
    Mclk,
    /// I2S bit clock.
    Bclk,
}

/// A complete, validated set of clock dividers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockPlan {
    /// PLL input pin.
    pub pll_clkin: PllClockIn,
    /// PLL input frequency.
    pub pll_clkin_hz: u32,
    /// PLL pre-divider.
    pub p: u8,
    /// PLL multiplier R.
    pub r: u8,
    /// PLL integer multiplier J.
    pub j: u8,
    /// PLL fractional multiplier D (x 1/10000). Always 0.
    pub d: u16,
    /// DAC clock divider.
    pub ndac: u8,
    /// DAC modulator divider.
    pub mdac: u8,
    /// DAC oversampling ratio.
    pub dosr: u16,
    /// Sample-rate error in parts per billion.
    pub error_ppb: u32,
}

impl ClockPlan {
    /// PLL_CLK x P (exact numerator).
    fn pll_numerator(&self) -> u64 {
        u64::from(self.pll_clkin_hz)
            .saturating_mul(u64::from(self.r))
            .saturating_mul(u64::from(self.j))
    }

    /// PLL output frequency, rounded down.
    pub fn pll_clk_hz(&self) -> u64 {
        self.pll_numerator()
            .checked_div(u64::from(self.p))
            .unwrap_or(0)
    }

    /// DAC_CLK, rounded down.
    pub fn dac_clk_hz(&self) -> u64 {
        self.pll_clk_hz()
            .checked_div(u64::from(self.ndac))
            .unwrap_or(0)
    }

    /// DAC_MOD_CLK, rounded down.
    pub fn dac_mod_clk_hz(&self) -> u64 {
        self.dac_clk_hz()
            .checked_div(u64::from(self.mdac))
            .unwrap_or(0)
    }

    /// Resulting sample rate in millihertz.
    pub fn sample_rate_mhz(&self) -> u64 {
        let divisor = u64::from(self.p)
            .saturating_mul(u64::from(self.ndac))
            .saturating_mul(u64::from(self.mdac))
            .saturating_mul(u64::from(self.dosr));
        self.pll_numerator()
            .saturating_mul(1_000)
            .checked_div(divisor)
            .unwrap_or(0)
    }

    /// Sample-rate error in ppm, rounded up.
    pub fn error_ppm(&self) -> u32 {
        self.error_ppb.div_ceil(1_000)
    }
}

/// BCLK for `sample_rate_hz` with `bclk_per_frame` bit clocks per frame.
pub const fn bclk_hz(sample_rate_hz: u32, bclk_per_frame: u32) -> Option<u32> {
    sample_rate_hz.checked_mul(bclk_per_frame)
}

/// Best plan for `sample_rate_hz` from a `pll_clkin_hz` reference.
///
/// Returns `None` when no divider set lands within [`MAX_ERROR_PPM`].
/// Among equal errors the highest DOSR wins, then the smallest P, R, J.
// Loop bounds keep every product below 2^40: PLL_CLKIN <= 160 MHz (20 MHz x P),
// x R x J <= 220, and P x DAC_MOD_CLK x NDAC x MDAC <= 8 x 6.8 MHz x 16384.
#[allow(clippy::arithmetic_side_effects)]
pub fn plan(sample_rate_hz: u32, pll_clkin: PllClockIn, pll_clkin_hz: u32) -> Option<ClockPlan> {
    if sample_rate_hz == 0 || pll_clkin_hz == 0 {
        return None;
    }
    let fs = u64::from(sample_rate_hz);
    let input = u64::from(pll_clkin_hz);
    let mut best: Option<ClockPlan> = None;

    'search: for dosr in (DOSR_STEP..=DOSR_MAX).rev().step_by(usize::from(DOSR_STEP)) {
        let mod_clk = fs * u64::from(dosr);
        if mod_clk < u64::from(DAC_MOD_CLK_MIN_HZ) || mod_clk > u64::from(DAC_MOD_CLK_MAX_HZ) {
            continue;
        }
        for p in 1..=P_MAX {
            let p64 = u64::from(p);
            if input < u64::from(PLL_IN_MIN_HZ) * p64 || input > u64::from(PLL_IN_MAX_HZ) * p64 {
                continue;
            }
            for r in 1..=R_MAX {
                for j in J_MIN..=J_MAX {
                    let pll_num = input * u64::from(r) * u64::from(j);
                    if pll_num < u64::from(PLL_OUT_MIN_HZ) * p64
                        || pll_num > u64::from(PLL_OUT_MAX_HZ) * p64
                    {
                        continue;
                    }
                    let frame = p64 * mod_clk;
                    let k_floor = pll_num / frame;
                    for k in [k_floor, k_floor + 1] {
                        let Some((ndac, mdac)) = split_divider(pll_num, p64, k, dosr) else {
                            continue;
                        };
                        let target = frame * k;
                        let error = u128::from(pll_num.abs_diff(target)) * 1_000_000_000
                            / u128::from(target);
                        let Ok(error_ppb) = u32::try_from(error) else {
                            continue;
                        };
                        if best.is_some_and(|b| b.error_ppb <= error_ppb) {
                            continue;
                        }
                        best = Some(ClockPlan {
                            pll_clkin,
                            pll_clkin_hz,
                            p,
                            r,
                            j,
                            d: 0,
                            ndac,
                            mdac,
                            dosr,
                            error_ppb,
                        });
                        if error_ppb == 0 {
                            break 'search;
                        }
                    }
                }
            }
        }
    }

    best.filter(|b| b.error_ppb <= MAX_ERROR_PPM * 1_000)
}

/// Split `k` = NDAC x MDAC under the DAC_CLK, DAC_MOD_CLK and resource limits.
#[allow(clippy::arithmetic_side_effects)] // see `plan`
fn split_divider(pll_num: u64, p: u64, k: u64, dosr: u16) -> Option<(u8, u8)> {
    let max = u64::from(DIVIDER_MAX);
    if k == 0 || k > max * max {
        return None;
    }
    if pll_num > u64::from(DAC_MOD_CLK_MAX_HZ) * p * k
        || pll_num < u64::from(DAC_MOD_CLK_MIN_HZ) * p * k
    {
        return None;
    }
    let ndac_min = pll_num.div_ceil(u64::from(DAC_CLK_MAX_HZ) * p).max(1);
    (ndac_min..=max.min(k)).find_map(|ndac| {
        if k.checked_rem(ndac) != Some(0) {
            return None;
        }
        let mdac = k / ndac;
        if mdac > max || mdac * u64::from(dosr) < u64::from(MIN_MDAC_X_DOSR) {
            return None;
        }
        Some((u8::try_from(ndac).ok()?, u8::try_from(mdac).ok()?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BCLK_PER_FRAME;

    const MCLK_HZ: u32 = 5_000_000;
    const RATES: [u32; 5] = [8_000, 11_025, 22_050, 44_100, 48_000];

    fn assert_within_limits(plan: &ClockPlan) {
        let pll_in = u64::from(plan.pll_clkin_hz) / u64::from(plan.p);
        assert!(pll_in >= u64::from(PLL_IN_MIN_HZ), "PLL input {pll_in} Hz below floor");
        assert!(plan.pll_clk_hz() >= u64::from(PLL_OUT_MIN_HZ));
        assert!(plan.pll_clk_hz() <= u64::from(PLL_OUT_MAX_HZ));
        assert!(plan.dac_clk_hz() <= u64::from(DAC_CLK_MAX_HZ));
        assert!(plan.dac_mod_clk_hz() <= u64::from(DAC_MOD_CLK_MAX_HZ));
        assert!(u32::from(plan.mdac) * u32::from(plan.dosr) >= MIN_MDAC_X_DOSR);
        assert_eq!(plan.dosr % DOSR_STEP, 0);
    }

    /// BCLK is an exact multiple of fs, so every demo rate locks exactly.
    #[test]
    fn bclk_plans_are_exact() {
        for fs in RATES {
            let bclk = bclk_hz(fs, BCLK_PER_FRAME).unwrap();
            let plan = plan(fs, PllClockIn::Bclk, bclk)
                .unwrap_or_else(|| panic!("no BCLK plan for {fs} Hz"));
            assert_eq!(plan.error_ppb, 0, "BCLK plan for {fs} Hz should be exact");
            assert_eq!(plan.sample_rate_mhz(), u64::from(fs) * 1_000);
            assert_within_limits(&plan);
        }
    }

    /// 5 MHz is not a multiple of any audio rate; errors stay small.
    #[test]
    fn five_mhz_mclk_plans_stay_under_200_ppm() {
        for fs in RATES {
            let plan = plan(fs, PllClockIn::Mclk, MCLK_HZ)
                .unwrap_or_else(|| panic!("no MCLK plan for {fs} Hz"));
            assert!(
                plan.error_ppm() <= 200,
                "{fs} Hz from 5 MHz is {} ppm off",
                plan.error_ppm()
            );
            assert_within_limits(&plan);
        }
    }

    #[test]
    fn eight_khz_from_five_mhz_is_exact() {
        let plan = plan(8_000, PllClockIn::Mclk, MCLK_HZ).unwrap();
        assert_eq!(plan.error_ppb, 0);
        assert_eq!(plan.pll_clk_hz(), 96_000_000);
    }

    #[test]
    fn eight_khz_bclk_sits_on_pll_input_floor() {
        assert_eq!(bclk_hz(8_000, BCLK_PER_FRAME), Some(PLL_IN_MIN_HZ));
    }

    #[test]
    fn sixteen_bit_slots_halve_the_pll_input() {
        let bclk = bclk_hz(48_000, 32).unwrap();
        let plan = plan(48_000, PllClockIn::Bclk, bclk).unwrap();
        assert_eq!(plan.pll_clkin_hz, 1_536_000);
        assert_eq!((plan.p, plan.r, plan.j), (1, 2, 34));
        assert_eq!(plan.error_ppb, 0);
        // 256 kHz is below the PLL input floor.
        assert!(super::plan(8_000, PllClockIn::Bclk, bclk_hz(8_000, 32).unwrap()).is_none());
    }

    #[test]
    fn derived_clocks_of_an_empty_plan_are_zero() {
        let plan = ClockPlan {
            pll_clkin: PllClockIn::Mclk,
            pll_clkin_hz: MCLK_HZ,
            p: 0,
            r: 1,
            j: 4,
            d: 0,
            ndac: 0,
            mdac: 0,
            dosr: 0,
            error_ppb: 0,
        };
        assert_eq!(plan.pll_clk_hz(), 0);
        assert_eq!(plan.dac_clk_hz(), 0);
        assert_eq!(plan.dac_mod_clk_hz(), 0);
        assert_eq!(plan.sample_rate_mhz(), 0);
    }

    #[test]
    fn rates_beyond_error_budget_have_no_plan() {
        // Best 192 kHz split from 5 MHz is about 3 000 ppm off.
        assert!(plan(192_000, PllClockIn::Mclk, MCLK_HZ).is_none());
        assert!(plan(192_000, PllClockIn::Bclk, bclk_hz(192_000, BCLK_PER_FRAME).unwrap()).is_some());
        assert!(plan(1_000_000, PllClockIn::Mclk, MCLK_HZ).is_none());
    }

    #[test]
    fn slow_reference_has_no_plan() {
        assert!(plan(48_000, PllClockIn::Mclk, 100_000).is_none());
        assert!(plan(48_000, PllClockIn::Mclk, 0).is_none());
        assert!(plan(0, PllClockIn::Mclk, MCLK_HZ).is_none());
    }
}
