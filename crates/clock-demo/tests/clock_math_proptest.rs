//! Property-based tests for the TLV320DAC3100 clock-plan search.
//! Every plan the search returns must satisfy the datasheet limits.

use clock_demo::audio::clock_math::{
    bclk_hz, plan, ClockPlan, PllClockIn, DAC_CLK_MAX_HZ, DAC_MOD_CLK_MAX_HZ, DAC_MOD_CLK_MIN_HZ,
    MAX_ERROR_PPM, MIN_MDAC_X_DOSR, PLL_IN_MAX_HZ, PLL_IN_MIN_HZ, PLL_OUT_MAX_HZ, PLL_OUT_MIN_HZ,
};
use clock_demo::config::BCLK_PER_FRAME;
use proptest::prelude::*;

fn assert_plan_is_legal(p: &ClockPlan) {
    let pll_in = u64::from(p.pll_clkin_hz) / u64::from(p.p);
    assert!((u64::from(PLL_IN_MIN_HZ)..=u64::from(PLL_IN_MAX_HZ)).contains(&pll_in));
    assert!((u64::from(PLL_OUT_MIN_HZ)..=u64::from(PLL_OUT_MAX_HZ)).contains(&p.pll_clk_hz()));
    assert!(p.dac_clk_hz() <= u64::from(DAC_CLK_MAX_HZ));
    assert!(p.dac_mod_clk_hz() >= u64::from(DAC_MOD_CLK_MIN_HZ) - 1);
    assert!(p.dac_mod_clk_hz() <= u64::from(DAC_MOD_CLK_MAX_HZ));
    assert!(u32::from(p.mdac) * u32::from(p.dosr) >= MIN_MDAC_X_DOSR);
    assert!((4..=55).contains(&p.j));
    assert!((1..=4).contains(&p.r));
    assert_eq!(p.d, 0);
}

proptest! {
    // Each case is a full search; keep the count modest.
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any plan found from an arbitrary MCLK is within limits and budget.
    #[test]
    fn mclk_plans_are_legal(
        fs in prop::sample::select(vec![8_000u32, 11_025, 16_000, 22_050, 32_000, 44_100, 48_000]),
        mclk in 1_000_000u32..=50_000_000u32,
    ) {
        if let Some(p) = plan(fs, PllClockIn::Mclk, mclk) {
            assert_plan_is_legal(&p);
            prop_assert!(p.error_ppm() <= MAX_ERROR_PPM);
            prop_assert_eq!(p.pll_clkin_hz, mclk);
        }
    }

    /// BCLK = 64 fs always locks exactly for rates from 8 kHz to 48 kHz.
    #[test]
    fn bclk_plans_are_exact(fs in 8_000u32..=48_000u32) {
        let bclk = bclk_hz(fs, BCLK_PER_FRAME).unwrap();
        let p = plan(fs, PllClockIn::Bclk, bclk);
        prop_assert!(p.is_some(), "no BCLK plan for {} Hz", fs);
        let p = p.unwrap();
        assert_plan_is_legal(&p);
        prop_assert_eq!(p.error_ppb, 0);
    }

    /// The search never panics, whatever it is given.
    #[test]
    fn plan_never_panics(fs in any::<u32>(), input in any::<u32>()) {
        let _ = plan(fs, PllClockIn::Mclk, input);
    }
}
