//! Property-based tests for gain and rate newtypes.
//! Verifies invariants hold for ALL inputs, not just fixed examples.

use codec_hal::{GainDb, SampleRate};

proptest::proptest! {
    /// GainDb::clamped never leaves the expressible range.
    #[test]
    fn gain_clamped_stays_in_range(half_db in proptest::num::i16::ANY) {
        let g = GainDb::clamped(half_db);
        assert!(g.half_db() >= GainDb::MIN_HALF_DB);
        assert!(g.half_db() <= GainDb::MAX_HALF_DB);
    }

    /// try_from_half_db agrees with clamped inside the range and errs outside.
    #[test]
    fn gain_try_from_agrees_with_clamped(half_db in proptest::num::i16::ANY) {
        match GainDb::try_from_half_db(half_db) {
            Ok(g) => assert_eq!(g, GainDb::clamped(half_db)),
            Err(e) => {
                assert_eq!(e.value, i32::from(half_db));
                assert_ne!(GainDb::clamped(half_db).half_db(), half_db);
            }
        }
    }

    /// Whole-dB construction is monotone.
    #[test]
    fn gain_db_is_monotone(a in proptest::num::i8::ANY, b in proptest::num::i8::ANY) {
        if a <= b {
            assert!(GainDb::db(a) <= GainDb::db(b),
                "db({}) should not be louder than db({})", a, b);
        }
    }

    /// SampleRate::from_hz never panics and only accepts the five demo rates.
    #[test]
    fn sample_rate_from_hz_is_closed(hz in proptest::num::u32::ANY) {
        match SampleRate::from_hz(hz) {
            Ok(rate) => assert_eq!(rate.hz(), hz),
            Err(e) => {
                assert_eq!(e.hz, hz);
                assert!(SampleRate::ALL.iter().all(|r| r.hz() != hz));
            }
        }
    }
}
