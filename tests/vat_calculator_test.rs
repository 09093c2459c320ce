use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use sistema_tpv::services::vat::compute_vat;

proptest! {
    // Any 2-decimal gross split at a Spanish band reassembles to within
    // one cent; the drift is accepted, never redistributed
    #[test]
    fn split_stays_within_one_cent(
        cents in 0i64..=10_000_000,
        rate in prop_oneof![Just(4), Just(10), Just(21)],
    ) {
        let gross = Decimal::new(cents, 2);
        let amounts = compute_vat(gross, rate);

        let drift = (amounts.net + amounts.vat - gross).abs();
        prop_assert!(
            drift <= dec!(0.01),
            "gross={} rate={} net={} vat={} drift={}",
            gross, rate, amounts.net, amounts.vat, drift
        );
    }

    #[test]
    fn components_are_cent_amounts(
        cents in 0i64..=10_000_000,
        rate in 0i32..=100,
    ) {
        let gross = Decimal::new(cents, 2);
        let amounts = compute_vat(gross, rate);

        prop_assert!(amounts.net >= Decimal::ZERO);
        prop_assert!(amounts.vat >= Decimal::ZERO);
        prop_assert!(amounts.net.scale() <= 2);
        prop_assert!(amounts.vat.scale() <= 2);
        prop_assert_eq!(amounts.gross, gross);

        let drift = (amounts.net + amounts.vat - gross).abs();
        prop_assert!(drift <= dec!(0.01));
    }

    // A zero rate passes the gross through untouched
    #[test]
    fn zero_rate_is_identity(cents in 0i64..=10_000_000) {
        let gross = Decimal::new(cents, 2);
        let amounts = compute_vat(gross, 0);

        prop_assert_eq!(amounts.net, gross);
        prop_assert_eq!(amounts.vat, Decimal::ZERO);
    }

    // A higher gross never yields a lower net at the same rate
    #[test]
    fn net_is_monotonic_in_gross(
        cents in 0i64..10_000_000,
        rate in prop_oneof![Just(4), Just(10), Just(21)],
    ) {
        let lower = compute_vat(Decimal::new(cents, 2), rate);
        let higher = compute_vat(Decimal::new(cents + 1, 2), rate);

        prop_assert!(higher.net >= lower.net);
    }
}

#[test]
fn splits_each_spanish_band_exactly() {
    let at_21 = compute_vat(dec!(121.00), 21);
    assert_eq!(at_21.net, dec!(100.00));
    assert_eq!(at_21.vat, dec!(21.00));

    let at_10 = compute_vat(dec!(110.00), 10);
    assert_eq!(at_10.net, dec!(100.00));
    assert_eq!(at_10.vat, dec!(10.00));

    let at_4 = compute_vat(dec!(104.00), 4);
    assert_eq!(at_4.net, dec!(100.00));
    assert_eq!(at_4.vat, dec!(4.00));
}

#[test]
fn midpoint_drift_is_kept_not_redistributed() {
    // 0.13 at 4% divides to exactly 0.125, so both halves round away
    // from zero and the parts exceed the whole by one cent
    let amounts = compute_vat(dec!(0.13), 4);
    assert_eq!(amounts.net, dec!(0.13));
    assert_eq!(amounts.vat, dec!(0.01));
    assert_eq!(amounts.net + amounts.vat - amounts.gross, dec!(0.01));
}

#[test]
fn one_cent_gross_at_top_band() {
    let amounts = compute_vat(dec!(0.01), 21);
    assert_eq!(amounts.net, dec!(0.01));
    assert_eq!(amounts.vat, dec!(0.00));
}

#[test]
fn large_amounts_split_without_float_noise() {
    let amounts = compute_vat(dec!(99999999.99), 21);
    assert_eq!(amounts.net, dec!(82644628.09));
    assert_eq!(amounts.vat, dec!(17355371.90));
    assert_eq!(amounts.net + amounts.vat, dec!(99999999.99));
}
