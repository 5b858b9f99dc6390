use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use settlement_orchestrator::domain::money::Settlement;

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[test]
fn test_settlement_invariant_for_random_amounts() {
    let mut rng = rand::thread_rng();
    let rates = [dec!(5.00), dec!(5.37), dec!(0.18)];
    let spreads = [dec!(0.01), dec!(0.025), Decimal::ZERO];

    for _ in 0..1_000 {
        // Up to one million with three decimals.
        let amount = Decimal::new(rng.gen_range(0..1_000_000_000), 3);
        let rate = rates[rng.gen_range(0..rates.len())];
        let spread = spreads[rng.gen_range(0..spreads.len())];

        let s = Settlement::compute(amount, rate, spread).unwrap();

        assert_eq!(s.gross, round2(amount * rate), "gross for {amount} @ {rate}");
        assert_eq!(s.fee, round2(s.gross * spread), "fee for {amount} @ {rate}");
        assert_eq!(s.net, s.gross - s.fee, "net for {amount} @ {rate}");
        assert!(s.net >= Decimal::ZERO);
        assert!(s.gross.scale() <= 2 && s.fee.scale() <= 2 && s.net.scale() <= 2);
    }
}

#[test]
fn test_reference_scenario() {
    let s = Settlement::compute(dec!(2000), dec!(5.00), dec!(0.01)).unwrap();
    assert_eq!(
        (s.gross, s.fee, s.net),
        (dec!(10000.00), dec!(100.00), dec!(9900.00))
    );
}
