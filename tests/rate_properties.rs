//! Property tests for the exchange rate calculator and the amount helpers
//! it feeds.

use proptest::prelude::*;
use token_swap::amount::{parse_amount, round_to_8, sanitize_amount};
use token_swap::rate::exchange_rate;

fn arb_price() -> impl Strategy<Value = f64> {
    1e-6f64..1e9
}

proptest! {
    #[test]
    fn rate_is_price_ratio(pa in arb_price(), pb in arb_price()) {
        prop_assert_eq!(exchange_rate(Some(pa), Some(pb)), pa / pb);
    }

    #[test]
    fn rate_and_inverse_multiply_to_one(pa in arb_price(), pb in arb_price()) {
        let product = exchange_rate(Some(pa), Some(pb)) * exchange_rate(Some(pb), Some(pa));
        prop_assert!((product - 1.0).abs() < 1e-9, "product was {}", product);
    }

    #[test]
    fn rate_is_zero_without_both_prices(pa in arb_price()) {
        prop_assert_eq!(exchange_rate(Some(pa), None), 0.0);
        prop_assert_eq!(exchange_rate(None, Some(pa)), 0.0);
        prop_assert_eq!(exchange_rate(Some(pa), Some(0.0)), 0.0);
    }

    #[test]
    fn sanitized_input_has_at_most_one_point(raw in ".{0,24}") {
        let clean = sanitize_amount(&raw);
        prop_assert!(clean.chars().all(|c| c.is_ascii_digit() || c == '.'));
        prop_assert!(clean.matches('.').count() <= 1);
    }

    #[test]
    fn rounded_amounts_parse_back(value in 0.0f64..1e9) {
        let rounded = round_to_8(value);
        let parsed = parse_amount(&rounded).expect("rounded output is numeric");
        prop_assert!((parsed - value).abs() <= 5e-9 + value * 1e-15);
    }
}
