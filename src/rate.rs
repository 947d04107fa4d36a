//! Exchange rate between two catalog tokens.

/// `from_price / to_price`, or `0.0` when no rate is available.
///
/// A missing price on either side, a zero `from_price` or a non-positive
/// `to_price` all yield `0.0`, which callers treat as "hide the rate".
pub fn exchange_rate(from_price: Option<f64>, to_price: Option<f64>) -> f64 {
    match (from_price, to_price) {
        (Some(from), Some(to)) if from != 0.0 && to > 0.0 => from / to,
        _ => 0.0,
    }
}

/// Rate rendered with eight decimals, e.g. `3000.00000000`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.8}", rate)
}

/// `1 ETH = 3000.00000000 USD`, or `None` when there is no rate to show.
pub fn describe_rate(from_symbol: &str, to_symbol: &str, rate: f64) -> Option<String> {
    if rate <= 0.0 {
        return None;
    }
    Some(format!(
        "1 {} = {} {}",
        from_symbol,
        format_rate(rate),
        to_symbol
    ))
}
