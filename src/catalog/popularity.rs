/// Symbols listed first in the token selector, in this order.
pub const POPULAR_CRYPTOS: &[&str] = &["ETH", "USD", "WBTC", "USDC", "BUSD", "LUNA", "USC"];

/// Rank for symbols missing from the popularity list.
pub const UNRANKED: usize = 9999;

/// Position of `symbol` in [`POPULAR_CRYPTOS`], case-insensitive.
pub fn popularity_index(symbol: &str) -> usize {
    let upper = symbol.to_uppercase();
    POPULAR_CRYPTOS
        .iter()
        .position(|s| *s == upper)
        .unwrap_or(UNRANKED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_listed_symbols() {
        assert_eq!(popularity_index("ETH"), 0);
        assert_eq!(popularity_index("usd"), 1);
        assert_eq!(popularity_index("USC"), 6);
        assert_eq!(popularity_index("ATOM"), UNRANKED);
    }
}
