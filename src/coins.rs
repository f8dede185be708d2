/// KRW-market tickers the trading agent can be pointed at
const AVAILABLE_COINS: &[&str] = &[
    // Majors
    "BTC", "ETH", "XRP", "SOL", "DOGE", "ADA", "TRX", "LINK", "AVAX", "DOT",
    // Large caps
    "BCH", "XLM", "ETC", "SUI", "HBAR", "NEAR", "APT", "ATOM", "SHIB", "UNI",
    // Mid caps
    "AAVE", "ARB", "OP", "SAND", "MANA", "ALGO", "FLOW", "STX", "SEI", "POL",
];

/// Tickers that can be added to the tracked list, in display order
pub fn available_coins() -> &'static [&'static str] {
    AVAILABLE_COINS
}

/// Whether `name` is an available ticker (exact, case-sensitive match)
pub fn is_available(name: &str) -> bool {
    AVAILABLE_COINS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_coins() {
        assert!(is_available("BTC"));
        assert!(!is_available("btc"));
        assert!(!is_available("KRW"));
        assert_eq!(available_coins()[0], "BTC");
    }
}
