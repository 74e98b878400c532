// Short display symbol for a Move coin type, e.g. `0x2::sui::SUI` -> `SUI`
pub fn symbol_from_coin_type(coin_type: &str) -> String {
    coin_type.rsplit("::").next().unwrap_or_default().to_string()
}

// Symbol to show for a position, deriving one from the coin type when the source had none
pub fn display_symbol(symbol: &str, coin_type: &str) -> String {
    if symbol.is_empty() {
        symbol_from_coin_type(coin_type)
    } else {
        symbol.to_string()
    }
}

// First `len` characters of an address, used to name per-address files
pub fn address_prefix(address: &str, len: usize) -> String {
    address.chars().take(len).collect()
}

// Format large numbers for display
pub fn format_large_number(num: f64) -> String {
    const BILLION: f64 = 1_000_000_000.0;
    const MILLION: f64 = 1_000_000.0;
    const THOUSAND: f64 = 1_000.0;

    match num {
        n if n >= BILLION => format!("{:.2}bn", n / BILLION),
        n if n >= MILLION => format!("{:.2}m", n / MILLION),
        n if n >= THOUSAND => format!("{:.2}k", n / THOUSAND),
        n if n.is_nan() => "-".to_string(),
        _ => format!("{:.4}", num),
    }
}
