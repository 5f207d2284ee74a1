//! Unit conversion between display amounts and on-chain wei
//!
//! The marketplace contract prices everything in wei, the chain's smallest
//! unit. The interface only ever shows decimal ETH strings, so every amount
//! crosses through here on its way in or out.

use alloy_primitives::U256;
use alloy_primitives::utils::{UnitsError, format_ether, parse_ether};

/// Converts a decimal ETH string as typed in a form ("1.5") into wei.
pub fn to_wei(amount_in_ether: &str) -> Result<U256, UnitsError> {
    parse_ether(amount_in_ether.trim())
}

/// Renders a wei amount as a decimal ETH string with trailing zeros trimmed,
/// so 1500000000000000000 comes back as "1.5" and not "1.500000000000000000".
pub fn from_wei(amount: U256) -> String {
    let eth = format_ether(amount);
    let eth = eth.trim_end_matches('0');
    eth.trim_end_matches('.').to_string()
}
