//! Small conversions between Solidity ABI values and plain Rust values

use crate::error::{EthereumCleanupError, Result};
use alloy::primitives::utils::format_units;
use alloy::primitives::{Address, I256, U256};

/// Empty Solidity string becomes `None`
pub fn optional_string(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Zero address becomes `None`
pub fn optional_address(addr: Address) -> Option<Address> {
    (addr != Address::ZERO).then_some(addr)
}

/// Saturates at `u64::MAX`
pub fn u256_to_u64(value: U256) -> u64 {
    value.saturating_to::<u64>()
}

/// Unset timestamps are stored as 0
pub fn optional_timestamp(value: U256) -> Option<u64> {
    Some(u256_to_u64(value)).filter(|ts| *ts != 0)
}

pub fn i256_to_i64(value: I256) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| EthereumCleanupError::Conversion(format!("int256 {} does not fit in i64", value)))
}

pub fn i64_to_i256(value: i64) -> I256 {
    I256::try_from(value).unwrap_or(I256::ZERO)
}

/// Token amount in base units as a display float
pub fn units_to_f64(amount: U256, decimals: u8) -> f64 {
    format_units(amount, decimals)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0)
}
