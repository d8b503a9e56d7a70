use crate::error::{Error, Result};

/// Display string for a market value given in millions of euros.
///
/// Values at or above one million render as-is ("€12.5 M"), values below
/// scale to thousands ("€750 K"), and exactly zero is a free transfer.
/// The remote data has no negative values, so anything negative (or NaN)
/// is rejected rather than guessed at.
pub fn format_market_value(value: f64) -> Result<String> {
    if value.is_nan() || value < 0.0 {
        return Err(Error::InvalidValue(value));
    }
    if value == 0.0 {
        return Ok("Free Transfer".to_string());
    }
    if value >= 1.0 {
        return Ok(format!("€{value} M"));
    }
    Ok(format!("€{} K", value * 1000.0))
}

/// Strip the `|`-suffix the search API appends to disambiguate duplicate
/// player names.
pub fn clean_player_name(name: &str) -> &str {
    match name.split_once('|') {
        Some((base, _)) => base,
        None => name,
    }
}
