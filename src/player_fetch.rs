use anyhow::Context;
use serde_json::Value;

use crate::config;
use crate::error::{Error, Result};
use crate::http_client::http_client;
use crate::state::{PlayerDetail, TransferRecord};
use crate::value::format_market_value;

/// Fetch and transform a player's data given a resolved query path.
/// Transport failures come back as `DetailFetchError`, contract breakage
/// as `MalformedDetailPayload`; either way the coordinator restores the
/// search screen.
pub fn fetch_player_detail(path: &str) -> Result<PlayerDetail> {
    let body = fetch_player_body(path).map_err(|err| Error::DetailFetchError(format!("{err:#}")))?;
    parse_player_detail_json(&body)
}

fn fetch_player_body(path: &str) -> anyhow::Result<String> {
    let client = http_client()?;
    let url = format!("{}{}", config::player_api_base(), path);
    let resp = client.get(&url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        anyhow::bail!("http {status}: {body}");
    }
    Ok(body)
}

/// Parse a player response body. The API returns a fixed-order positional
/// array; arity is checked before any field is touched so a short or
/// reshuffled payload fails loudly instead of reading the wrong slots.
pub fn parse_player_detail_json(raw: &str) -> Result<PlayerDetail> {
    let root: Value = serde_json::from_str(raw.trim())
        .map_err(|err| Error::MalformedDetailPayload(format!("invalid json: {err}")))?;
    let results = root
        .get("query_results")
        .and_then(|v| v.as_array())
        .ok_or_else(|| Error::MalformedDetailPayload("missing query_results array".to_string()))?;
    if results.len() != 6 {
        return Err(Error::MalformedDetailPayload(format!(
            "expected 6 positional fields, got {}",
            results.len()
        )));
    }

    let raw_value = results[0]
        .as_f64()
        .ok_or_else(|| Error::MalformedDetailPayload("market value is not a number".to_string()))?;
    let market_value = format_market_value(raw_value)?;
    let nationality = field_string(&results[1], "nationality")?;
    let position = field_string(&results[2], "position")?;
    let age = display_string(&results[3]);
    let image_url = field_string(&results[4], "image url")?;
    let transfer_rows = results[5]
        .as_array()
        .ok_or_else(|| Error::MalformedDetailPayload("transfers is not an array".to_string()))?;

    let mut transfers = Vec::with_capacity(transfer_rows.len());
    for row in transfer_rows {
        transfers.push(parse_transfer(row)?);
    }

    Ok(PlayerDetail {
        market_value,
        nationality,
        position,
        age,
        image_url,
        transfers,
    })
}

fn parse_transfer(row: &Value) -> Result<TransferRecord> {
    // [date, origin club, destination club, fee in millions].
    let cells = row
        .as_array()
        .ok_or_else(|| Error::MalformedDetailPayload("transfer is not an array".to_string()))?;
    if cells.len() != 4 {
        return Err(Error::MalformedDetailPayload(format!(
            "expected 4 transfer fields, got {}",
            cells.len()
        )));
    }
    let fee_raw = cells[3]
        .as_f64()
        .ok_or_else(|| Error::MalformedDetailPayload("transfer fee is not a number".to_string()))?;

    Ok(TransferRecord {
        date: display_string(&cells[0]),
        origin: display_string(&cells[1]),
        destination: display_string(&cells[2]),
        fee: format_market_value(fee_raw)?,
    })
}

fn field_string(value: &Value, what: &str) -> Result<String> {
    value
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| Error::MalformedDetailPayload(format!("{what} is not a string")))
}

/// Lenient rendering for fields the upstream scraper emits sometimes as
/// numbers and sometimes as strings ("N/A" ages).
fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => "N/A".to_string(),
    }
}
