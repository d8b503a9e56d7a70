use anyhow::Context;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config;
use crate::error::{Error, Result};
use crate::http_client::http_client;
use crate::state::Suggestion;
use crate::value::{clean_player_name, format_market_value};

/// Search the remote API for players matching `query` and return the
/// suggestions ranked by market value, most valuable first. Any failure
/// here is recoverable; the caller shows an empty list and a notice.
pub fn fetch_search_results(query: &str) -> Result<Vec<Suggestion>> {
    let body =
        fetch_search_body(query).map_err(|err| Error::SearchUnavailable(format!("{err:#}")))?;
    parse_search_results_json(&body)
}

fn fetch_search_body(query: &str) -> anyhow::Result<String> {
    let client = http_client()?;
    let url = format!(
        "{}{}",
        config::search_api_base(),
        urlencoding::encode(query)
    );
    let resp = client.get(&url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        anyhow::bail!("http {status}: {body}");
    }
    Ok(body)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Map<String, Value>,
}

/// Parse a search response body. Entries with missing or mistyped fields
/// are skipped rather than failing the whole response; the server already
/// filters incomplete scraper rows, so leftovers are rare stragglers.
pub fn parse_search_results_json(raw: &str) -> Result<Vec<Suggestion>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: SearchResponse = serde_json::from_str(trimmed)
        .map_err(|err| Error::SearchUnavailable(format!("invalid search json: {err}")))?;

    let mut suggestions = Vec::new();
    for (name, fields) in &data.results {
        if let Some(entry) = suggestion_from_entry(name, fields) {
            suggestions.push(entry);
        }
    }

    // Most valuable player first. sort_by is stable, so equal values keep
    // the response order.
    suggestions.sort_by(|a, b| {
        b.market_value
            .partial_cmp(&a.market_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(suggestions)
}

fn suggestion_from_entry(name: &str, fields: &Value) -> Option<Suggestion> {
    // Fixed-order tuple: [unused, market value, profile link, team].
    let fields = fields.as_array()?;
    if fields.len() < 4 {
        return None;
    }
    let market_value = fields[1].as_f64()?;
    let detail_link = fields[2].as_str()?.to_string();
    let team = fields[3].as_str()?.trim().to_string();
    let value_display = format_market_value(market_value).ok()?;

    Some(Suggestion {
        display_name: clean_player_name(name).to_string(),
        raw_name: name.to_string(),
        market_value,
        value_display,
        detail_link,
        team,
    })
}
