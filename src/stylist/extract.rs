//! Best-effort recovery of the outfit JSON from free-form model output.
//!
//! The extraction contract: take the span from the first `{` to the last `}`
//! (greedy, across newlines). If there is no such span, the whole trimmed
//! output is the payload. Multiple independent objects in one response are
//! therefore taken together and will usually fail to parse.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::stylist::error::StylistError;

static JSON_OBJECT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("json span pattern is valid"));

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOutfit {
    pub title: String,
    pub description: String,
    pub style_category: String,
    /// String identifiers in the order the model returned them.
    pub item_ids: Vec<String>,
    /// Non-string entries of `itemIds`; they can never match an item.
    pub discarded: Vec<Value>,
}

#[derive(Deserialize)]
struct ModelOutfitPayload {
    title: String,
    description: String,
    #[serde(rename = "styleCategory", alias = "style_category")]
    style_category: String,
    #[serde(default, rename = "itemIds", alias = "item_ids")]
    item_ids: Option<Vec<Value>>,
}

pub fn extract_json_payload(raw: &str) -> &str {
    match JSON_OBJECT_SPAN.find(raw) {
        Some(span) => span.as_str(),
        None => raw.trim(),
    }
}

pub fn parse_outfit_payload(raw: &str) -> Result<ParsedOutfit, StylistError> {
    let payload = extract_json_payload(raw);

    let value: Value = serde_json::from_str(payload)
        .map_err(|err| StylistError::MalformedResponse(format!("invalid JSON: {}", err)))?;
    if !value.is_object() {
        return Err(StylistError::MalformedResponse(
            "payload is not a JSON object".to_string(),
        ));
    }

    let parsed: ModelOutfitPayload = serde_json::from_value(value)
        .map_err(|err| StylistError::MalformedResponse(err.to_string()))?;

    let mut item_ids = Vec::new();
    let mut discarded = Vec::new();
    for entry in parsed.item_ids.unwrap_or_default() {
        match entry {
            Value::String(id) => item_ids.push(id),
            other => discarded.push(other),
        }
    }

    Ok(ParsedOutfit {
        title: parsed.title,
        description: parsed.description,
        style_category: parsed.style_category,
        item_ids,
        discarded,
    })
}
