//! Normalization of the roster endpoint's response shapes.
//!
//! Two revisions of the backend are in the wild:
//!
//! * attribute-value style: `{ "res": { "data": [ { "M": { "label": { "S": .. }, "url": { "S": .. } } } ] } }`
//! * flattened style: `{ "data": [ { "M": { "label": .., "value": .. } } ] }`
//!
//! Field values may be plain strings or `{ "S": .. }` wrappers in either style,
//! and items may omit the `M` wrapper. A Lambda proxy envelope whose `body` is
//! a JSON string is unwrapped first.

use docshelf_core::RosterItem;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterPayload {
    AttributeValue(Vec<RosterItem>),
    Flattened(Vec<RosterItem>),
    /// No usable list in the response; treated as zero results.
    Missing,
}

impl RosterPayload {
    pub fn shape(&self) -> &'static str {
        match self {
            RosterPayload::AttributeValue(_) => "attribute-value",
            RosterPayload::Flattened(_) => "flattened",
            RosterPayload::Missing => "missing",
        }
    }

    pub fn into_items(self) -> Vec<RosterItem> {
        match self {
            RosterPayload::AttributeValue(items) | RosterPayload::Flattened(items) => items,
            RosterPayload::Missing => Vec::new(),
        }
    }
}

pub fn normalize_roster(body: &Value) -> RosterPayload {
    if let Some(inner) = body.get("body").and_then(Value::as_str) {
        if let Ok(inner) = serde_json::from_str::<Value>(inner) {
            return normalize_roster(&inner);
        }
    }

    if let Some(list) = body.pointer("/res/data").and_then(Value::as_array) {
        return RosterPayload::AttributeValue(collect_items(list));
    }
    if let Some(list) = body.get("data").and_then(Value::as_array) {
        return RosterPayload::Flattened(collect_items(list));
    }
    RosterPayload::Missing
}

fn collect_items(list: &[Value]) -> Vec<RosterItem> {
    list.iter().filter_map(normalize_item).collect()
}

fn normalize_item(item: &Value) -> Option<RosterItem> {
    let fields = item.get("M").unwrap_or(item);
    let label = fields.get("label").and_then(attribute_string)?;
    let url = fields
        .get("url")
        .or_else(|| fields.get("value"))
        .and_then(attribute_string)?;
    if url.trim().is_empty() {
        return None;
    }
    Some(RosterItem::new(label, url.trim()))
}

fn attribute_string(value: &Value) -> Option<&str> {
    value
        .as_str()
        .or_else(|| value.get("S").and_then(Value::as_str))
}
