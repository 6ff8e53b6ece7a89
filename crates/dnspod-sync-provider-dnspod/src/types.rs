//! DNSPod response payloads
//!
//! DNSPod is inconsistent about whether identifiers and TTLs are JSON
//! strings or numbers, so both are accepted.

use dnspod_sync_core::ProviderRecord;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `Record.List` payload
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecordList {
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

/// One entry of `Record.List`
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub ttl: Value,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub line_id: Option<String>,
}

impl From<RawRecord> for ProviderRecord {
    fn from(raw: RawRecord) -> Self {
        ProviderRecord {
            id: raw.id,
            name: raw.name,
            record_type: raw.record_type,
            value: raw.value,
            ttl: parse_ttl(&raw.ttl),
            line_id: raw.line_id.filter(|l| !l.is_empty()),
        }
    }
}

/// `Record.Create` / `Record.Modify` payload
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecordWrite {
    #[serde(default)]
    pub record: Option<RecordRef>,
}

impl RecordWrite {
    /// Identifier reported by the provider, if any
    pub fn record_id(self) -> Option<String> {
        self.record?.id.filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordRef {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
}

fn parse_ttl(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_string(value)
        .ok_or_else(|| serde::de::Error::custom("expected a string or a number"))
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}
