//! Order Log row.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use orderflow_core::{Decision, DomainError, DomainResult};

use crate::order::Order;

/// Local wall-clock timestamp format used in the Order Log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> DomainResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| DomainError::validation(format!("invalid timestamp {raw:?}: {e}")))
}

/// One append-only row per processed order.
///
/// Optional values are stored as empty strings, matching the table layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    #[serde(serialize_with = "ser_ts", deserialize_with = "de_ts")]
    pub timestamp: NaiveDateTime,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub item_name: String,
    pub quantity: u32,
    pub decision: Decision,
    pub assigned_staff: String,
}

impl DecisionRecord {
    /// Sub-second precision is dropped so the row survives a write/read cycle.
    pub fn new(
        timestamp: NaiveDateTime,
        order: &Order,
        decision: Decision,
        assigned_staff: Option<&str>,
    ) -> Self {
        Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            customer_name: order.customer_name().to_string(),
            customer_email: order.customer_email().to_string(),
            customer_phone: order.customer_phone().unwrap_or_default().to_string(),
            item_name: order.item_name().to_string(),
            quantity: order.quantity(),
            decision,
            assigned_staff: assigned_staff.unwrap_or_default().to_string(),
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    pub fn assigned_staff(&self) -> Option<&str> {
        if self.assigned_staff.is_empty() {
            None
        } else {
            Some(&self.assigned_staff)
        }
    }
}

fn ser_ts<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(ts))
}

fn de_ts<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
