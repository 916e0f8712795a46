use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::client::dsn::Dsn;
use crate::config::RunConfig;
use crate::report::payload::Payload;

pub const PLATFORM: &str = "other";
pub const LOGGER: &str = "raven-sh";

/// Sentry event body, as accepted by the envelope endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub event_id: String,
    pub timestamp: String,
    pub level: String,
    pub platform: String,
    pub logger: String,
    pub message: String,
    pub tags: BTreeMap<String, String>,
    pub extra: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
}

#[derive(Debug, Serialize)]
struct EnvelopeHeader<'a> {
    event_id: &'a str,
    dsn: String,
    sent_at: &'a str,
}

#[derive(Debug, Serialize)]
struct ItemHeader {
    #[serde(rename = "type")]
    kind: &'static str,
    length: usize,
    content_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct EventAccepted {
    pub id: Option<String>,
}

impl Event {
    pub fn from_payload(payload: &Payload, config: &RunConfig) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().simple().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            level: payload.level.to_string(),
            platform: PLATFORM.to_string(),
            logger: LOGGER.to_string(),
            message: payload.message.clone(),
            tags: payload
                .tags
                .iter()
                .map(|(key, value)| (key.clone(), tag_value(value)))
                .collect(),
            extra: payload.extra.clone(),
            server_name: config.server_name.clone(),
            environment: config.environment.clone(),
            release: config.release.clone(),
        }
    }

    /// Serializes the event as a single-item envelope.
    pub fn to_envelope(&self, dsn: &Dsn) -> serde_json::Result<String> {
        let body = serde_json::to_string(self)?;
        let header = EnvelopeHeader {
            event_id: &self.event_id,
            dsn: dsn.to_string(),
            sent_at: &self.timestamp,
        };
        let item = ItemHeader {
            kind: "event",
            length: body.len(),
            content_type: "application/json",
        };

        Ok(format!(
            "{}\n{}\n{}\n",
            serde_json::to_string(&header)?,
            serde_json::to_string(&item)?,
            body
        ))
    }
}

// Sentry tags are plain strings.
fn tag_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
