use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::dsn::Dsn;
use super::models::{Event, EventAccepted};
use crate::report::dispatch::Transport;

pub const CLIENT_NAME: &str = concat!("raven-sh/", env!("CARGO_PKG_VERSION"));
const ENVELOPE_CONTENT_TYPE: &str = "application/x-sentry-envelope";

pub struct SentryClient {
    client: Client,
    dsn: Dsn,
}

impl SentryClient {
    pub fn new(dsn: Dsn, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(ENVELOPE_CONTENT_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_NAME));

        let mut auth = HeaderValue::from_str(&dsn.auth_header(CLIENT_NAME))
            .context("DSN contains characters not allowed in a header")?;
        auth.set_sensitive(true);
        headers.insert("x-sentry-auth", auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, dsn })
    }
}

#[async_trait]
impl Transport for SentryClient {
    async fn send(&self, event: &Event) -> Result<String> {
        let url = self.dsn.envelope_url();
        let body = event.to_envelope(&self.dsn)?;
        debug!(url = %url, event_id = %event.event_id, bytes = body.len(), "Posting event");

        let res = self.client.post(&url).body(body).send().await?;
        let accepted: EventAccepted = res.error_for_status()?.json().await?;

        let event_id = accepted.id.unwrap_or_else(|| event.event_id.clone());
        info!(event_id = %event_id, "Event accepted by Sentry");
        Ok(event_id)
    }
}
