use anyhow::{bail, Result};
use async_trait::async_trait;
use std::io::Write;
use tracing::debug;

use crate::client::models::Event;
use crate::config::RunConfig;
use crate::report::payload::{build_payload, Payload};
use crate::runner::command::CommandOutcome;
use crate::ui::debug::print_payload;

/// Something that can deliver an event to Sentry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers `event` and returns the id Sentry accepted it under.
    async fn send(&self, event: &Event) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Skipped,
    Printed(Payload),
    Sent { event_id: String },
}

pub struct Reporter<'a> {
    config: &'a RunConfig,
    transport: Option<&'a dyn Transport>,
}

impl<'a> Reporter<'a> {
    pub fn new(config: &'a RunConfig, transport: Option<&'a dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Reports a failed run. Debug mode prints to `out` and never touches the network.
    pub async fn report(&self, outcome: &CommandOutcome, out: &mut impl Write) -> Result<ReportOutcome> {
        let Some(payload) = build_payload(self.config, outcome) else {
            debug!("Command succeeded, nothing to report");
            return Ok(ReportOutcome::Skipped);
        };

        if self.config.debug {
            print_payload(out, &payload)?;
            return Ok(ReportOutcome::Printed(payload));
        }

        let Some(transport) = self.transport else {
            bail!("No Sentry transport configured");
        };

        let event = Event::from_payload(&payload, self.config);
        let event_id = transport.send(&event).await?;
        Ok(ReportOutcome::Sent { event_id })
    }
}
