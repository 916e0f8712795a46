use clap::Parser;
use rust_i18n::{i18n, t};
use std::io::{self, Write};
use tracing::{debug, error};

mod cli;
mod client;
mod config;
mod error;
mod locale;
mod logging;
mod report;
mod runner;
mod ui;

use cli::Cli;
use client::rest::SentryClient;
use config::{RunConfig, Settings};
use error::{PayloadError, RunError};
use report::dispatch::{ReportOutcome, Reporter, Transport};
use runner::command::run_command;
use ui::theme::print_error;

i18n!("locales", fallback = "en");

/// Exit status when the command could not be started at all.
const SPAWN_FAILED_EXIT_CODE: i32 = 127;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init_console_logging(cli.verbose);

    let settings = Settings::new(cli.config.as_deref()).unwrap_or_else(|e| {
        print_error(&t!("error_config", error = e));
        std::process::exit(1);
    });
    locale::set_locale(&settings.language);

    let config = RunConfig::build(settings, cli).unwrap_or_else(|e| {
        print_error(&describe(&e));
        std::process::exit(1);
    });

    std::process::exit(run(&config).await);
}

fn describe(err: &RunError) -> String {
    match err {
        RunError::Payload(PayloadError::InvalidJson { option, raw, .. }) => {
            t!("error_invalid_json", option = option, raw = raw).into_owned()
        }
        RunError::Payload(PayloadError::NotAnObject { option, raw }) => {
            t!("error_not_an_object", option = option, raw = raw).into_owned()
        }
        RunError::Dsn(e) => t!("error_invalid_dsn", error = e).into_owned(),
        RunError::MissingDsn => t!("error_missing_dsn").into_owned(),
        RunError::MissingCommand => t!("error_missing_command").into_owned(),
        RunError::ZeroChunkSize => t!("error_zero_chunk_size").into_owned(),
    }
}

/// Builds the Sentry client when this run could need one.
fn connect(config: &RunConfig) -> anyhow::Result<Option<SentryClient>> {
    match (&config.dsn, config.debug) {
        (Some(dsn), false) => {
            debug!(project = dsn.project_id(), sentry_key = dsn.public_key(), "Using Sentry project");
            SentryClient::new(dsn.clone(), config.timeout).map(Some)
        }
        _ => Ok(None),
    }
}

async fn run(config: &RunConfig) -> i32 {
    let client = connect(config);
    let transport = match &client {
        Ok(client) => Ok(client.as_ref().map(|c| c as &dyn Transport)),
        Err(e) => Err(e),
    };
    execute(config, transport, &mut io::stdout()).await
}

/// Runs the command, reports a failure, and returns the exit status to use.
///
/// Reporting problems never change the status: the child's code wins.
async fn execute(
    config: &RunConfig,
    transport: Result<Option<&dyn Transport>, &anyhow::Error>,
    out: &mut impl Write,
) -> i32 {
    let outcome = match run_command(&config.command).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Command could not be started");
            print_error(&t!("error_spawn_failed", error = format!("{e:#}")));
            return SPAWN_FAILED_EXIT_CODE;
        }
    };

    let transport = match transport {
        Ok(transport) => transport,
        Err(e) if !outcome.succeeded() && !config.debug => {
            report_failed(e);
            return outcome.exit_code();
        }
        Err(_) => None,
    };

    match Reporter::new(config, transport).report(&outcome, out).await {
        Ok(ReportOutcome::Sent { event_id }) => debug!(event_id = %event_id, "Failure reported"),
        Ok(ReportOutcome::Printed(_)) | Ok(ReportOutcome::Skipped) => {}
        Err(e) => report_failed(&e),
    }

    outcome.exit_code()
}

fn report_failed(e: &anyhow::Error) {
    error!(error = %format!("{e:#}"), "Failed to report command failure");
    print_error(&t!("error_report_failed", error = format!("{e:#}")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::Event;
    use crate::report::payload::tests::config;
    use anyhow::{anyhow, bail};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn send(&self, event: &Event) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(event.event_id.clone())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn send(&self, _event: &Event) -> anyhow::Result<String> {
            bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn missing_binary_exits_127() {
        let config = config(&["/nonexistent/raven-sh-test-binary"]);
        let transport = CountingTransport::default();
        let mut out = Vec::new();

        let code = execute(&config, Ok(Some(&transport)), &mut out).await;

        assert_eq!(code, 127);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn child_code_is_propagated() {
        let config = config(&["sh", "-c", "exit 3"]);
        let transport = CountingTransport::default();
        let mut out = Vec::new();

        let code = execute(&config, Ok(Some(&transport)), &mut out).await;

        assert_eq!(code, 3);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_exits_zero_without_sending() {
        let config = config(&["true"]);
        let transport = CountingTransport::default();
        let mut out = Vec::new();

        assert_eq!(execute(&config, Ok(Some(&transport)), &mut out).await, 0);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transport_failure_keeps_child_code() {
        let config = config(&["sh", "-c", "exit 5"]);
        let mut out = Vec::new();

        assert_eq!(execute(&config, Ok(Some(&FailingTransport)), &mut out).await, 5);
    }

    #[tokio::test]
    async fn client_construction_failure_keeps_child_code() {
        let config = config(&["sh", "-c", "exit 6"]);
        let err = anyhow!("DSN contains characters not allowed in a header");
        let mut out = Vec::new();

        assert_eq!(execute(&config, Err(&err), &mut out).await, 6);
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn signal_death_exits_128_plus_signal() {
        let config = config(&["sh", "-c", "kill -TERM $$"]);
        let transport = CountingTransport::default();
        let mut out = Vec::new();

        assert_eq!(execute(&config, Ok(Some(&transport)), &mut out).await, 143);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_client_in_debug_mode() {
        let mut config = config(&["false"]);
        config.dsn = Some("https://key@sentry.example.com/1".parse().unwrap());
        config.debug = true;
        assert!(connect(&config).unwrap().is_none());

        config.debug = false;
        assert!(connect(&config).unwrap().is_some());
    }

    #[test]
    fn startup_errors_are_translated() {
        assert_eq!(
            describe(&RunError::MissingDsn),
            "Neither --dsn option or SENTRY_DSN env variable defined"
        );
        assert_eq!(
            describe(&RunError::MissingCommand),
            "Command to execute is not defined. Exit"
        );
        assert_eq!(
            describe(&RunError::ZeroChunkSize),
            "chunk_max_chars must be a positive integer"
        );

        let invalid = config::decode_json_object("--extra", "{oops").unwrap_err();
        assert_eq!(
            describe(&RunError::Payload(invalid)),
            "Invalid JSON was used for option --extra.  Received: {oops"
        );

        let not_object = config::decode_json_object("--tags", "3").unwrap_err();
        assert_eq!(
            describe(&RunError::Payload(not_object)),
            "Option --tags expects a JSON object.  Received: 3"
        );

        let dsn = "https://h/1".parse::<client::dsn::Dsn>().unwrap_err();
        assert_eq!(
            describe(&RunError::Dsn(dsn)),
            "Invalid Sentry DSN: missing public key"
        );
    }
}
