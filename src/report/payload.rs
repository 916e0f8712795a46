use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::RunConfig;
use crate::runner::chunker::Chunker;
use crate::runner::command::{command_line, CommandOutcome};

/// Severity every failure is reported with.
pub const LEVEL: &str = "error";

/// What gets reported about one failed run, before any transport details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub message: String,
    pub level: &'static str,
    pub tags: Map<String, Value>,
    pub extra: Map<String, Value>,
}

/// Returns `None` for a successful run: there is nothing to report.
pub fn build_payload(config: &RunConfig, outcome: &CommandOutcome) -> Option<Payload> {
    if outcome.succeeded() {
        return None;
    }

    let returncode = outcome.returncode;
    let command = command_line(&config.command);
    let callable = config.command.first().cloned().unwrap_or_default();

    let mut tags = config.tags.clone();
    tags.insert("returncode".into(), returncode.into());
    tags.insert("callable".into(), callable.into());

    let mut extra = config.extra.clone();
    extra.insert("returncode".into(), returncode.into());
    extra.insert("command".into(), command.clone().into());

    let streams = [("stdout", &outcome.stdout), ("stderr", &outcome.stderr)];
    for (name, text) in streams {
        let chunks = Chunker::chunk(name, Some(text.trim_end()), config.chunk_max_chars);
        extra.extend(chunks.into_iter().map(|(key, chunk)| (key, Value::String(chunk))));
    }

    let message = match &config.message {
        Some(message) => message.clone(),
        None => format!("\"{}\" failed with code {}", command, returncode),
    };

    Some(Payload {
        message,
        level: LEVEL,
        tags,
        extra,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::runner::chunker::DEFAULT_MAX_CHARS;
    use serde_json::json;
    use std::time::Duration;

    pub(crate) fn config(command: &[&str]) -> RunConfig {
        RunConfig {
            dsn: None,
            debug: false,
            message: None,
            extra: Map::new(),
            tags: Map::new(),
            command: command.iter().map(|s| s.to_string()).collect(),
            chunk_max_chars: DEFAULT_MAX_CHARS,
            timeout: Duration::from_secs(10),
            server_name: None,
            environment: None,
            release: None,
        }
    }

    fn outcome(stdout: &str, stderr: &str, returncode: i32) -> CommandOutcome {
        CommandOutcome {
            stdout: stdout.into(),
            stderr: stderr.into(),
            returncode,
        }
    }

    #[test]
    fn success_has_no_payload() {
        let config = config(&["backup.sh"]);
        assert!(build_payload(&config, &outcome("lots\nof\noutput\n", "warn\n", 0)).is_none());
    }

    #[test]
    fn failure_payload_carries_code_command_and_output() {
        let config = config(&["bash", "-c", "echo hello world; exit 1"]);
        let payload = build_payload(&config, &outcome("hello world\n", "", 1)).unwrap();

        assert_eq!(payload.message, "\"bash -c echo hello world; exit 1\" failed with code 1");
        assert_eq!(payload.level, "error");
        assert_eq!(payload.tags["returncode"], 1);
        assert_eq!(payload.tags["callable"], "bash");
        assert_eq!(payload.extra["returncode"], 1);
        assert_eq!(payload.extra["command"], "bash -c echo hello world; exit 1");
        assert_eq!(payload.extra["stdout"], "hello world");
        assert!(!payload.extra.contains_key("stderr"));
    }

    #[test]
    fn user_data_is_merged_and_overridden() {
        let mut config = config(&["sync"]);
        config.message = Some("nightly sync failed".into());
        config.tags = json!({"job": "sync", "callable": "ignored"})
            .as_object()
            .cloned()
            .unwrap();
        config.extra = json!({"owner": "ops", "returncode": "ignored"})
            .as_object()
            .cloned()
            .unwrap();

        let payload = build_payload(&config, &outcome("", "boom\n", 2)).unwrap();

        assert_eq!(payload.message, "nightly sync failed");
        assert_eq!(payload.tags["job"], "sync");
        assert_eq!(payload.tags["callable"], "sync");
        assert_eq!(payload.extra["owner"], "ops");
        assert_eq!(payload.extra["returncode"], 2);
        assert_eq!(payload.extra["stderr"], "boom");
    }

    #[test]
    fn long_output_is_chunked() {
        let mut config = config(&["noisy"]);
        config.chunk_max_chars = 12;
        let stdout = "value\n".repeat(22);

        let payload = build_payload(&config, &outcome(&stdout, "", 1)).unwrap();

        assert!(!payload.extra.contains_key("stdout"));
        assert_eq!(payload.extra["stdout00"], "value\nvalue");
        assert_eq!(payload.extra["stdout10"], "value\nvalue");
        assert!(!payload.extra.contains_key("stdout11"));
    }
}
