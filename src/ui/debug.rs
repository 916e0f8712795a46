use anyhow::Result;
use rust_i18n::t;
use std::io::Write;

use super::theme::{accent, muted};
use crate::report::payload::Payload;

/// Writes what would have been sent to Sentry.
pub fn print_payload(out: &mut impl Write, payload: &Payload) -> Result<()> {
    let rule = "─".repeat(60);
    writeln!(out, "{}", muted(&rule))?;
    writeln!(out, "{}", accent(&t!("debug_header")))?;
    writeln!(out, "{}", muted(&rule))?;
    writeln!(out, "{}", serde_json::to_string_pretty(payload)?)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn prints_every_payload_field() {
        let payload = Payload {
            message: "custom message".into(),
            level: "error",
            tags: json!({"callable": "make"}).as_object().cloned().unwrap(),
            extra: Map::new(),
        };
        let mut out = Vec::new();

        print_payload(&mut out, &payload).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("\"message\": \"custom message\""));
        assert!(printed.contains("\"level\": \"error\""));
        assert!(printed.contains("\"callable\": \"make\""));
        assert!(printed.contains("\"extra\": {}"));
    }
}
