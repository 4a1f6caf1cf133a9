//! Output format selection and the shared JSON envelopes.
//!
//! Every command prints one JSON object to stdout in `json` mode; in
//! `pretty` mode results go to stdout and progress notes to stderr.

use std::io::{self, IsTerminal};

use serde_json::{Value, json};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Human-readable text.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pick based on whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────────

/// Print a JSON value to stdout.
pub(crate) fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Space-separated lowercase hex, e.g. `1b 40 0a`.
pub(crate) fn spaced_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&hex::encode([*b]));
    }
    out
}

/// Report the bytes a device command wrote (or would write, for a dry run).
pub(crate) fn report_sent(
    format: Format,
    peer: &str,
    dry_run: bool,
    bytes: &[u8],
) -> anyhow::Result<()> {
    match format {
        Format::Json => print_json(&json!({
            "success": true,
            "target": peer,
            "dry_run": dry_run,
            "bytes": bytes.len(),
            "hex": hex::encode(bytes),
        })),
        Format::Pretty => {
            if dry_run {
                println!("{}", spaced_hex(bytes));
            } else {
                eprintln!("sent {} bytes to {peer}", bytes.len());
            }
            Ok(())
        }
    }
}

/// Report a failed command in the selected format.
pub(crate) fn report_error(format: Format, err: &anyhow::Error) {
    match format {
        Format::Json => {
            let out = json!({
                "success": false,
                "error": "command_failed",
                "message": format!("{err:#}"),
            });
            match serde_json::to_string_pretty(&out) {
                Ok(text) => println!("{text}"),
                Err(_) => eprintln!("error: {err:#}"),
            }
        }
        Format::Pretty => eprintln!("error: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_wins() {
        assert_eq!(Format::resolve_or_detect(Some("json")), Format::Json);
        assert_eq!(Format::resolve_or_detect(Some("pretty")), Format::Pretty);
    }

    #[test]
    fn hex_is_space_separated() {
        assert_eq!(spaced_hex(&[0x1b, 0x40, 0x0a]), "1b 40 0a");
        assert_eq!(spaced_hex(&[]), "");
    }
}
