//! GitHub Actions runner integration: event context discovery, step
//! outputs, and workflow error commands.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Step output holding the posted Chatwork message id.
pub const OUTPUT_MESSAGE_ID: &str = "messageId";

/// Locate the `github` context JSON.
///
/// Resolution order:
/// 1. The inline `context` input, if non-empty.
/// 2. `--context-file`.
/// 3. The runner environment: `GITHUB_EVENT_PATH`, `GITHUB_EVENT_NAME`, `GITHUB_ACTOR`.
pub fn resolve_context(inline: &str, context_file: Option<&Path>) -> Result<String> {
    if !inline.trim().is_empty() {
        return Ok(inline.to_string());
    }

    if let Some(path) = context_file {
        debug!(path = %path.display(), "reading event context file");
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read context file {}", path.display()));
    }

    match std::env::var("GITHUB_EVENT_PATH") {
        Ok(event_path) if !event_path.is_empty() => {
            let event_name = std::env::var("GITHUB_EVENT_NAME").unwrap_or_default();
            let actor = std::env::var("GITHUB_ACTOR").unwrap_or_default();
            let event = std::fs::read_to_string(&event_path)
                .with_context(|| format!("failed to read event payload {}", event_path))?;
            context_from_runner(&actor, &event_name, &event)
        }
        _ => bail!("no event context: set the context input, --context-file, or GITHUB_EVENT_PATH"),
    }
}

/// Assemble a context document from the runner's separate pieces.
pub fn context_from_runner(actor: &str, event_name: &str, event_json: &str) -> Result<String> {
    let event: serde_json::Value =
        serde_json::from_str(event_json).context("event payload is not valid JSON")?;
    let context = serde_json::json!({
        "actor": actor,
        "event_name": event_name,
        "event": event,
    });
    Ok(context.to_string())
}

/// Set a step output. Appends to `$GITHUB_OUTPUT` when running under Actions.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match std::env::var("GITHUB_OUTPUT") {
        Ok(path) if !path.is_empty() => write_output(Path::new(&path), name, value),
        _ => {
            debug!(name, "GITHUB_OUTPUT not set, output only printed");
            Ok(())
        }
    }
}

pub fn write_output(path: &Path, name: &str, value: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open output file {}", path.display()))?;
    writeln!(file, "{}={}", name, value).context("failed to write step output")?;
    Ok(())
}

/// Print a workflow `error` command so the run is annotated as failed.
pub fn report_failure(err: &anyhow::Error) {
    println!("::error::{}", escape_data(&format!("{:#}", err)));
}

/// Escape a workflow command message.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
