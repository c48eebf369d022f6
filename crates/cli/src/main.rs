//! chatwork-notify command-line tool.
//!
//! Runs as a GitHub Action step: action inputs arrive as `INPUT_*`
//! environment variables (or the matching flags), the composed message is
//! posted to Chatwork, and the message id is exposed as the `messageId`
//! step output. A TOML config file can replace the action inputs for use
//! outside of Actions.

mod actions;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatwork_notify_core::config::{ActionInputs, AppConfig, BridgeConfig};
use chatwork_notify_core::mention::extract_mentions;
use chatwork_notify_core::notify::ChatworkClient;
use chatwork_notify_core::{prepare_message, NotifyBridge, Outcome};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Post GitHub issue, pull request and discussion activity to Chatwork.
#[derive(Parser, Debug)]
#[command(
    name = "chatwork-notify",
    version,
    about = "Notify a Chatwork room about GitHub activity"
)]
struct Cli {
    /// Path to a TOML configuration file (replaces the action inputs).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(flatten)]
    inputs: InputArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// GitHub Action inputs. Each flag falls back to its `INPUT_*` variable.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Chatwork room id.
    #[arg(long = "roomid", env = "INPUT_ROOMID", default_value = "")]
    room_id: String,

    /// Chatwork API token.
    #[arg(long, env = "INPUT_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Inline JSON mapping of GitHub login to Chatwork address.
    #[arg(long, env = "INPUT_MAPPING", default_value = "{}")]
    mapping: String,

    /// Path to a mapping file merged under the inline mapping.
    #[arg(long = "mapping-file", env = "INPUT_MAPPINGFILE", default_value = "")]
    mapping_file: String,

    /// "true" to leave the event body out of the message.
    #[arg(long = "ignore-body", env = "INPUT_IGNOREBODY", default_value = "false")]
    ignore_body: String,

    /// "true" to skip sending when nobody is mentioned or assigned.
    #[arg(
        long = "skip-sending-message",
        env = "INPUT_SKIPSENDINGMESSAGE",
        default_value = "false"
    )]
    skip_sending_message: String,

    /// JSON of the `github` context.
    #[arg(long, env = "INPUT_CONTEXT", default_value = "")]
    context: String,

    /// Read the `github` context from a file instead.
    #[arg(long = "context-file")]
    context_file: Option<PathBuf>,

    /// Chatwork API base URL.
    #[arg(long = "api-url", env = "CHATWORK_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose and post the notification (default).
    Send,

    /// Compose the notification and print it without posting.
    Preview,

    /// Print the `@mentions` found in a piece of text.
    Mentions {
        /// Text to scan.
        text: String,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./chatwork-notify.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            actions::report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Mentions { ref text }) => {
            init_tracing(cli.log_level.as_deref(), None);
            cmd_mentions(text);
            Ok(())
        }
        Some(Commands::Init { ref output }) => {
            init_tracing(cli.log_level.as_deref(), None);
            cmd_init(output)
        }
        Some(Commands::Validate) => {
            init_tracing(cli.log_level.as_deref(), None);
            cmd_validate(cli.config.as_deref())
        }
        Some(Commands::Preview) => {
            let config = load_bridge_config(&cli)?;
            init_tracing(cli.log_level.as_deref(), Some(&config.settings.log.level));
            cmd_preview(&config)
        }
        Some(Commands::Send) | None => {
            let config = load_bridge_config(&cli)?;
            init_tracing(cli.log_level.as_deref(), Some(&config.settings.log.level));
            cmd_send(config).await
        }
    }
}

/// Log to stderr so stdout carries only results and workflow commands.
///
/// Precedence: `RUST_LOG`, `--log-level`, runner debug mode, config file, `info`.
fn init_tracing(cli_level: Option<&str>, config_level: Option<&str>) {
    let runner_debug = std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
    let level = cli_level
        .or(runner_debug.then_some("debug"))
        .or(config_level)
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

fn load_bridge_config(cli: &Cli) -> Result<BridgeConfig> {
    let inputs = &cli.inputs;
    let context = actions::resolve_context(&inputs.context, inputs.context_file.as_deref())?;

    match &cli.config {
        Some(path) => BridgeConfig::from_file(path, &context)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => {
            let raw = ActionInputs {
                room_id: inputs.room_id.clone(),
                token: inputs.token.clone(),
                mapping: inputs.mapping.clone(),
                mapping_file: inputs.mapping_file.clone(),
                ignore_body: inputs.ignore_body.clone(),
                skip_sending_message: inputs.skip_sending_message.clone(),
                context,
                api_url: inputs.api_url.clone(),
            };
            BridgeConfig::from_inputs(&raw).context("invalid action inputs")
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

async fn cmd_send(config: BridgeConfig) -> Result<()> {
    let settings = &config.settings;
    let client = ChatworkClient::new(
        settings.chatwork.api_url.clone(),
        settings.token(),
        settings.chatwork.room_id,
    )
    .context("failed to create Chatwork client")?;

    let bridge = NotifyBridge::new(config, client);
    match bridge.run().await? {
        Outcome::Sent { message_id } => {
            info!(message_id = %message_id, "notification sent");
            actions::set_output(actions::OUTPUT_MESSAGE_ID, &message_id)?;
            println!("{}", message_id);
        }
        Outcome::Skipped => {
            info!("notification skipped: no participant found");
        }
    }
    Ok(())
}

fn cmd_preview(config: &BridgeConfig) -> Result<()> {
    let message = prepare_message(config)?;
    let skip = config.settings.message.skip_if_no_participant && !message.has_participant;

    println!("Event       : {}", config.context.event.kind());
    println!("Room        : {}", config.settings.chatwork.room_id);
    println!("Participant : {}", if message.has_participant { "yes" } else { "no" });
    println!("Would send  : {}", if skip { "no (skipped)" } else { "yes" });
    println!("----------------------------------------");
    println!("{}", message.text);
    Ok(())
}

fn cmd_mentions(text: &str) {
    for mention in extract_mentions(text) {
        println!("{}", mention);
    }
}

fn cmd_init(output: &Path) -> Result<()> {
    let default_config = r#"# chatwork-notify configuration

[chatwork]
room_id = 123456
token_env = "CHATWORK_API_TOKEN"
api_url = "https://api.chatwork.com"

[identity]
# mapping_file = ".github/chatwork-mapping.json"

[identity.mapping]
# octocat = "[To:1234567]Octocat"
# "my-org/my-team" = "[To:1234567]Octocat [To:7654321]Hubot"

[message]
minimal_body = false
skip_if_no_participant = false

[log]
level = "info"
"#;

    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, default_config).context("failed to write config file")?;

    println!("Default configuration written to {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit the room id and identity mapping");
    println!("  2. Export the token variable (CHATWORK_API_TOKEN)");
    println!(
        "  3. Validate with: chatwork-notify validate --config {}",
        output.display()
    );
    Ok(())
}

fn cmd_validate(config_path: Option<&Path>) -> Result<()> {
    let config_path = config_path.context("validate requires --config <FILE>")?;
    println!("Validating configuration: {}", config_path.display());
    println!();

    let mut config =
        AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    match config.resolve_env_vars() {
        Ok(()) => println!("  [OK] Environment variable references processed"),
        Err(e) => println!("  [WARN] {}", e),
    }

    match config.validate() {
        Ok(()) => println!("  [OK] All required fields are valid"),
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    println!();
    println!("Configuration summary:");
    println!("  Room id        : {}", config.chatwork.room_id);
    println!("  API URL        : {}", config.chatwork.api_url);
    println!(
        "  Token          : {}",
        if config.chatwork.token.is_some() { "set" } else { "NOT SET" }
    );
    println!("  Inline mapping : {} entries", config.identity.mapping.len());
    println!(
        "  Mapping file   : {}",
        config
            .identity
            .mapping_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".into())
    );
    println!("  Minimal body   : {}", config.message.minimal_body);
    println!("  Skip if none   : {}", config.message.skip_if_no_participant);
    Ok(())
}
