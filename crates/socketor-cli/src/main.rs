//! Socketor command-line front end.
//!
//! Manages saved connection profiles and replays transport envelopes through
//! the same translation, history and display path the desktop client uses.
//!
//! # Usage
//!
//! ```text
//! socketor [--config <PATH>] [--locale <TAG>] <COMMAND>
//!
//! Commands:
//!   profiles list                     List saved profiles
//!   profiles add <NAME> <KIND> [...]  Save a profile built from defaults + overrides
//!   profiles show <NAME>              Print a profile as JSON
//!   profiles remove <NAME>            Delete a profile
//!   replay <PROFILE> [--input FILE]   Translate envelope lines (stdin by default)
//!   encode <PROFILE> <MESSAGE>        Show the bytes a send would put on the wire
//! ```
//!
//! `KIND` is a short name (`tcp-client`, `udp-client`, `ws-client`,
//! `tcp-server`, `ws-server`) or the stored tag (`TcpClientConfig`, ...).
//!
//! # Environment variable overrides
//!
//! | Variable           | Description                                  |
//! |--------------------|----------------------------------------------|
//! | `SOCKETOR_CONFIG`  | Config file path (same as `--config`)        |
//! | `RUST_LOG`         | Log filter; wins over `general.log_level`    |
//!
//! Logs go to stderr.  Stdout carries only rendered messages and command
//! output, so it can be piped.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use socketor_cli::application::render::DEFAULT_WRAP_WIDTH;
use socketor_cli::application::{
    build_profile, replay, spawn_history, ConnectionSession, EnvelopeSource, ProfileOverrides,
    Renderer,
};
use socketor_cli::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to, AppConfig, ProfileEntry,
};
use socketor_cli::infrastructure::{ConsoleSink, JsonLinesSource};
use socketor_core::{encode_input, render_payload, ActionResult, ConnectionKind, Locale};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Socket debugging profiles and message replay.
#[derive(Debug, Parser)]
#[command(name = "socketor", version)]
struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true, env = "SOCKETOR_CONFIG")]
    config: Option<PathBuf>,

    /// Locale for message timestamps (e.g. `en-US`, `zh-CN`).  Overrides
    /// `general.locale` from the config file.
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage saved connection profiles.
    Profiles {
        #[command(subcommand)]
        action: ProfilesCommand,
    },

    /// Translate envelope JSON lines for a profile and print them.
    Replay {
        /// Name of the saved profile.
        profile: String,

        /// Read envelopes from this file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Line width used when the profile has `auto_wrap` on.
        #[arg(long, default_value_t = DEFAULT_WRAP_WIDTH)]
        wrap_width: usize,
    },

    /// Encode a message with a profile's send-box settings and print it as hex.
    Encode {
        profile: String,
        message: String,
    },
}

#[derive(Debug, Subcommand)]
enum ProfilesCommand {
    List,

    Add {
        name: String,
        /// Connection kind, e.g. `tcp-client` or `WebSocketClientConfig`.
        kind: ConnectionKind,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Overwrite an existing profile of the same name.
        #[arg(long)]
        replace: bool,
    },

    Show {
        name: String,
    },

    Remove {
        name: String,
    },
}

/// Per-field overrides for `profiles add`.
#[derive(Debug, Default, Args)]
struct OverrideArgs {
    /// Peer host for clients, bind host for servers.
    #[arg(long)]
    host: Option<String>,
    /// Peer port for clients, bind port for servers.
    #[arg(long)]
    port: Option<u16>,
    /// WebSocket URL (ws-client only).
    #[arg(long)]
    address: Option<String>,
    /// Local bind port (udp-client only).
    #[arg(long)]
    local_port: Option<u16>,
    /// Server instance identifier (tcp-server only).
    #[arg(long)]
    server_id: Option<String>,
    /// Maximum messages kept in the history.
    #[arg(long)]
    max_entries: Option<NonZeroUsize>,
    /// Display payloads as hex.
    #[arg(long)]
    show_as_hex: bool,
    /// Treat typed input as hex pairs.
    #[arg(long)]
    send_as_hex: bool,
}

impl OverrideArgs {
    fn into_overrides(self) -> ProfileOverrides {
        ProfileOverrides {
            host: self.host,
            port: self.port,
            address: self.address,
            local_port: self.local_port,
            server_id: self.server_id,
            max_entries: self.max_entries,
            show_as_hex: self.show_as_hex.then_some(true),
            send_as_hex: self.send_as_hex.then_some(true),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config_file_path().context("no --config given and no platform config dir")?,
    };
    let mut app = load_config_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // RUST_LOG wins; otherwise the configured level; otherwise `info`.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&app.general.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let locale = cli.locale.unwrap_or_else(|| app.general.locale.clone());

    match cli.command {
        Command::Profiles { action } => run_profiles(&mut app, &config_path, action),
        Command::Replay {
            profile,
            input,
            wrap_width,
        } => run_replay(&app, locale, &profile, input.as_deref(), wrap_width).await,
        Command::Encode { profile, message } => run_encode(&app, &profile, &message),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_profiles(
    app: &mut AppConfig,
    config_path: &Path,
    action: ProfilesCommand,
) -> anyhow::Result<()> {
    match action {
        ProfilesCommand::List => {
            for entry in &app.profiles {
                println!(
                    "{}\t{}\t{}",
                    entry.name,
                    entry.connection.kind().short_name(),
                    entry.connection.endpoint()
                );
            }
        }
        ProfilesCommand::Add {
            name,
            kind,
            overrides,
            replace,
        } => {
            if !replace && app.profile(&name).is_some() {
                bail!("profile `{name}` already exists (use --replace to overwrite)");
            }
            let connection = build_profile(kind, &overrides.into_overrides())
                .with_context(|| format!("cannot build {kind} profile `{name}`"))?;
            info!(profile = %name, kind = %kind, endpoint = %connection.endpoint(), "profile saved");
            app.upsert_profile(ProfileEntry { name, connection });
            save_config_to(config_path, app)
                .with_context(|| format!("failed to save {}", config_path.display()))?;
        }
        ProfilesCommand::Show { name } => {
            let entry = find_profile(app, &name)?;
            let json = serde_json::to_string_pretty(&entry.connection)
                .context("failed to serialize profile")?;
            println!("{json}");
        }
        ProfilesCommand::Remove { name } => {
            if app.remove_profile(&name).is_none() {
                bail!("no profile named `{name}`");
            }
            save_config_to(config_path, app)
                .with_context(|| format!("failed to save {}", config_path.display()))?;
            info!(profile = %name, "profile removed");
        }
    }
    Ok(())
}

async fn run_replay(
    app: &AppConfig,
    locale: Locale,
    profile: &str,
    input: Option<&Path>,
    wrap_width: usize,
) -> anyhow::Result<()> {
    let entry = find_profile(app, profile)?;
    entry
        .connection
        .validate()
        .with_context(|| format!("profile `{profile}` is invalid"))?;

    let mut session = ConnectionSession::new(entry.name.clone(), entry.connection.clone());
    // Replayed traffic has no transport to refuse it.
    session.begin(ActionResult::ok())?;

    let message_box = session.config().message_box().clone();
    let (history, task) = spawn_history(message_box.max_entries);
    let renderer = Renderer::new(locale, message_box).with_wrap_width(wrap_width);
    let mut sink = ConsoleSink::new(renderer, std::io::stdout());

    let mut source: Box<dyn EnvelopeSource> = match input {
        Some(path) => Box::new(
            JsonLinesSource::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(JsonLinesSource::stdin()),
    };

    let summary = replay(source.as_mut(), &session, &history, &mut sink).await?;
    session.close();

    drop(history);
    let report = task.await.context("history task failed")?;
    info!(
        translated = summary.translated,
        rejected = summary.rejected,
        retained = report.retained.len(),
        evicted = report.evicted,
        "replay complete"
    );
    Ok(())
}

fn run_encode(app: &AppConfig, profile: &str, message: &str) -> anyhow::Result<()> {
    let entry = find_profile(app, profile)?;
    let bytes = encode_input(message, entry.connection.send_box())
        .with_context(|| format!("cannot encode message for `{profile}`"))?;
    println!("{}", render_payload(&bytes, true));
    Ok(())
}

fn find_profile<'a>(app: &'a AppConfig, name: &str) -> anyhow::Result<&'a ProfileEntry> {
    app.profile(name)
        .with_context(|| format!("no profile named `{name}`"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
