//! Headless viewer for the alignment relay.
//!
//! Loads a roster, joins the relay as a regular session and either prints
//! every published view (`watch`) or performs one drag and exits (`move`).

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use client::{ClientConfig, Position, RosterError, SessionError, SessionHandle, View, load_roster, spawn_session};
use serde_json::{Value, json};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to load roster: {0}")]
    Roster(#[from] RosterError),
    #[error("unknown member `{0}`")]
    UnknownMember(String),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("timed out waiting for the relay connection")]
    Timeout,
    #[error("signal handler failed: {0}")]
    Signal(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "alignment-cli", about = "Headless alignment viewer")]
struct Cli {
    /// JSON roster used to seed the member store.
    #[arg(long, env = "ALIGNMENT_ROSTER")]
    roster: PathBuf,

    /// Relay host; defaults to `ALIGNMENT_HOST` or `localhost:5000`.
    #[arg(long)]
    host: Option<String>,

    /// Avatar CDN prefix; when set, snapshots include each member's avatar URL.
    #[arg(long, env = "ALIGNMENT_AVATAR_BASE")]
    avatar_base: Option<String>,

    /// Requested avatar size in pixels, rounded up to a power of two.
    #[arg(long, default_value_t = 128)]
    avatar_size: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every view the session publishes until interrupted.
    Watch,
    /// Wait for the connection, move one member, and exit.
    Move {
        id: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,

        /// Give up if the relay is not reachable within this many seconds.
        #[arg(long, default_value_t = 10)]
        connect_timeout_secs: u64,

        /// Keep the socket open this long after the move so it is flushed.
        #[arg(long, default_value_t = 250)]
        linger_ms: u64,
    },
}

/// How snapshot lines render avatar URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AvatarOptions {
    base: String,
    size: u32,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let cli = Cli::parse();
    let config = client_config(cli.host);
    let avatars = cli.avatar_base.map(|base| AvatarOptions { base, size: cli.avatar_size });
    let store = load_roster(&cli.roster)?;
    info!(roster = %cli.roster.display(), members = store.len(), sid = %config.session_tag, "roster loaded");

    match cli.command {
        Command::Watch => run_watch(spawn_session(&config, store), avatars.as_ref()).await,
        Command::Move { id, x, y, connect_timeout_secs, linger_ms } => {
            if !store.contains(&id) {
                return Err(CliError::UnknownMember(id));
            }
            let session = spawn_session(&config, store);
            let result = run_move(
                &session,
                &id,
                Position::new(x, y),
                Duration::from_secs(connect_timeout_secs),
                Duration::from_millis(linger_ms),
                avatars.as_ref(),
            )
            .await;
            session.shutdown().await;
            result
        }
    }
}

fn client_config(host: Option<String>) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    config
}

async fn run_watch(session: SessionHandle, avatars: Option<&AvatarOptions>) -> Result<(), CliError> {
    let mut views = session.subscribe();
    print_json(&snapshot_json(&views.borrow_and_update(), avatars))?;

    let outcome = loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => break signal.map_err(CliError::from),
            changed = views.changed() => {
                if changed.is_err() {
                    warn!("session stopped");
                    break Err(CliError::Session(SessionError::Closed));
                }
                let view = views.borrow_and_update().clone();
                print_json(&snapshot_json(&view, avatars))?;
            }
        }
    };

    session.shutdown().await;
    outcome
}

async fn run_move(
    session: &SessionHandle,
    id: &str,
    position: Position,
    connect_timeout: Duration,
    linger: Duration,
    avatars: Option<&AvatarOptions>,
) -> Result<(), CliError> {
    let mut views = session.subscribe();
    tokio::time::timeout(connect_timeout, views.wait_for(|view| !view.locked()))
        .await
        .map_err(|_| CliError::Timeout)?
        .map_err(|_| SessionError::Closed)?;

    session.begin_drag(id)?;
    session.move_member(id, position)?;
    let view = views
        .wait_for(|view| view.store.get(id).is_some_and(|member| member.position == position))
        .await
        .map_err(|_| SessionError::Closed)?
        .clone();
    print_json(&snapshot_json(&view, avatars))?;

    tokio::time::sleep(linger).await;
    info!(%id, x = position.x, y = position.y, "move sent");
    Ok(())
}

/// One line of output per published view.
fn snapshot_json(view: &View, avatars: Option<&AvatarOptions>) -> Value {
    let members: Vec<Value> = view
        .store
        .entries()
        .map(|(id, member)| {
            let mut entry = json!({ "id": id, "x": member.position.x, "y": member.position.y });
            if let Some(avatars) = avatars {
                entry["avatar"] = Value::String(member.avatar_url(&avatars.base, avatars.size));
            }
            entry
        })
        .collect();
    json!({
        "state": format!("{:?}", view.state),
        "locked": view.locked(),
        "top": view.render_order.top(),
        "members": members,
    })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string(value)?;
    println!("{rendered}");
    Ok(())
}
