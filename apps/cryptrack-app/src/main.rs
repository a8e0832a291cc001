//! # Crypto Tracker Profile CLI
//!
//! `cryptrack` drives the profile commands from a terminal, for support
//! and scripting against a real backend.
//!
//! ```text
//! cryptrack show
//! cryptrack check <USERNAME>
//! cryptrack update [--username U] [--full-name F] [--avatar PATH]
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr)
//! 2. Load config (defaults → profile.toml → CRYPTRACK_* env)
//! 3. Read the signed-in session from the environment
//! 4. Open the database, restore the shared profile, build the client
//! 5. Run the subcommand

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use cryptrack_app::commands::profile;
use cryptrack_app::error::ApiError;
use cryptrack_app::{init_tracing, AppContext};
use cryptrack_core::validation::meets_min_length;
use cryptrack_profile::{session_from_env, ProfileConfig};

#[derive(Parser, Debug)]
#[command(name = "cryptrack")]
#[command(about = "View and edit your Crypto Tracker profile")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to profile.toml (defaults to the platform config dir)
    #[arg(long, env = "CRYPTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, short = 'j', global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the profile header (username, avatar, email)
    Show,

    /// Check whether a username is free
    Check {
        username: String,
    },

    /// Change username, full name and/or avatar
    #[command(group(
        ArgGroup::new("changes")
            .required(true)
            .multiple(true)
            .args(["username", "full_name", "avatar"])
    ))]
    Update {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        full_name: Option<String>,

        /// Image file to upload as the new avatar
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = ?e.code, "{}", e.message);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ApiError> {
    let config = ProfileConfig::load(cli.config)?;
    let session = session_from_env()?;
    info!(user_id = %session.user_id, "Starting cryptrack");

    let ctx = AppContext::init(&config, session).await?;

    let result = match cli.command {
        Command::Show => show(&ctx, cli.json).await,
        Command::Check { username } => check(&ctx, &config, username, cli.json).await,
        Command::Update {
            username,
            full_name,
            avatar,
        } => update(&ctx, username, full_name, avatar, cli.json).await,
    };

    profile::close_editor(&ctx.editor);
    ctx.db.inner().close().await;
    result
}

async fn show(ctx: &AppContext, json: bool) -> Result<(), ApiError> {
    let overview = profile::get_profile_overview(&ctx.session).await?;
    emit(json, &overview, || {
        let mut text = format!("{}\n  avatar: {}", overview.username, overview.avatar_url);
        if let Some(email) = &overview.email {
            text.push_str(&format!("\n  email:  {}", email));
        }
        text
    })
}

async fn check(
    ctx: &AppContext,
    config: &ProfileConfig,
    username: String,
    json: bool,
) -> Result<(), ApiError> {
    profile::open_editor(&ctx.session, &ctx.editor).await?;
    profile::set_username(&ctx.editor, username.clone())?;
    let availability = profile::wait_for_availability(&ctx.editor).await?;

    let min = config.editor.min_username_length;
    emit(json, &availability, || {
        if !meets_min_length(&username, min) {
            format!("'{}' is too short (at least {} characters)", username, min)
        } else if availability.is_available {
            format!("'{}' is available", username)
        } else {
            format!("'{}' is already taken", username)
        }
    })
}

async fn update(
    ctx: &AppContext,
    username: Option<String>,
    full_name: Option<String>,
    avatar: Option<PathBuf>,
    json: bool,
) -> Result<(), ApiError> {
    profile::open_editor(&ctx.session, &ctx.editor).await?;

    if let Some(username) = username {
        profile::set_username(&ctx.editor, username)?;
        profile::wait_for_availability(&ctx.editor).await?;
    }
    if let Some(full_name) = full_name {
        profile::set_full_name(&ctx.editor, full_name)?;
    }
    if let Some(path) = avatar {
        let pick = profile::pick_avatar(&ctx.session, &ctx.editor, Some(path)).await?;
        if pick.cancelled {
            return Err(ApiError::validation("No avatar image selected"));
        }
    }

    let result = profile::submit_profile(&ctx.editor).await?;
    emit(json, &result, || result.message.clone())
}

fn emit<T, F>(json: bool, value: &T, text: F) -> Result<(), ApiError>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    if json {
        let out = serde_json::to_string_pretty(value)
            .map_err(|e| ApiError::internal(format!("Could not encode output: {}", e)))?;
        println!("{}", out);
    } else {
        println!("{}", text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_update_requires_a_change() {
        assert!(Cli::try_parse_from(["cryptrack", "update"]).is_err());

        let cli = Cli::try_parse_from([
            "cryptrack",
            "update",
            "--full-name",
            "Satoshi Nakamoto",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Update {
                username,
                full_name,
                avatar,
            } => {
                assert_eq!(username, None);
                assert_eq!(full_name.as_deref(), Some("Satoshi Nakamoto"));
                assert_eq!(avatar, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_takes_username() {
        let cli = Cli::try_parse_from(["cryptrack", "check", "satoshi"]).unwrap();
        assert!(matches!(cli.command, Command::Check { username } if username == "satoshi"));
    }
}
