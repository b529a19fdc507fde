//! chatkit-cli: one-shot commands against a Chatkit instance.
//!
//! Every command builds a blocking client from the active profile, runs a
//! single call and prints the JSON result to stdout.

#![allow(
    missing_docs,
    missing_debug_implementations,
    clippy::print_stderr,
    clippy::print_stdout
)]

mod cmd;

use std::process;

use clap::Parser;
use serde_json::json;

use crate::cmd::config::{ProfileConfig, profile_path};
use crate::cmd::{Cli, Command, ConfigCommand, resources};

fn main() {
    if let Err(e) = run() {
        eprintln!("fatal: {e}");
        process::exit(1);
    }
}

fn run() -> chatkit::Result<()> {
    let cli = Cli::parse();
    chatkit::init_logger(Some(&cli.log_level))?;

    let cfg = ProfileConfig::load(&cli.profile)?
        .with_overrides(cli.locator.as_deref(), cli.key.as_deref());

    let value = match cli.command {
        Command::Config(ConfigCommand::Set) => {
            // Validate before persisting.
            cfg.client()?;
            let path = cfg.save(&cli.profile)?;
            eprintln!("Saved {}", path.display());
            return Ok(());
        }
        Command::Config(ConfigCommand::Show) => json!({
            "profile": &cli.profile,
            "path": profile_path(&cli.profile).display().to_string(),
            "instance_locator": &cfg.instance_locator,
            "key_id": cfg.key_id(),
        }),
        Command::Token { user, su } => {
            let token = cfg.client()?.generate_token(user.as_deref(), su)?;
            json!({ "token": token.token, "expires_in": token.expires_in })
        }
        Command::User(c) => resources::user(&cfg.client()?, c)?,
        Command::Room(c) => resources::room(&cfg.client()?, c)?,
        Command::Message(c) => resources::message(&cfg.client()?, c)?,
        Command::Role(c) => resources::role(&cfg.client()?, c)?,
        Command::Cursor(c) => resources::cursor(&cfg.client()?, c)?,
    };
    resources::print_json(&value)
}
