//! CLI argument definitions and subcommand routing.

pub mod config;
pub mod resources;

use clap::{Parser, Subcommand};

/// Command-line client for the Chatkit HTTP API.
///
/// Credentials come from the profile's `profile.conf`, overridden by
/// `--locator` and `--key`.
#[derive(Parser)]
#[command(name = "chatkit", version, about)]
pub struct Cli {
    /// Profile to read credentials from.
    #[arg(short, long, default_value = "default")]
    pub profile: String,

    /// Instance locator (`v1:<cluster>:<instance-id>`).
    #[arg(long, global = true)]
    pub locator: Option<String>,

    /// API key (`<key-id>:<key-secret>`).
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Log filter, e.g. `debug` or `chatkit=trace`.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Show or store profile credentials.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Mint a token.
    Token {
        /// Subject user id.
        #[arg(long)]
        user: Option<String>,
        /// Mint a superuser token.
        #[arg(long)]
        su: bool,
    },
    /// User operations.
    #[command(subcommand)]
    User(UserCommand),
    /// Room operations.
    #[command(subcommand)]
    Room(RoomCommand),
    /// Message operations.
    #[command(subcommand)]
    Message(MessageCommand),
    /// Role queries.
    #[command(subcommand)]
    Role(RoleCommand),
    /// Read cursors.
    #[command(subcommand)]
    Cursor(CursorCommand),
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Save `--locator` and `--key` into the profile.
    Set,
    /// Print the profile's locator and key id.
    Show,
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Fetch one user.
    Get { id: String },
    /// List users.
    #[command(alias = "ls")]
    List {
        /// Only users created at or after this timestamp.
        #[arg(long)]
        from_ts: Option<String>,
        /// Page size (1-100).
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Create a user.
    Create {
        id: String,
        name: String,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Delete a user.
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum RoomCommand {
    /// Fetch one room.
    Get { id: String },
    /// List rooms.
    #[command(alias = "ls")]
    List {
        /// Only rooms with larger ids.
        #[arg(long)]
        from_id: Option<String>,
        /// Include private rooms.
        #[arg(long)]
        include_private: bool,
    },
    /// Create a room as `--creator`.
    Create {
        name: String,
        #[arg(long)]
        creator: String,
        #[arg(long)]
        private: bool,
        /// Initial member; repeat for more.
        #[arg(long = "member")]
        members: Vec<String>,
    },
    /// Delete a room.
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum MessageCommand {
    /// Send a text message.
    Send {
        room: String,
        text: String,
        #[arg(long)]
        sender: String,
    },
    /// List a room's messages, newest first.
    #[command(alias = "ls")]
    List {
        room: String,
        #[arg(long)]
        limit: Option<u32>,
        /// Start after this message id.
        #[arg(long)]
        initial_id: Option<u64>,
        /// List forward from `--initial-id` instead of backward.
        #[arg(long)]
        newer: bool,
    },
}

#[derive(Subcommand)]
pub enum RoleCommand {
    /// List all roles.
    #[command(alias = "ls")]
    List,
    /// List a user's roles.
    User { id: String },
}

#[derive(Subcommand)]
pub enum CursorCommand {
    /// Fetch a user's read cursor in a room.
    Get { user: String, room: String },
    /// Set a user's read cursor in a room.
    Set {
        user: String,
        room: String,
        position: u64,
    },
}
