//! CLI module for the StatusHawk console
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `login` / `register` / `logout` - session lifecycle
//! - `overview` - dashboard stats, optionally live via `--watch`
//! - `monitors` - list, add, toggle, and delete monitors
//! - `monitor` - single-monitor detail (info, 24h stats, history)
//! - `channels` - notification channels (list, connect Telegram, disconnect)
//! - `config` - configuration utilities (init)
//! - `completions` - generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Sign in and look around
//! statushawk login --email admin@admin.com
//! statushawk overview --watch
//!
//! # Manage monitors
//! statushawk monitors add --name "Google" --url https://google.com
//! statushawk monitors delete 3 --yes
//! ```

pub mod accounts;
pub mod channels;
pub mod completions;
pub mod config;
pub mod monitors;
pub mod output;
pub mod overview;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::api::ApiClient;
use crate::config::ConsoleConfig;
use crate::query::QueryCache;
use crate::session::SessionStore;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// StatusHawk - uptime monitoring console
#[derive(Parser, Debug)]
#[command(
    name = "statushawk",
    version,
    about = "Terminal console for the StatusHawk uptime-monitoring service"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "statushawk.toml")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "STATUSHAWK_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session token
    Login(LoginArgs),
    /// Create an account
    Register(RegisterArgs),
    /// Clear the stored session token
    Logout,
    /// Show account-wide dashboard stats
    Overview(OverviewArgs),
    /// Manage monitors
    #[command(subcommand)]
    Monitors(MonitorsCommands),
    /// Show one monitor in detail
    Monitor(MonitorArgs),
    /// Manage notification channels
    #[command(subcommand)]
    Channels(ChannelsCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Password (prompted when omitted)
    #[arg(short, long, env = "STATUSHAWK_PASSWORD")]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// First name
    #[arg(long)]
    pub first_name: String,

    /// Last name
    #[arg(long)]
    pub last_name: String,

    /// Password (prompted twice when omitted)
    #[arg(short, long, env = "STATUSHAWK_PASSWORD")]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct OverviewArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Keep the view open and refresh it on the polling interval
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Subcommand, Debug)]
pub enum MonitorsCommands {
    /// List monitors, one page at a time
    List(MonitorsListArgs),
    /// Register a new monitor
    Add(MonitorsAddArgs),
    /// Pause or resume a monitor
    Toggle(MonitorsToggleArgs),
    /// Delete a monitor
    Delete(MonitorsDeleteArgs),
}

#[derive(Args, Debug)]
pub struct MonitorsListArgs {
    /// Page to fetch
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct MonitorsAddArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// URL to check
    #[arg(short, long)]
    pub url: String,

    /// Check interval in seconds
    #[arg(short, long, default_value = "30")]
    pub interval: u32,
}

#[derive(Args, Debug)]
pub struct MonitorsToggleArgs {
    /// Monitor ID
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct MonitorsDeleteArgs {
    /// Monitor ID
    pub id: u64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Monitor ID
    pub id: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Keep the view open and refresh stats/history on the detail interval
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Subcommand, Debug)]
pub enum ChannelsCommands {
    /// List notification channels
    List(ChannelsListArgs),
    /// Print the Telegram connect link
    ConnectTelegram,
    /// Remove a notification channel
    Disconnect(ChannelsDisconnectArgs),
}

#[derive(Args, Debug)]
pub struct ChannelsListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ChannelsDisconnectArgs {
    /// Channel ID
    pub id: u64,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "statushawk.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Everything a command handler needs: the session store, the API client
/// resolving tokens through it, the query cache, and the loaded config.
pub struct Console {
    pub config: ConsoleConfig,
    pub session: Arc<SessionStore>,
    pub client: ApiClient,
    pub cache: Arc<QueryCache>,
}

impl Console {
    pub fn new(config: ConsoleConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let session = Arc::new(SessionStore::open(config.session.resolve_token_path()));
        let client = ApiClient::new(&config.api, Arc::clone(&session))?;
        Ok(Self {
            config,
            session,
            client,
            cache: Arc::new(QueryCache::new()),
        })
    }
}

/// The protected-route gate: commands that need a session fail fast with a
/// pointer to `login` instead of issuing doomed requests.
pub fn require_session(session: &SessionStore) -> Result<(), Box<dyn std::error::Error>> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err("Not logged in. Run `statushawk login --email <email>` first.".into())
    }
}
