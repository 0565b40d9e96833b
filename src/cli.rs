use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "physdom")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Manage physical domains in NDO fabric policy templates", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ~/.config/physdom/config.toml)
    #[arg(long, global = true, env = "PHYSDOM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show one physical domain, or all of them
    Query(QueryArgs),

    /// Create or update a physical domain
    Present(PresentArgs),

    /// Remove a physical domain
    Absent(AbsentArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Shared Arguments
// ============================================================================

/// Connection and output options shared by every domain command
#[derive(Args, Clone, Debug, Default)]
pub struct ConnectionArgs {
    /// Nexus Dashboard host
    #[arg(long, env = "NDO_HOST")]
    pub host: Option<String>,

    /// User name
    #[arg(short, long, env = "NDO_USERNAME")]
    pub username: Option<String>,

    /// Password (prompted for when missing and attached to a terminal)
    #[arg(long, env = "NDO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Login domain
    #[arg(long, env = "NDO_LOGIN_DOMAIN")]
    pub login_domain: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Args, Clone, Debug)]
pub struct TemplateArgs {
    /// Fabric policy template name
    #[arg(short, long)]
    pub template: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

// ============================================================================
// Domain Commands
// ============================================================================

#[derive(Args, Clone, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub target: TemplateArgs,

    /// Physical domain name
    #[arg(short, long, alias = "physical-domain")]
    pub name: Option<String>,

    /// Physical domain uuid
    #[arg(long)]
    pub uuid: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct PresentArgs {
    #[command(flatten)]
    pub target: TemplateArgs,

    /// Physical domain name
    #[arg(short, long, alias = "physical-domain")]
    pub name: String,

    /// Physical domain uuid, needed to rename a domain
    #[arg(long)]
    pub uuid: Option<String>,

    /// Description ("" clears it)
    #[arg(short, long)]
    pub description: Option<String>,

    /// VLAN pool name ("" removes the pool)
    #[arg(short, long, alias = "vlan-pool")]
    pub pool: Option<String>,

    /// Show what would change without changing it
    #[arg(long)]
    pub check: bool,
}

#[derive(Args, Clone, Debug)]
pub struct AbsentArgs {
    #[command(flatten)]
    pub target: TemplateArgs,

    /// Physical domain name
    #[arg(short, long, alias = "physical-domain")]
    pub name: String,

    /// Show what would change without changing it
    #[arg(long)]
    pub check: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Print the config file location
    Path,
}
