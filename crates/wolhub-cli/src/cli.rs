//! Argument definitions for the `wolhub` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use wolhub_core::IdentityKey;

#[derive(Debug, Parser)]
#[command(
    name = "wolhub",
    version,
    about = "Wake-on-LAN device console",
    long_about = "Manage a Wake-on-LAN device registry and send wake requests from the terminal."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Registry server base URL (overrides the config file)
    #[arg(long, short = 's', global = true, env = "WOLHUB_SERVER")]
    pub server: Option<String>,

    /// Which device field identifies wake/delete targets
    #[arg(long, global = true, value_enum)]
    pub identity_key: Option<IdentityArg>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Suppress success messages
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// CLI spelling of the identity key choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdentityArg {
    Name,
    Mac,
}

impl From<IdentityArg> for IdentityKey {
    fn from(arg: IdentityArg) -> Self {
        match arg {
            IdentityArg::Name => IdentityKey::Name,
            IdentityArg::Mac => IdentityKey::MacAddress,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage registered devices
    Devices(DevicesArgs),

    /// Send a wake request to a device
    Wake {
        /// Device identifier (per the configured identity key)
        identifier: String,
    },

    /// Inspect or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List registered devices
    List,

    /// Register a new device
    Add {
        /// Device name
        #[arg(long)]
        name: String,

        /// MAC address
        #[arg(long)]
        mac: String,

        /// Last known IP address
        #[arg(long)]
        ip: Option<String>,

        /// Broadcast address for the magic packet
        #[arg(long)]
        broadcast: Option<String>,

        /// UDP port for the magic packet
        #[arg(long)]
        port: Option<u16>,
    },

    /// Delete a registered device
    Rm {
        /// Device identifier (per the configured identity key)
        identifier: String,
    },
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration
    Show,

    /// Interactively create the config file
    Init,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
