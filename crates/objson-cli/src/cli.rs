use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "objson",
    about = "Inspect and edit an objson settings document",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file to operate on
    #[arg(short, long, global = true, default_value = "settings.json")]
    pub file: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the settings
    Show(ShowArgs),
    /// Print one setting (dotted paths reach into nested objects)
    Get(GetArgs),
    /// Change one setting and save
    Set(SetArgs),
    /// Overwrite the file with default settings
    Reset,
    /// One-line summary of the settings
    Describe,
    /// Manage the plugin list
    Plugin(PluginArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    /// Print the flat key/value projection instead of JSON
    #[arg(long)]
    pub flat: bool,
    /// Include properties normally left out of the file
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
}

#[derive(Args)]
pub struct SetArgs {
    pub key: String,
    /// JSON value; anything that does not parse is taken as a string
    pub value: String,
}

#[derive(Args)]
pub struct PluginArgs {
    #[command(subcommand)]
    pub action: PluginAction,
}

#[derive(Subcommand)]
pub enum PluginAction {
    List,
    Add {
        name: String,
        #[arg(long)]
        disabled: bool,
    },
    Remove {
        name: String,
    },
    Enable {
        name: String,
    },
    Disable {
        name: String,
    },
}
