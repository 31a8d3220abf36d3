use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "artifex",
    about = "Artifex — build-artifact registry for smart-contract workflows",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Root directory of the filesystem store.
    #[arg(long, global = true, default_value = "artifex-db")]
    pub data_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the registry REST server
    Serve(ServeArgs),
    /// Read the document at a path
    Get(GetArgs),
    /// Write a document at a path
    Set(SetArgs),
    /// List stored entries under a prefix
    Ls(LsArgs),
    /// Remove the document at a path
    Clear(ClearArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file; flags below override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Bind address, e.g. 127.0.0.1:7000
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
    /// Allow cross-origin requests (development use)
    #[arg(long)]
    pub allow_cors: bool,
    /// Serve from memory instead of the data directory
    #[arg(long)]
    pub in_memory: bool,
}

#[derive(Args)]
pub struct GetArgs {
    /// Storage path, e.g. deploys/1337/FirstDeploy/deploy
    pub path: String,
}

#[derive(Args)]
pub struct SetArgs {
    /// Storage path, e.g. links/FirstLink
    pub path: String,
    /// JSON document to store
    pub value: String,
    /// Replace an existing document
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Args)]
pub struct LsArgs {
    /// Prefix to enumerate; omit for the whole store
    pub prefix: Option<String>,
    /// Print the aggregated subtree as JSON instead of a path listing
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Storage path to remove
    pub path: String,
}
