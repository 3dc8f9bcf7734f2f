//! tagsync: publish multi-architecture manifest lists for a library of
//! image repositories.
//!
//! # Usage
//!
//! ```text
//! tagsync put-shared --namespace <ns> [--all | <repo[:tag]>...] [--arch-namespace ARCH=NS]...
//!                    [--library DIR] [--dry-run] [--debug]
//! tagsync groups [--all | <repo[:tag]>...] [--library DIR] [--json]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use commands::{groups::GroupsArgs, put_shared::PutSharedArgs};
use tagsync_core::{config, Config};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tagsync",
    version,
    about = "Synchronize multi-architecture image tags into a shared namespace",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Config file (default: ~/.tagsync/config.yaml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Library directory holding `<repo>.yaml` files.
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    /// Verbose logging and `manifest-tool --debug`.
    #[arg(long, global = true)]
    pub debug: bool,
}

impl GlobalArgs {
    /// Load the config file and apply the global overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => config::load().context("failed to load ~/.tagsync/config.yaml")?,
        };
        if let Some(library) = &self.library {
            cfg.library = library.clone();
        }
        tracing::debug!(library = %cfg.library.display(), "configuration loaded");
        Ok(cfg)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Push manifest lists for every stale tag group.
    PutShared(PutSharedArgs),

    /// Show the tag groups that put-shared would consider (no registry access).
    Groups(GroupsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);
    match cli.command {
        Commands::PutShared(args) => args.run(&cli.global),
        Commands::Groups(args) => args.run(&cli.global),
    }
}

fn init_tracing(debug: bool) {
    use std::io::IsTerminal;

    use tracing_subscriber::{fmt, EnvFilter};

    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
