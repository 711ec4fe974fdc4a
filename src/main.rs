use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli_exec;
mod cli_runtime;

use cli_runtime::GlobalArgs;

#[derive(Parser)]
#[command(name = "vfbrowse")]
#[command(about = "Browse and edit files on a versioned file store", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive browser (the default)
    Browse {
        /// Address to start at, e.g. /dev/docs
        #[arg(long)]
        location: Option<String>,
    },

    /// List a folder, or show a file's metadata
    Ls {
        #[arg(default_value = ".")]
        path: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Print file content
    Cat {
        path: String,
        /// default, latest or a version number (versioned files only)
        #[arg(long)]
        version: Option<String>,
    },

    /// Show the versions of a versioned file
    Versions {
        path: String,
        /// Include hidden versions
        #[arg(long)]
        all: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a local file as a new version
    Upload { path: String, file: PathBuf },

    /// Make a version the default
    SetDefault { path: String, version: u64 },

    /// Hide a version
    Hide { path: String, version: u64 },

    /// Unhide a version
    Unhide { path: String, version: u64 },

    /// Set the comment on a version
    Comment {
        path: String,
        version: u64,
        text: String,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli_runtime::Settings::resolve(&cli.global)?;

    match cli.command {
        None => cli_runtime::browse(settings, None),
        Some(Commands::Browse { location }) => cli_runtime::browse(settings, location),
        Some(command) => {
            vfbrowse::logging::init_stderr();
            cli_exec::handle_command(&settings, command)
        }
    }
}
