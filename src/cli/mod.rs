// src/cli/mod.rs — CLI definition (clap derive)

pub mod progress;
pub mod scan;
pub mod spectrum;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "auditpop",
    about = "Content safety audit studio for creators (simulated)",
    version
)]
pub struct Cli {
    /// Audio file to load into the studio. Only the name is used; contents
    /// are never read.
    pub file: Option<String>,

    /// Target platform preset: youtube, spotify, or general
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Config file path (defaults to ./auditpop.toml when present)
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one headless scan and print the flag report
    Scan {
        /// Audio file name for the report header
        file: Option<String>,

        /// Target platform preset: youtube, spotify, or general
        #[arg(short, long)]
        platform: Option<String>,

        /// Fixed RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the report as JSON on stdout (suppresses progress lines)
        #[arg(long)]
        json: bool,
    },
    /// Launch the studio TUI (default when no subcommand is given)
    Studio {
        /// Audio file to load into the studio
        file: Option<String>,

        /// Target platform preset: youtube, spotify, or general
        #[arg(short, long)]
        platform: Option<String>,

        /// Fixed RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the four-tier risk spectrum reference
    Spectrum,
}
