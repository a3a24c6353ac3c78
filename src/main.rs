// src/main.rs — AuditPop entry point

use clap::Parser;

use auditpop::cli::{scan, spectrum, Cli, Commands};
use auditpop::engine::types::{EngineTiming, Platform};
use auditpop::engine::AuditEngine;
use auditpop::infra::config::Config;
use auditpop::infra::logger;
use auditpop::tui;

#[tokio::main]
async fn main() {
    // Respects RUST_LOG; logs go to stderr, away from reports and the TUI
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Some(Commands::Scan {
            file,
            platform,
            seed,
            json,
        }) => {
            let platform = resolve_platform(platform.as_deref(), &config)?;
            let seed = seed.or(config.studio.seed);
            scan::run_scan(file.or(cli.file), platform, seed, json, &config).await
        }
        Some(Commands::Spectrum) => {
            spectrum::run_spectrum();
            Ok(())
        }
        Some(Commands::Studio {
            file,
            platform,
            seed,
        }) => {
            let platform = resolve_platform(platform.as_deref(), &config)?;
            let seed = seed.or(config.studio.seed);
            launch_studio(file.or(cli.file), platform, seed, &config)
        }
        // Bare `auditpop [FILE]` opens the studio.
        None => {
            let platform = resolve_platform(cli.platform.as_deref(), &config)?;
            let seed = cli.seed.or(config.studio.seed);
            launch_studio(cli.file, platform, seed, &config)
        }
    }
}

fn launch_studio(
    file: Option<String>,
    platform: Platform,
    seed: Option<u64>,
    config: &Config,
) -> anyhow::Result<()> {
    let timing = EngineTiming::from_config(&config.scan, &config.flow);
    let engine = match seed {
        Some(seed) => AuditEngine::with_seed(platform, timing, seed),
        None => AuditEngine::new(platform, timing),
    };
    tui::run_studio(engine, config, file)
}

/// CLI flag wins over the config's `[studio] platform`.
fn resolve_platform(flag: Option<&str>, config: &Config) -> anyhow::Result<Platform> {
    let name = flag.unwrap_or(&config.studio.platform);
    Ok(Platform::parse(name)?)
}
