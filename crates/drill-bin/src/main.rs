//! vimdrill entrypoint: a headless driver over the session registry.
//!
//! Terminal rendering and the HTTP listener are external collaborators; this
//! binary wires config, generator and stats sink together and either deals a
//! round (emitting the session snapshot as JSON on stdout) or exports the
//! lifetime statistics.

use anyhow::{Result, bail};
use clap::Parser;
use core_game::{ExportFormat, SessionRegistry, TaskGenerator};
use core_stats::StatsTracker;
use tracing::info;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vimdrill", version, about = "vim-motion trainer")]
struct Args {
    /// Round to deal: beginner, intermediate, advanced, expert or mixed.
    #[arg(long = "round-type", default_value = "beginner")]
    round_type: String,
    /// Configuration file path (overrides discovery of `vimdrill.toml`).
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    /// Colour theme override.
    #[arg(long)]
    theme: Option<String>,
    /// Seed for a reproducible round.
    #[arg(long)]
    seed: Option<u64>,
    /// Export lifetime statistics (json or csv) instead of dealing a round.
    #[arg(long)]
    export: Option<String>,
    /// Run the JSON API server (transport not compiled into this build).
    #[arg(long)]
    server: bool,
    /// Print corpus attribution and exit.
    #[arg(long)]
    attribution: bool,
}

fn main() -> Result<()> {
    let file_appender = tracing_appender::rolling::never(".", "vimdrill.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(target: "runtime.panic", ?panic_info, "panic");
        default_panic(panic_info);
    }));

    let args = Args::parse();
    info!(target: "runtime", round_type = %args.round_type, "startup");

    let mut config = core_config::load_from(args.config.clone())?;
    if let Some(theme) = args.theme {
        config.theme = theme;
    }

    let generator = match args.seed {
        Some(seed) => TaskGenerator::with_seed(seed),
        None => TaskGenerator::new(),
    };
    let tracker = StatsTracker::open(&config.stats_file);
    let registry = SessionRegistry::new(generator, tracker);

    if args.attribution {
        println!("{}", registry.attribution());
        return Ok(());
    }

    if args.server {
        bail!(
            "the HTTP transport is an external collaborator; bind {} with a wrapper over the registry",
            config.server_addr
        );
    }

    if let Some(format) = args.export {
        let format = ExportFormat::parse(&format)?;
        print!("{}", registry.export_stats(format)?);
        return Ok(());
    }

    let created = registry.create_session(&args.round_type);
    println!("{}", serde_json::to_string_pretty(&created)?);
    Ok(())
}
