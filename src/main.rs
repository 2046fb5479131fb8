use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::info;

use eoldate::config::{AppConfig, expand_home};
use eoldate::lifecycle::cache::{DiskCache, SnapshotStore};
use eoldate::lifecycle::query::EolClient;
use eoldate::lifecycle::sources::EndOfLifeSource;
use eoldate::logging;
use eoldate::output::TableBuilder;
use eoldate::output::report::describe_support;
use eoldate::output::writer::write_reports;

#[derive(Parser)]
#[command(name = "eoldate")]
#[command(version, about = "Look up end-of-life dates from endoflife.date")]
struct Cli {
    /// Technology or software name to look up
    #[arg(short = 't', long = "tech")]
    tech: Option<String>,

    /// Directory to save txt, json and csv results to
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print every technology endoflife.date knows about and exit
    #[arg(long = "getall")]
    get_all: bool,

    /// Check whether VERSION of --tech is still supported
    #[arg(short = 'c', long = "check", value_name = "VERSION", requires = "tech")]
    check: Option<String>,

    /// Delete cached snapshots from previous days and exit
    #[arg(long)]
    prune_cache: bool,

    /// Configuration file to use instead of the default one
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable colors in the terminal table
    #[arg(long)]
    no_color: bool,

    /// Log progress to stderr
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(&expand_home(path)),
        None => AppConfig::load_default(),
    }
    .context("Failed to load configuration")?;

    let _guard = logging::init_or_stderr(&config.resolved_log_dir(), cli.verbose);

    let cache = DiskCache::new(config.resolved_cache_dir());
    let source = EndOfLifeSource::with_timeout(
        &config.base_url,
        config.timeout_secs.map(Duration::from_secs),
    )
    .context("Failed to create endoflife.date client")?;
    let client = EolClient::new(source, cache);

    if cli.prune_cache {
        let removed = client
            .store()
            .prune(client.day())
            .context("Failed to prune cache")?;
        println!(
            "Removed {} stale snapshots from {}",
            removed,
            client.store().root().display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    if cli.get_all {
        info!("Getting all available technologies");
        let technologies = client
            .known_technologies()
            .context("Failed to get known technologies")?;
        for technology in technologies.iter() {
            println!("{}", technology);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(tech) = cli.tech else {
        eprintln!("No technologies specified");
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    if let Some(version) = cli.check {
        let report = client
            .is_supported_software_version(&tech, &version)
            .with_context(|| format!("Failed to check {} {}", tech, version))?;
        print!("{}", describe_support(&tech, &version, &report, client.day()));
        return Ok(ExitCode::SUCCESS);
    }

    let products = client
        .get_product(&tech)
        .with_context(|| format!("Failed to fetch lifecycle data for {}", tech))?;
    let table = TableBuilder::new(&products).with_today(client.day());
    println!("{}", table.render(!cli.no_color));

    if let Some(output) = cli.output {
        let dir = expand_home(&output);
        let paths = write_reports(&dir, &tech.to_lowercase(), &table.render(false), &products)
            .context("Failed to write output files")?;
        info!("Results saved to {:?}", paths);
    }

    Ok(ExitCode::SUCCESS)
}
