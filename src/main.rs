use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rs_com_kinematics::algebra::SymbolicAlgebra;
use rs_com_kinematics::chain::derive_symbolic;
use rs_com_kinematics::derivation_config::DerivationConfig;
use rs_com_kinematics::report::{render_report, write_report};

/// Derives the symbolic center of mass positions of the two-link arm and writes them
/// into a text file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file with symbol names and output location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file, overrides the one from the configuration
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Loads the configuration file if given and applies the command line overrides.
fn resolve_config(args: &Args) -> Result<DerivationConfig> {
    let mut config = match &args.config {
        Some(path) => DerivationConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?,
        None => DerivationConfig::default(),
    };
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    config.names.validate().context("Invalid symbol names")?;
    Ok(config)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = resolve_config(&args)?;

    let positions = derive_symbolic(&config.names).context("Failed to derive center of mass positions")?;
    info!("Derived center of mass positions for both links");

    let text = render_report(&SymbolicAlgebra, &positions);
    write_report(&config.output, &text)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    Ok(())
}
