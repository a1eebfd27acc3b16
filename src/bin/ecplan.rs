//! ecplan binary

use clap::{Args, Parser, Subcommand};
use ecplan::common::{DisplayUnit, ReportFormat, SimConfig};
use ecplan::Simulation;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ecplan")]
#[command(about = "Capacity planning for erasure-coded storage clusters")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place clusters, apply upload and download, print the report
    Simulate(Overrides),

    /// Print the effective configuration
    Config(Overrides),
}

/// Command-line overrides, applied on top of file and environment values
#[derive(Args)]
struct Overrides {
    /// Datacenters in the region
    #[arg(long)]
    datacenters: Option<usize>,

    #[arg(long)]
    racks_per_datacenter: Option<usize>,

    #[arg(long)]
    machines_per_rack: Option<usize>,

    #[arg(long)]
    disks_per_machine: Option<usize>,

    /// Storage clusters to allocate
    #[arg(long)]
    clusters: Option<usize>,

    /// Machines per cluster (EC stripe width)
    #[arg(long)]
    stripe_width: Option<usize>,

    #[arg(long)]
    parity: Option<usize>,

    /// Datacenters each cluster spans
    #[arg(long)]
    cluster_datacenters: Option<usize>,

    /// Pack each datacenter's share of a cluster into one rack (true or false)
    #[arg(long)]
    rack_locality: Option<bool>,

    /// Aggregate upload, gigabits
    #[arg(long)]
    upload: Option<f64>,

    /// Aggregate download, gigabits
    #[arg(long)]
    download: Option<f64>,

    /// Seed for egress chunk selection
    #[arg(long)]
    seed: Option<u64>,

    /// Display unit: bit or byte
    #[arg(long)]
    unit: Option<DisplayUnit>,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,
}

impl Overrides {
    fn apply(self, config: &mut SimConfig) {
        if let Some(v) = self.datacenters {
            config.topology.datacenters = v;
        }
        if let Some(v) = self.racks_per_datacenter {
            config.topology.racks_per_datacenter = v;
        }
        if let Some(v) = self.machines_per_rack {
            config.topology.machines_per_rack = v;
        }
        if let Some(v) = self.disks_per_machine {
            config.topology.disks_per_machine = v;
        }
        if let Some(v) = self.clusters {
            config.placement.cluster_count = v;
        }
        if let Some(v) = self.stripe_width {
            config.placement.stripe_width = v;
        }
        if let Some(v) = self.parity {
            config.placement.parity_chunks = v;
        }
        if let Some(v) = self.cluster_datacenters {
            config.placement.datacenters = v;
        }
        if let Some(v) = self.rack_locality {
            config.placement.rack_locality = v;
        }
        if let Some(v) = self.upload {
            config.traffic.upload = v;
        }
        if let Some(v) = self.download {
            config.traffic.download = v;
        }
        if self.seed.is_some() {
            config.traffic.seed = self.seed;
        }
        if let Some(v) = self.unit {
            config.report.unit = v;
        }
        if self.json {
            config.report.format = ReportFormat::Json;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = SimConfig::load(cli.config.as_deref())?;
    let simulate = match cli.command {
        Commands::Simulate(overrides) => {
            overrides.apply(&mut config);
            true
        }
        Commands::Config(overrides) => {
            overrides.apply(&mut config);
            false
        }
    };
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if !simulate {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let unit = config.report.unit;
    let format = config.report.format;
    let outcome = Simulation::new(config).run()?;
    let report = outcome.report(unit);

    match format {
        ReportFormat::Text => print!("{}", report),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(args: &[&str]) -> Overrides {
        let mut argv = vec!["ecplan", "simulate"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Simulate(overrides) => overrides,
            Commands::Config(_) => unreachable!(),
        }
    }

    #[test]
    fn test_rack_locality_can_be_switched_off() {
        let mut config = SimConfig::default();
        config.placement.rack_locality = true;

        overrides(&[]).apply(&mut config);
        assert!(config.placement.rack_locality);

        overrides(&["--rack-locality", "false"]).apply(&mut config);
        assert!(!config.placement.rack_locality);

        overrides(&["--rack-locality", "true"]).apply(&mut config);
        assert!(config.placement.rack_locality);
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = SimConfig::default();
        overrides(&["--stripe-width", "9", "--parity", "3", "--seed", "7", "--unit", "byte", "--json"])
            .apply(&mut config);

        assert_eq!(config.placement.stripe_width, 9);
        assert_eq!(config.placement.parity_chunks, 3);
        assert_eq!(config.traffic.seed, Some(7));
        assert_eq!(config.report.unit, DisplayUnit::Byte);
        assert_eq!(config.report.format, ReportFormat::Json);
    }
}
