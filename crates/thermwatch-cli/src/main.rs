//! Thermwatch Control Tool
//!
//! CLI for querying a running Thermwatch daemon over its HTTP API.

mod client;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use client::DaemonClient;

#[derive(Parser)]
#[command(name = "thermwatchctl")]
#[command(about = "Query tool for the Thermwatch daemon")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Base URL of the daemon
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current CPU temperature and rolling statistics
    Status,
    /// Discovered thermal zones
    Zones,
    /// Current readings from every thermal zone
    Temps,
    /// Current fan speeds
    Fans,
    /// CPU temperature history
    History,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let client = DaemonClient::new(&cli.url);

    match cli.command {
        Commands::Status => {
            let stats = client.stats().await?;
            println!("CPU temperature: {:.1}°C", stats.stats.cpu_temp);
            println!(
                "Last {} samples: avg {:.1}°C, min {:.1}°C, max {:.1}°C",
                stats.history_count.min(20),
                stats.stats.avg_temp,
                stats.stats.min_temp,
                stats.stats.max_temp
            );
        }
        Commands::Zones => {
            let zones = client.zones().await?;
            println!("{} thermal zones:", zones.count);
            for zone in zones.zones {
                println!("  {} [{}]", zone.name, zone.zone_type);
            }
        }
        Commands::Temps => {
            let temps = client.all_temperatures().await?;
            let mut readings: Vec<_> = temps.zones.into_values().collect();
            readings.sort_by(|a, b| a.name.cmp(&b.name));
            for reading in readings {
                println!("{}: {:.1}°C", reading.name, reading.temperature);
            }
        }
        Commands::Fans => {
            let fans = client.fans().await?;
            if fans.fans.is_empty() {
                println!("No fan readings");
            }
            let mut readings: Vec<_> = fans.fans.into_values().collect();
            readings.sort_by(|a, b| a.name.cmp(&b.name));
            for reading in readings {
                println!("{}: {} RPM", reading.name, reading.speed);
            }
        }
        Commands::History => {
            let history = client.history().await?;
            for entry in history.history {
                println!("{}  {:.1}°C", entry.timestamp, entry.temperature);
            }
        }
    }

    Ok(())
}
