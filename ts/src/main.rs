use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use tripstore::cli::{Cli, Command};
use tripstore::config::Config;
use tripstore::{Neo4jStore, TripFact, TripStore};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("tripstore starting");

    let store = Neo4jStore::connect(&config)
        .await
        .context("Failed to connect to graph backend")?;

    match cli.command {
        Command::Ping => {
            store.ping().await?;
            println!("{} {}", "✓".green(), config.uri.cyan());
        }
        Command::Upsert { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let fact: TripFact =
                serde_json::from_str(&content).context("Failed to parse trip fact")?;
            store.upsert(&fact).await?;
            println!(
                "{} Upserted trip: {} for {}",
                "✓".green(),
                fact.trip_id.cyan(),
                fact.user_id
            );
        }
        Command::Trips { user } => {
            let trips = store.trips_for_user(&user).await?;
            if trips.is_empty() {
                println!("No trips found for {}", user);
            } else {
                for trip in trips {
                    println!(
                        "{}  {}  {}  budget {}",
                        trip.date.to_string().yellow(),
                        trip.city,
                        trip.trip_id.dimmed(),
                        trip.budget
                    );
                }
            }
        }
    }

    Ok(())
}
