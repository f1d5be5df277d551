use std::fs::File;
use std::path::PathBuf;

use clap::Parser;

use fuelroute::config::Config;
use fuelroute::db::PgPool;
use fuelroute::engine::Engine;
use fuelroute::error::Error;
use fuelroute::external::GoogleMaps;
use fuelroute::ingest::load_fuel_data;

/// Load the fuel price csv file and persist it to the database.
#[derive(Parser)]
struct Args {
    /// A csv file with the fuel station data.
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let Some(file) = args.file else {
        println!("The file is required for processing");
        return Ok(());
    };

    let config = Config::from_env()?;

    let PgPool(pool) = PgPool::new(&config.database_url, config.database_max_connections).await?;

    let maps = GoogleMaps::from_config(&config);
    let engine = Engine::new(pool, maps.clone(), config.planning).await?;

    let report = load_fuel_data(
        File::open(&file)?,
        &maps,
        &engine,
        config.geocode_concurrency,
    )
    .await?;

    tracing::info!(?report, "ingestion finished");
    println!("Fuel price data successfully stored to database.");

    Ok(())
}
