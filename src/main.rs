use fuelroute::config::Config;
use fuelroute::db::PgPool;
use fuelroute::engine::Engine;
use fuelroute::error::Error;
use fuelroute::external::GoogleMaps;
use fuelroute::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let PgPool(pool) = PgPool::new(&config.database_url, config.database_max_connections).await?;

    let engine = Engine::new(pool, GoogleMaps::from_config(&config), config.planning).await?;

    serve(engine, config.listen_addr).await
}
