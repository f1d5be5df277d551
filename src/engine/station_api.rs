use super::Engine;

use async_trait::async_trait;
use sqlx::Executor;

use crate::{api::StationAPI, entities::FuelStation, error::Error};

#[async_trait]
impl StationAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_station(&self, station: FuelStation) -> Result<bool, Error> {
        let mut conn = self.pool.acquire().await?;

        let result = conn
            .execute(
                sqlx::query(
                    "INSERT INTO fuel_stations (name, address, latitude, longitude, retail_price)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT DO NOTHING",
                )
                .bind(&station.name)
                .bind(&station.address)
                .bind(station.latitude)
                .bind(station.longitude)
                .bind(station.retail_price),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Stations with resolved coordinates, in the order they were stored.
    #[tracing::instrument(skip(self))]
    async fn list_stations(&self) -> Result<Vec<FuelStation>, Error> {
        let stations = sqlx::query_as::<_, FuelStation>(
            "SELECT name, address, latitude, longitude, retail_price
            FROM fuel_stations
            WHERE latitude IS NOT NULL AND longitude IS NOT NULL
            ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stations)
    }
}
