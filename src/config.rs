use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::{config_error, Error};
use crate::planner::{
    PlanningParameters, DEFAULT_FUEL_EFFICIENCY, DEFAULT_MAX_RANGE, DEFAULT_SAFETY_BUFFER,
};

pub const DEFAULT_MAPS_API_BASE: &str = "maps.googleapis.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub maps_api_base: String,
    pub maps_api_key: String,
    pub listen_addr: SocketAddr,
    pub planning: PlanningParameters,
    pub geocode_concurrency: usize,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let planning = PlanningParameters {
            max_range: parse_or("VEHICLE_MAX_RANGE", DEFAULT_MAX_RANGE)?,
            fuel_efficiency: parse_or("VEHICLE_MPG", DEFAULT_FUEL_EFFICIENCY)?,
            safety_buffer: parse_or("SAFETY_BUFFER", DEFAULT_SAFETY_BUFFER)?,
        };
        planning.validate()?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            maps_api_base: env::var("GOOGLE_MAPS_API_BASE")
                .unwrap_or_else(|_| DEFAULT_MAPS_API_BASE.into()),
            maps_api_key: env::var("GOOGLE_MAPS_API_KEY")?,
            listen_addr: parse_or("LISTEN_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?,
            planning,
            geocode_concurrency: parse_or("GEOCODE_CONCURRENCY", 4)?,
        })
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T, Error> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| config_error(name)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err.into()),
    }
}

#[test]
fn parse_or_falls_back_and_rejects_garbage() {
    env::remove_var("FUELROUTE_TEST_UNSET");
    assert_eq!(parse_or("FUELROUTE_TEST_UNSET", 7u32).unwrap(), 7);

    env::set_var("FUELROUTE_TEST_NUMBER", " 42.5 ");
    assert_eq!(parse_or("FUELROUTE_TEST_NUMBER", 0.0f64).unwrap(), 42.5);

    env::set_var("FUELROUTE_TEST_GARBAGE", "lots");
    let err = parse_or("FUELROUTE_TEST_GARBAGE", 0.0f64).unwrap_err();
    assert_eq!(err.code, 6);
}
