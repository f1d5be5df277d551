//! Loads truck stop prices from a spreadsheet export into the station catalog.

use std::io;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::{
    api::StationAPI,
    entities::{Coordinates, FuelStation},
    error::{missing_column_error, Error},
    external::GoogleMaps,
};

const NAME_COLUMN: &str = "truckstop name";
const ADDRESS_COLUMN: &str = "address";
const PRICE_COLUMN: &str = "retail price";

#[async_trait]
pub trait Geocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, Error>;
}

#[async_trait]
impl Geocoder for GoogleMaps {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, Error> {
        GoogleMaps::geocode(self, address).await
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "truckstop name")]
    name: Option<String>,
    address: Option<String>,
    #[serde(rename = "retail price")]
    retail_price: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuelRow {
    pub name: String,
    pub address: String,
    pub retail_price: f64,
}

#[derive(Debug, Default)]
pub struct CleanRows {
    pub rows: Vec<FuelRow>,
    pub dropped: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub rows: usize,
    pub dropped: usize,
    pub unresolved: usize,
    pub created: usize,
    pub existing: usize,
}

/// Reads and cleans every row. Header names are matched case-insensitively;
/// rows without a name, address or usable price are counted as dropped.
pub fn read_rows<R: io::Read>(reader: R) -> Result<CleanRows, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: csv::StringRecord = reader.headers()?.iter().map(|h| h.to_lowercase()).collect();

    for column in [NAME_COLUMN, ADDRESS_COLUMN, PRICE_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(missing_column_error(column));
        }
    }

    reader.set_headers(headers);

    let mut clean = CleanRows::default();

    for record in reader.deserialize::<RawRow>() {
        match clean_row(record?) {
            Some(row) => clean.rows.push(row),
            None => clean.dropped += 1,
        }
    }

    Ok(clean)
}

fn clean_row(raw: RawRow) -> Option<FuelRow> {
    let name = raw
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())?;

    let address = raw
        .address
        .map(|address| replace_word(address.trim(), "EXIT", "E"))
        .filter(|address| !address.is_empty())?;

    let retail_price = raw
        .retail_price
        .and_then(|price| price.trim().parse::<f64>().ok())
        .filter(|price| price.is_finite() && *price >= 0.0)?;

    Some(FuelRow {
        name,
        address,
        retail_price,
    })
}

/// Replaces `word` where it stands alone, i.e. not inside a longer run of
/// letters, digits or underscores.
fn replace_word(text: &str, word: &str, replacement: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut previous: Option<char> = None;

    while let Some(pos) = rest.find(word) {
        let before = rest[..pos].chars().next_back().or(previous);
        let after = rest[pos + word.len()..].chars().next();

        out.push_str(&rest[..pos]);

        if !before.map_or(false, is_word) && !after.map_or(false, is_word) {
            out.push_str(replacement);
        } else {
            out.push_str(word);
        }

        previous = word.chars().next_back();
        rest = &rest[pos + word.len()..];
    }

    out.push_str(rest);
    out
}

/// Geocodes every clean row and stores the ones that resolve. Lookups run
/// `concurrency` at a time; stations are stored in file order.
#[tracing::instrument(skip_all)]
pub async fn load_fuel_data<R, G, C>(
    reader: R,
    geocoder: &G,
    catalog: &C,
    concurrency: usize,
) -> Result<IngestReport, Error>
where
    R: io::Read,
    G: Geocoder + ?Sized,
    C: StationAPI + ?Sized,
{
    let CleanRows { rows, dropped } = read_rows(reader)?;

    let mut report = IngestReport {
        rows: rows.len() + dropped,
        dropped,
        ..Default::default()
    };

    tracing::info!("{} usable rows, {} dropped", rows.len(), dropped);

    let mut geocoded = stream::iter(rows)
        .map(|row| async move {
            let location = geocoder.geocode(&row.address).await;
            (row, location)
        })
        .buffered(concurrency.max(1));

    while let Some((row, location)) = geocoded.next().await {
        let coordinates = match location {
            Ok(Some(coordinates)) => coordinates,
            Ok(None) => {
                tracing::warn!("could not geocode {:?}, skipping {}", row.address, row.name);
                report.unresolved += 1;
                continue;
            }
            Err(err) => {
                tracing::warn!("geocoding {:?} failed ({}), skipping {}", row.address, err.message, row.name);
                report.unresolved += 1;
                continue;
            }
        };

        let station = FuelStation::new(row.name, row.address, coordinates, row.retail_price);

        if catalog.create_station(station.clone()).await? {
            tracing::info!(
                "Fuel station {}-{}-{} record created!",
                station.name,
                station.latitude,
                station.longitude
            );
            report.created += 1;
        } else {
            report.existing += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const FUEL_CSV: &str = "\
OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price
7,  WOODSHED OF BIG CABIN ,\"I-44, EXIT 283 & US-69\",Big Cabin,OK,307,3.00733333
36,KWIK TRIP #796,I-94 EXIT 143,Tomah,WI,480,3.2
41,MISSING PRICE,I-80 EXIT 1,Somewhere,NE,1,
42,BAD PRICE,I-80 EXIT 2,Somewhere,NE,1,n/a
43,,I-80 EXIT 3,Somewhere,NE,1,3.1
44,NOWHERE,Unknown Rd,Nowhere,NE,1,2.9
7,WOODSHED OF BIG CABIN,\"I-44, EXIT 283 & US-69\",Big Cabin,OK,307,3.00733333
";

    struct KnownAddresses(HashMap<String, Coordinates>);

    #[async_trait]
    impl Geocoder for KnownAddresses {
        async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, Error> {
            Ok(self.0.get(address).copied())
        }
    }

    #[derive(Default)]
    struct MemoryCatalog(Mutex<Vec<FuelStation>>);

    #[async_trait]
    impl StationAPI for MemoryCatalog {
        async fn create_station(&self, station: FuelStation) -> Result<bool, Error> {
            let mut stations = self.0.lock().unwrap();
            if stations.contains(&station) {
                return Ok(false);
            }
            stations.push(station);
            Ok(true)
        }

        async fn list_stations(&self) -> Result<Vec<FuelStation>, Error> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    fn geocoder() -> KnownAddresses {
        KnownAddresses(HashMap::from([
            ("I-44, E 283 & US-69".to_string(), Coordinates::new(36.5, -95.2)),
            ("I-94 E 143".to_string(), Coordinates::new(43.9, -90.5)),
        ]))
    }

    #[test]
    fn exit_becomes_e_only_as_a_word() {
        assert_eq!(replace_word("I-44, EXIT 283 & US-69", "EXIT", "E"), "I-44, E 283 & US-69");
        assert_eq!(replace_word("EXIT,EXIT", "EXIT", "E"), "E,E");
        assert_eq!(replace_word("EXITEXIT", "EXIT", "E"), "EXITEXIT");
        assert_eq!(replace_word("NEXIT EXITS EXIT_1", "EXIT", "E"), "NEXIT EXITS EXIT_1");
        assert_eq!(replace_word("no match", "EXIT", "E"), "no match");
    }

    #[test]
    fn rows_are_cleaned_and_filtered() {
        let clean = read_rows(FUEL_CSV.as_bytes()).unwrap();

        assert_eq!(clean.dropped, 3);
        assert_eq!(clean.rows.len(), 4);
        assert_eq!(
            clean.rows[0],
            FuelRow {
                name: "WOODSHED OF BIG CABIN".into(),
                address: "I-44, E 283 & US-69".into(),
                retail_price: 3.00733333,
            }
        );
        assert_eq!(clean.rows[1].address, "I-94 E 143");
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = read_rows("Name,Address,Price\na,b,1\n".as_bytes()).unwrap_err();

        assert_eq!(err.code, 105);
        assert!(err.message.contains("truckstop name"));
    }

    #[test]
    fn stations_are_geocoded_and_stored_once() {
        let catalog = MemoryCatalog::default();

        let report = tokio_test::block_on(load_fuel_data(
            FUEL_CSV.as_bytes(),
            &geocoder(),
            &catalog,
            2,
        ))
        .unwrap();

        assert_eq!(
            report,
            IngestReport {
                rows: 7,
                dropped: 3,
                unresolved: 1,
                created: 2,
                existing: 1,
            }
        );

        let stations = tokio_test::block_on(catalog.list_stations()).unwrap();
        let names: Vec<&str> = stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["WOODSHED OF BIG CABIN", "KWIK TRIP #796"]);
        assert_eq!(stations[1].coordinates(), Coordinates::new(43.9, -90.5));
    }
}
