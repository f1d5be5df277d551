use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FuelStation {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub retail_price: f64,
}

impl FuelStation {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        coordinates: Coordinates,
        retail_price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            latitude: coordinates.lat,
            longitude: coordinates.lng,
            retail_price,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}
