//! Scraped place records.

use serde::{Deserialize, Serialize};

use crate::types::job::FailedJob;

/// A scraped place.
///
/// Raw candidates and accepted result records share this shape: a record
/// is a candidate while it is being radius-filtered, and a result record
/// once merged into the aggregate. The aggregate holds at most one record
/// per distinct `link` - the link is assumed to uniquely encode the place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Place latitude, as extracted from the result link.
    pub latitude: f64,
    /// Place longitude, as extracted from the result link.
    pub longitude: f64,
    /// The keyword of the job that surfaced this record.
    pub keyword: String,
    pub name: String,
    pub link: String,
    /// Raw rating text as extracted, e.g. `"4.5(23)"`.
    pub rating: String,
    pub price: String,
    pub category: String,
    pub address: String,
    /// Amenity labels; serialized as a JSON array string so the list fits
    /// a single tabular cell.
    #[serde(with = "amenity_cell")]
    pub amenities: Vec<String>,
}

impl PlaceRecord {
    /// Create a record with the identity-bearing fields; the descriptive
    /// fields start empty.
    pub fn new(
        latitude: f64,
        longitude: f64,
        keyword: impl Into<String>,
        name: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            keyword: keyword.into(),
            name: name.into(),
            link: link.into(),
            rating: String::new(),
            price: String::new(),
            category: String::new(),
            address: String::new(),
            amenities: Vec::new(),
        }
    }

    /// Set the raw rating text.
    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = rating.into();
        self
    }

    /// Set the price label.
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    /// Set the category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the address line.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the amenity list.
    pub fn with_amenities(mut self, amenities: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.amenities = amenities.into_iter().map(|a| a.into()).collect();
        self
    }
}

/// The return contract of one chunk execution: accepted records plus the
/// jobs that produced nothing usable.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutcome {
    pub records: Vec<PlaceRecord>,
    pub failed: Vec<FailedJob>,
}

impl ScrapeOutcome {
    /// Create an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every job in the chunk produced at least one accepted
    /// record.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Serialize the amenity list as a JSON array string in one cell, and
/// parse it back on read. An empty cell reads as an empty list.
mod amenity_cell {
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        let json = serde_json::to_string(value).map_err(S::Error::custom)?;
        serializer.serialize_str(&json)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_populates_descriptive_fields() {
        let record = PlaceRecord::new(-25.3, -57.6, "Hotel", "Gran Hotel", "https://maps/x")
            .with_rating("4.5(23)")
            .with_price("₲₲")
            .with_category("Hotel")
            .with_address("Av. Mcal. López 123")
            .with_amenities(["Wi-Fi", "Estacionamiento"]);

        assert_eq!(record.rating, "4.5(23)");
        assert_eq!(record.amenities.len(), 2);
    }

    #[test]
    fn amenities_round_trip_through_a_single_cell() {
        let record = PlaceRecord::new(-25.3, -57.6, "Hotel", "Gran Hotel", "https://maps/x")
            .with_amenities(["Wi-Fi", "Piscina"]);

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&record).unwrap();
        let bytes = writer.into_inner().unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let back: PlaceRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn empty_amenity_cell_reads_as_empty_list() {
        let csv_text = "latitude,longitude,keyword,name,link,rating,price,category,address,amenities\n\
                        -25.3,-57.6,Hotel,Gran Hotel,https://maps/x,,,,,\n";
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let record: PlaceRecord = reader.deserialize().next().unwrap().unwrap();
        assert!(record.amenities.is_empty());
    }
}
