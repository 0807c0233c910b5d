//! Derive normalized fields from the aggregate table.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::record::PlaceRecord;

/// A result record with derived identity and rating fields, in the final
/// column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    /// 1-based sequential id over the aggregate.
    pub num_id: u64,
    /// Place-identity token extracted from the link.
    pub prop_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub keyword: String,
    pub name: String,
    pub link: String,
    /// Rating count; 0 when the rating text carried none.
    pub num_rating: i64,
    /// Numeric rating; absent when the rating text was not parseable.
    pub rating: Option<f64>,
    pub price: String,
    pub category: String,
    pub address: String,
}

/// One exploded amenity, keyed by the owning record's prop_id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmenityRow {
    pub prop_id: Option<String>,
    pub amenity: String,
}

fn prop_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(ChIJ[^?]+)").expect("prop id pattern is valid"))
}

fn rating_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([\d.]+)(?:\((\d+)\))?\s*$").expect("rating pattern is valid")
    })
}

/// The place-identity token embedded in a result link, if any.
pub fn extract_prop_id(link: &str) -> Option<String> {
    prop_id_pattern()
        .captures(link)
        .map(|caps| caps[1].to_string())
}

/// Split rating text like `"4.5(23)"` into the numeric rating and the
/// rating count.
///
/// A bare number keeps its rating with a count of 0; text that is not a
/// rating at all yields `(None, 0)`.
pub fn split_rating(text: &str) -> (Option<f64>, i64) {
    let Some(caps) = rating_pattern().captures(text) else {
        return (None, 0);
    };
    let rating: Option<f64> = caps.get(1).and_then(|m| m.as_str().parse().ok());
    if rating.is_none() {
        return (None, 0);
    }
    let count = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    (rating, count)
}

/// Post-process the aggregate: sequential ids, link-derived identities,
/// the rating split, and the exploded amenity side-table.
///
/// Blank amenity strings are excluded from the side-table; the amenity
/// list itself does not survive into the processed columns.
pub fn process_records(records: &[PlaceRecord]) -> (Vec<ProcessedRecord>, Vec<AmenityRow>) {
    let mut processed = Vec::with_capacity(records.len());
    let mut amenities = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        let prop_id = extract_prop_id(&record.link);
        let (rating, num_rating) = split_rating(&record.rating);

        for amenity in &record.amenities {
            if !amenity.trim().is_empty() {
                amenities.push(AmenityRow {
                    prop_id: prop_id.clone(),
                    amenity: amenity.clone(),
                });
            }
        }

        processed.push(ProcessedRecord {
            num_id: idx as u64 + 1,
            prop_id,
            latitude: record.latitude,
            longitude: record.longitude,
            keyword: record.keyword.clone(),
            name: record.name.clone(),
            link: record.link.clone(),
            num_rating,
            rating,
            price: record.price.clone(),
            category: record.category.clone(),
            address: record.address.clone(),
        });
    }

    info!(
        "post-processed {} records into {} rows and {} amenity rows",
        records.len(),
        processed.len(),
        amenities.len()
    );
    (processed, amenities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(link: &str, rating: &str, amenities: &[&str]) -> PlaceRecord {
        PlaceRecord::new(-25.3, -57.6, "Hotel", "Gran Hotel", link)
            .with_rating(rating)
            .with_amenities(amenities.iter().copied())
    }

    #[test]
    fn rating_with_count_splits_into_both_fields() {
        assert_eq!(split_rating("4.5(23)"), (Some(4.5), 23));
        assert_eq!(split_rating(" 3.0(1) "), (Some(3.0), 1));
    }

    #[test]
    fn rating_without_count_defaults_to_zero() {
        assert_eq!(split_rating("4.5"), (Some(4.5), 0));
    }

    #[test]
    fn unparseable_rating_yields_none() {
        assert_eq!(split_rating(""), (None, 0));
        assert_eq!(split_rating("sin calificación"), (None, 0));
        assert_eq!(split_rating("..."), (None, 0));
    }

    #[test]
    fn prop_id_comes_from_the_link() {
        let link = "https://www.google.com/maps/place/x/data=ChIJabc123def?hl=es";
        assert_eq!(extract_prop_id(link), Some("ChIJabc123def".to_string()));
        assert_eq!(extract_prop_id("https://example.com/no-id"), None);
    }

    #[test]
    fn num_ids_are_one_based_and_sequential() {
        let records = vec![
            record("ChIJa?x", "4.5(2)", &[]),
            record("ChIJb?x", "4.0", &[]),
        ];
        let (processed, _) = process_records(&records);
        assert_eq!(processed[0].num_id, 1);
        assert_eq!(processed[1].num_id, 2);
        assert_eq!(processed[0].prop_id.as_deref(), Some("ChIJa"));
        assert_eq!(processed[1].rating, Some(4.0));
        assert_eq!(processed[1].num_rating, 0);
    }

    #[test]
    fn amenities_explode_and_blanks_are_excluded() {
        let records = vec![record("ChIJa?x", "4.5(2)", &["Wi-Fi", "  ", "", "Piscina"])];
        let (processed, amenities) = process_records(&records);

        assert_eq!(amenities.len(), 2);
        assert!(amenities
            .iter()
            .all(|row| row.prop_id.as_deref() == Some("ChIJa")));
        assert_eq!(amenities[0].amenity, "Wi-Fi");
        assert_eq!(amenities[1].amenity, "Piscina");
        assert_eq!(processed.len(), 1);
    }

    #[test]
    fn empty_aggregate_processes_to_empty_outputs() {
        let (processed, amenities) = process_records(&[]);
        assert!(processed.is_empty());
        assert!(amenities.is_empty());
    }
}
