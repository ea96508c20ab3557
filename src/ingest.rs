//! Reference flat-file loaders for the catalog and delivery-area source
//! collaborators.
//!
//! The core never calls this module: [`crate::catalog::Catalog::from_records`]
//! and [`crate::delivery::DeliveryAreas::from_localities`] are the only
//! validation points, and any source that produces records can feed them.
//! These readers exist so the REPL binary and harnesses can run against
//! plain CSV exports (`menu.csv`, `us-cities.csv`).

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::catalog::CatalogRecord;
use crate::error::StartupError;

#[derive(Debug, Deserialize)]
struct MenuRow {
    #[serde(rename = "Item")]
    item: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Price")]
    price: Decimal,
    #[serde(rename = "Serving Size")]
    serving_size: String,
}

#[derive(Debug, Deserialize)]
struct CityRow {
    #[serde(rename = "City")]
    city: String,
}

/// Read menu records from a CSV with `Item,Category,Price,Serving Size`
/// headers. Unreadable rows are fatal; the session must not start on a
/// silently truncated menu.
pub fn read_menu_csv(path: impl AsRef<Path>) -> Result<Vec<CatalogRecord>, StartupError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut records = Vec::new();
    for row in reader.deserialize::<MenuRow>() {
        let row = row?;
        records.push(CatalogRecord {
            name: row.item,
            category: row.category,
            price: row.price,
            serving_size: row.serving_size,
        });
    }
    tracing::debug!(rows = records.len(), "menu source read");
    Ok(records)
}

/// Read locality names from a CSV with a `City` header.
pub fn read_cities_csv(path: impl AsRef<Path>) -> Result<Vec<String>, StartupError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut cities = Vec::new();
    for row in reader.deserialize::<CityRow>() {
        cities.push(row?.city);
    }
    tracing::debug!(rows = cities.len(), "city source read");
    Ok(cities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_csv(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("orderdesk-test-{}.csv", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        path
    }

    #[test]
    fn test_read_menu_csv() {
        let path = temp_csv(
            "Item,Category,Price,Serving Size\n\
             Pancakes,Breakfast,5.00,1 plate\n\
             Fry,Sides,2.50,regular\n",
        );
        let records = read_menu_csv(&path).expect("readable");
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Pancakes");
        assert_eq!(records[1].price, "2.50".parse().unwrap());
    }

    #[test]
    fn test_read_cities_csv() {
        let path = temp_csv("City\nSpringfield\nShelbyville\n");
        let cities = read_cities_csv(&path).expect("readable");
        std::fs::remove_file(&path).ok();

        assert_eq!(cities, vec!["Springfield", "Shelbyville"]);
    }

    #[test]
    fn test_malformed_menu_is_an_error() {
        let path = temp_csv("Item,Category,Price,Serving Size\nPancakes,Breakfast,not-a-price,1 plate\n");
        let result = read_menu_csv(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(StartupError::Csv(_))));
    }
}
