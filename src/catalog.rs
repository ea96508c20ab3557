//! Menu catalog: the immutable registry of orderable items.
//!
//! Built once from source records, validated at construction, read-only
//! afterwards. Iteration order is insertion order; the resolver's
//! containment stage picks the first match in catalog order, so ordering
//! must stay deterministic.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StartupError;
use crate::text;

/// Fixed category allow-list. A record with a category outside this list is
/// rejected at construction.
pub const CATEGORY_ALLOW_LIST: &[&str] = &[
    "breakfast",
    "mains",
    "burgers",
    "sides",
    "salads",
    "beverages",
    "desserts",
];

/// One raw record from a catalog source collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub serving_size: String,
}

/// One validated, immutable menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Lowercase, trimmed, ASCII-normalized; unique within the catalog.
    pub canonical_name: String,
    pub category: String,
    pub price: Decimal,
    pub serving_size: String,
}

/// Immutable item registry keyed by canonical name.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from source records, normalizing names and
    /// validating every field. Fatal on empty input, duplicate names,
    /// negative prices, or categories outside the allow-list.
    pub fn from_records(
        records: impl IntoIterator<Item = CatalogRecord>,
    ) -> Result<Self, StartupError> {
        let mut items = Vec::new();
        let mut index = HashMap::new();

        for record in records {
            let canonical_name = text::normalize(&record.name);
            if canonical_name.is_empty() {
                return Err(StartupError::InvalidRecord {
                    name: record.name,
                    reason: "name is empty after normalization".into(),
                });
            }
            if record.price.is_sign_negative() {
                return Err(StartupError::InvalidRecord {
                    name: canonical_name,
                    reason: format!("negative price {}", record.price),
                });
            }

            let category = text::normalize(&record.category);
            if !CATEGORY_ALLOW_LIST.contains(&category.as_str()) {
                return Err(StartupError::UnknownCategory {
                    name: canonical_name,
                    category,
                });
            }

            if index.contains_key(&canonical_name) {
                return Err(StartupError::DuplicateItem {
                    name: canonical_name,
                });
            }

            index.insert(canonical_name.clone(), items.len());
            items.push(CatalogItem {
                canonical_name,
                category,
                price: record.price,
                serving_size: record.serving_size.trim().to_string(),
            });
        }

        if items.is_empty() {
            return Err(StartupError::EmptyCatalog);
        }

        tracing::info!(items = items.len(), "catalog built");
        Ok(Self { items, index })
    }

    /// Look up an item by its exact canonical name.
    pub fn get(&self, canonical_name: &str) -> Option<&CatalogItem> {
        self.index.get(canonical_name).map(|&i| &self.items[i])
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Distinct categories in first-appearance order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.items
            .iter()
            .filter(|item| seen.insert(item.category.as_str()))
            .map(|item| item.category.as_str())
            .collect()
    }

    /// Items belonging to one category, in insertion order.
    pub fn items_in<'a>(&'a self, category: &str) -> impl Iterator<Item = &'a CatalogItem> + 'a {
        let category = category.to_string();
        self.items.iter().filter(move |i| i.category == category)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Permitted-category policy consulted by order mutation.
///
/// Construction already rejects unknown categories, so this is the
/// deployment-level narrowing knob: a venue that cannot sell a category
/// removes it here and `add` reports a policy violation instead of
/// mutating the ledger.
#[derive(Debug, Clone)]
pub struct OrderPolicy {
    permitted: BTreeSet<String>,
}

impl OrderPolicy {
    /// Permit exactly the given categories.
    pub fn permitting(categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            permitted: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn permits(&self, category: &str) -> bool {
        self.permitted.contains(category)
    }
}

impl Default for OrderPolicy {
    /// Every allow-listed category is orderable.
    fn default() -> Self {
        Self::permitting(CATEGORY_ALLOW_LIST.iter().copied())
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;
    use rust_decimal::Decimal;

    /// Small menu used across the unit tests.
    pub fn sample_catalog() -> Catalog {
        let records = vec![
            record("Pancakes", "breakfast", "5.00", "1 plate"),
            record("Fry", "sides", "2.50", "regular"),
            record("Veggie Burger", "burgers", "6.75", "1 piece"),
            record("Chicken Burger", "burgers", "7.25", "1 piece"),
            record("Orange Juice", "beverages", "3.00", "12 oz"),
            record("Chocolate Cake", "desserts", "4.50", "1 slice"),
        ];
        Catalog::from_records(records).expect("sample catalog is valid")
    }

    pub fn record(name: &str, category: &str, price: &str, serving: &str) -> CatalogRecord {
        CatalogRecord {
            name: name.into(),
            category: category.into(),
            price: price.parse::<Decimal>().expect("valid decimal"),
            serving_size: serving.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::{record, sample_catalog};
    use super::*;

    #[test]
    fn test_names_are_normalized_and_indexed() {
        let catalog = sample_catalog();
        let item = catalog.get("veggie burger").expect("present");
        assert_eq!(item.category, "burgers");
        assert_eq!(item.price, "6.75".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let catalog = sample_catalog();
        let names: Vec<_> = catalog.iter().map(|i| i.canonical_name.as_str()).collect();
        assert_eq!(names[0], "pancakes");
        assert_eq!(names[1], "fry");
        assert_eq!(names[2], "veggie burger");
    }

    #[test]
    fn test_empty_source_is_fatal() {
        let result = Catalog::from_records(Vec::new());
        assert!(matches!(result, Err(StartupError::EmptyCatalog)));
    }

    #[test]
    fn test_duplicate_name_is_fatal() {
        let records = vec![
            record("Pancakes", "breakfast", "5.00", "1 plate"),
            record("  PANCAKES ", "breakfast", "5.00", "1 plate"),
        ];
        assert!(matches!(
            Catalog::from_records(records),
            Err(StartupError::DuplicateItem { .. })
        ));
    }

    #[test]
    fn test_unknown_category_is_fatal() {
        let records = vec![record("Mystery Dish", "cryptids", "9.99", "1 bowl")];
        assert!(matches!(
            Catalog::from_records(records),
            Err(StartupError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_negative_price_is_fatal() {
        let records = vec![record("Pancakes", "breakfast", "-1.00", "1 plate")];
        assert!(matches!(
            Catalog::from_records(records),
            Err(StartupError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_default_policy_permits_all_categories() {
        let policy = OrderPolicy::default();
        for category in CATEGORY_ALLOW_LIST {
            assert!(policy.permits(category));
        }
    }

    #[test]
    fn test_narrowed_policy() {
        let policy = OrderPolicy::permitting(["breakfast"]);
        assert!(policy.permits("breakfast"));
        assert!(!policy.permits("desserts"));
    }
}
