//! Serviceable delivery areas.
//!
//! A static set of normalized locality names with a deliberately permissive
//! containment check: a query matches a locality when either string contains
//! the other. "springfield" therefore matches "west springfield", and that
//! is intended, not a bug. Because containment can hit several localities,
//! `check` surfaces every match instead of guessing one.

use crate::error::StartupError;
use crate::text;

/// Result of a delivery-area check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryCheck {
    /// At least one locality matched; all containment matches, in area
    /// insertion order.
    Serviceable { matched: Vec<String> },
    NotServiceable,
}

/// Immutable set of serviceable locality names.
#[derive(Debug, Clone)]
pub struct DeliveryAreas {
    localities: Vec<String>,
}

impl DeliveryAreas {
    /// Build from a locality source, normalizing and dropping duplicates.
    /// Fatal when the source yields nothing usable.
    pub fn from_localities(
        localities: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, StartupError> {
        let mut seen = Vec::new();
        for raw in localities {
            let normalized = text::normalize(raw.as_ref());
            if !normalized.is_empty() && !seen.contains(&normalized) {
                seen.push(normalized);
            }
        }
        if seen.is_empty() {
            return Err(StartupError::EmptyDeliveryAreas);
        }
        tracing::info!(localities = seen.len(), "delivery areas built");
        Ok(Self { localities: seen })
    }

    /// Check whether a locality is serviceable under the containment policy.
    pub fn check(&self, locality: &str) -> DeliveryCheck {
        let query = text::normalize(locality);
        if query.is_empty() {
            return DeliveryCheck::NotServiceable;
        }

        let matched: Vec<String> = self
            .localities
            .iter()
            .filter(|known| known.contains(&query) || query.contains(known.as_str()))
            .cloned()
            .collect();

        if matched.is_empty() {
            DeliveryCheck::NotServiceable
        } else {
            DeliveryCheck::Serviceable { matched }
        }
    }

    /// Localities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.localities.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.localities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.localities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn areas(names: &[&str]) -> DeliveryAreas {
        DeliveryAreas::from_localities(names.iter().copied()).expect("non-empty")
    }

    #[test]
    fn test_exact_match() {
        let areas = areas(&["springfield", "shelbyville"]);
        assert_eq!(
            areas.check("Springfield"),
            DeliveryCheck::Serviceable {
                matched: vec!["springfield".into()]
            }
        );
    }

    #[test]
    fn test_containment_is_permissive_both_ways() {
        // query contained in a known locality
        let west_only = areas(&["west springfield"]);
        assert!(matches!(
            west_only.check("springfield"),
            DeliveryCheck::Serviceable { .. }
        ));

        // known locality contained in the query
        let plain = areas(&["springfield"]);
        assert!(matches!(
            plain.check("springfield north"),
            DeliveryCheck::Serviceable { .. }
        ));
    }

    #[test]
    fn test_all_containment_matches_are_surfaced() {
        let areas = areas(&["west springfield", "springfield", "east springfield"]);
        match areas.check("springfield") {
            DeliveryCheck::Serviceable { matched } => {
                assert_eq!(matched.len(), 3);
            }
            other => panic!("expected serviceable, got {other:?}"),
        }
    }

    #[test]
    fn test_miss() {
        let areas = areas(&["springfield"]);
        assert_eq!(areas.check("ogdenville"), DeliveryCheck::NotServiceable);
    }

    #[test]
    fn test_empty_query_is_not_serviceable() {
        let areas = areas(&["springfield"]);
        assert_eq!(areas.check("   "), DeliveryCheck::NotServiceable);
    }

    #[test]
    fn test_empty_source_is_fatal() {
        let result = DeliveryAreas::from_localities(Vec::<&str>::new());
        assert!(matches!(result, Err(StartupError::EmptyDeliveryAreas)));
    }

    #[test]
    fn test_duplicates_dropped() {
        let areas = areas(&["Springfield", " springfield "]);
        assert_eq!(areas.len(), 1);
    }
}
