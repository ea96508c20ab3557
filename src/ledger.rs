//! Per-conversation order state.
//!
//! The ledger maps canonical item names to quantities for one conversation;
//! it is exclusively owned by that conversation's handler and never shared.
//! Operations return structured outcomes (formatting lives in
//! [`crate::render`]) and the total is always recomputed from the lines,
//! never cached.
//!
//! Confirm hands an immutable [`ConfirmedOrder`] snapshot to the
//! persistence sink and clears the ledger only after the sink call
//! succeeds; a sink failure leaves every line intact.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Catalog, OrderPolicy};
use crate::error::OrderError;
use crate::resolver::{self, Resolution};
use crate::text;

/// Upper bound on a single line's quantity.
pub const MAX_LINE_QUANTITY: u32 = 100;

/// One priced order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Immutable snapshot of a ledger at the moment of confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedOrder {
    pub order_id: Uuid,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub confirmed_at: DateTime<Utc>,
}

/// Append-only persistence collaborator fed by `confirm`.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn append(&self, order: &ConfirmedOrder) -> anyhow::Result<()>;
}

/// Structured result of a successful add/modify.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChange {
    pub item: String,
    /// Resulting line quantity; zero means the line was removed.
    pub quantity: u32,
    pub line_total: Decimal,
    pub order_total: Decimal,
}

/// Outcome of `remove`.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    Removed { item: String, order_total: Decimal },
    /// Informational, not an error.
    NotInOrder { phrase: String },
}

/// Outcome of `modify`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModifyOutcome {
    Updated(LineChange),
    Removed { item: String, order_total: Decimal },
    NotInOrder { phrase: String },
}

/// Outcome of `confirm`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    Confirmed(ConfirmedOrder),
    /// Empty ledger; the sink was not called. Repeat calls stay no-ops.
    NothingToConfirm,
}

/// Outcome of `cancel`.
#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    Cancelled { line_count: usize },
    NothingToCancel,
}

/// Mutable per-conversation order ledger.
///
/// Lines keep insertion order for deterministic display. Every key is a
/// canonical name of an item in the catalog the ledger was mutated with.
#[derive(Debug, Default)]
pub struct OrderLedger {
    lines: Vec<(String, u32)>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Quantity currently on a line, zero when absent.
    pub fn quantity_of(&self, canonical_name: &str) -> u32 {
        self.lines
            .iter()
            .find(|(name, _)| name == canonical_name)
            .map(|&(_, q)| q)
            .unwrap_or(0)
    }

    /// Priced lines in insertion order.
    pub fn lines(&self, catalog: &Catalog) -> Vec<OrderLine> {
        self.lines
            .iter()
            .filter_map(|(name, quantity)| {
                catalog.get(name).map(|item| OrderLine {
                    item: name.clone(),
                    quantity: *quantity,
                    unit_price: item.price,
                    line_total: item.price * Decimal::from(*quantity),
                })
            })
            .collect()
    }

    /// Recomputed order total.
    pub fn total(&self, catalog: &Catalog) -> Decimal {
        self.lines
            .iter()
            .filter_map(|(name, quantity)| {
                catalog.get(name).map(|item| item.price * Decimal::from(*quantity))
            })
            .sum()
    }

    /// Resolve and add an item. Increments an existing line or inserts a
    /// new one; the capacity cap applies to the resulting line quantity, so
    /// stacked adds cannot exceed it. A zero quantity removes the line
    /// rather than storing a zero line.
    pub fn add(
        &mut self,
        catalog: &Catalog,
        policy: &OrderPolicy,
        item_phrase: &str,
        quantity: u32,
    ) -> Result<LineChange, OrderError> {
        if quantity > MAX_LINE_QUANTITY {
            return Err(OrderError::CapacityExceeded {
                quantity,
                limit: MAX_LINE_QUANTITY,
            });
        }

        let item = match resolver::resolve(item_phrase, catalog) {
            Resolution::Match(item) => item,
            Resolution::Suggestions(suggestions) => {
                return Err(OrderError::Ambiguous {
                    phrase: item_phrase.to_string(),
                    suggestions,
                })
            }
            Resolution::NotFound => {
                return Err(OrderError::NotFound {
                    phrase: item_phrase.to_string(),
                })
            }
        };

        if !policy.permits(&item.category) {
            return Err(OrderError::PolicyViolation {
                item: item.canonical_name.clone(),
                category: item.category.clone(),
            });
        }

        let name = item.canonical_name.clone();
        if quantity == 0 {
            // zero removes the line rather than storing a zero line
            self.lines.retain(|(existing, _)| existing != &name);
            return Ok(LineChange {
                item: name,
                quantity: 0,
                line_total: Decimal::ZERO,
                order_total: self.total(catalog),
            });
        }

        let new_quantity = match self.lines.iter_mut().find(|(existing, _)| existing == &name) {
            Some((_, existing_quantity)) => {
                let combined = existing_quantity.saturating_add(quantity);
                if combined > MAX_LINE_QUANTITY {
                    return Err(OrderError::CapacityExceeded {
                        quantity: combined,
                        limit: MAX_LINE_QUANTITY,
                    });
                }
                *existing_quantity = combined;
                combined
            }
            None => {
                self.lines.push((name.clone(), quantity));
                quantity
            }
        };

        let line_total = item.price * Decimal::from(new_quantity);
        let order_total = self.total(catalog);
        tracing::debug!(item = %name, quantity = new_quantity, %order_total, "order line added");

        Ok(LineChange {
            item: name,
            quantity: new_quantity,
            line_total,
            order_total,
        })
    }

    /// Remove a line. Matches against current ledger keys only, a
    /// narrower, already-ordered-item lookup, not full catalog resolution.
    pub fn remove(&mut self, catalog: &Catalog, item_phrase: &str) -> RemoveOutcome {
        match self.match_key(item_phrase) {
            Some(name) => {
                self.lines.retain(|(existing, _)| existing != &name);
                let order_total = self.total(catalog);
                tracing::debug!(item = %name, %order_total, "order line removed");
                RemoveOutcome::Removed {
                    item: name,
                    order_total,
                }
            }
            None => RemoveOutcome::NotInOrder {
                phrase: item_phrase.to_string(),
            },
        }
    }

    /// Replace a line's quantity; zero deletes the line (equivalent to
    /// `remove`, not an error).
    pub fn modify(
        &mut self,
        catalog: &Catalog,
        item_phrase: &str,
        new_quantity: u32,
    ) -> Result<ModifyOutcome, OrderError> {
        if new_quantity > MAX_LINE_QUANTITY {
            return Err(OrderError::CapacityExceeded {
                quantity: new_quantity,
                limit: MAX_LINE_QUANTITY,
            });
        }

        let Some(name) = self.match_key(item_phrase) else {
            return Ok(ModifyOutcome::NotInOrder {
                phrase: item_phrase.to_string(),
            });
        };

        if new_quantity == 0 {
            self.lines.retain(|(existing, _)| existing != &name);
            let order_total = self.total(catalog);
            tracing::debug!(item = %name, "order line removed via zero modify");
            return Ok(ModifyOutcome::Removed {
                item: name,
                order_total,
            });
        }

        for (existing, quantity) in &mut self.lines {
            if *existing == name {
                *quantity = new_quantity;
                break;
            }
        }

        let line_total = catalog
            .get(&name)
            .map(|item| item.price * Decimal::from(new_quantity))
            .unwrap_or(Decimal::ZERO);
        let order_total = self.total(catalog);
        tracing::debug!(item = %name, quantity = new_quantity, "order line modified");

        Ok(ModifyOutcome::Updated(LineChange {
            item: name,
            quantity: new_quantity,
            line_total,
            order_total,
        }))
    }

    /// Confirm the order: snapshot, persist, then clear. The ledger is
    /// cleared only after the sink call succeeds; on failure every line
    /// stays intact and the error is surfaced upstream. Confirming an
    /// empty ledger is an informational no-op and never calls the sink.
    pub async fn confirm(
        &mut self,
        catalog: &Catalog,
        sink: &dyn OrderSink,
    ) -> Result<ConfirmOutcome, OrderError> {
        if self.lines.is_empty() {
            return Ok(ConfirmOutcome::NothingToConfirm);
        }

        let snapshot = ConfirmedOrder {
            order_id: Uuid::new_v4(),
            lines: self.lines(catalog),
            total: self.total(catalog),
            confirmed_at: Utc::now(),
        };

        sink.append(&snapshot)
            .await
            .map_err(|e| OrderError::Collaborator {
                collaborator: "persistence sink",
                message: e.to_string(),
            })?;

        self.lines.clear();
        tracing::info!(order_id = %snapshot.order_id, total = %snapshot.total, "order confirmed");
        Ok(ConfirmOutcome::Confirmed(snapshot))
    }

    /// Cancel the order: clear without persisting. Informational no-op on
    /// an empty ledger.
    pub fn cancel(&mut self) -> CancelOutcome {
        if self.lines.is_empty() {
            return CancelOutcome::NothingToCancel;
        }
        let line_count = self.lines.len();
        self.lines.clear();
        tracing::info!(line_count, "order cancelled");
        CancelOutcome::Cancelled { line_count }
    }

    /// Ledger-key lookup for remove/modify: normalized exact match, then a
    /// recognized singular of the phrase, then containment over keys; first
    /// key in insertion order wins.
    fn match_key(&self, item_phrase: &str) -> Option<String> {
        let normalized = text::normalize(item_phrase);
        if normalized.is_empty() {
            return None;
        }

        let mut forms = vec![normalized.clone()];
        for candidate in text::singular_candidates(&normalized) {
            if !forms.contains(&candidate) {
                forms.push(candidate);
            }
        }

        for form in &forms {
            if let Some((name, _)) = self.lines.iter().find(|(name, _)| name == form) {
                return Some(name.clone());
            }
        }

        for (name, _) in &self.lines {
            for form in &forms {
                if name.contains(form.as_str()) || form.contains(name.as_str()) {
                    return Some(name.clone());
                }
            }
        }

        None
    }
}
