//! Dialogue router: one conversation's orchestrator.
//!
//! Tries local intent classification first and dispatches menu / delivery /
//! price / order intents against the shared read-only catalog and the
//! conversation's own ledger. Only an Unclassified utterance reaches the
//! external dialogue collaborator, and only after moderation and relevance
//! gating. Collaborator failures substitute a fixed apology and never
//! mutate ledger state.
//!
//! The router produces structured [`TurnEvent`]s and delegates prose to
//! [`crate::render`]; callers get both the events and the rendered reply.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogItem, OrderPolicy};
use crate::delivery::{DeliveryAreas, DeliveryCheck};
use crate::error::OrderError;
use crate::intent::{self, Intent};
use crate::ledger::{
    CancelOutcome, ConfirmOutcome, ConfirmedOrder, LineChange, OrderLedger, OrderLine, OrderSink,
};
use crate::render;
use crate::resolver::{self, Resolution};

/// Speaker of one transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One transcript entry, passed to the dialogue collaborator's `respond`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// External dialogue collaborator: relevance gate, moderation, free-form
/// response. All calls are fallible; on failure the router substitutes the
/// fixed apology and leaves the ledger untouched.
#[async_trait]
pub trait DialogueBackend: Send + Sync {
    /// Whether the utterance is about the restaurant at all.
    async fn classify_relevance(&self, text: &str) -> anyhow::Result<bool>;

    /// Returns true when the text is inappropriate and must not be
    /// answered in substance.
    async fn moderate(&self, text: &str) -> anyhow::Result<bool>;

    /// Free-form reply over the conversation so far.
    async fn respond(&self, history: &[ChatMessage]) -> anyhow::Result<String>;
}

/// One menu section for display events.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSection {
    pub category: String,
    pub items: Vec<CatalogItem>,
}

/// Structured outcome of dispatching one intent. Rendering uses only the
/// fields carried here.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    MenuShown { sections: Vec<MenuSection> },
    CategoryShown { category: String, items: Vec<CatalogItem> },
    DeliveryChecked { locality: String, result: DeliveryCheck },
    DeliveryAreasListed { localities: Vec<String> },
    PriceQuoted { item: String, price: Decimal, serving_size: String },
    PriceUnavailable { phrase: String, suggestions: Vec<String> },
    LineAdded(LineChange),
    LineRemoved { item: String, order_total: Decimal },
    AddFailed { phrase: String, error: Arc<OrderError> },
    OrderShown { lines: Vec<OrderLine>, total: Decimal },
    OrderEmpty,
    Confirmed(ConfirmedOrder),
    NothingToConfirm,
    ConfirmFailed { error: Arc<OrderError> },
    Cancelled { line_count: usize },
    NothingToCancel,
    Moderated,
    OffTopic,
    SmallTalk { reply: String },
    CollaboratorDown,
}

/// Everything produced for one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub events: Vec<TurnEvent>,
    pub reply: String,
}

/// Per-conversation router. Owns the conversation's ledger and transcript;
/// shares the catalog and delivery areas read-only.
pub struct DialogueRouter {
    catalog: Arc<Catalog>,
    delivery: Arc<DeliveryAreas>,
    policy: OrderPolicy,
    ledger: OrderLedger,
    history: Vec<ChatMessage>,
    dialogue: Arc<dyn DialogueBackend>,
    sink: Arc<dyn OrderSink>,
}

impl DialogueRouter {
    pub fn new(
        catalog: Arc<Catalog>,
        delivery: Arc<DeliveryAreas>,
        dialogue: Arc<dyn DialogueBackend>,
        sink: Arc<dyn OrderSink>,
    ) -> Self {
        Self::with_policy(catalog, delivery, dialogue, sink, OrderPolicy::default())
    }

    pub fn with_policy(
        catalog: Arc<Catalog>,
        delivery: Arc<DeliveryAreas>,
        dialogue: Arc<dyn DialogueBackend>,
        sink: Arc<dyn OrderSink>,
        policy: OrderPolicy,
    ) -> Self {
        Self {
            catalog,
            delivery,
            policy,
            ledger: OrderLedger::new(),
            history: Vec::new(),
            dialogue,
            sink,
        }
    }

    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Process one utterance to completion: classify, dispatch, render.
    /// Partial success is preserved: in a multi-item utterance, failed
    /// additions become failure events alongside the successful ones.
    pub async fn handle(&mut self, text: &str) -> Turn {
        self.history.push(ChatMessage {
            role: ChatRole::User,
            content: text.to_string(),
        });

        let mut events = Vec::new();
        for intent in intent::extract(text) {
            let event = self.dispatch(intent).await;
            events.push(event);
        }

        let reply = render::render_events(&events);
        self.history.push(ChatMessage {
            role: ChatRole::Assistant,
            content: reply.clone(),
        });

        Turn { events, reply }
    }

    async fn dispatch(&mut self, intent: Intent) -> TurnEvent {
        match intent {
            Intent::ShowMenu => TurnEvent::MenuShown {
                sections: self.menu_sections(),
            },
            Intent::ShowCategory(category) => TurnEvent::CategoryShown {
                items: self.catalog.items_in(&category).cloned().collect(),
                category,
            },
            Intent::CheckDelivery(locality) => TurnEvent::DeliveryChecked {
                result: self.delivery.check(&locality),
                locality,
            },
            Intent::ListDeliveryAreas => TurnEvent::DeliveryAreasListed {
                localities: self.delivery.iter().map(str::to_string).collect(),
            },
            Intent::PriceQuery(phrase) => self.price_query(&phrase),
            Intent::AddItem { quantity, phrase } => {
                match self.ledger.add(&self.catalog, &self.policy, &phrase, quantity) {
                    Ok(change) if change.quantity == 0 => TurnEvent::LineRemoved {
                        item: change.item,
                        order_total: change.order_total,
                    },
                    Ok(change) => TurnEvent::LineAdded(change),
                    Err(error) => TurnEvent::AddFailed {
                        phrase,
                        error: Arc::new(error),
                    },
                }
            }
            Intent::ShowOrder => {
                if self.ledger.is_empty() {
                    TurnEvent::OrderEmpty
                } else {
                    TurnEvent::OrderShown {
                        lines: self.ledger.lines(&self.catalog),
                        total: self.ledger.total(&self.catalog),
                    }
                }
            }
            Intent::ConfirmOrder => {
                match self.ledger.confirm(&self.catalog, self.sink.as_ref()).await {
                    Ok(ConfirmOutcome::Confirmed(order)) => TurnEvent::Confirmed(order),
                    Ok(ConfirmOutcome::NothingToConfirm) => TurnEvent::NothingToConfirm,
                    Err(error) => {
                        tracing::warn!(%error, "confirm failed; ledger preserved");
                        TurnEvent::ConfirmFailed {
                            error: Arc::new(error),
                        }
                    }
                }
            }
            Intent::CancelOrder => match self.ledger.cancel() {
                CancelOutcome::Cancelled { line_count } => TurnEvent::Cancelled { line_count },
                CancelOutcome::NothingToCancel => TurnEvent::NothingToCancel,
            },
            Intent::Unclassified(raw) => self.defer(&raw).await,
        }
    }

    fn menu_sections(&self) -> Vec<MenuSection> {
        self.catalog
            .categories()
            .into_iter()
            .map(|category| MenuSection {
                category: category.to_string(),
                items: self.catalog.items_in(category).cloned().collect(),
            })
            .collect()
    }

    fn price_query(&self, phrase: &str) -> TurnEvent {
        match resolver::resolve(phrase, &self.catalog) {
            Resolution::Match(item) => TurnEvent::PriceQuoted {
                item: item.canonical_name.clone(),
                price: item.price,
                serving_size: item.serving_size.clone(),
            },
            Resolution::Suggestions(suggestions) => TurnEvent::PriceUnavailable {
                phrase: phrase.to_string(),
                suggestions,
            },
            Resolution::NotFound => TurnEvent::PriceUnavailable {
                phrase: phrase.to_string(),
                suggestions: Vec::new(),
            },
        }
    }

    /// Unclassified utterances: moderation gate, relevance gate, then the
    /// free-form collaborator. No path through here touches the ledger.
    async fn defer(&self, raw: &str) -> TurnEvent {
        let flagged = match self.dialogue.moderate(raw).await {
            Ok(flagged) => flagged,
            Err(error) => {
                tracing::warn!(%error, "moderation call failed");
                return TurnEvent::CollaboratorDown;
            }
        };
        if flagged {
            return TurnEvent::Moderated;
        }

        let relevant = match self.dialogue.classify_relevance(raw).await {
            Ok(relevant) => relevant,
            Err(error) => {
                tracing::warn!(%error, "relevance call failed");
                return TurnEvent::CollaboratorDown;
            }
        };
        if !relevant {
            return TurnEvent::OffTopic;
        }

        match self.dialogue.respond(&self.history).await {
            Ok(reply) => TurnEvent::SmallTalk { reply },
            Err(error) => {
                tracing::warn!(%error, "dialogue call failed");
                TurnEvent::CollaboratorDown
            }
        }
    }
}
