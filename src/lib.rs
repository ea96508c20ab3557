//! orderdesk - conversational ordering core for a restaurant assistant.
//!
//! Free-text utterances in, structured order state and rendered replies
//! out. The pipeline:
//!
//! ```text
//! User Input: "2 pancakes and 1 coffee"
//!     │
//!     ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │ Intent Extractor (ordered rule cascade)                  │
//! │  quantity+item, menu, delivery, price, order phrases     │
//! └──────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │ Dialogue Router (one per conversation)                   │
//! │  Item Resolver ──> Order Ledger ──> TurnEvents           │
//! │  Unclassified ──> external DialogueBackend               │
//! └──────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! render: structured events -> markdown reply
//! ```
//!
//! The catalog and delivery areas are built once and shared read-only;
//! each conversation exclusively owns its [`ledger::OrderLedger`].
//! Confirmation hands an immutable snapshot to the [`ledger::OrderSink`]
//! collaborator and clears the ledger only after the sink succeeds.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use orderdesk::{Catalog, CatalogRecord, DeliveryAreas, DialogueRouter};
//! # use orderdesk::{ChatMessage, ConfirmedOrder, DialogueBackend, OrderSink};
//! # struct Offline;
//! # #[async_trait::async_trait]
//! # impl DialogueBackend for Offline {
//! #     async fn classify_relevance(&self, _: &str) -> anyhow::Result<bool> { Ok(true) }
//! #     async fn moderate(&self, _: &str) -> anyhow::Result<bool> { Ok(false) }
//! #     async fn respond(&self, _: &[ChatMessage]) -> anyhow::Result<String> { Ok(String::new()) }
//! # }
//! # struct Null;
//! # #[async_trait::async_trait]
//! # impl OrderSink for Null {
//! #     async fn append(&self, _: &ConfirmedOrder) -> anyhow::Result<()> { Ok(()) }
//! # }
//!
//! # #[tokio::main] async fn main() -> anyhow::Result<()> {
//! let catalog = Arc::new(Catalog::from_records(vec![CatalogRecord {
//!     name: "Pancakes".into(),
//!     category: "breakfast".into(),
//!     price: "5.00".parse()?,
//!     serving_size: "1 plate".into(),
//! }])?);
//! let areas = Arc::new(DeliveryAreas::from_localities(["springfield"])?);
//!
//! let mut router = DialogueRouter::new(catalog, areas, Arc::new(Offline), Arc::new(Null));
//! let turn = router.handle("2 pancakes").await;
//! println!("{}", turn.reply);
//! # Ok(()) }
//! ```

pub mod catalog;
pub mod delivery;
pub mod error;
pub mod ingest;
pub mod intent;
pub mod ledger;
pub mod render;
pub mod resolver;
pub mod router;
pub mod text;

pub use catalog::{Catalog, CatalogItem, CatalogRecord, OrderPolicy, CATEGORY_ALLOW_LIST};
pub use delivery::{DeliveryAreas, DeliveryCheck};
pub use error::{OrderError, StartupError};
pub use intent::{extract, Intent};
pub use ledger::{
    CancelOutcome, ConfirmOutcome, ConfirmedOrder, LineChange, ModifyOutcome, OrderLedger,
    OrderLine, OrderSink, RemoveOutcome, MAX_LINE_QUANTITY,
};
pub use render::{render_events, APOLOGY, MODERATION_REPLY, OFF_TOPIC_REPLY};
pub use resolver::{resolve, Resolution};
pub use router::{ChatMessage, ChatRole, DialogueBackend, DialogueRouter, MenuSection, Turn, TurnEvent};
