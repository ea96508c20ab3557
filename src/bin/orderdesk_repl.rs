//! Interactive REPL for driving one ordering conversation.
//!
//! Thin driver around [`orderdesk::DialogueRouter`]: raw line in, rendered
//! reply out. Ships an offline dialogue backend (fixed capability reply,
//! no network) and a JSONL append-only sink so confirmed orders land in a
//! local file.
//!
//! Run with: cargo run --features cli --bin orderdesk_repl -- --menu menu.csv --cities us-cities.csv

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use orderdesk::{
    ingest, Catalog, ChatMessage, ConfirmedOrder, DeliveryAreas, DialogueBackend, DialogueRouter,
    OrderSink,
};

#[derive(Parser, Debug)]
#[command(name = "orderdesk_repl", about = "Restaurant ordering REPL")]
struct Args {
    /// Menu CSV (Item,Category,Price,Serving Size)
    #[arg(long, default_value = "menu.csv")]
    menu: PathBuf,

    /// Delivery city CSV (City)
    #[arg(long, default_value = "us-cities.csv")]
    cities: PathBuf,

    /// JSONL file confirmed orders are appended to
    #[arg(long, default_value = "confirmed-orders.jsonl")]
    orders: PathBuf,
}

/// Offline stand-in for the language-model collaborator: everything is
/// treated as acceptable and on-topic, and the reply is a fixed
/// capability statement.
struct OfflineBackend;

#[async_trait]
impl DialogueBackend for OfflineBackend {
    async fn classify_relevance(&self, _text: &str) -> anyhow::Result<bool> {
        Ok(true)
    }

    async fn moderate(&self, _text: &str) -> anyhow::Result<bool> {
        Ok(false)
    }

    async fn respond(&self, _history: &[ChatMessage]) -> anyhow::Result<String> {
        Ok("I can help with our menu, prices, orders, and delivery areas.".to_string())
    }
}

/// Append-only JSONL sink, one confirmed order per line.
struct JsonlSink {
    path: PathBuf,
}

#[async_trait]
impl OrderSink for JsonlSink {
    async fn append(&self, order: &ConfirmedOrder) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(order)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let catalog = Arc::new(Catalog::from_records(ingest::read_menu_csv(&args.menu)?)?);
    let areas = Arc::new(DeliveryAreas::from_localities(ingest::read_cities_csv(
        &args.cities,
    )?)?);

    let mut router = DialogueRouter::new(
        catalog,
        areas,
        Arc::new(OfflineBackend),
        Arc::new(JsonlSink { path: args.orders }),
    );

    println!(
        "{}",
        "Welcome! Ask for the menu, order items, or check delivery. Ctrl-D exits."
            .bold()
    );

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline(">> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line)?;
                let turn = router.handle(line).await;
                println!("{}\n", turn.reply.green());
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("input error: {err}").red());
                break;
            }
        }
    }

    Ok(())
}
