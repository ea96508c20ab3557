//! Deterministic rendering of turn events to user-facing markdown.
//!
//! Renders ONLY the fields carried by each event; never invents items,
//! totals, or localities. Keeping prose out of the ledger and router makes
//! their behavior testable without string assertions; these functions are
//! the single place wording lives.

use rust_decimal::Decimal;

use crate::delivery::DeliveryCheck;
use crate::error::OrderError;
use crate::ledger::OrderLine;
use crate::router::TurnEvent;
use crate::text::title_case;

/// Fixed apology used whenever an external collaborator call fails.
pub const APOLOGY: &str =
    "Sorry, I couldn't process that right now. Could you try again in a moment?";

/// Fixed reply to content that failed moderation.
pub const MODERATION_REPLY: &str = "Please keep the language respectful.";

/// Fixed redirect for utterances that are not about the restaurant.
pub const OFF_TOPIC_REPLY: &str =
    "I can help with our menu, prices, orders, and delivery areas. What would you like?";

/// Render a turn's events into one reply, in event order.
pub fn render_events(events: &[TurnEvent]) -> String {
    events
        .iter()
        .map(render_event)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_event(event: &TurnEvent) -> String {
    match event {
        TurnEvent::MenuShown { sections } => {
            let mut out = String::from("🍽️ **Our Menu**\n");
            for section in sections {
                out.push_str(&format!("\n### {}\n", title_case(&section.category)));
                for item in &section.items {
                    out.push_str(&format!(
                        "- **{}** - {} - {}\n",
                        title_case(&item.canonical_name),
                        item.serving_size,
                        money(item.price)
                    ));
                }
            }
            out.push_str("\nAsk about a category for more detail.");
            out
        }
        TurnEvent::CategoryShown { category, items } => {
            if items.is_empty() {
                return format!("We have nothing under {} right now.", title_case(category));
            }
            let mut out = format!("### {}\n", title_case(category));
            for item in items {
                out.push_str(&format!(
                    "- **{}** - {} - {}\n",
                    title_case(&item.canonical_name),
                    item.serving_size,
                    money(item.price)
                ));
            }
            out
        }
        TurnEvent::DeliveryChecked { locality, result } => match result {
            DeliveryCheck::Serviceable { matched } => {
                if matched.len() == 1 {
                    format!("✅ Yes, we deliver in {}.", title_case(&matched[0]))
                } else {
                    // several containment matches: name them all instead of
                    // guessing which one was meant
                    format!(
                        "✅ Yes, that matches several areas we deliver to: {}.",
                        join_names(matched)
                    )
                }
            }
            DeliveryCheck::NotServiceable => {
                format!("❌ Sorry, we don't deliver in {} yet.", title_case(locality))
            }
        },
        TurnEvent::DeliveryAreasListed { localities } => {
            let mut out = String::from("🚚 We currently deliver in:\n");
            for locality in localities {
                out.push_str(&format!("- {}\n", title_case(locality)));
            }
            out
        }
        TurnEvent::PriceQuoted {
            item,
            price,
            serving_size,
        } => format!(
            "**{}** is {} ({}).",
            title_case(item),
            money(*price),
            serving_size
        ),
        TurnEvent::PriceUnavailable { phrase, suggestions } => {
            if suggestions.is_empty() {
                format!("❌ I couldn't find '{phrase}' on the menu.")
            } else {
                format!(
                    "I couldn't find '{phrase}'. Did you mean {}?",
                    join_names(suggestions)
                )
            }
        }
        TurnEvent::LineAdded(change) => format!(
            "✅ {} x {} - {} (order total {}).",
            change.quantity,
            title_case(&change.item),
            money(change.line_total),
            money(change.order_total)
        ),
        TurnEvent::LineRemoved { item, order_total } => format!(
            "Removed {} from your order (order total {}).",
            title_case(item),
            money(*order_total)
        ),
        TurnEvent::AddFailed { phrase, error } => render_order_error(phrase, error),
        TurnEvent::OrderShown { lines, total } => render_order(lines, *total),
        TurnEvent::OrderEmpty => "You don't have an order in progress.".to_string(),
        TurnEvent::Confirmed(order) => format!(
            "✅ Order confirmed! {} item line(s), total {}. Thank you!",
            order.lines.len(),
            money(order.total)
        ),
        TurnEvent::NothingToConfirm => "There's nothing to confirm yet.".to_string(),
        TurnEvent::ConfirmFailed { .. } => format!(
            "⚠️ I couldn't save your order just now, so it is still open. {}",
            APOLOGY
        ),
        TurnEvent::Cancelled { line_count } => {
            format!("🗑️ Order cancelled ({line_count} line(s) discarded).")
        }
        TurnEvent::NothingToCancel => "There's no order to cancel.".to_string(),
        TurnEvent::Moderated => MODERATION_REPLY.to_string(),
        TurnEvent::OffTopic => OFF_TOPIC_REPLY.to_string(),
        TurnEvent::SmallTalk { reply } => reply.clone(),
        TurnEvent::CollaboratorDown => APOLOGY.to_string(),
    }
}

fn render_order(lines: &[OrderLine], total: Decimal) -> String {
    let mut out = String::from("### Your current order\n");
    for line in lines {
        out.push_str(&format!(
            "- **{} x {}** - {}\n",
            line.quantity,
            title_case(&line.item),
            money(line.line_total)
        ));
    }
    out.push_str(&format!("\n**Total:** {}", money(total)));
    out
}

fn render_order_error(phrase: &str, error: &OrderError) -> String {
    match error {
        OrderError::NotFound { .. } => {
            format!("❌ I couldn't find '{phrase}' on the menu.")
        }
        OrderError::Ambiguous { suggestions, .. } => format!(
            "I couldn't find '{phrase}'. Did you mean {}?",
            join_names(suggestions)
        ),
        OrderError::CapacityExceeded { quantity, limit } => format!(
            "We can take at most {limit} of one item per order ({quantity} requested)."
        ),
        OrderError::PolicyViolation { item, category } => format!(
            "Sorry, {} ({}) can't be ordered here.",
            title_case(item),
            category
        ),
        OrderError::Collaborator { .. } => APOLOGY.to_string(),
    }
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

fn join_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| title_case(n))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LineChange;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal")
    }

    #[test]
    fn test_line_added_mentions_quantity_and_totals() {
        let event = TurnEvent::LineAdded(LineChange {
            item: "pancakes".into(),
            quantity: 2,
            line_total: dec("10.00"),
            order_total: dec("13.00"),
        });
        let text = render_events(&[event]);
        assert!(text.contains("2 x Pancakes"));
        assert!(text.contains("$10.00"));
        assert!(text.contains("$13.00"));
    }

    #[test]
    fn test_multiple_events_join_in_order() {
        let ok = TurnEvent::LineAdded(LineChange {
            item: "pancakes".into(),
            quantity: 2,
            line_total: dec("10.00"),
            order_total: dec("10.00"),
        });
        let failed = TurnEvent::AddFailed {
            phrase: "coffee".into(),
            error: std::sync::Arc::new(OrderError::NotFound {
                phrase: "coffee".into(),
            }),
        };
        let text = render_events(&[ok, failed]);
        let added_at = text.find("Pancakes").expect("added line present");
        let failed_at = text.find("couldn't find 'coffee'").expect("failure present");
        assert!(added_at < failed_at);
    }

    #[test]
    fn test_ambiguous_lists_suggestions() {
        let event = TurnEvent::AddFailed {
            phrase: "chocolat".into(),
            error: std::sync::Arc::new(OrderError::Ambiguous {
                phrase: "chocolat".into(),
                suggestions: vec!["chocolate cake".into()],
            }),
        };
        let text = render_events(&[event]);
        assert!(text.contains("Did you mean Chocolate Cake?"));
    }

    #[test]
    fn test_delivery_multi_match_names_all_candidates() {
        let event = TurnEvent::DeliveryChecked {
            locality: "springfield".into(),
            result: DeliveryCheck::Serviceable {
                matched: vec!["west springfield".into(), "springfield".into()],
            },
        };
        let text = render_events(&[event]);
        assert!(text.contains("West Springfield"));
        assert!(text.contains("Springfield"));
    }

    #[test]
    fn test_money_is_two_decimal_places() {
        assert_eq!(money(dec("5")), "$5.00");
        assert_eq!(money(dec("12.5")), "$12.50");
    }
}
