//! Intent extraction: raw utterance -> tagged intents.
//!
//! A deterministic, ordered rule cascade, not a probabilistic model. Rules
//! are evaluated in the fixed sequence of [`RULES`]; the first rule that
//! matches wins and later rules assume every earlier one already failed, so
//! the ordering is load-bearing. Several patterns overlap deliberately
//! ("2 pancakes" must read as an order even inside a longer sentence).
//!
//! The quantity+item rule may emit several intents from one utterance
//! ("2 pancakes and 1 coffee"); callers apply them sequentially. Every other
//! rule emits exactly one. The cascade never returns an empty list; the
//! final fallback tags the utterance Unclassified for the dialogue
//! collaborator.
//!
//! Keyword sets carry Spanish equivalents alongside the English ones;
//! accents are already folded away by normalization ("menú" arrives as
//! "menu").

use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::CATEGORY_ALLOW_LIST;
use crate::text;

/// The classified purpose of one user utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ShowMenu,
    ShowCategory(String),
    CheckDelivery(String),
    ListDeliveryAreas,
    PriceQuery(String),
    AddItem { quantity: u32, phrase: String },
    ShowOrder,
    CancelOrder,
    ConfirmOrder,
    Unclassified(String),
}

/// Preprocessed views of one utterance handed to each rule.
struct Utterance {
    /// Normalized text with ASCII punctuation intact (the quantity rule
    /// treats commas and periods as connectors).
    normalized: String,
    /// Normalized text with punctuation collapsed to spaces.
    clean: String,
    /// Alphanumeric tokens of `clean`.
    tokens: Vec<String>,
}

type Rule = fn(&Utterance) -> Option<Vec<Intent>>;

/// The cascade, in precedence order. First match wins.
const RULES: &[(&str, Rule)] = &[
    ("quantity_items", rule_quantity_items),
    ("show_menu", rule_show_menu),
    ("list_delivery_areas", rule_list_delivery_areas),
    ("check_delivery", rule_check_delivery),
    ("price_query", rule_price_query),
    ("order_phrases", rule_order_phrases),
    ("show_category", rule_show_category),
];

/// Extract intents from one utterance. Never returns an empty list.
pub fn extract(raw: &str) -> Vec<Intent> {
    let normalized = text::normalize(raw);
    let clean = normalized
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let tokens = clean.split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect();

    let utterance = Utterance {
        normalized,
        clean,
        tokens,
    };

    for (name, rule) in RULES.iter().copied() {
        if let Some(intents) = rule(&utterance) {
            tracing::debug!(rule = name, count = intents.len(), "intent classified");
            return intents;
        }
    }

    vec![Intent::Unclassified(raw.to_string())]
}

const MENU_TOKENS: &[&str] = &["menu", "carta"];
const CITY_TOKENS: &[&str] = &["cities", "city", "towns", "localities", "ciudades", "ciudad"];
const DELIVERY_TOKENS: &[&str] = &[
    "delivery",
    "deliveries",
    "deliver",
    "shipping",
    "ship",
    "entrega",
    "entregas",
    "envio",
    "envios",
    "reparto",
];
const PRICE_TOKENS: &[&str] = &["price", "prices", "cost", "costs", "precio", "precios", "cuesta"];

fn has_any(tokens: &[String], set: &[&str]) -> bool {
    tokens.iter().any(|t| set.contains(&t.as_str()))
}

fn segment_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+and\s+|\s+y\s+|[,.;]").expect("valid regex"))
}

fn qty_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s+([a-z][a-z ]*)").expect("valid regex"))
}

fn locality_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:in|en|to|at)\s+([a-z][a-z ]*)$").expect("valid regex"))
}

fn price_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:price|prices|cost|costs|precio|precios)\s+(?:of|for|de|del)\s+(.+)$")
            .expect("valid regex")
    })
}

/// `<integer> <item phrase>` occurrences separated by connectors ("and",
/// comma, period, end of string). One AddItem per occurrence; zero
/// quantities carry no order and are skipped.
fn rule_quantity_items(u: &Utterance) -> Option<Vec<Intent>> {
    let mut intents = Vec::new();
    for segment in segment_split_re().split(&u.normalized) {
        if let Some(caps) = qty_item_re().captures(segment) {
            let quantity: u32 = match caps[1].parse() {
                Ok(q) => q,
                Err(_) => continue,
            };
            if quantity == 0 {
                continue;
            }
            let phrase = caps[2].trim().to_string();
            if phrase.is_empty() {
                continue;
            }
            intents.push(Intent::AddItem { quantity, phrase });
        }
    }
    if intents.is_empty() {
        None
    } else {
        Some(intents)
    }
}

fn rule_show_menu(u: &Utterance) -> Option<Vec<Intent>> {
    has_any(&u.tokens, MENU_TOKENS).then(|| vec![Intent::ShowMenu])
}

/// A named category browses that category. Last specific rule in the
/// cascade: category tokens also appear inside item names ("veggie
/// burger"), so price and delivery questions must get first claim.
fn rule_show_category(u: &Utterance) -> Option<Vec<Intent>> {
    for token in &u.tokens {
        let plural = format!("{token}s");
        for category in CATEGORY_ALLOW_LIST {
            if token == category || plural == *category {
                return Some(vec![Intent::ShowCategory(category.to_string())]);
            }
        }
    }
    None
}

/// "cities"-type and "delivery"-type tokens together ask for the full list.
fn rule_list_delivery_areas(u: &Utterance) -> Option<Vec<Intent>> {
    (has_any(&u.tokens, CITY_TOKENS) && has_any(&u.tokens, DELIVERY_TOKENS))
        .then(|| vec![Intent::ListDeliveryAreas])
}

/// A delivery-type token alone: with an extractable locality after a
/// preposition it checks that locality, otherwise it lists the areas.
fn rule_check_delivery(u: &Utterance) -> Option<Vec<Intent>> {
    if !has_any(&u.tokens, DELIVERY_TOKENS) {
        return None;
    }
    match locality_re().captures(&u.clean) {
        Some(caps) => {
            let locality = caps[1].trim().to_string();
            if locality.is_empty() {
                Some(vec![Intent::ListDeliveryAreas])
            } else {
                Some(vec![Intent::CheckDelivery(locality)])
            }
        }
        None => Some(vec![Intent::ListDeliveryAreas]),
    }
}

fn rule_price_query(u: &Utterance) -> Option<Vec<Intent>> {
    if !has_any(&u.tokens, PRICE_TOKENS) {
        return None;
    }
    let caps = price_re().captures(&u.clean)?;
    let phrase = strip_leading_article(caps[1].trim());
    if phrase.is_empty() {
        return None;
    }
    Some(vec![Intent::PriceQuery(phrase.to_string())])
}

fn strip_leading_article(phrase: &str) -> &str {
    const ARTICLES: &[&str] = &["the", "a", "an", "el", "la", "los", "las", "un", "una"];
    for article in ARTICLES {
        if let Some(rest) = phrase.strip_prefix(article) {
            if let Some(rest) = rest.strip_prefix(' ') {
                return rest.trim();
            }
        }
    }
    phrase
}

fn rule_order_phrases(u: &Utterance) -> Option<Vec<Intent>> {
    const SHOW: &[&str] = &["show order", "show my order", "view order"];
    const CANCEL: &[&str] = &["cancel order", "cancel my order"];
    const CONFIRM: &[&str] = &["confirm order", "confirm my order"];

    if SHOW.iter().any(|p| u.clean.contains(p)) {
        return Some(vec![Intent::ShowOrder]);
    }
    if CANCEL.iter().any(|p| u.clean.contains(p)) {
        return Some(vec![Intent::CancelOrder]);
    }
    if CONFIRM.iter().any(|p| u.clean.contains(p)) {
        return Some(vec![Intent::ConfirmOrder]);
    }
    None
}
