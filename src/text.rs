//! Text normalization shared by the resolver, intent extractor, and
//! delivery locator.
//!
//! Canonical form: NFKD-folded, non-ASCII stripped, lowercased, whitespace
//! collapsed. Folding before stripping means accented letters reduce to
//! their ASCII base ("menú" -> "menu") instead of disappearing.

use unicode_normalization::UnicodeNormalization;

/// Normalize free text to the catalog's canonical form.
pub fn normalize(raw: &str) -> String {
    let folded: String = raw
        .nfkd()
        .filter(|c| c.is_ascii())
        .collect::<String>()
        .to_ascii_lowercase();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Singular candidates for the final word of a normalized phrase, most
/// specific suffix rule first. Returns an empty list when no rule applies.
///
/// The caller decides whether a candidate is "recognized" by checking it
/// against the catalog; a phrase that merely looks plural is never rewritten
/// unless its singular actually exists there.
pub fn singular_candidates(phrase: &str) -> Vec<String> {
    let Some((head, last)) = split_last_word(phrase) else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    let mut push = |singular_last: String| {
        if head.is_empty() {
            candidates.push(singular_last);
        } else {
            candidates.push(format!("{head} {singular_last}"));
        }
    };

    if let Some(stem) = last.strip_suffix("ies") {
        if !stem.is_empty() {
            push(format!("{stem}y"));
        }
    }
    if let Some(stem) = last.strip_suffix("oes") {
        if !stem.is_empty() {
            push(format!("{stem}o"));
        }
    }
    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if let Some(stem) = last.strip_suffix(suffix) {
            let kept = &suffix[..suffix.len() - 2];
            if !stem.is_empty() {
                push(format!("{stem}{kept}"));
            }
        }
    }
    if let Some(stem) = last.strip_suffix('s') {
        if !stem.is_empty() && !stem.ends_with('s') {
            push(stem.to_string());
        }
    }

    candidates
}

fn split_last_word(phrase: &str) -> Option<(&str, &str)> {
    let trimmed = phrase.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.rsplit_once(' ') {
        Some((head, last)) => Some((head, last)),
        None => Some(("", trimmed)),
    }
}

/// Title-case a canonical name for display ("veggie burger" -> "Veggie Burger").
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_accents_and_case() {
        assert_eq!(normalize("  Menú  "), "menu");
        assert_eq!(normalize("CAFÉ con   leche"), "cafe con leche");
    }

    #[test]
    fn test_normalize_strips_non_ascii() {
        assert_eq!(normalize("pancakes 🥞"), "pancakes");
        assert_eq!(normalize("日本語"), "");
    }

    #[test]
    fn test_singular_candidates_suffix_rules() {
        assert!(singular_candidates("fries").contains(&"fry".to_string()));
        assert!(singular_candidates("potatoes").contains(&"potato".to_string()));
        assert!(singular_candidates("sandwiches").contains(&"sandwich".to_string()));
        assert!(singular_candidates("pancakes").contains(&"pancake".to_string()));
    }

    #[test]
    fn test_singular_candidates_apply_to_last_word_only() {
        let candidates = singular_candidates("french fries");
        assert!(candidates.contains(&"french fry".to_string()));
        assert!(!candidates.iter().any(|c| c.starts_with("frenche")));
    }

    #[test]
    fn test_singular_candidates_leave_non_plurals_alone() {
        assert!(singular_candidates("coffee").is_empty());
        // trailing double-s is not treated as a plural
        assert!(singular_candidates("swiss").is_empty());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("veggie burger"), "Veggie Burger");
    }
}
