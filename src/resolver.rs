//! Item resolution: free-text phrase -> catalog item.
//!
//! Staged matching, first stage to produce a result wins:
//!
//! 1. normalize the phrase (see [`crate::text::normalize`])
//! 2. singularize the final word when the singular exists in the catalog
//! 3. exact canonical-name match
//! 4. substring containment, first match in catalog iteration order
//! 5. 3-character prefix match, up to three suggestions ranked by
//!    Jaro-Winkler similarity
//!
//! Stages 1-4 auto-select; stage 5 only suggests: the caller must surface
//! suggestions to the user, never pick one silently. Pure function over the
//! supplied catalog.

use crate::catalog::{Catalog, CatalogItem};
use crate::text;

/// Maximum number of suggestions returned by the prefix stage.
const MAX_SUGGESTIONS: usize = 3;

/// Prefix length used by the suggestion stage; shorter phrases carry too
/// little signal and go straight to NotFound.
const SUGGESTION_PREFIX_LEN: usize = 3;

/// Outcome of resolving one item phrase.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    /// Unambiguous match, safe to act on.
    Match(&'a CatalogItem),
    /// Near-misses for the user to pick from; never auto-selected.
    Suggestions(Vec<String>),
    NotFound,
}

impl<'a> Resolution<'a> {
    pub fn as_match(&self) -> Option<&'a CatalogItem> {
        match self {
            Resolution::Match(item) => Some(*item),
            _ => None,
        }
    }
}

/// Resolve a user-supplied item phrase against the catalog.
pub fn resolve<'a>(phrase: &str, catalog: &'a Catalog) -> Resolution<'a> {
    let normalized = text::normalize(phrase);
    if normalized.is_empty() {
        return Resolution::NotFound;
    }

    // Matching forms: the phrase as-is, then its singular rewrites. The
    // as-is form is always tried first, so a canonical name that merely
    // looks plural keeps matching itself; a rewrite only wins when the
    // catalog actually stores the singular.
    let mut forms = vec![normalized.clone()];
    for candidate in text::singular_candidates(&normalized) {
        if !forms.contains(&candidate) {
            forms.push(candidate);
        }
    }

    // exact
    for form in &forms {
        if let Some(item) = catalog.get(form) {
            return Resolution::Match(item);
        }
    }

    // containment, catalog order; the first hit wins even when several
    // items would match
    for item in catalog.iter() {
        for form in &forms {
            if item.canonical_name.contains(form.as_str())
                || form.contains(&item.canonical_name)
            {
                tracing::debug!(
                    phrase = %normalized,
                    item = %item.canonical_name,
                    "resolved via containment"
                );
                return Resolution::Match(item);
            }
        }
    }

    // prefix suggestions
    if normalized.len() < SUGGESTION_PREFIX_LEN {
        return Resolution::NotFound;
    }
    let prefix = &normalized[..SUGGESTION_PREFIX_LEN];
    let mut suggestions: Vec<&CatalogItem> = catalog
        .iter()
        .filter(|item| item.canonical_name.starts_with(prefix))
        .take(MAX_SUGGESTIONS)
        .collect();

    if suggestions.is_empty() {
        return Resolution::NotFound;
    }

    // rank collected candidates for presentation; the candidate SET is
    // fixed by catalog order above
    suggestions.sort_by(|a, b| {
        let score_a = strsim::jaro_winkler(&normalized, &a.canonical_name);
        let score_b = strsim::jaro_winkler(&normalized, &b.canonical_name);
        score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
    });

    Resolution::Suggestions(
        suggestions
            .into_iter()
            .map(|item| item.canonical_name.clone())
            .collect(),
    )
}
