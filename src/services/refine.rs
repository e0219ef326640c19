use crate::domain::{Deal, Query, SortKey};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Derives the filtered view from the full cache. The cache itself is never
/// touched; the result is a fresh, ordered copy.
pub fn refine(cache: &[Deal], query: &Query) -> Vec<Deal> {
    let term = query.term.to_lowercase();

    let mut results: Vec<Deal> = cache
        .iter()
        .filter(|deal| matches_term(deal, &term))
        .cloned()
        .collect();

    sort_deals(&mut results, query.sort);
    results
}

/// `term` must already be lower-cased. The empty term matches everything.
pub fn matches_term(deal: &Deal, term: &str) -> bool {
    term.is_empty() || deal.search_title().to_lowercase().contains(term)
}

/// Stable in-place ordering by a single key.
pub fn sort_deals(deals: &mut [Deal], key: SortKey) {
    match key {
        SortKey::Rating => deals.sort_by(|a, b| b.score().total_cmp(&a.score())),
        SortKey::Recent => deals.sort_by(|a, b| b.released_at().total_cmp(&a.released_at())),
        SortKey::Name => deals.sort_by(|a, b| compare_titles(a.search_title(), b.search_title())),
        SortKey::None => {}
    }
}

/// Alphabetical comparison that ignores case and accents first, falling back
/// to the raw strings so the order stays total.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
