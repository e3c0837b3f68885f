//! Degraded text matching for stores without a dedicated search index.
//!
//! Query terms are matched against product tokens by exact token, substring,
//! or bounded edit distance, then weighted per field. The field weights are
//! the same ones the index-backed adapters request from their engines, so
//! switching tiers does not reorder results much.

use market_commerce::Product;

/// Weight of a match in the product name.
pub const NAME_WEIGHT: f64 = 3.0;
/// Weight of a match in the brand.
pub const BRAND_WEIGHT: f64 = 2.0;
/// Weight of a match in the tags.
pub const TAG_WEIGHT: f64 = 2.0;
/// Weight of a match in the description.
pub const DESCRIPTION_WEIGHT: f64 = 1.0;

const EXACT: f64 = 1.0;
const PARTIAL: f64 = 0.75;
const FUZZY: f64 = 0.5;

/// Split text into lowercase alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenize a query, dropping duplicate terms but keeping their order.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in tokenize(query) {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Edit budget for a term, matching the `AUTO` fuzziness convention.
pub fn fuzzy_budget(term: &str) -> usize {
    match term.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// Weighted relevance of `product` for the given query terms. Zero means no match.
pub fn text_score(product: &Product, terms: &[String]) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }

    let name = tokenize(&product.name);
    let brand = product.brand_name().map(tokenize).unwrap_or_default();
    let tags: Vec<String> = product.tags.iter().flat_map(|t| tokenize(t)).collect();
    let description = tokenize(&product.description);

    terms
        .iter()
        .map(|term| {
            NAME_WEIGHT * best_match(term, &name)
                + BRAND_WEIGHT * best_match(term, &brand)
                + TAG_WEIGHT * best_match(term, &tags)
                + DESCRIPTION_WEIGHT * best_match(term, &description)
        })
        .sum()
}

/// Whether any query term matches any searchable field.
pub fn matches_text(product: &Product, terms: &[String]) -> bool {
    text_score(product, terms) > 0.0
}

fn best_match(term: &str, tokens: &[String]) -> f64 {
    tokens
        .iter()
        .map(|token| term_match(term, token))
        .fold(0.0, f64::max)
}

fn term_match(term: &str, token: &str) -> f64 {
    if term == token {
        return EXACT;
    }
    if term.chars().count() >= 3 && token.contains(term) {
        return PARTIAL;
    }
    let budget = fuzzy_budget(term);
    if budget > 0 && within_edit_distance(term, token, budget) {
        return FUZZY;
    }
    0.0
}

/// Damerau-Levenshtein check, so a swapped pair of letters costs one edit.
fn within_edit_distance(a: &str, b: &str, budget: usize) -> bool {
    if a.chars().count().abs_diff(b.chars().count()) > budget {
        return false;
    }
    strsim::damerau_levenshtein(a, b) <= budget
}
