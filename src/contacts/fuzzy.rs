//! Name lookup for row selection using strsim.
//!
//! Matching tiers, first tier with a hit wins:
//! 1. exact name (case-insensitive), every such row
//! 2. name contains the query, every such row
//! 3. best fuzzy score at or above [`DEFAULT_THRESHOLD`], one row

use super::store::Contact;
use strsim::{jaro_winkler, normalized_levenshtein, sorensen_dice};

/// Minimum fuzzy score (0.0 - 1.0) for a name to count as a match.
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Best score across the similarity measures we trust for names.
pub fn name_score(query: &str, name: &str) -> f64 {
    let query = query.to_lowercase();
    let name = name.to_lowercase();

    [
        jaro_winkler(&query, &name),
        sorensen_dice(&query, &name),
        normalized_levenshtein(&query, &name),
        jaro_winkler(&sorted_tokens(&query), &sorted_tokens(&name)),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

/// Sort whitespace-separated words so "Sharma Asha" lines up with "Asha Sharma".
fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Row indices whose name matches `query`, in table order.
pub fn find_rows(query: &str, contacts: &[Contact], threshold: f64) -> Vec<usize> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return Vec::new();
    }

    let exact: Vec<usize> = contacts
        .iter()
        .enumerate()
        .filter(|(_, c)| c.name.trim().to_lowercase() == query_lower)
        .map(|(row, _)| row)
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let partial: Vec<usize> = contacts
        .iter()
        .enumerate()
        .filter(|(_, c)| c.name.to_lowercase().contains(&query_lower))
        .map(|(row, _)| row)
        .collect();
    if !partial.is_empty() {
        return partial;
    }

    let mut best: Option<(usize, f64)> = None;
    for (row, contact) in contacts.iter().enumerate() {
        let score = name_score(&query_lower, &contact.name);
        if score >= threshold && best.map_or(true, |(_, top)| score > top) {
            best = Some((row, score));
        }
    }

    best.map(|(row, _)| vec![row]).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Contact> {
        vec![
            Contact::new("1", "Asha Sharma", "9876543210"),
            Contact::new("2", "Ravi Kumar", "9812345678"),
            Contact::new("3", "asha sharma", "9800000000"),
            Contact::new("4", "Meera Nair", "9811111111"),
        ]
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        assert_eq!(find_rows("ASHA SHARMA", &table(), DEFAULT_THRESHOLD), vec![0, 2]);
    }

    #[test]
    fn test_partial_match() {
        assert_eq!(find_rows("kumar", &table(), DEFAULT_THRESHOLD), vec![1]);
    }

    #[test]
    fn test_fuzzy_match() {
        assert_eq!(find_rows("Meera Nayr", &table(), DEFAULT_THRESHOLD), vec![3]);
    }

    #[test]
    fn test_word_order() {
        let score = name_score("Sharma Asha", "Asha Sharma");
        assert!(score > 0.99, "Score was {}", score);
    }

    #[test]
    fn test_no_match() {
        assert!(find_rows("Zebediah", &table(), DEFAULT_THRESHOLD).is_empty());
        assert!(find_rows("   ", &table(), DEFAULT_THRESHOLD).is_empty());
    }
}
