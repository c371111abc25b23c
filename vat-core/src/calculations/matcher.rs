//! Free-text lookup over the activity classification table.

use std::slice;

use crate::models::ActivityClassificationEntry;

/// Number of matches a selector list shows.
pub const DISPLAY_LIMIT: usize = 50;

/// Lazy filter over a classification table.
///
/// Yields entries in table order. Cloning the iterator restarts the search
/// from the clone's position without re-reading the table.
#[derive(Debug, Clone)]
pub struct ClassificationMatches<'a> {
    query: String,
    entries: slice::Iter<'a, ActivityClassificationEntry>,
}

impl<'a> Iterator for ClassificationMatches<'a> {
    type Item = &'a ActivityClassificationEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let query = self.query.as_str();
        self.entries.by_ref().find(|entry| {
            contains_folded(&entry.code, query) || contains_folded(&entry.name, query)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.entries.len()))
    }
}

/// Returns the entries whose code or name contains `query`, ignoring case.
///
/// An empty query matches every entry.
///
/// # Example
///
/// ```
/// use vat_core::ActivityClassificationEntry;
/// use vat_core::calculations::match_classification;
///
/// let table = vec![
///     ActivityClassificationEntry::new("10.1", "Meat").unwrap(),
///     ActivityClassificationEntry::new("10.2", "Fish").unwrap(),
///     ActivityClassificationEntry::new("20.1", "Chemicals").unwrap(),
/// ];
///
/// let codes: Vec<_> = match_classification("10.", &table)
///     .map(|entry| entry.code.as_str())
///     .collect();
///
/// assert_eq!(codes, ["10.1", "10.2"]);
/// ```
pub fn match_classification<'a>(
    query: &str,
    entries: &'a [ActivityClassificationEntry],
) -> ClassificationMatches<'a> {
    ClassificationMatches {
        query: fold_case(query).collect(),
        entries: entries.iter(),
    }
}

fn fold_case(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

/// Case-insensitive substring test against an already folded `needle`.
///
/// Walks `haystack` in place; nothing is allocated per entry.
fn contains_folded(
    haystack: &str,
    needle: &str,
) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.char_indices().any(|(start, _)| {
        let mut folded = fold_case(&haystack[start..]);
        needle.chars().all(|expected| folded.next() == Some(expected))
    })
}
