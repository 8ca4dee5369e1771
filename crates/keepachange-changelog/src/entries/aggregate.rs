//! Grouping of raw change entries into ordered categories

use tracing::debug;

use crate::types::{capitalize, AggregatedChanges, Change};

use super::ChangeEntry;

/// Categories that are always emitted first, in this order
const CATEGORY_ORDER: [&str; 3] = ["Added", "Fixed", "Changed"];

/// Group raw entries by category.
///
/// Category names are compared case-insensitively and normalized to a
/// capitalized form, so `added`, `Added` and `ADDED` all land in one
/// `Added` bucket. `Added`, `Fixed` and `Changed` come first (whichever
/// subset is present, in that order); any other category follows in
/// first-seen order. Within a category, entry order is kept.
pub fn aggregate(entries: &[ChangeEntry]) -> AggregatedChanges {
    let mut grouped = AggregatedChanges::new();
    for entry in entries {
        grouped.add(
            normalize_category(&entry.category),
            Change::new(entry.description.as_str()),
        );
    }

    let mut ordered = AggregatedChanges::new();
    for category in CATEGORY_ORDER {
        if let Some(changes) = grouped.get(category) {
            ordered.insert(category, changes.to_vec());
        }
    }
    for (category, changes) in grouped.iter() {
        if !CATEGORY_ORDER.contains(&category) {
            ordered.insert(category, changes.to_vec());
        }
    }

    debug!(
        entry_count = entries.len(),
        category_count = ordered.len(),
        "aggregated change entries"
    );
    ordered
}

/// Collapse category casing into the canonical capitalized form
fn normalize_category(category: &str) -> String {
    capitalize(&category.to_lowercase())
}
