//! Keyword matching over record text and tags.

use crate::record::types::{Record, TagCategory};

/// True when any searchable field of `record` contains `needle`.
///
/// `needle` must already be trimmed and lowercased. Searchable fields: card title,
/// name, relationship, how-we-met, location, summary, suggestion, and every tag.
pub(crate) fn matches_query(record: &Record, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);

    let scalars = [
        &record.card_title,
        &record.name,
        &record.relationship_to_me,
        &record.how_we_met,
        &record.location,
        &record.summary,
        &record.suggestion,
    ];
    if scalars.iter().any(|field| contains(field)) {
        return true;
    }

    TagCategory::ALL
        .iter()
        .flat_map(|&category| record.tags(category))
        .any(|tag| contains(tag))
}
