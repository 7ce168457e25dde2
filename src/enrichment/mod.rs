//! Enrichment from a professional-profile scraping service.
//!
//! [`poller`] drives the remote job, [`profile`] reads the payload, and the
//! functions here turn the derived [`ProfileInfo`] into record writes through the
//! tag merger. Derivation is pure, so a failed job never touches the store.

pub mod poller;
pub mod profile;
pub mod scraper;

use crate::extraction::parser::card_title_fallback;
use crate::record::tags::{merge_tags, TagCaps};
use crate::record::types::{RecordFields, TagCategory};

pub use poller::PollSettings;
pub use profile::{extract_profile_info, ProfileInfo};
pub use scraper::{ApifyClient, JobHandle, JobStatus, ScrapeError, ScrapeService};

/// Scene assigned to records created from a scraped profile.
pub const IMPORT_SCENE: &str = "professional_profile";

/// Summary used for imported records whose profile has none.
pub const IMPORT_SUMMARY: &str = "Imported from a professional profile.";

/// Suggestion used for imported records.
pub const IMPORT_SUGGESTION: &str =
    "Send a short, friendly note mentioning something from their recent work.";

fn fill_if_empty(slot: &mut String, value: &str) {
    if slot.is_empty() && !value.is_empty() {
        *slot = value.to_string();
    }
}

/// Merge profile-derived values into an existing record's fields.
///
/// Career and interest candidates go through the tag merger against the existing
/// tags. Scalars only fill blanks, so values the user supplied are kept. The
/// summary is replaced only when the profile carries one.
pub fn merge_into_existing(
    fields: &mut RecordFields,
    info: &ProfileInfo,
    profile_reference: &str,
    caps: &TagCaps,
) {
    for (category, incoming) in [
        (TagCategory::Career, &info.career_tags),
        (TagCategory::Interest, &info.interest_tags),
    ] {
        let cap = caps.cap(category);
        let tags = fields.tags_mut(category);
        *tags = merge_tags(tags, incoming, cap);
    }

    fill_if_empty(&mut fields.name, &info.name);
    fill_if_empty(&mut fields.location, &info.location);
    fill_if_empty(&mut fields.relationship_to_me, &info.headline);
    fill_if_empty(&mut fields.main_contact, profile_reference);

    if !info.summary.is_empty() {
        fields.summary = info.summary.clone();
    }
}

/// Build the fields of a new record from a scraped profile.
pub fn fields_for_new_record(
    info: &ProfileInfo,
    profile_reference: &str,
    caps: &TagCaps,
) -> RecordFields {
    let mut fields = RecordFields {
        scene: IMPORT_SCENE.to_string(),
        context: format!("Imported from {profile_reference}"),
        card_title: card_title_fallback(&info.headline, &info.name),
        suggestion: IMPORT_SUGGESTION.to_string(),
        summary: IMPORT_SUMMARY.to_string(),
        ..Default::default()
    };
    merge_into_existing(&mut fields, info, profile_reference, caps);
    fields
}
