//! Known-field override: caller-declared scalars always win over parsed values.

use crate::record::types::{declared_value, ExtractedProfile, KnownFields};

/// Replace every declared scalar in `profile` with the caller's value.
///
/// Blank declarations are treated as undeclared. Tags and narrative fields are
/// never touched.
pub fn apply_known_fields(profile: &mut ExtractedProfile, known: &KnownFields) {
    let targets = [
        (&mut profile.name, &known.name),
        (&mut profile.main_contact, &known.main_contact),
        (&mut profile.relationship_to_me, &known.relationship_to_me),
        (&mut profile.how_we_met, &known.how_we_met),
        (&mut profile.location, &known.location),
        (&mut profile.last_contact, &known.last_contact),
    ];

    for (slot, declared) in targets {
        if let Some(value) = declared_value(declared) {
            if slot.as_str() != value {
                tracing::debug!(parsed = %slot, declared = value, "known field overrides parsed value");
            }
            *slot = value.to_string();
        }
    }
}
