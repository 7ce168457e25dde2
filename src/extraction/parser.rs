//! Lenient label-line parser for collaborator replies.
//!
//! The reply is expected to look like
//!
//! ```text
//! Name: Lin Wei
//! Main contact: lin@example.com
//! Personality tags: curious, patient
//! Card title: AI music hacker classmate
//! Suggestion: Send her the demo you mentioned.
//! Summary: A classmate from the HCI seminar.
//! ```
//!
//! but nothing is guaranteed. [`parse_reply`] never fails: unknown lines are
//! ignored and empty narrative fields are filled by a fallback chain.

use crate::record::types::ExtractedProfile;

/// Summary used when the reply carries no `Summary:` line.
pub const SUMMARY_FALLBACK: &str =
    "The reply did not follow the expected format, so no summary is available.";

/// Card title used when neither a relationship nor a name was extracted.
pub const CARD_TITLE_FALLBACK: &str = "Untitled profile";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    MainContact,
    RelationshipToMe,
    HowWeMet,
    Location,
    LastContact,
    PersonalityTags,
    GoalTags,
    InterestTags,
    CareerTags,
    CardTitle,
    Suggestion,
    Summary,
}

/// Recognized labels, lowercase, including the separating colon.
const LABELS: [(&str, Field); 13] = [
    ("name:", Field::Name),
    ("main contact:", Field::MainContact),
    ("relationship to me:", Field::RelationshipToMe),
    ("how we met:", Field::HowWeMet),
    ("location:", Field::Location),
    ("last contact:", Field::LastContact),
    ("personality tags:", Field::PersonalityTags),
    ("goal tags:", Field::GoalTags),
    ("interest tags:", Field::InterestTags),
    ("career tags:", Field::CareerTags),
    ("card title:", Field::CardTitle),
    ("suggestion:", Field::Suggestion),
    ("summary:", Field::Summary),
];

/// Match a trimmed line against the label table, returning the field and the raw
/// value after the colon.
fn match_label(line: &str) -> Option<(Field, &str)> {
    LABELS.iter().find_map(|&(label, field)| {
        let prefix = line.get(..label.len())?;
        prefix
            .eq_ignore_ascii_case(label)
            .then(|| (field, &line[label.len()..]))
    })
}

/// Split a comma-separated tag value: trim pieces, drop empties, keep order and
/// duplicates.
pub fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a collaborator reply into a fully populated profile.
pub fn parse_reply(reply: &str) -> ExtractedProfile {
    let text = reply.trim();
    let mut profile = ExtractedProfile::default();
    let mut recognized = 0usize;

    for raw in text.lines() {
        let line = raw.trim();
        let Some((field, value)) = match_label(line) else {
            continue;
        };
        recognized += 1;

        let value = value.trim();
        match field {
            Field::Name => profile.name = value.to_string(),
            Field::MainContact => profile.main_contact = value.to_string(),
            Field::RelationshipToMe => profile.relationship_to_me = value.to_string(),
            Field::HowWeMet => profile.how_we_met = value.to_string(),
            Field::Location => profile.location = value.to_string(),
            Field::LastContact => profile.last_contact = value.to_string(),
            Field::PersonalityTags => profile.personality_tags = split_tags(value),
            Field::GoalTags => profile.goal_tags = split_tags(value),
            Field::InterestTags => profile.interest_tags = split_tags(value),
            Field::CareerTags => profile.career_tags = split_tags(value),
            Field::CardTitle => profile.card_title = value.to_string(),
            Field::Suggestion => profile.suggestion = value.to_string(),
            Field::Summary => profile.summary = value.to_string(),
        }
    }

    if recognized == 0 {
        tracing::warn!(
            reply_len = text.len(),
            "collaborator reply had no recognizable labels, using fallbacks"
        );
    }

    apply_fallbacks(&mut profile, text);
    profile
}

/// Fill empty narrative fields. Runs once, after the scan.
fn apply_fallbacks(profile: &mut ExtractedProfile, original: &str) {
    if profile.suggestion.is_empty() {
        profile.suggestion = original.to_string();
    }
    if profile.summary.is_empty() {
        profile.summary = SUMMARY_FALLBACK.to_string();
    }
    if profile.card_title.is_empty() {
        profile.card_title = card_title_fallback(&profile.relationship_to_me, &profile.name);
    }
}

/// Card title chain: relationship, then `About <name>`, then a fixed placeholder.
pub fn card_title_fallback(relationship_to_me: &str, name: &str) -> String {
    if !relationship_to_me.is_empty() {
        relationship_to_me.to_string()
    } else if !name.is_empty() {
        format!("About {name}")
    } else {
        CARD_TITLE_FALLBACK.to_string()
    }
}
