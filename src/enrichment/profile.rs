//! Schema-tolerant field and tag extraction from a scraped profile payload.
//!
//! Every lookup is optional: missing keys, wrong types, and malformed entries are
//! skipped, never fatal.

use serde_json::Value;

/// Experience entries contributing to career candidates.
pub const MAX_EXPERIENCE_ENTRIES: usize = 3;
/// Skill entries contributing to interest candidates.
pub const MAX_SKILL_ENTRIES: usize = 8;
/// Education entries contributing to career candidates.
pub const MAX_EDUCATION_ENTRIES: usize = 2;

/// Values derived from a scraped profile. Candidate tag lists are not yet
/// deduplicated or capped; that happens when they are merged into a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileInfo {
    pub name: String,
    pub headline: String,
    pub location: String,
    pub summary: String,
    pub career_tags: Vec<String>,
    pub interest_tags: Vec<String>,
}

/// Non-blank string at the first of `keys` that holds one.
fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

/// First array found under any of `keys`.
fn first_array<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_array))
        .find(|a| !a.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Location is either a plain string or an object with a display text.
fn location_of(profile: &Value) -> Option<String> {
    match profile.get("location") {
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(obj @ Value::Object(_)) => first_str(obj, &["linkedinText", "default", "city"]),
        _ => first_str(profile, &["addressWithCountry", "geoLocationName"]),
    }
}

/// Extract scalars and candidate tags from a scraped profile.
pub fn extract_profile_info(profile: &Value) -> ProfileInfo {
    let mut info = ProfileInfo {
        name: first_str(profile, &["fullName", "name"]).unwrap_or_default(),
        headline: first_str(profile, &["headline"]).unwrap_or_default(),
        location: location_of(profile).unwrap_or_default(),
        summary: first_str(profile, &["summary", "about"]).unwrap_or_default(),
        ..Default::default()
    };

    for exp in first_array(profile, &["experience", "experiences", "positions"])
        .iter()
        .take(MAX_EXPERIENCE_ENTRIES)
    {
        if let Some(title) = first_str(exp, &["title", "positionTitle"]) {
            info.career_tags.push(title);
        }
        if let Some(company) = first_str(exp, &["companyName", "company"]) {
            info.career_tags.push(company);
        }
    }

    for skill in first_array(profile, &["skills"]).iter().take(MAX_SKILL_ENTRIES) {
        let name = match skill {
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Value::Object(_) => first_str(skill, &["name", "title"]),
            _ => None,
        };
        if let Some(name) = name {
            info.interest_tags.push(name);
        }
    }

    for edu in first_array(profile, &["education", "educations"])
        .iter()
        .take(MAX_EDUCATION_ENTRIES)
    {
        if let Some(school) = first_str(edu, &["schoolName", "school", "title"]) {
            info.career_tags.push(school);
        }
    }

    info
}
