//! Tag-list merging: concatenate, deduplicate (first occurrence wins), cap.

use std::collections::HashSet;

use crate::record::types::TagCategory;

/// Default cap for career tags.
pub const CAREER_TAG_CAP: usize = 8;
/// Default cap for interest tags.
pub const INTEREST_TAG_CAP: usize = 10;

/// Per-category tag caps. `None` means the category is deduplicated but not truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagCaps {
    pub personality: Option<usize>,
    pub goal: Option<usize>,
    pub interest: Option<usize>,
    pub career: Option<usize>,
}

impl Default for TagCaps {
    fn default() -> Self {
        Self {
            personality: None,
            goal: None,
            interest: Some(INTEREST_TAG_CAP),
            career: Some(CAREER_TAG_CAP),
        }
    }
}

impl TagCaps {
    /// Effective cap for a category.
    pub fn cap(&self, category: TagCategory) -> usize {
        let cap = match category {
            TagCategory::Personality => self.personality,
            TagCategory::Goal => self.goal,
            TagCategory::Interest => self.interest,
            TagCategory::Career => self.career,
        };
        cap.unwrap_or(usize::MAX)
    }
}

/// Merge `incoming` into `existing`.
///
/// The result is `existing ++ incoming` with exact (case-sensitive) duplicates
/// removed, keeping the first occurrence, then truncated to `cap` entries. Once
/// `existing` already holds `cap` distinct entries, `incoming` contributes nothing.
pub fn merge_tags(existing: &[String], incoming: &[String], cap: usize) -> Vec<String> {
    let mut seen: HashSet<&String> = HashSet::new();
    existing
        .iter()
        .chain(incoming.iter())
        .filter(|tag| seen.insert(*tag))
        .take(cap)
        .cloned()
        .collect()
}

/// Deduplicate and cap a freshly produced list (merge against nothing).
pub fn normalize_tags(tags: &[String], cap: usize) -> Vec<String> {
    merge_tags(&[], tags, cap)
}
