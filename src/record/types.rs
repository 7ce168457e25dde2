//! Relationship record type definitions.
//!
//! Defines [`Record`] (a stored person card), [`RecordFields`] (the mutable payload
//! written by create-or-update), [`ExtractedProfile`] (the 13-field parser output),
//! [`KnownFields`] (caller-declared ground truth), and [`TagCategory`].

use serde::{Deserialize, Serialize};

/// The four tag-list categories carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    /// How the person tends to behave or feel.
    Personality,
    /// Personal goals or things they are working towards.
    Goal,
    /// What they like to do or care about.
    Interest,
    /// Profession, role, or academic track.
    Career,
}

impl TagCategory {
    pub const ALL: [TagCategory; 4] = [
        Self::Personality,
        Self::Goal,
        Self::Interest,
        Self::Career,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personality => "personality",
            Self::Goal => "goal",
            Self::Interest => "interest",
            Self::Career => "career",
        }
    }
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured output of the extraction parser.
///
/// Every field is always present; the parser's fallback chain guarantees
/// `card_title` and `summary` are non-empty. `suggestion` falls back to the
/// reply text itself, which may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    pub name: String,
    pub main_contact: String,
    pub relationship_to_me: String,
    pub how_we_met: String,
    pub location: String,
    pub last_contact: String,
    pub personality_tags: Vec<String>,
    pub goal_tags: Vec<String>,
    pub interest_tags: Vec<String>,
    pub career_tags: Vec<String>,
    pub card_title: String,
    pub suggestion: String,
    pub summary: String,
}

/// Scalar values the caller already knows (e.g. from a clarifying follow-up).
///
/// A field counts as declared only when it holds non-blank text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnownFields {
    pub name: Option<String>,
    pub main_contact: Option<String>,
    pub relationship_to_me: Option<String>,
    pub how_we_met: Option<String>,
    pub location: Option<String>,
    pub last_contact: Option<String>,
}

impl KnownFields {
    /// Declared fields as `(label, value)` pairs, in output-format order.
    pub fn declared(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("main contact", &self.main_contact),
            ("relationship to me", &self.relationship_to_me),
            ("how we met", &self.how_we_met),
            ("location", &self.location),
            ("last contact", &self.last_contact),
        ]
        .into_iter()
        .filter_map(|(label, value)| declared_value(value).map(|v| (label, v)))
        .collect()
    }
}

/// Returns the trimmed value when it is present and non-blank.
pub(crate) fn declared_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// The mutable payload of a record, as written by create-or-update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    pub scene: String,
    pub context: String,
    pub name: String,
    pub main_contact: String,
    pub relationship_to_me: String,
    pub how_we_met: String,
    pub location: String,
    pub last_contact: String,
    pub personality_tags: Vec<String>,
    pub goal_tags: Vec<String>,
    pub interest_tags: Vec<String>,
    pub career_tags: Vec<String>,
    pub card_title: String,
    pub suggestion: String,
    pub summary: String,
}

impl RecordFields {
    /// Assemble a payload from the request scene/context and an extracted profile.
    pub fn from_profile(scene: &str, context: &str, profile: ExtractedProfile) -> Self {
        Self {
            scene: scene.to_string(),
            context: context.to_string(),
            name: profile.name,
            main_contact: profile.main_contact,
            relationship_to_me: profile.relationship_to_me,
            how_we_met: profile.how_we_met,
            location: profile.location,
            last_contact: profile.last_contact,
            personality_tags: profile.personality_tags,
            goal_tags: profile.goal_tags,
            interest_tags: profile.interest_tags,
            career_tags: profile.career_tags,
            card_title: profile.card_title,
            suggestion: profile.suggestion,
            summary: profile.summary,
        }
    }

    pub fn tags_mut(&mut self, category: TagCategory) -> &mut Vec<String> {
        match category {
            TagCategory::Personality => &mut self.personality_tags,
            TagCategory::Goal => &mut self.goal_tags,
            TagCategory::Interest => &mut self.interest_tags,
            TagCategory::Career => &mut self.career_tags,
        }
    }
}

/// A stored relationship record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Monotonic identity, assigned once at creation.
    pub id: u64,
    /// Relationship context, e.g. `"stay_in_touch"`.
    pub scene: String,
    /// Caller's narrative, verbatim.
    pub context: String,
    pub name: String,
    pub main_contact: String,
    pub relationship_to_me: String,
    pub how_we_met: String,
    pub location: String,
    pub last_contact: String,
    pub personality_tags: Vec<String>,
    pub goal_tags: Vec<String>,
    pub interest_tags: Vec<String>,
    pub career_tags: Vec<String>,
    /// Short descriptive label; never the literal name.
    pub card_title: String,
    pub suggestion: String,
    pub summary: String,
    /// Photo references (URLs), append-only.
    pub photos: Vec<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last in-place mutation.
    pub updated_at: String,
}

impl Record {
    pub(crate) fn new(id: u64, fields: RecordFields, now: String) -> Self {
        let mut record = Self {
            id,
            scene: String::new(),
            context: String::new(),
            name: String::new(),
            main_contact: String::new(),
            relationship_to_me: String::new(),
            how_we_met: String::new(),
            location: String::new(),
            last_contact: String::new(),
            personality_tags: Vec::new(),
            goal_tags: Vec::new(),
            interest_tags: Vec::new(),
            career_tags: Vec::new(),
            card_title: String::new(),
            suggestion: String::new(),
            summary: String::new(),
            photos: Vec::new(),
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        record.apply(fields, now);
        record
    }

    /// Overwrite every mutable field. `id`, `photos` and `created_at` are untouched.
    pub(crate) fn apply(&mut self, fields: RecordFields, now: String) {
        self.scene = fields.scene;
        self.context = fields.context;
        self.name = fields.name;
        self.main_contact = fields.main_contact;
        self.relationship_to_me = fields.relationship_to_me;
        self.how_we_met = fields.how_we_met;
        self.location = fields.location;
        self.last_contact = fields.last_contact;
        self.personality_tags = fields.personality_tags;
        self.goal_tags = fields.goal_tags;
        self.interest_tags = fields.interest_tags;
        self.career_tags = fields.career_tags;
        self.card_title = fields.card_title;
        self.suggestion = fields.suggestion;
        self.summary = fields.summary;
        self.updated_at = now;
    }

    /// Snapshot of the mutable payload.
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            scene: self.scene.clone(),
            context: self.context.clone(),
            name: self.name.clone(),
            main_contact: self.main_contact.clone(),
            relationship_to_me: self.relationship_to_me.clone(),
            how_we_met: self.how_we_met.clone(),
            location: self.location.clone(),
            last_contact: self.last_contact.clone(),
            personality_tags: self.personality_tags.clone(),
            goal_tags: self.goal_tags.clone(),
            interest_tags: self.interest_tags.clone(),
            career_tags: self.career_tags.clone(),
            card_title: self.card_title.clone(),
            suggestion: self.suggestion.clone(),
            summary: self.summary.clone(),
        }
    }

    pub fn tags(&self, category: TagCategory) -> &[String] {
        match category {
            TagCategory::Personality => &self.personality_tags,
            TagCategory::Goal => &self.goal_tags,
            TagCategory::Interest => &self.interest_tags,
            TagCategory::Career => &self.career_tags,
        }
    }
}
