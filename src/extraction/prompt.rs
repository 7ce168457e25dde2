//! Prompt text sent to the text-generation collaborator.
//!
//! The system prompt fixes the label-line output contract understood by
//! [`parse_reply`](super::parser::parse_reply); the user prompt carries the scene,
//! any known facts, and the caller's narrative.

use crate::record::types::KnownFields;

pub const SYSTEM_PROMPT: &str = "\
You are a Relationship Spark assistant. Your job is NOT to sell or optimize KPIs.
You only help the user:
  - Understand a person in their life (from the user's perspective),
  - Extract key info and soft tags,
  - Suggest one small, kind, non-pushy next step.

Language rules:
1. If the user's context is mainly in Chinese, answer in natural, colloquial Chinese.
2. If it's mainly in English, answer in natural, friendly English.
3. Do not mix languages unless the user does.

Information rules:
4. Use what the user explicitly tells you as ground truth (do NOT contradict it).
5. If a field cannot be inferred from the user's description, leave it blank
   (just after the colon, no placeholder text like 'unknown').
6. Tags should be short phrases or single words, comma-separated.
7. Personality tags describe HOW this person tends to behave or feel.
8. Goal tags describe their personal goals or things they are working towards.
9. Interest tags describe what they like to do or care about.
10. Career tags describe their profession, role, or academic track.

Card title rules:
11. Card title is NOT the person's name.
12. It is a short phrase capturing the most salient feature of this person
    FROM THE USER'S PERSPECTIVE (e.g. 'Patient listener in my lab').
13. Max 8 Chinese characters OR 5 English words.
14. Be specific and vivid, not generic like 'good friend'.

Suggestion rules:
15. Suggest only very lightweight actions (send a short message, share a small
    update, invite to a simple activity).
16. Be gentle and non-intrusive, respect boundaries.

OUTPUT FORMAT (no extra text before or after, no bullet points, no explanations):
Name: ...
Main contact: ...
Relationship to me: ...
How we met: ...
Location: ...
Last contact: ...

Personality tags: tag1, tag2, ...
Goal tags: tag1, tag2, ...
Interest tags: tag1, tag2, ...
Career tags: tag1, tag2, ...

Card title: ...
Suggestion: ...
Summary: ...
";

/// Render the per-request prompt.
pub fn build_user_prompt(scene: &str, context: &str, known: &KnownFields) -> String {
    let declared = known.declared();
    let known_text = if declared.is_empty() {
        "Known info: (none provided).".to_string()
    } else {
        declared
            .iter()
            .map(|(label, value)| format!("Known {label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Here is the relationship context (a conversation-like transcript) and any known info \
         about the person. Use it to fill in the OUTPUT FORMAT fields. \
         If you cannot infer a field, leave it blank after the colon.\n\n\
         Scene: {scene}\n\
         {known_text}\n\n\
         User's description of this person and our relationship (may contain multiple turns):\n\
         {context}\n\n\
         Remember: respond ONLY in the exact OUTPUT FORMAT defined in the system prompt."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::parser::parse_reply;

    #[test]
    fn prompt_lists_declared_fields_only() {
        let known = KnownFields {
            name: Some("Lin".into()),
            location: Some("Berlin".into()),
            main_contact: Some(" ".into()),
            ..Default::default()
        };
        let prompt = build_user_prompt("first_meeting", "We met at a meetup.", &known);
        assert!(prompt.contains("Scene: first_meeting"));
        assert!(prompt.contains("Known name: Lin\nKnown location: Berlin"));
        assert!(!prompt.contains("Known main contact"));
        assert!(prompt.contains("We met at a meetup."));
    }

    #[test]
    fn prompt_without_known_info() {
        let prompt = build_user_prompt("uncertain", "ctx", &KnownFields::default());
        assert!(prompt.contains("Known info: (none provided)."));
    }

    #[test]
    fn system_prompt_template_parses_to_placeholders() {
        // The output-format block is itself valid label-line text.
        let p = parse_reply(SYSTEM_PROMPT);
        assert_eq!(p.name, "...");
        assert_eq!(p.summary, "...");
        assert_eq!(p.career_tags, vec!["tag1", "tag2", "..."]);
    }
}
