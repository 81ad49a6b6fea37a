use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::RecordSource;
use crate::identity::mint;

/// A question/answer pair indexed as a single unit.
///
/// `id` is deterministic: `mint("faq", [project_id, question])`. Two FAQs
/// with identical `(project_id, question)` collide and overwrite — an
/// idempotent upsert, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaqRecord {
    pub id: String,
    pub project_id: String,
    pub question: String,
    pub answer: String,
    pub source: RecordSource,
    pub created_at: DateTime<Utc>,
}

impl FaqRecord {
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        source: RecordSource,
    ) -> Self {
        let project_id = project_id.into();
        let question = question.into();
        let id = mint("faq", &[&project_id, &question]);
        Self {
            id: id.to_string(),
            project_id,
            question,
            answer: answer.into(),
            source,
            created_at: Utc::now(),
        }
    }

    /// The text indexed for this record: `question + "\n" + answer`.
    #[must_use]
    pub fn indexable_text(&self) -> String {
        format!("{}\n{}", self.question, self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn id_is_deterministic_over_project_and_question() {
        let a = FaqRecord::new("95", "What does ASPCA stand for?", "x", RecordSource::Manual);
        let b = FaqRecord::new("95", "What does ASPCA stand for?", "y", RecordSource::Manual);
        assert_eq!(a.id, b.id, "answer does not participate in identity");
    }

    #[test]
    fn id_matches_mint_contract() {
        let faq = FaqRecord::new("95", "q", "a", RecordSource::Manual);
        let expected = mint("faq", &["95", "q"]).to_string();
        assert_eq!(faq.id, expected);
    }
}
