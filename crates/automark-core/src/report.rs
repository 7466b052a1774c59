use std::collections::BTreeMap;

use serde::Serialize;

use crate::content::Framework;
use crate::criteria::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStatus {
    Ok,
    Mid,
    Bad,
}

impl From<Level> for TagStatus {
    fn from(level: Level) -> Self {
        match level {
            Level::Secure => TagStatus::Ok,
            Level::Developing => TagStatus::Mid,
            Level::Missing => TagStatus::Bad,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GridStatus {
    #[serde(rename = "✓ Secure")]
    Secure,
    #[serde(rename = "◐ Developing")]
    Developing,
    #[serde(rename = "✗ Missing")]
    Missing,
}

impl From<Level> for GridStatus {
    fn from(level: Level) -> Self {
        match level {
            Level::Secure => GridStatus::Secure,
            Level::Developing => GridStatus::Developing,
            Level::Missing => GridStatus::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub status: TagStatus,
}

/// Result of scoring the prompt answer.
///
/// A gated report carries only `gated`, `word_count` and `message`; every
/// other field is `None` and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub gated: bool,
    pub word_count: usize,
    pub message: Option<String>,
    pub score: Option<u32>,
    pub band: Option<String>,
    pub strengths: Option<Vec<String>>,
    pub tags: Option<Vec<Tag>>,
    pub grid: Option<BTreeMap<String, GridStatus>>,
    pub feedback: Option<String>,
    pub framework: Option<Framework>,
    pub model_answer: Option<String>,
}

impl ScoreReport {
    pub fn gated(word_count: usize, message: &str) -> Self {
        Self {
            gated: true,
            word_count,
            message: Some(message.to_string()),
            score: None,
            band: None,
            strengths: None,
            tags: None,
            grid: None,
            feedback: None,
            framework: None,
            model_answer: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideChecks {
    pub has_title: bool,
    pub bullet_count: usize,
    pub has_bullets: bool,
    pub has_summary: bool,
    pub has_personal_voice: bool,
    pub meets_min_words: bool,
}

impl GuideChecks {
    pub fn passed(&self) -> u32 {
        [
            self.has_title,
            self.has_bullets,
            self.has_summary,
            self.has_personal_voice,
            self.meets_min_words,
        ]
        .iter()
        .filter(|b| **b)
        .count() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalGuideReport {
    pub guide_gated: bool,
    pub guide_word_count: usize,
    pub guide_message: Option<String>,
    pub guide_score: Option<u32>,
    pub guide_band: Option<String>,
    pub guide_checks: Option<GuideChecks>,
    pub guide_feedback: Option<String>,
}

/// Answer report and final-guide report merged into one JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkResult {
    #[serde(flatten)]
    pub answer: ScoreReport,
    #[serde(flatten)]
    pub guide: FinalGuideReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_serialize_to_front_end_strings() {
        assert_eq!(
            serde_json::to_value(TagStatus::from(Level::Developing)).unwrap(),
            "mid"
        );
        assert_eq!(
            serde_json::to_value(GridStatus::from(Level::Missing)).unwrap(),
            "✗ Missing"
        );
    }

    #[test]
    fn gated_report_nulls_everything_but_the_message() {
        let v = serde_json::to_value(ScoreReport::gated(4, "add more")).unwrap();
        assert_eq!(v["gated"], true);
        assert_eq!(v["wordCount"], 4);
        assert_eq!(v["message"], "add more");
        for key in [
            "score",
            "band",
            "strengths",
            "tags",
            "grid",
            "feedback",
            "framework",
            "modelAnswer",
        ] {
            assert!(v[key].is_null(), "{key} should be null");
            assert!(v.as_object().unwrap().contains_key(key));
        }
    }
}
