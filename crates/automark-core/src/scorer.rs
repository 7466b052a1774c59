//! Rubric scorer for the two-prompt answer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{framework, MODEL_ANSWER};
use crate::criteria::{Level, Submission};
use crate::guide::score_final_guide;
use crate::report::{GridStatus, MarkResult, ScoreReport, Tag, TagStatus};
use crate::rubric::Rubric;
use crate::text::{contains_any, word_count};

/// Client-reported workflow signals. Untrusted; only used to replace
/// keyword matching for the collaboration category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowEvidence {
    pub similarity_pct: Option<f64>,
    pub prompt2_word_count: Option<f64>,
    pub did_refine: bool,
    pub did_copy_edited_to_step4: bool,
}

impl WorkflowEvidence {
    /// Lenient extraction: any JSON object counts as evidence, fields of the
    /// wrong type read as absent or `false`.
    pub fn from_json(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        let num = |key: &str| obj.get(key).and_then(Value::as_f64);
        let flag = |key: &str| obj.get(key).and_then(Value::as_bool).unwrap_or(false);
        Some(Self {
            similarity_pct: num("similarityPct"),
            prompt2_word_count: num("prompt2WordCount"),
            did_refine: flag("didRefine"),
            did_copy_edited_to_step4: flag("didCopyEditedToStep4"),
        })
    }
}

/// Score the answer text. Answers under `rubric.min_words` are gated.
pub fn score_answer(
    rubric: &Rubric,
    answer_text: &str,
    evidence: Option<&WorkflowEvidence>,
) -> ScoreReport {
    let wc = word_count(answer_text);
    if wc < rubric.min_words {
        tracing::debug!(word_count = wc, "answer gated");
        return ScoreReport::gated(wc, &rubric.gate_message);
    }

    let lowered = answer_text.to_lowercase();
    let input = Submission {
        text: &lowered,
        evidence,
    };

    let mut total = 0u32;
    let mut strengths = Vec::new();
    let mut notes = Vec::new();
    let mut tags = Vec::with_capacity(rubric.categories.len() + 1);
    let mut grid = BTreeMap::new();

    for cat in &rubric.categories {
        let level = cat.assess(&input);
        total += rubric.points_for(level);
        tracing::debug!(
            category = cat.detector.criterion().name(),
            level = level.index(),
            "assessed category"
        );

        match level {
            Level::Secure => strengths.push(cat.strength.clone()),
            Level::Developing => {
                strengths.push(cat.strength.clone());
                notes.push(cat.developing_note.as_str());
            }
            Level::Missing => notes.push(cat.missing_note.as_str()),
        }
        tags.push(Tag {
            name: cat.tag.clone(),
            status: TagStatus::from(level),
        });
        grid.insert(cat.grid_key.clone(), GridStatus::from(level));
    }

    let relevant = contains_any(&lowered, &rubric.relevance_tag.phrases);
    tags.push(Tag {
        name: rubric.relevance_tag.label.clone(),
        status: if relevant { TagStatus::Ok } else { TagStatus::Mid },
    });
    let has_length = contains_any(&lowered, &rubric.length_grid.phrases);
    grid.insert(
        rubric.length_grid.label.clone(),
        if has_length {
            GridStatus::Secure
        } else {
            GridStatus::Developing
        },
    );

    let score = aggregate(total, rubric.categories.len());
    let band = rubric.band_for(score).to_string();
    strengths.truncate(rubric.max_strengths);

    let feedback = if notes.is_empty() {
        format!("{} Band: {band} ({score}/10).", rubric.strong_feedback)
    } else {
        format!(
            "To improve (Band: {band} • {score}/10):\n- {}",
            notes.join("\n- ")
        )
    };

    ScoreReport {
        gated: false,
        word_count: wc,
        message: None,
        score: Some(score),
        band: Some(band),
        strengths: Some(strengths),
        tags: Some(tags),
        grid: Some(grid),
        feedback: Some(feedback),
        framework: Some(framework()),
        model_answer: Some(MODEL_ANSWER.to_string()),
    }
}

/// Mean of the category points, rounded half up and clamped to 0..=10.
fn aggregate(total: u32, categories: usize) -> u32 {
    if categories == 0 {
        return 0;
    }
    let mean = f64::from(total) / categories as f64;
    (mean.round() as u32).min(10)
}

/// Score the answer and the final guide together.
pub fn mark(
    rubric: &Rubric,
    answer_text: &str,
    final_guide_text: &str,
    evidence: Option<&WorkflowEvidence>,
) -> MarkResult {
    MarkResult {
        answer: score_answer(rubric, answer_text, evidence),
        guide: score_final_guide(rubric, final_guide_text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STRONG: &str = "Prompt 1 (Task 1)\n\
        Role: You are a business writer.\n\
        Task: Draft a one-page guide titled How to Use Shared Documents Effectively with an introduction and 4-5 bullet tips.\n\
        Context: New office staff; cover version control, comments, track changes and naming conventions.\n\
        Format: Title, intro, bullets, closing summary, 300-400 words.\n\
        Prompt 2 (Task 2)\n\
        Role: You are an editor.\n\
        Task: Review my edited draft for clarity, consistency, tone and flow. Suggest improvements, \
        incorporate suggestions, then tighten it and remove repetition.\n\
        Context: Keep my personal example in my own words.\n\
        Format: Numbered suggestions then the final version.";

    #[test]
    fn twenty_five_plain_words_score_fair() {
        let text = vec!["word"; 25].join(" ");
        let r = score_answer(&Rubric::default(), &text, None);
        assert!(!r.gated);
        assert_eq!(r.score, Some(3));
        assert_eq!(r.band.as_deref(), Some("Fair"));
        let tags = r.tags.unwrap();
        assert!(tags[..3].iter().all(|t| t.status == TagStatus::Bad));
        assert_eq!(tags[3].status, TagStatus::Mid);
        assert!(r.strengths.unwrap().is_empty());
        let grid = r.grid.unwrap();
        assert_eq!(grid["ethical"], GridStatus::Missing);
        assert_eq!(grid["structure"], GridStatus::Developing);
    }

    #[test]
    fn short_answer_is_gated_with_nothing_else() {
        let r = score_answer(&Rubric::default(), "Role: Task: Context Format", None);
        assert!(r.gated);
        assert_eq!(r.word_count, 4);
        assert_eq!(r.score, None);
        assert!(r.tags.is_none() && r.grid.is_none() && r.model_answer.is_none());
    }

    #[test]
    fn strong_answer_scores_excellent() {
        let r = score_answer(&Rubric::default(), STRONG, None);
        assert_eq!(r.score, Some(10));
        assert_eq!(r.band.as_deref(), Some("Excellent"));
        assert_eq!(r.strengths.as_ref().unwrap().len(), 3);
        assert!(r.feedback.unwrap().starts_with("Strong submission plan"));
        assert!(r.framework.is_some());
        assert!(r.model_answer.unwrap().contains("PROMPT 1"));
        let grid = r.grid.unwrap();
        assert_eq!(grid.len(), 4);
        assert!(grid.values().all(|s| *s == GridStatus::Secure));
    }

    #[test]
    fn evidence_replaces_keyword_collaboration() {
        let weak = WorkflowEvidence {
            similarity_pct: Some(99.0),
            prompt2_word_count: Some(3.0),
            did_refine: false,
            did_copy_edited_to_step4: false,
        };
        let r = score_answer(&Rubric::default(), STRONG, Some(&weak));
        // Structure and quality stay at 10, collaboration drops to 3: round(23/3) = 8.
        assert_eq!(r.score, Some(8));
        let tags = r.tags.unwrap();
        assert_eq!(tags[1].status, TagStatus::Bad);
        assert!(r.feedback.unwrap().contains("AI collaboration: Include TWO prompts"));
    }

    #[test]
    fn developing_levels_produce_notes_and_strengths() {
        let text = "Role: writer. Task: write the guide with bullet points for the team, \
                    one page long, covering comments. Nothing else is said about the \
                    rest of the plan here at all.";
        let r = score_answer(&Rubric::default(), text, None);
        // structure 2 hits -> 7, collaboration 0 -> 3, quality 3 checks -> 7: round(17/3) = 6.
        assert_eq!(r.score, Some(6));
        assert_eq!(r.band.as_deref(), Some("Good"));
        let feedback = r.feedback.unwrap();
        assert!(feedback.starts_with("To improve (Band: Good • 6/10):\n- Prompt structure"));
        assert_eq!(feedback.matches("\n- ").count(), 3);
        assert_eq!(r.strengths.unwrap().len(), 2);
    }

    #[test]
    fn evidence_from_json_is_lenient() {
        let ev = WorkflowEvidence::from_json(&json!({
            "similarityPct": 80,
            "prompt2WordCount": "lots",
            "didRefine": "yes",
            "didCopyEditedToStep4": true
        }))
        .unwrap();
        assert_eq!(ev.similarity_pct, Some(80.0));
        assert_eq!(ev.prompt2_word_count, None);
        assert!(!ev.did_refine);
        assert!(ev.did_copy_edited_to_step4);

        assert!(WorkflowEvidence::from_json(&json!(null)).is_none());
        assert!(WorkflowEvidence::from_json(&json!("x")).is_none());
        assert_eq!(
            WorkflowEvidence::from_json(&json!({})),
            Some(WorkflowEvidence::default())
        );
    }

    #[test]
    fn mark_merges_both_reports_into_one_object() {
        let result = mark(&Rubric::default(), STRONG, "", None);
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["score"], 10);
        assert_eq!(v["guideGated"], true);
        assert!(v["guideScore"].is_null());
    }

    #[test]
    fn aggregate_rounds_half_up_and_clamps() {
        assert_eq!(aggregate(9, 3), 3);
        assert_eq!(aggregate(17, 3), 6);
        assert_eq!(aggregate(13, 2), 7);
        assert_eq!(aggregate(40, 2), 10);
        assert_eq!(aggregate(5, 0), 0);
    }
}
