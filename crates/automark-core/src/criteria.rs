//! Category detectors.
//!
//! Each detector inspects the lowercased submission (and, for collaboration,
//! the optional workflow evidence) and returns a [`Level`]. Point values are
//! attached later by the [`Rubric`](crate::rubric::Rubric).

use serde::{Deserialize, Serialize};

use crate::scorer::WorkflowEvidence;
use crate::text::{contains_any, count_present};

/// Achievement level of a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Missing,
    Developing,
    Secure,
}

impl Level {
    pub fn index(self) -> usize {
        match self {
            Level::Missing => 0,
            Level::Developing => 1,
            Level::Secure => 2,
        }
    }
}

/// Lowercased submission text plus optional evidence, as seen by detectors.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub text: &'a str,
    pub evidence: Option<&'a WorkflowEvidence>,
}

pub trait Criterion {
    fn name(&self) -> &'static str;
    fn assess(&self, input: &Submission<'_>) -> Level;
}

/// Groups of marker phrases; a group counts once when any member appears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureRule {
    pub markers: Vec<Vec<String>>,
    pub secure_hits: usize,
    pub developing_hits: usize,
}

impl StructureRule {
    pub fn hits(&self, text: &str) -> usize {
        self.markers
            .iter()
            .filter(|group| contains_any(text, group.as_slice()))
            .count()
    }
}

impl Criterion for StructureRule {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn assess(&self, input: &Submission<'_>) -> Level {
        let hits = self.hits(input.text);
        if hits >= self.secure_hits {
            Level::Secure
        } else if hits >= self.developing_hits {
            Level::Developing
        } else {
            Level::Missing
        }
    }
}

/// Thresholds applied to client-reported workflow evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRule {
    pub min_prompt2_words: f64,
    pub max_similarity_pct: f64,
}

/// The three workflow signals derived from evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowSignals {
    pub second_prompt_substantial: bool,
    pub draft_edited: bool,
    pub carried_forward: bool,
}

impl WorkflowSignals {
    pub fn count(&self) -> usize {
        [
            self.second_prompt_substantial,
            self.draft_edited,
            self.carried_forward,
        ]
        .iter()
        .filter(|b| **b)
        .count()
    }
}

impl WorkflowRule {
    pub fn signals(&self, ev: &WorkflowEvidence) -> WorkflowSignals {
        WorkflowSignals {
            second_prompt_substantial: ev
                .prompt2_word_count
                .is_some_and(|n| n >= self.min_prompt2_words),
            draft_edited: ev
                .similarity_pct
                .is_some_and(|pct| pct <= self.max_similarity_pct),
            carried_forward: ev.did_refine || ev.did_copy_edited_to_step4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationRule {
    pub keywords: Vec<String>,
    pub prompt_one: Vec<String>,
    pub prompt_two: Vec<String>,
    pub review_dimensions: Vec<String>,
    pub secure_keyword_hits: usize,
    pub developing_keyword_hits: usize,
    pub workflow: WorkflowRule,
}

impl CollaborationRule {
    fn assess_keywords(&self, text: &str) -> Level {
        let count = count_present(text, &self.keywords);
        let two_prompts =
            contains_any(text, &self.prompt_one) && contains_any(text, &self.prompt_two);
        let reviews = contains_any(text, &self.review_dimensions);

        if two_prompts && reviews && count >= self.secure_keyword_hits {
            Level::Secure
        } else if two_prompts && (count >= self.developing_keyword_hits || reviews) {
            Level::Developing
        } else {
            Level::Missing
        }
    }
}

impl Criterion for CollaborationRule {
    fn name(&self) -> &'static str {
        "collaboration"
    }

    fn assess(&self, input: &Submission<'_>) -> Level {
        let Some(ev) = input.evidence else {
            return self.assess_keywords(input.text);
        };
        match self.workflow.signals(ev).count() {
            3 => Level::Secure,
            2 => Level::Developing,
            _ => Level::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRule {
    pub title: Vec<String>,
    pub bullets: Vec<String>,
    pub length: Vec<String>,
    pub collab_content: Vec<String>,
    pub keywords: Vec<String>,
    pub secure_checks: usize,
    pub secure_keyword_hits: usize,
    pub developing_checks: usize,
}

impl QualityRule {
    pub fn checks(&self, text: &str) -> usize {
        [&self.title, &self.bullets, &self.length, &self.collab_content]
            .into_iter()
            .filter(|needles| contains_any(text, needles.as_slice()))
            .count()
    }
}

impl Criterion for QualityRule {
    fn name(&self) -> &'static str {
        "output_quality"
    }

    fn assess(&self, input: &Submission<'_>) -> Level {
        let checks = self.checks(input.text);
        let count = count_present(input.text, &self.keywords);
        if checks >= self.secure_checks && count >= self.secure_keyword_hits {
            Level::Secure
        } else if checks >= self.developing_checks {
            Level::Developing
        } else {
            Level::Missing
        }
    }
}
