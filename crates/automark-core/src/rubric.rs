//! Rubric tables as data.
//!
//! The keyword lists are both the detection dictionary and the scoring
//! policy. [`Rubric::default`] carries the shared-documents task rubric; a
//! YAML file with the same shape can replace it at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::criteria::{
    CollaborationRule, Criterion, Level, QualityRule, StructureRule, Submission, WorkflowRule,
};
use crate::error::RubricError;
use crate::guide::GuideRules;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rubric {
    /// Answers with fewer words are gated.
    pub min_words: usize,
    /// Points awarded for Missing / Developing / Secure.
    pub level_points: [u32; 3],
    pub categories: Vec<CategoryRule>,
    /// Ordered by descending `min_score`; the last entry must start at 0.
    pub bands: Vec<Band>,
    pub gate_message: String,
    pub strong_feedback: String,
    pub max_strengths: usize,
    /// Extra tag driven by a phrase list (present => ok, absent => mid).
    pub relevance_tag: SignalRule,
    /// Extra grid cell driven by a phrase list (present => secure, absent => developing).
    pub length_grid: SignalRule,
    pub guide: GuideRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub tag: String,
    pub grid_key: String,
    pub strength: String,
    pub developing_note: String,
    pub missing_note: String,
    pub detector: CategoryKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CategoryKind {
    Structure(StructureRule),
    Collaboration(CollaborationRule),
    OutputQuality(QualityRule),
}

impl CategoryKind {
    pub fn criterion(&self) -> &dyn Criterion {
        match self {
            CategoryKind::Structure(r) => r as &dyn Criterion,
            CategoryKind::Collaboration(r) => r,
            CategoryKind::OutputQuality(r) => r,
        }
    }

    fn lowercase_phrases(&mut self) {
        match self {
            CategoryKind::Structure(r) => r.markers.iter_mut().for_each(|g| lowercase_all(g)),
            CategoryKind::Collaboration(r) => {
                for list in [
                    &mut r.keywords,
                    &mut r.prompt_one,
                    &mut r.prompt_two,
                    &mut r.review_dimensions,
                ] {
                    lowercase_all(list);
                }
            }
            CategoryKind::OutputQuality(r) => {
                for list in [
                    &mut r.title,
                    &mut r.bullets,
                    &mut r.length,
                    &mut r.collab_content,
                    &mut r.keywords,
                ] {
                    lowercase_all(list);
                }
            }
        }
    }
}

impl CategoryRule {
    pub fn assess(&self, input: &Submission<'_>) -> Level {
        self.detector.criterion().assess(input)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min_score: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRule {
    pub label: String,
    pub phrases: Vec<String>,
}

impl Rubric {
    pub fn from_yaml_str(s: &str) -> Result<Self, RubricError> {
        let mut rubric: Rubric = serde_yaml::from_str(s)?;
        rubric.normalize();
        rubric.validate()?;
        Ok(rubric)
    }

    pub fn from_path(path: &Path) -> Result<Self, RubricError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RubricError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Matching runs on lowercased text, so every phrase is lowercased too.
    pub fn normalize(&mut self) {
        for cat in &mut self.categories {
            cat.detector.lowercase_phrases();
        }
        lowercase_all(&mut self.relevance_tag.phrases);
        lowercase_all(&mut self.length_grid.phrases);
    }

    pub fn validate(&self) -> Result<(), RubricError> {
        if self.categories.is_empty() {
            return Err(RubricError::invalid("rubric has no categories"));
        }
        if self.level_points.iter().any(|p| *p > 10) {
            return Err(RubricError::invalid("level points must be within 0..=10"));
        }
        if self.level_points.windows(2).any(|w| w[0] > w[1]) {
            return Err(RubricError::invalid("level points must not decrease"));
        }
        for cat in &self.categories {
            let ok = match &cat.detector {
                CategoryKind::Structure(r) => r.developing_hits <= r.secure_hits,
                CategoryKind::Collaboration(r) => {
                    r.developing_keyword_hits <= r.secure_keyword_hits
                }
                CategoryKind::OutputQuality(r) => r.developing_checks <= r.secure_checks,
            };
            if !ok {
                return Err(RubricError::invalid(format!(
                    "category '{}': developing threshold exceeds secure threshold",
                    cat.tag
                )));
            }
        }
        if self.bands.is_empty() {
            return Err(RubricError::invalid("rubric has no bands"));
        }
        if self.bands.windows(2).any(|w| w[0].min_score <= w[1].min_score) {
            return Err(RubricError::invalid(
                "bands must be ordered by strictly descending min_score",
            ));
        }
        if self.bands.last().map(|b| b.min_score) != Some(0) {
            return Err(RubricError::invalid("lowest band must start at 0"));
        }
        self.guide.validate()
    }

    pub fn band_for(&self, score: u32) -> &str {
        self.bands
            .iter()
            .find(|b| score >= b.min_score)
            .or(self.bands.last())
            .map(|b| b.label.as_str())
            .unwrap_or_default()
    }

    pub fn points_for(&self, level: Level) -> u32 {
        self.level_points[level.index()]
    }
}

fn lowercase_all(list: &mut [String]) {
    for s in list.iter_mut() {
        *s = s.to_lowercase();
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const LENGTH_MARKERS: &[&str] = &[
    "300", "350", "400", "300–400", "300-400", "~300", "~350", "~400", "one page", "one-page",
];

const COLLAB_CONTENT: &[&str] = &[
    "comments",
    "commenting",
    "track changes",
    "suggest",
    "version control",
    "naming convention",
    "version",
];

impl Default for Rubric {
    fn default() -> Self {
        let structure = StructureRule {
            markers: vec![
                strings(&["role:"]),
                strings(&["task:"]),
                strings(&["context"]),
                strings(&["format"]),
            ],
            secure_hits: 4,
            developing_hits: 2,
        };

        let collaboration = CollaborationRule {
            keywords: strings(&[
                "draft",
                "first draft",
                "initial draft",
                "edit",
                "edited",
                "in my own words",
                "my own words",
                "personal example",
                "example",
                "review",
                "clarity",
                "consistency",
                "tone",
                "flow",
                "suggest",
                "suggestions",
                "incorporate",
                "adopt",
                "revision",
                "revise",
                "tighten",
                "remove repetition",
                "summary",
            ]),
            prompt_one: strings(&["prompt 1", "prompt one", "task 1"]),
            prompt_two: strings(&["prompt 2", "prompt two", "task 2"]),
            review_dimensions: strings(&["clarity", "consistency", "tone", "flow"]),
            secure_keyword_hits: 8,
            developing_keyword_hits: 5,
            workflow: WorkflowRule {
                min_prompt2_words: 20.0,
                max_similarity_pct: 90.0,
            },
        };

        let quality = QualityRule {
            title: strings(&["how to use shared documents effectively"]),
            bullets: strings(&["bullet", "bullets"]),
            length: strings(LENGTH_MARKERS),
            collab_content: strings(COLLAB_CONTENT),
            keywords: strings(&[
                "how to use shared documents effectively",
                "introduction",
                "intro",
                "bullet",
                "bullets",
                "version control",
                "track changes",
                "suggesting",
                "suggestions",
                "comments",
                "naming",
                "file name",
                "naming convention",
                "one page",
                "one-page",
                "300",
                "350",
                "400",
                "300–400",
                "300-400",
            ]),
            secure_checks: 4,
            secure_keyword_hits: 8,
            developing_checks: 2,
        };

        Self {
            min_words: 20,
            level_points: [3, 7, 10],
            categories: vec![
                CategoryRule {
                    tag: "FEthink prompt structure".into(),
                    grid_key: "ethical".into(),
                    strength: "You used the FEthink structure (Role, Task, Context, Format), which makes AI outputs more reliable.".into(),
                    developing_note: "Prompt structure: Use all four labelled parts (Role, Task, Context, Format). Include them for BOTH prompts.".into(),
                    missing_note: "Prompt structure: Rewrite using the FEthink structure (Role / Task / Context / Format) rather than a single paragraph.".into(),
                    detector: CategoryKind::Structure(structure),
                },
                CategoryRule {
                    tag: "Iterative AI collaboration".into(),
                    grid_key: "impact".into(),
                    strength: "You showed an iterative workflow (draft → human edit → AI review → tighten), which is how AI collaboration works in real workplaces.".into(),
                    developing_note: "AI collaboration: Show the full workflow — draft, human edit (personal example), AI review (clarity/tone/flow), then tighten the final version.".into(),
                    missing_note: "AI collaboration: Include TWO prompts and make Task 2 an editing review prompt (clarity, consistency, tone, flow) with 2–3 incorporated suggestions.".into(),
                    detector: CategoryKind::Collaboration(collaboration),
                },
                CategoryRule {
                    tag: "Clear output constraints".into(),
                    grid_key: "legal".into(),
                    strength: "You constrained the output to a one-page guide with a clear structure and practical shared-document tips.".into(),
                    developing_note: "Output quality: Constrain the AI output (title, intro + 4–5 bullets + closing summary) and specify ~300–400 words (one page).".into(),
                    missing_note: "Output quality: Specify the guide structure (title, intro, 4–5 bullets, closing summary) and include shared-document behaviours (comments, version control, track changes).".into(),
                    detector: CategoryKind::OutputQuality(quality),
                },
            ],
            bands: vec![
                Band { min_score: 8, label: "Excellent".into() },
                Band { min_score: 6, label: "Good".into() },
                Band { min_score: 3, label: "Fair".into() },
                Band { min_score: 0, label: "Vague".into() },
            ],
            gate_message: "Please add to your answer.\n\
                           This response is too short to demonstrate two complete FEthink prompts.\n\
                           Aim for 20+ words and include Role, Task, Context, and Format for BOTH Task 1 and Task 2."
                .into(),
            strong_feedback:
                "Strong submission plan — your prompts should produce a clear one-page guide.".into(),
            max_strengths: 3,
            relevance_tag: SignalRule {
                label: "Workplace relevance".into(),
                phrases: strings(COLLAB_CONTENT),
            },
            length_grid: SignalRule {
                label: "structure".into(),
                phrases: strings(LENGTH_MARKERS),
            },
            guide: GuideRules::default(),
        }
    }
}
