//! Final-guide scorer: five independent checks on the learner's finished
//! one-page guide.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::RubricError;
use crate::report::{FinalGuideReport, GuideChecks};
use crate::rubric::Rubric;
use crate::text::word_count;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideRules {
    pub min_words: usize,
    /// Guides longer than this lose `overlength_penalty` points once.
    pub max_words: usize,
    pub min_bullets: usize,
    pub min_words_check: usize,
    pub points_per_check: u32,
    pub overlength_penalty: u32,
    pub bullet_pattern: String,
    pub summary_pattern: String,
    pub pronoun_pattern: String,
    pub gate_message: String,
    pub title_note: String,
    pub bullets_note: String,
    pub summary_note: String,
    pub pronoun_note: String,
    pub min_words_note: String,
    pub overlength_note: String,
    #[serde(skip)]
    compiled: CompiledPatterns,
}

impl Default for GuideRules {
    fn default() -> Self {
        Self {
            min_words: 300,
            max_words: 400,
            min_bullets: 4,
            min_words_check: 50,
            points_per_check: 2,
            overlength_penalty: 1,
            bullet_pattern: r"(?m)^[ \t]*(?:[-*•–]|\d+[.)])[ \t]+\S".into(),
            summary_pattern: r"\b(summary|in summary|to summari[sz]e|in conclusion|overall|finally)\b".into(),
            pronoun_pattern: r"\b(i|me|my|mine|i'm|i've|we|our|us)\b".into(),
            gate_message: "Please add to your final guide.\n\
                           It needs at least 300 words before it can be checked as a one-page guide (aim for 300–400)."
                .into(),
            title_note: "Title: Put the guide title on its own first line.".into(),
            bullets_note: "Bullets: Include 4–5 practical tips as a bulleted or numbered list.".into(),
            summary_note: "Closing: End with a short summary sentence.".into(),
            pronoun_note: "Your voice: Add your personal example from office life (I / my / we).".into(),
            min_words_note: "Length: Write a full one-page guide.".into(),
            overlength_note: "Length: Tighten the guide to 400 words or fewer.".into(),
            compiled: CompiledPatterns::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct Patterns {
    bullets: Regex,
    summary: Regex,
    pronoun: Regex,
}

/// Regexes built from the pattern strings, filled by the first successful
/// compile. Ignored by equality so rubrics compare by their data.
#[derive(Debug, Clone, Default)]
struct CompiledPatterns(OnceLock<Patterns>);

impl PartialEq for CompiledPatterns {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

fn compile(pattern: &str) -> Result<Regex, RubricError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| RubricError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

impl GuideRules {
    /// Compiled patterns, built on first use and reused afterwards. The
    /// pattern strings must not change once this has succeeded.
    fn patterns(&self) -> Result<&Patterns, RubricError> {
        if let Some(p) = self.compiled.0.get() {
            return Ok(p);
        }
        let built = Patterns {
            bullets: compile(&self.bullet_pattern)?,
            summary: compile(&self.summary_pattern)?,
            pronoun: compile(&self.pronoun_pattern)?,
        };
        Ok(self.compiled.0.get_or_init(|| built))
    }

    pub fn validate(&self) -> Result<(), RubricError> {
        if self.max_words < self.min_words {
            return Err(RubricError::invalid(
                "guide max_words must not be below min_words",
            ));
        }
        self.patterns().map(|_| ())
    }

    pub fn checks(&self, text: &str) -> GuideChecks {
        let wc = word_count(text);
        // `validate` compiles the patterns at load, so this only fails for
        // rules that skipped it.
        let (bullet_count, has_summary, has_personal_voice) = match self.patterns() {
            Ok(p) => (
                p.bullets.find_iter(text).count(),
                p.summary.is_match(text),
                p.pronoun.is_match(text),
            ),
            Err(err) => {
                tracing::warn!(error = %err, "guide patterns failed to compile");
                (0, false, false)
            }
        };
        GuideChecks {
            has_title: has_title(text),
            bullet_count,
            has_bullets: bullet_count >= self.min_bullets,
            has_summary,
            has_personal_voice,
            meets_min_words: wc >= self.min_words_check,
        }
    }
}

/// A title is a non-empty first line followed by more content.
fn has_title(text: &str) -> bool {
    let t = text.trim();
    t.find('\n')
        .is_some_and(|idx| !t[..idx].trim().is_empty())
}

/// Score the final guide. Guides under the word gate get no score.
pub fn score_final_guide(rubric: &Rubric, guide_text: &str) -> FinalGuideReport {
    let rules = &rubric.guide;
    let wc = word_count(guide_text);

    if wc < rules.min_words {
        return FinalGuideReport {
            guide_gated: true,
            guide_word_count: wc,
            guide_message: Some(rules.gate_message.clone()),
            guide_score: None,
            guide_band: None,
            guide_checks: None,
            guide_feedback: None,
        };
    }

    let checks = rules.checks(guide_text);
    let over_length = wc > rules.max_words;
    let mut score = checks.passed() * rules.points_per_check;
    if over_length {
        score = score.saturating_sub(rules.overlength_penalty);
    }
    let score = score.min(10);
    let band = rubric.band_for(score).to_string();

    let mut notes: Vec<&str> = Vec::new();
    if !checks.has_title {
        notes.push(&rules.title_note);
    }
    if !checks.has_bullets {
        notes.push(&rules.bullets_note);
    }
    if !checks.has_summary {
        notes.push(&rules.summary_note);
    }
    if !checks.has_personal_voice {
        notes.push(&rules.pronoun_note);
    }
    if !checks.meets_min_words {
        notes.push(&rules.min_words_note);
    }
    if over_length {
        notes.push(&rules.overlength_note);
    }

    let feedback = if notes.is_empty() {
        format!("Final guide: all checks met. Band: {band} ({score}/10).")
    } else {
        format!(
            "To improve your final guide (Band: {band} • {score}/10):\n- {}",
            notes.join("\n- ")
        )
    };

    tracing::debug!(
        word_count = wc,
        score,
        passed = checks.passed(),
        over_length,
        "scored final guide"
    );

    FinalGuideReport {
        guide_gated: false,
        guide_word_count: wc,
        guide_message: None,
        guide_score: Some(score),
        guide_band: Some(band),
        guide_checks: Some(checks),
        guide_feedback: Some(feedback),
    }
}
