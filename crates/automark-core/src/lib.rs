//! Deterministic, keyword-based automarker for the FEthink shared-documents task.
//!
//! The scorer is a pure function over the submitted text, optional
//! client-reported workflow evidence and a [`Rubric`]. Nothing here performs
//! I/O except [`Rubric::from_path`].

pub mod content;
pub mod criteria;
pub mod error;
pub mod guide;
pub mod report;
pub mod rubric;
pub mod scorer;
pub mod text;

pub use error::RubricError;
pub use guide::{score_final_guide, GuideRules};
pub use report::{
    FinalGuideReport, GridStatus, GuideChecks, MarkResult, ScoreReport, Tag, TagStatus,
};
pub use rubric::{Band, CategoryKind, CategoryRule, Rubric};
pub use scorer::{mark, score_answer, WorkflowEvidence};
pub use text::{clamp_chars, word_count};

/// Maximum accepted answer length in chars.
pub const MAX_ANSWER_CHARS: usize = 6000;
/// Maximum accepted final-guide length in chars.
pub const MAX_GUIDE_CHARS: usize = 8000;
