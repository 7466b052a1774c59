//! Static task content served to the front-end and attached to reports.

use std::collections::BTreeMap;

use serde::Serialize;

pub const TEMPLATE_TEXT: &str = "Role:\nTask:\nContext:\nFormat:";

pub const TARGET_WORDS: &str = "300–400";

pub const QUESTION_TEXT: &str = r#"
<div class="taskText">
  <h3>Task overview</h3>
  <p>You are a new team member in a busy office. Your team is creating a one-page internal guide titled <strong>“How to Use Shared Documents Effectively”</strong> for new staff. You will use <strong>AI as a collaborative partner</strong> while keeping control of the final wording.</p>

  <h3>Scenario</h3>
  <p>This activity simulates real workplace collaboration on documents like reports or guides. Follow the process from the video: <strong>draft → edit in your voice → refine with AI → review</strong>.</p>

  <h3>Your tasks</h3>

  <h4>Task 1 (Basic) — Draft + personal edit</h4>
  <ul>
    <li>Use AI to generate a <strong>first draft</strong> of the guide (short introduction + <strong>4–5 bullet tips</strong>).</li>
    <li>Edit <strong>one section in your own words</strong> to add a personal example from office life.</li>
  </ul>

  <h4>Task 2 (Advanced) — Editing focus</h4>
  <ul>
    <li>Paste your edited draft back into AI.</li>
    <li>Ask the AI to review for <strong>clarity, consistency, tone, and flow</strong> (without changing meaning).</li>
    <li>Incorporate <strong>2–3 specific AI suggestions</strong>, then ask the AI to <strong>tighten</strong> the final version (remove repetition; add a short summary).</li>
    <li>Final output should be <strong>~300–400 words</strong> (one page).</li>
  </ul>

  <h3>What you must write here</h3>
  <p>Write <strong>two FEthink prompts</strong> using the four-step structure:</p>
  <p><strong>Role → Task → Context → Format</strong></p>

  <ol>
    <li><strong>Prompt 1:</strong> for Task 1 (draft the guide)</li>
    <li><strong>Prompt 2:</strong> for Task 2 (review + improve the edited draft)</li>
  </ol>

  <p>Then paste your final one-page guide into the final guide box so it can be checked for a title, bullet tips, a closing summary and your own voice.</p>

  <h3>Output constraint</h3>
  <ul>
    <li><strong>Keep your final guide to one page (300–400 words).</strong></li>
  </ul>
</div>
"#;

pub const MODEL_ANSWER: &str = "EXEMPLARY FEthink RESPONSE (two prompts)

PROMPT 1 — Task 1 (Draft)
Role: You are a professional business writer who specialises in short staff training guides.
Task: Draft a one-page internal guide titled “How to Use Shared Documents Effectively” with (1) a brief introduction and (2) 4–5 practical bullet tips for new staff.
Context: This is for new office staff. Use simple, professional language. Focus on collaboration behaviours such as version control, comments, track changes/suggestions, naming conventions, and avoiding duplication.
Format: Title, intro paragraph (3–4 sentences), bullet list (4–5 bullets with bolded lead phrase), and a one-sentence closing summary.

PROMPT 2 — Task 2 (Edit + refine)
Role: You are a neutral editor collaborating on team documents.
Task: Review the draft I paste below for clarity, consistency, tone, and logical flow. Suggest 3–4 specific improvements WITHOUT changing meaning. Then provide a tightened final version (~300–400 words) that removes repetition and ends with a short summary sentence.
Context: Internal guide for beginners. Keep the tone professional but approachable. Preserve my personal example and keep it realistic for a busy office environment.
Format:
1) Numbered list of suggestions (Original → Revised → Reason).
2) Then “Final polished version” with the finished guide.
";

/// One "learn more" tab. Tab ids are fixed by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkTab {
    pub expectation: &'static str,
    pub case: &'static str,
}

const FRAMEWORK_TABS: [(&str, FrameworkTab); 4] = [
    (
        "gdpr",
        FrameworkTab {
            expectation: "Treat AI as a colleague: don’t accept the first draft. Critique it, ask for alternatives, and request reasoning so you can choose the best option.",
            case: "Try: “Give me 2 alternative versions with different tones (formal vs friendly). Explain which is best for new starters and why.”",
        },
    ),
    (
        "unesco",
        FrameworkTab {
            expectation: "Communicate precisely: specify role, audience, and constraints. Then iterate with clarifying questions to improve accuracy and usefulness.",
            case: "Try: “Ask me 5 questions to clarify the audience, tools (Word/Google Docs), and house style before you write the guide.”",
        },
    ),
    (
        "ofsted",
        FrameworkTab {
            expectation: "Always human-review: check facts, tone, and clarity. Your judgement is the quality filter — AI is a drafting and editing assistant.",
            case: "Try: “List 5 risks in this draft (ambiguity, jargon, wrong assumptions). Suggest fixes while keeping the meaning the same.”",
        },
    ),
    (
        "jisc",
        FrameworkTab {
            expectation: "Combine strengths: use AI for speed (drafts/reviews) and use your expertise for context, examples, and final decisions.",
            case: "Try: “Tighten this text by removing repetition and shortening sentences, but keep my personal example unchanged.”",
        },
    ),
];

pub type Framework = BTreeMap<&'static str, FrameworkTab>;

pub fn framework() -> Framework {
    FRAMEWORK_TABS.into_iter().collect()
}
