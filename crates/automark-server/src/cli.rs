use std::path::{Path, PathBuf};

use anyhow::Context;
use automark_core::{
    clamp_chars, mark, Rubric, WorkflowEvidence, MAX_ANSWER_CHARS, MAX_GUIDE_CHARS,
};
use clap::{Args, Parser, Subcommand};

use crate::config::ServerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "automark",
    version,
    about = "Deterministic automarker for FEthink writing tasks"
)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "AUTOMARK_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the session-gated HTTP service
    Serve(ServeArgs),
    /// Score an answer (and optional final guide) from files and print JSON
    Mark(MarkArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "ACCESS_CODE", default_value = "FETHINK-COLLAB-01")]
    pub access_code: String,

    /// Cookie signing secret. A random one is generated when unset, which
    /// invalidates sessions on restart.
    #[arg(long, env = "COOKIE_SECRET", hide_env_values = true)]
    pub cookie_secret: Option<String>,

    #[arg(long, env = "SESSION_MINUTES", default_value_t = 120)]
    pub session_minutes: i64,

    #[arg(long, env = "COURSE_BACK_URL", default_value = "")]
    pub course_back_url: String,

    #[arg(long, env = "NEXT_LESSON_URL", default_value = "")]
    pub next_lesson_url: String,

    /// YAML rubric replacing the built-in one
    #[arg(long, env = "AUTOMARK_RUBRIC")]
    pub rubric: Option<PathBuf>,

    /// Directory with the front-end, served at `/`
    #[arg(long, env = "AUTOMARK_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Drop the `Secure` cookie attribute (plain-http local testing)
    #[arg(long, env = "AUTOMARK_INSECURE_COOKIES")]
    pub insecure_cookies: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MarkArgs {
    /// File with the two-prompt answer
    #[arg(long)]
    pub answer: PathBuf,

    /// File with the final one-page guide
    #[arg(long)]
    pub guide: Option<PathBuf>,

    /// JSON file with workflow evidence
    #[arg(long)]
    pub evidence: Option<PathBuf>,

    /// YAML rubric replacing the built-in one
    #[arg(long)]
    pub rubric: Option<PathBuf>,
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Serve(args) => {
            let cfg = ServerConfig::from_args(args)?;
            crate::api::serve(cfg).await?;
            Ok(0)
        }
        Command::Mark(args) => {
            let out = run_mark(&args)?;
            println!("{out}");
            Ok(0)
        }
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Offline scoring with the same clamping as the HTTP endpoint.
pub fn run_mark(args: &MarkArgs) -> anyhow::Result<String> {
    let rubric = match &args.rubric {
        Some(path) => Rubric::from_path(path)?,
        None => Rubric::default(),
    };
    let answer = read(&args.answer)?;
    let guide = match &args.guide {
        Some(path) => read(path)?,
        None => String::new(),
    };
    let evidence = match &args.evidence {
        Some(path) => {
            let raw = read(path)?;
            let v: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("invalid evidence JSON in {}", path.display()))?;
            WorkflowEvidence::from_json(&v)
        }
        None => None,
    };

    let result = mark(
        &rubric,
        clamp_chars(&answer, MAX_ANSWER_CHARS),
        clamp_chars(&guide, MAX_GUIDE_CHARS),
        evidence.as_ref(),
    );
    tracing::info!(
        gated = result.answer.gated,
        score = ?result.answer.score,
        guide_score = ?result.guide.guide_score,
        "marked files"
    );
    Ok(serde_json::to_string_pretty(&result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_defaults() {
        let cli = Cli::try_parse_from(["automark", "serve", "--port", "8080"]).unwrap();
        let Command::Serve(args) = cli.cmd else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 8080);
        assert_eq!(args.session_minutes, 120);
        assert!(!args.insecure_cookies);
    }

    #[test]
    fn mark_command_scores_files() {
        let dir = tempfile::tempdir().unwrap();
        let answer = dir.path().join("answer.txt");
        std::fs::write(&answer, vec!["word"; 25].join(" ")).unwrap();
        let evidence = dir.path().join("evidence.json");
        std::fs::write(
            &evidence,
            r#"{"similarityPct": 50, "prompt2WordCount": 40, "didRefine": true}"#,
        )
        .unwrap();

        let out = run_mark(&MarkArgs {
            answer,
            guide: None,
            evidence: Some(evidence),
            rubric: None,
        })
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        // 3 + 10 + 3 = 16 -> round(5.33) = 5
        assert_eq!(v["score"], 5);
        assert_eq!(v["band"], "Fair");
        assert_eq!(v["guideGated"], true);
    }

    #[test]
    fn mark_command_reports_missing_file() {
        let err = run_mark(&MarkArgs {
            answer: PathBuf::from("/definitely/not/here.txt"),
            guide: None,
            evidence: None,
            rubric: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
