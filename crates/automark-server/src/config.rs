use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use automark_core::Rubric;
use rand::RngCore;

use crate::cli::ServeArgs;
use crate::session::MAX_SESSION_MINUTES;

/// Resolved service configuration. Everything the service needs is
/// injected from here; there is no process-wide state.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub access_code: String,
    pub cookie_secret: Vec<u8>,
    pub session_minutes: i64,
    pub secure_cookies: bool,
    pub course_back_url: String,
    pub next_lesson_url: String,
    pub rubric: Rubric,
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_args(args: ServeArgs) -> anyhow::Result<Self> {
        let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", args.bind, args.port))?;

        let rubric = match &args.rubric {
            Some(path) => {
                let rubric = Rubric::from_path(path)?;
                tracing::info!(path = %path.display(), "loaded rubric");
                rubric
            }
            None => Rubric::default(),
        };

        let cookie_secret = match args.cookie_secret.filter(|s| !s.is_empty()) {
            Some(secret) => secret.into_bytes(),
            None => {
                tracing::warn!(
                    "COOKIE_SECRET not set; generated an ephemeral secret, sessions end on restart"
                );
                random_secret()
            }
        };

        if args.access_code.trim().is_empty() {
            anyhow::bail!("access code must not be empty");
        }

        if !(1..=MAX_SESSION_MINUTES).contains(&args.session_minutes) {
            anyhow::bail!(
                "session minutes must be between 1 and {MAX_SESSION_MINUTES}, got {}",
                args.session_minutes
            );
        }

        Ok(Self {
            addr,
            access_code: args.access_code,
            cookie_secret,
            session_minutes: args.session_minutes,
            secure_cookies: !args.insecure_cookies,
            course_back_url: args.course_back_url,
            next_lesson_url: args.next_lesson_url,
            rubric,
            static_dir: args.static_dir,
        })
    }
}

fn random_secret() -> Vec<u8> {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes).into_bytes()
}
