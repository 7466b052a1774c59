//! Access-code check and signed session cookie.
//!
//! The cookie value is `<expires_unix>.<hex hmac>`, where the HMAC-SHA256 is
//! keyed with the server secret. Both the access code and the cookie
//! signature are compared with `Mac::verify_slice`, which is constant time.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const COOKIE_NAME: &str = "fethink_session";

const ACCESS_CODE_DOMAIN: &[u8] = b"access-code:";
const SESSION_DOMAIN: &[u8] = b"session:ok:";

/// Longest accepted session lifetime (one year).
pub const MAX_SESSION_MINUTES: i64 = 525_600;

pub struct SessionGate {
    secret: Vec<u8>,
    access_code_tag: Vec<u8>,
    ttl: Duration,
    secure: bool,
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("ttl_minutes", &self.ttl.num_minutes())
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionGate {
    pub fn new(secret: &[u8], access_code: &str, ttl_minutes: i64, secure: bool) -> Self {
        let mut gate = Self {
            secret: secret.to_vec(),
            access_code_tag: Vec::new(),
            ttl: Duration::minutes(ttl_minutes.clamp(1, MAX_SESSION_MINUTES)),
            secure,
        };
        gate.access_code_tag = gate.code_mac(access_code).finalize().into_bytes().to_vec();
        gate
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size")
    }

    fn code_mac(&self, code: &str) -> HmacSha256 {
        let mut mac = self.mac();
        mac.update(ACCESS_CODE_DOMAIN);
        mac.update(code.as_bytes());
        mac
    }

    fn session_mac(&self, expires: i64) -> HmacSha256 {
        let mut mac = self.mac();
        mac.update(SESSION_DOMAIN);
        mac.update(expires.to_string().as_bytes());
        mac
    }

    /// Constant-time comparison against the configured access code.
    pub fn check_access_code(&self, code: &str) -> bool {
        self.code_mac(code)
            .verify_slice(&self.access_code_tag)
            .is_ok()
    }

    pub fn issue_token(&self, now: DateTime<Utc>) -> String {
        let expires = (now + self.ttl).timestamp();
        let sig = self.session_mac(expires).finalize().into_bytes();
        format!("{expires}.{}", hex::encode(sig))
    }

    pub fn verify_token(&self, token: &str, now: DateTime<Utc>) -> bool {
        let Some((expires, sig)) = token.split_once('.') else {
            return false;
        };
        let Ok(expires) = expires.parse::<i64>() else {
            return false;
        };
        let Ok(sig) = hex::decode(sig) else {
            return false;
        };
        if self.session_mac(expires).verify_slice(&sig).is_err() {
            return false;
        }
        now.timestamp() < expires
    }

    /// True when the request carries a valid, unexpired session cookie.
    pub fn is_authorized(&self, headers: &HeaderMap, now: DateTime<Utc>) -> bool {
        cookie_value(headers, COOKIE_NAME).is_some_and(|token| self.verify_token(token, now))
    }

    pub fn set_cookie(&self, now: DateTime<Utc>) -> String {
        let expires = now + self.ttl;
        format!(
            "{COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}; Expires={}{}",
            self.issue_token(now),
            self.ttl.num_seconds(),
            expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            if self.secure { "; Secure" } else { "" }
        )
    }

    pub fn clear_cookie(&self) -> String {
        format!(
            "{COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT{}",
            if self.secure { "; Secure" } else { "" }
        )
    }
}

/// Value of the named cookie across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}
