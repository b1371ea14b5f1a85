// src/session.rs

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "diary_session";

/// Per-browser state for the admin page.
#[derive(Debug, Clone)]
pub struct Session {
    pub is_admin: bool,
    pub csrf: String,
}

impl Session {
    fn new() -> Self {
        Session {
            is_admin: false,
            csrf: new_token(),
        }
    }
}

/// A session looked up (or started) for one request.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: String,
    pub session: Session,
    /// The id is new and must be sent back in a cookie.
    pub fresh: bool,
}

/// How long an untouched session is kept.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug)]
struct Slot {
    session: Session,
    last_seen: Instant,
}

/// Process-wide session table. Lost on restart, which only logs the admin out.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Slot>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Find the cookie's session or start a new one.
    pub fn load_or_create(&self, headers: &HeaderMap) -> SessionHandle {
        self.load_or_create_at(headers, Instant::now())
    }

    fn load_or_create_at(&self, headers: &HeaderMap, now: Instant) -> SessionHandle {
        let mut table = self.table();
        if let Some(id) = cookie_value(headers, SESSION_COOKIE) {
            if let Some(slot) = table.get_mut(&id) {
                if now.saturating_duration_since(slot.last_seen) < self.idle_timeout {
                    slot.last_seen = now;
                    return SessionHandle {
                        id,
                        session: slot.session.clone(),
                        fresh: false,
                    };
                }
            }
        }

        // 只有新建会话会让表增长，在这里清理过期会话
        let before = table.len();
        let timeout = self.idle_timeout;
        table.retain(|_, slot| now.saturating_duration_since(slot.last_seen) < timeout);
        let evicted = before - table.len();
        if evicted > 0 {
            debug!(evicted, remaining = table.len(), "idle sessions evicted");
        }

        let id = new_token();
        let session = Session::new();
        table.insert(
            id.clone(),
            Slot {
                session: session.clone(),
                last_seen: now,
            },
        );
        SessionHandle {
            id,
            session,
            fresh: true,
        }
    }

    /// Mark the session as admin and move it to a new id. Returns the new id.
    pub fn promote(&self, old_id: &str) -> String {
        let mut table = self.table();
        let mut session = table
            .remove(old_id)
            .map(|slot| slot.session)
            .unwrap_or_else(Session::new);
        session.is_admin = true;
        let id = new_token();
        table.insert(
            id.clone(),
            Slot {
                session,
                last_seen: Instant::now(),
            },
        );
        id
    }

    pub fn destroy(&self, id: &str) {
        self.table().remove(id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table().len()
    }
}

/// 32 hex characters from a random v4 uuid.
pub fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expired_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Value of the named cookie in the `Cookie` request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

/// Compare two byte strings without stopping at the first difference.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// A submitted token must be non-empty and equal the session's token.
pub fn csrf_matches(session: &Session, submitted: &str) -> bool {
    !submitted.is_empty() && constant_time_eq(session.csrf.as_bytes(), submitted.as_bytes())
}

/// Lowercase hex SHA-256 of the password.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn verify_password(password: &str, expected_hash: Option<&str>) -> bool {
    match expected_hash {
        Some(expected) => constant_time_eq(hash_password(password).as_bytes(), expected.as_bytes()),
        None => false,
    }
}
