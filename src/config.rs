// src/config.rs

use crate::cli::ServeArgs;
use crate::db;
use crate::error::{DiaryError, Result};
use chrono::FixedOffset;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;

/// Runtime settings for `serve`, validated once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub listen: SocketAddr,
    pub db_path: PathBuf,
    /// Lowercase hex SHA-256 of the admin password. `None` disables login.
    pub admin_password_hash: Option<String>,
    pub utc_offset: FixedOffset,
    pub page_size: usize,
}

impl Settings {
    pub fn from_args(args: &ServeArgs) -> Result<Self> {
        let db_path = match &args.db {
            Some(p) => p.clone(),
            None => db::get_db_path()?,
        };

        let admin_password_hash = match args.admin_password_hash.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(h) => Some(parse_password_hash(h)?),
        };

        if args.page_size == 0 {
            return Err(DiaryError::InvalidInput(
                "page size must be at least 1".to_string(),
            ));
        }

        Ok(Settings {
            listen: parse_listen(&args.listen)?,
            db_path,
            admin_password_hash,
            utc_offset: parse_utc_offset(&args.utc_offset)?,
            page_size: args.page_size,
        })
    }
}

/// Accepts `ip:port`, a bare `ip` (default port) or `localhost:port`.
pub fn parse_listen(input: &str) -> Result<SocketAddr> {
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    if let Some((host, port_str)) = input.rsplit_once(':') {
        if host == "localhost" {
            let port: u16 = port_str.parse().map_err(|_| {
                DiaryError::InvalidInput(format!(
                    "invalid listen address '{input}': bad port. Example: 127.0.0.1:{DEFAULT_PORT}"
                ))
            })?;
            return Ok(SocketAddr::from(([127, 0, 0, 1], port)));
        }
    }

    Err(DiaryError::InvalidInput(format!(
        "invalid listen address '{input}'. Example: 127.0.0.1:{DEFAULT_PORT}"
    )))
}

/// Parses `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
pub fn parse_utc_offset(input: &str) -> Result<FixedOffset> {
    let invalid = || DiaryError::InvalidInput(format!("invalid UTC offset '{input}'. Example: +09:00"));

    let s = input.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match s.chars().next() {
        Some('+') => (1, &s[1..]),
        Some('-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) || rest.len() > 5 {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn parse_password_hash(input: &str) -> Result<String> {
    let decoded = hex::decode(input).map_err(|_| {
        DiaryError::InvalidInput("admin password hash must be hex (see `diary hash-password`)".to_string())
    })?;
    if decoded.len() != 32 {
        return Err(DiaryError::InvalidInput(
            "admin password hash must be a 64 character SHA-256 digest".to_string(),
        ));
    }
    Ok(hex::encode(decoded))
}
