//! Netscape cookie file support.
//!
//! The volume feed only lists downloadable entries for logged-in sessions, so
//! the HTTP session can be seeded from a browser cookie export.

use reqwest::Url;
use reqwest::cookie::Jar;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Number of tab separated columns in a cookie line.
const COLUMN_COUNT: usize = 7;

/// Errors that can occur while loading cookies.
#[derive(Error, Debug)]
pub enum CookieError {
    #[error("Failed to read cookie file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid Netscape cookie line {line}: expected 7 tab separated columns")]
    InvalidLine { line: usize },

    #[error("Invalid cookie domain: {0}")]
    InvalidDomain(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CookieLine {
    domain: String,
    host_only: bool,
    path: String,
    secure: bool,
    http_only: bool,
    expires: Option<u64>,
    name: String,
    value: String,
}

impl CookieLine {
    fn is_expired(&self, now: u64) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }

    /// Renders the entry as a `Set-Cookie` header value.
    fn to_set_cookie(&self) -> String {
        let mut header = format!("{}={}; Path={}", self.name, self.value, self.path);
        if !self.host_only {
            header.push_str("; Domain=");
            header.push_str(&self.domain);
        }
        if self.secure {
            header.push_str("; Secure");
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        header
    }
}

/// Reads a cookie file and returns a jar holding its unexpired entries.
pub fn load_cookie_jar(path: &Path) -> Result<Jar, CookieError> {
    let content = std::fs::read_to_string(path)?;
    let jar = Jar::default();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut loaded = 0usize;
    for cookie in parse_cookie_lines(&content)? {
        if cookie.is_expired(now) {
            continue;
        }

        let host = cookie.domain.trim_start_matches('.');
        let url = Url::parse(&format!("https://{}/", host))
            .map_err(|_| CookieError::InvalidDomain(cookie.domain.clone()))?;
        jar.add_cookie_str(&cookie.to_set_cookie(), &url);
        loaded += 1;
    }

    log::debug!("loaded {} cookies from {}", loaded, path.display());
    Ok(jar)
}

fn parse_cookie_lines(content: &str) -> Result<Vec<CookieLine>, CookieError> {
    let mut cookies = Vec::new();

    for (number, raw) in content.lines().enumerate() {
        let trimmed = raw.trim();
        let (http_only, line) = match trimmed.strip_prefix("#HttpOnly_") {
            Some(rest) => (true, rest),
            None if trimmed.is_empty() || trimmed.starts_with('#') => continue,
            None => (false, trimmed),
        };

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != COLUMN_COUNT || columns[0].trim_start_matches('.').is_empty() {
            return Err(CookieError::InvalidLine { line: number + 1 });
        }

        cookies.push(CookieLine {
            domain: columns[0].to_string(),
            host_only: !columns[1].eq_ignore_ascii_case("TRUE"),
            path: columns[2].to_string(),
            secure: columns[3].eq_ignore_ascii_case("TRUE"),
            http_only,
            expires: columns[4].parse::<u64>().ok().filter(|&ts| ts != 0),
            name: columns[5].to_string(),
            value: columns[6].to_string(),
        });
    }

    Ok(cookies)
}
