// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar with file persistence
//!
//! Cookies live in a thread-safe in-memory store and are mirrored to a
//! jar file as JSON after every response, so a session survives for as
//! long as the jar file does.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// A single HTTP cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to
    pub domain: String,
    /// Path the cookie is valid for
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
    /// SameSite attribute
    pub same_site: SameSite,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    /// Cookie sent with all requests
    #[default]
    None,
    /// Cookie sent with same-site and top-level navigations
    Lax,
    /// Cookie only sent with same-site requests
    Strict,
}

impl Cookie {
    /// Create a new session cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Set the SameSite attribute
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp < Utc::now())
    }

    /// Check if the cookie should be sent for the given URL
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("");
        self.domain_matches(host)
            && url.path().starts_with(&self.path)
            && (!self.secure || url.scheme() == "https")
            && !self.is_expired()
    }

    fn domain_matches(&self, host: &str) -> bool {
        if self.domain.is_empty() {
            return true;
        }
        let domain = self.domain.trim_start_matches('.');
        host == domain || host.ends_with(&format!(".{}", domain))
    }

    /// Parse a Set-Cookie header value. The request URL supplies the
    /// default domain when the header names none.
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.trim().split_once('=')?;

        let mut cookie = Cookie::new(name.trim(), value.trim())
            .domain(url.host_str().unwrap_or("").to_string());

        for part in parts {
            let part = part.trim();
            match part.split_once('=') {
                Some((attr, val)) => {
                    let val = val.trim();
                    match attr.trim().to_lowercase().as_str() {
                        "domain" => cookie.domain = val.trim_start_matches('.').to_string(),
                        "path" => cookie.path = val.to_string(),
                        "expires" => {
                            if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
                                cookie.expires = Some(dt.with_timezone(&Utc));
                            }
                        }
                        "max-age" => {
                            if let Ok(secs) = val.parse::<i64>() {
                                cookie.expires = Some(Utc::now() + chrono::Duration::seconds(secs));
                            }
                        }
                        "samesite" => {
                            cookie.same_site = match val.to_lowercase().as_str() {
                                "strict" => SameSite::Strict,
                                "lax" => SameSite::Lax,
                                _ => SameSite::None,
                            };
                        }
                        _ => {}
                    }
                }
                None => match part.to_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                },
            }
        }

        Some(cookie)
    }

    /// Render as a `name=value` Cookie header fragment
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Thread-safe cookie storage keyed by domain
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Arc<DashMap<String, Vec<Cookie>>>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie, replacing any existing cookie with the same name and path
    pub fn add(&self, cookie: Cookie) {
        let mut entry = self.cookies.entry(cookie.domain.clone()).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        entry.push(cookie);
    }

    /// Add a cookie from a Set-Cookie header
    pub fn add_from_header(&self, header: &str, url: &Url) {
        if let Some(cookie) = Cookie::parse(header, url) {
            self.add(cookie);
        }
    }

    /// Collect the cookies that apply to a URL
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        let mut result = Vec::new();
        for entry in self.cookies.iter() {
            for cookie in entry.value() {
                if cookie.matches(url) {
                    result.push(cookie.clone());
                }
            }
        }
        self.remove_expired();
        result
    }

    /// Build the Cookie header value for a URL, if any cookie applies
    pub fn get_cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.get_cookies(url);
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(Cookie::to_header_value)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.clear();
    }

    /// Total cookie count
    pub fn len(&self) -> usize {
        self.cookies.iter().map(|e| e.value().len()).sum()
    }

    /// Check if the jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove_expired(&self) {
        for mut entry in self.cookies.iter_mut() {
            entry.value_mut().retain(|c| !c.is_expired());
        }
    }

    /// Load a jar from a JSON file. A missing or empty file loads as an
    /// empty jar; malformed content is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let jar = CookieJar::new();
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(jar),
            Err(err) => return Err(Error::Io(err)),
        };
        if data.trim().is_empty() {
            return Ok(jar);
        }
        let cookies: Vec<Cookie> = serde_json::from_str(&data)
            .map_err(|e| Error::cookie(format!("malformed cookie jar {}: {}", path.display(), e)))?;
        for cookie in cookies {
            jar.add(cookie);
        }
        Ok(jar)
    }

    /// Write the jar to a JSON file, replacing its contents
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let all: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|e| e.value().clone())
            .collect();
        let json = serde_json::to_string(&all)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_parsing() {
        let url = Url::parse("https://example.com/path").unwrap();
        let header = "session=abc123; Domain=example.com; Path=/; Secure; HttpOnly";
        let cookie = Cookie::parse(header, &url).unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path, "/");
        assert!(cookie.secure);
        assert!(cookie.http_only);
    }

    #[test]
    fn test_same_site_parsing() {
        let url = Url::parse("https://example.com/").unwrap();

        let strict = Cookie::parse("k=v; SameSite=Strict", &url).unwrap();
        assert_eq!(strict.same_site, SameSite::Strict);

        let lax = Cookie::parse("k=v; SameSite=Lax", &url).unwrap();
        assert_eq!(lax.same_site, SameSite::Lax);

        let absent = Cookie::parse("k=v", &url).unwrap();
        assert_eq!(absent.same_site, SameSite::None);
    }

    #[test]
    fn test_same_site_survives_jar_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jar.json");

        let jar = CookieJar::new();
        jar.add(
            Cookie::new("sid", "abc")
                .domain("example.com")
                .same_site(SameSite::Strict),
        );
        jar.save_to(&path).unwrap();

        let loaded = CookieJar::load_from(&path).unwrap();
        let url = Url::parse("https://example.com/").unwrap();
        let cookies = loaded.get_cookies(&url);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].same_site, SameSite::Strict);
    }

    #[test]
    fn test_default_domain_from_url() {
        let url = Url::parse("http://sub.example.com/").unwrap();
        let cookie = Cookie::parse("k=v", &url).unwrap();
        assert_eq!(cookie.domain, "sub.example.com");
    }

    #[test]
    fn test_secure_cookie_not_sent_over_http() {
        let https = Url::parse("https://example.com/").unwrap();
        let http = Url::parse("http://example.com/").unwrap();
        let cookie = Cookie::parse("k=v; Secure", &https).unwrap();
        assert!(cookie.matches(&https));
        assert!(!cookie.matches(&http));
    }

    #[test]
    fn test_jar_add_and_match() {
        let jar = CookieJar::new();
        let url = Url::parse("https://example.com/path").unwrap();

        jar.add(Cookie::new("test", "value").domain("example.com"));
        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get_cookie_header(&url).unwrap(), "test=value");
    }

    #[test]
    fn test_jar_replaces_same_name_and_path() {
        let jar = CookieJar::new();
        jar.add(Cookie::new("sid", "one").domain("example.com"));
        jar.add(Cookie::new("sid", "two").domain("example.com"));
        assert_eq!(jar.len(), 1);

        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(jar.get_cookie_header(&url).unwrap(), "sid=two");
    }

    #[test]
    fn test_expired_cookie_dropped() {
        let jar = CookieJar::new();
        let past = Utc::now() - chrono::Duration::hours(1);
        jar.add(Cookie::new("old", "x").domain("example.com").expires(past));

        let url = Url::parse("https://example.com/").unwrap();
        assert!(jar.get_cookie_header(&url).is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jar.json");

        let jar = CookieJar::new();
        jar.add(Cookie::new("sid", "abc").domain("example.com"));
        jar.save_to(&path).unwrap();

        let loaded = CookieJar::load_from(&path).unwrap();
        assert_eq!(loaded.len(), 1);

        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(loaded.get_cookie_header(&url).unwrap(), "sid=abc");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let jar = CookieJar::load_from(&dir.path().join("absent.json")).unwrap();
        assert!(jar.is_empty());
    }
}
