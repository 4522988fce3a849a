// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration
//!
//! A fixed record of recognized fields with constant defaults. Overrides
//! arrive either through the builder-style setters or as a loose JSON map;
//! the map path keeps the historical contract: recognized keys overwrite,
//! unknown keys are logged and ignored, nothing ever fails.

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pre-request throttle
///
/// `Fixed(0)` disables the throttle. `Range(min, max)` sleeps a uniformly
/// random whole number of seconds in the inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Delay {
    /// Fixed number of whole seconds
    Fixed(u64),
    /// Random whole seconds in `[min, max]`
    Range(u64, u64),
}

impl Default for Delay {
    fn default() -> Self {
        Delay::Fixed(0)
    }
}

impl Delay {
    /// Check whether the throttle is disabled
    pub fn is_off(&self) -> bool {
        matches!(self, Delay::Fixed(0))
    }

    /// Pick the number of seconds to sleep for one request
    pub fn sample(&self) -> u64 {
        match *self {
            Delay::Fixed(secs) => secs,
            Delay::Range(min, max) => {
                if min >= max {
                    min
                } else {
                    rand::rng().random_range(min..=max)
                }
            }
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Default request headers as ordered "Name: value" lines
    pub headers: Vec<String>,
    /// Accepted response content encoding (sent as `Accept-Encoding`)
    pub content_encoding: String,
    /// Filename prefix for the cookie jar files
    pub cookie_prefix: String,
    /// Set `Referer` automatically when following redirects
    pub auto_referer: bool,
    /// Return the response body; when false the body is read and discarded
    /// and calls return an empty string
    pub return_body: bool,
    /// Follow HTTP redirects
    pub follow_redirects: bool,
    /// Throttle applied before every request
    pub delay: Delay,
    /// Echo request/response headers through the debug log sink
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            headers: vec![
                // IE 9
                "User-Agent: Mozilla/5.0 (compatible; MSIE 9.0; Windows NT 6.1; WOW64; Trident/5.0)"
                    .to_string(),
                "Accept-Language: it-IT".to_string(),
                "Accept-Encoding: gzip,deflate,sdch".to_string(),
            ],
            content_encoding: "gzip".to_string(),
            cookie_prefix: String::new(),
            auto_referer: true,
            return_body: true,
            follow_redirects: false,
            delay: Delay::default(),
            debug: true,
        }
    }
}

impl ClientConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default header lines
    pub fn headers(mut self, headers: Vec<String>) -> Self {
        self.headers = headers;
        self
    }

    /// Add a header line
    pub fn header(mut self, line: impl Into<String>) -> Self {
        self.headers.push(line.into());
        self
    }

    /// Set the accepted content encoding
    pub fn content_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.content_encoding = encoding.into();
        self
    }

    /// Set the cookie jar filename prefix
    pub fn cookie_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cookie_prefix = prefix.into();
        self
    }

    /// Enable/disable automatic referer on redirects
    pub fn auto_referer(mut self, enabled: bool) -> Self {
        self.auto_referer = enabled;
        self
    }

    /// Enable/disable returning the response body
    pub fn return_body(mut self, enabled: bool) -> Self {
        self.return_body = enabled;
        self
    }

    /// Enable/disable following redirects
    pub fn follow_redirects(mut self, enabled: bool) -> Self {
        self.follow_redirects = enabled;
        self
    }

    /// Set the pre-request throttle
    pub fn delay(mut self, delay: Delay) -> Self {
        self.delay = delay;
        self
    }

    /// Enable/disable debug echo
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Merge a loose override map into this config.
    ///
    /// Recognized keys overwrite the stored value. Unknown keys and values
    /// of the wrong shape are logged at debug level and ignored. The field
    /// set never changes; this cannot fail.
    pub fn apply_overrides(&mut self, overrides: &serde_json::Map<String, Value>) {
        for (key, value) in overrides {
            match key.as_str() {
                "headers" => set_field(&mut self.headers, key, value),
                "content_encoding" => set_field(&mut self.content_encoding, key, value),
                "cookie_prefix" => set_field(&mut self.cookie_prefix, key, value),
                "auto_referer" => set_field(&mut self.auto_referer, key, value),
                "return_body" => set_field(&mut self.return_body, key, value),
                "follow_redirects" => set_field(&mut self.follow_redirects, key, value),
                "delay" => set_field(&mut self.delay, key, value),
                "debug" => set_field(&mut self.debug, key, value),
                _ => tracing::debug!("{}: invalid configuration option", key),
            }
        }
    }

    /// Build a config from defaults plus a loose override map
    pub fn from_overrides(overrides: &serde_json::Map<String, Value>) -> Self {
        let mut config = Self::default();
        config.apply_overrides(overrides);
        config
    }
}

fn set_field<T: DeserializeOwned>(slot: &mut T, key: &str, value: &Value) {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => *slot = parsed,
        Err(err) => tracing::debug!("{}: invalid configuration value ({})", key, err),
    }
}
