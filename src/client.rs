// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation
//!
//! One reqwest handle configured at construction and reused for every call.
//! Shared options (headers, redirect policy, content encoding) are fixed
//! after construction; `get`/`post` only set per-request state (URL, method,
//! body, cookie header). The client is cheap to clone but the contract is
//! sequential use per instance.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use url::Url;

use crate::config::ClientConfig;
use crate::cookie::CookieJar;
use crate::encode;
use crate::error::{Error, Result};

/// Maximum redirect hops when following is enabled
const MAX_REDIRECTS: usize = 10;

/// Body policy for `post_encoded`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostEncoding {
    /// Conventional `application/x-www-form-urlencoded` body
    #[default]
    Form,
    /// Pre-encoded raw string body: strict percent-encoding with `*` kept
    /// literal (see [`encode::raw_encode`])
    Raw,
    /// Params sent as individual `multipart/form-data` fields
    Multipart,
}

enum Payload {
    Text(String),
    Fields(Vec<(String, String)>),
}

/// HTTP client with persistent cookie handling
///
/// Construction allocates two cookie jar files (read and write) named with
/// the configured prefix. The files are left on disk when the client goes
/// away; their lifetime is the caller's business.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    cookie_jar: CookieJar,
    read_jar: PathBuf,
    write_jar: PathBuf,
}

impl HttpClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client from defaults plus a loose override map
    ///
    /// Unknown keys in the map are logged and ignored, never fatal.
    pub fn from_overrides(overrides: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        Self::with_config(ClientConfig::from_overrides(overrides))
    }

    /// Create a client with the given configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        for line in &config.headers {
            match parse_header_line(line) {
                Some((name, value)) => {
                    default_headers.append(name, value);
                }
                None => tracing::debug!("{}: invalid header line", line),
            }
        }
        if !config.content_encoding.is_empty() {
            let value = HeaderValue::try_from(config.content_encoding.as_str())
                .map_err(|e| Error::config(format!("invalid content encoding: {}", e)))?;
            default_headers.insert("accept-encoding", value);
        }

        let redirects = if config.follow_redirects {
            Policy::limited(MAX_REDIRECTS)
        } else {
            Policy::none()
        };

        let client = Client::builder()
            .default_headers(default_headers)
            .redirect(redirects)
            .referer(config.auto_referer)
            .build()
            .map_err(|e| Error::config(format!("failed to build transfer handle: {}", e)))?;

        let read_jar = allocate_jar_file(&config.cookie_prefix)?;
        let write_jar = allocate_jar_file(&config.cookie_prefix)?;
        let cookie_jar = CookieJar::load_from(&read_jar)?;

        Ok(Self {
            client,
            config,
            cookie_jar,
            read_jar,
            write_jar,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Get the (read, write) cookie jar file paths
    pub fn jar_paths(&self) -> (&Path, &Path) {
        (&self.read_jar, &self.write_jar)
    }

    /// Execute a GET request and return the response body
    pub async fn get(&self, url: impl AsRef<str>) -> Result<String> {
        self.execute(Method::GET, url.as_ref(), None).await
    }

    /// Execute a POST request with a standard urlencoded body
    pub async fn post(&self, url: impl AsRef<str>, params: &[(&str, &str)]) -> Result<String> {
        self.post_encoded(url, params, PostEncoding::Form).await
    }

    /// Execute a POST request with an explicit body encoding policy
    pub async fn post_encoded(
        &self,
        url: impl AsRef<str>,
        params: &[(&str, &str)],
        encoding: PostEncoding,
    ) -> Result<String> {
        let payload = match encoding {
            PostEncoding::Form => Payload::Text(encode::form_encode(params)),
            PostEncoding::Raw => Payload::Text(encode::raw_encode(params)),
            PostEncoding::Multipart => Payload::Fields(
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        };
        self.execute(Method::POST, url.as_ref(), Some(payload)).await
    }

    async fn execute(&self, method: Method, url: &str, payload: Option<Payload>) -> Result<String> {
        self.delay().await;

        let url = Url::parse(url)?;
        let start = Instant::now();

        let mut builder = self.client.request(method, url.clone());

        if let Some(cookie_header) = self.cookie_jar.get_cookie_header(&url) {
            builder = builder.header("cookie", cookie_header);
        }

        builder = match payload {
            Some(Payload::Text(body)) => builder
                .header("content-type", "application/x-www-form-urlencoded")
                .body(body),
            Some(Payload::Fields(fields)) => {
                let mut form = reqwest::multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                builder.multipart(form)
            }
            None => builder,
        };

        let request = builder.build()?;
        if self.config.debug {
            tracing::debug!(
                method = %request.method(),
                url = %request.url(),
                headers = ?request.headers(),
                "request"
            );
        }

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                self.debug(&format!("Curl: {}", err));
                return Err(Error::Http(err));
            }
        };

        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();

        for cookie in headers.get_all("set-cookie") {
            if let Ok(cookie_str) = cookie.to_str() {
                self.cookie_jar.add_from_header(cookie_str, &final_url);
            }
        }
        // Jar write failures must not fail the request
        if let Err(err) = self.cookie_jar.save_to(&self.write_jar) {
            self.debug(&format!("cookie jar write failed: {}", err));
        }

        if self.config.debug {
            tracing::debug!(
                status = %status,
                headers = ?headers,
                time_ms = start.elapsed().as_millis() as u64,
                "response"
            );
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                self.debug(&format!("Curl: {}", err));
                return Err(Error::Http(err));
            }
        };

        if self.config.return_body {
            Ok(String::from_utf8_lossy(&body).into_owned())
        } else {
            Ok(String::new())
        }
    }

    /// Pre-request throttle: suspends the call for the configured number of
    /// whole seconds before the transport step. Stateless, applied to every
    /// request identically.
    async fn delay(&self) {
        if self.config.delay.is_off() {
            return;
        }
        let secs = self.config.delay.sample();
        if secs > 0 {
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
    }

    /// Debug sink, gated on the `debug` config flag
    fn debug(&self, msg: &str) {
        if self.config.debug {
            tracing::debug!(target: "yacurl", "{}", msg);
        }
    }
}

fn parse_header_line(line: &str) -> Option<(HeaderName, HeaderValue)> {
    let (name, value) = line.split_once(':')?;
    let name = HeaderName::try_from(name.trim()).ok()?;
    let value = HeaderValue::try_from(value.trim()).ok()?;
    Some((name, value))
}

fn allocate_jar_file(prefix: &str) -> Result<PathBuf> {
    let file = tempfile::Builder::new().prefix(prefix).tempfile()?;
    file.into_temp_path()
        .keep()
        .map_err(|e| Error::Io(e.error))
}
