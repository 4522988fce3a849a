// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # yacurl - Small Convenience HTTP Client
//!
//! A thin wrapper around reqwest: configure once, then `get`/`post` forever.
//! No retries, no protocol work of its own; the wrapper holds a configured
//! transfer handle and forwards calls to it.
//!
//! ## Features
//!
//! - Default header set, redirect policy and content encoding fixed at
//!   construction
//! - Cookie jar persisted to disk, shared across every call on an instance
//! - Auto-referer on redirects
//! - Optional fixed or randomized delay before each request
//! - Debug echo of request/response headers through `tracing`
//!
//! ## Example
//!
//! ```rust,no_run
//! use yacurl::{ClientConfig, Delay, HttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default()
//!         .cookie_prefix("mypref")
//!         .follow_redirects(true)
//!         .delay(Delay::Range(1, 5));
//!     let client = HttpClient::with_config(config)?;
//!
//!     client.get("https://www.mysite.com").await?;
//!     let body = client
//!         .post("https://www.mysite.com/login", &[("user", "myuser"), ("pass", "mypass")])
//!         .await?;
//!     println!("{}", body);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod cookie;
pub mod encode;
pub mod error;

pub use client::{HttpClient, PostEncoding};
pub use config::{ClientConfig, Delay};
pub use cookie::{Cookie, CookieJar, SameSite};
pub use error::{Error, Result};
