// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Form body encoders
//!
//! Two encoders, one content type. The standard encoder produces
//! conventional `application/x-www-form-urlencoded` output (space becomes
//! `+`). The raw encoder percent-encodes values under strict RFC 3986 rules
//! (space becomes `%20`) with a single deliberate exception: `*` stays
//! literal. Some form endpoints expect wildcard characters unescaped, and
//! this encoder exists for them.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::form_urlencoded;

/// RFC 3986 unreserved characters stay literal, plus `*`.
const RAW_KEEP_ASTERISK: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'*');

/// Encode params as a conventional `application/x-www-form-urlencoded` body.
pub fn form_encode(params: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// Encode params as `key=value&...` with raw percent-encoded values.
///
/// Keys pass through untouched; values are percent-encoded with `*` kept
/// literal. Pairs are joined with `&` and no trailing separator is emitted.
pub fn raw_encode(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, RAW_KEEP_ASTERISK)))
        .collect::<Vec<_>>()
        .join("&")
}
