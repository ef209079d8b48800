// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Canonical request of [SigV4](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html).

use crate::constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET};
use http::{HeaderMap, HeaderName, Method};
use kvsign_core::hash::hex_sha256;
use kvsign_core::{Error, Result};
use log::debug;
use percent_encoding::utf8_percent_encode;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Verb of the request to sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verb {
    /// Not set, can't be signed.
    #[default]
    None,
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// WebSocket upgrade, signed as `GET`.
    WebSocket,
}

impl Verb {
    /// The method token written into the canonical request.
    pub fn as_str(&self) -> Result<&'static str> {
        match self {
            Verb::None => Err(Error::bad_parameter("http verb is not set")),
            Verb::Get | Verb::WebSocket => Ok("GET"),
            Verb::Post => Ok("POST"),
        }
    }
}

impl TryFrom<&Method> for Verb {
    type Error = Error;

    fn try_from(method: &Method) -> Result<Self> {
        if method == Method::GET {
            Ok(Verb::Get)
        } else if method == Method::POST {
            Ok(Verb::Post)
        } else {
            Err(Error::bad_parameter(format!(
                "http method {method} is not supported"
            )))
        }
    }
}

/// CanonicalRequest describes the request to sign.
///
/// `path` and `query` are written as given, they must be encoded already.
/// `headers` is a block of `name:value\n` lines sorted by name without
/// duplicates, see [`CanonicalHeaders`] to build one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalRequest<'a> {
    /// Verb of the request.
    pub verb: Verb,
    /// Canonical uri path, `/` is used if empty.
    pub path: &'a str,
    /// Canonical query string, may be empty.
    pub query: &'a str,
    /// Canonical headers block.
    pub headers: &'a str,
    /// Payload of the request, absent payload is hashed as empty.
    pub payload: Option<&'a [u8]>,
}

impl<'a> CanonicalRequest<'a> {
    /// Create a request without query and payload.
    pub fn new(verb: Verb, path: &'a str, headers: &'a str) -> Self {
        Self {
            verb,
            path,
            headers,
            ..Default::default()
        }
    }

    /// Set the canonical query string.
    pub fn with_query(mut self, query: &'a str) -> Self {
        self.query = query;
        self
    }

    /// Set the payload.
    pub fn with_payload(mut self, payload: &'a [u8]) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Lowercase hex SHA256 of the payload.
    pub fn payload_hash(&self) -> String {
        hex_sha256(self.payload.unwrap_or_default())
    }
}

/// Build the canonical request string:
///
/// ```text
/// <Verb>
/// <CanonicalURI>
/// <CanonicalQueryString>
/// <CanonicalHeaders>
///
/// <SignedHeaderNames>
/// <HashHex(Payload)>
/// ```
pub fn canonical_request_string(req: &CanonicalRequest) -> Result<String> {
    let verb = req.verb.as_str()?;
    if !req.headers.ends_with('\n') {
        return Err(Error::bad_parameter(
            "canonical headers must be terminated by a newline",
        ));
    }
    let signed_headers = signed_header_names(req.headers)?;
    let path = if req.path.is_empty() { "/" } else { req.path };

    let mut f = String::with_capacity(
        verb.len() + path.len() + req.query.len() + req.headers.len() * 2 + 72,
    );
    writeln!(f, "{verb}")?;
    writeln!(f, "{path}")?;
    writeln!(f, "{}", req.query)?;
    f.push_str(req.headers);
    writeln!(f)?;
    writeln!(f, "{signed_headers}")?;
    write!(f, "{}", req.payload_hash())?;

    debug!("calculated canonical request: {f}");
    Ok(f)
}

/// Names of all headers in a canonical headers block, joined by `;`.
pub fn signed_header_names(headers: &str) -> Result<String> {
    let mut names = String::with_capacity(headers.len() / 2);
    for line in headers.lines() {
        let name = match line.split_once(':') {
            Some((name, _)) if !name.is_empty() => name,
            _ => {
                return Err(Error::bad_parameter(format!(
                    "invalid canonical header line: {line}"
                )))
            }
        };

        if !names.is_empty() {
            names.push(';');
        }
        names.push_str(name);
    }

    if names.is_empty() {
        return Err(Error::bad_parameter("canonical headers are empty"));
    }
    Ok(names)
}

/// Percent encode `s` with the AWS unreserved set.
///
/// `/` is kept unless `encode_slash` is set, which is what query values need.
pub fn uri_encode(s: &str, encode_slash: bool) -> String {
    let set = if encode_slash {
        &AWS_QUERY_ENCODE_SET
    } else {
        &AWS_URI_ENCODE_SET
    };
    utf8_percent_encode(s, set).to_string()
}

/// Canonicalize a raw query string.
///
/// Params are decoded, encoded again and sorted by encoded name then value.
pub fn canonicalize_query(query: &str) -> String {
    let mut params: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (uri_encode(&k, true), uri_encode(&v, true)))
        .collect();
    params.sort();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// CanonicalHeaders collects headers into a canonical headers block.
///
/// - Names are lowercased.
/// - Values are trimmed, inner runs of whitespace become one space.
/// - Headers are sorted by name.
/// - Values of repeated names are joined by `,`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalHeaders {
    headers: BTreeMap<String, String>,
}

impl CanonicalHeaders {
    /// Create an empty set of headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<()> {
        // HeaderName validates the token and lowercases it.
        let name = HeaderName::from_bytes(name.trim().as_bytes())?;
        if value.contains(['\r', '\n']) {
            return Err(Error::bad_parameter(format!(
                "value of header {name} contains a line break"
            )));
        }
        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");

        match self.headers.entry(name.as_str().to_string()) {
            Entry::Vacant(e) => {
                e.insert(value);
            }
            Entry::Occupied(mut e) => {
                let v = e.get_mut();
                v.push(',');
                v.push_str(&value);
            }
        }
        Ok(())
    }

    /// Insert a header and return self.
    pub fn with(mut self, name: &str, value: &str) -> Result<Self> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Collect all headers of a [`HeaderMap`].
    pub fn from_header_map(map: &HeaderMap) -> Result<Self> {
        let mut headers = Self::new();
        for (name, value) in map {
            headers.insert(name.as_str(), value.to_str()?)?;
        }
        Ok(headers)
    }

    /// Collect the headers of a raw HTTP/1.1 request head.
    ///
    /// The request line is skipped if present, parsing stops at the first
    /// empty line.
    pub fn from_http_head(head: &str) -> Result<Self> {
        let mut headers = Self::new();
        let mut lines = head.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

        let mut pending = lines.next();
        if pending.is_some_and(|l| l.contains(" HTTP/")) {
            pending = lines.next();
        }

        while let Some(line) = pending {
            if line.is_empty() {
                break;
            }
            let (name, value) = line.split_once(':').ok_or_else(|| {
                Error::malformed_input(format!("http header line without colon: {line}"))
            })?;
            headers.insert(name, value)?;
            pending = lines.next();
        }
        Ok(headers)
    }

    /// Value of the header `name`, which must be lowercase.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Check if no header is present.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Header names joined by `;`.
    pub fn signed_header_names(&self) -> String {
        self.headers
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Render the `name:value\n` block.
    pub fn to_block(&self) -> String {
        self.headers.iter().fold(String::new(), |mut f, (k, v)| {
            f.push_str(k);
            f.push(':');
            f.push_str(v);
            f.push('\n');
            f
        })
    }
}
