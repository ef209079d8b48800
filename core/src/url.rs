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

//! Url related utils.
//!
//! All functions return sub-slices of their input, nothing is decoded or copied.

use crate::{Error, Result};

const SCHEMA_DELIMITER: &str = "://";

/// Split `url` into its authority and everything after it.
fn split_authority(url: &str) -> Result<(&str, &str)> {
    let start = url
        .find(SCHEMA_DELIMITER)
        .ok_or_else(|| Error::malformed_input(format!("schema delimiter not found: {url}")))?
        + SCHEMA_DELIMITER.len();

    let rest = &url[start..];
    let end = rest.find(['/', '?']).unwrap_or(rest.len());
    if end == 0 {
        return Err(Error::malformed_input(format!("invalid url: {url}")));
    }

    Ok(rest.split_at(end))
}

/// Get the host of `url`, port included.
///
/// ```
/// use kvsign_core::url::url_host;
///
/// assert_eq!(url_host("https://example.com:443/path?q=1").unwrap(), "example.com:443");
/// ```
pub fn url_host(url: &str) -> Result<&str> {
    split_authority(url).map(|(host, _)| host)
}

/// Get the host name of `url`, without port.
///
/// This is the name to resolve when connecting to the endpoint.
pub fn url_hostname(url: &str) -> Result<&str> {
    let host = url_host(url)?;
    let name = host.split(':').next().unwrap_or_default();
    if name.is_empty() {
        return Err(Error::malformed_input(format!("invalid url: {url}")));
    }
    Ok(name)
}

/// Get the path of `url`, query included.
///
/// Returns an empty string if `url` has no path.
///
/// ```
/// use kvsign_core::url::url_path;
///
/// assert_eq!(url_path("https://example.com:443/path?q=1").unwrap(), "/path?q=1");
/// assert_eq!(url_path("https://example.com").unwrap(), "");
/// ```
pub fn url_path(url: &str) -> Result<&str> {
    let (_, rest) = split_authority(url)?;
    if rest.starts_with('/') {
        Ok(rest)
    } else {
        Ok("")
    }
}

/// Split a path into the part before `?` and the query after it.
pub fn split_path_query(path: &str) -> (&str, Option<&str>) {
    match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    }
}
