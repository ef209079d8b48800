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

use crate::constants::ALGORITHM;
use kvsign_core::hash::SHA256_LEN;
use kvsign_core::{Error, Result};
use std::fmt::{Display, Formatter};

const CREDENTIAL: &str = " Credential=";
const SIGNED_HEADERS: &str = ", SignedHeaders=";
const SIGNATURE: &str = ", Signature=";

/// Authorization is a header value written into a caller supplied buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorization<'a> {
    header: &'a str,
    signature_start: usize,
}

impl<'a> Authorization<'a> {
    /// The complete header value.
    pub fn as_str(&self) -> &'a str {
        self.header
    }

    /// Length of the header value in bytes.
    pub fn len(&self) -> usize {
        self.header.len()
    }

    /// Always false, a header value carries at least the algorithm.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    /// The hex signature at the end of the header value.
    ///
    /// This borrows from the same buffer as [`Authorization::as_str`].
    pub fn signature(&self) -> &'a str {
        &self.header[self.signature_start..]
    }

    /// The raw signature bytes decoded from [`Authorization::signature`].
    pub fn signature_bytes(&self) -> Result<[u8; SHA256_LEN]> {
        let mut out = [0u8; SHA256_LEN];
        hex::decode_to_slice(self.signature(), &mut out).map_err(|e| {
            Error::malformed_input("signature is not a 32 bytes hex string").with_source(e)
        })?;
        Ok(out)
    }
}

impl Display for Authorization<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header)
    }
}

/// Exact length of the header value built from these parts.
pub fn authorization_len(
    access_key_id: &str,
    scope: &str,
    signed_headers: &str,
    signature: &str,
) -> usize {
    ALGORITHM.len()
        + CREDENTIAL.len()
        + access_key_id.len()
        + 1
        + scope.len()
        + SIGNED_HEADERS.len()
        + signed_headers.len()
        + SIGNATURE.len()
        + signature.len()
}

/// Write the `Authorization` header value into `buf`:
///
/// ```text
/// AWS4-HMAC-SHA256 Credential=<access_key_id>/<scope>, SignedHeaders=<signed_headers>, Signature=<signature>
/// ```
///
/// Nothing is written if `buf` can't hold the whole value, a
/// [`BufferTooSmall`][kvsign_core::ErrorKind::BufferTooSmall] error is
/// returned instead.
pub fn write_authorization<'a>(
    buf: &'a mut [u8],
    access_key_id: &str,
    scope: &str,
    signed_headers: &str,
    signature: &str,
) -> Result<Authorization<'a>> {
    let total = authorization_len(access_key_id, scope, signed_headers, signature);
    if buf.len() < total {
        return Err(Error::buffer_too_small(format!(
            "authorization header needs {total} bytes, got {}",
            buf.len()
        )));
    }

    let parts = [
        ALGORITHM,
        CREDENTIAL,
        access_key_id,
        "/",
        scope,
        SIGNED_HEADERS,
        signed_headers,
        SIGNATURE,
        signature,
    ];
    let mut offset = 0;
    for part in parts {
        buf[offset..offset + part.len()].copy_from_slice(part.as_bytes());
        offset += part.len();
    }

    let buf: &'a [u8] = buf;
    let header = std::str::from_utf8(&buf[..total]).map_err(|e| {
        Error::malformed_input("authorization header is not valid utf-8").with_source(e)
    })?;
    Ok(Authorization {
        header,
        signature_start: total - signature.len(),
    })
}

/// Build the `Authorization` header value as an owned string.
pub fn format_authorization(
    access_key_id: &str,
    scope: &str,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!("{ALGORITHM}{CREDENTIAL}{access_key_id}/{scope}{SIGNED_HEADERS}{signed_headers}{SIGNATURE}{signature}")
}
