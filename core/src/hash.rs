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

//! Hash related utils.

use crate::{Error, Result};
use hmac::Hmac;
use hmac::Mac;
use sha2::Digest;
use sha2::Sha256;

/// Length in bytes of a SHA256 digest and of a HMAC-SHA256 tag.
pub const SHA256_LEN: usize = 32;

/// Hex encoded SHA256 hash.
///
/// Use this function instead of `hex::encode(sha256(content))` can reduce
/// extra copy.
pub fn hex_sha256(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content).as_slice())
}

/// HMAC with SHA256 hash.
///
/// Returns a [`SigningFailure`][crate::ErrorKind::SigningFailure] error if the
/// MAC could not be initialized from the given key.
pub fn hmac_sha256(key: &[u8], content: &[u8]) -> Result<[u8; SHA256_LEN]> {
    let mut h = Hmac::<Sha256>::new_from_slice(key).map_err(|e| {
        Error::signing_failure("failed to initialize hmac-sha256")
            .with_source(anyhow::anyhow!("{e}"))
    })?;
    h.update(content);

    let mut out = [0u8; SHA256_LEN];
    out.copy_from_slice(&h.finalize().into_bytes());
    Ok(out)
}

/// Hex encoded HMAC with SHA256 hash.
///
/// Use this function instead of `hex::encode(hmac_sha256(key, content))` can
/// reduce extra copy.
pub fn hex_hmac_sha256(key: &[u8], content: &[u8]) -> Result<String> {
    hmac_sha256(key, content).map(hex::encode)
}
