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

use crate::authorization::{format_authorization, write_authorization, Authorization};
use crate::canonical::{
    canonical_request_string, canonicalize_query, signed_header_names, uri_encode,
    CanonicalHeaders, CanonicalRequest, Verb,
};
use crate::constants::{
    ALGORITHM, AWS4_REQUEST, DEFAULT_SERVICE, S3_SERVICE, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::Credential;
use http::request::Parts;
use http::{header, HeaderValue};
use kvsign_core::hash::{hex_sha256, hmac_sha256, SHA256_LEN};
use kvsign_core::time::{format_iso8601, parse_iso8601, ISO8601_LEN};
use kvsign_core::{Context, Error, Result};
use log::debug;
use percent_encoding::percent_decode_str;
use std::fmt::{Debug, Display, Formatter, Write};

/// Length of the date part of a credential scope, e.g. `20220301`.
const DATE_LEN: usize = 8;

/// Credential scope: `<date>/<region>/<service>/aws4_request`.
pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{date}/{region}/{service}/{AWS4_REQUEST}")
}

/// String to sign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(timestamp: &str, scope: &str, canonical_request: &str) -> Result<String> {
    let mut f = String::with_capacity(ALGORITHM.len() + timestamp.len() + scope.len() + 67);
    writeln!(f, "{ALGORITHM}")?;
    writeln!(f, "{timestamp}")?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", hex_sha256(canonical_request.as_bytes()))?;
    Ok(f)
}

/// SigningKey is the chain of HMAC keys derived from a secret access key.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    k_date: [u8; SHA256_LEN],
    k_region: [u8; SHA256_LEN],
    k_service: [u8; SHA256_LEN],
    k_signing: [u8; SHA256_LEN],
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Derive the key chain for `date` (`YYYYMMDD`), `region` and `service`.
    pub fn derive(secret: &str, date: &str, region: &str, service: &str) -> Result<Self> {
        let secret = format!("AWS4{secret}");
        let k_date = hmac_sha256(secret.as_bytes(), date.as_bytes())?;
        let k_region = hmac_sha256(&k_date, region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, service.as_bytes())?;
        let k_signing = hmac_sha256(&k_service, AWS4_REQUEST.as_bytes())?;

        Ok(Self {
            k_date,
            k_region,
            k_service,
            k_signing,
        })
    }

    /// `HMAC("AWS4" + secret, date)`
    pub fn k_date(&self) -> &[u8; SHA256_LEN] {
        &self.k_date
    }

    /// `HMAC(k_date, region)`
    pub fn k_region(&self) -> &[u8; SHA256_LEN] {
        &self.k_region
    }

    /// `HMAC(k_region, service)`
    pub fn k_service(&self) -> &[u8; SHA256_LEN] {
        &self.k_service
    }

    /// `HMAC(k_service, "aws4_request")`, the key that signs requests.
    pub fn k_signing(&self) -> &[u8; SHA256_LEN] {
        &self.k_signing
    }
}

/// Signature of a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; SHA256_LEN],
    hex: String,
}

impl Signature {
    /// Sign `string_to_sign` with the signing key.
    pub fn compute(key: &SigningKey, string_to_sign: &str) -> Result<Self> {
        let bytes = hmac_sha256(key.k_signing(), string_to_sign.as_bytes())?;
        Ok(Self {
            bytes,
            hex: hex::encode(bytes),
        })
    }

    /// Raw HMAC output.
    pub fn as_bytes(&self) -> &[u8; SHA256_LEN] {
        &self.bytes
    }

    /// Lowercase hex of the HMAC output.
    pub fn as_hex(&self) -> &str {
        &self.hex
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signature").field(&self.hex).finish()
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex)
    }
}

/// SignedAuthorization is an owned `Authorization` header value with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAuthorization {
    header: String,
    signature: Signature,
}

impl SignedAuthorization {
    /// The `Authorization` header value.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The signature carried by the header.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Split into the header value and the signature.
    pub fn into_parts(self) -> (String, Signature) {
        (self.header, self.signature)
    }
}

/// Everything an `Authorization` header or a presigned url is built from.
#[derive(Debug)]
pub(crate) struct Signed {
    pub(crate) scope: String,
    pub(crate) signed_headers: String,
    pub(crate) signature: Signature,
}

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

impl RequestSigner {
    /// Create a signer for the signaling service in `region`.
    pub fn new(region: &str) -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            region: region.to_string(),
        }
    }

    /// Sign for another service than `kinesisvideo`.
    pub fn with_service(mut self, service: &str) -> Self {
        self.service = service.to_string();
        self
    }

    /// Region requests are signed for.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service requests are signed for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Derive the signing key of `cred` for `date` (`YYYYMMDD`).
    pub fn signing_key(&self, cred: &Credential, date: &str) -> Result<SigningKey> {
        self.check()?;
        cred.check()?;
        if date.len() != DATE_LEN || !date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::bad_parameter(format!(
                "date scope must be 8 digits, got {date}"
            )));
        }

        SigningKey::derive(&cred.secret_access_key, date, &self.region, &self.service)
    }

    /// Generate the `Authorization` header of `req` into `out`.
    ///
    /// `date` is the signing time in ISO8601 compact form, it must be the
    /// same time the request carries in `x-amz-date`.
    ///
    /// The returned value borrows `out`, its [`Authorization::signature`]
    /// is the hex signature inside the header.
    pub fn generate_authorization_header<'b>(
        &self,
        req: &CanonicalRequest,
        cred: &Credential,
        date: &str,
        out: &'b mut [u8],
    ) -> Result<Authorization<'b>> {
        let signed = self.sign(req, cred, date)?;
        write_authorization(
            out,
            &cred.access_key_id,
            &signed.scope,
            &signed.signed_headers,
            signed.signature.as_hex(),
        )
    }

    /// Generate the `Authorization` header of `req` as an owned value.
    pub fn authorization(
        &self,
        req: &CanonicalRequest,
        cred: &Credential,
        date: &str,
    ) -> Result<SignedAuthorization> {
        let signed = self.sign(req, cred, date)?;
        let header = format_authorization(
            &cred.access_key_id,
            &signed.scope,
            &signed.signed_headers,
            signed.signature.as_hex(),
        );

        Ok(SignedAuthorization {
            header,
            signature: signed.signature,
        })
    }

    /// Sign an http request in place.
    ///
    /// The time is taken from the clock of `ctx`. `host`, `x-amz-date` and
    /// `x-amz-security-token` are inserted before signing, every header of
    /// the request is signed.
    ///
    /// The uri path is encoded twice as most services expect, `s3` signs it
    /// encoded once.
    ///
    /// `parts` is left untouched if signing fails.
    pub fn sign_parts(
        &self,
        ctx: &Context,
        parts: &mut Parts,
        payload: &[u8],
        cred: &Credential,
    ) -> Result<()> {
        let verb = Verb::try_from(&parts.method)?;
        self.check()?;
        cred.check()?;
        let date = format_iso8601(ctx.now());

        let mut headers = parts.headers.clone();
        // Insert HOST header if not present.
        if !headers.contains_key(header::HOST) {
            let authority = parts
                .uri
                .authority()
                .ok_or_else(|| Error::bad_parameter("request uri has no authority"))?;
            headers.insert(header::HOST, HeaderValue::from_str(authority.as_str())?);
        }
        headers.insert(X_AMZ_DATE, HeaderValue::from_str(&date)?);
        if let Some(token) = &cred.session_token {
            let mut value = HeaderValue::from_str(token)?;
            // Set token value sensitive to valid leaking.
            value.set_sensitive(true);
            headers.insert(X_AMZ_SECURITY_TOKEN, value);
        }
        // A signature never covers a previous one.
        headers.remove(header::AUTHORIZATION);

        let canonical_headers = CanonicalHeaders::from_header_map(&headers)?.to_block();
        let path = self.canonical_path(parts.uri.path())?;
        let query = canonicalize_query(parts.uri.query().unwrap_or_default());

        let req = CanonicalRequest {
            verb,
            path: &path,
            query: &query,
            headers: &canonical_headers,
            payload: Some(payload),
        };
        let auth = self.authorization(&req, cred, &date)?;

        let mut value = HeaderValue::from_str(auth.header())?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
        parts.headers = headers;
        Ok(())
    }

    /// Canonical uri of an already encoded request path.
    fn canonical_path(&self, path: &str) -> Result<String> {
        if self.service == S3_SERVICE {
            let path = percent_decode_str(path).decode_utf8().map_err(|e| {
                Error::bad_parameter("request path is not valid utf-8").with_source(e)
            })?;
            Ok(uri_encode(&path, false))
        } else {
            Ok(uri_encode(path, false))
        }
    }

    pub(crate) fn sign(&self, req: &CanonicalRequest, cred: &Credential, date: &str) -> Result<Signed> {
        self.check()?;
        cred.check()?;
        check_date(date)?;

        let creq = canonical_request_string(req)?;
        let signed_headers = signed_header_names(req.headers)?;

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = credential_scope(&date[..DATE_LEN], &self.region, &self.service);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(date, &scope, &creq)?;
        debug!("calculated string to sign: {string_to_sign}");

        let key = SigningKey::derive(
            &cred.secret_access_key,
            &date[..DATE_LEN],
            &self.region,
            &self.service,
        )?;
        let signature = Signature::compute(&key, &string_to_sign)?;

        Ok(Signed {
            scope,
            signed_headers,
            signature,
        })
    }

    fn check(&self) -> Result<()> {
        if self.region.is_empty() {
            return Err(Error::bad_parameter("region is empty"));
        }
        if self.service.is_empty() {
            return Err(Error::bad_parameter("service is empty"));
        }
        Ok(())
    }
}

/// Make sure `date` is a valid ISO8601 compact time.
pub(crate) fn check_date(date: &str) -> Result<()> {
    if date.len() != ISO8601_LEN {
        return Err(Error::bad_parameter(format!(
            "signing time must be {ISO8601_LEN} characters, got {date}"
        )));
    }
    parse_iso8601(date).map_err(|e| {
        Error::bad_parameter(format!("signing time is not iso8601: {date}")).with_source(e)
    })?;
    Ok(())
}
