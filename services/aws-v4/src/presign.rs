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

//! Presigned url of the signaling WebSocket.
//!
//! The upgrade request can't carry an `Authorization` header, so the
//! signature travels in the query instead.

use crate::canonical::{uri_encode, CanonicalRequest, Verb};
use crate::constants::{
    ALGORITHM, DEFAULT_PRESIGN_EXPIRES_SECS, X_AMZ_ALGORITHM_PARAM, X_AMZ_CHANNEL_ARN_PARAM,
    X_AMZ_CREDENTIAL_PARAM, X_AMZ_DATE_PARAM, X_AMZ_EXPIRES_PARAM, X_AMZ_SECURITY_TOKEN_PARAM,
    X_AMZ_SIGNATURE_PARAM, X_AMZ_SIGNED_HEADERS_PARAM,
};
use crate::sign_request::{check_date, credential_scope};
use crate::{Credential, RequestSigner};
use kvsign_core::time::format_iso8601;
use kvsign_core::url::{split_path_query, url_host, url_path};
use kvsign_core::{Context, Error, Result};
use log::debug;
use percent_encoding::percent_decode_str;
use std::fmt::Write;
use std::time::Duration;

/// Presign the WebSocket url of a signaling channel.
///
/// `url` looks like `wss://<endpoint>?X-Amz-ChannelARN=<arn>`, the channel
/// ARN must be the first query param. Params after it, such as the
/// `X-Amz-ClientId` of a viewer, are signed and kept in the returned url.
/// `date` is the signing time in ISO8601 compact form.
///
/// The returned url carries its params sorted by name, the generated ones are:
///
/// - `X-Amz-Algorithm`
/// - `X-Amz-ChannelARN`
/// - `X-Amz-Credential`
/// - `X-Amz-Date`
/// - `X-Amz-Expires`
/// - `X-Amz-Security-Token`, only with a session token
/// - `X-Amz-SignedHeaders`
///
/// `X-Amz-Signature` always comes last.
pub fn presign_websocket_url(
    signer: &RequestSigner,
    url: &str,
    cred: &Credential,
    date: &str,
    expires_in: Duration,
) -> Result<String> {
    check_date(date)?;

    let (scheme, _) = url
        .split_once("://")
        .ok_or_else(|| Error::malformed_input(format!("schema delimiter not found: {url}")))?;
    let host = url_host(url)?;
    let (path, _) = split_path_query(url_path(url)?);
    let path = if path.is_empty() { "/" } else { path };
    let (channel_arn, extra) = channel_query(url)?;

    let scope = credential_scope(&date[..8], signer.region(), signer.service());
    let mut params = vec![
        (X_AMZ_ALGORITHM_PARAM.to_string(), ALGORITHM.to_string()),
        (
            X_AMZ_CHANNEL_ARN_PARAM.to_string(),
            uri_encode(&channel_arn, true),
        ),
        (
            X_AMZ_CREDENTIAL_PARAM.to_string(),
            uri_encode(&format!("{}/{scope}", cred.access_key_id), true),
        ),
        (X_AMZ_DATE_PARAM.to_string(), date.to_string()),
        (
            X_AMZ_EXPIRES_PARAM.to_string(),
            expires_in.as_secs().to_string(),
        ),
        (X_AMZ_SIGNED_HEADERS_PARAM.to_string(), "host".to_string()),
    ];
    if let Some(token) = &cred.session_token {
        params.push((
            X_AMZ_SECURITY_TOKEN_PARAM.to_string(),
            uri_encode(token, true),
        ));
    }
    params.extend(
        extra
            .iter()
            .map(|(k, v)| (uri_encode(k, true), uri_encode(v, true))),
    );
    params.sort();

    let mut query = String::with_capacity(512);
    for (k, v) in &params {
        if !query.is_empty() {
            query.push('&');
        }
        write!(query, "{k}={v}")?;
    }

    let headers = format!("host:{host}\n");
    let req = CanonicalRequest {
        verb: Verb::WebSocket,
        path,
        query: &query,
        headers: &headers,
        payload: None,
    };
    let signed = signer.sign(&req, cred, date)?;
    debug!("presigned websocket url for channel {channel_arn}");

    Ok(format!(
        "{scheme}://{host}{path}?{query}&{X_AMZ_SIGNATURE_PARAM}={}",
        signed.signature.as_hex()
    ))
}

impl RequestSigner {
    /// Presign the WebSocket url of a signaling channel at the current time of `ctx`.
    ///
    /// The url stays valid for 7 days, see [`presign_websocket_url`].
    pub fn presign_websocket(&self, ctx: &Context, url: &str, cred: &Credential) -> Result<String> {
        presign_websocket_url(
            self,
            url,
            cred,
            &format_iso8601(ctx.now()),
            Duration::from_secs(DEFAULT_PRESIGN_EXPIRES_SECS),
        )
    }
}

/// Params generated while presigning, callers can't pass them in.
const RESERVED_PARAMS: [&str; 8] = [
    X_AMZ_ALGORITHM_PARAM,
    X_AMZ_CHANNEL_ARN_PARAM,
    X_AMZ_CREDENTIAL_PARAM,
    X_AMZ_DATE_PARAM,
    X_AMZ_EXPIRES_PARAM,
    X_AMZ_SECURITY_TOKEN_PARAM,
    X_AMZ_SIGNED_HEADERS_PARAM,
    X_AMZ_SIGNATURE_PARAM,
];

/// Decoded channel ARN and the decoded params following it in the query of `url`.
fn channel_query(url: &str) -> Result<(String, Vec<(String, String)>)> {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or_default();
    let mut pairs = query.split('&');

    let value = pairs
        .next()
        .and_then(|v| v.strip_prefix(X_AMZ_CHANNEL_ARN_PARAM))
        .and_then(|v| v.strip_prefix('='))
        .ok_or_else(|| {
            Error::malformed_input(format!(
                "websocket url must start its query with {X_AMZ_CHANNEL_ARN_PARAM}: {url}"
            ))
        })?;
    if value.is_empty() {
        return Err(Error::malformed_input(format!(
            "{X_AMZ_CHANNEL_ARN_PARAM} is empty: {url}"
        )));
    }
    let channel_arn = decode_param(value)?;

    let mut extra = Vec::new();
    for pair in pairs.filter(|p| !p.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        let name = decode_param(name)?;
        if name.is_empty() {
            return Err(Error::malformed_input(format!(
                "websocket url has a query param without name: {url}"
            )));
        }
        if RESERVED_PARAMS.contains(&name.as_str()) {
            return Err(Error::malformed_input(format!(
                "{name} is generated while presigning and can't be passed in: {url}"
            )));
        }
        extra.push((name, decode_param(value)?));
    }

    Ok((channel_arn, extra))
}

fn decode_param(value: &str) -> Result<String> {
    percent_decode_str(value)
        .decode_utf8()
        .map(|v| v.into_owned())
        .map_err(|e| {
            Error::malformed_input(format!("query param {value} is not valid utf-8"))
                .with_source(e)
        })
}
