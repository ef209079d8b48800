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

//! Cross check key derivation and signatures against `aws-sigv4`.

use super::{init_signing_test, SECRET, SIGNALING_TIME, SUITE_TIME};
use anyhow::Result;
use aws_sigv4::sign::v4::{calculate_signature, generate_signing_key};
use kvsign_aws_v4::canonical::canonical_request_string;
use kvsign_aws_v4::{
    credential_scope, string_to_sign, CanonicalRequest, Signature, SigningKey, Verb,
};
use kvsign_core::time::{datetime_from_unix_secs, format_iso8601};
use pretty_assertions::assert_eq;
use std::time::{Duration, SystemTime};
use test_case::test_case;

#[test_case(SUITE_TIME, "us-east-1", "service" ; "suite")]
#[test_case(SIGNALING_TIME, "us-west-2", "kinesisvideo" ; "signaling")]
#[test_case(1_709_251_199, "ap-northeast-1", "kinesisvideo" ; "leap day")]
#[test_case(0, "eu-west-1", "iam" ; "unix epoch")]
fn test_signing_key_matches_aws_sigv4(secs: u64, region: &str, service: &str) -> Result<()> {
    init_signing_test();

    let date = format_iso8601(datetime_from_unix_secs(secs)?);
    let ours = SigningKey::derive(SECRET, &date[..8], region, service)?;
    let theirs = generate_signing_key(
        SECRET,
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        region,
        service,
    );

    assert_eq!(ours.k_signing().as_slice(), theirs.as_ref());
    Ok(())
}

#[test_case(Verb::Get, "/", "" ; "get")]
#[test_case(Verb::Post, "/describeSignalingChannel", r#"{"ChannelName":"demo-channel"}"# ; "post")]
#[test_case(Verb::WebSocket, "/", "" ; "websocket")]
fn test_signature_matches_aws_sigv4(verb: Verb, path: &str, body: &str) -> Result<()> {
    init_signing_test();

    let date = format_iso8601(datetime_from_unix_secs(SIGNALING_TIME)?);
    let headers = format!("host:kinesisvideo.us-west-2.amazonaws.com\nx-amz-date:{date}\n");
    let req = CanonicalRequest::new(verb, path, &headers).with_payload(body.as_bytes());

    let scope = credential_scope(&date[..8], "us-west-2", "kinesisvideo");
    let sts = string_to_sign(&date, &scope, &canonical_request_string(&req)?)?;

    let key = SigningKey::derive(SECRET, &date[..8], "us-west-2", "kinesisvideo")?;
    let ours = Signature::compute(&key, &sts)?;

    let theirs = calculate_signature(
        generate_signing_key(
            SECRET,
            SystemTime::UNIX_EPOCH + Duration::from_secs(SIGNALING_TIME),
            "us-west-2",
            "kinesisvideo",
        ),
        sts.as_bytes(),
    );

    assert_eq!(ours.as_hex(), theirs);
    Ok(())
}
