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

use super::{context_at, example_credential, init_signing_test, SIGNALING_TIME, SUITE_TIME};
use anyhow::Result;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request};
use kvsign_aws_v4::{CanonicalHeaders, RequestSigner};
use std::str::FromStr;

#[test]
fn test_sign_iam_list_users_request() -> Result<()> {
    init_signing_test();

    let mut req = Request::new(String::new());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = http::Uri::from_str("https://iam.amazonaws.com/?Version=2010-05-08&Action=ListUsers")?;
    req.headers_mut().insert(
        CONTENT_TYPE,
        "application/x-www-form-urlencoded; charset=utf-8".parse()?,
    );

    let (mut parts, body) = req.into_parts();
    RequestSigner::new("us-east-1").with_service("iam").sign_parts(
        &context_at(SUITE_TIME),
        &mut parts,
        body.as_bytes(),
        &example_credential(),
    )?;

    assert_eq!(
        parts.headers[AUTHORIZATION].to_str()?,
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/iam/aws4_request, SignedHeaders=content-type;host;x-amz-date, Signature=5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7"
    );
    Ok(())
}

#[test]
fn test_sign_request_twice() -> Result<()> {
    init_signing_test();

    let mut req = Request::new(r#"{"ChannelName":"demo-channel"}"#.to_string());
    *req.method_mut() = Method::POST;
    *req.uri_mut() = http::Uri::from_str(
        "https://kinesisvideo.us-west-2.amazonaws.com/describeSignalingChannel",
    )?;
    req.headers_mut()
        .insert(http::header::USER_AGENT, "kvsign/0.1.0".parse()?);

    let ctx = context_at(SIGNALING_TIME);
    let signer = RequestSigner::new("us-west-2");
    let (mut parts, body) = req.into_parts();

    signer.sign_parts(&ctx, &mut parts, body.as_bytes(), &example_credential())?;
    let first = parts.headers[AUTHORIZATION].clone();
    signer.sign_parts(&ctx, &mut parts, body.as_bytes(), &example_credential())?;

    assert_eq!(parts.headers[AUTHORIZATION], first);
    assert!(first
        .to_str()?
        .ends_with("Signature=e4ec1713fbc363e137d21b9b75308b42259540d02848246ba8e20beb48e626bc"));

    let signed = CanonicalHeaders::from_header_map(&parts.headers)?;
    assert_eq!(
        signed.signed_header_names(),
        "authorization;host;user-agent;x-amz-date"
    );
    Ok(())
}

#[test]
fn test_sign_raw_http_head() -> Result<()> {
    init_signing_test();

    let head = concat!(
        "POST /describeSignalingChannel HTTP/1.1\r\n",
        "Host: kinesisvideo.us-west-2.amazonaws.com\r\n",
        "User-Agent:   kvsign/0.1.0\r\n",
        "X-Amz-Date: 20220301T081234Z\r\n",
        "\r\n",
    );
    let headers = CanonicalHeaders::from_http_head(head)?.to_block();
    let req = kvsign_aws_v4::CanonicalRequest::new(
        kvsign_aws_v4::Verb::Post,
        "/describeSignalingChannel",
        &headers,
    )
    .with_payload(br#"{"ChannelName":"demo-channel"}"#);

    let auth = RequestSigner::new("us-west-2").authorization(
        &req,
        &example_credential(),
        "20220301T081234Z",
    )?;
    assert_eq!(
        auth.signature().as_hex(),
        "e4ec1713fbc363e137d21b9b75308b42259540d02848246ba8e20beb48e626bc"
    );
    Ok(())
}
