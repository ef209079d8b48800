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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// Signing algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
/// Terminator of the credential scope.
pub const AWS4_REQUEST: &str = "aws4_request";
/// Service name of the signaling endpoints.
pub const DEFAULT_SERVICE: &str = "kinesisvideo";
/// S3 signs uri paths encoded once.
pub const S3_SERVICE: &str = "s3";
/// Lifetime of a presigned WebSocket url when signed with static credentials: 7 days.
pub const DEFAULT_PRESIGN_EXPIRES_SECS: u64 = 604_800;

// Headers used in aws services.
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

// Query params of a presigned url.
pub const X_AMZ_ALGORITHM_PARAM: &str = "X-Amz-Algorithm";
pub const X_AMZ_CHANNEL_ARN_PARAM: &str = "X-Amz-ChannelARN";
pub const X_AMZ_CREDENTIAL_PARAM: &str = "X-Amz-Credential";
pub const X_AMZ_DATE_PARAM: &str = "X-Amz-Date";
pub const X_AMZ_EXPIRES_PARAM: &str = "X-Amz-Expires";
pub const X_AMZ_SECURITY_TOKEN_PARAM: &str = "X-Amz-Security-Token";
pub const X_AMZ_SIGNED_HEADERS_PARAM: &str = "X-Amz-SignedHeaders";
pub const X_AMZ_SIGNATURE_PARAM: &str = "X-Amz-Signature";

// Env values used by kvsign.
pub const AWS_REGION: &str = "AWS_REGION";
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const KVSIGN_SERVICE: &str = "KVSIGN_SERVICE";

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static AWS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// But used in query.
pub static AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
