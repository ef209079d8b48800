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

//! AWS SigV4 signer for signaling channels.
//!
//! ## Example
//!
//! ```
//! use kvsign_aws_v4::{CanonicalRequest, Credential, RequestSigner, Verb};
//!
//! let signer = RequestSigner::new("us-west-2");
//! let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//!
//! let headers = "host:kinesisvideo.us-west-2.amazonaws.com\nx-amz-date:20220301T081234Z\n";
//! let req = CanonicalRequest::new(Verb::Post, "/describeSignalingChannel", headers)
//!     .with_payload(br#"{"ChannelName":"demo-channel"}"#);
//!
//! let mut buf = [0u8; 512];
//! let auth = signer.generate_authorization_header(&req, &cred, "20220301T081234Z", &mut buf)?;
//! assert!(auth.as_str().starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20220301/"));
//! assert_eq!(auth.signature().len(), 64);
//! # Ok::<(), kvsign_core::Error>(())
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod authorization;
pub use authorization::Authorization;

pub mod canonical;
pub use canonical::{CanonicalHeaders, CanonicalRequest, Verb};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::{
    credential_scope, string_to_sign, RequestSigner, Signature, SignedAuthorization, SigningKey,
};

mod presign;
pub use presign::presign_websocket_url;

mod constants;
pub use constants::{DEFAULT_PRESIGN_EXPIRES_SECS, DEFAULT_SERVICE};
