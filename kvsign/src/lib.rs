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

//! Signing signaling requests without a cloud SDK.
//!
//! ```no_run
//! use kvsign::aws::signer_from_env;
//! use kvsign::default_context;
//!
//! let ctx = default_context();
//! let (signer, cred) = signer_from_env(&ctx)?;
//! let url = signer.presign_websocket(
//!     &ctx,
//!     "wss://m-1234.kinesisvideo.us-west-2.amazonaws.com?X-Amz-ChannelARN=arn:aws:kinesisvideo:us-west-2:123456789012:channel/demo/1",
//!     &cred,
//! )?;
//! println!("{url}");
//! # Ok::<(), kvsign::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use kvsign_core::*;

/// Context reading the process environment and the system clock.
pub fn default_context() -> Context {
    Context::new().with_env(OsEnv)
}

/// AWS SigV4 signing.
#[cfg(feature = "aws")]
pub mod aws {
    pub use kvsign_aws_v4::*;

    use kvsign_core::{Context, Error, Result};
    use log::debug;

    /// Build a signer and its static credential from the environment of `ctx`.
    ///
    /// See [`Config::from_env`] for the variables read.
    pub fn signer_from_env(ctx: &Context) -> Result<(RequestSigner, Credential)> {
        let config = Config::default().from_env(ctx);
        debug!("loaded signing config: {config:?}");

        let signer = config.request_signer()?;
        let cred = config.credential().ok_or_else(|| {
            Error::config_invalid("AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY are required")
        })?;
        Ok((signer, cred))
    }
}
