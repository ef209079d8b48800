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

use crate::constants::*;
use crate::{Credential, RequestSigner};
use kvsign_core::utils::Redact;
use kvsign_core::{Context, Error, Result};
use std::fmt::{Debug, Formatter};

/// Config for signing signaling requests.
///
/// Fields set explicitly are kept by [`Config::from_env`], only the missing
/// ones are loaded from the environment.
#[derive(Clone, Default)]
pub struct Config {
    /// Region of the signaling channel, e.g. `us-west-2`.
    pub region: Option<String>,
    /// Service to sign for, `kinesisvideo` if not set.
    pub service: Option<String>,
    /// Access key id.
    pub access_key_id: Option<String>,
    /// Secret access key.
    pub secret_access_key: Option<String>,
    /// Session token of temporary credentials.
    pub session_token: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("service", &self.service)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .finish()
    }
}

impl Config {
    /// Load the missing fields from environment variables.
    ///
    /// - `AWS_REGION`, falling back to `AWS_DEFAULT_REGION`
    /// - `KVSIGN_SERVICE`
    /// - `AWS_ACCESS_KEY_ID`
    /// - `AWS_SECRET_ACCESS_KEY`
    /// - `AWS_SESSION_TOKEN`
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let load = |key: &str| ctx.env_var(key).filter(|v| !v.is_empty());

        self.region = self
            .region
            .or_else(|| load(AWS_REGION))
            .or_else(|| load(AWS_DEFAULT_REGION));
        self.service = self.service.or_else(|| load(KVSIGN_SERVICE));
        self.access_key_id = self.access_key_id.or_else(|| load(AWS_ACCESS_KEY_ID));
        self.secret_access_key = self
            .secret_access_key
            .or_else(|| load(AWS_SECRET_ACCESS_KEY));
        self.session_token = self.session_token.or_else(|| load(AWS_SESSION_TOKEN));
        self
    }

    /// Static credential from this config.
    ///
    /// Returns `None` unless both keys are present.
    pub fn credential(&self) -> Option<Credential> {
        let (Some(ak), Some(sk)) = (&self.access_key_id, &self.secret_access_key) else {
            return None;
        };

        Some(Credential {
            access_key_id: ak.clone(),
            secret_access_key: sk.clone(),
            session_token: self.session_token.clone(),
            expires_in: None,
        })
    }

    /// Build a signer from this config.
    pub fn request_signer(&self) -> Result<RequestSigner> {
        let region = self
            .region
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                Error::config_invalid(format!(
                    "region is required, set it explicitly or through {AWS_REGION}"
                ))
            })?;

        let signer = RequestSigner::new(region);
        Ok(match self.service.as_deref().filter(|v| !v.is_empty()) {
            Some(service) => signer.with_service(service),
            None => signer,
        })
    }
}
