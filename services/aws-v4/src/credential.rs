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

use kvsign_core::time::DateTime;
use kvsign_core::utils::Redact;
use kvsign_core::{Error, Result};
use std::fmt::{Debug, Formatter};

/// Credential that holds the access_key and secret_key.
///
/// Credentials are owned by the caller and passed into every signing call,
/// the signer never keeps them.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for aws services.
    pub access_key_id: String,
    /// Secret access key for aws services.
    pub secret_access_key: String,
    /// Session token for aws services.
    pub session_token: Option<String>,
    /// Expiration time for this credential.
    pub expires_in: Option<DateTime>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl Credential {
    /// Create a static credential without session token.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            ..Default::default()
        }
    }

    /// Attach a session token of temporary credentials.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Attach the time this credential expires.
    pub fn with_expires_in(mut self, expires_in: DateTime) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Check the credential can still sign at `now`.
    ///
    /// Credentials expiring within the next two minutes are treated as
    /// expired already.
    pub fn is_valid_at(&self, now: DateTime) -> bool {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return false;
        }

        match self.expires_in {
            Some(expires_in) => now
                .checked_add_signed(chrono::TimeDelta::minutes(2))
                .is_some_and(|deadline| expires_in > deadline),
            None => true,
        }
    }

    /// Make sure both keys are present.
    pub(crate) fn check(&self) -> Result<()> {
        if self.access_key_id.is_empty() {
            return Err(Error::bad_parameter("access key id is empty"));
        }
        if self.secret_access_key.is_empty() {
            return Err(Error::bad_parameter("secret access key is empty"));
        }
        Ok(())
    }
}
