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

mod known_vectors;
mod oracle;
mod presigned;
mod request;

use kvsign_aws_v4::Credential;
use kvsign_core::time::datetime_from_unix_secs;
use kvsign_core::{Context, StaticClock};

/// Secret of the `AKIDEXAMPLE` key used across the AWS test suite.
pub const SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

/// 20150830T123600Z
pub const SUITE_TIME: u64 = 1_440_938_160;

/// 20220301T081234Z
pub const SIGNALING_TIME: u64 = 1_646_122_354;

pub fn init_signing_test() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn example_credential() -> Credential {
    Credential::new("AKIDEXAMPLE", SECRET)
}

/// Context whose clock is frozen at `secs` since unix epoch.
pub fn context_at(secs: u64) -> Context {
    let now = datetime_from_unix_secs(secs).expect("time must be valid");
    Context::new().with_clock(StaticClock::new(now))
}
