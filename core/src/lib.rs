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

//! Core components for signing signaling requests.
//!
//! This crate provides the primitives shared by the kvsign signers:
//!
//! - [`Context`]: A container that holds the [`Clock`] and [`Env`] used while signing
//! - [`Error`]: The error type, classified by [`ErrorKind`]
//!
//! ## Example
//!
//! ```
//! use kvsign_core::time::{write_iso8601, ISO8601_BUFFER_LEN};
//! use kvsign_core::url::{url_host, url_path};
//! use kvsign_core::Context;
//!
//! let url = "https://kinesisvideo.us-west-2.amazonaws.com/describeSignalingChannel";
//! assert_eq!(url_host(url)?, "kinesisvideo.us-west-2.amazonaws.com");
//! assert_eq!(url_path(url)?, "/describeSignalingChannel");
//!
//! let ctx = Context::new();
//! let mut buf = [0u8; ISO8601_BUFFER_LEN];
//! let date = write_iso8601(ctx.now(), &mut buf)?;
//! assert_eq!(date.len(), 16);
//! # Ok::<(), kvsign_core::Error>(())
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: ISO8601, unix and NTP time conversions
//! - [`url`]: Host and path extraction
//! - [`clock`]: System, static and tick corrected clocks
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod clock;
pub mod hash;
pub mod time;
pub mod url;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::NoopEnv;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};

pub use clock::{Clock, StaticClock, SystemClock, TickClock};
