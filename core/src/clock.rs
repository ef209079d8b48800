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

//! Clock capability used to timestamp signatures.
//!
//! Devices without a battery backed clock can't trust the wall clock. They
//! keep the time of the last sync with a time server together with the value
//! of a free-running tick counter at that moment, and derive the current time
//! from how far the counter has moved since. [`TickClock`] implements that,
//! [`SystemClock`] and [`StaticClock`] cover hosts with a usable wall clock
//! and tests.

use crate::time::{datetime_from_unix_micros, now, DateTime};
use log::debug;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Instant;

const MICROS_PER_SEC: u64 = 1_000_000;

/// Clock provides the current corrected UTC time.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Current UTC time.
    fn now(&self) -> DateTime;

    /// Current UTC time in seconds since unix epoch.
    fn current_time_sec(&self) -> u64 {
        self.current_time_us() / MICROS_PER_SEC
    }

    /// Current UTC time in microseconds since unix epoch.
    fn current_time_us(&self) -> u64 {
        u64::try_from(self.now().timestamp_micros()).unwrap_or(0)
    }
}

/// SystemClock reads the wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        now()
    }
}

/// StaticClock always returns the same instant.
///
/// Signatures are only reproducible with a fixed time, so this is what tests
/// and replay tools want.
#[derive(Debug, Clone, Copy)]
pub struct StaticClock(DateTime);

impl StaticClock {
    /// Create a clock frozen at `time`.
    pub fn new(time: DateTime) -> Self {
        Self(time)
    }
}

impl Clock for StaticClock {
    fn now(&self) -> DateTime {
        self.0
    }
}

/// TickSource is a free-running counter, typically the scheduler tick of an RTOS.
///
/// The counter is allowed to wrap around.
pub trait TickSource: Debug + Send + Sync + 'static {
    /// Current value of the counter.
    fn ticks(&self) -> u32;

    /// How many ticks the counter advances per second.
    fn tick_rate_hz(&self) -> u32;
}

/// InstantTickSource counts milliseconds since its creation with [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct InstantTickSource {
    start: Instant,
}

impl InstantTickSource {
    /// Create a tick source starting at zero now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for InstantTickSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for InstantTickSource {
    fn ticks(&self) -> u32 {
        // Truncation is the wrap around of a 32-bit counter.
        self.start.elapsed().as_millis() as u32
    }

    fn tick_rate_hz(&self) -> u32 {
        1000
    }
}

/// TimeSync is the reference captured at the last time synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSync {
    /// Time reported by the time server, in microseconds since unix epoch.
    pub unix_time_us: u64,
    /// Value of the tick counter when that time was received.
    pub tick: u32,
}

/// TickClock derives the current time from a [`TimeSync`] reference and a [`TickSource`].
///
/// Readings of the current time never go backwards, even when a new sync
/// moves the reference into the past.
#[derive(Debug)]
pub struct TickClock<S: TickSource> {
    source: S,
    sync: RwLock<TimeSync>,
    last_us: AtomicU64,
}

impl<S: TickSource> TickClock<S> {
    /// Create a tick clock from a source and an initial reference.
    pub fn new(source: S, sync: TimeSync) -> Self {
        Self {
            source,
            sync: RwLock::new(sync),
            last_us: AtomicU64::new(0),
        }
    }

    /// Replace the reference after a new time synchronization.
    pub fn sync(&self, unix_time_us: u64, tick: u32) {
        debug!("time synced to {unix_time_us}us at tick {tick}");

        *self.sync.write().unwrap_or_else(PoisonError::into_inner) =
            TimeSync { unix_time_us, tick };
    }

    /// The reference currently in use.
    pub fn time_sync(&self) -> TimeSync {
        *self.sync.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Time in microseconds since unix epoch at `tick`.
    ///
    /// - `Some(tick)` converts a previously captured counter value.
    /// - `None` reads the counter now; such readings are monotonic.
    pub fn current_time_us_at(&self, tick: Option<u32>) -> u64 {
        let sync = self.time_sync();
        let tick_now = tick.unwrap_or_else(|| self.source.ticks());
        let rate = u64::from(self.source.tick_rate_hz().max(1));

        let diff = u64::from(tick_now.wrapping_sub(sync.tick));
        let elapsed_us = diff / rate * MICROS_PER_SEC + diff % rate * MICROS_PER_SEC / rate;
        let time_us = sync.unix_time_us.saturating_add(elapsed_us);

        match tick {
            Some(_) => time_us,
            None => self.last_us.fetch_max(time_us, Ordering::AcqRel).max(time_us),
        }
    }

    /// Time in seconds since unix epoch at `tick`.
    ///
    /// See [`TickClock::current_time_us_at`].
    pub fn current_time_sec_at(&self, tick: Option<u32>) -> u64 {
        self.current_time_us_at(tick) / MICROS_PER_SEC
    }
}

impl<S: TickSource> Clock for TickClock<S> {
    fn now(&self) -> DateTime {
        datetime_from_unix_micros(self.current_time_us()).unwrap_or(DateTime::MAX_UTC)
    }

    fn current_time_us(&self) -> u64 {
        self.current_time_us_at(None)
    }
}
