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

//! Time related utils.

use crate::clock::Clock;
use crate::{Error, Result};
use chrono::format::Item;
use chrono::format::Numeric;
use chrono::format::Pad;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use chrono::Timelike;
use chrono::Utc;
use std::io::Write;

/// DateTime is the alias of chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Length of the ISO8601 compact form, e.g. `20111008T070709Z`.
pub const ISO8601_LEN: usize = 16;

/// Buffer size required by [`write_iso8601`]: the timestamp and a NUL terminator.
pub const ISO8601_BUFFER_LEN: usize = ISO8601_LEN + 1;

/// Length of the ISO8601 extended form, e.g. `2011-10-08T07:07:09Z`.
pub const ISO8601_EXTENDED_LEN: usize = 20;

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch (1970-01-01).
pub const NTP_UNIX_EPOCH_OFFSET_SECS: u64 = 2_208_988_800;

/// One second in the NTP fractional field.
const NTP_TIMESCALE: u64 = 1 << 32;

const MICROS_PER_SEC: u64 = 1_000_000;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// DATE is a time format like `20220301`
const DATE: &[Item<'static>] = &[
    Item::Numeric(Numeric::Year, Pad::Zero),
    Item::Numeric(Numeric::Month, Pad::Zero),
    Item::Numeric(Numeric::Day, Pad::Zero),
];

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format_with_items(DATE.iter()).to_string()
}

/// ISO8601 is a time format like `20220313T072004Z`.
const ISO8601: &[Item<'static>] = &[
    Item::Numeric(Numeric::Year, Pad::Zero),
    Item::Numeric(Numeric::Month, Pad::Zero),
    Item::Numeric(Numeric::Day, Pad::Zero),
    Item::Literal("T"),
    Item::Numeric(Numeric::Hour, Pad::Zero),
    Item::Numeric(Numeric::Minute, Pad::Zero),
    Item::Numeric(Numeric::Second, Pad::Zero),
    Item::Literal("Z"),
];

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format_with_items(ISO8601.iter()).to_string()
}

/// Write time as ISO8601 compact form into `buf`, followed by a NUL byte.
///
/// `buf` must hold at least [`ISO8601_BUFFER_LEN`] bytes. The returned `&str`
/// borrows the 16 timestamp characters from `buf`.
pub fn write_iso8601(t: DateTime, buf: &mut [u8]) -> Result<&str> {
    if buf.len() < ISO8601_BUFFER_LEN {
        return Err(Error::buffer_too_small(format!(
            "iso8601 time needs {ISO8601_BUFFER_LEN} bytes, got {}",
            buf.len()
        )));
    }

    let mut cursor = &mut buf[..ISO8601_LEN];
    write!(cursor, "{}", t.format_with_items(ISO8601.iter())).map_err(|e| {
        Error::malformed_input(format!("{t} cannot be written in iso8601 compact form"))
            .with_source(e)
    })?;
    if !cursor.is_empty() {
        return Err(Error::malformed_input(format!(
            "{t} cannot be written in iso8601 compact form"
        )));
    }
    buf[ISO8601_LEN] = 0;

    std::str::from_utf8(&buf[..ISO8601_LEN])
        .map_err(|e| Error::malformed_input("iso8601 time is not valid utf-8").with_source(e))
}

/// Write the current time of `clock` as ISO8601 compact form into `buf`.
///
/// See [`write_iso8601`] for the buffer contract.
pub fn iso8601_current_time<'a>(clock: &dyn Clock, buf: &'a mut [u8]) -> Result<&'a str> {
    write_iso8601(clock.now(), buf)
}

/// Parse an ISO8601 time into seconds since unix epoch.
///
/// Both the compact form `20220313T072004Z` and the extended form
/// `2022-03-13T07:20:04Z` are accepted.
pub fn parse_iso8601(s: &str) -> Result<u64> {
    let (layout, fmt) = match s.len() {
        ISO8601_LEN => ("dddddddd_dddddd_", "%Y%m%dT%H%M%SZ"),
        ISO8601_EXTENDED_LEN => ("dddd_dd_dd_dd_dd_dd_", "%Y-%m-%dT%H:%M:%SZ"),
        n => {
            return Err(Error::malformed_input(format!(
                "iso8601 time must have {ISO8601_LEN} or {ISO8601_EXTENDED_LEN} characters, got {n}"
            )))
        }
    };

    // chrono accepts signs and variable widths in numeric fields, we don't.
    let digits_in_place = s
        .bytes()
        .zip(layout.bytes())
        .all(|(b, l)| l != b'd' || b.is_ascii_digit());
    if !digits_in_place {
        return Err(Error::malformed_input(format!(
            "iso8601 time has non-digit fields: {s}"
        )));
    }

    let t = NaiveDateTime::parse_from_str(s, fmt).map_err(|e| {
        Error::malformed_input(format!("invalid iso8601 time: {s}")).with_source(e)
    })?;
    // Leap seconds are parsed into the nanosecond field.
    if t.nanosecond() >= 1_000_000_000 {
        return Err(Error::malformed_input(format!(
            "leap second is not supported: {s}"
        )));
    }

    u64::try_from(t.and_utc().timestamp())
        .map_err(|_| Error::malformed_input(format!("iso8601 time is before unix epoch: {s}")))
}

/// Build a datetime from seconds since unix epoch.
pub fn datetime_from_unix_secs(secs: u64) -> Result<DateTime> {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or_else(|| Error::bad_parameter(format!("unix time {secs} is out of range")))
}

/// Build a datetime from microseconds since unix epoch.
pub fn datetime_from_unix_micros(micros: u64) -> Result<DateTime> {
    let secs = micros / MICROS_PER_SEC;
    let nanos = (micros % MICROS_PER_SEC) as u32 * 1_000;
    i64::try_from(secs)
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, nanos).single())
        .ok_or_else(|| Error::bad_parameter(format!("unix time {micros}us is out of range")))
}

/// Convert microseconds since unix epoch into a 64-bit NTP timestamp.
///
/// The high 32 bits carry seconds since 1900-01-01 and the low 32 bits carry
/// the fraction of a second scaled to 2^32. Seconds are truncated to 32 bits,
/// which is how NTP eras roll over.
pub fn ntp_time_from_unix_time_us(time_us: u64) -> u64 {
    let secs = time_us / MICROS_PER_SEC;
    let micros = time_us % MICROS_PER_SEC;

    let ntp_secs = (secs + NTP_UNIX_EPOCH_OFFSET_SECS) & 0xffff_ffff;
    let ntp_frac = micros * NTP_TIMESCALE / MICROS_PER_SEC;

    (ntp_secs << 32) | ntp_frac
}
