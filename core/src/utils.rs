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

//! Utility functions and types.

use std::fmt::Debug;

/// Redact hides secrets such as access keys when they are formatted.
///
/// Values shorter than 12 bytes are fully hidden. Longer values keep their
/// first and last three characters so that two keys can still be told apart
/// in a log line.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = self.0;
        if v.is_empty() {
            return f.write_str("EMPTY");
        }

        // Slicing must stay on char boundaries.
        let head = v.char_indices().nth(3).map(|(i, _)| i);
        let tail = v.char_indices().rev().nth(2).map(|(i, _)| i);
        match (head, tail) {
            (Some(head), Some(tail)) if v.len() >= 12 && head <= tail => {
                write!(f, "{}***{}", &v[..head], &v[tail..])
            }
            _ => f.write_str("***"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", "EMPTY" ; "empty")]
    #[test_case("session", "***" ; "short")]
    #[test_case("AKIDEXAMPL", "***" ; "ten chars")]
    #[test_case("AKIDEXAMPLE1", "AKI***LE1" ; "twelve chars")]
    #[test_case("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY", "wJa***KEY" ; "secret key")]
    #[test_case("clé-secrète-très-longue", "clé***gue" ; "multi byte")]
    fn test_redact(input: &str, expected: &str) {
        assert_eq!(format!("{:?}", Redact::from(input)), expected);
    }

    #[test]
    fn test_redact_option() {
        let none: Option<String> = None;
        assert_eq!(format!("{:?}", Redact::from(&none)), "EMPTY");

        let some = Some("AQoDYXdzEPT//////////wEXAMPLE".to_string());
        assert_eq!(format!("{:?}", Redact::from(&some)), "AQo***PLE");
    }
}
