//! Result codes of the form `<status>-<seq>` (e.g. `"200-1"`, `"404-1"`).
//!
//! The leading three digits are the HTTP-equivalent status class; the suffix
//! disambiguates outcomes that share a status (`"401-1"` unknown username vs.
//! `"401-2"` wrong password).

use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResultCode {
    status: u16,
    seq: u16,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed result code '{0}' (expected '<status>-<seq>')")]
pub struct ParseResultCodeError(String);

impl ResultCode {
    pub const OK: ResultCode = ResultCode::new(200, 1);
    pub const CREATED: ResultCode = ResultCode::new(201, 1);

    pub const fn new(status: u16, seq: u16) -> Self {
        Self { status, seq }
    }

    /// HTTP-equivalent status class (the leading three digits).
    pub const fn status(self) -> u16 {
        self.status
    }

    pub const fn seq(self) -> u16 {
        self.seq
    }

    pub const fn is_success(self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

impl core::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.status, self.seq)
    }
}

impl FromStr for ResultCode {
    type Err = ParseResultCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseResultCodeError(s.to_string());

        let (status, seq) = s.split_once('-').ok_or_else(malformed)?;
        if status.len() != 3 || !status.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let status = status.parse::<u16>().map_err(|_| malformed())?;
        let seq = seq.parse::<u16>().map_err(|_| malformed())?;
        if !(100..600).contains(&status) {
            return Err(malformed());
        }

        Ok(Self { status, seq })
    }
}

impl Serialize for ResultCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
