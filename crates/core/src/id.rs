//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are assigned by the store (monotonic, starting at 1), so they are
//! numeric rather than client-generated.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a member (actor identity).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(i64);

/// Identifier of a post.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

macro_rules! impl_numeric_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.trim().parse::<i64>().map_err(|_| {
                    DomainError::invalid_field("id", "Numeric", format!("{} must be an integer", $name))
                })?;
                Ok(Self(value))
            }
        }
    };
}

impl_numeric_id!(MemberId, "MemberId");
impl_numeric_id!(PostId, "PostId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_numeric_ids() {
        let id: PostId = " 42 ".parse().unwrap();
        assert_eq!(id, PostId::new(42));
        assert_eq!(id.to_string(), "42");
        assert_eq!(i64::from(MemberId::from(7)), 7);
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = "abc".parse::<PostId>().unwrap_err();
        assert_eq!(err.code().to_string(), "400-1");
        assert_eq!(err.to_string(), "id : Numeric : PostId must be an integer");
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&MemberId::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}
