//! Member identity record (the actor behind a request).

use chrono::NaiveDateTime;
use uuid::Uuid;

use quill_core::{DomainError, MemberId};

// ─────────────────────────────────────────────────────────────────────────────
// API Key
// ─────────────────────────────────────────────────────────────────────────────

/// Long-lived credential assigned to a member at signup. Never rotated.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiKey(String);

impl ApiKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing key (persisted rows, fixtures).
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Member
// ─────────────────────────────────────────────────────────────────────────────

/// A registered member.
///
/// # Invariants
/// - `username` and `api_key` are unique across members (enforced by the store).
/// - `api_key` is fixed at creation.
///
/// The password is stored and compared as plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub api_key: ApiKey,
    pub created_date: NaiveDateTime,
    pub modified_date: NaiveDateTime,
}

impl Member {
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

impl core::fmt::Debug for Member {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("nickname", &self.nickname)
            .field("created_date", &self.created_date)
            .field("modified_date", &self.modified_date)
            .finish_non_exhaustive()
    }
}

/// Input for creating a member.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub api_key: ApiKey,
}

impl NewMember {
    /// New member with a freshly generated API key.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        nickname: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            nickname: nickname.into(),
            api_key: ApiKey::generate(),
        }
    }

    pub fn with_api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = api_key;
        self
    }
}

/// `409-1` for a signup whose username already belongs to a member.
pub fn username_taken() -> DomainError {
    DomainError::conflict(1, "Username is already in use.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn debug_output_hides_credentials() {
        let now = chrono::Local::now().naive_local();
        let member = Member {
            id: MemberId::new(1),
            username: "user1".to_string(),
            password: "user11234".to_string(),
            nickname: "Alice".to_string(),
            api_key: ApiKey::from_string("secret-key"),
            created_date: now,
            modified_date: now,
        };

        let rendered = format!("{member:?}");
        assert!(!rendered.contains("user11234"));
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("Alice"));
    }

    #[test]
    fn password_comparison_is_exact() {
        let now = chrono::Local::now().naive_local();
        let member = Member {
            id: MemberId::new(1),
            username: "user1".to_string(),
            password: "user11234".to_string(),
            nickname: "Alice".to_string(),
            api_key: ApiKey::generate(),
            created_date: now,
            modified_date: now,
        };

        assert!(member.password_matches("user11234"));
        assert!(!member.password_matches("1234"));
        assert!(!member.password_matches("user11234 "));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 32,
            ..ProptestConfig::default()
        })]

        /// Property: every signup gets a distinct key.
        #[test]
        fn generated_keys_are_distinct(count in 2usize..200) {
            let keys: HashSet<String> = (0..count)
                .map(|i| NewMember::new(format!("user{i}"), "pw", "nick").api_key.as_str().to_string())
                .collect();
            prop_assert_eq!(keys.len(), count);
        }
    }
}
