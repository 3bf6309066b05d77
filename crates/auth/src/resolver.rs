//! Identity resolution: raw credential -> member.

use std::sync::Arc;

use async_trait::async_trait;

use quill_core::DomainResult;

use crate::{AuthContext, AuthzError, Member};

/// Longest credential worth a lookup; anything longer cannot be an issued key.
const MAX_CREDENTIAL_LEN: usize = 256;

/// Member lookup collaborator used by the resolver.
///
/// Implemented by the member repository; kept here so this crate stays free of
/// storage concerns.
#[async_trait]
pub trait ActorLookup: Send + Sync {
    async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<Member>>;
}

/// Resolves credentials against stored API keys.
///
/// Exactly one lookup per `resolve` call, no caching and no fallback schemes.
/// Per-request memoization lives in [`AuthContext`].
#[derive(Clone)]
pub struct IdentityResolver {
    lookup: Arc<dyn ActorLookup>,
}

impl IdentityResolver {
    pub fn new(lookup: Arc<dyn ActorLookup>) -> Self {
        Self { lookup }
    }

    /// Start a fresh per-request context for `credential` (`None` = no header).
    pub fn context(&self, credential: Option<String>) -> AuthContext {
        AuthContext::new(credential, self.clone())
    }

    pub async fn resolve(&self, raw: &str) -> DomainResult<Member> {
        let key = raw.trim();
        if !is_well_formed(key) {
            tracing::debug!("rejecting empty or malformed credential");
            return Err(AuthzError::InvalidCredential.into());
        }

        match self.lookup.find_by_api_key(key).await? {
            Some(member) => {
                tracing::debug!(member_id = %member.id, "credential resolved");
                Ok(member)
            }
            None => {
                tracing::debug!("credential matched no member");
                Err(AuthzError::InvalidCredential.into())
            }
        }
    }
}

fn is_well_formed(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_CREDENTIAL_LEN
        && key.bytes().all(|b| b.is_ascii_graphic())
}
