//! Per-request authentication context.

use tokio::sync::OnceCell;

use quill_core::DomainResult;

use crate::{IdentityResolver, Member, OwnedResource, can_delete, can_modify, can_read};

/// Credential of one in-flight request plus its lazily resolved actor.
///
/// Built fresh for every request and dropped with it. The resolver runs at most
/// once per context, on the first call that needs an actor; its outcome,
/// success or failure, is reused for the rest of the request.
pub struct AuthContext {
    credential: Option<String>,
    resolver: IdentityResolver,
    resolution: OnceCell<DomainResult<Member>>,
}

impl AuthContext {
    pub(crate) fn new(credential: Option<String>, resolver: IdentityResolver) -> Self {
        Self {
            credential,
            resolver,
            resolution: OnceCell::new(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// The authenticated actor, resolving the credential on first use.
    pub async fn actor(&self) -> DomainResult<&Member> {
        let resolution = self
            .resolution
            .get_or_init(|| async {
                let raw = self.credential.as_deref().unwrap_or_default();
                self.resolver.resolve(raw).await
            })
            .await;

        resolution.as_ref().map_err(Clone::clone)
    }

    /// Actor if one was already resolved successfully; never triggers a lookup.
    pub fn resolved_actor(&self) -> Option<&Member> {
        self.resolution.get().and_then(|r| r.as_ref().ok())
    }

    /// Visibility first: published resources never force a resolution.
    pub async fn ensure_can_read<R: OwnedResource>(&self, resource: &R) -> DomainResult<()> {
        if resource.is_published() {
            return Ok(());
        }
        let actor = self.actor().await?;
        Ok(can_read(Some(actor), resource)?)
    }

    pub async fn ensure_can_modify<R: OwnedResource>(&self, resource: &R) -> DomainResult<&Member> {
        let actor = self.actor().await?;
        can_modify(actor, resource)?;
        Ok(actor)
    }

    pub async fn ensure_can_delete<R: OwnedResource>(&self, resource: &R) -> DomainResult<&Member> {
        let actor = self.actor().await?;
        can_delete(actor, resource)?;
        Ok(actor)
    }
}

impl core::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthContext")
            .field("has_credential", &self.has_credential())
            .field("resolved", &self.resolution.initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use quill_core::MemberId;

    use crate::{ActorLookup, ApiKey};

    struct CountingLookup {
        member: Member,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ActorLookup for CountingLookup {
        async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<Member>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((self.member.api_key.as_str() == api_key).then(|| self.member.clone()))
        }
    }

    struct Doc {
        owner: MemberId,
        published: bool,
    }

    impl OwnedResource for Doc {
        const KIND: &'static str = "post";

        fn owner_id(&self) -> MemberId {
            self.owner
        }

        fn is_published(&self) -> bool {
            self.published
        }
    }

    fn lookup() -> Arc<CountingLookup> {
        let now = chrono::Local::now().naive_local();
        Arc::new(CountingLookup {
            member: Member {
                id: MemberId::new(3),
                username: "user1".to_string(),
                password: "user11234".to_string(),
                nickname: "Alice".to_string(),
                api_key: ApiKey::from_string("user1"),
                created_date: now,
                modified_date: now,
            },
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn resolution_is_memoized_within_a_context() {
        let lookup = lookup();
        let resolver = IdentityResolver::new(lookup.clone());
        let ctx = resolver.context(Some("user1".to_string()));

        assert!(ctx.resolved_actor().is_none());
        let first = ctx.actor().await.unwrap().id;
        let second = ctx.actor().await.unwrap().id;

        assert_eq!(first, second);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.resolved_actor().map(|m| m.id), Some(MemberId::new(3)));
    }

    #[tokio::test]
    async fn failed_resolution_is_not_retried() {
        let lookup = lookup();
        let ctx = IdentityResolver::new(lookup.clone()).context(Some("nope".to_string()));

        assert_eq!(ctx.actor().await.unwrap_err().code().to_string(), "401-1");
        assert_eq!(ctx.actor().await.unwrap_err().code().to_string(), "401-1");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn contexts_do_not_share_resolutions() {
        let lookup = lookup();
        let resolver = IdentityResolver::new(lookup.clone());

        resolver.context(Some("user1".to_string())).actor().await.unwrap();
        resolver.context(Some("user1".to_string())).actor().await.unwrap();

        assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn public_reads_never_resolve() {
        let lookup = lookup();
        let ctx = IdentityResolver::new(lookup.clone()).context(None);

        let doc = Doc { owner: MemberId::new(9), published: true };
        ctx.ensure_can_read(&doc).await.unwrap();

        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn private_reads_without_credential_are_unauthenticated() {
        let ctx = IdentityResolver::new(lookup()).context(None);

        let doc = Doc { owner: MemberId::new(3), published: false };
        let err = ctx.ensure_can_read(&doc).await.unwrap_err();
        assert_eq!(err.code().to_string(), "401-1");
    }

    #[tokio::test]
    async fn owner_checks_follow_resolved_actor() {
        let ctx = IdentityResolver::new(lookup()).context(Some("user1".to_string()));

        let own = Doc { owner: MemberId::new(3), published: false };
        let foreign = Doc { owner: MemberId::new(4), published: true };

        ctx.ensure_can_read(&own).await.unwrap();
        assert_eq!(ctx.ensure_can_modify(&own).await.unwrap().id, MemberId::new(3));
        assert_eq!(
            ctx.ensure_can_delete(&foreign).await.unwrap_err().code().to_string(),
            "403-1"
        );
    }
}
