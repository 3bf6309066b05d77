//! Repository boundary for members and posts.
//!
//! Handlers and services only see these traits; the backend (in-memory for
//! tests/dev, Postgres for production) is picked at startup.
//!
//! Each mutating call is a single atomic unit against the backend. Concurrent
//! updates of the same post are last-write-wins.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;

use quill_auth::{ActorLookup, Member, NewMember};
use quill_core::{DomainResult, MemberId, Page, PageRequest, PostId};
use quill_posts::{ListQuery, NewPost, Post, PostChanges};

pub use in_memory::{InMemoryMemberStore, InMemoryPostStore};
pub use postgres::{PostgresMemberStore, PostgresPostStore};

/// Member persistence. API-key lookup comes from [`ActorLookup`].
#[async_trait]
pub trait MemberRepository: ActorLookup {
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Member>>;

    /// Fails with `Conflict` when the username or API key is already taken.
    async fn create(&self, new: NewMember) -> DomainResult<Member>;

    async fn count(&self) -> DomainResult<u64>;
}

/// Post persistence.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<Post>>;

    async fn create(&self, new: NewPost) -> DomainResult<Post>;

    /// Fails with `NotFound` if the post vanished since it was loaded.
    async fn update(&self, post: &Post, changes: PostChanges) -> DomainResult<Post>;

    async fn delete(&self, post: &Post) -> DomainResult<()>;

    /// Listed posts only, newest first.
    async fn list(&self, query: &ListQuery) -> DomainResult<Page<Post>>;

    /// All of one author's posts (listed or not), newest first.
    async fn list_by_author(&self, author: MemberId, page: PageRequest) -> DomainResult<Page<Post>>;

    /// Post with the highest id.
    async fn latest(&self) -> DomainResult<Option<Post>>;

    async fn count(&self) -> DomainResult<u64>;
}
