//! In-memory repositories for tests/dev.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use quill_auth::{ActorLookup, Member, NewMember, username_taken};
use quill_core::{DomainError, DomainResult, MemberId, Page, PageRequest, PostId};
use quill_posts::{ListQuery, NewPost, Post, PostChanges, post_not_found};

use super::{MemberRepository, PostRepository};
use crate::clock;

/// Rows keyed by id plus the next id to hand out (ids start at 1).
#[derive(Debug)]
struct Table<K, V> {
    next_id: i64,
    rows: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> DomainResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| DomainError::internal("in-memory store lock poisoned"))
}

fn write<T>(lock: &RwLock<T>) -> DomainResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| DomainError::internal("in-memory store lock poisoned"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Members
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryMemberStore {
    inner: RwLock<Table<MemberId, Member>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActorLookup for InMemoryMemberStore {
    async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<Member>> {
        let table = read(&self.inner)?;
        Ok(table
            .rows
            .values()
            .find(|m| m.api_key.as_str() == api_key)
            .cloned())
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberStore {
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Member>> {
        let table = read(&self.inner)?;
        Ok(table.rows.values().find(|m| m.username == username).cloned())
    }

    async fn create(&self, new: NewMember) -> DomainResult<Member> {
        let mut table = write(&self.inner)?;

        if table.rows.values().any(|m| m.username == new.username) {
            return Err(username_taken());
        }
        if table.rows.values().any(|m| m.api_key == new.api_key) {
            return Err(DomainError::conflict(2, "API key is already in use."));
        }

        let id = MemberId::new(table.next_id);
        table.next_id += 1;

        let now = clock::now();
        let member = Member {
            id,
            username: new.username,
            password: new.password,
            nickname: new.nickname,
            api_key: new.api_key,
            created_date: now,
            modified_date: now,
        };
        table.rows.insert(id, member.clone());
        Ok(member)
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(read(&self.inner)?.rows.len() as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Posts
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    inner: RwLock<Table<PostId, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest-first slice of `matching` for `page`.
fn paginate<'a>(matching: impl DoubleEndedIterator<Item = &'a Post>, page: PageRequest) -> Page<Post> {
    let all: Vec<&Post> = matching.rev().collect();
    let total = all.len() as u64;
    let items = all
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.page_size() as usize)
        .cloned()
        .collect();
    Page::new(items, page, total)
}

#[async_trait]
impl PostRepository for InMemoryPostStore {
    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<Post>> {
        Ok(read(&self.inner)?.rows.get(&id).cloned())
    }

    async fn create(&self, new: NewPost) -> DomainResult<Post> {
        let mut table = write(&self.inner)?;

        let id = PostId::new(table.next_id);
        table.next_id += 1;

        let now = clock::now();
        let post = Post {
            id,
            author: new.author,
            title: new.title,
            content: new.content,
            published: new.published,
            listed: new.listed,
            created_date: now,
            modified_date: now,
        };
        table.rows.insert(id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: &Post, changes: PostChanges) -> DomainResult<Post> {
        let mut table = write(&self.inner)?;
        let stored = table
            .rows
            .get_mut(&post.id)
            .ok_or_else(|| post_not_found(post.id))?;

        *stored = stored.with_changes(changes, clock::now());
        Ok(stored.clone())
    }

    async fn delete(&self, post: &Post) -> DomainResult<()> {
        let mut table = write(&self.inner)?;
        table
            .rows
            .remove(&post.id)
            .map(|_| ())
            .ok_or_else(|| post_not_found(post.id))
    }

    async fn list(&self, query: &ListQuery) -> DomainResult<Page<Post>> {
        let table = read(&self.inner)?;
        Ok(paginate(
            table.rows.values().filter(|p| query.matches(p)),
            query.page,
        ))
    }

    async fn list_by_author(&self, author: MemberId, page: PageRequest) -> DomainResult<Page<Post>> {
        let table = read(&self.inner)?;
        Ok(paginate(
            table.rows.values().filter(|p| p.author.id == author),
            page,
        ))
    }

    async fn latest(&self) -> DomainResult<Option<Post>> {
        let table = read(&self.inner)?;
        Ok(table.rows.values().next_back().cloned())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(read(&self.inner)?.rows.len() as u64)
    }
}
