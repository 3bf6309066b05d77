//! Postgres-backed repositories.
//!
//! Uniqueness (username, API key) is enforced by the schema; unique
//! violations surface as `Conflict`, every other database failure as
//! `Internal` with the driver error logged, never returned to callers.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use quill_auth::{ActorLookup, ApiKey, Member, NewMember, username_taken};
use quill_core::{DomainError, DomainResult, MemberId, Page, PageRequest, PostId};
use quill_posts::{Author, ListQuery, NewPost, Post, PostChanges, post_not_found};

use super::{MemberRepository, PostRepository};
use crate::clock;

/// Idempotent schema bootstrap.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS members (
    id            BIGSERIAL PRIMARY KEY,
    username      TEXT      NOT NULL UNIQUE,
    password      TEXT      NOT NULL,
    nickname      TEXT      NOT NULL,
    api_key       TEXT      NOT NULL UNIQUE,
    created_date  TIMESTAMP NOT NULL,
    modified_date TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    id            BIGSERIAL PRIMARY KEY,
    author_id     BIGINT    NOT NULL REFERENCES members (id),
    title         TEXT      NOT NULL,
    content       TEXT      NOT NULL,
    published     BOOLEAN   NOT NULL,
    listed        BOOLEAN   NOT NULL,
    created_date  TIMESTAMP NOT NULL,
    modified_date TIMESTAMP NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_listed_id_idx ON posts (listed, id DESC);
CREATE INDEX IF NOT EXISTS posts_author_id_idx ON posts (author_id, id DESC);
"#;

/// Create tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    tracing::info!("database schema ready");
    Ok(())
}

fn storage_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |err| {
        tracing::error!(operation, error = %err, "database operation failed");
        DomainError::internal(format!("{operation}: {err}"))
    }
}

fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.is_unique_violation() && db.constraint().is_some_and(|c| c.contains(constraint))
        }
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Members
// ─────────────────────────────────────────────────────────────────────────────

const MEMBER_COLUMNS: &str =
    "id, username, password, nickname, api_key, created_date, modified_date";

fn member_from_row(row: &PgRow) -> Result<Member, sqlx::Error> {
    Ok(Member {
        id: MemberId::new(row.try_get("id")?),
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        nickname: row.try_get("nickname")?,
        api_key: ApiKey::from_string(row.try_get::<String, _>("api_key")?),
        created_date: row.try_get("created_date")?,
        modified_date: row.try_get("modified_date")?,
    })
}

pub struct PostgresMemberStore {
    pool: PgPool,
}

impl PostgresMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &'static str, value: &str) -> DomainResult<Option<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE {column} = $1");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("find_member"))?;

        row.as_ref()
            .map(member_from_row)
            .transpose()
            .map_err(storage_error("decode_member"))
    }
}

#[async_trait]
impl ActorLookup for PostgresMemberStore {
    async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<Member>> {
        self.find_one("api_key", api_key).await
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberStore {
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Member>> {
        self.find_one("username", username).await
    }

    async fn create(&self, new: NewMember) -> DomainResult<Member> {
        let now = clock::now();
        let result = sqlx::query(
            r#"
            INSERT INTO members (username, password, nickname, api_key, created_date, modified_date)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(&new.username)
        .bind(&new.password)
        .bind(&new.nickname)
        .bind(new.api_key.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err, "username") => return Err(username_taken()),
            Err(err) if is_unique_violation(&err, "api_key") => {
                return Err(DomainError::conflict(2, "API key is already in use."));
            }
            Err(err) => return Err(storage_error("create_member")(err)),
        };

        Ok(Member {
            id: MemberId::new(row.try_get("id").map_err(storage_error("decode_member"))?),
            username: new.username,
            password: new.password,
            nickname: new.nickname,
            api_key: new.api_key,
            created_date: now,
            modified_date: now,
        })
    }

    async fn count(&self) -> DomainResult<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("count_members"))?;
        Ok(n.max(0) as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Posts
// ─────────────────────────────────────────────────────────────────────────────

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.published, p.listed,
           p.created_date, p.modified_date,
           p.author_id, m.nickname AS author_nickname
    FROM posts p
    JOIN members m ON m.id = p.author_id
"#;

fn post_from_row(row: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: PostId::new(row.try_get("id")?),
        author: Author {
            id: MemberId::new(row.try_get("author_id")?),
            nickname: row.try_get("author_nickname")?,
        },
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        published: row.try_get("published")?,
        listed: row.try_get("listed")?,
        created_date: row.try_get("created_date")?,
        modified_date: row.try_get("modified_date")?,
    })
}

fn posts_from_rows(rows: &[PgRow]) -> DomainResult<Vec<Post>> {
    rows.iter()
        .map(post_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(storage_error("decode_post"))
}

pub struct PostgresPostStore {
    pool: PgPool,
}

impl PostgresPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostStore {
    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<Post>> {
        let sql = format!("{POST_SELECT} WHERE p.id = $1");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("find_post"))?;

        row.as_ref()
            .map(post_from_row)
            .transpose()
            .map_err(storage_error("decode_post"))
    }

    async fn create(&self, new: NewPost) -> DomainResult<Post> {
        let now = clock::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (author_id, title, content, published, listed, created_date, modified_date)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id
            "#,
        )
        .bind(new.author.id.get())
        .bind(&new.title)
        .bind(&new.content)
        .bind(new.published)
        .bind(new.listed)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("create_post"))?;

        Ok(Post {
            id: PostId::new(id),
            author: new.author,
            title: new.title,
            content: new.content,
            published: new.published,
            listed: new.listed,
            created_date: now,
            modified_date: now,
        })
    }

    async fn update(&self, post: &Post, changes: PostChanges) -> DomainResult<Post> {
        let updated = post.with_changes(changes, clock::now());
        let result = sqlx::query(
            "UPDATE posts SET title = $1, content = $2, modified_date = $3 WHERE id = $4",
        )
        .bind(&updated.title)
        .bind(&updated.content)
        .bind(updated.modified_date)
        .bind(post.id.get())
        .execute(&self.pool)
        .await
        .map_err(storage_error("update_post"))?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(post.id));
        }
        Ok(updated)
    }

    async fn delete(&self, post: &Post) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post.id.get())
            .execute(&self.pool)
            .await
            .map_err(storage_error("delete_post"))?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(post.id));
        }
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> DomainResult<Page<Post>> {
        const FILTER: &str = "p.listed AND ($1::TEXT IS NULL OR strpos(p.title, $1) > 0)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM posts p WHERE {FILTER}"))
            .bind(query.keyword.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("count_posts"))?;

        let sql = format!("{POST_SELECT} WHERE {FILTER} ORDER BY p.id DESC LIMIT $2 OFFSET $3");
        let rows = sqlx::query(&sql)
            .bind(query.keyword.as_deref())
            .bind(i64::from(query.page.page_size()))
            .bind(query.page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("list_posts"))?;

        Ok(Page::new(posts_from_rows(&rows)?, query.page, total.max(0) as u64))
    }

    async fn list_by_author(&self, author: MemberId, page: PageRequest) -> DomainResult<Page<Post>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author.get())
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("count_posts"))?;

        let sql = format!("{POST_SELECT} WHERE p.author_id = $1 ORDER BY p.id DESC LIMIT $2 OFFSET $3");
        let rows = sqlx::query(&sql)
            .bind(author.get())
            .bind(i64::from(page.page_size()))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("list_posts_by_author"))?;

        Ok(Page::new(posts_from_rows(&rows)?, page, total.max(0) as u64))
    }

    async fn latest(&self) -> DomainResult<Option<Post>> {
        let sql = format!("{POST_SELECT} ORDER BY p.id DESC LIMIT 1");
        let row = sqlx::query(&sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("latest_post"))?;

        row.as_ref()
            .map(post_from_row)
            .transpose()
            .map_err(storage_error("decode_post"))
    }

    async fn count(&self) -> DomainResult<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("count_posts"))?;
        Ok(n.max(0) as u64)
    }
}
