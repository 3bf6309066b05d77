use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use quill_auth::{ActorLookup, IdentityResolver};
use quill_infra::{
    InMemoryMemberStore, InMemoryPostStore, MemberRepository, PostRepository, PostgresMemberStore,
    PostgresPostStore, ensure_schema, seed::seed_if_empty,
};

use crate::config::Config;

/// Shared handles every handler works through.
#[derive(Clone)]
pub struct AppServices {
    members: Arc<dyn MemberRepository>,
    posts: Arc<dyn PostRepository>,
    identity: IdentityResolver,
    default_page_size: u32,
}

impl AppServices {
    /// Wire services over any member/post store pair.
    ///
    /// The member store doubles as the API-key lookup behind the identity resolver.
    pub fn new<M>(members: Arc<M>, posts: Arc<dyn PostRepository>, default_page_size: u32) -> Self
    where
        M: MemberRepository + 'static,
    {
        let lookup: Arc<dyn ActorLookup> = members.clone();
        Self {
            members,
            posts,
            identity: IdentityResolver::new(lookup),
            default_page_size,
        }
    }

    pub fn in_memory(default_page_size: u32) -> Self {
        Self::new(
            Arc::new(InMemoryMemberStore::new()),
            Arc::new(InMemoryPostStore::new()),
            default_page_size,
        )
    }

    pub fn members(&self) -> &dyn MemberRepository {
        self.members.as_ref()
    }

    pub fn posts(&self) -> &dyn PostRepository {
        self.posts.as_ref()
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("default_page_size", &self.default_page_size)
            .finish_non_exhaustive()
    }
}

/// Pick the storage backend from config, bootstrap it, and seed fixtures if asked.
pub async fn build_services(config: &Config) -> anyhow::Result<AppServices> {
    let services = match config.database_url.as_deref() {
        Some(url) => build_postgres_services(url, config.default_page_size).await?,
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory stores");
            AppServices::in_memory(config.default_page_size)
        }
    };

    if config.seed_data {
        seed_if_empty(services.members(), services.posts())
            .await
            .map_err(|e| anyhow::anyhow!("seeding fixture data failed: {e:?}"))?;
    }

    Ok(services)
}

async fn build_postgres_services(url: &str, default_page_size: u32) -> anyhow::Result<AppServices> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .context("failed to connect to Postgres")?;

    ensure_schema(&pool)
        .await
        .context("failed to create database schema")?;
    tracing::info!("connected to Postgres; schema ready");

    Ok(AppServices::new(
        Arc::new(PostgresMemberStore::new(pool.clone())),
        Arc::new(PostgresPostStore::new(pool)),
        default_page_size,
    ))
}
