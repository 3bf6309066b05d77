//! Infrastructure layer: repositories, storage backends, fixture data.

pub mod clock;
pub mod seed;
pub mod store;

pub use store::postgres::ensure_schema;
pub use store::{
    InMemoryMemberStore, InMemoryPostStore, MemberRepository, PostRepository,
    PostgresMemberStore, PostgresPostStore,
};
