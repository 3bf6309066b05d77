//! Posts domain module.
//!
//! Business rules for blog posts (ownership, visibility, field constraints),
//! implemented as plain domain logic (no IO, no HTTP, no storage).

pub mod post;

pub use post::{Author, ListQuery, NewPost, Post, PostChanges, post_not_found, validate_post_fields};
