//! `quill-auth` - request authentication and per-resource authorization.
//!
//! This crate is intentionally decoupled from HTTP and storage: credentials
//! arrive as raw strings and members are found through [`ActorLookup`].

pub mod context;
pub mod member;
pub mod policy;
pub mod resolver;

pub use context::AuthContext;
pub use member::{ApiKey, Member, NewMember, username_taken};
pub use policy::{Access, AuthzError, OwnedResource, can_delete, can_modify, can_read};
pub use resolver::{ActorLookup, IdentityResolver};
