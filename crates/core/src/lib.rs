//! `quill-core` - domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error taxonomy, result codes, field validation and
//! paging value objects.

pub mod error;
pub mod id;
pub mod page;
pub mod result_code;
pub mod validation;

pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{MemberId, PostId};
pub use page::{Page, PageRequest};
pub use result_code::ResultCode;
pub use validation::{Validate, Violation, Violations};
