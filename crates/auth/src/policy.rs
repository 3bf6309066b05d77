//! Per-resource authorization policy.
//!
//! Authorization is scoped to the resource instance: the only privilege is
//! ownership. Read access additionally depends on the resource's visibility,
//! which is checked first so public reads never need an actor.

use thiserror::Error;

use quill_core::{DomainError, MemberId};

use crate::Member;

/// What the policy needs to know about a guarded resource.
pub trait OwnedResource {
    /// Lower-case noun used in denial messages (e.g. `"post"`).
    const KIND: &'static str;

    fn owner_id(&self) -> MemberId;

    /// Published resources are readable by anyone, including anonymous callers.
    fn is_published(&self) -> bool;
}

/// Action being authorized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Modify,
    Delete,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Invalid API key.")]
    InvalidCredential,

    #[error("{}", forbidden_message(.access, .kind))]
    Forbidden { access: Access, kind: &'static str },
}

fn forbidden_message(access: &Access, kind: &str) -> String {
    match access {
        Access::Read => format!("This {kind} is private."),
        Access::Modify => format!("You can only modify your own {kind}s."),
        Access::Delete => format!("You can only delete your own {kind}s."),
    }
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::InvalidCredential => DomainError::unauthenticated(1, value.to_string()),
            AuthzError::Forbidden { .. } => DomainError::forbidden(1, value.to_string()),
        }
    }
}

fn ensure_owner<R: OwnedResource>(actor: &Member, resource: &R, access: Access) -> Result<(), AuthzError> {
    if actor.id == resource.owner_id() {
        Ok(())
    } else {
        tracing::debug!(
            actor_id = %actor.id,
            owner_id = %resource.owner_id(),
            ?access,
            kind = R::KIND,
            "access denied"
        );
        Err(AuthzError::Forbidden { access, kind: R::KIND })
    }
}

/// Published resources pass without an actor; unpublished ones need the owner.
pub fn can_read<R: OwnedResource>(actor: Option<&Member>, resource: &R) -> Result<(), AuthzError> {
    if resource.is_published() {
        return Ok(());
    }
    let actor = actor.ok_or(AuthzError::InvalidCredential)?;
    ensure_owner(actor, resource, Access::Read)
}

/// Only the owner may modify, regardless of visibility.
pub fn can_modify<R: OwnedResource>(actor: &Member, resource: &R) -> Result<(), AuthzError> {
    ensure_owner(actor, resource, Access::Modify)
}

/// Only the owner may delete, regardless of visibility.
pub fn can_delete<R: OwnedResource>(actor: &Member, resource: &R) -> Result<(), AuthzError> {
    ensure_owner(actor, resource, Access::Delete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiKey;

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

    fn member(id: i64) -> Member {
        let now = chrono::Local::now().naive_local();
        Member {
            id: MemberId::new(id),
            username: format!("user{id}"),
            password: "pw".to_string(),
            nickname: format!("nick{id}"),
            api_key: ApiKey::generate(),
            created_date: now,
            modified_date: now,
        }
    }

    #[test]
    fn published_resources_are_readable_anonymously() {
        let doc = Doc { owner: MemberId::new(1), published: true };
        assert!(can_read(None, &doc).is_ok());
        assert!(can_read(Some(&member(2)), &doc).is_ok());
    }

    #[test]
    fn unpublished_resources_need_an_actor() {
        let doc = Doc { owner: MemberId::new(1), published: false };
        let err: DomainError = can_read(None, &doc).unwrap_err().into();
        assert_eq!(err.code().to_string(), "401-1");
    }

    #[test]
    fn unpublished_resources_are_readable_by_owner_only() {
        let doc = Doc { owner: MemberId::new(1), published: false };
        assert!(can_read(Some(&member(1)), &doc).is_ok());

        let err = can_read(Some(&member(2)), &doc).unwrap_err();
        assert_eq!(err.to_string(), "This post is private.");
        assert_eq!(DomainError::from(err).code().to_string(), "403-1");
    }

    #[test]
    fn modify_and_delete_require_ownership_regardless_of_visibility() {
        for published in [true, false] {
            let doc = Doc { owner: MemberId::new(1), published };

            assert!(can_modify(&member(1), &doc).is_ok());
            assert!(can_delete(&member(1), &doc).is_ok());

            let modify = can_modify(&member(2), &doc).unwrap_err();
            assert_eq!(modify.to_string(), "You can only modify your own posts.");
            assert_eq!(DomainError::from(modify).code().to_string(), "403-1");

            let delete = can_delete(&member(2), &doc).unwrap_err();
            assert_eq!(delete.to_string(), "You can only delete your own posts.");
        }
    }
}
