//! Fixture data for fresh installs and tests.
//!
//! Seeded members use their username as API key and `<username>1234` as
//! password, so local clients and black-box tests can authenticate without
//! a signup round trip.

use quill_auth::{ApiKey, NewMember};
use quill_core::DomainResult;
use quill_posts::{Author, NewPost};

use crate::{MemberRepository, PostRepository};

const MEMBERS: [(&str, &str); 5] = [
    ("system", "System"),
    ("admin", "Admin"),
    ("user1", "User One"),
    ("user2", "User Two"),
    ("user3", "User Three"),
];

/// (author username, title, published, listed), inserted in order so ids are 1..=4.
const POSTS: [(&str, &str, bool, bool); 4] = [
    ("user1", "Title 1", true, true),
    ("user1", "Title 2", true, true),
    ("user2", "Title 3", true, true),
    ("user3", "Private draft", false, false),
];

/// Insert fixture members and posts unless members already exist.
///
/// Returns whether anything was inserted.
pub async fn seed_if_empty(
    members: &dyn MemberRepository,
    posts: &dyn PostRepository,
) -> DomainResult<bool> {
    if members.count().await? > 0 {
        tracing::debug!("members present; skipping seed data");
        return Ok(false);
    }

    for (username, nickname) in MEMBERS {
        members
            .create(
                NewMember::new(username, format!("{username}1234"), nickname)
                    .with_api_key(ApiKey::from_string(username)),
            )
            .await?;
    }

    for (username, title, published, listed) in POSTS {
        let Some(author) = members.find_by_username(username).await? else {
            continue;
        };
        posts
            .create(NewPost {
                author: Author::from(&author),
                title: title.to_string(),
                content: format!("{title} content"),
                published,
                listed,
            })
            .await?;
    }

    tracing::info!(
        members = MEMBERS.len(),
        posts = POSTS.len(),
        "seed data inserted"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryMemberStore, InMemoryPostStore};
    use quill_auth::ActorLookup;
    use quill_core::PostId;

    #[tokio::test]
    async fn seeds_once_with_expected_fixture() {
        let members = InMemoryMemberStore::new();
        let posts = InMemoryPostStore::new();

        assert!(seed_if_empty(&members, &posts).await.unwrap());
        assert!(!seed_if_empty(&members, &posts).await.unwrap());

        assert_eq!(members.count().await.unwrap(), 5);
        assert_eq!(posts.count().await.unwrap(), 4);

        let user1 = members.find_by_api_key("user1").await.unwrap().unwrap();
        assert!(user1.password_matches("user11234"));

        let first = posts.find_by_id(PostId::new(1)).await.unwrap().unwrap();
        assert_eq!(first.author.id, user1.id);

        let draft = posts.find_by_id(PostId::new(4)).await.unwrap().unwrap();
        assert!(!draft.published);
        assert!(!draft.listed);
    }
}
