use chrono::NaiveDateTime;

use quill_auth::{Member, OwnedResource};
use quill_core::{DomainError, MemberId, PageRequest, PostId, Validate, Violations};

/// `404-1` for a post id with no backing record.
pub fn post_not_found(id: PostId) -> DomainError {
    DomainError::not_found(1, format!("Post #{id} does not exist."))
}

/// Owning member as seen from a post (id + display name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: MemberId,
    pub nickname: String,
}

impl From<&Member> for Author {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            nickname: member.nickname.clone(),
        }
    }
}

/// A blog post.
///
/// # Invariants
/// - `author` is fixed at creation; only the author may modify or delete.
/// - `published == false` hides the post from everyone but its author.
/// - `listed == false` keeps the post out of enumerations, whatever `published` says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author: Author,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub listed: bool,
    pub created_date: NaiveDateTime,
    pub modified_date: NaiveDateTime,
}

impl Post {
    /// Copy of this post with `changes` applied at `now`. Ownership and flags are kept.
    pub fn with_changes(&self, changes: PostChanges, now: NaiveDateTime) -> Self {
        Self {
            title: changes.title,
            content: changes.content,
            modified_date: now,
            ..self.clone()
        }
    }
}

impl OwnedResource for Post {
    const KIND: &'static str = "post";

    fn owner_id(&self) -> MemberId {
        self.author.id
    }

    fn is_published(&self) -> bool {
        self.published
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: Author,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub listed: bool,
}

/// Editable fields of an existing post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
}

/// Field rules shared by every post payload: title and content must not be blank.
pub fn validate_post_fields(title: &str, content: &str) -> Result<(), Violations> {
    let mut v = Violations::new();
    v.not_blank("title", title).not_blank("content", content);
    v.into_result()
}

impl Validate for PostChanges {
    fn validate(&self) -> Result<(), Violations> {
        validate_post_fields(&self.title, &self.content)
    }
}

/// Enumeration query: listed posts only, optionally filtered by title keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub keyword: Option<String>,
    pub page: PageRequest,
}

impl ListQuery {
    /// Blank keywords are treated as no filter.
    pub fn new(keyword: Option<String>, page: PageRequest) -> Self {
        let keyword = keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self { keyword, page }
    }

    pub fn matches(&self, post: &Post) -> bool {
        post.listed
            && self
                .keyword
                .as_deref()
                .is_none_or(|k| post.title.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_time() -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    fn test_post(published: bool, listed: bool) -> Post {
        let now = test_time();
        Post {
            id: PostId::new(1),
            author: Author {
                id: MemberId::new(3),
                nickname: "Alice".to_string(),
            },
            title: "First post".to_string(),
            content: "Hello".to_string(),
            published,
            listed,
            created_date: now,
            modified_date: now,
        }
    }

    #[test]
    fn changes_keep_owner_and_flags() {
        let post = test_post(false, true);
        let later = post.created_date + Duration::seconds(5);

        let changed = post.with_changes(
            PostChanges {
                title: "Edited".to_string(),
                content: "Edited body".to_string(),
            },
            later,
        );

        assert_eq!(changed.title, "Edited");
        assert_eq!(changed.author, post.author);
        assert_eq!(changed.created_date, post.created_date);
        assert_eq!(changed.modified_date, later);
        assert!(!changed.published);
        assert!(changed.listed);
    }

    #[test]
    fn missing_post_error_names_the_id() {
        let err = post_not_found(PostId::new(100000));
        assert_eq!(err.code().to_string(), "404-1");
        assert_eq!(err.to_string(), "Post #100000 does not exist.");
    }

    #[test]
    fn ownership_comes_from_author() {
        let post = test_post(true, true);
        assert_eq!(post.owner_id(), MemberId::new(3));
        assert!(post.is_published());
    }

    #[test]
    fn blank_changes_report_every_field() {
        let err = PostChanges {
            title: String::new(),
            content: " ".to_string(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            err.message(),
            "content : NotBlank : must not be blank\ntitle : NotBlank : must not be blank"
        );
    }

    #[test]
    fn long_titles_are_accepted() {
        let changes = PostChanges {
            title: "x".repeat(500),
            content: "body".to_string(),
        };
        assert!(changes.validate().is_ok());
        assert!(validate_post_fields(&"가".repeat(101), "body").is_ok());
    }

    #[test]
    fn list_query_excludes_unlisted_and_filters_by_keyword() {
        let query = ListQuery::new(Some("  First ".to_string()), PageRequest::default());
        assert_eq!(query.keyword.as_deref(), Some("First"));

        assert!(query.matches(&test_post(true, true)));
        assert!(!query.matches(&test_post(true, false)));

        let other = ListQuery::new(Some("Second".to_string()), PageRequest::default());
        assert!(!other.matches(&test_post(true, true)));

        let blank = ListQuery::new(Some("   ".to_string()), PageRequest::default());
        assert!(blank.keyword.is_none());
    }
}
