use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use quill_auth::Member;
use quill_core::{MemberId, PageRequest, PostId, Validate, Violations};
use quill_posts::{ListQuery, Post, PostChanges, validate_post_fields};

// -------------------------
// Request DTOs
// -------------------------

// Missing string fields deserialize as "" so they surface as NotBlank violations
// instead of body parse errors.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JoinRequest {
    pub username: String,
    pub password: String,
    pub nickname: String,
}

impl Validate for JoinRequest {
    fn validate(&self) -> Result<(), Violations> {
        let mut v = Violations::new();
        v.not_blank("username", &self.username)
            .not_blank("password", &self.password)
            .not_blank("nickname", &self.nickname);
        v.into_result()
    }
}

/// Blank fields are not rejected here: an empty username is just an unknown one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Violations> {
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WritePostRequest {
    pub title: String,
    pub content: String,
    pub published: bool,
    pub listed: bool,
}

impl Validate for WritePostRequest {
    fn validate(&self) -> Result<(), Violations> {
        validate_post_fields(&self.title, &self.content)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ModifyPostRequest {
    pub title: String,
    pub content: String,
}

impl From<ModifyPostRequest> for PostChanges {
    fn from(req: ModifyPostRequest) -> Self {
        PostChanges {
            title: req.title,
            content: req.content,
        }
    }
}

impl Validate for ModifyPostRequest {
    fn validate(&self) -> Result<(), Violations> {
        validate_post_fields(&self.title, &self.content)
    }
}

/// `?page=&pageSize=&keyword=` on listing endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub keyword: Option<String>,
}

impl ListParams {
    pub fn page_request(&self, default_page_size: u32) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(default_page_size),
        )
    }

    pub fn into_query(self, default_page_size: u32) -> ListQuery {
        let page = self.page_request(default_page_size);
        ListQuery::new(self.keyword, page)
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub id: MemberId,
    pub created_date: NaiveDateTime,
    pub modified_date: NaiveDateTime,
    pub nickname: String,
}

impl From<&Member> for MemberDto {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id,
            created_date: m.created_date,
            modified_date: m.modified_date,
            nickname: m.nickname.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub item: MemberDto,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: PostId,
    pub created_date: NaiveDateTime,
    pub modified_date: NaiveDateTime,
    pub author_id: MemberId,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub listed: bool,
}

impl From<&Post> for PostDto {
    fn from(p: &Post) -> Self {
        Self {
            id: p.id,
            created_date: p.created_date,
            modified_date: p.modified_date,
            author_id: p.author.id,
            author_name: p.author.nickname.clone(),
            title: p.title.clone(),
            content: p.content.clone(),
            published: p.published,
            listed: p.listed,
        }
    }
}

impl From<Post> for PostDto {
    fn from(p: Post) -> Self {
        Self::from(&p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_join_fields_are_all_reported() {
        let req: JoinRequest = serde_json::from_str(r#"{ "username": "neo" }"#).unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(
            err.message(),
            "nickname : NotBlank : must not be blank\npassword : NotBlank : must not be blank"
        );
    }

    #[test]
    fn write_flags_default_to_false() {
        let req: WritePostRequest =
            serde_json::from_str(r#"{ "title": "t", "content": "c" }"#).unwrap();
        assert!(!req.published);
        assert!(!req.listed);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn write_and_modify_share_the_post_field_rules() {
        let expected =
            "content : NotBlank : must not be blank\ntitle : NotBlank : must not be blank";

        let write = WritePostRequest::default().validate().unwrap_err();
        let modify = ModifyPostRequest::default().validate().unwrap_err();
        assert_eq!(write.message(), expected);
        assert_eq!(modify.message(), expected);

        let long = ModifyPostRequest {
            title: "t".repeat(300),
            content: "c".to_string(),
        };
        assert!(long.validate().is_ok());
    }

    #[test]
    fn list_params_fall_back_to_configured_page_size() {
        let params: ListParams = serde_json::from_value(serde_json::json!({
            "pageSize": 500,
            "keyword": "  ",
        }))
        .unwrap();

        let query = params.into_query(10);
        assert_eq!(query.page.page(), 1);
        assert_eq!(query.page.page_size(), PageRequest::MAX_PAGE_SIZE);
        assert!(query.keyword.is_none());

        let defaults = ListParams::default().page_request(7);
        assert_eq!(defaults.page_size(), 7);
    }
}
