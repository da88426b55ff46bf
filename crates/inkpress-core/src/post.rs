//! Post records as exchanged with the backend API.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::slug::slugify;

/// A blog article as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Backend identifier.
    #[serde(default, alias = "_id")]
    pub id: String,

    /// Post title.
    #[serde(default)]
    pub title: String,

    /// URL-safe identifier derived from the title.
    #[serde(default)]
    pub slug: String,

    /// Short description shown on cards.
    #[serde(default, alias = "description", alias = "excerpt")]
    pub desc: String,

    /// HTML body produced by the editor.
    #[serde(default)]
    pub content: String,

    /// Featured image URL.
    #[serde(
        default,
        alias = "image",
        alias = "featured_image",
        deserialize_with = "non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub img: Option<String>,

    /// Tags attached to the post.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Whether the post is publicly visible.
    #[serde(default)]
    pub is_published: bool,

    /// Author reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,

    /// Creation timestamp.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update timestamp.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for creating a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub slug: String,
    pub desc: String,
    pub content: String,
    pub img: String,
}

/// Request body for a partial update. Absent fields are left untouched by
/// the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

impl PostPayload {
    /// Build a payload, deriving the slug from the title.
    pub fn new(
        title: impl Into<String>,
        desc: impl Into<String>,
        content: impl Into<String>,
        img: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title),
            title,
            desc: desc.into(),
            content: content.into(),
            img: img.into(),
        }
    }
}

impl From<PostPayload> for PostUpdate {
    fn from(payload: PostPayload) -> Self {
        Self {
            title: Some(payload.title),
            slug: Some(payload.slug),
            desc: Some(payload.desc),
            content: Some(payload.content),
            img: (!payload.img.is_empty()).then_some(payload.img),
        }
    }
}

impl PostUpdate {
    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.desc.is_none()
            && self.content.is_none()
            && self.img.is_none()
    }
}

fn non_empty_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    // The backend stringifies missing images as "None".
    Ok(value.filter(|s| !s.is_empty() && s != "None"))
}

/// Accepts RFC 3339 or the backend's `YYYY-MM-DD HH:MM:SS[.f]` form.
/// Unparseable values become `None` rather than failing the whole record.
fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_decode_backend_post() {
        let json = r#"{
            "id": "2f1c",
            "created_at": "2024-05-01 09:30:15.123456",
            "slug": "hello-world",
            "title": "Hello World",
            "desc": "First post",
            "content": "<p>Hi</p>",
            "img": "https://res.cloudinary.com/demo/image/upload/v1/a.png"
        }"#;

        let post: Post = serde_json::from_str(json).expect("decode post");
        assert_eq!(post.id, "2f1c");
        assert_eq!(post.desc, "First post");
        assert!(post.img.is_some());
        assert!(post.tags.is_empty());
        assert!(!post.is_published);

        let created = post.created_at.expect("timestamp");
        assert_eq!(created.year(), 2024);
        assert_eq!(created.hour(), 9);
    }

    #[test]
    fn test_decode_aliased_fields() {
        let json = r#"{
            "id": "1",
            "title": "T",
            "excerpt": "Short",
            "featured_image": "https://example.com/x.png",
            "tags": ["rust", "web"],
            "is_published": true,
            "author_id": "user_1",
            "created_at": "2024-05-01T09:30:15Z"
        }"#;

        let post: Post = serde_json::from_str(json).expect("decode post");
        assert_eq!(post.desc, "Short");
        assert_eq!(post.img.as_deref(), Some("https://example.com/x.png"));
        assert_eq!(post.tags, vec!["rust", "web"]);
        assert!(post.is_published);
        assert_eq!(post.author_id.as_deref(), Some("user_1"));
        assert!(post.created_at.is_some());
    }

    #[test]
    fn test_stringified_none_image_is_absent() {
        let post: Post =
            serde_json::from_str(r#"{"id": "1", "title": "T", "img": "None"}"#).expect("decode");
        assert!(post.img.is_none());
    }

    #[test]
    fn test_unparseable_timestamp_is_dropped() {
        let post: Post =
            serde_json::from_str(r#"{"id": "1", "title": "T", "created_at": "yesterday"}"#)
                .expect("decode");
        assert!(post.created_at.is_none());
    }

    #[test]
    fn test_payload_derives_slug() {
        let payload = PostPayload::new("Hello, World!", "desc", "<p>x</p>", "");
        assert_eq!(payload.slug, "hello-world");

        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["desc"], "desc");
        assert_eq!(json["img"], "");
    }

    #[test]
    fn test_update_from_payload_skips_empty_image() {
        let update = PostUpdate::from(PostPayload::new("Title", "d", "c", ""));
        assert!(update.img.is_none());
        assert!(!update.is_empty());

        let json = serde_json::to_value(&update).expect("serialize");
        assert!(json.get("img").is_none());
        assert_eq!(json["slug"], "title");
    }

    #[test]
    fn test_empty_update() {
        assert!(PostUpdate::default().is_empty());
    }
}
