//! Comment schema - testimonials shown on the site

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use url::Url;

use crate::core::loader::RawRecord;
use crate::schema::field::{FieldError, Fields};
use crate::schema::Schema;

/// A validated comment entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub name: String,
    pub login: String,
    pub body: String,
    pub avatar: Url,
    pub href: Url,
}

/// Field rules for [`Comment`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentSchema;

impl Schema for CommentSchema {
    type Entry = Comment;

    fn validate(&self, record: &RawRecord) -> Result<Comment, Vec<FieldError>> {
        let mut fields = Fields::new(&record.data);

        let id = fields.positive_int("id");
        let name = fields.non_empty_str("name");
        let login = fields.non_empty_str("login");
        let body = fields.non_empty_str("body");
        let avatar = fields.url("avatar");
        let href = fields.url("href");

        let errors = fields.into_errors();
        match (id, name, login, body, avatar, href) {
            (Some(id), Some(name), Some(login), Some(body), Some(avatar), Some(href)) if errors.is_empty() => {
                Ok(Comment {
                    id,
                    name,
                    login,
                    body,
                    avatar,
                    href,
                })
            }
            _ => Err(errors),
        }
    }

    fn json_schema(&self) -> JsonValue {
        let url = json!({"type": "string", "format": "uri", "description": "Absolute URL"});
        json!({
            "title": "Comment",
            "description": "A user comment or testimonial shown on the site",
            "type": "object",
            "required": ["id", "name", "login", "body", "avatar", "href"],
            "properties": {
                "id": {
                    "type": ["integer", "string"],
                    "description": "Positive integer, unique within the collection",
                    "exclusiveMinimum": 0
                },
                "name": {"type": "string", "minLength": 1, "description": "Display name"},
                "login": {"type": "string", "minLength": 1, "description": "Identity handle"},
                "body": {"type": "string", "minLength": 1, "description": "Comment text"},
                "avatar": url.clone(),
                "href": url,
            }
        })
    }
}
