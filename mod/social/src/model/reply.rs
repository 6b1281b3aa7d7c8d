use serde::{Deserialize, Serialize};

use super::user::TaggedUser;

/// A reply to a post. Carries its own tag set, maintained with the same
/// `tagged_user_ids` lockstep invariant as posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,

    pub post_id: String,

    pub author_id: String,

    pub author_name: String,

    pub content: String,

    #[serde(default)]
    pub tagged_users: Vec<TaggedUser>,

    #[serde(default)]
    pub tagged_user_ids: Vec<String>,

    #[serde(default)]
    pub mentions: Vec<String>,

    pub created_at: String,
}

/// Body for `POST /posts/{id}/replies`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReply {
    pub author_id: String,

    pub content: String,

    #[serde(default)]
    pub tagged_users: Vec<TaggedUser>,
}
