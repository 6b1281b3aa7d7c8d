use serde::{Deserialize, Serialize};

use super::user::TaggedUser;

/// A published post.
///
/// `tagged_user_ids` is always exactly the uid projection of
/// `tagged_users` — it exists so "posts mentioning user X" is an equality
/// filter, and every write path maintains both together. `mentions` holds
/// `@handle` display echoes and is never queried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,

    pub author_id: String,

    /// Author display label, snapshotted at submission.
    pub author_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub content: String,

    #[serde(default)]
    pub tagged_users: Vec<TaggedUser>,

    #[serde(default)]
    pub tagged_user_ids: Vec<String>,

    #[serde(default)]
    pub mentions: Vec<String>,

    #[serde(default)]
    pub reply_count: i64,

    #[serde(default)]
    pub repost_count: i64,

    /// Uids of users who reposted this post.
    #[serde(default)]
    pub reposts: Vec<String>,

    #[serde(default)]
    pub is_repost: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_post_id: Option<String>,

    /// Point-in-time copy of the source post; never refreshed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_post: Option<RepostSnapshot>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    /// Server-assigned RFC 3339 timestamp.
    pub created_at: String,
}

/// The field whitelist copied from an original post into its reposts.
///
/// A snapshot, not a reference: edits to the original do not propagate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepostSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub content: String,

    pub author_id: String,

    pub author_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    pub created_at: String,
}

impl RepostSnapshot {
    pub fn of(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            author_id: post.author_id.clone(),
            author_name: post.author_name.clone(),
            media_url: post.media_url.clone(),
            created_at: post.created_at.clone(),
        }
    }
}

/// Body for `POST /posts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub author_id: String,

    #[serde(default)]
    pub title: Option<String>,

    pub content: String,

    /// Tags the author picked from the suggestion dropdown. Mentions typed
    /// directly into the text are resolved at submission and merged in.
    #[serde(default)]
    pub tagged_users: Vec<TaggedUser>,

    #[serde(default)]
    pub media_url: Option<String>,
}

/// Body for `POST /posts/{id}/repost`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepost {
    pub author_id: String,

    /// Free-text comment attached to the repost. May itself carry mentions.
    #[serde(default)]
    pub comment: String,

    #[serde(default)]
    pub tagged_users: Vec<TaggedUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_json_round_trip() {
        let post = Post {
            id: "p1".into(),
            author_id: "u1".into(),
            author_name: "Jane Doe".into(),
            title: Some("Hello".into()),
            content: "hi @bob".into(),
            tagged_users: vec![TaggedUser {
                uid: "u2".into(),
                email: Some("bob@example.com".into()),
                display_name: None,
                first_name: None,
                last_name: None,
                photo_url: None,
            }],
            tagged_user_ids: vec!["u2".into()],
            mentions: vec!["@bob".into()],
            reply_count: 0,
            repost_count: 0,
            reposts: vec![],
            is_repost: false,
            original_post_id: None,
            original_post: None,
            media_url: None,
            created_at: "2026-01-01T00:00:00Z".into(),
        };
        let json = serde_json::to_string(&post).unwrap();
        let back: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "p1");
        assert_eq!(back.tagged_user_ids, vec!["u2"]);
        // Absent optional fields stay out of the document.
        assert!(!json.contains("originalPostId"));
        assert!(!json.contains("mediaUrl"));
    }

    #[test]
    fn snapshot_copies_whitelist_only() {
        let post = Post {
            id: "p1".into(),
            author_id: "u1".into(),
            author_name: "Jane".into(),
            title: None,
            content: "original".into(),
            tagged_users: vec![],
            tagged_user_ids: vec![],
            mentions: vec![],
            reply_count: 9,
            repost_count: 3,
            reposts: vec!["u7".into()],
            is_repost: false,
            original_post_id: None,
            original_post: None,
            media_url: Some("https://img.example/1.png".into()),
            created_at: "2026-01-01T00:00:00Z".into(),
        };
        let snap = RepostSnapshot::of(&post);
        assert_eq!(snap.content, "original");
        assert_eq!(snap.author_name, "Jane");
        assert_eq!(snap.media_url.as_deref(), Some("https://img.example/1.png"));
        // Counters are not part of the snapshot.
        let json = serde_json::to_value(&snap).unwrap();
        assert!(json.get("replyCount").is_none());
        assert!(json.get("repostCount").is_none());
    }
}
