use agora_core::{new_id, now_rfc3339, ListParams, ListResult};
use agora_sql::{Statement, Value};

use crate::mentions;
use crate::model::{CreatePost, NotificationKind, Post};
use crate::service::notifications::MentionEvent;
use crate::service::{SocialError, SocialService};
use crate::tags::merge_tags;

impl SocialService {
    /// Submit a post.
    ///
    /// The final tag set is the union of explicit selections and mentions
    /// re-resolved from the submitted text. The post document and its tag
    /// index rows commit in one transaction; mention fanout runs after
    /// the commit and its failure never unpublishes the post.
    pub async fn create_post(&self, input: CreatePost) -> Result<Post, SocialError> {
        if input.content.trim().is_empty() {
            return Err(SocialError::Validation("post content cannot be empty".into()));
        }
        let author = self.get_user(&input.author_id)?;

        let resolved = self.resolve_mentions(&input.content);
        let tags = merge_tags(input.tagged_users, resolved);

        let post = Post {
            id: new_id(),
            author_id: author.uid.clone(),
            author_name: author.display_label(),
            title: input.title,
            content: input.content,
            tagged_user_ids: tags.iter().map(|t| t.uid.clone()).collect(),
            mentions: tags.iter().map(mentions::format_tag_mention).collect(),
            tagged_users: tags,
            reply_count: 0,
            repost_count: 0,
            reposts: Vec::new(),
            is_repost: false,
            original_post_id: None,
            original_post: None,
            media_url: input.media_url,
            created_at: now_rfc3339(),
        };

        let statements = Self::post_statements(&post)?;
        self.db
            .exec_batch(&statements)
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        self.notify_mentions(
            MentionEvent {
                kind: NotificationKind::MentionPost,
                post_id: &post.id,
                actor_id: &post.author_id,
                actor_name: &post.author_name,
                reply_content: None,
            },
            &post.tagged_users,
        )
        .await?;

        Ok(post)
    }

    /// Statements that persist a post document together with its tag
    /// index rows. `post_tags` mirrors `tagged_user_ids` — both are
    /// written in the same batch, which is what keeps the mention filter
    /// view in lockstep with the embedded tag list.
    pub(crate) fn post_statements(post: &Post) -> Result<Vec<Statement>, SocialError> {
        let json =
            serde_json::to_string(post).map_err(|e| SocialError::Internal(e.to_string()))?;

        let mut statements = vec![Statement::new(
            "INSERT INTO posts (id, author_id, is_repost, original_post_id, data, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            vec![
                Value::Text(post.id.clone()),
                Value::Text(post.author_id.clone()),
                Value::Integer(i64::from(post.is_repost)),
                Value::opt_text(post.original_post_id.as_deref()),
                Value::Text(json),
                Value::Text(post.created_at.clone()),
            ],
        )];

        for uid in &post.tagged_user_ids {
            statements.push(Statement::new(
                "INSERT INTO post_tags (post_id, uid) VALUES (?1, ?2)",
                vec![Value::Text(post.id.clone()), Value::Text(uid.clone())],
            ));
        }

        Ok(statements)
    }

    /// Get a post by id.
    pub fn get_post(&self, id: &str) -> Result<Post, SocialError> {
        self.get_record("posts", id)
    }

    /// Replace a post document in place (counters, repost lists).
    pub(crate) fn update_post_statement(post: &Post) -> Result<Statement, SocialError> {
        let json =
            serde_json::to_string(post).map_err(|e| SocialError::Internal(e.to_string()))?;
        Ok(Statement::new(
            "UPDATE posts SET data = ?1 WHERE id = ?2",
            vec![Value::Text(json), Value::Text(post.id.clone())],
        ))
    }

    /// List posts, newest first.
    pub fn list_posts(&self, params: &ListParams) -> Result<ListResult<Post>, SocialError> {
        let count_rows = self
            .db
            .query("SELECT COUNT(*) AS cnt FROM posts", &[])
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        let total = count_rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0) as usize;

        let rows = self
            .db
            .query(
                "SELECT data FROM posts ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
                &[
                    Value::Integer(params.limit as i64),
                    Value::Integer(params.offset as i64),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        Ok(ListResult {
            items: Self::rows_to_records(&rows)?,
            total,
        })
    }

    /// List posts that tag the given user, newest first — the equality
    /// filter the `post_tags` index rows exist for.
    pub fn list_posts_mentioning(
        &self,
        uid: &str,
        params: &ListParams,
    ) -> Result<ListResult<Post>, SocialError> {
        let count_rows = self
            .db
            .query(
                "SELECT COUNT(*) AS cnt FROM post_tags WHERE uid = ?1",
                &[Value::Text(uid.to_string())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        let total = count_rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0) as usize;

        let rows = self
            .db
            .query(
                "SELECT p.data AS data FROM posts p
                 JOIN post_tags t ON t.post_id = p.id
                 WHERE t.uid = ?1
                 ORDER BY p.created_at DESC LIMIT ?2 OFFSET ?3",
                &[
                    Value::Text(uid.to_string()),
                    Value::Integer(params.limit as i64),
                    Value::Integer(params.offset as i64),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        Ok(ListResult {
            items: Self::rows_to_records(&rows)?,
            total,
        })
    }
}
