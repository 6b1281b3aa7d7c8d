use agora_core::{new_id, now_rfc3339};
use agora_sql::{Statement, Value};

use crate::mentions;
use crate::model::{CreateReply, NotificationKind, Reply};
use crate::service::notifications::MentionEvent;
use crate::service::{SocialError, SocialService};
use crate::tags::merge_tags;

impl SocialService {
    /// Submit a reply.
    ///
    /// The reply document and the parent's `reply_count` bump commit in
    /// one transaction; mention fanout (kind `mention-reply`, carrying a
    /// reply excerpt) runs after the commit.
    pub async fn create_reply(
        &self,
        post_id: &str,
        input: CreateReply,
    ) -> Result<Reply, SocialError> {
        if input.content.trim().is_empty() {
            return Err(SocialError::Validation("reply content cannot be empty".into()));
        }
        let author = self.get_user(&input.author_id)?;
        let mut post = self.get_post(post_id)?;

        let resolved = self.resolve_mentions(&input.content);
        let tags = merge_tags(input.tagged_users, resolved);

        let reply = Reply {
            id: new_id(),
            post_id: post_id.to_string(),
            author_id: author.uid.clone(),
            author_name: author.display_label(),
            content: input.content,
            tagged_user_ids: tags.iter().map(|t| t.uid.clone()).collect(),
            mentions: tags.iter().map(mentions::format_tag_mention).collect(),
            tagged_users: tags,
            created_at: now_rfc3339(),
        };

        let json =
            serde_json::to_string(&reply).map_err(|e| SocialError::Internal(e.to_string()))?;

        post.reply_count += 1;

        self.db
            .exec_batch(&[
                Statement::new(
                    "INSERT INTO replies (id, post_id, author_id, data, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    vec![
                        Value::Text(reply.id.clone()),
                        Value::Text(reply.post_id.clone()),
                        Value::Text(reply.author_id.clone()),
                        Value::Text(json),
                        Value::Text(reply.created_at.clone()),
                    ],
                ),
                Self::update_post_statement(&post)?,
            ])
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        self.notify_mentions(
            MentionEvent {
                kind: NotificationKind::MentionReply,
                post_id,
                actor_id: &reply.author_id,
                actor_name: &reply.author_name,
                reply_content: Some(&reply.content),
            },
            &reply.tagged_users,
        )
        .await?;

        Ok(reply)
    }

    /// List a post's replies, oldest first.
    pub fn list_replies(&self, post_id: &str) -> Result<Vec<Reply>, SocialError> {
        let rows = self
            .db
            .query(
                "SELECT data FROM replies WHERE post_id = ?1 ORDER BY created_at ASC",
                &[Value::Text(post_id.to_string())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Self::rows_to_records(&rows)
    }
}
