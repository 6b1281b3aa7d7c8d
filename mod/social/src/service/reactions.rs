use agora_core::now_rfc3339;
use agora_sql::Value;

use crate::model::NotificationKind;
use crate::service::{SocialError, SocialService};

impl SocialService {
    /// Like a post. Returns true when the like is new; liking twice is a
    /// no-op. A new like on someone else's post records one `like`
    /// notification for the author.
    pub fn like_post(&self, post_id: &str, user_id: &str) -> Result<bool, SocialError> {
        let post = self.get_post(post_id)?;
        let user = self.get_user(user_id)?;

        let affected = self
            .db
            .exec(
                "INSERT OR IGNORE INTO reactions (post_id, user_id, created_at)
                 VALUES (?1, ?2, ?3)",
                &[
                    Value::Text(post_id.to_string()),
                    Value::Text(user_id.to_string()),
                    Value::Text(now_rfc3339()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        if affected == 0 {
            return Ok(false);
        }

        if post.author_id != user_id {
            self.record_notification(
                NotificationKind::Like,
                &post.author_id,
                Some(post_id),
                user_id,
                &user.display_label(),
            )?;
        }

        Ok(true)
    }

    /// Remove a like. Returns true when a like existed.
    pub fn unlike_post(&self, post_id: &str, user_id: &str) -> Result<bool, SocialError> {
        let affected = self
            .db
            .exec(
                "DELETE FROM reactions WHERE post_id = ?1 AND user_id = ?2",
                &[
                    Value::Text(post_id.to_string()),
                    Value::Text(user_id.to_string()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(affected > 0)
    }

    /// Number of likes on a post.
    pub fn like_count(&self, post_id: &str) -> Result<usize, SocialError> {
        let rows = self
            .db
            .query(
                "SELECT COUNT(*) AS cnt FROM reactions WHERE post_id = ?1",
                &[Value::Text(post_id.to_string())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize)
    }
}
