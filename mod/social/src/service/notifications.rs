use agora_core::{new_id, now_rfc3339, ListResult};
use agora_mail::Email;
use agora_sql::Value;
use tracing::warn;

use crate::model::{Notification, NotificationKind, NotificationListQuery, TaggedUser};
use crate::service::{SocialError, SocialService};

/// One tagging event, fanned out to every tagged user.
#[derive(Debug, Clone, Copy)]
pub struct MentionEvent<'a> {
    pub kind: NotificationKind,
    pub post_id: &'a str,
    pub actor_id: &'a str,
    pub actor_name: &'a str,
    /// Reply text excerpt, present for mention-reply events.
    pub reply_content: Option<&'a str>,
}

impl SocialService {
    /// Fan out one tagging event: one notification document plus one
    /// best-effort email per tagged user, in tag order.
    ///
    /// The notification insert is the primary channel — a failure
    /// propagates and aborts the remaining fanout, leaving earlier
    /// notifications committed (at-most-once-partial). The email is
    /// secondary: failures are logged and the loop continues. The parent
    /// post/reply/repost was committed before this runs and is never
    /// rolled back.
    pub async fn notify_mentions(
        &self,
        event: MentionEvent<'_>,
        tags: &[TaggedUser],
    ) -> Result<usize, SocialError> {
        let mut delivered = 0;

        for tag in tags {
            let notification = Notification {
                id: new_id(),
                user_id: tag.uid.clone(),
                kind: event.kind,
                post_id: Some(event.post_id.to_string()),
                reply_content: event.reply_content.map(String::from),
                mentioned_by: Some(event.actor_id.to_string()),
                mentioned_by_name: Some(event.actor_name.to_string()),
                message: None,
                is_read: false,
                created_at: now_rfc3339(),
            };
            self.insert_notification(&notification)?;
            delivered += 1;

            let Some(email) = tag.email.as_deref() else {
                continue;
            };
            let mail = Email {
                to: email.to_string(),
                to_name: Some(tag.display_label()),
                subject: format!(
                    "{} mentioned you on {}",
                    event.actor_name, self.config.site_name
                ),
                body: match event.reply_content {
                    Some(excerpt) => format!(
                        "{} mentioned you in a reply:\n\n{}",
                        event.actor_name, excerpt
                    ),
                    None => format!("{} mentioned you in a post.", event.actor_name),
                },
            };
            if let Err(e) = self.mailer.send(&mail).await {
                warn!("mention email to {} failed: {e}", tag.uid);
            }
        }

        Ok(delivered)
    }

    /// Record a single non-mention notification (like, follow, ...).
    /// In-app only, no email.
    pub(crate) fn record_notification(
        &self,
        kind: NotificationKind,
        user_id: &str,
        post_id: Option<&str>,
        actor_id: &str,
        actor_name: &str,
    ) -> Result<Notification, SocialError> {
        let notification = Notification {
            id: new_id(),
            user_id: user_id.to_string(),
            kind,
            post_id: post_id.map(String::from),
            reply_content: None,
            mentioned_by: Some(actor_id.to_string()),
            mentioned_by_name: Some(actor_name.to_string()),
            message: None,
            is_read: false,
            created_at: now_rfc3339(),
        };
        self.insert_notification(&notification)?;
        Ok(notification)
    }

    fn insert_notification(&self, n: &Notification) -> Result<(), SocialError> {
        self.insert_record(
            "notifications",
            &n.id,
            n,
            &[
                ("user_id", Value::Text(n.user_id.clone())),
                ("kind", Value::Text(n.kind.as_str().to_string())),
                ("is_read", Value::Integer(0)),
                ("created_at", Value::Text(n.created_at.clone())),
            ],
        )
    }

    /// List a user's notifications, newest first.
    pub fn list_notifications(
        &self,
        user_id: &str,
        query: &NotificationListQuery,
    ) -> Result<ListResult<Notification>, SocialError> {
        let limit = query.limit.unwrap_or(50);
        let offset = query.offset.unwrap_or(0);

        let filter = if query.unread_only {
            " AND is_read = 0"
        } else {
            ""
        };

        let count_sql =
            format!("SELECT COUNT(*) AS cnt FROM notifications WHERE user_id = ?1{filter}");
        let count_rows = self
            .db
            .query(&count_sql, &[Value::Text(user_id.to_string())])
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        let total = count_rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0) as usize;

        let sql = format!(
            "SELECT data FROM notifications WHERE user_id = ?1{filter}
             ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
        );
        let rows = self
            .db
            .query(
                &sql,
                &[
                    Value::Text(user_id.to_string()),
                    Value::Integer(limit as i64),
                    Value::Integer(offset as i64),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        Ok(ListResult {
            items: Self::rows_to_records(&rows)?,
            total,
        })
    }

    /// Number of unread notifications for a user.
    pub fn unread_count(&self, user_id: &str) -> Result<usize, SocialError> {
        let rows = self
            .db
            .query(
                "SELECT COUNT(*) AS cnt FROM notifications
                 WHERE user_id = ?1 AND is_read = 0",
                &[Value::Text(user_id.to_string())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize)
    }

    /// Mark one notification as read.
    pub fn mark_notification_read(&self, id: &str) -> Result<Notification, SocialError> {
        let mut notification: Notification = self.get_record("notifications", id)?;
        if notification.is_read {
            return Ok(notification);
        }
        notification.is_read = true;
        let json = serde_json::to_string(&notification)
            .map_err(|e| SocialError::Internal(e.to_string()))?;
        self.db
            .exec(
                "UPDATE notifications SET is_read = 1, data = ?1 WHERE id = ?2",
                &[Value::Text(json), Value::Text(id.to_string())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(notification)
    }

    /// Mark all of a user's notifications as read. Returns the number
    /// updated.
    pub fn mark_all_read(&self, user_id: &str) -> Result<usize, SocialError> {
        let rows = self
            .db
            .query(
                "SELECT data FROM notifications WHERE user_id = ?1 AND is_read = 0",
                &[Value::Text(user_id.to_string())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        let unread: Vec<Notification> = Self::rows_to_records(&rows)?;

        for n in &unread {
            self.mark_notification_read(&n.id)?;
        }
        Ok(unread.len())
    }
}
