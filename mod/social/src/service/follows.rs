use agora_core::now_rfc3339;
use agora_sql::Value;

use crate::model::NotificationKind;
use crate::service::{SocialError, SocialService};

impl SocialService {
    /// Follow a user. Returns true when the follow is new; following
    /// twice is a no-op. A new follow records one `follow` notification
    /// for the followee.
    pub fn follow_user(&self, follower_id: &str, followee_id: &str) -> Result<bool, SocialError> {
        if follower_id == followee_id {
            return Err(SocialError::Validation("cannot follow yourself".into()));
        }
        let follower = self.get_user(follower_id)?;
        self.get_user(followee_id)?;

        let affected = self
            .db
            .exec(
                "INSERT OR IGNORE INTO follows (follower_id, followee_id, created_at)
                 VALUES (?1, ?2, ?3)",
                &[
                    Value::Text(follower_id.to_string()),
                    Value::Text(followee_id.to_string()),
                    Value::Text(now_rfc3339()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        if affected == 0 {
            return Ok(false);
        }

        self.record_notification(
            NotificationKind::Follow,
            followee_id,
            None,
            follower_id,
            &follower.display_label(),
        )?;

        Ok(true)
    }

    /// Unfollow a user. Returns true when a follow existed.
    pub fn unfollow_user(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<bool, SocialError> {
        let affected = self
            .db
            .exec(
                "DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2",
                &[
                    Value::Text(follower_id.to_string()),
                    Value::Text(followee_id.to_string()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(affected > 0)
    }

    /// Uids following the given user.
    pub fn list_followers(&self, followee_id: &str) -> Result<Vec<String>, SocialError> {
        let rows = self
            .db
            .query(
                "SELECT follower_id FROM follows WHERE followee_id = ?1
                 ORDER BY created_at ASC",
                &[Value::Text(followee_id.to_string())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(rows
            .iter()
            .filter_map(|r| r.get_str("follower_id").map(String::from))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{NotificationKind, NotificationListQuery};
    use crate::service::testutil::{seed_user, test_service};

    #[test]
    fn follow_notifies_followee_once() {
        let (svc, _) = test_service();
        seed_user(&svc, "a", Some("a@example.com"), Some("Alice"));
        seed_user(&svc, "b", Some("b@example.com"), None);

        assert!(svc.follow_user("a", "b").unwrap());
        assert!(!svc.follow_user("a", "b").unwrap());

        assert_eq!(svc.list_followers("b").unwrap(), vec!["a"]);
        let list = svc
            .list_notifications("b", &NotificationListQuery::default())
            .unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.items[0].kind, NotificationKind::Follow);
        assert_eq!(list.items[0].mentioned_by_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn self_follow_is_rejected() {
        let (svc, _) = test_service();
        seed_user(&svc, "a", Some("a@example.com"), None);
        assert!(svc.follow_user("a", "a").is_err());
    }

    #[test]
    fn unfollow_removes_edge() {
        let (svc, _) = test_service();
        seed_user(&svc, "a", Some("a@example.com"), None);
        seed_user(&svc, "b", Some("b@example.com"), None);

        svc.follow_user("a", "b").unwrap();
        assert!(svc.unfollow_user("a", "b").unwrap());
        assert!(!svc.unfollow_user("a", "b").unwrap());
        assert!(svc.list_followers("b").unwrap().is_empty());
    }
}
