use agora_core::{new_id, now_rfc3339};

use crate::mentions;
use crate::model::{CreateRepost, NotificationKind, Post, RepostSnapshot};
use crate::service::notifications::MentionEvent;
use crate::service::{SocialError, SocialService};
use crate::tags::merge_tags;

impl SocialService {
    /// Repost an existing post, with an optional comment.
    ///
    /// The new document embeds a point-in-time snapshot of the original's
    /// whitelisted fields; later edits to the original never reach the
    /// repost. The repost insert, its tag index rows, and the original's
    /// `repost_count`/`reposts` update commit in one transaction.
    pub async fn create_repost(
        &self,
        original_post_id: &str,
        input: CreateRepost,
    ) -> Result<Post, SocialError> {
        let author = self.get_user(&input.author_id)?;
        let mut original = self.get_post(original_post_id)?;

        if original.reposts.iter().any(|uid| uid == &author.uid) {
            return Err(SocialError::Conflict(format!(
                "user {} already reposted post {}",
                author.uid, original_post_id
            )));
        }

        let resolved = self.resolve_mentions(&input.comment);
        let tags = merge_tags(input.tagged_users, resolved);

        let repost = Post {
            id: new_id(),
            author_id: author.uid.clone(),
            author_name: author.display_label(),
            title: None,
            content: input.comment,
            tagged_user_ids: tags.iter().map(|t| t.uid.clone()).collect(),
            mentions: tags.iter().map(mentions::format_tag_mention).collect(),
            tagged_users: tags,
            reply_count: 0,
            repost_count: 0,
            reposts: Vec::new(),
            is_repost: true,
            original_post_id: Some(original.id.clone()),
            original_post: Some(RepostSnapshot::of(&original)),
            media_url: None,
            created_at: now_rfc3339(),
        };

        original.repost_count += 1;
        original.reposts.push(author.uid.clone());

        let mut statements = Self::post_statements(&repost)?;
        statements.push(Self::update_post_statement(&original)?);
        self.db
            .exec_batch(&statements)
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        self.notify_mentions(
            MentionEvent {
                kind: NotificationKind::MentionRepost,
                post_id: &repost.id,
                actor_id: &repost.author_id,
                actor_name: &repost.author_name,
                reply_content: None,
            },
            &repost.tagged_users,
        )
        .await?;

        Ok(repost)
    }
}

#[cfg(test)]
mod tests {
    use agora_sql::Value;

    use crate::model::{CreatePost, CreateRepost, NotificationKind, NotificationListQuery};
    use crate::service::testutil::{seed_user, test_service};

    async fn original(svc: &crate::service::SocialService) -> String {
        seed_user(svc, "orig", Some("orig@example.com"), Some("Original Author"));
        svc.create_post(CreatePost {
            author_id: "orig".into(),
            title: Some("Launch day".into()),
            content: "we shipped".into(),
            tagged_users: vec![],
            media_url: None,
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn repost_embeds_snapshot_and_updates_original_atomically() {
        let (svc, _) = test_service();
        let original_id = original(&svc).await;
        seed_user(&svc, "fan", Some("fan@example.com"), None);

        let repost = svc
            .create_repost(
                &original_id,
                CreateRepost {
                    author_id: "fan".into(),
                    comment: "worth reading".into(),
                    tagged_users: vec![],
                },
            )
            .await
            .unwrap();

        assert!(repost.is_repost);
        assert_eq!(repost.original_post_id.as_deref(), Some(original_id.as_str()));
        let snap = repost.original_post.as_ref().unwrap();
        assert_eq!(snap.title.as_deref(), Some("Launch day"));
        assert_eq!(snap.author_name, "Original Author");

        let updated = svc.get_post(&original_id).unwrap();
        assert_eq!(updated.repost_count, 1);
        assert_eq!(updated.reposts, vec!["fan"]);
    }

    #[tokio::test]
    async fn snapshot_does_not_track_later_edits() {
        let (svc, _) = test_service();
        let original_id = original(&svc).await;
        seed_user(&svc, "fan", Some("fan@example.com"), None);

        let repost = svc
            .create_repost(
                &original_id,
                CreateRepost {
                    author_id: "fan".into(),
                    comment: String::new(),
                    tagged_users: vec![],
                },
            )
            .await
            .unwrap();

        // Rewrite the original's title out from under the repost.
        let mut edited = svc.get_post(&original_id).unwrap();
        edited.title = Some("Renamed".into());
        let json = serde_json::to_string(&edited).unwrap();
        svc.db
            .exec(
                "UPDATE posts SET data = ?1 WHERE id = ?2",
                &[Value::Text(json), Value::Text(original_id.clone())],
            )
            .unwrap();

        let stored = svc.get_post(&repost.id).unwrap();
        assert_eq!(
            stored.original_post.unwrap().title.as_deref(),
            Some("Launch day")
        );
    }

    #[tokio::test]
    async fn double_repost_is_rejected() {
        let (svc, _) = test_service();
        let original_id = original(&svc).await;
        seed_user(&svc, "fan", Some("fan@example.com"), None);

        let input = CreateRepost {
            author_id: "fan".into(),
            comment: String::new(),
            tagged_users: vec![],
        };
        svc.create_repost(&original_id, input.clone()).await.unwrap();
        let err = svc.create_repost(&original_id, input).await.unwrap_err();
        assert!(err.to_string().contains("already reposted"));

        assert_eq!(svc.get_post(&original_id).unwrap().repost_count, 1);
    }

    #[tokio::test]
    async fn repost_comment_mentions_fan_out() {
        let (svc, _) = test_service();
        let original_id = original(&svc).await;
        seed_user(&svc, "fan", Some("fan@example.com"), None);
        seed_user(&svc, "bob", Some("bob@example.com"), None);

        let repost = svc
            .create_repost(
                &original_id,
                CreateRepost {
                    author_id: "fan".into(),
                    comment: "worth a look from @bob".into(),
                    tagged_users: vec![],
                },
            )
            .await
            .unwrap();

        let list = svc
            .list_notifications("bob", &NotificationListQuery::default())
            .unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.items[0].kind, NotificationKind::MentionRepost);
        assert_eq!(list.items[0].post_id.as_deref(), Some(repost.id.as_str()));
    }
}
