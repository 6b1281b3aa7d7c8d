use serde::{Deserialize, Serialize};

/// The fixed set of notification kinds.
///
/// Wire values are stable; adding a kind is additive, renaming is a
/// breaking change for stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    MentionPost,
    MentionReply,
    MentionRepost,
    Like,
    Follow,
    GroupPost,
    GroupReply,
    GroupMemberJoined,
    BadgeAwarded,
    GroupCompleted,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MentionPost => "mention-post",
            Self::MentionReply => "mention-reply",
            Self::MentionRepost => "mention-repost",
            Self::Like => "like",
            Self::Follow => "follow",
            Self::GroupPost => "group-post",
            Self::GroupReply => "group-reply",
            Self::GroupMemberJoined => "group-member-joined",
            Self::BadgeAwarded => "badge-awarded",
            Self::GroupCompleted => "group-completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "mention-post" => Some(Self::MentionPost),
            "mention-reply" => Some(Self::MentionReply),
            "mention-repost" => Some(Self::MentionRepost),
            "like" => Some(Self::Like),
            "follow" => Some(Self::Follow),
            "group-post" => Some(Self::GroupPost),
            "group-reply" => Some(Self::GroupReply),
            "group-member-joined" => Some(Self::GroupMemberJoined),
            "badge-awarded" => Some(Self::BadgeAwarded),
            "group-completed" => Some(Self::GroupCompleted),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One in-app notification document.
///
/// Exactly one document per (recipient, triggering event); repeated
/// triggers produce repeated documents. Mutated only by mark-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,

    /// Recipient uid.
    pub user_id: String,

    pub kind: NotificationKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,

    /// Reply text excerpt, present on `mention-reply`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_content: Option<String>,

    /// Uid of the acting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentioned_by: Option<String>,

    /// Display label of the acting user, snapshotted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentioned_by_name: Option<String>,

    /// Free-form text for kinds without a structured payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub is_read: bool,

    pub created_at: String,
}

/// Query parameters for `GET /notifications/{userId}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,

    #[serde(default)]
    pub limit: Option<usize>,

    #[serde(default)]
    pub offset: Option<usize>,
}
