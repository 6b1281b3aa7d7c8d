use agora_sql::DocStore;

use crate::service::SocialError;

/// Initialize the SQLite schema for all social resources.
///
/// Every queried field gets its own ascending index — the prefix-range
/// user search in particular needs one per searched column.
pub fn init_schema(db: &dyn DocStore) -> Result<(), SocialError> {
    let statements = [
        // Directory of users. Read-mostly from this module's perspective.
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT,
            email_local TEXT,
            display_name TEXT,
            first_name TEXT,
            last_name TEXT,
            last_active_at TEXT NOT NULL,
            data TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
        "CREATE INDEX IF NOT EXISTS idx_users_email_local ON users(email_local)",
        "CREATE INDEX IF NOT EXISTS idx_users_display_name ON users(display_name)",
        "CREATE INDEX IF NOT EXISTS idx_users_first_name ON users(first_name)",
        "CREATE INDEX IF NOT EXISTS idx_users_last_name ON users(last_name)",
        "CREATE INDEX IF NOT EXISTS idx_users_last_active ON users(last_active_at)",

        // Posts (reposts included, flagged by is_repost).
        "CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            author_id TEXT NOT NULL,
            is_repost INTEGER NOT NULL DEFAULT 0,
            original_post_id TEXT,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id)",
        "CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_posts_original ON posts(original_post_id)",

        // Tag index rows: the equality-filter view of taggedUserIds.
        // Maintained in the same transaction as the post document.
        "CREATE TABLE IF NOT EXISTS post_tags (
            post_id TEXT NOT NULL,
            uid TEXT NOT NULL,
            PRIMARY KEY (post_id, uid),
            FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
        )",
        "CREATE INDEX IF NOT EXISTS idx_post_tags_uid ON post_tags(uid)",

        // Replies.
        "CREATE TABLE IF NOT EXISTS replies (
            id TEXT PRIMARY KEY,
            post_id TEXT NOT NULL,
            author_id TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
        )",
        "CREATE INDEX IF NOT EXISTS idx_replies_post ON replies(post_id)",

        // Notifications.
        "CREATE TABLE IF NOT EXISTS notifications (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_notifications_user_unread
            ON notifications(user_id, is_read)",

        // Likes.
        "CREATE TABLE IF NOT EXISTS reactions (
            post_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (post_id, user_id),
            FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
        )",

        // Follows.
        "CREATE TABLE IF NOT EXISTS follows (
            follower_id TEXT NOT NULL,
            followee_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (follower_id, followee_id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_follows_followee ON follows(followee_id)",
    ];

    for stmt in &statements {
        db.exec(stmt, &[])
            .map_err(|e| SocialError::Storage(e.to_string()))?;
    }

    Ok(())
}
