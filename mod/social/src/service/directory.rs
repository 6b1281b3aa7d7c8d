use agora_core::{new_id, now_rfc3339};
use agora_sql::Value;
use tracing::warn;

use crate::mentions;
use crate::model::{TaggedUser, UpsertUser, User};
use crate::service::{SocialError, SocialService};

/// Columns the suggestion search prefix-matches against, in query order.
const SEARCH_FIELDS: [&str; 4] = ["first_name", "last_name", "display_name", "email"];

/// Highest Unicode scalar — the exclusive upper bound that turns an
/// ordered range scan into a "starts with" match.
const RANGE_SENTINEL: char = '\u{10FFFF}';

/// True for storage errors the search treats as "index not ready":
/// detected by message heuristic, the only signal the store exposes.
fn is_index_error(msg: &str) -> bool {
    let msg = msg.to_ascii_lowercase();
    msg.contains("index") || msg.contains("no such column")
}

impl SocialService {
    /// Insert or replace a directory user.
    ///
    /// Registration and profile editing live elsewhere; this is the ingest
    /// path that keeps the directory queryable.
    pub fn upsert_user(&self, input: UpsertUser) -> Result<User, SocialError> {
        let uid = input.uid.unwrap_or_else(new_id);
        let user = User {
            uid: uid.clone(),
            email: input.email,
            display_name: input.display_name,
            first_name: input.first_name,
            last_name: input.last_name,
            photo_url: input.photo_url,
            initials: input.initials,
            last_active_at: now_rfc3339(),
        };

        let json = serde_json::to_string(&user)
            .map_err(|e| SocialError::Internal(e.to_string()))?;

        self.db
            .exec(
                "INSERT OR REPLACE INTO users
                    (id, email, email_local, display_name, first_name, last_name,
                     last_active_at, data)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                &[
                    Value::Text(uid),
                    Value::opt_text(user.email.as_deref()),
                    Value::opt_text(user.email_local()),
                    Value::opt_text(user.display_name.as_deref()),
                    Value::opt_text(user.first_name.as_deref()),
                    Value::opt_text(user.last_name.as_deref()),
                    Value::Text(user.last_active_at.clone()),
                    Value::Text(json),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        Ok(user)
    }

    /// Get a directory user by uid.
    pub fn get_user(&self, uid: &str) -> Result<User, SocialError> {
        self.get_record("users", uid)
    }

    /// Bump a user's recency indicator.
    pub fn touch_last_active(&self, uid: &str) -> Result<(), SocialError> {
        let mut user = self.get_user(uid)?;
        user.last_active_at = now_rfc3339();
        let json = serde_json::to_string(&user)
            .map_err(|e| SocialError::Internal(e.to_string()))?;
        self.db
            .exec(
                "UPDATE users SET last_active_at = ?1, data = ?2 WHERE id = ?3",
                &[
                    Value::Text(user.last_active_at),
                    Value::Text(json),
                    Value::Text(uid.to_string()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Suggestion search for the mention dropdown.
    ///
    /// Empty term: most recently active users. Non-empty: prefix match
    /// against each searchable column, results unioned and deduplicated by
    /// uid in first-appearance order. Matching is case-sensitive — no
    /// folding is applied before the range scan, a documented limitation.
    ///
    /// Never fails into the caller: storage errors degrade to an empty
    /// list so the suggestion UI simply shows nothing.
    pub fn search_users(&self, term: &str) -> Vec<User> {
        if term.is_empty() {
            return self.recent_users(self.config.recent_suggestions);
        }

        let upper = format!("{term}{RANGE_SENTINEL}");
        let limit = self.config.search_suggestions;

        let mut seen = std::collections::HashSet::new();
        let mut found: Vec<User> = Vec::new();

        for field in SEARCH_FIELDS {
            let users = self.prefix_query(field, term, &upper, limit);
            for user in users {
                if seen.insert(user.uid.clone()) {
                    found.push(user);
                }
            }
        }

        found.truncate(limit);
        found
    }

    /// One prefix-range scan over a single column, with the degraded
    /// no-ordering fallback when the index is not ready.
    fn prefix_query(&self, field: &str, lower: &str, upper: &str, limit: usize) -> Vec<User> {
        let params = [
            Value::Text(lower.to_string()),
            Value::Text(upper.to_string()),
            Value::Integer(limit as i64),
        ];

        let ordered = format!(
            "SELECT data FROM users WHERE {field} >= ?1 AND {field} < ?2
             ORDER BY {field} ASC LIMIT ?3"
        );
        match self.db.query(&ordered, &params) {
            Ok(rows) => return Self::rows_to_users(field, &rows),
            Err(e) if is_index_error(&e.to_string()) => {
                warn!("user search on {field} fell back to unordered scan: {e}");
            }
            Err(e) => {
                warn!("user search on {field} failed: {e}");
                return Vec::new();
            }
        }

        let fallback = format!(
            "SELECT data FROM users WHERE {field} >= ?1 AND {field} < ?2 LIMIT ?3"
        );
        match self.db.query(&fallback, &params) {
            Ok(rows) => Self::rows_to_users(field, &rows),
            Err(e) => {
                warn!("user search fallback on {field} failed: {e}");
                Vec::new()
            }
        }
    }

    fn recent_users(&self, limit: usize) -> Vec<User> {
        let sql = "SELECT data FROM users ORDER BY last_active_at DESC LIMIT ?1";
        match self.db.query(sql, &[Value::Integer(limit as i64)]) {
            Ok(rows) => Self::rows_to_users("last_active_at", &rows),
            Err(e) => {
                warn!("recent-user query failed: {e}");
                Vec::new()
            }
        }
    }

    fn rows_to_users(context: &str, rows: &[agora_sql::Row]) -> Vec<User> {
        match Self::rows_to_records(rows) {
            Ok(users) => users,
            Err(e) => {
                warn!("bad user record in {context} results: {e}");
                Vec::new()
            }
        }
    }

    /// Exact-handle lookup for submit-time mention validation.
    ///
    /// A handle matches a user's display name, email local-part, or
    /// "first last" combination.
    pub(crate) fn resolve_handle(&self, handle: &str) -> Option<User> {
        let sql = "SELECT data FROM users
                   WHERE display_name = ?1
                      OR email_local = ?1
                      OR (first_name || ' ' || last_name) = ?1
                   LIMIT 1";
        match self.db.query(sql, &[Value::Text(handle.to_string())]) {
            Ok(rows) => Self::rows_to_users("handle", &rows).into_iter().next(),
            Err(e) => {
                warn!("handle resolution for {handle:?} failed: {e}");
                None
            }
        }
    }

    /// Re-scan submitted text and resolve every candidate handle into a
    /// tag snapshot. Unresolvable handles are dropped; duplicates survive
    /// here and collapse in the merge.
    pub(crate) fn resolve_mentions(&self, text: &str) -> Vec<TaggedUser> {
        mentions::extract_mentions(text)
            .iter()
            .filter_map(|handle| self.resolve_handle(handle))
            .map(|user| user.to_tag())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::UpsertUser;
    use crate::service::testutil::{seed_user, test_service};

    #[test]
    fn upsert_mints_uid_when_absent() {
        let (svc, _) = test_service();
        let user = svc
            .upsert_user(UpsertUser {
                uid: None,
                email: Some("new@example.com".into()),
                display_name: None,
                first_name: None,
                last_name: None,
                photo_url: None,
                initials: None,
            })
            .unwrap();
        assert_eq!(user.uid.len(), 32);
        assert_eq!(svc.get_user(&user.uid).unwrap().email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn search_matches_prefix_on_each_field() {
        let (svc, _) = test_service();
        svc.upsert_user(UpsertUser {
            uid: Some("u1".into()),
            email: Some("ann@example.com".into()),
            display_name: Some("Annabel K".into()),
            first_name: Some("Annabel".into()),
            last_name: Some("Karlsen".into()),
            photo_url: None,
            initials: None,
        })
        .unwrap();
        seed_user(&svc, "u2", Some("bob@example.com"), Some("Bob"));

        let by_first = svc.search_users("Ann");
        assert_eq!(by_first.len(), 1);
        assert_eq!(by_first[0].uid, "u1");

        let by_last = svc.search_users("Karl");
        assert_eq!(by_last.len(), 1);

        let by_email = svc.search_users("ann@");
        assert_eq!(by_email.len(), 1);

        assert!(svc.search_users("zzz").is_empty());
    }

    #[test]
    fn search_is_case_sensitive() {
        let (svc, _) = test_service();
        seed_user(&svc, "u1", Some("jane@example.com"), Some("Jane"));

        // No case folding before the range scan: lowercase misses "Jane".
        assert!(svc.search_users("jane").iter().all(|u| u.email.as_deref() == Some("jane@example.com")));
        assert!(svc.search_users("JANE").is_empty());
    }

    #[test]
    fn search_dedups_across_fields() {
        let (svc, _) = test_service();
        // "Jo" prefix-matches first name, display name, and email at once.
        svc.upsert_user(UpsertUser {
            uid: Some("u1".into()),
            email: Some("Jo@example.com".into()),
            display_name: Some("Jo".into()),
            first_name: Some("Jo".into()),
            last_name: None,
            photo_url: None,
            initials: None,
        })
        .unwrap();

        let found = svc.search_users("Jo");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn empty_term_returns_recent_users_capped_at_five() {
        let (svc, _) = test_service();
        for n in 0..8 {
            seed_user(&svc, &format!("u{n}"), Some(&format!("u{n}@example.com")), None);
        }

        let recent = svc.search_users("");
        assert_eq!(recent.len(), 5);
    }

    #[test]
    fn nonempty_term_capped_at_ten() {
        let (svc, _) = test_service();
        for n in 0..15 {
            seed_user(
                &svc,
                &format!("u{n:02}"),
                Some(&format!("prefix{n:02}@example.com")),
                None,
            );
        }

        assert_eq!(svc.search_users("prefix").len(), 10);
    }

    #[test]
    fn resolve_handle_matches_display_name_and_email_local() {
        let (svc, _) = test_service();
        seed_user(&svc, "u1", Some("jane.doe@example.com"), Some("Jane Doe"));

        assert_eq!(svc.resolve_handle("Jane Doe").unwrap().uid, "u1");
        assert_eq!(svc.resolve_handle("jane.doe").unwrap().uid, "u1");
        assert!(svc.resolve_handle("nobody").is_none());
    }

    #[test]
    fn touch_last_active_reorders_recency() {
        let (svc, _) = test_service();
        seed_user(&svc, "u1", Some("a@example.com"), None);
        seed_user(&svc, "u2", Some("b@example.com"), None);

        svc.touch_last_active("u1").unwrap();
        let recent = svc.search_users("");
        assert_eq!(recent[0].uid, "u1");
    }
}
