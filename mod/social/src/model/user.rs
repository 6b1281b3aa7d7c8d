use serde::{Deserialize, Serialize};

/// A directory user. Created by registration flows (out of scope here);
/// this module only reads the directory and snapshots users into tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque stable identifier.
    pub uid: String,

    /// Email address. Used as a fallback identifier; its local-part is the
    /// bare mention handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    /// Cached abbreviation shown in avatars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,

    /// RFC 3339 timestamp of last activity. Orders the empty-term
    /// suggestion list.
    pub last_active_at: String,
}

/// Canonical display-name resolution: display name, then "first last",
/// then email, then "Unknown User". The single fallback chain for every
/// place a user or tag snapshot is rendered.
pub(crate) fn resolve_display(
    display_name: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
) -> String {
    if let Some(name) = display_name.filter(|s| !s.is_empty()) {
        return name.to_string();
    }
    if let (Some(first), Some(last)) = (
        first_name.filter(|s| !s.is_empty()),
        last_name.filter(|s| !s.is_empty()),
    ) {
        return format!("{first} {last}");
    }
    if let Some(email) = email.filter(|s| !s.is_empty()) {
        return email.to_string();
    }
    "Unknown User".to_string()
}

impl User {
    pub fn display_label(&self) -> String {
        resolve_display(
            self.display_name.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        )
    }

    /// The email local-part, when an email is present.
    pub fn email_local(&self) -> Option<&str> {
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|s| !s.is_empty())
    }

    /// Snapshot this user into a tag.
    pub fn to_tag(&self) -> TaggedUser {
        TaggedUser {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// A denormalized snapshot of a directory user, embedded in a post or
/// reply at tag time. Unique by `uid` within one tag list; immutable
/// after submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaggedUser {
    pub uid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl TaggedUser {
    pub fn display_label(&self) -> String {
        resolve_display(
            self.display_name.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        )
    }

    /// The email local-part, when an email is present.
    pub fn email_local(&self) -> Option<&str> {
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|s| !s.is_empty())
    }
}

/// Input for the directory ingest write path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUser {
    /// Existing uid to replace, or absent to mint a new one.
    #[serde(default)]
    pub uid: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub photo_url: Option<String>,

    #[serde(default)]
    pub initials: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            uid: "u1".into(),
            email: Some("jane.doe@example.com".into()),
            display_name: Some("Jane Doe".into()),
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            photo_url: None,
            initials: Some("JD".into()),
            last_active_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn display_label_prefers_display_name() {
        assert_eq!(user().display_label(), "Jane Doe");
    }

    #[test]
    fn display_label_falls_back_to_names_then_email() {
        let mut u = user();
        u.display_name = None;
        assert_eq!(u.display_label(), "Jane Doe");

        u.first_name = None;
        assert_eq!(u.display_label(), "jane.doe@example.com");
    }

    #[test]
    fn display_label_degrades_to_placeholder() {
        let u = User {
            uid: "u2".into(),
            email: None,
            display_name: None,
            first_name: None,
            last_name: None,
            photo_url: None,
            initials: None,
            last_active_at: "2026-01-01T00:00:00Z".into(),
        };
        assert_eq!(u.display_label(), "Unknown User");
    }

    #[test]
    fn email_local_part() {
        assert_eq!(user().email_local(), Some("jane.doe"));

        let mut u = user();
        u.email = None;
        assert_eq!(u.email_local(), None);
    }

    #[test]
    fn tag_snapshot_carries_identity_fields() {
        let tag = user().to_tag();
        assert_eq!(tag.uid, "u1");
        assert_eq!(tag.display_name.as_deref(), Some("Jane Doe"));
        assert_eq!(tag.display_label(), "Jane Doe");
    }

    #[test]
    fn user_json_skips_absent_fields() {
        let mut u = user();
        u.photo_url = None;
        let json = serde_json::to_string(&u).unwrap();
        assert!(!json.contains("photoUrl"));
        let back: User = serde_json::from_str(&json).unwrap();
        assert!(back.photo_url.is_none());
    }
}
