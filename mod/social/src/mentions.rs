//! Mention syntax: `@` followed by either a double-quoted phrase or a
//! bare token.
//!
//! Display names may contain spaces, so they are written `@"Jane Doe"`;
//! bare handles (email local-parts) need no quoting. The quoted branch is
//! attempted first — an unterminated quote is not a quoted match, and the
//! bare branch excludes `"`, so `@"foo` yields no candidate at all.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{TaggedUser, User};

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"@(?:"([^"]+)"|([^\s"]+))"#).expect("mention regex"));

/// Extract candidate handles from free text, left to right, without
/// deduplication. A trailing `@` or `@` before whitespace yields nothing.
pub fn extract_mentions(text: &str) -> Vec<String> {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|cap| {
            cap.get(1)
                .or_else(|| cap.get(2))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

/// Single handle-resolution chain: display name, else email local-part,
/// else "first last", else the uid.
fn handle_from_parts(
    display_name: Option<&str>,
    email_local: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    uid: &str,
) -> String {
    if let Some(name) = display_name.filter(|s| !s.is_empty()) {
        return name.to_string();
    }
    if let Some(local) = email_local {
        return local.to_string();
    }
    match (
        first_name.filter(|s| !s.is_empty()),
        last_name.filter(|s| !s.is_empty()),
    ) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        _ => uid.to_string(),
    }
}

/// The handle a directory user is mentioned by.
pub fn mention_handle(user: &User) -> String {
    handle_from_parts(
        user.display_name.as_deref(),
        user.email_local(),
        user.first_name.as_deref(),
        user.last_name.as_deref(),
        &user.uid,
    )
}

/// Render a user as mention text, quoting iff the handle contains
/// whitespace.
pub fn format_mention(user: &User) -> String {
    quote_handle(&mention_handle(user))
}

/// The handle a tag snapshot is mentioned by — same chain as
/// [`mention_handle`].
pub fn tag_handle(tag: &TaggedUser) -> String {
    handle_from_parts(
        tag.display_name.as_deref(),
        tag.email_local(),
        tag.first_name.as_deref(),
        tag.last_name.as_deref(),
        &tag.uid,
    )
}

/// Render a tag snapshot as mention text — the display echo stored on a
/// submitted post.
pub fn format_tag_mention(tag: &TaggedUser) -> String {
    quote_handle(&tag_handle(tag))
}

fn quote_handle(handle: &str) -> String {
    if handle.chars().any(char::is_whitespace) {
        format!("@\"{handle}\"")
    } else {
        format!("@{handle}")
    }
}
