//! Tag accumulation for an in-progress draft, and the submit-time merge
//! of explicit selections with mentions typed straight into the text.

use crate::model::TaggedUser;

/// Ordered tag list for one draft, unique by uid.
#[derive(Debug, Default, Clone)]
pub struct TagAccumulator {
    tags: Vec<TaggedUser>,
}

impl TagAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag. Returns false (and keeps the list unchanged) when the
    /// uid is already present.
    pub fn add(&mut self, tag: TaggedUser) -> bool {
        if self.tags.iter().any(|t| t.uid == tag.uid) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove the tag at `index`, if any.
    pub fn remove_at(&mut self, index: usize) -> Option<TaggedUser> {
        if index < self.tags.len() {
            Some(self.tags.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> &[TaggedUser] {
        &self.tags
    }

    pub fn into_tags(self) -> Vec<TaggedUser> {
        self.tags
    }
}

/// Merge explicit tags with mentions re-resolved from the final text.
///
/// Explicit tags come first and win; resolved mentions are appended only
/// when their uid is not already present. The result is unique by uid.
pub fn merge_tags(explicit: Vec<TaggedUser>, resolved: Vec<TaggedUser>) -> Vec<TaggedUser> {
    let mut acc = TagAccumulator::new();
    for tag in explicit.into_iter().chain(resolved) {
        acc.add(tag);
    }
    acc.into_tags()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(uid: &str) -> TaggedUser {
        TaggedUser {
            uid: uid.into(),
            email: Some(format!("{uid}@example.com")),
            display_name: None,
            first_name: None,
            last_name: None,
            photo_url: None,
        }
    }

    #[test]
    fn add_dedups_by_uid() {
        let mut acc = TagAccumulator::new();
        assert!(acc.add(tag("u1")));
        assert!(!acc.add(tag("u1")));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn remove_at_and_clear() {
        let mut acc = TagAccumulator::new();
        acc.add(tag("u1"));
        acc.add(tag("u2"));

        let removed = acc.remove_at(0).unwrap();
        assert_eq!(removed.uid, "u1");
        assert_eq!(acc.tags()[0].uid, "u2");
        assert!(acc.remove_at(5).is_none());

        acc.clear();
        assert!(acc.is_empty());
    }

    #[test]
    fn merge_is_idempotent_per_uid() {
        let merged = merge_tags(vec![tag("u1"), tag("u2")], vec![tag("u2"), tag("u3")]);
        let uids: Vec<&str> = merged.iter().map(|t| t.uid.as_str()).collect();
        assert_eq!(uids, vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn explicit_tags_keep_their_snapshot() {
        let mut explicit = tag("u1");
        explicit.display_name = Some("From Dropdown".into());
        let mut resolved = tag("u1");
        resolved.display_name = Some("From Text".into());

        let merged = merge_tags(vec![explicit], vec![resolved]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].display_name.as_deref(), Some("From Dropdown"));
    }
}
