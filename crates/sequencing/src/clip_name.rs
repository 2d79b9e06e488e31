//! Fallback display names for segments that don't declare one.

use crate::types::Content;

/// Name shown in timeline listings for a segment with the given content.
///
/// Uses the first named component; text-only or empty content yields `""`.
pub fn timeline_clip_name(content: &[Content]) -> String {
    content
        .iter()
        .find_map(|c| match c {
            Content::Component { name } if !name.is_empty() => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_component_wins() {
        let content = vec![
            Content::text("hello"),
            Content::component("Title"),
            Content::component("Background"),
        ];
        assert_eq!(timeline_clip_name(&content), "Title");
    }

    #[test]
    fn empty_when_no_component() {
        assert_eq!(timeline_clip_name(&[]), "");
        assert_eq!(timeline_clip_name(&[Content::text("only text")]), "");
        assert_eq!(timeline_clip_name(&[Content::component("")]), "");
    }
}
