//! Table-of-contents entries and anchor/file slugs.

/// One line of the index table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Nesting depth, 1 for top-level chapters.
    pub level: usize,
    pub title: String,
    /// Artifact file the entry links to. Bucket chapters have none.
    pub target: Option<String>,
}

/// GitHub-style heading slug.
///
/// - lowercase
/// - keep alphanumerics, spaces and hyphens; strip everything else
/// - replace spaces with hyphens
pub fn slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// Slug suitable as a file stem; never empty.
pub fn file_stem(text: &str) -> String {
    let s = slug(text);
    let s = s.trim_matches('-');
    if s.is_empty() {
        "group".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_simple() {
        assert_eq!(slug("hello world"), "hello-world");
    }

    #[test]
    fn slug_strips_punctuation() {
        assert_eq!(slug("user::find"), "userfind");
        assert_eq!(slug("User_Controller"), "usercontroller");
    }

    #[test]
    fn slug_keeps_hyphens_and_unicode() {
        assert_eq!(slug("order-items"), "order-items");
        assert_eq!(slug("用户 接口"), "用户-接口");
    }

    #[test]
    fn file_stem_never_empty() {
        assert_eq!(file_stem("???"), "group");
        assert_eq!(file_stem(" Users "), "users");
        assert_eq!(file_stem("- x -"), "x");
    }
}
