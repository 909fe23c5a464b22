//! GitHub-flavored markdown dialect.

use crate::error::Result;
use crate::model::Tree;
use crate::render::markup::{Attribute, Markup};
use crate::render::paginate::paginate;
use crate::render::{Artifact, Handler, RenderContext};

pub struct MarkdownHandler;

impl Handler for MarkdownHandler {
    fn name(&self) -> &str {
        "markdown"
    }

    fn handle(&self, tree: &Tree, ctx: &RenderContext) -> Result<Vec<Artifact>> {
        Ok(paginate::<Markdown>(tree, ctx))
    }
}

#[derive(Default)]
pub struct Markdown {
    out: String,
}

impl Markup for Markdown {
    const EXTENSION: &'static str = "md";

    /// YAML front matter from the attributes, then the `#` title.
    fn header(&mut self, title: &str, attrs: &[Attribute]) {
        self.out.push_str("---\n");
        self.out.push_str(&format!("title: {}\n", yaml_scalar(title)));
        for (key, value) in attrs {
            self.out
                .push_str(&format!("{}: {}\n", key, yaml_scalar(value)));
        }
        self.out.push_str("---\n\n");
        self.out.push_str(&format!("# {}\n\n", title));
    }

    fn title(&mut self, level: usize, text: &str) {
        // Markdown stops at six levels.
        let hashes = "#".repeat((level + 1).min(6));
        self.out.push_str(&format!("{} {}\n\n", hashes, text));
    }

    fn paragraph(&mut self, text: &str) {
        self.out.push_str(text.trim_end());
        self.out.push_str("\n\n");
    }

    fn text_line(&mut self, text: &str) {
        self.out.push_str(&format!("**{}**\n\n", text));
    }

    fn listing(&mut self, language: &str, lines: &[String]) {
        let ticks = fence(lines);
        self.out.push_str(&format!("{}{}\n", ticks, language));
        for line in lines {
            self.out.push_str(line);
            self.out.push('\n');
        }
        self.out.push_str(&format!("{}\n\n", ticks));
    }

    fn table(&mut self, header: Option<&[String]>, rows: &[Vec<String>]) {
        let width = header
            .map(<[String]>::len)
            .or_else(|| rows.first().map(Vec::len))
            .unwrap_or(0);
        if width == 0 {
            return;
        }
        // GFM tables need a header row; plain tables get a blank one.
        let blank = vec![String::new(); width];
        self.out.push_str(&row(header.unwrap_or(blank.as_slice())));
        self.out
            .push_str(&format!("|{}\n", " --- |".repeat(width)));
        for r in rows {
            self.out.push_str(&row(r));
        }
        self.out.push('\n');
    }

    fn list_item(&mut self, level: usize, text: &str, target: Option<&str>) {
        let indent = "  ".repeat(level.saturating_sub(1));
        match target {
            Some(target) => self
                .out
                .push_str(&format!("{}- [{}]({})\n", indent, text, target)),
            None => self.out.push_str(&format!("{}- {}\n", indent, text)),
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn row(cells: &[String]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .map(|c| c.replace('|', "\\|").replace('\n', "<br>"))
        .collect();
    format!("| {} |\n", cells.join(" | "))
}

/// Backtick fence longer than any backtick run opening a content line.
fn fence(lines: &[String]) -> String {
    let longest = lines
        .iter()
        .flat_map(|l| l.lines())
        .map(|l| l.trim_start().chars().take_while(|&c| c == '`').count())
        .max()
        .unwrap_or(0);
    "`".repeat((longest + 1).max(3))
}

fn yaml_scalar(value: &str) -> String {
    if value.is_empty() || value.contains(|c: char| ":#\"'{}[]".contains(c)) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_front_matter() {
        let mut doc = Markdown::default();
        doc.header("Shop API", &[("toc-title", "Contents".to_string())]);
        assert_eq!(
            doc.finish(),
            "---\ntitle: Shop API\ntoc-title: Contents\n---\n\n# Shop API\n\n"
        );
    }

    #[test]
    fn header_quotes_yaml_specials() {
        let mut doc = Markdown::default();
        doc.header("API: v2", &[]);
        assert!(doc.finish().starts_with("---\ntitle: \"API: v2\"\n"));
    }

    #[test]
    fn title_caps_at_six() {
        let mut doc = Markdown::default();
        doc.title(2, "Find");
        doc.title(9, "Deep");
        assert_eq!(doc.finish(), "### Find\n\n###### Deep\n\n");
    }

    #[test]
    fn table_with_header() {
        let mut doc = Markdown::default();
        doc.table(
            Some(&["Name".to_string(), "Type".to_string()][..]),
            &[vec!["id".to_string(), "long".to_string()]],
        );
        assert_eq!(
            doc.finish(),
            "| Name | Type |\n| --- | --- |\n| id | long |\n\n"
        );
    }

    #[test]
    fn plain_table_gets_blank_header() {
        let mut doc = Markdown::default();
        doc.table(None, &[vec!["E1".to_string(), "a|b".to_string()]]);
        assert_eq!(
            doc.finish(),
            "|  |  |\n| --- | --- |\n| E1 | a\\|b |\n\n"
        );
    }

    #[test]
    fn fenced_listing() {
        let mut doc = Markdown::default();
        doc.listing("http", &["GET /a HTTP/1.1".to_string(), "Accept: */*".to_string()]);
        assert_eq!(doc.finish(), "```http\nGET /a HTTP/1.1\nAccept: */*\n```\n\n");
    }

    #[test]
    fn fence_outgrows_body() {
        let mut doc = Markdown::default();
        doc.listing("http", &["```js\nx\n```".to_string()]);
        assert_eq!(doc.finish(), "````http\n```js\nx\n```\n````\n\n");
    }

    #[test]
    fn toc_items_nest() {
        let mut doc = Markdown::default();
        doc.list_item(1, "Admin", None);
        doc.list_item(2, "Users", Some("users.md"));
        assert_eq!(doc.finish(), "- Admin\n  - [Users](users.md)\n");
    }
}
