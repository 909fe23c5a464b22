//! AsciiDoc dialect: book doctype with a left-hand table of contents.

use crate::error::Result;
use crate::model::Tree;
use crate::render::markup::{Attribute, Markup};
use crate::render::paginate::paginate;
use crate::render::{Artifact, Handler, RenderContext};

pub struct AsciidocHandler;

impl Handler for AsciidocHandler {
    fn name(&self) -> &str {
        "asciidoc"
    }

    fn handle(&self, tree: &Tree, ctx: &RenderContext) -> Result<Vec<Artifact>> {
        Ok(paginate::<AsciiDoc>(tree, ctx))
    }
}

#[derive(Default)]
pub struct AsciiDoc {
    out: String,
}

impl Markup for AsciiDoc {
    const EXTENSION: &'static str = "adoc";

    fn header(&mut self, title: &str, attrs: &[Attribute]) {
        self.out.push_str(&format!("= {}\n", title));
        for (key, value) in attrs {
            self.out.push_str(&format!(":{}: {}\n", key, value));
        }
        self.out.push('\n');
    }

    fn title(&mut self, level: usize, text: &str) {
        self.out
            .push_str(&format!("{} {}\n\n", "=".repeat(level + 1), text));
    }

    fn paragraph(&mut self, text: &str) {
        self.out.push_str(text.trim_end());
        self.out.push_str("\n\n");
    }

    // Block title; attaches to the listing that follows.
    fn text_line(&mut self, text: &str) {
        self.out.push_str(&format!(".{}\n", text));
    }

    fn listing(&mut self, language: &str, lines: &[String]) {
        let fence = delimiter(lines);
        self.out.push_str(&format!("[source,{}]\n{}\n", language, fence));
        for line in lines {
            self.out.push_str(line);
            self.out.push('\n');
        }
        self.out.push_str(&format!("{}\n\n", fence));
    }

    fn table(&mut self, header: Option<&[String]>, rows: &[Vec<String>]) {
        if header.is_some() {
            self.out.push_str("[options=\"header\"]\n");
        }
        self.out.push_str("|===\n");
        if let Some(header) = header {
            self.out.push_str(&row(header));
        }
        for r in rows {
            self.out.push_str(&row(r));
        }
        self.out.push_str("|===\n\n");
    }

    fn list_item(&mut self, level: usize, text: &str, target: Option<&str>) {
        let bullet = "*".repeat(level.max(1));
        match target {
            Some(target) => self
                .out
                .push_str(&format!("{} xref:{}[{}]\n", bullet, target, text)),
            None => self.out.push_str(&format!("{} {}\n", bullet, text)),
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn row(cells: &[String]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| format!("|{}", escape_cell(c))).collect();
    format!("{}\n", cells.join(" "))
}

/// Listing delimiter longer than any dash-only line in the content.
fn delimiter(lines: &[String]) -> String {
    let longest = lines
        .iter()
        .flat_map(|l| l.lines())
        .filter(|l| !l.is_empty() && l.chars().all(|c| c == '-'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "-".repeat((longest + 1).max(4))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
