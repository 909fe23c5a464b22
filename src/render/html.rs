//! HTML dialect: standalone pages with semantic markup.

use crate::error::Result;
use crate::model::Tree;
use crate::render::markup::{Attribute, Markup};
use crate::render::paginate::paginate;
use crate::render::{Artifact, Handler, RenderContext};

pub struct HtmlHandler;

impl Handler for HtmlHandler {
    fn name(&self) -> &str {
        "html"
    }

    fn handle(&self, tree: &Tree, ctx: &RenderContext) -> Result<Vec<Artifact>> {
        Ok(paginate::<Html>(tree, ctx))
    }
}

const STYLE: &str = "\
body { font-family: system-ui, sans-serif; max-width: 56em; margin: 2em auto; padding: 0 1em; }
pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ddd; padding: 0.3em 0.6em; text-align: left; }
th { background: #f4f4f4; }
.label { font-weight: bold; margin: 1em 0 0.3em; }
";

#[derive(Default)]
pub struct Html {
    out: String,
    /// Depth of currently open `<ul>` elements in the table of contents.
    list_depth: usize,
}

impl Html {
    fn close_lists(&mut self, to: usize) {
        while self.list_depth > to {
            self.out.push_str("</ul>\n");
            self.list_depth -= 1;
        }
    }
}

impl Markup for Html {
    const EXTENSION: &'static str = "html";

    fn header(&mut self, title: &str, attrs: &[Attribute]) {
        self.out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        self.out.push_str("<meta charset=\"utf-8\">\n");
        self.out
            .push_str(&format!("<title>{}</title>\n", html_escape(title)));
        for (key, value) in attrs {
            if *key == "stylesheet" {
                self.out.push_str(&format!(
                    "<link rel=\"stylesheet\" href=\"{}\">\n",
                    html_escape(value)
                ));
            } else {
                self.out.push_str(&format!(
                    "<meta name=\"{}\" content=\"{}\">\n",
                    key,
                    html_escape(value)
                ));
            }
        }
        self.out.push_str("<style>\n");
        self.out.push_str(STYLE);
        self.out.push_str("</style>\n");
        self.out.push_str("</head>\n<body>\n");
        self.out
            .push_str(&format!("<h1>{}</h1>\n", html_escape(title)));
    }

    fn title(&mut self, level: usize, text: &str) {
        self.close_lists(0);
        let h = (level + 1).min(6);
        self.out.push_str(&format!(
            "<h{h} id=\"{}\">{}</h{h}>\n",
            crate::toc::slug(text),
            html_escape(text)
        ));
    }

    fn paragraph(&mut self, text: &str) {
        self.close_lists(0);
        self.out
            .push_str(&format!("<p>{}</p>\n", html_escape(text.trim_end())));
    }

    fn text_line(&mut self, text: &str) {
        self.close_lists(0);
        self.out.push_str(&format!(
            "<div class=\"label\">{}</div>\n",
            html_escape(text)
        ));
    }

    fn listing(&mut self, language: &str, lines: &[String]) {
        self.close_lists(0);
        self.out.push_str(&format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            language,
            html_escape(&lines.join("\n"))
        ));
    }

    fn table(&mut self, header: Option<&[String]>, rows: &[Vec<String>]) {
        self.close_lists(0);
        self.out.push_str("<table>\n");
        if let Some(header) = header {
            self.out.push_str("<tr>");
            for cell in header {
                self.out
                    .push_str(&format!("<th>{}</th>", html_escape(cell)));
            }
            self.out.push_str("</tr>\n");
        }
        for row in rows {
            self.out.push_str("<tr>");
            for cell in row {
                self.out
                    .push_str(&format!("<td>{}</td>", html_escape(cell)));
            }
            self.out.push_str("</tr>\n");
        }
        self.out.push_str("</table>\n");
    }

    fn list_item(&mut self, level: usize, text: &str, target: Option<&str>) {
        let level = level.max(1);
        self.close_lists(level);
        while self.list_depth < level {
            self.out.push_str("<ul>\n");
            self.list_depth += 1;
        }
        match target {
            Some(target) => self.out.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                html_escape(target),
                html_escape(text)
            )),
            None => self
                .out
                .push_str(&format!("<li>{}</li>\n", html_escape(text))),
        }
    }

    fn finish(mut self) -> String {
        self.close_lists(0);
        self.out.push_str("</body>\n</html>\n");
        self.out
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
