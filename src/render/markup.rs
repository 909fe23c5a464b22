//! Minimal markup-emission interface shared by the paginated handlers.
//!
//! A `Markup` value is one in-progress document buffer. The paginator owns it
//! exclusively and consumes it with [`Markup::finish`] on every flush.

/// Document attribute, rendered per dialect (`:key: value` in AsciiDoc,
/// front matter in Markdown, `<meta>` in HTML).
pub type Attribute = (&'static str, String);

pub trait Markup: Default {
    /// File extension of finished buffers, without the dot.
    const EXTENSION: &'static str;

    /// Document title plus global attributes.
    fn header(&mut self, title: &str, attrs: &[Attribute]);

    /// Section title; level 1 is a top-level chapter.
    fn title(&mut self, level: usize, text: &str);

    fn paragraph(&mut self, text: &str);

    /// A short label line, e.g. `Request`.
    fn text_line(&mut self, text: &str);

    /// Fenced block with one entry per line.
    fn listing(&mut self, language: &str, lines: &[String]);

    /// Table with an optional header row.
    fn table(&mut self, header: Option<&[String]>, rows: &[Vec<String>]);

    /// Table-of-contents entry; `target` is a sibling artifact file name.
    fn list_item(&mut self, level: usize, text: &str, target: Option<&str>);

    fn finish(self) -> String;
}
