//! Rendering markdown into a self-contained slide-deck page.

use handlebars::Handlebars;
use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;

use crate::config::ServerParam;

/// Renders markdown content into a presentation document.
///
/// The renderer is pure: it captures the deck configuration once and then maps
/// input text to an output document with no I/O, so the same input always
/// produces the same page.
#[derive(Debug)]
pub struct DeckRenderer {
    title: String,
    theme_href: String,
    engine_options: String,
    live_reload: bool,
    markdown_options: Options,
}

#[derive(Debug, Serialize)]
struct TemplateData<'a> {
    title: &'a str,
    theme_href: &'a str,
    engine_options: &'a str,
    live_reload: bool,
    slides: &'a str,
}

impl DeckRenderer {
    /// Creates a renderer for the given server configuration.
    pub fn new(param: &ServerParam) -> DeckRenderer {
        let title = param
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("slides"));

        DeckRenderer {
            title,
            theme_href: param.theme.href(),
            engine_options: param.reveal_options.to_init_js(),
            live_reload: param.watch,
            markdown_options: Options::ENABLE_FOOTNOTES
                | Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }

    /// Renders `markdown` into a complete HTML document.
    pub fn render(&self, markdown: &str) -> Result<String, handlebars::TemplateRenderError> {
        let slides = self.render_slides(markdown);

        Handlebars::new().render_template(
            include_str!("../templates/deck.html"),
            &TemplateData {
                title: &self.title,
                theme_href: &self.theme_href,
                engine_options: &self.engine_options,
                live_reload: self.live_reload,
                slides: &slides,
            },
        )
    }

    fn render_slides(&self, markdown: &str) -> String {
        let mut out = String::with_capacity(markdown.len() * 3 / 2);

        for group in split_slides(markdown) {
            match group.as_slice() {
                [section] => {
                    out.push_str("<section>\n");
                    self.render_section(section, &mut out);
                    out.push_str("</section>\n");
                }
                sections => {
                    // A vertical stack nests its slides in an outer section.
                    out.push_str("<section>\n");
                    for section in sections {
                        out.push_str("<section>\n");
                        self.render_section(section, &mut out);
                        out.push_str("</section>\n");
                    }
                    out.push_str("</section>\n");
                }
            }
        }

        out
    }

    fn render_section(&self, markdown: &str, out: &mut String) {
        let parser = Parser::new_ext(markdown, self.markdown_options);
        html::push_html(out, parser);
    }
}

/// Splits markdown into slides: the outer level on horizontal-rule lines of
/// hyphens, the inner level on lines of underscores. The split is purely
/// textual; a separator must be alone on its line.
fn split_slides(markdown: &str) -> Vec<Vec<&str>> {
    let mut groups = Vec::new();

    for horizontal in split_on_separator(markdown, '-') {
        groups.push(split_on_separator(horizontal, '_'));
    }

    groups
}

fn split_on_separator(text: &str, separator: char) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if is_separator_line(line, separator) {
            sections.push(&text[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }

    sections.push(&text[start..]);
    sections
}

fn is_separator_line(line: &str, separator: char) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    line.len() >= 3 && line.chars().all(|c| c == separator)
}
