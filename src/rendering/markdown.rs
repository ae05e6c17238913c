use std::collections::HashSet;

use pulldown_cmark::{html, Event, Options, Parser, TagEnd};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
}

/// Render a raw Markdown string to sanitized HTML.
///
/// Supports GitHub Flavored Markdown (GFM) features: tables,
/// footnotes, strikethrough, task lists, and smart punctuation.
/// Inline HTML (as saved by the rich-text editor) is kept, minus anything
/// that could run script.
pub fn render_markdown(raw: &str) -> String {
    let parser = Parser::new_ext(raw, options());
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    ammonia::Builder::default()
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .link_rel(None)
        .clean(&html_output)
        .to_string()
}

/// Plain-text excerpt of a markdown document, at most `limit` characters.
///
/// Markup and raw HTML are dropped and whitespace is collapsed.
pub fn plain_preview(raw: &str, limit: usize) -> String {
    let mut text = String::new();
    for event in Parser::new_ext(raw, options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableCell,
            ) => text.push(' '),
            _ => {}
        }
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(limit).collect()
}

/// Names of the headings in a document, in order, without duplicates.
pub fn headings(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut current: Option<String> = None;

    for event in Parser::new_ext(raw, options()) {
        match event {
            Event::Start(pulldown_cmark::Tag::Heading { .. }) => current = Some(String::new()),
            Event::Text(t) | Event::Code(t) => {
                if let Some(heading) = current.as_mut() {
                    heading.push_str(&t);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = current.take() {
                    if seen.insert(heading.clone()) {
                        out.push(heading);
                    }
                }
            }
            _ => {}
        }
    }

    out
}
