//! Recursive visitor over a parsed HTML fragment.

use scraper::{ElementRef, Html, Node};

use super::builder::TextBuilder;
use super::slack_escape;

/// Output dialect of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flavor {
    /// Text only: no emphasis, link targets dropped, no escaping.
    Plain,
    /// Slack `mrkdwn`: emphasis, `<url|text>` links, `&<>` escaped.
    Slack,
}

/// Render an HTML fragment in the given flavor, without truncation.
pub(crate) fn render(html: &str, flavor: Flavor) -> String {
    let document = Html::parse_fragment(html);
    let mut builder = TextBuilder::new(flavor == Flavor::Slack);
    walk_children(document.root_element(), flavor, &mut builder);
    builder.finish()
}

fn walk_children(element: ElementRef<'_>, flavor: Flavor, builder: &mut TextBuilder) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => builder.add_text(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    visit_element(child, flavor, builder);
                }
            }
            _ => {}
        }
    }
}

fn visit_element(element: ElementRef<'_>, flavor: Flavor, builder: &mut TextBuilder) {
    match element.value().name() {
        "img" | "script" | "style" | "head" | "title" | "template" => {}
        "br" => builder.line_break(),
        "b" | "strong" => emphasis(element, "*", flavor, builder),
        "i" | "em" => emphasis(element, "_", flavor, builder),
        "a" => link(element, flavor, builder),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            builder.block_boundary(2);
            emphasis(element, "*", flavor, builder);
            builder.block_boundary(2);
        }
        "pre" => {
            builder.enter_pre();
            block(element, 2, flavor, builder);
            builder.exit_pre();
        }
        "p" | "blockquote" | "table" => block(element, 2, flavor, builder),
        "ul" | "ol" | "div" | "tr" | "section" | "article" | "header" | "footer" => {
            block(element, 1, flavor, builder);
        }
        "li" => {
            builder.block_boundary(1);
            builder.add_inline("\u{2022} ");
            walk_children(element, flavor, builder);
            builder.block_boundary(1);
        }
        _ => walk_children(element, flavor, builder),
    }
}

fn block(element: ElementRef<'_>, lines: usize, flavor: Flavor, builder: &mut TextBuilder) {
    builder.block_boundary(lines);
    walk_children(element, flavor, builder);
    builder.block_boundary(lines);
}

fn emphasis(element: ElementRef<'_>, marker: &str, flavor: Flavor, builder: &mut TextBuilder) {
    if flavor == Flavor::Plain {
        walk_children(element, flavor, builder);
        return;
    }
    builder.open_inline(marker);
    walk_children(element, flavor, builder);
    builder.close_inline(marker);
}

fn link(element: ElementRef<'_>, flavor: Flavor, builder: &mut TextBuilder) {
    let href = element
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty());
    let Some(href) = href.filter(|_| flavor == Flavor::Slack) else {
        walk_children(element, flavor, builder);
        return;
    };

    builder.push_capture();
    walk_children(element, flavor, builder);
    let text = builder.pop_capture().join(" ");

    if builder.is_capturing() {
        // nested link: hand the words to the enclosing capture
        builder.add_text(&text);
        return;
    }

    let markup = if text.is_empty() || text == href {
        format!("<{}>", slack_escape(href))
    } else {
        format!("<{}|{}>", slack_escape(href), slack_escape(&text))
    };
    builder.add_inline(&markup);
}
