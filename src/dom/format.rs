//! Indented markup formatter
//!
//! Renders an element subtree as readable, two-space indented markup for the
//! code modal. Works over [`ElementView`] only and never mutates the tree.

use super::parse::parse_element;
use super::{ChildView, ElementView};

/// Tags rendered as `<tag />` when they have no child nodes
const SELF_CLOSING: &[&str] = &["img", "br", "hr", "input"];

const INDENT: &str = "  ";

/// Deepest subtree the formatter walks before falling back to raw output
pub const MAX_DEPTH: usize = 256;

struct TooDeep;

/// Format an element subtree
///
/// Falls back to the single-line raw serialization when the tree is nested
/// deeper than [`MAX_DEPTH`].
pub fn format(root: &dyn ElementView) -> String {
    let mut out = String::new();
    match format_element(root, 0, &mut out) {
        Ok(()) => out,
        Err(TooDeep) => {
            tracing::warn!(max_depth = MAX_DEPTH, "element tree too deep to format, using raw markup");
            serialize(root)
        }
    }
}

/// Parse markup and format its first element
///
/// Returns `markup` unchanged when it does not parse or holds no element.
pub fn format_markup(markup: &str) -> String {
    match parse_element(markup) {
        Ok(element) => format(&element),
        Err(e) => {
            tracing::warn!(error = %e, "could not format markup");
            markup.to_string()
        }
    }
}

fn open_tag(el: &dyn ElementView, tag: &str) -> String {
    let mut s = format!("<{}", tag);
    for (name, value) in el.attributes() {
        s.push(' ');
        s.push_str(name);
        s.push_str("=\"");
        s.push_str(value);
        s.push('"');
    }
    s
}

fn format_element(el: &dyn ElementView, level: usize, out: &mut String) -> Result<(), TooDeep> {
    if level > MAX_DEPTH {
        return Err(TooDeep);
    }

    let indent = INDENT.repeat(level);
    let tag = el.tag_name().to_ascii_lowercase();
    let children = el.child_nodes();
    let open = open_tag(el, &tag);

    if children.is_empty() && SELF_CLOSING.contains(&tag.as_str()) {
        out.push_str(&format!("{}{} />", indent, open));
        return Ok(());
    }

    if let [ChildView::Text(text)] = children.as_slice() {
        out.push_str(&format!("{}{}>{}</{}>", indent, open, text.trim(), tag));
        return Ok(());
    }

    out.push_str(&indent);
    out.push_str(&open);
    out.push('>');
    for child in &children {
        match child {
            ChildView::Element(inner) => {
                out.push('\n');
                format_element(*inner, level + 1, out)?;
            }
            ChildView::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    out.push('\n');
                    out.push_str(&INDENT.repeat(level + 1));
                    out.push_str(text);
                }
            }
            ChildView::Other => {}
        }
    }
    out.push('\n');
    out.push_str(&indent);
    out.push_str(&format!("</{}>", tag));
    Ok(())
}

enum Step<'a> {
    Open(&'a dyn ElementView),
    Text(String),
    Close(String),
}

/// Single-line serialization with escaped text and attribute values
///
/// Uses an explicit stack so it handles trees of any depth.
pub fn serialize(root: &dyn ElementView) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Open(root)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) => out.push_str(&text),
            Step::Close(tag) => out.push_str(&format!("</{}>", tag)),
            Step::Open(el) => {
                let tag = el.tag_name().to_ascii_lowercase();
                out.push('<');
                out.push_str(&tag);
                for (name, value) in el.attributes() {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(value, true)));
                }
                out.push('>');

                let children = el.child_nodes();
                if children.is_empty() && SELF_CLOSING.contains(&tag.as_str()) {
                    continue;
                }
                stack.push(Step::Close(tag));
                for child in children.into_iter().rev() {
                    match child {
                        ChildView::Element(inner) => stack.push(Step::Open(inner)),
                        ChildView::Text(text) => stack.push(Step::Text(escape(text, false))),
                        ChildView::Other => {}
                    }
                }
            }
        }
    }
    out
}

fn escape(s: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !in_attribute => out.push_str("&lt;"),
            '>' if !in_attribute => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}
