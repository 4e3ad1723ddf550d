//! Markup parser
//!
//! Turns markup text into an [`Element`] tree. The parser is forgiving the
//! way browsers are about structure (unclosed elements are closed at the end
//! of input, a closing tag closes every element opened after its match,
//! stray closing tags are dropped) but rejects input that is cut off in the
//! middle of a tag, comment or quoted value.

use super::{Attribute, Element, Node};
use thiserror::Error;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching closing tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// Deepest element nesting accepted before giving up
pub const MAX_NESTING: usize = 256;

/// Errors produced while parsing markup
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("markup ends inside {0}")]
    UnexpectedEof(&'static str),
    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("markup contains no element")]
    NoElement,
}

/// Parse markup and return its first top-level element
pub fn parse_element(markup: &str) -> Result<Element, MarkupError> {
    parse_fragment(markup)?
        .into_iter()
        .find_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
        .ok_or(MarkupError::NoElement)
}

/// Parse markup into a list of top-level nodes
pub fn parse_fragment(markup: &str) -> Result<Vec<Node>, MarkupError> {
    Parser::new(markup).run()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Open elements; index 0 is the fragment root
    stack: Vec<Element>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            stack: vec![Element::new("#fragment")],
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn run(mut self) -> Result<Vec<Node>, MarkupError> {
        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.comment()?;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.declaration()?;
            } else if rest.starts_with("</") && starts_tag_name(&rest[2..]) {
                self.close_tag()?;
            } else if rest.starts_with('<') && starts_tag_name(&rest[1..]) {
                self.open_tag()?;
            } else {
                self.text();
            }
        }

        while self.stack.len() > 1 {
            self.pop_into_parent();
        }
        let root = self.stack.pop().unwrap_or_default();
        Ok(root.children)
    }

    fn append(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(node);
        }
    }

    fn pop_into_parent(&mut self) {
        if let Some(done) = self.stack.pop() {
            self.append(Node::Element(done));
        }
    }

    fn text(&mut self) {
        // A '<' that does not start a tag is literal text
        let rest = self.rest();
        let skip = if rest.starts_with('<') { 1 } else { 0 };
        let end = rest[skip..]
            .find('<')
            .map(|i| i + skip)
            .unwrap_or(rest.len());
        let raw = &rest[..end];
        self.pos += end;

        let decoded = decode_entities(raw);
        match self.stack.last_mut().and_then(|top| top.children.last_mut()) {
            Some(Node::Text(prev)) => prev.push_str(&decoded),
            _ => self.append(Node::Text(decoded)),
        }
    }

    fn comment(&mut self) -> Result<(), MarkupError> {
        let body_start = self.pos + 4;
        let Some(end) = self.src[body_start..].find("-->") else {
            self.pos = self.src.len();
            return Err(MarkupError::UnexpectedEof("a comment"));
        };
        let body = self.src[body_start..body_start + end].to_string();
        self.pos = body_start + end + 3;
        self.append(Node::Comment(body));
        Ok(())
    }

    fn declaration(&mut self) -> Result<(), MarkupError> {
        let Some(end) = self.rest().find('>') else {
            return Err(MarkupError::UnexpectedEof("a declaration"));
        };
        self.pos += end + 1;
        Ok(())
    }

    fn close_tag(&mut self) -> Result<(), MarkupError> {
        self.pos += 2;
        let name = self.tag_name();
        let Some(end) = self.rest().find('>') else {
            return Err(MarkupError::UnexpectedEof("a closing tag"));
        };
        self.pos += end + 1;

        match self.stack.iter().rposition(|el| el.tag == name) {
            Some(idx) if idx > 0 => {
                while self.stack.len() > idx {
                    self.pop_into_parent();
                }
            }
            _ => tracing::debug!(tag = %name, "ignoring stray closing tag"),
        }
        Ok(())
    }

    fn open_tag(&mut self) -> Result<(), MarkupError> {
        self.pos += 1;
        let mut element = Element::new(self.tag_name());
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(MarkupError::UnexpectedEof("a tag"));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            let attr = self.attribute()?;
            // First occurrence wins, as in browsers
            if !element.has_attr(&attr.name) {
                element.attributes.push(attr);
            }
        }

        let tag = element.tag.clone();
        if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
            self.append(Node::Element(element));
            return Ok(());
        }

        if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            let closing = format!("</{}", tag);
            let rest = self.rest();
            let Some(end) = rest.to_ascii_lowercase().find(&closing) else {
                return Err(MarkupError::UnexpectedEof("a raw text element"));
            };
            let body = &rest[..end];
            if !body.is_empty() {
                let text = if tag == "textarea" {
                    decode_entities(body)
                } else {
                    body.to_string()
                };
                element.children.push(Node::Text(text));
            }
            self.pos += end;
            let Some(gt) = self.rest().find('>') else {
                return Err(MarkupError::UnexpectedEof("a closing tag"));
            };
            self.pos += gt + 1;
            self.append(Node::Element(element));
            return Ok(());
        }

        if self.stack.len() > MAX_NESTING {
            return Err(MarkupError::TooDeep(MAX_NESTING));
        }
        self.stack.push(element);
        Ok(())
    }

    fn attribute(&mut self) -> Result<Attribute, MarkupError> {
        let rest = self.rest();
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        // A lone '=' or quote would otherwise stall the loop
        let name_len = name_len.max(rest.chars().next().map(char::len_utf8).unwrap_or(0));
        let name = rest[..name_len].to_string();
        self.pos += name_len;

        self.skip_whitespace();
        if !self.rest().starts_with('=') {
            return Ok(Attribute {
                name,
                value: String::new(),
            });
        }
        self.pos += 1;
        self.skip_whitespace();

        let rest = self.rest();
        let value = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let Some(end) = rest[1..].find(quote) else {
                    return Err(MarkupError::UnexpectedEof("a quoted attribute value"));
                };
                self.pos += end + 2;
                &rest[1..end + 1]
            }
            Some(_) => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                &rest[..end]
            }
            None => return Err(MarkupError::UnexpectedEof("an attribute value")),
        };

        Ok(Attribute {
            name,
            value: decode_entities(value),
        })
    }

    fn tag_name(&mut self) -> String {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        rest[..len].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }
}

fn starts_tag_name(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Decode the character references that appear in hand-written markup
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let entity = &rest[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                "copy" => Some('©'),
                _ => entity.strip_prefix('#').and_then(|num| {
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => num.parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            ch.map(|c| (c, semi))
        });

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_elements() {
        let el = parse_element(r#"<div class="card"><h3>Title</h3><p>Body</p></div>"#).unwrap();
        assert_eq!(el.tag, "div");
        assert_eq!(el.attr("class"), Some("card"));
        assert_eq!(el.children.len(), 2);
        assert_eq!(el.find_by_tag("p").unwrap().text_content(), "Body");
    }

    #[test]
    fn test_parse_keeps_whitespace_text_nodes() {
        let el = parse_element("<div>\n  <span>a</span>\n</div>").unwrap();
        assert_eq!(el.children.len(), 3);
        assert!(matches!(el.children[0], Node::Text(_)));
    }

    #[test]
    fn test_parse_void_and_self_closing() {
        let el = parse_element(r#"<div><img src="a.png" alt="x"><br><svg><circle r="4"/></svg></div>"#)
            .unwrap();
        assert_eq!(el.children.len(), 3);
        let img = el.find_by_tag("img").unwrap();
        assert!(img.children.is_empty());
        assert_eq!(img.attr("alt"), Some("x"));
        assert!(el.find_by_tag("circle").unwrap().children.is_empty());
    }

    #[test]
    fn test_parse_lowercases_tag_names() {
        let el = parse_element("<DIV><Span>x</SPAN></DIV>").unwrap();
        assert_eq!(el.tag, "div");
        assert_eq!(el.find_by_tag("span").unwrap().text_content(), "x");
    }

    #[test]
    fn test_parse_decodes_entities() {
        let el = parse_element(r#"<p title="a &amp; b">&lt;/&gt; &#9733; &bogus;</p>"#).unwrap();
        assert_eq!(el.attr("title"), Some("a & b"));
        assert_eq!(el.text_content(), "</> ★ &bogus;");
    }

    #[test]
    fn test_parse_unclosed_elements_close_at_end() {
        let el = parse_element("<ul><li>one<li>two").unwrap();
        assert_eq!(el.tag, "ul");
        assert_eq!(el.text_content(), "onetwo");
    }

    #[test]
    fn test_parse_comment_and_raw_text() {
        let el = parse_element("<div><!-- note --><style>.a > .b { }</style></div>").unwrap();
        assert!(matches!(el.children[0], Node::Comment(_)));
        assert_eq!(el.find_by_tag("style").unwrap().text_content(), ".a > .b { }");
    }

    #[test]
    fn test_parse_truncated_tag_is_error() {
        assert_eq!(
            parse_element(r#"<div class="card"#),
            Err(MarkupError::UnexpectedEof("a quoted attribute value"))
        );
        assert_eq!(parse_element("<div"), Err(MarkupError::UnexpectedEof("a tag")));
    }

    #[test]
    fn test_parse_text_only_has_no_element() {
        assert_eq!(parse_element("just text"), Err(MarkupError::NoElement));
    }

    #[test]
    fn test_parse_rejects_runaway_nesting() {
        let markup = "<div>".repeat(MAX_NESTING + 5);
        assert_eq!(parse_element(&markup), Err(MarkupError::TooDeep(MAX_NESTING)));
    }
}
