//! Element tree for the showcase page
//!
//! A small owned DOM: elements with ordered attributes and ordered child
//! nodes. Cloning an [`Element`] yields a detached deep copy, which is how the
//! code modal works on a card without touching the live page.

pub mod format;
pub mod parse;

pub use format::{format, format_markup};
pub use parse::{parse_element, MarkupError};

/// A single `name="value"` pair, stored decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A child node of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An element with its attributes and children
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

/// Child-index path from an ancestor element down to one of its descendants
///
/// Indices count every child node (text and comments included), the same
/// way `childNodes` does.
pub type NodePath = Vec<usize>;

// ═══════════════════════════════════════════════════════════════════════════════
// Read-only view
// ═══════════════════════════════════════════════════════════════════════════════

/// A child as seen through [`ElementView`]
pub enum ChildView<'a> {
    Element(&'a dyn ElementView),
    Text(&'a str),
    /// Comments and anything else that is a node but neither element nor text
    Other,
}

/// Read-only interface over an element tree
///
/// The formatter only relies on this trait, so any tree type that can expose
/// a tag, ordered attributes and ordered children can be formatted.
pub trait ElementView {
    fn tag_name(&self) -> &str;
    fn attributes(&self) -> Vec<(&str, &str)>;
    fn child_nodes(&self) -> Vec<ChildView<'_>>;
}

impl ElementView for Element {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        self.attributes
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect()
    }

    fn child_nodes(&self) -> Vec<ChildView<'_>> {
        self.children
            .iter()
            .map(|child| match child {
                Node::Element(el) => ChildView::Element(el),
                Node::Text(text) => ChildView::Text(text),
                Node::Comment(_) => ChildView::Other,
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Element API
// ═══════════════════════════════════════════════════════════════════════════════

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: append an attribute
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: append a child node
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: append a text child
    pub fn with_text(self, text: &str) -> Self {
        self.with_child(Node::Text(text.to_string()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(idx).value)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let value = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", &value);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let value = self
            .classes()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr("class", &value);
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    /// Value of one declaration in the inline `style` attribute
    pub fn style_property(&self, name: &str) -> Option<String> {
        style_declarations(self.attr("style").unwrap_or(""))
            .into_iter()
            .find(|(prop, _)| prop == name)
            .map(|(_, value)| value)
    }

    /// Set one inline style declaration; an empty value removes it
    pub fn set_style_property(&mut self, name: &str, value: &str) {
        let mut decls = style_declarations(self.attr("style").unwrap_or(""));
        match decls.iter().position(|(prop, _)| prop == name) {
            Some(idx) if value.is_empty() => {
                decls.remove(idx);
            }
            Some(idx) => decls[idx].1 = value.to_string(),
            None if value.is_empty() => {}
            None => decls.push((name.to_string(), value.to_string())),
        }
        if decls.is_empty() {
            self.remove_attr("style");
        } else {
            let style = decls
                .iter()
                .map(|(prop, value)| format!("{}: {}", prop, value))
                .collect::<Vec<_>>()
                .join("; ");
            self.set_attr("style", &style);
        }
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Replace all children with a single text node
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![Node::Text(text.to_string())];
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Resolve a path to a descendant element (empty path is `self`)
    pub fn get(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &idx in path {
            current = match current.children.get(idx)? {
                Node::Element(el) => el,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &idx in path {
            current = match current.children.get_mut(idx)? {
                Node::Element(el) => el,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Detach the node at `path`; the empty path cannot be removed
    pub fn remove_at(&mut self, path: &[usize]) -> Option<Node> {
        let (last, parent_path) = path.split_last()?;
        let parent = self.get_mut(parent_path)?;
        if *last < parent.children.len() {
            Some(parent.children.remove(*last))
        } else {
            None
        }
    }

    /// First descendant (pre-order, excluding `self`) matching `pred`
    pub fn find_first<F>(&self, pred: F) -> Option<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        let mut path = Vec::new();
        find_first_in(self, &pred, &mut path).then_some(path)
    }

    /// All descendants (pre-order, excluding `self`) matching `pred`
    pub fn find_all<F>(&self, pred: F) -> Vec<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        let mut path = Vec::new();
        find_all_in(self, &pred, &mut path, &mut found);
        found
    }

    pub fn find_by_class(&self, class: &str) -> Option<NodePath> {
        self.find_first(|el| el.has_class(class))
    }

    /// First descendant element with the given tag name
    pub fn find_by_tag(&self, tag: &str) -> Option<&Element> {
        self.find_first(|el| el.tag == tag).and_then(|p| self.get(&p))
    }
}

fn style_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            (!prop.is_empty()).then(|| (prop.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) => collect_text(inner, out),
            Node::Comment(_) => {}
        }
    }
}

fn find_first_in<F>(el: &Element, pred: &F, path: &mut NodePath) -> bool
where
    F: Fn(&Element) -> bool,
{
    for (idx, child) in el.children.iter().enumerate() {
        if let Node::Element(inner) = child {
            path.push(idx);
            if pred(inner) || find_first_in(inner, pred, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}

fn find_all_in<F>(el: &Element, pred: &F, path: &mut NodePath, found: &mut Vec<NodePath>)
where
    F: Fn(&Element) -> bool,
{
    for (idx, child) in el.children.iter().enumerate() {
        if let Node::Element(inner) = child {
            path.push(idx);
            if pred(inner) {
                found.push(path.clone());
            }
            find_all_in(inner, pred, path, found);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .with_attr("class", "card card-basic")
            .with_text("\n  ")
            .with_child(Node::Element(
                Element::new("h3").with_attr("class", "card-title").with_text("Hello"),
            ))
            .with_child(Node::Element(
                Element::new("button")
                    .with_attr("class", "code-view-btn")
                    .with_child(Node::Element(Element::new("span").with_text("code"))),
            ))
    }

    #[test]
    fn test_class_manipulation() {
        let mut el = sample();
        assert!(el.has_class("card"));
        el.add_class("revealed");
        assert_eq!(el.attr("class"), Some("card card-basic revealed"));
        el.add_class("revealed");
        assert_eq!(el.attr("class"), Some("card card-basic revealed"));
        assert!(!el.toggle_class("revealed"));
        assert_eq!(el.attr("class"), Some("card card-basic"));
    }

    #[test]
    fn test_style_properties_update_in_place() {
        let mut el = Element::new("div").with_attr("style", "color: red; transform: none");
        el.set_style_property("transform", "scale(0.95)");
        el.set_style_property("opacity", "1");
        assert_eq!(
            el.attr("style"),
            Some("color: red; transform: scale(0.95); opacity: 1")
        );
        assert_eq!(el.style_property("opacity").as_deref(), Some("1"));
        el.set_style_property("color", "");
        el.set_style_property("transform", "");
        el.set_style_property("opacity", "");
        assert_eq!(el.attr("style"), None);
    }

    #[test]
    fn test_find_and_remove_by_path() {
        let mut el = sample();
        let path = el.find_by_class("code-view-btn").unwrap();
        assert_eq!(path, vec![2]);
        assert!(el.remove_at(&path).is_some());
        assert!(el.find_by_class("code-view-btn").is_none());
    }

    #[test]
    fn test_find_all_is_pre_order() {
        let el = sample();
        let paths = el.find_all(|_| true);
        assert_eq!(paths, vec![vec![1], vec![2], vec![2, 0]]);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let el = sample();
        assert_eq!(el.text_content(), "\n  Hellocode");
    }

    #[test]
    fn test_set_attr_keeps_position() {
        let mut el = Element::new("a").with_attr("href", "#").with_attr("title", "x");
        el.set_attr("href", "/home");
        assert_eq!(el.attributes[0].name, "href");
        assert_eq!(el.attributes[0].value, "/home");
        assert_eq!(el.remove_attr("title"), Some("x".to_string()));
        assert!(!el.has_attr("title"));
    }
}
