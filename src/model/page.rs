//! The parsed showcase page
//!
//! A [`Page`] is the element tree plus an index over it: every `.card`, and
//! inside each card the interactive controls the bindings respond to.
//! Controls are found by class or id and addressed by a path from their
//! card, so the index has to be rebuilt (`rescan`) after a card's children
//! are added or removed.

use crate::dom::{parse_element, Element, MarkupError, Node, NodePath};
use crate::model::timer::{CardIndex, ControlIndex};

/// What a control does when used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// `.btn-primary`
    Primary,
    /// `.btn-icon`, identified by its icon glyph name
    IconButton,
    /// `.product-wishlist`
    Wishlist,
    /// `.social-action` (like, comment, share)
    SocialAction,
    /// `.btn-text`
    TextButton,
    /// `.code-view-btn`
    CodeView,
    /// `.reveal-close`
    RevealClose,
    /// `.social-btn` sign-in buttons
    SocialSignIn,
    /// `.form-input`, `.form-select`, `.form-textarea`
    Field,
    /// `.toggle-input` setting switches
    SettingToggle,
    /// `button[type=submit]`
    Submit,
    /// `.voice-btn`
    Voice,
    /// `.quick-btn`
    Quick,
    /// `#chatInput`
    ChatInput,
    /// `#sendBtn`
    ChatSend,
    /// `#starButton`
    RepoStar,
    /// `#watchButton`
    RepoWatch,
    /// `#refreshRepo`
    RepoRefresh,
}

impl ControlKind {
    /// Controls that take typed text
    pub fn is_text_entry(&self) -> bool {
        matches!(self, ControlKind::Field | ControlKind::ChatInput)
    }
}

/// Classify an element as a control, if it is one
pub fn classify(el: &Element) -> Option<ControlKind> {
    match el.attr("id") {
        Some("chatInput") => return Some(ControlKind::ChatInput),
        Some("sendBtn") => return Some(ControlKind::ChatSend),
        Some("starButton") => return Some(ControlKind::RepoStar),
        Some("watchButton") => return Some(ControlKind::RepoWatch),
        Some("refreshRepo") => return Some(ControlKind::RepoRefresh),
        _ => {}
    }

    let by_class = [
        ("code-view-btn", ControlKind::CodeView),
        ("reveal-close", ControlKind::RevealClose),
        ("social-btn", ControlKind::SocialSignIn),
        ("voice-btn", ControlKind::Voice),
        ("quick-btn", ControlKind::Quick),
        ("product-wishlist", ControlKind::Wishlist),
        ("social-action", ControlKind::SocialAction),
        ("toggle-input", ControlKind::SettingToggle),
        ("form-input", ControlKind::Field),
        ("form-select", ControlKind::Field),
        ("form-textarea", ControlKind::Field),
    ];
    if let Some((_, kind)) = by_class.iter().find(|(class, _)| el.has_class(class)) {
        return Some(*kind);
    }

    if el.tag == "button" && el.attr("type") == Some("submit") {
        return Some(ControlKind::Submit);
    }
    if el.has_class("btn-primary") {
        return Some(ControlKind::Primary);
    }
    if el.has_class("btn-icon") {
        return Some(ControlKind::IconButton);
    }
    if el.has_class("btn-text") {
        return Some(ControlKind::TextButton);
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// Path from the card element
    pub path: NodePath,
    pub kind: ControlKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Path from the page root
    pub path: NodePath,
    /// `data-card-type`, when present
    pub key: Option<String>,
    /// Text of the card's first `h3`
    pub title: String,
    pub controls: Vec<Control>,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub root: Element,
    pub cards: Vec<Card>,
}

impl Page {
    pub fn parse(markup: &str) -> Result<Page, MarkupError> {
        Ok(Page::from_root(parse_element(markup)?))
    }

    pub fn from_root(root: Element) -> Page {
        let mut page = Page {
            root,
            cards: Vec::new(),
        };
        page.index();
        page
    }

    fn index(&mut self) {
        let paths = card_paths(&self.root);
        self.cards = paths
            .into_iter()
            .filter_map(|path| {
                let el = self.root.get(&path)?;
                Some(Card {
                    key: el.attr("data-card-type").map(str::to_string),
                    title: card_title(el),
                    controls: scan_controls(el),
                    path,
                })
            })
            .collect();
        tracing::debug!(cards = self.cards.len(), "page indexed");
    }

    /// Rebuild the control index of one card after its children changed
    pub fn rescan(&mut self, card: CardIndex) {
        let Some(entry) = self.cards.get(card) else {
            return;
        };
        let Some(el) = self.root.get(&entry.path) else {
            return;
        };
        let controls = scan_controls(el);
        let title = card_title(el);
        if let Some(entry) = self.cards.get_mut(card) {
            entry.controls = controls;
            entry.title = title;
        }
    }

    pub fn card(&self, card: CardIndex) -> Option<&Element> {
        self.root.get(&self.cards.get(card)?.path)
    }

    pub fn card_mut(&mut self, card: CardIndex) -> Option<&mut Element> {
        let path = self.cards.get(card)?.path.clone();
        self.root.get_mut(&path)
    }

    pub fn control(&self, card: CardIndex, control: ControlIndex) -> Option<&Element> {
        let path = &self.cards.get(card)?.controls.get(control)?.path;
        self.card(card)?.get(path)
    }

    pub fn control_mut(&mut self, card: CardIndex, control: ControlIndex) -> Option<&mut Element> {
        let path = self.cards.get(card)?.controls.get(control)?.path.clone();
        self.card_mut(card)?.get_mut(&path)
    }

    pub fn control_kind(&self, card: CardIndex, control: ControlIndex) -> Option<ControlKind> {
        Some(self.cards.get(card)?.controls.get(control)?.kind)
    }

    /// Controls of `kind` in `card`, in document order
    pub fn controls_of(&self, card: CardIndex, kind: ControlKind) -> Vec<ControlIndex> {
        self.cards
            .get(card)
            .map(|c| {
                c.controls
                    .iter()
                    .enumerate()
                    .filter(|(_, ctl)| ctl.kind == kind)
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First card whose element matches `pred`
    pub fn find_card<F>(&self, pred: F) -> Option<CardIndex>
    where
        F: Fn(&Element) -> bool,
    {
        (0..self.cards.len()).find(|&i| self.card(i).is_some_and(&pred))
    }

    pub fn cards_with_class(&self, class: &str) -> Vec<CardIndex> {
        (0..self.cards.len())
            .filter(|&i| self.card(i).is_some_and(|el| el.has_class(class)))
            .collect()
    }

    /// Element with `id` anywhere in the page
    pub fn by_id(&self, id: &str) -> Option<&Element> {
        let path = self.root.find_first(|el| el.attr("id") == Some(id))?;
        self.root.get(&path)
    }

    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        let path = self.root.find_first(|el| el.attr("id") == Some(id))?;
        self.root.get_mut(&path)
    }

    /// Element with `id` inside one card
    pub fn in_card_by_id_mut(&mut self, card: CardIndex, id: &str) -> Option<&mut Element> {
        let el = self.card_mut(card)?;
        let path = el.find_first(|e| e.attr("id") == Some(id))?;
        el.get_mut(&path)
    }
}

/// Paths of `.card` elements; cards are not looked for inside cards
fn card_paths(root: &Element) -> Vec<NodePath> {
    let mut found = Vec::new();
    let mut path = Vec::new();
    collect_cards(root, &mut path, &mut found);
    found
}

fn collect_cards(el: &Element, path: &mut NodePath, found: &mut Vec<NodePath>) {
    for (idx, child) in el.children.iter().enumerate() {
        if let Node::Element(inner) = child {
            path.push(idx);
            if inner.has_class("card") {
                found.push(path.clone());
            } else {
                collect_cards(inner, path, found);
            }
            path.pop();
        }
    }
}

fn card_title(card: &Element) -> String {
    card.find_by_tag("h3")
        .map(|h| h.text_content().trim().to_string())
        .unwrap_or_default()
}

fn scan_controls(card: &Element) -> Vec<Control> {
    let mut controls = Vec::new();
    let mut path = Vec::new();
    collect_controls(card, &mut path, &mut controls);
    controls
}

/// A control's own descendants are never controls themselves
fn collect_controls(el: &Element, path: &mut NodePath, out: &mut Vec<Control>) {
    for (idx, child) in el.children.iter().enumerate() {
        if let Node::Element(inner) = child {
            path.push(idx);
            match classify(inner) {
                Some(kind) => out.push(Control {
                    path: path.clone(),
                    kind,
                }),
                None => collect_controls(inner, path, out),
            }
            path.pop();
        }
    }
}
