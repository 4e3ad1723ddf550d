//! Code modal state
//!
//! The modal shows the markup, stylesheet and script of one card. Opening it
//! works on a detached copy of the card, so the page itself is never edited.

use crate::catalog;
use crate::dom::{self, Element};
use crate::model::timer::TimerEvent;
use crate::services::clipboard::{Clipboard, ClipboardError};
use crate::services::scheduler::{Scheduler, TimerId};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

const HIGHLIGHT_DELAY: Duration = Duration::from_millis(100);
const COPIED_DURATION: Duration = Duration::from_millis(2000);

/// Matches a language class left on a pane by an earlier open
static LANGUAGE_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"language-\w+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    /// Visible, highlighter pass still pending
    Opening,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CodeTab {
    #[default]
    Html,
    Css,
    Js,
}

impl CodeTab {
    pub fn all() -> [CodeTab; 3] {
        [CodeTab::Html, CodeTab::Css, CodeTab::Js]
    }

    pub fn index(&self) -> usize {
        match self {
            CodeTab::Html => 0,
            CodeTab::Css => 1,
            CodeTab::Js => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CodeTab::Html => "HTML",
            CodeTab::Css => "CSS",
            CodeTab::Js => "JavaScript",
        }
    }

    pub fn language(&self) -> &'static str {
        match self {
            CodeTab::Html => "html",
            CodeTab::Css => "css",
            CodeTab::Js => "javascript",
        }
    }

    pub fn next(&self) -> CodeTab {
        match self {
            CodeTab::Html => CodeTab::Css,
            CodeTab::Css => CodeTab::Js,
            CodeTab::Js => CodeTab::Html,
        }
    }

    pub fn previous(&self) -> CodeTab {
        match self {
            CodeTab::Html => CodeTab::Js,
            CodeTab::Css => CodeTab::Html,
            CodeTab::Js => CodeTab::Css,
        }
    }
}

/// Markup, stylesheet and script generated for one open
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snippet {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl Snippet {
    /// Build the snippet for `card` without touching it
    pub fn generate(card: &Element, key: &str) -> Self {
        let mut copy = card.clone();
        if let Some(path) = copy.find_by_class("code-view-btn") {
            copy.remove_at(&path);
        }
        copy.remove_attr("data-card-type");

        Self {
            html: dom::format(&copy),
            css: catalog::css_for(key),
            js: catalog::js_for(key),
        }
    }

    pub fn pane(&self, tab: CodeTab) -> &str {
        match tab {
            CodeTab::Html => &self.html,
            CodeTab::Css => &self.css,
            CodeTab::Js => &self.js,
        }
    }
}

/// Which modal control has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalFocus {
    Tab(CodeTab),
    Copy,
    Close,
}

impl Default for ModalFocus {
    fn default() -> Self {
        ModalFocus::Tab(CodeTab::Html)
    }
}

/// `<Key> Card Code` with the first character upper-cased
pub fn modal_title(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("{}{} Card Code", first.to_uppercase(), chars.as_str()),
        None => " Card Code".to_string(),
    }
}

/// Replace any language class on a pane with `language`
pub fn reset_language_class(class: &str, language: &str) -> String {
    let stripped = LANGUAGE_CLASS.replace(class, "");
    let base = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if base.is_empty() {
        format!("language-{}", language)
    } else {
        format!("{} language-{}", base, language)
    }
}

#[derive(Debug, Default)]
pub struct CodeModal {
    pub state: ModalState,
    /// Active tab; kept across close and open
    pub tab: CodeTab,
    pub focus: ModalFocus,
    pub title: String,
    pub snippet: Snippet,
    pane_classes: [String; 3],
    scroll: [u16; 3],
    /// Bumped on every open; the highlighter pass only applies to its own open
    generation: u64,
    highlight_timer: Option<TimerId>,
    copied: Option<(CodeTab, u64)>,
    next_copy_token: u64,
}

impl CodeModal {
    pub fn new() -> Self {
        Self {
            pane_classes: ["code-html".into(), "code-css".into(), "code-js".into()],
            ..Default::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn is_highlighted(&self) -> bool {
        self.state == ModalState::Open
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Open on `card`; an open modal has its content replaced
    pub fn open(&mut self, scheduler: &mut Scheduler<TimerEvent>, card: &Element, key: &str) {
        if key.is_empty() {
            return;
        }
        self.title = modal_title(key);
        self.snippet = Snippet::generate(card, key);
        for tab in CodeTab::all() {
            let class = &mut self.pane_classes[tab.index()];
            *class = reset_language_class(class, tab.language());
        }
        self.scroll = [0; 3];
        self.state = ModalState::Opening;

        self.generation += 1;
        if let Some(timer) = self.highlight_timer.take() {
            scheduler.cancel(timer);
        }
        self.highlight_timer =
            Some(scheduler.schedule(HIGHLIGHT_DELAY, TimerEvent::Highlight(self.generation)));
        self.focus = ModalFocus::Tab(CodeTab::Html);
        tracing::info!(key, "code modal opened");
    }

    pub fn close(&mut self) {
        if self.state != ModalState::Closed {
            tracing::debug!("code modal closed");
        }
        self.state = ModalState::Closed;
    }

    pub fn switch_tab(&mut self, tab: CodeTab) {
        self.tab = tab;
    }

    pub fn pane_text(&self, tab: CodeTab) -> &str {
        self.snippet.pane(tab)
    }

    pub fn pane_class(&self, tab: CodeTab) -> &str {
        &self.pane_classes[tab.index()]
    }

    pub fn scroll(&self, tab: CodeTab) -> u16 {
        self.scroll[tab.index()]
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let lines = self.pane_text(self.tab).lines().count();
        let last = u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX);
        let slot = &mut self.scroll[self.tab.index()];
        let next = (i64::from(*slot) + i64::from(delta)).clamp(0, i64::from(last));
        *slot = u16::try_from(next).unwrap_or(last);
    }

    /// Label of the copy control for `tab`
    pub fn copy_label(&self, tab: CodeTab) -> &'static str {
        match self.copied {
            Some((copied_tab, _)) if copied_tab == tab => "Copied!",
            _ => "Copy",
        }
    }

    /// Copy the active pane
    pub fn copy(
        &mut self,
        scheduler: &mut Scheduler<TimerEvent>,
        clipboard: &mut dyn Clipboard,
    ) -> Result<(), ClipboardError> {
        let tab = self.tab;
        clipboard.write_text(self.snippet.pane(tab))?;
        self.next_copy_token += 1;
        let token = self.next_copy_token;
        self.copied = Some((tab, token));
        scheduler.schedule(COPIED_DURATION, TimerEvent::CopyRevert(token));
        Ok(())
    }

    /// Move focus to the next control in tab order
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            ModalFocus::Tab(CodeTab::Html) => ModalFocus::Tab(CodeTab::Css),
            ModalFocus::Tab(CodeTab::Css) => ModalFocus::Tab(CodeTab::Js),
            ModalFocus::Tab(CodeTab::Js) => ModalFocus::Copy,
            ModalFocus::Copy => ModalFocus::Close,
            ModalFocus::Close => ModalFocus::Tab(CodeTab::Html),
        };
    }

    pub fn focused_tab(&self) -> Option<CodeTab> {
        match self.focus {
            ModalFocus::Tab(tab) => Some(tab),
            _ => None,
        }
    }

    /// Apply a modal timer; returns false for events that are not modal events
    pub fn handle(&mut self, event: &TimerEvent) -> bool {
        match event {
            TimerEvent::Highlight(generation) => {
                if *generation == self.generation {
                    self.highlight_timer = None;
                    if self.state == ModalState::Opening {
                        self.state = ModalState::Open;
                    }
                }
            }
            TimerEvent::CopyRevert(token) => {
                if self.copied.is_some_and(|(_, t)| t == *token) {
                    self.copied = None;
                }
            }
            _ => return false,
        }
        true
    }
}
