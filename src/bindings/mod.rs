//! Interaction bindings
//!
//! [`attach`] wires the configured widget bindings to a parsed [`Page`] and
//! returns the [`Bindings`] handle that owns it. The terminal front end feeds
//! pointer, keyboard and window events in through the handle's methods and
//! drives time with [`Bindings::tick`]. Every delayed change runs as a
//! scheduled [`TimerEvent`].
//!
//! Each binding lives in its own submodule as an `impl Bindings` block and
//! touches only its slice of the page. The toast, the tooltip and the code
//! modal are shared.

mod buttons;
mod chat;
mod effects;
mod entrance;
mod forms;
mod repo;
mod tooltips;

use crate::model::chat::ChatResponses;
use crate::model::code_view::{CodeModal, CodeTab, ModalFocus};
use crate::model::page::{ControlKind, Page};
use crate::model::repo::RepoPanelState;
use crate::model::theme::Theme;
use crate::model::timer::{CardIndex, ControlIndex, TimerEvent};
use crate::model::toast::{Placement, Toast, Toaster};
use crate::model::tooltip::{Tooltip, TooltipController, TooltipMetrics};
use crate::model::widgets::WidgetSet;
use crate::services::clipboard::Clipboard;
use crate::services::github::RepoApi;
use crate::services::scheduler::{Clock, Scheduler};
use crate::services::storage::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

pub use chat::{chat_lines, ChatLine, Sender};
pub use forms::field_value;
pub use tooltips::TOOLTIP_TRIGGER_CLASS;

const THEME_TRANSITION: Duration = Duration::from_millis(300);

/// Collaborators handed to [`attach`]
pub struct BindingContext {
    pub clipboard: Box<dyn Clipboard>,
    pub store: Box<dyn KeyValueStore>,
    /// `None` runs the repository panel on its fallback data
    pub repo_api: Option<Arc<dyn RepoApi>>,
    pub clock: Box<dyn Clock>,
    pub toast_duration: Duration,
    /// Screen size in cells
    pub viewport: (u16, u16),
    pub responses: ChatResponses,
}

/// Handle on the attached bindings and the page they own
pub struct Bindings {
    page: Page,
    widgets: WidgetSet,
    scheduler: Scheduler<TimerEvent>,
    clipboard: Box<dyn Clipboard>,
    store: Box<dyn KeyValueStore>,
    toast_duration: Duration,

    toaster: Toaster,
    tooltips: TooltipController,
    code: CodeModal,

    theme: Theme,
    theme_transition: bool,
    theme_pulse: bool,

    hovered: Option<CardIndex>,
    focus: Option<(CardIndex, ControlIndex)>,

    buttons: buttons::ButtonState,
    entrance: entrance::EntranceState,
    forms: forms::FormsState,
    chat: Option<chat::ChatState>,
    repo: Option<repo::RepoState>,
}

/// Wire every binding switched on in `widgets` to `page`
pub fn attach(page: Page, widgets: WidgetSet, ctx: BindingContext) -> Bindings {
    let viewport = (ctx.viewport.0 as i32, ctx.viewport.1 as i32);
    let mut bindings = Bindings {
        page,
        widgets,
        scheduler: Scheduler::new(ctx.clock),
        clipboard: ctx.clipboard,
        store: ctx.store,
        toast_duration: ctx.toast_duration,
        toaster: Toaster::new(),
        tooltips: TooltipController::new(TooltipMetrics::CELLS, viewport),
        code: CodeModal::new(),
        theme: Theme::Light,
        theme_transition: false,
        theme_pulse: false,
        hovered: None,
        focus: None,
        buttons: buttons::ButtonState::default(),
        entrance: entrance::EntranceState::default(),
        forms: forms::FormsState::default(),
        chat: None,
        repo: None,
    };

    if widgets.theme_toggle {
        let saved = Theme::load(bindings.store.as_ref());
        bindings.set_theme(saved);
    }
    if widgets.scroll_reveal {
        bindings.attach_entrance();
    }
    if widgets.tooltips {
        bindings.attach_tooltips();
    }
    if widgets.chat {
        bindings.attach_chat(ctx.responses);
    }
    if widgets.repo_panel {
        bindings.attach_repo(ctx.repo_api);
    }

    tracing::info!(
        cards = bindings.page.cards.len(),
        theme = %bindings.theme,
        "bindings attached"
    );
    bindings
}

impl Bindings {
    // ═══════════════════════════════════════════════════════════════════════════
    // Read access for rendering
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn widgets(&self) -> &WidgetSet {
        &self.widgets
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toaster.current()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltips.on_screen()
    }

    pub fn code_modal(&self) -> &CodeModal {
        &self.code
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_theme_transitioning(&self) -> bool {
        self.theme_transition
    }

    /// Theme toggle is being pointed out by the assistant
    pub fn is_theme_pulsing(&self) -> bool {
        self.theme_pulse
    }

    pub fn hovered_card(&self) -> Option<CardIndex> {
        self.hovered
    }

    pub fn focused_control(&self) -> Option<(CardIndex, ControlIndex)> {
        self.focus
    }

    pub fn repo_panel(&self) -> Option<&RepoPanelState> {
        self.repo.as_ref().map(|r| &r.panel)
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// The focused control takes typed characters
    pub fn is_typing(&self) -> bool {
        self.focus
            .and_then(|(card, control)| self.page.control_kind(card, control))
            .is_some_and(|kind| kind.is_text_entry())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Shared helpers
    // ═══════════════════════════════════════════════════════════════════════════

    fn show_toast(&mut self, message: &str) {
        let duration = self.toast_duration;
        self.toaster
            .show(&mut self.scheduler, message, duration, Placement::Bottom);
    }

    fn show_toast_for(&mut self, message: &str, duration: Duration, placement: Placement) {
        self.toaster
            .show(&mut self.scheduler, message, duration, placement);
    }

    fn is_disabled(&self, card: CardIndex, control: ControlIndex) -> bool {
        self.page
            .control(card, control)
            .is_some_and(|el| el.has_attr("disabled"))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Pointer and keyboard input
    // ═══════════════════════════════════════════════════════════════════════════

    /// A click on one of a card's controls
    pub fn click_control(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(kind) = self.page.control_kind(card, control) else {
            return;
        };
        if self.is_disabled(card, control) {
            return;
        }
        tracing::debug!(card, control, ?kind, "control clicked");

        match kind {
            ControlKind::CodeView => {
                if self.widgets.tooltips {
                    self.tooltips.hide(&mut self.scheduler);
                }
                if self.widgets.code_modal {
                    self.open_code(card);
                }
            }
            ControlKind::Primary
            | ControlKind::IconButton
            | ControlKind::Wishlist
            | ControlKind::SocialAction
            | ControlKind::TextButton => {
                if self.widgets.buttons {
                    self.click_button(card, control, kind);
                }
            }
            ControlKind::RevealClose => {
                if self.widgets.reveal {
                    self.close_reveal(card);
                }
            }
            ControlKind::SocialSignIn => {
                if self.widgets.social_auth {
                    self.click_social_sign_in(card, control);
                }
            }
            ControlKind::Field | ControlKind::SettingToggle | ControlKind::Submit => {
                if self.widgets.forms {
                    self.click_form_control(card, control, kind);
                }
            }
            ControlKind::ChatInput => self.focus_control(card, control),
            ControlKind::Voice | ControlKind::Quick | ControlKind::ChatSend => {
                if self.widgets.chat {
                    self.click_chat_control(card, control, kind);
                }
            }
            ControlKind::RepoStar | ControlKind::RepoWatch | ControlKind::RepoRefresh => {
                if self.widgets.repo_panel {
                    self.click_repo_control(kind);
                }
            }
        }

        // Reveal listens on the whole card, so control clicks bubble to it
        // except the close control, which stops propagation
        if kind != ControlKind::RevealClose && kind != ControlKind::CodeView {
            self.click_card(card);
        }
    }

    /// A click on a card outside any control
    pub fn click_card(&mut self, card: CardIndex) {
        if self.widgets.reveal {
            self.reveal(card);
        }
    }

    /// Enter or Space on a focused card
    pub fn activate_card(&mut self, card: CardIndex) {
        if !self.widgets.keyboard {
            return;
        }
        let Some(el) = self.page.card(card) else {
            return;
        };
        if el.has_class("ai-assistant-card") {
            return;
        }
        let primary = self.page.cards[card]
            .controls
            .iter()
            .position(|c| {
                el.get(&c.path)
                    .is_some_and(|control| control.has_class("btn-primary"))
            });
        if let Some(control) = primary {
            self.click_control(card, control);
        }
    }

    /// Move keyboard focus to a control
    pub fn focus_control(&mut self, card: CardIndex, control: ControlIndex) {
        if self.focus == Some((card, control)) {
            return;
        }
        self.blur_control();
        if self.page.control(card, control).is_none() {
            return;
        }
        self.focus = Some((card, control));
        if self.widgets.forms && self.page.control_kind(card, control) == Some(ControlKind::Field)
        {
            self.focus_field(card, control);
        }
    }

    pub fn blur_control(&mut self) {
        let Some((card, control)) = self.focus.take() else {
            return;
        };
        match self.page.control_kind(card, control) {
            Some(ControlKind::Field) if self.widgets.forms => self.blur_field(card, control),
            Some(ControlKind::CodeView) if self.widgets.tooltips => {
                self.tooltips.hide(&mut self.scheduler)
            }
            _ => {}
        }
    }

    pub fn input_char(&mut self, ch: char) {
        let Some((card, control)) = self.focus else {
            return;
        };
        match self.page.control_kind(card, control) {
            Some(ControlKind::Field) if self.widgets.forms => self.type_into_field(card, control, ch),
            Some(ControlKind::ChatInput) if self.widgets.chat => {
                self.type_into_chat(card, control, ch)
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        let Some((card, control)) = self.focus else {
            return;
        };
        match self.page.control_kind(card, control) {
            Some(ControlKind::Field) if self.widgets.forms => self.erase_in_field(card, control),
            Some(ControlKind::ChatInput) if self.widgets.chat => {
                self.erase_in_chat(card, control)
            }
            _ => {}
        }
    }

    /// Enter while a control has focus
    pub fn enter(&mut self) {
        let Some((card, control)) = self.focus else {
            return;
        };
        match self.page.control_kind(card, control) {
            Some(ControlKind::Field) if self.widgets.forms => self.enter_in_field(card, control),
            Some(ControlKind::ChatInput) if self.widgets.chat => self.send_chat(card),
            Some(_) => self.click_control(card, control),
            None => {}
        }
    }

    /// Escape: close the code modal first, then revealed cards
    pub fn escape(&mut self) -> bool {
        if self.code.is_visible() {
            self.code.close();
            return true;
        }
        if self.widgets.reveal {
            return self.close_all_reveals();
        }
        false
    }

    pub fn scroll(&mut self) {
        if self.widgets.tooltips {
            self.tooltips.hide(&mut self.scheduler);
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.tooltips.set_viewport((width as i32, height as i32));
        if self.widgets.tooltips {
            self.tooltips.hide_now();
        }
    }

    /// The terminal lost focus
    pub fn visibility_lost(&mut self) {
        if self.widgets.tooltips {
            self.tooltips.hide_now();
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Theme
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn toggle_theme(&mut self) {
        if !self.widgets.theme_toggle {
            return;
        }
        let next = self.theme.toggled();
        self.set_theme(next);
        if let Err(e) = next.save(self.store.as_mut()) {
            tracing::warn!(error = %e, "could not persist theme");
        }
        tracing::info!(theme = %next, "theme switched");
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.page.root.set_attr("data-theme", theme.as_str());
        if let Some(toggle) = self.page.by_id_mut("darkModeToggle") {
            if theme == Theme::Dark {
                toggle.set_attr("checked", "");
            } else {
                toggle.remove_attr("checked");
            }
        }
        self.theme_transition = true;
        self.scheduler
            .schedule(THEME_TRANSITION, TimerEvent::ThemeTransitionEnd);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Code modal
    // ═══════════════════════════════════════════════════════════════════════════

    /// Open the code modal on a card; cards without a keyed trigger are ignored
    pub fn open_code(&mut self, card: CardIndex) {
        let key = self.page.card(card).and_then(|el| {
            el.find_by_class("code-view-btn")
                .and_then(|p| el.get(&p))
                .and_then(|trigger| trigger.attr("data-card"))
                .map(str::to_string)
        });
        let (Some(key), Some(el)) = (key, self.page.card(card)) else {
            return;
        };
        let el = el.clone();
        self.code.open(&mut self.scheduler, &el, &key);
    }

    pub fn code_switch_tab(&mut self, tab: CodeTab) {
        self.code.switch_tab(tab);
    }

    pub fn code_next_tab(&mut self) {
        let next = self.code.tab.next();
        self.code.switch_tab(next);
    }

    pub fn code_previous_tab(&mut self) {
        let previous = self.code.tab.previous();
        self.code.switch_tab(previous);
    }

    pub fn code_scroll(&mut self, delta: i32) {
        self.code.scroll_by(delta);
    }

    pub fn code_close(&mut self) {
        self.code.close();
    }

    pub fn code_focus_next(&mut self) {
        self.code.focus_next();
    }

    /// Enter on the focused modal control
    pub fn code_activate_focused(&mut self) {
        match self.code.focus {
            ModalFocus::Tab(tab) => self.code.switch_tab(tab),
            ModalFocus::Copy => self.code_copy(),
            ModalFocus::Close => self.code.close(),
        }
    }

    pub fn code_copy(&mut self) {
        if let Err(e) = self.code.copy(&mut self.scheduler, self.clipboard.as_mut()) {
            tracing::error!(error = %e, "failed to copy code");
            self.show_toast("Failed to copy code");
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Time
    // ═══════════════════════════════════════════════════════════════════════════

    /// Run every timer that has come due and collect background results
    pub fn tick(&mut self) {
        if self.widgets.repo_panel {
            self.poll_repo();
        }
        while let Some(event) = self.scheduler.pop_due() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: TimerEvent) {
        if self.toaster.handle(&mut self.scheduler, &event)
            || self.tooltips.handle(&mut self.scheduler, &event)
            || self.code.handle(&event)
        {
            return;
        }

        match event {
            TimerEvent::ThemeTransitionEnd => self.theme_transition = false,
            TimerEvent::CartAdded { card, control } => self.cart_added(card, control),
            TimerEvent::CartReset { card, control } => self.cart_reset(card, control),
            TimerEvent::SocialPressEnd { card, control } => self.social_press_end(card, control),
            TimerEvent::TiltSettled { card } => self.tilt_settled(card),
            TimerEvent::TouchRelease { card } => self.touch_release(card),
            TimerEvent::CardEntered { card } => self.card_entered(card),
            TimerEvent::FormAutosave { card } => self.autosave(card),
            TimerEvent::FormSubmitted { card } => self.form_submitted(card),
            TimerEvent::ChatWelcome { card } => self.chat_welcome(card),
            TimerEvent::ChatRespond { card, message } => self.chat_respond(card, message),
            TimerEvent::ChatReply { card, message } => self.chat_reply(card, &message),
            TimerEvent::VoiceTimeout { card } => self.voice_timeout(card),
            TimerEvent::AssistantHighlightEnd { card } => self.assistant_highlight_end(card),
            TimerEvent::AssistantOpenCode { card } => self.open_code(card),
            TimerEvent::AssistantPulseEnd => self.theme_pulse = false,
            TimerEvent::RepoCounterFrame => self.repo_counter_frame(),
            TimerEvent::RepoBarsGrow => self.repo_bars_grow(),
            TimerEvent::RepoBannerExpire(token) => self.repo_banner_expire(token),
            TimerEvent::ToastShow(_)
            | TimerEvent::ToastFade(_)
            | TimerEvent::ToastRemove(_)
            | TimerEvent::Highlight(_)
            | TimerEvent::CopyRevert(_)
            | TimerEvent::TooltipPosition(_)
            | TimerEvent::TooltipReveal(_)
            | TimerEvent::TooltipRemove(_) => {}
        }
    }

    /// Cancel every pending timer and drop the repository loader
    pub fn teardown(&mut self) {
        self.scheduler.clear();
        if let Some(repo) = self.repo.as_mut() {
            repo.loader = None;
        }
        self.toaster.clear();
        self.tooltips.hide_now();
        tracing::debug!("bindings torn down");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::clipboard::MemoryClipboard;
    use crate::services::scheduler::ManualClock;
    use crate::services::storage::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Bindings over test markup with shared fakes the test can inspect
    pub(crate) struct Harness {
        pub bindings: Bindings,
        pub clock: ManualClock,
        pub clipboard: Rc<RefCell<MemoryClipboard>>,
        pub store: Rc<RefCell<MemoryStore>>,
    }

    impl Harness {
        pub fn new(markup: &str) -> Self {
            Self::with(markup, WidgetSet::all(), None)
        }

        pub fn with(markup: &str, widgets: WidgetSet, api: Option<Arc<dyn RepoApi>>) -> Self {
            Self::with_store(markup, widgets, api, MemoryStore::new())
        }

        pub fn with_store(
            markup: &str,
            widgets: WidgetSet,
            api: Option<Arc<dyn RepoApi>>,
            store: MemoryStore,
        ) -> Self {
            let clock = ManualClock::new();
            let clipboard = Rc::new(RefCell::new(MemoryClipboard::default()));
            let store = Rc::new(RefCell::new(store));
            let ctx = BindingContext {
                clipboard: Box::new(Rc::clone(&clipboard)),
                store: Box::new(Rc::clone(&store)),
                repo_api: api,
                clock: Box::new(clock.clone()),
                toast_duration: Duration::from_millis(3000),
                viewport: (120, 40),
                responses: ChatResponses::bundled().unwrap(),
            };
            let page = Page::parse(markup).unwrap();
            Self {
                bindings: attach(page, widgets, ctx),
                clock,
                clipboard,
                store,
            }
        }

        pub fn advance(&mut self, ms: u64) {
            self.clock.advance_ms(ms);
            self.bindings.tick();
        }

        pub fn toast_text(&self) -> Option<String> {
            self.bindings.toast().map(|t| t.message.clone())
        }

        /// Index of the first control of `kind` in `card`
        pub fn control(&self, card: CardIndex, kind: ControlKind) -> ControlIndex {
            self.bindings.page().controls_of(card, kind)[0]
        }

        pub fn control_text(&self, card: CardIndex, control: ControlIndex) -> String {
            self.bindings
                .page()
                .control(card, control)
                .map(|el| el.text_content().trim().to_string())
                .unwrap_or_default()
        }
    }

    const CARDS: &str = r#"<main>
      <header><label class="theme-switch"><input type="checkbox" id="darkModeToggle"></label></header>
      <div class="card card-flip" data-card-type="flip">
        <button class="code-view-btn" data-card="flip" title="View Code"><span class="material-icons">code</span></button>
        <h3>Flip Card</h3>
        <span class="nested-probe">inside</span>
      </div>
      <div class="card" data-card-type="basic">
        <button class="code-view-btn" data-card="basic" title="View Code"><span class="material-icons">code</span></button>
        <h3>Basic Card</h3>
        <button class="btn-primary">Continue</button>
      </div>
      <div class="card card-reveal" data-card-type="reveal">
        <h3>Reveal</h3>
        <div class="reveal-content"><button class="reveal-close"><span class="material-icons">close</span></button></div>
      </div>
      <div class="card"><h3>Untyped</h3></div>
    </main>"#;

    #[test]
    fn test_opening_a_then_b_leaves_no_trace_of_a() {
        let mut h = Harness::new(CARDS);
        let trigger_a = h.control(0, ControlKind::CodeView);
        let trigger_b = h.control(1, ControlKind::CodeView);

        h.bindings.click_control(0, trigger_a);
        assert_eq!(h.bindings.code_modal().title, "Flip Card Code");
        h.bindings.code_switch_tab(CodeTab::Css);

        h.bindings.click_control(1, trigger_b);
        let modal = h.bindings.code_modal();
        assert_eq!(modal.title, "Basic Card Code");
        assert!(!modal.snippet.html.contains("Flip"));
        assert!(!modal.snippet.html.contains("code-view-btn"));
        assert_eq!(modal.snippet.css, crate::catalog::css_for("basic"));
        assert_eq!(modal.snippet.js, crate::catalog::js_for("basic"));
        assert_eq!(modal.tab, CodeTab::Css);
    }

    #[test]
    fn test_modal_never_edits_live_card() {
        let mut h = Harness::new(CARDS);
        let before = h.bindings.page().card(0).cloned();
        h.bindings.open_code(0);
        assert_eq!(h.bindings.page().card(0).cloned(), before);
        assert!(h.bindings.code_modal().is_visible());
    }

    #[test]
    fn test_card_without_key_does_not_open() {
        let mut h = Harness::new(CARDS);
        h.bindings.open_code(3);
        assert!(!h.bindings.code_modal().is_visible());
    }

    #[test]
    fn test_card_type_alone_does_not_open() {
        let mut h = Harness::new(
            r#"<main>
              <div class="card card-flip" data-card-type="flip"><h3>No Trigger</h3></div>
              <div class="card" data-card-type="glow">
                <button class="code-view-btn" title="View Code"></button>
                <h3>Keyless Trigger</h3>
              </div>
            </main>"#,
        );
        h.bindings.open_code(0);
        assert!(!h.bindings.code_modal().is_visible());
        h.bindings.code_close();
        h.advance(1000);
        h.bindings.open_code(1);
        assert!(!h.bindings.code_modal().is_visible());
    }

    #[test]
    fn test_escape_closes_modal_before_reveal() {
        let mut h = Harness::new(CARDS);
        h.bindings.click_card(2);
        h.bindings.open_code(1);
        assert!(h.bindings.escape());
        assert!(!h.bindings.code_modal().is_visible());
        assert!(h.bindings.page().card(2).unwrap().has_class("revealed"));
        assert!(h.bindings.escape());
        assert!(!h.bindings.page().card(2).unwrap().has_class("revealed"));
        assert!(!h.bindings.escape());
    }

    #[test]
    fn test_clipboard_rejection_toasts_and_keeps_label() {
        let mut h = Harness::new(CARDS);
        h.clipboard.borrow_mut().fail_with = Some("denied".into());
        h.bindings.open_code(0);
        h.bindings.code_copy();
        assert_eq!(h.toast_text().as_deref(), Some("Failed to copy code"));
        assert_eq!(h.bindings.code_modal().copy_label(CodeTab::Html), "Copy");
    }

    #[test]
    fn test_copy_writes_active_pane() {
        let mut h = Harness::new(CARDS);
        h.bindings.open_code(0);
        h.bindings.code_switch_tab(CodeTab::Js);
        h.bindings.code_copy();
        assert_eq!(
            h.clipboard.borrow().contents.as_deref(),
            Some(crate::catalog::js_for("flip").as_str())
        );
        assert_eq!(h.bindings.code_modal().copy_label(CodeTab::Js), "Copied!");
        h.advance(2000);
        assert_eq!(h.bindings.code_modal().copy_label(CodeTab::Js), "Copy");
    }

    #[test]
    fn test_theme_defaults_light_and_persists() {
        let mut h = Harness::new(CARDS);
        assert_eq!(h.bindings.theme(), Theme::Light);
        assert!(h.bindings.is_theme_transitioning());
        h.advance(300);
        assert!(!h.bindings.is_theme_transitioning());

        h.bindings.toggle_theme();
        assert_eq!(h.bindings.theme(), Theme::Dark);
        assert_eq!(h.store.borrow().get("theme").as_deref(), Some("dark"));
        assert_eq!(h.bindings.page().root.attr("data-theme"), Some("dark"));
        assert!(h.bindings.page().by_id("darkModeToggle").unwrap().has_attr("checked"));
    }

    #[test]
    fn test_saved_theme_restored_at_attach() {
        let mut store = MemoryStore::new();
        store.set("theme", "dark").unwrap();
        let h = Harness::with_store(CARDS, WidgetSet::all(), None, store);
        assert_eq!(h.bindings.theme(), Theme::Dark);
    }

    #[test]
    fn test_disabled_bindings_do_nothing() {
        let mut h = Harness::with(CARDS, WidgetSet::none(), None);
        let primary = h.control(1, ControlKind::Primary);
        h.bindings.click_control(1, primary);
        h.bindings.click_card(2);
        h.bindings.open_code(0);
        assert_eq!(h.toast_text(), None);
        assert!(!h.bindings.page().card(2).unwrap().has_class("revealed"));
        // Opening directly still works; only the trigger binding is switched off
        assert!(h.bindings.code_modal().is_visible());
        h.bindings.toggle_theme();
        assert_eq!(h.bindings.theme(), Theme::Light);
    }

    #[test]
    fn test_keyboard_activation_clicks_primary() {
        let mut h = Harness::new(CARDS);
        h.bindings.activate_card(1);
        assert_eq!(
            h.toast_text().as_deref(),
            Some("Button clicked! Ready for your custom action.")
        );
    }

    #[test]
    fn test_teardown_cancels_timers() {
        let mut h = Harness::new(CARDS);
        h.bindings.activate_card(1);
        assert!(h.bindings.pending_timers() > 0);
        h.bindings.teardown();
        assert_eq!(h.bindings.pending_timers(), 0);
        assert_eq!(h.toast_text(), None);
    }

    #[test]
    fn test_bundled_page_attaches() {
        let page = Page::parse(crate::SHOWCASE_PAGE).unwrap();
        assert!(page.cards.len() >= 20);
        for card in crate::catalog::CardType::all() {
            assert!(
                page.cards.iter().any(|c| c.key.as_deref() == Some(card.key())),
                "no {} card",
                card
            );
        }
    }
}
