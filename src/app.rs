//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! Page behaviour lives in the [`Bindings`]; App maps terminal input onto
//! them and decides which layer is on top.

use crate::action::Action;
use crate::bindings::{self, BindingContext, Bindings};
use crate::component::Component;
use crate::components::{
    draw_showcase, draw_toast, draw_tooltip, CodeModalView, HelpDialog, Hit, ModalHit, Palette,
    QuitDialog, ShowcaseComponent, ShowcaseRenderContext,
};
use crate::config::Config;
use crate::model::chat::ChatResponses;
use crate::model::modal::{Modal, ModalStack};
use crate::model::page::{ControlKind, Page};
use crate::model::timer::{CardIndex, ControlIndex};
use crate::model::tooltip::Bounds;
use crate::services::{
    HttpRepoApi, JsonFileStore, KeyValueStore, MemoryStore, RepoApi, SystemClipboard, SystemClock,
};
use crate::SHOWCASE_PAGE;
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, Frame};
use std::sync::Arc;

/// Approximate pixel size of a terminal cell, for pointer effects tuned in pixels
const CELL_WIDTH_PX: f64 = 8.0;
const CELL_HEIGHT_PX: f64 = 16.0;

fn bounds_of(rect: Rect) -> Bounds {
    Bounds::new(
        rect.x as i32,
        rect.y as i32,
        rect.width as i32,
        rect.height as i32,
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Setup
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse the configured page, or the bundled showcase
pub fn load_page(config: &Config) -> Result<Page> {
    let markup = match &config.page_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read page {}", path))?,
        None => SHOWCASE_PAGE.to_string(),
    };
    Page::parse(&markup).context("Failed to parse showcase markup")
}

fn open_store() -> Box<dyn KeyValueStore> {
    match Config::store_path().map(JsonFileStore::open) {
        Some(Ok(store)) => Box::new(store),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "store unreadable, settings will not persist");
            Box::new(MemoryStore::new())
        }
        None => {
            tracing::warn!("no home directory, settings will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn repo_api(config: &Config) -> Option<Arc<dyn RepoApi>> {
    if config.offline {
        tracing::info!("offline mode, repository panel uses fallback data");
        return None;
    }
    match HttpRepoApi::new(
        &config.api_base,
        &config.repo_owner,
        &config.repo_name,
        config.api_timeout(),
    ) {
        Ok(api) => Some(Arc::new(api)),
        Err(e) => {
            tracing::warn!(error = %e, "repository client unavailable");
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    pub config: Config,

    /// Page and widget state
    pub bindings: Bindings,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Card a pointer press started on
    pressed: Option<CardIndex>,

    /// Tooltip trigger under the pointer
    hovered_trigger: Option<(CardIndex, ControlIndex)>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub showcase: ShowcaseComponent,
    pub code_view: CodeModalView,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create the app with real collaborators for a `viewport` sized terminal
    pub fn new(config: Config, viewport: (u16, u16)) -> Result<App> {
        let page = load_page(&config)?;
        let ctx = BindingContext {
            clipboard: Box::new(SystemClipboard::new()),
            store: open_store(),
            repo_api: repo_api(&config),
            clock: Box::new(SystemClock::new()),
            toast_duration: config.toast_duration(),
            viewport,
            responses: ChatResponses::bundled().context("Failed to load chat responses")?,
        };
        Ok(Self::with_context(config, page, ctx))
    }

    /// Create the app over an already parsed page
    pub fn with_context(config: Config, page: Page, ctx: BindingContext) -> App {
        let bindings = bindings::attach(page, config.widgets, ctx);
        App {
            config,
            bindings,
            modals: ModalStack::new(),
            should_quit: false,
            pressed: None,
            hovered_trigger: None,
            showcase: ShowcaseComponent::new(),
            code_view: CodeModalView::default(),
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog::default(),
        }
    }

    fn card_count(&self) -> usize {
        self.bindings.page().cards.len()
    }

    /// Tear the bindings down and stop the main loop
    fn quit(&mut self) {
        self.bindings.teardown();
        self.should_quit = true;
    }

    /// Drop keyboard focus if it belongs to a card other than the selected one
    fn selection_changed(&mut self) {
        if let Some((card, _)) = self.bindings.focused_control() {
            if card != self.showcase.selected {
                self.bindings.blur_control();
            }
        }
    }

    /// Move keyboard focus through the selected card's controls
    fn cycle_control(&mut self, forward: bool) {
        let card = self.showcase.selected;
        let count = self
            .bindings
            .page()
            .cards
            .get(card)
            .map(|c| c.controls.len())
            .unwrap_or(0);
        if count == 0 {
            return;
        }
        let current = self
            .bindings
            .focused_control()
            .filter(|(focused_card, _)| *focused_card == card)
            .map(|(_, control)| control);
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(c), true) => (c + 1) % count,
            (Some(c), false) => (c + count - 1) % count,
        };
        self.bindings.focus_control(card, next);

        // Keyboard focus on a trigger shows its tooltip like hovering does
        if self.bindings.page().control_kind(card, next) == Some(ControlKind::CodeView) {
            if let Some(rect) = self.showcase.control_rect(card, next) {
                self.bindings.tooltip_enter(card, next, bounds_of(rect));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pointer
    // ─────────────────────────────────────────────────────────────────────────

    fn hover_card(&mut self, target: Option<(CardIndex, Rect)>, column: u16, row: u16) {
        let previous = self.bindings.hovered_card();
        let next = target.map(|(card, _)| card);
        if previous != next {
            if let Some(card) = previous {
                self.bindings.pointer_leave(card);
            }
            if let Some(card) = next {
                self.bindings.pointer_enter(card);
            }
        }
        if let Some((card, rect)) = target {
            self.bindings.pointer_move(
                card,
                column.saturating_sub(rect.x) as f64 * CELL_WIDTH_PX,
                row.saturating_sub(rect.y) as f64 * CELL_HEIGHT_PX,
                rect.width as f64 * CELL_WIDTH_PX,
                rect.height as f64 * CELL_HEIGHT_PX,
            );
        }
    }

    fn leave_trigger(&mut self) {
        if self.hovered_trigger.take().is_some() {
            self.bindings.tooltip_leave();
        } else {
            self.bindings.pointer_off_triggers();
        }
    }

    fn pointer_moved(&mut self, column: u16, row: u16) {
        if !self.modals.is_empty() || self.bindings.code_modal().is_visible() {
            return;
        }
        match self.showcase.hit(column, row) {
            Hit::Control {
                card,
                control,
                card_rect,
            } => {
                self.hover_card(Some((card, card_rect)), column, row);
                let is_trigger =
                    self.bindings.page().control_kind(card, control) == Some(ControlKind::CodeView);
                if is_trigger {
                    if self.hovered_trigger != Some((card, control)) {
                        if let Some(rect) = self.showcase.control_rect(card, control) {
                            self.bindings.tooltip_enter(card, control, bounds_of(rect));
                        }
                        self.hovered_trigger = Some((card, control));
                    }
                } else {
                    self.leave_trigger();
                }
            }
            Hit::Card { card, card_rect } => {
                self.hover_card(Some((card, card_rect)), column, row);
                self.leave_trigger();
            }
            Hit::Outside => {
                self.hover_card(None, column, row);
                self.leave_trigger();
            }
        }
    }

    fn pointer_down(&mut self, column: u16, row: u16) {
        if !self.modals.is_empty() {
            return;
        }
        if self.bindings.code_modal().is_visible() {
            match self.code_view.hit(column, row) {
                ModalHit::Tab(tab) => self.bindings.code_switch_tab(tab),
                ModalHit::Copy => self.bindings.code_copy(),
                ModalHit::Close | ModalHit::Outside => self.bindings.code_close(),
                ModalHit::Inside => {}
            }
            return;
        }
        match self.showcase.hit(column, row) {
            Hit::Control { card, control, .. } => {
                self.showcase.selected = card;
                self.selection_changed();
                self.pressed = Some(card);
                self.bindings.press(card);
                self.bindings.focus_control(card, control);
                self.bindings.click_control(card, control);
            }
            Hit::Card { card, .. } => {
                self.showcase.selected = card;
                self.pressed = Some(card);
                self.bindings.press(card);
                self.bindings.blur_control();
                self.bindings.click_card(card);
            }
            Hit::Outside => self.bindings.blur_control(),
        }
    }

    fn pointer_up(&mut self) {
        if let Some(card) = self.pressed.take() {
            self.bindings.release(card);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help { .. } => self.help_dialog.handle_key_event(key),
        }
    }

    fn handle_typing_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::Escape),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Tab => Some(Action::NextControl),
            KeyCode::BackTab => Some(Action::PrevControl),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help { .. } => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::ForceQuit));
        }
        if let Some(modal) = self.modals.top().cloned() {
            self.handle_modal_key_event(&modal, key)
        } else if self.bindings.code_modal().is_visible() {
            self.code_view.handle_key_event(key)
        } else if self.bindings.is_typing() {
            self.handle_typing_key_event(key)
        } else {
            self.showcase.handle_key_event(key)
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let (column, row) = (mouse.column, mouse.row);
        let code_open = self.bindings.code_modal().is_visible();
        let action = match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                Some(Action::PointerMoved { column, row })
            }
            MouseEventKind::Down(MouseButton::Left) => Some(Action::PointerDown { column, row }),
            MouseEventKind::Up(MouseButton::Left) => Some(Action::PointerUp),
            MouseEventKind::ScrollDown if code_open => Some(Action::CodeScroll(3)),
            MouseEventKind::ScrollUp if code_open => Some(Action::CodeScroll(-3)),
            MouseEventKind::ScrollDown => Some(Action::ScrollGrid(1)),
            MouseEventKind::ScrollUp => Some(Action::ScrollGrid(-1)),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let total = self.card_count();
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.bindings.cards_in_view(&self.showcase.visible_cards());
                self.bindings.tick();
            }
            Action::Resize(w, h) => self.bindings.resize(w, h),
            Action::FocusLost => self.bindings.visibility_lost(),
            Action::ForceQuit => self.quit(),

            // ─────────────────────────────────────────────────────────────────
            // Card Navigation (delegate to ShowcaseComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextCard => {
                self.showcase.select_next(total);
                self.selection_changed();
            }
            Action::PrevCard => {
                self.showcase.select_previous(total);
                self.selection_changed();
            }
            Action::CardBelow => {
                self.showcase.select_below(total);
                self.selection_changed();
            }
            Action::CardAbove => {
                self.showcase.select_above();
                self.selection_changed();
            }
            Action::FirstCard => {
                self.showcase.select_first();
                self.selection_changed();
            }
            Action::LastCard => {
                self.showcase.select_last(total);
                self.selection_changed();
            }
            Action::ScrollGrid(delta) => {
                self.bindings.scroll();
                self.showcase.scroll_rows(delta, total);
                self.selection_changed();
            }
            Action::NextControl => self.cycle_control(true),
            Action::PrevControl => self.cycle_control(false),

            // ─────────────────────────────────────────────────────────────────
            // Card Interaction (delegate to Bindings)
            // ─────────────────────────────────────────────────────────────────
            Action::ActivateCard => {
                if self.bindings.focused_control().is_some() {
                    self.bindings.enter();
                } else {
                    self.bindings.activate_card(self.showcase.selected);
                }
            }
            Action::Submit => self.bindings.enter(),
            Action::Escape => {
                if self.bindings.focused_control().is_some() {
                    self.bindings.blur_control();
                } else {
                    self.bindings.escape();
                }
            }
            Action::Input(c) => self.bindings.input_char(c),
            Action::Backspace => self.bindings.backspace(),
            Action::ToggleTheme => self.bindings.toggle_theme(),
            Action::OpenCode => {
                self.bindings.tooltip_leave();
                self.bindings.open_code(self.showcase.selected);
            }

            // ─────────────────────────────────────────────────────────────────
            // Pointer
            // ─────────────────────────────────────────────────────────────────
            Action::PointerMoved { column, row } => self.pointer_moved(column, row),
            Action::PointerDown { column, row } => self.pointer_down(column, row),
            Action::PointerUp => self.pointer_up(),

            // ─────────────────────────────────────────────────────────────────
            // Code Modal
            // ─────────────────────────────────────────────────────────────────
            Action::CodeTab(tab) => self.bindings.code_switch_tab(tab),
            Action::CodeNextTab => self.bindings.code_next_tab(),
            Action::CodePrevTab => self.bindings.code_previous_tab(),
            Action::CodeScroll(delta) => self.bindings.code_scroll(delta),
            Action::CodeCopy => self.bindings.code_copy(),
            Action::CodeClose => self.bindings.code_close(),
            Action::CodeFocusNext => self.bindings.code_focus_next(),
            Action::CodeActivate => self.bindings.code_activate_focused(),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help { scroll_offset: 0 });
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(Modal::QuitConfirm) = self.modals.pop() {
                    self.quit();
                }
            }
            Action::ModalUp | Action::ModalDown => {
                self.help_dialog.update(action)?;
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let palette = Palette::for_theme(self.bindings.theme());
        let ctx = ShowcaseRenderContext {
            bindings: &self.bindings,
            palette: &palette,
        };
        draw_showcase(frame, area, &mut self.showcase, &ctx)?;

        if let Some(tooltip) = self.bindings.tooltip() {
            draw_tooltip(frame, area, tooltip);
        }
        let modal = self.bindings.code_modal();
        if modal.is_visible() {
            self.code_view.draw_modal(frame, area, modal, &palette);
        }
        if let Some(toast) = self.bindings.toast() {
            draw_toast(frame, area, toast, &palette);
        }

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::code_view::CodeTab;
    use crate::model::theme::Theme;
    use crate::model::widgets::WidgetSet;
    use crate::services::{ManualClock, MemoryClipboard};
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn test_app() -> (App, ManualClock) {
        let clock = ManualClock::new();
        let config = Config {
            offline: true,
            widgets: WidgetSet::all(),
            ..Config::default()
        };
        let ctx = BindingContext {
            clipboard: Box::new(MemoryClipboard::default()),
            store: Box::new(MemoryStore::new()),
            repo_api: None,
            clock: Box::new(clock.clone()),
            toast_duration: Duration::from_millis(3000),
            viewport: (120, 40),
            responses: ChatResponses::bundled().unwrap(),
        };
        let page = load_page(&config).unwrap();
        (App::with_context(config, page, ctx), clock)
    }

    fn render(app: &mut App) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                app.draw(frame, area).unwrap()
            })
            .unwrap();
        terminal
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn press(app: &mut App, code: KeyCode) {
        if let Some(action) = app.handle_key_event(key(code)).unwrap() {
            app.update(action).unwrap();
        }
    }

    #[test]
    fn test_bundled_page_renders() {
        let (mut app, _clock) = test_app();
        let terminal = render(&mut app);
        let text = screen_text(&terminal);
        assert!(text.contains("Modern Card Collection"));
        assert!(text.contains("Light"));
        assert!(app.card_count() > 20);
    }

    #[test]
    fn test_theme_key_toggles() {
        let (mut app, _clock) = test_app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.bindings.theme(), Theme::Dark);
        let text = screen_text(&render(&mut app));
        assert!(text.contains("Dark"));
    }

    #[test]
    fn test_drawn_cards_fade_in_by_index() {
        let (mut app, clock) = test_app();
        let last = app.card_count() - 1;
        assert!(app.bindings.is_card_faded(0));

        render(&mut app);
        let drawn = app.showcase.visible_cards();
        assert!(drawn.contains(&1));
        assert!(!drawn.contains(&last));

        app.update(Action::Tick).unwrap();
        assert!(!app.bindings.is_card_faded(0));
        assert!(app.bindings.is_card_faded(1));

        clock.advance_ms(100);
        app.update(Action::Tick).unwrap();
        assert!(!app.bindings.is_card_faded(1));

        clock.advance_ms(10_000);
        app.update(Action::Tick).unwrap();
        assert!(app.bindings.is_card_faded(last));
    }

    #[test]
    fn test_card_navigation_and_code_modal() {
        let (mut app, clock) = test_app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.showcase.selected, 1);
        press(&mut app, KeyCode::Char('v'));
        assert!(app.bindings.code_modal().is_visible());

        // Keys go to the modal while it is open
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.bindings.code_modal().tab, CodeTab::Css);
        assert_eq!(app.showcase.selected, 1);

        clock.advance_ms(150);
        app.update(Action::Tick).unwrap();
        assert!(app.bindings.code_modal().is_highlighted());

        press(&mut app, KeyCode::Esc);
        assert!(!app.bindings.code_modal().is_visible());
    }

    #[test]
    fn test_tab_focuses_controls_and_typing_mode() {
        let (mut app, _clock) = test_app();
        let login = app
            .bindings
            .page()
            .cards
            .iter()
            .position(|card| card.key.as_deref() == Some("login-form"))
            .unwrap();
        app.showcase.selected = login;
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        let (card, control) = app.bindings.focused_control().unwrap();
        assert_eq!(card, login);
        assert_eq!(
            app.bindings.page().control_kind(card, control),
            Some(ControlKind::Field)
        );
        assert!(app.bindings.is_typing());

        // Letters are typed, not treated as shortcuts
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.bindings.theme(), Theme::Light);

        press(&mut app, KeyCode::Esc);
        assert!(app.bindings.focused_control().is_none());
    }

    #[test]
    fn test_clicking_code_trigger_opens_modal() {
        let (mut app, _clock) = test_app();
        render(&mut app);
        let trigger = (0..app.card_count()).find_map(|card| {
            let control = app
                .bindings
                .page()
                .controls_of(card, ControlKind::CodeView)
                .first()
                .copied()?;
            app.showcase.control_rect(card, control).map(|r| (card, r))
        });
        let (card, rect) = trigger.unwrap();
        app.update(Action::PointerDown {
            column: rect.x,
            row: rect.y,
        })
        .unwrap();
        app.update(Action::PointerUp).unwrap();
        assert_eq!(app.showcase.selected, card);
        assert!(app.bindings.code_modal().is_visible());

        // A click on the backdrop closes it
        render(&mut app);
        app.update(Action::PointerDown { column: 0, row: 0 }).unwrap();
        assert!(!app.bindings.code_modal().is_visible());
    }

    #[test]
    fn test_quit_flow() {
        let (mut app, _clock) = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.modals.top(), Some(&Modal::QuitConfirm));
        press(&mut app, KeyCode::Char('n'));
        assert!(app.modals.is_empty());
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit);
        assert_eq!(app.bindings.pending_timers(), 0);
    }

    #[test]
    fn test_ctrl_c_force_quits() {
        let (mut app, _clock) = test_app();
        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(action, Some(Action::ForceQuit));
    }

    #[test]
    fn test_help_overlay() {
        let (mut app, _clock) = test_app();
        press(&mut app, KeyCode::Char('?'));
        let text = screen_text(&render(&mut app));
        assert!(text.contains("Code Viewer"));
        press(&mut app, KeyCode::Esc);
        assert!(app.modals.is_empty());
    }
}
