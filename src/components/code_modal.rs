//! Code modal view
//!
//! Draws the open [`CodeModal`] as a centred popup: a tab row with the copy
//! and close buttons, then the active pane. Panes are plain text until the
//! modal's highlighter pass has run.

use crate::action::Action;
use crate::component::Component;
use crate::components::code_highlight::{plain_lines, Highlighter, TokenHighlighter};
use crate::components::layout::centered_percent;
use crate::components::palette::Palette;
use crate::model::code_view::{CodeModal, CodeTab, ModalFocus, ModalState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Where the pointer landed relative to the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalHit {
    Tab(CodeTab),
    Copy,
    Close,
    Inside,
    /// On the backdrop
    Outside,
}

/// Terminal view of the code modal
pub struct CodeModalView {
    /// `None` leaves every pane as plain text
    highlighter: Option<Box<dyn Highlighter>>,
    popup: Rect,
    tabs: Vec<(CodeTab, Rect)>,
    copy: Rect,
    close: Rect,
}

impl Default for CodeModalView {
    fn default() -> Self {
        Self::new(Some(Box::new(TokenHighlighter)))
    }
}

impl CodeModalView {
    pub fn new(highlighter: Option<Box<dyn Highlighter>>) -> Self {
        Self {
            highlighter,
            popup: Rect::default(),
            tabs: Vec::new(),
            copy: Rect::default(),
            close: Rect::default(),
        }
    }

    pub fn hit(&self, column: u16, row: u16) -> ModalHit {
        let inside = |r: Rect| {
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        };
        if let Some((tab, _)) = self.tabs.iter().find(|(_, r)| inside(*r)) {
            return ModalHit::Tab(*tab);
        }
        if inside(self.copy) {
            ModalHit::Copy
        } else if inside(self.close) {
            ModalHit::Close
        } else if inside(self.popup) {
            ModalHit::Inside
        } else {
            ModalHit::Outside
        }
    }

    fn pane_lines(&self, modal: &CodeModal, tab: CodeTab) -> Vec<Line<'static>> {
        let text = modal.pane_text(tab);
        match &self.highlighter {
            Some(highlighter) if modal.is_highlighted() => {
                highlighter.highlight(tab.language(), text)
            }
            _ => plain_lines(text),
        }
    }

    /// Draw `modal` over `area`, recording button positions for the mouse
    pub fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &CodeModal, palette: &Palette) {
        self.tabs.clear();
        self.popup = centered_percent(area, 85, 85);
        let popup = self.popup;
        if popup.width < 4 || popup.height < 4 {
            return;
        }
        frame.render_widget(Clear, popup);

        let border = if modal.state == ModalState::Opening {
            Style::default().fg(palette.border)
        } else {
            Style::default().fg(palette.accent)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .style(palette.base())
            .title(Span::styled(format!(" {} ", modal.title), palette.accent()))
            .title_bottom(
                Line::from(Span::styled(
                    format!(" {} ", modal.pane_class(modal.tab)),
                    palette.muted(),
                ))
                .alignment(Alignment::Right),
            );
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        if inner.height < 3 {
            return;
        }

        // Tab row
        let mut spans = Vec::new();
        let mut x = inner.x + 1;
        spans.push(Span::raw(" "));
        for tab in CodeTab::all() {
            let label = format!(" {} ", tab.label());
            let width = label.width() as u16;
            let mut style = if tab == modal.tab {
                Style::default()
                    .fg(palette.background)
                    .bg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                palette.muted()
            };
            if modal.focus == ModalFocus::Tab(tab) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            self.tabs.push((tab, Rect::new(x, inner.y, width, 1)));
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
            x += width + 1;
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), Rect::new(inner.x, inner.y, inner.width, 1));

        let copy_label = format!("[ {} ]", modal.copy_label(modal.tab));
        let close_label = "[✕]";
        let copy_width = copy_label.width() as u16;
        let close_width = close_label.width() as u16;
        let right = inner.x + inner.width;
        self.close = Rect::new(right.saturating_sub(close_width + 1), inner.y, close_width, 1);
        self.copy = Rect::new(self.close.x.saturating_sub(copy_width + 1), inner.y, copy_width, 1);

        let focused = |focus: ModalFocus, base: Style| {
            if modal.focus == focus {
                base.add_modifier(Modifier::REVERSED)
            } else {
                base
            }
        };
        let copy_style = if modal.copy_label(modal.tab) == "Copy" {
            Style::default().fg(palette.accent)
        } else {
            Style::default().fg(palette.success).add_modifier(Modifier::BOLD)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(copy_label, focused(ModalFocus::Copy, copy_style))),
            self.copy,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                close_label,
                focused(ModalFocus::Close, Style::default().fg(palette.error)),
            )),
            self.close,
        );

        // Separator
        frame.render_widget(
            Paragraph::new(Span::styled(
                "─".repeat(inner.width as usize),
                Style::default().fg(palette.border),
            )),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );

        // Pane
        let pane = Rect::new(inner.x, inner.y + 2, inner.width, inner.height - 2);
        let lines = self.pane_lines(modal, modal.tab);
        let total = lines.len();
        let scroll = modal.scroll(modal.tab);
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), pane);

        if total > pane.height as usize {
            let mut state = ScrollbarState::new(total).position(scroll as usize);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                pane,
                &mut state,
            );
        }
    }
}

impl Component for CodeModalView {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CodeClose),
            KeyCode::Char('1') => Some(Action::CodeTab(CodeTab::Html)),
            KeyCode::Char('2') => Some(Action::CodeTab(CodeTab::Css)),
            KeyCode::Char('3') => Some(Action::CodeTab(CodeTab::Js)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::CodeNextTab),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::CodePrevTab),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CodeScroll(1)),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CodeScroll(-1)),
            KeyCode::PageDown => Some(Action::CodeScroll(10)),
            KeyCode::PageUp => Some(Action::CodeScroll(-10)),
            KeyCode::Tab => Some(Action::CodeFocusNext),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::CodeActivate),
            KeyCode::Char('y') | KeyCode::Char('c') => Some(Action::CodeCopy),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawn through draw_modal, which needs the modal state
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::theme::Theme;
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};

    fn open_modal() -> CodeModal {
        let mut modal = CodeModal::new();
        modal.state = ModalState::Open;
        modal.title = "Basic Card Code".to_string();
        modal.snippet.html = "<div class=\"card\">\n  <h3>Basic</h3>\n</div>".to_string();
        modal
    }

    #[test]
    fn test_keys_map_to_modal_actions() {
        let mut view = CodeModalView::default();
        assert_eq!(
            view.handle_key_event(KeyEvent::from(KeyCode::Char('2'))).unwrap(),
            Some(Action::CodeTab(CodeTab::Css))
        );
        assert_eq!(
            view.handle_key_event(KeyEvent::from(KeyCode::Esc)).unwrap(),
            Some(Action::CodeClose)
        );
    }

    #[test]
    fn test_draw_records_button_positions() {
        let mut view = CodeModalView::default();
        let modal = open_modal();
        let palette = Palette::for_theme(Theme::Light);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                view.draw_modal(frame, area, &modal, &palette)
            })
            .unwrap();

        let (_, css) = view.tabs[1];
        assert_eq!(view.hit(css.x, css.y), ModalHit::Tab(CodeTab::Css));
        assert_eq!(view.hit(view.copy.x, view.copy.y), ModalHit::Copy);
        assert_eq!(view.hit(view.close.x, view.close.y), ModalHit::Close);
        assert_eq!(view.hit(view.popup.x + 3, view.popup.y + 5), ModalHit::Inside);
        assert_eq!(view.hit(0, 0), ModalHit::Outside);

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Basic Card Code"));
        assert!(text.contains("<h3>Basic</h3>"));
    }

    #[test]
    fn test_plain_until_highlighted() {
        let view = CodeModalView::default();
        let mut modal = open_modal();
        modal.state = ModalState::Opening;
        let plain = view.pane_lines(&modal, CodeTab::Html);
        assert!(plain
            .iter()
            .all(|line| line.spans.iter().all(|s| s.style == Style::default())));
    }
}
