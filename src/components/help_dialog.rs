//! Help dialog component
//!
//! Keyboard and mouse reference for the showcase.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ModalDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ModalUp),
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ModalDown => self.scroll_offset = self.scroll_offset.saturating_add(1),
            Action::ModalUp => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = centered_popup(
            area,
            64u16.min(area.width.saturating_sub(4)),
            area.height.saturating_sub(4),
        );
        frame.render_widget(Clear, dialog_area);

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content with all keyboard shortcuts
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Helper to add a section header
    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    // Helper to add a shortcut line
    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:14}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Cards");
    add_shortcut(&mut lines, "←→ / h l", "Previous / next card");
    add_shortcut(&mut lines, "↑↓ / k j", "Card above / below");
    add_shortcut(&mut lines, "g / G", "First / last card");
    add_shortcut(&mut lines, "PgUp/PgDn", "Scroll the grid by a row");
    add_shortcut(&mut lines, "Enter/Space", "Activate card (flip, reveal, chat)");
    add_shortcut(&mut lines, "Esc", "Leave field / close reveal");

    add_section(&mut lines, "Controls");
    add_shortcut(&mut lines, "Tab", "Focus next control in the card");
    add_shortcut(&mut lines, "Shift+Tab", "Focus previous control");
    add_shortcut(&mut lines, "Enter", "Press the focused control");
    add_shortcut(&mut lines, "type", "Edit the focused field or chat input");

    add_section(&mut lines, "Page");
    add_shortcut(&mut lines, "t", "Toggle light / dark theme");
    add_shortcut(&mut lines, "v / c", "View the selected card's code");

    add_section(&mut lines, "Code Viewer");
    add_shortcut(&mut lines, "1 2 3", "HTML / CSS / JavaScript");
    add_shortcut(&mut lines, "← →", "Previous / next tab");
    add_shortcut(&mut lines, "↑↓ / j k", "Scroll the code");
    add_shortcut(&mut lines, "Tab / Enter", "Move focus / press it");
    add_shortcut(&mut lines, "y / c", "Copy the code");
    add_shortcut(&mut lines, "Esc / q", "Close");

    add_section(&mut lines, "Mouse");
    add_shortcut(&mut lines, "hover", "Lift, tilt and flip cards; code tooltips");
    add_shortcut(&mut lines, "click", "Select a card or press a control");
    add_shortcut(&mut lines, "wheel", "Scroll the grid or the code");

    add_section(&mut lines, "General");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit");
    add_shortcut(&mut lines, "Ctrl+c", "Quit immediately");

    // Footer
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}
