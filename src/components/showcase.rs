//! Showcase component - Main application screen
//!
//! Lays the page's cards out in a responsive grid, tracks the selected card
//! and records where every card and control was drawn so mouse events can be
//! mapped back to them.

use crate::action::Action;
use crate::bindings::Bindings;
use crate::component::Component;
use crate::components::card_view::{render_card, CardBody, CardState};
use crate::components::layout::{calculate_main_layout, grid_columns, row_cells};
use crate::components::palette::Palette;
use crate::model::theme::Theme;
use crate::model::timer::{CardIndex, ControlIndex};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Tallest a grid row may get, borders included
const MAX_ROW_HEIGHT: u16 = 24;

// ═══════════════════════════════════════════════════════════════════════════════
// Hit testing
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    card: CardIndex,
    control: Option<ControlIndex>,
    rect: Rect,
}

/// What sits under a screen cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Control {
        card: CardIndex,
        control: ControlIndex,
        /// Outline of the whole card
        card_rect: Rect,
    },
    Card {
        card: CardIndex,
        card_rect: Rect,
    },
    Outside,
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

// ═══════════════════════════════════════════════════════════════════════════════
// Showcase Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Card grid with selection and scrolling
#[derive(Debug, Default)]
pub struct ShowcaseComponent {
    /// Selected card index
    pub selected: CardIndex,
    /// First grid row on screen
    pub first_row: usize,
    /// Columns used by the last draw
    columns: usize,
    /// Grid area used by the last draw
    grid_area: Rect,
    regions: Vec<Region>,
}

impl ShowcaseComponent {
    pub fn new() -> Self {
        Self {
            columns: 1,
            ..Default::default()
        }
    }

    pub fn columns(&self) -> usize {
        self.columns.max(1)
    }

    pub fn grid_area(&self) -> Rect {
        self.grid_area
    }

    pub fn select_next(&mut self, total: usize) {
        if total > 0 {
            self.selected = (self.selected + 1) % total;
        }
    }

    pub fn select_previous(&mut self, total: usize) {
        if total > 0 {
            self.selected = if self.selected == 0 {
                total - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn select_below(&mut self, total: usize) {
        let next = self.selected + self.columns();
        if next < total {
            self.selected = next;
        }
    }

    pub fn select_above(&mut self) {
        if self.selected >= self.columns() {
            self.selected -= self.columns();
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        self.selected = total.saturating_sub(1);
    }

    /// Scroll by whole rows; the selection follows onto the screen
    pub fn scroll_rows(&mut self, delta: i32, total: usize) {
        let rows = total.div_ceil(self.columns());
        let max_first = rows.saturating_sub(1);
        let next = (self.first_row as i64 + delta as i64).clamp(0, max_first as i64) as usize;
        self.first_row = next;
        let columns = self.columns();
        if self.selected / columns < next {
            self.selected = (next * columns).min(total.saturating_sub(1));
        }
    }

    /// Card and control under a screen cell, controls first
    pub fn hit(&self, column: u16, row: u16) -> Hit {
        let card_rect = |card: CardIndex| {
            self.regions
                .iter()
                .find(|r| r.card == card && r.control.is_none())
                .map(|r| r.rect)
                .unwrap_or_default()
        };
        if let Some(region) = self
            .regions
            .iter()
            .find(|r| r.control.is_some() && contains(r.rect, column, row))
        {
            if let Some(control) = region.control {
                return Hit::Control {
                    card: region.card,
                    control,
                    card_rect: card_rect(region.card),
                };
            }
        }
        match self
            .regions
            .iter()
            .find(|r| r.control.is_none() && contains(r.rect, column, row))
        {
            Some(region) => Hit::Card {
                card: region.card,
                card_rect: region.rect,
            },
            None => Hit::Outside,
        }
    }

    /// Where `control` of `card` was last drawn
    pub fn control_rect(&self, card: CardIndex, control: ControlIndex) -> Option<Rect> {
        self.regions
            .iter()
            .find(|r| r.card == card && r.control == Some(control))
            .map(|r| r.rect)
    }

    /// Cards drawn by the last draw
    pub fn visible_cards(&self) -> Vec<CardIndex> {
        self.regions
            .iter()
            .filter(|r| r.control.is_none())
            .map(|r| r.card)
            .collect()
    }

    /// Move `first_row` so the selected card's row is on screen
    fn ensure_visible(&mut self, row_heights: &[u16], height: u16) {
        let selected_row = self.selected / self.columns();
        if selected_row < self.first_row {
            self.first_row = selected_row;
        }
        while self.first_row < selected_row {
            let used: u16 = row_heights[self.first_row..=selected_row]
                .iter()
                .fold(0u16, |sum, h| sum.saturating_add(*h));
            if used <= height {
                break;
            }
            self.first_row += 1;
        }
        self.first_row = self.first_row.min(row_heights.len().saturating_sub(1));
    }
}

impl Component for ShowcaseComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('v') | KeyCode::Char('c') => Some(Action::OpenCode),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::NextCard),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevCard),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CardBelow),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CardAbove),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstCard),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastCard),
            KeyCode::PageDown => Some(Action::ScrollGrid(1)),
            KeyCode::PageUp => Some(Action::ScrollGrid(-1)),
            KeyCode::Tab => Some(Action::NextControl),
            KeyCode::BackTab => Some(Action::PrevControl),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ActivateCard),
            KeyCode::Esc => Some(Action::Escape),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawn through draw_showcase, which needs the bindings
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed to render the showcase
pub struct ShowcaseRenderContext<'a> {
    pub bindings: &'a Bindings,
    pub palette: &'a Palette,
}

/// Draw the header, card grid and help bar
pub fn draw_showcase(
    frame: &mut Frame,
    area: Rect,
    showcase: &mut ShowcaseComponent,
    ctx: &ShowcaseRenderContext,
) -> Result<()> {
    frame.render_widget(Block::default().style(ctx.palette.base()), area);
    let layout = calculate_main_layout(area);

    render_header(frame, layout.header, ctx);
    render_grid(frame, layout.grid, showcase, ctx);
    render_help_bar(frame, layout.help, ctx);
    Ok(())
}

fn render_header(frame: &mut Frame, area: Rect, ctx: &ShowcaseRenderContext) {
    let palette = ctx.palette;
    let bindings = ctx.bindings;

    let (symbol, name) = match bindings.theme() {
        Theme::Light => ("☀", "Light"),
        Theme::Dark => ("☾", "Dark"),
    };
    let mut theme_style = palette.accent();
    if bindings.is_theme_pulsing() {
        theme_style = theme_style.add_modifier(Modifier::REVERSED);
    }
    if bindings.is_theme_transitioning() {
        theme_style = theme_style.add_modifier(Modifier::ITALIC);
    }

    let title = Line::from(vec![
        Span::styled(" Modern Card Collection ", palette.accent()),
        Span::styled(
            format!("· {} cards", bindings.page().cards.len()),
            palette.muted(),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(palette.border))
        .style(palette.base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    frame.render_widget(Paragraph::new(title), inner);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {} {} ", symbol, name),
            theme_style,
        )))
        .alignment(Alignment::Right),
        inner,
    );
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    showcase: &mut ShowcaseComponent,
    ctx: &ShowcaseRenderContext,
) {
    let bindings = ctx.bindings;
    let palette = ctx.palette;
    let page = bindings.page();
    let total = page.cards.len();

    showcase.regions.clear();
    showcase.grid_area = area;
    showcase.columns = grid_columns(area.width);
    if total == 0 || area.height == 0 {
        return;
    }
    showcase.selected = showcase.selected.min(total - 1);
    let columns = showcase.columns();
    let cell_width = area.width / columns as u16;
    let inner_width = cell_width.saturating_sub(2);

    let bodies: Vec<CardBody> = page
        .cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let state = CardState {
                hovered: bindings.hovered_card() == Some(index),
                focused: bindings
                    .focused_control()
                    .filter(|(focused_card, _)| *focused_card == index)
                    .map(|(_, control)| control),
            };
            match page.card(index) {
                Some(el) => render_card(el, card, state, palette, inner_width),
                None => CardBody::default(),
            }
        })
        .collect();

    let row_heights: Vec<u16> = bodies
        .chunks(columns)
        .map(|row| {
            let lines = row.iter().map(|b| b.lines.len()).max().unwrap_or(0) as u16;
            (lines + 2).min(MAX_ROW_HEIGHT).min(area.height)
        })
        .collect();
    showcase.ensure_visible(&row_heights, area.height);

    let bottom = area.y + area.height;
    let mut y = area.y;
    for (row, height) in row_heights.iter().enumerate().skip(showcase.first_row) {
        if y >= bottom {
            break;
        }
        let height = (*height).min(bottom - y);
        let cells = row_cells(area, columns, y, height);
        for (column, cell) in cells.into_iter().enumerate() {
            let index = row * columns + column;
            let Some(body) = bodies.get(index) else {
                break;
            };
            draw_card(frame, cell, index, body, showcase, ctx);
        }
        y += height;
    }
}

fn draw_card(
    frame: &mut Frame,
    cell: Rect,
    index: CardIndex,
    body: &CardBody,
    showcase: &mut ShowcaseComponent,
    ctx: &ShowcaseRenderContext,
) {
    let palette = ctx.palette;
    let bindings = ctx.bindings;
    let Some(card) = bindings.page().cards.get(index) else {
        return;
    };

    let selected = showcase.selected == index;
    let hovered = bindings.hovered_card() == Some(index);
    let highlighted = bindings.highlighted_card() == Some(index);

    let (border_style, border_type) = if highlighted {
        (
            Style::default().fg(palette.warning).add_modifier(Modifier::BOLD),
            BorderType::Thick,
        )
    } else if selected {
        (
            Style::default().fg(palette.selected).add_modifier(Modifier::BOLD),
            BorderType::Double,
        )
    } else if hovered {
        (Style::default().fg(palette.accent), BorderType::Rounded)
    } else {
        (Style::default().fg(palette.border), BorderType::Rounded)
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .style(palette.base())
        .title(Span::styled(
            format!(" {} ", card.title),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        ));
    if let Some(key) = &card.key {
        block = block.title(
            Line::from(Span::styled(format!(" {} ", key), palette.muted()))
                .alignment(Alignment::Right),
        );
    }
    let mut paragraph = Paragraph::new(body.lines.clone());
    if bindings.is_card_faded(index) {
        block = block.border_style(border_style.add_modifier(Modifier::DIM));
        paragraph = paragraph.style(Style::default().add_modifier(Modifier::DIM));
    }
    let inner = block.inner(cell);
    frame.render_widget(paragraph.block(block), cell);

    for hit in &body.hits {
        if hit.line >= inner.height || hit.column >= inner.width {
            continue;
        }
        showcase.regions.push(Region {
            card: index,
            control: Some(hit.control),
            rect: Rect::new(
                inner.x + hit.column,
                inner.y + hit.line,
                hit.width.min(inner.width - hit.column),
                1,
            ),
        });
    }
    showcase.regions.push(Region {
        card: index,
        control: None,
        rect: cell,
    });
}

fn render_help_bar(frame: &mut Frame, area: Rect, ctx: &ShowcaseRenderContext) {
    let palette = ctx.palette;
    let key = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);
    let text = palette.muted();

    let hints: &[(&str, &str)] = if ctx.bindings.is_typing() {
        &[
            ("type", " edit  "),
            ("Enter", " submit  "),
            ("Tab", " next field  "),
            ("Esc", " leave field"),
        ]
    } else {
        &[
            ("←→↑↓", " cards  "),
            ("Tab", " controls  "),
            ("Enter", " activate  "),
            ("v", " code  "),
            ("t", " theme  "),
            ("?", " help  "),
            ("q", " quit"),
        ]
    };

    let mut spans = vec![Span::raw(" ")];
    for (k, description) in hints {
        spans.push(Span::styled(*k, key));
        spans.push(Span::styled(*description, text));
    }
    if let Some((failed, banner)) = ctx.bindings.repo_banner() {
        let style = if failed {
            Style::default().fg(palette.error)
        } else {
            Style::default().fg(palette.success)
        };
        spans.push(Span::styled(format!("  {}", banner), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(palette.base()), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_regions(regions: Vec<Region>) -> ShowcaseComponent {
        ShowcaseComponent {
            regions,
            columns: 2,
            ..ShowcaseComponent::new()
        }
    }

    #[test]
    fn test_navigation_wraps_horizontally() {
        let mut showcase = ShowcaseComponent::new();
        showcase.columns = 3;
        showcase.select_previous(7);
        assert_eq!(showcase.selected, 6);
        showcase.select_next(7);
        assert_eq!(showcase.selected, 0);
    }

    #[test]
    fn test_vertical_navigation_moves_by_columns() {
        let mut showcase = ShowcaseComponent::new();
        showcase.columns = 3;
        showcase.select_below(7);
        assert_eq!(showcase.selected, 3);
        showcase.select_below(7);
        assert_eq!(showcase.selected, 6);
        // No card below the last row
        showcase.select_below(7);
        assert_eq!(showcase.selected, 6);
        showcase.select_above();
        assert_eq!(showcase.selected, 3);
        showcase.select_first();
        showcase.select_above();
        assert_eq!(showcase.selected, 0);
    }

    #[test]
    fn test_hit_prefers_controls() {
        let showcase = with_regions(vec![
            Region {
                card: 1,
                control: Some(2),
                rect: Rect::new(5, 3, 4, 1),
            },
            Region {
                card: 1,
                control: None,
                rect: Rect::new(0, 0, 20, 10),
            },
        ]);
        assert_eq!(
            showcase.hit(6, 3),
            Hit::Control {
                card: 1,
                control: 2,
                card_rect: Rect::new(0, 0, 20, 10)
            }
        );
        assert_eq!(
            showcase.hit(6, 4),
            Hit::Card {
                card: 1,
                card_rect: Rect::new(0, 0, 20, 10)
            }
        );
        assert_eq!(showcase.hit(30, 4), Hit::Outside);
        assert_eq!(showcase.control_rect(1, 2), Some(Rect::new(5, 3, 4, 1)));
    }

    #[test]
    fn test_ensure_visible_scrolls_to_selection() {
        let mut showcase = ShowcaseComponent::new();
        showcase.columns = 2;
        showcase.selected = 5;
        showcase.ensure_visible(&[10, 10, 10, 10], 20);
        assert_eq!(showcase.first_row, 1);

        showcase.selected = 0;
        showcase.ensure_visible(&[10, 10, 10, 10], 20);
        assert_eq!(showcase.first_row, 0);
    }

    #[test]
    fn test_scroll_rows_drags_selection() {
        let mut showcase = ShowcaseComponent::new();
        showcase.columns = 2;
        showcase.scroll_rows(2, 7);
        assert_eq!(showcase.first_row, 2);
        assert_eq!(showcase.selected, 4);
        showcase.scroll_rows(10, 7);
        assert_eq!(showcase.first_row, 3);
        showcase.scroll_rows(-10, 7);
        assert_eq!(showcase.first_row, 0);
    }

    #[test]
    fn test_keys_map_to_actions() {
        let mut showcase = ShowcaseComponent::new();
        let key = |code| KeyEvent::from(code);
        assert_eq!(
            showcase.handle_key_event(key(KeyCode::Char('v'))).unwrap(),
            Some(Action::OpenCode)
        );
        assert_eq!(
            showcase.handle_key_event(key(KeyCode::Tab)).unwrap(),
            Some(Action::NextControl)
        );
        assert_eq!(
            showcase.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::ActivateCard)
        );
    }
}
