//! Toast and tooltip overlays

use crate::components::palette::Palette;
use crate::model::toast::{Placement, Toast, ToastPhase};
use crate::model::tooltip::Tooltip;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Dark chip used by both overlays in either theme
const CHIP: Color = Color::Rgb(51, 51, 51);

/// Where a toast of `width` x 3 goes inside `area`
pub fn toast_area(area: Rect, toast: &Toast) -> Rect {
    let width = (toast.message.width() as u16 + 4).min(area.width.saturating_sub(2));
    let height = 3u16.min(area.height);
    match toast.placement {
        Placement::Bottom => Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            // Clear of the help bar
            (area.y + area.height).saturating_sub(height + 2).max(area.y),
            width,
            height,
        ),
        Placement::TopRight => Rect::new(
            (area.x + area.width).saturating_sub(width + 1),
            area.y + 1u16.min(area.height),
            width,
            height,
        ),
    }
}

pub fn draw_toast(frame: &mut Frame, area: Rect, toast: &Toast, palette: &Palette) {
    let rect = toast_area(area, toast);
    if rect.width < 3 || rect.height < 3 {
        return;
    }
    let mut style = Style::default().fg(Color::White).bg(CHIP);
    let mut border = Style::default().fg(palette.accent).bg(CHIP);
    if toast.phase != ToastPhase::Visible {
        style = style.add_modifier(Modifier::DIM);
        border = border.add_modifier(Modifier::DIM);
    }
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(toast.message.as_str())
            .style(style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border)
                    .style(style),
            ),
        rect,
    );
}

/// Tooltip rectangle clipped to `area`; `None` until it has been placed
pub fn tooltip_area(area: Rect, tooltip: &Tooltip) -> Option<Rect> {
    let placement = tooltip.placement.filter(|_| tooltip.visible)?;
    let (width, height) = tooltip.size();
    let left = placement.left.max(area.x as i32) as u16;
    let top = placement.top.max(area.y as i32) as u16;
    let rect = Rect::new(left, top, width.max(0) as u16, height.max(0) as u16);
    let clipped = rect.intersection(area);
    (!clipped.is_empty()).then_some(clipped)
}

pub fn draw_tooltip(frame: &mut Frame, area: Rect, tooltip: &Tooltip) {
    let Some(rect) = tooltip_area(area, tooltip) else {
        return;
    };
    let mut style = Style::default().fg(Color::White).bg(CHIP);
    if !tooltip.shown {
        style = style.add_modifier(Modifier::DIM);
    }
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(format!(" {} ", tooltip.text)).style(style),
        rect,
    );
}
