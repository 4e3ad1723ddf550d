//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Narrowest a card column is allowed to get
pub const MIN_CARD_WIDTH: u16 = 34;

/// Main screen layout areas
pub struct MainLayout {
    pub header: Rect,
    pub grid: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Popup sized as a share of `area`
pub fn centered_percent(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = area.height.saturating_mul(percent_y) / 100;
    centered_popup(area, width, height)
}

/// Calculate main screen layout
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    MainLayout {
        header: chunks[0],
        grid: chunks[1],
        help: chunks[2],
    }
}

/// Number of card columns that fit in `width`
pub fn grid_columns(width: u16) -> usize {
    (width / MIN_CARD_WIDTH).max(1) as usize
}

/// Column rectangles for one grid row starting at `y`
pub fn row_cells(area: Rect, columns: usize, y: u16, height: u16) -> Vec<Rect> {
    let columns = columns.max(1) as u16;
    let width = area.width / columns;
    (0..columns)
        .map(|i| {
            let x = area.x + i * width;
            // Last column takes the remainder
            let w = if i + 1 == columns {
                area.x + area.width - x
            } else {
                width
            };
            Rect::new(x, y, w, height)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_popup(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_popup(area, 40, 40), Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(20), 1);
        assert_eq!(grid_columns(80), 2);
        assert_eq!(grid_columns(120), 3);
    }

    #[test]
    fn test_row_cells_cover_width() {
        let cells = row_cells(Rect::new(2, 0, 101, 30), 3, 5, 8);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], Rect::new(2, 5, 33, 8));
        assert_eq!(cells[2].x + cells[2].width, 103);
    }
}
