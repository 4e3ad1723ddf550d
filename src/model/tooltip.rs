//! Tooltips for view-code triggers
//!
//! A show is three steps a frame apart: insert hidden, position, reveal. Each
//! step first checks the tooltip is still the current one. An animated hide
//! leaves the tooltip fading for a moment before it is removed.

use crate::model::timer::TimerEvent;
use crate::services::scheduler::Scheduler;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// One animation frame
pub const FRAME: Duration = Duration::from_millis(16);
const HIDE_ANIMATION: Duration = Duration::from_millis(300);

/// Axis-aligned box in screen units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.bottom()
    }
}

/// Spacing used when placing a tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipMetrics {
    /// Distance between trigger and tooltip
    pub gap: i32,
    /// Minimum distance from the viewport edges
    pub padding: i32,
}

impl TooltipMetrics {
    /// Browser pixel spacing
    pub const PIXELS: TooltipMetrics = TooltipMetrics {
        gap: 12,
        padding: 10,
    };
    /// Terminal cell spacing
    pub const CELLS: TooltipMetrics = TooltipMetrics { gap: 1, padding: 1 };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipPlacement {
    pub left: i32,
    pub top: i32,
    /// Placed under the trigger for lack of room above
    pub below: bool,
}

/// Place a tooltip of `size` next to `anchor` inside `viewport`
///
/// Centred above the anchor, clamped horizontally, moved below when it would
/// clip the top, then pulled up if it would clip the bottom. An anchor with
/// no area is not placed.
pub fn position_tooltip(
    anchor: Bounds,
    size: (i32, i32),
    viewport: (i32, i32),
    metrics: TooltipMetrics,
) -> Option<TooltipPlacement> {
    if anchor.width == 0 && anchor.height == 0 {
        return None;
    }
    let (width, height) = size;
    let (viewport_width, viewport_height) = viewport;

    let mut left = anchor.x + anchor.width / 2 - width / 2;
    let mut top = anchor.y - height - metrics.gap;
    let mut below = false;

    if left < metrics.padding {
        left = metrics.padding;
    } else if left + width > viewport_width - metrics.padding {
        left = viewport_width - width - metrics.padding;
    }

    if top < metrics.padding {
        top = anchor.bottom() + metrics.gap;
        below = true;
    }

    if top + height > viewport_height - metrics.padding {
        top = viewport_height - height - metrics.padding;
    }

    Some(TooltipPlacement { left, top, below })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub text: String,
    pub anchor: Bounds,
    pub placement: Option<TooltipPlacement>,
    /// Visible (positioned) but not necessarily faded in
    pub visible: bool,
    /// Carries the `show` class
    pub shown: bool,
    token: u64,
}

impl Tooltip {
    /// Size in cells: text plus one cell of padding each side, one row
    pub fn size(&self) -> (i32, i32) {
        (self.text.width() as i32 + 2, 1)
    }
}

#[derive(Debug)]
pub struct TooltipController {
    current: Option<Tooltip>,
    fading: Option<Tooltip>,
    next_token: u64,
    metrics: TooltipMetrics,
    viewport: (i32, i32),
}

impl TooltipController {
    pub fn new(metrics: TooltipMetrics, viewport: (i32, i32)) -> Self {
        Self {
            current: None,
            fading: None,
            next_token: 0,
            metrics,
            viewport,
        }
    }

    pub fn current(&self) -> Option<&Tooltip> {
        self.current.as_ref()
    }

    /// The tooltip being drawn: the current one, else one still fading out
    pub fn on_screen(&self) -> Option<&Tooltip> {
        self.current.as_ref().or(self.fading.as_ref())
    }

    pub fn set_viewport(&mut self, viewport: (i32, i32)) {
        self.viewport = viewport;
    }

    pub fn show(&mut self, scheduler: &mut Scheduler<TimerEvent>, text: &str, anchor: Bounds) {
        self.hide_now();
        self.next_token += 1;
        let token = self.next_token;
        self.current = Some(Tooltip {
            text: text.to_string(),
            anchor,
            placement: None,
            visible: false,
            shown: false,
            token,
        });
        scheduler.schedule(FRAME, TimerEvent::TooltipPosition(token));
    }

    /// Remove every tooltip without animation
    pub fn hide_now(&mut self) {
        self.current = None;
        self.fading = None;
    }

    /// Fade the current tooltip out and remove it afterwards
    pub fn hide(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        let Some(mut tooltip) = self.current.take() else {
            return;
        };
        tooltip.shown = false;
        scheduler.schedule(HIDE_ANIMATION, TimerEvent::TooltipRemove(tooltip.token));
        self.fading = Some(tooltip);
    }

    /// Apply a tooltip timer; returns false for events that are not tooltip events
    pub fn handle(&mut self, scheduler: &mut Scheduler<TimerEvent>, event: &TimerEvent) -> bool {
        match event {
            TimerEvent::TooltipPosition(token) => {
                let (metrics, viewport) = (self.metrics, self.viewport);
                if let Some(tooltip) = self.current.as_mut().filter(|t| t.token == *token) {
                    tooltip.placement =
                        position_tooltip(tooltip.anchor, tooltip.size(), viewport, metrics);
                    tooltip.visible = true;
                    scheduler.schedule(FRAME, TimerEvent::TooltipReveal(*token));
                }
            }
            TimerEvent::TooltipReveal(token) => {
                if let Some(tooltip) = self.current.as_mut().filter(|t| t.token == *token) {
                    tooltip.shown = true;
                }
            }
            TimerEvent::TooltipRemove(token) => {
                if self.fading.as_ref().is_some_and(|t| t.token == *token) {
                    self.fading = None;
                }
            }
            _ => return false,
        }
        true
    }
}
