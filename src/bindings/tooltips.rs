//! Tooltips on code-view triggers

use super::Bindings;
use crate::model::page::ControlKind;
use crate::model::timer::{CardIndex, ControlIndex};
use crate::model::tooltip::Bounds;

/// Class of the controls that carry a tooltip
pub const TOOLTIP_TRIGGER_CLASS: &str = "code-view-btn";

impl Bindings {
    /// Move each trigger's `title` into `data-tooltip`
    pub(super) fn attach_tooltips(&mut self) {
        let mut moved = 0;
        for card in 0..self.page.cards.len() {
            for control in self.page.controls_of(card, ControlKind::CodeView) {
                let Some(el) = self.page.control_mut(card, control) else {
                    continue;
                };
                if let Some(title) = el.remove_attr("title") {
                    el.set_attr("data-tooltip", &title);
                    moved += 1;
                }
            }
        }
        tracing::debug!(triggers = moved, "tooltips attached");
    }

    fn tooltip_text(&self, card: CardIndex, control: ControlIndex) -> Option<String> {
        if self.page.control_kind(card, control) != Some(ControlKind::CodeView) {
            return None;
        }
        self.page
            .control(card, control)
            .and_then(|el| el.attr("data-tooltip"))
            .map(str::to_string)
    }

    /// Pointer entered, or keyboard focus reached, a trigger drawn at `anchor`
    pub fn tooltip_enter(&mut self, card: CardIndex, control: ControlIndex, anchor: Bounds) {
        if !self.widgets.tooltips {
            return;
        }
        if let Some(text) = self.tooltip_text(card, control) {
            self.tooltips.show(&mut self.scheduler, &text, anchor);
        }
    }

    /// Pointer left a trigger
    pub fn tooltip_leave(&mut self) {
        if self.widgets.tooltips {
            self.tooltips.hide(&mut self.scheduler);
        }
    }

    /// Pointer moved somewhere that is not over any trigger
    pub fn pointer_off_triggers(&mut self) {
        if self.widgets.tooltips && self.tooltips.current().is_some() {
            self.tooltips.hide(&mut self.scheduler);
        }
    }
}
