//! Card entrance: cards start faded and slide in once they scroll into view

use super::Bindings;
use crate::model::timer::{CardIndex, TimerEvent};
use std::collections::BTreeSet;
use std::time::Duration;

/// Delay added per card index
const STAGGER: Duration = Duration::from_millis(100);

const HIDDEN_OPACITY: &str = "0";
const HIDDEN_TRANSFORM: &str = "translateY(20px)";
const SHOWN_OPACITY: &str = "1";
const SHOWN_TRANSFORM: &str = "translateY(0)";

/// Cards already seen on screen
#[derive(Debug, Default)]
pub(super) struct EntranceState {
    seen: BTreeSet<CardIndex>,
}

fn stagger_delay(card: CardIndex) -> Duration {
    STAGGER * u32::try_from(card).unwrap_or(u32::MAX)
}

fn transition(card: CardIndex) -> String {
    let delay = stagger_delay(card).as_secs_f64();
    format!(
        "opacity 0.6s ease {:.1}s, transform 0.6s ease {:.1}s",
        delay, delay
    )
}

impl Bindings {
    /// Hide every card until it enters the viewport
    pub(super) fn attach_entrance(&mut self) {
        for card in 0..self.page.cards.len() {
            if let Some(el) = self.page.card_mut(card) {
                el.set_style_property("opacity", HIDDEN_OPACITY);
                el.set_style_property("transform", HIDDEN_TRANSFORM);
                el.set_style_property("transition", &transition(card));
            }
        }
    }

    /// Cards currently on screen; the first sighting starts the fade in
    pub fn cards_in_view(&mut self, cards: &[CardIndex]) {
        if !self.widgets.scroll_reveal {
            return;
        }
        for &card in cards {
            if card >= self.page.cards.len() || !self.entrance.seen.insert(card) {
                continue;
            }
            tracing::trace!(card, "card entered view");
            self.scheduler
                .schedule(stagger_delay(card), TimerEvent::CardEntered { card });
        }
    }

    pub(super) fn card_entered(&mut self, card: CardIndex) {
        let Some(el) = self.page.card_mut(card) else {
            return;
        };
        el.set_style_property("opacity", SHOWN_OPACITY);
        // A tilt in progress owns the transform
        if el.style_property("transform").as_deref() == Some(HIDDEN_TRANSFORM) {
            el.set_style_property("transform", SHOWN_TRANSFORM);
        }
    }

    /// Card still waiting for its entrance
    pub fn is_card_faded(&self, card: CardIndex) -> bool {
        self.page
            .card(card)
            .and_then(|el| el.style_property("opacity"))
            .is_some_and(|opacity| opacity == HIDDEN_OPACITY)
    }
}
