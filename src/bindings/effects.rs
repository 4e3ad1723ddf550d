//! Card effects: tilt, reveal, particles, touch and social sign-in feedback

use super::Bindings;
use crate::model::timer::{CardIndex, ControlIndex, TimerEvent};
use crate::model::toast::Placement;
use std::time::Duration;

const TILT_SETTLE: Duration = Duration::from_millis(300);
const TOUCH_HOLD: Duration = Duration::from_millis(300);
const SOCIAL_PRESS: Duration = Duration::from_millis(150);
const SOCIAL_TOAST: Duration = Duration::from_millis(2000);

const TILT_RESET: &str = "perspective(1000px) rotateX(0deg) rotateY(0deg)";
const TILT_ICON_RESET: &str = "translateZ(0px) rotateX(0deg) rotateY(0deg)";
const SETTLE_TRANSITION: &str = "transform 0.3s ease";

/// Cards that emulate hover through a touch press
const TOUCH_CARDS: [&str; 5] = [
    "card-flip",
    "card-hover-lift",
    "card-glow",
    "card-slide",
    "card-morph",
];

/// Degrees as a CSS number, never `-0`
fn degrees(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{}", value)
}

/// Card and icon transforms for a pointer at (`x`, `y`) inside a card
pub fn tilt_transforms(x: f64, y: f64, width: f64, height: f64) -> (String, String) {
    let rotate_x = (y - height / 2.0) / 5.0;
    let rotate_y = (width / 2.0 - x) / 5.0;
    (
        format!(
            "perspective(1000px) rotateX({}deg) rotateY({}deg)",
            degrees(rotate_x),
            degrees(rotate_y)
        ),
        format!(
            "translateZ(30px) rotateX({}deg) rotateY({}deg)",
            degrees(rotate_x * 0.3),
            degrees(rotate_y * 0.3)
        ),
    )
}

impl Bindings {
    fn card_has_class(&self, card: CardIndex, class: &str) -> bool {
        self.page.card(card).is_some_and(|el| el.has_class(class))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hover
    // ─────────────────────────────────────────────────────────────────────────

    pub fn pointer_enter(&mut self, card: CardIndex) {
        if self.hovered == Some(card) {
            return;
        }
        if let Some(previous) = self.hovered {
            self.pointer_leave(previous);
        }
        self.hovered = Some(card);
        if self.widgets.particles && self.card_has_class(card, "card-particles") {
            self.set_particles(card, "2s", "1");
        }
    }

    /// Pointer moved to (`x`, `y`) within a card of the given size
    pub fn pointer_move(&mut self, card: CardIndex, x: f64, y: f64, width: f64, height: f64) {
        self.pointer_enter(card);
        if !self.widgets.tilt || !self.card_has_class(card, "card-tilt") {
            return;
        }
        let (card_transform, icon_transform) = tilt_transforms(x, y, width, height);
        let Some(el) = self.page.card_mut(card) else {
            return;
        };
        el.set_style_property("transition", "none");
        el.set_style_property("transform", &card_transform);
        if let Some(path) = el.find_by_class("tilt-icon") {
            if let Some(icon) = el.get_mut(&path) {
                icon.set_style_property("transition", "none");
                icon.set_style_property("transform", &icon_transform);
            }
        }
    }

    pub fn pointer_leave(&mut self, card: CardIndex) {
        if self.hovered == Some(card) {
            self.hovered = None;
        }
        if self.widgets.particles && self.card_has_class(card, "card-particles") {
            self.set_particles(card, "3s", "0.6");
        }
        if self.widgets.tilt && self.card_has_class(card, "card-tilt") {
            if let Some(el) = self.page.card_mut(card) {
                el.set_style_property("transition", SETTLE_TRANSITION);
                el.set_style_property("transform", TILT_RESET);
                if let Some(path) = el.find_by_class("tilt-icon") {
                    if let Some(icon) = el.get_mut(&path) {
                        icon.set_style_property("transition", SETTLE_TRANSITION);
                        icon.set_style_property("transform", TILT_ICON_RESET);
                    }
                }
            }
            self.scheduler
                .schedule(TILT_SETTLE, TimerEvent::TiltSettled { card });
        }
    }

    pub(super) fn tilt_settled(&mut self, card: CardIndex) {
        let Some(el) = self.page.card_mut(card) else {
            return;
        };
        el.set_style_property("transition", "none");
        if let Some(path) = el.find_by_class("tilt-icon") {
            if let Some(icon) = el.get_mut(&path) {
                icon.set_style_property("transition", "none");
            }
        }
    }

    fn set_particles(&mut self, card: CardIndex, duration: &str, opacity: &str) {
        let Some(el) = self.page.card_mut(card) else {
            return;
        };
        for path in el.find_all(|e| e.has_class("particle")) {
            if let Some(particle) = el.get_mut(&path) {
                particle.set_style_property("animation-duration", duration);
                particle.set_style_property("opacity", opacity);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reveal
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn reveal(&mut self, card: CardIndex) {
        if !self.card_has_class(card, "card-reveal") || self.card_has_class(card, "revealed") {
            return;
        }
        if let Some(el) = self.page.card_mut(card) {
            el.add_class("revealed");
        }
        self.show_toast("Card revealed! Click close to return.");
    }

    pub(super) fn close_reveal(&mut self, card: CardIndex) {
        if let Some(el) = self.page.card_mut(card) {
            el.remove_class("revealed");
        }
        self.show_toast("Card closed");
    }

    /// Close every revealed card; true if any was open
    pub(super) fn close_all_reveals(&mut self) -> bool {
        let revealed: Vec<CardIndex> = self
            .page
            .cards_with_class("card-reveal")
            .into_iter()
            .filter(|&card| self.card_has_class(card, "revealed"))
            .collect();
        for &card in &revealed {
            self.close_reveal(card);
        }
        !revealed.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Touch
    // ─────────────────────────────────────────────────────────────────────────

    pub fn press(&mut self, card: CardIndex) {
        if !self.widgets.touch {
            return;
        }
        if let Some(el) = self.page.card_mut(card) {
            if TOUCH_CARDS.iter().any(|class| el.has_class(class)) {
                el.add_class("touch-active");
            }
        }
    }

    pub fn release(&mut self, card: CardIndex) {
        if !self.widgets.touch || !self.card_has_class(card, "touch-active") {
            return;
        }
        self.scheduler
            .schedule(TOUCH_HOLD, TimerEvent::TouchRelease { card });
    }

    pub(super) fn touch_release(&mut self, card: CardIndex) {
        if let Some(el) = self.page.card_mut(card) {
            el.remove_class("touch-active");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Social sign-in
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn click_social_sign_in(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(el) = self.page.control_mut(card, control) else {
            return;
        };
        let provider = if el.has_class("google-btn") {
            "Google"
        } else if el.has_class("linkedin-btn") {
            "LinkedIn"
        } else if el.has_class("github-btn") {
            "GitHub"
        } else {
            "Unknown"
        };
        el.set_style_property("transform", "scale(0.95)");
        self.scheduler
            .schedule(SOCIAL_PRESS, TimerEvent::SocialPressEnd { card, control });

        let message = format!("{} sign-in clicked (demo only)", provider);
        tracing::info!(provider, "social sign-in");
        self.show_toast_for(&message, SOCIAL_TOAST, Placement::TopRight);
    }

    pub(super) fn social_press_end(&mut self, card: CardIndex, control: ControlIndex) {
        if let Some(el) = self.page.control_mut(card, control) {
            el.set_style_property("transform", "");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::tests::Harness;
    use crate::model::page::ControlKind;
    use crate::model::widgets::WidgetSet;
    use pretty_assertions::assert_eq;

    const EFFECTS: &str = r#"<main>
      <div class="card card-tilt" data-card-type="tilt">
        <div class="tilt-icon"><span class="material-icons">3d_rotation</span></div>
        <h3>3D Tilt</h3>
      </div>
      <div class="card card-reveal" data-card-type="reveal">
        <h3>Reveal</h3>
        <div class="reveal-content"><button class="reveal-close"><span class="material-icons">close</span></button></div>
      </div>
      <div class="card card-particles" data-card-type="particles">
        <div class="particles"><span class="particle"></span><span class="particle"></span></div>
        <h3>Particles</h3>
      </div>
      <div class="card card-flip" data-card-type="flip"><h3>Flip</h3></div>
      <div class="card card-form" data-card-type="social-login">
        <h3>Sign in</h3>
        <button class="social-btn google-btn">Google</button>
        <button class="social-btn">Other</button>
      </div>
    </main>"#;

    #[test]
    fn test_tilt_transform_values() {
        let (card, icon) = tilt_transforms(0.0, 0.0, 200.0, 100.0);
        assert_eq!(card, "perspective(1000px) rotateX(-10deg) rotateY(20deg)");
        assert_eq!(icon, "translateZ(30px) rotateX(-3deg) rotateY(6deg)");

        let (centre, _) = tilt_transforms(100.0, 50.0, 200.0, 100.0);
        assert_eq!(centre, TILT_RESET);
    }

    #[test]
    fn test_tilt_follows_pointer_and_settles() {
        let mut h = Harness::new(EFFECTS);
        h.bindings.pointer_move(0, 0.0, 0.0, 200.0, 100.0);
        let card = h.bindings.page().card(0).unwrap();
        assert_eq!(
            card.style_property("transform").as_deref(),
            Some("perspective(1000px) rotateX(-10deg) rotateY(20deg)")
        );

        h.bindings.pointer_leave(0);
        let card = h.bindings.page().card(0).unwrap();
        assert_eq!(card.style_property("transform").as_deref(), Some(TILT_RESET));
        assert_eq!(card.style_property("transition").as_deref(), Some(SETTLE_TRANSITION));

        h.advance(300);
        let card = h.bindings.page().card(0).unwrap();
        assert_eq!(card.style_property("transition").as_deref(), Some("none"));
    }

    #[test]
    fn test_reveal_once_then_close() {
        let mut h = Harness::new(EFFECTS);
        h.bindings.click_card(1);
        assert!(h.bindings.page().card(1).unwrap().has_class("revealed"));
        assert_eq!(
            h.toast_text().as_deref(),
            Some("Card revealed! Click close to return.")
        );

        let close = h.control(1, ControlKind::RevealClose);
        h.bindings.click_control(1, close);
        assert!(!h.bindings.page().card(1).unwrap().has_class("revealed"));
        assert_eq!(h.toast_text().as_deref(), Some("Card closed"));
    }

    #[test]
    fn test_reveal_ignores_other_cards() {
        let mut h = Harness::new(EFFECTS);
        h.bindings.click_card(3);
        assert!(!h.bindings.page().card(3).unwrap().has_class("revealed"));
        assert_eq!(h.toast_text(), None);
    }

    #[test]
    fn test_particles_speed_up_on_hover() {
        let mut h = Harness::new(EFFECTS);
        h.bindings.pointer_enter(2);
        let card = h.bindings.page().card(2).unwrap();
        for path in card.find_all(|e| e.has_class("particle")) {
            let particle = card.get(&path).unwrap();
            assert_eq!(particle.style_property("opacity").as_deref(), Some("1"));
            assert_eq!(particle.style_property("animation-duration").as_deref(), Some("2s"));
        }
        h.bindings.pointer_leave(2);
        let card = h.bindings.page().card(2).unwrap();
        let first = card.find_by_class("particle").unwrap();
        assert_eq!(card.get(&first).unwrap().style_property("opacity").as_deref(), Some("0.6"));
    }

    #[test]
    fn test_touch_press_and_delayed_release() {
        let mut h = Harness::new(EFFECTS);
        h.bindings.press(3);
        assert!(h.bindings.page().card(3).unwrap().has_class("touch-active"));
        h.bindings.release(3);
        h.advance(299);
        assert!(h.bindings.page().card(3).unwrap().has_class("touch-active"));
        h.advance(1);
        assert!(!h.bindings.page().card(3).unwrap().has_class("touch-active"));
    }

    #[test]
    fn test_touch_off_by_default() {
        let mut h = Harness::with(EFFECTS, WidgetSet::default(), None);
        h.bindings.press(3);
        assert!(!h.bindings.page().card(3).unwrap().has_class("touch-active"));
    }

    #[test]
    fn test_social_sign_in_feedback() {
        let mut h = Harness::new(EFFECTS);
        let buttons = h.bindings.page().controls_of(4, ControlKind::SocialSignIn);
        h.bindings.click_control(4, buttons[0]);
        let toast = h.bindings.toast().unwrap();
        assert_eq!(toast.message, "Google sign-in clicked (demo only)");
        assert_eq!(toast.placement, Placement::TopRight);
        assert_eq!(
            h.bindings
                .page()
                .control(4, buttons[0])
                .unwrap()
                .style_property("transform")
                .as_deref(),
            Some("scale(0.95)")
        );
        h.advance(150);
        assert_eq!(h.bindings.page().control(4, buttons[0]).unwrap().attr("style"), None);

        h.bindings.click_control(4, buttons[1]);
        assert_eq!(h.toast_text().as_deref(), Some("Unknown sign-in clicked (demo only)"));
    }
}
