//! Card buttons: primary, icon, wishlist, social and text buttons

use super::Bindings;
use crate::dom::Element;
use crate::model::page::ControlKind;
use crate::model::timer::{CardIndex, ControlIndex, TimerEvent};
use std::collections::HashMap;
use std::time::Duration;

const CART_ADDING: Duration = Duration::from_millis(1000);
const CART_RESET: Duration = Duration::from_millis(2000);

const FOLLOW_BACKGROUND: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";
const DONE_BACKGROUND: &str = "#27ae60";

#[derive(Debug, Default)]
pub(super) struct ButtonState {
    /// Label an add-to-cart button had before it started
    cart_labels: HashMap<(CardIndex, ControlIndex), String>,
}

/// Glyph name of the first `.material-icons` inside `el`
pub(super) fn icon_glyph(el: &Element) -> Option<String> {
    let path = el.find_by_class("material-icons")?;
    el.get(&path).map(|icon| icon.text_content().trim().to_string())
}

pub(super) fn set_icon_glyph(el: &mut Element, glyph: &str) {
    if let Some(path) = el.find_by_class("material-icons") {
        if let Some(icon) = el.get_mut(&path) {
            icon.set_text(glyph);
        }
    }
}

impl Bindings {
    pub(super) fn click_button(&mut self, card: CardIndex, control: ControlIndex, kind: ControlKind) {
        match kind {
            ControlKind::Primary => self.click_primary(card, control),
            ControlKind::IconButton => self.click_icon_button(card, control),
            ControlKind::Wishlist => self.click_wishlist(card, control),
            ControlKind::SocialAction => self.click_social_action(card, control),
            ControlKind::TextButton => self.click_text_button(card, control),
            _ => {}
        }
    }

    fn click_primary(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(label) = self
            .page
            .control(card, control)
            .map(|el| el.text_content().trim().to_string())
        else {
            return;
        };

        match label.as_str() {
            "Continue" | "Read More" => {
                self.show_toast("Button clicked! Ready for your custom action.")
            }
            "Follow" | "Following" => self.toggle_follow(card, control, label == "Following"),
            "Add to Cart" => self.start_add_to_cart(card, control, label),
            "Start Free Trial" => self.show_toast("Free trial started! Welcome aboard! 🎉"),
            "Read Article" => self.show_toast("Opening article... 📖"),
            other => {
                let message = format!("{} clicked!", other);
                self.show_toast(&message);
            }
        }
    }

    fn toggle_follow(&mut self, card: CardIndex, control: ControlIndex, following: bool) {
        if let Some(el) = self.page.control_mut(card, control) {
            if following {
                el.set_text("Follow");
                el.set_style_property("background", FOLLOW_BACKGROUND);
            } else {
                el.set_text("Following");
                el.set_style_property("background", DONE_BACKGROUND);
            }
        }
        self.show_toast(if following {
            "Unfollowed user"
        } else {
            "Now following! 👥"
        });
    }

    fn start_add_to_cart(&mut self, card: CardIndex, control: ControlIndex, label: String) {
        let Some(el) = self.page.control_mut(card, control) else {
            return;
        };
        el.set_text("Adding...");
        el.set_attr("disabled", "");
        self.buttons.cart_labels.insert((card, control), label);
        self.scheduler
            .schedule(CART_ADDING, TimerEvent::CartAdded { card, control });
    }

    pub(super) fn cart_added(&mut self, card: CardIndex, control: ControlIndex) {
        if let Some(el) = self.page.control_mut(card, control) {
            el.set_text("Added ✓");
            el.set_style_property("background", DONE_BACKGROUND);
        }
        self.show_toast("Product added to cart! 🛒");
        self.scheduler
            .schedule(CART_RESET, TimerEvent::CartReset { card, control });
    }

    pub(super) fn cart_reset(&mut self, card: CardIndex, control: ControlIndex) {
        let label = self
            .buttons
            .cart_labels
            .remove(&(card, control))
            .unwrap_or_else(|| "Add to Cart".to_string());
        if let Some(el) = self.page.control_mut(card, control) {
            el.set_text(&label);
            el.remove_attr("disabled");
            el.set_style_property("background", "");
        }
    }

    fn click_icon_button(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(glyph) = self.page.control(card, control).and_then(icon_glyph) else {
            return;
        };
        match glyph.as_str() {
            "bookmark_border" | "bookmark" => {
                let bookmarked = glyph == "bookmark_border";
                if let Some(el) = self.page.control_mut(card, control) {
                    set_icon_glyph(el, if bookmarked { "bookmark" } else { "bookmark_border" });
                }
                self.show_toast(if bookmarked {
                    "Bookmarked!"
                } else {
                    "Bookmark removed"
                });
            }
            "share" => self.show_toast("Sharing functionality would go here"),
            "shopping_cart" => self.show_toast("Quick add to cart! 🛒"),
            "more_vert" => self.show_toast("Menu options would appear here"),
            _ => {}
        }
    }

    fn click_wishlist(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(el) = self.page.control_mut(card, control) else {
            return;
        };
        let liked = icon_glyph(el).as_deref() == Some("favorite");
        set_icon_glyph(el, if liked { "favorite_border" } else { "favorite" });
        el.set_style_property("color", if liked { "#e74c3c" } else { "#ff6b6b" });
        self.show_toast(if liked {
            "Removed from wishlist"
        } else {
            "Added to wishlist! ❤️"
        });
    }

    fn click_social_action(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(glyph) = self.page.control(card, control).and_then(icon_glyph) else {
            return;
        };
        match glyph.as_str() {
            "favorite_border" => {
                if let Some(el) = self.page.control_mut(card, control) {
                    set_icon_glyph(el, "favorite");
                    if let Some(path) = el.find_by_class("material-icons") {
                        if let Some(icon) = el.get_mut(&path) {
                            icon.set_style_property("color", "#e74c3c");
                        }
                    }
                    bump_count(el);
                }
                self.show_toast("Post liked! ❤️");
            }
            "chat_bubble_outline" => self.show_toast("Comments would open here 💬"),
            "share" => self.show_toast("Share options would appear here"),
            _ => {}
        }
    }

    fn click_text_button(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(label) = self.page.control(card, control).map(|el| el.text_content()) else {
            return;
        };
        if label.contains("Cancel") {
            self.show_toast("Action cancelled");
        } else if label.contains("Message") {
            self.show_toast("Opening message composer... 💬");
        } else if label.contains("Save") {
            if let Some(el) = self.page.control_mut(card, control) {
                match icon_glyph(el).as_deref() {
                    Some("bookmark_border") => set_icon_glyph(el, "bookmark"),
                    Some(_) => set_icon_glyph(el, "bookmark_border"),
                    None => {}
                }
            }
            self.show_toast("Article saved for later! 📖");
        }
    }
}

/// Increment the number in the last `span` child of a social action
fn bump_count(el: &mut Element) {
    let Some(span) = el
        .children
        .iter_mut()
        .rev()
        .find_map(|child| match child {
            crate::dom::Node::Element(inner) if inner.tag == "span" => Some(inner),
            _ => None,
        })
    else {
        return;
    };
    let count = span.text_content().trim().parse::<u64>().unwrap_or(0);
    span.set_text(&(count + 1).to_string());
}

#[cfg(test)]
mod tests {
    use crate::bindings::tests::Harness;
    use crate::model::page::ControlKind;
    use pretty_assertions::assert_eq;

    const BUTTONS: &str = r#"<main>
      <div class="card card-product" data-card-type="product">
        <h3>Wireless Headphones</h3>
        <button class="product-wishlist"><span class="material-icons">favorite_border</span></button>
        <button class="btn-primary">Add to Cart</button>
        <button class="btn-icon"><span class="material-icons">bookmark_border</span></button>
        <button class="btn-icon"><span class="material-icons">more_vert</span></button>
      </div>
      <div class="card card-profile" data-card-type="profile">
        <h3>Sarah Johnson</h3>
        <button class="btn-primary">Follow</button>
        <button class="btn-text">Message</button>
        <button class="btn-primary">Book Demo</button>
      </div>
      <div class="card card-social" data-card-type="social">
        <h3>Post</h3>
        <button class="social-action"><span class="material-icons">favorite_border</span><span>24</span></button>
        <button class="social-action"><span class="material-icons">chat_bubble_outline</span><span>5</span></button>
        <button class="btn-text"><span class="material-icons">bookmark_border</span> Save</button>
      </div>
    </main>"#;

    #[test]
    fn test_three_rapid_toasts_leave_only_the_last() {
        let mut h = Harness::new(BUTTONS);
        let wishlist = h.control(0, ControlKind::Wishlist);
        let more = h.bindings.page().controls_of(0, ControlKind::IconButton)[1];
        let message = h.control(1, ControlKind::TextButton);

        h.bindings.click_control(0, wishlist);
        h.bindings.click_control(0, more);
        h.bindings.click_control(1, message);
        assert_eq!(h.toast_text().as_deref(), Some("Opening message composer... 💬"));

        h.advance(10);
        h.advance(3000);
        h.advance(300);
        assert_eq!(h.toast_text(), None);
    }

    #[test]
    fn test_add_to_cart_sequence() {
        let mut h = Harness::new(BUTTONS);
        let cart = h.control(0, ControlKind::Primary);

        h.bindings.click_control(0, cart);
        assert_eq!(h.control_text(0, cart), "Adding...");
        assert!(h.bindings.page().control(0, cart).unwrap().has_attr("disabled"));

        // Disabled while the add runs
        h.bindings.click_control(0, cart);
        h.advance(1000);
        assert_eq!(h.control_text(0, cart), "Added ✓");
        assert_eq!(h.toast_text().as_deref(), Some("Product added to cart! 🛒"));

        h.advance(2000);
        assert_eq!(h.control_text(0, cart), "Add to Cart");
        assert!(!h.bindings.page().control(0, cart).unwrap().has_attr("disabled"));
    }

    #[test]
    fn test_follow_toggles_both_ways() {
        let mut h = Harness::new(BUTTONS);
        let follow = h.control(1, ControlKind::Primary);
        h.bindings.click_control(1, follow);
        assert_eq!(h.control_text(1, follow), "Following");
        assert_eq!(h.toast_text().as_deref(), Some("Now following! 👥"));
        h.bindings.click_control(1, follow);
        assert_eq!(h.control_text(1, follow), "Follow");
        assert_eq!(h.toast_text().as_deref(), Some("Unfollowed user"));
    }

    #[test]
    fn test_unknown_primary_label_is_echoed() {
        let mut h = Harness::new(BUTTONS);
        let demo = h.bindings.page().controls_of(1, ControlKind::Primary)[1];
        h.bindings.click_control(1, demo);
        assert_eq!(h.toast_text().as_deref(), Some("Book Demo clicked!"));
    }

    #[test]
    fn test_wishlist_and_bookmark_toggle() {
        let mut h = Harness::new(BUTTONS);
        let wishlist = h.control(0, ControlKind::Wishlist);
        h.bindings.click_control(0, wishlist);
        assert_eq!(h.control_text(0, wishlist), "favorite");
        assert_eq!(h.toast_text().as_deref(), Some("Added to wishlist! ❤️"));
        h.bindings.click_control(0, wishlist);
        assert_eq!(h.control_text(0, wishlist), "favorite_border");
        assert_eq!(h.toast_text().as_deref(), Some("Removed from wishlist"));

        let bookmark = h.control(0, ControlKind::IconButton);
        h.bindings.click_control(0, bookmark);
        assert_eq!(h.control_text(0, bookmark), "bookmark");
        h.bindings.click_control(0, bookmark);
        assert_eq!(h.control_text(0, bookmark), "bookmark_border");
        assert_eq!(h.toast_text().as_deref(), Some("Bookmark removed"));
    }

    #[test]
    fn test_like_increments_count_once() {
        let mut h = Harness::new(BUTTONS);
        let like = h.control(2, ControlKind::SocialAction);
        h.bindings.click_control(2, like);
        assert_eq!(h.control_text(2, like), "favorite25");
        assert_eq!(h.toast_text().as_deref(), Some("Post liked! ❤️"));
        // Already liked: nothing further happens
        h.bindings.click_control(2, like);
        assert_eq!(h.control_text(2, like), "favorite25");
    }

    #[test]
    fn test_save_text_button_toggles_icon() {
        let mut h = Harness::new(BUTTONS);
        let save = h.control(2, ControlKind::TextButton);
        h.bindings.click_control(2, save);
        assert!(h.control_text(2, save).starts_with("bookmark"));
        assert!(!h.control_text(2, save).starts_with("bookmark_border"));
        assert_eq!(h.toast_text().as_deref(), Some("Article saved for later! 📖"));
    }
}
