//! Form fields: focus styling, validation, autosave and submission

use super::Bindings;
use crate::dom::{Element, Node, NodePath};
use crate::model::forms::{autosave_key, validate_field, AutosaveRecord, FormKind};
use crate::model::page::ControlKind;
use crate::model::timer::{CardIndex, ControlIndex, TimerEvent};
use crate::model::toast::Placement;
use crate::services::scheduler::TimerId;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

const AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);
const SUBMIT_DELAY: Duration = Duration::from_millis(2000);
const VALIDATION_TOAST: Duration = Duration::from_millis(4000);
const SUCCESS_TOAST: Duration = Duration::from_millis(3000);

#[derive(Debug, Default)]
pub(super) struct FormsState {
    /// Pending autosave per form card
    autosave: HashMap<CardIndex, TimerId>,
}

/// Current value of a field element
pub fn field_value(el: &Element) -> String {
    el.attr("value").unwrap_or_default().to_string()
}

fn is_textarea(el: &Element) -> bool {
    el.tag == "textarea" || el.has_class("form-textarea")
}

fn is_select(el: &Element) -> bool {
    el.tag == "select" || el.has_class("form-select")
}

/// Path of the nearest `.form-group` at or above `path`, within the card
fn form_group_path(card: &Element, path: &[usize]) -> Option<NodePath> {
    (0..path.len())
        .rev()
        .map(|len| path[..len].to_vec())
        .find(|prefix| {
            !prefix.is_empty() && card.get(prefix).is_some_and(|el| el.has_class("form-group"))
        })
}

fn error_element(input_id: &str, message: &str) -> Element {
    Element::new("div")
        .with_attr("class", "form-error")
        .with_attr("id", &format!("error-{}", input_id))
        .with_child(Node::Element(
            Element::new("span")
                .with_attr("class", "material-icons")
                .with_attr("style", "font-size: 16px")
                .with_text("error"),
        ))
        .with_text(message)
}

impl Bindings {
    fn control_path(&self, card: CardIndex, control: ControlIndex) -> Option<NodePath> {
        Some(self.page.cards.get(card)?.controls.get(control)?.path.clone())
    }

    fn form_kind(&self, card: CardIndex) -> Option<FormKind> {
        self.page.cards.get(card)?.key.as_deref().and_then(FormKind::from_card_key)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Focus and validation
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn focus_field(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(path) = self.control_path(card, control) else {
            return;
        };
        let Some((_, parent)) = path.split_last() else {
            return;
        };
        let Some(el) = self.page.card_mut(card) else {
            return;
        };
        if let Some(parent) = el.get_mut(parent) {
            parent.add_class("focused");
        }
        if let Some(input) = el.get_mut(&path) {
            let id = input.attr("id").unwrap_or_default().to_string();
            input.set_attr("aria-describedby", &format!("input-help-{}", id));
        }
    }

    pub(super) fn blur_field(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(path) = self.control_path(card, control) else {
            return;
        };
        if let Some(el) = self.page.card_mut(card) {
            if let Some((_, parent)) = path.split_last() {
                if let Some(parent) = el.get_mut(parent) {
                    parent.remove_class("focused");
                }
            }
            if let Some(input) = el.get_mut(&path) {
                input.remove_attr("aria-describedby");
            }
        }
        self.validate_input(card, control);
    }

    /// Check one field and show or clear its inline error
    pub(super) fn validate_input(&mut self, card: CardIndex, control: ControlIndex) -> bool {
        let Some(input) = self.page.control(card, control) else {
            return true;
        };
        let input_type = input.attr("type").unwrap_or("text").to_string();
        let required = input.has_attr("required");
        let value = field_value(input);

        self.clear_input_error(card, control);
        match validate_field(&input_type, required, &value) {
            Some(message) => {
                self.show_input_error(card, control, message);
                false
            }
            None => true,
        }
    }

    fn show_input_error(&mut self, card: CardIndex, control: ControlIndex, message: &str) {
        let Some(path) = self.control_path(card, control) else {
            return;
        };
        let Some(el) = self.page.card_mut(card) else {
            return;
        };
        let Some(group_path) = form_group_path(el, &path) else {
            return;
        };
        let id = el
            .get(&path)
            .and_then(|input| input.attr("id"))
            .unwrap_or_default()
            .to_string();
        if let Some(group) = el.get_mut(&group_path) {
            group.add_class("error");
            group.children.push(Node::Element(error_element(&id, message)));
        }
        if let Some(input) = el.get_mut(&path) {
            input.set_attr("aria-invalid", "true");
            input.set_attr("aria-describedby", &format!("error-{}", id));
        }
        self.page.rescan(card);
    }

    fn clear_input_error(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(path) = self.control_path(card, control) else {
            return;
        };
        let Some(el) = self.page.card_mut(card) else {
            return;
        };
        let Some(group_path) = form_group_path(el, &path) else {
            return;
        };
        if let Some(group) = el.get_mut(&group_path) {
            group.remove_class("error");
            group.children.retain(|child| {
                !matches!(child, Node::Element(inner) if inner.has_class("form-error"))
            });
        }
        if let Some(input) = el.get_mut(&path) {
            input.remove_attr("aria-invalid");
            input.remove_attr("aria-describedby");
        }
        self.page.rescan(card);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typing
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn type_into_field(&mut self, card: CardIndex, control: ControlIndex, ch: char) {
        let Some(input) = self.page.control_mut(card, control) else {
            return;
        };
        if is_select(input) {
            select_by_initial(input, ch);
        } else {
            let mut value = field_value(input);
            value.push(ch);
            input.set_attr("value", &value);
        }
        self.field_changed(card, control);
    }

    pub(super) fn erase_in_field(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(input) = self.page.control_mut(card, control) else {
            return;
        };
        if is_select(input) {
            return;
        }
        let mut value = field_value(input);
        if value.pop().is_none() {
            return;
        }
        input.set_attr("value", &value);
        self.field_changed(card, control);
    }

    fn field_changed(&mut self, card: CardIndex, control: ControlIndex) {
        self.clear_input_error(card, control);
        if let Some(timer) = self.forms.autosave.remove(&card) {
            self.scheduler.cancel(timer);
        }
        let timer = self
            .scheduler
            .schedule(AUTOSAVE_DELAY, TimerEvent::FormAutosave { card });
        self.forms.autosave.insert(card, timer);
    }

    /// Enter moves to the next field, or submits from the last one
    pub(super) fn enter_in_field(&mut self, card: CardIndex, control: ControlIndex) {
        let Some(input) = self.page.control_mut(card, control) else {
            return;
        };
        if is_textarea(input) {
            let mut value = field_value(input);
            value.push('\n');
            input.set_attr("value", &value);
            self.field_changed(card, control);
            return;
        }

        let fields = self.page.controls_of(card, ControlKind::Field);
        let next = fields
            .iter()
            .position(|&c| c == control)
            .and_then(|idx| fields.get(idx + 1).copied());
        match next {
            Some(next) => self.focus_control(card, next),
            None => {
                if let Some(&submit) = self.page.controls_of(card, ControlKind::Submit).first() {
                    self.click_control(card, submit);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clicks
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn click_form_control(&mut self, card: CardIndex, control: ControlIndex, kind: ControlKind) {
        match kind {
            ControlKind::Field => self.focus_control(card, control),
            ControlKind::SettingToggle => {
                if let Some(toggle) = self.page.control_mut(card, control) {
                    let checked = !toggle.has_attr("checked");
                    if checked {
                        toggle.set_attr("checked", "");
                    } else {
                        toggle.remove_attr("checked");
                    }
                    let setting = toggle.attr("id").unwrap_or("setting").to_string();
                    tracing::info!(setting, checked, "setting toggled");
                }
            }
            ControlKind::Submit => self.submit_form(card, control),
            _ => {}
        }
    }

    /// Values of the card's fields keyed by element id
    fn values_by_id(&self, card: CardIndex) -> BTreeMap<String, String> {
        self.page
            .controls_of(card, ControlKind::Field)
            .into_iter()
            .filter_map(|control| {
                let el = self.page.control(card, control)?;
                Some((el.attr("id")?.to_string(), field_value(el).trim().to_string()))
            })
            .collect()
    }

    /// Named values, the way a form submission would send them
    fn values_by_name(&self, card: CardIndex) -> BTreeMap<String, String> {
        let Some(entry) = self.page.cards.get(card) else {
            return BTreeMap::new();
        };
        entry
            .controls
            .iter()
            .enumerate()
            .filter_map(|(idx, ctl)| {
                let el = self.page.control(card, idx)?;
                let name = el.attr("name")?.to_string();
                match ctl.kind {
                    ControlKind::Field => Some((name, field_value(el))),
                    ControlKind::SettingToggle if el.has_attr("checked") => {
                        Some((name, el.attr("value").unwrap_or("on").to_string()))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    fn submit_form(&mut self, card: CardIndex, submit: ControlIndex) {
        let Some(kind) = self.form_kind(card) else {
            tracing::debug!(card, "submit outside a known form");
            return;
        };
        if let Err(message) = kind.validate(&self.values_by_id(card)) {
            let text = format!("⚠ {}", message);
            self.show_toast_for(&text, VALIDATION_TOAST, Placement::Bottom);
            return;
        }

        let Some(busy) = kind.busy_label() else {
            tracing::info!("settings saved");
            return;
        };
        if let Some(button) = self.page.control_mut(card, submit) {
            button.set_attr("disabled", "");
            button.children = vec![
                Node::Element(Element::new("div").with_attr("class", "loading-spinner")),
                Node::Text(busy.to_string()),
            ];
        }
        self.scheduler
            .schedule(SUBMIT_DELAY, TimerEvent::FormSubmitted { card });
    }

    pub(super) fn form_submitted(&mut self, card: CardIndex) {
        let Some(kind) = self.form_kind(card) else {
            return;
        };
        for submit in self.page.controls_of(card, ControlKind::Submit) {
            if let Some(button) = self.page.control_mut(card, submit) {
                button.remove_attr("disabled");
                button.set_text(kind.idle_label());
            }
        }
        if kind == FormKind::Login {
            let email = self.values_by_id(card).remove("email").unwrap_or_default();
            tracing::info!(email, "login successful");
        }
        if kind == FormKind::Contact {
            self.reset_form(card);
        }
        if let Some(message) = kind.success_toast() {
            self.show_toast_for(message, SUCCESS_TOAST, Placement::Bottom);
        }
    }

    fn reset_form(&mut self, card: CardIndex) {
        for control in self.page.controls_of(card, ControlKind::Field) {
            if let Some(input) = self.page.control_mut(card, control) {
                if is_select(input) {
                    select_first(input);
                } else {
                    input.remove_attr("value");
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Autosave
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn autosave(&mut self, card: CardIndex) {
        self.forms.autosave.remove(&card);
        let Some(title) = self.page.cards.get(card).map(|c| c.title.clone()) else {
            return;
        };
        let record = AutosaveRecord {
            data: self.values_by_name(card),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        let key = autosave_key(&title);
        let saved = serde_json::to_string(&record)
            .map_err(|e| e.to_string())
            .and_then(|json| self.store.set(&key, &json).map_err(|e| e.to_string()));
        match saved {
            Ok(()) => tracing::debug!(key, fields = record.data.len(), "form autosaved"),
            Err(e) => tracing::warn!(key, error = %e, "form autosave failed"),
        }
    }
}

/// Option elements of a select, with their values
fn options(select: &Element) -> Vec<(NodePath, String, String)> {
    select
        .find_all(|el| el.tag == "option")
        .into_iter()
        .filter_map(|path| {
            let option = select.get(&path)?;
            let label = option.text_content().trim().to_string();
            let value = option.attr("value").map(str::to_string).unwrap_or_else(|| label.clone());
            Some((path, label, value))
        })
        .collect()
}

fn choose_option(select: &mut Element, chosen: &NodePath, value: &str) {
    for (path, _, _) in options(select) {
        if let Some(option) = select.get_mut(&path) {
            if &path == chosen {
                option.set_attr("selected", "");
            } else {
                option.remove_attr("selected");
            }
        }
    }
    select.set_attr("value", value);
}

/// Pick the next option whose label starts with `ch`, the way typing does in a list box
fn select_by_initial(select: &mut Element, ch: char) {
    let opts = options(select);
    if opts.is_empty() {
        return;
    }
    let current = field_value(select);
    let start = opts
        .iter()
        .position(|(_, _, value)| *value == current)
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let wanted = ch.to_lowercase().to_string();
    let found = (0..opts.len())
        .map(|offset| &opts[(start + offset) % opts.len()])
        .find(|(_, label, _)| ch == ' ' || label.to_lowercase().starts_with(&wanted));
    if let Some((path, _, value)) = found.cloned() {
        choose_option(select, &path, &value);
    }
}

fn select_first(select: &mut Element) {
    if let Some((path, _, value)) = options(select).into_iter().next() {
        choose_option(select, &path, &value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::tests::Harness;
    use crate::model::forms::{INVALID_EMAIL, REQUIRED};
    use crate::services::storage::KeyValueStore;
    use pretty_assertions::assert_eq;

    const FORMS: &str = r#"<main>
      <div class="card card-form" data-card-type="login-form">
        <h3>Sign in</h3>
        <form class="google-form">
          <div class="form-group"><label for="email">Email</label><input class="form-input" type="email" id="email" name="email" required></div>
          <div class="form-group"><label for="password">Password</label><input class="form-input" type="password" id="password" name="password" required></div>
          <button type="submit" class="btn-primary form-submit">Sign in</button>
        </form>
      </div>
      <div class="card card-form" data-card-type="contact-form">
        <h3>Contact us</h3>
        <form class="google-form">
          <div class="form-group"><input class="form-input" id="firstName" name="firstName"></div>
          <div class="form-group"><input class="form-input" id="lastName" name="lastName"></div>
          <div class="form-group"><input class="form-input" type="email" id="contactEmail" name="email"></div>
          <div class="form-group"><select class="form-select" id="subject" name="subject"><option value="general">General</option><option value="support">Support</option><option value="sales">Sales</option></select></div>
          <div class="form-group"><textarea class="form-textarea" id="message" name="message"></textarea></div>
          <button type="submit" class="btn-primary">Send message</button>
        </form>
      </div>
      <div class="card card-form" data-card-type="settings-form">
        <h3>Settings</h3>
        <label class="toggle"><input type="checkbox" class="toggle-input" id="notifications" name="notifications"></label>
      </div>
    </main>"#;

    fn type_text(h: &mut Harness, card: CardIndex, control: ControlIndex, text: &str) {
        h.bindings.focus_control(card, control);
        for ch in text.chars() {
            h.bindings.input_char(ch);
        }
    }

    fn value(h: &Harness, card: CardIndex, control: ControlIndex) -> String {
        field_value(h.bindings.page().control(card, control).unwrap())
    }

    #[test]
    fn test_focus_marks_parent_and_blur_validates() {
        let mut h = Harness::new(FORMS);
        let email = h.control(0, ControlKind::Field);
        h.bindings.focus_control(0, email);
        let card = h.bindings.page().card(0).unwrap();
        assert!(card.find_by_class("focused").is_some());

        h.bindings.blur_control();
        let card = h.bindings.page().card(0).unwrap();
        assert!(card.find_by_class("focused").is_none());
        let error = card.find_by_class("form-error").and_then(|p| card.get(&p)).unwrap();
        assert_eq!(error.text_content(), format!("error{}", REQUIRED));
        assert!(card.find_by_class("error").is_some());
        assert_eq!(
            h.bindings.page().control(0, email).unwrap().attr("aria-invalid"),
            Some("true")
        );
    }

    #[test]
    fn test_typing_clears_error_and_autosaves_once() {
        let mut h = Harness::new(FORMS);
        let email = h.control(0, ControlKind::Field);
        type_text(&mut h, 0, email, "bad");
        h.bindings.blur_control();
        let error = |h: &Harness| {
            h.bindings.page().card(0).unwrap().find_by_class("form-error").is_some()
        };
        assert!(error(&h));
        {
            let card = h.bindings.page().card(0).unwrap();
            let path = card.find_by_class("form-error").unwrap();
            assert!(card.get(&path).unwrap().text_content().ends_with(INVALID_EMAIL));
        }

        type_text(&mut h, 0, email, "@x.io");
        assert!(!error(&h));
        h.advance(999);
        assert_eq!(h.store.borrow().get("autosave_Sign in"), None);
        h.advance(1);
        let saved = h.store.borrow().get("autosave_Sign in").unwrap();
        let record: AutosaveRecord = serde_json::from_str(&saved).unwrap();
        assert_eq!(record.data.get("email").map(String::as_str), Some("bad@x.io"));
        assert_eq!(record.data.get("password").map(String::as_str), Some(""));
    }

    #[test]
    fn test_enter_moves_to_next_then_submits() {
        let mut h = Harness::new(FORMS);
        let fields = h.bindings.page().controls_of(0, ControlKind::Field);
        type_text(&mut h, 0, fields[0], "ada@example.com");
        h.bindings.enter();
        assert_eq!(h.bindings.focused_control(), Some((0, fields[1])));
        type_text(&mut h, 0, fields[1], "correcthorse");
        h.bindings.enter();

        let submit = h.control(0, ControlKind::Submit);
        assert_eq!(h.control_text(0, submit), "Signing in...");
        assert!(h.bindings.page().control(0, submit).unwrap().has_attr("disabled"));
        h.advance(2000);
        assert_eq!(h.control_text(0, submit), "Sign in");
        assert_eq!(h.toast_text().as_deref(), Some("✓ Successfully signed in! (Demo)"));
    }

    #[test]
    fn test_submit_validation_toast() {
        let mut h = Harness::new(FORMS);
        let submit = h.control(0, ControlKind::Submit);
        h.bindings.click_control(0, submit);
        let toast = h.bindings.toast().unwrap();
        assert_eq!(toast.message, format!("⚠ {}", INVALID_EMAIL));
        assert_eq!(toast.duration, VALIDATION_TOAST);
        assert_eq!(h.control_text(0, submit), "Sign in");
    }

    #[test]
    fn test_contact_form_resets_after_send() {
        let mut h = Harness::new(FORMS);
        let fields = h.bindings.page().controls_of(1, ControlKind::Field);
        type_text(&mut h, 1, fields[0], "Ada");
        type_text(&mut h, 1, fields[1], "Lovelace");
        type_text(&mut h, 1, fields[2], "ada@example.com");
        type_text(&mut h, 1, fields[3], "s");
        assert_eq!(value(&h, 1, fields[3]), "support");
        type_text(&mut h, 1, fields[3], "s");
        assert_eq!(value(&h, 1, fields[3]), "sales");
        type_text(&mut h, 1, fields[4], "Hello");
        h.bindings.enter();
        assert_eq!(value(&h, 1, fields[4]), "Hello\n");

        let submit = h.control(1, ControlKind::Submit);
        h.bindings.click_control(1, submit);
        assert_eq!(h.control_text(1, submit), "Sending...");
        h.advance(2000);
        assert_eq!(h.toast_text().as_deref(), Some("Message sent successfully!"));
        assert_eq!(value(&h, 1, fields[0]), "");
        assert_eq!(value(&h, 1, fields[3]), "general");
    }

    #[test]
    fn test_backspace_edits_value() {
        let mut h = Harness::new(FORMS);
        let first = h.control(1, ControlKind::Field);
        type_text(&mut h, 1, first, "Adx");
        h.bindings.backspace();
        assert_eq!(value(&h, 1, first), "Ad");
    }

    #[test]
    fn test_setting_toggle_flips_checked() {
        let mut h = Harness::new(FORMS);
        let toggle = h.control(2, ControlKind::SettingToggle);
        h.bindings.click_control(2, toggle);
        assert!(h.bindings.page().control(2, toggle).unwrap().has_attr("checked"));
        h.bindings.click_control(2, toggle);
        assert!(!h.bindings.page().control(2, toggle).unwrap().has_attr("checked"));
    }
}
