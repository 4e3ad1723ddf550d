//! Assistant card: chat input, quick actions, voice button and replies

use super::Bindings;
use crate::dom::{Element, Node};
use crate::model::chat::{self, AssistantEffect, ChatResponses, PageSummary};
use crate::model::page::ControlKind;
use crate::model::timer::{CardIndex, ControlIndex, TimerEvent};
use std::time::Duration;

const WELCOME_DELAY: Duration = Duration::from_millis(1000);
const SEND_DELAY: Duration = Duration::from_millis(1500);
const QUICK_DELAY: Duration = Duration::from_millis(1000);
const TYPING: Duration = Duration::from_millis(2000);
const VOICE_LISTEN: Duration = Duration::from_millis(3000);
const VOICE_DELAY: Duration = Duration::from_millis(1000);
const HIGHLIGHT: Duration = Duration::from_millis(3000);
const OPEN_CODE_DELAY: Duration = Duration::from_millis(1500);
const PULSE: Duration = Duration::from_millis(3000);

const STATUS_READY: &str = "Online - Ready to help";
const STATUS_LISTENING: &str = "Listening...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    fn class(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Sender::User => "person",
            Sender::Ai => "smart_toy",
        }
    }
}

pub(super) struct ChatState {
    card: CardIndex,
    responses: ChatResponses,
    listening: bool,
}

fn message_element(sender: Sender, text: &str, time: &str) -> Element {
    let avatar_class = match sender {
        Sender::Ai => "message-avatar ai-avatar-small",
        Sender::User => "message-avatar",
    };
    Element::new("div")
        .with_attr("class", &format!("chat-message {}", sender.class()))
        .with_child(Node::Element(
            Element::new("div").with_attr("class", avatar_class).with_child(Node::Element(
                Element::new("i")
                    .with_attr("class", "material-icons")
                    .with_text(sender.icon()),
            )),
        ))
        .with_child(Node::Element(
            Element::new("div")
                .with_attr("class", "message-content")
                .with_child(Node::Element(Element::new("p").with_text(text)))
                .with_child(Node::Element(
                    Element::new("span")
                        .with_attr("class", "message-time")
                        .with_text(time),
                )),
        ))
}

fn typing_element() -> Element {
    let dot = || Node::Element(Element::new("span"));
    Element::new("div")
        .with_attr("class", "chat-message ai typing-message")
        .with_child(Node::Element(
            Element::new("div")
                .with_attr("class", "message-avatar ai-avatar-small")
                .with_child(Node::Element(
                    Element::new("i")
                        .with_attr("class", "material-icons")
                        .with_text("smart_toy"),
                )),
        ))
        .with_child(Node::Element(
            Element::new("div")
                .with_attr("class", "message-content")
                .with_child(Node::Element(
                    Element::new("div")
                        .with_attr("class", "typing-indicator")
                        .with_child(dot())
                        .with_child(dot())
                        .with_child(dot()),
                )),
        ))
}

/// A rendered chat line: who said it, what, and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub sender: Sender,
    pub text: String,
    pub time: String,
}

/// Messages in a `.chat-container`, oldest first; `None` marks the typing indicator
pub fn chat_lines(container: &Element) -> Vec<Option<ChatLine>> {
    container
        .child_elements()
        .filter(|el| el.has_class("chat-message"))
        .map(|el| {
            if el.has_class("typing-message") {
                return None;
            }
            let sender = if el.has_class("user") {
                Sender::User
            } else {
                Sender::Ai
            };
            let text = el
                .find_by_tag("p")
                .map(|p| p.text_content())
                .unwrap_or_default();
            let time = el
                .find_by_class("message-time")
                .and_then(|p| el.get(&p))
                .map(|t| t.text_content())
                .unwrap_or_default();
            Some(ChatLine { sender, text, time })
        })
        .collect()
}

impl Bindings {
    pub(super) fn attach_chat(&mut self, responses: ChatResponses) {
        let Some(card) = self.page.find_card(|el| el.has_class("ai-assistant-card")) else {
            return;
        };
        for input in self.page.controls_of(card, ControlKind::ChatInput) {
            if let Some(el) = self.page.control_mut(card, input) {
                el.remove_attr("disabled");
                el.set_attr("tabindex", "0");
            }
        }
        self.chat = Some(ChatState {
            card,
            responses,
            listening: false,
        });
        self.scheduler
            .schedule(WELCOME_DELAY, TimerEvent::ChatWelcome { card });
        tracing::debug!(card, "assistant attached");
    }

    /// The assistant card's messages, for rendering
    pub fn chat_transcript(&self) -> Vec<Option<ChatLine>> {
        let Some(card) = self.chat.as_ref().map(|c| c.card) else {
            return Vec::new();
        };
        self.page
            .card(card)
            .and_then(|el| el.find_by_class("chat-container").and_then(|p| el.get(&p)))
            .map(chat_lines)
            .unwrap_or_default()
    }

    pub fn is_listening(&self) -> bool {
        self.chat.as_ref().is_some_and(|c| c.listening)
    }

    fn chat_container_mut(&mut self, card: CardIndex) -> Option<&mut Element> {
        let el = self.page.card_mut(card)?;
        let path = el.find_by_class("chat-container")?;
        el.get_mut(&path)
    }

    fn add_message(&mut self, card: CardIndex, sender: Sender, text: &str) {
        let time = chrono::Local::now().format("%H:%M").to_string();
        if let Some(container) = self.chat_container_mut(card) {
            container
                .children
                .push(Node::Element(message_element(sender, text, &time)));
        }
        tracing::debug!(sender = sender.class(), "chat message");
    }

    fn set_status(&mut self, card: CardIndex, listening: bool) {
        self.set_status_text(card, listening);
        self.set_voice_button(card, listening);
        self.with_part(card, "status-dot", |dot| {
            if listening {
                dot.add_class("active");
            } else {
                dot.remove_class("active");
            }
        });
    }

    fn set_status_text(&mut self, card: CardIndex, listening: bool) {
        self.with_part(card, "ai-status", |status| {
            let last_span = status
                .children
                .iter_mut()
                .rev()
                .find_map(|child| match child {
                    Node::Element(inner) if inner.tag == "span" => Some(inner),
                    _ => None,
                });
            if let Some(span) = last_span {
                span.set_text(if listening {
                    STATUS_LISTENING
                } else {
                    STATUS_READY
                });
            }
        });
    }

    fn set_voice_button(&mut self, card: CardIndex, listening: bool) {
        self.with_part(card, "voice-btn", |voice| {
            if listening {
                voice.add_class("active");
            } else {
                voice.remove_class("active");
            }
        });
    }

    /// Apply `f` to the first element of `card` carrying `class`
    fn with_part(&mut self, card: CardIndex, class: &str, f: impl FnOnce(&mut Element)) {
        let Some(el) = self.page.card_mut(card) else {
            return;
        };
        if let Some(path) = el.find_by_class(class) {
            if let Some(part) = el.get_mut(&path) {
                f(part);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn type_into_chat(&mut self, card: CardIndex, control: ControlIndex, ch: char) {
        if let Some(input) = self.page.control_mut(card, control) {
            let mut value = input.attr("value").unwrap_or_default().to_string();
            value.push(ch);
            input.set_attr("value", &value);
        }
    }

    pub(super) fn erase_in_chat(&mut self, card: CardIndex, control: ControlIndex) {
        if let Some(input) = self.page.control_mut(card, control) {
            let mut value = input.attr("value").unwrap_or_default().to_string();
            if value.pop().is_some() {
                input.set_attr("value", &value);
            }
        }
    }

    pub(super) fn click_chat_control(&mut self, card: CardIndex, control: ControlIndex, kind: ControlKind) {
        match kind {
            ControlKind::ChatSend => self.send_chat(card),
            ControlKind::Quick => {
                let Some(action) = self.page.control(card, control).map(|el| el.text_content())
                else {
                    return;
                };
                let action = action.trim().to_string();
                self.add_message(card, Sender::User, &action);
                self.scheduler.schedule(
                    QUICK_DELAY,
                    TimerEvent::ChatRespond {
                        card,
                        message: action,
                    },
                );
            }
            ControlKind::Voice => self.toggle_voice(card),
            _ => {}
        }
    }

    /// Send whatever is typed in the chat input
    pub(super) fn send_chat(&mut self, card: CardIndex) {
        let Some(input) = self.page.controls_of(card, ControlKind::ChatInput).first().copied()
        else {
            return;
        };
        let message = self
            .page
            .control(card, input)
            .and_then(|el| el.attr("value"))
            .unwrap_or_default()
            .trim()
            .to_string();
        if message.is_empty() {
            return;
        }
        self.add_message(card, Sender::User, &message);
        if let Some(el) = self.page.control_mut(card, input) {
            el.remove_attr("value");
        }
        self.scheduler
            .schedule(SEND_DELAY, TimerEvent::ChatRespond { card, message });
    }

    fn toggle_voice(&mut self, card: CardIndex) {
        let Some(chat) = self.chat.as_mut() else {
            return;
        };
        chat.listening = !chat.listening;
        let listening = chat.listening;
        self.set_status(card, listening);
        if listening {
            self.scheduler
                .schedule(VOICE_LISTEN, TimerEvent::VoiceTimeout { card });
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timers
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn chat_welcome(&mut self, card: CardIndex) {
        let Some(text) = self.chat.as_ref().map(|chat| {
            let summary = PageSummary::analyze(&self.page);
            chat::welcome(&chat.responses, &summary)
        }) else {
            return;
        };
        self.add_message(card, Sender::Ai, &text);
    }

    /// A voice session ends: post the canned question if still listening
    pub(super) fn voice_timeout(&mut self, card: CardIndex) {
        let Some(chat) = self.chat.as_mut() else {
            return;
        };
        let was_listening = chat.listening;
        chat.listening = false;
        let prompt = chat.responses.voice_prompt.clone();
        if was_listening {
            self.add_message(card, Sender::User, &prompt);
            self.scheduler.schedule(
                VOICE_DELAY,
                TimerEvent::ChatRespond {
                    card,
                    message: String::new(),
                },
            );
        }
        // The status dot keeps its state until the voice button is pressed again
        self.set_status_text(card, false);
        self.set_voice_button(card, false);
    }

    pub(super) fn chat_respond(&mut self, card: CardIndex, message: String) {
        if let Some(container) = self.chat_container_mut(card) {
            container.children.push(Node::Element(typing_element()));
        }
        self.scheduler
            .schedule(TYPING, TimerEvent::ChatReply { card, message });
    }

    pub(super) fn chat_reply(&mut self, card: CardIndex, message: &str) {
        if let Some(container) = self.chat_container_mut(card) {
            // Only the oldest indicator goes; a second pending reply keeps its own
            if let Some(idx) = container.children.iter().position(
                |child| matches!(child, Node::Element(el) if el.has_class("typing-message")),
            ) {
                container.children.remove(idx);
            }
        }

        let Some(reply) = self.chat.as_ref().map(|chat| {
            let summary = PageSummary::analyze(&self.page);
            chat::respond(&chat.responses, &summary, message)
        }) else {
            return;
        };
        tracing::debug!(message, effect = ?reply.effect, "assistant reply");

        match reply.effect {
            Some(AssistantEffect::ShowCode(target)) => self.highlight_card(target),
            Some(AssistantEffect::PulseThemeToggle) => {
                self.theme_pulse = true;
                self.scheduler.schedule(PULSE, TimerEvent::AssistantPulseEnd);
            }
            None => {}
        }
        self.add_message(card, Sender::Ai, &reply.text);
    }

    fn highlight_card(&mut self, target: CardIndex) {
        for card in self.page.cards_with_class("ai-highlighted") {
            if let Some(el) = self.page.card_mut(card) {
                el.remove_class("ai-highlighted");
            }
        }
        let Some(el) = self.page.card_mut(target) else {
            return;
        };
        el.add_class("ai-highlighted");
        self.scheduler
            .schedule(HIGHLIGHT, TimerEvent::AssistantHighlightEnd { card: target });
        self.scheduler
            .schedule(OPEN_CODE_DELAY, TimerEvent::AssistantOpenCode { card: target });
    }

    pub(super) fn assistant_highlight_end(&mut self, card: CardIndex) {
        if let Some(el) = self.page.card_mut(card) {
            el.remove_class("ai-highlighted");
        }
    }

    /// Card the assistant is pointing at, if any
    pub fn highlighted_card(&self) -> Option<CardIndex> {
        self.page.cards_with_class("ai-highlighted").first().copied()
    }
}
