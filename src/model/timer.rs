//! Delayed page transitions
//!
//! Every timer the bindings schedule carries one of these events. Events that
//! belong to a single-owner widget (toast, tooltip, copy label, banner) carry
//! the owner's token; the handler ignores them once the token is stale.

/// Index of a card in [`Page::cards`](crate::model::page::Page)
pub type CardIndex = usize;

/// Index of a control in its card's control list
pub type ControlIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    // ─────────────────────────────────────────────────────────────────────────
    // Toast
    // ─────────────────────────────────────────────────────────────────────────
    ToastShow(u64),
    ToastFade(u64),
    ToastRemove(u64),

    // ─────────────────────────────────────────────────────────────────────────
    // Code modal
    // ─────────────────────────────────────────────────────────────────────────
    /// Highlighter pass for the given open generation
    Highlight(u64),
    CopyRevert(u64),

    // ─────────────────────────────────────────────────────────────────────────
    // Tooltip
    // ─────────────────────────────────────────────────────────────────────────
    TooltipPosition(u64),
    TooltipReveal(u64),
    TooltipRemove(u64),

    // ─────────────────────────────────────────────────────────────────────────
    // Buttons and card effects
    // ─────────────────────────────────────────────────────────────────────────
    CartAdded {
        card: CardIndex,
        control: ControlIndex,
    },
    CartReset {
        card: CardIndex,
        control: ControlIndex,
    },
    SocialPressEnd {
        card: CardIndex,
        control: ControlIndex,
    },
    TiltSettled {
        card: CardIndex,
    },
    TouchRelease {
        card: CardIndex,
    },
    /// Entrance fade for a card that scrolled into view
    CardEntered {
        card: CardIndex,
    },
    ThemeTransitionEnd,

    // ─────────────────────────────────────────────────────────────────────────
    // Forms
    // ─────────────────────────────────────────────────────────────────────────
    FormAutosave {
        card: CardIndex,
    },
    FormSubmitted {
        card: CardIndex,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Chat assistant
    // ─────────────────────────────────────────────────────────────────────────
    ChatWelcome {
        card: CardIndex,
    },
    /// Start answering: show the typing indicator
    ChatRespond {
        card: CardIndex,
        message: String,
    },
    /// Replace the typing indicator with the answer
    ChatReply {
        card: CardIndex,
        message: String,
    },
    VoiceTimeout {
        card: CardIndex,
    },
    AssistantHighlightEnd {
        card: CardIndex,
    },
    AssistantOpenCode {
        card: CardIndex,
    },
    AssistantPulseEnd,

    // ─────────────────────────────────────────────────────────────────────────
    // Repository panel
    // ─────────────────────────────────────────────────────────────────────────
    RepoCounterFrame,
    RepoBarsGrow,
    RepoBannerExpire(u64),
}
