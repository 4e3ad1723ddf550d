//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::code_view::CodeTab;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick: runs due timers and polls background work
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Terminal window lost focus
    FocusLost,
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Card Navigation
    // ─────────────────────────────────────────────────────────────────────────
    NextCard,
    PrevCard,
    /// Move one grid row down
    CardBelow,
    /// Move one grid row up
    CardAbove,
    FirstCard,
    LastCard,
    /// Focus the next control in the selected card
    NextControl,
    /// Focus the previous control in the selected card
    PrevControl,
    /// Scroll the grid by whole rows
    ScrollGrid(i32),

    // ─────────────────────────────────────────────────────────────────────────
    // Card Interaction
    // ─────────────────────────────────────────────────────────────────────────
    /// Enter/Space on the selected card with nothing focused
    ActivateCard,
    /// Enter on the focused control
    Submit,
    /// Escape outside the code modal
    Escape,
    /// A typed character for the focused field
    Input(char),
    Backspace,
    ToggleTheme,
    /// Open the code modal on the selected card
    OpenCode,

    // ─────────────────────────────────────────────────────────────────────────
    // Pointer
    // ─────────────────────────────────────────────────────────────────────────
    /// Pointer moved to a screen cell
    PointerMoved { column: u16, row: u16 },
    /// Primary button pressed on a screen cell
    PointerDown { column: u16, row: u16 },
    /// Primary button released
    PointerUp,

    // ─────────────────────────────────────────────────────────────────────────
    // Code Modal
    // ─────────────────────────────────────────────────────────────────────────
    CodeTab(CodeTab),
    CodeNextTab,
    CodePrevTab,
    CodeScroll(i32),
    CodeCopy,
    CodeClose,
    /// Move keyboard focus between the modal's tabs and buttons
    CodeFocusNext,
    /// Enter on the focused modal control
    CodeActivate,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Toggle the key reference
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Confirm action in modal
    ConfirmModal,
    /// Scroll the current modal
    ModalUp,
    ModalDown,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::Input(c) => write!(f, "Input({})", c),
            Action::CodeTab(tab) => write!(f, "CodeTab({})", tab.label()),
            Action::PointerMoved { column, row } => write!(f, "PointerMoved({}, {})", column, row),
            Action::PointerDown { column, row } => write!(f, "PointerDown({}, {})", column, row),
            _ => write!(f, "{:?}", self),
        }
    }
}
