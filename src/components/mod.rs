//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod card_view;
pub mod code_highlight;
pub mod code_modal;
pub mod help_dialog;
pub mod layout;
pub mod overlays;
pub mod palette;
pub mod quit_dialog;
pub mod showcase;

pub use code_modal::{CodeModalView, ModalHit};
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use overlays::{draw_toast, draw_tooltip};
pub use palette::Palette;
pub use quit_dialog::QuitDialog;
pub use showcase::{draw_showcase, Hit, ShowcaseComponent, ShowcaseRenderContext};
