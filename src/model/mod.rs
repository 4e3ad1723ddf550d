//! Model layer - page and widget state
//!
//! This module contains the state the bindings work on:
//! - `Page` - The parsed showcase with its cards and controls
//! - `CodeModal` - Code inspection modal
//! - `Toaster` / `TooltipController` - Transient overlays
//! - `ModalStack` - App-level overlay management

pub mod chat;
pub mod code_view;
pub mod forms;
pub mod modal;
pub mod page;
pub mod repo;
pub mod theme;
pub mod timer;
pub mod toast;
pub mod tooltip;
pub mod widgets;

// Re-export commonly used types
pub use code_view::{CodeModal, CodeTab, ModalState};
pub use page::{Card, Control, ControlKind, Page};
pub use theme::Theme;
pub use timer::{CardIndex, ControlIndex, TimerEvent};
pub use toast::{Placement, Toaster};
pub use widgets::WidgetSet;
