//! External service interactions
//!
//! This module contains the collaborators the bindings talk to:
//! - Virtual timer queue
//! - Local key/value store
//! - System clipboard
//! - GitHub repository API

pub mod clipboard;
pub mod github;
pub mod scheduler;
pub mod storage;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard};
pub use github::{FetchError, HttpRepoApi, LoadOutcome, RepoApi, RepoLoader};
pub use scheduler::{Clock, ManualClock, Scheduler, SystemClock, TimerId};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
