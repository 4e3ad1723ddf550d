//! Light/dark theme flag

use crate::services::storage::{KeyValueStore, StorageError};
use std::fmt;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything other than `"dark"` reads as light
    pub fn parse(value: &str) -> Theme {
        if value == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn load(store: &dyn KeyValueStore) -> Theme {
        store
            .get(THEME_KEY)
            .map(|v| Theme::parse(&v))
            .unwrap_or_default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(THEME_KEY, self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStore;

    #[test]
    fn test_default_is_light() {
        assert_eq!(Theme::load(&MemoryStore::new()), Theme::Light);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        Theme::Dark.save(&mut store).unwrap();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store), Theme::Dark);
    }

    #[test]
    fn test_unknown_value_reads_light() {
        assert_eq!(Theme::parse("solarized"), Theme::Light);
    }
}
