use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::storage::THEME_KEY;
use crate::context::storage::KeyValueStore;
use crate::error::BotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(BotError::Config(format!("Unknown theme: {other}"))),
        }
    }
}

/// Process-wide theme choice, written through to storage on every change.
pub struct ThemePreference {
    storage: Arc<dyn KeyValueStore>,
    theme: Theme,
}

impl ThemePreference {
    /// Rehydrate from storage; absent or unrecognised values mean light.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let theme = storage
            .get(THEME_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Self { storage, theme }
    }

    pub fn get(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = self.persist() {
            tracing::warn!("Failed to persist theme: {e}");
        }
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled());
        self.theme
    }

    pub fn persist(&self) -> Result<(), BotError> {
        self.storage.set(THEME_KEY, self.theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::storage::MemoryStore;

    #[test]
    fn test_defaults_to_light() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        assert_eq!(ThemePreference::load(storage.clone()).get(), Theme::Light);

        storage.set(THEME_KEY, "solarized").unwrap();
        assert_eq!(ThemePreference::load(storage).get(), Theme::Light);
    }

    #[test]
    fn test_set_persists_immediately() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut pref = ThemePreference::load(storage.clone());

        pref.set(Theme::Dark);
        assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(ThemePreference::load(storage.clone()).get(), Theme::Dark);

        assert_eq!(pref.toggle(), Theme::Light);
        assert_eq!(storage.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" light\n".parse::<Theme>().unwrap(), Theme::Light);
        assert!("Dark".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
