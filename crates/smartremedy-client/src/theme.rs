//! Light/dark theme preference, persisted under its own storage key.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, warn};

use crate::storage::KeyValueStore;

/// Storage key holding the theme.
pub const THEME_KEY: &str = "meu_dash_theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// CSS class put on `<body>`.
    pub fn body_class(&self) -> &'static str {
        match self {
            Self::Light => "light-mode",
            Self::Dark => "",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme {other:?}")),
        }
    }
}

pub struct ThemePreference {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Theme>,
}

impl ThemePreference {
    /// Read the stored theme once; anything unreadable falls back to dark.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let theme = match store.get(THEME_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "ignoring stored theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                error!(error = %e, "failed to read theme from storage");
                Theme::default()
            }
        };
        Self { store, current: RwLock::new(theme) }
    }

    pub async fn current(&self) -> Theme {
        *self.current.read().await
    }

    /// Flip the theme. The switch applies even if persisting it fails.
    pub async fn toggle(&self) -> Theme {
        let next = {
            let mut current = self.current.write().await;
            *current = current.toggled();
            *current
        };
        if let Err(e) = self.store.set(THEME_KEY, next.as_str()).await {
            error!(error = %e, "failed to save theme to storage");
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn defaults_to_dark() {
        let pref = ThemePreference::load(Arc::new(MemoryStore::new())).await;
        assert_eq!(pref.current().await, Theme::Dark);
    }

    #[tokio::test]
    async fn invalid_stored_value_ignored() {
        let store = Arc::new(MemoryStore::with_entries([(THEME_KEY, "sepia")]));
        let pref = ThemePreference::load(store).await;
        assert_eq!(pref.current().await, Theme::Dark);
    }

    #[tokio::test]
    async fn toggle_persists_new_theme() {
        let store = Arc::new(MemoryStore::with_entries([(THEME_KEY, "light")]));
        let pref = ThemePreference::load(store.clone()).await;
        assert_eq!(pref.current().await, Theme::Light);

        assert_eq!(pref.toggle().await, Theme::Dark);
        assert_eq!(store.get(THEME_KEY).await.unwrap().as_deref(), Some("dark"));
        assert_eq!(pref.toggle().await, Theme::Light);
    }

    #[test]
    fn light_theme_sets_body_class() {
        assert_eq!(Theme::Light.body_class(), "light-mode");
        assert_eq!(Theme::Dark.body_class(), "");
    }
}
