//! Cosmetic preferences: theme, text direction, sidebar and font choices
//!
//! Transitions are pure (`toggled`, `with_next_*`); only the three boolean
//! flags are persisted, each under its own key.

use crate::error::Result;
use crate::storage::KeyValueStore;
use tracing::debug;

pub const SIDEBAR_VISIBLE_KEY: &str = "sidebar-visible";
pub const DARK_MODE_KEY: &str = "dark-mode";
pub const RTL_MODE_KEY: &str = "rtl-mode";

pub const FONT_SIZES: [u16; 6] = [16, 18, 20, 22, 24, 26];
pub const DEFAULT_FONT_SIZE: u16 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFamily {
    #[default]
    Lato,
    Arial,
    System,
    Serif,
}

impl FontFamily {
    pub const ALL: [FontFamily; 4] = [
        FontFamily::Lato,
        FontFamily::Arial,
        FontFamily::System,
        FontFamily::Serif,
    ];

    /// Name shown in the controls bar
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Lato => "Lato",
            FontFamily::Arial => "Arial",
            FontFamily::System => "System",
            FontFamily::Serif => "Serif",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Persisted boolean preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Sidebar,
    DarkMode,
    RtlMode,
}

impl Toggle {
    pub fn key(&self) -> &'static str {
        match self {
            Toggle::Sidebar => SIDEBAR_VISIBLE_KEY,
            Toggle::DarkMode => DARK_MODE_KEY,
            Toggle::RtlMode => RTL_MODE_KEY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub sidebar_visible: bool,
    pub dark_mode: bool,
    pub rtl_mode: bool,
    pub font_size: u16,
    pub font_family: FontFamily,
    pub show_controls: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            sidebar_visible: false,
            dark_mode: false,
            rtl_mode: false,
            font_size: DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            show_controls: true,
        }
    }
}

impl Preferences {
    /// Read the persisted flags; missing keys keep their defaults
    pub fn load(store: &impl KeyValueStore) -> Result<Self> {
        let mut prefs = Preferences::default();
        for toggle in [Toggle::Sidebar, Toggle::DarkMode, Toggle::RtlMode] {
            if let Some(raw) = store.get(toggle.key())? {
                prefs.set_flag(toggle, raw == "true");
            }
        }
        debug!(?prefs, "loaded preferences");
        Ok(prefs)
    }

    pub fn flag(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Sidebar => self.sidebar_visible,
            Toggle::DarkMode => self.dark_mode,
            Toggle::RtlMode => self.rtl_mode,
        }
    }

    fn set_flag(&mut self, toggle: Toggle, value: bool) {
        match toggle {
            Toggle::Sidebar => self.sidebar_visible = value,
            Toggle::DarkMode => self.dark_mode = value,
            Toggle::RtlMode => self.rtl_mode = value,
        }
    }

    pub fn toggled(mut self, toggle: Toggle) -> Self {
        let current = self.flag(toggle);
        self.set_flag(toggle, !current);
        self
    }

    pub fn with_controls_toggled(mut self) -> Self {
        self.show_controls = !self.show_controls;
        self
    }

    pub fn with_next_font_size(mut self) -> Self {
        let idx = FONT_SIZES
            .iter()
            .position(|s| *s == self.font_size)
            .map(|i| (i + 1) % FONT_SIZES.len())
            .unwrap_or(0);
        self.font_size = FONT_SIZES[idx];
        self
    }

    pub fn with_next_font_family(mut self) -> Self {
        self.font_family = self.font_family.next();
        self
    }

    /// Line height in pixels for the current font size
    pub fn line_height(&self) -> f32 {
        f32::from(self.font_size) * 1.5
    }

    /// Write every persisted flag that differs from `previous`
    pub fn persist_changes(
        &self,
        previous: &Preferences,
        store: &mut impl KeyValueStore,
    ) -> Result<()> {
        for toggle in [Toggle::Sidebar, Toggle::DarkMode, Toggle::RtlMode] {
            if self.flag(toggle) != previous.flag(toggle) {
                store.set(toggle.key(), bool_str(self.flag(toggle)))?;
            }
        }
        Ok(())
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert!(!prefs.sidebar_visible);
        assert!(!prefs.dark_mode);
        assert!(!prefs.rtl_mode);
        assert_eq!(prefs.font_size, 18);
        assert_eq!(prefs.font_family, FontFamily::Lato);
        assert_eq!(prefs.line_height(), 27.0);
    }

    #[test]
    fn test_toggled_is_pure() {
        let prefs = Preferences::default();
        let dark = prefs.toggled(Toggle::DarkMode);
        assert!(dark.dark_mode);
        assert!(!prefs.dark_mode);
        assert!(!dark.toggled(Toggle::DarkMode).dark_mode);
    }

    #[test]
    fn test_font_size_cycles() {
        let mut prefs = Preferences::default();
        let mut seen = Vec::new();
        for _ in 0..FONT_SIZES.len() {
            prefs = prefs.with_next_font_size();
            seen.push(prefs.font_size);
        }
        assert_eq!(seen, vec![20, 22, 24, 26, 16, 18]);
    }

    #[test]
    fn test_font_family_cycles() {
        let prefs = Preferences::default().with_next_font_family();
        assert_eq!(prefs.font_family, FontFamily::Arial);
        assert_eq!(FontFamily::Serif.next(), FontFamily::Lato);
    }

    #[test]
    fn test_persist_writes_only_changed_keys() {
        let mut store = MemoryStore::new();
        let before = Preferences::default();
        let after = before.toggled(Toggle::RtlMode);
        after.persist_changes(&before, &mut store).unwrap();

        assert_eq!(store.get(RTL_MODE_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(store.get(DARK_MODE_KEY).unwrap(), None);
        assert_eq!(store.get(SIDEBAR_VISIBLE_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_round_trip() {
        let mut store = MemoryStore::new();
        let before = Preferences::default();
        let after = before.toggled(Toggle::Sidebar).toggled(Toggle::DarkMode);
        after.persist_changes(&before, &mut store).unwrap();

        let loaded = Preferences::load(&store).unwrap();
        assert!(loaded.sidebar_visible);
        assert!(loaded.dark_mode);
        assert!(!loaded.rtl_mode);
    }

    #[test]
    fn test_load_non_true_values_are_false() {
        let mut store = MemoryStore::new();
        store.set(DARK_MODE_KEY, "yes").unwrap();
        store.set(RTL_MODE_KEY, "TRUE").unwrap();
        let loaded = Preferences::load(&store).unwrap();
        assert!(!loaded.dark_mode);
        assert!(!loaded.rtl_mode);
    }
}
