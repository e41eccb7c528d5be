use std::fmt;
use std::str::FromStr;

/// Color scheme used for every pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

/// Which panes are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    Split,
    EditorOnly,
    PreviewOnly,
}

impl ViewMode {
    /// The next mode in the F3 cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Split => Self::EditorOnly,
            Self::EditorOnly => Self::PreviewOnly,
            Self::PreviewOnly => Self::Split,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::EditorOnly => "editor",
            Self::PreviewOnly => "preview",
        }
    }

    pub const fn shows_editor(self) -> bool {
        matches!(self, Self::Split | Self::EditorOnly)
    }

    pub const fn shows_preview(self) -> bool {
        matches!(self, Self::Split | Self::PreviewOnly)
    }
}

/// 1-based cursor location in the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorPosition {
    line: usize,
    column: usize,
}

impl CursorPosition {
    /// Values below 1 are raised to 1.
    pub const fn new(line: usize, column: usize) -> Self {
        Self {
            line: if line == 0 { 1 } else { line },
            column: if column == 0 { 1 } else { column },
        }
    }

    pub const fn line(&self) -> usize {
        self.line
    }

    pub const fn column(&self) -> usize {
        self.column
    }
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Keys of the persisted fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Text,
    Title,
    Theme,
    SplitRatio,
}

impl StorageKey {
    pub const ALL: [Self; 4] = [Self::Text, Self::Title, Self::Theme, Self::SplitRatio];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "zenmark-editor-content",
            Self::Title => "zenmark-editor-title",
            Self::Theme => "zenmark-editor-theme",
            Self::SplitRatio => "zenmark-editor-split-position",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle_twice_is_identity() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(theme.toggled().toggled(), theme);
            assert_ne!(theme.toggled(), theme);
        }
    }

    #[test]
    fn test_theme_parse_roundtrip() {
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!(Theme::Dark.as_str().parse::<Theme>(), Ok(Theme::Dark));
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn test_view_mode_cycle_visits_all_modes() {
        let mode = ViewMode::Split;
        assert_eq!(mode.next(), ViewMode::EditorOnly);
        assert_eq!(mode.next().next(), ViewMode::PreviewOnly);
        assert_eq!(mode.next().next().next(), ViewMode::Split);
        assert!(!ViewMode::EditorOnly.shows_preview());
        assert!(!ViewMode::PreviewOnly.shows_editor());
    }

    #[test]
    fn test_cursor_position_is_at_least_one() {
        let pos = CursorPosition::new(0, 0);
        assert_eq!((pos.line(), pos.column()), (1, 1));
        let pos = CursorPosition::new(4, 9);
        assert_eq!((pos.line(), pos.column()), (4, 9));
    }
}
