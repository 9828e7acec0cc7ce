use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    /// Tinted band behind alternating sections (projects, contact).
    SectionBand,
    Surface,
    SurfaceHover,
    Border,

    TextPrimary,
    TextSecondary,
    TextMuted,
    Accent,

    // Side navigation
    NavActive,
    NavInactive,
    ToggleBackground,

    // Badges
    BadgeActive,
    BadgeOutline,

    // Buttons
    ButtonPrimary,
    ButtonPrimaryText,

    // Decoration
    Cursor,
    Particle,
    FloatingDot,
    SkillGlow,
}

/// Which palette the renderer resolves tokens against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Parse `"dark"` / `"light"` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
        }
    }
}
