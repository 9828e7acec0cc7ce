use egui::Color32;
use folio_protocol::{ThemeMode, ThemeToken};

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> Color32 {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
    .to_color32()
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(0x00, 0x00, 0x00),
        SectionBand => ResolvedColor::rgba(0x11, 0x18, 0x27, 0x4d), // gray-900/30
        Surface => ResolvedColor::rgba(0x11, 0x18, 0x27, 0x80),     // gray-900/50
        SurfaceHover => ResolvedColor::rgb(0x1f, 0x29, 0x37),
        Border => ResolvedColor::rgb(0x1f, 0x29, 0x37),

        TextPrimary => ResolvedColor::rgb(0xff, 0xff, 0xff),
        TextSecondary => ResolvedColor::rgb(0xd1, 0xd5, 0xdb),
        TextMuted => ResolvedColor::rgb(0x9c, 0xa3, 0xaf),
        Accent => ResolvedColor::rgb(0x60, 0xa5, 0xfa),

        NavActive => ResolvedColor::rgb(0xff, 0xff, 0xff),
        NavInactive => ResolvedColor::rgb(0x6b, 0x72, 0x80),
        ToggleBackground => ResolvedColor::rgb(0x1f, 0x29, 0x37),

        BadgeActive => ResolvedColor::rgb(0xff, 0xff, 0xff),
        BadgeOutline => ResolvedColor::rgb(0x6b, 0x72, 0x80),

        ButtonPrimary => ResolvedColor::rgb(0xff, 0xff, 0xff),
        ButtonPrimaryText => ResolvedColor::rgb(0x00, 0x00, 0x00),

        Cursor => ResolvedColor::rgb(0xff, 0xff, 0xff),
        Particle => ResolvedColor::rgba(0x60, 0xa5, 0xfa, 0x4d),
        FloatingDot => ResolvedColor::rgba(0xff, 0xff, 0xff, 0x80),
        SkillGlow => ResolvedColor::rgba(0x60, 0xa5, 0xfa, 0x26),
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(0xff, 0xff, 0xff),
        SectionBand => ResolvedColor::rgba(0xf9, 0xfa, 0xfb, 0x80), // gray-50/50
        Surface => ResolvedColor::rgb(0xf9, 0xfa, 0xfb),
        SurfaceHover => ResolvedColor::rgb(0xf3, 0xf4, 0xf6),
        Border => ResolvedColor::rgb(0xe5, 0xe7, 0xeb),

        TextPrimary => ResolvedColor::rgb(0x00, 0x00, 0x00),
        TextSecondary => ResolvedColor::rgb(0x37, 0x41, 0x51),
        TextMuted => ResolvedColor::rgb(0x4b, 0x55, 0x63),
        Accent => ResolvedColor::rgb(0x25, 0x63, 0xeb),

        NavActive => ResolvedColor::rgb(0x00, 0x00, 0x00),
        NavInactive => ResolvedColor::rgb(0x6b, 0x72, 0x80),
        ToggleBackground => ResolvedColor::rgb(0xf3, 0xf4, 0xf6),

        BadgeActive => ResolvedColor::rgb(0x00, 0x00, 0x00),
        BadgeOutline => ResolvedColor::rgb(0xd1, 0xd5, 0xdb),

        ButtonPrimary => ResolvedColor::rgb(0x00, 0x00, 0x00),
        ButtonPrimaryText => ResolvedColor::rgb(0xff, 0xff, 0xff),

        Cursor => ResolvedColor::rgb(0x00, 0x00, 0x00),
        Particle => ResolvedColor::rgba(0x25, 0x63, 0xeb, 0x4d),
        FloatingDot => ResolvedColor::rgba(0x00, 0x00, 0x00, 0x80),
        SkillGlow => ResolvedColor::rgba(0x25, 0x63, 0xeb, 0x26),
    }
}

/// egui widget visuals to go with the page theme.
pub fn visuals(mode: ThemeMode) -> egui::Visuals {
    let mut v = match mode {
        ThemeMode::Dark => egui::Visuals::dark(),
        ThemeMode::Light => egui::Visuals::light(),
    };
    v.panel_fill = resolve(ThemeToken::Background, mode);
    v.extreme_bg_color = resolve(ThemeToken::Background, mode);
    v.hyperlink_color = resolve(ThemeToken::Accent, mode);
    v.selection.stroke = egui::Stroke::new(1.0, resolve(ThemeToken::Accent, mode));
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_contrasts_with_background() {
        for mode in [ThemeMode::Dark, ThemeMode::Light] {
            assert_ne!(
                resolve(ThemeToken::TextPrimary, mode),
                resolve(ThemeToken::Background, mode)
            );
        }
    }

    #[test]
    fn washes_are_translucent() {
        for token in [ThemeToken::SkillGlow, ThemeToken::Particle] {
            assert!(resolve(token, ThemeMode::Dark).a() < 255);
        }
        assert_eq!(resolve(ThemeToken::Cursor, ThemeMode::Light).a(), 255);
    }
}
