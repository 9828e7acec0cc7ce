use folio_protocol::{HitTarget, Portfolio, Rect, RenderCommand, SectionId, ThemeMode, ThemeToken};

use super::{FONT_BODY, FONT_CAPTION, FONT_TITLE, NAV_WIDTH, ViewContext, rect_cmd, text_cmd};
use crate::model::PageSnapshot;
use crate::text;

/// The fixed navigation rail: logo, one entry per section, social links.
pub fn rail(
    portfolio: &Portfolio,
    snapshot: &PageSnapshot,
    ctx: &ViewContext,
) -> Vec<RenderCommand> {
    let height = ctx.viewport.height;
    let inner = (NAV_WIDTH - 2.0) as usize;
    let mut cmds = vec![rect_cmd(
        Rect::new(0.0, 0.0, NAV_WIDTH, height),
        ThemeToken::Background,
        Some(ThemeToken::Border),
        None,
        None,
    )];

    cmds.push(text_cmd(
        1.0,
        1.0,
        text::truncate(&portfolio.meta.initials, inner),
        ThemeToken::TextPrimary,
        FONT_TITLE,
    ));

    let mut y = 4.0;
    for section in SectionId::ALL {
        let active = snapshot.active_section == section;
        let row = Rect::new(0.0, y, NAV_WIDTH, 1.0);
        cmds.push(rect_cmd(
            row,
            if active {
                ThemeToken::Surface
            } else {
                ThemeToken::Background
            },
            None,
            Some(section.label().into()),
            Some(HitTarget::Nav(section)),
        ));
        cmds.push(text_cmd(
            1.0,
            y,
            text::truncate(section.label(), inner),
            if active {
                ThemeToken::NavActive
            } else {
                ThemeToken::NavInactive
            },
            FONT_BODY,
        ));
        y += 2.0;
    }

    // Socials sit at the foot of the rail unless they would overlap the menu.
    let socials = portfolio.socials.len() as f64;
    let mut y = (height - socials - 1.0).max(y);
    for social in &portfolio.socials {
        cmds.push(rect_cmd(
            Rect::new(0.0, y, NAV_WIDTH, 1.0),
            ThemeToken::Background,
            None,
            Some(social.label.clone()),
            Some(HitTarget::Link(social.url.clone())),
        ));
        cmds.push(text_cmd(
            1.0,
            y,
            text::truncate(&social.label, inner),
            ThemeToken::TextMuted,
            FONT_CAPTION,
        ));
        y += 1.0;
    }
    cmds
}

/// Light/dark switch pinned to the top-right corner. Shows the mode a
/// click switches to.
pub fn theme_toggle(snapshot: &PageSnapshot, ctx: &ViewContext) -> Vec<RenderCommand> {
    let glyph = match snapshot.theme {
        ThemeMode::Dark => "☀",
        ThemeMode::Light => "☾",
    };
    let rect = Rect::new(ctx.viewport.width - 5.0, 1.0, 3.0, 1.0);
    vec![
        rect_cmd(
            rect,
            ThemeToken::ToggleBackground,
            Some(ThemeToken::Border),
            Some("Toggle theme".into()),
            Some(HitTarget::ThemeToggle),
        ),
        text_cmd(rect.x + 1.0, rect.y, glyph, ThemeToken::TextPrimary, FONT_BODY),
    ]
}
