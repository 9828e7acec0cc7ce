use folio_protocol::{
    HitTarget, JobStatus, Point, Portfolio, Project, ProjectStatus, Rect, RenderCommand,
    SectionId, SharedStr, ThemeToken,
};

use super::{
    Column, FONT_BODY, FONT_CAPTION, FONT_DISPLAY, FONT_HEADING, FONT_TITLE, NAV_WIDTH,
    ViewContext, decor, rect_cmd, text_cmd,
};
use crate::model::PageSnapshot;
use crate::text;

/// A rendered section in section-local coordinates (y = 0 is its top edge).
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub commands: Vec<RenderCommand>,
    pub height: f64,
}

/// Whether `section` has content to show. The intro always renders.
pub fn is_rendered(section: SectionId, portfolio: &Portfolio) -> bool {
    match section {
        SectionId::Intro => true,
        SectionId::Work => !portfolio.jobs.is_empty(),
        SectionId::Projects => !portfolio.projects.is_empty(),
        SectionId::About => {
            !portfolio.about.is_empty()
                || !portfolio.skills.is_empty()
                || !portfolio.education.is_empty()
                || !portfolio.interests.is_empty()
        }
        SectionId::Contact => !portfolio.contacts.is_empty() || portfolio.contact_blurb.is_some(),
    }
}

/// Render one section, or `None` when it has nothing to show.
///
/// Every section is at least one viewport tall.
pub fn render_section(
    section: SectionId,
    portfolio: &Portfolio,
    snapshot: &PageSnapshot,
    ctx: &ViewContext,
) -> Option<SectionView> {
    if !is_rendered(section, portfolio) {
        return None;
    }
    let view = match section {
        SectionId::Intro => render_intro(portfolio, snapshot, ctx),
        SectionId::Work => render_work(portfolio, ctx),
        SectionId::Projects => render_projects(portfolio, ctx),
        SectionId::About => render_about(portfolio, snapshot, ctx),
        SectionId::Contact => render_contact(portfolio, ctx),
    };
    Some(view)
}

fn finish(mut col: Column, ctx: &ViewContext, band: bool) -> SectionView {
    let height = (col.y + ctx.pad_y()).max(ctx.viewport.height);
    if band {
        col.cmds.insert(
            0,
            rect_cmd(
                Rect::new(NAV_WIDTH, 0.0, ctx.viewport.width - NAV_WIDTH, height),
                ThemeToken::SectionBand,
                None,
                None,
                None,
            ),
        );
    }
    SectionView {
        commands: col.cmds,
        height,
    }
}

fn heading(col: &mut Column, title: &str, ctx: &ViewContext) {
    col.text(title, ThemeToken::TextPrimary, FONT_HEADING);
    col.gap(if ctx.narrow() { 1.0 } else { 2.0 });
}

/// A filled one-row button with a centred caption.
fn button(
    cmds: &mut Vec<RenderCommand>,
    x: f64,
    y: f64,
    caption: &str,
    primary: bool,
    hit: HitTarget,
) -> Rect {
    let rect = Rect::new(x, y, text::width(caption) as f64 + 4.0, 1.0);
    let (fill, border, ink) = if primary {
        (ThemeToken::ButtonPrimary, None, ThemeToken::ButtonPrimaryText)
    } else {
        (
            ThemeToken::Surface,
            Some(ThemeToken::TextPrimary),
            ThemeToken::TextPrimary,
        )
    };
    cmds.push(rect_cmd(rect, fill, border, Some(caption.into()), Some(hit)));
    cmds.push(text_cmd(x + 2.0, y, caption, ink, FONT_BODY));
    rect
}

/// A one-row pill. Filled when `active`, outlined otherwise.
fn badge(cmds: &mut Vec<RenderCommand>, x: f64, y: f64, caption: &str, active: bool) -> Rect {
    let rect = Rect::new(x, y, text::width(caption) as f64 + 2.0, 1.0);
    if active {
        cmds.push(rect_cmd(rect, ThemeToken::BadgeActive, None, None, None));
        cmds.push(text_cmd(x + 1.0, y, caption, ThemeToken::ButtonPrimaryText, FONT_CAPTION));
    } else {
        cmds.push(rect_cmd(
            rect,
            ThemeToken::Background,
            Some(ThemeToken::BadgeOutline),
            None,
            None,
        ));
        cmds.push(text_cmd(x + 1.0, y, caption, ThemeToken::TextSecondary, FONT_CAPTION));
    }
    rect
}

// ── Intro ──────────────────────────────────────────────────────────────────

fn render_intro(portfolio: &Portfolio, snapshot: &PageSnapshot, ctx: &ViewContext) -> SectionView {
    let meta = &portfolio.meta;
    let (x, width) = ctx.content_box(90.0);
    let mut col = Column::new(x, width, 0.0);

    col.text(&meta.name, ThemeToken::TextPrimary, FONT_DISPLAY);
    if let Some(surname) = &meta.surname {
        col.text(surname, ThemeToken::TextMuted, FONT_DISPLAY);
    }
    col.gap(1.0);
    col.text(&meta.tagline, ThemeToken::TextSecondary, FONT_TITLE);
    col.gap(2.0);

    let y = col.y;
    let work = button(
        &mut col.cmds,
        x,
        y,
        "View My Work →",
        true,
        HitTarget::Nav(SectionId::Work),
    );
    col.y = work.bottom();
    if meta.resume.is_some() {
        let (rx, ry) = if ctx.narrow() {
            (x, work.bottom() + 1.0)
        } else {
            (work.right() + 4.0, y)
        };
        let resume = button(&mut col.cmds, rx, ry, "↓ Resume", false, HitTarget::ResumeDownload);
        col.y = col.y.max(resume.bottom());
    }

    // Centre the block vertically in the (at least one screen tall) section.
    let content_height = col.y;
    let height = (content_height + 2.0 * ctx.pad_y()).max(ctx.viewport.height);
    let offset = ((height - content_height) / 2.0).floor();

    let mut commands = Vec::with_capacity(col.cmds.len() + 8);
    commands.extend(decor::floating_elements(ctx, height, snapshot.scroll_offset));
    commands.push(RenderCommand::PushTransform {
        translate: Point::new(0.0, offset),
        scale: Point::new(1.0, 1.0),
    });
    commands.append(&mut col.cmds);
    commands.push(RenderCommand::PopTransform);

    SectionView { commands, height }
}

// ── Work ───────────────────────────────────────────────────────────────────

fn render_work(portfolio: &Portfolio, ctx: &ViewContext) -> SectionView {
    let (x, width) = ctx.content_box(110.0);
    let mut col = Column::new(x, width, ctx.pad_y());
    heading(&mut col, "Work Experience", ctx);

    for (i, job) in portfolio.jobs.iter().enumerate() {
        if i > 0 {
            col.gap(2.0);
        }
        col.card(ThemeToken::Surface, None, |inner| {
            let period: &str = if ctx.narrow() {
                job.short_period()
            } else {
                &job.period
            };
            let badge_width = text::width(period) as f64 + 2.0;
            let top = inner.y;
            badge(
                &mut inner.cmds,
                inner.x + inner.width - badge_width,
                top,
                period,
                job.status == JobStatus::Current,
            );

            let title_width = (inner.width - badge_width - 2.0).max(1.0);
            let mut title = Column::new(inner.x, title_width, top);
            title.text(&job.title, ThemeToken::TextPrimary, FONT_TITLE);
            if let Some(subtitle) = &job.subtitle {
                title.text(&format!("({subtitle})"), ThemeToken::TextMuted, FONT_BODY);
            }
            inner.cmds.append(&mut title.cmds);
            inner.y = title.y.max(top + 1.0);

            inner.line(job.company.clone(), ThemeToken::Accent, FONT_BODY);
            for paragraph in &job.description {
                inner.gap(1.0);
                inner.text(paragraph, ThemeToken::TextSecondary, FONT_BODY);
            }
        });
    }

    finish(col, ctx, false)
}

// ── Projects ───────────────────────────────────────────────────────────────

fn render_projects(portfolio: &Portfolio, ctx: &ViewContext) -> SectionView {
    let (x, width) = ctx.content_box(110.0);
    let mut col = Column::new(x, width, ctx.pad_y());
    heading(&mut col, "Selected Projects", ctx);

    let columns = if ctx.narrow() { 1 } else { 2 };
    let gutter = if ctx.narrow() { 0.0 } else { 4.0 };
    let card_width = ((width - gutter * (columns as f64 - 1.0)) / columns as f64).floor();

    for (row, chunk) in portfolio.projects.chunks(columns).enumerate() {
        if row > 0 {
            col.gap(2.0);
        }
        let top = col.y;
        let bodies: Vec<Column> = chunk
            .iter()
            .enumerate()
            .map(|(i, project)| {
                let card_x = x + i as f64 * (card_width + gutter);
                project_card_body(project, card_x + 2.0, card_width - 4.0, top + 1.0)
            })
            .collect();
        // Cards in a row share the height of the tallest.
        let row_height = bodies.iter().map(|b| b.y - top + 1.0).fold(0.0, f64::max);
        for (i, mut body) in bodies.into_iter().enumerate() {
            let card_x = x + i as f64 * (card_width + gutter);
            col.push(rect_cmd(
                Rect::new(card_x, top, card_width, row_height),
                ThemeToken::Background,
                Some(ThemeToken::Border),
                None,
                None,
            ));
            col.cmds.append(&mut body.cmds);
        }
        col.y = top + row_height;
    }

    finish(col, ctx, true)
}

fn project_card_body(project: &Project, x: f64, width: f64, y: f64) -> Column {
    let mut inner = Column::new(x, width, y);

    let badge_width = text::width(&project.year) as f64 + 2.0;
    badge(
        &mut inner.cmds,
        x + width - badge_width,
        y,
        &project.year,
        project.status == ProjectStatus::Live,
    );
    let mut title = Column::new(x, (width - badge_width - 2.0).max(1.0), y);
    title.text(&project.title, ThemeToken::TextPrimary, FONT_TITLE);
    inner.cmds.append(&mut title.cmds);
    inner.y = title.y.max(y + 1.0);

    inner.gap(1.0);
    inner.text(&project.description, ThemeToken::TextSecondary, FONT_BODY);

    if !project.tech.is_empty() {
        inner.gap(1.0);
        let mut bx = x;
        for tech in &project.tech {
            let w = text::width(tech) as f64 + 2.0;
            if bx > x && bx + w > x + width {
                bx = x;
                inner.gap(2.0);
            }
            badge(&mut inner.cmds, bx, inner.y, tech, false);
            bx += w + 1.0;
        }
        inner.gap(1.0);
    }

    if let Some(url) = &project.url {
        inner.gap(1.0);
        let caption = "View Project →";
        inner.push(rect_cmd(
            Rect::new(x, inner.y, text::width(caption) as f64, 1.0),
            ThemeToken::Background,
            None,
            Some(caption.into()),
            Some(HitTarget::Link(url.clone())),
        ));
        inner.line(caption, ThemeToken::Accent, FONT_BODY);
    }
    inner
}

// ── About ──────────────────────────────────────────────────────────────────

fn render_about(portfolio: &Portfolio, snapshot: &PageSnapshot, ctx: &ViewContext) -> SectionView {
    let (x, width) = ctx.content_box(100.0);
    let mut col = Column::new(x, width, ctx.pad_y());
    heading(&mut col, "About", ctx);

    for (i, paragraph) in portfolio.about.iter().enumerate() {
        if i > 0 {
            col.gap(1.0);
        }
        col.text(paragraph, ThemeToken::TextSecondary, FONT_BODY);
    }

    if !portfolio.skills.is_empty() {
        col.gap(2.0);
        col.line("✦ Technical Skills", ThemeToken::TextPrimary, FONT_TITLE);
        col.gap(1.0);
        skills_grid(&mut col, portfolio, snapshot, ctx);
    }

    if !portfolio.education.is_empty() || !portfolio.interests.is_empty() {
        col.gap(2.0);
        let side_by_side = !ctx.narrow();
        let half = if side_by_side {
            ((width - 6.0) / 2.0).floor()
        } else {
            width
        };

        let top = col.y;
        let mut education = Column::new(x, half, top);
        if !portfolio.education.is_empty() {
            education.line("Education", ThemeToken::TextPrimary, FONT_TITLE);
            education.gap(1.0);
            for entry in &portfolio.education {
                education.card(ThemeToken::Surface, None, |inner| {
                    inner.text(&entry.degree, ThemeToken::TextPrimary, FONT_BODY);
                    inner.text(&entry.institution, ThemeToken::TextMuted, FONT_BODY);
                    if let Some(note) = &entry.note {
                        inner.text(note, ThemeToken::TextMuted, FONT_CAPTION);
                    }
                });
                education.gap(1.0);
            }
        }

        let (ix, iy) = if side_by_side {
            (x + half + 6.0, top)
        } else {
            (x, education.y + 1.0)
        };
        let mut interests = Column::new(ix, half, iy);
        if !portfolio.interests.is_empty() {
            interests.line("Interests", ThemeToken::TextPrimary, FONT_TITLE);
            interests.gap(1.0);
            for interest in &portfolio.interests {
                interests.push(rect_cmd(
                    Rect::new(ix, interests.y, half, 1.0),
                    ThemeToken::Surface,
                    None,
                    None,
                    None,
                ));
                interests.push(text_cmd(
                    ix + 2.0,
                    interests.y,
                    text::truncate(&interest.0, (half - 4.0).max(1.0) as usize),
                    ThemeToken::TextPrimary,
                    FONT_BODY,
                ));
                interests.gap(2.0);
            }
        }

        col.y = education.y.max(interests.y);
        col.cmds.append(&mut education.cmds);
        col.cmds.append(&mut interests.cmds);
    }

    finish(col, ctx, false)
}

fn skills_grid(
    col: &mut Column,
    portfolio: &Portfolio,
    snapshot: &PageSnapshot,
    ctx: &ViewContext,
) {
    const TILE_HEIGHT: f64 = 5.0;
    let columns: usize = if ctx.wide() {
        5
    } else if ctx.narrow() {
        2
    } else {
        3
    };
    let gutter = 2.0;
    let tile_width = ((col.width - gutter * (columns as f64 - 1.0)) / columns as f64).floor();
    let hovered: Option<&SharedStr> = snapshot.hovered_skill.as_ref();

    let top = col.y;
    for (i, skill) in portfolio.skills.iter().enumerate() {
        let r = (i / columns) as f64;
        let c = (i % columns) as f64;
        let rect = Rect::new(
            col.x + c * (tile_width + gutter),
            top + r * (TILE_HEIGHT + 1.0),
            tile_width,
            TILE_HEIGHT,
        );
        let is_hovered = hovered == Some(&skill.name);
        col.push(rect_cmd(
            rect,
            if is_hovered {
                ThemeToken::SurfaceHover
            } else {
                ThemeToken::Surface
            },
            None,
            Some(skill.name.clone()),
            Some(HitTarget::Skill(i as u32)),
        ));
        if is_hovered {
            col.push(rect_cmd(rect, ThemeToken::SkillGlow, None, None, None));
        }

        let centre = |s: &str| rect.x + ((rect.w - text::width(s) as f64) / 2.0).max(0.0).floor();
        let mut line_y = rect.y + 1.0;
        if let Some(icon) = &skill.icon {
            col.push(text_cmd(
                centre(icon),
                line_y,
                icon.clone(),
                ThemeToken::TextPrimary,
                FONT_TITLE,
            ));
        }
        line_y += 1.0;
        let name = text::truncate(&skill.name, tile_width as usize);
        col.push(text_cmd(centre(&name), line_y, name, ThemeToken::TextPrimary, FONT_BODY));
        line_y += 1.0;
        let category = text::truncate(&skill.category, tile_width as usize);
        col.push(text_cmd(
            centre(&category),
            line_y,
            category,
            ThemeToken::TextMuted,
            FONT_CAPTION,
        ));
    }

    let rows = portfolio.skills.len().div_ceil(columns) as f64;
    col.y = top + rows * (TILE_HEIGHT + 1.0) - 1.0;
}

// ── Contact ────────────────────────────────────────────────────────────────

fn render_contact(portfolio: &Portfolio, ctx: &ViewContext) -> SectionView {
    let (x, width) = ctx.content_box(100.0);
    let mut col = Column::new(x, width, ctx.pad_y());
    heading(&mut col, "Get In Touch", ctx);

    if let Some(blurb) = &portfolio.contact_blurb {
        col.text(blurb, ThemeToken::TextSecondary, FONT_BODY);
        col.gap(2.0);
    }

    for entry in &portfolio.contacts {
        col.push(text_cmd(x, col.y, entry.kind.glyph(), ThemeToken::TextMuted, FONT_TITLE));
        let mut body = Column::new(x + 4.0, (width - 4.0).max(1.0), col.y);
        body.line(entry.label.clone(), ThemeToken::TextMuted, FONT_CAPTION);
        match &entry.href {
            Some(href) => {
                body.push(rect_cmd(
                    Rect::new(body.x, body.y, text::width(&entry.value) as f64, 1.0),
                    ThemeToken::Background,
                    None,
                    Some(entry.value.clone()),
                    Some(HitTarget::Link(href.clone())),
                ));
                body.line(entry.value.clone(), ThemeToken::Accent, FONT_BODY);
            }
            None => body.line(entry.value.clone(), ThemeToken::TextPrimary, FONT_BODY),
        }
        col.y = body.y + 1.0;
        col.cmds.append(&mut body.cmds);
    }

    finish(col, ctx, true)
}
