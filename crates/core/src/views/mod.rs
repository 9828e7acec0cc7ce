//! Page views: pure functions from content + UI state to render commands.
//!
//! Coordinates are layout units (one character cell wide, one text line
//! tall). Section views are produced in section-local coordinates; the page
//! view translates them by `top - scroll_offset`.

pub mod decor;
pub mod hit;
pub mod nav;
pub mod page;
pub mod sections;

pub use hit::hit_test;
pub use page::render_page;
pub use sections::{SectionView, render_section};

use folio_protocol::{
    HitTarget, Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport,
};

use crate::text;

// ── Typography scale (points, used by pixel renderers) ─────────────────────

pub const FONT_DISPLAY: f64 = 36.0;
pub const FONT_HEADING: f64 = 30.0;
pub const FONT_TITLE: f64 = 18.0;
pub const FONT_BODY: f64 = 14.0;
pub const FONT_CAPTION: f64 = 12.0;

/// Width of the fixed navigation rail.
pub const NAV_WIDTH: f64 = 10.0;
/// Viewports narrower than this use the compact (mobile) arrangement.
pub const MD_BREAKPOINT: f64 = 96.0;
/// Viewports at least this wide get the five-column skills grid.
pub const LG_BREAKPOINT: f64 = 128.0;

/// Responsive parameters derived from the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewContext {
    pub viewport: Viewport,
}

impl ViewContext {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn narrow(&self) -> bool {
        self.viewport.width < MD_BREAKPOINT
    }

    pub fn wide(&self) -> bool {
        self.viewport.width >= LG_BREAKPOINT
    }

    pub fn pad_x(&self) -> f64 {
        if self.narrow() { 2.0 } else { 6.0 }
    }

    pub fn pad_y(&self) -> f64 {
        if self.narrow() { 2.0 } else { 4.0 }
    }

    /// Left edge and width of the content column, centred in the area right
    /// of the nav rail and capped at `max_width`.
    pub fn content_box(&self, max_width: f64) -> (f64, f64) {
        let left = NAV_WIDTH + self.pad_x();
        let available = (self.viewport.width - NAV_WIDTH - 2.0 * self.pad_x()).max(12.0);
        let width = available.min(max_width);
        (left + ((available - width) / 2.0).floor(), width.floor())
    }
}

/// Rows a line of text at `font_size` occupies.
pub fn line_rows(font_size: f64) -> f64 {
    if font_size > FONT_TITLE { 2.0 } else { 1.0 }
}

pub(crate) fn text_cmd(
    x: f64,
    y: f64,
    text: impl Into<SharedStr>,
    color: ThemeToken,
    font_size: f64,
) -> RenderCommand {
    RenderCommand::DrawText {
        position: Point::new(x, y),
        text: text.into(),
        color,
        font_size,
        align: TextAlign::Left,
    }
}

pub(crate) fn rect_cmd(
    rect: Rect,
    color: ThemeToken,
    border_color: Option<ThemeToken>,
    label: Option<SharedStr>,
    hit: Option<HitTarget>,
) -> RenderCommand {
    RenderCommand::DrawRect {
        rect,
        color,
        border_color,
        label,
        hit,
    }
}

/// A vertical flow of lines with a running `y`.
#[derive(Debug)]
pub(crate) struct Column {
    pub x: f64,
    pub width: f64,
    pub y: f64,
    pub cmds: Vec<RenderCommand>,
}

impl Column {
    pub fn new(x: f64, width: f64, y: f64) -> Self {
        Self {
            x,
            width,
            y,
            cmds: Vec::new(),
        }
    }

    /// Word-wrapped text.
    pub fn text(&mut self, text: &str, color: ThemeToken, font_size: f64) {
        let max = text_columns(self.width, font_size);
        for line in text::wrap(text, max) {
            self.line(line, color, font_size);
        }
    }

    /// A single unwrapped line.
    pub fn line(&mut self, text: impl Into<SharedStr>, color: ThemeToken, font_size: f64) {
        self.cmds.push(text_cmd(self.x, self.y, text, color, font_size));
        self.y += line_rows(font_size);
    }

    pub fn gap(&mut self, rows: f64) {
        self.y += rows;
    }

    pub fn push(&mut self, cmd: RenderCommand) {
        self.cmds.push(cmd);
    }

    /// A bordered surface around whatever `build` lays out inside it, with
    /// one unit of padding on every side.
    pub fn card(
        &mut self,
        color: ThemeToken,
        hit: Option<HitTarget>,
        build: impl FnOnce(&mut Column),
    ) -> Rect {
        let top = self.y;
        let mut inner = Column::new(self.x + 2.0, (self.width - 4.0).max(1.0), top + 1.0);
        build(&mut inner);
        let rect = Rect::new(self.x, top, self.width, inner.y - top + 1.0);
        self.cmds
            .push(rect_cmd(rect, color, Some(ThemeToken::Border), None, hit));
        self.cmds.append(&mut inner.cmds);
        self.y = rect.bottom();
        rect
    }
}

/// Characters that fit in `width` units at `font_size`. Display-size text is
/// set wider, so fewer characters fit.
pub(crate) fn text_columns(width: f64, font_size: f64) -> usize {
    let scale = if font_size > FONT_TITLE { 2.0 } else { 1.0 };
    ((width / scale).floor().max(1.0)) as usize
}
