//! Ambient decoration: background particles, floating dots, pointer cursor.

use folio_protocol::{Rect, RenderCommand, ThemeToken};

use super::{NAV_WIDTH, ViewContext, rect_cmd};
use crate::model::PageSnapshot;

/// Particle anchors as fractions of the viewport.
const PARTICLES: [(f64, f64); 8] = [
    (0.10, 0.20),
    (0.30, 0.60),
    (0.50, 0.40),
    (0.70, 0.70),
    (0.90, 0.30),
    (0.20, 0.80),
    (0.40, 0.10),
    (0.60, 0.50),
];

/// Floating dot anchors as fractions of the intro section.
const FLOATING_DOTS: [(f64, f64); 3] = [(0.20, 0.30), (0.50, 0.50), (0.80, 0.70)];

const PARTICLE_PARALLAX: f64 = 0.05;
const FLOATING_PARALLAX: f64 = 0.03;

/// Pointer cursor footprint: one cell wide, half a line tall.
const CURSOR_SIZE: (f64, f64) = (1.0, 0.5);

fn dot(x: f64, y: f64, w: f64, h: f64, color: ThemeToken) -> RenderCommand {
    rect_cmd(Rect::new(x, y, w, h), color, None, None, None)
}

/// Viewport-fixed background particles. They drift upward against the
/// scroll at a fraction of its speed.
pub fn particles(ctx: &ViewContext, scroll_offset: f64) -> Vec<RenderCommand> {
    let vp = ctx.viewport;
    let drift = scroll_offset * PARTICLE_PARALLAX;
    PARTICLES
        .iter()
        .map(|&(fx, fy)| {
            let x = (fx * vp.width).floor();
            // Wrap the drift so particles never all leave the screen.
            let y = (fy * vp.height - drift).rem_euclid(vp.height.max(1.0)).floor();
            dot(x, y, 1.0, 0.25, ThemeToken::Particle)
        })
        .collect()
}

/// Dots drifting inside the intro section, in section-local coordinates.
pub fn floating_elements(
    ctx: &ViewContext,
    section_height: f64,
    scroll_offset: f64,
) -> Vec<RenderCommand> {
    let drift = scroll_offset * FLOATING_PARALLAX;
    FLOATING_DOTS
        .iter()
        .map(|&(fx, fy)| {
            let x = (NAV_WIDTH + fx * (ctx.viewport.width - NAV_WIDTH)).floor();
            let y = (fy * section_height + drift).floor();
            dot(x, y, 0.5, 0.25, ThemeToken::FloatingDot)
        })
        .collect()
}

/// The custom cursor, centred on the committed pointer position.
///
/// Hidden on compact layouts and until the page has loaded.
pub fn cursor(ctx: &ViewContext, snapshot: &PageSnapshot) -> Option<RenderCommand> {
    if ctx.narrow() || !snapshot.loaded {
        return None;
    }
    let (w, h) = CURSOR_SIZE;
    let p = snapshot.pointer;
    Some(dot(p.x - w / 2.0, p.y - h / 2.0, w, h, ThemeToken::Cursor))
}
