use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind};
use folio_core::svg::{CELL_HEIGHT, CELL_WIDTH};
use folio_core::views::line_rows;
use folio_protocol::{Point, RenderCommand, TextAlign, ThemeMode, ThemeToken};

use crate::theme;

/// Transform state for PushTransform/PopTransform, in layout units.
#[derive(Debug, Clone, Copy)]
struct Transform {
    tx: f64,
    ty: f64,
    sx: f64,
    sy: f64,
}

impl Transform {
    fn identity() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            sx: 1.0,
            sy: 1.0,
        }
    }

    fn apply_x(&self, x: f64) -> f32 {
        ((x * self.sx + self.tx) * CELL_WIDTH) as f32
    }

    fn apply_y(&self, y: f64) -> f32 {
        ((y * self.sy + self.ty) * CELL_HEIGHT) as f32
    }

    fn scale_w(&self, w: f64) -> f32 {
        (w * self.sx * CELL_WIDTH) as f32
    }

    fn scale_h(&self, h: f64) -> f32 {
        (h * self.sy * CELL_HEIGHT) as f32
    }
}

/// Convert a pixel position inside the page area to layout units.
pub fn to_layout(pos: Pos2, origin: Pos2) -> Point {
    Point::new(
        f64::from(pos.x - origin.x) / CELL_WIDTH,
        f64::from(pos.y - origin.y) / CELL_HEIGHT,
    )
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the page area.
pub fn render_commands(
    painter: &mut egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) {
    let mut transform_stack: Vec<Transform> = vec![Transform::identity()];
    let mut clip_stack: Vec<Rect> = Vec::new();

    for cmd in commands {
        let tf = transform_stack
            .last()
            .copied()
            .unwrap_or(Transform::identity());
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                ..
            } => {
                let x = tf.apply_x(rect.x) + offset.x;
                let y = tf.apply_y(rect.y) + offset.y;
                let w = tf.scale_w(rect.w);
                let h = tf.scale_h(rect.h);

                if w < 0.5 || h < 0.5 {
                    continue;
                }

                let egui_rect = Rect::from_min_size(Pos2::new(x, y), egui::vec2(w, h));

                // Cull off-screen
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }

                let fill = theme::resolve(*color, mode);

                // Particles, dots and the cursor are round.
                if matches!(
                    color,
                    ThemeToken::Particle | ThemeToken::FloatingDot | ThemeToken::Cursor
                ) {
                    painter.circle_filled(egui_rect.center(), w.min(h) / 2.0, fill);
                    continue;
                }

                painter.rect_filled(egui_rect, CornerRadius::same(4), fill);

                if let Some(bc) = border_color {
                    let stroke_color = theme::resolve(*bc, mode);
                    painter.rect_stroke(
                        egui_rect,
                        CornerRadius::same(4),
                        Stroke::new(1.0, stroke_color),
                        StrokeKind::Inside,
                    );
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let x = tf.apply_x(position.x) + offset.x;
                let top = tf.apply_y(position.y) + offset.y;
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }
                // Vertically centred in the rows the layout reserved for it.
                let rows = (line_rows(*font_size) * CELL_HEIGHT * tf.sy) as f32;
                let y = top + rows / 2.0;

                let text_color = theme::resolve(*color, mode);
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_CENTER,
                    TextAlign::Center => Align2::CENTER_CENTER,
                    TextAlign::Right => Align2::RIGHT_CENTER,
                };

                painter.text(
                    Pos2::new(x, y),
                    anchor,
                    text.as_ref(),
                    FontId::proportional(size),
                    text_color,
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
            } => {
                let p1 = Pos2::new(tf.apply_x(from.x) + offset.x, tf.apply_y(from.y) + offset.y);
                let p2 = Pos2::new(tf.apply_x(to.x) + offset.x, tf.apply_y(to.y) + offset.y);
                let line_color = theme::resolve(*color, mode);
                painter.line_segment([p1, p2], Stroke::new(*width as f32, line_color));
            }

            RenderCommand::SetClip { rect } => {
                let x = tf.apply_x(rect.x) + offset.x;
                let y = tf.apply_y(rect.y) + offset.y;
                let w = tf.scale_w(rect.w);
                let h = tf.scale_h(rect.h);
                let clip_rect = Rect::from_min_size(Pos2::new(x, y), egui::vec2(w, h));
                clip_stack.push(painter.clip_rect());
                let intersected = painter.clip_rect().intersect(clip_rect);
                painter.set_clip_rect(intersected);
            }

            RenderCommand::ClearClip => {
                if let Some(prev) = clip_stack.pop() {
                    painter.set_clip_rect(prev);
                }
            }

            RenderCommand::PushTransform { translate, scale } => {
                let parent = tf;
                transform_stack.push(Transform {
                    tx: parent.tx + translate.x * parent.sx,
                    ty: parent.ty + translate.y * parent.sy,
                    sx: parent.sx * scale.x,
                    sy: parent.sy * scale.y,
                });
            }

            RenderCommand::PopTransform => {
                if transform_stack.len() > 1 {
                    transform_stack.pop();
                }
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups are semantic, no visual effect in egui
            }
        }
    }
}
