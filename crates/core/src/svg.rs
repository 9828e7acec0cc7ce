//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.
//!
//! Layout units are scaled to pixels with [`CELL_WIDTH`] × [`CELL_HEIGHT`].
//! Transforms are resolved here, so the output uses absolute coordinates.

use std::fmt::Write as _;

use folio_protocol::{Point, RenderCommand, TextAlign, ThemeMode, ThemeToken, Viewport};

use crate::views::line_rows;

/// Pixels per layout unit, horizontally.
pub const CELL_WIDTH: f64 = 9.0;
/// Pixels per layout unit, vertically.
pub const CELL_HEIGHT: f64 = 18.0;

#[derive(Debug, Clone, Copy)]
struct Transform {
    tx: f64,
    ty: f64,
    sx: f64,
    sy: f64,
}

impl Transform {
    const IDENTITY: Self = Self {
        tx: 0.0,
        ty: 0.0,
        sx: 1.0,
        sy: 1.0,
    };

    fn then(self, translate: Point, scale: Point) -> Self {
        Self {
            tx: self.tx + translate.x * self.sx,
            ty: self.ty + translate.y * self.sy,
            sx: self.sx * scale.x,
            sy: self.sy * scale.y,
        }
    }

    /// Map a layout point to pixels.
    fn px(self, x: f64, y: f64) -> (f64, f64) {
        (
            (self.tx + x * self.sx) * CELL_WIDTH,
            (self.ty + y * self.sy) * CELL_HEIGHT,
        )
    }
}

/// Render a command list as an SVG document the size of `viewport`.
pub fn render_svg(commands: &[RenderCommand], viewport: Viewport, theme: ThemeMode) -> String {
    let width = viewport.width * CELL_WIDTH;
    let height = viewport.height * CELL_HEIGHT;
    let mut svg = String::with_capacity(commands.len() * 120);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );

    let mut transforms = vec![Transform::IDENTITY];
    for cmd in commands {
        let t = transforms.last().copied().unwrap_or(Transform::IDENTITY);
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                ..
            } => {
                let (x, y) = t.px(rect.x, rect.y);
                let (w, h) = (rect.w * t.sx * CELL_WIDTH, rect.h * t.sy * CELL_HEIGHT);
                let fill = resolve_color(*color, theme);
                let _ = write!(
                    svg,
                    r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"{} rx="3""#,
                    opacity(*color),
                );
                if let Some(border) = border_color {
                    let _ = write!(svg, r#" stroke="{}""#, resolve_color(*border, theme));
                }
                match label {
                    Some(label) => {
                        let _ = write!(svg, "><title>{}</title></rect>", escape_xml(label));
                    }
                    None => svg.push_str("/>"),
                }
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let (x1, y1) = t.px(from.x, from.y);
                let (x2, y2) = t.px(to.x, to.y);
                let stroke = resolve_color(*color, theme);
                let _ = write!(
                    svg,
                    r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                );
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let (x, top) = t.px(position.x, position.y);
                // SVG positions text by its baseline.
                let y = top + line_rows(*font_size) * CELL_HEIGHT * 0.78;
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let fill = resolve_color(*color, theme);
                let _ = write!(
                    svg,
                    r#"<text x="{x}" y="{y}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    escape_xml(text),
                );
            }
            RenderCommand::PushTransform { translate, scale } => {
                transforms.push(t.then(*translate, *scale));
            }
            RenderCommand::PopTransform => {
                if transforms.len() > 1 {
                    transforms.pop();
                }
            }
            RenderCommand::BeginGroup { id, .. } => {
                let _ = write!(svg, r#"<g id="{}">"#, escape_xml(id));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
            // The page never clips; a static export has no use for it.
            RenderCommand::SetClip { .. } | RenderCommand::ClearClip => {}
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Tokens drawn as translucent washes.
fn opacity(token: ThemeToken) -> &'static str {
    match token {
        ThemeToken::SkillGlow => r#" fill-opacity="0.15""#,
        ThemeToken::Particle => r#" fill-opacity="0.3""#,
        ThemeToken::FloatingDot => r#" fill-opacity="0.5""#,
        _ => "",
    }
}

fn resolve_color(token: ThemeToken, theme: ThemeMode) -> &'static str {
    match theme {
        ThemeMode::Dark => match token {
            ThemeToken::Background => "#000000",
            ThemeToken::SectionBand => "#05070c",
            ThemeToken::Surface => "#090c14",
            ThemeToken::SurfaceHover => "#191f2c",
            ThemeToken::Border | ThemeToken::ToggleBackground => "#1f2937",
            ThemeToken::TextPrimary
            | ThemeToken::NavActive
            | ThemeToken::BadgeActive
            | ThemeToken::ButtonPrimary
            | ThemeToken::Cursor
            | ThemeToken::FloatingDot => "#ffffff",
            ThemeToken::TextSecondary => "#d1d5db",
            ThemeToken::TextMuted => "#9ca3af",
            ThemeToken::NavInactive | ThemeToken::BadgeOutline => "#6b7280",
            ThemeToken::Accent | ThemeToken::Particle | ThemeToken::SkillGlow => "#60a5fa",
            ThemeToken::ButtonPrimaryText => "#000000",
        },
        ThemeMode::Light => match token {
            ThemeToken::Background => "#ffffff",
            ThemeToken::SectionBand | ThemeToken::Surface => "#f9fafb",
            ThemeToken::SurfaceHover | ThemeToken::ToggleBackground => "#f3f4f6",
            ThemeToken::Border => "#e5e7eb",
            ThemeToken::TextPrimary
            | ThemeToken::NavActive
            | ThemeToken::BadgeActive
            | ThemeToken::ButtonPrimary
            | ThemeToken::Cursor
            | ThemeToken::FloatingDot => "#000000",
            ThemeToken::TextSecondary => "#374151",
            ThemeToken::TextMuted => "#4b5563",
            ThemeToken::NavInactive => "#6b7280",
            ThemeToken::BadgeOutline => "#d1d5db",
            ThemeToken::Accent | ThemeToken::Particle | ThemeToken::SkillGlow => "#2563eb",
            ThemeToken::ButtonPrimaryText => "#ffffff",
        },
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_protocol::{HitTarget, Rect, SectionId};

    #[test]
    fn basic_svg_output() {
        let commands = vec![RenderCommand::DrawRect {
            rect: Rect::new(1.0, 2.0, 10.0, 1.0),
            color: ThemeToken::ButtonPrimary,
            border_color: None,
            label: Some("View My Work".into()),
            hit: Some(HitTarget::Nav(SectionId::Work)),
        }];
        let svg = render_svg(&commands, Viewport::new(80.0, 24.0), ThemeMode::Dark);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"width="720""#));
        assert!(svg.contains(r##"<rect x="9" y="36" width="90" height="18" fill="#ffffff""##));
        assert!(svg.contains("<title>View My Work</title>"));
    }

    #[test]
    fn transforms_are_resolved() {
        let commands = vec![
            RenderCommand::PushTransform {
                translate: Point::new(0.0, -10.0),
                scale: Point::new(1.0, 1.0),
            },
            RenderCommand::DrawLine {
                from: Point::new(0.0, 12.0),
                to: Point::new(2.0, 12.0),
                color: ThemeToken::Border,
                width: 1.0,
            },
            RenderCommand::PopTransform,
        ];
        let svg = render_svg(&commands, Viewport::new(10.0, 10.0), ThemeMode::Light);
        assert!(svg.contains(r##"<line x1="0" y1="36" x2="18" y2="36" stroke="#e5e7eb""##));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(0.0, 0.0),
            text: "KKR & KSR <IT>".into(),
            color: ThemeToken::TextPrimary,
            font_size: 14.0,
            align: TextAlign::Left,
        }];
        let svg = render_svg(&commands, Viewport::new(40.0, 2.0), ThemeMode::Light);
        assert!(svg.contains("KKR &amp; KSR &lt;IT&gt;"));
    }
}
