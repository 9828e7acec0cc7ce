//! Paints render commands into a ratatui buffer, one layout unit per cell,
//! and runs the interactive terminal loop.

use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::model::{Activation, PageSession};
use folio_protocol::{Point, RenderCommand, SectionId, TextAlign, ThemeMode, ThemeToken, Viewport};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};
use tracing::{debug, info};

/// Rows scrolled per wheel notch.
const WHEEL_STEP: f64 = 3.0;

fn theme_to_color(token: ThemeToken, theme: ThemeMode) -> Color {
    match theme {
        ThemeMode::Dark => match token {
            ThemeToken::Background => Color::Rgb(0, 0, 0),
            ThemeToken::SectionBand => Color::Rgb(8, 10, 16),
            ThemeToken::Surface => Color::Rgb(14, 18, 28),
            ThemeToken::SurfaceHover => Color::Rgb(31, 41, 55),
            ThemeToken::Border | ThemeToken::ToggleBackground => Color::Rgb(55, 65, 81),
            ThemeToken::TextPrimary
            | ThemeToken::NavActive
            | ThemeToken::BadgeActive
            | ThemeToken::ButtonPrimary
            | ThemeToken::Cursor => Color::Rgb(255, 255, 255),
            ThemeToken::TextSecondary => Color::Rgb(209, 213, 219),
            ThemeToken::TextMuted => Color::Rgb(156, 163, 175),
            ThemeToken::NavInactive | ThemeToken::BadgeOutline => Color::Rgb(107, 114, 128),
            ThemeToken::Accent | ThemeToken::SkillGlow => Color::Rgb(96, 165, 250),
            ThemeToken::Particle => Color::Rgb(37, 64, 98),
            ThemeToken::FloatingDot => Color::Rgb(120, 120, 120),
            ThemeToken::ButtonPrimaryText => Color::Rgb(0, 0, 0),
        },
        ThemeMode::Light => match token {
            ThemeToken::Background => Color::Rgb(255, 255, 255),
            ThemeToken::SectionBand | ThemeToken::Surface => Color::Rgb(249, 250, 251),
            ThemeToken::SurfaceHover | ThemeToken::ToggleBackground => Color::Rgb(243, 244, 246),
            ThemeToken::Border | ThemeToken::BadgeOutline => Color::Rgb(209, 213, 219),
            ThemeToken::TextPrimary
            | ThemeToken::NavActive
            | ThemeToken::BadgeActive
            | ThemeToken::ButtonPrimary
            | ThemeToken::Cursor => Color::Rgb(0, 0, 0),
            ThemeToken::TextSecondary => Color::Rgb(55, 65, 81),
            ThemeToken::TextMuted => Color::Rgb(75, 85, 99),
            ThemeToken::NavInactive => Color::Rgb(107, 114, 128),
            ThemeToken::Accent | ThemeToken::SkillGlow => Color::Rgb(37, 99, 235),
            ThemeToken::Particle => Color::Rgb(191, 210, 250),
            ThemeToken::FloatingDot => Color::Rgb(150, 150, 150),
            ThemeToken::ButtonPrimaryText => Color::Rgb(255, 255, 255),
        },
    }
}

/// Cells covered by a layout-space span `[start, start + len)`, clipped to
/// `[0, limit)`.
fn cell_span(start: f64, len: f64, limit: u16) -> Option<(u16, u16)> {
    let from = start.floor().max(0.0);
    let to = (start + len).ceil().min(f64::from(limit));
    (to > from).then(|| (from as u16, to as u16))
}

/// Paint `commands` into `area`. Layout unit (0, 0) is the top-left cell of
/// `area`.
pub fn draw_commands(buf: &mut Buffer, area: Rect, commands: &[RenderCommand], theme: ThemeMode) {
    let mut offsets: Vec<Point> = vec![Point::default()];

    for cmd in commands {
        let origin = offsets.last().copied().unwrap_or_default();
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                ..
            } => {
                let x = rect.x + origin.x;
                let y = rect.y + origin.y;
                let fill = theme_to_color(*color, theme);

                // Sub-cell shapes (particles, dots, the cursor) become glyphs.
                if rect.h < 1.0 {
                    let glyph = match color {
                        ThemeToken::Cursor => "●",
                        ThemeToken::FloatingDot => "•",
                        _ => "·",
                    };
                    let (cx, cy) = (x.floor(), y.floor());
                    if cx >= 0.0
                        && cy >= 0.0
                        && cx < f64::from(area.width)
                        && cy < f64::from(area.height)
                    {
                        let cell = &mut buf[(area.x + cx as u16, area.y + cy as u16)];
                        cell.set_symbol(glyph).set_fg(fill);
                    }
                    continue;
                }

                let (Some((x0, x1)), Some((y0, y1))) = (
                    cell_span(x, rect.w, area.width),
                    cell_span(y, rect.h, area.height),
                ) else {
                    continue;
                };
                if *color == ThemeToken::SkillGlow {
                    // A wash: tint the text already there instead of painting over it.
                    for row in y0..y1 {
                        for col in x0..x1 {
                            buf[(area.x + col, area.y + row)].set_fg(fill);
                        }
                    }
                    continue;
                }
                for row in y0..y1 {
                    for col in x0..x1 {
                        buf[(area.x + col, area.y + row)].set_symbol(" ").set_bg(fill);
                    }
                }
                if let Some(border) = border_color
                    && rect.h >= 3.0
                    && rect.w >= 3.0
                {
                    draw_box(buf, area, (x, y, rect.w, rect.h), theme_to_color(*border, theme));
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let y = (position.y + origin.y).floor();
                if y < 0.0 || y >= f64::from(area.height) {
                    continue;
                }
                let width = text.chars().count() as f64;
                let x = match align {
                    TextAlign::Left => position.x,
                    TextAlign::Center => position.x - width / 2.0,
                    TextAlign::Right => position.x - width,
                } + origin.x;
                let mut style = Style::default().fg(theme_to_color(*color, theme));
                if *font_size > 16.0 {
                    style = style.add_modifier(Modifier::BOLD);
                }
                // Characters left of the area are dropped, not shifted.
                let skip = (-x.floor()).max(0.0) as usize;
                let x = x.floor().max(0.0);
                if x >= f64::from(area.width) {
                    continue;
                }
                let visible: String = text.chars().skip(skip).collect();
                let max_width = usize::from(area.width) - x as usize;
                buf.set_stringn(area.x + x as u16, area.y + y as u16, visible, max_width, style);
            }
            RenderCommand::DrawLine { from, to, color, .. } => {
                // Only horizontal rules occur on the page.
                let y = (from.y + origin.y).floor();
                if (from.y - to.y).abs() > f64::EPSILON || y < 0.0 || y >= f64::from(area.height) {
                    continue;
                }
                let left = from.x.min(to.x) + origin.x;
                if let Some((x0, x1)) = cell_span(left, (to.x - from.x).abs(), area.width) {
                    let fg = theme_to_color(*color, theme);
                    for col in x0..x1 {
                        buf[(area.x + col, area.y + y as u16)].set_symbol("─").set_fg(fg);
                    }
                }
            }
            RenderCommand::PushTransform { translate, .. } => {
                // Terminal cells cannot scale; only translation applies.
                offsets.push(Point::new(origin.x + translate.x, origin.y + translate.y));
            }
            RenderCommand::PopTransform => {
                if offsets.len() > 1 {
                    offsets.pop();
                }
            }
            RenderCommand::SetClip { .. }
            | RenderCommand::ClearClip
            | RenderCommand::BeginGroup { .. }
            | RenderCommand::EndGroup => {}
        }
    }
}

fn draw_box(buf: &mut Buffer, area: Rect, (x, y, w, h): (f64, f64, f64, f64), fg: Color) {
    let left = x.floor();
    let top = y.floor();
    let right = (x + w).ceil() - 1.0;
    let bottom = (y + h).ceil() - 1.0;
    let mut put = |cx: f64, cy: f64, symbol: &str| {
        if cx >= 0.0 && cy >= 0.0 && cx < f64::from(area.width) && cy < f64::from(area.height) {
            buf[(area.x + cx as u16, area.y + cy as u16)]
                .set_symbol(symbol)
                .set_fg(fg);
        }
    };
    let mut cx = left + 1.0;
    while cx < right {
        put(cx, top, "─");
        put(cx, bottom, "─");
        cx += 1.0;
    }
    let mut cy = top + 1.0;
    while cy < bottom {
        put(left, cy, "│");
        put(right, cy, "│");
        cy += 1.0;
    }
    put(left, top, "╭");
    put(right, top, "╮");
    put(left, bottom, "╰");
    put(right, bottom, "╯");
}

/// The page viewport for a terminal of the given size; the last row is
/// kept for the status line.
fn page_viewport(area: Rect) -> Viewport {
    Viewport::new(
        f64::from(area.width),
        f64::from(area.height.saturating_sub(1)).max(1.0),
    )
}

fn status_line(session: &PageSession, message: &str) -> String {
    let snap = session.snapshot();
    let base = format!(
        " {} | {} | 1-5 jump  tab next  t theme  q quit ",
        snap.active_section.label(),
        snap.theme,
    );
    if message.is_empty() {
        base
    } else {
        format!("{base}| {message}")
    }
}

fn describe(activation: &Activation) -> Option<String> {
    match activation {
        Activation::OpenUrl { url } => Some(format!("open {url}")),
        Activation::Download { path, file_name } => Some(format!("download {path} as {file_name}")),
        Activation::Navigated { .. } | Activation::ThemeChanged { .. } | Activation::Ignored => {
            None
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

fn handle_key(session: &PageSession, key: KeyEvent, page_height: f64) -> Flow {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
        KeyCode::Char('c') if ctrl => return Flow::Quit,
        KeyCode::Char(c @ '1'..='5') => {
            let index = usize::from(c as u8 - b'1');
            if let Some(section) = SectionId::ALL.get(index) {
                session.navigate(*section);
            }
        }
        KeyCode::Tab => {
            let current = session.snapshot().active_section.index();
            let next = SectionId::ALL[(current + 1) % SectionId::ALL.len()];
            session.navigate(next);
        }
        KeyCode::Char('t') => {
            session.toggle_theme();
        }
        KeyCode::Char('j') | KeyCode::Down => session.wheel(1.0),
        KeyCode::Char('k') | KeyCode::Up => session.wheel(-1.0),
        KeyCode::PageDown | KeyCode::Char(' ') => session.wheel(page_height),
        KeyCode::PageUp => session.wheel(-page_height),
        KeyCode::Home => session.scroll_to(0.0),
        KeyCode::End => session.scroll_to(session.layout().max_offset()),
        _ => {}
    }
    Flow::Continue
}

/// Run the page interactively until the user quits. The terminal is
/// restored even when drawing fails.
pub fn run_tui(session: &mut PageSession, frame_interval: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, session, frame_interval);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    session.teardown();
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    session: &PageSession,
    frame_interval: Duration,
) -> Result<()> {
    let mut message = String::new();

    loop {
        let tick = Instant::now();
        let size = terminal.size()?;
        let viewport = page_viewport(Rect::new(0, 0, size.width, size.height));
        session.resize(viewport);

        session.frame();
        let commands = session.render();
        let theme = session.snapshot().theme;
        let status = status_line(session, &message);

        terminal.draw(|frame| {
            let area = frame.area();
            let page_area = Rect::new(0, 0, area.width, area.height.saturating_sub(1));
            let status_area = Rect::new(0, page_area.height, area.width, 1);
            let buf = frame.buffer_mut();
            draw_commands(buf, page_area, &commands, theme);
            let style = Style::default()
                .fg(theme_to_color(ThemeToken::TextPrimary, theme))
                .bg(theme_to_color(ThemeToken::ToggleBackground, theme));
            for x in status_area.x..status_area.right() {
                buf[(x, status_area.y)].set_symbol(" ").set_style(style);
            }
            buf.set_stringn(
                status_area.x,
                status_area.y,
                &status,
                usize::from(status_area.width),
                style,
            );
        })?;

        let timeout = frame_interval.saturating_sub(tick.elapsed());
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Flow::Quit = handle_key(session, key, viewport.height) {
                    info!("quit requested");
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let (x, y) = (f64::from(mouse.column), f64::from(mouse.row));
                match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => session.pointer_moved(x, y),
                    MouseEventKind::ScrollDown => session.wheel(WHEEL_STEP),
                    MouseEventKind::ScrollUp => session.wheel(-WHEEL_STEP),
                    MouseEventKind::Down(MouseButton::Left) => {
                        let activation = session.click(x, y);
                        debug!(?activation, "click");
                        if let Some(text) = describe(&activation) {
                            message = text;
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_protocol::Rect as LayoutRect;

    use super::*;

    fn text(x: f64, y: f64, s: &str) -> RenderCommand {
        RenderCommand::DrawText {
            position: Point::new(x, y),
            text: s.into(),
            color: ThemeToken::TextPrimary,
            font_size: 14.0,
            align: TextAlign::Left,
        }
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn text_is_translated_and_clipped() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        let cmds = vec![
            RenderCommand::PushTransform {
                translate: Point::new(0.0, -5.0),
                scale: Point::new(1.0, 1.0),
            },
            text(7.0, 6.0, "Projects"),
            text(0.0, 2.0, "above"),
            RenderCommand::PopTransform,
            text(-2.0, 2.0, "Intro"),
        ];
        draw_commands(&mut buf, area, &cmds, ThemeMode::Dark);
        assert_eq!(row(&buf, 1), "       Pro");
        assert_eq!(row(&buf, 2), "tro       ");
        assert_eq!(row(&buf, 0), "          ");
    }

    #[test]
    fn bordered_cards_get_a_box() {
        let area = Rect::new(0, 0, 6, 4);
        let mut buf = Buffer::empty(area);
        let cmds = vec![RenderCommand::DrawRect {
            rect: LayoutRect::new(0.0, 0.0, 6.0, 4.0),
            color: ThemeToken::Surface,
            border_color: Some(ThemeToken::Border),
            label: None,
            hit: None,
        }];
        draw_commands(&mut buf, area, &cmds, ThemeMode::Light);
        assert_eq!(row(&buf, 0), "╭────╮");
        assert_eq!(row(&buf, 1), "│    │");
        assert_eq!(row(&buf, 3), "╰────╯");
        assert_eq!(
            buf[(2, 2)].bg,
            theme_to_color(ThemeToken::Surface, ThemeMode::Light)
        );
    }

    #[test]
    fn cursor_becomes_a_glyph() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        let cmds = vec![RenderCommand::DrawRect {
            rect: LayoutRect::new(1.5, 0.75, 1.0, 0.5),
            color: ThemeToken::Cursor,
            border_color: None,
            label: None,
            hit: None,
        }];
        draw_commands(&mut buf, area, &cmds, ThemeMode::Dark);
        assert_eq!(buf[(1, 0)].symbol(), "●");
    }

    #[test]
    fn status_line_reserves_the_last_row() {
        let viewport = page_viewport(Rect::new(0, 0, 80, 24));
        assert_eq!(viewport, Viewport::new(80.0, 23.0));
    }

    #[test]
    fn external_activations_are_described() {
        let open = Activation::OpenUrl {
            url: "https://example.org".into(),
        };
        assert_eq!(describe(&open).as_deref(), Some("open https://example.org"));
        assert_eq!(describe(&Activation::Ignored), None);
    }
}
