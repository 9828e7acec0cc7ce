use eframe::egui;
use folio_core::content::{builtin, parse_portfolio};
use folio_core::model::{Activation, PageSession};
use folio_core::svg::{CELL_HEIGHT, CELL_WIDTH};
use folio_protocol::{Portfolio, SectionId, ThemeMode, ThemeToken, Viewport};
use tracing::{debug, info, warn};

use crate::renderer;
use crate::theme;

/// Page viewport, in layout units, for a pixel area.
fn viewport_for(rect: egui::Rect) -> Viewport {
    Viewport::new(
        (f64::from(rect.width()) / CELL_WIDTH).max(1.0),
        (f64::from(rect.height()) / CELL_HEIGHT).max(1.0),
    )
}

/// Main application state.
pub struct FolioApp {
    session: Option<PageSession>,
    /// Theme the egui visuals were last set for.
    visuals_theme: Option<ThemeMode>,
    /// Error message to display.
    error: Option<String>,
    /// Portfolio JSON picked or dropped by the user, applied next update.
    pending_content: Option<Vec<u8>>,
}

impl FolioApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(theme::visuals(ThemeMode::default()));

        let mut app = Self {
            session: None,
            visuals_theme: None,
            error: None,
            pending_content: None,
        };
        match builtin() {
            Ok(portfolio) => app.mount(&cc.egui_ctx, portfolio),
            Err(e) => app.error = Some(format!("Built-in content is broken: {e}")),
        }
        app
    }

    /// Replace the page with `portfolio`, keeping the viewport and theme.
    fn mount(&mut self, ctx: &egui::Context, portfolio: Portfolio) {
        // A fresh page is resized to the panel on its first update.
        let (viewport, theme) = match &self.session {
            Some(s) => (s.viewport(), s.snapshot().theme),
            None => (Viewport::new(120.0, 40.0), ThemeMode::default()),
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(
            portfolio.meta.title.to_string(),
        ));
        info!(name = %portfolio.meta.name, "mounting page");
        // The old session tears itself down on drop.
        self.session = Some(PageSession::with_theme(portfolio, viewport, theme));
        self.error = None;
    }

    fn load_content(&mut self, ctx: &egui::Context, data: &[u8]) {
        match parse_portfolio(data) {
            Ok(portfolio) => self.mount(ctx, portfolio),
            Err(e) => {
                warn!(error = %e, "rejected portfolio content");
                self.error = Some(format!("Failed to load content: {e}"));
            }
        }
    }

    fn perform(ctx: &egui::Context, activation: Activation) {
        debug!(?activation, "click");
        match activation {
            Activation::OpenUrl { url } => ctx.open_url(egui::OpenUrl::new_tab(url.to_string())),
            Activation::Download { path, file_name } => {
                info!(%path, %file_name, "resume download");
                // The resume path is relative to the site; only the web build
                // can resolve it.
                #[cfg(target_arch = "wasm32")]
                ctx.open_url(egui::OpenUrl::new_tab(path.to_string()));
            }
            Activation::Navigated { .. }
            | Activation::ThemeChanged { .. }
            | Activation::Ignored => {}
        }
    }

    fn handle_keys(session: &PageSession, i: &egui::InputState, page_height: f64) {
        let numbers = [
            egui::Key::Num1,
            egui::Key::Num2,
            egui::Key::Num3,
            egui::Key::Num4,
            egui::Key::Num5,
        ];
        for (key, section) in numbers.into_iter().zip(SectionId::ALL) {
            if i.key_pressed(key) {
                session.navigate(section);
            }
        }
        if i.key_pressed(egui::Key::Tab) {
            let current = session.snapshot().active_section.index();
            session.navigate(SectionId::ALL[(current + 1) % SectionId::ALL.len()]);
        }
        if i.key_pressed(egui::Key::T) {
            session.toggle_theme();
        }
        if i.key_pressed(egui::Key::ArrowDown) || i.key_pressed(egui::Key::J) {
            session.wheel(1.0);
        }
        if i.key_pressed(egui::Key::ArrowUp) || i.key_pressed(egui::Key::K) {
            session.wheel(-1.0);
        }
        if i.key_pressed(egui::Key::PageDown) || i.key_pressed(egui::Key::Space) {
            session.wheel(page_height);
        }
        if i.key_pressed(egui::Key::PageUp) {
            session.wheel(-page_height);
        }
        if i.key_pressed(egui::Key::Home) {
            session.scroll_to(0.0);
        }
        if i.key_pressed(egui::Key::End) {
            session.scroll_to(session.layout().max_offset());
        }
    }
}

impl eframe::App for FolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(data) = self.pending_content.take() {
            self.load_content(ctx, &data);
        }

        #[cfg(not(target_arch = "wasm32"))]
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::O)) {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Portfolio", &["json"])
                .pick_file()
            {
                match std::fs::read(&path) {
                    Ok(data) => self.pending_content = Some(data),
                    Err(e) => self.error = Some(format!("Failed to read file: {e}")),
                }
            }
        }

        if let Some(err) = &self.error {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.colored_label(egui::Color32::RED, err);
            });
        }

        let mut activation = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let Some(session) = &self.session else {
                    return;
                };
                let available = ui.available_rect_before_wrap();
                let viewport = viewport_for(available);
                session.resize(viewport);

                let response = ui.allocate_rect(available, egui::Sense::click());
                let origin = available.min;

                if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                    if available.contains(pos) {
                        let p = renderer::to_layout(pos, origin);
                        session.pointer_moved(p.x, p.y);
                    }
                }

                let scroll = ui.input(|i| i.smooth_scroll_delta);
                if scroll.y.abs() > 0.1 {
                    session.wheel(-f64::from(scroll.y) / CELL_HEIGHT);
                }

                ui.input(|i| Self::handle_keys(session, i, viewport.height));

                if let Some(pos) = response.interact_pointer_pos().filter(|_| response.clicked()) {
                    let p = renderer::to_layout(pos, origin);
                    activation = Some(session.click(p.x, p.y));
                }

                session.frame();
                let snap = session.snapshot();

                let mut painter = ui.painter_at(available);
                painter.rect_filled(
                    available,
                    egui::CornerRadius::ZERO,
                    theme::resolve(ThemeToken::Background, snap.theme),
                );
                renderer::render_commands(&mut painter, &session.render(), origin, snap.theme);

                if session.needs_frame() {
                    ui.ctx().request_repaint();
                }
            });

        if let Some(activation) = activation {
            Self::perform(ctx, activation);
        }

        if let Some(session) = &self.session {
            let current = session.snapshot().theme;
            if self.visuals_theme != Some(current) {
                ctx.set_visuals(theme::visuals(current));
                self.visuals_theme = Some(current);
            }
        }

        // Dropped portfolio JSON replaces the content
        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .first()
                .and_then(|file| file.bytes.as_ref().map(|bytes| bytes.to_vec()))
        });
        if dropped.is_some() {
            self.pending_content = dropped;
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_is_measured_in_cells() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(900.0, 360.0));
        assert_eq!(viewport_for(rect), Viewport::new(100.0, 20.0));
    }

    #[test]
    fn tiny_areas_keep_a_unit_viewport() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(0.0, 0.0));
        assert_eq!(viewport_for(rect), Viewport::new(1.0, 1.0));
    }
}
