mod config;
mod renderer;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use folio_core::content::{builtin, parse_portfolio};
use folio_core::model::PageSession;
use folio_core::svg::render_svg;
use folio_protocol::{Portfolio, SectionId, ThemeMode, Viewport};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A single-page portfolio in the terminal.
#[derive(Debug, Parser)]
#[command(name = "folio", version)]
struct Args {
    /// Portfolio JSON to show instead of the built-in content.
    #[arg(long)]
    content: Option<PathBuf>,

    /// TOML settings file (default: ./folio.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial theme: dark or light.
    #[arg(long, value_parser = parse_theme)]
    theme: Option<ThemeMode>,

    /// Frames per second of the render loop.
    #[arg(long)]
    fps: Option<u32>,

    /// Render one frame to an SVG file and exit.
    #[arg(long, value_name = "FILE")]
    export_svg: Option<PathBuf>,

    /// Section to scroll to before exporting.
    #[arg(long, value_parser = parse_section, requires = "export_svg")]
    section: Option<SectionId>,

    /// Export width in cells.
    #[arg(long, default_value_t = 120, requires = "export_svg")]
    width: u16,

    /// Export height in cells.
    #[arg(long, default_value_t = 40, requires = "export_svg")]
    height: u16,

    /// Log file for the interactive mode; the terminal is busy drawing.
    #[arg(long, default_value = "folio.log")]
    log_file: PathBuf,
}

fn parse_theme(raw: &str) -> Result<ThemeMode, String> {
    ThemeMode::parse(raw).ok_or_else(|| format!("unknown theme '{raw}'"))
}

fn parse_section(raw: &str) -> Result<SectionId, String> {
    SectionId::parse(raw).ok_or_else(|| format!("unknown section '{raw}'"))
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    if args.export_svg.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        let file = File::create(&args.log_file)
            .with_context(|| format!("failed to create log file '{}'", args.log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

fn load_content(path: Option<&Path>) -> Result<Portfolio> {
    match path {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("failed to read content '{}'", path.display()))?;
            parse_portfolio(&data)
                .with_context(|| format!("failed to parse content '{}'", path.display()))
        }
        None => builtin().context("built-in content is broken"),
    }
}

fn export(session: &PageSession, section: Option<SectionId>, out: &Path) -> Result<()> {
    if let Some(section) = section {
        session.navigate(section);
    }
    while session.needs_frame() {
        session.frame();
    }
    let snap = session.snapshot();
    let svg = render_svg(&session.render(), session.viewport(), snap.theme);
    std::fs::write(out, svg).with_context(|| format!("failed to write '{}'", out.display()))?;
    info!(path = %out.display(), section = %snap.active_section, "exported svg");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    if let Some(fps) = args.fps {
        settings.fps = fps;
    }
    if let Some(content) = &args.content {
        settings.content = Some(content.clone());
    }
    info!(?settings, "starting");

    let portfolio = load_content(settings.content.as_deref())?;

    if let Some(out) = &args.export_svg {
        let viewport = Viewport::new(f64::from(args.width), f64::from(args.height));
        let session = PageSession::with_theme(portfolio, viewport, settings.theme);
        return export(&session, args.section, out);
    }

    let (width, height) = crossterm::terminal::size().context("no terminal attached")?;
    let viewport = Viewport::new(
        f64::from(width),
        f64::from(height.saturating_sub(1)).max(1.0),
    );
    let mut session = PageSession::with_theme(portfolio, viewport, settings.theme);
    renderer::run_tui(&mut session, settings.frame_interval())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_flags_require_an_output() {
        assert!(Args::try_parse_from(["folio", "--width", "80"]).is_err());
        let args = Args::try_parse_from([
            "folio",
            "--export-svg",
            "page.svg",
            "--section",
            "about",
            "--theme",
            "light",
        ])
        .unwrap();
        assert_eq!(args.section, Some(SectionId::About));
        assert_eq!(args.theme, Some(ThemeMode::Light));
        assert_eq!(args.width, 120);
    }

    #[test]
    fn bad_theme_is_rejected() {
        assert!(Args::try_parse_from(["folio", "--theme", "sepia"]).is_err());
    }

    #[test]
    fn builtin_content_is_the_fallback() {
        let portfolio = load_content(None).unwrap();
        assert!(!portfolio.jobs.is_empty());
        assert!(load_content(Some(Path::new("does/not/exist.json"))).is_err());
    }
}
