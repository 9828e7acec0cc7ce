//! JavaScript bridge: one page session per module instance, driven by the
//! host's `requestAnimationFrame` loop. Render commands, state and click
//! outcomes cross the boundary as JSON.

use std::cell::RefCell;
use std::fmt;

use folio_core::content::{builtin, parse_portfolio};
use folio_core::model::PageSession;
use folio_protocol::{ThemeMode, Viewport};
use serde::Serialize;
use tracing::info;
use wasm_bindgen::prelude::*;

thread_local! {
    static PAGE: RefCell<Option<PageSession>> = const { RefCell::new(None) };
}

#[derive(Debug, PartialEq)]
enum BridgeError {
    NotMounted,
    Content(String),
    Theme(String),
    Json(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMounted => f.write_str("no page mounted; call init_page first"),
            Self::Content(e) => write!(f, "invalid content: {e}"),
            Self::Theme(t) => write!(f, "unknown theme: {t}"),
            Self::Json(e) => write!(f, "serialization failed: {e}"),
        }
    }
}

impl From<BridgeError> for JsError {
    fn from(e: BridgeError) -> Self {
        JsError::new(&e.to_string())
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, BridgeError> {
    serde_json::to_string(value).map_err(|e| BridgeError::Json(e.to_string()))
}

fn with_page<R>(f: impl FnOnce(&PageSession) -> R) -> Result<R, BridgeError> {
    PAGE.with(|page| page.borrow().as_ref().map(f).ok_or(BridgeError::NotMounted))
}

fn mount(
    content: Option<&str>,
    width: f64,
    height: f64,
    theme: Option<&str>,
) -> Result<(), BridgeError> {
    let portfolio = match content {
        Some(json) => parse_portfolio(json.as_bytes()),
        None => builtin(),
    }
    .map_err(|e| BridgeError::Content(e.to_string()))?;
    let theme = match theme {
        Some(raw) => ThemeMode::parse(raw).ok_or_else(|| BridgeError::Theme(raw.to_string()))?,
        None => ThemeMode::default(),
    };
    let session = PageSession::with_theme(portfolio, Viewport::new(width, height), theme);
    info!(width, height, %theme, "page mounted");
    // Replacing a session drops the old one, which tears it down.
    PAGE.with(|page| *page.borrow_mut() = Some(session));
    Ok(())
}

fn unmount() -> bool {
    PAGE.with(|page| page.borrow_mut().take()).is_some()
}

/// Mount the page. `content` is portfolio JSON; omit it for the built-in
/// content. Sizes are in layout units (character cells).
#[wasm_bindgen]
pub fn init_page(
    content: Option<String>,
    width: f64,
    height: f64,
    theme: Option<String>,
) -> Result<(), JsError> {
    Ok(mount(content.as_deref(), width, height, theme.as_deref())?)
}

#[wasm_bindgen]
pub fn pointer_moved(x: f64, y: f64) -> Result<(), JsError> {
    Ok(with_page(|p| p.pointer_moved(x, y))?)
}

/// Scroll by `delta` rows, cancelling any smooth scroll.
#[wasm_bindgen]
pub fn wheel(delta: f64) -> Result<(), JsError> {
    Ok(with_page(|p| p.wheel(delta))?)
}

#[wasm_bindgen]
pub fn scroll_to(offset: f64) -> Result<(), JsError> {
    Ok(with_page(|p| p.scroll_to(offset))?)
}

#[wasm_bindgen]
pub fn resize(width: f64, height: f64) -> Result<(), JsError> {
    Ok(with_page(|p| p.resize(Viewport::new(width, height)))?)
}

/// Call once per `requestAnimationFrame`. Returns how many frame callbacks
/// ran.
#[wasm_bindgen]
pub fn animation_frame() -> Result<usize, JsError> {
    Ok(with_page(PageSession::frame)?)
}

/// Whether the host needs to keep requesting animation frames.
#[wasm_bindgen]
pub fn needs_frame() -> Result<bool, JsError> {
    Ok(with_page(PageSession::needs_frame)?)
}

/// Navigate to a section by element id. Unknown ids return `false`.
#[wasm_bindgen]
pub fn navigate_to(section_id: &str) -> Result<bool, JsError> {
    Ok(with_page(|p| p.navigate_to(section_id))?)
}

/// Flip the theme; returns the new one (`"dark"` or `"light"`).
#[wasm_bindgen]
pub fn toggle_theme() -> Result<String, JsError> {
    Ok(with_page(|p| p.toggle_theme().to_string())?)
}

/// Render commands for the current state, as JSON.
#[wasm_bindgen]
pub fn render_page() -> Result<String, JsError> {
    Ok(with_page(|p| to_json(&p.render()))??)
}

/// Snapshot of the page state, as JSON.
#[wasm_bindgen]
pub fn page_state() -> Result<String, JsError> {
    Ok(with_page(|p| to_json(&p.snapshot()))??)
}

/// Activate whatever is under `(x, y)`. Returns the outcome as JSON; the
/// host performs `open_url` and `download` outcomes.
#[wasm_bindgen]
pub fn click(x: f64, y: f64) -> Result<String, JsError> {
    Ok(with_page(|p| to_json(&p.click(x, y)))??)
}

/// Tear the page down. Returns `false` if none was mounted.
#[wasm_bindgen]
pub fn dispose() -> bool {
    unmount()
}

#[cfg(test)]
mod tests {
    use folio_protocol::SectionId;

    use super::*;

    #[test]
    fn calls_before_mount_fail() {
        unmount();
        assert_eq!(with_page(|_| ()), Err(BridgeError::NotMounted));
    }

    #[test]
    fn builtin_page_navigates_and_serializes() {
        mount(None, 120.0, 40.0, Some("light")).unwrap();
        assert!(with_page(|p| p.navigate_to("about")).unwrap());
        let state = with_page(|p| to_json(&p.snapshot())).unwrap().unwrap();
        assert!(state.contains(r#""active_section":"about""#));
        assert!(state.contains(r#""theme":"light""#));

        let commands = with_page(|p| to_json(&p.render())).unwrap().unwrap();
        assert!(commands.starts_with('['));
        assert!(unmount());
        assert!(!unmount());
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(matches!(
            mount(Some("{"), 80.0, 24.0, None),
            Err(BridgeError::Content(_))
        ));
        assert_eq!(
            mount(None, 80.0, 24.0, Some("sepia")),
            Err(BridgeError::Theme("sepia".into()))
        );
    }

    #[test]
    fn click_outcome_is_tagged_json() {
        mount(None, 120.0, 40.0, None).unwrap();
        let outcome = with_page(|p| {
            p.frame();
            p.navigate(SectionId::Work);
            to_json(&p.click(-1.0, -1.0))
        })
        .unwrap()
        .unwrap();
        assert_eq!(outcome, r#"{"kind":"ignored"}"#);
        unmount();
    }
}
