use std::cell::{Cell, RefCell};

use folio_protocol::{Point, SectionId, SharedStr, ThemeMode};
use serde::{Deserialize, Serialize};

/// Ephemeral UI state of one page session.
///
/// Each value has exactly one writer:
///
/// | value          | writer                                   |
/// |----------------|------------------------------------------|
/// | pointer        | [`ViewportCoalescer`] frame commit       |
/// | scroll offset  | [`ViewportCoalescer`] frame commit       |
/// | active section | [`SectionNavigator::navigate_to`]        |
/// | theme, hover   | the page session (routine presentation)  |
///
/// The coalesced and navigated values have crate-private setters, so the
/// view layer can only read them. The page runs on a single thread; the
/// container is shared as `Rc<PageState>`.
///
/// [`ViewportCoalescer`]: crate::coalescer::ViewportCoalescer
/// [`SectionNavigator::navigate_to`]: crate::navigator::SectionNavigator::navigate_to
#[derive(Debug, Default)]
pub struct PageState {
    pointer: Cell<Point>,
    scroll_offset: Cell<f64>,
    active_section: Cell<SectionId>,
    theme: Cell<ThemeMode>,
    hovered_skill: RefCell<Option<SharedStr>>,
    loaded: Cell<bool>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: ThemeMode) -> Self {
        let state = Self::default();
        state.theme.set(theme);
        state
    }

    /// Last committed pointer position, in viewport coordinates.
    pub fn pointer(&self) -> Point {
        self.pointer.get()
    }

    /// Last committed vertical scroll distance.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset.get()
    }

    pub fn active_section(&self) -> SectionId {
        self.active_section.get()
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme.get()
    }

    pub fn hovered_skill(&self) -> Option<SharedStr> {
        self.hovered_skill.borrow().clone()
    }

    /// Whether the page finished its first frame. Entrance-gated decoration
    /// (the custom cursor) stays hidden until then.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    pub fn toggle_theme(&self) -> ThemeMode {
        let next = self.theme.get().toggled();
        self.theme.set(next);
        next
    }

    pub fn set_theme(&self, theme: ThemeMode) {
        self.theme.set(theme);
    }

    /// Returns whether the hover target changed.
    pub fn set_hovered_skill(&self, skill: Option<SharedStr>) -> bool {
        let mut hovered = self.hovered_skill.borrow_mut();
        if *hovered == skill {
            return false;
        }
        *hovered = skill;
        true
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            pointer: self.pointer(),
            scroll_offset: self.scroll_offset(),
            active_section: self.active_section(),
            theme: self.theme(),
            hovered_skill: self.hovered_skill(),
            loaded: self.is_loaded(),
        }
    }

    pub(crate) fn set_pointer(&self, pointer: Point) {
        self.pointer.set(pointer);
    }

    pub(crate) fn set_scroll_offset(&self, offset: f64) {
        self.scroll_offset.set(offset);
    }

    pub(crate) fn set_active_section(&self, section: SectionId) {
        self.active_section.set(section);
    }

    pub(crate) fn mark_loaded(&self) {
        self.loaded.set(true);
    }
}

/// A plain copy of [`PageState`] for views and for crossing the wasm
/// boundary as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub pointer: Point,
    pub scroll_offset: f64,
    pub active_section: SectionId,
    pub theme: ThemeMode,
    pub hovered_skill: Option<SharedStr>,
    pub loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let state = PageState::new();
        assert_eq!(state.pointer(), Point::new(0.0, 0.0));
        assert_eq!(state.scroll_offset(), 0.0);
        assert_eq!(state.active_section(), SectionId::Intro);
        assert_eq!(state.theme(), ThemeMode::Dark);
        assert!(state.hovered_skill().is_none());
        assert!(!state.is_loaded());
    }

    #[test]
    fn toggle_theme_flips_and_returns_new_mode() {
        let state = PageState::new();
        assert_eq!(state.toggle_theme(), ThemeMode::Light);
        assert_eq!(state.theme(), ThemeMode::Light);
        assert_eq!(state.toggle_theme(), ThemeMode::Dark);
    }

    #[test]
    fn hovered_skill_reports_changes_only() {
        let state = PageState::new();
        assert!(state.set_hovered_skill(Some("AWS".into())));
        assert!(!state.set_hovered_skill(Some("AWS".into())));
        assert!(state.set_hovered_skill(None));
        assert!(!state.set_hovered_skill(None));
    }

    #[test]
    fn snapshot_serializes() {
        let state = PageState::with_theme(ThemeMode::Light);
        state.set_active_section(SectionId::About);
        let json = serde_json::to_string(&state.snapshot()).unwrap_or_default();
        assert!(json.contains(r#""active_section":"about""#));
        assert!(json.contains(r#""theme":"light""#));
    }
}
