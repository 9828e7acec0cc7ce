use std::rc::Rc;

use folio_protocol::SectionId;
use tracing::debug;

use crate::model::PageState;

/// The viewport as seen by the navigator.
pub trait ScrollTarget {
    /// Top edge of `section` in document coordinates, or `None` when the
    /// section is not currently rendered.
    fn section_top(&self, section: SectionId) -> Option<f64>;

    /// Start a smooth scroll toward document offset `top`. Fire-and-forget:
    /// the navigator never observes completion.
    fn smooth_scroll_to(&self, top: f64);
}

/// Jumps the viewport to a named section and keeps the active-section
/// indicator in step with explicit navigation.
///
/// The indicator is set as soon as navigation is requested, while the
/// scroll is still animating. Scrolling by other means never changes it.
pub struct SectionNavigator {
    state: Rc<PageState>,
    target: Rc<dyn ScrollTarget>,
}

impl SectionNavigator {
    pub fn new(state: Rc<PageState>, target: Rc<dyn ScrollTarget>) -> Self {
        Self { state, target }
    }

    /// Navigate by element id. Unknown ids are ignored.
    ///
    /// Returns whether navigation happened.
    pub fn navigate_to(&self, section_id: &str) -> bool {
        match SectionId::parse(section_id) {
            Some(section) => self.navigate(section),
            None => {
                debug!(section_id, "ignoring navigation to unknown section");
                false
            }
        }
    }

    /// Navigate to a known section. A section that is not currently
    /// rendered is ignored: no scroll request, no indicator change.
    pub fn navigate(&self, section: SectionId) -> bool {
        let Some(top) = self.target.section_top(section) else {
            debug!(%section, "ignoring navigation to section that is not rendered");
            return false;
        };
        self.target.smooth_scroll_to(top);
        self.state.set_active_section(section);
        debug!(%section, top, "navigated");
        true
    }
}

impl std::fmt::Debug for SectionNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionNavigator")
            .field("active_section", &self.state.active_section())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records scroll requests; renders every section except `hidden`.
    struct FakeViewport {
        hidden: Option<SectionId>,
        requests: RefCell<Vec<f64>>,
    }

    impl FakeViewport {
        fn new(hidden: Option<SectionId>) -> Rc<Self> {
            Rc::new(Self {
                hidden,
                requests: RefCell::new(Vec::new()),
            })
        }
    }

    impl ScrollTarget for FakeViewport {
        fn section_top(&self, section: SectionId) -> Option<f64> {
            if Some(section) == self.hidden {
                return None;
            }
            Some(section.index() as f64 * 100.0)
        }

        fn smooth_scroll_to(&self, top: f64) {
            self.requests.borrow_mut().push(top);
        }
    }

    #[test]
    fn known_section_updates_indicator_and_requests_one_scroll() {
        let state = Rc::new(PageState::new());
        let viewport = FakeViewport::new(None);
        let nav = SectionNavigator::new(state.clone(), viewport.clone());

        assert!(nav.navigate_to("projects"));
        assert_eq!(state.active_section(), SectionId::Projects);
        assert_eq!(*viewport.requests.borrow(), vec![200.0]);
    }

    #[test]
    fn unknown_section_is_a_silent_noop() {
        let state = Rc::new(PageState::new());
        let viewport = FakeViewport::new(None);
        let nav = SectionNavigator::new(state.clone(), viewport.clone());

        assert!(!nav.navigate_to("nonexistent"));
        assert_eq!(state.active_section(), SectionId::Intro);
        assert!(viewport.requests.borrow().is_empty());
    }

    #[test]
    fn unrendered_section_is_a_silent_noop() {
        let state = Rc::new(PageState::new());
        let viewport = FakeViewport::new(Some(SectionId::About));
        let nav = SectionNavigator::new(state.clone(), viewport.clone());

        nav.navigate_to("work");
        assert!(!nav.navigate(SectionId::About));
        assert_eq!(state.active_section(), SectionId::Work);
        assert_eq!(*viewport.requests.borrow(), vec![100.0]);
    }

    #[test]
    fn navigating_to_the_current_section_still_scrolls() {
        let state = Rc::new(PageState::new());
        let viewport = FakeViewport::new(None);
        let nav = SectionNavigator::new(state.clone(), viewport.clone());

        assert!(nav.navigate(SectionId::Intro));
        assert_eq!(state.active_section(), SectionId::Intro);
        assert_eq!(*viewport.requests.borrow(), vec![0.0]);
    }
}
