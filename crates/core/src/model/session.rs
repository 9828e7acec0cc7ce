use std::cell::{Ref, RefCell};
use std::rc::Rc;

use folio_protocol::{
    HitTarget, Point, Portfolio, RenderCommand, SectionId, SharedStr, ThemeMode, Viewport,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::{PageLayout, PageSnapshot, PageState};
use crate::coalescer::ViewportCoalescer;
use crate::frame::FrameQueue;
use crate::input::InputChannel;
use crate::navigator::SectionNavigator;
use crate::scroll::SmoothScroller;
use crate::views;

/// The outcome of activating a hit target.
///
/// In-page effects (navigation, theme) have already happened when this is
/// returned. Effects outside the page (opening a link, saving a file) are
/// left to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    Navigated { section: SectionId },
    ThemeChanged { theme: ThemeMode },
    OpenUrl { url: SharedStr },
    Download { path: SharedStr, file_name: SharedStr },
    Ignored,
}

/// One mounted page: content, UI state, and the input plumbing between
/// the frontend and the state.
///
/// The frontend feeds raw events in (`pointer_moved`, `wheel`, `click`),
/// calls [`frame`](Self::frame) once per repaint, then draws
/// [`render`](Self::render).
pub struct PageSession {
    content: Rc<Portfolio>,
    state: Rc<PageState>,
    frames: Rc<FrameQueue>,
    pointer_input: Rc<InputChannel<Point>>,
    layout: Rc<RefCell<PageLayout>>,
    scroller: Rc<SmoothScroller>,
    coalescer: ViewportCoalescer,
    navigator: SectionNavigator,
    torn_down: bool,
}

impl PageSession {
    pub fn new(content: Portfolio, viewport: Viewport) -> Self {
        Self::with_theme(content, viewport, ThemeMode::default())
    }

    pub fn with_theme(content: Portfolio, viewport: Viewport, theme: ThemeMode) -> Self {
        let content = Rc::new(content);
        let state = Rc::new(PageState::with_theme(theme));
        let frames = Rc::new(FrameQueue::new());
        let pointer_input: Rc<InputChannel<Point>> = Rc::new(InputChannel::new());
        let scroll_input: Rc<InputChannel<f64>> = Rc::new(InputChannel::new());

        let layout = Rc::new(RefCell::new(PageLayout::compute(&content, viewport)));
        let scroller = SmoothScroller::new(layout.clone(), frames.clone(), scroll_input.clone());

        let coalescer = ViewportCoalescer::new(state.clone(), frames.clone());
        coalescer.attach(pointer_input.clone(), scroll_input);
        let navigator = SectionNavigator::new(state.clone(), scroller.clone());

        info!(
            sections = layout.borrow().spans().len(),
            height = layout.borrow().total_height(),
            %theme,
            "page session created"
        );

        Self {
            content,
            state,
            frames,
            pointer_input,
            layout,
            scroller,
            coalescer,
            navigator,
            torn_down: false,
        }
    }

    pub fn content(&self) -> &Portfolio {
        &self.content
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.state.snapshot()
    }

    pub fn layout(&self) -> Ref<'_, PageLayout> {
        self.layout.borrow()
    }

    pub fn viewport(&self) -> Viewport {
        self.layout.borrow().viewport()
    }

    pub fn coalescer(&self) -> &ViewportCoalescer {
        &self.coalescer
    }

    /// Raw pointer movement at viewport coordinates.
    pub fn pointer_moved(&self, x: f64, y: f64) {
        self.pointer_input.emit(Point::new(x, y));
    }

    /// Scroll by `delta` layout units (wheel, arrow keys, drag).
    pub fn wheel(&self, delta: f64) {
        if !self.torn_down {
            self.scroller.scroll_by(delta);
        }
    }

    /// Jump the viewport to document offset `offset`.
    pub fn scroll_to(&self, offset: f64) {
        if !self.torn_down {
            self.scroller.scroll_to(offset);
        }
    }

    /// Navigate to a section by its element id. Unknown ids and sections
    /// without content are ignored.
    pub fn navigate_to(&self, section_id: &str) -> bool {
        !self.torn_down && self.navigator.navigate_to(section_id)
    }

    pub fn navigate(&self, section: SectionId) -> bool {
        !self.torn_down && self.navigator.navigate(section)
    }

    pub fn toggle_theme(&self) -> ThemeMode {
        let theme = self.state.toggle_theme();
        debug!(%theme, "theme toggled");
        theme
    }

    pub fn set_theme(&self, theme: ThemeMode) {
        self.state.set_theme(theme);
    }

    /// Set or clear the hovered skill by name. Returns whether it changed.
    pub fn hover_skill(&self, name: Option<SharedStr>) -> bool {
        self.state.set_hovered_skill(name)
    }

    /// Lay the page out again for a new viewport size.
    pub fn resize(&self, viewport: Viewport) {
        if self.layout.borrow().viewport() == viewport {
            return;
        }
        *self.layout.borrow_mut() = PageLayout::compute(&self.content, viewport);
        self.scroller.relayout();
        debug!(width = viewport.width, height = viewport.height, "page resized");
    }

    /// Run one frame boundary: commit coalesced input and advance any
    /// smooth scroll. Returns how many frame callbacks ran.
    ///
    /// A smooth-scroll step emits its sample from inside the frame, so that
    /// sample is committed on the following frame. A smooth scroll of
    /// [`SCROLL_FRAMES`](crate::scroll::SCROLL_FRAMES) steps therefore
    /// settles after one extra frame.
    pub fn frame(&self) -> usize {
        let fired = self.frames.run_frame();
        let first = !self.state.is_loaded();
        if first {
            self.state.mark_loaded();
            info!("page loaded");
        }
        if (fired > 0 || first) && !self.torn_down {
            self.refresh_hover();
        }
        fired
    }

    /// Whether another frame is needed to finish pending work.
    pub fn needs_frame(&self) -> bool {
        self.frames.has_pending()
    }

    pub fn is_animating(&self) -> bool {
        self.scroller.is_animating()
    }

    pub fn render(&self) -> Vec<RenderCommand> {
        views::render_page(
            &self.content,
            &self.layout.borrow(),
            &self.state.snapshot(),
            self.viewport(),
        )
    }

    /// The interactive element under viewport point `(x, y)`.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<HitTarget> {
        views::hit_test(&self.render(), Point::new(x, y))
    }

    pub fn click(&self, x: f64, y: f64) -> Activation {
        match self.hit_test(x, y) {
            Some(target) => self.activate(&target),
            None => Activation::Ignored,
        }
    }

    pub fn activate(&self, target: &HitTarget) -> Activation {
        let activation = match target {
            HitTarget::Nav(section) => {
                if self.navigate(*section) {
                    Activation::Navigated { section: *section }
                } else {
                    Activation::Ignored
                }
            }
            HitTarget::ThemeToggle => Activation::ThemeChanged {
                theme: self.toggle_theme(),
            },
            HitTarget::Skill(index) => {
                // Touch screens have no hover; a tap stands in for it.
                let name = self.skill_name(*index);
                self.hover_skill(name);
                Activation::Ignored
            }
            HitTarget::Link(url) => Activation::OpenUrl { url: url.clone() },
            HitTarget::ResumeDownload => match &self.content.meta.resume {
                Some(resume) => Activation::Download {
                    path: resume.path.clone(),
                    file_name: resume.download_name.clone(),
                },
                None => Activation::Ignored,
            },
        };
        debug!(?target, ?activation, "activated");
        activation
    }

    /// Stop listening for input and cancel outstanding frame work.
    /// Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.scroller.cancel();
        self.coalescer.teardown();
        info!("page session torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn skill_name(&self, index: u32) -> Option<SharedStr> {
        self.content
            .skills
            .get(index as usize)
            .map(|s| s.name.clone())
    }

    fn refresh_hover(&self) {
        let pointer = self.state.pointer();
        let hovered = match self.hit_test(pointer.x, pointer.y) {
            Some(HitTarget::Skill(index)) => self.skill_name(index),
            _ => None,
        };
        if self.state.set_hovered_skill(hovered.clone()) {
            trace!(skill = ?hovered, "hover changed");
        }
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for PageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSession")
            .field("state", &self.state)
            .field("scroller", &self.scroller)
            .field("coalescer", &self.coalescer)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::scroll::SCROLL_FRAMES;

    fn session() -> PageSession {
        PageSession::new(content::builtin().unwrap(), Viewport::new(120.0, 40.0))
    }

    fn settle(session: &PageSession) {
        while session.needs_frame() {
            session.frame();
        }
    }

    #[test]
    fn first_frame_marks_loaded() {
        let s = session();
        assert!(!s.snapshot().loaded);
        s.frame();
        assert!(s.snapshot().loaded);
    }

    #[test]
    fn pointer_bursts_commit_once_per_frame() {
        let s = session();
        s.pointer_moved(20.0, 5.0);
        s.pointer_moved(21.0, 6.0);
        s.pointer_moved(22.0, 7.0);
        assert_eq!(s.snapshot().pointer, Point::default());
        s.frame();
        assert_eq!(s.snapshot().pointer, Point::new(22.0, 7.0));
        assert_eq!(s.coalescer().pointer_commits(), 1);
    }

    #[test]
    fn navigation_scrolls_smoothly_and_sets_active_section() {
        let s = session();
        assert!(s.navigate_to("about"));
        assert_eq!(s.snapshot().active_section, SectionId::About);
        assert!(s.is_animating());
        settle(&s);
        assert_eq!(
            Some(s.snapshot().scroll_offset),
            s.layout().section_top(SectionId::About)
        );
        // The indicator follows navigation, not scrolling.
        s.wheel(-10.0);
        settle(&s);
        assert_eq!(s.snapshot().active_section, SectionId::About);
    }

    #[test]
    fn smooth_scroll_commits_one_frame_behind() {
        let s = session();
        s.frame();
        assert!(s.navigate(SectionId::About));
        let target = s.layout().section_top(SectionId::About);
        for _ in 0..SCROLL_FRAMES {
            s.frame();
        }
        assert!(!s.is_animating());
        assert_ne!(Some(s.snapshot().scroll_offset), target);
        assert!(s.needs_frame());

        assert_eq!(s.frame(), 1);
        assert_eq!(Some(s.snapshot().scroll_offset), target);
        assert!(!s.needs_frame());
    }

    #[test]
    fn non_finite_scrolls_are_ignored() {
        let s = session();
        s.scroll_to(12.0);
        s.wheel(f64::NAN);
        s.scroll_to(f64::INFINITY);
        s.wheel(f64::NEG_INFINITY);
        settle(&s);
        assert_eq!(s.snapshot().scroll_offset, 12.0);
    }

    #[test]
    fn clicking_nav_entry_navigates() {
        let s = session();
        s.frame();
        let target = s.render().iter().find_map(|c| match c.hit() {
            Some((rect, HitTarget::Nav(SectionId::Contact))) => Some(*rect),
            _ => None,
        });
        let Some(rect) = target else {
            panic!("contact nav entry rendered");
        };
        let activation = s.click(rect.x + 0.5, rect.y + 0.5);
        assert_eq!(
            activation,
            Activation::Navigated {
                section: SectionId::Contact
            }
        );
        assert_eq!(s.snapshot().active_section, SectionId::Contact);
    }

    #[test]
    fn theme_toggle_and_resume_activation() {
        let s = session();
        assert_eq!(
            s.activate(&HitTarget::ThemeToggle),
            Activation::ThemeChanged {
                theme: ThemeMode::Light
            }
        );
        assert_eq!(
            s.activate(&HitTarget::ResumeDownload),
            Activation::Download {
                path: "/imdad_resume.pdf".into(),
                file_name: "imdad_Resume.pdf".into(),
            }
        );
    }

    #[test]
    fn resize_reclamps_scroll() {
        let s = session();
        s.scroll_to(f64::MAX);
        settle(&s);
        let before = s.snapshot().scroll_offset;
        s.resize(Viewport::new(300.0, 40.0));
        settle(&s);
        assert!(s.snapshot().scroll_offset <= before);
        assert_eq!(s.snapshot().scroll_offset, s.layout().max_offset());
    }

    #[test]
    fn teardown_stops_commits() {
        let mut s = session();
        s.pointer_moved(5.0, 5.0);
        s.teardown();
        s.teardown();
        s.pointer_moved(9.0, 9.0);
        s.frame();
        assert_eq!(s.snapshot().pointer, Point::default());
        assert!(!s.navigate_to("work"));
        assert!(!s.needs_frame());
    }
}
