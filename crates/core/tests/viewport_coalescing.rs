//! Integration test: drive the coalescer and navigator through fake input
//! sources and a hand-ticked frame queue.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::coalescer::ViewportCoalescer;
use folio_core::frame::FrameQueue;
use folio_core::input::InputChannel;
use folio_core::model::PageState;
use folio_core::navigator::{ScrollTarget, SectionNavigator};
use folio_protocol::{Point, SectionId};

struct Rig {
    state: Rc<PageState>,
    frames: Rc<FrameQueue>,
    pointer: Rc<InputChannel<Point>>,
    scroll: Rc<InputChannel<f64>>,
    coalescer: ViewportCoalescer,
}

fn rig() -> Rig {
    let state = Rc::new(PageState::new());
    let frames = Rc::new(FrameQueue::new());
    let pointer: Rc<InputChannel<Point>> = Rc::new(InputChannel::new());
    let scroll: Rc<InputChannel<f64>> = Rc::new(InputChannel::new());
    let coalescer = ViewportCoalescer::new(state.clone(), frames.clone());
    coalescer.attach(pointer.clone(), scroll.clone());
    Rig {
        state,
        frames,
        pointer,
        scroll,
        coalescer,
    }
}

#[test]
fn burst_within_one_frame_commits_last_position_once() {
    let rig = rig();
    for i in 1..=3 {
        rig.pointer.emit(Point::new(f64::from(i), f64::from(i)));
    }
    assert_eq!(rig.state.pointer(), Point::default());

    rig.frames.run_frame();
    assert_eq!(rig.state.pointer(), Point::new(3.0, 3.0));
    assert_eq!(rig.coalescer.pointer_commits(), 1);
}

#[test]
fn one_commit_per_frame_interval() {
    let rig = rig();
    let intervals: [&[f64]; 4] = [&[10.0, 20.0], &[25.0], &[26.0, 27.0, 30.0], &[12.0]];
    for (k, samples) in intervals.iter().enumerate() {
        for &offset in *samples {
            rig.scroll.emit(offset);
        }
        rig.frames.run_frame();
        assert_eq!(rig.coalescer.scroll_commits(), k as u64 + 1);
        assert_eq!(rig.state.scroll_offset(), *samples.last().unwrap_or(&0.0));
    }
}

#[test]
fn idle_frames_commit_nothing() {
    let rig = rig();
    let before = rig.state.snapshot();
    for _ in 0..5 {
        assert_eq!(rig.frames.run_frame(), 0);
        assert_eq!(rig.state.snapshot(), before);
    }
    assert_eq!(rig.coalescer.pointer_commits(), 0);
    assert_eq!(rig.coalescer.scroll_commits(), 0);
}

#[test]
fn nothing_commits_after_teardown() {
    let rig = rig();
    rig.pointer.emit(Point::new(4.0, 4.0));
    rig.coalescer.teardown();
    rig.coalescer.teardown();
    rig.pointer.emit(Point::new(5.0, 5.0));
    rig.scroll.emit(9.0);
    for _ in 0..3 {
        rig.frames.run_frame();
    }
    assert_eq!(rig.state.pointer(), Point::default());
    assert_eq!(rig.state.scroll_offset(), 0.0);
    assert_eq!(rig.pointer.subscriber_count(), 0);
    assert_eq!(rig.scroll.subscriber_count(), 0);
}

#[derive(Default)]
struct RecordingTarget {
    requests: RefCell<Vec<SectionId>>,
}

impl ScrollTarget for RecordingTarget {
    fn section_top(&self, section: SectionId) -> Option<f64> {
        Some(section.index() as f64 * 50.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let section = SectionId::ALL[(top / 50.0) as usize];
        self.requests.borrow_mut().push(section);
    }
}

#[test]
fn navigation_updates_indicator_before_any_frame() {
    let rig = rig();
    let target = Rc::new(RecordingTarget::default());
    let nav = SectionNavigator::new(rig.state.clone(), target.clone());

    assert!(nav.navigate_to("projects"));
    assert_eq!(rig.state.active_section(), SectionId::Projects);
    assert_eq!(*target.requests.borrow(), vec![SectionId::Projects]);

    assert!(!nav.navigate_to("nonexistent"));
    assert_eq!(rig.state.active_section(), SectionId::Projects);
    assert_eq!(target.requests.borrow().len(), 1);
}

#[test]
fn free_scrolling_never_moves_the_indicator() {
    let rig = rig();
    let nav = SectionNavigator::new(rig.state.clone(), Rc::new(RecordingTarget::default()));
    nav.navigate_to("work");
    for offset in [0.0, 500.0, 1000.0] {
        rig.scroll.emit(offset);
        rig.frames.run_frame();
    }
    assert_eq!(rig.state.active_section(), SectionId::Work);
}
