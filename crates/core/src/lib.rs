//! Interaction core and view transforms for the folio portfolio page.
//!
//! Raw input (pointer moves, scroll offsets) flows through
//! [`coalescer::ViewportCoalescer`], which commits at most one sample per
//! stream per frame into [`model::PageState`]. Navigation controls go through
//! [`navigator::SectionNavigator`]. The views read the state and the static
//! [`folio_protocol::Portfolio`] and emit render commands.
//!
//! [`model::PageSession`] wires all of it together for a frontend.

pub mod coalescer;
pub mod content;
pub mod frame;
pub mod input;
pub mod model;
pub mod navigator;
pub mod scroll;
pub mod svg;
pub mod text;
pub mod views;
