use folio_protocol::{Portfolio, SectionId, Viewport};
use serde::{Deserialize, Serialize};

use super::PageState;
use crate::views::{ViewContext, render_section};

/// Vertical extent of one rendered section, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionSpan {
    pub id: SectionId,
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Sections stacked top to bottom in document order.
///
/// Sections without content are left out and have no top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    viewport: Viewport,
    spans: Vec<SectionSpan>,
}

impl PageLayout {
    pub fn compute(portfolio: &Portfolio, viewport: Viewport) -> Self {
        let ctx = ViewContext::new(viewport);
        // Section heights do not depend on pointer, scroll, or hover.
        let snapshot = PageState::new().snapshot();
        let mut top = 0.0;
        let spans = SectionId::ALL
            .into_iter()
            .filter_map(|id| {
                let view = render_section(id, portfolio, &snapshot, &ctx)?;
                let span = SectionSpan {
                    id,
                    top,
                    height: view.height,
                };
                top += view.height;
                Some(span)
            })
            .collect();
        Self { viewport, spans }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn spans(&self) -> &[SectionSpan] {
        &self.spans
    }

    pub fn section_top(&self, id: SectionId) -> Option<f64> {
        self.spans.iter().find(|s| s.id == id).map(|s| s.top)
    }

    /// The section covering document offset `y`.
    pub fn section_at(&self, y: f64) -> Option<SectionId> {
        self.spans
            .iter()
            .find(|s| y >= s.top && y < s.bottom())
            .map(|s| s.id)
    }

    pub fn total_height(&self) -> f64 {
        self.spans.last().map_or(0.0, SectionSpan::bottom)
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_offset(&self) -> f64 {
        (self.total_height() - self.viewport.height).max(0.0)
    }
}
