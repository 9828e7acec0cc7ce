use serde::{Deserialize, Serialize};

use crate::section::SectionId;
use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for each frame of the page.
/// Renderers consume this list sequentially; each command carries all the
/// data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a text label and a hit
    /// target (for click / hover dispatch).
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        label: Option<SharedStr>,
        hit: Option<HitTarget>,
    },

    /// Draw a text string at a position. `position.y` is the top of the line.
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    /// Remove the active clip region.
    ClearClip,

    /// Push an affine transform (applied to all subsequent commands until
    /// the matching `PopTransform`).
    PushTransform { translate: Point, scale: Point },

    /// Pop the most recent transform.
    PopTransform,

    /// Begin a logical group (a page section, the nav rail). Renderers may
    /// use this for layer separation or accessibility.
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// What an interactive rectangle does when activated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum HitTarget {
    /// A navigation control for a section.
    Nav(SectionId),
    ThemeToggle,
    /// A skill tile, by index into the portfolio's skill list.
    Skill(u32),
    /// An external link (social profile, project, `mailto:`/`tel:`).
    Link(SharedStr),
    ResumeDownload,
}

impl RenderCommand {
    /// The hit target of an interactive `DrawRect`, if any.
    pub fn hit(&self) -> Option<(&Rect, &HitTarget)> {
        match self {
            RenderCommand::DrawRect {
                rect,
                hit: Some(hit),
                ..
            } => Some((rect, hit)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_only_reported_for_interactive_rects() {
        let plain = RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            color: ThemeToken::Surface,
            border_color: None,
            label: None,
            hit: None,
        };
        let nav = RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            color: ThemeToken::NavActive,
            border_color: None,
            label: None,
            hit: Some(HitTarget::Nav(SectionId::Work)),
        };
        assert!(plain.hit().is_none());
        assert_eq!(nav.hit().map(|(_, h)| h.clone()), Some(HitTarget::Nav(SectionId::Work)));
        assert!(RenderCommand::EndGroup.hit().is_none());
    }

    #[test]
    fn hit_target_json_shape() {
        let json = serde_json::to_string(&HitTarget::Nav(SectionId::About)).unwrap_or_default();
        assert_eq!(json, r#"{"kind":"nav","value":"about"}"#);
        let json = serde_json::to_string(&HitTarget::ThemeToggle).unwrap_or_default();
        assert_eq!(json, r#"{"kind":"theme_toggle"}"#);
    }
}
