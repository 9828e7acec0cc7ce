use folio_protocol::{Point, Portfolio, Rect, RenderCommand, ThemeToken, Viewport};

use super::{ViewContext, decor, nav, rect_cmd, render_section};
use crate::model::{PageLayout, PageSnapshot};

/// Render the whole page as seen through `viewport`.
///
/// Draw order: background, particles, the sections intersecting the
/// viewport (each translated by `top - scroll_offset`), the nav rail and
/// theme toggle, then the cursor.
pub fn render_page(
    portfolio: &Portfolio,
    layout: &PageLayout,
    snapshot: &PageSnapshot,
    viewport: Viewport,
) -> Vec<RenderCommand> {
    let ctx = ViewContext::new(viewport);
    let scroll = snapshot.scroll_offset;
    let mut commands = vec![rect_cmd(
        Rect::new(0.0, 0.0, viewport.width, viewport.height),
        ThemeToken::Background,
        None,
        None,
        None,
    )];

    commands.extend(decor::particles(&ctx, scroll));

    for span in layout.spans() {
        let top = span.top - scroll;
        if top >= viewport.height || top + span.height <= 0.0 {
            continue;
        }
        let Some(view) = render_section(span.id, portfolio, snapshot, &ctx) else {
            continue;
        };
        commands.push(RenderCommand::BeginGroup {
            id: span.id.as_str().into(),
            label: Some(span.id.label().into()),
        });
        commands.push(RenderCommand::PushTransform {
            translate: Point::new(0.0, top),
            scale: Point::new(1.0, 1.0),
        });
        commands.extend(view.commands);
        commands.push(RenderCommand::PopTransform);
        commands.push(RenderCommand::EndGroup);
    }

    commands.push(RenderCommand::BeginGroup {
        id: "nav".into(),
        label: Some("Navigation".into()),
    });
    commands.extend(nav::rail(portfolio, snapshot, &ctx));
    commands.extend(nav::theme_toggle(snapshot, &ctx));
    commands.push(RenderCommand::EndGroup);

    commands.extend(decor::cursor(&ctx, snapshot));
    commands
}

#[cfg(test)]
mod tests {
    use folio_protocol::SectionId;

    use super::*;
    use crate::content;
    use crate::model::PageState;

    fn groups(cmds: &[RenderCommand]) -> Vec<String> {
        cmds.iter()
            .filter_map(|c| match c {
                RenderCommand::BeginGroup { id, .. } => Some(id.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn only_visible_sections_are_drawn() {
        let Ok(portfolio) = content::builtin() else {
            panic!("builtin content parses");
        };
        let viewport = Viewport::new(120.0, 40.0);
        let layout = PageLayout::compute(&portfolio, viewport);
        let state = PageState::new();

        let cmds = render_page(&portfolio, &layout, &state.snapshot(), viewport);
        assert_eq!(groups(&cmds), vec!["intro", "nav"]);

        let Some(top) = layout.section_top(SectionId::Projects) else {
            panic!("projects rendered");
        };
        state.set_scroll_offset(top);
        let cmds = render_page(&portfolio, &layout, &state.snapshot(), viewport);
        assert!(groups(&cmds).contains(&"projects".to_string()));
        assert!(!groups(&cmds).contains(&"intro".to_string()));
    }

    #[test]
    fn transforms_are_balanced() {
        let Ok(portfolio) = content::builtin() else {
            panic!("builtin content parses");
        };
        let viewport = Viewport::new(80.0, 24.0);
        let layout = PageLayout::compute(&portfolio, viewport);
        let state = PageState::new();
        state.set_scroll_offset(layout.max_offset() / 2.0);

        let cmds = render_page(&portfolio, &layout, &state.snapshot(), viewport);
        let depth = cmds.iter().try_fold(0i32, |depth, c| {
            let next = match c {
                RenderCommand::PushTransform { .. } | RenderCommand::BeginGroup { .. } => depth + 1,
                RenderCommand::PopTransform | RenderCommand::EndGroup => depth - 1,
                _ => depth,
            };
            (next >= 0).then_some(next)
        });
        assert_eq!(depth, Some(0));
    }
}
