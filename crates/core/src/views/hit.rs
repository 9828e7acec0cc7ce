use folio_protocol::{HitTarget, Point, Rect, RenderCommand};

/// Composed (translate x, translate y, scale x, scale y).
type Transform = (f64, f64, f64, f64);

const IDENTITY: Transform = (0.0, 0.0, 1.0, 1.0);

fn place(&(tx, ty, sx, sy): &Transform, rect: &Rect) -> Rect {
    Rect::new(tx + rect.x * sx, ty + rect.y * sy, rect.w * sx, rect.h * sy)
}

/// Find the topmost interactive rectangle under `point`.
///
/// Walks the command list tracking `PushTransform`/`PopTransform`, and
/// clip regions, so `point` is in the same viewport space the renderer
/// draws into. A clip is placed with the transform current at its
/// `SetClip`. Later commands are drawn on top and win.
pub fn hit_test(commands: &[RenderCommand], point: Point) -> Option<HitTarget> {
    let mut transforms: Vec<Transform> = vec![IDENTITY];
    let mut clip: Option<Rect> = None;
    let mut found = None;

    for cmd in commands {
        match cmd {
            RenderCommand::PushTransform { translate, scale } => {
                let &(tx, ty, sx, sy) = transforms.last().unwrap_or(&IDENTITY);
                transforms.push((
                    tx + translate.x * sx,
                    ty + translate.y * sy,
                    sx * scale.x,
                    sy * scale.y,
                ));
            }
            RenderCommand::PopTransform => {
                if transforms.len() > 1 {
                    transforms.pop();
                }
            }
            RenderCommand::SetClip { rect } => {
                clip = Some(place(transforms.last().unwrap_or(&IDENTITY), rect));
            }
            RenderCommand::ClearClip => clip = None,
            RenderCommand::DrawRect {
                rect,
                hit: Some(hit),
                ..
            } => {
                let placed = place(transforms.last().unwrap_or(&IDENTITY), rect);
                let clipped_out = clip.is_some_and(|c| !c.contains(point));
                if !clipped_out && placed.contains(point) {
                    found = Some(hit);
                }
            }
            _ => {}
        }
    }
    found.cloned()
}

#[cfg(test)]
mod tests {
    use folio_protocol::{SectionId, ThemeToken};

    use super::*;

    fn target(x: f64, y: f64, hit: HitTarget) -> RenderCommand {
        RenderCommand::DrawRect {
            rect: Rect::new(x, y, 4.0, 1.0),
            color: ThemeToken::Surface,
            border_color: None,
            label: None,
            hit: Some(hit),
        }
    }

    #[test]
    fn transforms_are_applied() {
        let cmds = vec![
            RenderCommand::PushTransform {
                translate: Point::new(0.0, -50.0),
                scale: Point::new(1.0, 1.0),
            },
            target(10.0, 60.0, HitTarget::Nav(SectionId::Contact)),
            RenderCommand::PopTransform,
        ];
        assert_eq!(
            hit_test(&cmds, Point::new(11.0, 10.5)),
            Some(HitTarget::Nav(SectionId::Contact))
        );
        assert_eq!(hit_test(&cmds, Point::new(11.0, 60.5)), None);
    }

    #[test]
    fn topmost_wins() {
        let cmds = vec![
            target(0.0, 0.0, HitTarget::Skill(0)),
            target(2.0, 0.0, HitTarget::ThemeToggle),
        ];
        assert_eq!(hit_test(&cmds, Point::new(3.0, 0.5)), Some(HitTarget::ThemeToggle));
        assert_eq!(hit_test(&cmds, Point::new(1.0, 0.5)), Some(HitTarget::Skill(0)));
    }

    #[test]
    fn clipped_targets_are_missed() {
        let cmds = vec![
            RenderCommand::SetClip {
                rect: Rect::new(0.0, 0.0, 2.0, 1.0),
            },
            target(0.0, 0.0, HitTarget::ResumeDownload),
            RenderCommand::ClearClip,
        ];
        assert_eq!(hit_test(&cmds, Point::new(1.0, 0.5)), Some(HitTarget::ResumeDownload));
        assert_eq!(hit_test(&cmds, Point::new(3.0, 0.5)), None);
    }

    #[test]
    fn clip_follows_the_transform_it_was_set_under() {
        let cmds = vec![
            RenderCommand::PushTransform {
                translate: Point::new(0.0, -50.0),
                scale: Point::new(1.0, 1.0),
            },
            RenderCommand::SetClip {
                rect: Rect::new(0.0, 60.0, 2.0, 1.0),
            },
            target(0.0, 60.0, HitTarget::Skill(3)),
            RenderCommand::ClearClip,
            RenderCommand::PopTransform,
        ];
        assert_eq!(hit_test(&cmds, Point::new(1.0, 10.5)), Some(HitTarget::Skill(3)));
        assert_eq!(hit_test(&cmds, Point::new(3.0, 10.5)), None);
        assert_eq!(hit_test(&cmds, Point::new(1.0, 60.5)), None);
    }
}
