pub mod commands;
pub mod content;
pub mod section;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::{HitTarget, RenderCommand, TextAlign};
pub use content::{
    ContactEntry, ContactKind, Education, Interest, Job, JobStatus, Portfolio, Project,
    ProjectStatus, ResumeLink, SiteMeta, Skill, SocialLink,
};
pub use section::SectionId;
pub use shared_str::SharedStr;
pub use theme::{ThemeMode, ThemeToken};
pub use types::{Point, Rect, Viewport};
