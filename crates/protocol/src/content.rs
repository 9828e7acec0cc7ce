use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;

/// The static content of a portfolio page.
///
/// This is the single input the views consume besides UI state. It is
/// opaque to the interaction core: nothing in it is validated or rewritten,
/// it is passed through to the renderer as-is.
///
/// ```text
///   portfolio.json ──▶ Portfolio ──▶ views (+ PageState) ──▶ RenderCommand[] ──▶ Renderer
///                        (this)                                                (egui, TUI,
///                                                                               JS canvas, SVG)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub meta: SiteMeta,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Free-text paragraphs for the About section.
    #[serde(default)]
    pub about: Vec<SharedStr>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub interests: Vec<Interest>,
    /// Lead-in paragraph above the contact entries.
    #[serde(default)]
    pub contact_blurb: Option<SharedStr>,
    #[serde(default)]
    pub contacts: Vec<ContactEntry>,
}

/// Page-level metadata and the intro headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMeta {
    /// Document title.
    pub title: SharedStr,
    /// First line of the headline.
    pub name: SharedStr,
    /// Second, muted line of the headline.
    #[serde(default)]
    pub surname: Option<SharedStr>,
    /// Shown in the logo badge at the top of the nav rail.
    pub initials: SharedStr,
    pub tagline: SharedStr,
    #[serde(default)]
    pub resume: Option<ResumeLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeLink {
    /// Path served alongside the page.
    pub path: SharedStr,
    /// File name offered to the browser's download prompt.
    pub download_name: SharedStr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: SharedStr,
    pub url: SharedStr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobStatus {
    Current,
    #[default]
    Past,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub title: SharedStr,
    #[serde(default)]
    pub subtitle: Option<SharedStr>,
    pub company: SharedStr,
    /// Human-readable range, e.g. `"Dec 2024 - March 2025"`.
    pub period: SharedStr,
    #[serde(default)]
    pub description: Vec<SharedStr>,
    #[serde(default)]
    pub status: JobStatus,
}

impl Job {
    /// The compact badge text used on narrow screens: the first word of the
    /// period's last endpoint (`"Dec 2024 - March 2025"` → `"March"`).
    pub fn short_period(&self) -> &str {
        self.period
            .rsplit(" - ")
            .next()
            .and_then(|end| end.split(' ').next())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    Live,
    #[default]
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: SharedStr,
    pub description: SharedStr,
    #[serde(default)]
    pub tech: Vec<SharedStr>,
    pub year: SharedStr,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub url: Option<SharedStr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: SharedStr,
    /// A short glyph shown above the name.
    #[serde(default)]
    pub icon: Option<SharedStr>,
    pub category: SharedStr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: SharedStr,
    pub institution: SharedStr,
    #[serde(default)]
    pub note: Option<SharedStr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Interest(pub SharedStr);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Email,
    Phone,
    Location,
}

impl ContactKind {
    /// Text glyph standing in for the icon.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Email => "@",
            Self::Phone => "#",
            Self::Location => "*",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub kind: ContactKind,
    pub label: SharedStr,
    pub value: SharedStr,
    /// `mailto:` / `tel:` target; entries without one render as plain text.
    #[serde(default)]
    pub href: Option<SharedStr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(period: &str) -> Job {
        Job {
            title: "Developer".into(),
            subtitle: None,
            company: "Acme".into(),
            period: period.into(),
            description: vec![],
            status: JobStatus::Current,
        }
    }

    #[test]
    fn short_period_takes_last_month() {
        assert_eq!(job("Dec 2024 - March 2025").short_period(), "March");
        assert_eq!(job("2023").short_period(), "2023");
        assert_eq!(job("Jan 2022 - Present").short_period(), "Present");
    }

    #[test]
    fn minimal_document_uses_defaults() {
        let json = r#"{
            "meta": {
                "title": "T",
                "name": "N",
                "initials": "N",
                "tagline": "tag"
            }
        }"#;
        let portfolio: Result<Portfolio, _> = serde_json::from_str(json);
        let portfolio = match portfolio {
            Ok(p) => p,
            Err(e) => panic!("minimal portfolio should parse: {e}"),
        };
        assert!(portfolio.jobs.is_empty());
        assert!(portfolio.meta.resume.is_none());
        assert!(portfolio.contact_blurb.is_none());
    }

    #[test]
    fn contact_kind_is_lowercase_on_the_wire() {
        let entry: Result<ContactEntry, _> = serde_json::from_str(
            r#"{"kind":"location","label":"Location","value":"Somewhere"}"#,
        );
        assert!(matches!(
            entry,
            Ok(ContactEntry {
                kind: ContactKind::Location,
                href: None,
                ..
            })
        ));
    }
}
