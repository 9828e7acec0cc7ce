use serde::{Deserialize, Serialize};

/// The fixed set of page sections, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    #[default]
    Intro,
    Work,
    Projects,
    About,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::Intro,
        SectionId::Work,
        SectionId::Projects,
        SectionId::About,
        SectionId::Contact,
    ];

    /// The element id used in links and navigation requests.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Work => "work",
            Self::Projects => "projects",
            Self::About => "about",
            Self::Contact => "contact",
        }
    }

    /// Label shown next to the navigation control.
    pub fn label(self) -> &'static str {
        match self {
            Self::Intro => "Intro",
            Self::Work => "Work",
            Self::Projects => "Projects",
            Self::About => "About",
            Self::Contact => "Contact",
        }
    }

    /// Exact, case-sensitive match on the element id. Unknown ids yield `None`.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == id)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_ids() {
        for section in SectionId::ALL {
            assert_eq!(SectionId::parse(section.as_str()), Some(section));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_mis_cased() {
        assert_eq!(SectionId::parse("nonexistent"), None);
        assert_eq!(SectionId::parse("Projects"), None);
        assert_eq!(SectionId::parse(""), None);
    }

    #[test]
    fn default_is_intro() {
        assert_eq!(SectionId::default(), SectionId::Intro);
    }

    #[test]
    fn serde_uses_element_ids() {
        let json = serde_json::to_string(&SectionId::Projects).unwrap_or_default();
        assert_eq!(json, "\"projects\"");
    }

    #[test]
    fn index_follows_document_order() {
        let indices: Vec<usize> = SectionId::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }
}
