//! CV document model — the unit of editing, pagination, and export.
//!
//! Entry identifiers are opaque strings assigned by the editing client and
//! are never reused within a session; insertion order of each collection is
//! the authoritative display order.
//!
//! Experience, education, and project entries carry a free-form markdown
//! description that the layout engine may split across a page boundary. The
//! tail fragment of a split is a clone with `is_continuation = true`; such
//! clones suppress their header on render and only exist inside computed
//! `PageContent` values, never in the stored document.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    /// Important URLs (GitHub, LinkedIn, portfolio, ...).
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_continuation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_continuation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_continuation: bool,
}

/// A single skill line. Skills render as one bullet list and are atomic:
/// an entry that does not fit moves wholesale to the next page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// The full editable document: one personal-info block plus the five
/// ordered entry collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvDocument {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub references: Vec<Reference>,
}

fn blank_str(s: &str) -> bool {
    s.trim().is_empty()
}

fn blank_list(items: &[String]) -> bool {
    !items.iter().any(|s| !blank_str(s))
}

impl PersonalInfo {
    pub fn is_blank(&self) -> bool {
        blank_str(&self.name)
            && blank_str(&self.job_title)
            && blank_str(&self.email)
            && blank_str(&self.phone)
            && blank_str(&self.city)
            && blank_list(&self.links)
    }
}

impl Experience {
    /// An entry is blank if every field except `id` is empty or
    /// whitespace-only. Blank entries stay editable but are excluded from
    /// pagination.
    pub fn is_blank(&self) -> bool {
        blank_str(&self.job_title)
            && blank_str(&self.company)
            && blank_str(&self.start_date)
            && blank_str(&self.end_date)
            && blank_str(&self.city)
            && blank_str(&self.description)
    }
}

impl Education {
    pub fn is_blank(&self) -> bool {
        blank_str(&self.school)
            && blank_str(&self.degree)
            && blank_str(&self.field_of_study)
            && blank_str(&self.start_date)
            && blank_str(&self.end_date)
            && blank_str(&self.description)
    }
}

impl Project {
    pub fn is_blank(&self) -> bool {
        blank_str(&self.name) && blank_list(&self.technologies) && blank_str(&self.description)
    }
}

impl Skill {
    pub fn is_blank(&self) -> bool {
        blank_str(&self.description)
    }
}

impl Reference {
    pub fn is_blank(&self) -> bool {
        blank_str(&self.name)
            && blank_str(&self.company)
            && blank_str(&self.email)
            && blank_str(&self.phone)
    }
}

impl CvDocument {
    /// True when no section has a non-blank entry and the personal-info
    /// block is blank. A fully blank document still paginates to one page.
    pub fn is_blank(&self) -> bool {
        self.personal_info.is_blank()
            && !self.experience.iter().any(|e| !e.is_blank())
            && !self.education.iter().any(|e| !e.is_blank())
            && !self.projects.iter().any(|p| !p.is_blank())
            && !self.skills.iter().any(|s| !s.is_blank())
            && !self.references.iter().any(|r| !r.is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_experience(description: &str) -> Experience {
        Experience {
            id: "exp-1".to_string(),
            job_title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            start_date: "2021".to_string(),
            end_date: "2024".to_string(),
            city: "Oslo".to_string(),
            description: description.to_string(),
            is_continuation: false,
        }
    }

    #[test]
    fn test_fresh_entry_is_blank() {
        let entry = Experience {
            id: "exp-new".to_string(),
            ..Default::default()
        };
        assert!(entry.is_blank(), "freshly added entry should be blank");
    }

    #[test]
    fn test_whitespace_only_fields_are_blank() {
        let entry = Experience {
            id: "exp-ws".to_string(),
            job_title: "   ".to_string(),
            description: "\n\t".to_string(),
            ..Default::default()
        };
        assert!(entry.is_blank(), "whitespace-only fields do not count");
    }

    #[test]
    fn test_single_filled_field_is_not_blank() {
        let entry = Experience {
            id: "exp-2".to_string(),
            city: "Bergen".to_string(),
            ..Default::default()
        };
        assert!(!entry.is_blank());
    }

    #[test]
    fn test_id_does_not_count_toward_blankness() {
        let entry = make_experience("");
        assert!(!entry.is_blank());
        let empty = Experience {
            id: "some-opaque-id".to_string(),
            ..Default::default()
        };
        assert!(empty.is_blank(), "id alone never makes an entry non-blank");
    }

    #[test]
    fn test_project_blank_technology_list() {
        let project = Project {
            id: "p1".to_string(),
            technologies: vec!["  ".to_string(), "".to_string()],
            ..Default::default()
        };
        assert!(project.is_blank(), "list of blank strings counts as empty");

        let project = Project {
            technologies: vec!["Rust".to_string()],
            ..project
        };
        assert!(!project.is_blank());
    }

    #[test]
    fn test_blank_document() {
        let doc = CvDocument::default();
        assert!(doc.is_blank());

        let doc = CvDocument {
            skills: vec![Skill {
                id: "s1".to_string(),
                description: "Rust".to_string(),
            }],
            ..Default::default()
        };
        assert!(!doc.is_blank());
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let doc = CvDocument {
            personal_info: PersonalInfo {
                name: "Ada Lovelace".to_string(),
                links: vec!["https://github.com/ada".to_string()],
                ..Default::default()
            },
            experience: vec![make_experience("- Built the engine\n- Shipped it")],
            ..Default::default()
        };
        let json = serde_json::to_string(&doc).expect("serialize");
        let back: CvDocument = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, doc);
        assert!(
            json.contains("jobTitle"),
            "wire format uses camelCase field names"
        );
    }
}
