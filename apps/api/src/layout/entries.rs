//! `SectionItem` bindings for the five entry kinds, plus the personal-info
//! header block. The fragments built here mirror what the display renderer
//! emits, so measured heights track rendered heights.

use crate::layout::markup::{Block, Fragment};
use crate::layout::section::SectionItem;
use crate::models::cv::{Education, Experience, PersonalInfo, Project, Reference, Skill};

fn push_heading(fragment: &mut Fragment, text: String) {
    if !text.trim().is_empty() {
        fragment.push(Block::Heading(text));
    }
}

fn push_text(fragment: &mut Fragment, text: &str) {
    if !text.trim().is_empty() {
        fragment.push(Block::Text(text.to_string()));
    }
}

/// Joins the title row's left side with the date range, the way the page
/// renders it: bold left segment, dates right-aligned on the same line.
fn title_row(left: String, start: &str, end: &str) -> String {
    let dates = match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (s, "") => s.to_string(),
        ("", e) => e.to_string(),
        (s, e) => format!("{s} – {e}"),
    };
    if dates.is_empty() {
        left
    } else if left.is_empty() {
        dates
    } else {
        format!("{left}  {dates}")
    }
}

fn non_blank(description: &str) -> Option<&str> {
    if description.trim().is_empty() {
        None
    } else {
        Some(description)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Splittable entries
// ────────────────────────────────────────────────────────────────────────────

impl SectionItem for Experience {
    fn header_fragment(&self) -> Fragment {
        if self.is_continuation {
            return Vec::new();
        }
        let mut fragment = Vec::new();
        let left = match (self.job_title.trim(), self.company.trim()) {
            ("", c) => c.to_string(),
            (j, "") => j.to_string(),
            (j, c) => format!("{j} | {c}"),
        };
        push_heading(
            &mut fragment,
            title_row(left, &self.start_date, &self.end_date),
        );
        push_text(&mut fragment, &self.city);
        fragment
    }

    fn description(&self) -> Option<&str> {
        non_blank(&self.description)
    }

    fn with_description(&self, description: String) -> Self {
        Experience {
            description,
            ..self.clone()
        }
    }

    fn without_description(&self) -> Self {
        Experience {
            description: String::new(),
            ..self.clone()
        }
    }

    fn into_continuation(&self, remainder: String) -> Self {
        Experience {
            description: remainder,
            is_continuation: true,
            ..self.clone()
        }
    }
}

impl SectionItem for Education {
    fn header_fragment(&self) -> Fragment {
        if self.is_continuation {
            return Vec::new();
        }
        let mut fragment = Vec::new();
        let mut left = self.school.trim().to_string();
        if !self.degree.trim().is_empty() {
            if left.is_empty() {
                left = self.degree.trim().to_string();
            } else {
                left = format!("{left} — {}", self.degree.trim());
            }
        }
        if !self.field_of_study.trim().is_empty() {
            left = format!("{left} in {}", self.field_of_study.trim());
        }
        push_heading(
            &mut fragment,
            title_row(left, &self.start_date, &self.end_date),
        );
        fragment
    }

    fn description(&self) -> Option<&str> {
        non_blank(&self.description)
    }

    fn with_description(&self, description: String) -> Self {
        Education {
            description,
            ..self.clone()
        }
    }

    fn without_description(&self) -> Self {
        Education {
            description: String::new(),
            ..self.clone()
        }
    }

    fn into_continuation(&self, remainder: String) -> Self {
        Education {
            description: remainder,
            is_continuation: true,
            ..self.clone()
        }
    }
}

impl SectionItem for Project {
    fn header_fragment(&self) -> Fragment {
        if self.is_continuation {
            return Vec::new();
        }
        let mut fragment = Vec::new();
        let technologies: Vec<&str> = self
            .technologies
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        let heading = if technologies.is_empty() {
            self.name.trim().to_string()
        } else {
            format!("{} ({})", self.name.trim(), technologies.join(", "))
        };
        push_heading(&mut fragment, heading);
        fragment
    }

    fn description(&self) -> Option<&str> {
        non_blank(&self.description)
    }

    fn with_description(&self, description: String) -> Self {
        Project {
            description,
            ..self.clone()
        }
    }

    fn without_description(&self) -> Self {
        Project {
            description: String::new(),
            ..self.clone()
        }
    }

    fn into_continuation(&self, remainder: String) -> Self {
        Project {
            description: remainder,
            is_continuation: true,
            ..self.clone()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Atomic entries
// ────────────────────────────────────────────────────────────────────────────

impl SectionItem for Skill {
    /// Skills render as one bullet each; the whole entry is its header.
    fn header_fragment(&self) -> Fragment {
        if self.description.trim().is_empty() {
            Vec::new()
        } else {
            vec![Block::List(vec![self.description.trim().to_string()])]
        }
    }

    fn description(&self) -> Option<&str> {
        None
    }

    fn with_description(&self, _description: String) -> Self {
        self.clone()
    }

    fn without_description(&self) -> Self {
        self.clone()
    }

    fn into_continuation(&self, _remainder: String) -> Self {
        self.clone()
    }
}

impl SectionItem for Reference {
    fn header_fragment(&self) -> Fragment {
        let mut fragment = Vec::new();
        let left = match (self.name.trim(), self.company.trim()) {
            ("", c) => c.to_string(),
            (n, "") => n.to_string(),
            (n, c) => format!("{n} | {c}"),
        };
        push_heading(&mut fragment, left);
        let contact: Vec<&str> = [self.email.trim(), self.phone.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        push_text(&mut fragment, &contact.join(" | "));
        fragment
    }

    fn description(&self) -> Option<&str> {
        None
    }

    fn with_description(&self, _description: String) -> Self {
        self.clone()
    }

    fn without_description(&self) -> Self {
        self.clone()
    }

    fn into_continuation(&self, _remainder: String) -> Self {
        self.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Personal-info block
// ────────────────────────────────────────────────────────────────────────────

/// The page-1 header block: name, job title, contact line, links line.
pub(crate) fn personal_info_fragment(info: &PersonalInfo) -> Fragment {
    let mut fragment = Vec::new();
    push_heading(&mut fragment, info.name.trim().to_string());
    push_heading(&mut fragment, info.job_title.trim().to_string());
    let contact: Vec<&str> = [info.phone.trim(), info.email.trim(), info.city.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    push_text(&mut fragment, &contact.join(" | "));
    let links: Vec<&str> = info
        .links
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();
    push_text(&mut fragment, &links.join(" | "));
    fragment
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
