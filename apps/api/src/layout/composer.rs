//! Page composer — packs the whole document into fixed-height pages.
//!
//! Sections are laid out in a fixed order (experience → education →
//! projects → skills → references); that order is load-bearing for layout
//! correctness, so it lives in `SECTION_ORDER` rather than in code sequence.
//! The personal-info block is seeded on page 1, then each section's splitter
//! call receives and returns the running (pages, current, cursor) triple.
//!
//! `compute_pages` is a pure function of (document, config, measurer): no
//! state survives between calls, and re-running it on an unchanged document
//! yields an identical page sequence. The viewer owns the only persistent
//! state (its current page index).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout::entries::personal_info_fragment;
use crate::layout::font_metrics::LayoutConfig;
use crate::layout::measure::{HeightMeasurer, MeasureError};
use crate::layout::section::{place_section, PagePass, SectionSlot};
use crate::models::cv::{CvDocument, Education, Experience, PersonalInfo, Project, Reference, Skill};

// ────────────────────────────────────────────────────────────────────────────
// Page content
// ────────────────────────────────────────────────────────────────────────────

/// The subset of document content assigned to one physical page.
///
/// A section's title flag is set on the page where the section visually
/// begins — normally the page carrying its first entry; in the rare case
/// where the title fits but not even the first entry's header does, the
/// title stands alone and the entries start on the next page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// Populated on page 1 only (and only when the block is non-blank).
    pub personal_info: Option<PersonalInfo>,
    pub experience: Vec<Experience>,
    pub show_experience_title: bool,
    pub education: Vec<Education>,
    pub show_education_title: bool,
    pub projects: Vec<Project>,
    pub show_projects_title: bool,
    pub skills: Vec<Skill>,
    pub show_skills_title: bool,
    pub references: Vec<Reference>,
    pub show_references_title: bool,
}

impl PageContent {
    pub fn has_content(&self) -> bool {
        self.personal_info.is_some()
            || !self.experience.is_empty()
            || self.show_experience_title
            || !self.education.is_empty()
            || self.show_education_title
            || !self.projects.is_empty()
            || self.show_projects_title
            || !self.skills.is_empty()
            || self.show_skills_title
            || !self.references.is_empty()
            || self.show_references_title
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section order
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Experience,
    Education,
    Projects,
    Skills,
    References,
}

/// The fixed layout order of the five sections.
pub const SECTION_ORDER: [SectionKind; 5] = [
    SectionKind::Experience,
    SectionKind::Education,
    SectionKind::Projects,
    SectionKind::Skills,
    SectionKind::References,
];

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

/// Computes the full page sequence for the interactive viewer.
///
/// Blank entries are filtered out up front; a document with nothing visible
/// still produces exactly one (empty) page. Fails only when the measurement
/// surface does — see [`compute_pages_or_fallback`].
pub fn compute_pages(
    document: &CvDocument,
    config: &LayoutConfig,
    measurer: &dyn HeightMeasurer,
) -> Result<Vec<PageContent>, MeasureError> {
    let mut pass = PagePass::new(measurer, config);

    if !document.personal_info.is_blank() {
        let header = personal_info_fragment(&document.personal_info);
        pass.cursor = pass.measure(&header)?;
        pass.current.personal_info = Some(document.personal_info.clone());
    }

    for kind in SECTION_ORDER {
        match kind {
            SectionKind::Experience => {
                let items: Vec<Experience> = document
                    .experience
                    .iter()
                    .filter(|e| !e.is_blank())
                    .cloned()
                    .collect();
                place_section(
                    &items,
                    SectionSlot {
                        items: |p| &mut p.experience,
                        title_flag: |p| &mut p.show_experience_title,
                    },
                    &mut pass,
                )?;
            }
            SectionKind::Education => {
                let items: Vec<Education> = document
                    .education
                    .iter()
                    .filter(|e| !e.is_blank())
                    .cloned()
                    .collect();
                place_section(
                    &items,
                    SectionSlot {
                        items: |p| &mut p.education,
                        title_flag: |p| &mut p.show_education_title,
                    },
                    &mut pass,
                )?;
            }
            SectionKind::Projects => {
                let items: Vec<Project> = document
                    .projects
                    .iter()
                    .filter(|p| !p.is_blank())
                    .cloned()
                    .collect();
                place_section(
                    &items,
                    SectionSlot {
                        items: |p| &mut p.projects,
                        title_flag: |p| &mut p.show_projects_title,
                    },
                    &mut pass,
                )?;
            }
            SectionKind::Skills => {
                let items: Vec<Skill> = document
                    .skills
                    .iter()
                    .filter(|s| !s.is_blank())
                    .cloned()
                    .collect();
                place_section(
                    &items,
                    SectionSlot {
                        items: |p| &mut p.skills,
                        title_flag: |p| &mut p.show_skills_title,
                    },
                    &mut pass,
                )?;
            }
            SectionKind::References => {
                let items: Vec<Reference> = document
                    .references
                    .iter()
                    .filter(|r| !r.is_blank())
                    .cloned()
                    .collect();
                place_section(
                    &items,
                    SectionSlot {
                        items: |p| &mut p.references,
                        title_flag: |p| &mut p.show_references_title,
                    },
                    &mut pass,
                )?;
            }
        }
    }

    let mut pages = pass.finish();
    if pages.is_empty() {
        // A document always has at least one page.
        pages.push(PageContent::default());
    }
    Ok(pages)
}

/// Export mode bypasses pagination entirely: one page holding the entire
/// unfiltered document. The external exporter owns fixed-page-size layout
/// from there.
pub fn export_page(document: &CvDocument) -> PageContent {
    PageContent {
        personal_info: Some(document.personal_info.clone()),
        show_experience_title: !document.experience.is_empty(),
        experience: document.experience.clone(),
        show_education_title: !document.education.is_empty(),
        education: document.education.clone(),
        show_projects_title: !document.projects.is_empty(),
        projects: document.projects.clone(),
        show_skills_title: !document.skills.is_empty(),
        skills: document.skills.clone(),
        show_references_title: !document.references.is_empty(),
        references: document.references.clone(),
    }
}

/// Pagination with the documented failure policy: a measurement failure is
/// fatal to the pass, and the viewer gets a single unpaginated page instead
/// of a crash.
pub fn compute_pages_or_fallback(
    document: &CvDocument,
    config: &LayoutConfig,
    measurer: &dyn HeightMeasurer,
) -> Vec<PageContent> {
    match compute_pages(document, config, measurer) {
        Ok(pages) => pages,
        Err(e) => {
            warn!(error = %e, "pagination pass failed; falling back to a single unpaginated page");
            vec![export_page(document)]
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
