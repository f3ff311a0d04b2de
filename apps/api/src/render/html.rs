//! Full-fidelity HTML rendering of one page for the preview pane.
//!
//! This is the display half of the two-renderer design: the layout engine
//! measures against the simplified dialect in `layout::markup`, while this
//! renderer produces what the user actually sees. The deliberate difference:
//! here adjacent non-blank lines merge into one paragraph with soft breaks,
//! exactly as a full markdown engine renders them, whereas the measurement
//! renderer treats each line as its own paragraph. The resulting height gap
//! is small and absorbed by layout tolerances.
//!
//! Continuation entries render without their header block and with the
//! `continuation` class (reduced top spacing — no header precedes them).

use crate::layout::PageContent;
use crate::models::cv::{Education, Experience, PersonalInfo, Project, Reference, Skill};

/// Renders one page's content as an HTML fragment.
pub fn render_page_html(page: &PageContent) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"cv-page\">");

    if let Some(info) = &page.personal_info {
        render_personal_info(&mut html, info);
    }

    if page.show_experience_title || !page.experience.is_empty() {
        html.push_str("<section class=\"experience\">");
        if page.show_experience_title {
            section_title(&mut html, "Experience");
        }
        for entry in &page.experience {
            render_experience(&mut html, entry);
        }
        html.push_str("</section>");
    }

    if page.show_education_title || !page.education.is_empty() {
        html.push_str("<section class=\"education\">");
        if page.show_education_title {
            section_title(&mut html, "Education");
        }
        for entry in &page.education {
            render_education(&mut html, entry);
        }
        html.push_str("</section>");
    }

    if page.show_projects_title || !page.projects.is_empty() {
        html.push_str("<section class=\"projects\">");
        if page.show_projects_title {
            section_title(&mut html, "Projects");
        }
        for entry in &page.projects {
            render_project(&mut html, entry);
        }
        html.push_str("</section>");
    }

    if page.show_skills_title || !page.skills.is_empty() {
        html.push_str("<section class=\"skills\">");
        if page.show_skills_title {
            section_title(&mut html, "Skills");
        }
        render_skills(&mut html, &page.skills);
        html.push_str("</section>");
    }

    if page.show_references_title || !page.references.is_empty() {
        html.push_str("<section class=\"references\">");
        if page.show_references_title {
            section_title(&mut html, "References");
        }
        for entry in &page.references {
            render_reference(&mut html, entry);
        }
        html.push_str("</section>");
    }

    html.push_str("</div>");
    html
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

fn section_title(html: &mut String, title: &str) {
    html.push_str("<h2 class=\"section-title\">");
    html.push_str(title);
    html.push_str("</h2>");
}

fn render_personal_info(html: &mut String, info: &PersonalInfo) {
    html.push_str("<header class=\"personal-info\">");
    if !info.name.trim().is_empty() {
        html.push_str("<h1>");
        html.push_str(&escape(info.name.trim()));
        html.push_str("</h1>");
    }
    if !info.job_title.trim().is_empty() {
        html.push_str("<p class=\"job-title\">");
        html.push_str(&escape(info.job_title.trim()));
        html.push_str("</p>");
    }
    let contact: Vec<String> = [&info.phone, &info.email, &info.city]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(escape)
        .collect();
    if !contact.is_empty() {
        html.push_str("<div class=\"contact\">");
        html.push_str(&contact.join(" | "));
        html.push_str("</div>");
    }
    let links: Vec<String> = info
        .links
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| format!("<a href=\"{0}\">{0}</a>", escape(l)))
        .collect();
    if !links.is_empty() {
        html.push_str("<div class=\"links\">");
        html.push_str(&links.join(" | "));
        html.push_str("</div>");
    }
    html.push_str("</header>");
}

fn entry_open(html: &mut String, is_continuation: bool) {
    if is_continuation {
        html.push_str("<div class=\"entry continuation\">");
    } else {
        html.push_str("<div class=\"entry\">");
    }
}

fn render_experience(html: &mut String, entry: &Experience) {
    entry_open(html, entry.is_continuation);
    if !entry.is_continuation {
        html.push_str("<div class=\"entry-header\"><div>");
        html.push_str("<span class=\"entry-title\">");
        html.push_str(&escape(entry.job_title.trim()));
        html.push_str("</span>");
        if !entry.company.trim().is_empty() {
            html.push_str(" | ");
            html.push_str(&escape(entry.company.trim()));
        }
        html.push_str("</div><div class=\"dates\">");
        html.push_str(&escape(&date_range(&entry.start_date, &entry.end_date)));
        html.push_str("</div></div>");
        if !entry.city.trim().is_empty() {
            html.push_str("<div class=\"city\">");
            html.push_str(&escape(entry.city.trim()));
            html.push_str("</div>");
        }
    }
    render_markdown(html, &entry.description);
    html.push_str("</div>");
}

fn render_education(html: &mut String, entry: &Education) {
    entry_open(html, entry.is_continuation);
    if !entry.is_continuation {
        html.push_str("<div class=\"entry-header\"><div>");
        html.push_str("<span class=\"entry-title\">");
        html.push_str(&escape(entry.school.trim()));
        html.push_str("</span>");
        if !entry.degree.trim().is_empty() {
            html.push_str(" — ");
            html.push_str(&escape(entry.degree.trim()));
        }
        if !entry.field_of_study.trim().is_empty() {
            html.push_str(" in ");
            html.push_str(&escape(entry.field_of_study.trim()));
        }
        html.push_str("</div><div class=\"dates\">");
        html.push_str(&escape(&date_range(&entry.start_date, &entry.end_date)));
        html.push_str("</div></div>");
    }
    render_markdown(html, &entry.description);
    html.push_str("</div>");
}

fn render_project(html: &mut String, entry: &Project) {
    entry_open(html, entry.is_continuation);
    if !entry.is_continuation {
        let technologies: Vec<&str> = entry
            .technologies
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        html.push_str("<div class=\"entry-title\">");
        html.push_str(&escape(entry.name.trim()));
        if !technologies.is_empty() {
            html.push_str(&escape(&format!(" ({})", technologies.join(", "))));
        }
        html.push_str("</div>");
    }
    render_markdown(html, &entry.description);
    html.push_str("</div>");
}

fn render_skills(html: &mut String, skills: &[Skill]) {
    if skills.is_empty() {
        return;
    }
    html.push_str("<ul class=\"skill-list\">");
    for skill in skills {
        html.push_str("<li>");
        html.push_str(&escape(skill.description.trim()));
        html.push_str("</li>");
    }
    html.push_str("</ul>");
}

fn render_reference(html: &mut String, entry: &Reference) {
    html.push_str("<div class=\"entry\">");
    html.push_str("<div class=\"entry-title\">");
    html.push_str(&escape(entry.name.trim()));
    if !entry.company.trim().is_empty() {
        html.push_str(" | ");
        html.push_str(&escape(entry.company.trim()));
    }
    html.push_str("</div>");
    let contact: Vec<String> = [&entry.email, &entry.phone]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(escape)
        .collect();
    if !contact.is_empty() {
        html.push_str("<div class=\"contact\">");
        html.push_str(&contact.join(" | "));
        html.push_str("</div>");
    }
    html.push_str("</div>");
}

// ────────────────────────────────────────────────────────────────────────────
// Markdown (display fidelity)
// ────────────────────────────────────────────────────────────────────────────

/// Renders the description subset with display fidelity: consecutive plain
/// lines merge into one paragraph joined by `<br>`, list runs become one
/// `<ul>`, blank lines separate blocks.
fn render_markdown(html: &mut String, markdown: &str) {
    if markdown.trim().is_empty() {
        return;
    }
    html.push_str("<div class=\"markdown-content\">");

    let mut paragraph: Vec<String> = Vec::new();
    let mut list: Vec<String> = Vec::new();

    let flush_paragraph = |html: &mut String, paragraph: &mut Vec<String>| {
        if !paragraph.is_empty() {
            html.push_str("<p>");
            html.push_str(&paragraph.join("<br>"));
            html.push_str("</p>");
            paragraph.clear();
        }
    };
    let flush_list = |html: &mut String, list: &mut Vec<String>| {
        if !list.is_empty() {
            html.push_str("<ul>");
            for item in list.iter() {
                html.push_str("<li>");
                html.push_str(item);
                html.push_str("</li>");
            }
            html.push_str("</ul>");
            list.clear();
        }
    };

    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_paragraph(html, &mut paragraph);
            flush_list(html, &mut list);
        } else if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            flush_paragraph(html, &mut paragraph);
            list.push(escape(item));
        } else {
            flush_list(html, &mut list);
            paragraph.push(escape(trimmed));
        }
    }
    flush_paragraph(html, &mut paragraph);
    flush_list(html, &mut list);

    html.push_str("</div>");
}

fn date_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (s, "") => s.to_string(),
        ("", e) => e.to_string(),
        (s, e) => format!("{s} – {e}"),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_experience() -> Experience {
        Experience {
            id: "e1".to_string(),
            job_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            start_date: "2021".to_string(),
            end_date: "2024".to_string(),
            city: "Oslo".to_string(),
            description: "- built the engine".to_string(),
            is_continuation: false,
        }
    }

    fn make_page(entry: Experience) -> PageContent {
        PageContent {
            experience: vec![entry],
            show_experience_title: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_regular_entry_renders_header() {
        let html = render_page_html(&make_page(make_experience()));
        assert!(html.contains("Engineer"));
        assert!(html.contains("Acme"));
        assert!(html.contains("2021 – 2024"));
        assert!(html.contains("<h2 class=\"section-title\">Experience</h2>"));
        assert!(!html.contains("continuation"));
    }

    #[test]
    fn test_continuation_entry_suppresses_header() {
        let continuation = Experience {
            is_continuation: true,
            description: "rest of the description".to_string(),
            ..make_experience()
        };
        let page = PageContent {
            experience: vec![continuation],
            show_experience_title: false,
            ..Default::default()
        };
        let html = render_page_html(&page);
        assert!(html.contains("class=\"entry continuation\""));
        assert!(
            !html.contains("entry-header"),
            "continuation must not render its header block"
        );
        assert!(!html.contains("Acme"));
        assert!(html.contains("rest of the description"));
    }

    #[test]
    fn test_title_flag_controls_section_heading() {
        let mut page = make_page(make_experience());
        page.show_experience_title = false;
        let html = render_page_html(&page);
        assert!(!html.contains("section-title"));
        assert!(html.contains("Engineer"), "entries render without the title");
    }

    #[test]
    fn test_adjacent_lines_merge_into_one_paragraph() {
        let entry = Experience {
            description: "line one\nline two\n\nsecond paragraph".to_string(),
            ..make_experience()
        };
        let html = render_page_html(&make_page(entry));
        assert!(
            html.contains("<p>line one<br>line two</p>"),
            "display rendering soft-breaks adjacent lines: {html}"
        );
        assert!(html.contains("<p>second paragraph</p>"));
    }

    #[test]
    fn test_list_items_grouped() {
        let entry = Experience {
            description: "- one\n* two".to_string(),
            ..make_experience()
        };
        let html = render_page_html(&make_page(entry));
        assert!(html.contains("<ul><li>one</li><li>two</li></ul>"));
    }

    #[test]
    fn test_html_is_escaped() {
        let entry = Experience {
            job_title: "<script>alert(1)</script>".to_string(),
            ..make_experience()
        };
        let html = render_page_html(&make_page(entry));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_page_renders_shell_only() {
        let html = render_page_html(&PageContent::default());
        assert_eq!(html, "<div class=\"cv-page\"></div>");
    }

    #[test]
    fn test_skills_render_as_single_list() {
        let page = PageContent {
            skills: vec![
                Skill {
                    id: "s1".to_string(),
                    description: "Rust".to_string(),
                },
                Skill {
                    id: "s2".to_string(),
                    description: "SQL".to_string(),
                },
            ],
            show_skills_title: true,
            ..Default::default()
        };
        let html = render_page_html(&page);
        assert!(html.contains("<ul class=\"skill-list\"><li>Rust</li><li>SQL</li></ul>"));
    }
}
