//! Restricted markdown → markup conversion used during measurement.
//!
//! The measurement path and the display path must agree on structure, so
//! both consume the same typed dialect: a `Fragment` is an ordered list of
//! `Block`s. This renderer recognizes only the subset the editor produces —
//! blank-line-separated paragraphs and `- ` / `* ` list items — and treats
//! every other non-blank line as an opaque paragraph. It never fails on
//! unrecognized syntax; it renders it literally.
//!
//! The final display uses a full-fidelity HTML renderer (`render::html`).
//! The small height difference between the two is a known, accepted
//! approximation; layout tolerances absorb it.

// ────────────────────────────────────────────────────────────────────────────
// Markup dialect
// ────────────────────────────────────────────────────────────────────────────

/// One block of renderable markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Block {
    /// A bold heading line (entry title row). Wraps at heading line height.
    Heading(String),
    /// A plain metadata line (dates, city, contact row).
    Text(String),
    /// A body paragraph.
    Paragraph(String),
    /// An unordered list; one string per item.
    List(Vec<String>),
}

/// An ordered sequence of blocks — the unit the height measurer accepts.
pub type Fragment = Vec<Block>;

// ────────────────────────────────────────────────────────────────────────────
// Simplified renderer
// ────────────────────────────────────────────────────────────────────────────

/// Renders a markdown description into measurement markup.
///
/// Rules:
/// - lines starting with `- ` or `* ` become list items; consecutive items
///   are grouped into a single `Block::List`
/// - blank lines close the current list and separate paragraphs
/// - every other non-blank line becomes its own `Block::Paragraph`
pub fn render_description(markdown: &str) -> Fragment {
    let mut blocks: Fragment = Vec::new();
    let mut list_items: Vec<String> = Vec::new();

    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_list(&mut blocks, &mut list_items);
            continue;
        }
        if let Some(item) = list_item_text(trimmed) {
            list_items.push(item.to_string());
        } else {
            flush_list(&mut blocks, &mut list_items);
            blocks.push(Block::Paragraph(trimmed.to_string()));
        }
    }
    flush_list(&mut blocks, &mut list_items);
    blocks
}

fn list_item_text(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

fn flush_list(blocks: &mut Fragment, items: &mut Vec<String>) {
    if !items.is_empty() {
        blocks.push(Block::List(std::mem::take(items)));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
