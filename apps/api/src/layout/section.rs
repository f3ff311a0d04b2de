//! Section splitter — packs one section's entries onto fixed-height pages.
//!
//! # Per-section algorithm
//! 1. Add the inter-section gap. If gap + title would overflow, close the
//!    page and place the title on a fresh one.
//! 2. Place the title (set the page's title flag).
//! 3. Look ahead: measure the first entry's header block alone. If title +
//!    first header overflow, close the page — the title stays where the
//!    section visually begins and the entries start on the next page.
//! 4. Place entries in order:
//!    a. whole entry + item gap fits → append, advance cursor;
//!    b. header fits but the description doesn't → split-point search on
//!       the description; first part stays, the remainder becomes a
//!       continuation entry that re-enters the loop on a fresh page (so a
//!       description spanning three pages splits twice). When no valid
//!       split exists the entire description is deferred instead;
//!    c. nothing fits → close the page and retry the entry on a fresh one.
//!       An entry that does not fit even on an empty page is placed anyway
//!       and allowed to overflow its page, with a warning.
//!
//! Sections whose entries expose no description (skills, references) take
//! the same path but can only hit branches (a) and (c) — they are atomic
//! and never split mid-entry.

use tracing::warn;

use crate::layout::composer::PageContent;
use crate::layout::font_metrics::LayoutConfig;
use crate::layout::markup::{render_description, Fragment};
use crate::layout::measure::{HeightMeasurer, MeasureError, MeasureSession};
use crate::layout::split::find_split_point;

// ────────────────────────────────────────────────────────────────────────────
// Item capability
// ────────────────────────────────────────────────────────────────────────────

/// What the splitter needs to know about one entry of any section.
pub trait SectionItem: Clone {
    /// The entry's header block (title row, dates, city). Continuation
    /// clones return an empty fragment — their header is suppressed.
    /// Atomic entries expose their entire content here.
    fn header_fragment(&self) -> Fragment;

    /// The splittable markdown body, if the entry has a non-blank one.
    /// `None` marks the entry as atomic.
    fn description(&self) -> Option<&str>;

    /// Clone with the description replaced (used for the first part of a
    /// split). Implementations without a body return `self` unchanged.
    fn with_description(&self, description: String) -> Self;

    /// Clone with the description removed entirely.
    fn without_description(&self) -> Self;

    /// Continuation clone: carries only `remainder` as its description,
    /// with the continuation flag set so render suppresses the header.
    fn into_continuation(&self, remainder: String) -> Self;

    /// Header plus rendered description — the entry as it will appear.
    fn full_fragment(&self) -> Fragment {
        let mut fragment = self.header_fragment();
        if let Some(description) = self.description() {
            fragment.extend(render_description(description));
        }
        fragment
    }
}

/// Accessors binding a generic entry type to its slot in `PageContent`.
pub struct SectionSlot<T> {
    pub items: fn(&mut PageContent) -> &mut Vec<T>,
    pub title_flag: fn(&mut PageContent) -> &mut bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Pass state
// ────────────────────────────────────────────────────────────────────────────

/// The running (pages, current page, cursor) triple threaded across all
/// sections of one pagination pass. One section's trailing page is the next
/// section's starting page.
pub(crate) struct PagePass<'a> {
    session: MeasureSession<'a>,
    pub(crate) config: &'a LayoutConfig,
    pages: Vec<PageContent>,
    pub(crate) current: PageContent,
    pub(crate) cursor: f32,
}

impl<'a> PagePass<'a> {
    pub(crate) fn new(measurer: &'a dyn HeightMeasurer, config: &'a LayoutConfig) -> Self {
        PagePass {
            session: MeasureSession::new(measurer),
            config,
            pages: Vec::new(),
            current: PageContent::default(),
            cursor: 0.0,
        }
    }

    pub(crate) fn measure(&self, fragment: &Fragment) -> Result<f32, MeasureError> {
        self.session.measure(fragment)
    }

    pub(crate) fn budget(&self) -> f32 {
        self.config.page_budget_px
    }

    /// Pushes the accumulated page and starts a fresh one at cursor 0.
    pub(crate) fn close_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = 0.0;
    }

    /// Consumes the pass; the trailing page is kept only when it has content.
    pub(crate) fn finish(mut self) -> Vec<PageContent> {
        if self.current.has_content() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        std::mem::take(&mut self.pages)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Splitter
// ────────────────────────────────────────────────────────────────────────────

/// Places one section's (already filtered, non-blank) entries, mutating the
/// pass in place. No-op for an empty section: no gap, no title.
pub(crate) fn place_section<T: SectionItem>(
    items: &[T],
    slot: SectionSlot<T>,
    pass: &mut PagePass<'_>,
) -> Result<(), MeasureError> {
    if items.is_empty() {
        return Ok(());
    }

    let title_px = pass.config.section_title_px;

    // 1. Inter-section gap; close the page if gap + title cannot fit.
    pass.cursor += pass.config.section_gap_px;
    if pass.cursor + title_px > pass.budget() {
        pass.close_page();
    }

    // 2. Title.
    *(slot.title_flag)(&mut pass.current) = true;
    pass.cursor += title_px;

    // 3. Look-ahead: the first entry's header must fit under the title.
    let first_header = pass.measure(&items[0].header_fragment())?;
    if pass.cursor + first_header > pass.budget() {
        pass.close_page();
    }

    // 4. Entries.
    for item in items {
        place_item(item.clone(), &slot, pass)?;
    }

    Ok(())
}

/// Places one entry, splitting its description across page boundaries as
/// many times as needed. Each loop iteration works against the current page.
fn place_item<T: SectionItem>(
    mut item: T,
    slot: &SectionSlot<T>,
    pass: &mut PagePass<'_>,
) -> Result<(), MeasureError> {
    loop {
        let item_gap = pass.config.item_gap_px;
        let full_height = pass.measure(&item.full_fragment())?;

        // a. Whole entry fits.
        if pass.cursor + full_height + item_gap <= pass.budget() {
            (slot.items)(&mut pass.current).push(item);
            pass.cursor += full_height + item_gap;
            return Ok(());
        }

        let header_height = pass.measure(&item.header_fragment())?;
        let has_description = item
            .description()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false);

        // b. Header fits, description doesn't — try to split the body.
        if pass.cursor + header_height <= pass.budget() && has_description {
            let remaining = pass.budget() - pass.cursor - header_height;
            let description = item.description().unwrap_or_default().to_string();

            match find_split_point(&description, remaining, &pass.session)? {
                Some(split) => {
                    (slot.items)(&mut pass.current).push(item.with_description(split.first));
                    pass.close_page();
                    item = item.into_continuation(split.remainder);
                    continue;
                }
                None if header_height > 0.0 => {
                    // Atomic body: keep the header here, defer the whole
                    // description to the next page.
                    (slot.items)(&mut pass.current).push(item.without_description());
                    pass.close_page();
                    item = item.into_continuation(description);
                    continue;
                }
                None if pass.cursor > 0.0 => {
                    // Headerless continuation that doesn't fit here; retry
                    // against an empty page before giving up.
                    pass.close_page();
                    continue;
                }
                None => {
                    warn!("description exceeds an empty page and has no split point; overflowing");
                    (slot.items)(&mut pass.current).push(item);
                    pass.close_page();
                    return Ok(());
                }
            }
        }

        // c. Nothing fits.
        if pass.cursor > 0.0 {
            pass.close_page();
            continue;
        }
        warn!("entry exceeds an empty page and cannot be split; overflowing");
        (slot.items)(&mut pass.current).push(item);
        pass.cursor += full_height + item_gap;
        return Ok(());
    }
}
