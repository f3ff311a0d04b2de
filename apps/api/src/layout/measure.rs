//! Height measurement — the off-screen surface the pagination pass consults.
//!
//! `HeightMeasurer` is the capability seam: give it a markup fragment, get
//! back the rendered height in px. The production implementation
//! (`TextMeasurer`) runs the same greedy word-wrap the display stylesheet
//! produces, against the static font metric table, so measured heights track
//! displayed heights closely enough for page-packing decisions. Tests inject
//! a fixed-geometry measurer to make layout scenarios exact.
//!
//! A `MeasureSession` scopes one pagination pass: it memoizes measurements
//! for the duration of the pass and releases everything when dropped, even
//! when the pass bails out early. Sessions are never reused across passes.
//!
//! Determinism requirement: identical fragment + identical config must yield
//! identical height for the whole lifetime of a session. Callers must not
//! mutate layout configuration mid-pass.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::layout::font_metrics::{display_metrics, FontMetrics, LayoutConfig};
use crate::layout::markup::{Block, Fragment};

#[derive(Debug, Error)]
pub enum MeasureError {
    /// The measurement surface is gone; the current pagination pass is lost.
    /// Callers fall back to a single unpaginated page.
    #[error("measurement surface detached")]
    SurfaceDetached,
}

/// Reports the rendered height, in px, of a markup fragment laid out at the
/// page content width.
pub trait HeightMeasurer {
    fn measure_height(&self, fragment: &Fragment) -> Result<f32, MeasureError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Production measurer
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic text-metrics measurer: greedy word-wrap at the content
/// width, line heights and block gaps from `LayoutConfig`.
#[derive(Debug, Clone)]
pub struct TextMeasurer {
    config: LayoutConfig,
}

impl TextMeasurer {
    pub fn new(config: LayoutConfig) -> Self {
        TextMeasurer { config }
    }

    /// Counts the printed lines `text` occupies when word-wrapped at
    /// `width_px`. Empty or whitespace-only text occupies no lines.
    fn wrapped_line_count(&self, text: &str, width_px: f32, bold: bool) -> u32 {
        let metrics: &FontMetrics = display_metrics();
        let factor = if bold {
            self.config.bold_width_factor
        } else {
            1.0
        };

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return 0;
        }

        let space_w = metrics.space_width_px(&self.config) * factor;
        let mut line_count = 1u32;
        let mut current_width = 0.0_f32;
        let mut first_on_line = true;

        for word in &words {
            let word_w = metrics.measure_str(word, &self.config) * factor;
            let lead_w = if first_on_line { 0.0 } else { space_w };
            if !first_on_line && current_width + space_w + word_w > width_px {
                line_count = line_count.saturating_add(1);
                current_width = word_w;
                // first_on_line stays false: the next word gets a space
            } else {
                current_width += lead_w + word_w;
                first_on_line = false;
            }
        }
        line_count
    }

    fn block_height(&self, block: &Block) -> f32 {
        let cfg = &self.config;
        match block {
            Block::Heading(text) => {
                self.wrapped_line_count(text, cfg.content_width_px, true) as f32
                    * cfg.heading_line_px
            }
            Block::Text(text) | Block::Paragraph(text) => {
                self.wrapped_line_count(text, cfg.content_width_px, false) as f32
                    * cfg.line_height_px
            }
            Block::List(items) => {
                let item_width = cfg.content_width_px - cfg.list_indent_px;
                items
                    .iter()
                    .map(|item| {
                        self.wrapped_line_count(item, item_width, false) as f32
                            * cfg.line_height_px
                    })
                    .sum()
            }
        }
    }
}

impl HeightMeasurer for TextMeasurer {
    fn measure_height(&self, fragment: &Fragment) -> Result<f32, MeasureError> {
        let mut height = 0.0_f32;
        let mut rendered_blocks = 0u32;
        for block in fragment {
            let h = self.block_height(block);
            if h > 0.0 {
                if rendered_blocks > 0 {
                    height += self.config.block_gap_px;
                }
                height += h;
                rendered_blocks += 1;
            }
        }
        Ok(height)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-pass session
// ────────────────────────────────────────────────────────────────────────────

/// The measurement surface for one pagination pass.
///
/// Created at pass start, dropped at pass end — including early returns on
/// `MeasureError`, which is why cleanup lives in `Drop` and not in a
/// `finish()` method. The memo cache keeps split-point binary searches at
/// O(log T) distinct layouts instead of re-measuring repeated candidates.
pub struct MeasureSession<'a> {
    measurer: &'a dyn HeightMeasurer,
    cache: RefCell<HashMap<Fragment, f32>>,
    measurements: RefCell<u32>,
}

impl<'a> MeasureSession<'a> {
    pub fn new(measurer: &'a dyn HeightMeasurer) -> Self {
        MeasureSession {
            measurer,
            cache: RefCell::new(HashMap::new()),
            measurements: RefCell::new(0),
        }
    }

    pub fn measure(&self, fragment: &Fragment) -> Result<f32, MeasureError> {
        if let Some(&h) = self.cache.borrow().get(fragment) {
            return Ok(h);
        }
        *self.measurements.borrow_mut() += 1;
        let h = self.measurer.measure_height(fragment)?;
        self.cache.borrow_mut().insert(fragment.clone(), h);
        Ok(h)
    }

    /// Number of uncached measurements performed so far in this pass.
    pub fn measurement_count(&self) -> u32 {
        *self.measurements.borrow()
    }
}

impl Drop for MeasureSession<'_> {
    fn drop(&mut self) {
        debug!(
            measurements = *self.measurements.borrow(),
            cached = self.cache.borrow().len(),
            "measurement surface released"
        );
        self.cache.borrow_mut().clear();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test support
// ────────────────────────────────────────────────────────────────────────────


// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
