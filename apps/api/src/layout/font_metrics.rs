//! Static font metrics and page geometry for the CV layout engine.
//!
//! Character widths are in em units (relative to font size). This is an
//! intentional approximation — the browser that displays the final page uses
//! exact glyph metrics, but a static table catches the decisions that matter
//! here (which entry crosses the page boundary, where a description splits)
//! while tolerating ±1–2% of line width on borderline wraps.
//!
//! The table covers ASCII 0x20..=0x7E (95 printable characters);
//! index = (char as usize) - 32. Non-ASCII falls back to an average width.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// Layout parameters for one fixed-size CV page.
///
/// Every numeric constant here was calibrated against the reference
/// stylesheet (A4 at 96 dpi, 32 px page padding, 16 px body text with
/// 1.15 rem leading). If the display context changes fonts or sizes, these
/// must be recalibrated — they are configuration, not truths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Usable content width in px (page width minus horizontal padding).
    pub content_width_px: f32,
    /// Usable content height in px — the per-page budget the composer packs
    /// against (page height minus vertical padding).
    pub page_budget_px: f32,
    /// Body font size in px. Width-table em values scale by this.
    pub font_size_px: f32,
    /// Body line height in px.
    pub line_height_px: f32,
    /// Line height for entry heading lines (bold title rows).
    pub heading_line_px: f32,
    /// Width multiplier applied to bold text.
    pub bold_width_factor: f32,
    /// Rendered height of a section title (text, underline, bottom margin).
    pub section_title_px: f32,
    /// Vertical gap inserted before each section.
    pub section_gap_px: f32,
    /// Vertical gap between entries within a section.
    pub item_gap_px: f32,
    /// Gap between blocks inside one entry (header row → description, and
    /// between description paragraphs).
    pub block_gap_px: f32,
    /// Left indent of list items (markers included).
    pub list_indent_px: f32,
}

impl Default for LayoutConfig {
    /// A4 (794 × 1123 px at 96 dpi) with 32 px padding on all sides.
    fn default() -> Self {
        LayoutConfig {
            content_width_px: 730.0,
            page_budget_px: 1059.0,
            font_size_px: 16.0,
            line_height_px: 18.4,
            heading_line_px: 22.0,
            bold_width_factor: 1.05,
            section_title_px: 34.0,
            section_gap_px: 20.0,
            item_gap_px: 8.0,
            block_gap_px: 4.0,
            list_indent_px: 20.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for the CV display font.
///
/// All widths are in em units at 1 em. `widths[i]` = width of ASCII
/// character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
pub struct FontMetrics {
    widths: [f32; 95],
    /// Fallback width for codepoints outside 0x20..=0x7E.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetrics {
    /// Measures the rendered width of a string in px at the configured
    /// body font size. Non-ASCII characters use `average_char_width`.
    pub fn measure_str(&self, s: &str, config: &LayoutConfig) -> f32 {
        let em: f32 = s
            .chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum();
        em * config.font_size_px
    }

    pub fn space_width_px(&self, config: &LayoutConfig) -> f32 {
        self.space_width * config.font_size_px
    }
}

/// Inter — the humanist sans-serif the CV preview and export both use.
static INTER_TABLE: FontMetrics = FontMetrics {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
};

/// Returns the metric table for the CV display font.
pub fn display_metrics() -> &'static FontMetrics {
    &INTER_TABLE
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> LayoutConfig {
        LayoutConfig::default()
    }

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = display_metrics();
        assert_eq!(metrics.measure_str("", &make_config()), 0.0);
    }

    #[test]
    fn test_measure_str_single_space() {
        let metrics = display_metrics();
        let config = make_config();
        let width = metrics.measure_str(" ", &config);
        assert!(
            (width - 0.25 * config.font_size_px).abs() < 1e-3,
            "space should be 0.25 em at body size, got {width}px"
        );
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = display_metrics();
        let config = make_config();
        // "Rust" = R(0.61) + u(0.56) + s(0.44) + t(0.39) = 2.00 em
        let width = metrics.measure_str("Rust", &config);
        assert!(
            (width - 2.00 * config.font_size_px).abs() < 1e-2,
            "Rust should be ~2.00 em, got {width}px"
        );
    }

    #[test]
    fn test_measure_str_non_ascii_falls_back() {
        let metrics = display_metrics();
        let config = make_config();
        let width = metrics.measure_str("é", &config);
        assert!(
            (width - metrics.average_char_width * config.font_size_px).abs() < 1e-3,
            "non-ASCII should use average_char_width"
        );
    }

    #[test]
    fn test_default_config_sanity() {
        let config = make_config();
        assert!(config.content_width_px > 700.0 && config.content_width_px < 800.0);
        assert!(config.page_budget_px > 1000.0);
        assert!(config.line_height_px > config.font_size_px);
        assert!(config.section_title_px > config.line_height_px);
    }
}
