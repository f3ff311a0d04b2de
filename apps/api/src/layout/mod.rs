// Pagination engine.
// Packs the CV document into fixed-height pages: iterative height
// measurement against a measurement surface, look-ahead to avoid orphaned
// section titles, and token-level binary search to split a description
// across a page boundary without corrupting its markdown.
// CPU-bound passes must run inside tokio::task::spawn_blocking.

pub mod composer;
pub mod entries;
pub mod font_metrics;
pub mod markup;
pub mod measure;
pub mod section;
pub mod split;

// Re-export the public API consumed by other modules (handlers, render).
pub use composer::{compute_pages_or_fallback, export_page, PageContent};
pub use font_metrics::LayoutConfig;
pub use measure::TextMeasurer;
