//! Split-point search — where to divide a description between two pages.
//!
//! Given a markdown description and a remaining height budget, finds the
//! longest textual prefix whose rendered height fits the budget, without
//! breaking mid-word and without corrupting markdown structure. Newlines are
//! preserved as distinct tokens so list-item boundaries are never merged
//! across a split; rejoining normalizes the space artifacts the join
//! introduces around them.
//!
//! Cost: O(log T) measurements per search, T = token count. Résumé-length
//! descriptions are a few hundred tokens at most.
#![allow(dead_code)]

use crate::layout::markup::render_description;
use crate::layout::measure::{MeasureError, MeasureSession};

/// A valid division of a description: both parts non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPoint {
    /// Markdown for the part that stays on the current page.
    pub first: String,
    /// Markdown for the continuation entry on the next page.
    pub remainder: String,
    /// Number of tokens in `first`.
    pub prefix_tokens: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Tokenization
// ────────────────────────────────────────────────────────────────────────────

/// Splits on newline boundaries first (each newline survives as its own
/// `"\n"` token), then splits the remaining runs on spaces. Empty tokens
/// are discarded, so runs of spaces collapse.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    for (i, segment) in text.split('\n').enumerate() {
        if i > 0 {
            tokens.push("\n");
        }
        tokens.extend(segment.split(' ').filter(|t| !t.is_empty()));
    }
    tokens
}

/// Joins tokens with single spaces, then collapses the join artifacts
/// around preserved newline tokens so the result is valid markdown again.
pub fn rejoin(tokens: &[&str]) -> String {
    tokens
        .join(" ")
        .replace(" \n ", "\n")
        .replace(" \n", "\n")
        .replace("\n ", "\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Search
// ────────────────────────────────────────────────────────────────────────────

/// Binary-searches for the largest token prefix of `description` whose
/// rendered height is ≤ `budget_px`.
///
/// Returns `None` when no genuine partial split exists:
/// - not even the first token fits (nothing at all fits), or
/// - the only fitting prefix is everything-but-one-token; at that point the
///   whole-item check should already have fired, so splitting would orphan
///   a single token for no layout gain.
pub fn find_split_point(
    description: &str,
    budget_px: f32,
    session: &MeasureSession<'_>,
) -> Result<Option<SplitPoint>, MeasureError> {
    let tokens = tokenize(description);
    let n = tokens.len();
    if n < 2 {
        return Ok(None);
    }

    // Largest k in [1, n-1] with height(prefix of k tokens) ≤ budget.
    let mut best = 0usize;
    let mut lo = 1usize;
    let mut hi = n - 1;
    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        let candidate = rejoin(&tokens[..mid]);
        let height = session.measure(&render_description(&candidate))?;
        if height <= budget_px {
            best = mid;
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }

    if best == 0 || best == n - 1 {
        return Ok(None);
    }

    Ok(Some(SplitPoint {
        first: rejoin(&tokens[..best]),
        remainder: rejoin(&tokens[best..]),
        prefix_tokens: best,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::test_support::FixedMeasurer;
    use crate::layout::measure::MeasureSession;

    fn make_session(measurer: &FixedMeasurer) -> MeasureSession<'_> {
        MeasureSession::new(measurer)
    }

    // ── tokenize / rejoin ───────────────────────────────────────────────────

    #[test]
    fn test_tokenize_plain_words() {
        assert_eq!(tokenize("alpha beta gamma"), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_tokenize_preserves_newlines_as_tokens() {
        assert_eq!(
            tokenize("- one\n- two"),
            vec!["-", "one", "\n", "-", "two"]
        );
    }

    #[test]
    fn test_tokenize_discards_empty_tokens() {
        assert_eq!(tokenize("a  b"), vec!["a", "b"]);
        assert_eq!(tokenize(""), Vec::<&str>::new());
    }

    #[test]
    fn test_rejoin_restores_canonical_text() {
        let text = "First line\n- item one\n- item two";
        assert_eq!(rejoin(&tokenize(text)), text);
    }

    #[test]
    fn test_rejoin_keeps_consecutive_newlines() {
        let text = "para one\n\npara two";
        assert_eq!(rejoin(&tokenize(text)), text);
    }

    // ── find_split_point ────────────────────────────────────────────────────

    /// 20 four-char tokens; at 5 chars/line each token costs exactly one
    /// 10px line, so a budget of N*10 px fits exactly N tokens.
    fn twenty_tokens() -> String {
        (0..20)
            .map(|i| format!("w{:03}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn exact_measurer() -> FixedMeasurer {
        FixedMeasurer {
            chars_per_line: 5,
            px_per_line: 10.0,
        }
    }

    #[test]
    fn test_split_lands_on_largest_fitting_prefix() {
        let measurer = exact_measurer();
        let session = make_session(&measurer);
        let text = twenty_tokens();

        let split = find_split_point(&text, 130.0, &session)
            .unwrap()
            .expect("13-token budget must yield a split");
        assert_eq!(split.prefix_tokens, 13);
        assert_eq!(split.first, rejoin(&tokenize(&text)[..13]));
        assert_eq!(split.remainder, rejoin(&tokenize(&text)[13..]));
    }

    #[test]
    fn test_split_parts_reconstruct_original() {
        let measurer = exact_measurer();
        let session = make_session(&measurer);
        let text = "Built pipeline\n- cut costs\n- kept latency flat over two quarters";

        let split = find_split_point(text, 40.0, &session)
            .unwrap()
            .expect("should find a split");
        let tokens = tokenize(text);
        let rebuilt = rejoin(&tokens);
        let glue = if split.first.ends_with('\n') || split.remainder.starts_with('\n') {
            ""
        } else {
            " "
        };
        assert_eq!(
            format!("{}{}{}", split.first, glue, split.remainder),
            rebuilt,
            "concatenating both parts must reconstruct the description"
        );
    }

    #[test]
    fn test_no_split_when_nothing_fits() {
        let measurer = exact_measurer();
        let session = make_session(&measurer);
        let text = twenty_tokens();
        // Budget below one line: not even the first token fits.
        let split = find_split_point(&text, 5.0, &session).unwrap();
        assert!(split.is_none());
    }

    #[test]
    fn test_no_split_when_everything_would_fit() {
        let measurer = exact_measurer();
        let session = make_session(&measurer);
        let text = twenty_tokens();
        // 19 of 20 tokens fit — rejected; the whole-item branch owns this case.
        let split = find_split_point(&text, 1000.0, &session).unwrap();
        assert!(split.is_none());
    }

    #[test]
    fn test_single_token_cannot_split() {
        let measurer = exact_measurer();
        let session = make_session(&measurer);
        assert!(find_split_point("unsplittable", 1000.0, &session)
            .unwrap()
            .is_none());
        assert!(find_split_point("", 1000.0, &session).unwrap().is_none());
    }

    #[test]
    fn test_split_never_merges_list_items() {
        let measurer = exact_measurer();
        let session = make_session(&measurer);
        let text = "- alpha beta\n- gamma delta\n- epsilon zeta";

        for budget in [20.0, 30.0, 40.0, 50.0] {
            if let Some(split) = find_split_point(text, budget, &session).unwrap() {
                let original_newlines = text.matches('\n').count();
                let rebuilt_newlines = split.first.matches('\n').count()
                    + split.remainder.matches('\n').count()
                    + usize::from(
                        !split.first.ends_with('\n') && split.remainder.starts_with('\n'),
                    );
                // Every list boundary survives in one of the two parts.
                assert!(
                    split.first.matches('\n').count() + split.remainder.matches('\n').count()
                        <= original_newlines,
                    "split must not invent newlines"
                );
                assert!(
                    rebuilt_newlines >= original_newlines.saturating_sub(1),
                    "split must not swallow list boundaries (budget {budget})"
                );
            }
        }
    }

    #[test]
    fn test_search_uses_logarithmic_measurements() {
        let measurer = exact_measurer();
        let session = make_session(&measurer);
        let text = (0..256)
            .map(|i| format!("t{:03}", i))
            .collect::<Vec<_>>()
            .join(" ");
        find_split_point(&text, 500.0, &session).unwrap();
        assert!(
            session.measurement_count() <= 10,
            "256 tokens should need ≤ log2(256)+slack measurements, used {}",
            session.measurement_count()
        );
    }
}
