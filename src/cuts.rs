//! Branch excision for the cut command (`%`).
//!
//! A `%` removes everything from itself up to the end of the branch it sits in:
//! the first `]` that is unmatched within the removed segment, or the end of the
//! string. The closing `]` itself is kept so the surrounding branch stays balanced.

use std::ops::Range;

/// Computes the byte ranges removed by every cut in `raw`, in ascending order.
pub fn cut_spans(raw: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut cut_start: Option<usize> = None;
    let mut depth: i32 = 0;

    for (i, c) in raw.char_indices() {
        match cut_start {
            Some(start) => {
                match c {
                    '[' => depth += 1,
                    ']' => depth -= 1,
                    _ => {}
                }
                if depth < 0 {
                    spans.push(start..i);
                    cut_start = None;
                    depth = 0;
                }
            }
            None if c == '%' => {
                cut_start = Some(i);
                depth = 0;
            }
            None => {}
        }
    }

    if let Some(start) = cut_start {
        spans.push(start..raw.len());
    }
    spans
}

/// Returns `raw` with every cut span removed.
pub fn apply_cuts(raw: &str) -> String {
    let spans = cut_spans(raw);
    if spans.is_empty() {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut kept_from = 0;
    for span in &spans {
        out.push_str(&raw[kept_from..span.start]);
        kept_from = span.end;
    }
    out.push_str(&raw[kept_from..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_inside_branch_stops_at_branch_end() {
        assert_eq!(apply_cuts("F[+F%F[-F]F]F"), "F[+F]F");
        assert_eq!(cut_spans("F[+F%F[-F]F]F"), vec![4..11]);
    }

    #[test]
    fn cut_at_top_level_runs_to_end() {
        assert_eq!(apply_cuts("A%BC"), "A");
        assert_eq!(apply_cuts("A%[B]C"), "A");
        assert_eq!(apply_cuts("[A%[B]C]D"), "[A]D");
    }

    #[test]
    fn nested_cut_markers_have_no_extra_effect() {
        assert_eq!(apply_cuts("[A%B%C]D%E"), "[A]D");
    }

    #[test]
    fn multiple_independent_cuts() {
        assert_eq!(apply_cuts("[A%B][C%D]E"), "[A][C]E");
    }

    #[test]
    fn untouched_without_cuts() {
        assert_eq!(apply_cuts("F[+F]F"), "F[+F]F");
        assert!(cut_spans("").is_empty());
    }
}
