//! One stack frame of the backtracking matcher, and the span helpers that
//! read a pattern's wildcard kinds between two indices without consulting
//! fragment state.

use crate::tagged_char::{self, Tagged, Wildcard};

/// State of one fragment-placement-then-gap-fill attempt. The matcher keeps
/// an explicit `Vec<Frame>` stack rather than recursing, so every retry
/// point (a different from-string position for a fragment, a smaller
/// window for a variable-length wildcard) is a sibling frame pushed below
/// the one currently being refined.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Index of the fragment currently being placed (or, once equal to the
    /// fragment count, the trailing gap past the last fragment).
    pub frag_ix: usize,
    /// Start of the unfilled part of the gap, in pattern indices.
    pub pat_wild_ix: usize,
    /// End of the gap, in pattern indices - the start of `frag_ix`.
    pub pat_fixed_ix: usize,
    /// Start of the unfilled part of the gap, in from-string indices.
    pub fs_wild_ix: usize,
    /// End of the from-string window currently offered to the gap's next
    /// wildcard.
    pub fs_wild_end_ix: usize,
    /// From-string position at which `frag_ix` was placed (end of the gap
    /// before it, start of the fragment itself).
    pub fs_fixed_ix: usize,
    /// Leftmost from-string index touched by any wildcard or fragment so
    /// far, used to compute the matched prefix on success. `None` plays the
    /// role of the original's "never set" sentinel.
    pub fs_left_ix: Option<usize>,
    /// Has `frag_ix` itself been placed for this frame yet?
    pub fixed_is_matched: bool,
}

impl Frame {
    pub fn initial() -> Self {
        Frame {
            frag_ix: 0,
            pat_wild_ix: 0,
            pat_fixed_ix: 0,
            fs_wild_ix: 0,
            fs_wild_end_ix: 0,
            fs_fixed_ix: 0,
            fs_left_ix: None,
            fixed_is_matched: false,
        }
    }
}

/// The wildcard kind at `pat_wild_ix`, or `None` if the gap is already
/// exhausted (`pat_wild_ix == pat_fixed_ix`).
pub fn cur_wildcard_type(pattern: &[Tagged], top: &Frame) -> Option<Wildcard> {
    if top.pat_wild_ix == top.pat_fixed_ix {
        None
    } else {
        tagged_char::to_wildcard(pattern[top.pat_wild_ix])
    }
}

/// Count of single-character wildcards between `pat_from` and `pat_to`.
/// Ignores variable-length wildcards and literal characters - this never
/// reports "unbounded", only a lower bound on how much of the from-string
/// the range must consume.
pub fn min_wildcard_span(pattern: &[Tagged], pat_from: usize, pat_to: usize) -> usize {
    pattern[pat_from..pat_to]
        .iter()
        .filter(|&&c| tagged_char::to_wildcard(c).is_some_and(Wildcard::is_single))
        .count()
}

/// Exact from-string span the range `[pat_from, pat_to)` must consume, if
/// it consists entirely of single-character wildcards; `None` if any
/// variable-length wildcard or literal character appears (the range's span
/// is then unbounded from this function's point of view).
pub fn max_wildcard_span(pattern: &[Tagged], pat_from: usize, pat_to: usize) -> Option<usize> {
    let mut span = 0usize;
    for &c in &pattern[pat_from..pat_to] {
        match tagged_char::to_wildcard(c) {
            Some(wc) if wc.is_single() => span += 1,
            _ => return None,
        }
    }
    Some(span)
}
