//! The working-string store (C3): two buffers selected by a from/to flag,
//! the derived from-string index, the current pattern's fragment
//! decomposition, and the wildcard capture list.

pub mod capture;
pub mod fragment;
pub mod index;

use crate::tagged_char::{self, CharSet, Tagged, TaggedString, Wildcard};
use capture::CaptureList;
use fragment::{split_pattern_into_fragments, Fragment, FragmentKind};
use index::FromStringIndex;

/// Owns the from/to working buffers, the from-string index, the current
/// pattern's fragments, per-fragment search positions, captures, and the
/// matched prefix/suffix. One store is reused across an entire
/// transformation run: buffers and tables are cleared, not freed, between
/// passes.
#[derive(Debug, Clone, Default)]
pub struct WorkStore {
    buf_a: TaggedString,
    buf_b: TaggedString,
    from_is_a: bool,
    index: Option<FromStringIndex>,
    fragments: Vec<Fragment>,
    frag_pos: Vec<Option<usize>>,
    captures: CaptureList,
    prefix_len: Option<usize>,
    suffix_start: Option<usize>,
}

impl WorkStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_buf(&self) -> &TaggedString {
        if self.from_is_a {
            &self.buf_a
        } else {
            &self.buf_b
        }
    }

    fn from_buf_mut(&mut self) -> &mut TaggedString {
        if self.from_is_a {
            &mut self.buf_a
        } else {
            &mut self.buf_b
        }
    }

    fn to_buf_mut(&mut self) -> &mut TaggedString {
        if self.from_is_a {
            &mut self.buf_b
        } else {
            &mut self.buf_a
        }
    }

    pub fn from_string(&self) -> &[Tagged] {
        self.from_buf()
    }

    pub fn to_string(&self) -> &[Tagged] {
        if self.from_is_a {
            &self.buf_b
        } else {
            &self.buf_a
        }
    }

    /// Replaces the from-string wholesale and marks the index stale.
    pub fn set_from_string(&mut self, s: TaggedString) {
        *self.from_buf_mut() = s;
        self.index = None;
    }

    /// Flips which buffer is the from-string. Clears captures, fragments,
    /// and the matched prefix/suffix; marks the index stale. O(1) - no
    /// buffer is copied.
    pub fn swap(&mut self) {
        self.from_is_a = !self.from_is_a;
        self.index = None;
        self.captures.clear();
        self.fragments.clear();
        self.frag_pos.clear();
        self.prefix_len = None;
        self.suffix_start = None;
        self.to_buf_mut().clear();
    }

    /// Rebuilds the from-string index if it's stale.
    pub fn ensure_index(&mut self) {
        if self.index.is_none() {
            self.index = Some(FromStringIndex::build(self.from_buf()));
        }
    }

    fn index(&self) -> &FromStringIndex {
        self.index
            .as_ref()
            .expect("ensure_index must be called before using the index")
    }

    /// `true` iff `pattern_chars` cannot possibly be satisfied by the
    /// from-string's alphabet, i.e. the rule can be rejected without
    /// running the matcher.
    pub fn quick_reject(&self, pattern_chars: &CharSet) -> bool {
        !pattern_chars.is_subset_of(self.index().alphabet())
    }

    /// Installs `pattern` as the pattern being matched: splits it into
    /// fragments and resets per-fragment search state and captures.
    pub fn set_current_pattern(&mut self, pattern: &[Tagged]) {
        self.fragments = split_pattern_into_fragments(pattern);
        self.frag_pos = vec![None; self.fragments.len()];
        self.captures.clear();
        self.prefix_len = None;
        self.suffix_start = None;
    }

    pub fn num_fragments(&self) -> usize {
        self.fragments.len()
    }

    pub fn fragment(&self, frag_ix: usize) -> Option<Fragment> {
        self.fragments.get(frag_ix).copied()
    }

    /// Start of fragment `frag_ix` within the pattern; `pattern.len()` for
    /// the one-past-the-end index.
    pub fn pat_frag_start_in_pat(&self, frag_ix: usize, pattern: &[Tagged]) -> usize {
        self.fragments
            .get(frag_ix)
            .map(|f| f.pat_start)
            .unwrap_or(pattern.len())
    }

    /// Length (in pattern text) of the gap-bracketing fragment at
    /// `frag_ix`: 1 for a pinned wildcard, the run length for a fixed
    /// fragment, 0 past the last fragment.
    pub fn pat_frag_length_in_pat(&self, frag_ix: usize) -> usize {
        self.fragments.get(frag_ix).map(|f| f.pat_length()).unwrap_or(0)
    }

    pub fn pat_frag_is_wildcard(&self, frag_ix: usize) -> bool {
        self.fragments.get(frag_ix).map(|f| f.is_wildcard()).unwrap_or(false)
    }

    /// The fragment's from-string length: for a pinned wildcard, the
    /// length of its kind's first capture (`None` if not yet captured -
    /// the distinct "none" sentinel the original's `-1` collided with a
    /// legitimate zero length); for a fixed fragment, its pattern length;
    /// `Some(0)` one-past-the-end, matching the original's "no such
    /// fragment" default.
    pub fn pat_frag_length_in_from_str(&self, frag_ix: usize) -> Option<usize> {
        match self.fragments.get(frag_ix) {
            None => Some(0),
            Some(f) => match f.kind {
                FragmentKind::PinnedWildcard(kind) => {
                    let ix = self.captures.first_of_kind(kind)?;
                    Some(self.captures.get(ix).length)
                }
                FragmentKind::Fixed { pat_length } => Some(pat_length),
            },
        }
    }

    /// First character this fragment must match in the from-string: for a
    /// pinned wildcard, the first byte of its kind's first capture; for a
    /// fixed fragment, its first pattern byte.
    pub fn pat_frag_first_char_in_from_str(&self, frag_ix: usize, pattern: &[Tagged]) -> Option<Tagged> {
        match self.fragments.get(frag_ix)?.kind {
            FragmentKind::PinnedWildcard(kind) => {
                let ix = self.captures.first_of_kind(kind)?;
                let c = self.captures.get(ix);
                (c.length > 0).then(|| self.from_buf()[c.start])
            }
            FragmentKind::Fixed { .. } => {
                let start = self.fragments[frag_ix].pat_start;
                pattern.get(start).copied()
            }
        }
    }

    /// Compares the from-string slice `[fs_start, fs_start+fs_len)` against
    /// fragment `frag_ix`'s required content (either the pattern text, or -
    /// for a pinned wildcard - its kind's first capture).
    pub fn compare_substring_with_fragment(
        &self,
        fs_start: usize,
        fs_len: usize,
        frag_ix: usize,
        pattern: &[Tagged],
    ) -> bool {
        let from_str = self.from_buf();
        if fs_start + fs_len > from_str.len() {
            return false;
        }
        let actual = &from_str[fs_start..fs_start + fs_len];

        match self.fragments[frag_ix].kind {
            FragmentKind::PinnedWildcard(kind) => match self.captures.first_of_kind(kind) {
                None => false,
                Some(ix) => {
                    let c = self.captures.get(ix);
                    c.length == fs_len && actual == &from_str[c.start..c.end()]
                }
            },
            FragmentKind::Fixed { pat_length } => {
                let start = self.fragments[frag_ix].pat_start;
                fs_len == pat_length && actual == &pattern[start..start + pat_length]
            }
        }
    }

    /// Finds the smallest from-string index `>= min_pos` at which fragment
    /// `frag_ix` matches content-equal, walking the next-occurrence chain
    /// from the fragment's first character. Records and returns it.
    pub fn advance_fragment_position(
        &mut self,
        frag_ix: usize,
        min_pos: usize,
        pattern: &[Tagged],
    ) -> Option<usize> {
        let Some(len) = self.pat_frag_length_in_from_str(frag_ix) else {
            self.frag_pos[frag_ix] = None;
            return None;
        };
        let first_char = self.pat_frag_first_char_in_from_str(frag_ix, pattern)?;

        let mut pos = self.index().first_occurrence(first_char);
        loop {
            match pos {
                None => break,
                Some(p) => {
                    if p >= min_pos && self.compare_substring_with_fragment(p, len, frag_ix, pattern) {
                        break;
                    }
                    pos = self.index().next_occurrence(p);
                }
            }
        }
        self.frag_pos[frag_ix] = pos;
        pos
    }

    /// Checks fragment `frag_ix` at exactly `fromstr_pos`, without
    /// searching. Records the position on success.
    pub fn verify_fragment_position(&mut self, frag_ix: usize, fromstr_pos: usize, pattern: &[Tagged]) -> bool {
        match self.pat_frag_length_in_from_str(frag_ix) {
            Some(len) if self.compare_substring_with_fragment(fromstr_pos, len, frag_ix, pattern) => {
                self.frag_pos[frag_ix] = Some(fromstr_pos);
                true
            }
            _ => false,
        }
    }

    pub fn frag_pos(&self, frag_ix: usize) -> Option<usize> {
        self.frag_pos.get(frag_ix).copied().flatten()
    }

    pub fn captures(&self) -> &CaptureList {
        &self.captures
    }

    pub fn record_capture(&mut self, kind: Wildcard, start: usize, length: usize) -> usize {
        self.captures.record(kind, start, length)
    }

    /// Discards every capture whose span extends past `new_from_len` and
    /// rebuilds the first-occurrence-by-kind table. Called before
    /// (re)placing a fragment to drop captures from an abandoned rightmost
    /// attempt.
    pub fn unmatch(&mut self, new_from_len: usize) {
        self.captures.unmatch(new_from_len);
    }

    pub fn set_prefix_and_suffix(&mut self, prefix_len: usize, suffix_start: usize) {
        self.prefix_len = Some(prefix_len);
        self.suffix_start = Some(suffix_start);
    }

    pub fn prefix_and_suffix(&self) -> Option<(usize, usize)> {
        match (self.prefix_len, self.suffix_start) {
            (Some(p), Some(s)) => Some((p, s)),
            _ => None,
        }
    }

    pub fn append_char_to_to_string(&mut self, c: Tagged) {
        self.to_buf_mut().push(c);
    }

    pub fn append_slice_to_to_string(&mut self, s: &[Tagged]) {
        self.to_buf_mut().extend_from_slice(s);
    }

    pub fn clear_to_string(&mut self) {
        self.to_buf_mut().clear();
    }
}

/// Bit set for every non-wildcard byte in `ts`. Convenience re-export so
/// callers don't need to reach into [`tagged_char`] for this one helper.
pub fn literal_chars_used(ts: &[Tagged]) -> CharSet {
    let mut set = CharSet::new();
    for &c in ts {
        if !tagged_char::is_wildcard(c) {
            set.set(c);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagged_char::to_tagged;

    fn ts(s: &str) -> TaggedString {
        s.bytes().map(to_tagged).collect()
    }

    #[test]
    fn swap_is_a_flag_flip_and_clears_derived_state() {
        let mut store = WorkStore::new();
        store.set_from_string(ts("abc"));
        store.ensure_index();
        store.set_current_pattern(&ts("a"));
        store.record_capture(Wildcard::Star, 0, 1);
        store.set_prefix_and_suffix(0, 1);

        store.swap();
        assert_eq!(store.from_string(), &[] as &[Tagged]);
        assert_eq!(store.num_fragments(), 0);
        assert!(store.prefix_and_suffix().is_none());
    }

    #[test]
    fn quick_reject_detects_missing_alphabet_member() {
        let mut store = WorkStore::new();
        store.set_from_string(ts("abc"));
        store.ensure_index();
        assert!(store.quick_reject(&literal_chars_used(&ts("z"))));
        assert!(!store.quick_reject(&literal_chars_used(&ts("a"))));
    }

    #[test]
    fn advance_fragment_position_finds_next_occurrence_chain() {
        let mut store = WorkStore::new();
        store.set_from_string(ts("xxabcxx"));
        store.ensure_index();
        let pat = ts("abc");
        store.set_current_pattern(&pat);
        let pos = store.advance_fragment_position(0, 0, &pat);
        assert_eq!(pos, Some(2));
    }
}
