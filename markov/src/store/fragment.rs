//! Pattern fragment decomposition.
//!
//! A pattern is split into fixed fragments (maximal runs of non-wildcard
//! characters) and pinned-wildcard fragments (a unique wildcard's second or
//! later occurrence, once its first occurrence has been fixed by a
//! preceding non-wildcard character). Wildcards that aren't pinned, and
//! every `*`, live only in the gaps between fragments.

use crate::tagged_char::{self, Tagged, Wildcard};

/// One fragment of a decomposed pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    /// Start index of this fragment within the pattern.
    pub pat_start: usize,
    pub kind: FragmentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// A maximal run of non-wildcard characters, `pat_length` long.
    Fixed { pat_length: usize },
    /// A later occurrence of a unique wildcard kind whose first occurrence
    /// has already been fixed. Occupies exactly one pattern position.
    PinnedWildcard(Wildcard),
}

impl Fragment {
    /// Length this fragment occupies in the pattern text (pinned wildcards
    /// are always a single character).
    pub fn pat_length(&self) -> usize {
        match self.kind {
            FragmentKind::Fixed { pat_length } => pat_length,
            FragmentKind::PinnedWildcard(_) => 1,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, FragmentKind::PinnedWildcard(_))
    }
}

/// Splits `pattern` into fragments, scanning left to right.
///
/// Maintains two bitsets over the five wildcard kinds: *seen-ever* and
/// *still-floating*. A non-wildcard character extends the current fixed
/// fragment and clears *still-floating* (any unique wildcard seen so far
/// becomes pinned from here on). A wildcard character closes any open fixed
/// fragment; if it is unique, seen before, and no longer floating, it pins
/// as a one-character fragment. Otherwise it's marked seen and floating,
/// and contributes only to the surrounding gap. `*` never pins.
pub fn split_pattern_into_fragments(pattern: &[Tagged]) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut start = 0usize;
    let mut len = 0usize;
    let mut seen_ever = [false; 5];
    let mut still_floating = [false; 5];

    for (pi, &pc) in pattern.iter().enumerate() {
        match tagged_char::to_wildcard(pc) {
            None => {
                len += 1;
                still_floating = [false; 5];
            }
            Some(wc) => {
                if len != 0 {
                    fragments.push(Fragment {
                        pat_start: start,
                        kind: FragmentKind::Fixed { pat_length: len },
                    });
                }
                start = pi + 1;
                len = 0;

                if wc.is_unique() {
                    let ix = wc.index();
                    if seen_ever[ix] && !still_floating[ix] {
                        fragments.push(Fragment {
                            pat_start: pi,
                            kind: FragmentKind::PinnedWildcard(wc),
                        });
                    } else {
                        seen_ever[ix] = true;
                        still_floating[ix] = true;
                    }
                }
            }
        }
    }

    if len != 0 {
        fragments.push(Fragment {
            pat_start: start,
            kind: FragmentKind::Fixed { pat_length: len },
        });
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagged_char::{to_tagged, wildcard_char};

    fn ts(s: &str) -> Vec<Tagged> {
        s.bytes().map(to_tagged).collect()
    }

    #[test]
    fn pure_literal_pattern_is_one_fragment() {
        let pat = ts("abc");
        let frags = split_pattern_into_fragments(&pat);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].pat_start, 0);
        assert_eq!(frags[0].pat_length(), 3);
    }

    #[test]
    fn repeated_unique_wildcard_pins_on_second_occurrence() {
        // "$X$" : leading gap ($ floating), literal "X" (pins $), pinned $ fragment.
        let mut pat = vec![wildcard_char(Wildcard::Ds)];
        pat.extend(ts("X"));
        pat.push(wildcard_char(Wildcard::Ds));
        let frags = split_pattern_into_fragments(&pat);
        assert_eq!(frags.len(), 2);
        assert!(matches!(frags[0].kind, FragmentKind::Fixed { pat_length: 1 }));
        assert_eq!(frags[0].pat_start, 1);
        assert!(matches!(frags[1].kind, FragmentKind::PinnedWildcard(Wildcard::Ds)));
        assert_eq!(frags[1].pat_start, 2);
    }

    #[test]
    fn star_never_pins() {
        let mut pat = ts("A");
        pat.push(wildcard_char(Wildcard::Star));
        pat.push(wildcard_char(Wildcard::Star));
        let frags = split_pattern_into_fragments(&pat);
        assert_eq!(frags.len(), 1);
        assert!(matches!(frags[0].kind, FragmentKind::Fixed { pat_length: 1 }));
    }

    #[test]
    fn leading_and_trailing_gap_have_no_fragments_of_their_own() {
        // ".A$" : leading '.' and trailing '$' each occur once, so neither
        // pins - only "A" gets a fragment.
        let mut pat = vec![wildcard_char(Wildcard::Dot)];
        pat.extend(ts("A"));
        pat.push(wildcard_char(Wildcard::Ds));
        let frags = split_pattern_into_fragments(&pat);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].pat_start, 1);
        assert_eq!(frags[0].pat_length(), 1);
    }

    #[test]
    fn repeated_dot_pins_its_second_occurrence() {
        // ".A." : the trailing '.' is the dot kind's second occurrence, and
        // "A" has cleared still-floating, so it pins - the two dots must
        // capture equal text (see end_to_end.rs::leading_and_trailing_gap_semantics).
        let mut pat = vec![wildcard_char(Wildcard::Dot)];
        pat.extend(ts("A"));
        pat.push(wildcard_char(Wildcard::Dot));
        let frags = split_pattern_into_fragments(&pat);
        assert_eq!(frags.len(), 2);
        assert!(matches!(frags[0].kind, FragmentKind::Fixed { pat_length: 1 }));
        assert_eq!(frags[0].pat_start, 1);
        assert!(matches!(frags[1].kind, FragmentKind::PinnedWildcard(Wildcard::Dot)));
        assert_eq!(frags[1].pat_start, 2);
    }
}
