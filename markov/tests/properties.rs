//! Property-based coverage of the invariants named in `SPEC_FULL.md` §8:
//! capture coherence, unique-kind consistency, untagged purity, fragment
//! monotonicity, quick-reject soundness, and determinism.

use proptest::prelude::*;

use markov::program::{Program, Rule};
use markov::store::fragment::split_pattern_into_fragments;
use markov::store::{literal_chars_used, WorkStore};
use markov::tagged_char::{to_tagged, to_untagged, wildcard_char, Tagged, Wildcard};
use markov::Engine;

fn pat(s: &str) -> Vec<Tagged> {
    s.bytes()
        .map(|b| match b {
            b'?' => wildcard_char(Wildcard::Qm),
            b'.' => wildcard_char(Wildcard::Dot),
            b'$' => wildcard_char(Wildcard::Ds),
            b'%' => wildcard_char(Wildcard::Pct),
            b'*' => wildcard_char(Wildcard::Star),
            _ => to_untagged(b),
        })
        .collect()
}

fn input(s: &str) -> Vec<Tagged> {
    s.bytes().map(to_untagged).collect()
}

/// A small closed alphabet keeps proptest's shrinker fast and keeps strings
/// free of the five wildcard symbols, so every generated byte is unambiguous
/// plain literal text once untagged.
fn alphabet_string(max_len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::sample::select(vec!['a', 'b', 'c', 'd', 'X', 'Y']), 0..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    /// Running the same program over the same input twice yields identical
    /// results - the engine carries no hidden, run-to-run-varying state.
    #[test]
    fn determinism(s in alphabet_string(12)) {
        let program = Program::new(vec![
            Rule::new(0, pat("ab"), pat("ba")),
            Rule::new(1, pat("*"), pat("*")),
        ]).unwrap();

        let first = Engine::new().run(&program, &input(&s));
        let second = Engine::new().run(&program, &input(&s));
        prop_assert_eq!(first, second);
    }

    /// A unique wildcard kind used twice in one pattern only ever matches
    /// when every occurrence captures the same substring - so a
    /// replacement that copies that kind out twice always produces two
    /// equal halves.
    #[test]
    fn unique_wildcard_capture_coherence(s in alphabet_string(10)) {
        let program = Program::new(vec![
            Rule::new(0, pat("$X$"), pat("$,$")),
            Rule::new(1, pat("*"), pat("*")),
        ]).unwrap();

        let in_str = input(&s) .into_iter().chain(input("X")).chain(input(&s)).collect::<Vec<_>>();
        if let Ok(out) = Engine::new().run(&program, &in_str) {
            let rendered: Vec<u8> = out.iter().map(|&c| markov::tagged_char::from_tagged(c)).collect();
            let text = String::from_utf8(rendered).unwrap();
            let mut halves = text.splitn(2, ',');
            let left = halves.next().unwrap();
            let right = halves.next().unwrap();
            prop_assert_eq!(left, right);
        }
    }

    /// `?`, `.`, `$`, `%` all reject tagged characters by definition; a
    /// pattern built purely from one of them can never match a from-string
    /// containing even one tagged byte.
    #[test]
    fn untagged_only_wildcards_reject_tagged_input(tag_first in any::<bool>()) {
        let program = Program::new(vec![
            Rule::new(0, pat("?"), pat("?")),
            Rule::new(1, pat("*"), pat("*")),
        ]).unwrap();

        let c = if tag_first { to_tagged(b'z') } else { to_untagged(b'z') };
        let result = Engine::new().run(&program, &[c]);

        if tag_first {
            prop_assert_eq!(result, Err(markov::Status::StartStepNoMatch));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// Fragment decomposition never reorders or overlaps: fragment starts
    /// strictly increase, and each fragment's span ends at or before the
    /// next fragment's start.
    #[test]
    fn fragment_decomposition_is_monotonic_and_non_overlapping(s in alphabet_string(16)) {
        let pattern = pat(&s);
        let frags = split_pattern_into_fragments(&pattern);
        for window in frags.windows(2) {
            let (a, b) = (window[0], window[1]);
            prop_assert!(a.pat_start < b.pat_start);
            prop_assert!(a.pat_start + a.pat_length() <= b.pat_start);
        }
        if let Some(last) = frags.last() {
            prop_assert!(last.pat_start + last.pat_length() <= pattern.len());
        }
    }

    /// `quick_reject` only ever rejects a from-string that is missing some
    /// byte the pattern's literal (non-wildcard) text requires. It must
    /// never reject a from-string that in fact contains every such byte.
    #[test]
    fn quick_reject_is_sound(s in alphabet_string(12), pat_text in alphabet_string(6)) {
        let mut store = WorkStore::new();
        store.set_from_string(input(&s));
        store.ensure_index();

        let pattern = input(&pat_text);
        let needed = literal_chars_used(&pattern);
        let rejected = store.quick_reject(&needed);

        let from_alphabet = markov::tagged_char::chars_used(&input(&s));
        let is_subset = needed.is_subset_of(&from_alphabet);
        prop_assert_eq!(rejected, !is_subset);
    }
}
