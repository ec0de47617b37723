//! The backtracking pattern matcher (C4).
//!
//! Matching proceeds fragment by fragment: place the next fixed or
//! pinned-wildcard fragment at some from-string position, then fill the gap
//! before it one wildcard at a time. Either step can fail, in which case the
//! matcher pops back to the most recent sibling frame - a different
//! placement position, or a smaller window for a variable-length wildcard -
//! and retries. There is no recursion: every retry point is an explicit
//! [`Frame`] pushed onto a `Vec` that plays the role of the call stack.

mod frame;

pub use frame::Frame;
use frame::{cur_wildcard_type, max_wildcard_span, min_wildcard_span};

use crate::error::Status;
use crate::store::WorkStore;
use crate::tagged_char::{self, Tagged};

/// Result of a completed pattern-match attempt against the current pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The pattern matched; `store`'s prefix/suffix and captures describe
    /// where.
    Success,
    /// No placement of fragments and wildcards satisfies the pattern.
    NoMatch,
}

/// Drives the backtracking search to completion against `pattern`, which
/// must already be installed via [`WorkStore::set_current_pattern`].
pub fn do_pattern_match(store: &mut WorkStore, pattern: &[Tagged]) -> Result<MatchOutcome, Status> {
    let mut stack = vec![Frame::initial()];

    loop {
        let Some(top) = stack.pop() else {
            return Err(Status::StackEmpty);
        };
        match step(store, pattern, &mut stack, top)? {
            Step::Continue => {}
            Step::Success => return Ok(MatchOutcome::Success),
            Step::NoMatch => return Ok(MatchOutcome::NoMatch),
        }
    }
}

enum Step {
    Continue,
    Success,
    NoMatch,
}

/// One iteration of the search: either places `top.frag_ix`, or (once
/// placed) fills as much of the gap before it as the current window allows.
fn step(store: &mut WorkStore, pattern: &[Tagged], stack: &mut Vec<Frame>, mut top: Frame) -> Result<Step, Status> {
    let num_frags = store.num_fragments();

    if !top.fixed_is_matched {
        let placed = place_fixed_fragment(store, pattern, &mut top)?;
        store.unmatch(top.fs_wild_ix);

        if !placed {
            return Ok(Step::NoMatch);
        }

        if top.frag_ix < num_frags {
            let frag_len = store
                .pat_frag_length_in_from_str(top.frag_ix)
                .ok_or(Status::StackEmpty)?;
            if top.fs_fixed_ix + frag_len < store.from_string().len() {
                let mut retry_later = top;
                retry_later.fs_fixed_ix += 1;
                retry_later.fixed_is_matched = false;
                stack.push(retry_later);
            }
        }

        stack.push(top);
        Ok(Step::Continue)
    } else {
        let mut skip_advance = false;

        if top.pat_wild_ix < top.pat_fixed_ix {
            if !try_to_fill_gap(pattern, &mut top) {
                return Ok(Step::NoMatch);
            }
            maybe_push_next_wildcard_attempt(pattern, &top, stack);
            if !check_and_handle_wildcard(store, pattern, &mut top)? {
                return Ok(Step::NoMatch);
            }
            if top.pat_wild_ix < top.pat_fixed_ix {
                stack.push(top);
                skip_advance = true;
            }
        }

        if !skip_advance && num_frags != 0 && top.frag_ix <= num_frags {
            let next = compute_next_frag_frame(store, &top)?;
            stack.push(top);
            stack.push(next);
        }

        if top.frag_ix == num_frags && top.pat_wild_ix == top.pat_fixed_ix {
            let prefix_len = top.fs_left_ix.unwrap_or(top.fs_wild_ix);
            store.set_prefix_and_suffix(prefix_len, top.fs_fixed_ix);
            return Ok(Step::Success);
        }

        Ok(Step::Continue)
    }
}

/// Places `top.frag_ix`, or - if there are no fragments at all, or this is
/// the trailing gap past the last one - sets up the from-string window the
/// remaining wildcards get to work with. Returns whether a placement (or
/// window) was found; `top` is updated in place on success.
fn place_fixed_fragment(store: &mut WorkStore, pattern: &[Tagged], top: &mut Frame) -> Result<bool, Status> {
    let num_frags = store.num_fragments();
    let from_len = store.from_string().len();

    if num_frags == 0 {
        // A pattern with no fragments at all is pure wildcards (or empty).
        // If any variable-length wildcard is present, the gap is the whole
        // from-string; otherwise it starts at the beginning and runs for
        // exactly as many characters as there are single-character
        // wildcards - "*" matches everything, "?" matches only the first
        // character, "" matches nothing and leaves the string untouched.
        let max_span = max_wildcard_span(pattern, 0, pattern.len());
        top.pat_wild_ix = 0;
        top.pat_fixed_ix = pattern.len();
        top.fs_wild_ix = 0;
        top.fs_fixed_ix = max_span.unwrap_or(from_len);
        top.fs_wild_end_ix = top.fs_fixed_ix;
        top.fixed_is_matched = true;
        return Ok(true);
    }

    if top.frag_ix == num_frags {
        let prev_ix = top.frag_ix - 1;
        let prev_pat_start = store.pat_frag_start_in_pat(prev_ix, pattern);
        let prev_pat_len = store.pat_frag_length_in_pat(prev_ix);
        top.pat_wild_ix = prev_pat_start + prev_pat_len;
        top.pat_fixed_ix = pattern.len();

        let prev_fs_start = store.frag_pos(prev_ix).ok_or(Status::StackEmpty)?;
        let prev_fs_len = store
            .pat_frag_length_in_from_str(prev_ix)
            .ok_or(Status::StackEmpty)?;
        top.fs_wild_ix = prev_fs_start + prev_fs_len;

        let max_span = max_wildcard_span(pattern, top.pat_wild_ix, top.pat_fixed_ix);
        top.fs_fixed_ix = max_span.map(|s| top.fs_wild_ix + s).unwrap_or(from_len);
        top.fs_wild_end_ix = top.fs_fixed_ix;
        top.fixed_is_matched = true;
        return Ok(true);
    }

    let pat_wild_start = store.pat_frag_start_in_pat(top.frag_ix, pattern);
    let matched = if top.frag_ix > 0 && top.pat_wild_ix == pat_wild_start {
        store.verify_fragment_position(top.frag_ix, top.fs_fixed_ix, pattern)
    } else {
        store
            .advance_fragment_position(top.frag_ix, top.fs_fixed_ix, pattern)
            .is_some()
    };

    if !matched {
        return Ok(false);
    }

    top.fs_fixed_ix = store.frag_pos(top.frag_ix).ok_or(Status::StackEmpty)?;
    top.fixed_is_matched = true;

    if top.fs_left_ix.map_or(true, |left| left > top.fs_fixed_ix) {
        top.fs_left_ix = Some(top.fs_fixed_ix);
    }

    if top.frag_ix == 0 {
        top.pat_wild_ix = 0;
        top.pat_fixed_ix = store.pat_frag_start_in_pat(top.frag_ix, pattern);
        let max_span = max_wildcard_span(pattern, 0, top.pat_fixed_ix);
        top.fs_wild_ix = match max_span {
            None => 0,
            Some(span) => top.fs_fixed_ix.saturating_sub(span),
        };
    }

    top.fs_wild_end_ix = top.fs_fixed_ix;
    top.pat_fixed_ix = store.pat_frag_start_in_pat(top.frag_ix, pattern);
    Ok(true)
}

/// Tries to grow the gap's matched window by one wildcard's worth: for a
/// single-character wildcard, claims exactly the next from-string
/// character, failing if the window is already exhausted; for a
/// variable-length wildcard, shrinks the offered window just enough to
/// leave room for every single-character wildcard still pending after it.
fn try_to_fill_gap(pattern: &[Tagged], top: &mut Frame) -> bool {
    match cur_wildcard_type(pattern, top) {
        Some(wc) if wc.is_single() => {
            if top.fs_wild_ix == top.fs_wild_end_ix || top.fs_wild_ix == top.fs_fixed_ix {
                false
            } else {
                top.fs_wild_end_ix = top.fs_wild_ix + 1;
                true
            }
        }
        _ => {
            let span = min_wildcard_span(pattern, top.pat_wild_ix + 1, top.pat_fixed_ix);
            top.fs_wild_end_ix = top
                .fs_wild_ix
                .max(top.fs_wild_end_ix.min(top.fs_fixed_ix.saturating_sub(span)));
            true
        }
    }
}

/// Before committing to the window [`try_to_fill_gap`] just set, pushes a
/// sibling frame that offers the same variable-length wildcard one fewer
/// character - the next attempt tried if this one (or anything after it)
/// fails.
fn maybe_push_next_wildcard_attempt(pattern: &[Tagged], top: &Frame, stack: &mut Vec<Frame>) {
    if let Some(wc) = cur_wildcard_type(pattern, top) {
        if !wc.is_single() && top.fs_wild_end_ix > top.fs_wild_ix && top.pat_wild_ix + 1 < top.pat_fixed_ix {
            let mut smaller = *top;
            smaller.fs_wild_end_ix -= 1;
            stack.push(smaller);
        }
    }
}

/// Validates the window [`try_to_fill_gap`] offered against the current
/// wildcard's constraints (span, tag purity, cross-occurrence equality for
/// unique kinds), records a capture on success, and advances past it.
fn check_and_handle_wildcard(store: &mut WorkStore, pattern: &[Tagged], top: &mut Frame) -> Result<bool, Status> {
    if top.pat_wild_ix == top.pat_fixed_ix {
        return Ok(true);
    }

    if top.pat_wild_ix + 1 == top.pat_fixed_ix && top.fs_wild_end_ix != top.fs_fixed_ix {
        return Ok(false);
    }

    let matched_len = top.fs_wild_end_ix - top.fs_wild_ix;
    let wc = cur_wildcard_type(pattern, top).ok_or(Status::StackEmpty)?;

    if wc.is_single() && matched_len != 1 {
        return Ok(false);
    }

    if wc.only_untagged() {
        let window = &store.from_string()[top.fs_wild_ix..top.fs_wild_end_ix];
        if window.iter().any(|&c| tagged_char::is_tagged(c)) {
            return Ok(false);
        }
    }

    if wc.is_unique() {
        let prior = store.captures().first_of_kind(wc).map(|ix| *store.captures().get(ix));
        match prior {
            Some(cap) => {
                let from_str = store.from_string();
                let equal = cap.length == matched_len
                    && from_str[cap.start..cap.end()] == from_str[top.fs_wild_ix..top.fs_wild_end_ix];
                if !equal {
                    return Ok(false);
                }
            }
            None => {
                store.record_capture(wc, top.fs_wild_ix, matched_len);
            }
        }
    } else {
        store.record_capture(wc, top.fs_wild_ix, matched_len);
    }

    if top.fs_left_ix.map_or(true, |left| left > top.fs_wild_ix) {
        top.fs_left_ix = Some(top.fs_wild_ix);
    }

    top.pat_wild_ix += 1;
    top.fs_wild_ix = top.fs_wild_end_ix;
    top.fs_wild_end_ix = top.fs_fixed_ix;
    Ok(true)
}

/// Builds the frame for the gap after `prev.frag_ix`, its from-string and
/// pattern boundaries starting right where `prev`'s fragment ended.
fn compute_next_frag_frame(store: &WorkStore, prev: &Frame) -> Result<Frame, Status> {
    let mut next = *prev;
    next.frag_ix += 1;

    let prev_pat_len = store.pat_frag_length_in_pat(prev.frag_ix);
    next.pat_wild_ix = prev.pat_fixed_ix + prev_pat_len;
    next.pat_fixed_ix = next.pat_wild_ix;

    let prev_fs_len = store
        .pat_frag_length_in_from_str(prev.frag_ix)
        .ok_or(Status::StackEmpty)?;
    next.fs_wild_ix = prev.fs_fixed_ix + prev_fs_len;
    next.fs_wild_end_ix = next.fs_wild_ix;
    next.fs_fixed_ix = next.fs_wild_ix;
    next.fixed_is_matched = false;
    Ok(next)
}
