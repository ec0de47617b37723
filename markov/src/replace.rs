//! The replacement builder (C5): turns a matched prefix, a rule's
//! replacement text, and the matched suffix into the next to-string.
//!
//! Every literal byte in the replacement is copied through unchanged. Every
//! wildcard byte advances that kind's capture cursor - wrapping back to the
//! first capture of that kind once the last is used - and copies the
//! captured from-string substring instead.

use crate::error::Status;
use crate::store::capture::ReplacementCursors;
use crate::store::WorkStore;
use crate::tagged_char::{self, Tagged};

/// Appends `prefix + expanded(replacement) + suffix` to the store's
/// to-string. `store` must already hold a successful match's prefix/suffix
/// and captures (see [`crate::matcher::do_pattern_match`]).
pub fn build_replacement(store: &mut WorkStore, replacement: &[Tagged]) -> Result<(), Status> {
    let (prefix_len, suffix_start) = store.prefix_and_suffix().ok_or(Status::StackEmpty)?;
    let from_string = store.from_string().to_vec();

    store.append_slice_to_to_string(&from_string[..prefix_len]);

    let mut cursors = ReplacementCursors::new();
    for &c in replacement {
        match tagged_char::to_wildcard(c) {
            None => store.append_char_to_to_string(c),
            Some(wc) => {
                let ix = cursors
                    .advance(wc, store.captures())
                    .ok_or(Status::ReplaceStrBadWildcard)?;
                let cap = *store.captures().get(ix);
                store.append_slice_to_to_string(&from_string[cap.start..cap.end()]);
            }
        }
    }

    store.append_slice_to_to_string(&from_string[suffix_start..]);
    Ok(())
}
