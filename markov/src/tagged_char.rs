//! The tagged-character alphabet.
//!
//! A [`Tagged`] byte is a printable ASCII value (`0x20..=0x7E`) plus a tag
//! bit in position 7. A tagged byte is program-injected "literal" content; an
//! untagged byte is plain user data. Wildcards (`? . $ % *`) are always
//! tagged. The tag bit carries no numeric meaning of its own - it only lets
//! later patterns target literal or plain content selectively.

use std::sync::OnceLock;

/// A single tagged (or untagged) byte: bit 7 is the tag, bits 0..=6 are a
/// printable ASCII value.
pub type Tagged = u8;

/// A mutable, appendable, indexable sequence of [`Tagged`] bytes.
pub type TaggedString = Vec<Tagged>;

const TAG_BIT: u8 = 0x80;
const NONTAG_BITS: u8 = 0x7F;

/// Smallest printable ASCII value a tagged or untagged byte may carry.
pub const FIRST_PRINTING_CHAR: u8 = 0x20;
/// Largest printable ASCII value a tagged or untagged byte may carry.
pub const LAST_PRINTING_CHAR: u8 = 0x7E;

/// Sets the tag bit on a plain ASCII byte.
pub fn to_tagged(c: u8) -> Tagged {
    c | TAG_BIT
}

/// Clears the tag bit on a plain ASCII byte, producing an untagged
/// [`Tagged`] value.
pub fn to_untagged(c: u8) -> Tagged {
    c & NONTAG_BITS
}

/// Strips the tag bit, recovering the underlying printable byte.
pub fn from_tagged(tc: Tagged) -> u8 {
    tc & NONTAG_BITS
}

/// Is the tag bit set?
pub fn is_tagged(tc: Tagged) -> bool {
    tc & TAG_BIT != 0
}

/// One of the five wildcard kinds a pattern character may denote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wildcard {
    /// `?` - matches exactly one untagged char, unique per pattern.
    Qm,
    /// `.` - matches exactly one untagged char, unique per pattern.
    Dot,
    /// `$` - matches zero or more untagged chars, unique per pattern.
    Ds,
    /// `%` - matches zero or more untagged chars, unique per pattern.
    Pct,
    /// `*` - matches zero or more chars of either tag, non-unique.
    Star,
}

/// All five wildcard kinds, in a stable order used to index per-kind
/// tables (capture cursors, first-occurrence-by-kind, etc).
pub const ALL_WILDCARDS: [Wildcard; 5] = [
    Wildcard::Qm,
    Wildcard::Dot,
    Wildcard::Ds,
    Wildcard::Pct,
    Wildcard::Star,
];

impl Wildcard {
    /// The plain (untagged) ASCII character denoting this wildcard.
    pub fn char(self) -> u8 {
        match self {
            Wildcard::Qm => b'?',
            Wildcard::Dot => b'.',
            Wildcard::Ds => b'$',
            Wildcard::Pct => b'%',
            Wildcard::Star => b'*',
        }
    }

    /// Does this wildcard match exactly one character (as opposed to a
    /// variable-length span)?
    pub fn is_single(self) -> bool {
        matches!(self, Wildcard::Qm | Wildcard::Dot)
    }

    /// Must later occurrences of this kind, within one pattern, match the
    /// same substring as the first occurrence?
    pub fn is_unique(self) -> bool {
        !matches!(self, Wildcard::Star)
    }

    /// Does this wildcard's match set exclude tagged characters?
    pub fn only_untagged(self) -> bool {
        !matches!(self, Wildcard::Star)
    }

    /// Index of this kind into a `[T; 5]` table, consistent with
    /// [`ALL_WILDCARDS`].
    pub fn index(self) -> usize {
        match self {
            Wildcard::Qm => 0,
            Wildcard::Dot => 1,
            Wildcard::Ds => 2,
            Wildcard::Pct => 3,
            Wildcard::Star => 4,
        }
    }
}

/// Tagged byte denoting the given wildcard kind.
pub fn wildcard_char(wc: Wildcard) -> Tagged {
    to_tagged(wc.char())
}

fn build_char_to_wildcard() -> [Option<Wildcard>; 256] {
    let mut table = [None; 256];
    for wc in ALL_WILDCARDS {
        table[wildcard_char(wc) as usize] = Some(wc);
    }
    table
}

/// Process-wide reverse lookup from tagged byte to wildcard kind. Built
/// lazily on first use; immutable thereafter (see [`OnceLock`]), so no
/// synchronization is needed on the read path once it's warm.
fn char_to_wildcard_table() -> &'static [Option<Wildcard>; 256] {
    static TABLE: OnceLock<[Option<Wildcard>; 256]> = OnceLock::new();
    TABLE.get_or_init(build_char_to_wildcard)
}

/// Classifies a tagged byte as a wildcard kind, or `None` if it's a plain
/// literal.
pub fn to_wildcard(tc: Tagged) -> Option<Wildcard> {
    char_to_wildcard_table()[tc as usize]
}

/// Is this byte one of the five wildcard characters?
pub fn is_wildcard(tc: Tagged) -> bool {
    to_wildcard(tc).is_some()
}

/// A 256-bit set over [`Tagged`] byte values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharSet([u64; 4]);

impl CharSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, c: Tagged) {
        let c = c as usize;
        self.0[c / 64] |= 1 << (c % 64);
    }

    pub fn get(&self, c: Tagged) -> bool {
        let c = c as usize;
        self.0[c / 64] & (1 << (c % 64)) != 0
    }

    /// `true` iff every bit set in `self` is also set in `other` - i.e.
    /// self's alphabet requirements are satisfiable within `other`.
    pub fn is_subset_of(&self, other: &CharSet) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a & !b == 0)
    }
}

/// Sets a bit for every byte appearing in `ts`, tagged or not.
pub fn chars_used(ts: &[Tagged]) -> CharSet {
    let mut set = CharSet::new();
    for &c in ts {
        set.set(c);
    }
    set
}

/// Picks a delimiter not occurring (tagged or untagged) in `ts`, preferring
/// `"`, then `'`, then `|`, falling back to `"` if all three occur.
fn pick_delimiter(ts: &[Tagged]) -> u8 {
    for delim in [b'"', b'\'', b'|'] {
        let used = ts
            .iter()
            .any(|&c| from_tagged(c) == delim);
        if !used {
            return delim;
        }
    }
    b'"'
}

/// Renders a tagged string for diagnostics: tagged bytes print raw,
/// untagged bytes are preceded by `\`. Not used by the matcher itself.
pub fn print_tagged_string(ts: &[Tagged]) -> String {
    let delim = pick_delimiter(ts);
    let mut out = String::with_capacity(ts.len() + 2);
    out.push(delim as char);
    for &c in ts {
        if !is_tagged(c) {
            out.push('\\');
        }
        out.push(from_tagged(c) as char);
    }
    out.push(delim as char);
    out
}
