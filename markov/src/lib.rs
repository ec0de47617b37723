//! A tagged-character, wildcard-capable Markov-algorithm rewriting engine.
//!
//! A program is an ordered list of pattern/replacement rules (see
//! [`program`]). The driver ([`driver::Engine::run`]) repeatedly scans the
//! program from its current position for the first rule whose pattern
//! matches the current string, applies its replacement, and restarts the
//! scan - until the designated terminator rule fires, or an entire scan
//! finds nothing left to do.
//!
//! Patterns match over a tagged-character alphabet ([`tagged_char`]): every
//! byte carries a tag bit alongside its printable ASCII value, and patterns
//! can use five wildcard kinds with different span and uniqueness rules.
//! Matching itself ([`matcher`]) is interpretive backtracking, not
//! automaton-compiled - there is no regex engine under this crate.
//!
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod driver;
pub mod error;
pub mod matcher;
pub mod program;
pub mod replace;
pub mod store;
pub mod tagged_char;

pub use driver::Engine;
pub use error::Status;
pub use program::{Program, Rule};
pub use tagged_char::{Tagged, TaggedString};

#[cfg(feature = "doc")]
#[doc = document_features::document_features!()]
mod feature_docs {}
