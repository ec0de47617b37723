//! The driver loop (C6): scans the program for a matching rule, applies it,
//! and repeats until the terminator rule fires or no rule in a full scan
//! matched.

use bon::bon;

use crate::error::Status;
use crate::matcher::{do_pattern_match, MatchOutcome};
use crate::program::{Program, Rule, START_STEP, TERMINATOR_STEP};
use crate::replace::build_replacement;
use crate::store::WorkStore;
#[cfg(feature = "trace")]
use crate::tagged_char;
use crate::tagged_char::{Tagged, TaggedString};

/// Drives a program over an input string to completion.
///
/// Holds the [`WorkStore`] so buffers are reused across [`Engine::run`]
/// calls instead of reallocated each time.
pub struct Engine {
    store: WorkStore,
}

#[bon]
impl Engine {
    /// Builds an engine with a fresh, empty working-string store.
    #[builder]
    pub fn new() -> Self {
        Engine {
            store: WorkStore::new(),
        }
    }

    /// Runs `program` over `input` to completion, returning the final
    /// to-string or the first fatal [`Status`].
    pub fn run(&mut self, program: &Program, input: &[Tagged]) -> Result<TaggedString, Status> {
        self.store.clear_to_string();
        self.store.append_slice_to_to_string(input);
        self.store.swap();
        self.store.ensure_index();

        #[cfg(feature = "trace")]
        log::trace!(
            "initial from-string: {}",
            tagged_char::print_tagged_string(self.store.from_string())
        );

        let pgm_size = program.len();
        let mut pc = START_STEP;
        let mut found_any = false;

        loop {
            if pc == pgm_size {
                if found_any {
                    pc = TERMINATOR_STEP;
                    found_any = false;
                    continue;
                }
                return Err(Status::NoMatchingTransforms);
            }

            let rule = program.get(pc).expect("pc < pgm_size checked above");
            let matched = self.try_rule(rule)?;

            if matched {
                found_any = true;

                #[cfg(feature = "trace")]
                log::debug!(
                    "rule at line {} matched; to-string: {}",
                    rule.line_number(),
                    tagged_char::print_tagged_string(self.store.to_string())
                );

                if pc == TERMINATOR_STEP {
                    return Ok(self.store.to_string().to_vec());
                }

                pc = pc.max(TERMINATOR_STEP);
                self.store.swap();
                self.store.ensure_index();
                continue;
            }

            if pc == START_STEP {
                return Err(Status::StartStepNoMatch);
            }

            if found_any {
                found_any = false;
                pc = TERMINATOR_STEP;
            } else {
                pc += 1;
            }
        }
    }

    /// Attempts `rule` against the current from-string: a quick alphabet
    /// reject short-circuits before the matcher runs at all. Returns
    /// whether it matched; on match, the replacement has already been
    /// built into the to-string.
    fn try_rule(&mut self, rule: &Rule) -> Result<bool, Status> {
        if self.store.quick_reject(rule.pattern_chars_used()) {
            return Ok(false);
        }

        self.store.set_current_pattern(rule.pattern());
        let outcome = do_pattern_match(&mut self.store, rule.pattern())?;

        match outcome {
            MatchOutcome::NoMatch => Ok(false),
            MatchOutcome::Success => {
                build_replacement(&mut self.store, rule.replacement())?;
                Ok(true)
            }
        }
    }

}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagged_char::{to_tagged, to_untagged, wildcard_char, Wildcard};

    fn ts(s: &str) -> TaggedString {
        s.bytes().map(to_tagged).collect()
    }

    fn untagged_ts(s: &str) -> TaggedString {
        s.bytes().map(to_untagged).collect()
    }

    fn rule(line: u32, pattern: &str, replacement: &str) -> Rule {
        Rule::new(line, ts(pattern), ts(replacement))
    }

    #[test]
    fn identity_then_halt() {
        let program = Program::new(vec![rule(1, "", ""), rule(2, "*", "*")]).unwrap();
        let mut engine = Engine::new();
        let out = engine.run(&program, &ts("abc")).unwrap();
        assert_eq!(out, ts("abc"));
    }

    #[test]
    fn single_substitution_then_stop() {
        let program = Program::new(vec![rule(1, "a", "b"), rule(2, "*", "*")]).unwrap();
        let mut engine = Engine::new();
        let out = engine.run(&program, &ts("aaa")).unwrap();
        assert_eq!(out, ts("baa"));
    }

    #[test]
    fn start_rule_must_match_initial_string() {
        let program = Program::new(vec![rule(1, "z", "z"), rule(2, "*", "*")]).unwrap();
        let mut engine = Engine::new();
        assert_eq!(engine.run(&program, &ts("abc")), Err(Status::StartStepNoMatch));
    }

    #[test]
    fn no_matching_transform_is_reported() {
        let program = Program::new(vec![rule(1, "*", "*"), rule(2, "zzz", "zzz")]).unwrap();
        let mut engine = Engine::new();
        assert_eq!(
            engine.run(&program, &ts("abc")),
            Err(Status::NoMatchingTransforms)
        );
    }

    #[test]
    fn unique_wildcard_backreference() {
        // "?-?" requires both `?` occurrences to capture the same character;
        // literal text here is untagged so `?` (untagged-only) can capture it.
        let pattern = vec![
            wildcard_char(Wildcard::Qm),
            to_untagged(b'-'),
            wildcard_char(Wildcard::Qm),
        ];
        let replacement = vec![wildcard_char(Wildcard::Qm)];
        let program = Program::new(vec![Rule::new(1, pattern, replacement), rule(2, "*", "*")]).unwrap();
        let mut engine = Engine::new();
        let out = engine.run(&program, &untagged_ts("a-ab")).unwrap();
        assert_eq!(out, untagged_ts("ab"));
    }
}
