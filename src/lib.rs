//! This crate provides the core logic for a regular-expression to NFA-ε
//! converter. It includes modules for compiling expressions via Thompson's
//! construction, simulating the resulting automata with epsilon-closure
//! subset tracking, analyzing automaton invariants, and managing a collection
//! of built-in example patterns.

pub mod analyzer;
pub mod compiler;
pub mod machine;
pub mod nfa;
pub mod patterns;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `compile` function from the compiler module.
pub use compiler::compile;
/// Re-exports the `recognize` function and `Recognizer` struct from the machine module.
pub use machine::{recognize, Recognizer};
/// Re-exports the `Nfa` automaton and its `State` nodes from the nfa module.
pub use nfa::{Nfa, State};
/// Re-exports `Pattern`, `PatternInfo`, `PatternManager`, and `PATTERNS` from the patterns module.
pub use patterns::{Pattern, PatternInfo, PatternManager, PATTERNS};
/// Re-exports various types related to symbols, traces, and errors from the types module.
pub use types::{Recognition, RegexError, StateId, StepRecord, Symbol};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_and_recognize_end_to_end() {
        let nfa = compile("(a|b)*abb").unwrap();

        let result = recognize(&nfa, "ababb");
        assert!(result.accepted);
        assert!(result.reason.starts_with("accepting state"));

        let result = recognize(&nfa, "abab");
        assert!(!result.accepted);
        assert_eq!(result.reason, "no accepting state reached");
    }

    #[test]
    fn test_parse_error_surfaces_position() {
        match compile("(") {
            Err(RegexError::ParseError { position, .. }) => assert_eq!(position, 1),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }
}
