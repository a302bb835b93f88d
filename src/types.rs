//! This module defines the core data structures and types shared across the
//! regular-expression compiler and the NFA-ε execution engine, including
//! alphabet symbols, execution trace records, recognition results, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The identity of a state, assigned in creation order within one compilation.
///
/// Identities are used only for deterministic ordering and display, never for
/// semantics. Each compilation owns its own allocator (the automaton's arena),
/// so two automata built in the same process both number their states from zero.
pub type StateId = usize;

/// An element of the automaton's transition alphabet.
///
/// `Epsilon` marks a transition that can be taken without consuming input.
/// Because it is a distinct variant it can never collide with a literal
/// character; the compiler additionally rejects the literal `ε` in a regular
/// expression so that rendered transitions stay unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// The distinguished epsilon marker, consumable without reading input.
    Epsilon,
    /// A single literal character from the input alphabet.
    Literal(char),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::Literal(c) => write!(f, "{c}"),
        }
    }
}

/// One entry of the execution trace.
///
/// Records the symbol consumed to reach this step (`None` for the initial
/// step) and the resulting current-state set, sorted by creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// The input symbol consumed by this step, or `None` for the initial step.
    pub symbol: Option<char>,
    /// The current-state set after the step, sorted ascending by identity.
    pub states: Vec<StateId>,
}

/// The outcome of running a test string against a compiled automaton.
///
/// Rejection is an ordinary result, not an error: every well-formed automaton
/// plus every input string produces a definite verdict with a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recognition {
    /// Whether the input string belongs to the automaton's language.
    pub accepted: bool,
    /// A human-readable explanation of the verdict.
    pub reason: String,
    /// The full step history, one record per consumed symbol plus the initial step.
    pub trace: Vec<StepRecord>,
}

/// Represents the errors that can occur while compiling or validating an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    /// Indicates a malformed regular expression, located by its 0-based cursor position.
    #[error("parse error at position {position}: {message}")]
    ParseError {
        /// 0-based character offset at which parsing failed.
        position: usize,
        /// Human-readable description of the failure.
        message: String,
    },
    /// Indicates an error during validation of an automaton's structure.
    #[error("automaton validation error: {0}")]
    ValidationError(String),
}

impl RegexError {
    /// Creates a `ParseError` at the given 0-based cursor position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        RegexError::ParseError {
            position,
            message: message.into(),
        }
    }
}
