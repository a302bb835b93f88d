//! This module validates the structural invariants of a finished automaton:
//! state references in bounds, the accept state reachable from the start
//! state, and exactly one accepting state among the reachable states. Every
//! automaton produced by the compiler satisfies these; the checks guard
//! hand-assembled automata before they reach the execution engine.

use crate::nfa::Nfa;
use crate::types::{RegexError, StateId};

/// Represents the invariant violations that analysis can find in an automaton.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates an automaton with no states at all.
    NoStates,
    /// Indicates a start, accept, or transition-target reference outside the arena.
    InvalidStateRef(StateId),
    /// Indicates that the accept state cannot be reached from the start state.
    UnreachableAccept(StateId),
    /// Indicates that the accepting flags among reachable states do not mark
    /// exactly the distinguished accept state. Carries the offending set.
    AcceptingMismatch(Vec<StateId>),
}

impl From<AnalysisError> for RegexError {
    /// Converts an `AnalysisError` into a `RegexError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::NoStates => {
                RegexError::ValidationError("No states defined".to_string())
            }
            AnalysisError::InvalidStateRef(id) => {
                RegexError::ValidationError(format!("Reference to undefined state q{}", id))
            }
            AnalysisError::UnreachableAccept(id) => RegexError::ValidationError(format!(
                "Accept state q{} is unreachable from the start state",
                id
            )),
            AnalysisError::AcceptingMismatch(states) => RegexError::ValidationError(format!(
                "Accepting flags set on {:?}, expected exactly the accept state",
                states
            )),
        }
    }
}

/// Analyzes an automaton for structural and invariant violations.
///
/// Checks run in dependency order: reference validity first, so the
/// reachability checks never index outside the arena.
///
/// # Arguments
///
/// * `nfa` - A reference to the automaton to be analyzed.
///
/// # Returns
///
/// * `Ok(())` if no violations are found.
/// * `Err(RegexError::ValidationError)` describing the first violation otherwise.
pub fn analyze(nfa: &Nfa) -> Result<(), RegexError> {
    check_structure(nfa)?;
    check_accept_reachable(nfa)?;
    check_accepting_flags(nfa)?;

    Ok(())
}

/// Checks that the automaton is non-empty and that every state reference
/// (start, accept, and all transition targets) points into the arena.
fn check_structure(nfa: &Nfa) -> Result<(), AnalysisError> {
    if nfa.is_empty() {
        return Err(AnalysisError::NoStates);
    }

    if nfa.start() >= nfa.len() {
        return Err(AnalysisError::InvalidStateRef(nfa.start()));
    }
    if nfa.accept() >= nfa.len() {
        return Err(AnalysisError::InvalidStateRef(nfa.accept()));
    }

    for state in nfa.states() {
        for (_, targets) in state.transitions() {
            for &target in targets {
                if target >= nfa.len() {
                    return Err(AnalysisError::InvalidStateRef(target));
                }
            }
        }
    }

    Ok(())
}

/// Checks that the accept state is reachable from the start state.
fn check_accept_reachable(nfa: &Nfa) -> Result<(), AnalysisError> {
    if !nfa.reachable_states().contains(&nfa.accept()) {
        return Err(AnalysisError::UnreachableAccept(nfa.accept()));
    }

    Ok(())
}

/// Checks that among reachable states, the distinguished accept state is the
/// only one whose accepting flag is set.
fn check_accepting_flags(nfa: &Nfa) -> Result<(), AnalysisError> {
    let accepting: Vec<StateId> = nfa
        .reachable_states()
        .into_iter()
        .filter(|&id| nfa.state(id).accepting())
        .collect();

    if accepting != [nfa.accept()] {
        return Err(AnalysisError::AcceptingMismatch(accepting));
    }

    Ok(())
}
