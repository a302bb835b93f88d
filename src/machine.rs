//! This module simulates an NFA-ε against candidate input strings. No DFA is
//! materialized: the machine steps over *sets* of automaton states, taking the
//! epsilon-closure after each consumed symbol, and records a full step trace.

use crate::nfa::Nfa;
use crate::types::{Recognition, StateId, StepRecord, Symbol};
use std::collections::BTreeSet;

/// Runs `input` against `automaton` and returns the verdict, reason, and trace.
///
/// Convenience wrapper around [`Recognizer::recognize`].
pub fn recognize(automaton: &Nfa, input: &str) -> Recognition {
    Recognizer::new(automaton).recognize(input)
}

/// Simulates an NFA-ε over sets of states.
///
/// The recognizer borrows the automaton and never mutates it; repeated runs on
/// the same automaton and input produce identical verdicts and traces. The
/// `BTreeSet` representation keeps every presented state set sorted by
/// creation order.
pub struct Recognizer<'a> {
    nfa: &'a Nfa,
    trace: Vec<StepRecord>,
}

impl<'a> Recognizer<'a> {
    /// Creates a recognizer for the given automaton.
    pub fn new(nfa: &'a Nfa) -> Self {
        Self {
            nfa,
            trace: Vec::new(),
        }
    }

    /// Computes the epsilon-closure of a set of states.
    ///
    /// Worklist fixpoint: pop a state, add every epsilon-destination not yet
    /// in the result to both the result and the worklist. Terminates because
    /// the reachable graph is finite, and is idempotent.
    pub fn epsilon_closure(&self, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = states.clone();
        let mut worklist: Vec<StateId> = states.iter().copied().collect();

        while let Some(id) = worklist.pop() {
            for &target in self.nfa.state(id).targets(Symbol::Epsilon) {
                if closure.insert(target) {
                    worklist.push(target);
                }
            }
        }

        closure
    }

    /// Advances the current-state set by exactly one input symbol.
    ///
    /// Takes the union of every state's targets for exactly `symbol` (a state
    /// with no matching transition contributes nothing), then the
    /// epsilon-closure of that union.
    pub fn step(&self, current: &BTreeSet<StateId>, symbol: char) -> BTreeSet<StateId> {
        let mut moved = BTreeSet::new();

        for &id in current {
            moved.extend(self.nfa.state(id).targets(Symbol::Literal(symbol)));
        }

        self.epsilon_closure(&moved)
    }

    /// Checks whether `input` is accepted by the automaton.
    ///
    /// Starts from the epsilon-closure of the start state and consumes the
    /// input symbol by symbol, recording one trace entry per step. Once the
    /// current-state set becomes empty the remaining symbols are not
    /// processed and the input is rejected.
    pub fn recognize(&mut self, input: &str) -> Recognition {
        self.trace.clear();

        let mut current = self.epsilon_closure(&BTreeSet::from([self.nfa.start()]));
        self.record(None, &current);

        for symbol in input.chars() {
            current = self.step(&current, symbol);
            self.record(Some(symbol), &current);

            if current.is_empty() {
                return self.verdict(false, "no reachable state".to_string());
            }
        }

        match current
            .iter()
            .copied()
            .find(|&id| self.nfa.state(id).accepting())
        {
            Some(id) => {
                let state = self.nfa.state(id);
                self.verdict(true, format!("accepting state {state} reached"))
            }
            None => self.verdict(false, "no accepting state reached".to_string()),
        }
    }

    /// Returns the step history of the most recent run.
    pub fn trace(&self) -> &[StepRecord] {
        &self.trace
    }

    fn record(&mut self, symbol: Option<char>, states: &BTreeSet<StateId>) {
        self.trace.push(StepRecord {
            symbol,
            states: states.iter().copied().collect(),
        });
    }

    fn verdict(&self, accepted: bool, reason: String) -> Recognition {
        Recognition {
            accepted,
            reason,
            trace: self.trace.clone(),
        }
    }
}
