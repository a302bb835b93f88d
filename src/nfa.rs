//! This module defines the `Nfa` arena and its `State` nodes. States are
//! allocated once, identified by creation order, and mutated in place while
//! the compiler wires fragments together; fragments hold indices into the
//! arena rather than references, so sharing states across fragments is free.

use crate::types::{StateId, Symbol};
use std::collections::BTreeMap;
use std::fmt;

/// A single automaton state.
///
/// Holds an ordered mapping from symbol to the list of target states.
/// Multiple targets per symbol are allowed; this is a nondeterministic
/// automaton and targets accumulate, they are never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,
    transitions: BTreeMap<Symbol, Vec<StateId>>,
    accepting: bool,
}

impl State {
    fn new(id: StateId) -> Self {
        Self {
            id,
            transitions: BTreeMap::new(),
            accepting: false,
        }
    }

    /// Returns this state's creation-order identity.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Returns whether reaching this state at end of input constitutes acceptance.
    pub fn accepting(&self) -> bool {
        self.accepting
    }

    /// Returns the ordered list of target states for `symbol`, empty if none.
    pub fn targets(&self, symbol: Symbol) -> &[StateId] {
        self.transitions
            .get(&symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates this state's transitions in symbol order, epsilon first.
    pub fn transitions(&self) -> impl Iterator<Item = (Symbol, &[StateId])> {
        self.transitions
            .iter()
            .map(|(symbol, targets)| (*symbol, targets.as_slice()))
    }

    /// Returns whether this state has no outgoing transitions.
    pub fn is_dead_end(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.id)
    }
}

/// An epsilon-nondeterministic finite automaton.
///
/// The arena of states doubles as the identity allocator: `new_state` assigns
/// the next index, so identities are private to this automaton and two
/// automata built in the same process never share colliding identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
    accept: StateId,
}

impl Nfa {
    /// Creates an empty automaton with a fresh identity allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh state with no transitions, not accepting.
    pub fn new_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(State::new(id));
        id
    }

    /// Appends `target` to the ordered list of destinations for `symbol` on `state`.
    ///
    /// Repeated calls with the same symbol accumulate targets (nondeterminism).
    pub fn add_transition(&mut self, state: StateId, symbol: Symbol, target: StateId) {
        self.states[state]
            .transitions
            .entry(symbol)
            .or_default()
            .push(target);
    }

    /// Sets or clears the accepting flag on `state`.
    pub fn set_accepting(&mut self, state: StateId, accepting: bool) {
        self.states[state].accepting = accepting;
    }

    /// Marks `state` as the automaton's start state.
    pub fn set_start(&mut self, state: StateId) {
        self.start = state;
    }

    /// Marks `state` as the automaton's distinguished accept state.
    pub fn set_accept(&mut self, state: StateId) {
        self.accept = state;
    }

    /// Returns the start state's identity.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// Returns the distinguished accept state's identity.
    pub fn accept(&self) -> StateId {
        self.accept
    }

    /// Returns whether `state` is the automaton's start state.
    pub fn is_start(&self, state: StateId) -> bool {
        state == self.start
    }

    /// Returns the state with the given identity.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    /// Returns all states in creation order, reachable or not.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Returns the total number of allocated states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns whether the automaton has no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns every state reachable from the start state, sorted by identity.
    ///
    /// Follows all outgoing transitions of all symbols, including epsilon.
    pub fn reachable_states(&self) -> Vec<StateId> {
        self.reachable_from(self.start)
    }

    /// Returns every state reachable from `start`, sorted by identity.
    pub fn reachable_from(&self, start: StateId) -> Vec<StateId> {
        let mut visited = vec![false; self.states.len()];
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            if visited[id] {
                continue;
            }
            visited[id] = true;

            for (_, targets) in self.states[id].transitions() {
                for &target in targets {
                    if !visited[target] {
                        stack.push(target);
                    }
                }
            }
        }

        (0..self.states.len()).filter(|&id| visited[id]).collect()
    }

    /// Returns every transition reachable from the start state as
    /// `(source, symbol, target)` triples, ordered by source identity and
    /// then by symbol, epsilon first.
    ///
    /// Derived purely from `reachable_states`; used for inspection and
    /// rendering by external collaborators.
    pub fn all_transitions(&self) -> Vec<(StateId, Symbol, StateId)> {
        let mut result = Vec::new();

        for id in self.reachable_states() {
            for (symbol, targets) in self.states[id].transitions() {
                for &target in targets {
                    result.push((id, symbol, target));
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_assigns_creation_order_ids() {
        let mut nfa = Nfa::new();

        assert_eq!(nfa.new_state(), 0);
        assert_eq!(nfa.new_state(), 1);
        assert_eq!(nfa.new_state(), 2);
        assert_eq!(nfa.len(), 3);
    }

    #[test]
    fn test_fresh_allocator_per_automaton() {
        let mut first = Nfa::new();
        let mut second = Nfa::new();

        first.new_state();
        first.new_state();

        // A second automaton starts numbering from zero again.
        assert_eq!(second.new_state(), 0);
    }

    #[test]
    fn test_new_state_is_not_accepting_and_has_no_transitions() {
        let mut nfa = Nfa::new();
        let id = nfa.new_state();

        assert!(!nfa.state(id).accepting());
        assert!(nfa.state(id).is_dead_end());
    }

    #[test]
    fn test_add_transition_accumulates_targets() {
        let mut nfa = Nfa::new();
        let source = nfa.new_state();
        let first = nfa.new_state();
        let second = nfa.new_state();

        nfa.add_transition(source, Symbol::Literal('a'), first);
        nfa.add_transition(source, Symbol::Literal('a'), second);

        assert_eq!(nfa.state(source).targets(Symbol::Literal('a')), &[1, 2]);
    }

    #[test]
    fn test_targets_is_empty_for_unknown_symbol() {
        let mut nfa = Nfa::new();
        let id = nfa.new_state();

        assert!(nfa.state(id).targets(Symbol::Literal('x')).is_empty());
        assert!(nfa.state(id).targets(Symbol::Epsilon).is_empty());
    }

    #[test]
    fn test_reachable_states_sorted_and_deduplicated() {
        let mut nfa = Nfa::new();
        let start = nfa.new_state();
        let middle = nfa.new_state();
        let end = nfa.new_state();
        nfa.set_start(start);

        // A diamond: both edges from start converge on `end` via `middle`.
        nfa.add_transition(start, Symbol::Literal('a'), middle);
        nfa.add_transition(start, Symbol::Epsilon, end);
        nfa.add_transition(middle, Symbol::Literal('b'), end);
        nfa.add_transition(end, Symbol::Epsilon, middle);

        assert_eq!(nfa.reachable_states(), vec![0, 1, 2]);
    }

    #[test]
    fn test_reachable_states_excludes_unreached() {
        let mut nfa = Nfa::new();
        let start = nfa.new_state();
        let reached = nfa.new_state();
        let orphan = nfa.new_state();
        nfa.set_start(start);

        nfa.add_transition(start, Symbol::Literal('a'), reached);
        nfa.add_transition(orphan, Symbol::Literal('a'), start);

        assert_eq!(nfa.reachable_states(), vec![0, 1]);
    }

    #[test]
    fn test_all_transitions_ordered_epsilon_first() {
        let mut nfa = Nfa::new();
        let start = nfa.new_state();
        let other = nfa.new_state();
        nfa.set_start(start);

        nfa.add_transition(start, Symbol::Literal('b'), other);
        nfa.add_transition(start, Symbol::Epsilon, other);
        nfa.add_transition(other, Symbol::Literal('a'), start);

        assert_eq!(
            nfa.all_transitions(),
            vec![
                (0, Symbol::Epsilon, 1),
                (0, Symbol::Literal('b'), 1),
                (1, Symbol::Literal('a'), 0),
            ]
        );
    }

    #[test]
    fn test_state_display() {
        let mut nfa = Nfa::new();
        let id = nfa.new_state();

        assert_eq!(nfa.state(id).to_string(), "q0");
    }
}
