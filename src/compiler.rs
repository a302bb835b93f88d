//! This module compiles a regular expression into an NFA-ε. A recursive-descent
//! parser with one character of lookahead drives Thompson's construction
//! bottom-up: every grammar reduction allocates or rewires states in the
//! automaton's arena, so the parse tree is never materialized.
//!
//! Grammar, precedence low to high (union, concatenation, Kleene star):
//!
//! ```text
//! expression := term ('|' term)*
//! term       := factor+
//! factor     := base ('*')?
//! base       := '(' expression ')' | symbol
//! ```

use crate::analyzer::analyze;
use crate::nfa::Nfa;
use crate::types::{RegexError, StateId, Symbol};

/// Characters consumed as operators rather than as alphabet symbols.
const METACHARACTERS: [char; 4] = ['|', '*', '(', ')'];

/// The textual epsilon marker; rejected as a literal to keep rendered
/// transitions unambiguous.
const EPSILON_CHAR: char = 'ε';

/// Compiles `regex` into an NFA-ε using Thompson's construction.
///
/// The returned automaton exposes its start state and its single accepting
/// state; its states are numbered from zero by a private allocator, so
/// automata from separate calls never share identities.
///
/// # Arguments
///
/// * `regex` - The regular expression over literal symbols, `|`, `*`, and `(`...`)`.
///
/// # Returns
///
/// * `Ok(Nfa)` if the expression is well formed.
/// * `Err(RegexError::ParseError)` with the 0-based cursor position otherwise.
pub fn compile(regex: &str) -> Result<Nfa, RegexError> {
    let nfa = Compiler::new(regex).compile()?;

    // Construction invariants hold for every compiled automaton.
    analyze(&nfa)?;

    Ok(nfa)
}

/// A sub-automaton under construction, identified by its two distinguished
/// states. Fragments do not own their states; they index into the shared
/// arena, and composition rewires the states in place.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    accept: StateId,
}

/// Recursive-descent parser and Thompson builder over a single expression.
struct Compiler {
    chars: Vec<char>,
    pos: usize,
    nfa: Nfa,
}

impl Compiler {
    fn new(regex: &str) -> Self {
        Self {
            chars: regex.chars().collect(),
            pos: 0,
            nfa: Nfa::new(),
        }
    }

    /// Parses the whole input and returns the finished automaton.
    fn compile(mut self) -> Result<Nfa, RegexError> {
        let fragment = self.expression()?;

        // The overall expression must consume the input; an unmatched ')'
        // lands here.
        if self.pos < self.chars.len() {
            return Err(self.error("trailing input after expression"));
        }

        self.nfa.set_start(fragment.start);
        self.nfa.set_accept(fragment.accept);

        Ok(self.nfa)
    }

    /// Returns the lookahead character without advancing, `None` at end of input.
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Consumes and returns the lookahead character.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    /// Creates a `ParseError` at the current cursor position.
    fn error(&self, message: impl Into<String>) -> RegexError {
        RegexError::parse(self.pos, message)
    }

    /// `expression := term ('|' term)*`
    fn expression(&mut self) -> Result<Fragment, RegexError> {
        let mut fragment = self.term()?;

        while self.peek() == Some('|') {
            self.bump();
            let right = self.term()?;
            fragment = self.union(fragment, right);
        }

        Ok(fragment)
    }

    /// `term := factor+`, consumed while the lookahead is not `|`, `)`, or end.
    fn term(&mut self) -> Result<Fragment, RegexError> {
        let mut fragment = self.factor()?;

        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let right = self.factor()?;
            fragment = self.concatenate(fragment, right);
        }

        Ok(fragment)
    }

    /// `factor := base ('*')?`
    fn factor(&mut self) -> Result<Fragment, RegexError> {
        let fragment = self.base()?;

        if self.peek() == Some('*') {
            self.bump();
            return Ok(self.kleene_star(fragment));
        }

        Ok(fragment)
    }

    /// `base := '(' expression ')' | symbol`
    ///
    /// Every end-of-input or missing-operand case is an explicit error; the
    /// parser never silently consumes past the end of the expression.
    fn base(&mut self) -> Result<Fragment, RegexError> {
        match self.peek() {
            None => Err(self.error("unexpected end of expression")),
            Some('(') => {
                self.bump();
                let fragment = self.expression()?;

                if self.peek() != Some(')') {
                    return Err(self.error("expected ')'"));
                }
                self.bump();

                Ok(fragment)
            }
            // An operator or ')' where an operand is expected.
            Some(c) if METACHARACTERS.contains(&c) => Err(self.error(format!("unexpected '{c}'"))),
            Some(EPSILON_CHAR) => Err(self.error(format!("reserved symbol '{EPSILON_CHAR}'"))),
            Some(c) => {
                self.bump();
                Ok(self.symbol(c))
            }
        }
    }

    /// Builds the two-state fragment for a single literal symbol.
    ///
    /// This is the only rule that introduces an accepting state directly; all
    /// composition rules re-home the accepting flag.
    fn symbol(&mut self, symbol: char) -> Fragment {
        let start = self.nfa.new_state();
        let accept = self.nfa.new_state();

        self.nfa
            .add_transition(start, Symbol::Literal(symbol), accept);
        self.nfa.set_accepting(accept, true);

        Fragment { start, accept }
    }

    /// Wires `a`'s accept state into `b`'s start state with an epsilon edge.
    fn concatenate(&mut self, a: Fragment, b: Fragment) -> Fragment {
        self.nfa.set_accepting(a.accept, false);
        self.nfa.add_transition(a.accept, Symbol::Epsilon, b.start);

        Fragment {
            start: a.start,
            accept: b.accept,
        }
    }

    /// Builds the alternation of `a` and `b` around a fresh start/accept pair.
    fn union(&mut self, a: Fragment, b: Fragment) -> Fragment {
        let start = self.nfa.new_state();
        let accept = self.nfa.new_state();

        self.nfa.add_transition(start, Symbol::Epsilon, a.start);
        self.nfa.add_transition(start, Symbol::Epsilon, b.start);

        self.nfa.set_accepting(a.accept, false);
        self.nfa.set_accepting(b.accept, false);
        self.nfa.add_transition(a.accept, Symbol::Epsilon, accept);
        self.nfa.add_transition(b.accept, Symbol::Epsilon, accept);
        self.nfa.set_accepting(accept, true);

        Fragment { start, accept }
    }

    /// Builds the Kleene closure of `a` around a fresh start/accept pair.
    ///
    /// The start state branches into `a` and directly to the new accept
    /// state (zero repetitions); `a`'s old accept state loops back to `a`'s
    /// start (repeat) and exits to the new accept state.
    fn kleene_star(&mut self, a: Fragment) -> Fragment {
        let start = self.nfa.new_state();
        let accept = self.nfa.new_state();

        self.nfa.add_transition(start, Symbol::Epsilon, a.start);
        self.nfa.add_transition(start, Symbol::Epsilon, accept);

        self.nfa.set_accepting(a.accept, false);
        self.nfa.add_transition(a.accept, Symbol::Epsilon, a.start);
        self.nfa.add_transition(a.accept, Symbol::Epsilon, accept);
        self.nfa.set_accepting(accept, true);

        Fragment { start, accept }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error_position(result: Result<Nfa, RegexError>) -> (usize, String) {
        match result {
            Err(RegexError::ParseError { position, message }) => (position, message),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_single_symbol_has_two_states_and_one_transition() {
        let nfa = compile("a").unwrap();

        assert_eq!(nfa.reachable_states(), vec![0, 1]);
        assert_eq!(nfa.all_transitions(), vec![(0, Symbol::Literal('a'), 1)]);
        assert_eq!(nfa.start(), 0);
        assert_eq!(nfa.accept(), 1);
        assert!(nfa.state(1).accepting());
        assert!(!nfa.state(0).accepting());
    }

    #[test]
    fn test_concatenation_wiring() {
        let nfa = compile("ab").unwrap();

        // Symbol fragments (0,1) and (2,3), epsilon from 1 into 2.
        assert_eq!(nfa.start(), 0);
        assert_eq!(nfa.accept(), 3);
        assert_eq!(nfa.state(1).targets(Symbol::Epsilon), &[2]);
        assert!(!nfa.state(1).accepting());
        assert!(nfa.state(3).accepting());
        assert_eq!(nfa.reachable_states().len(), 4);
    }

    #[test]
    fn test_union_wiring() {
        let nfa = compile("a|b").unwrap();

        // Fragments (0,1) and (2,3); union allocates start 4 and accept 5.
        assert_eq!(nfa.start(), 4);
        assert_eq!(nfa.accept(), 5);
        assert_eq!(nfa.state(4).targets(Symbol::Epsilon), &[0, 2]);
        assert_eq!(nfa.state(1).targets(Symbol::Epsilon), &[5]);
        assert_eq!(nfa.state(3).targets(Symbol::Epsilon), &[5]);

        let accepting: Vec<_> = nfa
            .reachable_states()
            .into_iter()
            .filter(|&id| nfa.state(id).accepting())
            .collect();
        assert_eq!(accepting, vec![5]);
    }

    #[test]
    fn test_kleene_star_wiring() {
        let nfa = compile("a*").unwrap();

        // Fragment (0,1); star allocates start 2 and accept 3.
        assert_eq!(nfa.start(), 2);
        assert_eq!(nfa.accept(), 3);
        assert_eq!(nfa.state(2).targets(Symbol::Epsilon), &[0, 3]);
        assert_eq!(nfa.state(1).targets(Symbol::Epsilon), &[0, 3]);
        assert!(!nfa.state(1).accepting());
        assert!(nfa.state(3).accepting());
    }

    #[test]
    fn test_grouping_adds_no_states() {
        let bare = compile("ab").unwrap();
        let grouped = compile("(ab)").unwrap();

        assert_eq!(bare.len(), grouped.len());
        assert_eq!(bare.all_transitions(), grouped.all_transitions());
    }

    #[test]
    fn test_union_binds_looser_than_concatenation() {
        // ab|c groups as (ab)|c, not a(b|c).
        let nfa = compile("ab|c").unwrap();

        // Fragments: a (0,1), b (2,3), concat, c (4,5), union (6,7).
        assert_eq!(nfa.start(), 6);
        assert_eq!(nfa.state(6).targets(Symbol::Epsilon), &[0, 4]);
    }

    #[test]
    fn test_fresh_identities_per_compilation() {
        let first = compile("a|b").unwrap();
        let second = compile("c").unwrap();

        // The second automaton restarts numbering from zero.
        assert_eq!(second.reachable_states(), vec![0, 1]);
        assert_eq!(first.len(), 6);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_exactly_one_accepting_state() {
        for regex in ["a", "ab", "a|b", "a*", "(a|b)*", "ab*c", "(a|b)*abb"] {
            let nfa = compile(regex).unwrap();
            let accepting: Vec<_> = nfa
                .reachable_states()
                .into_iter()
                .filter(|&id| nfa.state(id).accepting())
                .collect();

            assert_eq!(accepting, vec![nfa.accept()], "regex {:?}", regex);
        }
    }

    #[test]
    fn test_no_unreachable_states_are_built() {
        for regex in ["a", "ab", "a|b", "a*", "(a|b)*", "ab*c"] {
            let nfa = compile(regex).unwrap();
            assert_eq!(nfa.reachable_states().len(), nfa.len(), "regex {:?}", regex);
        }
    }

    #[test]
    fn test_empty_expression_is_rejected() {
        let (position, message) = parse_error_position(compile(""));

        assert_eq!(position, 0);
        assert_eq!(message, "unexpected end of expression");
    }

    #[test]
    fn test_unclosed_group_is_rejected() {
        let (position, message) = parse_error_position(compile("("));

        assert_eq!(position, 1);
        assert_eq!(message, "unexpected end of expression");
    }

    #[test]
    fn test_missing_closing_parenthesis() {
        let (position, message) = parse_error_position(compile("(ab"));

        assert_eq!(position, 3);
        assert_eq!(message, "expected ')'");
    }

    #[test]
    fn test_unmatched_closing_parenthesis_is_trailing_input() {
        let (position, message) = parse_error_position(compile("a)"));

        assert_eq!(position, 1);
        assert_eq!(message, "trailing input after expression");
    }

    #[test]
    fn test_union_with_missing_operand() {
        let (position, message) = parse_error_position(compile("a|"));

        assert_eq!(position, 2);
        assert_eq!(message, "unexpected end of expression");
    }

    #[test]
    fn test_union_with_empty_branch() {
        let (position, message) = parse_error_position(compile("a||b"));

        assert_eq!(position, 2);
        assert_eq!(message, "unexpected '|'");
    }

    #[test]
    fn test_star_with_missing_operand() {
        let (position, message) = parse_error_position(compile("*a"));

        assert_eq!(position, 0);
        assert_eq!(message, "unexpected '*'");
    }

    #[test]
    fn test_double_star_is_rejected() {
        let (position, message) = parse_error_position(compile("a**"));

        assert_eq!(position, 2);
        assert_eq!(message, "unexpected '*'");
    }

    #[test]
    fn test_empty_group_is_rejected() {
        let (position, message) = parse_error_position(compile("()"));

        assert_eq!(position, 1);
        assert_eq!(message, "unexpected ')'");
    }

    #[test]
    fn test_literal_epsilon_is_rejected() {
        let (position, message) = parse_error_position(compile("aεb"));

        assert_eq!(position, 1);
        assert_eq!(message, "reserved symbol 'ε'");
    }

    #[test]
    fn test_digits_and_special_characters_are_symbols() {
        assert!(compile("0").is_ok());
        assert!(compile("a+b").is_ok()); // '+' is an ordinary symbol here
        assert!(compile("x_y").is_ok());
    }
}
