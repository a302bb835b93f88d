//! This module maintains a registry of built-in example patterns: classic
//! regular expressions compiled once into their automata and served to front
//! ends by index or name.

use crate::compiler::compile;
use crate::nfa::Nfa;
use crate::types::RegexError;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

// Default embedded patterns
const PATTERN_DEFS: [(&str, &str); 7] = [
    ("Single symbol", "a"),
    ("Alternation", "a|b"),
    ("Kleene closure", "a*"),
    ("Alternation under closure", "(a|b)*"),
    ("Star between symbols", "ab*c"),
    ("Binary strings", "(0|1)*"),
    ("Strings ending in abb", "(a|b)*abb"),
];

lazy_static::lazy_static! {
    pub static ref PATTERNS: RwLock<Vec<Pattern>> = RwLock::new(Vec::new());
}

/// A named example pattern together with its compiled automaton.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub name: String,
    pub expression: String,
    pub nfa: Nfa,
}

pub struct PatternManager;

impl PatternManager {
    /// Compiles the embedded patterns into the registry.
    pub fn load() -> Result<(), RegexError> {
        let mut patterns = Vec::new();

        for (name, expression) in PATTERN_DEFS {
            if let Ok(nfa) = compile(expression) {
                patterns.push(Pattern {
                    name: name.to_string(),
                    expression: expression.to_string(),
                    nfa,
                });
            } else {
                eprintln!("Failed to compile pattern '{name}'");
            }
        }

        if let Ok(mut write_guard) = PATTERNS.write() {
            *write_guard = patterns;
        } else {
            return Err(RegexError::ValidationError(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the number of available patterns
    pub fn pattern_count() -> usize {
        // Initialize with default patterns if not already initialized
        let _ = Self::load();

        PATTERNS.read().map(|patterns| patterns.len()).unwrap_or(0)
    }

    /// Get a pattern by its index
    pub fn get_pattern_by_index(index: usize) -> Result<Pattern, RegexError> {
        // Initialize with default patterns if not already initialized
        let _ = Self::load();

        PATTERNS
            .read()
            .map_err(|_| RegexError::ValidationError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                RegexError::ValidationError(format!("Pattern index {} out of range", index))
            })
    }

    /// Get a pattern by its name
    pub fn get_pattern_by_name(name: &str) -> Result<Pattern, RegexError> {
        // Initialize with default patterns if not already initialized
        let _ = Self::load();

        PATTERNS
            .read()
            .map_err(|_| RegexError::ValidationError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|pattern| pattern.name == name)
            .cloned()
            .ok_or_else(|| RegexError::ValidationError(format!("Pattern '{}' not found", name)))
    }

    /// List all pattern names
    pub fn list_pattern_names() -> Vec<String> {
        // Initialize with default patterns if not already initialized
        let _ = Self::load();

        PATTERNS
            .read()
            .map(|patterns| {
                patterns
                    .iter()
                    .map(|pattern| pattern.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a pattern by its index
    pub fn get_pattern_info(index: usize) -> Result<PatternInfo, RegexError> {
        let pattern = Self::get_pattern_by_index(index)?;

        Ok(PatternInfo {
            index,
            name: pattern.name.clone(),
            expression: pattern.expression.clone(),
            state_count: pattern.nfa.reachable_states().len(),
            transition_count: pattern.nfa.all_transitions().len(),
        })
    }

    /// Search for patterns by name
    pub fn search_patterns(query: &str) -> Vec<usize> {
        // Initialize with default patterns if not already initialized
        let _ = Self::load();

        PATTERNS
            .read()
            .map(|patterns| {
                patterns
                    .iter()
                    .enumerate()
                    .filter(|(_, pattern)| {
                        pattern.name.to_lowercase().contains(&query.to_lowercase())
                    })
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }
}

/// Summary of a registered pattern, suitable for catalog listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternInfo {
    pub index: usize,
    pub name: String,
    pub expression: String,
    pub state_count: usize,
    pub transition_count: usize,
}
