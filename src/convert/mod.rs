/*
    This module converts between grammars, automata and regular expressions
*/

mod elimination;
mod to_automaton;
mod to_grammar;
mod to_regex;

use std::fmt::Display;

use crate::error_handling::ErrorType;
use crate::grammar::Grammar;

pub use elimination::{automaton_to_regex, Expr};
pub use to_automaton::to_automaton;
pub use to_grammar::{state_nonterminal, to_grammar};
pub use to_regex::to_regex;

#[derive(Debug, PartialEq)]
pub enum ConvertErrorType {
    // A nonterminal is used but has no alternatives
    UndefinedNonterminal(String),
    // The nonterminal derives itself, so the language needs a closure the
    // recursive builder cannot write
    Cycle(String),
    // The automaton has no initial state to start from
    NoInitialState,
    // No final state can be reached, and the empty language has no pattern
    EmptyLanguage,
    // The produced pattern was rejected by the regex engine
    InvalidPattern(String),
}

impl ErrorType for ConvertErrorType {}

impl Display for ConvertErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertErrorType::UndefinedNonterminal(n) => write!(f, "No alternatives for nonterminal `{}`", n),
            ConvertErrorType::Cycle(n) => write!(f, "Nonterminal `{}` derives itself; a closure is needed to express it", n),
            ConvertErrorType::NoInitialState => write!(f, "The automaton has no initial state"),
            ConvertErrorType::EmptyLanguage => write!(f, "No final state is reachable, the language is empty"),
            ConvertErrorType::InvalidPattern(message) => write!(f, "Produced an invalid pattern: {}", message),
        }
    }
}

pub type ConvertResult<T> = Result<T, ConvertErrorType>;

/// Regular expression for any grammar, recursive ones included, by going
/// through the automaton and eliminating its states.
pub fn to_regex_with_closure(grammar: &Grammar) -> ConvertResult<String> {
    automaton_to_regex(&to_automaton(grammar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ProductionBody;

    #[test]
    fn closure_handles_recursion() {
        let mut grammar = Grammar::new("S");
        grammar.add_body("S", ProductionBody::TerminalThenNonterminal("a".to_string(), "S".to_string()));
        grammar.add_body("S", ProductionBody::Empty);

        assert_eq!(to_regex(&grammar), Err(ConvertErrorType::Cycle("S".to_string())));
        assert_eq!(to_regex_with_closure(&grammar), Ok("a*".to_string()));
    }

    #[test]
    fn example_closure() {
        assert_eq!(to_regex_with_closure(&Grammar::example()), Ok("aaa(a|b)*bbb".to_string()));
    }
}
