use std::collections::HashSet;

use super::{Grammar, ProductionBody};

/// Tests whether `input` can be derived from the grammar's start symbol.
///
/// Inputs containing uppercase characters are rejected outright, since those
/// are nonterminal names and never appear in a derived word.
pub fn accepts(grammar: &Grammar, input: &str) -> bool {
    if input.chars().any(char::is_uppercase) {
        return false;
    }

    let mut matcher = Matcher {
        grammar,
        explored: HashSet::new(),
    };
    matcher.derive(input, Some(grammar.start.as_str()))
}

struct Matcher<'a> {
    grammar: &'a Grammar,
    // (remaining length, nonterminal) pairs already searched without success
    explored: HashSet<(usize, &'a str)>,
}

impl<'a> Matcher<'a> {
    // `symbol` of None is the end of a derivation, which only matches once
    // the input is used up
    fn derive(&mut self, remaining: &str, symbol: Option<&'a str>) -> bool {
        let symbol = match symbol {
            Some(symbol) => symbol,
            None => return remaining.is_empty(),
        };

        if !self.explored.insert((remaining.len(), symbol)) {
            return false;
        }

        let grammar = self.grammar;
        grammar.bodies(symbol).iter().any(|body| match body {
            ProductionBody::Empty => self.derive(remaining, None),
            ProductionBody::Terminal(t) => remaining
                .strip_prefix(t.as_str())
                .is_some_and(|rest| self.derive(rest, None)),
            ProductionBody::TerminalThenNonterminal(t, n) => remaining
                .strip_prefix(t.as_str())
                .is_some_and(|rest| self.derive(rest, Some(n.as_str()))),
        })
    }
}
