use std::collections::BTreeSet;

use itertools::Itertools;

use super::{ConvertErrorType, ConvertResult};
use crate::automaton::{Automaton, StateId};
use crate::grammar::{Grammar, ProductionBody};

pub fn state_nonterminal(id: StateId) -> String {
    format!("Q{}", id)
}

/// Reads a right-linear grammar off the automaton's transition table:
/// `Q{from} -> symbol Q{to}` for every transition symbol and `Q{k} -> ε`
/// for every final state. The initial state's production comes first.
pub fn to_grammar(automaton: &Automaton) -> ConvertResult<Grammar> {
    let initial = automaton
        .initial_state()
        .ok_or(ConvertErrorType::NoInitialState)?
        .id;

    // Transitions may leave states that were never declared
    let ids: BTreeSet<StateId> = automaton
        .states
        .iter()
        .map(|s| s.id)
        .chain(automaton.transitions.iter().map(|t| t.from))
        .collect();
    let order = std::iter::once(initial).chain(ids.into_iter().filter(|&id| id != initial));

    let mut grammar = Grammar::new(&state_nonterminal(initial));
    for id in order {
        let left = state_nonterminal(id);
        let bodies = automaton
            .transitions
            .iter()
            .filter(|t| t.from == id)
            .flat_map(|t| t.symbols.iter().map(move |&symbol| (symbol, t.to)))
            .unique()
            .map(|(symbol, to)| ProductionBody::TerminalThenNonterminal(symbol.to_string(), state_nonterminal(to)))
            .collect_vec();
        for body in bodies {
            grammar.add_body(&left, body);
        }
        if automaton.state(id).is_some_and(|s| s.is_final) {
            grammar.add_body(&left, ProductionBody::Empty);
        }
    }

    tracing::debug!(productions = grammar.productions.len(), "converted automaton to grammar");
    Ok(grammar)
}
